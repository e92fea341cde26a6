#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use fnship_core::driver::DriverConfig;
use fnship_core::platform::{
    AliasState, CallerIdentity, CodeUpdateReceipt, FunctionPlatform, FunctionVersion,
    IdentityProvider, PlatformError, UpdateStatus,
};
use fnship_core::request::{BranchLookup, DeploymentInputs, DeploymentRequest};
use fnship_core::retry::Sleeper;
use fnship_core::workflow::WorkflowConfig;

pub const SAMPLE_DEPLOYED_AT: &str = "2026-05-11T14:30:00Z";

/// Remote calls the scripted backend records, in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    UpdateCode {
        function_name: String,
        size_bytes: usize,
    },
    UpdateStatus {
        function_name: String,
    },
    PublishVersion {
        function_name: String,
    },
    GetAlias {
        function_name: String,
        alias_name: String,
    },
    CreateAlias {
        function_name: String,
        alias_name: String,
        version: String,
        description: String,
    },
    UpdateAlias {
        function_name: String,
        alias_name: String,
        version: String,
        description: String,
    },
}

struct ScriptedState {
    calls: Vec<PlatformCall>,
    aliases: HashMap<String, String>,
    next_version: u64,
    default_status: Result<UpdateStatus, PlatformError>,
    upload_results: VecDeque<Result<CodeUpdateReceipt, PlatformError>>,
    status_results: VecDeque<Result<UpdateStatus, PlatformError>>,
    publish_results: VecDeque<Result<String, PlatformError>>,
    get_alias_results: VecDeque<Result<AliasState, PlatformError>>,
    alias_write_results: VecDeque<Result<(), PlatformError>>,
}

/// Scripted backend. Healthy by default: uploads succeed, the function is
/// immediately ready, publishes hand out increasing version tokens, and the
/// alias store behaves like a real one. Enqueued overrides are served first,
/// one per call, without touching the stored state; once a queue drains the
/// healthy default resumes.
pub struct ScriptedPlatform {
    state: Mutex<ScriptedState>,
}

impl Default for ScriptedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ScriptedState {
                calls: Vec::new(),
                aliases: HashMap::new(),
                next_version: 1,
                default_status: Ok(UpdateStatus::Successful),
                upload_results: VecDeque::new(),
                status_results: VecDeque::new(),
                publish_results: VecDeque::new(),
                get_alias_results: VecDeque::new(),
                alias_write_results: VecDeque::new(),
            }),
        }
    }

    pub fn seed_alias(&self, alias_name: &str, version: &str) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .aliases
            .insert(alias_name.to_string(), version.to_string());
    }

    pub fn set_next_version(&self, version: u64) {
        self.state.lock().expect("poisoned mutex").next_version = version;
    }

    pub fn set_default_status(&self, status: Result<UpdateStatus, PlatformError>) {
        self.state.lock().expect("poisoned mutex").default_status = status;
    }

    pub fn enqueue_upload(&self, result: Result<CodeUpdateReceipt, PlatformError>) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .upload_results
            .push_back(result);
    }

    pub fn enqueue_status(&self, result: Result<UpdateStatus, PlatformError>) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .status_results
            .push_back(result);
    }

    pub fn enqueue_publish(&self, result: Result<String, PlatformError>) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .publish_results
            .push_back(result);
    }

    pub fn enqueue_get_alias(&self, result: Result<AliasState, PlatformError>) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .get_alias_results
            .push_back(result);
    }

    pub fn enqueue_alias_write(&self, result: Result<(), PlatformError>) {
        self.state
            .lock()
            .expect("poisoned mutex")
            .alias_write_results
            .push_back(result);
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().expect("poisoned mutex").calls.clone()
    }

    pub fn alias_target(&self, alias_name: &str) -> Option<String> {
        self.state
            .lock()
            .expect("poisoned mutex")
            .aliases
            .get(alias_name)
            .cloned()
    }
}

impl FunctionPlatform for ScriptedPlatform {
    fn update_code(
        &self,
        function_name: &str,
        artifact: &[u8],
    ) -> Result<CodeUpdateReceipt, PlatformError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.calls.push(PlatformCall::UpdateCode {
            function_name: function_name.to_string(),
            size_bytes: artifact.len(),
        });
        match state.upload_results.pop_front() {
            Some(result) => result,
            None => Ok(CodeUpdateReceipt { code_sha256: None }),
        }
    }

    fn update_status(&self, function_name: &str) -> Result<UpdateStatus, PlatformError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.calls.push(PlatformCall::UpdateStatus {
            function_name: function_name.to_string(),
        });
        match state.status_results.pop_front() {
            Some(result) => result,
            None => state.default_status.clone(),
        }
    }

    fn publish_version(&self, function_name: &str) -> Result<String, PlatformError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.calls.push(PlatformCall::PublishVersion {
            function_name: function_name.to_string(),
        });
        match state.publish_results.pop_front() {
            Some(result) => result,
            None => {
                let version = state.next_version;
                state.next_version += 1;
                Ok(version.to_string())
            }
        }
    }

    fn get_alias(
        &self,
        function_name: &str,
        alias_name: &str,
    ) -> Result<AliasState, PlatformError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.calls.push(PlatformCall::GetAlias {
            function_name: function_name.to_string(),
            alias_name: alias_name.to_string(),
        });
        match state.get_alias_results.pop_front() {
            Some(result) => result,
            None => Ok(match state.aliases.get(alias_name) {
                Some(version) => AliasState::Present(version.clone()),
                None => AliasState::Absent,
            }),
        }
    }

    fn create_alias(
        &self,
        function_name: &str,
        alias_name: &str,
        version: &FunctionVersion,
        description: &str,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.calls.push(PlatformCall::CreateAlias {
            function_name: function_name.to_string(),
            alias_name: alias_name.to_string(),
            version: version.as_str().to_string(),
            description: description.to_string(),
        });
        match state.alias_write_results.pop_front() {
            Some(result) => result,
            None => {
                state
                    .aliases
                    .insert(alias_name.to_string(), version.as_str().to_string());
                Ok(())
            }
        }
    }

    fn update_alias(
        &self,
        function_name: &str,
        alias_name: &str,
        version: &FunctionVersion,
        description: &str,
    ) -> Result<(), PlatformError> {
        let mut state = self.state.lock().expect("poisoned mutex");
        state.calls.push(PlatformCall::UpdateAlias {
            function_name: function_name.to_string(),
            alias_name: alias_name.to_string(),
            version: version.as_str().to_string(),
            description: description.to_string(),
        });
        match state.alias_write_results.pop_front() {
            Some(result) => result,
            None => {
                state
                    .aliases
                    .insert(alias_name.to_string(), version.as_str().to_string());
                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    naps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn naps(&self) -> Vec<Duration> {
        self.naps.lock().expect("poisoned mutex").clone()
    }

    pub fn total(&self) -> Duration {
        self.naps.lock().expect("poisoned mutex").iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.naps.lock().expect("poisoned mutex").push(duration);
    }
}

pub struct FixedBranch(pub Option<&'static str>);

impl BranchLookup for FixedBranch {
    fn current_branch(&self) -> Option<String> {
        self.0.map(str::to_string)
    }
}

/// Identity stub that counts how often preflight consults it.
pub struct CountingIdentity {
    result: Result<CallerIdentity, PlatformError>,
    lookups: Mutex<u32>,
}

impl CountingIdentity {
    pub fn new(result: Result<CallerIdentity, PlatformError>) -> Self {
        Self {
            result,
            lookups: Mutex::new(0),
        }
    }

    pub fn lookups(&self) -> u32 {
        *self.lookups.lock().expect("poisoned mutex")
    }
}

impl IdentityProvider for CountingIdentity {
    fn caller_identity(&self) -> Result<CallerIdentity, PlatformError> {
        *self.lookups.lock().expect("poisoned mutex") += 1;
        self.result.clone()
    }
}

pub fn deployer_identity() -> CallerIdentity {
    CallerIdentity {
        account: "123456789012".to_string(),
        arn: "arn:aws:iam::123456789012:user/deployer".to_string(),
    }
}

pub fn sample_inputs(branch: Option<&str>) -> DeploymentInputs {
    DeploymentInputs {
        function_name: "orders-api".to_string(),
        region: "us-east-1".to_string(),
        branch: branch.map(str::to_string),
    }
}

pub fn sample_request() -> DeploymentRequest {
    DeploymentRequest {
        function_name: "orders-api".to_string(),
        region: "us-east-1".to_string(),
        branch_name: "main".to_string(),
        artifact_path: PathBuf::from("dist/function.zip"),
    }
}

pub fn sample_workflow_config() -> WorkflowConfig {
    WorkflowConfig {
        driver: DriverConfig::default(),
        deployed_at: SAMPLE_DEPLOYED_AT.to_string(),
    }
}

pub fn version(token: &str) -> FunctionVersion {
    FunctionVersion::parse(token).expect("valid version token")
}

pub fn write_artifact(root: &Path, relative: &str, body: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create artifact parent dirs");
    }
    std::fs::write(path, body).expect("write artifact file");
}
