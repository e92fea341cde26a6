//! End-to-end composition of one deployment run.

use std::path::Path;

use serde::Serialize;
use tracing::{info, info_span};

use crate::alias::{resolve_alias, AliasAction};
use crate::driver::{release_artifact, DriverConfig};
use crate::error::DeployError;
use crate::platform::{FunctionPlatform, IdentityProvider};
use crate::preflight;
use crate::request::{
    alias_for_branch, normalize_inputs, BranchLookup, DeploymentInputs, DeploymentRequest,
};
use crate::retry::Sleeper;

/// Capabilities a deployment needs, borrowed for the duration of one run.
pub struct DeploymentEnv<'a> {
    pub search_root: &'a Path,
    pub branches: &'a dyn BranchLookup,
    pub identity: &'a dyn IdentityProvider,
    pub platform: &'a dyn FunctionPlatform,
    pub sleeper: &'a dyn Sleeper,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    pub driver: DriverConfig,
    /// RFC 3339 stamp for the alias description, composed by the caller so
    /// this crate stays clock-free.
    pub deployed_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployOutcome {
    pub function_name: String,
    pub region: String,
    pub branch_name: String,
    pub alias_name: String,
    pub alias_action: AliasAction,
    pub version: String,
    pub account: String,
    pub artifact_sha256: String,
}

pub fn alias_description(branch_name: &str, deployed_at: &str) -> String {
    format!("branch {branch_name} deployed {deployed_at}")
}

/// Runs the full deployment: resolve identity, preflight, release, alias.
/// Every failure is classified; a clean return means the alias is verified
/// at the newly published version.
pub fn run_deployment(
    inputs: DeploymentInputs,
    env: &DeploymentEnv<'_>,
    config: &WorkflowConfig,
) -> Result<DeployOutcome, DeployError> {
    let resolved = normalize_inputs(inputs, env.branches)?;
    let alias_name = alias_for_branch(&resolved.branch_name);
    info!(
        function = %resolved.function_name,
        region = %resolved.region,
        branch = %resolved.branch_name,
        alias = %alias_name,
        "deployment target resolved"
    );

    let (bundle, caller) = {
        let _span = info_span!("preflight").entered();
        let bundle = preflight::resolve_artifact(env.search_root)?;
        let caller = preflight::verify_credentials(env.identity, &resolved.region)?;
        (bundle, caller)
    };

    let request = DeploymentRequest {
        function_name: resolved.function_name,
        region: resolved.region,
        branch_name: resolved.branch_name,
        artifact_path: bundle.path().to_path_buf(),
    };

    let version =
        release_artifact(env.platform, env.sleeper, &config.driver, &request, bundle.bytes())?;

    let description = alias_description(&request.branch_name, &config.deployed_at);
    let resolution =
        resolve_alias(env.platform, &request.function_name, &alias_name, &version, &description)?;

    info!(
        version = %version,
        alias = %alias_name,
        action = resolution.action.as_str(),
        "deployment complete"
    );

    Ok(DeployOutcome {
        function_name: request.function_name,
        region: request.region,
        branch_name: request.branch_name,
        alias_name: resolution.alias_name,
        alias_action: resolution.action,
        version: resolution.version.to_string(),
        account: caller.account,
        artifact_sha256: bundle.sha256_hex().to_string(),
    })
}
