//! Capability seams for the remote compute backend.

use std::time::Duration;

use thiserror::Error;

/// Backend failures, classified where the call happens so the orchestration
/// layers never match on message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("resource not found")]
    NotFound,
    #[error("concurrent update in progress: {0}")]
    Conflict(String),
    #[error("call did not complete within {0:?}")]
    Timeout(Duration),
    #[error("backend request failed: {0}")]
    Api(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    InProgress,
    Successful,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasState {
    Absent,
    Present(String),
}

/// Identifier the backend assigns to a published immutable version. Valid
/// tokens are non-empty strings of ASCII digits; anything else means the
/// publish response cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionVersion(String);

impl FunctionVersion {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FunctionVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeUpdateReceipt {
    pub code_sha256: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account: String,
    pub arn: String,
}

/// Control-plane operations of the function backend. One invocation mutates
/// exactly one function, so every call is keyed by the function name.
pub trait FunctionPlatform {
    fn update_code(
        &self,
        function_name: &str,
        artifact: &[u8],
    ) -> Result<CodeUpdateReceipt, PlatformError>;

    fn update_status(&self, function_name: &str) -> Result<UpdateStatus, PlatformError>;

    /// Publishes the current code as a new immutable version and returns the
    /// backend's raw version token, unvalidated.
    fn publish_version(&self, function_name: &str) -> Result<String, PlatformError>;

    /// A missing alias is `Ok(AliasState::Absent)`. An `Err` always means the
    /// lookup itself failed, so callers never treat errors as absence.
    fn get_alias(&self, function_name: &str, alias_name: &str) -> Result<AliasState, PlatformError>;

    fn create_alias(
        &self,
        function_name: &str,
        alias_name: &str,
        version: &FunctionVersion,
        description: &str,
    ) -> Result<(), PlatformError>;

    fn update_alias(
        &self,
        function_name: &str,
        alias_name: &str,
        version: &FunctionVersion,
        description: &str,
    ) -> Result<(), PlatformError>;
}

/// Read-only identity lookup used by preflight to confirm the credentials
/// resolve in the target region.
pub trait IdentityProvider {
    fn caller_identity(&self) -> Result<CallerIdentity, PlatformError>;
}
