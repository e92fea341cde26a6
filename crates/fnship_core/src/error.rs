//! Classified deployment failures.

use std::time::Duration;

use thiserror::Error;

/// Everything that can end a deployment early. Each variant is terminal for
/// the invocation; transient backend states are retried inside the driver and
/// only surface here once their ceilings are spent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeployError {
    #[error("invalid arguments: {detail}")]
    InvalidArguments { detail: String },

    #[error("artifact not found: {detail}")]
    ArtifactNotFound { detail: String },

    #[error("credential check failed for region {region}: {detail}")]
    InvalidCredentials { region: String, detail: String },

    #[error("code upload failed: {detail}")]
    UploadFailed { detail: String },

    #[error("code upload did not complete within {limit:?}")]
    UploadTimeout { limit: Duration },

    #[error("backend reported the code update failed: {reason}")]
    BackendUpdateFailed { reason: String },

    #[error("function not ready after {attempts} status checks")]
    ReadinessTimeout { attempts: u32 },

    #[error("publish failed: {detail}")]
    PublishFailed { detail: String },

    #[error("publish returned a malformed version token: {token:?}")]
    PublishResponseMalformed { token: String },

    #[error("alias lookup failed for {alias_name}: {detail}")]
    AliasLookupFailed { alias_name: String, detail: String },

    #[error("alias operation failed for {alias_name}: {detail}")]
    AliasOperationFailed { alias_name: String, detail: String },

    #[error("alias operation timed out for {alias_name}; backend state unknown")]
    AliasOperationTimeout { alias_name: String },

    #[error("alias {alias_name} resolved to {found} after update, expected version {expected}")]
    AliasVerificationFailed {
        alias_name: String,
        expected: String,
        found: String,
    },
}

impl DeployError {
    /// Stable classification name for status lines and log fields.
    pub fn classification(&self) -> &'static str {
        match self {
            Self::InvalidArguments { .. } => "InvalidArguments",
            Self::ArtifactNotFound { .. } => "ArtifactNotFound",
            Self::InvalidCredentials { .. } => "InvalidCredentials",
            Self::UploadFailed { .. } => "UploadFailed",
            Self::UploadTimeout { .. } => "UploadTimeout",
            Self::BackendUpdateFailed { .. } => "BackendUpdateFailed",
            Self::ReadinessTimeout { .. } => "ReadinessTimeout",
            Self::PublishFailed { .. } => "PublishFailed",
            Self::PublishResponseMalformed { .. } => "PublishResponseMalformed",
            Self::AliasLookupFailed { .. } => "AliasLookupFailed",
            Self::AliasOperationFailed { .. } => "AliasOperationFailed",
            Self::AliasOperationTimeout { .. } => "AliasOperationTimeout",
            Self::AliasVerificationFailed { .. } => "AliasVerificationFailed",
        }
    }

    /// True when re-running cannot help until something local changes:
    /// the invocation itself, the artifact on disk, or the credentials.
    pub fn requires_local_fix(&self) -> bool {
        matches!(
            self,
            Self::InvalidArguments { .. }
                | Self::ArtifactNotFound { .. }
                | Self::InvalidCredentials { .. }
        )
    }

    pub fn recovery_hint(&self) -> &'static str {
        if self.requires_local_fix() {
            "fix the reported problem, then deploy again"
        } else {
            "re-run the deployment; it resumes safely from the top"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_names_are_stable() {
        let error = DeployError::ReadinessTimeout { attempts: 20 };
        assert_eq!(error.classification(), "ReadinessTimeout");

        let error = DeployError::AliasVerificationFailed {
            alias_name: "production".to_string(),
            expected: "42".to_string(),
            found: "41".to_string(),
        };
        assert_eq!(error.classification(), "AliasVerificationFailed");
    }

    #[test]
    fn local_fix_split_matches_recovery_hints() {
        let local = DeployError::ArtifactNotFound {
            detail: "no artifact".to_string(),
        };
        assert!(local.requires_local_fix());
        assert!(local.recovery_hint().contains("deploy again"));

        let remote = DeployError::PublishFailed {
            detail: "backend request failed".to_string(),
        };
        assert!(!remote.requires_local_fix());
        assert!(remote.recovery_hint().contains("re-run"));
    }

    #[test]
    fn upload_timeout_reports_the_limit() {
        let error = DeployError::UploadTimeout {
            limit: Duration::from_secs(60),
        };
        assert_eq!(error.to_string(), "code upload did not complete within 60s");
    }
}
