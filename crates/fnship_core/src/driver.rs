//! Upload, readiness wait, and publish, with the retry policy for both loops.

use std::time::Duration;

use tracing::{debug, info, info_span, warn};

use crate::error::DeployError;
use crate::platform::{
    CodeUpdateReceipt, FunctionPlatform, FunctionVersion, PlatformError, UpdateStatus,
};
use crate::request::DeploymentRequest;
use crate::retry::{retry, RetryError, RetryPolicy, Sleeper};

pub const READINESS_MAX_ATTEMPTS: u32 = 20;
pub const READINESS_POLL_DELAY: Duration = Duration::from_secs(3);
pub const PUBLISH_MAX_ATTEMPTS: u32 = 5;
pub const PUBLISH_RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    pub readiness: RetryPolicy,
    pub publish: RetryPolicy,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            readiness: RetryPolicy {
                max_attempts: READINESS_MAX_ATTEMPTS,
                delay: READINESS_POLL_DELAY,
            },
            publish: RetryPolicy {
                max_attempts: PUBLISH_MAX_ATTEMPTS,
                delay: PUBLISH_RETRY_DELAY,
            },
        }
    }
}

/// Runs upload, readiness wait, and publish for the request's function and
/// returns the newly published immutable version.
pub fn release_artifact(
    platform: &dyn FunctionPlatform,
    sleeper: &dyn Sleeper,
    config: &DriverConfig,
    request: &DeploymentRequest,
    artifact: &[u8],
) -> Result<FunctionVersion, DeployError> {
    info!(
        function = %request.function_name,
        artifact = %request.artifact_path.display(),
        "starting code release"
    );
    upload_code(platform, &request.function_name, artifact)?;
    await_readiness(platform, sleeper, config.readiness, &request.function_name)?;
    publish_new_version(platform, sleeper, config, &request.function_name)
}

pub fn upload_code(
    platform: &dyn FunctionPlatform,
    function_name: &str,
    artifact: &[u8],
) -> Result<CodeUpdateReceipt, DeployError> {
    let _span = info_span!("upload", function = function_name).entered();
    info!(size_bytes = artifact.len(), "submitting new code");
    match platform.update_code(function_name, artifact) {
        Ok(receipt) => {
            if let Some(code_sha256) = &receipt.code_sha256 {
                debug!(%code_sha256, "backend acknowledged new code");
            }
            Ok(receipt)
        }
        Err(PlatformError::Timeout(limit)) => Err(DeployError::UploadTimeout { limit }),
        Err(error) => Err(DeployError::UploadFailed {
            detail: error.to_string(),
        }),
    }
}

enum ReadinessProbe {
    NotReady,
    PollError(PlatformError),
    UpdateFailed { reason: String },
}

/// Polls until the backend reports the update applied. Failed polls count
/// toward the attempt ceiling, so the wait stays bounded even against a
/// broken status endpoint.
pub fn await_readiness(
    platform: &dyn FunctionPlatform,
    sleeper: &dyn Sleeper,
    policy: RetryPolicy,
    function_name: &str,
) -> Result<(), DeployError> {
    let _span = info_span!("readiness", function = function_name).entered();
    let outcome = retry(
        policy,
        sleeper,
        |probe| !matches!(probe, ReadinessProbe::UpdateFailed { .. }),
        |attempt| match platform.update_status(function_name) {
            Ok(UpdateStatus::Successful) => {
                info!(attempt, "function ready");
                Ok(())
            }
            Ok(UpdateStatus::InProgress) => {
                debug!(attempt, max_attempts = policy.max_attempts, "update still in progress");
                Err(ReadinessProbe::NotReady)
            }
            Ok(UpdateStatus::Failed { reason }) => Err(ReadinessProbe::UpdateFailed { reason }),
            Err(error) => {
                warn!(attempt, %error, "status poll failed");
                Err(ReadinessProbe::PollError(error))
            }
        },
    );

    match outcome {
        Ok(()) => Ok(()),
        Err(RetryError::Fatal(ReadinessProbe::UpdateFailed { reason })) => {
            Err(DeployError::BackendUpdateFailed { reason })
        }
        Err(RetryError::Exhausted { attempts, .. }) => {
            Err(DeployError::ReadinessTimeout { attempts })
        }
        // NotReady and PollError are always retryable; they cannot reach Fatal.
        Err(RetryError::Fatal(_)) => Err(DeployError::ReadinessTimeout {
            attempts: policy.max_attempts,
        }),
    }
}

enum PublishProbe {
    Conflict(String),
    Halt(DeployError),
}

/// Requests a new immutable version. A conflict means the backend is still
/// applying an update, so the wait-then-publish cycle re-runs under its own
/// ceiling rather than retrying blind.
pub fn publish_new_version(
    platform: &dyn FunctionPlatform,
    sleeper: &dyn Sleeper,
    config: &DriverConfig,
    function_name: &str,
) -> Result<FunctionVersion, DeployError> {
    let _span = info_span!("publish", function = function_name).entered();
    let outcome = retry(
        config.publish,
        sleeper,
        |probe| matches!(probe, PublishProbe::Conflict(_)),
        |attempt| {
            if attempt > 1 {
                info!(attempt, "re-checking readiness before publish retry");
                await_readiness(platform, sleeper, config.readiness, function_name)
                    .map_err(PublishProbe::Halt)?;
            }

            match platform.publish_version(function_name) {
                Ok(token) => match FunctionVersion::parse(&token) {
                    Some(version) => {
                        info!(version = %version, "published new version");
                        Ok(version)
                    }
                    None => Err(PublishProbe::Halt(DeployError::PublishResponseMalformed {
                        token,
                    })),
                },
                Err(PlatformError::Conflict(reason)) => {
                    warn!(attempt, reason = %reason, "publish rejected while update in progress");
                    Err(PublishProbe::Conflict(reason))
                }
                Err(error) => Err(PublishProbe::Halt(DeployError::PublishFailed {
                    detail: error.to_string(),
                })),
            }
        },
    );

    match outcome {
        Ok(version) => Ok(version),
        Err(RetryError::Fatal(PublishProbe::Halt(error))) => Err(error),
        Err(RetryError::Fatal(PublishProbe::Conflict(reason))) => {
            Err(DeployError::PublishFailed { detail: reason })
        }
        Err(RetryError::Exhausted { attempts, last }) => Err(match last {
            PublishProbe::Conflict(reason) => DeployError::PublishFailed {
                detail: format!(
                    "update conflict persisted after {attempts} publish attempts: {reason}"
                ),
            },
            PublishProbe::Halt(error) => error,
        }),
    }
}
