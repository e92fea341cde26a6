use std::path::Path;

use tracing::info;

use crate::artifact::{locate_artifact, ArtifactBundle};
use crate::error::DeployError;
use crate::platform::{CallerIdentity, IdentityProvider};

pub fn resolve_artifact(search_root: &Path) -> Result<ArtifactBundle, DeployError> {
    let bundle = locate_artifact(search_root)?;
    info!(
        path = %bundle.path().display(),
        size_bytes = bundle.len(),
        sha256 = bundle.sha256_hex(),
        "artifact resolved"
    );
    Ok(bundle)
}

/// Confirms the ambient credentials resolve before anything mutating runs.
/// Advisory only: the driver's own calls stay the authoritative check.
pub fn verify_credentials(
    identity: &dyn IdentityProvider,
    region: &str,
) -> Result<CallerIdentity, DeployError> {
    match identity.caller_identity() {
        Ok(caller) => {
            info!(account = %caller.account, arn = %caller.arn, region, "credentials verified");
            Ok(caller)
        }
        Err(error) => Err(DeployError::InvalidCredentials {
            region: region.to_string(),
            detail: error.to_string(),
        }),
    }
}
