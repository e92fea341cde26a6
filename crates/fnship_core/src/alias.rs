//! Points the branch alias at the published version and proves it landed.

use serde::Serialize;
use tracing::{info, info_span};

use crate::error::DeployError;
use crate::platform::{AliasState, FunctionPlatform, FunctionVersion, PlatformError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasAction {
    Created,
    Repointed,
}

impl AliasAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Repointed => "repointed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasResolution {
    pub alias_name: String,
    pub action: AliasAction,
    pub version: FunctionVersion,
}

/// Reads the alias, issues the one corrective call its state requires, and
/// re-reads to confirm the target version actually landed.
pub fn resolve_alias(
    platform: &dyn FunctionPlatform,
    function_name: &str,
    alias_name: &str,
    version: &FunctionVersion,
    description: &str,
) -> Result<AliasResolution, DeployError> {
    let _span = info_span!("alias", function = function_name, alias = alias_name).entered();

    let state = platform
        .get_alias(function_name, alias_name)
        .map_err(|error| DeployError::AliasLookupFailed {
            alias_name: alias_name.to_string(),
            detail: error.to_string(),
        })?;

    let action = match state {
        AliasState::Absent => {
            info!(version = %version, "alias absent, creating");
            platform
                .create_alias(function_name, alias_name, version, description)
                .map_err(|error| classify_mutation(alias_name, error))?;
            AliasAction::Created
        }
        AliasState::Present(current) => {
            info!(current = %current, version = %version, "alias present, repointing");
            platform
                .update_alias(function_name, alias_name, version, description)
                .map_err(|error| classify_mutation(alias_name, error))?;
            AliasAction::Repointed
        }
    };

    verify_alias(platform, function_name, alias_name, version)?;

    Ok(AliasResolution {
        alias_name: alias_name.to_string(),
        action,
        version: version.clone(),
    })
}

// A timed-out mutation leaves the backend state unknown; everything else is a
// definite failure.
fn classify_mutation(alias_name: &str, error: PlatformError) -> DeployError {
    match error {
        PlatformError::Timeout(_) => DeployError::AliasOperationTimeout {
            alias_name: alias_name.to_string(),
        },
        other => DeployError::AliasOperationFailed {
            alias_name: alias_name.to_string(),
            detail: other.to_string(),
        },
    }
}

fn verify_alias(
    platform: &dyn FunctionPlatform,
    function_name: &str,
    alias_name: &str,
    version: &FunctionVersion,
) -> Result<(), DeployError> {
    match platform.get_alias(function_name, alias_name) {
        Ok(AliasState::Present(found)) if found == version.as_str() => {
            info!(version = %version, "alias verified");
            Ok(())
        }
        Ok(AliasState::Present(found)) => Err(DeployError::AliasVerificationFailed {
            alias_name: alias_name.to_string(),
            expected: version.to_string(),
            found,
        }),
        Ok(AliasState::Absent) => Err(DeployError::AliasVerificationFailed {
            alias_name: alias_name.to_string(),
            expected: version.to_string(),
            found: "absent".to_string(),
        }),
        Err(error) => Err(DeployError::AliasLookupFailed {
            alias_name: alias_name.to_string(),
            detail: error.to_string(),
        }),
    }
}
