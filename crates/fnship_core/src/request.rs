use std::path::PathBuf;

use crate::error::DeployError;

pub const DEFAULT_BRANCH: &str = "main";
pub const PRODUCTION_ALIAS: &str = "production";

/// Ambient source-control lookup. `None` means no branch could be determined
/// and the default branch applies.
pub trait BranchLookup {
    fn current_branch(&self) -> Option<String>;
}

/// Raw invocation values, before validation or branch resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentInputs {
    pub function_name: String,
    pub region: String,
    pub branch: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInputs {
    pub function_name: String,
    pub region: String,
    pub branch_name: String,
}

/// The deployment identity, complete once the artifact has been located.
/// Built exactly once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub function_name: String,
    pub region: String,
    pub branch_name: String,
    pub artifact_path: PathBuf,
}

/// Traffic for the default branch rides the production alias; every other
/// branch gets an alias named after itself.
pub fn alias_for_branch(branch_name: &str) -> String {
    if branch_name == DEFAULT_BRANCH {
        PRODUCTION_ALIAS.to_string()
    } else {
        branch_name.to_string()
    }
}

pub fn normalize_inputs(
    inputs: DeploymentInputs,
    branches: &dyn BranchLookup,
) -> Result<NormalizedInputs, DeployError> {
    let function_name = inputs.function_name.trim().to_string();
    if function_name.is_empty() {
        return Err(DeployError::InvalidArguments {
            detail: "function name cannot be empty".to_string(),
        });
    }

    let region = inputs.region.trim().to_string();
    if region.is_empty() {
        return Err(DeployError::InvalidArguments {
            detail: "region cannot be empty".to_string(),
        });
    }

    let branch_name = match inputs.branch.as_deref().map(str::trim) {
        Some(branch) if !branch.is_empty() => branch.to_string(),
        _ => detected_branch(branches),
    };

    Ok(NormalizedInputs {
        function_name,
        region,
        branch_name,
    })
}

fn detected_branch(branches: &dyn BranchLookup) -> String {
    match branches.current_branch() {
        // A detached checkout reports the literal "HEAD", which names no branch.
        Some(branch) if branch.trim() != "HEAD" && !branch.trim().is_empty() => {
            branch.trim().to_string()
        }
        _ => DEFAULT_BRANCH.to_string(),
    }
}
