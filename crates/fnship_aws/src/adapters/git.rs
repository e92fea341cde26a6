//! Branch detection via the local `git` binary.

use std::process::Command;

use tracing::debug;

use fnship_core::request::BranchLookup;

/// Reads the checked-out branch with `git rev-parse --abbrev-ref HEAD`.
/// Every failure mode reports no branch: a missing `git` binary, a directory
/// outside any repository, or empty output. A detached checkout prints the
/// literal `HEAD`, which the input resolver discards.
pub struct GitBranchLookup;

impl BranchLookup for GitBranchLookup {
    fn current_branch(&self) -> Option<String> {
        let output = match Command::new("git")
            .args(["rev-parse", "--abbrev-ref", "HEAD"])
            .output()
        {
            Ok(output) => output,
            Err(error) => {
                debug!(%error, "git not runnable, falling back to default branch");
                return None;
            }
        };

        if !output.status.success() {
            debug!(
                code = output.status.code(),
                "git rev-parse failed, falling back to default branch"
            );
            return None;
        }

        let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if branch.is_empty() {
            None
        } else {
            Some(branch)
        }
    }
}
