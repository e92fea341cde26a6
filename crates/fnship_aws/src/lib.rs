//! AWS-backed adapters for the deployment workflow in `fnship_core`, plus the
//! `fnship` command-line binary that wires them together.
//!
//! The core crate is synchronous and backend-agnostic; everything async and
//! AWS-specific lives here. See `crates/fnship_aws/README.md` for ownership
//! boundaries.

pub mod adapters;
