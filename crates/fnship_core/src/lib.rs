//! Deployment orchestration for serverless function releases.
//!
//! This crate owns the workflow logic only: argument and branch resolution,
//! artifact and credential preflight, the upload/readiness/publish driver,
//! and alias resolution. Backend access is injected through the traits in
//! [`platform`], so the whole flow runs in tests without network access.
//! See `crates/fnship_core/README.md` for ownership boundaries.

pub mod alias;
pub mod artifact;
pub mod driver;
pub mod error;
pub mod platform;
pub mod preflight;
pub mod request;
pub mod retry;
pub mod workflow;
