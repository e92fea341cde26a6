//! Concrete backends for the capability traits in `fnship_core::platform`.
//!
//! Each adapter owns an SDK client and a handle to the binary's runtime. The
//! workflow itself runs on a plain thread, so every remote call is bridged
//! with [`block_on_with_timeout`] and carries its own completion bound.

use std::future::Future;
use std::time::Duration;

use aws_sdk_lambda::error::ProvideErrorMetadata;
use tokio::runtime::Handle;

use fnship_core::platform::PlatformError;

pub mod git;
pub mod lambda;
pub mod sts;

/// Drives `future` on the runtime behind `handle`, giving it `limit` to
/// finish. Overrunning the bound maps to [`PlatformError::Timeout`].
pub(crate) fn block_on_with_timeout<T, F>(
    handle: &Handle,
    limit: Duration,
    future: F,
) -> Result<T, PlatformError>
where
    F: Future<Output = Result<T, PlatformError>>,
{
    match handle.block_on(async { tokio::time::timeout(limit, future).await }) {
        Ok(result) => result,
        Err(_elapsed) => Err(PlatformError::Timeout(limit)),
    }
}

/// Human-readable detail for a service error, preferring the wire metadata
/// and falling back to the error's own rendering.
pub(crate) fn error_detail(error: &(impl ProvideErrorMetadata + std::fmt::Display)) -> String {
    match (error.code(), error.message()) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (Some(code), None) => code.to_string(),
        (None, Some(message)) => message.to_string(),
        (None, None) => error.to_string(),
    }
}
