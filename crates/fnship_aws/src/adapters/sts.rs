//! Caller-identity lookup used by the preflight credential check.

use std::time::Duration;

use aws_sdk_sts::operation::get_caller_identity::GetCallerIdentityOutput;
use tokio::runtime::Handle;

use fnship_core::platform::{CallerIdentity, IdentityProvider, PlatformError};

use crate::adapters::{block_on_with_timeout, error_detail};

const IDENTITY_CALL_TIMEOUT: Duration = Duration::from_secs(10);

pub struct StsIdentityProvider {
    client: aws_sdk_sts::Client,
    handle: Handle,
}

impl StsIdentityProvider {
    pub fn new(client: aws_sdk_sts::Client, handle: Handle) -> Self {
        Self { client, handle }
    }
}

impl IdentityProvider for StsIdentityProvider {
    fn caller_identity(&self) -> Result<CallerIdentity, PlatformError> {
        let request = self.client.get_caller_identity();

        let output = block_on_with_timeout(&self.handle, IDENTITY_CALL_TIMEOUT, async move {
            request
                .send()
                .await
                .map_err(|error| PlatformError::Api(error_detail(&error.into_service_error())))
        })?;

        identity_of(&output)
    }
}

fn identity_of(output: &GetCallerIdentityOutput) -> Result<CallerIdentity, PlatformError> {
    match (output.account(), output.arn()) {
        (Some(account), Some(arn)) => Ok(CallerIdentity {
            account: account.to_string(),
            arn: arn.to_string(),
        }),
        _ => Err(PlatformError::Api("identity response carried no account or arn".to_string())),
    }
}
