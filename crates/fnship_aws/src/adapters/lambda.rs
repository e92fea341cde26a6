//! Lambda control-plane adapter.
//!
//! Maps the SDK's typed operation errors onto [`PlatformError`] in one
//! classification function per operation, so the driver and alias resolver
//! never inspect message text. A missing alias is reported as state, not as
//! an error.

use std::time::Duration;

use aws_sdk_lambda::operation::create_alias::CreateAliasError;
use aws_sdk_lambda::operation::get_alias::GetAliasError;
use aws_sdk_lambda::operation::get_function_configuration::{
    GetFunctionConfigurationError, GetFunctionConfigurationOutput,
};
use aws_sdk_lambda::operation::publish_version::PublishVersionError;
use aws_sdk_lambda::operation::update_alias::UpdateAliasError;
use aws_sdk_lambda::operation::update_function_code::UpdateFunctionCodeError;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::LastUpdateStatus;
use tokio::runtime::Handle;

use fnship_core::platform::{
    AliasState, CodeUpdateReceipt, FunctionPlatform, FunctionVersion, PlatformError, UpdateStatus,
};

use crate::adapters::{block_on_with_timeout, error_detail};

const UPLOAD_CALL_TIMEOUT: Duration = Duration::from_secs(60);
const STATUS_CALL_TIMEOUT: Duration = Duration::from_secs(10);
const PUBLISH_CALL_TIMEOUT: Duration = Duration::from_secs(30);
const ALIAS_CALL_TIMEOUT: Duration = Duration::from_secs(15);

pub struct LambdaFunctionPlatform {
    client: aws_sdk_lambda::Client,
    handle: Handle,
}

impl LambdaFunctionPlatform {
    pub fn new(client: aws_sdk_lambda::Client, handle: Handle) -> Self {
        Self { client, handle }
    }
}

impl FunctionPlatform for LambdaFunctionPlatform {
    fn update_code(
        &self,
        function_name: &str,
        artifact: &[u8],
    ) -> Result<CodeUpdateReceipt, PlatformError> {
        let request = self.client
            .update_function_code()
            .function_name(function_name)
            .zip_file(Blob::new(artifact));

        let output = block_on_with_timeout(&self.handle, UPLOAD_CALL_TIMEOUT, async move {
            request
                .send()
                .await
                .map_err(|error| classify_code_update_error(&error.into_service_error()))
        })?;

        Ok(CodeUpdateReceipt {
            code_sha256: output.code_sha256().map(str::to_string),
        })
    }

    fn update_status(&self, function_name: &str) -> Result<UpdateStatus, PlatformError> {
        let request = self.client
            .get_function_configuration()
            .function_name(function_name);

        let output = block_on_with_timeout(&self.handle, STATUS_CALL_TIMEOUT, async move {
            request
                .send()
                .await
                .map_err(|error| classify_status_error(&error.into_service_error()))
        })?;

        Ok(update_status_of(&output))
    }

    fn publish_version(&self, function_name: &str) -> Result<String, PlatformError> {
        let request = self.client.publish_version().function_name(function_name);

        let output = block_on_with_timeout(&self.handle, PUBLISH_CALL_TIMEOUT, async move {
            request
                .send()
                .await
                .map_err(|error| classify_publish_error(&error.into_service_error()))
        })?;

        // An absent version field comes back as an empty token, which the
        // driver rejects as malformed.
        Ok(output.version().unwrap_or_default().to_string())
    }

    fn get_alias(
        &self,
        function_name: &str,
        alias_name: &str,
    ) -> Result<AliasState, PlatformError> {
        let request = self.client
            .get_alias()
            .function_name(function_name)
            .name(alias_name);

        let result = block_on_with_timeout(&self.handle, ALIAS_CALL_TIMEOUT, async move {
            request
                .send()
                .await
                .map_err(|error| classify_get_alias_error(&error.into_service_error()))
        });

        match result {
            Ok(output) => match output.function_version() {
                Some(target) => Ok(AliasState::Present(target.to_string())),
                None => Err(PlatformError::Api(
                    "alias lookup response carried no function version".to_string(),
                )),
            },
            Err(PlatformError::NotFound) => Ok(AliasState::Absent),
            Err(error) => Err(error),
        }
    }

    fn create_alias(
        &self,
        function_name: &str,
        alias_name: &str,
        version: &FunctionVersion,
        description: &str,
    ) -> Result<(), PlatformError> {
        let request = self.client
            .create_alias()
            .function_name(function_name)
            .name(alias_name)
            .function_version(version.as_str())
            .description(description);

        block_on_with_timeout(&self.handle, ALIAS_CALL_TIMEOUT, async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(|error| classify_create_alias_error(&error.into_service_error()))
        })
    }

    fn update_alias(
        &self,
        function_name: &str,
        alias_name: &str,
        version: &FunctionVersion,
        description: &str,
    ) -> Result<(), PlatformError> {
        let request = self.client
            .update_alias()
            .function_name(function_name)
            .name(alias_name)
            .function_version(version.as_str())
            .description(description);

        block_on_with_timeout(&self.handle, ALIAS_CALL_TIMEOUT, async move {
            request
                .send()
                .await
                .map(|_| ())
                .map_err(|error| classify_update_alias_error(&error.into_service_error()))
        })
    }
}

fn update_status_of(configuration: &GetFunctionConfigurationOutput) -> UpdateStatus {
    match configuration.last_update_status() {
        // A function whose code was never updated reports no status at all.
        None | Some(LastUpdateStatus::Successful) => UpdateStatus::Successful,
        Some(LastUpdateStatus::Failed) => UpdateStatus::Failed {
            reason: configuration
                .last_update_status_reason()
                .unwrap_or("no reason reported")
                .to_string(),
        },
        // InProgress and any status this SDK version does not know about
        // keep the poll loop going until its ceiling.
        Some(_) => UpdateStatus::InProgress,
    }
}

fn classify_code_update_error(error: &UpdateFunctionCodeError) -> PlatformError {
    if error.is_resource_conflict_exception() {
        PlatformError::Conflict(error_detail(error))
    } else if error.is_resource_not_found_exception() {
        PlatformError::NotFound
    } else {
        PlatformError::Api(error_detail(error))
    }
}

fn classify_status_error(error: &GetFunctionConfigurationError) -> PlatformError {
    if error.is_resource_not_found_exception() {
        PlatformError::NotFound
    } else {
        PlatformError::Api(error_detail(error))
    }
}

fn classify_publish_error(error: &PublishVersionError) -> PlatformError {
    if error.is_resource_conflict_exception() {
        PlatformError::Conflict(error_detail(error))
    } else if error.is_resource_not_found_exception() {
        PlatformError::NotFound
    } else {
        PlatformError::Api(error_detail(error))
    }
}

fn classify_get_alias_error(error: &GetAliasError) -> PlatformError {
    if error.is_resource_not_found_exception() {
        PlatformError::NotFound
    } else {
        PlatformError::Api(error_detail(error))
    }
}

fn classify_create_alias_error(error: &CreateAliasError) -> PlatformError {
    if error.is_resource_conflict_exception() {
        PlatformError::Conflict(error_detail(error))
    } else if error.is_resource_not_found_exception() {
        PlatformError::NotFound
    } else {
        PlatformError::Api(error_detail(error))
    }
}

fn classify_update_alias_error(error: &UpdateAliasError) -> PlatformError {
    if error.is_resource_conflict_exception() {
        PlatformError::Conflict(error_detail(error))
    } else if error.is_resource_not_found_exception() {
        PlatformError::NotFound
    } else {
        PlatformError::Api(error_detail(error))
    }
}
