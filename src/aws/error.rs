//! SDK error mapping.

use std::error::Error as StdError;
use std::fmt;

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use crate::control_plane::ControlPlaneError;

const NOT_FOUND_CODES: [&str; 4] = [
    "NotFound",
    "NoSuchKey",
    "ParameterNotFound",
    "NamespaceNotFound",
];

fn is_not_found_code(code: &str) -> bool {
    code.ends_with(".NotFound") || NOT_FOUND_CODES.contains(&code)
}

/// Maps an SDK failure onto the control-plane taxonomy.
///
/// Provider codes naming a missing resource become
/// [`ControlPlaneError::NotFound`]; any other service response keeps its code.
/// Failures that never produced a response are transport errors.
pub(super) fn sdk_error<E, R>(operation: &str, err: &SdkError<E, R>) -> ControlPlaneError
where
    E: ProvideErrorMetadata + StdError + 'static,
    R: fmt::Debug,
{
    let Some(service) = err.as_service_error() else {
        return ControlPlaneError::Transport {
            operation: operation.to_owned(),
            message: DisplayErrorContext(err).to_string(),
        };
    };
    let code = service.code().unwrap_or("Unknown").to_owned();
    let message = service.message().unwrap_or_default().to_owned();
    if is_not_found_code(&code) {
        return not_found(operation, if message.is_empty() { code } else { message });
    }
    ControlPlaneError::Service {
        operation: operation.to_owned(),
        code,
        message,
    }
}

pub(super) fn not_found(operation: &str, message: impl Into<String>) -> ControlPlaneError {
    ControlPlaneError::NotFound {
        operation: operation.to_owned(),
        message: message.into(),
    }
}

/// Raised when a successful response lacks a field the caller relies on.
pub(super) fn missing(operation: &str, field: &str) -> ControlPlaneError {
    ControlPlaneError::Transport {
        operation: operation.to_owned(),
        message: format!("response carried no {field}"),
    }
}

/// Raised when a request cannot be assembled from its inputs.
pub(super) fn invalid(operation: &str, err: &impl fmt::Display) -> ControlPlaneError {
    ControlPlaneError::Transport {
        operation: operation.to_owned(),
        message: format!("invalid request: {err}"),
    }
}
