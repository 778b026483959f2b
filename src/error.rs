//! Error taxonomy shared by every resource client.

use thiserror::Error;

use crate::control_plane::ControlPlaneError;

/// Errors raised by resource clients once a request leaves the model layer.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InfraError {
    /// Raised when a lookup matched zero resources.
    #[error("{resource} not found")]
    NotFound {
        /// Description of the resource that could not be located.
        resource: String,
    },
    /// Raised when a named resource already exists and the request forbids
    /// reusing or replacing it.
    #[error("{resource} already exists")]
    AlreadyExists {
        /// Description of the colliding resource.
        resource: String,
    },
    /// Raised when a bounded poll loop gave up before the expected state
    /// appeared.
    #[error("timed out waiting for {action} on {resource_id}")]
    Timeout {
        /// Action the poll loop was waiting on.
        action: String,
        /// Identifier of the polled resource.
        resource_id: String,
    },
    /// Raised when the control plane rejected a call or could not be reached.
    #[error("control plane call {operation} failed: {message}")]
    Transport {
        /// Control-plane operation that failed.
        operation: String,
        /// Provider supplied error message.
        message: String,
    },
    /// Raised when a request model is missing a required field or holds an
    /// out-of-range value.
    #[error("missing or invalid field: {0}")]
    Validation(String),
    /// Raised when local file access fails.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path that could not be read or written.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Raised when instance password material cannot be decoded.
    #[error("failed to decrypt password data for {instance_id}: {message}")]
    Decrypt {
        /// Instance whose password data was fetched.
        instance_id: String,
        /// Underlying decode or decrypt error.
        message: String,
    },
}

impl InfraError {
    /// Returns `true` when the error reports a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub(crate) fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<ControlPlaneError> for InfraError {
    fn from(value: ControlPlaneError) -> Self {
        match value {
            ControlPlaneError::NotFound { operation, message } => Self::NotFound {
                resource: format!("{operation}: {message}"),
            },
            ControlPlaneError::Service {
                operation,
                code,
                message,
            } => Self::Transport {
                operation,
                message: format!("{code}: {message}"),
            },
            ControlPlaneError::Transport { operation, message } => {
                Self::Transport { operation, message }
            }
        }
    }
}

/// Result alias used by resource clients.
pub type InfraResult<T> = Result<T, InfraError>;
