//! Caller identity.

use std::sync::Arc;

use tracing::warn;

use crate::control_plane::{CallerIdentity, StsApi};
use crate::error::{InfraError, InfraResult};

/// Describes the principal behind the configured credentials.
#[derive(Debug)]
pub struct Identity<C> {
    control_plane: Arc<C>,
}

impl<C> Clone for Identity<C> {
    fn clone(&self) -> Self {
        Self {
            control_plane: Arc::clone(&self.control_plane),
        }
    }
}

impl<C: StsApi> Identity<C> {
    /// Creates an identity client over the shared control plane.
    #[must_use]
    pub const fn new(control_plane: Arc<C>) -> Self {
        Self { control_plane }
    }

    /// Account, ARN and user id of the caller.
    ///
    /// # Errors
    ///
    /// Returns the mapped control-plane error.
    pub async fn caller_identity(&self) -> InfraResult<CallerIdentity> {
        self.control_plane
            .get_caller_identity()
            .await
            .map_err(|err| {
                warn!(error = %err, "caller identity lookup failed");
                InfraError::from(err)
            })
    }

    /// Account number of the caller.
    ///
    /// # Errors
    ///
    /// See [`Self::caller_identity`].
    pub async fn account_id(&self) -> InfraResult<String> {
        Ok(self.caller_identity().await?.account)
    }

    /// ARN of the calling principal.
    ///
    /// # Errors
    ///
    /// See [`Self::caller_identity`].
    pub async fn account_arn(&self) -> InfraResult<String> {
        Ok(self.caller_identity().await?.arn)
    }
}
