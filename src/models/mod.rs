//! Request and response models for every resource client.
//!
//! Models are plain values built for a single call. Builders trim string
//! inputs and validate on `build()`; clients validate again on entry so
//! values deserialised from JSON go through the same checks.

use serde::Deserialize;

use crate::error::InfraError;

mod filter;
mod image;
mod instance;
mod keypair;
mod network;
mod object;
mod parameter;
mod region;
mod service;

pub use filter::AssetFilter;
pub use image::{DEFAULT_IMAGE_DESCRIPTION, DEFAULT_IMAGE_OWNER, ImageQuery};
pub use instance::{
    CredentialsQuery, DEFAULT_INSTANCE_TYPE, DEFAULT_PASSWORD_TIMEOUT, InstanceProperty,
    InstanceSpec, InstanceSpecBuilder, InstanceTeardown,
};
pub use keypair::{ExistsPolicy, KeypairHandle, KeypairSpec, KeypairSpecBuilder};
pub use network::{
    InternetGatewaySpec, NetworkRule, RULE_DESCRIPTION, SecurityGroupSpec, SubnetSpec, VpcSpec,
    VpcTeardown,
};
pub use object::{ObjectInfo, ObjectQuery, ObjectRef};
pub use parameter::{ParameterQuery, ParameterSpec};
pub use region::Region;
pub use service::{ServiceInstance, ServiceQuery};

/// Either the identifier of an existing resource or a specification used to
/// create or locate one.
///
/// Deserialises from a bare string (`ById`) or an object (`BySpec`).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum ResourceRef<S> {
    /// Identifier (or name) of an existing resource.
    ById(String),
    /// Specification resolved by the owning client.
    BySpec(S),
}

impl<S> ResourceRef<S> {
    /// Wraps an identifier.
    #[must_use]
    pub fn id(value: impl Into<String>) -> Self {
        Self::ById(value.into().trim().to_owned())
    }

    /// Wraps a specification.
    #[must_use]
    pub const fn spec(value: S) -> Self {
        Self::BySpec(value)
    }
}

pub(crate) fn require(value: &str, field: &str) -> Result<(), InfraError> {
    if value.trim().is_empty() {
        return Err(InfraError::Validation(field.to_owned()));
    }
    Ok(())
}

pub(crate) fn trimmed(value: &str) -> String {
    value.trim().to_owned()
}
