//! Compute client: keypairs, instances and Windows credentials.

use std::sync::Arc;

use tracing::warn;

use crate::ami::ImageResolver;
use crate::config::Timings;
use crate::control_plane::Ec2Api;
use crate::error::{InfraError, InfraResult};
use crate::models::{AssetFilter, InstanceProperty};
use crate::network::Network;
use crate::wait::pause;

mod credentials;
mod instance;
mod keypair;

pub use credentials::{Credentials, DEFAULT_USERNAME};
pub use instance::root_volume_for;

/// Compute operations over an EC2 control plane.
#[derive(Debug)]
pub struct Ec2<C> {
    control_plane: Arc<C>,
    timings: Timings,
}

impl<C> Clone for Ec2<C> {
    fn clone(&self) -> Self {
        Self {
            control_plane: Arc::clone(&self.control_plane),
            timings: self.timings,
        }
    }
}

impl<C: Ec2Api> Ec2<C> {
    /// Creates a client over the shared control plane.
    #[must_use]
    pub const fn new(control_plane: Arc<C>, timings: Timings) -> Self {
        Self {
            control_plane,
            timings,
        }
    }

    fn network(&self) -> Network<C> {
        Network::new(Arc::clone(&self.control_plane), self.timings)
    }

    fn images(&self) -> ImageResolver<C> {
        ImageResolver::new(Arc::clone(&self.control_plane))
    }

    async fn settle(&self) {
        pause(self.timings.settle_delay).await;
    }

    /// Projects `property` from every instance matching the filter.
    ///
    /// Tag predicates are ANDed with the optional state and VPC predicates.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] when nothing matches, or the mapped
    /// control-plane error.
    pub async fn find_instance_properties(
        &self,
        filter: &AssetFilter,
        property: InstanceProperty,
    ) -> InfraResult<Vec<String>> {
        let filters = filter.to_filters("vpc-id", Some("instance-state-name"));
        let instances = self
            .control_plane
            .describe_instances(&filters, &[])
            .await
            .map_err(|err| {
                warn!(error = %err, "instance lookup failed");
                InfraError::from(err)
            })?;
        if instances.is_empty() {
            return Err(InfraError::not_found("instance matching filter"));
        }
        Ok(instances
            .into_iter()
            .map(|instance| match property {
                InstanceProperty::Id => instance.id,
                InstanceProperty::InstanceType => instance.instance_type,
            })
            .collect())
    }

    /// Identifiers of the instances matching the filter.
    ///
    /// # Errors
    ///
    /// See [`Self::find_instance_properties`].
    pub async fn find_instances(&self, filter: &AssetFilter) -> InfraResult<Vec<String>> {
        self.find_instance_properties(filter, InstanceProperty::Id)
            .await
    }

    /// Instance types of the instances matching the filter.
    ///
    /// # Errors
    ///
    /// See [`Self::find_instance_properties`].
    pub async fn find_instance_types(&self, filter: &AssetFilter) -> InfraResult<Vec<String>> {
        self.find_instance_properties(filter, InstanceProperty::InstanceType)
            .await
    }
}
