//! Internet gateway lifecycle.

use tracing::{info, warn};

use crate::control_plane::Ec2Api;
use crate::error::{InfraError, InfraResult};
use crate::models::{AssetFilter, InternetGatewaySpec};

use super::Network;

impl<C: Ec2Api> Network<C> {
    /// Creates and tags an unattached internet gateway.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] for an empty name or the mapped
    /// control-plane error.
    pub async fn create_internet_gateway(&self, spec: &InternetGatewaySpec) -> InfraResult<String> {
        spec.validate()?;
        let gateway_id = self
            .control_plane
            .create_internet_gateway()
            .await
            .map_err(|err| {
                warn!(name = %spec.name, error = %err, "internet gateway creation failed");
                InfraError::from(err)
            })?;
        self.settle().await;
        self.tag(&gateway_id, &spec.tags_with_name()).await?;
        info!(gateway_id = %gateway_id, name = %spec.name, "internet gateway created");
        Ok(gateway_id)
    }

    /// Deletes a detached internet gateway.
    ///
    /// # Errors
    ///
    /// Returns the mapped control-plane error, including the dependency
    /// violation raised for a gateway that is still attached.
    pub async fn destroy_internet_gateway(&self, gateway_id: &str) -> InfraResult<()> {
        self.control_plane
            .delete_internet_gateway(gateway_id)
            .await
            .map_err(|err| {
                warn!(gateway_id, error = %err, "internet gateway deletion failed");
                InfraError::from(err)
            })?;
        info!(gateway_id, "internet gateway deleted");
        Ok(())
    }

    /// First gateway matching the filter's tags and attached VPC.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] when nothing matches.
    pub async fn find_internet_gateway(&self, filter: &AssetFilter) -> InfraResult<String> {
        let filters = filter.to_filters("attachment.vpc-id", None);
        self.control_plane
            .describe_internet_gateways(&filters)
            .await
            .map_err(InfraError::from)?
            .into_iter()
            .next()
            .ok_or_else(|| InfraError::not_found("internet gateway matching filter"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_support::{FakeControlPlane, instant_timings};

    #[tokio::test]
    async fn created_gateways_carry_the_name_tag() {
        let plane = Arc::new(FakeControlPlane::new());
        let network = Network::new(Arc::clone(&plane), instant_timings());
        let gateway_id = network
            .create_internet_gateway(&InternetGatewaySpec::new("edge"))
            .await
            .unwrap_or_else(|err| panic!("create should succeed: {err}"));
        assert_eq!(
            plane.tags_of(&gateway_id).get("Name").map(String::as_str),
            Some("edge")
        );
        assert_eq!(plane.gateway_attachment(&gateway_id), None);
    }

    #[tokio::test]
    async fn finds_gateways_by_attachment() {
        let plane = Arc::new(FakeControlPlane::new());
        plane.add_internet_gateway("igw-a", Some("vpc-a"));
        plane.add_internet_gateway("igw-b", Some("vpc-b"));
        let network = Network::new(Arc::clone(&plane), instant_timings());

        let found = network
            .find_internet_gateway(&AssetFilter::new().vpc_id("vpc-b"))
            .await;

        assert_eq!(found, Ok(String::from("igw-b")));
    }

    #[tokio::test]
    async fn attached_gateways_cannot_be_destroyed() {
        let plane = Arc::new(FakeControlPlane::new());
        plane.add_internet_gateway("igw-a", Some("vpc-a"));
        let network = Network::new(Arc::clone(&plane), instant_timings());
        let result = network.destroy_internet_gateway("igw-a").await;
        assert!(matches!(result, Err(InfraError::Transport { .. })));
    }
}
