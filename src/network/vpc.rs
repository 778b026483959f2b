//! VPC creation and lookup.

use tracing::{debug, info, warn};

use crate::control_plane::{Ec2Api, VpcAttribute};
use crate::error::{InfraError, InfraResult};
use crate::models::{AssetFilter, ResourceRef, VpcSpec};
use crate::wait::poll_until;

use super::{ANY_IPV4, Network};

const AVAILABLE: &str = "available";

impl<C: Ec2Api> Network<C> {
    /// Creates a VPC with an attached internet gateway and DNS enabled.
    ///
    /// Public VPCs also receive a `0.0.0.0/0` route through the gateway in
    /// their main route table.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] for an invalid request,
    /// [`InfraError::Timeout`] when the VPC never becomes available, or the
    /// mapped control-plane error of the first failing step. Resources
    /// created before a failure are left in place.
    pub async fn create_vpc(&self, spec: &VpcSpec) -> InfraResult<String> {
        spec.validate()?;
        let gateway_id = match &spec.internet_gateway {
            ResourceRef::ById(id) => id.clone(),
            ResourceRef::BySpec(gateway) => self.create_internet_gateway(gateway).await?,
        };

        let vpc_id = self
            .control_plane
            .create_vpc(&spec.cidr_block)
            .await
            .map_err(|err| {
                warn!(cidr = %spec.cidr_block, error = %err, "vpc creation failed");
                InfraError::from(err)
            })?;
        self.wait_for_vpc_available(&vpc_id).await?;
        self.settle().await;
        self.tag(&vpc_id, &spec.tags_with_name()).await?;

        self.control_plane
            .attach_internet_gateway(&gateway_id, &vpc_id)
            .await
            .map_err(|err| {
                warn!(vpc_id = %vpc_id, gateway_id = %gateway_id, error = %err, "gateway attachment failed");
                InfraError::from(err)
            })?;
        for attribute in [VpcAttribute::DnsHostnames, VpcAttribute::DnsSupport] {
            self.control_plane
                .enable_vpc_attribute(&vpc_id, attribute)
                .await
                .map_err(InfraError::from)?;
        }

        if spec.is_public {
            let route_table_id = self.main_route_table(&vpc_id).await?;
            self.control_plane
                .create_route(&route_table_id, ANY_IPV4, &gateway_id)
                .await
                .map_err(|err| {
                    warn!(route_table_id = %route_table_id, error = %err, "default route creation failed");
                    InfraError::from(err)
                })?;
        }

        info!(vpc_id = %vpc_id, gateway_id = %gateway_id, public = spec.is_public, "vpc created");
        Ok(vpc_id)
    }

    /// Resolves a VPC identifier.
    ///
    /// When the filter names a VPC its existence is verified; otherwise the
    /// first VPC matching the tag predicates is returned.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] when nothing matches and
    /// [`InfraError::Validation`] when the filter carries neither an id nor
    /// tags.
    pub async fn find_vpc(&self, filter: &AssetFilter) -> InfraResult<String> {
        if let Some(vpc_id) = &filter.vpc_id {
            let found = self
                .control_plane
                .describe_vpcs(&[], std::slice::from_ref(vpc_id))
                .await
                .map_err(InfraError::from)?;
            return found
                .into_iter()
                .next()
                .map(|vpc| vpc.id)
                .ok_or_else(|| InfraError::not_found(format!("vpc {vpc_id}")));
        }
        if filter.tags.is_empty() {
            return Err(InfraError::Validation(String::from("vpc_id or tags")));
        }
        let found = self
            .control_plane
            .describe_vpcs(&filter.tag_filters(), &[])
            .await
            .map_err(InfraError::from)?;
        found
            .into_iter()
            .next()
            .map(|vpc| vpc.id)
            .ok_or_else(|| InfraError::not_found("vpc matching tags"))
    }

    async fn wait_for_vpc_available(&self, vpc_id: &str) -> InfraResult<()> {
        let ids = [vpc_id.to_owned()];
        poll_until(
            self.timings.poll_interval,
            self.timings.wait_timeout,
            AVAILABLE,
            vpc_id,
            || async {
                let vpcs = self
                    .control_plane
                    .describe_vpcs(&[], &ids)
                    .await
                    .map_err(InfraError::from)?;
                let ready = vpcs.iter().any(|vpc| vpc.state == AVAILABLE);
                debug!(vpc_id, ready, "polled vpc state");
                Ok(ready)
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::InternetGatewaySpec;
    use crate::test_support::{FakeControlPlane, instant_timings};
    use rstest::rstest;

    fn spec(is_public: bool) -> VpcSpec {
        VpcSpec::new(
            "10.0.0.0/16",
            "core",
            ResourceRef::spec(InternetGatewaySpec::new("core-igw")),
        )
        .is_public(is_public)
    }

    #[rstest]
    #[case(true, 1)]
    #[case(false, 0)]
    #[tokio::test]
    async fn default_route_follows_the_public_flag(#[case] is_public: bool, #[case] routes: usize) {
        let plane = Arc::new(FakeControlPlane::new());
        let network = Network::new(Arc::clone(&plane), instant_timings());

        let vpc_id = network
            .create_vpc(&spec(is_public))
            .await
            .unwrap_or_else(|err| panic!("create should succeed: {err}"));

        assert_eq!(plane.routes().len(), routes);
        assert!(plane.routes().iter().all(|(_, cidr, _)| cidr == ANY_IPV4));
        assert_eq!(
            plane.vpc_attributes(),
            vec![
                (vpc_id.clone(), VpcAttribute::DnsHostnames),
                (vpc_id, VpcAttribute::DnsSupport),
            ]
        );
    }

    #[tokio::test]
    async fn waits_for_availability_before_tagging() {
        let plane = Arc::new(FakeControlPlane::new());
        let network = Network::new(Arc::clone(&plane), instant_timings());
        let vpc_id = network
            .create_vpc(&spec(true))
            .await
            .unwrap_or_else(|err| panic!("create should succeed: {err}"));

        let calls = plane.calls();
        let polled = calls
            .iter()
            .position(|call| call == &format!("DescribeVpcs {vpc_id}"));
        let tagged = calls
            .iter()
            .position(|call| call == &format!("CreateTags {vpc_id}"));
        assert!(polled.is_some());
        assert!(polled < tagged);
        assert_eq!(plane.tags_of(&vpc_id).get("Name").map(String::as_str), Some("core"));
    }

    #[tokio::test]
    async fn existing_gateways_are_attached_as_is() {
        let plane = Arc::new(FakeControlPlane::new());
        plane.add_internet_gateway("igw-existing", None);
        let network = Network::new(Arc::clone(&plane), instant_timings());
        let spec = VpcSpec::new("10.1.0.0/16", "edge", ResourceRef::id("igw-existing"));

        let vpc_id = network
            .create_vpc(&spec)
            .await
            .unwrap_or_else(|err| panic!("create should succeed: {err}"));

        assert_eq!(plane.gateway_attachment("igw-existing"), Some(vpc_id));
        assert!(plane.calls_to("CreateInternetGateway").is_empty());
    }

    #[tokio::test]
    async fn find_vpc_verifies_explicit_ids() {
        let plane = Arc::new(FakeControlPlane::new());
        plane.add_vpc("vpc-1");
        let network = Network::new(Arc::clone(&plane), instant_timings());

        assert_eq!(
            network.find_vpc(&AssetFilter::new().vpc_id("vpc-1")).await,
            Ok(String::from("vpc-1"))
        );
        assert!(matches!(
            network.find_vpc(&AssetFilter::new().vpc_id("vpc-404")).await,
            Err(InfraError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn find_vpc_matches_tags() {
        let plane = Arc::new(FakeControlPlane::new());
        plane.add_vpc("vpc-1");
        plane.add_vpc("vpc-2");
        plane.tag_resource("vpc-2", "env", "prod");
        let network = Network::new(Arc::clone(&plane), instant_timings());

        assert_eq!(
            network.find_vpc(&AssetFilter::new().tag("env", "prod")).await,
            Ok(String::from("vpc-2"))
        );
    }

    #[tokio::test]
    async fn find_vpc_needs_an_id_or_tags() {
        let plane = Arc::new(FakeControlPlane::new());
        let network = Network::new(Arc::clone(&plane), instant_timings());
        assert!(matches!(
            network.find_vpc(&AssetFilter::new()).await,
            Err(InfraError::Validation(_))
        ));
    }
}
