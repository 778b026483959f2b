//! Subnet lifecycle.

use tracing::{info, warn};

use crate::control_plane::{Ec2Api, Filter};
use crate::error::{InfraError, InfraResult};
use crate::models::{AssetFilter, SubnetSpec};

use super::Network;

impl<C: Ec2Api> Network<C> {
    /// Creates a subnet, tags it and associates it with the VPC main route
    /// table.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] for an invalid request,
    /// [`InfraError::NotFound`] when the VPC has no main route table, or the
    /// mapped control-plane error.
    pub async fn create_subnet(&self, spec: &SubnetSpec) -> InfraResult<String> {
        spec.validate()?;
        let subnet_id = self
            .control_plane
            .create_subnet(
                &spec.vpc_id,
                &spec.cidr_block,
                spec.availability_zone.as_deref(),
            )
            .await
            .map_err(|err| {
                warn!(vpc_id = %spec.vpc_id, cidr = %spec.cidr_block, error = %err, "subnet creation failed");
                InfraError::from(err)
            })?;
        self.settle().await;
        self.tag(&subnet_id, &spec.tags_with_name()).await?;

        let route_table_id = self.main_route_table(&spec.vpc_id).await?;
        self.control_plane
            .associate_route_table(&route_table_id, &subnet_id)
            .await
            .map_err(|err| {
                warn!(subnet_id = %subnet_id, route_table_id = %route_table_id, error = %err, "route table association failed");
                InfraError::from(err)
            })?;

        info!(subnet_id = %subnet_id, vpc_id = %spec.vpc_id, "subnet created");
        Ok(subnet_id)
    }

    /// Deletes a subnet.
    ///
    /// # Errors
    ///
    /// Returns the mapped control-plane error.
    pub async fn destroy_subnet(&self, subnet_id: &str) -> InfraResult<()> {
        self.control_plane
            .delete_subnet(subnet_id)
            .await
            .map_err(|err| {
                warn!(subnet_id, error = %err, "subnet deletion failed");
                InfraError::from(err)
            })?;
        info!(subnet_id, "subnet deleted");
        Ok(())
    }

    /// Identifiers of the subnets matching the filter's tags and VPC.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] when nothing matches.
    pub async fn find_subnets(&self, filter: &AssetFilter) -> InfraResult<Vec<String>> {
        let filters = filter.to_filters("vpc-id", None);
        let subnets = self
            .control_plane
            .describe_subnets(&filters)
            .await
            .map_err(InfraError::from)?;
        if subnets.is_empty() {
            return Err(InfraError::not_found("subnet matching filter"));
        }
        Ok(subnets)
    }

    pub(super) async fn main_route_table(&self, vpc_id: &str) -> InfraResult<String> {
        let filters = [
            Filter::single("vpc-id", vpc_id),
            Filter::single("association.main", "true"),
        ];
        self.control_plane
            .describe_route_tables(&filters)
            .await
            .map_err(InfraError::from)?
            .into_iter()
            .next()
            .map(|table| table.id)
            .ok_or_else(|| InfraError::not_found(format!("main route table of {vpc_id}")))
    }
}
