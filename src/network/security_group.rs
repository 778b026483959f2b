//! Security group lifecycle.

use tracing::{info, warn};

use crate::control_plane::{Direction, Ec2Api};
use crate::error::{InfraError, InfraResult};
use crate::models::{AssetFilter, SecurityGroupSpec};

use super::Network;

impl<C: Ec2Api> Network<C> {
    /// Creates a security group, tags it and authorises its rules.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] for an invalid request or the
    /// mapped control-plane error of the first failing call. A group created
    /// before the failure is left in place.
    pub async fn create_security_group(&self, spec: &SecurityGroupSpec) -> InfraResult<String> {
        spec.validate()?;
        let group_id = self
            .control_plane
            .create_security_group(&spec.name, &spec.description, &spec.vpc_id)
            .await
            .map_err(|err| {
                warn!(name = %spec.name, vpc_id = %spec.vpc_id, error = %err, "security group creation failed");
                InfraError::from(err)
            })?;
        self.settle().await;
        self.tag(&group_id, &spec.tags_with_name()).await?;

        let rules = spec
            .ingress
            .iter()
            .map(|rule| (Direction::Ingress, rule))
            .chain(spec.egress.iter().map(|rule| (Direction::Egress, rule)));
        for (direction, rule) in rules {
            self.control_plane
                .authorize_security_group(&group_id, direction, &rule.to_permission())
                .await
                .map_err(|err| {
                    warn!(group_id = %group_id, ?direction, error = %err, "rule authorisation failed");
                    InfraError::from(err)
                })?;
        }

        info!(group_id = %group_id, name = %spec.name, "security group created");
        Ok(group_id)
    }

    /// Deletes a security group.
    ///
    /// # Errors
    ///
    /// Returns the mapped control-plane error.
    pub async fn destroy_security_group(&self, group_id: &str) -> InfraResult<()> {
        self.control_plane
            .delete_security_group(group_id)
            .await
            .map_err(|err| {
                warn!(group_id, error = %err, "security group deletion failed");
                InfraError::from(err)
            })?;
        info!(group_id, "security group deleted");
        Ok(())
    }

    /// Identifiers of the groups matching the filter's tags and VPC.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] when nothing matches.
    pub async fn find_security_groups(&self, filter: &AssetFilter) -> InfraResult<Vec<String>> {
        let filters = filter.to_filters("vpc-id", None);
        let groups = self
            .control_plane
            .describe_security_groups(&filters)
            .await
            .map_err(InfraError::from)?;
        if groups.is_empty() {
            return Err(InfraError::not_found("security group matching filter"));
        }
        Ok(groups.into_iter().map(|group| group.id).collect())
    }
}
