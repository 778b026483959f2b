//! Networking client: security groups, internet gateways, VPCs, subnets and
//! VPC teardown.

use std::sync::Arc;

use crate::config::Timings;
use crate::control_plane::{Ec2Api, Tags};
use crate::error::{InfraError, InfraResult};
use crate::wait::pause;

mod gateway;
mod security_group;
mod subnet;
pub mod teardown;
mod vpc;

pub use teardown::{StageReport, TeardownFailure, TeardownReport, TeardownStage};

/// Filter value matching the default DHCP option set.
pub const DEFAULT_DHCP_OPTIONS: &str = "default";
/// Destination of the route added to public VPCs.
pub const ANY_IPV4: &str = "0.0.0.0/0";

/// Networking operations over an EC2 control plane.
#[derive(Debug)]
pub struct Network<C> {
    control_plane: Arc<C>,
    timings: Timings,
}

impl<C> Clone for Network<C> {
    fn clone(&self) -> Self {
        Self {
            control_plane: Arc::clone(&self.control_plane),
            timings: self.timings,
        }
    }
}

impl<C: Ec2Api> Network<C> {
    /// Creates a client over the shared control plane.
    #[must_use]
    pub const fn new(control_plane: Arc<C>, timings: Timings) -> Self {
        Self {
            control_plane,
            timings,
        }
    }

    async fn settle(&self) {
        pause(self.timings.settle_delay).await;
    }

    async fn tag(&self, resource_id: &str, tags: &Tags) -> InfraResult<()> {
        self.control_plane
            .create_tags(resource_id, tags)
            .await
            .map_err(InfraError::from)
    }
}
