//! Service registry lookups.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::control_plane::{DiscoverRequest, ServiceDiscoveryApi};
use crate::error::{InfraError, InfraResult};
use crate::models::{ServiceInstance, ServiceQuery};

/// Finds registered service instances.
#[derive(Debug)]
pub struct ServiceDiscovery<C> {
    control_plane: Arc<C>,
}

impl<C> Clone for ServiceDiscovery<C> {
    fn clone(&self) -> Self {
        Self {
            control_plane: Arc::clone(&self.control_plane),
        }
    }
}

impl<C: ServiceDiscoveryApi> ServiceDiscovery<C> {
    /// Creates a lookup client over the shared control plane.
    #[must_use]
    pub const fn new(control_plane: Arc<C>) -> Self {
        Self { control_plane }
    }

    /// Returns the first registered instance matching the query.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] when nothing is registered, or the
    /// mapped control-plane error.
    pub async fn find_service_instance(&self, query: &ServiceQuery) -> InfraResult<ServiceInstance> {
        query.validate()?;
        let request = DiscoverRequest {
            namespace: query.namespace.clone(),
            service: query.service.clone(),
            query_parameters: query.attributes.clone(),
            region: query.region.clone(),
        };
        let records = self
            .control_plane
            .discover_instances(&request)
            .await
            .map_err(|err| {
                warn!(namespace = %query.namespace, service = %query.service, error = %err, "service discovery failed");
                InfraError::from(err)
            })?;
        let Some(record) = records.into_iter().next() else {
            warn!(namespace = %query.namespace, service = %query.service, "no service instance registered");
            return Err(InfraError::not_found(format!(
                "instance of service {} in namespace {}",
                query.service, query.namespace
            )));
        };
        debug!(instance = %record.instance_id, "service instance found");
        Ok(ServiceInstance {
            namespace: record.namespace,
            service: record.service,
            instance: record.instance_id,
            attributes: record.attributes,
        })
    }
}
