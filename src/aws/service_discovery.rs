//! Cloud Map adapter.

use std::collections::HashMap;

use aws_config::Region;

use super::AwsControlPlane;
use super::error::sdk_error;
use crate::control_plane::{
    ControlPlaneFuture, DiscoverRequest, ServiceDiscoveryApi, ServiceInstanceRecord,
};

impl AwsControlPlane {
    fn service_discovery_for(&self, region: Option<&str>) -> aws_sdk_servicediscovery::Client {
        match region {
            Some(code) if Some(code) != self.region() => {
                let config = aws_sdk_servicediscovery::config::Builder::from(&self.config)
                    .region(Region::new(code.to_owned()))
                    .build();
                aws_sdk_servicediscovery::Client::from_conf(config)
            }
            _ => self.service_discovery.clone(),
        }
    }
}

impl ServiceDiscoveryApi for AwsControlPlane {
    fn discover_instances<'a>(
        &'a self,
        request: &'a DiscoverRequest,
    ) -> ControlPlaneFuture<'a, Vec<ServiceInstanceRecord>> {
        Box::pin(async move {
            let parameters: HashMap<String, String> = request
                .query_parameters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            let output = self
                .service_discovery_for(request.region.as_deref())
                .discover_instances()
                .namespace_name(&request.namespace)
                .service_name(&request.service)
                .set_query_parameters((!parameters.is_empty()).then_some(parameters))
                .send()
                .await
                .map_err(|err| sdk_error("DiscoverInstances", &err))?;
            Ok(output
                .instances()
                .iter()
                .map(|summary| ServiceInstanceRecord {
                    namespace: summary
                        .namespace_name()
                        .unwrap_or(&request.namespace)
                        .to_owned(),
                    service: summary
                        .service_name()
                        .unwrap_or(&request.service)
                        .to_owned(),
                    instance_id: summary.instance_id().unwrap_or_default().to_owned(),
                    attributes: summary
                        .attributes()
                        .map(|attributes| {
                            attributes
                                .iter()
                                .map(|(key, value)| (key.clone(), value.clone()))
                                .collect()
                        })
                        .unwrap_or_default(),
                })
                .collect())
        })
    }
}
