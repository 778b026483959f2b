//! Instance launch and teardown.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::control_plane::{Ec2Api, ImageRecord, LaunchRequest, MetadataOptions, RootVolume};
use crate::error::{InfraError, InfraResult};
use crate::models::{ImageQuery, InstanceSpec, InstanceTeardown, ResourceRef, require};
use crate::wait::{pause, poll_until};

use super::Ec2;

const LINUX_DEVICE: &str = "/dev/xvda";
const LINUX_SIZE_GIB: i32 = 8;
const OTHER_DEVICE: &str = "/dev/sda1";
const OTHER_SIZE_GIB: i32 = 30;
const VOLUME_TYPE: &str = "gp2";

const RUNNING: &str = "running";
const STOPPED: &str = "stopped";
const TERMINATED: &str = "terminated";

/// Root volume for an image: Linux images boot from an 8 GiB `/dev/xvda`,
/// everything else from a 30 GiB `/dev/sda1`. Both are encrypted `gp2`
/// volumes deleted with the instance.
#[must_use]
pub fn root_volume_for(image: &ImageRecord) -> RootVolume {
    let is_linux = [image.platform.as_deref(), image.platform_details.as_deref()]
        .into_iter()
        .flatten()
        .any(|value| value.to_lowercase().contains("linux"));
    let (device, size) = if is_linux {
        (LINUX_DEVICE, LINUX_SIZE_GIB)
    } else {
        (OTHER_DEVICE, OTHER_SIZE_GIB)
    };
    RootVolume {
        device_name: device.to_owned(),
        size_gib: size,
        volume_type: VOLUME_TYPE.to_owned(),
        encrypted: true,
        delete_on_termination: true,
    }
}

impl<C: Ec2Api> Ec2<C> {
    /// Launches up to `count` instances described by `spec`.
    ///
    /// Inline security groups, keypairs and image queries are resolved first.
    /// The `Name` tag is always injected. With `wait_until_running` each
    /// instance is started and awaited; metadata hardening runs last.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] for an invalid request or a
    /// zero count, [`InfraError::NotFound`] when the image cannot be resolved,
    /// [`InfraError::Timeout`] when an instance never reaches `running`, or
    /// the mapped control-plane error. Nothing is rolled back.
    pub async fn create_instances(
        &self,
        spec: &InstanceSpec,
        count: u32,
    ) -> InfraResult<Vec<String>> {
        spec.validate()?;
        let max_count = i32::try_from(count)
            .ok()
            .filter(|value| *value >= 1)
            .ok_or_else(|| InfraError::Validation(String::from("count")))?;

        let security_group_id = match &spec.security_group {
            ResourceRef::ById(id) => id.clone(),
            ResourceRef::BySpec(group) => self.network().create_security_group(group).await?,
        };
        let key_name = match &spec.keypair {
            ResourceRef::ById(name) => name.clone(),
            ResourceRef::BySpec(keypair) => self.create_keypair(keypair).await?.name,
        };
        let image_id = match &spec.image {
            Some(ResourceRef::ById(id)) => id.clone(),
            Some(ResourceRef::BySpec(query)) => self.images().find(query).await?,
            None => self.images().find(&ImageQuery::default_windows()).await?,
        };
        let image = self.images().describe(&image_id).await?;

        let request = LaunchRequest {
            image_id,
            instance_type: spec.instance_type.clone(),
            key_name,
            subnet_id: spec.subnet_id.clone(),
            security_group_id,
            associate_public_ip: spec.associate_public_ip,
            count: max_count,
            root_volume: root_volume_for(&image),
            user_data: spec.user_data.clone().unwrap_or_default(),
            tags: spec.tags_with_name(),
            client_token: Uuid::new_v4().to_string(),
        };
        let instance_ids = self
            .control_plane
            .run_instances(&request)
            .await
            .map_err(|err| {
                warn!(name = %spec.instance_name, error = %err, "instance launch failed");
                InfraError::from(err)
            })?;
        debug!(count = instance_ids.len(), image_id = %request.image_id, "instances launched");
        self.settle().await;

        if spec.wait_until_running {
            for instance_id in &instance_ids {
                self.control_plane
                    .start_instances(std::slice::from_ref(instance_id))
                    .await
                    .map_err(InfraError::from)?;
                self.wait_for_state(instance_id, RUNNING).await?;
            }
        }
        if let Some(extra) = spec.extra_startup_wait() {
            debug!(seconds = extra.as_secs(), "extra startup wait");
            pause(extra).await;
        }
        if spec.disable_metadata_access {
            let hardened = MetadataOptions {
                tokens_required: true,
                endpoint_enabled: false,
            };
            for instance_id in &instance_ids {
                self.control_plane
                    .modify_instance_metadata_options(instance_id, hardened)
                    .await
                    .map_err(|err| {
                        warn!(instance_id = %instance_id, error = %err, "metadata hardening failed");
                        InfraError::from(err)
                    })?;
            }
        }

        info!(name = %spec.instance_name, ids = ?instance_ids, "instances created");
        Ok(instance_ids)
    }

    /// Stops and terminates an instance, optionally deleting its keypair
    /// first.
    ///
    /// A failed keypair deletion is logged and does not stop the teardown.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] for an empty id,
    /// [`InfraError::Timeout`] when a requested wait expires, or the mapped
    /// control-plane error.
    pub async fn destroy_instance(&self, teardown: &InstanceTeardown) -> InfraResult<()> {
        require(&teardown.instance_id, "instance_id")?;
        let instance_id = teardown.instance_id.as_str();
        let ids = [instance_id.to_owned()];

        if teardown.destroy_keypair {
            let instances = self
                .control_plane
                .describe_instances(&[], &ids)
                .await
                .map_err(InfraError::from)?;
            let key_name = instances
                .into_iter()
                .find_map(|instance| instance.key_name);
            if let Some(name) = key_name {
                if let Err(err) = self.destroy_keypair(&name).await {
                    warn!(instance_id, key_name = %name, error = %err, "continuing without keypair deletion");
                }
            }
        }

        self.control_plane
            .stop_instances(&ids)
            .await
            .map_err(|err| {
                warn!(instance_id, error = %err, "instance stop failed");
                InfraError::from(err)
            })?;
        if teardown.wait_for_stopped {
            self.wait_for_state(instance_id, STOPPED).await?;
        }

        self.control_plane
            .terminate_instances(&ids)
            .await
            .map_err(|err| {
                warn!(instance_id, error = %err, "instance termination failed");
                InfraError::from(err)
            })?;
        if teardown.wait_for_termination {
            self.wait_for_state(instance_id, TERMINATED).await?;
        }

        info!(instance_id, "instance destroyed");
        Ok(())
    }

    async fn wait_for_state(&self, instance_id: &str, target: &str) -> InfraResult<()> {
        let ids = [instance_id.to_owned()];
        poll_until(
            self.timings.poll_interval,
            self.timings.wait_timeout,
            target,
            instance_id,
            || async {
                let instances = self
                    .control_plane
                    .describe_instances(&[], &ids)
                    .await
                    .map_err(InfraError::from)?;
                Ok(instances.iter().any(|instance| instance.state == target))
            },
        )
        .await
    }
}
