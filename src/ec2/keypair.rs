//! Keypair create-or-reuse.

use tracing::{debug, info, warn};

use crate::control_plane::Ec2Api;
use crate::error::{InfraError, InfraResult};
use crate::fs;
use crate::models::{ExistsPolicy, KeypairHandle, KeypairSpec};

use super::Ec2;

impl<C: Ec2Api> Ec2<C> {
    /// Creates a keypair, applying the collision policy when the name is
    /// taken.
    ///
    /// New key material is written to the configured path with owner-only
    /// read permissions, replacing any existing file. Reused keypairs write
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::AlreadyExists`] under [`ExistsPolicy::Fail`],
    /// [`InfraError::Io`] when the key file cannot be written, or the mapped
    /// control-plane error.
    pub async fn create_keypair(&self, spec: &KeypairSpec) -> InfraResult<KeypairHandle> {
        spec.validate()?;
        match self.control_plane.describe_key_pair(&spec.name).await {
            Ok(existing) => match spec.exists_policy {
                ExistsPolicy::Reuse => {
                    info!(name = %existing.name, key_id = %existing.id, "reusing keypair");
                    return Ok(KeypairHandle {
                        id: existing.id,
                        name: existing.name,
                    });
                }
                ExistsPolicy::Fail => {
                    warn!(name = %spec.name, "keypair already exists");
                    return Err(InfraError::AlreadyExists {
                        resource: format!("keypair {}", spec.name),
                    });
                }
                ExistsPolicy::Replace => {
                    debug!(name = %spec.name, "replacing keypair");
                    self.control_plane
                        .delete_key_pair(&spec.name)
                        .await
                        .map_err(InfraError::from)?;
                }
            },
            Err(err) if err.is_not_found() => {}
            Err(err) => {
                warn!(name = %spec.name, error = %err, "keypair lookup failed");
                return Err(err.into());
            }
        }

        let mut tags = spec.tags.clone();
        tags.insert(String::from("Name"), spec.name.clone());
        let created = self
            .control_plane
            .create_key_pair(&spec.name, &tags)
            .await
            .map_err(|err| {
                warn!(name = %spec.name, error = %err, "keypair creation failed");
                InfraError::from(err)
            })?;

        if let Some(path) = &spec.private_key_path {
            fs::write_private(path, created.material.as_bytes())?;
            debug!(path = %path, "wrote private key");
        }

        info!(name = %created.name, key_id = %created.id, "keypair created");
        Ok(KeypairHandle {
            id: created.id,
            name: created.name,
        })
    }

    /// Deletes a keypair by name.
    ///
    /// # Errors
    ///
    /// Returns the mapped control-plane error after logging it.
    pub async fn destroy_keypair(&self, name: &str) -> InfraResult<()> {
        self.control_plane
            .delete_key_pair(name)
            .await
            .map_err(|err| {
                warn!(name, error = %err, "keypair deletion failed");
                InfraError::from(err)
            })?;
        info!(name, "keypair deleted");
        Ok(())
    }
}
