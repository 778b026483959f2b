//! Keypair creation request.

use camino::Utf8PathBuf;
use serde::Deserialize;

use crate::control_plane::Tags;
use crate::error::InfraError;

use super::{require, trimmed};

/// Behaviour when a keypair with the requested name already exists.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExistsPolicy {
    /// Return the existing keypair without generating new material.
    Reuse,
    /// Delete the existing keypair and create a fresh one.
    #[default]
    Replace,
    /// Refuse with [`InfraError::AlreadyExists`].
    Fail,
}

/// Describes a keypair to create or reuse.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct KeypairSpec {
    /// Keypair name.
    pub name: String,
    /// Where to write the private key; nothing is written when absent.
    #[serde(default)]
    pub private_key_path: Option<Utf8PathBuf>,
    /// Collision policy.
    #[serde(default)]
    pub exists_policy: ExistsPolicy,
    /// Caller tags; `Name` is added on creation.
    #[serde(default)]
    pub tags: Tags,
}

impl KeypairSpec {
    /// Starts a builder for a [`KeypairSpec`].
    #[must_use]
    pub fn builder(name: impl Into<String>) -> KeypairSpecBuilder {
        KeypairSpecBuilder {
            name: name.into(),
            private_key_path: None,
            exists_policy: ExistsPolicy::default(),
            tags: Tags::new(),
        }
    }

    /// Validates the specification.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when the name or key path is empty.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.name, "keypair name")?;
        if let Some(path) = &self.private_key_path {
            require(path.as_str(), "private_key_path")?;
        }
        Ok(())
    }
}

/// Builder for [`KeypairSpec`].
#[derive(Clone, Debug)]
pub struct KeypairSpecBuilder {
    name: String,
    private_key_path: Option<Utf8PathBuf>,
    exists_policy: ExistsPolicy,
    tags: Tags,
}

impl KeypairSpecBuilder {
    /// Writes the private key to `path` on creation.
    #[must_use]
    pub fn private_key_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.private_key_path = Some(path.into());
        self
    }

    /// Sets the collision policy.
    #[must_use]
    pub const fn exists_policy(mut self, policy: ExistsPolicy) -> Self {
        self.exists_policy = policy;
        self
    }

    /// Adds a caller tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Builds and validates the specification.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when the name is empty.
    pub fn build(self) -> Result<KeypairSpec, InfraError> {
        let spec = KeypairSpec {
            name: trimmed(&self.name),
            private_key_path: self.private_key_path,
            exists_policy: self.exists_policy,
            tags: self.tags,
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// Keypair identifier and name returned by create-or-reuse.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeypairHandle {
    /// Provider keypair identifier.
    pub id: String,
    /// Keypair name.
    pub name: String,
}
