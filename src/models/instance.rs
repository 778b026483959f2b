//! Compute instance requests.

use std::time::Duration;

use camino::Utf8PathBuf;
use serde::Deserialize;

use crate::control_plane::Tags;
use crate::error::InfraError;

use super::{ImageQuery, KeypairSpec, ResourceRef, SecurityGroupSpec, require, trimmed};

/// Instance type used when a specification does not name one.
pub const DEFAULT_INSTANCE_TYPE: &str = "t2.micro";
/// Upper bound on how long password generation may take after boot.
pub const DEFAULT_PASSWORD_TIMEOUT: Duration = Duration::from_secs(240);

fn default_instance_type() -> String {
    DEFAULT_INSTANCE_TYPE.to_owned()
}

const fn enabled() -> bool {
    true
}

const fn default_password_timeout_secs() -> u64 {
    DEFAULT_PASSWORD_TIMEOUT.as_secs()
}

/// Describes one or more instances to launch.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct InstanceSpec {
    /// VPC the instances live in.
    pub vpc_id: String,
    /// Subnet of the primary network interface.
    pub subnet_id: String,
    /// Value of the injected `Name` tag.
    pub instance_name: String,
    /// Instance type.
    #[serde(default = "default_instance_type")]
    pub instance_type: String,
    /// Start each instance and wait for `running` before returning.
    #[serde(default = "enabled", alias = "wait_until_finished")]
    pub wait_until_running: bool,
    /// Additional sleep after the instances are running.
    #[serde(default, alias = "extra_startup_wait_time_seconds")]
    pub extra_startup_wait_secs: Option<u64>,
    /// Security group to attach, existing or created inline.
    pub security_group: ResourceRef<SecurityGroupSpec>,
    /// Keypair to install, existing name or created inline.
    pub keypair: ResourceRef<KeypairSpec>,
    /// Image to boot; the default Windows image is used when absent.
    #[serde(default, alias = "ami")]
    pub image: Option<ResourceRef<ImageQuery>>,
    /// Caller tags; `Name` is always injected.
    #[serde(default)]
    pub tags: Tags,
    /// Raw user data.
    #[serde(default)]
    pub user_data: Option<String>,
    /// Require metadata tokens and disable the metadata endpoint once running.
    #[serde(default)]
    pub disable_metadata_access: bool,
    /// Associate a public address with the primary interface.
    #[serde(default = "enabled")]
    pub associate_public_ip: bool,
}

impl InstanceSpec {
    /// Starts a builder for an [`InstanceSpec`].
    #[must_use]
    pub fn builder() -> InstanceSpecBuilder {
        InstanceSpecBuilder::new()
    }

    /// Validates the specification and any inline sub-specifications.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.vpc_id, "vpc_id")?;
        require(&self.subnet_id, "subnet_id")?;
        require(&self.instance_name, "instance_name")?;
        require(&self.instance_type, "instance_type")?;
        match &self.security_group {
            ResourceRef::ById(id) => require(id, "security_group")?,
            ResourceRef::BySpec(spec) => spec.validate()?,
        }
        match &self.keypair {
            ResourceRef::ById(name) => require(name, "keypair")?,
            ResourceRef::BySpec(spec) => spec.validate()?,
        }
        match &self.image {
            Some(ResourceRef::ById(id)) => require(id, "image")?,
            Some(ResourceRef::BySpec(query)) => query.validate()?,
            None => {}
        }
        Ok(())
    }

    /// Caller tags plus the injected `Name` tag.
    #[must_use]
    pub fn tags_with_name(&self) -> Tags {
        let mut tags = self.tags.clone();
        tags.insert(String::from("Name"), self.instance_name.clone());
        tags
    }

    /// Extra startup wait as a [`Duration`].
    #[must_use]
    pub fn extra_startup_wait(&self) -> Option<Duration> {
        self.extra_startup_wait_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Builder for [`InstanceSpec`].
#[derive(Clone, Debug)]
pub struct InstanceSpecBuilder {
    vpc_id: String,
    subnet_id: String,
    instance_name: String,
    instance_type: String,
    wait_until_running: bool,
    extra_startup_wait_secs: Option<u64>,
    security_group: Option<ResourceRef<SecurityGroupSpec>>,
    keypair: Option<ResourceRef<KeypairSpec>>,
    image: Option<ResourceRef<ImageQuery>>,
    tags: Tags,
    user_data: Option<String>,
    disable_metadata_access: bool,
    associate_public_ip: bool,
}

impl Default for InstanceSpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceSpecBuilder {
    /// Creates a builder with the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vpc_id: String::new(),
            subnet_id: String::new(),
            instance_name: String::new(),
            instance_type: default_instance_type(),
            wait_until_running: true,
            extra_startup_wait_secs: None,
            security_group: None,
            keypair: None,
            image: None,
            tags: Tags::new(),
            user_data: None,
            disable_metadata_access: false,
            associate_public_ip: true,
        }
    }

    /// Sets the VPC.
    #[must_use]
    pub fn vpc_id(mut self, value: impl Into<String>) -> Self {
        self.vpc_id = value.into();
        self
    }

    /// Sets the subnet.
    #[must_use]
    pub fn subnet_id(mut self, value: impl Into<String>) -> Self {
        self.subnet_id = value.into();
        self
    }

    /// Sets the instance name.
    #[must_use]
    pub fn instance_name(mut self, value: impl Into<String>) -> Self {
        self.instance_name = value.into();
        self
    }

    /// Sets the instance type.
    #[must_use]
    pub fn instance_type(mut self, value: impl Into<String>) -> Self {
        self.instance_type = value.into();
        self
    }

    /// Controls whether creation waits for `running`.
    #[must_use]
    pub const fn wait_until_running(mut self, value: bool) -> Self {
        self.wait_until_running = value;
        self
    }

    /// Sets the extra startup wait in seconds.
    #[must_use]
    pub const fn extra_startup_wait_secs(mut self, value: u64) -> Self {
        self.extra_startup_wait_secs = Some(value);
        self
    }

    /// Sets the security group.
    #[must_use]
    pub fn security_group(mut self, value: ResourceRef<SecurityGroupSpec>) -> Self {
        self.security_group = Some(value);
        self
    }

    /// Sets the keypair.
    #[must_use]
    pub fn keypair(mut self, value: ResourceRef<KeypairSpec>) -> Self {
        self.keypair = Some(value);
        self
    }

    /// Sets the image.
    #[must_use]
    pub fn image(mut self, value: ResourceRef<ImageQuery>) -> Self {
        self.image = Some(value);
        self
    }

    /// Adds a caller tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Sets the raw user data.
    #[must_use]
    pub fn user_data(mut self, value: impl Into<String>) -> Self {
        self.user_data = Some(value.into());
        self
    }

    /// Requests metadata hardening after launch.
    #[must_use]
    pub const fn disable_metadata_access(mut self, value: bool) -> Self {
        self.disable_metadata_access = value;
        self
    }

    /// Controls public address association.
    #[must_use]
    pub const fn associate_public_ip(mut self, value: bool) -> Self {
        self.associate_public_ip = value;
        self
    }

    /// Builds and validates the specification, trimming string inputs.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when a required field is missing.
    pub fn build(self) -> Result<InstanceSpec, InfraError> {
        let security_group = self
            .security_group
            .ok_or_else(|| InfraError::Validation(String::from("security_group")))?;
        let keypair = self
            .keypair
            .ok_or_else(|| InfraError::Validation(String::from("keypair")))?;
        let spec = InstanceSpec {
            vpc_id: trimmed(&self.vpc_id),
            subnet_id: trimmed(&self.subnet_id),
            instance_name: trimmed(&self.instance_name),
            instance_type: trimmed(&self.instance_type),
            wait_until_running: self.wait_until_running,
            extra_startup_wait_secs: self.extra_startup_wait_secs,
            security_group,
            keypair,
            image: self.image,
            tags: self.tags,
            user_data: self.user_data,
            disable_metadata_access: self.disable_metadata_access,
            associate_public_ip: self.associate_public_ip,
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// Instance attribute projected by a find query.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InstanceProperty {
    /// Instance identifier.
    Id,
    /// Instance type.
    InstanceType,
}

/// Describes how to tear down a single instance.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct InstanceTeardown {
    /// Instance to destroy.
    pub instance_id: String,
    /// Delete the keypair installed on the instance first.
    #[serde(default = "enabled")]
    pub destroy_keypair: bool,
    /// Wait for `stopped` before terminating.
    #[serde(default)]
    pub wait_for_stopped: bool,
    /// Wait for `terminated` before returning.
    #[serde(default = "enabled")]
    pub wait_for_termination: bool,
}

impl InstanceTeardown {
    /// Teardown with the default flags: keypair destroyed, no stopped wait,
    /// termination awaited.
    #[must_use]
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: trimmed(&instance_id.into()),
            destroy_keypair: true,
            wait_for_stopped: false,
            wait_for_termination: true,
        }
    }

    /// Controls keypair deletion.
    #[must_use]
    pub const fn destroy_keypair(mut self, value: bool) -> Self {
        self.destroy_keypair = value;
        self
    }

    /// Controls the stopped wait.
    #[must_use]
    pub const fn wait_for_stopped(mut self, value: bool) -> Self {
        self.wait_for_stopped = value;
        self
    }

    /// Controls the terminated wait.
    #[must_use]
    pub const fn wait_for_termination(mut self, value: bool) -> Self {
        self.wait_for_termination = value;
        self
    }
}

/// Locates the administrator password of a Windows instance.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct CredentialsQuery {
    /// Instance whose password is requested.
    pub instance_id: String,
    /// PEM private key matching the instance keypair.
    pub private_key_path: Utf8PathBuf,
    /// How long to keep polling for password data.
    #[serde(
        default = "default_password_timeout_secs",
        alias = "retry_timeout_seconds"
    )]
    pub timeout_secs: u64,
}

impl CredentialsQuery {
    /// Query with the default timeout.
    #[must_use]
    pub fn new(instance_id: impl Into<String>, private_key_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            instance_id: trimmed(&instance_id.into()),
            private_key_path: private_key_path.into(),
            timeout_secs: default_password_timeout_secs(),
        }
    }

    /// Overrides the polling timeout.
    #[must_use]
    pub const fn timeout(mut self, value: Duration) -> Self {
        self.timeout_secs = value.as_secs();
        self
    }

    /// Polling timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validates the query.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when a field is empty.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.instance_id, "instance_id")?;
        require(self.private_key_path.as_str(), "private_key_path")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> InstanceSpec {
        InstanceSpec::builder()
            .vpc_id(" vpc-1 ")
            .subnet_id("subnet-1")
            .instance_name("builder")
            .security_group(ResourceRef::id("sg-1"))
            .keypair(ResourceRef::id("kp"))
            .tag("team", "infra")
            .build()
            .unwrap_or_else(|err| panic!("spec should build: {err}"))
    }

    #[test]
    fn builder_applies_defaults_and_trims() {
        let built = spec();
        assert_eq!(built.vpc_id, "vpc-1");
        assert_eq!(built.instance_type, DEFAULT_INSTANCE_TYPE);
        assert!(built.wait_until_running);
        assert!(built.associate_public_ip);
        assert!(!built.disable_metadata_access);
        assert!(built.image.is_none());
    }

    #[test]
    fn name_tag_is_injected_over_caller_tags() {
        let mut built = spec();
        built.tags.insert(String::from("Name"), String::from("stale"));
        let tags = built.tags_with_name();
        assert_eq!(tags.get("Name").map(String::as_str), Some("builder"));
        assert_eq!(tags.get("team").map(String::as_str), Some("infra"));
    }

    #[test]
    fn builder_requires_a_security_group() {
        let err = InstanceSpec::builder()
            .vpc_id("vpc-1")
            .subnet_id("subnet-1")
            .instance_name("builder")
            .keypair(ResourceRef::id("kp"))
            .build()
            .err();
        assert_eq!(err, Some(InfraError::Validation(String::from("security_group"))));
    }

    #[test]
    fn deserialises_with_legacy_field_names() {
        let json = r#"{
            "vpc_id": "vpc-1",
            "subnet_id": "subnet-1",
            "instance_name": "legacy",
            "security_group": "sg-1",
            "keypair": {"name": "kp", "exists_policy": "reuse"},
            "ami": {"provider": "amazon"},
            "wait_until_finished": false,
            "extra_startup_wait_time_seconds": 30
        }"#;
        let parsed: InstanceSpec = serde_json::from_str(json)
            .unwrap_or_else(|err| panic!("legacy document should parse: {err}"));
        assert!(!parsed.wait_until_running);
        assert_eq!(parsed.extra_startup_wait(), Some(Duration::from_secs(30)));
        assert_eq!(parsed.instance_type, DEFAULT_INSTANCE_TYPE);
        assert!(matches!(parsed.image, Some(ResourceRef::BySpec(_))));
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn teardown_defaults_match_documented_flags() {
        let teardown = InstanceTeardown::new("i-1");
        assert!(teardown.destroy_keypair);
        assert!(!teardown.wait_for_stopped);
        assert!(teardown.wait_for_termination);
    }
}
