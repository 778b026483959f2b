//! Networking requests: security groups, gateways, VPCs and subnets.

use serde::Deserialize;

use crate::control_plane::{Permission, Tags};
use crate::error::InfraError;

use super::{ResourceRef, require, trimmed};

/// Description attached to every allow entry created by this crate.
pub const RULE_DESCRIPTION: &str = "Automated Rule";

const MIN_PORT: i32 = -1;
const MAX_PORT: i32 = 65_535;

fn tcp() -> String {
    String::from("tcp")
}

const fn enabled() -> bool {
    true
}

fn with_name(tags: &Tags, name: &str) -> Tags {
    let mut merged = tags.clone();
    merged.insert(String::from("Name"), name.to_owned());
    merged
}

/// Single ingress or egress rule. `-1` means all protocols or all ports.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct NetworkRule {
    /// IP protocol; defaults to `tcp`.
    #[serde(default = "tcp")]
    pub protocol: String,
    /// First port of the range.
    pub from_port: i32,
    /// Last port of the range.
    pub to_port: i32,
    /// CIDR blocks allowed by the rule.
    #[serde(default, alias = "allowed_cidr")]
    pub allowed_cidrs: Vec<String>,
    /// Peer security groups allowed by the rule.
    #[serde(default)]
    pub allowed_groups: Vec<String>,
}

impl NetworkRule {
    /// TCP rule for a port range with no allow entries yet.
    #[must_use]
    pub fn tcp(from_port: i32, to_port: i32) -> Self {
        Self {
            protocol: tcp(),
            from_port,
            to_port,
            allowed_cidrs: Vec::new(),
            allowed_groups: Vec::new(),
        }
    }

    /// Sets the protocol.
    #[must_use]
    pub fn protocol(mut self, value: impl Into<String>) -> Self {
        self.protocol = trimmed(&value.into());
        self
    }

    /// Allows a CIDR block.
    #[must_use]
    pub fn allow_cidr(mut self, cidr: impl Into<String>) -> Self {
        self.allowed_cidrs.push(trimmed(&cidr.into()));
        self
    }

    /// Allows a peer security group.
    #[must_use]
    pub fn allow_group(mut self, group_id: impl Into<String>) -> Self {
        self.allowed_groups.push(trimmed(&group_id.into()));
        self
    }

    /// Validates the rule.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when the protocol is empty or a port
    /// falls outside `-1..=65535`.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.protocol, "protocol")?;
        if !(MIN_PORT..=MAX_PORT).contains(&self.from_port) {
            return Err(InfraError::Validation(String::from("from_port")));
        }
        if !(MIN_PORT..=MAX_PORT).contains(&self.to_port) {
            return Err(InfraError::Validation(String::from("to_port")));
        }
        Ok(())
    }

    pub(crate) fn to_permission(&self) -> Permission {
        Permission {
            protocol: self.protocol.clone(),
            from_port: self.from_port,
            to_port: self.to_port,
            cidr_blocks: self.allowed_cidrs.clone(),
            group_ids: self.allowed_groups.clone(),
            description: RULE_DESCRIPTION.to_owned(),
        }
    }
}

/// Security group with its rules.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct SecurityGroupSpec {
    /// Group name.
    pub name: String,
    /// VPC owning the group.
    pub vpc_id: String,
    /// Group description.
    #[serde(default)]
    pub description: String,
    /// Inbound rules.
    #[serde(default)]
    pub ingress: Vec<NetworkRule>,
    /// Outbound rules.
    #[serde(default)]
    pub egress: Vec<NetworkRule>,
    /// Caller tags; `Name` is added on creation.
    #[serde(default)]
    pub tags: Tags,
}

impl SecurityGroupSpec {
    /// Group with no rules.
    #[must_use]
    pub fn new(name: impl Into<String>, vpc_id: impl Into<String>) -> Self {
        Self {
            name: trimmed(&name.into()),
            vpc_id: trimmed(&vpc_id.into()),
            description: String::new(),
            ingress: Vec::new(),
            egress: Vec::new(),
            tags: Tags::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = value.into();
        self
    }

    /// Adds an inbound rule.
    #[must_use]
    pub fn ingress(mut self, rule: NetworkRule) -> Self {
        self.ingress.push(rule);
        self
    }

    /// Adds an outbound rule.
    #[must_use]
    pub fn egress(mut self, rule: NetworkRule) -> Self {
        self.egress.push(rule);
        self
    }

    /// Adds a caller tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Validates the group and each rule.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.name, "security group name")?;
        require(&self.vpc_id, "vpc_id")?;
        self.ingress
            .iter()
            .chain(self.egress.iter())
            .try_for_each(NetworkRule::validate)
    }

    pub(crate) fn tags_with_name(&self) -> Tags {
        with_name(&self.tags, &self.name)
    }
}

/// Internet gateway to create.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct InternetGatewaySpec {
    /// Value of the `Name` tag.
    #[serde(alias = "internet_gateway_name")]
    pub name: String,
    /// Caller tags.
    #[serde(default)]
    pub tags: Tags,
}

impl InternetGatewaySpec {
    /// Gateway with no extra tags.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: trimmed(&name.into()),
            tags: Tags::new(),
        }
    }

    /// Validates the specification.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when the name is empty.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.name, "internet gateway name")
    }

    pub(crate) fn tags_with_name(&self) -> Tags {
        with_name(&self.tags, &self.name)
    }
}

/// VPC to create.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct VpcSpec {
    /// Primary CIDR block.
    pub cidr_block: String,
    /// Value of the `Name` tag.
    #[serde(alias = "vpc_name")]
    pub name: String,
    /// Gateway to attach, existing or created inline.
    #[serde(alias = "internet_gw")]
    pub internet_gateway: ResourceRef<InternetGatewaySpec>,
    /// Route `0.0.0.0/0` through the gateway from the main route table.
    #[serde(default = "enabled")]
    pub is_public: bool,
    /// Caller tags.
    #[serde(default)]
    pub tags: Tags,
}

impl VpcSpec {
    /// Public VPC with no extra tags.
    #[must_use]
    pub fn new(
        cidr_block: impl Into<String>,
        name: impl Into<String>,
        internet_gateway: ResourceRef<InternetGatewaySpec>,
    ) -> Self {
        Self {
            cidr_block: trimmed(&cidr_block.into()),
            name: trimmed(&name.into()),
            internet_gateway,
            is_public: true,
            tags: Tags::new(),
        }
    }

    /// Controls the default route.
    #[must_use]
    pub const fn is_public(mut self, value: bool) -> Self {
        self.is_public = value;
        self
    }

    /// Adds a caller tag.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Validates the specification.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.cidr_block, "cidr_block")?;
        require(&self.name, "vpc name")?;
        match &self.internet_gateway {
            ResourceRef::ById(id) => require(id, "internet_gateway"),
            ResourceRef::BySpec(spec) => spec.validate(),
        }
    }

    pub(crate) fn tags_with_name(&self) -> Tags {
        with_name(&self.tags, &self.name)
    }
}

/// Subnet to create.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct SubnetSpec {
    /// CIDR block inside the VPC range.
    pub cidr_block: String,
    /// Value of the `Name` tag.
    #[serde(alias = "subnet_name")]
    pub name: String,
    /// Owning VPC.
    pub vpc_id: String,
    /// Availability zone; the provider picks one when absent.
    #[serde(default)]
    pub availability_zone: Option<String>,
    /// Caller tags.
    #[serde(default)]
    pub tags: Tags,
}

impl SubnetSpec {
    /// Subnet with provider-chosen placement.
    #[must_use]
    pub fn new(
        cidr_block: impl Into<String>,
        name: impl Into<String>,
        vpc_id: impl Into<String>,
    ) -> Self {
        Self {
            cidr_block: trimmed(&cidr_block.into()),
            name: trimmed(&name.into()),
            vpc_id: trimmed(&vpc_id.into()),
            availability_zone: None,
            tags: Tags::new(),
        }
    }

    /// Pins the availability zone.
    #[must_use]
    pub fn availability_zone(mut self, zone: impl Into<String>) -> Self {
        self.availability_zone = Some(trimmed(&zone.into()));
        self
    }

    /// Validates the specification.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.cidr_block, "cidr_block")?;
        require(&self.name, "subnet name")?;
        require(&self.vpc_id, "vpc_id")
    }

    pub(crate) fn tags_with_name(&self) -> Tags {
        with_name(&self.tags, &self.name)
    }
}

/// VPC deletion request.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct VpcTeardown {
    /// VPC to delete.
    pub vpc_id: String,
    /// Remove dependent resources before deleting the VPC.
    #[serde(default = "enabled")]
    pub full_cleanup: bool,
}

impl VpcTeardown {
    /// Full cleanup of `vpc_id`.
    #[must_use]
    pub fn new(vpc_id: impl Into<String>) -> Self {
        Self {
            vpc_id: trimmed(&vpc_id.into()),
            full_cleanup: true,
        }
    }

    /// Controls dependent resource cleanup.
    #[must_use]
    pub const fn full_cleanup(mut self, value: bool) -> Self {
        self.full_cleanup = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-1, -1, true)]
    #[case(22, 22, true)]
    #[case(0, 65_535, true)]
    #[case(-2, 22, false)]
    #[case(22, 65_536, false)]
    fn port_ranges_are_bounded(#[case] from: i32, #[case] to: i32, #[case] valid: bool) {
        assert_eq!(NetworkRule::tcp(from, to).validate().is_ok(), valid);
    }

    #[test]
    fn permissions_carry_the_fixed_description() {
        let permission = NetworkRule::tcp(3389, 3389)
            .allow_cidr("10.0.0.0/8")
            .allow_group("sg-peer")
            .to_permission();
        assert_eq!(permission.description, RULE_DESCRIPTION);
        assert_eq!(permission.cidr_blocks, vec![String::from("10.0.0.0/8")]);
        assert_eq!(permission.group_ids, vec![String::from("sg-peer")]);
    }

    #[test]
    fn rule_defaults_to_tcp_when_deserialised() {
        let rule: NetworkRule =
            serde_json::from_str(r#"{"from_port": 443, "to_port": 443, "allowed_cidr": ["0.0.0.0/0"]}"#)
                .unwrap_or_else(|err| panic!("rule should parse: {err}"));
        assert_eq!(rule.protocol, "tcp");
        assert_eq!(rule.allowed_cidrs, vec![String::from("0.0.0.0/0")]);
    }

    #[test]
    fn vpc_defaults_to_public() {
        let spec: VpcSpec = serde_json::from_str(
            r#"{"cidr_block": "10.0.0.0/16", "vpc_name": "core", "internet_gw": {"internet_gateway_name": "core-igw"}}"#,
        )
        .unwrap_or_else(|err| panic!("vpc should parse: {err}"));
        assert!(spec.is_public);
        assert!(spec.validate().is_ok());
    }
}
