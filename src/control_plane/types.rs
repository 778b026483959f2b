//! Plain records exchanged with the control plane.

use std::collections::BTreeMap;

/// Tag set attached to a resource, keyed by tag name.
pub type Tags = BTreeMap<String, String>;

/// Name/values predicate understood by the `Describe*` family of calls.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Filter {
    /// Filter name, for example `vpc-id` or `tag:Name`.
    pub name: String,
    /// Accepted values; a resource matches when any value matches.
    pub values: Vec<String>,
}

impl Filter {
    /// Builds a filter that accepts a single value.
    #[must_use]
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }

    /// Builds a tag equality filter (`tag:<key>`).
    #[must_use]
    pub fn tag(key: &str, value: impl Into<String>) -> Self {
        Self::single(format!("tag:{key}"), value)
    }
}

/// Machine image metadata.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ImageRecord {
    /// Image identifier (`ami-…`).
    pub id: String,
    /// Image name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// ISO-8601 creation timestamp as reported by the provider.
    pub creation_date: String,
    /// Platform marker (`windows` for Windows images, absent otherwise).
    pub platform: Option<String>,
    /// Detailed platform string, for example `Linux/UNIX`.
    pub platform_details: Option<String>,
}

/// Existing keypair as reported by the control plane.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyPairRecord {
    /// Keypair identifier (`key-…`).
    pub id: String,
    /// Keypair name.
    pub name: String,
}

/// Keypair freshly created by the control plane, including its private key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreatedKeyPair {
    /// Keypair identifier.
    pub id: String,
    /// Keypair name.
    pub name: String,
    /// PEM encoded private key material.
    pub material: String,
}

/// Root block device attached at launch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RootVolume {
    /// Device name, for example `/dev/xvda`.
    pub device_name: String,
    /// Volume size in GiB.
    pub size_gib: i32,
    /// Volume type, for example `gp2`.
    pub volume_type: String,
    /// Whether the volume is encrypted at rest.
    pub encrypted: bool,
    /// Whether the volume is deleted with the instance.
    pub delete_on_termination: bool,
}

/// Parameters for a `RunInstances` call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LaunchRequest {
    /// Image to boot.
    pub image_id: String,
    /// Instance type, for example `t2.micro`.
    pub instance_type: String,
    /// Keypair name installed on the instance.
    pub key_name: String,
    /// Subnet of the primary network interface.
    pub subnet_id: String,
    /// Security group attached to the primary network interface.
    pub security_group_id: String,
    /// Whether the primary interface receives a public address.
    pub associate_public_ip: bool,
    /// Maximum number of instances to launch (minimum is always 1).
    pub count: i32,
    /// Root volume mapping.
    pub root_volume: RootVolume,
    /// Raw user data passed to the instance.
    pub user_data: String,
    /// Tags applied to each instance.
    pub tags: Tags,
    /// Idempotency token for the launch.
    pub client_token: String,
}

/// Compute instance state snapshot.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InstanceRecord {
    /// Instance identifier (`i-…`).
    pub id: String,
    /// Instance type.
    pub instance_type: String,
    /// Lifecycle state name, for example `running`.
    pub state: String,
    /// Keypair installed on the instance, when any.
    pub key_name: Option<String>,
    /// Subnet of the primary interface.
    pub subnet_id: Option<String>,
    /// VPC of the primary interface.
    pub vpc_id: Option<String>,
}

/// Metadata service options applied to a running instance.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MetadataOptions {
    /// Require session tokens (`HttpTokens=required`).
    pub tokens_required: bool,
    /// Leave the metadata endpoint reachable.
    pub endpoint_enabled: bool,
}

/// Single authorize call for a security group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Permission {
    /// IP protocol (`tcp`, `udp`, `icmp` or `-1`).
    pub protocol: String,
    /// First port of the range.
    pub from_port: i32,
    /// Last port of the range.
    pub to_port: i32,
    /// CIDR blocks allowed by the rule.
    pub cidr_blocks: Vec<String>,
    /// Peer security groups allowed by the rule.
    pub group_ids: Vec<String>,
    /// Description attached to every allow entry.
    pub description: String,
}

/// Direction of a security group rule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Inbound traffic.
    Ingress,
    /// Outbound traffic.
    Egress,
}

/// Security group summary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SecurityGroupRecord {
    /// Group identifier (`sg-…`).
    pub id: String,
    /// Group name.
    pub name: String,
}

/// VPC summary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VpcRecord {
    /// VPC identifier (`vpc-…`).
    pub id: String,
    /// Lifecycle state, for example `available`.
    pub state: String,
}

/// Boolean VPC attribute toggled after creation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VpcAttribute {
    /// `enableDnsHostnames`.
    DnsHostnames,
    /// `enableDnsSupport`.
    DnsSupport,
}

/// Association between a route table and a subnet or the VPC itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteTableAssociation {
    /// Association identifier (`rtbassoc-…`).
    pub id: String,
    /// Whether this is the VPC main association.
    pub main: bool,
    /// Associated subnet, when any.
    pub subnet_id: Option<String>,
}

/// Route table with its associations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteTableRecord {
    /// Route table identifier (`rtb-…`).
    pub id: String,
    /// Current associations.
    pub associations: Vec<RouteTableAssociation>,
}

/// Network ACL summary.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NetworkAclRecord {
    /// ACL identifier (`acl-…`).
    pub id: String,
    /// Whether this is the VPC default ACL.
    pub is_default: bool,
}

/// Object listed by a prefix query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObjectEntry {
    /// Object key.
    pub key: String,
    /// Object size in bytes.
    pub size: i64,
}

/// Single page of a prefix listing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ObjectPage {
    /// Objects on this page.
    pub objects: Vec<ObjectEntry>,
    /// Common prefixes when a delimiter was supplied.
    pub common_prefixes: Vec<String>,
    /// Token for the next page, when more results exist.
    pub next_token: Option<String>,
}

/// Parameters for one page of a prefix listing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListObjectsRequest {
    /// Bucket to list.
    pub bucket: String,
    /// Key prefix; empty lists the whole bucket.
    pub prefix: String,
    /// Delimiter grouping keys into common prefixes.
    pub delimiter: Option<String>,
    /// Continuation token from the previous page.
    pub continuation_token: Option<String>,
}

/// Parameters for a `PutParameter` call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PutParameterRequest {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: String,
    /// Human readable description.
    pub description: String,
    /// Store as `SecureString` rather than `String`.
    pub secure: bool,
    /// Replace an existing parameter with the same name.
    pub overwrite: bool,
}

/// Parameters for a service discovery lookup.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiscoverRequest {
    /// Namespace name.
    pub namespace: String,
    /// Service name.
    pub service: String,
    /// Attribute equality filter.
    pub query_parameters: BTreeMap<String, String>,
    /// Region override; the client region is used when absent.
    pub region: Option<String>,
}

/// Registered service instance.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ServiceInstanceRecord {
    /// Namespace the instance is registered in.
    pub namespace: String,
    /// Service the instance belongs to.
    pub service: String,
    /// Instance identifier.
    pub instance_id: String,
    /// Custom attributes registered with the instance.
    pub attributes: BTreeMap<String, String>,
}

/// Result of `GetCallerIdentity`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CallerIdentity {
    /// Account number.
    pub account: String,
    /// ARN of the calling principal.
    pub arn: String,
    /// Unique identifier of the calling principal.
    pub user_id: String,
}
