//! Injected control-plane seam.
//!
//! Resource clients never talk to a provider SDK directly. They receive an
//! implementation of the traits below, one per service family, which keeps
//! the orchestration logic testable against the in-memory double in
//! [`crate::test_support`] and lets [`crate::aws`] own every SDK detail.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

mod types;

pub use types::{
    CallerIdentity, CreatedKeyPair, Direction, DiscoverRequest, Filter, ImageRecord,
    InstanceRecord, KeyPairRecord, LaunchRequest, ListObjectsRequest, MetadataOptions,
    NetworkAclRecord, ObjectEntry, ObjectPage, Permission, PutParameterRequest, RootVolume,
    RouteTableAssociation, RouteTableRecord, SecurityGroupRecord, ServiceInstanceRecord, Tags,
    VpcAttribute, VpcRecord,
};

/// Errors surfaced by a control-plane implementation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ControlPlaneError {
    /// The addressed resource does not exist.
    #[error("{operation}: not found: {message}")]
    NotFound {
        /// Operation that was attempted.
        operation: String,
        /// Provider message.
        message: String,
    },
    /// The provider rejected the call with an error code.
    #[error("{operation}: {code}: {message}")]
    Service {
        /// Operation that was attempted.
        operation: String,
        /// Provider error code.
        code: String,
        /// Provider message.
        message: String,
    },
    /// The call never produced a provider response.
    #[error("{operation}: {message}")]
    Transport {
        /// Operation that was attempted.
        operation: String,
        /// Transport failure description.
        message: String,
    },
}

impl ControlPlaneError {
    /// Returns `true` when the provider reported a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Future returned by control-plane operations.
pub type ControlPlaneFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, ControlPlaneError>> + Send + 'a>>;

/// Compute, imaging and networking calls.
pub trait Ec2Api: Send + Sync {
    /// Lists images owned by `owners` that satisfy every filter.
    fn describe_images<'a>(
        &'a self,
        owners: &'a [String],
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<ImageRecord>>;

    /// Fetches a single image by identifier.
    fn describe_image<'a>(&'a self, image_id: &'a str) -> ControlPlaneFuture<'a, ImageRecord>;

    /// Fetches a keypair by name.
    fn describe_key_pair<'a>(&'a self, name: &'a str) -> ControlPlaneFuture<'a, KeyPairRecord>;

    /// Creates a keypair and returns its private key material.
    fn create_key_pair<'a>(
        &'a self,
        name: &'a str,
        tags: &'a Tags,
    ) -> ControlPlaneFuture<'a, CreatedKeyPair>;

    /// Deletes a keypair by name.
    fn delete_key_pair<'a>(&'a self, name: &'a str) -> ControlPlaneFuture<'a, ()>;

    /// Launches instances and returns their identifiers.
    fn run_instances<'a>(&'a self, request: &'a LaunchRequest)
    -> ControlPlaneFuture<'a, Vec<String>>;

    /// Lists instances matching the filters, restricted to `instance_ids`
    /// when that slice is non-empty.
    fn describe_instances<'a>(
        &'a self,
        filters: &'a [Filter],
        instance_ids: &'a [String],
    ) -> ControlPlaneFuture<'a, Vec<InstanceRecord>>;

    /// Starts stopped instances.
    fn start_instances<'a>(&'a self, instance_ids: &'a [String]) -> ControlPlaneFuture<'a, ()>;

    /// Stops running instances.
    fn stop_instances<'a>(&'a self, instance_ids: &'a [String]) -> ControlPlaneFuture<'a, ()>;

    /// Terminates instances.
    fn terminate_instances<'a>(&'a self, instance_ids: &'a [String])
    -> ControlPlaneFuture<'a, ()>;

    /// Updates the metadata service options of an instance.
    fn modify_instance_metadata_options<'a>(
        &'a self,
        instance_id: &'a str,
        options: MetadataOptions,
    ) -> ControlPlaneFuture<'a, ()>;

    /// Returns the base64 encrypted password blob, or `None` while the
    /// instance has not generated one yet.
    fn get_password_data<'a>(
        &'a self,
        instance_id: &'a str,
    ) -> ControlPlaneFuture<'a, Option<String>>;

    /// Adds or replaces tags on a resource.
    fn create_tags<'a>(&'a self, resource_id: &'a str, tags: &'a Tags)
    -> ControlPlaneFuture<'a, ()>;

    /// Creates a security group and returns its identifier.
    fn create_security_group<'a>(
        &'a self,
        name: &'a str,
        description: &'a str,
        vpc_id: &'a str,
    ) -> ControlPlaneFuture<'a, String>;

    /// Authorizes one rule on a security group.
    fn authorize_security_group<'a>(
        &'a self,
        group_id: &'a str,
        direction: Direction,
        permission: &'a Permission,
    ) -> ControlPlaneFuture<'a, ()>;

    /// Lists security groups matching the filters.
    fn describe_security_groups<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<SecurityGroupRecord>>;

    /// Deletes a security group.
    fn delete_security_group<'a>(&'a self, group_id: &'a str) -> ControlPlaneFuture<'a, ()>;

    /// Creates an internet gateway and returns its identifier.
    fn create_internet_gateway(&self) -> ControlPlaneFuture<'_, String>;

    /// Lists internet gateway identifiers matching the filters.
    fn describe_internet_gateways<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<String>>;

    /// Attaches a gateway to a VPC.
    fn attach_internet_gateway<'a>(
        &'a self,
        gateway_id: &'a str,
        vpc_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()>;

    /// Detaches a gateway from a VPC.
    fn detach_internet_gateway<'a>(
        &'a self,
        gateway_id: &'a str,
        vpc_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()>;

    /// Deletes a detached gateway.
    fn delete_internet_gateway<'a>(&'a self, gateway_id: &'a str) -> ControlPlaneFuture<'a, ()>;

    /// Creates a VPC and returns its identifier.
    fn create_vpc<'a>(&'a self, cidr_block: &'a str) -> ControlPlaneFuture<'a, String>;

    /// Lists VPCs matching the filters, restricted to `vpc_ids` when that
    /// slice is non-empty.
    fn describe_vpcs<'a>(
        &'a self,
        filters: &'a [Filter],
        vpc_ids: &'a [String],
    ) -> ControlPlaneFuture<'a, Vec<VpcRecord>>;

    /// Enables a boolean VPC attribute.
    fn enable_vpc_attribute<'a>(
        &'a self,
        vpc_id: &'a str,
        attribute: VpcAttribute,
    ) -> ControlPlaneFuture<'a, ()>;

    /// Associates a DHCP option set (or `default`) with a VPC.
    fn associate_dhcp_options<'a>(
        &'a self,
        dhcp_options_id: &'a str,
        vpc_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()>;

    /// Deletes an empty VPC.
    fn delete_vpc<'a>(&'a self, vpc_id: &'a str) -> ControlPlaneFuture<'a, ()>;

    /// Creates a subnet and returns its identifier.
    fn create_subnet<'a>(
        &'a self,
        vpc_id: &'a str,
        cidr_block: &'a str,
        availability_zone: Option<&'a str>,
    ) -> ControlPlaneFuture<'a, String>;

    /// Lists subnet identifiers matching the filters.
    fn describe_subnets<'a>(&'a self, filters: &'a [Filter])
    -> ControlPlaneFuture<'a, Vec<String>>;

    /// Deletes a subnet.
    fn delete_subnet<'a>(&'a self, subnet_id: &'a str) -> ControlPlaneFuture<'a, ()>;

    /// Lists route tables matching the filters.
    fn describe_route_tables<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<RouteTableRecord>>;

    /// Adds a route sending `destination_cidr` to a gateway.
    fn create_route<'a>(
        &'a self,
        route_table_id: &'a str,
        destination_cidr: &'a str,
        gateway_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()>;

    /// Associates a route table with a subnet and returns the association id.
    fn associate_route_table<'a>(
        &'a self,
        route_table_id: &'a str,
        subnet_id: &'a str,
    ) -> ControlPlaneFuture<'a, String>;

    /// Removes a route table association.
    fn disassociate_route_table<'a>(
        &'a self,
        association_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()>;

    /// Deletes a route table.
    fn delete_route_table<'a>(&'a self, route_table_id: &'a str) -> ControlPlaneFuture<'a, ()>;

    /// Lists VPC endpoint identifiers matching the filters.
    fn describe_vpc_endpoints<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<String>>;

    /// Deletes VPC endpoints.
    fn delete_vpc_endpoints<'a>(&'a self, endpoint_ids: &'a [String])
    -> ControlPlaneFuture<'a, ()>;

    /// Lists peering connection identifiers matching the filters.
    fn describe_vpc_peering_connections<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<String>>;

    /// Deletes a peering connection.
    fn delete_vpc_peering_connection<'a>(
        &'a self,
        peering_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()>;

    /// Lists network ACLs matching the filters.
    fn describe_network_acls<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<NetworkAclRecord>>;

    /// Deletes a network ACL.
    fn delete_network_acl<'a>(&'a self, acl_id: &'a str) -> ControlPlaneFuture<'a, ()>;

    /// Lists network interface identifiers matching the filters.
    fn describe_network_interfaces<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<String>>;

    /// Deletes a network interface.
    fn delete_network_interface<'a>(
        &'a self,
        interface_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()>;
}

/// Object storage calls.
pub trait S3Api: Send + Sync {
    /// Reads an object body.
    fn get_object<'a>(&'a self, bucket: &'a str, key: &'a str) -> ControlPlaneFuture<'a, Vec<u8>>;

    /// Writes an object body.
    fn put_object<'a>(
        &'a self,
        bucket: &'a str,
        key: &'a str,
        body: Vec<u8>,
    ) -> ControlPlaneFuture<'a, ()>;

    /// Checks that an object exists; a missing object is
    /// [`ControlPlaneError::NotFound`].
    fn head_object<'a>(&'a self, bucket: &'a str, key: &'a str) -> ControlPlaneFuture<'a, ()>;

    /// Deletes a batch of keys.
    fn delete_objects<'a>(
        &'a self,
        bucket: &'a str,
        keys: &'a [String],
    ) -> ControlPlaneFuture<'a, ()>;

    /// Returns one page of a prefix listing.
    fn list_objects_page<'a>(
        &'a self,
        request: &'a ListObjectsRequest,
    ) -> ControlPlaneFuture<'a, ObjectPage>;
}

/// Parameter store calls.
pub trait SsmApi: Send + Sync {
    /// Creates or overwrites a parameter.
    fn put_parameter<'a>(&'a self, request: &'a PutParameterRequest)
    -> ControlPlaneFuture<'a, ()>;

    /// Reads a parameter value.
    fn get_parameter<'a>(
        &'a self,
        name: &'a str,
        with_decryption: bool,
    ) -> ControlPlaneFuture<'a, String>;

    /// Lists parameter names equal to `name`.
    fn describe_parameters<'a>(&'a self, name: &'a str) -> ControlPlaneFuture<'a, Vec<String>>;

    /// Deletes a parameter.
    fn delete_parameter<'a>(&'a self, name: &'a str) -> ControlPlaneFuture<'a, ()>;
}

/// Service registry calls.
pub trait ServiceDiscoveryApi: Send + Sync {
    /// Lists registered instances for a namespace/service pair.
    fn discover_instances<'a>(
        &'a self,
        request: &'a DiscoverRequest,
    ) -> ControlPlaneFuture<'a, Vec<ServiceInstanceRecord>>;
}

/// Identity calls.
pub trait StsApi: Send + Sync {
    /// Describes the calling principal.
    fn get_caller_identity(&self) -> ControlPlaneFuture<'_, CallerIdentity>;
}
