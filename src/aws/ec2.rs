//! EC2 adapter.

use aws_sdk_ec2::types::{
    self, AttributeBooleanValue, BlockDeviceMapping, EbsBlockDevice, HttpTokensState,
    InstanceMetadataEndpointState, InstanceNetworkInterfaceSpecification, InstanceType,
    IpPermission, IpRange, ResourceType, RunInstancesMonitoringEnabled, Tag, TagSpecification,
    UserIdGroupPair, VolumeType,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::AwsControlPlane;
use super::error::{missing, not_found, sdk_error};
use crate::control_plane::{
    ControlPlaneFuture, CreatedKeyPair, Direction, Ec2Api, Filter, ImageRecord, InstanceRecord,
    KeyPairRecord, LaunchRequest, MetadataOptions, NetworkAclRecord, Permission,
    RouteTableAssociation, RouteTableRecord, SecurityGroupRecord, Tags, VpcAttribute, VpcRecord,
};

/// Launch-time monitoring setting: basic metrics only.
fn basic_monitoring() -> RunInstancesMonitoringEnabled {
    RunInstancesMonitoringEnabled::builder().enabled(false).build()
}

fn sdk_filters(filters: &[Filter]) -> Option<Vec<types::Filter>> {
    (!filters.is_empty()).then(|| {
        filters
            .iter()
            .map(|filter| {
                types::Filter::builder()
                    .name(&filter.name)
                    .set_values(Some(filter.values.clone()))
                    .build()
            })
            .collect()
    })
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

fn sdk_tags(tags: &Tags) -> Vec<Tag> {
    tags.iter()
        .map(|(key, value)| Tag::builder().key(key).value(value).build())
        .collect()
}

fn tag_specification(resource: ResourceType, tags: &Tags) -> TagSpecification {
    TagSpecification::builder()
        .resource_type(resource)
        .set_tags(Some(sdk_tags(tags)))
        .build()
}

fn image_record(image: &types::Image) -> ImageRecord {
    ImageRecord {
        id: image.image_id().unwrap_or_default().to_owned(),
        name: image.name().unwrap_or_default().to_owned(),
        description: image.description().unwrap_or_default().to_owned(),
        creation_date: image.creation_date().unwrap_or_default().to_owned(),
        platform: image.platform().map(|platform| platform.as_str().to_owned()),
        platform_details: image.platform_details().map(str::to_owned),
    }
}

fn instance_record(instance: &types::Instance) -> InstanceRecord {
    InstanceRecord {
        id: instance.instance_id().unwrap_or_default().to_owned(),
        instance_type: instance
            .instance_type()
            .map(|kind| kind.as_str().to_owned())
            .unwrap_or_default(),
        state: instance
            .state()
            .and_then(types::InstanceState::name)
            .map(|name| name.as_str().to_owned())
            .unwrap_or_default(),
        key_name: instance.key_name().map(str::to_owned),
        subnet_id: instance.subnet_id().map(str::to_owned),
        vpc_id: instance.vpc_id().map(str::to_owned),
    }
}

fn ip_permission(permission: &Permission) -> IpPermission {
    let ranges = permission
        .cidr_blocks
        .iter()
        .map(|cidr| {
            IpRange::builder()
                .cidr_ip(cidr)
                .description(&permission.description)
                .build()
        })
        .collect();
    let groups = permission
        .group_ids
        .iter()
        .map(|group| {
            UserIdGroupPair::builder()
                .group_id(group)
                .description(&permission.description)
                .build()
        })
        .collect();
    IpPermission::builder()
        .ip_protocol(&permission.protocol)
        .from_port(permission.from_port)
        .to_port(permission.to_port)
        .set_ip_ranges(Some(ranges))
        .set_user_id_group_pairs(Some(groups))
        .build()
}

fn enabled() -> AttributeBooleanValue {
    AttributeBooleanValue::builder().value(true).build()
}

impl Ec2Api for AwsControlPlane {
    fn describe_images<'a>(
        &'a self,
        owners: &'a [String],
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<ImageRecord>> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_images()
                .set_owners(non_empty(owners))
                .set_filters(sdk_filters(filters))
                .send()
                .await
                .map_err(|err| sdk_error("DescribeImages", &err))?;
            Ok(output.images().iter().map(image_record).collect())
        })
    }

    fn describe_image<'a>(&'a self, image_id: &'a str) -> ControlPlaneFuture<'a, ImageRecord> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_images()
                .image_ids(image_id)
                .send()
                .await
                .map_err(|err| sdk_error("DescribeImages", &err))?;
            output
                .images()
                .first()
                .map(image_record)
                .ok_or_else(|| not_found("DescribeImages", image_id))
        })
    }

    fn describe_key_pair<'a>(&'a self, name: &'a str) -> ControlPlaneFuture<'a, KeyPairRecord> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_key_pairs()
                .key_names(name)
                .send()
                .await
                .map_err(|err| sdk_error("DescribeKeyPairs", &err))?;
            output
                .key_pairs()
                .first()
                .map(|pair| KeyPairRecord {
                    id: pair.key_pair_id().unwrap_or_default().to_owned(),
                    name: pair.key_name().unwrap_or(name).to_owned(),
                })
                .ok_or_else(|| not_found("DescribeKeyPairs", name))
        })
    }

    fn create_key_pair<'a>(
        &'a self,
        name: &'a str,
        tags: &'a Tags,
    ) -> ControlPlaneFuture<'a, CreatedKeyPair> {
        Box::pin(async move {
            let output = self
                .ec2
                .create_key_pair()
                .key_name(name)
                .tag_specifications(tag_specification(ResourceType::KeyPair, tags))
                .send()
                .await
                .map_err(|err| sdk_error("CreateKeyPair", &err))?;
            Ok(CreatedKeyPair {
                id: output
                    .key_pair_id()
                    .ok_or_else(|| missing("CreateKeyPair", "keypair id"))?
                    .to_owned(),
                name: output.key_name().unwrap_or(name).to_owned(),
                material: output
                    .key_material()
                    .ok_or_else(|| missing("CreateKeyPair", "key material"))?
                    .to_owned(),
            })
        })
    }

    fn delete_key_pair<'a>(&'a self, name: &'a str) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .delete_key_pair()
                .key_name(name)
                .send()
                .await
                .map_err(|err| sdk_error("DeleteKeyPair", &err))?;
            Ok(())
        })
    }

    fn run_instances<'a>(
        &'a self,
        request: &'a LaunchRequest,
    ) -> ControlPlaneFuture<'a, Vec<String>> {
        Box::pin(async move {
            let volume = &request.root_volume;
            let root = BlockDeviceMapping::builder()
                .device_name(&volume.device_name)
                .ebs(
                    EbsBlockDevice::builder()
                        .volume_size(volume.size_gib)
                        .volume_type(VolumeType::from(volume.volume_type.as_str()))
                        .encrypted(volume.encrypted)
                        .delete_on_termination(volume.delete_on_termination)
                        .build(),
                )
                .build();
            let interface = InstanceNetworkInterfaceSpecification::builder()
                .device_index(0)
                .subnet_id(&request.subnet_id)
                .groups(&request.security_group_id)
                .associate_public_ip_address(request.associate_public_ip)
                .delete_on_termination(true)
                .build();
            let user_data =
                (!request.user_data.is_empty()).then(|| STANDARD.encode(&request.user_data));

            let output = self
                .ec2
                .run_instances()
                .image_id(&request.image_id)
                .instance_type(InstanceType::from(request.instance_type.as_str()))
                .key_name(&request.key_name)
                .min_count(1)
                .max_count(request.count)
                .block_device_mappings(root)
                .network_interfaces(interface)
                .monitoring(basic_monitoring())
                .set_user_data(user_data)
                .client_token(&request.client_token)
                .tag_specifications(tag_specification(ResourceType::Instance, &request.tags))
                .send()
                .await
                .map_err(|err| sdk_error("RunInstances", &err))?;
            Ok(output
                .instances()
                .iter()
                .filter_map(types::Instance::instance_id)
                .map(str::to_owned)
                .collect())
        })
    }

    fn describe_instances<'a>(
        &'a self,
        filters: &'a [Filter],
        instance_ids: &'a [String],
    ) -> ControlPlaneFuture<'a, Vec<InstanceRecord>> {
        Box::pin(async move {
            let mut records = Vec::new();
            let mut token: Option<String> = None;
            loop {
                let output = self
                    .ec2
                    .describe_instances()
                    .set_filters(sdk_filters(filters))
                    .set_instance_ids(non_empty(instance_ids))
                    .set_next_token(token.take())
                    .send()
                    .await
                    .map_err(|err| sdk_error("DescribeInstances", &err))?;
                records.extend(
                    output
                        .reservations()
                        .iter()
                        .flat_map(types::Reservation::instances)
                        .map(instance_record),
                );
                match output.next_token() {
                    Some(next) if !next.is_empty() => token = Some(next.to_owned()),
                    _ => break,
                }
            }
            Ok(records)
        })
    }

    fn start_instances<'a>(&'a self, instance_ids: &'a [String]) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .start_instances()
                .set_instance_ids(Some(instance_ids.to_vec()))
                .send()
                .await
                .map_err(|err| sdk_error("StartInstances", &err))?;
            Ok(())
        })
    }

    fn stop_instances<'a>(&'a self, instance_ids: &'a [String]) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .stop_instances()
                .set_instance_ids(Some(instance_ids.to_vec()))
                .send()
                .await
                .map_err(|err| sdk_error("StopInstances", &err))?;
            Ok(())
        })
    }

    fn terminate_instances<'a>(
        &'a self,
        instance_ids: &'a [String],
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .terminate_instances()
                .set_instance_ids(Some(instance_ids.to_vec()))
                .send()
                .await
                .map_err(|err| sdk_error("TerminateInstances", &err))?;
            Ok(())
        })
    }

    fn modify_instance_metadata_options<'a>(
        &'a self,
        instance_id: &'a str,
        options: MetadataOptions,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            let tokens = if options.tokens_required {
                HttpTokensState::Required
            } else {
                HttpTokensState::Optional
            };
            let endpoint = if options.endpoint_enabled {
                InstanceMetadataEndpointState::Enabled
            } else {
                InstanceMetadataEndpointState::Disabled
            };
            self.ec2
                .modify_instance_metadata_options()
                .instance_id(instance_id)
                .http_tokens(tokens)
                .http_endpoint(endpoint)
                .send()
                .await
                .map_err(|err| sdk_error("ModifyInstanceMetadataOptions", &err))?;
            Ok(())
        })
    }

    fn get_password_data<'a>(
        &'a self,
        instance_id: &'a str,
    ) -> ControlPlaneFuture<'a, Option<String>> {
        Box::pin(async move {
            let output = self
                .ec2
                .get_password_data()
                .instance_id(instance_id)
                .send()
                .await
                .map_err(|err| sdk_error("GetPasswordData", &err))?;
            Ok(output
                .password_data()
                .map(str::trim)
                .filter(|data| !data.is_empty())
                .map(str::to_owned))
        })
    }

    fn create_tags<'a>(
        &'a self,
        resource_id: &'a str,
        tags: &'a Tags,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .create_tags()
                .resources(resource_id)
                .set_tags(Some(sdk_tags(tags)))
                .send()
                .await
                .map_err(|err| sdk_error("CreateTags", &err))?;
            Ok(())
        })
    }

    fn create_security_group<'a>(
        &'a self,
        name: &'a str,
        description: &'a str,
        vpc_id: &'a str,
    ) -> ControlPlaneFuture<'a, String> {
        Box::pin(async move {
            let output = self
                .ec2
                .create_security_group()
                .group_name(name)
                .description(description)
                .vpc_id(vpc_id)
                .send()
                .await
                .map_err(|err| sdk_error("CreateSecurityGroup", &err))?;
            output
                .group_id()
                .map(str::to_owned)
                .ok_or_else(|| missing("CreateSecurityGroup", "group id"))
        })
    }

    fn authorize_security_group<'a>(
        &'a self,
        group_id: &'a str,
        direction: Direction,
        permission: &'a Permission,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            let rule = ip_permission(permission);
            match direction {
                Direction::Ingress => {
                    self.ec2
                        .authorize_security_group_ingress()
                        .group_id(group_id)
                        .ip_permissions(rule)
                        .send()
                        .await
                        .map_err(|err| sdk_error("AuthorizeSecurityGroupIngress", &err))?;
                }
                Direction::Egress => {
                    self.ec2
                        .authorize_security_group_egress()
                        .group_id(group_id)
                        .ip_permissions(rule)
                        .send()
                        .await
                        .map_err(|err| sdk_error("AuthorizeSecurityGroupEgress", &err))?;
                }
            }
            Ok(())
        })
    }

    fn describe_security_groups<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<SecurityGroupRecord>> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_security_groups()
                .set_filters(sdk_filters(filters))
                .send()
                .await
                .map_err(|err| sdk_error("DescribeSecurityGroups", &err))?;
            Ok(output
                .security_groups()
                .iter()
                .map(|group| SecurityGroupRecord {
                    id: group.group_id().unwrap_or_default().to_owned(),
                    name: group.group_name().unwrap_or_default().to_owned(),
                })
                .collect())
        })
    }

    fn delete_security_group<'a>(&'a self, group_id: &'a str) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .delete_security_group()
                .group_id(group_id)
                .send()
                .await
                .map_err(|err| sdk_error("DeleteSecurityGroup", &err))?;
            Ok(())
        })
    }

    fn create_internet_gateway(&self) -> ControlPlaneFuture<'_, String> {
        Box::pin(async move {
            let output = self
                .ec2
                .create_internet_gateway()
                .send()
                .await
                .map_err(|err| sdk_error("CreateInternetGateway", &err))?;
            output
                .internet_gateway()
                .and_then(types::InternetGateway::internet_gateway_id)
                .map(str::to_owned)
                .ok_or_else(|| missing("CreateInternetGateway", "gateway id"))
        })
    }

    fn describe_internet_gateways<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<String>> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_internet_gateways()
                .set_filters(sdk_filters(filters))
                .send()
                .await
                .map_err(|err| sdk_error("DescribeInternetGateways", &err))?;
            Ok(output
                .internet_gateways()
                .iter()
                .filter_map(types::InternetGateway::internet_gateway_id)
                .map(str::to_owned)
                .collect())
        })
    }

    fn attach_internet_gateway<'a>(
        &'a self,
        gateway_id: &'a str,
        vpc_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .attach_internet_gateway()
                .internet_gateway_id(gateway_id)
                .vpc_id(vpc_id)
                .send()
                .await
                .map_err(|err| sdk_error("AttachInternetGateway", &err))?;
            Ok(())
        })
    }

    fn detach_internet_gateway<'a>(
        &'a self,
        gateway_id: &'a str,
        vpc_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .detach_internet_gateway()
                .internet_gateway_id(gateway_id)
                .vpc_id(vpc_id)
                .send()
                .await
                .map_err(|err| sdk_error("DetachInternetGateway", &err))?;
            Ok(())
        })
    }

    fn delete_internet_gateway<'a>(&'a self, gateway_id: &'a str) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .delete_internet_gateway()
                .internet_gateway_id(gateway_id)
                .send()
                .await
                .map_err(|err| sdk_error("DeleteInternetGateway", &err))?;
            Ok(())
        })
    }

    fn create_vpc<'a>(&'a self, cidr_block: &'a str) -> ControlPlaneFuture<'a, String> {
        Box::pin(async move {
            let output = self
                .ec2
                .create_vpc()
                .cidr_block(cidr_block)
                .send()
                .await
                .map_err(|err| sdk_error("CreateVpc", &err))?;
            output
                .vpc()
                .and_then(types::Vpc::vpc_id)
                .map(str::to_owned)
                .ok_or_else(|| missing("CreateVpc", "VPC id"))
        })
    }

    fn describe_vpcs<'a>(
        &'a self,
        filters: &'a [Filter],
        vpc_ids: &'a [String],
    ) -> ControlPlaneFuture<'a, Vec<VpcRecord>> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_vpcs()
                .set_filters(sdk_filters(filters))
                .set_vpc_ids(non_empty(vpc_ids))
                .send()
                .await
                .map_err(|err| sdk_error("DescribeVpcs", &err))?;
            Ok(output
                .vpcs()
                .iter()
                .map(|vpc| VpcRecord {
                    id: vpc.vpc_id().unwrap_or_default().to_owned(),
                    state: vpc
                        .state()
                        .map(|state| state.as_str().to_owned())
                        .unwrap_or_default(),
                })
                .collect())
        })
    }

    fn enable_vpc_attribute<'a>(
        &'a self,
        vpc_id: &'a str,
        attribute: VpcAttribute,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            let request = self.ec2.modify_vpc_attribute().vpc_id(vpc_id);
            let toggled = match attribute {
                VpcAttribute::DnsHostnames => request.enable_dns_hostnames(enabled()),
                VpcAttribute::DnsSupport => request.enable_dns_support(enabled()),
            };
            toggled
                .send()
                .await
                .map_err(|err| sdk_error("ModifyVpcAttribute", &err))?;
            Ok(())
        })
    }

    fn associate_dhcp_options<'a>(
        &'a self,
        dhcp_options_id: &'a str,
        vpc_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .associate_dhcp_options()
                .dhcp_options_id(dhcp_options_id)
                .vpc_id(vpc_id)
                .send()
                .await
                .map_err(|err| sdk_error("AssociateDhcpOptions", &err))?;
            Ok(())
        })
    }

    fn delete_vpc<'a>(&'a self, vpc_id: &'a str) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .delete_vpc()
                .vpc_id(vpc_id)
                .send()
                .await
                .map_err(|err| sdk_error("DeleteVpc", &err))?;
            Ok(())
        })
    }

    fn create_subnet<'a>(
        &'a self,
        vpc_id: &'a str,
        cidr_block: &'a str,
        availability_zone: Option<&'a str>,
    ) -> ControlPlaneFuture<'a, String> {
        Box::pin(async move {
            let output = self
                .ec2
                .create_subnet()
                .vpc_id(vpc_id)
                .cidr_block(cidr_block)
                .set_availability_zone(availability_zone.map(str::to_owned))
                .send()
                .await
                .map_err(|err| sdk_error("CreateSubnet", &err))?;
            output
                .subnet()
                .and_then(types::Subnet::subnet_id)
                .map(str::to_owned)
                .ok_or_else(|| missing("CreateSubnet", "subnet id"))
        })
    }

    fn describe_subnets<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<String>> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_subnets()
                .set_filters(sdk_filters(filters))
                .send()
                .await
                .map_err(|err| sdk_error("DescribeSubnets", &err))?;
            Ok(output
                .subnets()
                .iter()
                .filter_map(types::Subnet::subnet_id)
                .map(str::to_owned)
                .collect())
        })
    }

    fn delete_subnet<'a>(&'a self, subnet_id: &'a str) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .delete_subnet()
                .subnet_id(subnet_id)
                .send()
                .await
                .map_err(|err| sdk_error("DeleteSubnet", &err))?;
            Ok(())
        })
    }

    fn describe_route_tables<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<RouteTableRecord>> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_route_tables()
                .set_filters(sdk_filters(filters))
                .send()
                .await
                .map_err(|err| sdk_error("DescribeRouteTables", &err))?;
            Ok(output
                .route_tables()
                .iter()
                .map(|table| RouteTableRecord {
                    id: table.route_table_id().unwrap_or_default().to_owned(),
                    associations: table
                        .associations()
                        .iter()
                        .map(|association| RouteTableAssociation {
                            id: association
                                .route_table_association_id()
                                .unwrap_or_default()
                                .to_owned(),
                            main: association.main().unwrap_or(false),
                            subnet_id: association.subnet_id().map(str::to_owned),
                        })
                        .collect(),
                })
                .collect())
        })
    }

    fn create_route<'a>(
        &'a self,
        route_table_id: &'a str,
        destination_cidr: &'a str,
        gateway_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .create_route()
                .route_table_id(route_table_id)
                .destination_cidr_block(destination_cidr)
                .gateway_id(gateway_id)
                .send()
                .await
                .map_err(|err| sdk_error("CreateRoute", &err))?;
            Ok(())
        })
    }

    fn associate_route_table<'a>(
        &'a self,
        route_table_id: &'a str,
        subnet_id: &'a str,
    ) -> ControlPlaneFuture<'a, String> {
        Box::pin(async move {
            let output = self
                .ec2
                .associate_route_table()
                .route_table_id(route_table_id)
                .subnet_id(subnet_id)
                .send()
                .await
                .map_err(|err| sdk_error("AssociateRouteTable", &err))?;
            output
                .association_id()
                .map(str::to_owned)
                .ok_or_else(|| missing("AssociateRouteTable", "association id"))
        })
    }

    fn disassociate_route_table<'a>(
        &'a self,
        association_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .disassociate_route_table()
                .association_id(association_id)
                .send()
                .await
                .map_err(|err| sdk_error("DisassociateRouteTable", &err))?;
            Ok(())
        })
    }

    fn delete_route_table<'a>(&'a self, route_table_id: &'a str) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .delete_route_table()
                .route_table_id(route_table_id)
                .send()
                .await
                .map_err(|err| sdk_error("DeleteRouteTable", &err))?;
            Ok(())
        })
    }

    fn describe_vpc_endpoints<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<String>> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_vpc_endpoints()
                .set_filters(sdk_filters(filters))
                .send()
                .await
                .map_err(|err| sdk_error("DescribeVpcEndpoints", &err))?;
            Ok(output
                .vpc_endpoints()
                .iter()
                .filter_map(types::VpcEndpoint::vpc_endpoint_id)
                .map(str::to_owned)
                .collect())
        })
    }

    fn delete_vpc_endpoints<'a>(
        &'a self,
        endpoint_ids: &'a [String],
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .delete_vpc_endpoints()
                .set_vpc_endpoint_ids(Some(endpoint_ids.to_vec()))
                .send()
                .await
                .map_err(|err| sdk_error("DeleteVpcEndpoints", &err))?;
            Ok(())
        })
    }

    fn describe_vpc_peering_connections<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<String>> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_vpc_peering_connections()
                .set_filters(sdk_filters(filters))
                .send()
                .await
                .map_err(|err| sdk_error("DescribeVpcPeeringConnections", &err))?;
            Ok(output
                .vpc_peering_connections()
                .iter()
                .filter_map(types::VpcPeeringConnection::vpc_peering_connection_id)
                .map(str::to_owned)
                .collect())
        })
    }

    fn delete_vpc_peering_connection<'a>(
        &'a self,
        peering_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .delete_vpc_peering_connection()
                .vpc_peering_connection_id(peering_id)
                .send()
                .await
                .map_err(|err| sdk_error("DeleteVpcPeeringConnection", &err))?;
            Ok(())
        })
    }

    fn describe_network_acls<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<NetworkAclRecord>> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_network_acls()
                .set_filters(sdk_filters(filters))
                .send()
                .await
                .map_err(|err| sdk_error("DescribeNetworkAcls", &err))?;
            Ok(output
                .network_acls()
                .iter()
                .map(|acl| NetworkAclRecord {
                    id: acl.network_acl_id().unwrap_or_default().to_owned(),
                    is_default: acl.is_default().unwrap_or(false),
                })
                .collect())
        })
    }

    fn delete_network_acl<'a>(&'a self, acl_id: &'a str) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .delete_network_acl()
                .network_acl_id(acl_id)
                .send()
                .await
                .map_err(|err| sdk_error("DeleteNetworkAcl", &err))?;
            Ok(())
        })
    }

    fn describe_network_interfaces<'a>(
        &'a self,
        filters: &'a [Filter],
    ) -> ControlPlaneFuture<'a, Vec<String>> {
        Box::pin(async move {
            let output = self
                .ec2
                .describe_network_interfaces()
                .set_filters(sdk_filters(filters))
                .send()
                .await
                .map_err(|err| sdk_error("DescribeNetworkInterfaces", &err))?;
            Ok(output
                .network_interfaces()
                .iter()
                .filter_map(types::NetworkInterface::network_interface_id)
                .map(str::to_owned)
                .collect())
        })
    }

    fn delete_network_interface<'a>(
        &'a self,
        interface_id: &'a str,
    ) -> ControlPlaneFuture<'a, ()> {
        Box::pin(async move {
            self.ec2
                .delete_network_interface()
                .network_interface_id(interface_id)
                .send()
                .await
                .map_err(|err| sdk_error("DeleteNetworkInterface", &err))?;
            Ok(())
        })
    }
}
