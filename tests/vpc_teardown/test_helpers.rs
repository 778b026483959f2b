//! Shared fixtures for VPC teardown scenarios.

use std::sync::Arc;

use octo_infra::TeardownReport;
use octo_infra::test_support::FakeControlPlane;
use rstest::fixture;

#[derive(Clone, Debug)]
pub struct TeardownContext {
    pub plane: Arc<FakeControlPlane>,
    pub report: Option<TeardownReport>,
}

#[fixture]
pub fn teardown_context() -> TeardownContext {
    TeardownContext {
        plane: Arc::new(FakeControlPlane::new()),
        report: None,
    }
}

/// Two subnets, an instance with a keypair, and one resource for every
/// other cleanup stage.
pub fn populate(plane: &FakeControlPlane, vpc_id: &str) {
    plane.add_vpc(vpc_id);
    plane.add_subnet(vpc_id, "subnet-a");
    plane.add_subnet(vpc_id, "subnet-b");
    let key_id = plane.add_key_pair("build-key");
    assert!(!key_id.is_empty(), "fake should allocate a keypair id");
    plane.add_instance("subnet-a", "i-build", Some("build-key"));
    plane.add_internet_gateway("igw-1", Some(vpc_id));
    plane.add_route_table(vpc_id, "rtb-app", &[("rtbassoc-a", false, Some("subnet-a"))]);
    plane.add_security_group(vpc_id, "sg-app", "app");
    plane.add_vpc_endpoint(vpc_id, "vpce-1");
    plane.add_peering(vpc_id, "pcx-1");
    plane.add_network_acl(vpc_id, "acl-app", false);
    plane.add_network_interface("subnet-b", "eni-1");
}
