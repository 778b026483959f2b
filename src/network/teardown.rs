//! Ordered, best-effort VPC teardown.
//!
//! Dependent resources are removed in a fixed stage order before the VPC
//! itself. A failing item or listing is recorded in the [`TeardownReport`]
//! and the remaining stages still run.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::control_plane::{ControlPlaneError, Ec2Api, Filter};
use crate::ec2::Ec2;
use crate::error::{InfraError, InfraResult};
use crate::models::{InstanceTeardown, VpcTeardown, require};

use super::{DEFAULT_DHCP_OPTIONS, Network};

const TERMINATED: &str = "terminated";
const DEFAULT_GROUP_NAME: &str = "default";

/// Teardown stages in execution order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TeardownStage {
    /// Re-associate the default DHCP option set.
    DhcpOptions,
    /// Destroy every instance in every subnet, with its keypair.
    Instances,
    /// Detach and delete attached internet gateways.
    InternetGateways,
    /// Remove non-main associations and emptied route tables.
    RouteTables,
    /// Delete VPC endpoints.
    Endpoints,
    /// Delete every security group except `default`.
    SecurityGroups,
    /// Delete peering connections requested by the VPC.
    PeeringConnections,
    /// Delete non-default network ACLs.
    NetworkAcls,
    /// Delete network interfaces, then subnets.
    Subnets,
    /// Delete the VPC.
    Vpc,
}

impl TeardownStage {
    /// Dependent-resource stages run when full cleanup is requested.
    pub const CLEANUP: [Self; 8] = [
        Self::Instances,
        Self::InternetGateways,
        Self::RouteTables,
        Self::Endpoints,
        Self::SecurityGroups,
        Self::PeeringConnections,
        Self::NetworkAcls,
        Self::Subnets,
    ];

    /// Short stage label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DhcpOptions => "dhcp-options",
            Self::Instances => "instances",
            Self::InternetGateways => "internet-gateways",
            Self::RouteTables => "route-tables",
            Self::Endpoints => "endpoints",
            Self::SecurityGroups => "security-groups",
            Self::PeeringConnections => "peering-connections",
            Self::NetworkAcls => "network-acls",
            Self::Subnets => "subnets",
            Self::Vpc => "vpc",
        }
    }
}

impl fmt::Display for TeardownStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Resource that could not be removed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TeardownFailure {
    /// Identifier of the resource, or of the scope whose listing failed.
    pub resource: String,
    /// Error returned for the resource.
    pub error: InfraError,
}

/// Outcome of one stage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StageReport {
    /// Stage the outcome belongs to.
    pub stage: TeardownStage,
    /// Resources removed.
    pub succeeded: Vec<String>,
    /// Resources that could not be removed.
    pub failed: Vec<TeardownFailure>,
}

impl StageReport {
    const fn new(stage: TeardownStage) -> Self {
        Self {
            stage,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    fn record(&mut self, resource: &str, outcome: InfraResult<()>) {
        match outcome {
            Ok(()) => self.succeeded.push(resource.to_owned()),
            Err(err) => {
                warn!(stage = %self.stage, resource, error = %err, "teardown step failed");
                self.failed.push(TeardownFailure {
                    resource: resource.to_owned(),
                    error: err,
                });
            }
        }
    }

    /// Returns `true` when nothing failed in the stage.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Per-stage outcome of a VPC teardown.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TeardownReport {
    /// VPC that was torn down.
    pub vpc_id: String,
    /// Stage outcomes in execution order.
    pub stages: Vec<StageReport>,
}

impl TeardownReport {
    /// Outcome of `stage`, when it ran.
    #[must_use]
    pub fn stage(&self, stage: TeardownStage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    /// Every failure across stages.
    pub fn failures(&self) -> impl Iterator<Item = (TeardownStage, &TeardownFailure)> {
        self.stages
            .iter()
            .flat_map(|report| report.failed.iter().map(move |failure| (report.stage, failure)))
    }

    /// Returns `true` when every stage ran without failures.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stages.iter().all(StageReport::is_clean)
    }

    /// Returns `true` when the VPC itself was deleted.
    #[must_use]
    pub fn vpc_deleted(&self) -> bool {
        self.stage(TeardownStage::Vpc)
            .is_some_and(|report| report.succeeded.iter().any(|id| id == &self.vpc_id))
    }
}

async fn listed<T>(
    report: &mut StageReport,
    scope: &str,
    listing: impl Future<Output = Result<Vec<T>, ControlPlaneError>>,
) -> Vec<T> {
    match listing.await {
        Ok(items) => items,
        Err(err) => {
            report.record(scope, Err(InfraError::from(err)));
            Vec::new()
        }
    }
}

impl<C: Ec2Api> Network<C> {
    /// Tears down a VPC and, with full cleanup, everything inside it.
    ///
    /// Failures do not stop the teardown; inspect the returned report to see
    /// which resources remain.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when the VPC id is empty.
    pub async fn destroy_vpc(&self, teardown: &VpcTeardown) -> InfraResult<TeardownReport> {
        require(&teardown.vpc_id, "vpc_id")?;
        let vpc_id = teardown.vpc_id.as_str();
        info!(vpc_id, full_cleanup = teardown.full_cleanup, "vpc teardown started");

        let mut stages = Vec::with_capacity(TeardownStage::CLEANUP.len() + 2);
        stages.push(self.reset_dhcp_options(vpc_id).await);
        if teardown.full_cleanup {
            for stage in TeardownStage::CLEANUP {
                stages.push(self.run_stage(stage, vpc_id).await);
            }
        }
        let mut vpc_stage = StageReport::new(TeardownStage::Vpc);
        let outcome = self
            .control_plane
            .delete_vpc(vpc_id)
            .await
            .map_err(InfraError::from);
        vpc_stage.record(vpc_id, outcome);
        stages.push(vpc_stage);

        let report = TeardownReport {
            vpc_id: vpc_id.to_owned(),
            stages,
        };
        if report.is_complete() {
            info!(vpc_id, "vpc teardown finished");
        } else {
            error!(vpc_id, failures = report.failures().count(), "vpc teardown left resources behind");
        }
        Ok(report)
    }

    async fn run_stage(&self, stage: TeardownStage, vpc_id: &str) -> StageReport {
        info!(vpc_id, %stage, "teardown stage started");
        let mut report = StageReport::new(stage);
        match stage {
            TeardownStage::Instances => self.remove_instances(vpc_id, &mut report).await,
            TeardownStage::InternetGateways => self.remove_gateways(vpc_id, &mut report).await,
            TeardownStage::RouteTables => self.remove_route_tables(vpc_id, &mut report).await,
            TeardownStage::Endpoints => self.remove_endpoints(vpc_id, &mut report).await,
            TeardownStage::SecurityGroups => {
                self.remove_security_groups(vpc_id, &mut report).await;
            }
            TeardownStage::PeeringConnections => self.remove_peerings(vpc_id, &mut report).await,
            TeardownStage::NetworkAcls => self.remove_network_acls(vpc_id, &mut report).await,
            TeardownStage::Subnets => self.remove_subnets(vpc_id, &mut report).await,
            TeardownStage::DhcpOptions | TeardownStage::Vpc => {}
        }
        report
    }

    async fn reset_dhcp_options(&self, vpc_id: &str) -> StageReport {
        let mut report = StageReport::new(TeardownStage::DhcpOptions);
        let outcome = self
            .control_plane
            .associate_dhcp_options(DEFAULT_DHCP_OPTIONS, vpc_id)
            .await
            .map_err(InfraError::from);
        report.record(vpc_id, outcome);
        report
    }

    async fn vpc_subnets(&self, vpc_id: &str, report: &mut StageReport) -> Vec<String> {
        let filters = [Filter::single("vpc-id", vpc_id)];
        listed(report, vpc_id, self.control_plane.describe_subnets(&filters)).await
    }

    async fn remove_instances(&self, vpc_id: &str, report: &mut StageReport) {
        let mut instance_ids = Vec::new();
        for subnet_id in self.vpc_subnets(vpc_id, report).await {
            let filters = [Filter::single("subnet-id", subnet_id.as_str())];
            let instances = listed(
                report,
                &subnet_id,
                self.control_plane.describe_instances(&filters, &[]),
            )
            .await;
            instance_ids.extend(
                instances
                    .into_iter()
                    .filter(|instance| instance.state != TERMINATED)
                    .map(|instance| instance.id),
            );
        }

        let ec2 = Ec2::new(Arc::clone(&self.control_plane), self.timings);
        let outcomes: Vec<(String, InfraResult<()>)> = stream::iter(instance_ids)
            .map(|instance_id| {
                let ec2 = &ec2;
                async move {
                    let outcome = ec2
                        .destroy_instance(&InstanceTeardown::new(instance_id.as_str()))
                        .await;
                    (instance_id, outcome)
                }
            })
            .buffer_unordered(self.timings.teardown_concurrency.max(1))
            .collect()
            .await;
        for (instance_id, outcome) in outcomes {
            report.record(&instance_id, outcome);
        }
    }

    async fn remove_gateways(&self, vpc_id: &str, report: &mut StageReport) {
        let filters = [Filter::single("attachment.vpc-id", vpc_id)];
        let gateways = listed(
            report,
            vpc_id,
            self.control_plane.describe_internet_gateways(&filters),
        )
        .await;
        for gateway_id in gateways {
            let outcome = async {
                self.control_plane
                    .detach_internet_gateway(&gateway_id, vpc_id)
                    .await?;
                self.control_plane.delete_internet_gateway(&gateway_id).await
            }
            .await
            .map_err(InfraError::from);
            report.record(&gateway_id, outcome);
        }
    }

    async fn remove_route_tables(&self, vpc_id: &str, report: &mut StageReport) {
        let filters = [Filter::single("vpc-id", vpc_id)];
        let tables = listed(
            report,
            vpc_id,
            self.control_plane.describe_route_tables(&filters),
        )
        .await;
        for table in tables {
            let mut remaining = 0_usize;
            for association in &table.associations {
                if association.main {
                    remaining += 1;
                    continue;
                }
                let outcome = self
                    .control_plane
                    .disassociate_route_table(&association.id)
                    .await
                    .map_err(InfraError::from);
                if outcome.is_err() {
                    remaining += 1;
                }
                report.record(&association.id, outcome);
            }
            if remaining == 0 {
                let outcome = self
                    .control_plane
                    .delete_route_table(&table.id)
                    .await
                    .map_err(InfraError::from);
                report.record(&table.id, outcome);
            }
        }
    }

    async fn remove_endpoints(&self, vpc_id: &str, report: &mut StageReport) {
        let filters = [Filter::single("vpc-id", vpc_id)];
        let endpoints = listed(
            report,
            vpc_id,
            self.control_plane.describe_vpc_endpoints(&filters),
        )
        .await;
        for endpoint_id in endpoints {
            let outcome = self
                .control_plane
                .delete_vpc_endpoints(std::slice::from_ref(&endpoint_id))
                .await
                .map_err(InfraError::from);
            report.record(&endpoint_id, outcome);
        }
    }

    async fn remove_security_groups(&self, vpc_id: &str, report: &mut StageReport) {
        let filters = [Filter::single("vpc-id", vpc_id)];
        let groups = listed(
            report,
            vpc_id,
            self.control_plane.describe_security_groups(&filters),
        )
        .await;
        for group in groups {
            if group.name == DEFAULT_GROUP_NAME {
                continue;
            }
            let outcome = self
                .control_plane
                .delete_security_group(&group.id)
                .await
                .map_err(InfraError::from);
            report.record(&group.id, outcome);
        }
    }

    async fn remove_peerings(&self, vpc_id: &str, report: &mut StageReport) {
        let filters = [Filter::single("requester-vpc-info.vpc-id", vpc_id)];
        let peerings = listed(
            report,
            vpc_id,
            self.control_plane.describe_vpc_peering_connections(&filters),
        )
        .await;
        for peering_id in peerings {
            let outcome = self
                .control_plane
                .delete_vpc_peering_connection(&peering_id)
                .await
                .map_err(InfraError::from);
            report.record(&peering_id, outcome);
        }
    }

    async fn remove_network_acls(&self, vpc_id: &str, report: &mut StageReport) {
        let filters = [Filter::single("vpc-id", vpc_id)];
        let acls = listed(report, vpc_id, self.control_plane.describe_network_acls(&filters)).await;
        for acl in acls {
            if acl.is_default {
                continue;
            }
            let outcome = self
                .control_plane
                .delete_network_acl(&acl.id)
                .await
                .map_err(InfraError::from);
            report.record(&acl.id, outcome);
        }
    }

    async fn remove_subnets(&self, vpc_id: &str, report: &mut StageReport) {
        for subnet_id in self.vpc_subnets(vpc_id, report).await {
            let filters = [Filter::single("subnet-id", subnet_id.as_str())];
            let interfaces = listed(
                report,
                &subnet_id,
                self.control_plane.describe_network_interfaces(&filters),
            )
            .await;
            for interface_id in interfaces {
                let outcome = self
                    .control_plane
                    .delete_network_interface(&interface_id)
                    .await
                    .map_err(InfraError::from);
                report.record(&interface_id, outcome);
            }
            let outcome = self
                .control_plane
                .delete_subnet(&subnet_id)
                .await
                .map_err(InfraError::from);
            report.record(&subnet_id, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeControlPlane, instant_timings};
    use rstest::{fixture, rstest};

    #[fixture]
    fn populated() -> Arc<FakeControlPlane> {
        let plane = Arc::new(FakeControlPlane::new());
        plane.add_vpc("vpc-1");
        plane.add_subnet("vpc-1", "subnet-a");
        plane.add_subnet("vpc-1", "subnet-b");
        let _existing_key = plane.add_key_pair("kp-a");
        plane.add_instance("subnet-a", "i-a", Some("kp-a"));
        plane.add_instance("subnet-b", "i-b", None);
        plane.add_internet_gateway("igw-1", Some("vpc-1"));
        plane.add_route_table(
            "vpc-1",
            "rtb-app",
            &[("rtbassoc-a", false, Some("subnet-a"))],
        );
        plane.add_security_group("vpc-1", "sg-app", "app");
        plane.add_vpc_endpoint("vpc-1", "vpce-1");
        plane.add_peering("vpc-1", "pcx-1");
        plane.add_network_acl("vpc-1", "acl-app", false);
        plane.add_network_interface("subnet-b", "eni-1");
        plane
    }

    fn network(plane: &Arc<FakeControlPlane>) -> Network<FakeControlPlane> {
        Network::new(Arc::clone(plane), instant_timings())
    }

    #[rstest]
    #[tokio::test]
    async fn full_cleanup_removes_everything(populated: Arc<FakeControlPlane>) {
        let report = network(&populated)
            .destroy_vpc(&VpcTeardown::new("vpc-1"))
            .await
            .unwrap_or_else(|err| panic!("teardown should run: {err}"));

        assert!(report.is_complete(), "{:?}", report.failures().collect::<Vec<_>>());
        assert!(report.vpc_deleted());
        assert!(!populated.has_vpc("vpc-1"));
        assert!(!populated.has_key_pair("kp-a"));
        assert_eq!(populated.dhcp_options_of("vpc-1"), None);
        assert_eq!(
            populated.calls_to("AssociateDhcpOptions"),
            vec![String::from("vpc-1")]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn stages_run_in_the_fixed_order(populated: Arc<FakeControlPlane>) {
        network(&populated)
            .destroy_vpc(&VpcTeardown::new("vpc-1"))
            .await
            .unwrap_or_else(|err| panic!("teardown should run: {err}"));

        let calls = populated.calls();
        let first = |prefix: &str| {
            calls
                .iter()
                .position(|call| call.starts_with(prefix))
                .unwrap_or_else(|| panic!("no {prefix} call"))
        };
        let last = |prefix: &str| {
            calls
                .iter()
                .rposition(|call| call.starts_with(prefix))
                .unwrap_or_else(|| panic!("no {prefix} call"))
        };
        let order = [
            ("AssociateDhcpOptions", "AssociateDhcpOptions"),
            ("TerminateInstances", "TerminateInstances"),
            ("DetachInternetGateway", "DeleteInternetGateway"),
            ("DisassociateRouteTable", "DeleteRouteTable"),
            ("DeleteVpcEndpoints", "DeleteVpcEndpoints"),
            ("DeleteSecurityGroup", "DeleteSecurityGroup"),
            ("DeleteVpcPeeringConnection", "DeleteVpcPeeringConnection"),
            ("DeleteNetworkAcl", "DeleteNetworkAcl"),
            ("DeleteNetworkInterface", "DeleteSubnet"),
            ("DeleteVpc ", "DeleteVpc "),
        ];
        for pair in order.windows(2) {
            let [(_, earlier_end), (later_start, _)] = pair else {
                continue;
            };
            assert!(
                last(*earlier_end) < first(*later_start),
                "{earlier_end} must finish before {later_start}"
            );
        }
    }

    #[rstest]
    #[tokio::test]
    async fn default_resources_are_left_to_the_vpc(populated: Arc<FakeControlPlane>) {
        network(&populated)
            .destroy_vpc(&VpcTeardown::new("vpc-1"))
            .await
            .unwrap_or_else(|err| panic!("teardown should run: {err}"));

        assert_eq!(
            populated.calls_to("DeleteSecurityGroup"),
            vec![String::from("sg-app")]
        );
        assert_eq!(
            populated.calls_to("DeleteNetworkAcl"),
            vec![String::from("acl-app")]
        );
        assert_eq!(
            populated.calls_to("DeleteRouteTable"),
            vec![String::from("rtb-app")]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn failures_are_recorded_and_later_stages_still_run(populated: Arc<FakeControlPlane>) {
        populated.fail_call("DeleteSecurityGroup", "sg-app");

        let report = network(&populated)
            .destroy_vpc(&VpcTeardown::new("vpc-1"))
            .await
            .unwrap_or_else(|err| panic!("teardown should run: {err}"));

        let failures: Vec<_> = report
            .failures()
            .map(|(stage, failure)| (stage, failure.resource.clone()))
            .collect();
        assert!(failures.contains(&(TeardownStage::SecurityGroups, String::from("sg-app"))));
        assert!(failures.contains(&(TeardownStage::Vpc, String::from("vpc-1"))));
        assert_eq!(
            report
                .stage(TeardownStage::Subnets)
                .map(|stage| stage.succeeded.clone()),
            Some(vec![
                String::from("subnet-a"),
                String::from("eni-1"),
                String::from("subnet-b"),
            ])
        );
        assert!(populated.has_vpc("vpc-1"));
    }

    #[rstest]
    #[tokio::test]
    async fn without_full_cleanup_only_the_vpc_is_deleted(populated: Arc<FakeControlPlane>) {
        let report = network(&populated)
            .destroy_vpc(&VpcTeardown::new("vpc-1").full_cleanup(false))
            .await
            .unwrap_or_else(|err| panic!("teardown should run: {err}"));

        let stages: Vec<_> = report.stages.iter().map(|stage| stage.stage).collect();
        assert_eq!(stages, vec![TeardownStage::DhcpOptions, TeardownStage::Vpc]);
        assert!(populated.calls_to("TerminateInstances").is_empty());
        assert!(!report.vpc_deleted());
    }

    #[tokio::test(start_paused = true)]
    async fn instance_teardown_runs_concurrently_within_the_bound() {
        let plane = Arc::new(FakeControlPlane::new());
        plane.add_vpc("vpc-1");
        plane.add_subnet("vpc-1", "subnet-a");
        for index in 0..8 {
            plane.add_instance("subnet-a", &format!("i-{index}"), None);
        }
        plane.set_terminate_delay(std::time::Duration::from_secs(10));
        let network = Network::new(
            Arc::clone(&plane),
            instant_timings().with_teardown_concurrency(4),
        );

        let started = tokio::time::Instant::now();
        let report = network
            .destroy_vpc(&VpcTeardown::new("vpc-1"))
            .await
            .unwrap_or_else(|err| panic!("teardown should run: {err}"));

        let elapsed = started.elapsed();
        assert!(report.is_complete());
        assert!(elapsed >= std::time::Duration::from_secs(20));
        assert!(elapsed < std::time::Duration::from_secs(30));
    }

    #[tokio::test]
    async fn empty_vpc_ids_are_rejected() {
        let plane = Arc::new(FakeControlPlane::new());
        let result = network(&plane).destroy_vpc(&VpcTeardown::new("  ")).await;
        assert_eq!(result, Err(InfraError::Validation(String::from("vpc_id"))));
        assert!(plane.calls().is_empty());
    }
}
