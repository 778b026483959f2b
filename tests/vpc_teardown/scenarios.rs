//! BDD scenarios for VPC teardown.

use rstest_bdd_macros::scenario;

use super::test_helpers::{TeardownContext, teardown_context};

#[scenario(
    path = "tests/features/vpc_teardown.feature",
    name = "Remove a populated VPC"
)]
fn scenario_remove_populated_vpc(teardown_context: TeardownContext) {
    drop(teardown_context);
}

#[scenario(
    path = "tests/features/vpc_teardown.feature",
    name = "Record a stuck security group and keep going"
)]
fn scenario_stuck_security_group(teardown_context: TeardownContext) {
    drop(teardown_context);
}

#[scenario(
    path = "tests/features/vpc_teardown.feature",
    name = "Skip dependent cleanup when asked"
)]
fn scenario_skip_cleanup(teardown_context: TeardownContext) {
    drop(teardown_context);
}
