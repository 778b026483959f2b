//! BDD step definitions for VPC teardown.

use std::sync::Arc;

use octo_infra::models::VpcTeardown;
use octo_infra::test_support::instant_timings;
use octo_infra::{Network, StageReport, TeardownReport};
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::{TeardownContext, populate};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

fn run_teardown(context: &TeardownContext, teardown: &VpcTeardown) -> TeardownReport {
    let runtime = tokio::runtime::Runtime::new()
        .unwrap_or_else(|err| panic!("runtime should start: {err}"));
    let network = Network::new(Arc::clone(&context.plane), instant_timings());
    runtime
        .block_on(network.destroy_vpc(teardown))
        .unwrap_or_else(|err| panic!("teardown should run: {err}"))
}

fn report(context: &TeardownContext) -> Result<&TeardownReport, StepError> {
    context
        .report
        .as_ref()
        .ok_or_else(|| StepError::Assertion(String::from("teardown has not run")))
}

fn stage<'a>(context: &'a TeardownContext, label: &str) -> Result<&'a StageReport, StepError> {
    report(context)?
        .stages
        .iter()
        .find(|stage| stage.stage.label() == label)
        .ok_or_else(|| StepError::Assertion(format!("stage {label} did not run")))
}

#[given("a populated VPC \"{vpc_id}\"")]
fn populated_vpc(teardown_context: TeardownContext, vpc_id: String) -> TeardownContext {
    populate(&teardown_context.plane, &vpc_id);
    teardown_context
}

#[given("deleting security group \"{group_id}\" fails")]
fn security_group_fails(teardown_context: TeardownContext, group_id: String) -> TeardownContext {
    teardown_context
        .plane
        .fail_call("DeleteSecurityGroup", &group_id);
    teardown_context
}

#[when("I tear down VPC \"{vpc_id}\"")]
fn tear_down(mut teardown_context: TeardownContext, vpc_id: String) -> TeardownContext {
    let report = run_teardown(&teardown_context, &VpcTeardown::new(vpc_id));
    teardown_context.report = Some(report);
    teardown_context
}

#[when("I tear down VPC \"{vpc_id}\" without cleanup")]
fn tear_down_without_cleanup(
    mut teardown_context: TeardownContext,
    vpc_id: String,
) -> TeardownContext {
    let teardown = VpcTeardown::new(vpc_id).full_cleanup(false);
    let report = run_teardown(&teardown_context, &teardown);
    teardown_context.report = Some(report);
    teardown_context
}

#[then("every teardown stage is clean")]
fn every_stage_clean(teardown_context: &TeardownContext) -> Result<(), StepError> {
    let report = report(teardown_context)?;
    if report.is_complete() {
        Ok(())
    } else {
        let failures: Vec<_> = report
            .failures()
            .map(|(stage, failure)| format!("{stage}: {}", failure.resource))
            .collect();
        Err(StepError::Assertion(format!("unexpected failures: {failures:?}")))
    }
}

#[then("the VPC \"{vpc_id}\" no longer exists")]
fn vpc_gone(teardown_context: &TeardownContext, vpc_id: String) -> Result<(), StepError> {
    if teardown_context.plane.has_vpc(&vpc_id) {
        return Err(StepError::Assertion(format!("{vpc_id} still exists")));
    }
    if report(teardown_context)?.vpc_deleted() {
        Ok(())
    } else {
        Err(StepError::Assertion(String::from(
            "report does not record the VPC deletion",
        )))
    }
}

#[then("the VPC \"{vpc_id}\" still exists")]
fn vpc_remains(teardown_context: &TeardownContext, vpc_id: String) -> Result<(), StepError> {
    if teardown_context.plane.has_vpc(&vpc_id) && !report(teardown_context)?.vpc_deleted() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!("{vpc_id} was deleted")))
    }
}

#[then("the keypair \"{name}\" was deleted with its instance")]
fn keypair_deleted(teardown_context: &TeardownContext, name: String) -> Result<(), StepError> {
    if teardown_context.plane.has_key_pair(&name) {
        Err(StepError::Assertion(format!("keypair {name} survived")))
    } else {
        Ok(())
    }
}

#[then("the \"{label}\" stage reports {count:u32} failure")]
fn stage_failures(
    teardown_context: &TeardownContext,
    label: String,
    count: u32,
) -> Result<(), StepError> {
    let failed = stage(teardown_context, &label)?.failed.len();
    if failed == count as usize {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} failures in {label}, got {failed}"
        )))
    }
}

#[then("the \"{label}\" stage removed {count:u32} resources")]
fn stage_successes(
    teardown_context: &TeardownContext,
    label: String,
    count: u32,
) -> Result<(), StepError> {
    let removed = stage(teardown_context, &label)?.succeeded.len();
    if removed == count as usize {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} removals in {label}, got {removed}"
        )))
    }
}

#[then("only the \"{first}\" and \"{last}\" stages ran")]
fn only_stages(
    teardown_context: &TeardownContext,
    first: String,
    last: String,
) -> Result<(), StepError> {
    let labels: Vec<_> = report(teardown_context)?
        .stages
        .iter()
        .map(|stage| stage.stage.label())
        .collect();
    if labels == [first.as_str(), last.as_str()] {
        Ok(())
    } else {
        Err(StepError::Assertion(format!("stages ran: {labels:?}")))
    }
}
