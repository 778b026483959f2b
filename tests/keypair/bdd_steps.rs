//! BDD step definitions for keypair creation.

use std::sync::Arc;

use octo_infra::models::{ExistsPolicy, KeypairHandle, KeypairSpec};
use octo_infra::test_support::instant_timings;
use octo_infra::{Ec2, InfraError};
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::KeypairContext;

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

fn policy(label: &str) -> ExistsPolicy {
    match label.trim() {
        "reuse" => ExistsPolicy::Reuse,
        "replace" => ExistsPolicy::Replace,
        "fail" => ExistsPolicy::Fail,
        other => panic!("unknown exists policy {other}"),
    }
}

fn created(keypair_context: &KeypairContext) -> Result<&KeypairHandle, StepError> {
    match keypair_context.outcome.as_ref() {
        Some(Ok(handle)) => Ok(handle),
        Some(Err(err)) => Err(StepError::Assertion(format!("creation failed: {err}"))),
        None => Err(StepError::Assertion(String::from("creation has not run"))),
    }
}

#[given("no keypair named \"{name}\"")]
fn no_keypair(keypair_context: KeypairContext, name: String) -> KeypairContext {
    assert!(!keypair_context.plane.has_key_pair(&name));
    keypair_context
}

#[given("an existing keypair named \"{name}\"")]
fn existing_keypair(mut keypair_context: KeypairContext, name: String) -> KeypairContext {
    keypair_context.existing_id = Some(keypair_context.plane.add_key_pair(&name));
    keypair_context
}

#[when("I create keypair \"{name}\" with policy \"{label}\"")]
fn create_keypair(
    mut keypair_context: KeypairContext,
    name: String,
    label: String,
) -> KeypairContext {
    let spec = KeypairSpec::builder(name)
        .private_key_path(keypair_context.key_path.clone())
        .exists_policy(policy(&label))
        .build()
        .unwrap_or_else(|err| panic!("keypair spec should build: {err}"));
    let runtime = tokio::runtime::Runtime::new()
        .unwrap_or_else(|err| panic!("runtime should start: {err}"));
    let ec2 = Ec2::new(Arc::clone(&keypair_context.plane), instant_timings());
    keypair_context.outcome = Some(runtime.block_on(ec2.create_keypair(&spec)));
    keypair_context
}

#[then("the keypair \"{name}\" exists")]
fn keypair_exists(keypair_context: &KeypairContext, name: String) -> Result<(), StepError> {
    let handle = created(keypair_context)?;
    if handle.name == name && keypair_context.plane.has_key_pair(&name) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!("keypair {name} missing, got {handle:?}")))
    }
}

#[then("the private key file holds RSA material")]
fn key_file_written(keypair_context: &KeypairContext) -> Result<(), StepError> {
    let contents = std::fs::read_to_string(&keypair_context.key_path).map_err(|err| {
        StepError::Assertion(format!("read {}: {err}", keypair_context.key_path))
    })?;
    if contents.contains("BEGIN RSA PRIVATE KEY") {
        Ok(())
    } else {
        Err(StepError::Assertion(format!("unexpected key file: {contents}")))
    }
}

#[then("no private key file was written")]
fn key_file_absent(keypair_context: &KeypairContext) -> Result<(), StepError> {
    if keypair_context.key_path.exists() {
        Err(StepError::Assertion(String::from("reused keypair wrote a key file")))
    } else {
        Ok(())
    }
}

#[then("the existing keypair identifier is returned")]
fn same_identifier(keypair_context: &KeypairContext) -> Result<(), StepError> {
    let handle = created(keypair_context)?;
    if keypair_context.existing_id.as_deref() == Some(handle.id.as_str()) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {:?}, got {}",
            keypair_context.existing_id, handle.id
        )))
    }
}

#[then("a new keypair identifier is returned")]
fn new_identifier(keypair_context: &KeypairContext) -> Result<(), StepError> {
    let handle = created(keypair_context)?;
    if keypair_context.existing_id.as_deref() == Some(handle.id.as_str()) {
        Err(StepError::Assertion(format!("identifier {} was reused", handle.id)))
    } else {
        Ok(())
    }
}

#[then("creation fails because the keypair already exists")]
fn creation_refused(keypair_context: &KeypairContext) -> Result<(), StepError> {
    match keypair_context.outcome.as_ref() {
        Some(Err(InfraError::AlreadyExists { .. })) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected an already-exists error, got {other:?}"
        ))),
    }
}
