//! BDD scenarios for keypair creation.

use rstest_bdd_macros::scenario;

use super::test_helpers::{KeypairContext, keypair_context};

#[scenario(
    path = "tests/features/keypair.feature",
    name = "Create a fresh keypair and store its private key"
)]
fn scenario_create_fresh(keypair_context: KeypairContext) {
    drop(keypair_context);
}

#[scenario(path = "tests/features/keypair.feature", name = "Reuse an existing keypair")]
fn scenario_reuse_existing(keypair_context: KeypairContext) {
    drop(keypair_context);
}

#[scenario(path = "tests/features/keypair.feature", name = "Replace an existing keypair")]
fn scenario_replace_existing(keypair_context: KeypairContext) {
    drop(keypair_context);
}

#[scenario(path = "tests/features/keypair.feature", name = "Refuse a name collision")]
fn scenario_refuse_collision(keypair_context: KeypairContext) {
    drop(keypair_context);
}
