//! BDD scenarios for object storage.

use rstest_bdd_macros::scenario;

use super::test_helpers::{ObjectsContext, objects_context};

#[scenario(
    path = "tests/features/objects.feature",
    name = "Find matching objects across listing pages"
)]
fn scenario_find_across_pages(objects_context: ObjectsContext) {
    drop(objects_context);
}

#[scenario(
    path = "tests/features/objects.feature",
    name = "List folder prefixes one level deep"
)]
fn scenario_list_folders(objects_context: ObjectsContext) {
    drop(objects_context);
}

#[scenario(path = "tests/features/objects.feature", name = "Reject an unparsable pattern")]
fn scenario_reject_pattern(objects_context: ObjectsContext) {
    drop(objects_context);
}

#[scenario(path = "tests/features/objects.feature", name = "Move a file through the bucket")]
fn scenario_move_file(objects_context: ObjectsContext) {
    drop(objects_context);
}

#[scenario(
    path = "tests/features/objects.feature",
    name = "Report a missing object as absent"
)]
fn scenario_missing_object(objects_context: ObjectsContext) {
    drop(objects_context);
}
