//! BDD step definitions for object storage.

use std::sync::Arc;

use octo_infra::models::{ObjectQuery, ObjectRef};
use octo_infra::test_support::FakeControlPlane;
use octo_infra::{InfraError, ObjectStore};
use rstest_bdd_macros::{given, then, when};

use super::test_helpers::{ObjectsContext, runtime};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

fn store(objects_context: &ObjectsContext) -> ObjectStore<FakeControlPlane> {
    ObjectStore::new(Arc::clone(&objects_context.plane))
}

#[given("the \"{bucket}\" bucket holds build outputs")]
fn build_outputs(objects_context: ObjectsContext, bucket: String) -> ObjectsContext {
    for key in [
        "builds/1/app.zip",
        "builds/1/app.log",
        "builds/2/app.zip",
        "builds/2/symbols/app.pdb",
        "readme.txt",
    ] {
        objects_context.plane.add_object(&bucket, key, key.as_bytes());
    }
    objects_context
}

#[given("listings return {size:u32} entry per page")]
fn page_size(objects_context: ObjectsContext, size: u32) -> ObjectsContext {
    objects_context.plane.set_page_size(size as usize);
    objects_context
}

#[given("a local file \"{name}\" containing \"{contents}\"")]
fn local_file(objects_context: ObjectsContext, name: String, contents: String) -> ObjectsContext {
    std::fs::write(objects_context.local(&name), contents)
        .unwrap_or_else(|err| panic!("write {name}: {err}"));
    objects_context
}

#[when("I search \"{bucket}\" under \"{prefix}\" for \"{pattern}\"")]
fn search(
    mut objects_context: ObjectsContext,
    bucket: String,
    prefix: String,
    pattern: String,
) -> ObjectsContext {
    let query = ObjectQuery::new(bucket).prefix(prefix).filter(pattern);
    let found = runtime().block_on(store(&objects_context).find_objects(&query));
    objects_context.search = Some(found);
    objects_context
}

#[when("I list the folders of \"{bucket}\" under \"{prefix}\"")]
fn list_folders(
    mut objects_context: ObjectsContext,
    bucket: String,
    prefix: String,
) -> ObjectsContext {
    let query = ObjectQuery::new(bucket).prefix(prefix).folders_only(true);
    let found = runtime().block_on(store(&objects_context).find_objects(&query));
    objects_context.search = Some(found);
    objects_context
}

#[when("I upload \"{name}\" to \"{bucket}\" as \"{key}\"")]
fn upload(
    objects_context: ObjectsContext,
    name: String,
    bucket: String,
    key: String,
) -> ObjectsContext {
    let source = objects_context.local(&name);
    runtime()
        .block_on(store(&objects_context).upload_object(&source, &ObjectRef::new(bucket, key)))
        .unwrap_or_else(|err| panic!("upload should succeed: {err}"));
    objects_context
}

#[when("I download \"{key}\" from \"{bucket}\" to \"{name}\"")]
fn download(
    objects_context: ObjectsContext,
    key: String,
    bucket: String,
    name: String,
) -> ObjectsContext {
    let destination = objects_context.local(&name);
    runtime()
        .block_on(
            store(&objects_context).download_object(&ObjectRef::new(bucket, key), &destination),
        )
        .unwrap_or_else(|err| panic!("download should succeed: {err}"));
    objects_context
}

#[when("I check whether \"{bucket}\" holds \"{key}\"")]
fn check_exists(
    mut objects_context: ObjectsContext,
    bucket: String,
    key: String,
) -> ObjectsContext {
    let object = ObjectRef::new(bucket, key);
    let exists = runtime().block_on(store(&objects_context).check_object_exists(&object));
    objects_context.exists = Some(exists);
    objects_context
}

#[then("the search returns \"{expected}\"")]
fn search_returns(objects_context: &ObjectsContext, expected: String) -> Result<(), StepError> {
    let found = match objects_context.search.as_ref() {
        Some(Ok(found)) => found,
        other => return Err(StepError::Assertion(format!("search failed: {other:?}"))),
    };
    let keys: Vec<&str> = found.iter().map(|info| info.key.as_str()).collect();
    let wanted: Vec<&str> = expected.split(',').collect();
    if keys == wanted {
        Ok(())
    } else {
        Err(StepError::Assertion(format!("expected {wanted:?}, got {keys:?}")))
    }
}

#[then("the search is rejected as invalid")]
fn search_rejected(objects_context: &ObjectsContext) -> Result<(), StepError> {
    match objects_context.search.as_ref() {
        Some(Err(InfraError::Validation(_))) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected a validation error, got {other:?}"
        ))),
    }
}

#[then("the local file \"{name}\" contains \"{contents}\"")]
fn local_contents(
    objects_context: &ObjectsContext,
    name: String,
    contents: String,
) -> Result<(), StepError> {
    let path = objects_context.local(&name);
    let actual = std::fs::read_to_string(&path)
        .map_err(|err| StepError::Assertion(format!("read {path}: {err}")))?;
    if actual == contents {
        Ok(())
    } else {
        Err(StepError::Assertion(format!("expected {contents:?}, got {actual:?}")))
    }
}

#[then("the object is reported absent")]
fn object_absent(objects_context: &ObjectsContext) -> Result<(), StepError> {
    match objects_context.exists.as_ref() {
        Some(Ok(false)) => Ok(()),
        other => Err(StepError::Assertion(format!("expected absence, got {other:?}"))),
    }
}
