//! Object storage accessor.

use std::sync::Arc;

use camino::Utf8Path;
use globset::{Glob, GlobMatcher};
use tracing::{debug, info, warn};

use crate::control_plane::{ListObjectsRequest, S3Api};
use crate::error::{InfraError, InfraResult};
use crate::fs;
use crate::models::{ObjectInfo, ObjectQuery, ObjectRef, require};

/// Largest key batch accepted by a single `DeleteObjects` call.
pub const DELETE_BATCH_SIZE: usize = 1_000;

const FOLDER_DELIMITER: &str = "/";

/// Reads, writes and searches objects.
#[derive(Debug)]
pub struct ObjectStore<C> {
    control_plane: Arc<C>,
}

impl<C> Clone for ObjectStore<C> {
    fn clone(&self) -> Self {
        Self {
            control_plane: Arc::clone(&self.control_plane),
        }
    }
}

fn compile_filters(patterns: &[String]) -> InfraResult<Vec<GlobMatcher>> {
    patterns
        .iter()
        .map(|pattern| {
            Glob::new(pattern)
                .map(|glob| glob.compile_matcher())
                .map_err(|err| InfraError::Validation(format!("filter '{pattern}': {err}")))
        })
        .collect()
}

fn matches_any(matchers: &[GlobMatcher], key: &str) -> bool {
    matchers.is_empty() || matchers.iter().any(|matcher| matcher.is_match(key))
}

impl<C: S3Api> ObjectStore<C> {
    /// Creates an accessor over the shared control plane.
    #[must_use]
    pub const fn new(control_plane: Arc<C>) -> Self {
        Self { control_plane }
    }

    /// Reads an object into memory.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] for a missing object, or the mapped
    /// control-plane error.
    pub async fn load_object(&self, object: &ObjectRef) -> InfraResult<Vec<u8>> {
        object.validate()?;
        self.control_plane
            .get_object(&object.bucket, &object.key)
            .await
            .map_err(|err| {
                warn!(bucket = %object.bucket, key = %object.key, error = %err, "object read failed");
                InfraError::from(err)
            })
    }

    /// Downloads an object to `destination`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::load_object`], or [`InfraError::Io`]
    /// when the file cannot be written.
    pub async fn download_object(
        &self,
        object: &ObjectRef,
        destination: &Utf8Path,
    ) -> InfraResult<()> {
        let body = self.load_object(object).await?;
        fs::write_creating_parents(destination, &body)?;
        info!(bucket = %object.bucket, key = %object.key, path = %destination, "object downloaded");
        Ok(())
    }

    /// Writes raw bytes to an object.
    ///
    /// # Errors
    ///
    /// Returns the mapped control-plane error.
    pub async fn save_object(&self, object: &ObjectRef, body: Vec<u8>) -> InfraResult<()> {
        object.validate()?;
        let size = body.len();
        self.control_plane
            .put_object(&object.bucket, &object.key, body)
            .await
            .map_err(|err| {
                warn!(bucket = %object.bucket, key = %object.key, error = %err, "object write failed");
                InfraError::from(err)
            })?;
        info!(bucket = %object.bucket, key = %object.key, size, "object saved");
        Ok(())
    }

    /// Uploads a local file to an object.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] before any remote call when `source`
    /// does not exist, or the errors of [`Self::save_object`].
    pub async fn upload_object(&self, source: &Utf8Path, object: &ObjectRef) -> InfraResult<()> {
        object.validate()?;
        let body = fs::read(source).inspect_err(|err| {
            warn!(path = %source, error = %err, "upload source unreadable");
        })?;
        self.save_object(object, body).await
    }

    /// Deletes `keys` from `bucket` in batches.
    ///
    /// # Errors
    ///
    /// Returns the first mapped control-plane error; earlier batches stay
    /// deleted.
    pub async fn delete_objects(&self, bucket: &str, keys: &[String]) -> InfraResult<()> {
        require(bucket, "bucket")?;
        for batch in keys.chunks(DELETE_BATCH_SIZE) {
            self.control_plane
                .delete_objects(bucket, batch)
                .await
                .map_err(|err| {
                    warn!(bucket, error = %err, "object batch deletion failed");
                    InfraError::from(err)
                })?;
            debug!(bucket, count = batch.len(), "deleted object batch");
        }
        info!(bucket, count = keys.len(), "objects deleted");
        Ok(())
    }

    /// Reports whether an object exists.
    ///
    /// # Errors
    ///
    /// A missing object yields `Ok(false)`. Other control-plane failures are
    /// returned mapped.
    pub async fn check_object_exists(&self, object: &ObjectRef) -> InfraResult<bool> {
        object.validate()?;
        match self
            .control_plane
            .head_object(&object.bucket, &object.key)
            .await
        {
            Ok(()) => Ok(true),
            Err(err) if err.is_not_found() => {
                debug!(bucket = %object.bucket, key = %object.key, "object absent");
                Ok(false)
            }
            Err(err) => {
                warn!(bucket = %object.bucket, key = %object.key, error = %err, "object lookup failed");
                Err(err.into())
            }
        }
    }

    /// Sentinel form of [`Self::check_object_exists`]: any failure reads as
    /// `false` after being logged.
    pub async fn object_exists(&self, object: &ObjectRef) -> bool {
        self.check_object_exists(object).await.unwrap_or(false)
    }

    /// Lists objects (or folder prefixes) under the query prefix whose keys
    /// match any of the query's glob patterns.
    ///
    /// Patterns follow shell rules where `*` also spans `/`. An empty
    /// pattern list matches every key.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] for an unparsable pattern, or the
    /// mapped control-plane error of any page.
    pub async fn find_objects(&self, query: &ObjectQuery) -> InfraResult<Vec<ObjectInfo>> {
        query.validate()?;
        let matchers = compile_filters(&query.filters)?;
        let mut request = ListObjectsRequest {
            bucket: query.bucket.clone(),
            prefix: query.prefix.clone(),
            delimiter: query.folders_only.then(|| FOLDER_DELIMITER.to_owned()),
            continuation_token: None,
        };

        let mut found = Vec::new();
        loop {
            let page = self
                .control_plane
                .list_objects_page(&request)
                .await
                .map_err(|err| {
                    warn!(bucket = %query.bucket, prefix = %query.prefix, error = %err, "object listing failed");
                    InfraError::from(err)
                })?;

            if query.folders_only {
                found.extend(
                    page.common_prefixes
                        .into_iter()
                        .filter(|prefix| matches_any(&matchers, prefix))
                        .map(|prefix| ObjectInfo::new(&query.bucket, prefix, 0)),
                );
            } else {
                found.extend(
                    page.objects
                        .into_iter()
                        .filter(|entry| matches_any(&matchers, &entry.key))
                        .map(|entry| ObjectInfo::new(&query.bucket, entry.key, entry.size)),
                );
            }

            let Some(token) = page.next_token else {
                break;
            };
            request.continuation_token = Some(token);
        }

        debug!(bucket = %query.bucket, prefix = %query.prefix, count = found.len(), "object search finished");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::*;
    use crate::test_support::FakeControlPlane;
    use rstest::{fixture, rstest};

    #[fixture]
    fn plane() -> Arc<FakeControlPlane> {
        let plane = Arc::new(FakeControlPlane::new());
        plane.add_object("bucket", "a/b.txt", b"hello");
        plane.add_object("bucket", "a/c.log", b"log line");
        plane.add_object("bucket", "a/deep/d.txt", b"deep");
        plane.add_object("bucket", "z.txt", b"top");
        plane
    }

    fn keys(found: &[ObjectInfo]) -> Vec<&str> {
        found.iter().map(|info| info.key.as_str()).collect()
    }

    #[rstest]
    #[tokio::test]
    async fn glob_filters_select_matching_keys(plane: Arc<FakeControlPlane>) {
        let store = ObjectStore::new(Arc::clone(&plane));
        let found = store
            .find_objects(&ObjectQuery::new("bucket").prefix("a/").filter("*.txt"))
            .await
            .unwrap_or_else(|err| panic!("search should succeed: {err}"));
        assert_eq!(keys(&found), vec!["a/b.txt", "a/deep/d.txt"]);
    }

    #[rstest]
    #[tokio::test]
    async fn filters_are_alternatives(plane: Arc<FakeControlPlane>) {
        let store = ObjectStore::new(Arc::clone(&plane));
        let found = store
            .find_objects(
                &ObjectQuery::new("bucket")
                    .filter("a/*.log")
                    .filter("z.*"),
            )
            .await
            .unwrap_or_else(|err| panic!("search should succeed: {err}"));
        assert_eq!(keys(&found), vec!["a/c.log", "z.txt"]);
    }

    #[rstest]
    #[tokio::test]
    async fn listings_follow_continuation_tokens(plane: Arc<FakeControlPlane>) {
        plane.set_page_size(1);
        let store = ObjectStore::new(Arc::clone(&plane));
        let found = store
            .find_objects(&ObjectQuery::new("bucket"))
            .await
            .unwrap_or_else(|err| panic!("search should succeed: {err}"));
        assert_eq!(found.len(), 4);
        assert_eq!(plane.calls_to("ListObjects").len(), 4);
    }

    #[rstest]
    #[tokio::test]
    async fn folder_mode_returns_prefixes(plane: Arc<FakeControlPlane>) {
        let store = ObjectStore::new(Arc::clone(&plane));
        let found = store
            .find_objects(&ObjectQuery::new("bucket").prefix("a/").folders_only(true))
            .await
            .unwrap_or_else(|err| panic!("search should succeed: {err}"));
        assert_eq!(
            found,
            vec![ObjectInfo::new("bucket", String::from("a/deep/"), 0)]
        );
        assert!(found.iter().all(|info| info.is_folder));
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_patterns_are_rejected(plane: Arc<FakeControlPlane>) {
        let store = ObjectStore::new(Arc::clone(&plane));
        let result = store
            .find_objects(&ObjectQuery::new("bucket").filter("a/[b"))
            .await;
        assert!(matches!(result, Err(InfraError::Validation(_))));
        assert!(plane.calls().is_empty());
    }

    #[rstest]
    #[case("a/b.txt", true)]
    #[case("a/missing.txt", false)]
    #[tokio::test]
    async fn existence_reflects_head_object(
        plane: Arc<FakeControlPlane>,
        #[case] key: &str,
        #[case] expected: bool,
    ) {
        let store = ObjectStore::new(Arc::clone(&plane));
        let object = ObjectRef::new("bucket", key);
        assert_eq!(store.check_object_exists(&object).await, Ok(expected));
        assert_eq!(store.object_exists(&object).await, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn lookup_failures_surface_only_in_the_typed_form(plane: Arc<FakeControlPlane>) {
        plane.fail_operation("HeadObject");
        let store = ObjectStore::new(Arc::clone(&plane));
        let object = ObjectRef::new("bucket", "a/b.txt");
        assert!(matches!(
            store.check_object_exists(&object).await,
            Err(InfraError::Transport { .. })
        ));
        assert!(!store.object_exists(&object).await);
    }

    #[rstest]
    #[tokio::test]
    async fn download_creates_parent_directories(plane: Arc<FakeControlPlane>) {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let destination = Utf8PathBuf::from_path_buf(dir.path().join("nested/out/b.txt"))
            .unwrap_or_else(|path| panic!("non UTF-8 path: {}", path.display()));
        let store = ObjectStore::new(Arc::clone(&plane));

        store
            .download_object(&ObjectRef::new("bucket", "a/b.txt"), &destination)
            .await
            .unwrap_or_else(|err| panic!("download should succeed: {err}"));

        assert_eq!(fs::read(&destination).ok(), Some(b"hello".to_vec()));
    }

    #[rstest]
    #[tokio::test]
    async fn upload_of_a_missing_file_makes_no_calls(plane: Arc<FakeControlPlane>) {
        let store = ObjectStore::new(Arc::clone(&plane));
        let result = store
            .upload_object(
                Utf8Path::new("/nonexistent/octo/upload.bin"),
                &ObjectRef::new("bucket", "up.bin"),
            )
            .await;
        assert!(matches!(result, Err(InfraError::NotFound { .. })));
        assert!(plane.calls().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn upload_stores_file_contents(plane: Arc<FakeControlPlane>) {
        let dir = tempfile::tempdir().unwrap_or_else(|err| panic!("tempdir: {err}"));
        let source = Utf8PathBuf::from_path_buf(dir.path().join("payload.bin"))
            .unwrap_or_else(|path| panic!("non UTF-8 path: {}", path.display()));
        fs::write_creating_parents(&source, b"payload")
            .unwrap_or_else(|err| panic!("write: {err}"));
        let store = ObjectStore::new(Arc::clone(&plane));

        store
            .upload_object(&source, &ObjectRef::new("bucket", "up.bin"))
            .await
            .unwrap_or_else(|err| panic!("upload should succeed: {err}"));

        assert_eq!(plane.object("bucket", "up.bin"), Some(b"payload".to_vec()));
    }

    #[rstest]
    #[tokio::test]
    async fn deletes_run_in_batches(plane: Arc<FakeControlPlane>) {
        let store = ObjectStore::new(Arc::clone(&plane));
        let keys: Vec<String> = (0..=DELETE_BATCH_SIZE).map(|n| format!("k/{n}")).collect();
        store
            .delete_objects("bucket", &keys)
            .await
            .unwrap_or_else(|err| panic!("delete should succeed: {err}"));
        assert_eq!(plane.calls_to("DeleteObjects").len(), 2);
    }
}
