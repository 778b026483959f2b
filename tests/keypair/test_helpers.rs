//! Shared fixtures for keypair scenarios.

use std::sync::Arc;

use camino::Utf8PathBuf;
use octo_infra::InfraResult;
use octo_infra::models::KeypairHandle;
use octo_infra::test_support::FakeControlPlane;
use rstest::fixture;
use tempfile::TempDir;

#[derive(Clone, Debug)]
pub struct KeypairContext {
    pub plane: Arc<FakeControlPlane>,
    pub key_path: Utf8PathBuf,
    pub existing_id: Option<String>,
    pub outcome: Option<InfraResult<KeypairHandle>>,
    _dir: Arc<TempDir>,
}

#[fixture]
pub fn keypair_context() -> KeypairContext {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("create key directory: {err}"));
    let key_path = Utf8PathBuf::from_path_buf(dir.path().join("keys").join("deploy.pem"))
        .unwrap_or_else(|path| panic!("non UTF-8 key path: {}", path.display()));
    KeypairContext {
        plane: Arc::new(FakeControlPlane::new()),
        key_path,
        existing_id: None,
        outcome: None,
        _dir: Arc::new(dir),
    }
}
