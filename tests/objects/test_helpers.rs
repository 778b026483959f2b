//! Shared fixtures for object storage scenarios.

use std::sync::Arc;

use camino::Utf8PathBuf;
use octo_infra::InfraResult;
use octo_infra::models::ObjectInfo;
use octo_infra::test_support::FakeControlPlane;
use rstest::fixture;
use tempfile::TempDir;

#[derive(Clone, Debug)]
pub struct ObjectsContext {
    pub plane: Arc<FakeControlPlane>,
    pub root: Utf8PathBuf,
    pub search: Option<InfraResult<Vec<ObjectInfo>>>,
    pub exists: Option<InfraResult<bool>>,
    _dir: Arc<TempDir>,
}

impl ObjectsContext {
    pub fn local(&self, relative: &str) -> Utf8PathBuf {
        self.root.join(relative)
    }
}

#[fixture]
pub fn objects_context() -> ObjectsContext {
    let dir = TempDir::new().unwrap_or_else(|err| panic!("create workspace: {err}"));
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("non UTF-8 workspace: {}", path.display()));
    ObjectsContext {
        plane: Arc::new(FakeControlPlane::new()),
        root,
        search: None,
        exists: None,
        _dir: Arc::new(dir),
    }
}

pub fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().unwrap_or_else(|err| panic!("runtime should start: {err}"))
}
