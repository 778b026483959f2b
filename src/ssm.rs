//! Parameter store accessor.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::control_plane::{PutParameterRequest, SsmApi};
use crate::error::{InfraError, InfraResult};
use crate::models::{ParameterQuery, ParameterSpec, require};

/// Creates, reads and deletes parameters.
#[derive(Debug)]
pub struct ParameterStore<C> {
    control_plane: Arc<C>,
}

impl<C> Clone for ParameterStore<C> {
    fn clone(&self) -> Self {
        Self {
            control_plane: Arc::clone(&self.control_plane),
        }
    }
}

impl<C: SsmApi> ParameterStore<C> {
    /// Creates an accessor over the shared control plane.
    #[must_use]
    pub const fn new(control_plane: Arc<C>) -> Self {
        Self { control_plane }
    }

    /// Stores a new parameter. Existing names are never overwritten.
    ///
    /// # Errors
    ///
    /// Returns the mapped control-plane error, including the provider's
    /// collision error for an existing name.
    pub async fn create_parameter(&self, spec: &ParameterSpec) -> InfraResult<()> {
        spec.validate()?;
        let request = PutParameterRequest {
            name: spec.name.clone(),
            value: spec.value.clone(),
            description: spec.description.clone(),
            secure: spec.encrypt,
            overwrite: false,
        };
        self.control_plane
            .put_parameter(&request)
            .await
            .map_err(|err| {
                warn!(name = %spec.name, error = %err, "parameter creation failed");
                InfraError::from(err)
            })?;
        info!(name = %spec.name, secure = spec.encrypt, "parameter created");
        Ok(())
    }

    /// Reads a parameter value.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] for an unknown name, or the mapped
    /// control-plane error.
    pub async fn get_parameter(&self, query: &ParameterQuery) -> InfraResult<String> {
        query.validate()?;
        self.control_plane
            .get_parameter(&query.name, query.decrypt)
            .await
            .map_err(|err| {
                warn!(name = %query.name, error = %err, "parameter read failed");
                InfraError::from(err)
            })
    }

    /// Reports whether a parameter named `name` exists.
    ///
    /// # Errors
    ///
    /// Returns the mapped control-plane error.
    pub async fn has_parameter(&self, name: &str) -> InfraResult<bool> {
        require(name, "parameter name")?;
        let matches = self
            .control_plane
            .describe_parameters(name.trim())
            .await
            .map_err(|err| {
                warn!(name, error = %err, "parameter lookup failed");
                InfraError::from(err)
            })?;
        debug!(name, found = !matches.is_empty(), "parameter looked up");
        Ok(!matches.is_empty())
    }

    /// Deletes a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] for an unknown name, or the mapped
    /// control-plane error.
    pub async fn destroy_parameter(&self, name: &str) -> InfraResult<()> {
        require(name, "parameter name")?;
        self.control_plane
            .delete_parameter(name.trim())
            .await
            .map_err(|err| {
                warn!(name, error = %err, "parameter deletion failed");
                InfraError::from(err)
            })?;
        info!(name, "parameter deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeControlPlane;
    use rstest::{fixture, rstest};

    #[fixture]
    fn plane() -> Arc<FakeControlPlane> {
        let plane = Arc::new(FakeControlPlane::new());
        plane.add_parameter("/octo/existing", "old", false);
        plane
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    #[tokio::test]
    async fn creation_maps_encryption_to_the_value_type(
        plane: Arc<FakeControlPlane>,
        #[case] encrypt: bool,
    ) {
        let store = ParameterStore::new(Arc::clone(&plane));
        store
            .create_parameter(&ParameterSpec::new("/octo/token", "abc").encrypt(encrypt))
            .await
            .unwrap_or_else(|err| panic!("create should succeed: {err}"));
        assert_eq!(
            plane.parameter("/octo/token"),
            Some((String::from("abc"), encrypt))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn creation_never_overwrites(plane: Arc<FakeControlPlane>) {
        let store = ParameterStore::new(Arc::clone(&plane));
        let result = store
            .create_parameter(&ParameterSpec::new("/octo/existing", "new"))
            .await;
        assert!(matches!(result, Err(InfraError::Transport { .. })));
        assert_eq!(
            plane.parameter("/octo/existing"),
            Some((String::from("old"), false))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn reads_and_checks_existence(plane: Arc<FakeControlPlane>) {
        let store = ParameterStore::new(Arc::clone(&plane));
        assert_eq!(
            store
                .get_parameter(&ParameterQuery::new("/octo/existing"))
                .await,
            Ok(String::from("old"))
        );
        assert_eq!(store.has_parameter("/octo/existing").await, Ok(true));
        assert_eq!(store.has_parameter("/octo/absent").await, Ok(false));
        assert!(
            store
                .get_parameter(&ParameterQuery::new("/octo/absent"))
                .await
                .is_err_and(|err| err.is_not_found())
        );
    }

    #[rstest]
    #[tokio::test]
    async fn destroy_removes_the_parameter(plane: Arc<FakeControlPlane>) {
        let store = ParameterStore::new(Arc::clone(&plane));
        store
            .destroy_parameter("/octo/existing")
            .await
            .unwrap_or_else(|err| panic!("delete should succeed: {err}"));
        assert_eq!(plane.parameter("/octo/existing"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_names_are_rejected(plane: Arc<FakeControlPlane>) {
        let store = ParameterStore::new(Arc::clone(&plane));
        assert!(matches!(
            store.has_parameter("  ").await,
            Err(InfraError::Validation(_))
        ));
        assert!(plane.calls().is_empty());
    }
}
