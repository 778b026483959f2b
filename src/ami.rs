//! Machine image resolution.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::control_plane::{Ec2Api, ImageRecord};
use crate::error::{InfraError, InfraResult};
use crate::models::ImageQuery;

/// Resolves image queries to identifiers.
#[derive(Debug)]
pub struct ImageResolver<C> {
    control_plane: Arc<C>,
}

impl<C> Clone for ImageResolver<C> {
    fn clone(&self) -> Self {
        Self {
            control_plane: Arc::clone(&self.control_plane),
        }
    }
}

impl<C: Ec2Api> ImageResolver<C> {
    /// Creates a resolver over the shared control plane.
    #[must_use]
    pub const fn new(control_plane: Arc<C>) -> Self {
        Self { control_plane }
    }

    /// Returns the identifier of the newest available image matching the
    /// query.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] when nothing matches, or the mapped
    /// control-plane error when the lookup fails.
    pub async fn find(&self, query: &ImageQuery) -> InfraResult<String> {
        query.validate()?;
        let owners = [query.owner.clone()];
        let filters = query.filters();
        let mut candidates = self
            .control_plane
            .describe_images(&owners, &filters)
            .await
            .map_err(|err| {
                warn!(owner = %query.owner, error = %err, "image lookup failed");
                InfraError::from(err)
            })?;

        candidates.sort_by(|lhs, rhs| rhs.creation_date.cmp(&lhs.creation_date));
        let Some(newest) = candidates.into_iter().next() else {
            warn!(owner = %query.owner, name = %query.name, "no image matched");
            return Err(InfraError::not_found(format!(
                "image owned by {} matching name '{}' and description '{}'",
                query.owner, query.name, query.description
            )));
        };

        debug!(image_id = %newest.id, created = %newest.creation_date, "resolved image");
        Ok(newest.id)
    }

    /// Sentinel form of [`Self::find`]: any failure becomes `None`.
    pub async fn find_id(&self, query: &ImageQuery) -> Option<String> {
        self.find(query).await.ok()
    }

    /// Fetches image metadata by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::NotFound`] when the image does not exist.
    pub async fn describe(&self, image_id: &str) -> InfraResult<ImageRecord> {
        self.control_plane
            .describe_image(image_id)
            .await
            .map_err(InfraError::from)
    }
}
