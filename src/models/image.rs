//! Machine image lookup query.

use serde::Deserialize;

use crate::control_plane::Filter;
use crate::error::InfraError;

use super::{require, trimmed};

/// Owner of the fallback image used when an instance names no image.
pub const DEFAULT_IMAGE_OWNER: &str = "amazon";
/// Description of the fallback image used when an instance names no image.
pub const DEFAULT_IMAGE_DESCRIPTION: &str =
    "Microsoft Windows Server 2019 with Desktop Experience Locale English AMI provided by Amazon";

fn wildcard() -> String {
    String::from("*")
}

/// Locates a machine image by owner and name/description patterns.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ImageQuery {
    /// Image owner alias or account id (`amazon`, `self`, `099720109477`).
    #[serde(alias = "provider")]
    pub owner: String,
    /// Name pattern; `*` matches anything.
    #[serde(default = "wildcard")]
    pub name: String,
    /// Description pattern; `*` matches anything.
    #[serde(default = "wildcard")]
    pub description: String,
}

impl ImageQuery {
    /// Creates a query matching every available image of `owner`.
    #[must_use]
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: trimmed(&owner.into()),
            name: wildcard(),
            description: wildcard(),
        }
    }

    /// Restricts the image name pattern.
    #[must_use]
    pub fn name(mut self, pattern: impl Into<String>) -> Self {
        self.name = trimmed(&pattern.into());
        self
    }

    /// Restricts the image description pattern.
    #[must_use]
    pub fn description(mut self, pattern: impl Into<String>) -> Self {
        self.description = trimmed(&pattern.into());
        self
    }

    /// Query used when an instance specification names no image.
    #[must_use]
    pub fn default_windows() -> Self {
        Self::new(DEFAULT_IMAGE_OWNER).description(DEFAULT_IMAGE_DESCRIPTION)
    }

    /// Validates the query.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when a field is empty.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.owner, "owner")?;
        require(&self.name, "name")?;
        require(&self.description, "description")
    }

    pub(crate) fn filters(&self) -> Vec<Filter> {
        vec![
            Filter::single("name", self.name.clone()),
            Filter::single("description", self.description.clone()),
            Filter::single("state", "available"),
        ]
    }
}
