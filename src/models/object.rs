//! Object storage addressing and search.

use serde::Deserialize;

use crate::error::InfraError;

use super::{require, trimmed};

/// Bucket and key of a single object.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ObjectRef {
    /// Bucket name.
    #[serde(alias = "bucket_name")]
    pub bucket: String,
    /// Object key.
    #[serde(alias = "object_path")]
    pub key: String,
}

impl ObjectRef {
    /// Addresses `key` inside `bucket`.
    #[must_use]
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: trimmed(&bucket.into()),
            key: trimmed(&key.into()),
        }
    }

    /// Validates the reference.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when the bucket or key is empty.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.bucket, "bucket")?;
        require(&self.key, "key")
    }
}

/// Prefix search with optional glob filters.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ObjectQuery {
    /// Bucket to search.
    #[serde(alias = "bucket_name")]
    pub bucket: String,
    /// Key prefix; empty searches the whole bucket.
    #[serde(default, alias = "base_search_path")]
    pub prefix: String,
    /// Return only folder prefixes (one level, `/` delimited).
    #[serde(default, alias = "only_prefixes")]
    pub folders_only: bool,
    /// Shell-style patterns; a key matches when any pattern matches.
    #[serde(default)]
    pub filters: Vec<String>,
}

impl ObjectQuery {
    /// Lists every object in `bucket`.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: trimmed(&bucket.into()),
            prefix: String::new(),
            folders_only: false,
            filters: Vec::new(),
        }
    }

    /// Restricts to keys starting with `prefix`.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Switches to folder-prefix listing.
    #[must_use]
    pub const fn folders_only(mut self, value: bool) -> Self {
        self.folders_only = value;
        self
    }

    /// Adds a glob pattern.
    #[must_use]
    pub fn filter(mut self, pattern: impl Into<String>) -> Self {
        self.filters.push(pattern.into());
        self
    }

    /// Validates the query.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when the bucket is empty.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.bucket, "bucket")
    }
}

/// Object or folder prefix returned by a search.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ObjectInfo {
    /// Bucket the entry belongs to.
    pub bucket: String,
    /// Object key or folder prefix.
    pub key: String,
    /// Size in bytes; zero for folder prefixes.
    pub size: i64,
    /// Whether the key denotes a folder.
    pub is_folder: bool,
}

impl ObjectInfo {
    pub(crate) fn new(bucket: &str, key: String, size: i64) -> Self {
        let is_folder = key.ends_with('/');
        Self {
            bucket: bucket.to_owned(),
            key,
            size,
            is_folder,
        }
    }
}
