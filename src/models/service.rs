//! Service discovery lookups.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::InfraError;

use super::{require, trimmed};

/// Looks up one registered instance of a service.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ServiceQuery {
    /// Namespace name.
    pub namespace: String,
    /// Service name.
    pub service: String,
    /// Attribute equality filter.
    #[serde(default, alias = "attributes_filter")]
    pub attributes: BTreeMap<String, String>,
    /// Region override.
    #[serde(default)]
    pub region: Option<String>,
}

impl ServiceQuery {
    /// Unfiltered lookup in the client region.
    #[must_use]
    pub fn new(namespace: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            namespace: trimmed(&namespace.into()),
            service: trimmed(&service.into()),
            attributes: BTreeMap::new(),
            region: None,
        }
    }

    /// Adds an attribute predicate.
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Overrides the region.
    #[must_use]
    pub fn region(mut self, value: impl Into<String>) -> Self {
        self.region = Some(trimmed(&value.into()));
        self
    }

    /// Validates the query.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when the namespace or service is
    /// empty.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.namespace, "namespace")?;
        require(&self.service, "service")
    }
}

/// Registered service instance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServiceInstance {
    /// Namespace name.
    pub namespace: String,
    /// Service name.
    pub service: String,
    /// Instance identifier.
    pub instance: String,
    /// Registered attributes.
    pub attributes: BTreeMap<String, String>,
}
