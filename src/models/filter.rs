//! Query filter shared by the find operations.

use serde::Deserialize;

use crate::control_plane::{Filter, Tags};

/// Narrows a find query. Unset fields match everything; set fields are
/// combined with AND.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct AssetFilter {
    /// Restrict to a VPC.
    #[serde(default)]
    pub vpc_id: Option<String>,
    /// Tag equality predicates.
    #[serde(default)]
    pub tags: Tags,
    /// Restrict to a lifecycle state, for example `running`.
    #[serde(default)]
    pub state: Option<String>,
}

impl AssetFilter {
    /// Filter that matches everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to a VPC.
    #[must_use]
    pub fn vpc_id(mut self, value: impl Into<String>) -> Self {
        self.vpc_id = Some(value.into().trim().to_owned());
        self
    }

    /// Adds a tag equality predicate.
    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Restricts to a lifecycle state.
    #[must_use]
    pub fn state(mut self, value: impl Into<String>) -> Self {
        self.state = Some(value.into().trim().to_owned());
        self
    }

    /// Returns `true` when no predicate is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vpc_id.is_none() && self.tags.is_empty() && self.state.is_none()
    }

    /// Tag predicates as control-plane filters.
    pub(crate) fn tag_filters(&self) -> Vec<Filter> {
        self.tags
            .iter()
            .map(|(key, value)| Filter::tag(key, value.clone()))
            .collect()
    }

    /// Tag predicates plus `vpc_filter_name` and `state_filter_name` when the
    /// corresponding fields are set.
    pub(crate) fn to_filters(
        &self,
        vpc_filter_name: &str,
        state_filter_name: Option<&str>,
    ) -> Vec<Filter> {
        let mut filters = self.tag_filters();
        if let (Some(name), Some(state)) = (state_filter_name, self.state.as_ref()) {
            filters.push(Filter::single(name, state.clone()));
        }
        if let Some(vpc_id) = &self.vpc_id {
            filters.push(Filter::single(vpc_filter_name, vpc_id.clone()));
        }
        filters
    }
}
