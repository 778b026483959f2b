//! Parameter store entries.

use serde::Deserialize;

use crate::error::InfraError;

use super::{require, trimmed};

const fn enabled() -> bool {
    true
}

/// Parameter to create.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ParameterSpec {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: String,
    /// Human readable description.
    #[serde(default)]
    pub description: String,
    /// Store as a secure string.
    #[serde(default = "enabled")]
    pub encrypt: bool,
}

impl ParameterSpec {
    /// Encrypted parameter with no description.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: trimmed(&name.into()),
            value: value.into(),
            description: String::new(),
            encrypt: true,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = value.into();
        self
    }

    /// Controls encryption at rest.
    #[must_use]
    pub const fn encrypt(mut self, value: bool) -> Self {
        self.encrypt = value;
        self
    }

    /// Validates the specification.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when the name is empty.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.name, "parameter name")
    }
}

/// Parameter to read.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct ParameterQuery {
    /// Parameter name.
    pub name: String,
    /// Decrypt secure strings.
    #[serde(default = "enabled", alias = "decrpyt")]
    pub decrypt: bool,
}

impl ParameterQuery {
    /// Decrypting read of `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: trimmed(&name.into()),
            decrypt: true,
        }
    }

    /// Controls decryption.
    #[must_use]
    pub const fn decrypt(mut self, value: bool) -> Self {
        self.decrypt = value;
        self
    }

    /// Validates the query.
    ///
    /// # Errors
    ///
    /// Returns [`InfraError::Validation`] when the name is empty.
    pub fn validate(&self) -> Result<(), InfraError> {
        require(&self.name, "parameter name")
    }
}
