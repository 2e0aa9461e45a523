//! Artifact identity: a canonical name plus any number of aliases.
//!
//! Every page element is reachable by its name or by one of its aliases.
//! Identities are validated once at construction and never change.

use crate::result::{PageError, PageResult};
use serde::Serialize;
use serde_json::Value;

/// Validated name and aliases of a page, region, control or application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedArtifact {
    name: String,
    aliases: Vec<String>,
}

impl NamedArtifact {
    /// Create an identity.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Validation`] if the name or any alias is blank.
    pub fn new<I, S>(name: impl Into<String>, aliases: I) -> PageResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PageError::validation("name must be a non-empty string"));
        }

        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        if let Some(pos) = aliases.iter().position(|a| a.trim().is_empty()) {
            return Err(PageError::validation(format!(
                "alias {pos} of \"{name}\" must be a non-empty string"
            )));
        }

        Ok(Self { name, aliases })
    }

    /// Create an identity with no aliases.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Validation`] if the name is blank.
    pub fn named(name: impl Into<String>) -> PageResult<Self> {
        Self::new(name, Vec::<String>::new())
    }

    /// Build an identity from a loosely typed document such as
    /// `{"name": "Login", "aliases": ["Sign In"]}`.
    ///
    /// A missing or `null` `aliases` field means no aliases.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Validation`] if `value` is not an object, `name`
    /// is missing or not a string, `aliases` is not an array, or an alias
    /// is not a string.
    pub fn from_value(value: &Value) -> PageResult<Self> {
        let obj = value
            .as_object()
            .ok_or_else(|| PageError::validation("artifact must be an object"))?;

        Self::from_parts(
            obj.get("name").unwrap_or(&Value::Null),
            obj.get("aliases").unwrap_or(&Value::Null),
        )
    }

    /// Build an identity from separately decoded `name` and `aliases`
    /// values. `Value::Null` stands for an absent field.
    ///
    /// # Errors
    ///
    /// Same as [`NamedArtifact::from_value`].
    pub fn from_parts(name: &Value, aliases: &Value) -> PageResult<Self> {
        let name = match name {
            Value::Null => return Err(PageError::validation("name is required")),
            Value::String(s) => s.clone(),
            other => {
                return Err(PageError::validation(format!(
                    "name must be a string, got {}",
                    type_name(other)
                )))
            }
        };

        let aliases = match aliases {
            Value::Null => Vec::new(),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(PageError::validation(format!(
                        "each alias of \"{name}\" must be a string, got {}",
                        type_name(other)
                    ))),
                })
                .collect::<PageResult<Vec<_>>>()?,
            other => {
                return Err(PageError::validation(format!(
                    "aliases of \"{name}\" must be an array, got {}",
                    type_name(other)
                )))
            }
        };

        Self::new(name, aliases)
    }

    /// Canonical name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Aliases in declaration order
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// All lookup keys: the name followed by every alias
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Whether `key` is the name or one of the aliases
    #[must_use]
    pub fn answers_to(&self, key: &str) -> bool {
        self.keys().any(|k| k == key)
    }
}

impl std::fmt::Display for NamedArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Anything identified by a [`NamedArtifact`].
pub trait Named {
    /// The identity
    fn identity(&self) -> &NamedArtifact;

    /// Canonical name
    fn name(&self) -> &str {
        self.identity().name()
    }

    /// Aliases in declaration order
    fn aliases(&self) -> &[String] {
        self.identity().aliases()
    }
}
