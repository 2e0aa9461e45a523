//! Controls: named, aliasable leaf elements of a page.

use crate::identity::{Named, NamedArtifact};
use crate::result::PageResult;

/// A single interactive element of a page, e.g. a text field or button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    identity: NamedArtifact,
    description: Option<String>,
}

impl Control {
    /// Create a control
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name or an alias is blank.
    pub fn new<I, S>(name: impl Into<String>, aliases: I) -> PageResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::from_identity(NamedArtifact::new(name, aliases)?))
    }

    /// Create a control without aliases
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank.
    pub fn named(name: impl Into<String>) -> PageResult<Self> {
        Ok(Self::from_identity(NamedArtifact::named(name)?))
    }

    /// Create a control from an existing identity
    #[must_use]
    pub const fn from_identity(identity: NamedArtifact) -> Self {
        Self {
            identity,
            description: None,
        }
    }

    /// Attach a human readable description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Description, if any
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Named for Control {
    fn identity(&self) -> &NamedArtifact {
        &self.identity
    }
}
