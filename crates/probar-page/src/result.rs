//! Result and error types for probar pages.

use thiserror::Error;

/// Result type for page operations
pub type PageResult<T> = Result<T, PageError>;

/// Coarse classification of a [`PageError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed construction input
    Validation,
    /// Missing or wrong-typed argument to a registration call
    InvalidArgument,
    /// Requested name or alias is not registered
    Lookup,
    /// Page presence check failed
    Presence,
    /// Hook invoked before it was set
    NotConfigured,
    /// A region rejected its filter value
    Region,
    /// A page definition document could not be parsed
    Definition,
}

/// Errors that can occur while building or using a page
#[derive(Debug, Error)]
pub enum PageError {
    /// Malformed name or aliases
    #[error("Validation failed: {message}")]
    Validation {
        /// Error message
        message: String,
    },

    /// Missing or wrong-typed argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// Name or alias not found in a registry
    #[error("{message}")]
    Lookup {
        /// Key that was requested
        key: String,
        /// Error message
        message: String,
    },

    /// The page is not confirmed present
    #[error("{message}")]
    Presence {
        /// Error message
        message: String,
    },

    /// Hook invoked before it was configured
    #[error("{hook} is not configured for page \"{page}\"")]
    NotConfigured {
        /// Page name
        page: String,
        /// Hook name
        hook: &'static str,
    },

    /// Region filter failure
    #[error("Region \"{region}\" failed to apply filter: {message}")]
    Region {
        /// Region name
        region: String,
        /// Error message
        message: String,
    },

    /// Page definition parse failure
    #[error("Invalid page definition: {message}")]
    Definition {
        /// Error message
        message: String,
    },
}

impl PageError {
    /// Create a validation error
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a presence error
    #[must_use]
    pub fn presence(message: impl Into<String>) -> Self {
        Self::Presence {
            message: message.into(),
        }
    }

    /// Create a region filter error
    #[must_use]
    pub fn region(region: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Region {
            region: region.into(),
            message: message.into(),
        }
    }

    /// Create a definition error
    #[must_use]
    pub fn definition(message: impl Into<String>) -> Self {
        Self::Definition {
            message: message.into(),
        }
    }

    pub(crate) fn region_not_found(key: &str) -> Self {
        Self::Lookup {
            key: key.to_string(),
            message: format!("Invalid region name requested: \"{key}\""),
        }
    }

    pub(crate) fn control_not_found(key: &str) -> Self {
        Self::Lookup {
            key: key.to_string(),
            message: format!("Invalid control name requested: \"{key}\""),
        }
    }

    pub(crate) fn page_not_found(application: &str, key: &str) -> Self {
        Self::Lookup {
            key: key.to_string(),
            message: format!("Invalid page name requested from application \"{application}\": \"{key}\""),
        }
    }

    /// Taxonomy of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::Lookup { .. } => ErrorKind::Lookup,
            Self::Presence { .. } => ErrorKind::Presence,
            Self::NotConfigured { .. } => ErrorKind::NotConfigured,
            Self::Region { .. } => ErrorKind::Region,
            Self::Definition { .. } => ErrorKind::Definition,
        }
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        Self::definition(err.to_string())
    }
}

impl From<serde_yaml_ng::Error> for PageError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        Self::definition(err.to_string())
    }
}
