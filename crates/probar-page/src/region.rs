//! Regions: filterable sub-areas of a page.
//!
//! A region is resolved by name or alias and then scoped with a filter
//! value, e.g. selecting the row of a user list by user name. What "scoping"
//! means is up to the region implementation.

// Allow expect for RwLock - lock poisoning is truly exceptional
#![allow(clippy::expect_used)]

use crate::identity::{Named, NamedArtifact};
use crate::result::{PageError, PageResult};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Value applied to a region to scope it
pub type FilterValue = Value;

/// A sub-area of a page that accepts a filter value.
///
/// Regions are shared between every key they are registered under, and may
/// be shared between pages, so `filter` takes `&self`.
pub trait Region: Named + std::fmt::Debug + Send + Sync {
    /// Scope this region with `value`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Region`] if the value cannot be applied.
    fn filter(&self, value: &FilterValue) -> PageResult<()>;
}

/// Stock region that remembers the last filter value it was scoped to.
#[derive(Debug)]
pub struct ScopedRegion {
    identity: NamedArtifact,
    allowed: Option<Vec<FilterValue>>,
    current: RwLock<Option<FilterValue>>,
    filter_count: AtomicUsize,
}

impl ScopedRegion {
    /// Create a region
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

    /// Create a region without aliases
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank.
    pub fn named(name: impl Into<String>) -> PageResult<Self> {
        Ok(Self::from_identity(NamedArtifact::named(name)?))
    }

    /// Create a region from an existing identity
    #[must_use]
    pub fn from_identity(identity: NamedArtifact) -> Self {
        Self {
            identity,
            allowed: None,
            current: RwLock::new(None),
            filter_count: AtomicUsize::new(0),
        }
    }

    /// Only accept the given filter values
    #[must_use]
    pub fn with_allowed_values(mut self, values: impl IntoIterator<Item = FilterValue>) -> Self {
        self.allowed = Some(values.into_iter().collect());
        self
    }

    /// Value from the most recent successful filter
    #[must_use]
    pub fn current_filter(&self) -> Option<FilterValue> {
        self.current.read().expect("lock poisoned").clone()
    }

    /// Number of times `filter` has been called
    #[must_use]
    pub fn filter_count(&self) -> usize {
        self.filter_count.load(Ordering::SeqCst)
    }

    /// Drop the current scope
    pub fn clear(&self) {
        *self.current.write().expect("lock poisoned") = None;
    }
}

impl Named for ScopedRegion {
    fn identity(&self) -> &NamedArtifact {
        &self.identity
    }
}

impl Region for ScopedRegion {
    fn filter(&self, value: &FilterValue) -> PageResult<()> {
        let _ = self.filter_count.fetch_add(1, Ordering::SeqCst);

        if let Some(allowed) = &self.allowed {
            if !allowed.contains(value) {
                return Err(PageError::region(
                    self.name(),
                    format!("{value} is not one of the allowed values"),
                ));
            }
        }

        tracing::debug!(region = %self.identity, filter = %value, "region scoped");
        *self.current.write().expect("lock poisoned") = Some(value.clone());
        Ok(())
    }
}

type FilterFn = Box<dyn Fn(&FilterValue) -> PageResult<()> + Send + Sync>;

/// Region whose filter behavior is a caller-supplied closure.
pub struct FnRegion {
    identity: NamedArtifact,
    filter: FilterFn,
}

impl std::fmt::Debug for FnRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnRegion")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl FnRegion {
    /// Create a closure-backed region
    #[must_use]
    pub fn new<F>(identity: NamedArtifact, filter: F) -> Self
    where
        F: Fn(&FilterValue) -> PageResult<()> + Send + Sync + 'static,
    {
        Self {
            identity,
            filter: Box::new(filter),
        }
    }
}

impl Named for FnRegion {
    fn identity(&self) -> &NamedArtifact {
        &self.identity
    }
}

impl Region for FnRegion {
    fn filter(&self, value: &FilterValue) -> PageResult<()> {
        (self.filter)(value)
    }
}
