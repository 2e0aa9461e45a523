//! Pages: registries of regions and controls behind a presence check.
//!
//! A [`Page`] indexes every region and control under its name and each of
//! its aliases. All keys of one element share the same handle, so resolving
//! `"A"`, `"B"` or `"C"` for a region named `A` with aliases `B` and `C`
//! yields the identical instance.
//!
//! Resolving a region or control always runs the page's presence check
//! first. A region is filtered only after presence succeeds.
//!
//! Registering an element under a key that is already taken replaces the
//! previous mapping for that key only (last write wins). Other keys of the
//! replaced element keep pointing at it.
//!
//! # Example
//!
//! ```
//! use probar_page::prelude::*;
//!
//! # fn main() -> PageResult<()> {
//! let page = Page::new("Login", ["Sign In"])?;
//! page.add_control(Control::new("Username", ["User"])?);
//! let control = page.control("User")?;
//! assert_eq!(control.name(), "Username");
//! # Ok(())
//! # }
//! ```

// Allow expect for RwLock - lock poisoning is truly exceptional
#![allow(clippy::expect_used)]

use crate::application::{ApplicationRef, ApplicationRegistry};
use crate::control::Control;
use crate::identity::{Named, NamedArtifact};
use crate::presence::{AlwaysPresent, PresenceCheck};
use crate::region::{FilterValue, Region};
use crate::result::{PageError, PageResult};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type PageTestFn = Arc<dyn Fn() -> PageResult<()> + Send + Sync>;
type NavigateFn = Arc<dyn Fn(&NavigateOptions) -> PageResult<()> + Send + Sync>;

/// Options bag handed to a page's navigation procedure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigateOptions {
    values: Map<String, Value>,
}

impl NavigateOptions {
    /// Empty options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let _ = self.values.insert(key.into(), value.into());
        self
    }

    /// Get an option
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a string option
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Number of options
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no options are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Map<String, Value>> for NavigateOptions {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

/// A single addressable unit of the UI under test.
pub struct Page {
    identity: NamedArtifact,
    regions: RwLock<HashMap<String, Arc<dyn Region>>>,
    controls: RwLock<HashMap<String, Arc<Control>>>,
    presence: RwLock<Arc<dyn PresenceCheck>>,
    page_test: RwLock<Option<PageTestFn>>,
    navigate: RwLock<Option<NavigateFn>>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("identity", &self.identity)
            .field("region_keys", &self.region_keys())
            .field("control_keys", &self.control_keys())
            .field("has_page_test", &self.has_page_test())
            .field("has_navigation", &self.has_navigation())
            .finish()
    }
}

impl Page {
    /// Create a page
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

    /// Create a page without aliases
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank.
    pub fn named(name: impl Into<String>) -> PageResult<Self> {
        Ok(Self::from_identity(NamedArtifact::named(name)?))
    }

    /// Create a page from an existing identity
    #[must_use]
    pub fn from_identity(identity: NamedArtifact) -> Self {
        Self {
            identity,
            regions: RwLock::new(HashMap::new()),
            controls: RwLock::new(HashMap::new()),
            presence: RwLock::new(Arc::new(AlwaysPresent)),
            page_test: RwLock::new(None),
            navigate: RwLock::new(None),
        }
    }

    /// Use `check` to verify this page is displayed
    #[must_use]
    pub fn with_presence(self, check: impl PresenceCheck + 'static) -> Self {
        self.set_presence(check);
        self
    }

    /// Replace the presence check
    pub fn set_presence(&self, check: impl PresenceCheck + 'static) -> &Self {
        *self.presence.write().expect("lock poisoned") = Arc::new(check);
        self
    }

    /// Run the presence check, failing with `failure_message`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Presence`] if the page is not displayed.
    pub fn verify_presence(&self, failure_message: &str) -> PageResult<()> {
        let check = self.presence.read().expect("lock poisoned").clone();
        let result = check.verify_presence(failure_message);
        match &result {
            Ok(()) => tracing::debug!(page = %self.identity, "presence verified"),
            Err(err) => tracing::warn!(page = %self.identity, error = %err, "presence check failed"),
        }
        result
    }

    /// Register this page with the process-wide application of that name,
    /// or with the given application.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidArgument`] if the application name is blank.
    pub fn add_to_application(
        self: &Arc<Self>,
        application: impl Into<ApplicationRef>,
    ) -> PageResult<&Arc<Self>> {
        self.add_to_application_in(ApplicationRegistry::global(), application)
    }

    /// Like [`Page::add_to_application`], resolving names in `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidArgument`] if the application name is blank.
    pub fn add_to_application_in(
        self: &Arc<Self>,
        registry: &ApplicationRegistry,
        application: impl Into<ApplicationRef>,
    ) -> PageResult<&Arc<Self>> {
        let app = registry.resolve(application.into())?;
        app.add_page(Arc::clone(self));
        Ok(self)
    }

    /// Register a region under its name and every alias
    pub fn add_region<R: Region + 'static>(&self, region: R) -> &Self {
        self.add_region_shared(Arc::new(region))
    }

    /// Register a shared region under its name and every alias.
    ///
    /// The same region may be registered with several pages.
    pub fn add_region_shared(&self, region: Arc<dyn Region>) -> &Self {
        let mut regions = self.regions.write().expect("lock poisoned");
        for key in region.identity().keys() {
            if let Some(previous) = regions.insert(key.to_string(), Arc::clone(&region)) {
                if !Arc::ptr_eq(&previous, &region) {
                    tracing::debug!(
                        page = %self.identity,
                        key,
                        replaced = previous.name(),
                        "region key reassigned"
                    );
                }
            }
        }
        tracing::debug!(page = %self.identity, region = region.name(), "region added");
        self
    }

    /// Register a control under its name and every alias
    pub fn add_control(&self, control: Control) -> &Self {
        self.add_control_shared(Arc::new(control))
    }

    /// Register a shared control under its name and every alias
    pub fn add_control_shared(&self, control: Arc<Control>) -> &Self {
        let mut controls = self.controls.write().expect("lock poisoned");
        for key in control.identity().keys() {
            if let Some(previous) = controls.insert(key.to_string(), Arc::clone(&control)) {
                if !Arc::ptr_eq(&previous, &control) {
                    tracing::debug!(
                        page = %self.identity,
                        key,
                        replaced = previous.name(),
                        "control key reassigned"
                    );
                }
            }
        }
        tracing::debug!(page = %self.identity, control = control.name(), "control added");
        self
    }

    /// Resolve a region by name or alias and scope it with `value`.
    ///
    /// The page presence check runs before the filter is applied.
    ///
    /// # Errors
    ///
    /// - [`PageError::Lookup`] if no region answers to `key`
    /// - [`PageError::Presence`] if the page is not displayed
    /// - [`PageError::Region`] if the region rejects `value`
    pub fn region(&self, key: &str, value: impl Into<FilterValue>) -> PageResult<Arc<dyn Region>> {
        let region = self
            .regions
            .read()
            .expect("lock poisoned")
            .get(key)
            .cloned()
            .ok_or_else(|| PageError::region_not_found(key))?;

        self.verify_presence(&format!(
            "Cannot navigate to region \"{key}\" because page presence check failed"
        ))?;

        region.filter(&value.into())?;
        Ok(region)
    }

    /// Resolve a control by name or alias.
    ///
    /// # Errors
    ///
    /// - [`PageError::Lookup`] if no control answers to `key`
    /// - [`PageError::Presence`] if the page is not displayed
    pub fn control(&self, key: &str) -> PageResult<Arc<Control>> {
        let control = self
            .controls
            .read()
            .expect("lock poisoned")
            .get(key)
            .cloned()
            .ok_or_else(|| PageError::control_not_found(key))?;

        self.verify_presence(&format!(
            "Cannot navigate to control \"{key}\" because page presence check failed"
        ))?;

        Ok(control)
    }

    /// Set the page-level test procedure, replacing any previous one
    pub fn add_page_test<F>(&self, test: F) -> &Self
    where
        F: Fn() -> PageResult<()> + Send + Sync + 'static,
    {
        *self.page_test.write().expect("lock poisoned") = Some(Arc::new(test));
        self
    }

    /// Run the page-level test procedure.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotConfigured`] if no procedure was set, or
    /// whatever the procedure returns.
    pub fn page_test(&self) -> PageResult<()> {
        // clone out of the lock so the procedure may use this page
        let test = self
            .page_test
            .read()
            .expect("lock poisoned")
            .clone()
            .ok_or_else(|| self.not_configured("page test"))?;
        tracing::debug!(page = %self.identity, "running page test");
        test()
    }

    /// Set the navigation procedure, replacing any previous one
    pub fn add_navigation<F>(&self, navigate: F) -> &Self
    where
        F: Fn(&NavigateOptions) -> PageResult<()> + Send + Sync + 'static,
    {
        *self.navigate.write().expect("lock poisoned") = Some(Arc::new(navigate));
        self
    }

    /// Navigate to this page.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotConfigured`] if no procedure was set, or
    /// whatever the procedure returns.
    pub fn navigate(&self, options: &NavigateOptions) -> PageResult<()> {
        let navigate = self
            .navigate
            .read()
            .expect("lock poisoned")
            .clone()
            .ok_or_else(|| self.not_configured("navigation"))?;
        tracing::debug!(page = %self.identity, options = options.len(), "navigating");
        navigate(options)
    }

    fn not_configured(&self, hook: &'static str) -> PageError {
        PageError::NotConfigured {
            page: self.identity.name().to_string(),
            hook,
        }
    }

    /// Every region key, sorted
    #[must_use]
    pub fn region_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .regions
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Every control key, sorted
    #[must_use]
    pub fn control_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .controls
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Whether a region answers to `key`
    #[must_use]
    pub fn has_region(&self, key: &str) -> bool {
        self.regions.read().expect("lock poisoned").contains_key(key)
    }

    /// Whether a control answers to `key`
    #[must_use]
    pub fn has_control(&self, key: &str) -> bool {
        self.controls.read().expect("lock poisoned").contains_key(key)
    }

    /// Whether a page test is set
    #[must_use]
    pub fn has_page_test(&self) -> bool {
        self.page_test.read().expect("lock poisoned").is_some()
    }

    /// Whether a navigation procedure is set
    #[must_use]
    pub fn has_navigation(&self) -> bool {
        self.navigate.read().expect("lock poisoned").is_some()
    }
}

impl Named for Page {
    fn identity(&self) -> &NamedArtifact {
        &self.identity
    }
}
