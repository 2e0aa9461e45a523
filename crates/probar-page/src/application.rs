//! Applications: named collections of pages.
//!
//! Pages join an application either by passing the application itself or by
//! naming it; a named application is looked up in an [`ApplicationRegistry`]
//! and created on first use.

// Allow expect for RwLock - lock poisoning is truly exceptional
#![allow(clippy::expect_used)]

use crate::identity::{Named, NamedArtifact};
use crate::page::Page;
use crate::result::{PageError, PageResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, OnceLock, RwLock};

/// Application a page should join
#[derive(Debug, Clone)]
pub enum ApplicationRef {
    /// Look up (or create) the application with this name
    Name(String),
    /// Use this application directly
    Instance(Arc<Application>),
}

impl From<&str> for ApplicationRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ApplicationRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Arc<Application>> for ApplicationRef {
    fn from(app: Arc<Application>) -> Self {
        Self::Instance(app)
    }
}

impl From<&Arc<Application>> for ApplicationRef {
    fn from(app: &Arc<Application>) -> Self {
        Self::Instance(Arc::clone(app))
    }
}

/// The application under test, owning its pages by name and alias.
#[derive(Debug)]
pub struct Application {
    identity: NamedArtifact,
    pages: RwLock<HashMap<String, Arc<Page>>>,
}

impl Application {
    /// Create an application
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank.
    pub fn new(name: impl Into<String>) -> PageResult<Self> {
        Ok(Self {
            identity: NamedArtifact::named(name)?,
            pages: RwLock::new(HashMap::new()),
        })
    }

    /// Add a page under its name and every alias
    pub fn add_page(&self, page: Arc<Page>) -> &Self {
        let mut pages = self.pages.write().expect("lock poisoned");
        for key in page.identity().keys() {
            let _ = pages.insert(key.to_string(), Arc::clone(&page));
        }
        tracing::debug!(application = %self.identity, page = page.name(), "page added");
        self
    }

    /// Get a page by name or alias
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Lookup`] if no page answers to `key`.
    pub fn page(&self, key: &str) -> PageResult<Arc<Page>> {
        self.pages
            .read()
            .expect("lock poisoned")
            .get(key)
            .cloned()
            .ok_or_else(|| PageError::page_not_found(self.identity.name(), key))
    }

    /// Every distinct page, in no particular order.
    ///
    /// A page registered under several keys appears once. Two pages that
    /// share a name are both listed while either is still reachable.
    #[must_use]
    pub fn pages(&self) -> Vec<Arc<Page>> {
        let pages = self.pages.read().expect("lock poisoned");
        let mut seen = HashSet::new();
        pages
            .values()
            .filter(|page| seen.insert(Arc::as_ptr(*page)))
            .cloned()
            .collect()
    }

    /// Canonical names of all distinct pages, sorted
    #[must_use]
    pub fn page_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .pages()
            .iter()
            .map(|p| p.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Number of distinct pages
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages().len()
    }
}

impl Named for Application {
    fn identity(&self) -> &NamedArtifact {
        &self.identity
    }
}

/// Registry of applications by name
#[derive(Debug, Default)]
pub struct ApplicationRegistry {
    applications: RwLock<HashMap<String, Arc<Application>>>,
}

impl ApplicationRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<ApplicationRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Register an application, replacing any with the same name
    pub fn register(&self, application: Application) -> Arc<Application> {
        let application = Arc::new(application);
        let _ = self
            .applications
            .write()
            .expect("lock poisoned")
            .insert(application.name().to_string(), Arc::clone(&application));
        application
    }

    /// Find an application by name
    #[must_use]
    pub fn find(&self, name: &str) -> Option<Arc<Application>> {
        self.applications
            .read()
            .expect("lock poisoned")
            .get(name)
            .cloned()
    }

    /// Find an application by name, creating and registering it if absent
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidArgument`] if `name` is blank.
    pub fn find_or_create(&self, name: &str) -> PageResult<Arc<Application>> {
        if name.trim().is_empty() {
            return Err(PageError::invalid_argument(
                "application name cannot be empty when adding a page to an application",
            ));
        }

        let mut applications = self.applications.write().expect("lock poisoned");
        if let Some(app) = applications.get(name) {
            return Ok(Arc::clone(app));
        }

        let app = Arc::new(Application::new(name)?);
        let _ = applications.insert(name.to_string(), Arc::clone(&app));
        tracing::debug!(application = name, "application created");
        Ok(app)
    }

    pub(crate) fn resolve(&self, application: ApplicationRef) -> PageResult<Arc<Application>> {
        match application {
            ApplicationRef::Name(name) => self.find_or_create(&name),
            ApplicationRef::Instance(app) => Ok(app),
        }
    }

    /// Names of all registered applications, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .applications
            .read()
            .expect("lock poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Number of registered applications
    #[must_use]
    pub fn count(&self) -> usize {
        self.applications.read().expect("lock poisoned").len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::result::ErrorKind;

    mod application_tests {
        use super::*;

        #[test]
        fn test_add_page_by_name_and_alias() {
            let app = Application::new("Blogger").unwrap();
            let page = Arc::new(Page::new("Edit User", ["User Edit"]).unwrap());
            app.add_page(Arc::clone(&page));

            assert!(Arc::ptr_eq(&app.page("Edit User").unwrap(), &page));
            assert!(Arc::ptr_eq(&app.page("User Edit").unwrap(), &page));
            assert_eq!(app.page_names(), ["Edit User"]);
            assert_eq!(app.page_count(), 1);
        }

        #[test]
        fn test_pages_sharing_a_name_counted_separately() {
            let app = Application::new("Blogger").unwrap();
            let first = Arc::new(Page::new("Home", ["Start"]).unwrap());
            let second = Arc::new(Page::named("Home").unwrap());
            app.add_page(Arc::clone(&first)).add_page(Arc::clone(&second));

            assert!(Arc::ptr_eq(&app.page("Start").unwrap(), &first));
            assert!(Arc::ptr_eq(&app.page("Home").unwrap(), &second));
            assert_eq!(app.page_count(), 2);
            assert_eq!(app.page_names(), ["Home", "Home"]);
        }

        #[test]
        fn test_fully_replaced_page_not_counted() {
            let app = Application::new("Blogger").unwrap();
            app.add_page(Arc::new(Page::named("Home").unwrap()))
                .add_page(Arc::new(Page::named("Home").unwrap()));
            assert_eq!(app.page_count(), 1);
        }

        #[test]
        fn test_unknown_page() {
            let app = Application::new("Blogger").unwrap();
            assert_eq!(app.page("Nope").unwrap_err().kind(), ErrorKind::Lookup);
        }

        #[test]
        fn test_blank_name() {
            assert_eq!(Application::new("").unwrap_err().kind(), ErrorKind::Validation);
        }
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn test_new_registry() {
            let registry = ApplicationRegistry::new();
            assert_eq!(registry.count(), 0);
            assert!(registry.find("Blogger").is_none());
        }

        #[test]
        fn test_find_or_create_reuses() {
            let registry = ApplicationRegistry::new();
            let first = registry.find_or_create("Blogger").unwrap();
            let second = registry.find_or_create("Blogger").unwrap();
            assert!(Arc::ptr_eq(&first, &second));
            assert_eq!(registry.names(), ["Blogger"]);
        }

        #[test]
        fn test_find_or_create_rejects_blank() {
            let registry = ApplicationRegistry::new();
            let err = registry.find_or_create(" ").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
            assert_eq!(registry.count(), 0);
        }

        #[test]
        fn test_register_and_find() {
            let registry = ApplicationRegistry::new();
            let app = registry.register(Application::new("Pharmacy").unwrap());
            assert!(Arc::ptr_eq(&registry.find("Pharmacy").unwrap(), &app));
        }
    }

    mod add_to_application_tests {
        use super::*;

        #[test]
        fn test_by_name_creates_application() {
            let registry = ApplicationRegistry::new();
            let page = Arc::new(Page::named("Edit User").unwrap());
            let returned = page.add_to_application_in(&registry, "Blogger").unwrap();
            assert!(Arc::ptr_eq(returned, &page));

            let app = registry.find("Blogger").unwrap();
            assert!(Arc::ptr_eq(&app.page("Edit User").unwrap(), &page));
        }

        #[test]
        fn test_by_name_uses_existing_application() {
            let registry = ApplicationRegistry::new();
            let app = registry.register(Application::new("Blogger").unwrap());
            let page = Arc::new(Page::named("Edit User").unwrap());
            let _ = page.add_to_application_in(&registry, "Blogger").unwrap();

            assert_eq!(registry.count(), 1);
            assert_eq!(app.page_names(), ["Edit User"]);
        }

        #[test]
        fn test_by_instance() {
            let registry = ApplicationRegistry::new();
            let app = Arc::new(Application::new("Standalone").unwrap());
            let page = Arc::new(Page::named("Home").unwrap());
            let _ = page.add_to_application_in(&registry, &app).unwrap();

            assert!(app.page("Home").is_ok());
            assert_eq!(registry.count(), 0);
        }

        #[test]
        fn test_blank_name_rejected() {
            let registry = ApplicationRegistry::new();
            let page = Arc::new(Page::named("Home").unwrap());
            let err = page.add_to_application_in(&registry, "").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        }

        #[test]
        fn test_global_registry() {
            let page = Arc::new(Page::named("Global Home").unwrap());
            let _ = page
                .add_to_application("probar-page global registry test")
                .unwrap();
            let app = ApplicationRegistry::global()
                .find("probar-page global registry test")
                .unwrap();
            assert!(app.page("Global Home").is_ok());
        }
    }
}
