//! End-to-end tests for a login page assembled from regions and controls.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use probar_page::logging::{self, LogFormat};
use probar_page::prelude::*;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Stand-in for a live driver: tracks which URL the browser shows.
#[derive(Debug, Default)]
struct FakeBrowser {
    url: Mutex<Option<String>>,
}

impl FakeBrowser {
    fn visit(&self, url: &str) {
        *self.url.lock().unwrap() = Some(url.to_string());
    }

    fn current_url(&self) -> Option<String> {
        self.url.lock().unwrap().clone()
    }
}

fn login_page(browser: &Arc<FakeBrowser>) -> Arc<Page> {
    let source = Arc::clone(browser);
    let page = Arc::new(
        Page::new("Login", ["Sign In"])
            .unwrap()
            .with_presence(UrlPresence::new("/login", move || source.current_url())),
    );

    page.add_control(Control::new("Username", ["User"]).unwrap())
        .add_control(Control::named("Password").unwrap())
        .add_region(ScopedRegion::new("Recent Users", ["Recent"]).unwrap());

    let nav_browser = Arc::clone(browser);
    page.add_navigation(move |opts| {
        let base = opts.get_str("base").unwrap_or("https://app.test");
        nav_browser.visit(&format!("{base}/login"));
        Ok(())
    });
    page
}

#[test]
fn login_scenario() {
    let _ = logging::init(LogFormat::Pretty);

    let page = Page::new("Login", ["Sign In"]).unwrap();
    page.add_control(Control::new("Username", ["User"]).unwrap());

    assert_eq!(page.control("User").unwrap().name(), "Username");
    let err = page.control("Password").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[test]
fn navigate_then_resolve() {
    let browser = Arc::new(FakeBrowser::default());
    let page = login_page(&browser);

    // nothing loaded yet
    let err = page.control("Username").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Presence);
    assert!(err.to_string().contains("\"Username\""));

    page.navigate(&NavigateOptions::new()).unwrap();
    assert_eq!(browser.current_url().as_deref(), Some("https://app.test/login"));
    assert_eq!(page.control("User").unwrap().name(), "Username");

    browser.visit("https://app.test/dashboard");
    assert_eq!(page.control("User").unwrap_err().kind(), ErrorKind::Presence);
}

#[test]
fn region_filter_only_after_presence() {
    let browser = Arc::new(FakeBrowser::default());
    let page = login_page(&browser);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    page.add_region(FnRegion::new(
        NamedArtifact::new("User Table", ["Users"]).unwrap(),
        move |_| {
            let _ = counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        },
    ));

    assert_eq!(page.region("Users", "jsmith").unwrap_err().kind(), ErrorKind::Presence);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    browser.visit("/login");
    let region = page.region("Users", "jsmith").unwrap();
    assert_eq!(region.name(), "User Table");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn page_test_hook_checks_page() {
    let browser = Arc::new(FakeBrowser::default());
    let page = login_page(&browser);
    assert_eq!(page.page_test().unwrap_err().kind(), ErrorKind::NotConfigured);

    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    let weak = Arc::downgrade(&page);
    page.add_page_test(move || {
        flag.store(true, Ordering::SeqCst);
        let page = weak.upgrade().expect("page alive");
        page.control("Password").map(|_| ())
    });

    assert_eq!(page.page_test().unwrap_err().kind(), ErrorKind::Presence);
    assert!(ran.load(Ordering::SeqCst));

    page.navigate(&NavigateOptions::new().with("base", "http://localhost:8080"))
        .unwrap();
    page.page_test().unwrap();
}

#[test]
fn pages_join_application() {
    let registry = ApplicationRegistry::new();
    let browser = Arc::new(FakeBrowser::default());
    let login = login_page(&browser);
    let _ = login.add_to_application_in(&registry, "Blogger").unwrap();

    let home = Arc::new(Page::named("Home").unwrap());
    let app = registry.find("Blogger").unwrap();
    let _ = home.add_to_application_in(&registry, &app).unwrap();

    assert_eq!(app.page_names(), ["Home", "Login"]);
    assert!(Arc::ptr_eq(&app.page("Sign In").unwrap(), &login));
}

#[test]
fn definition_driven_page() {
    let yaml = r"
name: Edit User
aliases: [User Edit]
application: Blogger
url_pattern: /users/:id/edit
controls:
  - name: Save
regions:
  - name: Roles
    values: [admin, editor]
";
    let browser = Arc::new(FakeBrowser::default());
    let source = Arc::clone(&browser);
    let def = PageDefinition::from_yaml(yaml).unwrap();
    let page = def.build_with_url(move || source.current_url());

    browser.visit("https://blog.test/users/7/edit");
    assert!(page.control("Save").is_ok());
    let roles = page.region("Roles", "editor").unwrap();
    assert_eq!(roles.name(), "Roles");
    assert_eq!(page.region("Roles", json!("root")).unwrap_err().kind(), ErrorKind::Region);
}
