//! Example: Login page with aliased controls and a filterable region
//!
//! Run with: `cargo run -p probar-page --example login_page`

use probar_page::logging::{self, LogFormat};
use probar_page::prelude::*;
use std::sync::{Arc, Mutex};

fn main() -> PageResult<()> {
    let _ = logging::init(LogFormat::Pretty);
    println!("=== Page Registry Example ===\n");

    let current_url = Arc::new(Mutex::new(None::<String>));

    // 1. Build the page
    println!("1. Creating page...");
    let url_source = Arc::clone(&current_url);
    let page = Arc::new(Page::new("Login", ["Sign In"])?.with_presence(UrlPresence::new(
        "/login",
        move || url_source.lock().ok().and_then(|url| url.clone()),
    )));
    page.add_control(Control::new("Username", ["User"])?.with_description("account name field"))
        .add_control(Control::named("Password")?)
        .add_region(ScopedRegion::new("Recent Users", ["Recent"])?);
    println!("   Controls: {:?}", page.control_keys());
    println!("   Regions:  {:?}", page.region_keys());

    // 2. Navigation hook
    println!("\n2. Navigating...");
    let nav_url = Arc::clone(&current_url);
    page.add_navigation(move |opts| {
        let base = opts.get_str("base").unwrap_or("http://localhost:8080");
        if let Ok(mut url) = nav_url.lock() {
            *url = Some(format!("{base}/login"));
        }
        Ok(())
    });

    match page.control("User") {
        Ok(_) => println!("   unexpected: page present before navigation"),
        Err(err) => println!("   before navigation: {err}"),
    }
    page.navigate(&NavigateOptions::new())?;

    // 3. Resolve elements
    println!("\n3. Resolving elements...");
    let user = page.control("User")?;
    println!("   User -> {} ({:?})", user.name(), user.description());
    let recent = page.region("Recent", "jsmith")?;
    println!("   Recent -> {} filtered by \"jsmith\"", recent.name());
    if let Err(err) = page.control("Remember Me") {
        println!("   {err}");
    }

    // 4. Join an application
    println!("\n4. Adding to application...");
    let registry = ApplicationRegistry::new();
    let _ = page.add_to_application_in(&registry, "Blogger")?;
    if let Some(app) = registry.find("Blogger") {
        println!("   Blogger pages: {:?}", app.page_names());
    }

    println!("\n=== Done ===");
    Ok(())
}
