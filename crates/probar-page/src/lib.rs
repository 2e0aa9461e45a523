//! Probar Pages: page objects as registries of named regions and controls
//!
//! A [`Page`] is a single addressable unit of the UI under test. It indexes
//! its [`Region`]s and [`Control`]s under their names and aliases, and runs
//! its [`PresenceCheck`] before handing any of them out.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  ApplicationRegistry ──► Application ──► Page (name/aliases) │
//! │                                           │                  │
//! │                     ┌─────────────────────┼──────────────┐   │
//! │                     ▼                     ▼              ▼   │
//! │               regions by key       controls by key   hooks   │
//! │               (Arc<dyn Region>)    (Arc<Control>)    test,   │
//! │                     │                     │          navigate│
//! │                     └──── PresenceCheck ──┘                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use probar_page::prelude::*;
//!
//! fn main() -> PageResult<()> {
//!     let page = Page::new("Login", ["Sign In"])?;
//!     page.add_control(Control::new("Username", ["User"])?);
//!
//!     assert_eq!(page.control("User")?.name(), "Username");
//!     assert!(page.control("Password").is_err());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

mod application;
mod control;
mod definition;
mod identity;
pub mod logging;
mod page;
mod presence;
mod region;
mod result;

pub use application::{Application, ApplicationRef, ApplicationRegistry};
pub use control::Control;
pub use definition::{ControlDefinition, PageDefinition, RegionDefinition};
pub use identity::{Named, NamedArtifact};
pub use page::{NavigateOptions, Page};
pub use presence::{AlwaysPresent, FnPresence, NeverPresent, PresenceCheck, UrlMatcher, UrlPresence};
pub use region::{FilterValue, FnRegion, Region, ScopedRegion};
pub use result::{ErrorKind, PageError, PageResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::application::*;
    pub use super::control::*;
    pub use super::definition::*;
    pub use super::identity::*;
    pub use super::page::*;
    pub use super::presence::*;
    pub use super::region::*;
    pub use super::result::*;
}
