//! Declarative page definitions.
//!
//! Pages can be described in YAML or JSON and built in one step:
//!
//! ```yaml
//! name: Prescription New
//! aliases: [New Prescription, New Rx]
//! application: Pharmacy
//! url_pattern: /prescriptions/new
//! controls:
//!   - name: Prescriber Name
//!     aliases: [Prescriber]
//!     description: prescriber full name
//! regions:
//!   - name: Drug List
//!     values: [Aspirin, Ibuprofen]
//! ```
//!
//! Identities are validated with the same rules as hand-built artifacts.

use crate::application::ApplicationRegistry;
use crate::control::Control;
use crate::identity::NamedArtifact;
use crate::page::Page;
use crate::presence::UrlPresence;
use crate::region::{FilterValue, ScopedRegion};
use crate::result::{PageError, PageResult};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Raw page document. Identity fields stay untyped so they are checked by
/// [`NamedArtifact::from_parts`]; entries stay untyped so a non-mapping
/// entry is reported as an invalid argument.
#[derive(Debug, Deserialize)]
struct PageDocument {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    aliases: Value,
    #[serde(default)]
    application: Option<String>,
    #[serde(default)]
    url_pattern: Option<String>,
    #[serde(default)]
    controls: Option<Vec<Value>>,
    #[serde(default)]
    regions: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ControlDocument {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    aliases: Value,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegionDocument {
    #[serde(default)]
    name: Value,
    #[serde(default)]
    aliases: Value,
    #[serde(default)]
    values: Option<Vec<FilterValue>>,
}

/// A control entry of a page definition
#[derive(Debug, Clone, PartialEq)]
pub struct ControlDefinition {
    /// Control identity
    pub identity: NamedArtifact,
    /// Optional description
    pub description: Option<String>,
}

/// A region entry of a page definition
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDefinition {
    /// Region identity
    pub identity: NamedArtifact,
    /// Allowed filter values. `None` accepts any value; an empty `values`
    /// list in a document is read as `None`.
    pub values: Option<Vec<FilterValue>>,
}

/// A validated page definition
#[derive(Debug, Clone, PartialEq)]
pub struct PageDefinition {
    /// Page identity
    pub identity: NamedArtifact,
    /// Application the page belongs to
    pub application: Option<String>,
    /// URL pattern used for presence checks
    pub url_pattern: Option<String>,
    /// Controls in declaration order
    pub controls: Vec<ControlDefinition>,
    /// Regions in declaration order
    pub regions: Vec<RegionDefinition>,
}

impl PageDefinition {
    /// Parse a definition from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::Definition`] for malformed YAML or fields,
    /// [`PageError::Validation`] for malformed identities and
    /// [`PageError::InvalidArgument`] for control or region entries that
    /// are not mappings.
    pub fn from_yaml(yaml: &str) -> PageResult<Self> {
        let value: Value = serde_yaml_ng::from_str(yaml)?;
        Self::from_value(&value)
    }

    /// Parse a definition from JSON.
    ///
    /// # Errors
    ///
    /// Same as [`PageDefinition::from_yaml`].
    pub fn from_json(json: &str) -> PageResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(&value)
    }

    /// Build a definition from an already parsed document.
    ///
    /// # Errors
    ///
    /// Same as [`PageDefinition::from_yaml`].
    pub fn from_value(value: &Value) -> PageResult<Self> {
        // a derived struct would also accept a sequence positionally
        if !value.is_object() {
            return Err(PageError::definition("page definition must be a mapping"));
        }
        Self::from_document(PageDocument::deserialize(value)?)
    }

    fn from_document(doc: PageDocument) -> PageResult<Self> {
        let identity = NamedArtifact::from_parts(&doc.name, &doc.aliases)?;

        let controls = doc
            .controls
            .unwrap_or_default()
            .iter()
            .map(|entry| {
                let control: ControlDocument = decode_entry(entry, "control")?;
                Ok(ControlDefinition {
                    identity: NamedArtifact::from_parts(&control.name, &control.aliases)?,
                    description: control.description,
                })
            })
            .collect::<PageResult<Vec<_>>>()?;

        let regions = doc
            .regions
            .unwrap_or_default()
            .iter()
            .map(|entry| {
                let region: RegionDocument = decode_entry(entry, "region")?;
                Ok(RegionDefinition {
                    identity: NamedArtifact::from_parts(&region.name, &region.aliases)?,
                    values: region.values.filter(|values| !values.is_empty()),
                })
            })
            .collect::<PageResult<Vec<_>>>()?;

        Ok(Self {
            identity,
            application: doc.application,
            url_pattern: doc.url_pattern,
            controls,
            regions,
        })
    }

    /// Build the page with the default presence check.
    #[must_use]
    pub fn build(&self) -> Arc<Page> {
        let page = Page::from_identity(self.identity.clone());
        for control in &self.controls {
            let mut built = Control::from_identity(control.identity.clone());
            if let Some(description) = &control.description {
                built = built.with_description(description.clone());
            }
            page.add_control(built);
        }
        for region in &self.regions {
            let mut built = ScopedRegion::from_identity(region.identity.clone());
            if let Some(values) = &region.values {
                built = built.with_allowed_values(values.iter().cloned());
            }
            page.add_region(built);
        }
        tracing::debug!(
            page = %self.identity,
            controls = self.controls.len(),
            regions = self.regions.len(),
            "page built from definition"
        );
        Arc::new(page)
    }

    /// Build the page, checking presence against the driver's current URL
    /// when the definition carries a `url_pattern`.
    #[must_use]
    pub fn build_with_url<F>(&self, current_url: F) -> Arc<Page>
    where
        F: Fn() -> Option<String> + Send + Sync + 'static,
    {
        let page = self.build();
        if let Some(pattern) = &self.url_pattern {
            page.set_presence(UrlPresence::new(pattern, current_url));
        }
        page
    }

    /// Build the page and add it to its application in `registry`, if the
    /// definition names one.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::InvalidArgument`] if the application name is blank.
    pub fn build_in(&self, registry: &ApplicationRegistry) -> PageResult<Arc<Page>> {
        let page = self.build();
        if let Some(application) = &self.application {
            let _ = page.add_to_application_in(registry, application.as_str())?;
        }
        Ok(page)
    }
}

fn decode_entry<'de, T: Deserialize<'de>>(entry: &'de Value, what: &str) -> PageResult<T> {
    if !entry.is_object() {
        return Err(PageError::invalid_argument(format!(
            "{what} must be a mapping when adding it to a page"
        )));
    }
    Ok(T::deserialize(entry)?)
}
