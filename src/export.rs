//! Export / Import Envelopes
//!
//! Persisted data travels as a versioned JSON envelope. Import verifies the
//! producing plugin, the payload type, and major-version compatibility before
//! anything is written back; an envelope is applied whole or not at all.

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

use crate::error::{FieldsError, Result};
use crate::store::{DataObject, DataObjectStore, KeyValueStore, SchemaStore};

/// Slug identifying this plugin in envelopes.
pub const PLUGIN_SLUG: &str = "theme-fields";

/// Version of the envelope format this build writes.
pub const FORMAT_VERSION: &str = "1.0.0";

/// What an envelope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Schemas,
    DataObjects,
}

impl ExportKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Schemas => "schemas",
            Self::DataObjects => "data_objects",
        }
    }
}

/// The versioned JSON envelope wrapping exported data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub plugin: String,
    #[serde(rename = "type")]
    pub kind: ExportKind,
    pub version: String,
    pub site_url: String,
    pub exported_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

impl Envelope {
    fn new(kind: ExportKind, site_url: &str, payload: serde_json::Value) -> Self {
        Self {
            plugin: PLUGIN_SLUG.to_string(),
            kind,
            version: FORMAT_VERSION.to_string(),
            site_url: site_url.to_string(),
            exported_at: Utc::now(),
            payload,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reject envelopes from other plugins, of the wrong kind, or of an
    /// incompatible major version.
    fn check(&self, expected: ExportKind) -> Result<()> {
        if self.plugin != PLUGIN_SLUG {
            return Err(FieldsError::EnvelopePlugin {
                expected: PLUGIN_SLUG.to_string(),
                found: self.plugin.clone(),
            });
        }

        if self.kind != expected {
            return Err(FieldsError::EnvelopeKind {
                expected: expected.as_str().to_string(),
                found: self.kind.as_str().to_string(),
            });
        }

        let found = Version::parse(&self.version)?;
        let supported = Version::parse(FORMAT_VERSION)?;
        if found.major != supported.major {
            return Err(FieldsError::EnvelopeVersion {
                supported: FORMAT_VERSION.to_string(),
                found: self.version.clone(),
            });
        }

        Ok(())
    }
}

/// Export every template schema plus the global schema slot.
pub fn export_schemas<S: KeyValueStore>(store: &mut S, site_url: &str) -> Envelope {
    let schemas = SchemaStore::new(store);

    let mut templates = BTreeMap::new();
    for template in schemas.templates() {
        if let Some(yaml) = schemas.schema_for_template(&template) {
            templates.insert(template, yaml);
        }
    }

    let payload = json!({
        "global": schemas.global_schema(),
        "templates": templates,
    });

    Envelope::new(ExportKind::Schemas, site_url, payload)
}

/// Apply a schemas envelope to the store. Returns how many schema slots were
/// written.
pub fn import_schemas<S: KeyValueStore>(store: &mut S, envelope: &Envelope) -> Result<usize> {
    envelope.check(ExportKind::Schemas)?;

    let templates: BTreeMap<String, String> = envelope
        .payload
        .get("templates")
        .cloned()
        .map(serde_json::from_value)
        .transpose()?
        .unwrap_or_default();

    let global: Option<String> = envelope
        .payload
        .get("global")
        .cloned()
        .map(serde_json::from_value)
        .transpose()?
        .flatten();

    let mut schemas = SchemaStore::new(store);
    let mut written = 0;

    for (template, yaml) in &templates {
        schemas.set_schema_for_template(template, yaml)?;
        written += 1;
    }
    if let Some(yaml) = &global {
        schemas.set_global_schema(yaml)?;
        written += 1;
    }

    Ok(written)
}

/// Export every named data object.
pub fn export_data_objects<S: KeyValueStore>(store: &mut S, site_url: &str) -> Result<Envelope> {
    let objects = DataObjectStore::new(store);

    let mut collected = Vec::new();
    for slug in objects.slugs() {
        if let Some(object) = objects.get(&slug) {
            collected.push(object);
        }
    }

    let payload = json!({ "objects": serde_json::to_value(&collected)? });
    Ok(Envelope::new(ExportKind::DataObjects, site_url, payload))
}

/// Apply a data-objects envelope to the store. Returns how many objects were
/// written.
pub fn import_data_objects<S: KeyValueStore>(store: &mut S, envelope: &Envelope) -> Result<usize> {
    envelope.check(ExportKind::DataObjects)?;

    let objects: Vec<DataObject> = envelope
        .payload
        .get("objects")
        .cloned()
        .map(serde_json::from_value)
        .transpose()?
        .unwrap_or_default();

    let mut data = DataObjectStore::new(store);
    for object in &objects {
        data.set(object)?;
    }

    Ok(objects.len())
}
