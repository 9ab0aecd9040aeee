//! Field schema types
//!
//! A schema is a YAML document with a top-level `fields` sequence. Each entry
//! names a typed field; `object` and `block` fields nest a further sequence.
//! The typed tree here is built from an already-validated document - raw
//! structural checks live in [`crate::validate`].

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::patterns::title_case;

/// The closed set of known field types.
///
/// Consumers match exhaustively; an unrecognized type name falls back to
/// [`FieldKind::Text`] at the boundary (see [`FieldKind::from_name`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Textarea,
    Wysiwyg,
    Number,
    Checkbox,
    Select,
    Radio,
    Image,
    File,
    Date,
    Color,
    /// Named group of nested fields
    Object,
    /// Repeatable group of nested fields
    Block,
    /// Read-only informational text, no stored value
    Info,
}

impl FieldKind {
    /// Look up a kind by its schema type name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" | "string" => Some(Self::Text),
            "textarea" => Some(Self::Textarea),
            "wysiwyg" => Some(Self::Wysiwyg),
            "number" => Some(Self::Number),
            "checkbox" => Some(Self::Checkbox),
            "select" => Some(Self::Select),
            "radio" => Some(Self::Radio),
            "image" => Some(Self::Image),
            "file" => Some(Self::File),
            "date" => Some(Self::Date),
            "color" => Some(Self::Color),
            "object" => Some(Self::Object),
            "block" => Some(Self::Block),
            "info" => Some(Self::Info),
            _ => None,
        }
    }

    /// The canonical schema type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Wysiwyg => "wysiwyg",
            Self::Number => "number",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Image => "image",
            Self::File => "file",
            Self::Date => "date",
            Self::Color => "color",
            Self::Object => "object",
            Self::Block => "block",
            Self::Info => "info",
        }
    }

    /// Whether this kind carries a nested `fields` sequence.
    pub fn has_nested_fields(&self) -> bool {
        matches!(self, Self::Object | Self::Block)
    }
}

/// A single named, typed field definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Type-specific options mapping (select choices, number bounds, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<serde_yaml::Mapping>,
    /// Informational text, only for `info` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Nested fields, only for `object`/`block`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,
}

impl Field {
    /// The label to render: explicit label, or the title-cased name.
    pub fn effective_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| title_case(&self.name))
    }
}

/// A parsed field schema: the `fields` sequence of a YAML schema document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldSchema {
    pub fields: Vec<Field>,
}

impl FieldSchema {
    /// Build the typed tree from an already-validated document.
    ///
    /// The info-field shorthand is normalized first. Unrecognized type names
    /// fall back to `text`; entries without the expected shape contribute
    /// defaults rather than failing, since structural violations have been
    /// rejected by validation already.
    pub fn from_document(doc: &Value) -> Self {
        let entries = doc
            .get("fields")
            .and_then(Value::as_sequence)
            .cloned()
            .unwrap_or_default();

        let fields = normalize_info_fields(&entries)
            .iter()
            .map(field_from_entry)
            .collect();

        Self { fields }
    }

    /// Find a top-level field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn field_from_entry(entry: &Value) -> Field {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let kind = entry
        .get("type")
        .and_then(Value::as_str)
        .and_then(FieldKind::from_name)
        .unwrap_or(FieldKind::Text);

    let label = entry
        .get("label")
        .and_then(Value::as_str)
        .map(String::from);

    let options = entry
        .get("options")
        .and_then(Value::as_mapping)
        .cloned();

    let text = entry
        .get("text")
        .and_then(Value::as_str)
        .map(String::from);

    let fields = if kind.has_nested_fields() {
        entry
            .get("fields")
            .and_then(Value::as_sequence)
            .map(|seq| {
                normalize_info_fields(seq)
                    .iter()
                    .map(field_from_entry)
                    .collect()
            })
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    Field {
        name,
        kind,
        label,
        options,
        text,
        fields,
    }
}

/// Rewrite info-field shorthand entries to their full form.
///
/// An entry that is a mapping containing `info` and neither `type` nor `name`
/// becomes `{type: "info", name: "info_<n>", text: <value>}`. The counter
/// starts at 0 and advances only for shorthand entries - explicit fields do
/// not consume it. Order is preserved, other entries pass through untouched,
/// and the function is idempotent (normalized entries carry `type`).
pub fn normalize_info_fields(fields: &[Value]) -> Vec<Value> {
    let mut counter = 0usize;

    fields
        .iter()
        .map(|entry| {
            let is_shorthand = entry.as_mapping().is_some()
                && entry.get("info").is_some()
                && entry.get("type").is_none()
                && entry.get("name").is_none();

            if !is_shorthand {
                return entry.clone();
            }

            let text = entry.get("info").cloned().unwrap_or(Value::Null);
            let mut map = serde_yaml::Mapping::new();
            map.insert(
                Value::String("type".into()),
                Value::String("info".into()),
            );
            map.insert(
                Value::String("name".into()),
                Value::String(format!("info_{counter}")),
            );
            map.insert(Value::String("text".into()), text);
            counter += 1;
            Value::Mapping(map)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_field_kind_lookup() {
        assert_eq!(FieldKind::from_name("text"), Some(FieldKind::Text));
        assert_eq!(FieldKind::from_name("string"), Some(FieldKind::Text));
        assert_eq!(FieldKind::from_name("info"), Some(FieldKind::Info));
        assert_eq!(FieldKind::from_name("carousel"), None);
    }

    #[test]
    fn test_field_kind_round_trip_names() {
        for kind in [
            FieldKind::Textarea,
            FieldKind::Select,
            FieldKind::Object,
            FieldKind::Block,
            FieldKind::Info,
        ] {
            assert_eq!(FieldKind::from_name(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_nested_kinds() {
        assert!(FieldKind::Object.has_nested_fields());
        assert!(FieldKind::Block.has_nested_fields());
        assert!(!FieldKind::Text.has_nested_fields());
    }

    #[test]
    fn test_normalize_shorthand() {
        let doc = yaml("- info: \"Section header\"\n- name: title\n  type: text");
        let entries = doc.as_sequence().unwrap();
        let normalized = normalize_info_fields(entries);

        assert_eq!(normalized.len(), 2);
        assert_eq!(
            normalized[0].get("type").and_then(Value::as_str),
            Some("info")
        );
        assert_eq!(
            normalized[0].get("name").and_then(Value::as_str),
            Some("info_0")
        );
        assert_eq!(
            normalized[0].get("text").and_then(Value::as_str),
            Some("Section header")
        );
        // Explicit entry passes through untouched
        assert_eq!(
            normalized[1].get("name").and_then(Value::as_str),
            Some("title")
        );
    }

    #[test]
    fn test_normalize_counter_skips_explicit_fields() {
        let doc = yaml("- info: a\n- name: x\n  type: string\n- info: b");
        let entries = doc.as_sequence().unwrap();
        let normalized = normalize_info_fields(entries);

        assert_eq!(
            normalized[0].get("name").and_then(Value::as_str),
            Some("info_0")
        );
        assert_eq!(
            normalized[2].get("name").and_then(Value::as_str),
            Some("info_1")
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let doc = yaml("- info: a\n- name: x\n  type: string\n- info: b");
        let entries = doc.as_sequence().unwrap();
        let once = normalize_info_fields(entries);
        let twice = normalize_info_fields(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_entry_with_explicit_name_is_not_shorthand() {
        // `info` key alongside `name` is not shorthand
        let doc = yaml("- name: note\n  info: keep");
        let entries = doc.as_sequence().unwrap();
        let normalized = normalize_info_fields(entries);
        assert_eq!(normalized[0], entries[0]);
    }

    #[test]
    fn test_from_document_builds_tree() {
        let doc = yaml(
            "fields:\n  - name: title\n    type: text\n  - name: hero\n    type: object\n    fields:\n      - name: image\n        type: image\n      - info: \"Shown above the fold\"",
        );
        let schema = FieldSchema::from_document(&doc);

        assert_eq!(schema.fields.len(), 2);
        let hero = schema.field("hero").unwrap();
        assert_eq!(hero.kind, FieldKind::Object);
        assert_eq!(hero.fields.len(), 2);
        assert_eq!(hero.fields[1].kind, FieldKind::Info);
        assert_eq!(hero.fields[1].name, "info_0");
    }

    #[test]
    fn test_unknown_type_falls_back_to_text() {
        let doc = yaml("fields:\n  - name: widget\n    type: carousel");
        let schema = FieldSchema::from_document(&doc);
        assert_eq!(schema.fields[0].kind, FieldKind::Text);
    }

    #[test]
    fn test_effective_label() {
        let doc = yaml(
            "fields:\n  - name: hero_title\n    type: text\n  - name: cta\n    type: text\n    label: Call To Action",
        );
        let schema = FieldSchema::from_document(&doc);
        assert_eq!(schema.fields[0].effective_label(), "Hero Title");
        assert_eq!(schema.fields[1].effective_label(), "Call To Action");
    }
}
