//! Schema Validation
//!
//! Structural validation of YAML schema documents. Validation is strictly
//! binary and fail-fast: the first violation wins and its message is the
//! whole result. Outcomes are values, never errors - malformed input is a
//! `valid=false` outcome with the parser's message embedded.

use serde_yaml::Value;

use crate::error::{FieldsError, Result};
use crate::patterns::{basename, PatternTable};
use crate::schema::{normalize_info_fields, FieldSchema};

/// The binary result of validating a schema document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub message: String,
}

impl ValidationOutcome {
    fn ok() -> Self {
        Self {
            valid: true,
            message: "Schema is valid".to_string(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Validate a YAML schema document.
///
/// `template` is the theme file this schema is being attached to, when known.
/// Info fields are rejected for templates whose basename matches the shared
/// partial/archive pattern table, since those render in listing contexts with
/// no per-post edit screen.
pub fn validate(yaml_text: &str, template: Option<&str>) -> ValidationOutcome {
    let doc: Value = match serde_yaml::from_str(yaml_text) {
        Ok(doc) => doc,
        Err(e) => return ValidationOutcome::fail(format!("YAML syntax error: {e}")),
    };

    if doc.is_null() {
        return ValidationOutcome::fail("Empty or invalid YAML content");
    }

    let Some(entries) = doc.get("fields").and_then(Value::as_sequence) else {
        return ValidationOutcome::fail("Schema must contain a \"fields\" array");
    };

    let entries = normalize_info_fields(entries);

    for (i, entry) in entries.iter().enumerate() {
        if entry.as_mapping().is_none() {
            return ValidationOutcome::fail(format!("Field at index {i} is not a valid array"));
        }

        let Some(name) = entry.get("name").and_then(Value::as_str) else {
            return ValidationOutcome::fail(format!(
                "Field at index {i} is missing required \"name\" property"
            ));
        };

        let Some(type_name) = entry.get("type").and_then(Value::as_str) else {
            return ValidationOutcome::fail(format!(
                "Field \"{name}\" is missing required \"type\" property"
            ));
        };

        if type_name == "info" {
            if let Some(template) = template {
                if PatternTable::shared().is_partial_name(basename(template)) {
                    return ValidationOutcome::fail(format!(
                        "Info fields are not allowed for template partials and archives. \
                         Current template: {template}"
                    ));
                }
            }
        }
    }

    ValidationOutcome::ok()
}

/// Validate, then build the typed field tree.
pub fn parse_schema(yaml_text: &str, template: Option<&str>) -> Result<FieldSchema> {
    let outcome = validate(yaml_text, template);
    if !outcome.valid {
        return Err(FieldsError::InvalidSchema(outcome.message));
    }

    let doc: Value = serde_yaml::from_str(yaml_text)?;
    Ok(FieldSchema::from_document(&doc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    #[test]
    fn test_valid_schema() {
        let outcome = validate("fields:\n  - name: title\n    type: string", None);
        assert!(outcome.valid);
        assert_eq!(outcome.message, "Schema is valid");
    }

    #[test]
    fn test_syntax_error() {
        let outcome = validate("fields:\n  - name: [unclosed", None);
        assert!(!outcome.valid);
        assert!(outcome.message.contains("YAML syntax error"));
    }

    #[test]
    fn test_empty_document() {
        let outcome = validate("", None);
        assert!(!outcome.valid);
        assert_eq!(outcome.message, "Empty or invalid YAML content");

        let outcome = validate("---\n", None);
        assert!(!outcome.valid);
        assert_eq!(outcome.message, "Empty or invalid YAML content");
    }

    #[test]
    fn test_missing_fields_key() {
        let outcome = validate("title: hello", None);
        assert!(!outcome.valid);
        assert_eq!(outcome.message, "Schema must contain a \"fields\" array");
    }

    #[test]
    fn test_fields_not_a_sequence() {
        let outcome = validate("fields: hello", None);
        assert!(!outcome.valid);
        assert_eq!(outcome.message, "Schema must contain a \"fields\" array");
    }

    #[test]
    fn test_entry_not_a_mapping() {
        let outcome = validate("fields:\n  - just a string", None);
        assert!(!outcome.valid);
        assert_eq!(outcome.message, "Field at index 0 is not a valid array");
    }

    #[test]
    fn test_missing_name() {
        let outcome = validate("fields:\n  - type: string", None);
        assert!(!outcome.valid);
        assert_eq!(
            outcome.message,
            "Field at index 0 is missing required \"name\" property"
        );
    }

    #[test]
    fn test_missing_type() {
        let outcome = validate("fields:\n  - name: title", None);
        assert!(!outcome.valid);
        assert_eq!(
            outcome.message,
            "Field \"title\" is missing required \"type\" property"
        );
    }

    #[test]
    fn test_fail_fast_reports_first_violation() {
        let outcome = validate(
            "fields:\n  - type: string\n  - name: second",
            None,
        );
        assert!(!outcome.valid);
        assert_eq!(
            outcome.message,
            "Field at index 0 is missing required \"name\" property"
        );
    }

    #[test]
    fn test_info_shorthand_is_accepted() {
        let outcome = validate("fields:\n  - info: \"Heads up\"", None);
        assert!(outcome.valid);
    }

    #[test]
    fn test_info_rejected_for_archive_template() {
        let schema = "fields:\n  - name: note\n    type: info\n    text: hi";
        let outcome = validate(schema, Some("archive.php"));
        assert!(!outcome.valid);
        assert!(outcome.message.contains("Info fields are not allowed"));
        assert!(outcome.message.contains("archive.php"));
    }

    #[test]
    fn test_info_allowed_for_page_template() {
        let schema = "fields:\n  - name: note\n    type: info\n    text: hi";
        let outcome = validate(schema, Some("page.php"));
        assert!(outcome.valid);
    }

    #[test]
    fn test_info_denylist_covers_suffix_variants() {
        let schema = "fields:\n  - info: banner";
        assert!(!validate(schema, Some("archive-product.php")).valid);
        assert!(!validate(schema, Some("content-single.php")).valid);
        assert!(!validate(schema, Some("404.php")).valid);
        assert!(validate(schema, Some("single.php")).valid);
    }

    #[test]
    fn test_denylist_uses_basename() {
        let schema = "fields:\n  - info: banner";
        let outcome = validate(schema, Some("parts/header.php"));
        assert!(!outcome.valid);
    }

    #[test]
    fn test_parse_schema_builds_tree() {
        let schema = parse_schema("fields:\n  - name: title\n    type: text", None).unwrap();
        assert_eq!(schema.fields.len(), 1);
        assert_eq!(schema.fields[0].kind, FieldKind::Text);
    }

    #[test]
    fn test_parse_schema_rejects_invalid() {
        let err = parse_schema("fields:\n  - type: text", None).unwrap_err();
        assert!(err.to_string().contains("missing required \"name\""));
    }
}
