//! Metadata records and the on-disk naming conventions for them.
//!
//! A [`MetadataRecord`] is the structured form of one metadata XML document:
//! an ordered map of child elements plus the attributes of the root element.
//! The JSON form of a record keeps the root attributes under the reserved
//! top-level key `$`; [`MetadataRecord::from_json`] and
//! [`MetadataRecord::to_json`] translate at that boundary only.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::utils::validation;

/// Reserved JSON key carrying root-element attributes.
pub const ATTRIBUTES_KEY: &str = "$";

pub const METADATA_NAMESPACE: &str = "http://soap.sforce.com/2006/04/metadata";

pub const CUSTOM_OBJECT_ROOT: &str = "CustomObject";
pub const UNIFIED_APPLICATION_ROOT: &str = "UnifiedApplication";

pub const OBJECT_META_SUFFIX: &str = ".object-meta.xml";
pub const UNIFIED_APP_META_SUFFIX: &str = ".unifiedapp-meta.xml";

/// List attribute holding the members of a unified application.
pub const UNIFIED_APP_MEMBERS_KEY: &str = "unifiedApplicationMember";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRecord {
    pub attributes: BTreeMap<String, String>,
    pub fields: Map<String, Value>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from its JSON form, lifting a top-level `$` object into
    /// the root attributes. Nested `$` keys are left untouched.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(mut fields) = value else {
            return Err(Error::validation_invalid_json(
                format!("expected a JSON object, found {}", value_kind(&value)),
                Some("metadata record".to_string()),
            ));
        };

        let mut attributes = BTreeMap::new();
        match fields.shift_remove(ATTRIBUTES_KEY) {
            None | Some(Value::Null) => {}
            Some(Value::Object(attrs)) => {
                for (key, value) in attrs {
                    let text = scalar_to_string(&value).ok_or_else(|| {
                        Error::validation_invalid_json(
                            format!("attribute '{}' must be a scalar value", key),
                            Some("metadata record attributes".to_string()),
                        )
                    })?;
                    attributes.insert(key, text);
                }
            }
            Some(other) => {
                return Err(Error::validation_invalid_json(
                    format!(
                        "'{}' must be an object of attributes, found {}",
                        ATTRIBUTES_KEY,
                        value_kind(&other)
                    ),
                    Some("metadata record attributes".to_string()),
                ));
            }
        }

        Ok(Self { attributes, fields })
    }

    pub fn from_serializable<T: Serialize>(data: &T) -> Result<Self> {
        let value = serde_json::to_value(data).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize metadata record".to_string()))
        })?;
        Self::from_json(value)
    }

    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        if !self.attributes.is_empty() {
            let attrs: Map<String, Value> = self
                .attributes
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            out.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attrs));
        }
        for (key, value) in &self.fields {
            out.insert(key.clone(), value.clone());
        }
        Value::Object(out)
    }

    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T> {
        serde_json::from_value(self.to_json()).map_err(|e| {
            Error::internal_json(e.to_string(), Some("deserialize metadata record".to_string()))
        })
    }

    pub fn with_namespace(mut self) -> Self {
        self.attributes
            .entry("xmlns".to_string())
            .or_insert_with(|| METADATA_NAMESPACE.to_string());
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Append `item` to the list stored under `key`, creating the list when
    /// absent. A single non-list value (how a one-element list reads back
    /// from XML) is promoted to a list first.
    pub fn push_to_list(&mut self, key: &str, item: Value) {
        match self.fields.get_mut(key) {
            Some(Value::Array(items)) => items.push(item),
            Some(slot @ Value::Null) => *slot = Value::Array(vec![item]),
            Some(slot) => {
                let existing = slot.take();
                *slot = Value::Array(vec![existing, item]);
            }
            None => {
                self.fields
                    .insert(key.to_string(), Value::Array(vec![item]));
            }
        }
    }

    pub fn list_len(&self, key: &str) -> usize {
        match self.fields.get(key) {
            None | Some(Value::Null) => 0,
            Some(Value::Array(items)) => items.len(),
            Some(_) => 1,
        }
    }
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Typed records
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NameField {
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// A custom object definition as written to `<name>.object-meta.xml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomObject {
    pub full_name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub deployment_status: String,
    pub sharing_model: String,
    pub name_field: NameField,
}

impl CustomObject {
    pub fn new(full_name: impl Into<String>, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            full_name: full_name.into(),
            name_field: NameField {
                label: format!("{} Name", label),
                field_type: "Text".to_string(),
            },
            label,
            plural_label: None,
            description: None,
            deployment_status: "Deployed".to_string(),
            sharing_model: "ReadWrite".to_string(),
        }
    }

    pub fn to_record(&self) -> Result<MetadataRecord> {
        Ok(MetadataRecord::from_serializable(self)?.with_namespace())
    }
}

/// A platform event definition. Platform events share the `CustomObject`
/// root element and file layout with custom objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformEvent {
    pub full_name: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub deployment_status: String,
    pub event_type: String,
    pub publish_behavior: String,
}

impl PlatformEvent {
    pub fn new(full_name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            label: label.into(),
            plural_label: None,
            description: None,
            deployment_status: "Deployed".to_string(),
            event_type: "HighVolume".to_string(),
            publish_behavior: "PublishAfterCommit".to_string(),
        }
    }

    pub fn to_record(&self) -> Result<MetadataRecord> {
        Ok(MetadataRecord::from_serializable(self)?.with_namespace())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedApplication {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedApplicationMember {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub member_type: Option<String>,
}

// ============================================================================
// Path conventions
// ============================================================================

/// Reject names that cannot safely become a single path segment.
pub fn validate_developer_name(name: &str, field: &str) -> Result<()> {
    validation::require_non_empty(name, field, "Name cannot be empty")?;

    if name
        .chars()
        .any(|c| c.is_control() || c == '/' || c == '\\')
        || name == "."
        || name == ".."
    {
        return Err(Error::validation_invalid_argument(
            field,
            "Name contains characters that are not allowed in a file name",
            Some(name.to_string()),
            None,
        ));
    }

    Ok(())
}

pub fn object_meta_file_name(full_name: &str) -> String {
    format!("{}{}", full_name, OBJECT_META_SUFFIX)
}

/// `<objects_dir>/<name>/<name>.object-meta.xml`
pub fn object_meta_path(objects_dir: &Path, full_name: &str) -> PathBuf {
    objects_dir
        .join(full_name)
        .join(object_meta_file_name(full_name))
}

/// `<dir>/<developerName>.unifiedapp-meta.xml`
pub fn unified_app_path(dir: &Path, developer_name: &str) -> PathBuf {
    dir.join(format!("{}{}", developer_name, UNIFIED_APP_META_SUFFIX))
}
