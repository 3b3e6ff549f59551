//! Localized message catalog.
//!
//! The catalog is an explicit value handed to command handlers through the
//! command context; nothing here is process-global.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::utils::template;

const EMBEDDED_EN: &str = include_str!("../../messages/en.json");

pub const GENERATE_UNIFIED_APP_SUCCESS: &str = "generate.unifiedapp.success";
pub const ADD_MEMBER_SUCCESS: &str = "update.unifiedapp.addmember.success";
pub const GENERATE_SOBJECT_SUCCESS: &str = "generate.sobject.success";
pub const GENERATE_PLATFORM_EVENT_SUCCESS: &str = "generate.platformevent.success";
pub const PROMPT_API_NAME: &str = "prompts.apiName";
pub const PROMPT_API_NAME_INVALID: &str = "prompts.apiName.invalid";
pub const OBJECTS_LIST_SUMMARY: &str = "objects.list.summary";

#[derive(Debug, Clone, Default)]
pub struct Messages {
    entries: HashMap<String, String>,
}

impl Messages {
    /// The English catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(EMBEDDED_EN)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let entries: HashMap<String, String> = serde_json::from_str(raw).map_err(|e| {
            Error::internal_json(e.to_string(), Some("parse message catalog".to_string()))
        })?;
        Ok(Self { entries })
    }

    /// Render `key` with `{{name}}` placeholders filled in. A missing key
    /// renders as the key itself.
    pub fn get(&self, key: &str, vars: &[(&str, &str)]) -> String {
        match self.entries.get(key) {
            Some(text) => template::render(text, vars),
            None => key.to_string(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::template::TemplateVars;

    #[test]
    fn embedded_catalog_has_every_key() {
        let messages = Messages::embedded().unwrap();
        for key in [
            GENERATE_UNIFIED_APP_SUCCESS,
            ADD_MEMBER_SUCCESS,
            GENERATE_SOBJECT_SUCCESS,
            GENERATE_PLATFORM_EVENT_SUCCESS,
            PROMPT_API_NAME,
            PROMPT_API_NAME_INVALID,
            OBJECTS_LIST_SUMMARY,
        ] {
            assert!(messages.contains(key), "missing message {}", key);
        }
    }

    #[test]
    fn renders_named_placeholders() {
        let messages = Messages::embedded().unwrap();
        let text = messages.get(
            GENERATE_UNIFIED_APP_SUCCESS,
            &[
                (TemplateVars::LABEL, "My App"),
                (TemplateVars::PATH, "UnifiedApplications/My_App.unifiedapp-meta.xml"),
            ],
        );
        assert_eq!(
            text,
            "Created unified application My App at UnifiedApplications/My_App.unifiedapp-meta.xml."
        );
    }

    #[test]
    fn missing_key_falls_back_to_key() {
        let messages = Messages::from_json_str("{}").unwrap();
        assert_eq!(messages.get("no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(Messages::from_json_str("[1, 2]").is_err());
    }
}
