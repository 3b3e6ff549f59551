use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,

    ValidationMissingArgument,
    ValidationInvalidArgument,
    ValidationInvalidJson,

    ObjectNotFound,
    ObjectConflict,

    XmlParseError,
    XmlWriteError,

    InternalIoError,
    InternalJsonError,
    InternalUnexpected,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",
            ErrorCode::ValidationInvalidJson => "validation.invalid_json",

            ErrorCode::ObjectNotFound => "object.not_found",
            ErrorCode::ObjectConflict => "object.conflict",

            ErrorCode::XmlParseError => "xml.parse_error",
            ErrorCode::XmlWriteError => "xml.write_error",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
            ErrorCode::InternalUnexpected => "internal.unexpected",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tried: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLookupDetails {
    pub name: String,
    pub searched: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
    pub retryable: Option<bool>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

fn details_value<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
            retryable: None,
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            details_value(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
        id: Option<String>,
        tried: Option<Vec<String>>,
    ) -> Self {
        let details = details_value(InvalidArgumentDetails {
            field: field.into(),
            problem: problem.into(),
            id,
            tried,
        });

        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            details,
        )
    }

    pub fn validation_invalid_json(problem: impl Into<String>, context: Option<String>) -> Self {
        let details = serde_json::json!({
            "error": problem.into(),
            "context": context,
        });

        Self::new(ErrorCode::ValidationInvalidJson, "Invalid JSON", details)
    }

    pub fn object_not_found(name: impl Into<String>, searched: Vec<String>) -> Self {
        let name = name.into();
        let details = details_value(ObjectLookupDetails {
            name: name.clone(),
            searched,
            candidates: Vec::new(),
        });

        Self::new(
            ErrorCode::ObjectNotFound,
            format!("No metadata file found for '{}'", name),
            details,
        )
        .with_hint("Run 'sobject objects list' to see the objects in this project")
    }

    pub fn object_conflict(
        name: impl Into<String>,
        searched: Vec<String>,
        candidates: Vec<String>,
    ) -> Self {
        let name = name.into();
        let details = details_value(ObjectLookupDetails {
            name: name.clone(),
            searched,
            candidates,
        });

        Self::new(
            ErrorCode::ObjectConflict,
            format!("More than one metadata file matches '{}'", name),
            details,
        )
        .with_hint("Narrow the search to a single package directory")
    }

    pub fn xml_parse(error: impl Into<String>, context: Option<String>) -> Self {
        let details = details_value(XmlErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::XmlParseError, "Malformed XML", details)
    }

    pub fn xml_write(error: impl Into<String>, context: Option<String>) -> Self {
        let details = details_value(XmlErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::XmlWriteError, "Failed to write XML", details)
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        let details = details_value(ConfigInvalidJsonDetails {
            path: path.into(),
            error: err.to_string(),
        });

        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in configuration",
            details,
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        let details = details_value(InternalIoErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalIoError, "IO error", details)
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        let details = details_value(InternalJsonErrorDetails {
            error: error.into(),
            context,
        });

        Self::new(ErrorCode::InternalJsonError, "JSON error", details)
    }

    pub fn internal_unexpected(error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InternalUnexpected,
            "Unexpected error",
            serde_json::json!({ "error": error.into() }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_not_found_carries_hint_and_name() {
        let err = Error::object_not_found("Foo__c", vec!["force-app".to_string()]);
        assert_eq!(err.code.as_str(), "object.not_found");
        assert_eq!(err.details["name"], "Foo__c");
        assert_eq!(err.hints.len(), 1);
    }

    #[test]
    fn object_conflict_lists_candidates() {
        let err = Error::object_conflict(
            "Foo__c",
            vec!["a".to_string(), "b".to_string()],
            vec!["a/Foo__c".to_string(), "b/Foo__c".to_string()],
        );
        assert_eq!(err.code, ErrorCode::ObjectConflict);
        assert_eq!(err.details["candidates"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn invalid_argument_omits_empty_optionals() {
        let err = Error::validation_invalid_argument("apiName", "missing suffix", None, None);
        assert!(err.details.get("id").is_none());
        assert_eq!(err.details["problem"], "missing suffix");
    }
}
