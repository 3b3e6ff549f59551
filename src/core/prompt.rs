//! Interactive prompts.
//!
//! [`PromptEngine`] reads from any `BufRead` and writes prompts to any
//! `Write`; [`api_name_prompt`] binds it to the terminal. In
//! non-interactive mode prompts resolve to their default without reading.

use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::{Error, Result};
use crate::messages::{self, Messages};
use crate::utils::api_name::make_name_api_compatible;
use crate::utils::template::TemplateVars;

/// Metadata kinds that carry an API-name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    CustomObject,
    CustomField,
    PlatformEvent,
}

impl ObjectType {
    pub fn suffix(&self) -> &'static str {
        match self {
            ObjectType::CustomObject | ObjectType::CustomField => "__c",
            ObjectType::PlatformEvent => "__e",
        }
    }
}

/// A free-text prompt with an optional pre-filled default.
pub struct InputPrompt {
    pub field: String,
    pub message: String,
    pub default: Option<String>,
}

pub struct PromptEngine {
    interactive: bool,
}

impl PromptEngine {
    /// Create engine with automatic TTY detection.
    pub fn new() -> Self {
        Self {
            interactive: io::stdin().is_terminal() && io::stderr().is_terminal(),
        }
    }

    pub fn with_interactive(interactive: bool) -> Self {
        Self { interactive }
    }

    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    /// Ask until `validate` accepts the answer. An empty answer takes the
    /// default; end of input is an error.
    pub fn input<R, W, V>(
        &self,
        prompt: &InputPrompt,
        reader: &mut R,
        out: &mut W,
        validate: V,
    ) -> Result<String>
    where
        R: BufRead,
        W: Write,
        V: Fn(&str) -> std::result::Result<(), String>,
    {
        if !self.interactive {
            return prompt.default.clone().ok_or_else(|| {
                Error::validation_missing_argument(vec![prompt.field.clone()])
            });
        }

        loop {
            match &prompt.default {
                Some(default) => write!(out, "{} ({}): ", prompt.message, default),
                None => write!(out, "{}: ", prompt.message),
            }
            .and_then(|_| out.flush())
            .map_err(|e| Error::internal_io(e.to_string(), Some("write prompt".to_string())))?;

            let mut line = String::new();
            let read = reader
                .read_line(&mut line)
                .map_err(|e| Error::internal_io(e.to_string(), Some("read input".to_string())))?;
            if read == 0 {
                return Err(Error::validation_invalid_argument(
                    prompt.field.clone(),
                    "No input received",
                    None,
                    None,
                ));
            }

            let answer = match line.trim() {
                "" => match &prompt.default {
                    Some(default) => default.clone(),
                    None => String::new(),
                },
                typed => typed.to_string(),
            };

            match validate(&answer) {
                Ok(()) => return Ok(answer),
                Err(problem) => {
                    writeln!(out, "{}", problem).map_err(|e| {
                        Error::internal_io(e.to_string(), Some("write prompt".to_string()))
                    })?;
                }
            }
        }
    }
}

impl Default for PromptEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepts the name iff it carries the suffix for `object_type`.
pub fn validate_api_name(
    input: &str,
    object_type: ObjectType,
    messages: &Messages,
) -> std::result::Result<(), String> {
    if input.ends_with(object_type.suffix()) {
        Ok(())
    } else {
        Err(messages.get(
            messages::PROMPT_API_NAME_INVALID,
            &[(TemplateVars::SUFFIX, object_type.suffix())],
        ))
    }
}

/// Default API name for a label: `My Thing` -> `My_Thing__c`.
pub fn default_api_name(label: &str, object_type: ObjectType) -> String {
    format!("{}{}", make_name_api_compatible(label), object_type.suffix())
}

pub fn api_name_prompt_with<R: BufRead, W: Write>(
    engine: &PromptEngine,
    messages: &Messages,
    label: &str,
    object_type: ObjectType,
    reader: &mut R,
    out: &mut W,
) -> Result<String> {
    let prompt = InputPrompt {
        field: "apiName".to_string(),
        message: messages.get(
            messages::PROMPT_API_NAME,
            &[(TemplateVars::SUFFIX, object_type.suffix())],
        ),
        default: Some(default_api_name(label, object_type)),
    };
    engine.input(&prompt, reader, out, |answer| {
        validate_api_name(answer, object_type, messages)
    })
}

pub fn api_name_prompt(
    engine: &PromptEngine,
    messages: &Messages,
    label: &str,
    object_type: ObjectType,
) -> Result<String> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut out = io::stderr();
    api_name_prompt_with(engine, messages, label, object_type, &mut reader, &mut out)
}
