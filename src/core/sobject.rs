//! Custom object and platform event generation.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ProjectContext;
use crate::error::{Error, Result};
use crate::local_files::FileSystem;
use crate::locate;
use crate::messages::Messages;
use crate::metadata::{CustomObject, PlatformEvent};
use crate::object_files;
use crate::prompt::{self, ObjectType};

#[derive(Debug, Clone)]
pub struct ObjectDefinition {
    pub api_name: String,
    pub label: String,
    pub plural_label: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedObject {
    pub name: String,
    pub label: String,
    pub path: String,
}

/// Where new objects are written: the explicit directory when given, else
/// the first `objects` directory under the package directories, else the
/// configured fallback inside the default package directory.
pub fn resolve_objects_dir(project: &ProjectContext, explicit: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(project.resolve_dir(dir));
    }

    let found = locate::find_object_directories(&project.package_directories)?;
    Ok(found
        .into_iter()
        .next()
        .unwrap_or_else(|| project.fallback_objects_dir()))
}

/// Reject an API name without the suffix required for `object_type`.
pub fn require_suffix(api_name: &str, object_type: ObjectType, messages: &Messages) -> Result<()> {
    prompt::validate_api_name(api_name, object_type, messages).map_err(|problem| {
        Error::validation_invalid_argument("apiName", problem, Some(api_name.to_string()), None)
    })
}

pub fn generate_custom_object(
    fs: &dyn FileSystem,
    objects_dir: &Path,
    definition: &ObjectDefinition,
    messages: &Messages,
) -> Result<GeneratedObject> {
    require_suffix(&definition.api_name, ObjectType::CustomObject, messages)?;

    let mut object = CustomObject::new(&definition.api_name, &definition.label);
    object.plural_label = Some(
        definition
            .plural_label
            .clone()
            .unwrap_or_else(|| format!("{}s", definition.label)),
    );
    object.description = definition.description.clone();

    let path = object_files::write_object_file(fs, objects_dir, &object.to_record()?)?;
    Ok(generated(definition, &path))
}

pub fn generate_platform_event(
    fs: &dyn FileSystem,
    objects_dir: &Path,
    definition: &ObjectDefinition,
    messages: &Messages,
) -> Result<GeneratedObject> {
    require_suffix(&definition.api_name, ObjectType::PlatformEvent, messages)?;

    let mut event = PlatformEvent::new(&definition.api_name, &definition.label);
    event.plural_label = definition.plural_label.clone();
    event.description = definition.description.clone();

    let path = object_files::write_object_file(fs, objects_dir, &event.to_record()?)?;
    Ok(generated(definition, &path))
}

fn generated(definition: &ObjectDefinition, path: &Path) -> GeneratedObject {
    GeneratedObject {
        name: definition.api_name.clone(),
        label: definition.label.clone(),
        path: path.display().to_string(),
    }
}
