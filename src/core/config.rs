//! Project configuration.
//!
//! Two optional files at the project root feed this module:
//! - `sfdx-project.json`: `packageDirectories[].path` (the directories
//!   searched for `objects` folders), defaulting to `force-app`;
//! - `sobject.json`: tool defaults such as the unified application folder.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::local_files::FileSystem;

pub const SFDX_PROJECT_FILE: &str = "sfdx-project.json";
pub const SOBJECT_CONFIG_FILE: &str = "sobject.json";

const DEFAULT_PACKAGE_DIRECTORY: &str = "force-app";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct SfdxProject {
    #[serde(default)]
    package_directories: Vec<PackageDirectory>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageDirectory {
    path: String,
    #[serde(default)]
    default: bool,
}

/// Root structure of `sobject.json`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SobjectConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Defaults {
    /// Folder (relative to the project root) holding unified applications.
    #[serde(default = "default_unified_app_directory")]
    pub unified_app_directory: String,

    /// Where new objects go inside a package directory when no `objects`
    /// folder exists yet.
    #[serde(default = "default_objects_subpath")]
    pub objects_subpath: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            unified_app_directory: default_unified_app_directory(),
            objects_subpath: default_objects_subpath(),
        }
    }
}

fn default_unified_app_directory() -> String {
    "UnifiedApplications".to_string()
}

fn default_objects_subpath() -> String {
    "main/default/objects".to_string()
}

/// Resolved project layout for one invocation.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub root: PathBuf,
    /// Package directories, the `default: true` one first.
    pub package_directories: Vec<PathBuf>,
    pub defaults: Defaults,
}

impl ProjectContext {
    pub fn load(fs: &dyn FileSystem, root: &Path) -> Result<Self> {
        let project: SfdxProject = read_optional_json(fs, &root.join(SFDX_PROJECT_FILE))?;
        let config: SobjectConfig = read_optional_json(fs, &root.join(SOBJECT_CONFIG_FILE))?;

        let mut dirs = project.package_directories;
        dirs.sort_by_key(|d| !d.default);
        let mut package_directories: Vec<PathBuf> =
            dirs.into_iter().map(|d| root.join(d.path)).collect();
        if package_directories.is_empty() {
            package_directories.push(root.join(DEFAULT_PACKAGE_DIRECTORY));
        }

        Ok(Self {
            root: root.to_path_buf(),
            package_directories,
            defaults: config.defaults,
        })
    }

    pub fn unified_app_dir(&self) -> PathBuf {
        self.root.join(&self.defaults.unified_app_directory)
    }

    /// `<default package dir>/<objectsSubpath>`
    pub fn fallback_objects_dir(&self) -> PathBuf {
        let base = self
            .package_directories
            .first()
            .cloned()
            .unwrap_or_else(|| self.root.join(DEFAULT_PACKAGE_DIRECTORY));
        base.join(&self.defaults.objects_subpath)
    }

    /// Expand `~` and anchor relative paths at the project root.
    pub fn resolve_dir(&self, input: &str) -> PathBuf {
        let expanded = shellexpand::tilde(input);
        let path = PathBuf::from(expanded.as_ref());
        if path.is_absolute() {
            path
        } else {
            self.root.join(path)
        }
    }
}

fn read_optional_json<T>(fs: &dyn FileSystem, path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if !fs.exists(path) {
        return Ok(T::default());
    }
    let raw = fs.read(path)?;
    serde_json::from_str(&raw).map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
}
