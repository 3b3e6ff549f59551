//! Glob-based lookup of metadata directories and files.
//!
//! Base directories are typically package directories or a project root.
//! They are glob-escaped before the layout pattern is appended, so paths
//! with `[` or `*` in them are matched literally.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::convert;
use crate::error::{Error, Result};
use crate::local_files::FileSystem;
use crate::metadata::{object_meta_file_name, MetadataRecord, CUSTOM_OBJECT_ROOT, OBJECT_META_SUFFIX};

/// Directories named `objects` anywhere below the base directories.
pub fn find_object_directories<P: AsRef<Path>>(base_dirs: &[P]) -> Result<Vec<PathBuf>> {
    let patterns: Vec<String> = base_dirs
        .iter()
        .map(|base| pattern_under(base.as_ref(), "**/objects"))
        .collect();
    glob_union(&patterns, |p| p.is_dir())
}

/// Per-object directories, e.g. `force-app/main/default/objects/Foo__c`.
pub fn find_object_subdirectories<P: AsRef<Path>>(base_dirs: &[P]) -> Result<Vec<PathBuf>> {
    let patterns: Vec<String> = base_dirs
        .iter()
        .map(|base| pattern_under(base.as_ref(), "**/objects/*"))
        .collect();
    glob_union(&patterns, |p| p.is_dir())
}

/// Locate `<name>/<name>.object-meta.xml` under any `objects` directory of
/// the base directories and parse it.
///
/// Exactly one match is required: none is `object.not_found`, more than one
/// is `object.conflict`.
pub fn find_object_xml_by_name<P: AsRef<Path>>(
    fs: &dyn FileSystem,
    base_dirs: &[P],
    api_name: &str,
) -> Result<MetadataRecord> {
    let suffix = format!(
        "**/objects/{}/{}",
        glob::Pattern::escape(api_name),
        glob::Pattern::escape(&object_meta_file_name(api_name))
    );
    let patterns: Vec<String> = base_dirs
        .iter()
        .map(|base| pattern_under(base.as_ref(), &suffix))
        .collect();

    let searched = base_dirs
        .iter()
        .map(|b| b.as_ref().display().to_string())
        .collect();
    let path = single_match(&patterns, api_name, searched)?;
    read_object_file(fs, &path)
}

/// Parse the object metadata file inside a known object folder, e.g.
/// `force-app/main/default/objects/Account`.
pub fn find_object_xml_by_folder(fs: &dyn FileSystem, folder: &Path) -> Result<MetadataRecord> {
    let pattern = pattern_under(folder, &format!("*{}", OBJECT_META_SUFFIX));
    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| folder.display().to_string());

    let path = single_match(&[pattern], &name, vec![folder.display().to_string()])?;
    read_object_file(fs, &path)
}

pub fn read_object_file(fs: &dyn FileSystem, path: &Path) -> Result<MetadataRecord> {
    let xml = fs.read(path)?;
    convert::from_xml(&xml, CUSTOM_OBJECT_ROOT).map_err(|mut err| {
        if let Some(details) = err.details.as_object_mut() {
            details.insert(
                "path".to_string(),
                serde_json::Value::String(path.display().to_string()),
            );
        }
        err
    })
}

fn pattern_under(base: &Path, suffix: &str) -> String {
    let escaped = glob::Pattern::escape(&base.to_string_lossy());
    let trimmed = escaped.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        format!("/{}", suffix)
    } else {
        format!("{}/{}", trimmed, suffix)
    }
}

fn glob_union(patterns: &[String], keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|e| {
            Error::validation_invalid_argument(
                "path",
                format!("Invalid glob pattern '{}': {}", pattern, e),
                Some(pattern.clone()),
                None,
            )
        })?;

        for path in entries.filter_map(|entry| entry.ok()) {
            if keep(&path) && seen.insert(path.clone()) {
                out.push(path);
            }
        }
    }

    Ok(out)
}

fn single_match(patterns: &[String], name: &str, searched: Vec<String>) -> Result<PathBuf> {
    let mut matches = glob_union(patterns, |p| p.is_file())?;

    match matches.len() {
        0 => Err(Error::object_not_found(name, searched)),
        1 => Ok(matches.remove(0)),
        _ => {
            let candidates = matches.iter().map(|p| p.display().to_string()).collect();
            Err(Error::object_conflict(name, searched, candidates))
        }
    }
}
