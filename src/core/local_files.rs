use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Entry returned from directory listing
#[derive(Debug, Clone)]
pub struct Entry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl Entry {
    pub fn is_metadata_xml(&self) -> bool {
        !self.is_dir
            && self
                .path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with("-meta.xml"))
    }
}

/// File system operations used by the metadata readers and writers.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    fn list(&self, dir: &Path) -> Result<Vec<Entry>>;
    fn ensure_dir(&self, dir: &Path) -> Result<()>;
}

/// Local filesystem implementation
pub struct LocalFs;

impl LocalFs {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read(&self, path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(Error::internal_io(
                format!("File not found: {}", path.display()),
                Some("read file".to_string()),
            ));
        }
        crate::utils::io::read_file(path, &format!("read {}", path.display()))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        crate::utils::io::write_file_atomic(path, content, &format!("write {}", path.display()))
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(dir)
            .map_err(|e| Error::internal_io(e.to_string(), Some("list directory".to_string())))?;

        let mut result = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let is_dir = path.is_dir();
            result.push(Entry { path, is_dir });
        }
        result.sort_by(|a, b| a.path.cmp(&b.path));

        Ok(result)
    }

    fn ensure_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| {
                Error::internal_io(
                    e.to_string(),
                    Some(format!("create directory {}", dir.display())),
                )
            })?;
        }
        Ok(())
    }
}

/// Convenience function to get local filesystem
pub fn local() -> LocalFs {
    LocalFs::new()
}

/// In-memory file system for unit tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryFs {
    files: std::cell::RefCell<std::collections::BTreeMap<PathBuf, String>>,
}

#[cfg(test)]
impl MemoryFs {
    pub(crate) fn insert(&self, path: PathBuf, content: &str) {
        self.files.borrow_mut().insert(path, content.to_string());
    }
}

#[cfg(test)]
impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.files.borrow().get(path).cloned().ok_or_else(|| {
            Error::internal_io(
                format!("File not found: {}", path.display()),
                Some("read file".to_string()),
            )
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.insert(path.to_path_buf(), content);
        Ok(())
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .map(|path| Entry {
                path: path.clone(),
                is_dir: false,
            })
            .collect())
    }

    fn ensure_dir(&self, _dir: &Path) -> Result<()> {
        Ok(())
    }
}
