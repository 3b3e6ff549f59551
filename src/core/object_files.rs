use std::path::{Path, PathBuf};

use crate::convert::{self, XmlOptions};
use crate::error::{Error, Result};
use crate::local_files::FileSystem;
use crate::metadata::{self, MetadataRecord, CUSTOM_OBJECT_ROOT};

/// Write a custom object or platform event record to
/// `<objects_dir>/<fullName>/<fullName>.object-meta.xml`, creating the
/// per-object directory when needed. An existing file is replaced.
pub fn write_object_file(
    fs: &dyn FileSystem,
    objects_dir: &Path,
    record: &MetadataRecord,
) -> Result<PathBuf> {
    let full_name = record.get_str("fullName").ok_or_else(|| {
        Error::validation_missing_argument(vec!["fullName".to_string()])
    })?;
    metadata::validate_developer_name(full_name, "fullName")?;

    fs.ensure_dir(&objects_dir.join(full_name))?;

    let path = metadata::object_meta_path(objects_dir, full_name);
    let xml = convert::to_xml(record, CUSTOM_OBJECT_ROOT, &XmlOptions::default())?;
    fs.write(&path, &xml)?;

    log_status!("write", "Wrote {}", path.display());
    Ok(path)
}
