use std::path::Path;

use serde::Serialize;

use crate::convert::{self, XmlOptions};
use crate::error::{Error, Result};
use crate::local_files::FileSystem;
use crate::metadata::{
    self, MetadataRecord, UnifiedApplication, UnifiedApplicationMember, UNIFIED_APPLICATION_ROOT,
    UNIFIED_APP_MEMBERS_KEY,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedApp {
    pub label: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedMember {
    /// Name of the appended member.
    pub member: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_type: Option<String>,
    /// Developer name of the application that was updated.
    pub unifiedapp: String,
    pub path: String,
    pub member_count: usize,
}

/// Write `<dir>/<developerName>.unifiedapp-meta.xml`, creating `dir` when
/// needed. An existing file is replaced.
pub fn generate(
    fs: &dyn FileSystem,
    dir: &Path,
    developer_name: &str,
    app: &UnifiedApplication,
) -> Result<GeneratedApp> {
    metadata::validate_developer_name(developer_name, "developerName")?;
    fs.ensure_dir(dir)?;

    let record = MetadataRecord::from_serializable(app)?;
    let path = metadata::unified_app_path(dir, developer_name);
    write_record(fs, &path, &record)?;

    Ok(GeneratedApp {
        label: app.label.clone(),
        path: path.display().to_string(),
    })
}

/// Append one member to an existing application file. Duplicates are kept.
pub fn add_member(
    fs: &dyn FileSystem,
    dir: &Path,
    developer_name: &str,
    member: UnifiedApplicationMember,
) -> Result<AddedMember> {
    metadata::validate_developer_name(developer_name, "developerName")?;

    let path = metadata::unified_app_path(dir, developer_name);
    let mut record = read_app(fs, &path, developer_name)?;

    let entry = serde_json::to_value(&member).map_err(|e| {
        Error::internal_json(e.to_string(), Some("serialize member".to_string()))
    })?;
    record.push_to_list(UNIFIED_APP_MEMBERS_KEY, entry);
    write_record(fs, &path, &record)?;

    Ok(AddedMember {
        member: member.name,
        member_type: member.member_type,
        unifiedapp: developer_name.to_string(),
        path: path.display().to_string(),
        member_count: record.list_len(UNIFIED_APP_MEMBERS_KEY),
    })
}

fn read_app(fs: &dyn FileSystem, path: &Path, developer_name: &str) -> Result<MetadataRecord> {
    if !fs.exists(path) {
        let searched = path
            .parent()
            .map(|p| vec![p.display().to_string()])
            .unwrap_or_default();
        return Err(Error::object_not_found(developer_name, searched)
            .with_hint("Create it first with 'sobject generate unifiedapp'"));
    }

    let xml = fs.read(path)?;
    convert::from_xml(&xml, UNIFIED_APPLICATION_ROOT)
}

fn write_record(fs: &dyn FileSystem, path: &Path, record: &MetadataRecord) -> Result<()> {
    let xml = convert::to_xml(record, UNIFIED_APPLICATION_ROOT, &XmlOptions::default())?;
    fs.write(path, &xml)?;
    log_status!("write", "Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_files::{local, MemoryFs};
    use std::fs;
    use tempfile::tempdir;

    fn app(label: &str) -> UnifiedApplication {
        UnifiedApplication {
            label: label.to_string(),
            description: None,
        }
    }

    fn member(name: &str, member_type: Option<&str>) -> UnifiedApplicationMember {
        UnifiedApplicationMember {
            name: name.to_string(),
            member_type: member_type.map(str::to_string),
        }
    }

    #[test]
    fn generate_writes_label_without_description() {
        let dir = tempdir().unwrap();
        let apps = dir.path().join("UnifiedApplications");

        let out = generate(&local(), &apps, "My_App", &app("My App")).unwrap();

        assert!(out.path.ends_with("My_App.unifiedapp-meta.xml"));
        let xml = fs::read_to_string(apps.join("My_App.unifiedapp-meta.xml")).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<UnifiedApplication>\n    <label>My App</label>\n</UnifiedApplication>\n"
        );
    }

    #[test]
    fn generate_includes_description_when_given() {
        let dir = tempdir().unwrap();
        let described = UnifiedApplication {
            label: "Ops".to_string(),
            description: Some("Operations console".to_string()),
        };

        generate(&local(), dir.path(), "Ops", &described).unwrap();

        let xml = fs::read_to_string(dir.path().join("Ops.unifiedapp-meta.xml")).unwrap();
        assert!(xml.contains("<description>Operations console</description>"));
    }

    #[test]
    fn members_accumulate_in_order_with_duplicates() {
        let dir = tempdir().unwrap();
        let fs = local();
        generate(&fs, dir.path(), "My_App", &app("My App")).unwrap();

        let first = add_member(&fs, dir.path(), "My_App", member("Account", Some("Object"))).unwrap();
        assert_eq!(first.member_count, 1);

        let second = add_member(&fs, dir.path(), "My_App", member("Contact", None)).unwrap();
        assert_eq!(second.member_count, 2);

        let third = add_member(&fs, dir.path(), "My_App", member("Account", Some("Object"))).unwrap();
        assert_eq!(third.member_count, 3);
        assert_eq!(third.member, "Account");
        assert_eq!(third.unifiedapp, "My_App");

        let xml = fs.read(&dir.path().join("My_App.unifiedapp-meta.xml")).unwrap();
        let record = convert::from_xml(&xml, UNIFIED_APPLICATION_ROOT).unwrap();
        let members = record.get(UNIFIED_APP_MEMBERS_KEY).unwrap().as_array().unwrap();
        let names: Vec<&str> = members.iter().map(|m| m["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Account", "Contact", "Account"]);
        assert!(members[1].get("type").is_none());
        assert_eq!(record.get_str("label"), Some("My App"));
    }

    #[test]
    fn member_xml_nests_name_and_type() {
        let dir = tempdir().unwrap();
        let fs = local();
        generate(&fs, dir.path(), "My_App", &app("My App")).unwrap();
        add_member(&fs, dir.path(), "My_App", member("Account", Some("Object"))).unwrap();

        let xml = fs::read_to_string(dir.path().join("My_App.unifiedapp-meta.xml")).unwrap();
        assert!(xml.contains(
            "    <unifiedApplicationMember>\n        <name>Account</name>\n        <type>Object</type>\n    </unifiedApplicationMember>\n"
        ));
    }

    #[test]
    fn add_member_to_missing_app_is_not_found() {
        let dir = tempdir().unwrap();
        let err = add_member(&local(), dir.path(), "Nope", member("Account", None)).unwrap_err();
        assert_eq!(err.code.as_str(), "object.not_found");
    }

    #[test]
    fn add_member_output_names_member_and_app() {
        let dir = tempdir().unwrap();
        let fs = local();
        generate(&fs, dir.path(), "My_App", &app("My App")).unwrap();

        let added = add_member(&fs, dir.path(), "My_App", member("Contact", None)).unwrap();

        assert_eq!(
            serde_json::to_value(&added).unwrap(),
            serde_json::json!({
                "member": "Contact",
                "unifiedapp": "My_App",
                "path": added.path.clone(),
                "memberCount": 1,
            })
        );
    }

    #[test]
    fn existence_check_goes_through_file_system() {
        let fs = MemoryFs::default();
        let dir = Path::new("apps");
        fs.insert(
            dir.join("Mem.unifiedapp-meta.xml"),
            "<UnifiedApplication><label>Mem</label></UnifiedApplication>",
        );

        let added = add_member(&fs, dir, "Mem", member("Account", None)).unwrap();
        assert_eq!(added.member_count, 1);
        assert!(fs
            .read(&dir.join("Mem.unifiedapp-meta.xml"))
            .unwrap()
            .contains("<name>Account</name>"));

        let err = add_member(&fs, dir, "Absent", member("Account", None)).unwrap_err();
        assert_eq!(err.code.as_str(), "object.not_found");
    }

    #[test]
    fn add_member_to_wrong_root_is_parse_error() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("Odd.unifiedapp-meta.xml"),
            "<CustomObject><label>x</label></CustomObject>",
        )
        .unwrap();

        let err = add_member(&local(), dir.path(), "Odd", member("Account", None)).unwrap_err();
        assert_eq!(err.code.as_str(), "xml.parse_error");
    }
}
