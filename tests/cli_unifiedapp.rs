#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn sobject_cmd() -> Command {
    Command::new(cargo_bin("sobject"))
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_generate_unifiedapp_writes_file() {
    let temp = TempDir::new().unwrap();

    let output = sobject_cmd()
        .current_dir(temp.path())
        .args([
            "generate",
            "unifiedapp",
            "--label",
            "My App",
            "--developer-name",
            "My_App",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["label"], "My App");

    let xml = fs::read_to_string(
        temp.path()
            .join("UnifiedApplications")
            .join("My_App.unifiedapp-meta.xml"),
    )
    .unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(xml.contains("<UnifiedApplication>"));
    assert!(xml.contains("<label>My App</label>"));
    assert!(!xml.contains("<description"));
}

#[test]
fn test_generate_unifiedapp_accepts_camel_case_alias() {
    let temp = TempDir::new().unwrap();

    sobject_cmd()
        .current_dir(temp.path())
        .args([
            "generate",
            "unifiedapp",
            "-l",
            "Sales",
            "--developerName",
            "Sales",
            "-s",
            "Sales console",
        ])
        .assert()
        .success();

    let xml = fs::read_to_string(temp.path().join("UnifiedApplications/Sales.unifiedapp-meta.xml"))
        .unwrap();
    assert!(xml.contains("<description>Sales console</description>"));
}

#[test]
fn test_addmember_appends_in_order() {
    let temp = TempDir::new().unwrap();

    sobject_cmd()
        .current_dir(temp.path())
        .args(["generate", "unifiedapp", "-l", "My App", "-d", "My_App"])
        .assert()
        .success();

    sobject_cmd()
        .current_dir(temp.path())
        .args([
            "update",
            "unifiedapp",
            "addmember",
            "--name",
            "Account",
            "--developer-name",
            "My_App",
            "--type",
            "Object",
        ])
        .assert()
        .success();

    let output = sobject_cmd()
        .current_dir(temp.path())
        .args(["update", "unifiedapp", "addmember", "-l", "Contact", "-d", "My_App"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["data"]["member"], "Contact");
    assert_eq!(json["data"]["unifiedapp"], "My_App");
    assert_eq!(json["data"]["memberCount"], 2);

    let xml = fs::read_to_string(temp.path().join("UnifiedApplications/My_App.unifiedapp-meta.xml"))
        .unwrap();
    let account = xml.find("<name>Account</name>").unwrap();
    let contact = xml.find("<name>Contact</name>").unwrap();
    assert!(account < contact);
    assert!(xml.contains("<type>Object</type>"));
    assert_eq!(xml.matches("<unifiedApplicationMember>").count(), 2);
}

#[test]
fn test_addmember_without_app_is_not_found() {
    let temp = TempDir::new().unwrap();

    sobject_cmd()
        .current_dir(temp.path())
        .args(["update", "unifiedapp", "addmember", "-l", "Account", "-d", "Missing"])
        .assert()
        .code(4)
        .stdout(predicate::str::contains("object.not_found"));
}

#[test]
fn test_unsafe_developer_name_is_rejected() {
    let temp = TempDir::new().unwrap();

    sobject_cmd()
        .current_dir(temp.path())
        .args(["generate", "unifiedapp", "-l", "Bad", "-d", "../escape"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("validation.invalid_argument"));

    assert!(!temp.path().join("escape.unifiedapp-meta.xml").exists());
}
