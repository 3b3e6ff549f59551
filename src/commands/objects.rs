use std::path::Path;

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::Value;

use sobject::local_files::FileSystem;
use sobject::locate;
use sobject::messages;
use sobject::utils::template::TemplateVars;
use sobject::utils::validation;

use super::{CmdResult, CommandContext, GlobalArgs};

#[derive(Args)]
pub struct ObjectsArgs {
    #[command(subcommand)]
    command: ObjectsCommand,
}

#[derive(Subcommand)]
enum ObjectsCommand {
    /// List object directories under the package directories
    List,
    /// Show the parsed metadata of one object
    Show {
        /// Object API name, e.g. Invoice__c
        api_name: Option<String>,

        /// Read the object folder directly instead of searching by name
        #[arg(long, conflicts_with = "api_name")]
        folder: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum ObjectsOutput {
    List(ObjectsListOutput),
    Show(ObjectShowOutput),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectsListOutput {
    pub package_directories: Vec<String>,
    pub object_directories: Vec<String>,
    pub objects: Vec<ObjectSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    pub name: String,
    pub directory: String,
    pub metadata_files: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectShowOutput {
    pub name: String,
    pub record: Value,
}

pub fn run(args: ObjectsArgs, global: &GlobalArgs) -> CmdResult<ObjectsOutput> {
    let ctx = CommandContext::load(global)?;

    match args.command {
        ObjectsCommand::List => Ok((ObjectsOutput::List(list(&ctx)?), 0)),
        ObjectsCommand::Show { api_name, folder } => {
            let (name, record) = match folder {
                Some(folder) => {
                    let folder = ctx.project.resolve_dir(&folder);
                    let record = locate::find_object_xml_by_folder(&ctx.fs, &folder)?;
                    (display_name(&folder), record)
                }
                None => {
                    let api_name = validation::require(
                        api_name,
                        "apiName",
                        "Pass an object API name or --folder",
                    )?;
                    let record = locate::find_object_xml_by_name(
                        &ctx.fs,
                        &ctx.project.package_directories,
                        &api_name,
                    )?;
                    (api_name, record)
                }
            };

            Ok((
                ObjectsOutput::Show(ObjectShowOutput {
                    name,
                    record: record.to_json(),
                }),
                0,
            ))
        }
    }
}

fn list(ctx: &CommandContext) -> sobject::Result<ObjectsListOutput> {
    let dirs = &ctx.project.package_directories;
    let object_directories = locate::find_object_directories(dirs)?;

    let mut objects = Vec::new();
    for dir in locate::find_object_subdirectories(dirs)? {
        let metadata_files = ctx
            .fs
            .list(&dir)?
            .into_iter()
            .filter(|entry| entry.is_metadata_xml())
            .map(|entry| entry.path.display().to_string())
            .collect();

        objects.push(ObjectSummary {
            name: display_name(&dir),
            directory: dir.display().to_string(),
            metadata_files,
        });
    }

    let count = object_directories.len().to_string();
    crate::tty::status(&ctx.messages.get(
        messages::OBJECTS_LIST_SUMMARY,
        &[(TemplateVars::COUNT, count.as_str())],
    ));

    Ok(ObjectsListOutput {
        package_directories: dirs.iter().map(|d| d.display().to_string()).collect(),
        object_directories: object_directories
            .iter()
            .map(|d| d.display().to_string())
            .collect(),
        objects,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
