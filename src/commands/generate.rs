use clap::{Args, Subcommand};
use serde::Serialize;

use sobject::messages;
use sobject::metadata::UnifiedApplication;
use sobject::prompt::{self, ObjectType};
use sobject::sobject::{self as objects, GeneratedObject, ObjectDefinition};
use sobject::unified_app::{self, GeneratedApp};
use sobject::utils::template::TemplateVars;
use sobject::utils::validation;

use super::{CmdResult, CommandContext, GlobalArgs};

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Create a unified application definition
    #[command(name = "unifiedapp")]
    UnifiedApp {
        /// Display label of the application
        #[arg(short = 'l', long)]
        label: String,

        /// Developer name, used as the file name
        #[arg(short = 'd', long = "developer-name", visible_alias = "developerName")]
        developer_name: String,

        /// Optional description
        #[arg(short = 's', long)]
        description: Option<String>,
    },
    /// Create a custom object (`__c`)
    #[command(name = "sobject")]
    Sobject(ObjectArgs),
    /// Create a platform event (`__e`)
    #[command(name = "platformevent")]
    PlatformEvent(ObjectArgs),
}

#[derive(Args)]
struct ObjectArgs {
    /// Display label
    #[arg(short = 'l', long)]
    label: String,

    /// Plural label (custom objects default to label + "s")
    #[arg(short = 'p', long = "plural-label", visible_alias = "pluralLabel")]
    plural_label: Option<String>,

    /// API name including suffix; prompted for when omitted
    #[arg(short = 'a', long = "api-name", visible_alias = "apiName")]
    api_name: Option<String>,

    /// Target `objects` directory
    #[arg(short = 'o', long)]
    directory: Option<String>,

    /// Optional description
    #[arg(short = 's', long)]
    description: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
pub enum GenerateOutput {
    UnifiedApp(GeneratedApp),
    Object(GeneratedObject),
}

pub fn run(args: GenerateArgs, global: &GlobalArgs) -> CmdResult<GenerateOutput> {
    let ctx = CommandContext::load(global)?;

    match args.command {
        GenerateCommand::UnifiedApp {
            label,
            developer_name,
            description,
        } => {
            validation::require_non_empty(&label, "label", "Label cannot be empty")?;
            let app = UnifiedApplication { label, description };
            let generated = unified_app::generate(
                &ctx.fs,
                &ctx.project.unified_app_dir(),
                &developer_name,
                &app,
            )?;

            crate::tty::status(&ctx.messages.get(
                messages::GENERATE_UNIFIED_APP_SUCCESS,
                &[
                    (TemplateVars::LABEL, generated.label.as_str()),
                    (TemplateVars::PATH, generated.path.as_str()),
                ],
            ));
            Ok((GenerateOutput::UnifiedApp(generated), 0))
        }
        GenerateCommand::Sobject(object_args) => {
            let generated = generate_object(&ctx, object_args, ObjectType::CustomObject)?;
            Ok((GenerateOutput::Object(generated), 0))
        }
        GenerateCommand::PlatformEvent(object_args) => {
            let generated = generate_object(&ctx, object_args, ObjectType::PlatformEvent)?;
            Ok((GenerateOutput::Object(generated), 0))
        }
    }
}

fn generate_object(
    ctx: &CommandContext,
    args: ObjectArgs,
    object_type: ObjectType,
) -> sobject::Result<GeneratedObject> {
    validation::require_non_empty(&args.label, "label", "Label cannot be empty")?;

    let api_name = match args.api_name {
        Some(name) => name,
        None => prompt::api_name_prompt(&ctx.prompt, &ctx.messages, &args.label, object_type)?,
    };
    let objects_dir = objects::resolve_objects_dir(&ctx.project, args.directory.as_deref())?;

    let definition = ObjectDefinition {
        api_name,
        label: args.label,
        plural_label: args.plural_label,
        description: args.description,
    };

    let (generated, success_key) = match object_type {
        ObjectType::PlatformEvent => (
            objects::generate_platform_event(&ctx.fs, &objects_dir, &definition, &ctx.messages)?,
            messages::GENERATE_PLATFORM_EVENT_SUCCESS,
        ),
        _ => (
            objects::generate_custom_object(&ctx.fs, &objects_dir, &definition, &ctx.messages)?,
            messages::GENERATE_SOBJECT_SUCCESS,
        ),
    };

    crate::tty::status(&ctx.messages.get(
        success_key,
        &[
            (TemplateVars::NAME, generated.name.as_str()),
            (TemplateVars::PATH, generated.path.as_str()),
        ],
    ));
    Ok(generated)
}
