use clap::{Args, Subcommand};

use sobject::messages;
use sobject::metadata::UnifiedApplicationMember;
use sobject::unified_app::{self, AddedMember};
use sobject::utils::template::TemplateVars;

use super::{CmdResult, CommandContext, GlobalArgs};

#[derive(Args)]
pub struct UpdateArgs {
    #[command(subcommand)]
    command: UpdateCommand,
}

#[derive(Subcommand)]
enum UpdateCommand {
    /// Modify an existing unified application
    #[command(name = "unifiedapp")]
    UnifiedApp(UnifiedAppArgs),
}

#[derive(Args)]
struct UnifiedAppArgs {
    #[command(subcommand)]
    command: UnifiedAppCommand,
}

#[derive(Subcommand)]
enum UnifiedAppCommand {
    /// Append a member entry to the application
    #[command(name = "addmember")]
    AddMember {
        /// Member name
        #[arg(short = 'l', long)]
        name: String,

        /// Developer name of the unified application
        #[arg(short = 'd', long = "developer-name", visible_alias = "developerName")]
        developer_name: String,

        /// Member type
        #[arg(short = 't', long = "type")]
        member_type: Option<String>,
    },
}

pub fn run(args: UpdateArgs, global: &GlobalArgs) -> CmdResult<AddedMember> {
    let ctx = CommandContext::load(global)?;

    match args.command {
        UpdateCommand::UnifiedApp(UnifiedAppArgs {
            command:
                UnifiedAppCommand::AddMember {
                    name,
                    developer_name,
                    member_type,
                },
        }) => {
            let member = UnifiedApplicationMember { name, member_type };
            let added = unified_app::add_member(
                &ctx.fs,
                &ctx.project.unified_app_dir(),
                &developer_name,
                member,
            )?;

            crate::tty::status(&ctx.messages.get(
                messages::ADD_MEMBER_SUCCESS,
                &[
                    (TemplateVars::NAME, added.member.as_str()),
                    (TemplateVars::DEVELOPER_NAME, developer_name.as_str()),
                ],
            ));
            Ok((added, 0))
        }
    }
}
