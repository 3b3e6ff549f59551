use std::path::PathBuf;

use sobject::config::ProjectContext;
use sobject::local_files::{self, LocalFs};
use sobject::messages::Messages;
use sobject::prompt::PromptEngine;

pub type CmdResult<T> = sobject::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Take prompt defaults instead of asking.
    pub non_interactive: bool,
}

/// Everything a handler needs for one invocation.
pub(crate) struct CommandContext {
    pub fs: LocalFs,
    pub project: ProjectContext,
    pub messages: Messages,
    pub prompt: PromptEngine,
}

impl CommandContext {
    pub fn load(global: &GlobalArgs) -> sobject::Result<Self> {
        let root = current_dir()?;
        let fs = local_files::local();
        let project = ProjectContext::load(&fs, &root)?;
        let prompt = if global.non_interactive {
            PromptEngine::non_interactive()
        } else {
            PromptEngine::new()
        };

        Ok(Self {
            fs,
            project,
            messages: Messages::embedded()?,
            prompt,
        })
    }
}

fn current_dir() -> sobject::Result<PathBuf> {
    std::env::current_dir().map_err(|e| {
        sobject::Error::internal_io(e.to_string(), Some("resolve working directory".to_string()))
    })
}

pub mod generate;
pub mod objects;
pub mod update;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (sobject::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Generate(args) => dispatch!(args, global, generate),
        crate::Commands::Update(args) => dispatch!(args, global, update),
        crate::Commands::Objects(args) => dispatch!(args, global, objects),
    }
}
