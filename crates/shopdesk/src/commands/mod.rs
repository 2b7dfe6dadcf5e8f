//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod cart;
pub mod config_cmd;
pub mod resources;
pub mod session;
pub mod util;

use shopdesk_core::{
    AgeCategory, BranchCategory, ClientConfig, Product, ResourceSpec, Role, SkillCategory, User,
};

use crate::cli::{Command, OutputFormat};
use crate::error::CliError;

/// Everything a backend-bound handler needs, resolved from config + flags.
#[derive(Debug, Clone)]
pub struct Context {
    pub client: ClientConfig,
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Users(args) => resources::handle::<User>(ResourceSpec::users(), args, ctx).await,
        Command::Ages(args) => resources::handle::<AgeCategory>(ResourceSpec::ages(), args, ctx).await,
        Command::Branches(args) => {
            resources::handle::<BranchCategory>(ResourceSpec::branches(), args, ctx).await
        }
        Command::Skills(args) => {
            resources::handle::<SkillCategory>(ResourceSpec::skills(), args, ctx).await
        }
        Command::Roles(args) => resources::handle::<Role>(ResourceSpec::roles(), args, ctx).await,
        Command::Products(args) => {
            resources::handle::<Product>(ResourceSpec::products(), args, ctx).await
        }
        Command::Cart(args) => cart::handle(args, ctx).await,
        Command::Session(args) => session::handle(args, ctx),
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}
