//! Command dispatch: bridges CLI args -> console operations -> output.

pub mod auth;
pub mod config_cmd;
pub mod list;
pub mod products;
pub mod users;
pub mod util;

use crate::CliSession;
use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to its handler.
pub async fn dispatch(cmd: Command, session: &CliSession, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(session, args, global).await,
        Command::Logout => auth::logout(session, global),
        Command::Whoami => auth::whoami(session, global),
        Command::Users(args) => users::handle(session, args, global).await,
        Command::Products(args) => products::handle(session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "handled without an API connection".into(),
        }),
    }
}
