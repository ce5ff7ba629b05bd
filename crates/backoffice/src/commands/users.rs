//! User command handlers.

use tabled::Tabled;

use backoffice_core::{User, Users};

use crate::CliSession;
use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::list::{self, Surface};

const SURFACE: Surface = Surface {
    noun: "user",
    route: "/users",
    list_command: "users list",
};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl UserRow {
    fn new(u: &User, color: bool) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            phone: u.phone.clone().unwrap_or_default(),
            role: output::role_badge(u.badge(), color),
            status: u.status_label(),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &CliSession, args: UsersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List(list_args) => {
            let state = list::fetch::<Users>(session, &SURFACE, &list_args, global).await?;
            let color = output::should_color(global.color);
            list::print::<Users, _>(&state, global, |u| UserRow::new(u, color))
        }
        UsersCommand::Delete(delete_args) => list::delete::<Users>(session, &SURFACE, &delete_args, global).await,
    }
}
