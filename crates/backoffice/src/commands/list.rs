//! Shared list and delete flow over any console resource.

use backoffice_core::{ListQuery, ListState, Resource, SortDirection};

use crate::CliSession;
use crate::cli::{DeleteArgs, GlobalOpts, ListArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

/// How a resource is named and guarded on the command line.
pub struct Surface {
    /// Singular noun for messages.
    pub noun: &'static str,
    /// Route checked by the auth guard.
    pub route: &'static str,
    /// Subcommand suggested when a row is missing.
    pub list_command: &'static str,
}

impl Surface {
    fn error(&self, session: &CliSession, err: backoffice_core::ListError) -> CliError {
        session.console.handle_list_error(&err);
        CliError::from_list(err, self.noun, self.list_command)
    }
}

/// Load one page with the requested sort and filter applied.
pub async fn fetch<R: Resource>(
    session: &CliSession,
    surface: &Surface,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<ListState<R::Row>, CliError> {
    util::require_login(&session.console, surface.route)?;

    let page_size = args.per_page.unwrap_or(session.console.config().page_size);
    let mut query = ListQuery::first_page(page_size).page(args.page.saturating_sub(1));
    if let Some(ref key) = args.sort {
        if R::column(key).is_none() {
            let known: Vec<_> = R::columns().iter().map(|c| c.key).collect();
            return Err(CliError::Validation {
                field: "sort".into(),
                reason: format!("unknown column '{key}'. Valid columns: {}", known.join(", ")),
            });
        }
        let direction = if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        query = query.sorted(key.clone(), direction);
    }
    if let Some(ref text) = args.filter {
        query = query.filtered(text.clone());
    }

    let controller = session.console.list::<R>();
    util::with_spinner(global, &format!("Loading {}...", R::LABEL), controller.load(query))
        .await
        .map_err(|e| surface.error(session, e))?;

    Ok(controller.snapshot())
}

/// Print the visible rows of `state`, with a paging footer under tables.
pub fn print<R: Resource, T: tabled::Tabled>(
    state: &ListState<R::Row>,
    global: &GlobalOpts,
    to_row: impl Fn(&R::Row) -> T,
) -> Result<(), CliError>
where
    R::Row: serde::Serialize,
{
    let rows: Vec<R::Row> = state.visible_rows().cloned().collect();
    let out = output::render_list(global.output, &rows, to_row, |r| R::row_id(r).to_string())?;
    output::print_output(&out, global.quiet);

    if global.output == OutputFormat::Table {
        output::print_status(&footer::<R>(state), global.quiet);
    }
    Ok(())
}

fn footer<R: Resource>(state: &ListState<R::Row>) -> String {
    let page = state.page_index.saturating_add(1);
    let pages = state.total_pages.max(1);
    if state.filter_text.is_empty() {
        format!("Page {page}/{pages} · {} {} total", state.total_count, R::LABEL)
    } else {
        format!(
            "Page {page}/{pages} · {} of {} {} on this page match '{}'",
            state.visible_count(),
            state.items.len(),
            R::LABEL,
            state.filter_text
        )
    }
}

/// Locate the row on its page, confirm, then delete it.
pub async fn delete<R: Resource>(
    session: &CliSession,
    surface: &Surface,
    args: &DeleteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_login(&session.console, surface.route)?;

    let page_size = args.per_page.unwrap_or(session.console.config().page_size);
    let controller = session.console.list::<R>();
    let query = ListQuery::first_page(page_size).page(args.page.saturating_sub(1));
    util::with_spinner(global, &format!("Loading {}...", R::LABEL), controller.load(query))
        .await
        .map_err(|e| surface.error(session, e))?;

    let Some(row) = controller.row(args.id) else {
        return Err(CliError::NotFound {
            resource_type: surface.noun.into(),
            identifier: args.id.to_string(),
            list_command: surface.list_command.into(),
        });
    };
    if !R::can_delete(&row) {
        return Err(CliError::NotPermitted {
            resource_type: surface.noun.into(),
            identifier: args.id.to_string(),
        });
    }

    let prompt = format!("Delete {} {}?", surface.noun, args.id);
    if !util::confirm(&prompt, global.yes, "delete")? {
        output::print_status("Aborted", global.quiet);
        return Ok(());
    }

    util::with_spinner(global, "Deleting...", controller.delete(args.id))
        .await
        .map_err(|e| surface.error(session, e))?;

    output::print_status(&format!("✓ Deleted {} {}", surface.noun, args.id), global.quiet);
    Ok(())
}
