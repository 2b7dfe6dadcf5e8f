//! Session subcommand handlers: cart count, identity and language.

use std::sync::Arc;

use tabled::Tabled;
use tracing::debug;

use shopdesk_core::{EntityId, Locale, SessionState, SessionStore};

use super::Context;
use crate::cli::{SessionArgs, SessionCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "Setting")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn session_rows(state: &SessionState) -> Vec<SessionRow> {
    vec![
        SessionRow {
            key: "Cart items",
            value: state.cart_item_count.to_string(),
        },
        SessionRow {
            key: "User",
            value: state
                .user_id
                .as_ref()
                .map_or_else(|| "(signed out)".into(), ToString::to_string),
        },
        SessionRow {
            key: "Language",
            value: format!("{} ({})", state.locale.display_name(), state.locale.code()),
        },
    ]
}

/// Open the persisted session. The terminal has no translation catalog
/// to swap, so the loader only traces.
pub fn open_session(ctx: &Context) -> Result<SessionStore, CliError> {
    let store = ctx.client.open_session()?;
    Ok(store.with_catalog_loader(Arc::new(|locale: Locale| {
        debug!(%locale, "catalog loaded");
    })))
}

pub fn handle(args: SessionArgs, ctx: &Context) -> Result<(), CliError> {
    let store = open_session(ctx)?;

    match args.command {
        SessionCommand::Show => {}
        SessionCommand::Login { user_id } => {
            let user_id = user_id.trim();
            if user_id.is_empty() {
                return Err(CliError::Validation {
                    field: "user-id".into(),
                    reason: "cannot be empty".into(),
                });
            }
            store.set_identity(Some(EntityId::from(user_id)));
        }
        SessionCommand::Logout => store.set_identity(None),
        SessionCommand::Locale { code } => {
            let locale: Locale = code.parse().map_err(|_| CliError::Validation {
                field: "locale".into(),
                reason: format!("unknown language `{code}`; expected eng or vie"),
            })?;
            store.set_locale(locale);
        }
        SessionCommand::CartCount { count } => store.set_cart_count(count),
        SessionCommand::End => store.end_session(),
    }

    let state = store.snapshot();
    let rendered = output::render_single(ctx.format, &state, session_rows, |s| {
        s.user_id.as_ref().map(ToString::to_string).unwrap_or_default()
    })?;
    output::print_output(&rendered, ctx.quiet);
    Ok(())
}
