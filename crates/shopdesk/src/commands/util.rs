//! Shared helpers for command handlers.

use std::io::IsTerminal;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::debug;

use shopdesk_core::{ControllerEvent, FieldErrors, Notice};

use super::Context;
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Print the notices a controller emitted. Scroll locks have no
/// terminal counterpart and are only traced.
pub fn drain_events(events: &mut broadcast::Receiver<ControllerEvent>, ctx: &Context) {
    loop {
        match events.try_recv() {
            Ok(ControllerEvent::Notice(Notice::Success(message))) => {
                output::print_notice(&message, ctx.quiet, ctx.color);
            }
            Ok(ControllerEvent::Notice(Notice::Failure(message))) => {
                if !ctx.quiet {
                    eprintln!("{message}");
                }
            }
            Ok(ControllerEvent::ScrollLock { locked }) => debug!(locked, "scroll lock"),
            Err(TryRecvError::Lagged(skipped)) => debug!(skipped, "dropped controller events"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

/// One `  field: message` line per field error.
pub fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  {field}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_render_in_order() {
        let mut errors = FieldErrors::new();
        errors.insert("roleId".into(), "Role ID is required".into());
        errors.insert("roleName".into(), "Role name is required".into());
        assert_eq!(
            format_field_errors(&errors),
            "  roleId: Role ID is required\n  roleName: Role name is required"
        );
    }

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(confirm("Delete?", "delete", true).unwrap_or(false));
    }
}
