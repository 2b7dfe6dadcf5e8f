//! Config subcommand handlers.

use std::io::IsTerminal;

use dialoguer::Input;
use tabled::Tabled;

use shopdesk_config::{self as config, Config, PageSetting};
use shopdesk_core::page_size_from;

use super::util;
use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

fn config_rows(cfg: &Config) -> Vec<ConfigRow> {
    let per_page = cfg.per_page.as_ref().map(|p| match p {
        PageSetting::Number(n) => n.to_string(),
        PageSetting::Text(s) => s.clone(),
    });
    vec![
        ConfigRow {
            key: "api_url",
            value: cfg.api_url.clone(),
        },
        ConfigRow {
            key: "per_page",
            value: page_size_from(per_page.as_deref()).to_string(),
        },
        ConfigRow {
            key: "timeout",
            value: format!("{}s", cfg.timeout),
        },
        ConfigRow {
            key: "state_dir",
            value: cfg.resolved_state_dir().display().to_string(),
        },
        ConfigRow {
            key: "output",
            value: cfg.output.clone(),
        },
        ConfigRow {
            key: "color",
            value: cfg.color.clone(),
        },
    ]
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// `cfg` already carries the command-line overrides.
pub fn handle(
    args: ConfigArgs,
    mut cfg: Config,
    format: OutputFormat,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let out = output::render_single(format, &cfg, config_rows, |c| c.api_url.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init => {
            let path = config::config_path();
            if path.exists()
                && !util::confirm(
                    &format!("Overwrite {}?", path.display()),
                    "overwrite the existing config file",
                    global.yes,
                )?
            {
                return Ok(());
            }

            if global.api_url.is_none() && std::io::stdin().is_terminal() {
                cfg.api_url = Input::new()
                    .with_prompt("Backend URL")
                    .default(cfg.api_url.clone())
                    .interact_text()
                    .map_err(prompt_err)?;
            }
            // Fail before writing anything unusable.
            cfg.to_client_config()?;

            let written = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Configuration written to {}", written.display());
            }
            Ok(())
        }
    }
}
