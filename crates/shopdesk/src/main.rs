mod cli;
mod commands;
mod error;
mod output;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use shopdesk_config::{Config, PageSetting};

use crate::cli::{Cli, ColorMode, Command, GlobalOpts, OutputFormat};
use crate::commands::Context;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "shopdesk", &mut std::io::stdout());
            Ok(())
        }

        // Config commands never touch the backend
        Command::Config(args) => {
            let cfg = resolve_config(&cli.global)?;
            let format = output_format(&cli.global, &cfg);
            commands::config_cmd::handle(args, cfg, format, &cli.global)
        }

        cmd => {
            let ctx = build_context(&cli.global)?;
            tracing::debug!(command = ?cmd, api_url = %ctx.client.api_url, "dispatching command");
            commands::dispatch(cmd, &ctx).await
        }
    }
}

/// Config file + `SHOPDESK_*` environment, then command-line overrides.
fn resolve_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = shopdesk_config::load_config()?;
    if let Some(url) = &global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(per_page) = global.per_page {
        cfg.per_page = Some(PageSetting::Number(i64::from(per_page.get())));
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if let Some(dir) = &global.state_dir {
        cfg.state_dir = Some(dir.clone());
    }
    Ok(cfg)
}

fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

fn build_context(global: &GlobalOpts) -> Result<Context, CliError> {
    let cfg = resolve_config(global)?;
    let color = global
        .color
        .or_else(|| ColorMode::from_str(&cfg.color, true).ok())
        .unwrap_or(ColorMode::Auto);

    Ok(Context {
        client: cfg.to_client_config()?,
        format: output_format(global, &cfg),
        color: output::should_color(color),
        quiet: global.quiet,
        yes: global.yes,
    })
}
