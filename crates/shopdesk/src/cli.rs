//! Clap derive structures for the `shopdesk` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// shopdesk -- manage the storefront catalog and accounts from a terminal
#[derive(Debug, Parser)]
#[command(
    name = "shopdesk",
    version,
    about = "Manage the shopdesk storefront and admin backend from the command line",
    long_about = "Lists, creates, edits and deletes accounts, roles and catalog\n\
        categories, browses products, and keeps the session's cart count,\n\
        identity and language between runs.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Records per page (overrides config)
    #[arg(long, global = true)]
    pub per_page: Option<NonZeroU32>,

    /// Directory holding session and preference files
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', env = "SHOPDESK_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage user accounts
    #[command(alias = "u")]
    Users(ResourceArgs),

    /// Manage age categories
    Ages(ResourceArgs),

    /// Manage branch categories
    Branches(ResourceArgs),

    /// Manage skill categories
    Skills(ResourceArgs),

    /// Manage roles
    Roles(ResourceArgs),

    /// Browse the product catalog (read-only)
    #[command(alias = "p")]
    Products(ResourceArgs),

    /// Add products to the cart
    Cart(CartArgs),

    /// Inspect and change the stored session
    Session(SessionArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Resource screens ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List one page of records
    #[command(alias = "ls")]
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Show a single record
    Get {
        /// Record ID
        id: String,
    },

    /// Create a record
    Create {
        /// Field value as NAME=VALUE (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Edit a record
    Update {
        /// Record ID
        id: String,

        /// Field value as NAME=VALUE (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record ID
        id: String,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

// ── Cart ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Add a product to the signed-in user's cart
    Add {
        /// Product ID
        #[arg(long)]
        product: String,

        /// Unit price
        #[arg(long)]
        price: f64,

        /// Quantity
        #[arg(long, default_value = "1")]
        amount: String,
    },
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Show cart count, identity and language
    Show,

    /// Record the signed-in user
    Login {
        /// User ID
        user_id: String,
    },

    /// Clear the signed-in user
    Logout,

    /// Switch the interface language
    Locale {
        /// Language code (eng, vie)
        code: String,
    },

    /// Overwrite the cart item count
    CartCount {
        count: u32,
    },

    /// End the session: clear identity and cart count
    End,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file from the current settings and flags
    Init,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("roleName=Sales=Ops").unwrap(),
            ("roleName".into(), "Sales=Ops".into())
        );
        assert_eq!(parse_assignment("email=").unwrap(), ("email".into(), String::new()));
        assert!(parse_assignment("roleName").is_err());
        assert!(parse_assignment("=x").is_err());
    }
}
