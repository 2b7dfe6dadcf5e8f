//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use shopdesk_config::ConfigError;
use shopdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend at {url}")]
    #[diagnostic(
        code(shopdesk::connection_failed),
        help(
            "Check that the backend is running and accessible.\n\
             Set the URL with --api-url or api_url in the config file."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(code(shopdesk::timeout), help("Raise the limit with --timeout <seconds>"))]
    Timeout { seconds: u64 },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(shopdesk::not_found),
        help("Run: shopdesk {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(shopdesk::rejected))]
    Rejected { message: String },

    #[error("{resource} is read-only")]
    #[diagnostic(
        code(shopdesk::read_only),
        help("This screen supports list and get only")
    )]
    ReadOnly { resource: String },

    #[error("Invalid {resource}:\n{details}")]
    #[diagnostic(code(shopdesk::invalid_fields))]
    InvalidFields { resource: String, details: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error: {message}")]
    #[diagnostic(code(shopdesk::api_error))]
    ApiError {
        message: String,
        status: Option<u16>,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shopdesk::validation))]
    Validation { field: String, reason: String },

    #[error("Refusing to {action} without confirmation")]
    #[diagnostic(
        code(shopdesk::confirmation_required),
        help("Pass --yes to skip the prompt in non-interactive use")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(shopdesk::config),
        help("Check the config file (shopdesk config path) and SHOPDESK_* variables")
    )]
    Config(#[from] ConfigError),

    // ── Local state ──────────────────────────────────────────────────
    #[error("Session storage error: {message}")]
    #[diagnostic(code(shopdesk::storage), help("Check --state-dir or state_dir in the config file"))]
    Storage { message: String },

    #[error(transparent)]
    #[diagnostic(code(shopdesk::io))]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    #[diagnostic(code(shopdesk::internal))]
    Internal(String),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::ReadOnly { .. } => exit_code::PERMISSION,
            Self::Validation { .. }
            | Self::InvalidFields { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Config(_) => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// A not-found error that points at the screen's list command.
    pub fn not_found(resource_type: &str, identifier: &str, endpoint: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: format!("{endpoint} list"),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{} list", entity_type.to_lowercase()),
                resource_type: entity_type,
                identifier,
            },
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::ReadOnly { resource } => CliError::ReadOnly { resource },
            CoreError::Api { message, status } => CliError::ApiError { message, status },
            CoreError::Storage { message } => CliError::Storage { message },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
