// ── Core error types ──
//
// User-facing errors from shopdesk-core. Consumers never see raw HTTP
// status codes or JSON parse failures; the `From<shopdesk_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Rejected by backend: {message}")]
    Rejected { message: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("{resource} is read-only")]
    ReadOnly { resource: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Persistence errors ───────────────────────────────────────────
    #[error("Storage error: {message}")]
    Storage { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Message suitable for an inline form banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message }
            | Self::ValidationFailed { message }
            | Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<shopdesk_api::Error> for CoreError {
    fn from(err: shopdesk_api::Error) -> Self {
        match err {
            shopdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            shopdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            shopdesk_api::Error::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            shopdesk_api::Error::ClientBuild(message) => CoreError::Config {
                message: format!("HTTP client: {message}"),
            },
            shopdesk_api::Error::Api {
                status: 404,
                message,
            } => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: message.unwrap_or_default(),
            },
            shopdesk_api::Error::Api {
                status,
                message: Some(message),
            } if (400..500).contains(&status) => CoreError::Rejected { message },
            shopdesk_api::Error::Api { status, message } => CoreError::Api {
                message: message.unwrap_or_else(|| format!("HTTP {status}")),
                status: Some(status),
            },
            shopdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Internal(format!("Malformed record: {err}"))
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_with_message_is_rejected() {
        let err = CoreError::from(shopdesk_api::Error::Api {
            status: 409,
            message: Some("Role name already exists".into()),
        });
        assert!(matches!(err, CoreError::Rejected { ref message } if message == "Role name already exists"));
        assert_eq!(err.user_message(), "Role name already exists");
    }

    #[test]
    fn not_found_maps_to_not_found() {
        let err = CoreError::from(shopdesk_api::Error::Api {
            status: 404,
            message: None,
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn server_error_stays_api() {
        let err = CoreError::from(shopdesk_api::Error::Api {
            status: 503,
            message: None,
        });
        assert!(matches!(err, CoreError::Api { status: Some(503), .. }));
    }
}
