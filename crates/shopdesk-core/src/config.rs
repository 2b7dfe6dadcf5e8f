// ── Runtime client configuration ──
//
// Describes *how* to reach the backend and where session state lives.
// Never touches config files: shopdesk-config (or a test) builds a
// `ClientConfig` and hands it in.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use shopdesk_api::{HttpTransport, Transport, TransportConfig};

use crate::error::CoreError;
use crate::session::{FileStore, MemoryStore, SessionStore};

/// Records per page when nothing valid is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::MIN.saturating_add(9);

pub const SESSION_FILE: &str = "session.json";
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Parse a configured page size. Unset, non-numeric and zero all fall
/// back to [`DEFAULT_PAGE_SIZE`].
pub fn page_size_from(raw: Option<&str>) -> NonZeroU32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .and_then(NonZeroU32::new)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL (e.g. `http://localhost:3000/api/`).
    pub api_url: Url,
    pub page_size: NonZeroU32,
    /// Client-wide request timeout; the only bound on a hung request.
    pub timeout: Duration,
    /// Where session and preference files live. `None` keeps them in memory.
    pub state_dir: Option<PathBuf>,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(30),
            state_dir: None,
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            ..TransportConfig::default()
        }
    }

    pub fn build_transport(&self) -> Result<Arc<dyn Transport>, CoreError> {
        let transport = HttpTransport::new(self.api_url.clone(), &self.transport_config())?;
        Ok(Arc::new(transport))
    }

    /// Open the session store, file-backed when a state dir is set.
    pub fn open_session(&self) -> Result<SessionStore, CoreError> {
        match &self.state_dir {
            Some(dir) => {
                let session = FileStore::open(dir.join(SESSION_FILE))?;
                let durable = FileStore::open(dir.join(PREFERENCES_FILE))?;
                Ok(SessionStore::hydrate(Arc::new(session), Arc::new(durable)))
            }
            None => Ok(SessionStore::hydrate(
                Arc::new(MemoryStore::new()),
                Arc::new(MemoryStore::new()),
            )),
        }
    }
}
