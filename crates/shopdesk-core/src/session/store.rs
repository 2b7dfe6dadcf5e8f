// ── Session store ──
//
// Shared container for cart item count, signed-in identity and active
// locale. Hydrated from storage at construction; every mutation writes
// through to storage and notifies subscribers in one replace-and-notify
// on the `watch` channel.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::locale::{CatalogLoader, Locale};
use super::storage::{KeyValueStore, MemoryStore};
use crate::model::EntityId;
use crate::stream::StateStream;

pub const USER_ID_KEY: &str = "shopdesk.user_id";
pub const CART_COUNT_KEY: &str = "shopdesk.cart_count";
pub const LOCALE_KEY: &str = "shopdesk.locale";

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionState {
    pub cart_item_count: u32,
    pub user_id: Option<EntityId>,
    pub locale: Locale,
}

pub type SessionStream = StateStream<SessionState>;

/// One per application session; share it behind an `Arc`.
pub struct SessionStore {
    state: watch::Sender<SessionState>,
    /// Identity and cart count; cleared at session end.
    session: Arc<dyn KeyValueStore>,
    /// Locale preference.
    durable: Arc<dyn KeyValueStore>,
    catalog: Option<Arc<dyn CatalogLoader>>,
}

impl SessionStore {
    /// Build a store from persisted values. Missing or unparsable entries
    /// fall back to no identity, an empty cart and the primary locale.
    pub fn hydrate(session: Arc<dyn KeyValueStore>, durable: Arc<dyn KeyValueStore>) -> Self {
        let user_id = read(session.as_ref(), USER_ID_KEY)
            .filter(|s| !s.trim().is_empty())
            .map(EntityId::from);
        let cart_item_count = read(session.as_ref(), CART_COUNT_KEY)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0);
        let locale = read(durable.as_ref(), LOCALE_KEY)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        let initial = SessionState {
            cart_item_count,
            user_id,
            locale,
        };
        debug!(?initial, "session hydrated");
        let (state, _) = watch::channel(initial);

        Self {
            state,
            session,
            durable,
            catalog: None,
        }
    }

    /// A store that forgets everything when dropped.
    pub fn in_memory() -> Self {
        Self::hydrate(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    /// Register the catalog loader and load the current locale's catalog.
    pub fn with_catalog_loader(mut self, loader: Arc<dyn CatalogLoader>) -> Self {
        loader.load(self.state.borrow().locale);
        self.catalog = Some(loader);
        self
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> SessionStream {
        StateStream::new(self.state.subscribe())
    }

    // ── Cart ─────────────────────────────────────────────────────

    pub fn set_cart_count(&self, count: u32) {
        self.state.send_modify(|state| {
            state.cart_item_count = count;
            write(self.session.as_ref(), CART_COUNT_KEY, &count.to_string());
        });
    }

    /// Increase the cart count; returns the new count.
    pub fn add_to_cart(&self, amount: u32) -> u32 {
        self.update_cart(|count| count.saturating_add(amount))
    }

    /// Decrease the cart count, stopping at zero; returns the new count.
    pub fn remove_from_cart(&self, amount: u32) -> u32 {
        self.update_cart(|count| count.saturating_sub(amount))
    }

    fn update_cart(&self, f: impl FnOnce(u32) -> u32) -> u32 {
        let mut updated = 0;
        self.state.send_modify(|state| {
            state.cart_item_count = f(state.cart_item_count);
            updated = state.cart_item_count;
            write(self.session.as_ref(), CART_COUNT_KEY, &updated.to_string());
        });
        updated
    }

    // ── Identity ─────────────────────────────────────────────────

    /// Sign in as `user_id`, or sign out with `None`. Signing out also
    /// empties the cart.
    pub fn set_identity(&self, user_id: Option<EntityId>) {
        self.state.send_modify(|state| match user_id {
            Some(id) => {
                write(self.session.as_ref(), USER_ID_KEY, &id.to_string());
                info!(user = %id, "signed in");
                state.user_id = Some(id);
            }
            None => {
                remove(self.session.as_ref(), USER_ID_KEY);
                remove(self.session.as_ref(), CART_COUNT_KEY);
                info!("signed out");
                state.user_id = None;
                state.cart_item_count = 0;
            }
        });
    }

    /// End the session: clear the session-scoped store, keep preferences.
    pub fn end_session(&self) {
        self.state.send_modify(|state| {
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "failed to clear session storage");
            }
            state.user_id = None;
            state.cart_item_count = 0;
        });
        info!("session ended");
    }

    // ── Locale ───────────────────────────────────────────────────

    /// Switch language. The catalog loads before subscribers are told.
    pub fn set_locale(&self, locale: Locale) {
        if self.state.borrow().locale == locale {
            return;
        }
        write(self.durable.as_ref(), LOCALE_KEY, locale.code());
        if let Some(loader) = &self.catalog {
            loader.load(locale);
        }
        self.state.send_modify(|state| state.locale = locale);
        info!(%locale, "locale changed");
    }
}

fn read(store: &dyn KeyValueStore, key: &str) -> Option<String> {
    store.get(key).unwrap_or_else(|e| {
        warn!(key, error = %e, "failed to read session storage");
        None
    })
}

fn write(store: &dyn KeyValueStore, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        warn!(key, error = %e, "failed to persist session value");
    }
}

fn remove(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key) {
        warn!(key, error = %e, "failed to remove session value");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn hydrate_defaults_when_empty() {
        let store = SessionStore::in_memory();
        assert_eq!(store.snapshot(), SessionState::default());
        assert_eq!(store.snapshot().locale, Locale::English);
    }

    #[test]
    fn hydrate_ignores_garbage() {
        let session = Arc::new(MemoryStore::new());
        let durable = Arc::new(MemoryStore::new());
        session.set(CART_COUNT_KEY, "lots").unwrap();
        session.set(USER_ID_KEY, "  ").unwrap();
        durable.set(LOCALE_KEY, "klingon").unwrap();

        let store = SessionStore::hydrate(session, durable);
        assert_eq!(store.snapshot(), SessionState::default());
    }

    #[test]
    fn cart_arithmetic_saturates() {
        let store = SessionStore::in_memory();
        assert_eq!(store.add_to_cart(3), 3);
        assert_eq!(store.remove_from_cart(5), 0);
        store.set_cart_count(u32::MAX);
        assert_eq!(store.add_to_cart(1), u32::MAX);
    }
}
