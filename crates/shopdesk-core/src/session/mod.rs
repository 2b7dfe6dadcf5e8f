// ── Session ──
//
// Cross-screen client state (cart count, identity, locale) and the
// storage it persists to.

mod locale;
mod storage;
mod store;

pub use locale::{CatalogLoader, Locale};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{
    CART_COUNT_KEY, LOCALE_KEY, SessionState, SessionStore, SessionStream,
    USER_ID_KEY,
};
