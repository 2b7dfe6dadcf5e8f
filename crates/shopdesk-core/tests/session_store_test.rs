#![allow(clippy::unwrap_used)]
// Integration tests for `SessionStore` hydration, persistence and notification.

use std::sync::{Arc, Mutex};

use futures_util::StreamExt;
use pretty_assertions::assert_eq;

use shopdesk_core::session::{CART_COUNT_KEY, LOCALE_KEY, USER_ID_KEY};
use shopdesk_core::{
    CatalogLoader, EntityId, FileStore, KeyValueStore, Locale, MemoryStore, SessionState,
    SessionStore,
};

fn stores() -> (Arc<MemoryStore>, Arc<MemoryStore>) {
    (Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
}

#[test]
fn test_hydrates_from_persisted_values() {
    let (session, durable) = stores();
    session.set(USER_ID_KEY, "65a0c2f1e4b0a1b2c3d4e5f6").unwrap();
    session.set(CART_COUNT_KEY, "4").unwrap();
    durable.set(LOCALE_KEY, "vie").unwrap();

    let store = SessionStore::hydrate(session, durable);

    assert_eq!(
        store.snapshot(),
        SessionState {
            cart_item_count: 4,
            user_id: Some(EntityId::from("65a0c2f1e4b0a1b2c3d4e5f6")),
            locale: Locale::Vietnamese,
        }
    );
}

#[test]
fn test_mutations_write_through() {
    let (session, durable) = stores();
    let store = SessionStore::hydrate(session.clone(), durable.clone());

    store.set_identity(Some(EntityId::from("u1")));
    store.set_cart_count(2);
    store.add_to_cart(3);
    store.set_locale(Locale::Vietnamese);

    assert_eq!(session.get(USER_ID_KEY).unwrap().as_deref(), Some("u1"));
    assert_eq!(session.get(CART_COUNT_KEY).unwrap().as_deref(), Some("5"));
    assert_eq!(durable.get(LOCALE_KEY).unwrap().as_deref(), Some("vie"));
    assert_eq!(session.get(LOCALE_KEY).unwrap(), None);
}

#[test]
fn test_sign_out_resets_cart_atomically() {
    let (session, durable) = stores();
    let store = SessionStore::hydrate(session.clone(), durable);
    store.set_identity(Some(EntityId::from("u1")));
    store.set_cart_count(7);

    store.set_identity(None);

    let snap = store.snapshot();
    assert_eq!(snap.cart_item_count, 0);
    assert_eq!(snap.user_id, None);
    assert_eq!(session.get(USER_ID_KEY).unwrap(), None);
    assert_eq!(session.get(CART_COUNT_KEY).unwrap(), None);
}

#[test]
fn test_end_session_keeps_preferences() {
    let (session, durable) = stores();
    let store = SessionStore::hydrate(session.clone(), durable.clone());
    store.set_identity(Some(EntityId::from("u1")));
    store.add_to_cart(2);
    store.set_locale(Locale::Vietnamese);

    store.end_session();

    assert!(session.is_empty());
    assert_eq!(durable.get(LOCALE_KEY).unwrap().as_deref(), Some("vie"));
    let snap = store.snapshot();
    assert_eq!(snap.user_id, None);
    assert_eq!(snap.cart_item_count, 0);
    assert_eq!(snap.locale, Locale::Vietnamese);
}

#[test]
fn test_catalog_loads_before_locale_is_published() {
    let seen = Arc::new(Mutex::new(Vec::new()));

    let loader: Arc<dyn CatalogLoader> = {
        let seen = Arc::clone(&seen);
        Arc::new(move |locale: Locale| seen.lock().unwrap().push(locale))
    };
    let store = SessionStore::in_memory().with_catalog_loader(loader);
    let subscription = store.subscribe();

    store.set_locale(Locale::Vietnamese);
    store.set_locale(Locale::Vietnamese);

    assert_eq!(*seen.lock().unwrap(), vec![Locale::English, Locale::Vietnamese]);
    assert_eq!(subscription.latest().locale, Locale::Vietnamese);
}

#[test]
fn test_locale_toggled_twice_restores_snapshot() {
    let (session, durable) = stores();
    let store = SessionStore::hydrate(session, durable.clone());
    store.set_identity(Some(EntityId::from("u1")));
    store.add_to_cart(2);
    let original = store.snapshot();

    store.set_locale(Locale::SECONDARY);
    assert_eq!(durable.get(LOCALE_KEY).unwrap().as_deref(), Some("vie"));
    store.set_locale(Locale::PRIMARY);

    assert_eq!(store.snapshot(), original);
    assert_eq!(durable.get(LOCALE_KEY).unwrap().as_deref(), Some("eng"));
}

#[tokio::test]
async fn test_subscribers_see_latest_value() {
    let store = SessionStore::in_memory();
    let mut subscription = store.subscribe();
    assert_eq!(subscription.current().cart_item_count, 0);

    store.set_cart_count(1);
    store.set_cart_count(2);
    store.set_cart_count(3);

    let next = subscription.changed().await.unwrap();
    assert_eq!(next.cart_item_count, 3);
}

#[tokio::test]
async fn test_every_subscriber_observes_locale_change() {
    let store = SessionStore::in_memory();
    let mut header = store.subscribe().into_stream();
    let mut footer = store.subscribe().into_stream();
    assert_eq!(header.next().await.unwrap().locale, Locale::English);
    assert_eq!(footer.next().await.unwrap().locale, Locale::English);

    store.set_locale(Locale::SECONDARY);

    assert_eq!(header.next().await.unwrap().locale, Locale::Vietnamese);
    assert_eq!(footer.next().await.unwrap().locale, Locale::Vietnamese);
}

#[test]
fn test_file_backed_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let open = || {
        SessionStore::hydrate(
            Arc::new(FileStore::open(dir.path().join("session.json")).unwrap()),
            Arc::new(FileStore::open(dir.path().join("preferences.json")).unwrap()),
        )
    };

    let store = open();
    store.set_identity(Some(EntityId::from("u9")));
    store.add_to_cart(2);
    store.set_locale(Locale::Vietnamese);
    drop(store);

    let restored = open();
    assert_eq!(restored.snapshot().cart_item_count, 2);
    assert_eq!(restored.snapshot().user_id, Some(EntityId::from("u9")));
    assert_eq!(restored.snapshot().locale, Locale::Vietnamese);

    restored.end_session();
    let after_logout = open();
    assert_eq!(after_logout.snapshot().user_id, None);
    assert_eq!(after_logout.snapshot().locale, Locale::Vietnamese);
}
