// ── Resource controller ──
//
// One generic list + paginate + create + edit + delete state machine,
// bound to a `ResourceSpec`. State is published through a `watch`
// channel; side effects for the view (scroll lock, toasts) go out on a
// `broadcast` channel. Transport failures never escape: each becomes a
// state transition or an outcome value.
//
// Every state write goes through `publish` / `publish_if_current`, which
// check the unmount token and (for list responses) the fetch ticket
// inside the channel's write lock, so a late or superseded response can
// never overwrite newer state.

use std::marker::PhantomData;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Value, json};
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use shopdesk_api::{Method, PageEnvelope, PageRequest, Transport};

use super::spec::ResourceSpec;
use super::state::{
    ControllerEvent, ControllerState, DeleteOutcome, Notice, Phase, SubmitOutcome,
};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::dialog::{DialogMode, DialogState, NO_CHANGES_MESSAGE};
use crate::error::CoreError;
use crate::model::{EntityId, Page, Resource};
use crate::schema::FieldErrors;
use crate::stream::StateStream;

const EVENT_CHANNEL_SIZE: usize = 64;

// ── Builder ──────────────────────────────────────────────────────

pub struct ControllerBuilder<R> {
    spec: ResourceSpec,
    transport: Option<Arc<dyn Transport>>,
    page_size: NonZeroU32,
    _record: PhantomData<fn() -> R>,
}

impl<R: Resource> ControllerBuilder<R> {
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Records per page, fixed for the controller's lifetime.
    pub fn page_size(mut self, page_size: NonZeroU32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn build(self) -> Result<ResourceController<R>, CoreError> {
        let transport = self.transport.ok_or_else(|| CoreError::Config {
            message: format!("no transport configured for `{}`", self.spec.endpoint()),
        })?;
        let (state, _) = watch::channel(ControllerState::new(self.page_size));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);

        Ok(ResourceController {
            inner: Arc::new(ControllerInner {
                spec: self.spec,
                transport,
                page_size: self.page_size,
                state,
                events,
                generation: AtomicU64::new(0),
                cancel: CancellationToken::new(),
            }),
        })
    }
}

// ── Controller ───────────────────────────────────────────────────

/// List screen state machine for one resource.
///
/// Cheaply cloneable via `Arc<ControllerInner>`; clones share state.
#[derive(Clone)]
pub struct ResourceController<R: Resource> {
    inner: Arc<ControllerInner<R>>,
}

struct ControllerInner<R: Resource> {
    spec: ResourceSpec,
    transport: Arc<dyn Transport>,
    page_size: NonZeroU32,
    state: watch::Sender<ControllerState<R>>,
    events: broadcast::Sender<ControllerEvent>,
    /// Ticket of the latest list fetch; older responses are dropped.
    generation: AtomicU64,
    /// Cancelled on unmount.
    cancel: CancellationToken,
}

/// What `submit()` decided while holding the state lock.
enum SubmitStep {
    Closed,
    Busy,
    Invalid(FieldErrors),
    NoChanges,
    ReadOnly(String),
    Send { method: Method, body: Value },
}

impl<R: Resource> ResourceController<R> {
    pub fn builder(spec: ResourceSpec) -> ControllerBuilder<R> {
        ControllerBuilder {
            spec,
            transport: None,
            page_size: DEFAULT_PAGE_SIZE,
            _record: PhantomData,
        }
    }

    pub fn spec(&self) -> &ResourceSpec {
        &self.inner.spec
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.inner.page_size
    }

    /// Point-in-time copy of the published state.
    pub fn snapshot(&self) -> ControllerState<R> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> StateStream<ControllerState<R>> {
        StateStream::new(self.inner.state.subscribe())
    }

    /// Scroll-lock and toast events.
    pub fn events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.inner.events.subscribe()
    }

    pub fn is_mounted(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    // ── List lifecycle ───────────────────────────────────────────

    /// Load the first page.
    pub async fn mount(&self) {
        self.load(1).await;
    }

    /// Load a page, clamped against the last loaded total. Before any
    /// page has loaded the request goes out as is and the response's own
    /// total clamps it.
    pub async fn change_page(&self, requested: u32) {
        let target = {
            let state = self.inner.state.borrow();
            if state.loaded {
                state.page.clamp(requested)
            } else {
                requested.max(1)
            }
        };
        if target != requested {
            debug!(requested, target, "page request clamped");
        }
        self.load(target).await;
    }

    /// Reload the current page.
    pub async fn refresh(&self) {
        let current = self.inner.state.borrow().page.page_number();
        self.load(current).await;
    }

    /// Stop applying responses. Anything still in flight becomes a no-op.
    pub fn unmount(&self) {
        let mut dialog_was_open = false;
        self.publish(|state| {
            dialog_was_open = state.dialog.open;
            state.phase = Phase::Idle;
            state.loading = false;
            true
        });
        if dialog_was_open {
            self.emit(ControllerEvent::ScrollLock { locked: false });
        }
        self.inner.cancel.cancel();
        debug!(resource = %self.inner.spec.endpoint(), "controller unmounted");
    }

    async fn load(&self, page_number: u32) {
        if !self.is_mounted() {
            return;
        }
        let ticket = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish(|state| {
            state.loading = true;
            if !state.dialog.open {
                state.phase = Phase::Loading;
            }
            true
        });

        let resource = self.inner.spec.endpoint();
        debug!(%resource, page = page_number, ticket, "fetching page");

        let page = match self.fetch_page(page_number).await {
            Ok(page) => page,
            Err(e) => {
                warn!(%resource, page = page_number, error = %e, "list fetch failed, showing empty page");
                Page::empty(self.inner.page_size)
            }
        };

        let applied = self.publish_if_current(ticket, |state| {
            state.page = page;
            state.loaded = true;
            state.loading = false;
            state.phase = if state.dialog.open {
                Phase::DialogOpen
            } else {
                Phase::Loaded
            };
        });
        if !applied {
            debug!(%resource, ticket, "discarded stale page response");
        }
    }

    async fn fetch_page(&self, page_number: u32) -> Result<Page<R>, CoreError> {
        let page = self.fetch_page_once(page_number).await?;
        if page.page_number() == page_number {
            return Ok(page);
        }
        // Asked past the end before any total was known.
        debug!(requested = page_number, target = page.page_number(), "refetching clamped page");
        self.fetch_page_once(page.page_number()).await
    }

    async fn fetch_page_once(&self, page_number: u32) -> Result<Page<R>, CoreError> {
        let spec = &self.inner.spec;
        let body = serde_json::to_value(PageRequest {
            per_page: self.inner.page_size.get(),
            page: page_number,
        })?;
        let value = self
            .inner
            .transport
            .request(&spec.list_path(), Method::Post, Some(body))
            .await?;
        let envelope = PageEnvelope::from_value(value, spec.collection_key())?;
        let items = envelope
            .items
            .into_iter()
            .filter_map(|item| decode_item(spec.endpoint(), item))
            .collect();
        Ok(Page::new(
            items,
            envelope.total_count,
            self.inner.page_size,
            page_number,
        ))
    }

    /// Fetch one record by id. Does not touch controller state.
    pub async fn fetch_one(&self, id: &EntityId) -> Result<R, CoreError> {
        let spec = &self.inner.spec;
        let not_found = || CoreError::NotFound {
            entity_type: spec.label().to_owned(),
            identifier: id.to_string(),
        };

        let value = self
            .inner
            .transport
            .request(&spec.record_path(&id.to_string()), Method::Get, None)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    not_found()
                } else {
                    CoreError::from(e)
                }
            })?;

        match unwrap_record(value) {
            Value::Null => Err(not_found()),
            record => Ok(serde_json::from_value(record)?),
        }
    }

    // ── Dialog ───────────────────────────────────────────────────

    /// Open a blank create dialog.
    pub fn open_create(&self) -> bool {
        let schema = self.inner.spec.schema();
        let opened = self.publish(|state| {
            state.dialog = DialogState::for_create(schema);
            state.submit_success = false;
            state.phase = Phase::DialogOpen;
            true
        });
        if opened {
            self.emit(ControllerEvent::ScrollLock { locked: true });
        }
        opened
    }

    /// Fetch a record and open the edit dialog on it. If the fetch fails
    /// the dialog stays closed.
    pub async fn open_edit(&self, id: &EntityId) -> bool {
        let record = match self.fetch_one(id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(resource = %self.inner.spec.endpoint(), %id, error = %e, "could not load record for editing");
                return false;
            }
        };

        let schema = self.inner.spec.schema();
        let opened = self.publish(|state| {
            state.dialog = DialogState::for_edit(schema, record);
            state.submit_success = false;
            state.phase = Phase::DialogOpen;
            true
        });
        if opened {
            self.emit(ControllerEvent::ScrollLock { locked: true });
        }
        opened
    }

    pub fn set_field(&self, field: &str, value: impl Into<String>) {
        let validator = self.inner.spec.validator();
        let value = value.into();
        self.publish(|state| {
            if !state.dialog.open {
                return false;
            }
            state.dialog.set_field(validator, field, value);
            true
        });
    }

    pub fn blur_field(&self, field: &str) {
        let validator = self.inner.spec.validator();
        self.publish(|state| {
            if !state.dialog.open {
                return false;
            }
            state.dialog.blur_field(validator, field);
            true
        });
    }

    /// Close the dialog, discarding its values.
    pub fn cancel_dialog(&self) {
        let closed = self.publish(|state| {
            if !state.dialog.open {
                return false;
            }
            state.dialog = DialogState::closed();
            state.phase = if state.loading {
                Phase::Loading
            } else {
                Phase::Loaded
            };
            true
        });
        if closed {
            self.emit(ControllerEvent::ScrollLock { locked: false });
        }
    }

    /// Validate and send the open dialog.
    pub async fn submit(&self) -> SubmitOutcome {
        let spec = &self.inner.spec;

        let validating = self.publish(|state| {
            if !state.dialog.open || state.phase == Phase::Submitting {
                return false;
            }
            state.phase = Phase::Validating;
            true
        });
        if !validating {
            let busy = self.inner.state.borrow().phase == Phase::Submitting;
            return if busy && self.is_mounted() {
                SubmitOutcome::Rejected("A submission is already in progress".into())
            } else {
                SubmitOutcome::Closed
            };
        }

        let mut step = SubmitStep::Closed;
        self.publish(|state| {
            if state.phase != Phase::Validating {
                step = SubmitStep::Busy;
                return false;
            }
            let dialog = &mut state.dialog;
            dialog.submit_error = None;
            state.phase = Phase::DialogOpen;

            if !dialog.validate_all(spec.validator()) {
                step = SubmitStep::Invalid(dialog.errors.clone());
                return true;
            }
            if dialog.is_unchanged() {
                dialog.submit_error = Some(NO_CHANGES_MESSAGE.to_owned());
                step = SubmitStep::NoChanges;
                return true;
            }
            if !spec.is_writable() {
                let message = CoreError::ReadOnly {
                    resource: spec.label().to_owned(),
                }
                .to_string();
                dialog.submit_error = Some(message.clone());
                step = SubmitStep::ReadOnly(message);
                return true;
            }

            let mut body = spec.schema().payload(&dialog.values);
            let method = match &dialog.mode {
                DialogMode::Create => Method::Post,
                DialogMode::Edit(original) => {
                    body.insert("id".into(), Value::String(original.id().to_string()));
                    Method::Patch
                }
            };
            state.phase = Phase::Submitting;
            step = SubmitStep::Send {
                method,
                body: Value::Object(body),
            };
            true
        });

        match step {
            SubmitStep::Closed => SubmitOutcome::Closed,
            SubmitStep::Busy => SubmitOutcome::Rejected("A submission is already in progress".into()),
            SubmitStep::Invalid(errors) => {
                debug!(resource = %spec.endpoint(), fields = errors.len(), "submission failed validation");
                SubmitOutcome::Invalid(errors)
            }
            SubmitStep::NoChanges => SubmitOutcome::NoChanges,
            SubmitStep::ReadOnly(message) => SubmitOutcome::Rejected(message),
            SubmitStep::Send { method, body } => self.send_submission(method, body).await,
        }
    }

    async fn send_submission(&self, method: Method, body: Value) -> SubmitOutcome {
        let spec = &self.inner.spec;
        let result = self
            .inner
            .transport
            .request(spec.endpoint(), method, Some(body))
            .await;

        match result {
            Err(e) => {
                let message = e
                    .server_message()
                    .map_or_else(|| spec.messages().save_failed.clone(), str::to_owned);
                warn!(resource = %spec.endpoint(), %method, error = %e, "submission rejected");
                self.publish(|state| {
                    if state.phase != Phase::Submitting {
                        return false;
                    }
                    state.phase = Phase::DialogOpen;
                    state.dialog.submit_error = Some(message.clone());
                    true
                });
                SubmitOutcome::Rejected(message)
            }
            Ok(_) => {
                info!(resource = %spec.endpoint(), %method, "submission saved");
                let closed = self.publish(|state| {
                    state.submit_success = true;
                    state.dialog = DialogState::closed();
                    state.phase = Phase::Loading;
                    state.loading = true;
                    true
                });
                if closed {
                    let text = if method == Method::Patch {
                        &spec.messages().updated
                    } else {
                        &spec.messages().created
                    };
                    self.emit(ControllerEvent::ScrollLock { locked: false });
                    self.emit(ControllerEvent::Notice(Notice::Success(text.clone())));
                }
                self.refresh().await;
                SubmitOutcome::Saved
            }
        }
    }

    // ── Delete ───────────────────────────────────────────────────

    /// Delete a record (the caller has already confirmed), then refetch
    /// the current page whatever the outcome.
    pub async fn delete(&self, id: &EntityId) -> DeleteOutcome {
        let spec = &self.inner.spec;
        if !spec.is_writable() {
            return DeleteOutcome::Failed(
                CoreError::ReadOnly {
                    resource: spec.label().to_owned(),
                }
                .to_string(),
            );
        }
        if !self.is_mounted() {
            return DeleteOutcome::Failed(spec.messages().delete_failed.clone());
        }

        self.publish(|state| {
            state.loading = true;
            if !state.dialog.open {
                state.phase = Phase::Loading;
            }
            true
        });

        let result = self
            .inner
            .transport
            .request(
                spec.endpoint(),
                Method::Delete,
                Some(json!({ "id": id.to_string() })),
            )
            .await;

        let outcome = match result {
            Ok(_) => {
                info!(resource = %spec.endpoint(), %id, "record deleted");
                self.emit(ControllerEvent::Notice(Notice::Success(
                    spec.messages().deleted.clone(),
                )));
                DeleteOutcome::Succeeded
            }
            Err(e) => {
                warn!(resource = %spec.endpoint(), %id, error = %e, "delete failed");
                self.emit(ControllerEvent::Notice(Notice::Failure(
                    spec.messages().delete_failed.clone(),
                )));
                DeleteOutcome::Failed(
                    e.server_message()
                        .map_or_else(|| spec.messages().delete_failed.clone(), str::to_owned),
                )
            }
        };

        self.refresh().await;
        outcome
    }

    // ── Publishing ───────────────────────────────────────────────

    /// Apply a state change unless unmounted. The closure returns
    /// whether it modified anything.
    fn publish(&self, modify: impl FnOnce(&mut ControllerState<R>) -> bool) -> bool {
        let cancel = &self.inner.cancel;
        self.inner.state.send_if_modified(|state| {
            if cancel.is_cancelled() {
                return false;
            }
            modify(state)
        })
    }

    /// Apply a list response only if its ticket is still the latest.
    fn publish_if_current(
        &self,
        ticket: u64,
        modify: impl FnOnce(&mut ControllerState<R>),
    ) -> bool {
        let inner = &self.inner;
        inner.state.send_if_modified(|state| {
            if inner.cancel.is_cancelled() || inner.generation.load(Ordering::SeqCst) != ticket {
                return false;
            }
            modify(state);
            true
        })
    }

    fn emit(&self, event: ControllerEvent) {
        if self.is_mounted() {
            let _ = self.inner.events.send(event);
        }
    }
}

/// Decode one list row. A row that does not decode is logged and
/// skipped so the rest of the page still renders.
fn decode_item<R: Resource>(resource: &str, item: Value) -> Option<R> {
    let id = item.get("_id").and_then(Value::as_str).unwrap_or_default().to_owned();
    match serde_json::from_value(item) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(%resource, id = %id, error = %e, "skipping undecodable record");
            None
        }
    }
}

/// Single-record responses come bare, under `data`, or wrapped in one
/// named key (`{ "age": { "_id": .. } }`).
fn unwrap_record(value: Value) -> Value {
    match value {
        Value::Object(mut map) if !map.contains_key("_id") => {
            if let Some(data) = map.remove("data") {
                return unwrap_record(data);
            }
            let nested: Vec<String> = map
                .iter()
                .filter(|(_, v)| v.get("_id").is_some())
                .map(|(k, _)| k.clone())
                .collect();
            if let [key] = nested.as_slice() {
                if let Some(record) = map.remove(key) {
                    return record;
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}
