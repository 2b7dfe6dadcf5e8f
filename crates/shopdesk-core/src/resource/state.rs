// ── Controller state and outcomes ──

use std::num::NonZeroU32;

use strum::Display;

use crate::dialog::DialogState;
use crate::model::Page;
use crate::schema::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    DialogOpen,
    Validating,
    Submitting,
}

/// Everything a list screen renders.
#[derive(Debug, Clone)]
pub struct ControllerState<R> {
    pub phase: Phase,
    pub page: Page<R>,
    /// A list fetch is in flight.
    pub loading: bool,
    /// At least one list response has been applied to `page`.
    pub loaded: bool,
    pub dialog: DialogState<R>,
    /// The last submission was accepted.
    pub submit_success: bool,
}

impl<R> ControllerState<R> {
    pub(crate) fn new(page_size: NonZeroU32) -> Self {
        Self {
            phase: Phase::Idle,
            page: Page::empty(page_size),
            loading: true,
            loaded: false,
            dialog: DialogState::default(),
            submit_success: false,
        }
    }
}

/// Result of `submit()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted by the backend; the dialog closed and the page is refetched.
    Saved,
    /// Field validation failed; nothing was sent.
    Invalid(FieldErrors),
    /// The backend (or a read-only resource) refused; the message is the banner.
    Rejected(String),
    /// An edit that changes nothing; nothing was sent.
    NoChanges,
    /// No dialog was open.
    Closed,
}

/// Result of `delete()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Succeeded,
    Failed(String),
}

/// Toast-style feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

/// Side effects the view layer applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Lock page scrolling while a dialog is open.
    ScrollLock { locked: bool },
    Notice(Notice),
}
