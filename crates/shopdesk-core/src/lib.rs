//! Client core for the shopdesk storefront and admin backend.
//!
//! [`ResourceController`] is the one list + paginate + create + edit +
//! delete state machine behind every list screen; [`SessionStore`] holds
//! cart count, identity and locale across screens. Both publish their
//! state through `watch` channels ([`StateStream`]).

pub mod cart;
pub mod config;
pub mod dialog;
pub mod error;
pub mod model;
pub mod resource;
pub mod schema;
pub mod session;
pub mod stream;

pub use cart::{Cart, CartOutcome};
pub use config::{ClientConfig, DEFAULT_PAGE_SIZE, page_size_from};
pub use dialog::{DialogMode, DialogState, NO_CHANGES_MESSAGE};
pub use error::CoreError;
pub use model::{
    AgeCategory, BranchCategory, CartLine, EntityId, Page, Product, Record, Resource, Role,
    SkillCategory, User,
};
pub use resource::{
    ControllerEvent, ControllerState, DeleteOutcome, Notice, Phase, ResourceController,
    ResourceSpec, SubmitOutcome,
};
pub use schema::{FieldErrors, FieldSpec, FormValues, Rule, Schema, Validator};
pub use session::{
    CatalogLoader, FileStore, KeyValueStore, Locale, MemoryStore, SessionState, SessionStore,
    SessionStream,
};
pub use stream::{StateStream, StateWatchStream};

pub use shopdesk_api::{Method, Transport};
