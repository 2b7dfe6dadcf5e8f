//! Async HTTP transport for the shopdesk REST backend.
//!
//! The core never talks to `reqwest` directly. It consumes the object-safe
//! [`Transport`] trait, which this crate implements over HTTP with
//! [`HttpTransport`]. Paginated list responses are normalised by
//! [`PageEnvelope`] so every resource screen reads the same shape.

pub mod error;
pub mod transport;
pub mod wire;

pub use error::Error;
pub use transport::{HttpTransport, Method, Transport, TransportConfig};
pub use wire::{PageEnvelope, PageRequest};
