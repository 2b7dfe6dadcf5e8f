// ── Resource controllers ──
//
// Spec (what differs per entity), state (what the view renders) and the
// generic controller driving list, paginate, create, edit and delete.

mod controller;
mod spec;
mod state;

pub use controller::{ControllerBuilder, ResourceController};
pub use spec::{Messages, ResourceSpec, ResourceSpecBuilder};
pub use state::{ControllerEvent, ControllerState, DeleteOutcome, Notice, Phase, SubmitOutcome};
