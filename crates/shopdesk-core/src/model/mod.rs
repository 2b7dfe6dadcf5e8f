// ── Domain model ──
//
// Record identity, the `Resource` abstraction the controller is generic
// over, the typed backend entities, and loaded pages.

pub mod account;
pub mod catalog;
pub mod entity_id;
pub mod page;
pub mod product;
pub mod record;

pub use account::{Role, User};
pub use catalog::{AgeCategory, BranchCategory, SkillCategory};
pub use entity_id::EntityId;
pub use page::{Page, clamp_page, total_pages};
pub use product::{CartLine, CategoryRef, Product};
pub use record::{Record, Resource};
