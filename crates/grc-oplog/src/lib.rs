//! Operation log for the GRC-20 edit publisher.
//!
//! This crate provides:
//! - [`OperationLog`], the single authoritative, ordered sequence of edit
//!   operations awaiting publication
//! - [`OperationDraft`], the caller-side form that is validated before an
//!   operation is appended
//! - [`GraphProjection`], a read-back view of entities and relations folded
//!   from a log snapshot

pub mod draft;
pub mod error;
pub mod log;
pub mod projection;

pub use draft::OperationDraft;
pub use error::{DraftError, DraftResult};
pub use log::OperationLog;
pub use projection::{EntityRecord, GraphProjection, RelationRecord};
