//! Publishing pipeline for the GRC-20 edit publisher.
//!
//! A [`PublishingPipeline`] takes a snapshot of the operation log through
//! three externally-serviced steps: upload to a content-addressed store,
//! call-data request, and transaction submission. Each step is triggered
//! explicitly, failures are recoverable, and the pipeline never advances past
//! a failed step.
//!
//! # Quick Start
//!
//! ```rust
//! use grc_pipeline::fakes;
//! use grc_pipeline::{PipelineStep, PublishingPipeline, PublishingState};
//! use grc_types::{AddTriple, Operation, Value};
//!
//! # tokio_test_block(async {
//! let state = PublishingState::new("space-1").with_operation_name("add alice");
//! let mut pipeline = PublishingPipeline::new(state, fakes::dry_run(fakes::ZERO_ADDRESS));
//! let ops = vec![Operation::new(AddTriple {
//!     entity_id: "E1".into(),
//!     attribute_id: "A1".into(),
//!     value: Value::text("Alice"),
//! })];
//! let hash = pipeline.publish_all(&ops).await.unwrap();
//! assert_eq!(pipeline.step(), PipelineStep::Sendable);
//! assert!(hash.starts_with("0x"));
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

pub mod error;
pub mod fakes;
pub mod pipeline;
pub mod service;
pub mod state;

pub use error::{PipelineError, PipelineResult, ServiceError, ServiceResult};
pub use pipeline::{PipelineServices, PublishingPipeline};
pub use service::{CallDataService, EditBatch, PublishService, TransactionSigner};
pub use state::{PipelineStep, PublishingState};
