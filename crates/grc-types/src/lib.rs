//! Foundation types for the GRC-20 edit publisher.
//!
//! This crate provides the identifier, operation, and configuration types
//! shared by every other crate in the workspace.
//!
//! # Key Types
//!
//! - [`EntityId`], [`AttributeId`], [`RelationTypeId`], [`RelationId`]: opaque
//!   Base58 identifiers produced by [`id::generate`]
//! - [`Operation`]: one user-authored edit intent with id and timestamp
//! - [`OperationPayload`]: the four edit shapes (add/remove triple, add/remove relation)
//! - [`Value`]: a typed triple value (`TEXT`, `NUMBER`, `CHECKBOX`, ...)
//! - [`CallData`]: destination address and encoded payload of a transaction
//! - [`Network`]: `TESTNET` or `MAINNET`
//! - [`AppConfig`]: file + environment configuration

pub mod call_data;
pub mod config;
pub mod error;
pub mod id;
pub mod network;
pub mod operation;
pub mod value;

pub use call_data::CallData;
pub use config::{ApiConfig, AppConfig, ServerSection, VerifierConfig, WalletConfig};
pub use error::{ConfigError, TypeError};
pub use id::{AttributeId, EntityId, OperationId, RelationId, RelationTypeId};
pub use network::Network;
pub use operation::{
    AddRelation, AddTriple, Operation, OperationKind, OperationPayload, RemoveRelation,
    RemoveTriple,
};
pub use value::{Value, ValueType};
