//! harvest-core: Records, key tables, and the reconciliation engine.
//!
//! This crate holds everything that decides *what* should change in the
//! semantic graph, without ever talking to it:
//! - Statements, vocabulary prefixes, and entity records
//! - Key tables mapping attributes to predicates and update strategies
//! - The reconciliation engine producing additions/retractions
//! - The run-scoped concept cache and the entity factory
//! - Authorship ordering by declared rank
//! - Configuration loading and the common error taxonomy

pub mod authorship;
pub mod concept;
pub mod config;
pub mod error;
pub mod factory;
pub mod keytable;
pub mod reconcile;
pub mod record;
pub mod snapshot;
pub mod statement;
pub mod vocab;

pub use error::HarvestError;
pub use keytable::{AttributeSpec, KeyTable, UpdateStrategy};
pub use reconcile::{reconcile, TripleDelta};
pub use record::{AttrValue, EntityRecord};
pub use statement::{Object, PredicateObject, Statement};

pub type Result<T> = std::result::Result<T, HarvestError>;
