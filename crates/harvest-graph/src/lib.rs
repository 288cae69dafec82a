//! Harvest Graph: graph store access for harvested triples.
//!
//! All graph reads and writes made by the harvester flow through the
//! [`GraphStore`] trait. Two implementations ship here: [`GraphClient`],
//! backed by Neo4j, and [`MemoryGraph`], an in-process store used for tests
//! and dry runs.

pub mod client;
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use memory::MemoryGraph;
pub use store::GraphStore;
