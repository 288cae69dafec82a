//! harvest-studies: human-subject study harvester.
//!
//! Reads study records, reconciles each against the study already in the
//! graph (matched by IRB number), and produces additions/retractions
//! documents plus a run ledger. The delta can optionally be applied to the
//! graph store directly.

pub mod config;
pub mod error;
pub mod ledger;
pub mod output;
pub mod pipeline;
pub mod rdf;
pub mod snapshot;
pub mod source;
pub mod study;
