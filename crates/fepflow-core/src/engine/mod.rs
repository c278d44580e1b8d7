//! # Engine Module
//!
//! The machinery a pipeline run is built from: run configuration, the persistent result
//! store, the contracts for external computations and their subprocess implementations,
//! and progress reporting.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Simulation scales and the validated run configuration
//! - **Result Store** ([`store`]) - Exclusive, durably persisted ownership of one result document
//! - **Collaborators** ([`collaborators`]) - Atom mapping, leg execution and forcefield loading contracts
//! - **Subprocess Collaborators** ([`external`]) - JSON-over-stdio implementations of those contracts
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events for front ends
//! - **Error Handling** ([`error`]) - The engine-wide error type
//!
//! The workflows in [`crate::workflows`] combine these into the resumable driver and
//! the aggregator.

pub mod collaborators;
pub mod config;
pub mod context;
pub mod error;
pub mod external;
pub mod progress;
pub mod store;
