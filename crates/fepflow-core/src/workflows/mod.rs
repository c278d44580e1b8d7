//! # Workflows Module
//!
//! High-level entry points that combine the engine's pieces into complete operations.
//!
//! - **Pipeline Workflow** ([`run`]) - Resumable driver that computes the atom core and
//!   every free-energy leg of each edge, persisting after each step.
//! - **Aggregation Workflow** ([`aggregate`]) - Collects finished edges from any number of
//!   result documents into a ranked binding report.

pub mod aggregate;
pub mod run;
