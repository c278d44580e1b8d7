//! # fepflow Core Library
//!
//! A resumable, idempotent result-store pipeline for relative binding free-energy
//! campaigns laid out as a star map: one hub compound compared against many others,
//! each comparison (edge) requiring a vacuum, a solvent and a complex leg.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Compound`, `EdgeRecord`,
//!   `ResultDocument`), file I/O for edge lists, compound tables and result documents,
//!   plus the pure graph utilities (star-map generation and edge partitioning).
//!
//! - **[`engine`]: The Logic Core.** Run configuration, error types, the exclusively
//!   owned and atomically persisted `ResultStore`, and the contracts through which the
//!   external atom-mapping and leg-running collaborators are driven.
//!
//! - **[`workflows`]: The Public API.** The resumable pipeline driver that fills in
//!   missing (edge, leg) results, and the aggregator that ranks finished edges into a
//!   report.

pub mod core;
pub mod engine;
pub mod workflows;
