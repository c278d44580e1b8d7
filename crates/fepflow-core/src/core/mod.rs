//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Data Models** ([`models`]) - Compounds, atom cores, legs, edge records and the
//!   persisted result document
//! - **File I/O** ([`io`]) - Edge lists, compound tables and atomic JSON persistence
//! - **Graph Utilities** ([`topology`]) - Star-map generation and edge partitioning
//! - **Validation** ([`validation`]) - The shared error type for malformed inputs

pub mod io;
pub mod models;
pub mod topology;
pub mod validation;
