//! # Core Models Module
//!
//! Data structures describing a free-energy campaign and its persisted results.
//!
//! ## Key Components
//!
//! - [`compound`] - Named compounds and the name-indexed `CompoundSet`
//! - [`atom_core`] - Validated atom correspondences between two compounds
//! - [`leg`] - The three computational legs and their summarized results
//! - [`edge`] - Edge keys and the per-edge result record
//! - [`params`] - Global run parameters that are frozen into every document
//! - [`document`] - The ordered, key-indexed result document
//!
//! ## Usage
//!
//! ```ignore
//! use fepflow::core::models::{document::ResultDocument, edge::{Edge, EdgeRecord}};
//!
//! let mut document = ResultDocument::new(params);
//! let mut record = EdgeRecord::new(&Edge::new("hub", "ligand-7"));
//! record.core = Some(core);
//! document.upsert(record);
//! ```

pub mod atom_core;
pub mod compound;
pub mod document;
pub mod edge;
pub mod leg;
pub mod params;
