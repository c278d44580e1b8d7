//! # Topology Module
//!
//! Builds the perturbation graph that the pipeline walks and splits it for parallel
//! drivers.
//!
//! ## Overview
//!
//! - [`star`] - Star-map generation: one edge from a hub compound to every other compound
//! - [`partition`] - Deterministic splitting of an edge list into contiguous parts
//!
//! Both operate purely on names and edges; neither touches the filesystem.
//!
//! ```ignore
//! use fepflow::core::topology::{partition::partition, star::star_map};
//!
//! let edges = star_map(compounds.names(), "hub")?;
//! let parts = partition(&edges, 4)?;
//! ```

pub mod partition;
pub mod star;
