use thiserror::Error;

use super::collaborators::CollaboratorError;
use super::config::ConfigError;
use crate::core::io::FileError;
use crate::core::models::edge::Edge;
use crate::core::validation::ValidationError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(
        "Stored parameters in '{path}' do not match this run: {field} is {stored} on disk but {requested} was requested"
    )]
    ConfigConsistency {
        path: String,
        field: &'static str,
        stored: String,
        requested: String,
    },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Compound '{name}' referenced by the edge list was not found")]
    Lookup { name: String },

    #[error("{stage} failed for edge {edge}: {source}")]
    ExternalComputation {
        stage: String,
        edge: Edge,
        #[source]
        source: CollaboratorError,
    },

    #[error("Data integrity violation: {0}")]
    DataIntegrity(String),

    #[error("Result store '{path}' is already in use by another process")]
    StoreLocked { path: String },

    #[error(transparent)]
    File(#[from] FileError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
