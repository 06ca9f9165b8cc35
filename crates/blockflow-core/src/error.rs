//! Error types for blockflow-core

use thiserror::Error;

use crate::node::NodeId;

/// Result type alias for blockflow-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in blockflow-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be found
    #[error("configuration file not found: {path}")]
    ConfigNotFound {
        /// Path that was searched
        path: String,
    },

    /// Failed to parse YAML configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid configuration: {message}")]
    ConfigInvalid {
        /// Description of what's invalid
        message: String,
    },

    /// Failed to parse a JSON program file
    #[error("failed to parse program: {0}")]
    ProgramParse(#[from] serde_json::Error),

    /// Target language identifier is not one of the supported languages
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejections raised while inserting nodes into a [`ProgramGraph`](crate::graph::ProgramGraph)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// A node with the same identifier is already in the graph
    #[error("node '{0}' is already part of the program")]
    DuplicateNode(NodeId),

    /// The graph already has a Start node
    #[error("Program can only have one Start block (already have '{existing}', rejected '{rejected}')")]
    DuplicateStart {
        /// The Start node that stays authoritative
        existing: NodeId,
        /// The Start node that was refused
        rejected: NodeId,
    },

    /// The graph already has an End node
    #[error("Program can only have one End block (already have '{existing}', rejected '{rejected}')")]
    DuplicateEnd {
        /// The End node that stays authoritative
        existing: NodeId,
        /// The End node that was refused
        rejected: NodeId,
    },
}
