use crate::graph::NodeId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by editing operations on an `EditorSession`.
///
/// Deleting or disconnecting an id that does not exist is never an error;
/// those calls are idempotent no-ops.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Node type '{0}' is not registered in the catalog")]
    UnknownType(String),

    #[error("Node '{0}' not found")]
    NodeNotFound(NodeId),

    #[error(
        "Connection from '{from}' ({from_port}) to '{to}' ({to_port}) was rejected: {reason}"
    )]
    ConnectionRejected {
        from: NodeId,
        to: NodeId,
        from_port: String,
        to_port: String,
        reason: String,
    },

    #[error("No node is selected for editing")]
    NoTarget,

    #[error("Field '{field}' is not editable on node type '{kind}'")]
    UnknownField { kind: String, field: String },

    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput { field: String, message: String },

    #[error("Document rejected: {0}")]
    InvalidDocument(String),

    #[error("No '{0}' ids are left to allocate")]
    IdsExhausted(&'static str),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Errors raised while saving or loading a `FlowDocument`.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse flow document JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur when converting a template or a custom format into a `FlowDocument`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Template node '{node}' uses unknown type '{kind}'")]
    UnknownType { node: String, kind: String },

    #[error("Template link references missing node '{0}'")]
    DanglingLink(String),

    #[error("Template node id '{0}' is used more than once")]
    DuplicateNode(String),

    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}

/// Errors raised while loading an `EditorConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
