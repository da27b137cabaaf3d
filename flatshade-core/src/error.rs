//! Error types for mesh parsing and settings

use thiserror::Error;

/// Errors raised while reading Wavefront mesh text
#[derive(Error, Debug)]
pub enum ParseError {
    /// A face references a vertex that has not been declared (yet)
    #[error("line {line}: vertex index {index} out of range (mesh has {vertex_count} vertices)")]
    IndexOutOfRange {
        line: usize,
        index: i64,
        vertex_count: usize,
    },

    /// A face group does not start with a vertex index
    #[error("line {line}: invalid vertex reference '{token}'")]
    InvalidIndex { line: usize, token: String },

    /// A face lists fewer than three vertices
    #[error("line {line}: face has {count} vertices, at least 3 required")]
    TooFewVertices { line: usize, count: usize },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
