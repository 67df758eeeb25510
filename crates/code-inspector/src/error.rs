use thiserror::Error;

/// Result type for inspector operations
pub type Result<T> = std::result::Result<T, InspectorError>;

/// Errors raised while preparing the inspection machinery.
///
/// Inspection itself is total: a paste that fails to parse is a negative
/// classification, never an error.
#[derive(Error, Debug)]
pub enum InspectorError {
    /// Tree-sitter refused the grammar (ABI mismatch)
    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    /// The parser produced no tree (cancelled or timed out)
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl InspectorError {
    /// Create a tree-sitter error
    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitterError(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
