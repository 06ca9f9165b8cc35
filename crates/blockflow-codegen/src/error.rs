//! Error types for code generation

use blockflow_core::Language;
use thiserror::Error;

/// Result type for codegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during code generation
///
/// Diagnostics about the program itself (missing properties, undeclared
/// variables) are reported on [`CompileReport`](crate::CompileReport), not here.
#[derive(Error, Debug)]
pub enum Error {
    /// The language table has no template for the slot
    #[error("no '{slot}' template for {language}")]
    UnknownTemplate {
        /// Target language
        language: Language,
        /// Requested slot
        slot: String,
    },

    /// Invalid Jinja template
    #[error("invalid template: {0}")]
    InvalidTemplate(#[from] minijinja::Error),
}
