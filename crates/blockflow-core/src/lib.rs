//! Blockflow Core Library
//!
//! This crate provides the program model for Blockflow:
//! - Project configuration and program file loading
//! - Typed block nodes and the node factory
//! - The program graph and its structural checks
//! - Declaration tracking (semantic checks)
//! - Static target-language tables and the editor palette
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Program    │────▶│    Node     │────▶│   Program   │
//! │ (JSON/YAML) │     │   Factory   │     │    Graph    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Code generation lives in `blockflow-codegen`.
//!
//! # Example
//!
//! ```rust,ignore
//! use blockflow_core::{ProgramSource, SemanticChecker};
//!
//! let program = ProgramSource::load("programs/hello.json")?;
//! let build = program.build_graph();
//! let errors = SemanticChecker::check(&build.graph);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod factory;
pub mod graph;
pub mod language;
pub mod node;
pub mod palette;
pub mod program;
pub mod semantic;

pub use config::{Config, ProgramFile, ProjectConfig};
pub use error::{Error, GraphError, Result};
pub use factory::NodeFactory;
pub use graph::{ProgramGraph, SerializedGraph, SerializedNode};
pub use language::{Language, LanguageConfig, available_languages};
pub use node::{BlockKind, DataType, EdgeKind, Node, NodeId, NodeKind, Position, PropertyBag, PropertyValue};
pub use palette::{BlockSpec, palette};
pub use program::{
    BlockDescriptor, ConnectionDescriptor, GraphBuild, ProgramSource, ValidationReport,
    validate_program,
};
pub use semantic::SemanticChecker;
