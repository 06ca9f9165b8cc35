//! Blockflow Code Generation
//!
//! This crate lowers block programs into C, C++, Python or Java source.
//!
//! # Pipeline Overview
//!
//! ```text
//! ┌─────────┐     ┌─────────┐     ┌──────────┐     ┌─────────┐
//! │ Program │────▶│  Graph  │────▶│ Semantic │────▶│ Source  │
//! │ Source  │     │(Validate│     │  Checks  │     │  (Gen)  │
//! └─────────┘     └─────────┘     └──────────┘     └─────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use blockflow_codegen::{CompileOptions, Compiler};
//!
//! let compiler = Compiler::new(CompileOptions::default());
//! let report = compiler.compile(&ProgramSource::load("programs/hello.json")?);
//! println!("{}", report.code.unwrap_or_default());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod compiler;
pub mod error;
pub mod generator;
pub mod ir;
pub mod templates;

pub use compiler::{CompileOptions, CompileReport, Compiler, Stage};
pub use error::{Error, Result};
pub use generator::{CodeGenerator, GenerateOptions};
pub use ir::ProgramIr;
pub use templates::{placeholders, render_template};
