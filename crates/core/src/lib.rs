//! pathtypes core - OpenAPI to TypeScript type compiler
//!
//! This crate turns a parsed OpenAPI 3 document into TypeScript declarations
//! laid out along the API's URL hierarchy: one shared `@types` module holding
//! every component, and one `Methods` module per path. It performs no I/O;
//! callers decode the document and write the returned text themselves.

#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

mod error;
mod openapi;

pub use error::{CompileError, Result};
pub use openapi::{
    CompileOptions, Compilation, DEFAULT_TYPES_NAMESPACE, Document, PathFile, Registry,
    TYPES_DIR, codegen_output, compile, normalize_document,
};
