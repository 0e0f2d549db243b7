//! TypeScript declaration emitter for OpenAPI documents.
//!
//! This module is a thin wrapper around the IR-based code generation.
//! The pipeline is:
//! 1. Normalize: Document -> ApiIR (all OpenAPI logic resolved)
//! 2. Codegen: ApiIR -> TypesModule / MethodsModule
//! 3. Emit: modules -> String (via Emit trait)

use tracing::debug;

use crate::error::Result;
use crate::openapi::ir::{
    ApiIR, Emit, codegen_methods_module, codegen_types_module, normalize_document,
};
use crate::openapi::spec::Document;

/// Default namespace of the shared types module.
pub const DEFAULT_TYPES_NAMESPACE: &str = "Types";

/// Options for one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Map `format: date-time` strings to `Date` instead of `string`.
    pub keep_date_object: bool,
    /// Namespace every named type is declared in and referenced through.
    pub types_namespace: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            keep_date_object: false,
            types_namespace: DEFAULT_TYPES_NAMESPACE.to_string(),
        }
    }
}

/// Rendered `Methods` module of one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFile {
    /// Directory segments, the last one being the file stem (`index`).
    pub segments: Vec<String>,
    /// Text of the `Methods` module.
    pub methods: String,
}

/// Everything produced from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compilation {
    /// URL of the first declared server, or empty
    pub base_url: String,
    /// Shared types module, absent when no component has a representation
    pub types: Option<String>,
    /// One file per path with at least one operation, in document order
    pub files: Vec<PathFile>,
}

/// Compile a parsed document into rendered modules.
pub fn compile(document: &Document, options: &CompileOptions) -> Result<Compilation> {
    let api = normalize_document(document, &options.types_namespace, options.keep_date_object)?;
    Ok(codegen_output(&api))
}

/// Render an already normalized document.
pub fn codegen_output(api: &ApiIR) -> Compilation {
    let types = codegen_types_module(api).map(|module| module.emit());

    let files: Vec<PathFile> = api
        .paths
        .iter()
        .map(|path| PathFile {
            segments: path.segments.clone(),
            methods: codegen_methods_module(api, path).emit(),
        })
        .collect();

    debug!(
        files = files.len(),
        has_types = types.is_some(),
        "Rendered modules"
    );

    Compilation {
        base_url: api.base_url.clone(),
        types,
        files,
    }
}
