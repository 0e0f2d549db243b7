//! Code generation from API IR to module structures.
//!
//! This module decides what each output file contains: which imports it needs
//! and which entries it declares. Import decisions are structural queries on
//! the type tree. The resulting modules are turned into text via `Emit`.

use super::api::{ApiIR, NamedType, PathIR};
use super::types::Prop;

/// Node stream type accepted next to `File` for uploads.
const READ_STREAM: &str = "ReadStream";
/// Directory holding the shared types module, relative to the output root.
pub const TYPES_DIR: &str = "@types";

/// `import { a, b } from 'module'`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsImport {
    pub items: Vec<String>,
    pub from: String,
    pub type_only: bool,
}

/// The shared `@types` module.
#[derive(Debug, Clone, PartialEq)]
pub struct TypesModule {
    pub imports: Vec<TsImport>,
    pub namespace: String,
    pub types: Vec<NamedType>,
}

/// One path's `Methods` module.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodsModule {
    pub imports: Vec<TsImport>,
    /// One prop per retained method
    pub methods: Vec<Prop>,
}

/// Generate the shared types module. `None` when the registry is empty.
pub fn codegen_types_module(api: &ApiIR) -> Option<TypesModule> {
    if api.types.is_empty() {
        return None;
    }

    let mut imports = Vec::new();
    if api.types.iter().any(|t| t.value.uses_upload()) {
        imports.push(read_stream_import());
    }

    Some(TypesModule {
        imports,
        namespace: api.namespace.clone(),
        types: api.types.clone(),
    })
}

/// Generate the `Methods` module for one path.
pub fn codegen_methods_module(api: &ApiIR, path: &PathIR) -> MethodsModule {
    let methods: Vec<Prop> = path.operations.iter().map(|op| op.to_prop()).collect();

    let mut imports = Vec::new();
    if methods.iter().any(Prop::uses_upload) {
        imports.push(read_stream_import());
    }
    if methods.iter().any(Prop::uses_references) {
        imports.push(TsImport {
            items: vec![api.namespace.clone()],
            from: types_module_path(path.depth()),
            type_only: false,
        });
    }

    MethodsModule { imports, methods }
}

/// Relative specifier of the types module from a file `depth` directories
/// below the output root.
fn types_module_path(depth: usize) -> String {
    if depth == 0 {
        format!("./{TYPES_DIR}")
    } else {
        format!("{}{TYPES_DIR}", "../".repeat(depth))
    }
}

fn read_stream_import() -> TsImport {
    TsImport {
        items: vec![READ_STREAM.to_string()],
        from: "fs".to_string(),
        type_only: true,
    }
}
