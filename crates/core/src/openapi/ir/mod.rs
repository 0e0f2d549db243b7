//! Intermediate Representation for OpenAPI to TypeScript declaration generation.
//!
//! This module defines a three-layer architecture:
//! 1. Type tree and API-level IR: values, props, operations, paths
//! 2. Module structures: what each output file declares and imports
//! 3. Emission: module structures to code strings via the `Emit` trait
//!
//! The separation allows:
//! - All OpenAPI corner cases resolved in normalization
//! - Import decisions made from the tree, never from rendered text
//! - Emission is purely mechanical string building
//!
//! ## Module Structure
//!
//! - `types`: type tree (PropValue, Prop, TypeRef)
//! - `api`: API-level IR (NamedType, OperationIR, PathIR, ApiIR)
//! - `resolve`: `$ref` lookup across the component registries
//! - `normalize`: schemas and components -> type tree
//! - `operations`: path items -> OperationIR / PathIR
//! - `codegen`: API IR -> module structures
//! - `emit`: module structures -> code strings (via Emit trait)
//! - `utils`: identifier sanitization shared across modules

mod api;
mod codegen;
mod emit;
mod normalize;
mod operations;
mod resolve;
mod types;
pub mod utils;

// Re-export the main entry points
pub use api::ApiIR;
pub use codegen::{TYPES_DIR, codegen_methods_module, codegen_types_module};
pub use emit::Emit;
pub use normalize::normalize_document;
