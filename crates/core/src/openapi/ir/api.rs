//! API-level IR for compiled documents.
//!
//! This module defines the intermediate representation the collector produces:
//! - NamedType: one entry of the shared types namespace
//! - OperationIR: the assembled props of one (path, method) pair
//! - PathIR: one URL template, its directory segments, and its operations
//! - ApiIR: everything above for a whole document

use super::types::{Prop, PropName, PropValue};
use crate::openapi::spec::{HttpMethod, Registry};

/// Leaf marker terminating every segment list.
pub const LEAF_SEGMENT: &str = "index";

/// One entry of the shared namespace (`export type Name = ...`).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    /// Sanitized type name
    pub name: String,
    /// Registry the entry came from
    pub registry: Registry,
    /// Raw component key
    pub key: String,
    pub description: Option<String>,
    pub value: PropValue,
}

/// Assembled operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationIR {
    pub method: HttpMethod,
    pub description: Option<String>,
    /// Ordered entries among reqHeaders, query, status, resBody, resHeaders, reqFormat, reqBody
    pub props: Vec<Prop>,
}

impl OperationIR {
    /// The `method: { ... }` entry of a Methods block.
    pub fn to_prop(&self) -> Prop {
        Prop::field(
            self.method.as_str(),
            true,
            self.description.clone(),
            PropValue::object(self.props.clone()),
        )
    }

    /// Look up an assembled entry by name (`status`, `resBody`, ...).
    pub fn prop(&self, name: &str) -> Option<&Prop> {
        self.props
            .iter()
            .find(|p| matches!(&p.name, PropName::Field(n) if n == name))
    }
}

/// One URL template with at least one surviving operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PathIR {
    /// URL template as written in the document, e.g. "/users/{id}"
    pub template: String,
    /// Sanitized directory segments ending with [`LEAF_SEGMENT`]
    pub segments: Vec<String>,
    /// Never empty
    pub operations: Vec<OperationIR>,
}

impl PathIR {
    /// Number of directories between the output root and this path's file.
    pub fn depth(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }
}

/// Compiled document
#[derive(Debug, Clone)]
pub struct ApiIR {
    /// First declared server URL, or empty
    pub base_url: String,
    /// Namespace prefix of every named type
    pub namespace: String,
    /// Shared namespace entries, grouped by registry
    pub types: Vec<NamedType>,
    /// Paths in document order
    pub paths: Vec<PathIR>,
}
