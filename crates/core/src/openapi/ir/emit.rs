//! TypeScript code emission via the Emit trait.
//!
//! Every node renders from its structure alone, so two equal trees always give
//! byte-identical text. Nested blocks are indented two spaces per level.

use super::api::NamedType;
use super::codegen::{MethodsModule, TsImport, TypesModule};
use super::types::{
    BinaryKind, Literal, Primitive, Prop, PropName, PropValue, TypeRef, ValueKind,
};
use super::utils::{quote, to_property_name};

const ESLINT_DISABLE: &str = "/* eslint-disable */\n";
const UPLOAD_TYPE: &str = "(File | ReadStream)";
const DOWNLOAD_TYPE: &str = "Blob";
const INDEX_SIGNATURE: &str = "[key: string]";

/// Trait for emitting TypeScript code from IR nodes.
pub trait Emit {
    /// Render at the top level.
    fn emit(&self) -> String {
        self.emit_indented(0)
    }

    /// Render a node whose first line sits at `depth` indentation levels.
    fn emit_indented(&self, depth: usize) -> String;
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

// =============================================================================
// Values
// =============================================================================

impl Emit for Primitive {
    fn emit_indented(&self, _depth: usize) -> String {
        self.as_str().to_string()
    }
}

impl Emit for Literal {
    fn emit_indented(&self, _depth: usize) -> String {
        match self {
            Literal::Quoted(s) => quote(s),
            Literal::Raw(s) => s.clone(),
        }
    }
}

impl Emit for TypeRef {
    fn emit_indented(&self, _depth: usize) -> String {
        match &self.property {
            Some(property) => format!("{}.{}[{}]", self.namespace, self.name, quote(property)),
            None => format!("{}.{}", self.namespace, self.name),
        }
    }
}

impl Emit for PropValue {
    fn emit_indented(&self, depth: usize) -> String {
        let body = match &self.value {
            ValueKind::Primitive(p) => p.emit(),
            ValueKind::Binary(BinaryKind::Upload) => UPLOAD_TYPE.to_string(),
            ValueKind::Binary(BinaryKind::Download) => DOWNLOAD_TYPE.to_string(),
            ValueKind::Enum(literals) => literals
                .iter()
                .map(|literal| literal.emit())
                .collect::<Vec<_>>()
                .join(" | "),
            ValueKind::Object(props) => emit_object(props, depth),
            ValueKind::Combined {
                combinator,
                members,
            } => {
                let separator = if combinator.is_intersection() { " & " } else { " | " };
                members
                    .iter()
                    .map(|member| {
                        let s = member.emit_indented(depth);
                        // Unions bind looser than `&`
                        if combinator.is_intersection() && is_union(member) {
                            format!("({s})")
                        } else {
                            s
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(separator)
            }
            ValueKind::Array(item) => {
                let inner = item.emit_indented(depth);
                if is_union(item) || is_intersection(item) {
                    format!("({inner})[]")
                } else {
                    format!("{inner}[]")
                }
            }
            ValueKind::Ref(type_ref) => type_ref.emit(),
            ValueKind::Status(code) => code.to_string(),
            ValueKind::Format(format) => format.as_str().to_string(),
        };

        if self.nullable {
            format!("{body} | null")
        } else {
            body
        }
    }
}

/// Whether the rendered value is a top-level `|` chain.
fn is_union(value: &PropValue) -> bool {
    if value.nullable {
        return true;
    }
    match &value.value {
        ValueKind::Enum(literals) => literals.len() > 1,
        ValueKind::Combined {
            combinator,
            members,
        } => {
            if combinator.is_intersection() {
                members.len() == 1 && members.first().is_some_and(is_union)
            } else {
                members.len() > 1 || members.first().is_some_and(is_union)
            }
        }
        _ => false,
    }
}

/// Whether the rendered value is a top-level `&` chain.
fn is_intersection(value: &PropValue) -> bool {
    !value.nullable
        && matches!(
            &value.value,
            ValueKind::Combined { combinator, members } if combinator.is_intersection() && members.len() > 1
        )
}

/// Brace block with one prop per line. Adjacent props are separated by a blank
/// line when either spans several lines.
fn emit_object(props: &[Prop], depth: usize) -> String {
    if props.is_empty() {
        return "{}".to_string();
    }

    let mut output = String::from("{\n");
    for (i, prop) in props.iter().enumerate() {
        if i > 0 {
            output.push('\n');
            if prop.spans_lines() || props[i - 1].spans_lines() {
                output.push('\n');
            }
        }
        output.push_str(&prop.emit_indented(depth + 1));
    }
    output.push('\n');
    output.push_str(&indent(depth));
    output.push('}');
    output
}

// =============================================================================
// Props
// =============================================================================

impl Emit for Prop {
    fn emit_indented(&self, depth: usize) -> String {
        let prefix = indent(depth);
        let mut output = doc_comment(self.description.as_deref(), &prefix);

        let key = match &self.name {
            PropName::Field(name) => to_property_name(name),
            PropName::Index => INDEX_SIGNATURE.to_string(),
        };
        let values = self
            .values
            .iter()
            .map(|v| v.emit_indented(depth))
            .collect::<Vec<_>>()
            .join(" & ");

        if self.is_optional() {
            output.push_str(&format!("{prefix}{key}?: {values} | undefined"));
        } else {
            output.push_str(&format!("{prefix}{key}: {values}"));
        }
        output
    }
}

/// `/** text */` or a multi-line block, each line prefixed with `prefix`.
/// Empty when there is no description.
fn doc_comment(description: Option<&str>, prefix: &str) -> String {
    let Some(text) = description.map(|d| d.trim()).filter(|d| !d.is_empty()) else {
        return String::new();
    };

    let escaped = text.replace("*/", "*\\/");
    let lines: Vec<&str> = escaped.lines().map(str::trim_end).collect();

    if let [line] = lines.as_slice() {
        return format!("{prefix}/** {line} */\n");
    }

    let mut output = format!("{prefix}/**\n");
    for line in lines {
        if line.is_empty() {
            output.push_str(&format!("{prefix} *\n"));
        } else {
            output.push_str(&format!("{prefix} * {line}\n"));
        }
    }
    output.push_str(&format!("{prefix} */\n"));
    output
}

// =============================================================================
// Modules
// =============================================================================

impl Emit for TsImport {
    fn emit_indented(&self, _depth: usize) -> String {
        let type_keyword = if self.type_only { "type " } else { "" };
        format!(
            "import {}{{ {} }} from '{}'\n",
            type_keyword,
            self.items.join(", "),
            self.from
        )
    }
}

fn emit_header(imports: &[TsImport]) -> String {
    let mut output = String::from(ESLINT_DISABLE);
    for import in imports {
        output.push_str(&import.emit());
    }
    if !imports.is_empty() {
        output.push('\n');
    }
    output
}

impl Emit for NamedType {
    fn emit_indented(&self, depth: usize) -> String {
        let prefix = indent(depth);
        format!(
            "{}{}export type {} = {}\n",
            doc_comment(self.description.as_deref(), &prefix),
            prefix,
            self.name,
            self.value.emit_indented(depth)
        )
    }
}

impl Emit for TypesModule {
    fn emit_indented(&self, depth: usize) -> String {
        let mut output = emit_header(&self.imports);
        output.push_str(&format!("export namespace {} {{\n", self.namespace));
        for (i, named) in self.types.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(&named.emit_indented(depth + 1));
        }
        output.push_str("}\n");
        output
    }
}

impl Emit for MethodsModule {
    fn emit_indented(&self, depth: usize) -> String {
        let mut output = emit_header(&self.imports);
        output.push_str(&format!(
            "export type Methods = {}\n",
            emit_object(&self.methods, depth)
        ));
        output
    }
}

// =============================================================================
// Tests
// =============================================================================
