//! Type tree IR for code generation.
//!
//! This module defines the abstract type-value tree the compiler builds before
//! any text is produced:
//! - PropValue: a type expression plus the nullability and description of its schema
//! - ValueKind: what the expression is (primitive, enum, object, array, ...)
//! - Prop: a named slot inside an object
//! - TypeRef: an opaque pointer into the shared types namespace
//!
//! A schema that cannot be represented never gets a `PropValue`; builders
//! return `None` and the enclosing `Prop` is dropped.

/// A node of the type tree.
#[derive(Debug, Clone, PartialEq)]
pub struct PropValue {
    /// Renders with a trailing `| null`.
    pub nullable: bool,
    /// Schema description, when the node came from an inline schema.
    pub description: Option<String>,
    pub value: ValueKind,
}

/// The shape of a `PropValue`.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// string, number, boolean, null, any, Date
    Primitive(Primitive),
    /// Uploadable or downloadable binary content
    Binary(BinaryKind),
    /// Literal union from an `enum`: 'a' | 'b'
    Enum(Vec<Literal>),
    /// Object shape: { a: string; b?: number }
    Object(Vec<Prop>),
    /// oneOf / anyOf / allOf members
    Combined {
        combinator: Combinator,
        members: Vec<PropValue>,
    },
    /// Array of the element type: T[]
    Array(Box<PropValue>),
    /// Named type in the shared namespace: Types.Pet
    Ref(TypeRef),
    /// Literal success status code: 200
    Status(u16),
    /// Request body encoding tag
    Format(BodyFormat),
}

/// Primitive type names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Null,
    /// Unconstrained value (`additionalProperties: true`)
    Any,
    /// Temporal object for `format: date-time` when dates are kept as objects
    Date,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
            Primitive::Null => "null",
            Primitive::Any => "any",
            Primitive::Date => "Date",
        }
    }
}

/// Binary sentinel flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryKind {
    /// Request side: accepts a browser file or a Node stream
    Upload,
    /// Response side: a downloaded blob
    Download,
}

/// Enum member literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Rendered inside single quotes
    Quoted(String),
    /// Rendered verbatim (numbers, booleans, null)
    Raw(String),
}

/// Schema composition keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    OneOf,
    AllOf,
    AnyOf,
}

impl Combinator {
    /// `allOf` is an intersection; the others are unions.
    pub fn is_intersection(&self) -> bool {
        matches!(self, Combinator::AllOf)
    }
}

/// Request body encoding tag written as `reqFormat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    FormData,
    UrlEncoded,
}

impl BodyFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyFormat::FormData => "FormData",
            BodyFormat::UrlEncoded => "URLSearchParams",
        }
    }
}

/// Reference to a named type, optionally narrowed to one of its properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Namespace prefix, e.g. "Types"
    pub namespace: String,
    /// Sanitized type name
    pub name: String,
    /// Raw property name for `Types.Foo['bar']`
    pub property: Option<String>,
}

/// Key of a `Prop`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropName {
    /// Raw (unsanitized) field name
    Field(String),
    /// Open string-keyed map entry: [key: string]
    Index,
}

/// Named slot inside an object or parameter wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub name: PropName,
    pub required: bool,
    pub description: Option<String>,
    /// Never empty. More than one value only for merged parameter wrappers.
    pub values: Vec<PropValue>,
}

impl PropValue {
    /// A value with no description that is not nullable.
    pub fn new(value: ValueKind) -> Self {
        Self {
            nullable: false,
            description: None,
            value,
        }
    }

    /// Object value wrapping `props`.
    pub fn object(props: Vec<Prop>) -> Self {
        Self::new(ValueKind::Object(props))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.value, ValueKind::Array(_))
    }

    pub fn combinator(&self) -> Option<Combinator> {
        match &self.value {
            ValueKind::Combined { combinator, .. } => Some(*combinator),
            _ => None,
        }
    }

    /// Whether any node of this tree uses the upload sentinel.
    pub fn uses_upload(&self) -> bool {
        self.any(&|v| matches!(v.value, ValueKind::Binary(BinaryKind::Upload)))
    }

    /// Whether any node of this tree points into the shared namespace.
    pub fn uses_references(&self) -> bool {
        self.any(&|v| matches!(v.value, ValueKind::Ref(_)))
    }

    /// Whether the rendered value spans several lines (contains a non-empty object).
    pub fn spans_lines(&self) -> bool {
        self.any(&|v| matches!(&v.value, ValueKind::Object(props) if !props.is_empty()))
    }

    fn any(&self, pred: &dyn Fn(&PropValue) -> bool) -> bool {
        if pred(self) {
            return true;
        }
        match &self.value {
            ValueKind::Object(props) => props.iter().any(|p| p.any(pred)),
            ValueKind::Combined { members, .. } => members.iter().any(|m| m.any(pred)),
            ValueKind::Array(item) => item.any(pred),
            _ => false,
        }
    }
}

impl Prop {
    /// A named property holding a single value.
    pub fn field(
        name: impl Into<String>,
        required: bool,
        description: Option<String>,
        value: PropValue,
    ) -> Self {
        Self {
            name: PropName::Field(name.into()),
            required,
            description,
            values: vec![value],
        }
    }

    /// The `[key: string]` entry of an open map. Always required.
    pub fn index(value: PropValue) -> Self {
        Self {
            name: PropName::Index,
            required: true,
            description: value.description.clone(),
            values: vec![value],
        }
    }

    /// Whether the `?` marker is written after the name.
    pub fn is_optional(&self) -> bool {
        !self.required && self.name != PropName::Index
    }

    pub fn uses_upload(&self) -> bool {
        self.values.iter().any(PropValue::uses_upload)
    }

    pub fn uses_references(&self) -> bool {
        self.values.iter().any(PropValue::uses_references)
    }

    pub fn spans_lines(&self) -> bool {
        self.values.iter().any(PropValue::spans_lines)
    }

    fn any(&self, pred: &dyn Fn(&PropValue) -> bool) -> bool {
        self.values.iter().any(|v| v.any(pred))
    }
}
