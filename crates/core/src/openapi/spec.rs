//! OpenAPI document structs for serde deserialization.
//!
//! This module models the subset of OpenAPI 3 the compiler reads. Every map is
//! an `IndexMap` so the document's own key order survives decoding, whichever
//! format (JSON or YAML) the caller decoded it from.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};

/// Root OpenAPI document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    /// OpenAPI version string (`3.0.x`, `3.1.x`).
    pub openapi: Option<String>,
    /// Swagger version string; only present on 2.0 documents.
    pub swagger: Option<String>,
    /// Declared servers; the first one provides the base URL.
    #[serde(default)]
    pub servers: Vec<Server>,
    /// URL template -> path item, in document order.
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Reusable component registries.
    #[serde(default)]
    pub components: Components,
}

impl Document {
    /// Base URL taken verbatim from the first declared server.
    pub fn base_url(&self) -> &str {
        self.servers.first().map_or("", |server| server.url.as_str())
    }
}

/// A server entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    /// Server URL.
    pub url: String,
}

/// The five component registries the compiler resolves references against.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// `components.schemas`
    #[serde(default)]
    pub schemas: IndexMap<String, RefOr<Schema>>,
    /// `components.parameters`
    #[serde(default)]
    pub parameters: IndexMap<String, RefOr<Parameter>>,
    /// `components.requestBodies`
    #[serde(default)]
    pub request_bodies: IndexMap<String, RefOr<RequestBody>>,
    /// `components.responses`
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
    /// `components.headers`
    #[serde(default)]
    pub headers: IndexMap<String, RefOr<Header>>,
}

impl Components {
    /// Whether the registry holds an entry under `key`.
    pub fn contains(&self, registry: Registry, key: &str) -> bool {
        match registry {
            Registry::Schemas => self.schemas.contains_key(key),
            Registry::Parameters => self.parameters.contains_key(key),
            Registry::RequestBodies => self.request_bodies.contains_key(key),
            Registry::Responses => self.responses.contains_key(key),
            Registry::Headers => self.headers.contains_key(key),
        }
    }
}

/// Names one of the component registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Registry {
    /// `components.schemas`
    Schemas,
    /// `components.parameters`
    Parameters,
    /// `components.requestBodies`
    RequestBodies,
    /// `components.responses`
    Responses,
    /// `components.headers`
    Headers,
}

impl Registry {
    /// Key of the registry under `components`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Registry::Schemas => "schemas",
            Registry::Parameters => "parameters",
            Registry::RequestBodies => "requestBodies",
            Registry::Responses => "responses",
            Registry::Headers => "headers",
        }
    }

    /// Parse a registry key as it appears in a `$ref` path.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "schemas" => Some(Registry::Schemas),
            "parameters" => Some(Registry::Parameters),
            "requestBodies" => Some(Registry::RequestBodies),
            "responses" => Some(Registry::Responses),
            "headers" => Some(Registry::Headers),
            _ => None,
        }
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Either a `$ref` pointer or an inline object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    /// `{ "$ref": "#/components/..." }`
    Ref(Reference),
    /// Inline definition.
    Item(T),
}

/// A `$ref` object.
#[derive(Debug, Clone, Deserialize)]
pub struct Reference {
    /// The reference string.
    #[serde(rename = "$ref")]
    pub reference: String,
}

/// HTTP methods that can carry an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl HttpMethod {
    /// Lowercase method name, as used for path item keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
            HttpMethod::Patch => "patch",
        }
    }

    /// Parse a path item key. `trace` and unknown keys are not operations here.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "head" => Some(HttpMethod::Head),
            "options" => Some(HttpMethod::Options),
            "patch" => Some(HttpMethod::Patch),
            _ => None,
        }
    }
}

/// A path item: shared parameters plus operations in document order.
#[derive(Debug, Clone, Default)]
pub struct PathItem {
    /// Path-level parameters shared by all operations.
    pub parameters: Vec<RefOr<Parameter>>,
    /// Operations keyed by method, in the order the document declares them.
    pub operations: IndexMap<HttpMethod, Operation>,
}

// Hand-written so that method order follows the document instead of field order.
impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PathItemVisitor;

        impl<'de> Visitor<'de> for PathItemVisitor {
            type Value = PathItem;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an OpenAPI path item object")
            }

            fn visit_map<A>(self, mut map: A) -> Result<PathItem, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut item = PathItem::default();
                while let Some(key) = map.next_key::<String>()? {
                    if key == "parameters" {
                        item.parameters = map.next_value()?;
                    } else if let Some(method) = HttpMethod::from_key(&key) {
                        let operation: Operation = map.next_value()?;
                        item.operations.insert(method, operation);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(item)
            }
        }

        deserializer.deserialize_map(PathItemVisitor)
    }
}

/// An API operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,
    pub request_body: Option<RefOr<RequestBody>>,
    /// Status code -> response, in document order.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
}

/// Where a parameter is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

/// A parameter (query, header, path, or cookie).
#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub schema: Option<RefOr<Schema>>,
}

/// A request body definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    pub description: Option<String>,
    pub required: Option<bool>,
    /// Media type -> content, in document order.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A response definition.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    #[serde(default)]
    pub headers: IndexMap<String, RefOr<Header>>,
}

/// A response or component header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Header {
    pub description: Option<String>,
    pub required: Option<bool>,
    pub schema: Option<RefOr<Schema>>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<RefOr<Schema>>,
}

/// JSON Schema definition used in OpenAPI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The type of the schema (string, number, integer, boolean, object, array, null).
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Format hint (e.g., date-time, binary).
    pub format: Option<String>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    #[serde(default)]
    pub nullable: bool,

    pub description: Option<String>,

    #[serde(default)]
    pub deprecated: bool,

    /// Properties for object types, in document order.
    pub properties: Option<IndexMap<String, RefOr<Schema>>>,

    /// Required property names for object types.
    #[serde(default)]
    pub required: Vec<String>,

    /// Additional properties for object types (open string-keyed maps).
    pub additional_properties: Option<AdditionalProperties>,

    /// Item schema for array types.
    pub items: Option<Box<RefOr<Schema>>>,

    /// Enum values (can be strings, integers, floats, booleans, or null).
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<EnumValue>>,

    /// Union type (exactly one of these schemas).
    pub one_of: Option<Vec<RefOr<Schema>>>,

    /// Intersection type (all of these schemas combined).
    pub all_of: Option<Vec<RefOr<Schema>>>,

    /// Union type (any of these schemas).
    pub any_of: Option<Vec<RefOr<Schema>>>,
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// The primitive kinds a schema's `type` can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

impl SchemaKind {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(SchemaKind::String),
            "number" => Some(SchemaKind::Number),
            "integer" => Some(SchemaKind::Integer),
            "boolean" => Some(SchemaKind::Boolean),
            "array" => Some(SchemaKind::Array),
            "object" => Some(SchemaKind::Object),
            "null" => Some(SchemaKind::Null),
            _ => None,
        }
    }
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<RefOr<Schema>>),
}

/// Enum value can be string, integer, float, boolean, or null.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Schema {
    /// The declared kind. For a 3.1 type list the first non-null member wins;
    /// a list holding only `"null"` yields `Null`.
    pub fn kind(&self) -> Option<SchemaKind> {
        match &self.schema_type {
            Some(SchemaType::Single(name)) => SchemaKind::parse(name),
            Some(SchemaType::Multiple(names)) => names
                .iter()
                .filter_map(|name| SchemaKind::parse(name))
                .find(|kind| *kind != SchemaKind::Null)
                .or_else(|| {
                    names
                        .iter()
                        .any(|name| name == "null")
                        .then_some(SchemaKind::Null)
                }),
            None => None,
        }
    }

    /// Check if this schema is nullable (`nullable: true` or `"null"` in a type list).
    pub fn is_nullable(&self) -> bool {
        if self.nullable {
            return true;
        }

        matches!(
            &self.schema_type,
            Some(SchemaType::Multiple(names)) if names.len() > 1 && names.iter().any(|name| name == "null")
        )
    }

    /// Whether `additionalProperties` opens the object (`true` or a schema).
    pub fn has_additional_properties(&self) -> bool {
        matches!(
            self.additional_properties,
            Some(AdditionalProperties::Bool(true) | AdditionalProperties::Schema(_))
        )
    }
}
