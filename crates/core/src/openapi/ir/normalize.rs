//! Normalization from OpenAPI document to API IR.
//!
//! This module handles all the OpenAPI-specific schema logic:
//! - Schema to type-tree conversion (`TypeBuilder`)
//! - The shared named-type registry
//! - Name collision detection across registries
//!
//! Operations and paths are assembled in `operations`.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{CompileError, Result};
use crate::openapi::spec::{
    AdditionalProperties, Document, EnumValue, MediaType, RefOr, Registry, Schema, SchemaKind,
};

use super::api::{ApiIR, NamedType};
use super::operations::collect_paths;
use super::resolve::Resolver;
use super::types::{
    BinaryKind, Combinator, Literal, Primitive, Prop, PropValue, ValueKind,
};
use super::utils::to_type_name;

/// Side of the exchange a schema describes.
///
/// Only binary content renders differently between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Request,
    Response,
}

/// Recursive schema -> `PropValue` translation.
#[derive(Debug, Clone, Copy)]
pub struct TypeBuilder<'a> {
    resolver: Resolver<'a>,
    keep_date_object: bool,
}

impl<'a> TypeBuilder<'a> {
    pub fn new(resolver: Resolver<'a>, keep_date_object: bool) -> Self {
        Self {
            resolver,
            keep_date_object,
        }
    }

    pub fn resolver(&self) -> &Resolver<'a> {
        &self.resolver
    }

    /// Build a value for a schema slot. `None` means the schema has no
    /// representation and the enclosing prop must be dropped.
    pub fn build_value(&self, schema: &RefOr<Schema>, context: Context) -> Result<Option<PropValue>> {
        match schema {
            RefOr::Ref(reference) => {
                let type_ref = self.resolver.type_ref(&reference.reference)?;
                Ok(Some(PropValue::new(ValueKind::Ref(type_ref))))
            }
            RefOr::Item(schema) => self.build_schema(schema, context),
        }
    }

    /// Build a value for an inline schema node.
    pub fn build_schema(&self, schema: &Schema, context: Context) -> Result<Option<PropValue>> {
        let value = if let Some((combinator, members)) = combinator_members(schema) {
            let mut built = Vec::with_capacity(members.len());
            for member in members {
                if let Some(value) = self.build_value(member, context)? {
                    built.push(value);
                }
            }
            (!built.is_empty()).then_some(ValueKind::Combined {
                combinator,
                members: built,
            })
        } else if let Some(values) = &schema.enum_values {
            enum_literals(schema, values)
        } else if schema.kind() == Some(SchemaKind::Array) {
            match &schema.items {
                Some(items) => self
                    .build_value(items, context)?
                    .map(|item| ValueKind::Array(Box::new(item))),
                None => None,
            }
        } else if schema.properties.is_some() || schema.has_additional_properties() {
            Some(ValueKind::Object(self.build_props(schema, context)?))
        } else if schema.format.as_deref() == Some("binary") {
            Some(ValueKind::Binary(match context {
                Context::Request => BinaryKind::Upload,
                Context::Response => BinaryKind::Download,
            }))
        } else {
            self.primitive(schema).map(ValueKind::Primitive)
        };

        let Some(value) = value else {
            debug!(
                schema_type = ?schema.schema_type,
                format = ?schema.format,
                "Schema has no type representation, dropping"
            );
            return Ok(None);
        };

        Ok(Some(PropValue {
            nullable: schema.is_nullable(),
            description: schema.description.clone(),
            value,
        }))
    }

    /// Build the value of the content entry chosen by [`select_content`].
    pub fn build_content(
        &self,
        content: &IndexMap<String, MediaType>,
        context: Context,
    ) -> Result<Option<PropValue>> {
        self.build_media(select_content(content), context)
    }

    /// Build the schema of one media type entry, if it has one.
    pub fn build_media(&self, media: Option<&MediaType>, context: Context) -> Result<Option<PropValue>> {
        match media.and_then(|media| media.schema.as_ref()) {
            Some(schema) => self.build_value(schema, context),
            None => Ok(None),
        }
    }

    fn build_props(&self, schema: &Schema, context: Context) -> Result<Vec<Prop>> {
        let mut props = Vec::new();

        for (name, property) in schema.properties.iter().flatten() {
            if let RefOr::Item(inline) = property {
                if inline.deprecated {
                    debug!(property = %name, "Skipping deprecated property");
                    continue;
                }
            }

            let Some(value) = self.build_value(property, context)? else {
                continue;
            };
            let required = schema.required.iter().any(|r| r == name);
            props.push(Prop::field(name, required, value.description.clone(), value));
        }

        match &schema.additional_properties {
            Some(AdditionalProperties::Bool(true)) => {
                props.push(Prop::index(PropValue::new(ValueKind::Primitive(Primitive::Any))));
            }
            Some(AdditionalProperties::Schema(extra)) => {
                if let Some(value) = self.build_value(extra, context)? {
                    props.push(Prop::index(value));
                }
            }
            Some(AdditionalProperties::Bool(false)) | None => {}
        }

        Ok(props)
    }

    fn primitive(&self, schema: &Schema) -> Option<Primitive> {
        match schema.kind()? {
            SchemaKind::Integer | SchemaKind::Number => Some(Primitive::Number),
            SchemaKind::String
                if self.keep_date_object && schema.format.as_deref() == Some("date-time") =>
            {
                Some(Primitive::Date)
            }
            SchemaKind::String => Some(Primitive::String),
            SchemaKind::Boolean => Some(Primitive::Boolean),
            SchemaKind::Null => Some(Primitive::Null),
            SchemaKind::Array | SchemaKind::Object => None,
        }
    }
}

/// The first of oneOf, allOf, anyOf that is present.
fn combinator_members(schema: &Schema) -> Option<(Combinator, &[RefOr<Schema>])> {
    if let Some(members) = &schema.one_of {
        return Some((Combinator::OneOf, members));
    }
    if let Some(members) = &schema.all_of {
        return Some((Combinator::AllOf, members));
    }
    schema
        .any_of
        .as_deref()
        .map(|members| (Combinator::AnyOf, members))
}

fn enum_literals(schema: &Schema, values: &[EnumValue]) -> Option<ValueKind> {
    if values.is_empty() {
        return None;
    }

    let quote_all = schema.kind() == Some(SchemaKind::String);
    let literals = values
        .iter()
        .map(|value| {
            let raw = match value {
                EnumValue::String(s) => return Literal::Quoted(s.clone()),
                EnumValue::Null => return Literal::Raw("null".to_string()),
                EnumValue::Integer(i) => i.to_string(),
                EnumValue::Float(f) => f.to_string(),
                EnumValue::Bool(b) => b.to_string(),
            };
            if quote_all {
                Literal::Quoted(raw)
            } else {
                Literal::Raw(raw)
            }
        })
        .collect();

    Some(ValueKind::Enum(literals))
}

/// Pick the content entry to type: the first `application/*` entry, else the
/// first entry of any kind.
pub fn select_content(content: &IndexMap<String, MediaType>) -> Option<&MediaType> {
    content
        .iter()
        .find(|(media_type, _)| media_type.starts_with("application/"))
        .or_else(|| content.first())
        .map(|(_, media)| media)
}

/// Normalize a whole document into API IR.
pub fn normalize_document(
    document: &Document,
    namespace: &str,
    keep_date_object: bool,
) -> Result<ApiIR> {
    let resolver = Resolver::new(&document.components, namespace);
    let builder = TypeBuilder::new(resolver, keep_date_object);

    check_name_collisions(document)?;
    let types = normalize_components(&builder)?;
    let paths = collect_paths(&builder, &document.paths)?;

    debug!(
        types = types.len(),
        paths = paths.len(),
        "Normalized document"
    );

    Ok(ApiIR {
        base_url: document.base_url().to_string(),
        namespace: namespace.to_string(),
        types,
        paths,
    })
}

/// Every registry shares one namespace, so two keys that sanitize to the same
/// name would silently shadow each other.
fn check_name_collisions(document: &Document) -> Result<()> {
    let components = &document.components;
    let keys = components
        .schemas
        .keys()
        .map(|key| (Registry::Schemas, key))
        .chain(components.parameters.keys().map(|key| (Registry::Parameters, key)))
        .chain(
            components
                .request_bodies
                .keys()
                .map(|key| (Registry::RequestBodies, key)),
        )
        .chain(components.responses.keys().map(|key| (Registry::Responses, key)))
        .chain(components.headers.keys().map(|key| (Registry::Headers, key)));

    let mut seen: HashMap<String, (Registry, &String)> = HashMap::new();
    for (registry, key) in keys {
        let name = to_type_name(key);
        if let Some((first_registry, first)) = seen.get(&name) {
            return Err(CompileError::NameCollision {
                name,
                first_registry: *first_registry,
                first: (*first).clone(),
                second_registry: registry,
                second: key.clone(),
            });
        }
        seen.insert(name, (registry, key));
    }

    Ok(())
}

/// Build the shared namespace: schemas, parameters, requestBodies, responses,
/// headers, each in document order.
fn normalize_components(builder: &TypeBuilder<'_>) -> Result<Vec<NamedType>> {
    let components = builder.resolver().components();
    let mut types = Vec::new();

    for (key, entry) in &components.schemas {
        let value = match entry {
            RefOr::Ref(reference) => reference_value(builder, &reference.reference)?,
            RefOr::Item(schema) => builder.build_schema(schema, Context::Request)?,
        };
        push_named(&mut types, Registry::Schemas, key, value);
    }

    for (key, entry) in &components.parameters {
        let value = match entry {
            RefOr::Ref(reference) => reference_value(builder, &reference.reference)?,
            RefOr::Item(parameter) => {
                let built = match &parameter.schema {
                    Some(schema) => builder.build_value(schema, Context::Request)?,
                    None => None,
                };
                built.map(|value| {
                    PropValue::object(vec![Prop::field(
                        &parameter.name,
                        parameter.required.unwrap_or(false),
                        parameter.description.clone(),
                        value,
                    )])
                })
            }
        };
        push_named(&mut types, Registry::Parameters, key, value);
    }

    for (key, entry) in &components.request_bodies {
        let value = match entry {
            RefOr::Ref(reference) => reference_value(builder, &reference.reference)?,
            RefOr::Item(body) => with_description(
                builder.build_content(&body.content, Context::Request)?,
                &body.description,
            ),
        };
        push_named(&mut types, Registry::RequestBodies, key, value);
    }

    for (key, entry) in &components.responses {
        let value = match entry {
            RefOr::Ref(reference) => reference_value(builder, &reference.reference)?,
            RefOr::Item(response) => with_description(
                builder.build_content(&response.content, Context::Response)?,
                &response.description,
            ),
        };
        push_named(&mut types, Registry::Responses, key, value);
    }

    for (key, entry) in &components.headers {
        let value = match entry {
            RefOr::Ref(reference) => reference_value(builder, &reference.reference)?,
            RefOr::Item(header) => with_description(
                match &header.schema {
                    Some(schema) => builder.build_value(schema, Context::Response)?,
                    None => None,
                },
                &header.description,
            ),
        };
        push_named(&mut types, Registry::Headers, key, value);
    }

    Ok(types)
}

fn reference_value(builder: &TypeBuilder<'_>, reference: &str) -> Result<Option<PropValue>> {
    let type_ref = builder.resolver().type_ref(reference)?;
    Ok(Some(PropValue::new(ValueKind::Ref(type_ref))))
}

/// Prefer the container's own description over the schema's.
fn with_description(value: Option<PropValue>, description: &Option<String>) -> Option<PropValue> {
    value.map(|mut value| {
        if description.is_some() {
            value.description = description.clone();
        }
        value
    })
}

fn push_named(types: &mut Vec<NamedType>, registry: Registry, key: &str, value: Option<PropValue>) {
    let Some(value) = value else {
        debug!(registry = %registry, key = %key, "Component has no type representation, omitting");
        return;
    };

    types.push(NamedType {
        name: to_type_name(key),
        registry,
        key: key.to_string(),
        description: value.description.clone(),
        value,
    });
}
