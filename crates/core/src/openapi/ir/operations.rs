//! Per-operation assembly and path manifest construction.
//!
//! Each retained (path, method) pair becomes one `OperationIR` whose props
//! appear in a fixed order: reqHeaders, query, status, resBody, resHeaders,
//! reqFormat, reqBody. Absent entries are left out.

use std::iter;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;
use crate::openapi::spec::{
    HttpMethod, MediaType, Operation, Parameter, ParameterLocation, PathItem, RefOr, RequestBody,
    SchemaKind,
};

use super::api::{LEAF_SEGMENT, OperationIR, PathIR};
use super::normalize::{Context, TypeBuilder};
use super::types::{BodyFormat, Prop, PropName, PropValue, ValueKind};
use super::utils::to_path_segment;

const MULTIPART_FORM: &str = "multipart/form-data";
const URL_ENCODED_FORM: &str = "application/x-www-form-urlencoded";

/// Collect every path that keeps at least one operation, in document order.
pub(super) fn collect_paths<'a>(
    builder: &TypeBuilder<'a>,
    paths: &'a IndexMap<String, PathItem>,
) -> Result<Vec<PathIR>> {
    let mut collected = Vec::new();

    for (template, item) in paths {
        let mut operations = Vec::new();

        for (method, operation) in &item.operations {
            if operation.deprecated {
                debug!(path = %template, method = method.as_str(), "Skipping deprecated operation");
                continue;
            }

            match collect_operation(builder, item, *method, operation)? {
                Some(op) => operations.push(op),
                None => debug!(
                    path = %template,
                    method = method.as_str(),
                    "No 2xx/3xx response, dropping operation"
                ),
            }
        }

        if operations.is_empty() {
            debug!(path = %template, "No operations left, omitting path");
            continue;
        }

        let declared = declared_path_params(builder, item)?;
        collected.push(PathIR {
            template: template.clone(),
            segments: path_segments(template, &declared),
            operations,
        });
    }

    Ok(collected)
}

/// Directory segments for a URL template, terminated by the leaf marker.
pub fn path_segments(template: &str, declared: &[(&str, Option<SchemaKind>)]) -> Vec<String> {
    template
        .strip_suffix('/')
        .unwrap_or(template)
        .split('/')
        .skip(1)
        .filter(|part| !part.is_empty())
        .map(|part| to_path_segment(part, declared))
        .chain(iter::once(LEAF_SEGMENT.to_string()))
        .collect()
}

/// Path parameters visible anywhere on the path item, with their schema kind.
fn declared_path_params<'a>(
    builder: &TypeBuilder<'a>,
    item: &'a PathItem,
) -> Result<Vec<(&'a str, Option<SchemaKind>)>> {
    let resolver = builder.resolver();
    let all = item
        .parameters
        .iter()
        .chain(item.operations.values().flat_map(|op| op.parameters.iter()));

    let mut declared = Vec::new();
    for parameter in all {
        let parameter: &'a Parameter = match parameter {
            RefOr::Ref(reference) => resolver.parameter(&reference.reference)?,
            RefOr::Item(parameter) => parameter,
        };
        if parameter.location != ParameterLocation::Path {
            continue;
        }

        let kind = match &parameter.schema {
            Some(RefOr::Item(schema)) => schema.kind(),
            Some(RefOr::Ref(reference)) => resolver.schema(&reference.reference)?.kind(),
            None => None,
        };
        declared.push((parameter.name.as_str(), kind));
    }

    Ok(declared)
}

/// The first response key matching `20x` or `30x`, as a number.
pub fn success_status(code: &str) -> Option<u16> {
    match code.as_bytes() {
        [b'2' | b'3', b'0', last] if last.is_ascii_digit() => code.parse().ok(),
        _ => None,
    }
}

fn collect_operation(
    builder: &TypeBuilder<'_>,
    item: &PathItem,
    method: HttpMethod,
    operation: &Operation,
) -> Result<Option<OperationIR>> {
    let declared = declare_params(builder, item.parameters.iter().chain(&operation.parameters))?;

    let Some((status, response)) = operation
        .responses
        .iter()
        .find_map(|(code, response)| success_status(code).map(|status| (status, response)))
    else {
        return Ok(None);
    };

    let mut props = Vec::new();
    if let Some(group) = merge_params(&declared, ParameterLocation::Header) {
        props.push(group.into_prop("reqHeaders", false));
    }
    if let Some(group) = merge_params(&declared, ParameterLocation::Query) {
        let required = group.required;
        props.push(group.into_prop("query", required));
    }

    props.push(Prop::field(
        "status",
        true,
        None,
        PropValue::new(ValueKind::Status(status)),
    ));

    let response = match response {
        RefOr::Ref(reference) => builder.resolver().response(&reference.reference)?,
        RefOr::Item(response) => response,
    };

    if let Some(body) = builder.build_content(&response.content, Context::Response)? {
        props.push(Prop::field(
            "resBody",
            true,
            response.description.clone(),
            body,
        ));
    }

    let mut headers = Vec::new();
    for (name, header) in &response.headers {
        match header {
            RefOr::Ref(reference) => {
                let type_ref = builder.resolver().type_ref(&reference.reference)?;
                headers.push(Prop::field(
                    name,
                    true,
                    None,
                    PropValue::new(ValueKind::Ref(type_ref)),
                ));
            }
            RefOr::Item(header) => {
                let value = match &header.schema {
                    Some(schema) => builder.build_value(schema, Context::Response)?,
                    None => None,
                };
                if let Some(value) = value {
                    headers.push(Prop::field(
                        name,
                        header.required.unwrap_or(true),
                        header.description.clone(),
                        value,
                    ));
                }
            }
        }
    }
    if !headers.is_empty() {
        props.push(Prop::field(
            "resHeaders",
            true,
            None,
            PropValue::object(headers),
        ));
    }

    if let Some(request_body) = &operation.request_body {
        props.extend(request_body_props(builder, request_body)?);
    }

    Ok(Some(OperationIR {
        method,
        description: operation.description.clone(),
        props,
    }))
}

/// The reqFormat and reqBody entries for a request body.
fn request_body_props(
    builder: &TypeBuilder<'_>,
    request_body: &RefOr<RequestBody>,
) -> Result<Vec<Prop>> {
    let (body, value) = match request_body {
        RefOr::Ref(reference) => {
            let body = builder.resolver().request_body(&reference.reference)?;
            let type_ref = builder.resolver().type_ref(&reference.reference)?;
            (body, Some(PropValue::new(ValueKind::Ref(type_ref))))
        }
        RefOr::Item(body) => {
            let value = match body_format(&body.content) {
                Some((_, media)) => builder.build_media(Some(media), Context::Request)?,
                None => builder.build_content(&body.content, Context::Request)?,
            };
            (body, value)
        }
    };

    let mut props = Vec::new();
    if let Some((format, _)) = body_format(&body.content) {
        props.push(Prop::field(
            "reqFormat",
            true,
            None,
            PropValue::new(ValueKind::Format(format)),
        ));
    }
    if let Some(value) = value {
        props.push(Prop::field(
            "reqBody",
            body.required.unwrap_or(true),
            body.description.clone(),
            value,
        ));
    }

    Ok(props)
}

/// Encoding tag for form bodies, with the content entry it came from.
fn body_format(content: &IndexMap<String, MediaType>) -> Option<(BodyFormat, &MediaType)> {
    let with_schema = |media_type: &str| {
        content
            .get(media_type)
            .filter(|media| media.schema.is_some())
    };

    with_schema(MULTIPART_FORM)
        .map(|media| (BodyFormat::FormData, media))
        .or_else(|| with_schema(URL_ENCODED_FORM).map(|media| (BodyFormat::UrlEncoded, media)))
}

/// One declared parameter before merging.
#[derive(Debug, Clone)]
struct DeclaredParam {
    location: ParameterLocation,
    required: bool,
    entry: ParamEntry,
}

#[derive(Debug, Clone)]
enum ParamEntry {
    /// Points at a `components.parameters` entry, which is already a wrapper object.
    Reference(PropValue),
    /// One named field of the inline wrapper object.
    Inline(Prop),
}

/// Merged wrapper for one parameter location.
#[derive(Debug)]
struct ParamGroup {
    values: Vec<PropValue>,
    required: bool,
}

impl ParamGroup {
    fn into_prop(self, name: &str, required: bool) -> Prop {
        Prop {
            name: PropName::Field(name.to_string()),
            required,
            description: None,
            values: self.values,
        }
    }
}

/// Resolve path-level then operation-level parameters into records.
fn declare_params<'p>(
    builder: &TypeBuilder<'_>,
    parameters: impl Iterator<Item = &'p RefOr<Parameter>>,
) -> Result<Vec<DeclaredParam>> {
    let mut declared = Vec::new();

    for parameter in parameters {
        match parameter {
            RefOr::Ref(reference) => {
                let resolved = builder.resolver().parameter(&reference.reference)?;
                let type_ref = builder.resolver().type_ref(&reference.reference)?;
                declared.push(DeclaredParam {
                    location: resolved.location,
                    required: resolved.required.unwrap_or(false),
                    entry: ParamEntry::Reference(PropValue {
                        nullable: false,
                        description: resolved.description.clone(),
                        value: ValueKind::Ref(type_ref),
                    }),
                });
            }
            RefOr::Item(parameter) => {
                let value = match &parameter.schema {
                    Some(schema) => builder.build_value(schema, Context::Request)?,
                    None => None,
                };
                let Some(value) = value else {
                    continue;
                };
                let required = parameter.required.unwrap_or(false);
                declared.push(DeclaredParam {
                    location: parameter.location,
                    required,
                    entry: ParamEntry::Inline(Prop::field(
                        &parameter.name,
                        required,
                        parameter.description.clone(),
                        value,
                    )),
                });
            }
        }
    }

    Ok(declared)
}

/// References first, then one object holding every inline parameter.
/// `required` is true when any merged parameter is required.
fn merge_params(declared: &[DeclaredParam], location: ParameterLocation) -> Option<ParamGroup> {
    let matching: Vec<&DeclaredParam> = declared
        .iter()
        .filter(|param| param.location == location)
        .collect();
    if matching.is_empty() {
        return None;
    }

    let mut values: Vec<PropValue> = matching
        .iter()
        .filter_map(|param| match &param.entry {
            ParamEntry::Reference(value) => Some(value.clone()),
            ParamEntry::Inline(_) => None,
        })
        .collect();

    let inline: Vec<Prop> = matching
        .iter()
        .filter_map(|param| match &param.entry {
            ParamEntry::Inline(prop) => Some(prop.clone()),
            ParamEntry::Reference(_) => None,
        })
        .collect();
    if !inline.is_empty() {
        values.push(PropValue::object(inline));
    }

    Some(ParamGroup {
        values,
        required: matching.iter().any(|param| param.required),
    })
}
