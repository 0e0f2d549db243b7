//! Reference resolution against the component registries.

use indexmap::IndexMap;

use crate::error::{CompileError, Result};
use crate::openapi::spec::{
    Components, Parameter, RefOr, Registry, RequestBody, Response, Schema,
};

use super::types::TypeRef;
use super::utils::to_type_name;

const COMPONENTS_PREFIX: &str = "#/components/";

/// A parsed `#/components/<registry>/<key>[/properties/<prop>]` pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefPath {
    pub registry: Registry,
    /// Unescaped component key
    pub key: String,
    /// Unescaped property name when the pointer narrows into an object
    pub property: Option<String>,
}

impl RefPath {
    pub fn parse(reference: &str) -> Result<Self> {
        let rest = reference.strip_prefix(COMPONENTS_PREFIX).ok_or_else(|| {
            CompileError::invalid_reference(reference, "only '#/components/...' references are supported")
        })?;

        let parts: Vec<&str> = rest.split('/').collect();
        let (registry, key, property) = match parts.as_slice() {
            [registry, key] => (*registry, *key, None),
            [registry, key, "properties", property] => (*registry, *key, Some(*property)),
            _ => {
                return Err(CompileError::invalid_reference(
                    reference,
                    "expected '#/components/<registry>/<name>[/properties/<name>]'",
                ));
            }
        };

        let registry = Registry::from_key(registry).ok_or_else(|| {
            CompileError::invalid_reference(reference, format!("unknown registry '{registry}'"))
        })?;

        if key.is_empty() {
            return Err(CompileError::invalid_reference(reference, "empty component name"));
        }

        Ok(Self {
            registry,
            key: unescape_pointer(key),
            property: property.map(unescape_pointer),
        })
    }
}

/// JSON pointer unescaping: `~1` is `/`, `~0` is `~`.
fn unescape_pointer(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Looks up references in the document's component registries.
///
/// Entries that are themselves references are followed until an inline
/// definition is reached.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    components: &'a Components,
    namespace: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(components: &'a Components, namespace: &'a str) -> Self {
        Self {
            components,
            namespace,
        }
    }

    pub fn components(&self) -> &'a Components {
        self.components
    }

    pub fn schema(&self, reference: &str) -> Result<&'a Schema> {
        self.follow(reference, Registry::Schemas, &self.components.schemas)
    }

    pub fn parameter(&self, reference: &str) -> Result<&'a Parameter> {
        self.follow(reference, Registry::Parameters, &self.components.parameters)
    }

    pub fn request_body(&self, reference: &str) -> Result<&'a RequestBody> {
        self.follow(
            reference,
            Registry::RequestBodies,
            &self.components.request_bodies,
        )
    }

    pub fn response(&self, reference: &str) -> Result<&'a Response> {
        self.follow(reference, Registry::Responses, &self.components.responses)
    }

    /// Validate that the reference names an existing entry and return the
    /// type expression pointing at it. The entry itself is not inlined.
    pub fn type_ref(&self, reference: &str) -> Result<TypeRef> {
        let path = RefPath::parse(reference)?;
        if !self.components.contains(path.registry, &path.key) {
            return Err(missing(&path, reference));
        }

        Ok(TypeRef {
            namespace: self.namespace.to_string(),
            name: to_type_name(&path.key),
            property: path.property,
        })
    }

    fn follow<T>(
        &self,
        reference: &str,
        registry: Registry,
        entries: &'a IndexMap<String, RefOr<T>>,
    ) -> Result<&'a T> {
        let mut seen: Vec<&str> = Vec::new();
        let mut current = reference;

        loop {
            let path = RefPath::parse(current)?;
            if path.registry != registry {
                return Err(CompileError::invalid_reference(
                    current,
                    format!("expected a reference into components.{registry}"),
                ));
            }
            if path.property.is_some() {
                return Err(CompileError::invalid_reference(
                    current,
                    "property references cannot be dereferenced",
                ));
            }

            match entries.get(&path.key) {
                Some(RefOr::Item(item)) => return Ok(item),
                Some(RefOr::Ref(next)) => {
                    seen.push(current);
                    if seen.contains(&next.reference.as_str()) {
                        return Err(CompileError::ReferenceCycle {
                            reference: reference.to_string(),
                        });
                    }
                    current = &next.reference;
                }
                None => return Err(missing(&path, current)),
            }
        }
    }
}

fn missing(path: &RefPath, reference: &str) -> CompileError {
    CompileError::MissingReference {
        registry: path.registry,
        key: path.key.clone(),
        reference: reference.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn components(json: &str) -> Components {
        serde_json::from_str(json).expect("components fixture")
    }

    #[test]
    fn test_parse_ref_path() {
        let path = RefPath::parse("#/components/schemas/Pet").unwrap();
        assert_eq!(path.registry, Registry::Schemas);
        assert_eq!(path.key, "Pet");
        assert_eq!(path.property, None);

        let path = RefPath::parse("#/components/schemas/Foo/properties/bar").unwrap();
        assert_eq!(path.key, "Foo");
        assert_eq!(path.property.as_deref(), Some("bar"));

        let path = RefPath::parse("#/components/requestBodies/a~1b~0c").unwrap();
        assert_eq!(path.registry, Registry::RequestBodies);
        assert_eq!(path.key, "a/b~c");
    }

    #[test]
    fn test_parse_rejects_malformed_references() {
        for reference in [
            "other.yaml#/components/schemas/Pet",
            "#/definitions/Pet",
            "#/components/things/Pet",
            "#/components/schemas",
            "#/components/schemas/",
            "#/components/schemas/Foo/items/bar",
        ] {
            let err = RefPath::parse(reference).unwrap_err();
            assert!(
                matches!(err, CompileError::InvalidReference { .. }),
                "{reference}: {err:?}"
            );
        }
    }

    #[test]
    fn test_resolves_inline_entries_and_chains() {
        let components = components(
            r##"{
                "schemas": {
                    "Pet": {"type": "object", "properties": {"id": {"type": "integer"}}},
                    "Animal": {"$ref": "#/components/schemas/Pet"}
                },
                "parameters": {
                    "Limit": {"name": "limit", "in": "query", "schema": {"type": "integer"}}
                }
            }"##,
        );
        let resolver = Resolver::new(&components, "Types");

        let pet = resolver.schema("#/components/schemas/Animal").unwrap();
        assert!(pet.properties.as_ref().unwrap().contains_key("id"));

        let limit = resolver.parameter("#/components/parameters/Limit").unwrap();
        assert_eq!(limit.name, "limit");
    }

    #[test]
    fn test_missing_reference() {
        let components = components(r#"{"schemas": {}}"#);
        let resolver = Resolver::new(&components, "Types");

        let err = resolver.schema("#/components/schemas/Ghost").unwrap_err();
        match err {
            CompileError::MissingReference { registry, key, .. } => {
                assert_eq!(registry, Registry::Schemas);
                assert_eq!(key, "Ghost");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            resolver.type_ref("#/components/schemas/Ghost"),
            Err(CompileError::MissingReference { .. })
        ));
    }

    #[test]
    fn test_registry_mismatch_is_invalid() {
        let components = components(r#"{"schemas": {"Pet": {"type": "string"}}}"#);
        let resolver = Resolver::new(&components, "Types");

        let err = resolver.parameter("#/components/schemas/Pet").unwrap_err();
        assert!(matches!(err, CompileError::InvalidReference { .. }));
    }

    #[test]
    fn test_reference_cycle() {
        let components = components(
            r##"{
                "schemas": {
                    "A": {"$ref": "#/components/schemas/B"},
                    "B": {"$ref": "#/components/schemas/A"}
                }
            }"##,
        );
        let resolver = Resolver::new(&components, "Types");

        let err = resolver.schema("#/components/schemas/A").unwrap_err();
        assert!(matches!(err, CompileError::ReferenceCycle { .. }));
    }

    #[test]
    fn test_type_ref_sanitizes_name_and_keeps_property() {
        let components = components(
            r#"{"schemas": {"user-settings": {"type": "object", "properties": {"theme": {"type": "string"}}}}}"#,
        );
        let resolver = Resolver::new(&components, "Api");

        let type_ref = resolver
            .type_ref("#/components/schemas/user-settings/properties/theme")
            .unwrap();
        assert_eq!(type_ref.namespace, "Api");
        assert_eq!(type_ref.name, "User_settings");
        assert_eq!(type_ref.property.as_deref(), Some("theme"));
    }
}
