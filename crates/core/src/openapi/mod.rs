//! OpenAPI to TypeScript declaration compiler.
//!
//! This module reads OpenAPI 3 documents and generates:
//! - One shared namespace of types built from every component registry
//! - One `Methods` type per URL path describing each operation's request and
//!   response shapes (headers, query, status, bodies)

mod emitter;
mod ir;
mod spec;

pub use emitter::{
    CompileOptions, Compilation, DEFAULT_TYPES_NAMESPACE, PathFile, codegen_output, compile,
};
pub use ir::{TYPES_DIR, normalize_document};
pub use spec::{Document, Registry};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::error::CompileError;
    use crate::openapi::spec::Document;

    const PETSTORE_JSON: &str = r##"{
  "openapi": "3.0.3",
  "info": { "title": "Petstore", "version": "1.0.0" },
  "servers": [{ "url": "https://api.example.com/v1" }, { "url": "https://backup.example.com" }],
  "paths": {
    "/pets": {
      "get": {
        "description": "List pets",
        "parameters": [
          { "name": "limit", "in": "query", "schema": { "type": "integer" } },
          { "$ref": "#/components/parameters/Tag" }
        ],
        "responses": {
          "200": {
            "description": "A page of pets",
            "content": { "application/json": { "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } } } }
          },
          "default": { "description": "Error" }
        }
      },
      "post": {
        "requestBody": {
          "required": true,
          "content": { "application/json": { "schema": { "$ref": "#/components/schemas/NewPet" } } }
        },
        "responses": {
          "201": { "description": "Created", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
        }
      }
    },
    "/pets/{petId}": {
      "parameters": [{ "name": "petId", "in": "path", "required": true, "schema": { "type": "integer" } }],
      "get": {
        "responses": {
          "200": { "description": "A pet", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
        }
      },
      "delete": {
        "deprecated": true,
        "responses": { "204": { "description": "Deleted" } }
      }
    },
    "/pets/{petId}/photo": {
      "parameters": [{ "name": "petId", "in": "path", "required": true, "schema": { "type": "integer" } }],
      "put": {
        "requestBody": {
          "content": {
            "multipart/form-data": {
              "schema": {
                "type": "object",
                "required": ["file"],
                "properties": { "file": { "type": "string", "format": "binary" } }
              }
            }
          }
        },
        "responses": { "204": { "description": "Stored" } }
      },
      "get": {
        "responses": {
          "200": { "description": "The photo", "content": { "image/png": { "schema": { "type": "string", "format": "binary" } } } }
        }
      }
    },
    "/health": {
      "get": { "responses": { "500": { "description": "Unhealthy" } } }
    }
  },
  "components": {
    "schemas": {
      "Pet": {
        "type": "object",
        "description": "A pet in the store",
        "required": ["id", "name"],
        "properties": {
          "id": { "type": "integer" },
          "name": { "type": "string" },
          "status": { "type": "string", "enum": ["available", "sold"] },
          "legacyCode": { "type": "string", "deprecated": true },
          "owner": { "$ref": "#/components/schemas/Owner/properties/name" }
        }
      },
      "NewPet": {
        "allOf": [
          { "$ref": "#/components/schemas/Pet" },
          { "type": "object", "properties": { "tag": { "type": "string", "nullable": true } } }
        ]
      },
      "Owner": {
        "type": "object",
        "properties": { "name": { "type": "string" } }
      },
      "Labels": {
        "type": "object",
        "additionalProperties": true
      }
    },
    "parameters": {
      "Tag": { "name": "tag", "in": "query", "schema": { "type": "string" } }
    }
  }
}"##;

    fn document(json: &str) -> Document {
        serde_json::from_str(json).expect("document fixture")
    }

    fn compile_json(json: &str) -> Compilation {
        compile(&document(json), &CompileOptions::default()).unwrap()
    }

    fn file<'a>(compilation: &'a Compilation, segments: &[&str]) -> &'a str {
        compilation
            .files
            .iter()
            .find(|f| f.segments == segments)
            .map(|f| f.methods.as_str())
            .unwrap_or_else(|| panic!("no file for {segments:?}"))
    }

    #[test]
    fn test_compile_petstore() {
        let compilation = compile_json(PETSTORE_JSON);

        assert_eq!(compilation.base_url, "https://api.example.com/v1");

        let segments: Vec<_> = compilation.files.iter().map(|f| f.segments.join("/")).collect();
        assert_eq!(
            segments,
            vec![
                "pets/index",
                "pets/_petId@number/index",
                "pets/_petId@number/photo/index"
            ]
        );
    }

    #[test]
    fn test_shared_types_module() {
        let compilation = compile_json(PETSTORE_JSON);
        let types = compilation.types.expect("types module");

        let expected = r#"/* eslint-disable */
export namespace Types {
  /** A pet in the store */
  export type Pet = {
    id: number
    name: string
    status?: 'available' | 'sold' | undefined
    owner?: Types.Owner['name'] | undefined
  }

  export type NewPet = Types.Pet & {
    tag?: string | null | undefined
  }

  export type Owner = {
    name?: string | undefined
  }

  export type Labels = {
    [key: string]: any
  }

  export type Tag = {
    tag?: string | undefined
  }
}
"#;
        assert_eq!(types, expected);
    }

    #[test]
    fn test_methods_module_for_collection() {
        let compilation = compile_json(PETSTORE_JSON);

        let expected = r#"/* eslint-disable */
import { Types } from '../@types'

export type Methods = {
  /** List pets */
  get: {
    query?: Types.Tag & {
      limit?: number | undefined
    } | undefined

    status: 200
    /** A page of pets */
    resBody: Types.Pet[]
  }

  post: {
    status: 201
    /** Created */
    resBody: Types.Pet
    reqBody: Types.NewPet
  }
}
"#;
        assert_eq!(file(&compilation, &["pets", "index"]), expected);
    }

    #[test]
    fn test_deprecated_operation_removed() {
        let compilation = compile_json(PETSTORE_JSON);
        let methods = file(&compilation, &["pets", "_petId@number", "index"]);

        assert!(methods.contains("get: {"));
        assert!(!methods.contains("delete"));
        assert!(!compilation.types.unwrap().contains("legacyCode"));
    }

    #[test]
    fn test_binary_request_and_response_differ() {
        let compilation = compile_json(PETSTORE_JSON);

        let expected = r#"/* eslint-disable */
import type { ReadStream } from 'fs'

export type Methods = {
  put: {
    status: 204
    reqFormat: FormData

    reqBody: {
      file: (File | ReadStream)
    }
  }

  get: {
    status: 200
    /** The photo */
    resBody: Blob
  }
}
"#;
        assert_eq!(
            file(&compilation, &["pets", "_petId@number", "photo", "index"]),
            expected
        );
    }

    #[test]
    fn test_path_without_success_response_is_omitted() {
        let compilation = compile_json(PETSTORE_JSON);
        assert!(
            compilation
                .files
                .iter()
                .all(|f| f.segments.first().map(String::as_str) != Some("health"))
        );
    }

    #[test]
    fn test_path_param_kind_in_directory_name() {
        let json = |kind: &str| {
            format!(
                r#"{{
                    "paths": {{
                        "/users/{{id}}": {{
                            "get": {{
                                "parameters": [{{ "name": "id", "in": "path", "required": true, "schema": {{ "type": "{kind}" }} }}],
                                "responses": {{ "200": {{ "description": "OK" }} }}
                            }}
                        }}
                    }}
                }}"#
            )
        };

        let integer = compile_json(&json("integer"));
        assert_eq!(integer.files[0].segments, vec!["users", "_id@number", "index"]);

        let string = compile_json(&json("string"));
        assert_eq!(string.files[0].segments, vec!["users", "_id@string", "index"]);
    }

    #[test]
    fn test_path_param_kind_through_schema_reference() {
        let compilation = compile_json(
            r##"{
                "paths": {
                    "/orders/{orderId}": {
                        "parameters": [{ "$ref": "#/components/parameters/OrderId" }],
                        "get": { "responses": { "200": { "description": "OK" } } }
                    }
                },
                "components": {
                    "schemas": { "Id": { "type": "integer" } },
                    "parameters": {
                        "OrderId": { "name": "orderId", "in": "path", "required": true, "schema": { "$ref": "#/components/schemas/Id" } }
                    }
                }
            }"##,
        );
        assert_eq!(
            compilation.files[0].segments,
            vec!["orders", "_orderId@number", "index"]
        );
    }

    #[test]
    fn test_missing_reference_aborts() {
        let err = compile(
            &document(
                r##"{
                    "paths": {
                        "/things": {
                            "get": {
                                "responses": {
                                    "200": {
                                        "description": "OK",
                                        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Thing" } } }
                                    }
                                }
                            }
                        }
                    }
                }"##,
            ),
            &CompileOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, CompileError::MissingReference { .. }));
        assert!(err.to_string().contains("#/components/schemas/Thing"));
    }

    #[test]
    fn test_name_collision_aborts() {
        let err = compile(
            &document(
                r#"{
                    "components": {
                        "schemas": {
                            "pet": { "type": "string" },
                            "Pet": { "type": "string" }
                        }
                    }
                }"#,
            ),
            &CompileOptions::default(),
        )
        .unwrap_err();

        assert!(matches!(err, CompileError::NameCollision { .. }));
    }

    #[test]
    fn test_custom_namespace_and_dates() {
        let options = CompileOptions {
            keep_date_object: true,
            types_namespace: "Api".to_string(),
        };
        let compilation = compile(
            &document(
                r##"{
                    "paths": {
                        "/events": {
                            "get": {
                                "responses": {
                                    "200": { "description": "OK", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Event" } } } }
                                }
                            }
                        }
                    },
                    "components": {
                        "schemas": {
                            "Event": {
                                "type": "object",
                                "required": ["at"],
                                "properties": { "at": { "type": "string", "format": "date-time" } }
                            }
                        }
                    }
                }"##,
            ),
            &options,
        )
        .unwrap();

        let types = compilation.types.unwrap();
        assert!(types.contains("export namespace Api {"));
        assert!(types.contains("    at: Date\n"));

        let methods = &compilation.files[0].methods;
        assert!(methods.contains("import { Api } from '../@types'"));
        assert!(methods.contains("resBody: Api.Event"));
    }

    #[test]
    fn test_document_without_components_has_no_types_module() {
        let compilation = compile_json(
            r#"{
                "paths": {
                    "/ping": { "get": { "responses": { "204": { "description": "Pong" } } } }
                }
            }"#,
        );

        assert!(compilation.types.is_none());
        assert_eq!(compilation.base_url, "");
        assert_eq!(
            compilation.files[0].methods,
            "/* eslint-disable */\nexport type Methods = {\n  get: {\n    status: 204\n  }\n}\n"
        );
    }

    #[test]
    fn test_root_path_maps_to_index() {
        let compilation = compile_json(
            r#"{
                "paths": {
                    "/": { "get": { "responses": { "200": { "description": "Root" } } } }
                }
            }"#,
        );
        assert_eq!(compilation.files[0].segments, vec!["index"]);
    }

    #[test]
    fn test_dot_segments_stay_inside_output_tree() {
        let compilation = compile_json(
            r#"{
                "paths": {
                    "/../../etc/{x}": { "get": { "responses": { "200": { "description": "OK" } } } },
                    "/./v1.2": { "get": { "responses": { "200": { "description": "OK" } } } }
                }
            }"#,
        );
        assert_eq!(
            compilation.files[0].segments,
            vec!["__", "__", "etc", "_x@string", "index"]
        );
        assert_eq!(compilation.files[1].segments, vec!["_", "v1.2", "index"]);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let first = compile_json(PETSTORE_JSON);
        let second = compile_json(PETSTORE_JSON);
        assert_eq!(first, second);
    }
}
