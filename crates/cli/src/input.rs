//! Decoding of OpenAPI documents from JSON or YAML text.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use pathtypes_core::Document;

/// Read and decode the document at `path`.
pub fn read_document(path: &Path, yaml: bool) -> Result<Document, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
    debug!(path = %path.display(), yaml, bytes = contents.len(), "Read OpenAPI document");

    parse_document(&contents, yaml).map_err(|err| format!("{}: {err}", path.display()))
}

/// Decode document text. Decoding errors name the offending location
/// inside the document.
pub fn parse_document(contents: &str, yaml: bool) -> Result<Document, String> {
    let document: Document = if yaml {
        let deserializer = serde_yaml::Deserializer::from_str(contents);
        serde_path_to_error::deserialize(deserializer)
            .map_err(|err| format!("Failed to parse YAML at '{}': {}", err.path(), err.inner()))?
    } else {
        let mut deserializer = serde_json::Deserializer::from_str(contents);
        let document: Document = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|err| format!("Failed to parse JSON at '{}': {}", err.path(), err.inner()))?;
        deserializer
            .end()
            .map_err(|err| format!("Failed to parse JSON: {err}"))?;
        document
    };

    check_version(&document)?;
    Ok(document)
}

fn check_version(document: &Document) -> Result<(), String> {
    if let Some(swagger) = &document.swagger {
        return Err(format!(
            "Swagger {swagger} documents are not supported, convert to OpenAPI 3 first"
        ));
    }
    match document.openapi.as_deref() {
        Some(version) if version.starts_with("3.") => {}
        Some(version) => warn!(version, "Unrecognized OpenAPI version, treating as 3.x"),
        None => warn!("Document has no 'openapi' version field, treating as 3.x"),
    }
    Ok(())
}
