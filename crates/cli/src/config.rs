//! `pathtypes.toml` loading and target resolution.
//!
//! ```toml
//! [[openapi]]
//! input-file = "spec/openapi.yaml"
//! output-dir = "src/api"
//! types-namespace = "Api"
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use pathtypes_core::{CompileOptions, DEFAULT_TYPES_NAMESPACE};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "pathtypes.toml";

const DEFAULT_OUTPUT_DIR: &str = "api";

/// Top-level structure of `pathtypes.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    /// Generation targets, processed in order.
    #[serde(default)]
    pub openapi: Vec<TargetConfig>,
}

/// One `[[openapi]]` entry as written by the user.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TargetConfig {
    /// OpenAPI document to compile.
    pub input_file: PathBuf,
    /// Defaults to `api`.
    pub output_dir: Option<PathBuf>,
    /// Defaults to true unless the input file name ends in `.json`.
    pub yaml: Option<bool>,
    /// Map `date-time` strings to `Date`.
    pub keep_date_object: Option<bool>,
    /// Defaults to `Types`.
    pub types_namespace: Option<String>,
}

/// Values given on the command line. Each one that is set wins over the
/// config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output_dir: Option<PathBuf>,
    pub yaml: bool,
    pub keep_date_object: bool,
    pub types_namespace: Option<String>,
}

/// A fully resolved generation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub input_file: PathBuf,
    pub output_dir: PathBuf,
    pub yaml: bool,
    pub keep_date_object: bool,
    pub types_namespace: String,
}

impl Target {
    /// Options handed to the compiler for this target.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            keep_date_object: self.keep_date_object,
            types_namespace: self.types_namespace.clone(),
        }
    }
}

impl ConfigFile {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path).map_err(|err| {
            format!("Failed to read config file {}: {err}", path.display())
        })?;
        Self::parse(&contents)
            .map_err(|err| format!("Failed to parse config file {}: {err}", path.display()))
    }

    /// Parse config file contents.
    pub fn parse(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|err| err.to_string())
    }

    /// Resolve every target against `base_dir`, applying `overrides`.
    pub fn targets(&self, base_dir: &Path, overrides: &Overrides) -> Result<Vec<Target>, String> {
        if self.openapi.is_empty() {
            return Err("No [[openapi]] targets configured".to_string());
        }
        self.openapi
            .iter()
            .map(|target| target.resolve(base_dir, overrides))
            .collect()
    }
}

impl TargetConfig {
    /// Fill in defaults, apply `overrides` and anchor relative paths.
    pub fn resolve(&self, base_dir: &Path, overrides: &Overrides) -> Result<Target, String> {
        let output_dir = match &overrides.output_dir {
            Some(dir) => dir.clone(),
            None => base_dir.join(
                self.output_dir
                    .as_deref()
                    .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT_DIR)),
            ),
        };

        let yaml = overrides.yaml || self.yaml.unwrap_or_else(|| !is_json_file(&self.input_file));

        let types_namespace = overrides
            .types_namespace
            .clone()
            .or_else(|| self.types_namespace.clone())
            .filter(|ns| !ns.is_empty())
            .unwrap_or_else(|| DEFAULT_TYPES_NAMESPACE.to_string());
        if !is_identifier(&types_namespace) {
            return Err(format!(
                "Invalid types namespace '{types_namespace}': expected a TypeScript identifier"
            ));
        }

        Ok(Target {
            input_file: base_dir.join(&self.input_file),
            output_dir,
            yaml,
            keep_date_object: overrides.keep_date_object || self.keep_date_object.unwrap_or(false),
            types_namespace,
        })
    }
}

fn is_json_file(path: &Path) -> bool {
    path.to_string_lossy().ends_with(".json")
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
