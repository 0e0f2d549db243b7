//! pathtypes command line interface.
//!
//! Reads OpenAPI documents named by `pathtypes.toml` or by flags, compiles
//! them with `pathtypes-core` and writes the TypeScript modules to disk.

#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

mod config;
mod input;
mod logging;
mod output;

use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::{ConfigFile, DEFAULT_CONFIG_FILE, Overrides, Target, TargetConfig};

pub use logging::init_tracing;

#[derive(Parser, Debug)]
#[command(
    name = "pathtypes",
    version,
    about = "Generate path-organized TypeScript types from OpenAPI 3 documents"
)]
struct Cli {
    /// Config file listing [[openapi]] targets
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Compile a single document instead of the configured targets
    #[arg(short, long = "input-file", value_name = "FILE")]
    input_file: Option<PathBuf>,
    /// Directory receiving the generated modules
    #[arg(short, long = "output-dir", value_name = "DIR")]
    output_dir: Option<PathBuf>,
    /// Decode the input as YAML
    #[arg(long)]
    yaml: bool,
    /// Type `date-time` strings as `Date`
    #[arg(long = "keep-date-object")]
    keep_date_object: bool,
    /// Namespace of the shared types module
    #[arg(long = "types-namespace", value_name = "NAME")]
    types_namespace: Option<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output_dir.clone(),
            yaml: self.yaml,
            keep_date_object: self.keep_date_object,
            types_namespace: self.types_namespace.clone(),
        }
    }

    /// A single ad-hoc target from `--input-file`, or every target of the
    /// config file.
    fn targets(&self) -> Result<Vec<Target>, String> {
        let overrides = self.overrides();

        if let Some(input_file) = &self.input_file {
            let target = TargetConfig {
                input_file: input_file.clone(),
                ..TargetConfig::default()
            };
            return Ok(vec![target.resolve(Path::new(""), &overrides)?]);
        }

        let path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let config = ConfigFile::load(&path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        config.targets(base_dir, &overrides)
    }
}

/// Parse `args` (program name first), run the generation and return the
/// process exit code.
pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.targets().and_then(|targets| generate_all(&targets)) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("Error: {err}");
                1
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

fn generate_all(targets: &[Target]) -> Result<(), String> {
    for target in targets {
        generate(target)?;
    }
    Ok(())
}

/// Compile one target and write its modules.
fn generate(target: &Target) -> Result<(), String> {
    let start = Instant::now();
    debug!(
        input = %target.input_file.display(),
        output = %target.output_dir.display(),
        namespace = %target.types_namespace,
        "Generating types"
    );

    let document = input::read_document(&target.input_file, target.yaml)?;
    let compilation = pathtypes_core::compile(&document, &target.compile_options())
        .map_err(|err| format!("Failed to compile {}: {err}", target.input_file.display()))?;
    let written = output::write_compilation(&target.output_dir, &compilation)?;

    info!(
        input = %target.input_file.display(),
        output = %target.output_dir.display(),
        files = written,
        base_url = %compilation.base_url,
        elapsed_ms = start.elapsed().as_millis(),
        "Generated types"
    );
    Ok(())
}
