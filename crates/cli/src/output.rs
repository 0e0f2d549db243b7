//! Writing compiled modules to disk.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use pathtypes_core::{Compilation, TYPES_DIR};

/// File locations of everything a compilation produces, in write order.
pub fn planned_files(output_dir: &Path, compilation: &Compilation) -> Vec<(PathBuf, String)> {
    let types = compilation
        .types
        .iter()
        .map(|types| (output_dir.join(TYPES_DIR).join("index.ts"), types.clone()));

    let methods = compilation.files.iter().map(|file| {
        let mut path = output_dir.to_path_buf();
        path.extend(&file.segments);
        path.set_extension("ts");
        (path, file.methods.clone())
    });

    types.chain(methods).collect()
}

/// Write every module of `compilation` under `output_dir`, returning the
/// number of files written.
pub fn write_compilation(output_dir: &Path, compilation: &Compilation) -> Result<usize, String> {
    let files = planned_files(output_dir, compilation);

    for (path, contents) in &files {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                format!("Failed to create directory {}: {err}", parent.display())
            })?;
        }
        fs::write(path, contents)
            .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
        debug!(path = %path.display(), bytes = contents.len(), "Wrote module");
    }

    Ok(files.len())
}
