use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse to write the canonical model over the document it was built from.
pub fn ensure_output_not_input(output: &Path, input: &Path) -> Result<()> {
    let input_resolved = input
        .canonicalize()
        .with_context(|| format!("failed to resolve input path {}", input.display()))?;
    if resolve_output(output)? == input_resolved {
        bail!(
            "refusing to overwrite source document: output {} is the input",
            output.display()
        );
    }
    Ok(())
}

/// The output may not exist yet, so resolve its directory and re-attach the
/// file name.
fn resolve_output(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("failed to resolve output path {}", path.display()));
    }
    let Some(name) = path.file_name() else {
        bail!("output path {} has no file name", path.display());
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let dir = dir
        .canonicalize()
        .with_context(|| format!("output directory {} does not exist", dir.display()))?;
    Ok(dir.join(name))
}
