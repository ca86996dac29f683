use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

/// Refuse an output path that resolves to the input file.
pub fn ensure_distinct_output(output: &Path, input: &Path) -> Result<()> {
    let output_abs = resolve(output)
        .with_context(|| format!("failed to resolve output path {}", output.display()))?;
    let input_abs = resolve(input)
        .with_context(|| format!("failed to resolve input path {}", input.display()))?;
    if output_abs == input_abs {
        bail!(
            "refusing to overwrite input {}: write the canonical form elsewhere",
            input.display()
        );
    }
    Ok(())
}

fn resolve(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return path
            .canonicalize()
            .with_context(|| format!("canonicalize {}", path.display()));
    }

    // Not on disk yet: anchor at the working directory without resolving `..`.
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    Ok(std::env::current_dir().context("current_dir")?.join(path))
}
