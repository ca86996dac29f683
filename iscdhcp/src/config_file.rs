//! Load and save whole configuration files.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use isc_cfg_core::{parse, parse_file, ParseError};
use thiserror::Error;

use crate::decode::{decode, DecodeError, Decoded};
use crate::root::ConfigRoot;

/// Errors returned while loading or saving a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),
    #[error("invalid configuration: {0}")]
    Decode(#[from] DecodeError),
}

/// Parse configuration text into a typed root.
pub fn parse_config(text: &str) -> Result<Decoded, ConfigError> {
    let tree = parse(text)?;
    Ok(decode(&tree)?)
}

/// Read and decode the configuration file at `path`.
pub fn load_config(path: &Path) -> Result<Decoded, ConfigError> {
    let tree = parse_file(path).map_err(|err| match err {
        ParseError::Io(source) => ConfigError::Io {
            path: path.display().to_string(),
            source,
        },
        other => ConfigError::Syntax(other),
    })?;
    let decoded = decode(&tree)?;
    tracing::info!(
        path = %path.display(),
        subnets = decoded.root.subnets.len(),
        warnings = decoded.warnings.len(),
        "loaded configuration"
    );
    Ok(decoded)
}

/// Write `root` to `path`, replacing any existing file.
pub fn save_config(root: &ConfigRoot, path: &Path) -> Result<(), ConfigError> {
    let io_err = |source: io::Error| ConfigError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    root.write_to(&mut out).map_err(io_err)?;
    out.flush().map_err(io_err)?;
    tracing::info!(path = %path.display(), subnets = root.subnets.len(), "saved configuration");
    Ok(())
}
