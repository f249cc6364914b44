//! Endpoint list ingestion.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot read endpoint file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("no endpoints given; pass --file <path> or list URLs as arguments")]
    Empty,
}

/// Parse a newline-delimited endpoint list, skipping blanks and `#` comments.
pub fn parse_endpoint_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Endpoints from `file` if given, otherwise from the positional arguments.
pub fn load_endpoints(file: Option<&Path>, args: &[String]) -> Result<Vec<String>, InputError> {
    let endpoints = match file {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| InputError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            parse_endpoint_list(&content)
        }
        None => args
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect(),
    };

    if endpoints.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(endpoints)
}
