//! CLI argument validation functions
//!
//! This module provides custom value parsers for CLI arguments that go
//! beyond what clap can validate automatically.

use serde_json::Value;
use std::fs;
use std::path::PathBuf;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("Configuration file does not exist: '{}'", path_str));
    }

    if !path.is_file() {
        return Err(format!("Configuration path is not a file: '{}'", path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read configuration file '{}': {}", path_str, e)),
    }
}

/// Parse a `key=value` provider argument
///
/// Values that parse as JSON are used as JSON (`timeout=5`, `headers={"a":"b"}`),
/// anything else is taken as a plain string.
pub fn parse_key_value(arg: &str) -> Result<(String, Value), String> {
    let (key, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("Expected key=value, got: '{}'", arg))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("Argument name cannot be empty: '{}'", arg));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

/// Validate an environment variable prefix
pub fn validate_env_prefix(prefix: &str) -> Result<String, String> {
    let trimmed = prefix.trim_end_matches('_');
    if trimmed.is_empty() {
        return Err("Environment prefix cannot be empty".to_string());
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "Environment prefix may only contain letters, digits and underscores, got: '{}'",
            prefix
        ));
    }
    Ok(prefix.to_string())
}
