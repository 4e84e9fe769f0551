//! Loading configuration trees from YAML and JSON files

use super::Configuration;
use crate::core::{DiError, DiResult, KeyPath};
use crate::di::Provider;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

/// On-disk representation of a configuration tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// YAML (default, also used for unknown extensions)
    #[default]
    Yaml,
    /// JSON
    Json,
}

impl Format {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Yaml,
        }
    }
}

/// Parse a configuration tree from text.
pub fn parse_str(content: &str, format: Format) -> DiResult<Value> {
    let value = match format {
        Format::Yaml => serde_yaml::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
    };
    Ok(value)
}

/// Render a value in the given format.
pub fn render(value: &Value, format: Format) -> DiResult<String> {
    let rendered = match format {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)? + "\n",
    };
    Ok(rendered)
}

/// Load a configuration file into a new, initialized [`Configuration`].
pub fn load(path: &Path) -> DiResult<Configuration> {
    let config = Configuration::new();
    load_into(&config, path)?;
    Ok(config)
}

/// Load a configuration file and set it as the data of `config`.
pub fn load_into(config: &Configuration, path: &Path) -> DiResult<()> {
    let content = fs::read_to_string(path).map_err(|e| {
        DiError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let value = parse_str(&content, Format::from_path(path)).map_err(|e| {
        DiError::Config(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    debug!(path = %path.display(), "configuration loaded");
    config.set(value)
}

/// Save the current configuration tree, creating parent directories.
pub fn save(config: &Configuration, path: &Path) -> DiResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = render(&config.get()?, Format::from_path(path))?;
    fs::write(path, content)?;
    Ok(())
}

/// Parse a `key.path=value` override.
///
/// The value is read as YAML, so `5`, `true`, `[1, 2]` and `{a: 1}` keep
/// their types and anything else becomes a string. An empty value is `null`.
pub fn parse_override(spec: &str) -> DiResult<(KeyPath, Value)> {
    let (key, raw) = spec.split_once('=').ok_or_else(|| {
        DiError::Config(format!("Invalid override '{}': expected key=value", spec))
    })?;

    let path = KeyPath::parse(key.trim())
        .map_err(|e| DiError::Config(format!("Invalid override '{}': {}", spec, e)))?;

    let raw = raw.trim();
    let value = if raw.is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(raw)
            .map_err(|e| DiError::Config(format!("Invalid override '{}': {}", spec, e)))?
    };

    Ok((path, value))
}

/// Apply overrides in order through the path write algorithm.
pub fn apply_overrides<I, S>(config: &Configuration, overrides: I) -> DiResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for spec in overrides {
        let (path, value) = parse_override(spec.as_ref())?;
        debug!(path = %path, "applying configuration override");
        config.at(path).set(value)?;
    }
    Ok(())
}
