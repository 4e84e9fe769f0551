pub mod dump;
pub mod get;

use lazydi::config::loader::{self, Format};
use lazydi::config::Configuration;
use lazydi::core::DiResult;
use serde_json::Value;
use std::path::PathBuf;

/// Where the configuration comes from and how to print it.
pub struct SourceOptions {
    pub file: Option<PathBuf>,
    pub overrides: Vec<String>,
    pub fallback: Option<String>,
    pub json: bool,
}

impl SourceOptions {
    /// Build the configuration: fallback, then file, then overrides.
    pub fn build(&self) -> DiResult<Configuration> {
        let config = Configuration::new();

        if let Some(raw) = &self.fallback {
            config.set_fallback(Some(loader::parse_str(raw, Format::Yaml)?));
        }
        if let Some(file) = &self.file {
            loader::load_into(&config, file)?;
        }
        loader::apply_overrides(&config, &self.overrides)?;

        Ok(config)
    }

    pub fn format(&self) -> Format {
        if self.json {
            Format::Json
        } else {
            Format::Yaml
        }
    }
}

pub fn print_value(value: &Value, format: Format) -> DiResult<()> {
    print!("{}", loader::render(value, format)?);
    Ok(())
}
