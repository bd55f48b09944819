//! Render configuration
//!
//! Controls how the resolver writes values that have no textual form of
//! their own (lists) and what it leaves behind for optional fields nobody
//! filled in. Loadable from TOML:
//!
//! ```toml
//! [render]
//! marker = "bracketed"            # bracketed | placeholder | empty
//! marker_template = "<<{name}>>"  # takes precedence over `marker`
//! list_separator = "; "
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a render configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// What to write for a placeholder that has neither a value nor a default
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UnresolvedMarker {
    /// `[name]`
    #[default]
    Bracketed,
    /// Leave the `{{name}}` token as written
    Placeholder,
    /// Nothing at all
    Empty,
    /// A template in which `{name}` is replaced by the field name
    Custom(String),
}

impl UnresolvedMarker {
    /// The marker text for a field
    pub fn render(&self, name: &str) -> String {
        match self {
            UnresolvedMarker::Bracketed => format!("[{}]", name),
            UnresolvedMarker::Placeholder => format!("{{{{{}}}}}", name),
            UnresolvedMarker::Empty => String::new(),
            UnresolvedMarker::Custom(template) => template.replace("{name}", name),
        }
    }
}

/// Configuration for the render pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Marker for unresolved optional fields
    pub marker: UnresolvedMarker,
    /// Separator placed between list items
    pub list_separator: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            marker: UnresolvedMarker::default(),
            list_separator: ", ".to_string(),
        }
    }
}

/// TOML structure for deserializing render configuration
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    render: TomlRender,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlRender {
    marker: Option<TomlMarker>,
    marker_template: Option<String>,
    list_separator: Option<String>,
}

#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum TomlMarker {
    Bracketed,
    Placeholder,
    Empty,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unresolved marker policy
    pub fn with_marker(mut self, marker: UnresolvedMarker) -> Self {
        self.marker = marker;
        self
    }

    /// Set the list separator
    pub fn with_list_separator(mut self, separator: impl Into<String>) -> Self {
        self.list_separator = separator.into();
        self
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; omitted keys keep their defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let render = parsed.render;
        let mut config = Self::default();

        if let Some(marker) = render.marker {
            config.marker = match marker {
                TomlMarker::Bracketed => UnresolvedMarker::Bracketed,
                TomlMarker::Placeholder => UnresolvedMarker::Placeholder,
                TomlMarker::Empty => UnresolvedMarker::Empty,
            };
        }
        if let Some(template) = render.marker_template {
            config.marker = UnresolvedMarker::Custom(template);
        }
        if let Some(separator) = render.list_separator {
            config.list_separator = separator;
        }

        Ok(config)
    }
}
