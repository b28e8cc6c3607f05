//! Render configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid render config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Markup knobs for the renderer. Every field has a default, so a partial
/// TOML table is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Put in front of every navigation token in a link.
    pub link_prefix: String,
    /// CSS class for links to cells that do not exist.
    pub broken_link_class: String,
    /// Text for a broken link that has none of its own.
    pub broken_link_placeholder: String,
    /// `id` of the inventory list.
    pub inventory_list_id: String,
    /// Emit an HTML comment naming the cell and state before the article.
    pub cell_comment: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            link_prefix: "./".to_string(),
            broken_link_class: "broken".to_string(),
            broken_link_placeholder: "[[BROKEN LINK]]".to_string(),
            inventory_list_id: "inventory".to_string(),
            cell_comment: true,
        }
    }
}

impl RenderConfig {
    /// Parse a config from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.link_prefix, "./");
        assert_eq!(config.broken_link_class, "broken");
        assert!(config.cell_comment);
    }

    #[test]
    fn test_partial_toml() {
        let config = RenderConfig::from_toml_str(
            r#"
            link_prefix = "/tale/"
            cell_comment = false
            "#,
        )
        .unwrap();

        assert_eq!(config.link_prefix, "/tale/");
        assert!(!config.cell_comment);
        assert_eq!(config.broken_link_placeholder, "[[BROKEN LINK]]");
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(RenderConfig::from_toml_str("").unwrap(), RenderConfig::default());
    }

    #[test]
    fn test_bad_toml() {
        let err = RenderConfig::from_toml_str("cell_comment = \"yes\"").unwrap_err();
        assert!(err.to_string().starts_with("invalid render config"));
    }
}
