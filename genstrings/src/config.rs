//! Optional `genstrings.toml` in the working directory
//!
//! ```toml
//! extension = "swift"
//!
//! [[rules]]
//! name = "tr"
//! pattern = 'Tr\("([^"]*)"\)'
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::rules::{builtin_rules, ExtractionRule};

const DEFAULT_CONFIG_PATH: &str = "genstrings.toml";

#[derive(Debug, Deserialize)]
pub struct GenstringsConfig {
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Appended after the built-in rules
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

impl Default for GenstringsConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RuleConfig {
    pub name: String,
    pub pattern: String,
    #[serde(default = "default_text_group")]
    pub text_group: usize,
    #[serde(default)]
    pub comment_group: Option<usize>,
}

fn default_extension() -> String {
    "swift".into()
}
fn default_text_group() -> usize {
    1
}

impl GenstringsConfig {
    /// File-name suffix to match, always with a leading dot.
    pub fn suffix(&self) -> String {
        format!(".{}", self.extension.trim_start_matches('.'))
    }

    /// Built-in rules followed by the configured extras.
    pub fn build_rules(&self) -> Result<Vec<ExtractionRule>> {
        let mut rules = builtin_rules()?;
        for extra in &self.rules {
            rules.push(ExtractionRule::new(
                &extra.name,
                &extra.pattern,
                extra.text_group,
                extra.comment_group,
            )?);
        }
        Ok(rules)
    }
}

/// Load configuration from `$GENSTRINGS_CONFIG` or `./genstrings.toml`.
pub fn load_config() -> Result<GenstringsConfig> {
    let config_path = std::env::var("GENSTRINGS_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config_from(Path::new(&config_path))
}

pub fn load_config_from(config_path: &Path) -> Result<GenstringsConfig> {
    if config_path.exists() {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
        let config: GenstringsConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;
        Ok(config)
    } else {
        tracing::debug!(
            "No config at {}, using built-in rules",
            config_path.display()
        );
        Ok(GenstringsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = GenstringsConfig::default();
        assert_eq!(config.suffix(), ".swift");
        assert_eq!(config.build_rules().unwrap().len(), 6);
    }

    #[test]
    fn test_suffix_accepts_leading_dot() {
        let config: GenstringsConfig = toml::from_str("extension = \".m\"").unwrap();
        assert_eq!(config.suffix(), ".m");
    }

    #[test]
    fn test_extra_rules_appended() {
        let toml_str = r#"
[[rules]]
name = "tr"
pattern = 'Tr\("([^"]*)",\s*"([^"]*)"\)'
comment_group = 2
"#;
        let config: GenstringsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.rules[0].text_group, 1);

        let rules = config.build_rules().unwrap();
        assert_eq!(rules.len(), 7);
        assert_eq!(rules[6].name(), "tr");
    }

    #[test]
    fn test_bad_extra_rule_is_error() {
        let toml_str = r#"
[[rules]]
name = "broken"
pattern = '('
"#;
        let config: GenstringsConfig = toml::from_str(toml_str).unwrap();
        let err = config.build_rules().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("genstrings.toml")).unwrap();
        assert_eq!(config.extension, "swift");
        assert!(config.rules.is_empty());
    }
}
