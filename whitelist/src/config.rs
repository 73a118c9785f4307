//! Whitelister configuration loading and parsing

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "/etc/ngtools/whitelist.toml";

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct WhitelistConfig {
    #[serde(default)]
    pub ssh: SshConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub firewall: FirewallConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SshConfig {
    #[serde(default = "default_ssh_port")]
    pub port: u16,
    #[serde(default = "default_ssh_username")]
    pub username: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            port: default_ssh_port(),
            username: default_ssh_username(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LookupConfig {
    #[serde(default = "default_lookup_url")]
    pub url: String,
    #[serde(default = "default_lookup_timeout")]
    pub timeout_seconds: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            url: default_lookup_url(),
            timeout_seconds: default_lookup_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FirewallConfig {
    #[serde(default = "default_status_command")]
    pub status_command: String,
    /// `{ip}` is replaced with the caller's public address
    #[serde(default = "default_allow_command")]
    pub allow_command: String,
}

impl Default for FirewallConfig {
    fn default() -> Self {
        Self {
            status_command: default_status_command(),
            allow_command: default_allow_command(),
        }
    }
}

fn default_ssh_port() -> u16 {
    22
}
fn default_ssh_username() -> String {
    "root".into()
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_lookup_url() -> String {
    "https://api.ipify.org".into()
}
fn default_lookup_timeout() -> u64 {
    15
}
fn default_status_command() -> String {
    "sudo ufw status".into()
}
fn default_allow_command() -> String {
    "sudo ufw allow from {ip}".into()
}

/// Load configuration from `$WHITELIST_CONFIG` or the default path.
pub fn load_config() -> Result<WhitelistConfig> {
    let config_path = std::env::var("WHITELIST_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config_from(Path::new(&config_path))
}

pub fn load_config_from(config_path: &Path) -> Result<WhitelistConfig> {
    if config_path.exists() {
        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
        let config: WhitelistConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;
        Ok(config)
    } else {
        tracing::warn!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        Ok(WhitelistConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = WhitelistConfig::default();
        assert_eq!(config.ssh.port, 22);
        assert_eq!(config.ssh.username, "root");
        assert_eq!(config.lookup.url, "https://api.ipify.org");
        assert_eq!(config.firewall.status_command, "sudo ufw status");
        assert_eq!(config.firewall.allow_command, "sudo ufw allow from {ip}");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[ssh]
port = 2222

[firewall]
allow_command = "ufw allow from {ip} to any port 443"
"#;
        let config: WhitelistConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.ssh.port, 2222);
        assert_eq!(config.ssh.username, "root");
        assert_eq!(config.ssh.connect_timeout_seconds, 10);
        assert_eq!(config.lookup.timeout_seconds, 15);
        assert_eq!(config.firewall.status_command, "sudo ufw status");
        assert_eq!(
            config.firewall.allow_command,
            "ufw allow from {ip} to any port 443"
        );
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.ssh.port, 22);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("whitelist.toml");
        std::fs::write(&path, "[lookup]\nurl = \"https://ifconfig.me/ip\"\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.lookup.url, "https://ifconfig.me/ip");
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("whitelist.toml");
        std::fs::write(&path, "[ssh]\nport = \"twenty-two\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }
}
