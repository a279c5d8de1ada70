//! Configuration for the bot
//!
//! Everything the bot needs from the outside world lives in one [`BotConfig`]:
//! an optional TOML file provides the base values and environment variables
//! override them. [`BotConfig::validate`] runs after both are applied.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "reqcheck.toml";
pub const DEFAULT_HYPIXEL_BASE_URL: &str = "https://api.hypixel.net";
pub const DEFAULT_MOJANG_BASE_URL: &str = "https://api.mojang.com";
pub const DEFAULT_FOOTER_BRAND: &str = "Defeat Guild";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BotConfig {
    /// Name of the guild whose roster `guildcheck` inspects
    #[serde(default)]
    pub guild_name: String,
    /// Discord bot configuration
    #[serde(default)]
    pub discord: DiscordSettings,
    /// Hypixel and Mojang API configuration
    #[serde(default)]
    pub hypixel: HypixelSettings,
    /// Cosmetic embed settings
    #[serde(default)]
    pub branding: Branding,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscordSettings {
    /// Discord bot token
    #[serde(default)]
    pub token: String,
    /// Discord application ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_id: Option<u64>,
    /// Role that grants the staff capability
    #[serde(default)]
    pub staff_role_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HypixelSettings {
    /// Hypixel API key, sent as the `key` query parameter
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_hypixel_base_url")]
    pub base_url: String,
    #[serde(default = "default_mojang_base_url")]
    pub mojang_base_url: String,
}

impl Default for HypixelSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_hypixel_base_url(),
            mojang_base_url: default_mojang_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branding {
    /// Text after the clock in the player embed footer
    #[serde(default = "default_footer_brand")]
    pub footer_brand: String,
    /// Banner image attached to both embeds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner_url: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            footer_brand: default_footer_brand(),
            banner_url: None,
        }
    }
}

fn default_hypixel_base_url() -> String {
    DEFAULT_HYPIXEL_BASE_URL.to_string()
}

fn default_mojang_base_url() -> String {
    DEFAULT_MOJANG_BASE_URL.to_string()
}

fn default_footer_brand() -> String {
    DEFAULT_FOOTER_BRAND.to_string()
}

impl BotConfig {
    /// Load configuration from the config file (if any) and the process environment
    ///
    /// An explicit `path` must exist. Without one, `REQCHECK_CONFIG` or
    /// `reqcheck.toml` is used when present and skipped otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Same as [`BotConfig::load`] with a custom variable lookup
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path =
                    lookup("REQCHECK_CONFIG").unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
                let default_path = Path::new(&default_path);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        let config = config.override_from(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file without applying overrides or validating
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::ParseFailed { source })
    }

    /// Override config values with variables from `lookup`
    pub fn override_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("DISCORD_TOKEN") {
            self.discord.token = token;
        }
        if let Some(app_id) = lookup("APP_ID") {
            self.discord.application_id = Some(parse_id("discord.application_id", &app_id)?);
        }
        if let Some(role_id) = lookup("STAFF_ROLE_ID") {
            self.discord.staff_role_id = parse_id("discord.staff_role_id", &role_id)?;
        }

        if let Some(key) = lookup("HYPIXEL_API_KEY") {
            self.hypixel.api_key = key;
        }
        if let Some(url) = lookup("HYPIXEL_BASE_URL") {
            self.hypixel.base_url = url;
        }
        if let Some(url) = lookup("MOJANG_BASE_URL") {
            self.hypixel.mojang_base_url = url;
        }

        if let Some(name) = lookup("GUILD_NAME") {
            self.guild_name = name;
        }

        if let Some(brand) = lookup("FOOTER_BRAND") {
            self.branding.footer_brand = brand;
        }
        if let Some(url) = lookup("BANNER_URL") {
            self.branding.banner_url = if url.trim().is_empty() { None } else { Some(url) };
        }

        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty("discord.token", "DISCORD_TOKEN", &self.discord.token)?;
        require_non_empty("hypixel.api_key", "HYPIXEL_API_KEY", &self.hypixel.api_key)?;
        require_non_empty("guild_name", "GUILD_NAME", &self.guild_name)?;

        if self.discord.staff_role_id == 0 {
            return Err(ConfigError::Missing {
                field: "discord.staff_role_id".to_string(),
                env_var: "STAFF_ROLE_ID".to_string(),
            });
        }

        require_http_url("hypixel.base_url", &self.hypixel.base_url)?;
        require_http_url("hypixel.mojang_base_url", &self.hypixel.mojang_base_url)?;
        if let Some(banner) = &self.branding.banner_url {
            require_http_url("branding.banner_url", banner)?;
        }

        Ok(())
    }

    /// Copy of this config with credentials masked, safe to print or log
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.discord.token = preview_secret(&self.discord.token);
        copy.hypixel.api_key = preview_secret(&self.hypixel.api_key);
        copy
    }
}

/// Show first 6 and last 4 characters of a secret, or `***` if it is short
pub fn preview_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 10 {
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "***".to_string()
    }
}

fn parse_id(field: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        field: field.to_string(),
        reason: format!("'{}' is not a numeric Discord ID", value),
    })
}

fn require_non_empty(field: &str, env_var: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Missing {
            field: field.to_string(),
            env_var: env_var.to_string(),
        });
    }
    Ok(())
}

fn require_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.starts_with("https://") || value.starts_with("http://") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: format!("'{}' must be an http(s) URL", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn full_env() -> impl Fn(&str) -> Option<String> {
        env(&[
            ("REQCHECK_CONFIG", "/nonexistent/reqcheck.toml"),
            ("DISCORD_TOKEN", "MTE2MzU5NzE0MjQ5NzI1NTQyNA.GqvKfH.verysecrettoken"),
            ("HYPIXEL_API_KEY", "0f8b7c1e-aaaa-bbbb-cccc-1234567890ab"),
            ("STAFF_ROLE_ID", "1058519179973623888"),
            ("GUILD_NAME", "Defeat"),
        ])
    }

    #[test]
    fn test_load_from_env_only() {
        let config = BotConfig::load_with(None, full_env()).unwrap();

        assert_eq!(config.discord.staff_role_id, 1058519179973623888);
        assert_eq!(config.guild_name, "Defeat");
        assert_eq!(config.hypixel.base_url, DEFAULT_HYPIXEL_BASE_URL);
        assert_eq!(config.hypixel.mojang_base_url, DEFAULT_MOJANG_BASE_URL);
        assert_eq!(config.branding.footer_brand, DEFAULT_FOOTER_BRAND);
        assert_eq!(config.discord.application_id, None);
    }

    #[test]
    fn test_missing_token_is_reported_by_field() {
        let lookup = env(&[
            ("REQCHECK_CONFIG", "/nonexistent/reqcheck.toml"),
            ("HYPIXEL_API_KEY", "key"),
            ("STAFF_ROLE_ID", "42"),
            ("GUILD_NAME", "Defeat"),
        ]);
        let err = BotConfig::load_with(None, lookup).unwrap_err();
        match err {
            ConfigError::Missing { field, env_var } => {
                assert_eq!(field, "discord.token");
                assert_eq!(env_var, "DISCORD_TOKEN");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_role_id_is_invalid() {
        let config = BotConfig::default();
        let err = config
            .override_from(env(&[("STAFF_ROLE_ID", "staff")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "discord.staff_role_id"));
    }

    #[test]
    fn test_zero_role_id_fails_validation() {
        let mut config = BotConfig::load_with(None, full_env()).unwrap();
        config.discord.staff_role_id = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Missing { .. })
        ));
    }

    #[test]
    fn test_toml_then_env_override() {
        let config = BotConfig::from_toml(
            r#"
            guild_name = "FromFile"

            [discord]
            token = "file-token-that-is-long"
            staff_role_id = 7

            [hypixel]
            api_key = "file-key"
            base_url = "http://localhost:8080"

            [branding]
            footer_brand = "Test Guild"
            banner_url = "https://example.com/banner.png"
            "#,
        )
        .unwrap();

        assert_eq!(config.hypixel.mojang_base_url, DEFAULT_MOJANG_BASE_URL);

        let config = config
            .override_from(env(&[("GUILD_NAME", "FromEnv"), ("BANNER_URL", "")]))
            .unwrap();
        config.validate().unwrap();

        assert_eq!(config.guild_name, "FromEnv");
        assert_eq!(config.discord.staff_role_id, 7);
        assert_eq!(config.hypixel.base_url, "http://localhost:8080");
        assert_eq!(config.branding.footer_brand, "Test Guild");
        assert_eq!(config.branding.banner_url, None);
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = BotConfig::load_with(None, full_env()).unwrap();
        config.hypixel.base_url = "api.hypixel.net".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { ref field, .. }) if field == "hypixel.base_url"
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            BotConfig::from_toml("guild_name = "),
            Err(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn test_redacted_hides_secrets() {
        let config = BotConfig::load_with(None, full_env()).unwrap();
        let redacted = config.redacted();

        assert_eq!(redacted.discord.token, "MTE2Mz...oken");
        assert!(!redacted.discord.token.contains("secret"));
        assert_eq!(redacted.hypixel.api_key, "0f8b7c...90ab");
        assert_eq!(redacted.guild_name, config.guild_name);
        assert_eq!(preview_secret("short"), "***");
    }
}
