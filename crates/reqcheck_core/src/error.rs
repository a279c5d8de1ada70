use miette::Diagnostic;
use thiserror::Error;

use crate::check::Capability;

#[derive(Error, Diagnostic, Debug)]
pub enum CheckError {
    #[error("Player '{username}' not found")]
    #[diagnostic(
        code(reqcheck_core::player_not_found),
        help("Mojang has no profile for this username, check the spelling")
    )]
    PlayerNotFound { username: String },

    #[error("No Hypixel data for player {uuid}")]
    #[diagnostic(
        code(reqcheck_core::player_data_unavailable),
        help("The player may never have joined Hypixel")
    )]
    PlayerDataUnavailable { uuid: String },

    #[error("Guild '{name}' not found")]
    #[diagnostic(
        code(reqcheck_core::guild_not_found),
        help("Check the configured guild name")
    )]
    GuildNotFound { name: String },

    #[error("Request to {endpoint} failed")]
    #[diagnostic(
        code(reqcheck_core::fetch_failed),
        help("The API may be down or returned a body that could not be decoded")
    )]
    FetchFailed {
        endpoint: String,
        #[source]
        cause: reqwest::Error,
    },

    #[error("{endpoint} rejected the request: {cause}")]
    #[diagnostic(
        code(reqcheck_core::api_rejected),
        help("Check that the Hypixel API key is valid and not rate limited")
    )]
    ApiRejected { endpoint: String, cause: String },

    #[error("Permission denied")]
    #[diagnostic(
        code(reqcheck_core::permission_denied),
        help("Caller lacks the '{required}' capability")
    )]
    PermissionDenied { required: Capability },
}

pub type Result<T> = std::result::Result<T, CheckError>;

impl CheckError {
    pub fn fetch_failed(endpoint: impl Into<String>, cause: reqwest::Error) -> Self {
        Self::FetchFailed {
            endpoint: endpoint.into(),
            cause,
        }
    }

    pub fn api_rejected(endpoint: impl Into<String>, cause: Option<String>) -> Self {
        Self::ApiRejected {
            endpoint: endpoint.into(),
            cause: cause.unwrap_or_else(|| "no cause given".to_string()),
        }
    }

    /// The text shown to the person who invoked the command
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PlayerNotFound { .. } => "❌ Could not find that player.",
            Self::PlayerDataUnavailable { .. } => "❌ Failed to fetch player data.",
            Self::GuildNotFound { .. } => "❌ Failed to fetch guild data.",
            Self::FetchFailed { .. } | Self::ApiRejected { .. } => {
                "❌ The Hypixel API request failed. Try again later."
            }
            Self::PermissionDenied { .. } => "❌ You don't have permission to use this command.",
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("Missing configuration value '{field}'")]
    #[diagnostic(
        code(reqcheck_core::config::missing),
        help("Set {env_var} in the environment or '{field}' in the config file")
    )]
    Missing { field: String, env_var: String },

    #[error("Invalid configuration value for '{field}'")]
    #[diagnostic(code(reqcheck_core::config::invalid), help("{reason}"))]
    Invalid { field: String, reason: String },

    #[error("Could not read config file {path}")]
    #[diagnostic(code(reqcheck_core::config::unreadable))]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file")]
    #[diagnostic(
        code(reqcheck_core::config::parse_failed),
        help("The config file must be valid TOML")
    )]
    ParseFailed {
        #[source]
        source: toml::de::Error,
    },
}
