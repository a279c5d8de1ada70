use miette::Diagnostic;
use reqcheck_core::config::preview_secret;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum DiscordError {
    #[error("Discord authentication failed")]
    #[diagnostic(
        code(reqcheck_discord::auth_failed),
        help("Check that your Discord bot token is valid and has not been regenerated")
    )]
    AuthenticationFailed {
        #[source]
        cause: serenity::Error,
        token_preview: String, // First/last few chars of token for debugging
    },

    #[error("Gateway connection lost")]
    #[diagnostic(
        code(reqcheck_discord::gateway_connection_lost),
        help("Lost connection to the Discord gateway")
    )]
    GatewayConnectionLost {
        #[source]
        cause: serenity::Error,
    },

    #[error("Command registration failed")]
    #[diagnostic(
        code(reqcheck_discord::command_registration_failed),
        help("Failed to register slash commands: {}", command_names.join(", "))
    )]
    CommandRegistrationFailed {
        command_names: Vec<String>,
        #[source]
        cause: serenity::Error,
    },

    #[error("Interaction failed")]
    #[diagnostic(
        code(reqcheck_discord::interaction_failed),
        help("Failed to respond to /{command_name} for user {user_id}")
    )]
    InteractionFailed {
        command_name: String,
        interaction_id: String,
        user_id: String,
        #[source]
        cause: serenity::Error,
        responded: bool,
    },
}

pub type Result<T> = std::result::Result<T, DiscordError>;

impl DiscordError {
    pub fn auth_failed(cause: serenity::Error, token: &str) -> Self {
        Self::AuthenticationFailed {
            cause,
            token_preview: preview_secret(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    #[test]
    fn test_auth_error_hides_token() {
        let fake_error = serenity::Error::Other("test");
        let error = DiscordError::auth_failed(
            fake_error,
            "MTE2MzU5NzE0MjQ5NzI1NTQyNA.GqvKfH.verysecrettoken",
        );

        if let DiscordError::AuthenticationFailed { token_preview, .. } = &error {
            assert_eq!(token_preview, "MTE2Mz...oken");
            assert!(!token_preview.contains("secret"));
        }
    }

    #[test]
    fn test_registration_error_lists_commands() {
        let error = DiscordError::CommandRegistrationFailed {
            command_names: vec!["reqcheck".to_string(), "guildcheck".to_string()],
            cause: serenity::Error::Other("rejected"),
        };

        let output = format!("{:?}", Report::new(error));
        assert!(output.contains("command_registration_failed"));
        assert!(output.contains("reqcheck, guildcheck"));
    }
}
