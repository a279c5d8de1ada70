use std::sync::Arc;

use miette::Result;
use reqcheck_core::{BotConfig, log_error};
use serenity::{
    async_trait,
    client::{Client, Context, EventHandler},
    model::{
        application::{Command, Interaction},
        gateway::{GatewayIntents, Ready},
        id::ApplicationId,
    },
};
use tracing::{info, warn};

use crate::{
    error::DiscordError,
    slash_commands::{
        GUILDCHECK, REQCHECK, create_commands, handle_guildcheck_command,
        handle_reqcheck_command,
    },
};

/// Discord event handler for the requirement check commands
pub struct ReqcheckBot {
    config: Arc<BotConfig>,
}

impl ReqcheckBot {
    pub fn new(config: Arc<BotConfig>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EventHandler for ReqcheckBot {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        let commands = create_commands();
        match Command::set_global_commands(&ctx.http, commands).await {
            Ok(registered) => info!("Registered {} slash command(s)", registered.len()),
            Err(cause) => log_error!(DiscordError::CommandRegistrationFailed {
                command_names: vec![REQCHECK.to_string(), GUILDCHECK.to_string()],
                cause,
            }),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        info!(
            "Received slash command: {} from user {}",
            command.data.name, command.user.name
        );

        let outcome = match command.data.name.as_str() {
            REQCHECK => handle_reqcheck_command(&ctx, &command, &self.config).await,
            GUILDCHECK => handle_guildcheck_command(&ctx, &command, &self.config).await,
            _ => {
                warn!("Unknown command: {}", command.data.name);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            log_error!(format!("/{} handler failed", command.data.name), e);
        }
    }
}

/// Build the serenity client with the handler attached
pub async fn create_discord_client(config: Arc<BotConfig>) -> Result<Client> {
    let token = config.discord.token.clone();
    let application_id = config.discord.application_id;
    let handler = ReqcheckBot::new(config);

    let intents = GatewayIntents::non_privileged();

    let mut client_builder = Client::builder(&token, intents).event_handler(handler);

    if let Some(app_id) = application_id.filter(|id| *id != 0) {
        client_builder = client_builder.application_id(ApplicationId::new(app_id));
    }

    let client = client_builder
        .await
        .map_err(|cause| DiscordError::auth_failed(cause, &token))?;

    Ok(client)
}

/// Create and run the Discord bot until the gateway connection ends
pub async fn run_discord_bot(config: Arc<BotConfig>) -> Result<()> {
    let mut client = create_discord_client(config).await?;

    info!("Starting Discord bot...");
    client
        .start()
        .await
        .map_err(|cause| DiscordError::GatewayConnectionLost { cause })?;

    Ok(())
}
