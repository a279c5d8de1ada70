//! Discord slash command implementations

use miette::Result;
use reqcheck_core::{
    BotConfig, Caller, Capability, CheckError, HypixelClient, RosterSort, check_player,
    check_roster, log_error,
};
use serenity::{
    builder::{
        CreateCommand, CreateCommandOption, CreateEmbed, CreateInteractionResponse,
        CreateInteractionResponseFollowup, CreateInteractionResponseMessage,
    },
    client::Context,
    model::{
        application::{CommandInteraction, CommandOptionType},
        id::RoleId,
    },
};
use tracing::{info, warn};

use crate::{
    embeds::{player_embed, roster_messages},
    error::DiscordError,
};

pub const REQCHECK: &str = "reqcheck";
pub const GUILDCHECK: &str = "guildcheck";

/// Create all slash commands for registration
pub fn create_commands() -> Vec<CreateCommand> {
    let mut sort = CreateCommandOption::new(
        CommandOptionType::String,
        "sort",
        "Sort members by bedwars wins or weekly guild experience",
    )
    .required(false);
    for choice in RosterSort::CHOICES {
        sort = sort.add_string_choice(choice, choice);
    }

    vec![
        CreateCommand::new(REQCHECK)
            .description("Check a player against the guild requirements")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "username",
                    "Minecraft username to check",
                )
                .required(true),
            ),
        CreateCommand::new(GUILDCHECK)
            .description("Check every guild member against the guild requirements")
            .add_option(sort),
    ]
}

/// Map the member's Discord roles onto check capabilities
pub fn caller_for_roles(name: impl Into<String>, roles: &[RoleId], staff_role: u64) -> Caller {
    let caller = Caller::new(name);
    if staff_role != 0 && roles.contains(&RoleId::new(staff_role)) {
        caller.with_capability(Capability::Staff)
    } else {
        caller
    }
}

fn caller_for(command: &CommandInteraction, config: &BotConfig) -> Caller {
    let roles = command
        .member
        .as_ref()
        .map(|member| member.roles.as_slice())
        .unwrap_or_default();
    caller_for_roles(
        command.user.name.clone(),
        roles,
        config.discord.staff_role_id,
    )
}

fn string_option<'a>(command: &'a CommandInteraction, name: &str) -> Option<&'a str> {
    command
        .data
        .options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_str())
}

/// Refuse the command with an ephemeral message when the caller lacks `capability`.
/// Returns true when the command may go ahead.
async fn authorize(
    ctx: &Context,
    command: &CommandInteraction,
    caller: &Caller,
    capability: Capability,
) -> bool {
    let Err(denied) = caller.require(capability) else {
        return true;
    };

    if let Err(e) = command
        .create_response(&ctx.http, denial_response(&denied))
        .await
    {
        log_error!(
            format!("Could not tell {} they were denied", caller.name),
            interaction_failed(command, e, false)
        );
    }
    false
}

/// The ephemeral reply sent instead of running a command
fn denial_response(denied: &CheckError) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(denied.user_message())
            .ephemeral(true),
    )
}

async fn send_followup(
    ctx: &Context,
    command: &CommandInteraction,
    followup: CreateInteractionResponseFollowup,
) -> Result<()> {
    command
        .create_followup(&ctx.http, followup)
        .await
        .map(|_| ())
        .map_err(|e| interaction_failed(command, e, true).into())
}

fn interaction_failed(
    command: &CommandInteraction,
    cause: serenity::Error,
    responded: bool,
) -> DiscordError {
    DiscordError::InteractionFailed {
        command_name: command.data.name.clone(),
        interaction_id: command.id.to_string(),
        user_id: command.user.id.to_string(),
        cause,
        responded,
    }
}

async fn defer(ctx: &Context, command: &CommandInteraction) -> Result<()> {
    command
        .defer(&ctx.http)
        .await
        .map_err(|e| interaction_failed(command, e, false).into())
}

async fn send_check_error(
    ctx: &Context,
    command: &CommandInteraction,
    err: &CheckError,
) -> Result<()> {
    warn!("/{} failed: {}", command.data.name, err);
    send_followup(
        ctx,
        command,
        CreateInteractionResponseFollowup::new().content(err.user_message()),
    )
    .await
}

/// Handle the /reqcheck command
pub async fn handle_reqcheck_command(
    ctx: &Context,
    command: &CommandInteraction,
    config: &BotConfig,
) -> Result<()> {
    let caller = caller_for(command, config);
    if !authorize(ctx, command, &caller, Capability::Staff).await {
        return Ok(());
    }

    let username = string_option(command, "username").unwrap_or_default();

    defer(ctx, command).await?;

    let report = match HypixelClient::new(&config.hypixel) {
        Ok(client) => check_player(&client, &caller, username).await,
        Err(e) => Err(e),
    };

    match report {
        Ok(report) => {
            let now = chrono::Local::now().time();
            let embed = player_embed(&report, &config.branding, now);
            send_followup(
                ctx,
                command,
                CreateInteractionResponseFollowup::new().embed(embed),
            )
            .await
        }
        Err(e) => send_check_error(ctx, command, &e).await,
    }
}

/// Handle the /guildcheck command
pub async fn handle_guildcheck_command(
    ctx: &Context,
    command: &CommandInteraction,
    config: &BotConfig,
) -> Result<()> {
    let caller = caller_for(command, config);
    if !authorize(ctx, command, &caller, Capability::Staff).await {
        return Ok(());
    }

    let sort = RosterSort::parse_lenient(string_option(command, "sort"));

    defer(ctx, command).await?;

    let report = match HypixelClient::new(&config.hypixel) {
        Ok(client) => check_roster(&client, &caller, &config.guild_name, sort).await,
        Err(e) => Err(e),
    };

    let report = match report {
        Ok(report) => report,
        Err(e) => return send_check_error(ctx, command, &e).await,
    };

    let messages = roster_messages(&report, &config.branding);
    info!(
        "Sending {} roster message(s) for {} ({} checked, {} skipped)",
        messages.len(),
        report.guild_name,
        report.entries.len(),
        report.skipped
    );

    for embeds in messages {
        send_roster_message(ctx, command, embeds).await?;
    }

    Ok(())
}

async fn send_roster_message(
    ctx: &Context,
    command: &CommandInteraction,
    embeds: Vec<CreateEmbed>,
) -> Result<()> {
    send_followup(
        ctx,
        command,
        CreateInteractionResponseFollowup::new().embeds(embeds),
    )
    .await
}
