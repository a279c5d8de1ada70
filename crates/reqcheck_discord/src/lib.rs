//! reqcheck Discord - slash commands for guild requirement checks
//!
//! This crate wires the checks in `reqcheck-core` to Discord: it registers
//! `/reqcheck` and `/guildcheck`, maps the staff role to the staff
//! capability and renders reports as embeds.

pub mod bot;
pub mod embeds;
pub mod error;
pub mod slash_commands;

pub use bot::{ReqcheckBot, create_discord_client, run_discord_bot};
pub use error::{DiscordError, Result};

// Re-export serenity for convenience
pub use serenity;
