//! reqcheck core - guild requirement checks for Hypixel players
//!
//! This crate pulls player and guild data from the Mojang and Hypixel APIs,
//! extracts the counters the guild cares about and evaluates them against
//! fixed requirements. Nothing here knows about Discord; the chat layer
//! lives in `reqcheck-discord`.

pub mod api;
pub mod check;
pub mod config;
pub mod error;
pub mod requirements;
pub mod stats;
pub mod utils;

pub use api::{HypixelClient, StatsSource};
pub use check::{
    Caller, Capability, PlayerReport, RosterEntry, RosterReport, RosterSort, check_player,
    check_roster,
};
pub use config::BotConfig;
pub use error::{CheckError, ConfigError, Result};
pub use requirements::{Category, RequirementResult, Requirements, Status};
pub use stats::{GuildMembership, PlayerSnapshot};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        BotConfig, Caller, Capability, Category, CheckError, ConfigError, GuildMembership,
        HypixelClient, PlayerReport, PlayerSnapshot, RequirementResult, Requirements, Result,
        RosterEntry, RosterReport, RosterSort, StatsSource, Status, check_player, check_roster,
    };
}
