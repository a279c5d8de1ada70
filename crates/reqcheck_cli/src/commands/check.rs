//! Run the checks from a terminal
//!
//! Whoever can read the config file holds the credentials already, so the
//! local operator is treated as staff. Failures are returned for miette to
//! render, not printed here.

use miette::Result;
use reqcheck_core::{
    BotConfig, Caller, HypixelClient, RosterSort, StatsSource, check_player, check_roster,
};

use crate::output::Output;

fn local_caller() -> Caller {
    Caller::staff("cli")
}

/// Check one player and print the report
pub async fn player(config: &BotConfig, username: &str) -> Result<()> {
    let client = HypixelClient::new(&config.hypixel)?;
    player_from(&Output::new(), &client, username).await
}

async fn player_from<S>(output: &Output, source: &S, username: &str) -> Result<()>
where
    S: StatsSource + ?Sized,
{
    output.status(&format!("Checking {}...", username));
    let report = check_player(source, &local_caller(), username).await?;
    output.player_report(&report);
    Ok(())
}

/// Check the configured guild and print one line per member
pub async fn roster(config: &BotConfig, sort: Option<RosterSort>) -> Result<()> {
    let client = HypixelClient::new(&config.hypixel)?;
    roster_from(&Output::new(), &client, &config.guild_name, sort).await
}

async fn roster_from<S>(
    output: &Output,
    source: &S,
    guild_name: &str,
    sort: Option<RosterSort>,
) -> Result<()>
where
    S: StatsSource + ?Sized,
{
    output.status(&format!("Checking every member of {}...", guild_name));
    let report = check_roster(source, &local_caller(), guild_name, sort).await?;
    output.roster_report(&report);
    Ok(())
}
