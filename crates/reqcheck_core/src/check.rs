//! The two check operations
//!
//! Both start with a capability check and make no request at all when it
//! fails. Lookups run one after another; the roster check drops any member
//! whose lookup fails.

use std::{collections::BTreeSet, fmt, str::FromStr, time::Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    api::StatsSource,
    error::{CheckError, Result},
    log_warn,
    requirements::{RequirementResult, Requirements, Status},
    stats::{GuildMembership, PlayerSnapshot},
    utils::format_duration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Staff,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Staff => write!(f, "staff"),
        }
    }
}

/// Whoever invoked a check, reduced to what they are allowed to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub name: String,
    capabilities: BTreeSet<Capability>,
}

impl Caller {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: BTreeSet::new(),
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn staff(name: impl Into<String>) -> Self {
        Self::new(name).with_capability(Capability::Staff)
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.has(capability) {
            Ok(())
        } else {
            info!("Denied {} to {}", capability, self.name);
            Err(CheckError::PermissionDenied {
                required: capability,
            })
        }
    }
}

/// Roster ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterSort {
    /// Bedwars wins, descending
    Bedwars,
    /// Weekly guild experience, descending
    Gexp,
}

impl RosterSort {
    pub const CHOICES: [&'static str; 2] = ["bedwars", "gexp"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bedwars => "bedwars",
            Self::Gexp => "gexp",
        }
    }

    /// Parse an optional user-supplied sort key; unknown keys keep fetch order
    pub fn parse_lenient(value: Option<&str>) -> Option<Self> {
        let value = value?;
        match value.parse() {
            Ok(sort) => Some(sort),
            Err(_) => {
                debug!("Ignoring unknown roster sort '{}'", value);
                None
            }
        }
    }
}

impl FromStr for RosterSort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bedwars" => Ok(Self::Bedwars),
            "gexp" => Ok(Self::Gexp),
            other => Err(format!(
                "unknown sort '{}', expected one of: {}",
                other,
                Self::CHOICES.join(", ")
            )),
        }
    }
}

impl fmt::Display for RosterSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the single-player check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerReport {
    pub player: PlayerSnapshot,
    pub guild: GuildMembership,
    pub result: RequirementResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub uuid: String,
    pub name: String,
    pub bedwars_wins: u64,
    pub bedwars_stars: u64,
    pub weekly_experience: u64,
    pub status: Status,
}

/// Result of the roster check, entries in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterReport {
    pub guild_name: String,
    pub entries: Vec<RosterEntry>,
    /// Members dropped because their lookup failed
    pub skipped: usize,
}

impl RosterReport {
    pub fn sort_by(&mut self, sort: RosterSort) {
        // sort_by is stable, ties keep fetch order
        match sort {
            RosterSort::Bedwars => self
                .entries
                .sort_by(|a, b| b.bedwars_wins.cmp(&a.bedwars_wins)),
            RosterSort::Gexp => self
                .entries
                .sort_by(|a, b| b.weekly_experience.cmp(&a.weekly_experience)),
        }
    }
}

/// Minecraft names are 3 to 16 characters of letters, digits and underscores
pub fn is_valid_username(username: &str) -> bool {
    (3..=16).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check one player against every requirement
pub async fn check_player<S>(source: &S, caller: &Caller, username: &str) -> Result<PlayerReport>
where
    S: StatsSource + ?Sized,
{
    caller.require(Capability::Staff)?;

    let username = username.trim();
    if !is_valid_username(username) {
        return Err(CheckError::PlayerNotFound {
            username: username.to_string(),
        });
    }

    info!("{} requested a check of {}", caller.name, username);

    let profile = source
        .resolve_profile(username)
        .await?
        .ok_or_else(|| CheckError::PlayerNotFound {
            username: username.to_string(),
        })?;

    let record = source
        .player(&profile.id)
        .await?
        .ok_or_else(|| CheckError::PlayerDataUnavailable {
            uuid: profile.id.clone(),
        })?;
    let player = PlayerSnapshot::from_record(&profile.id, &record);

    let guild = source.guild_by_player(&profile.id).await?;
    let guild = GuildMembership::from_guild(&profile.id, guild.as_ref());

    let result = Requirements::STANDARD.evaluate(&player, &guild);
    debug!(
        "{} evaluated {} overall ({:?})",
        player.display_name,
        result.overall(),
        result
    );

    Ok(PlayerReport {
        player,
        guild,
        result,
    })
}

/// Check every member of `guild_name` against the Bedwars and experience requirements
pub async fn check_roster<S>(
    source: &S,
    caller: &Caller,
    guild_name: &str,
    sort: Option<RosterSort>,
) -> Result<RosterReport>
where
    S: StatsSource + ?Sized,
{
    caller.require(Capability::Staff)?;

    info!("{} requested a roster check of {}", caller.name, guild_name);
    let started = Instant::now();

    let guild = source
        .guild_by_name(guild_name)
        .await?
        .ok_or_else(|| CheckError::GuildNotFound {
            name: guild_name.to_string(),
        })?;

    let requirements = Requirements::STANDARD;
    let mut entries = Vec::with_capacity(guild.members.len());
    let mut skipped = 0;

    for member in &guild.members {
        let weekly_experience = member.weekly_experience();

        let record = match source.player(&member.uuid).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("No player data for member {}, skipping", member.uuid);
                skipped += 1;
                continue;
            }
            Err(e) => {
                log_warn!(format!("Skipping member {}", member.uuid), e);
                skipped += 1;
                continue;
            }
        };

        let player = PlayerSnapshot::from_record(&member.uuid, &record);
        entries.push(RosterEntry {
            status: requirements.roster_status(
                player.bedwars.wins,
                player.bedwars.stars,
                weekly_experience,
            ),
            uuid: player.uuid,
            name: player.display_name,
            bedwars_wins: player.bedwars.wins,
            bedwars_stars: player.bedwars.stars,
            weekly_experience,
        });
    }

    let mut report = RosterReport {
        guild_name: guild.name.clone().unwrap_or_else(|| guild_name.to_string()),
        entries,
        skipped,
    };
    if let Some(sort) = sort {
        report.sort_by(sort);
    }

    info!(
        "Checked {} of {} members of {} in {}",
        report.entries.len(),
        guild.members.len(),
        report.guild_name,
        format_duration(started.elapsed())
    );

    Ok(report)
}
