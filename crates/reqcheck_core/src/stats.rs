//! Stat extraction
//!
//! Turns the raw API records into flat snapshots. Missing counters are 0 and
//! ratios floor their denominator at 1, so nothing here can fail.

use serde::Serialize;

use crate::{
    api::{GuildRecord, PlayerRecord},
    utils::ratio,
};

pub const UNKNOWN_NAME: &str = "Unknown";
pub const NO_GUILD: &str = "None";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BedwarsStats {
    pub wins: u64,
    pub stars: u64,
    pub final_kills: u64,
    pub final_deaths: u64,
}

impl BedwarsStats {
    /// Final kill / final death ratio
    pub fn fkdr(&self) -> f64 {
        ratio(self.final_kills, self.final_deaths)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DuelsStats {
    pub wins: u64,
    pub losses: u64,
    pub kills: u64,
}

impl DuelsStats {
    pub fn wlr(&self) -> f64 {
        ratio(self.wins, self.losses)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkywarsStats {
    pub stars: u64,
    pub wins: u64,
    pub losses: u64,
}

impl SkywarsStats {
    pub fn wlr(&self) -> f64 {
        ratio(self.wins, self.losses)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkyblockStats {
    pub level: u64,
}

/// Everything the checks know about one player
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    pub uuid: String,
    pub display_name: String,
    pub bedwars: BedwarsStats,
    pub duels: DuelsStats,
    pub skywars: SkywarsStats,
    pub skyblock: SkyblockStats,
}

impl PlayerSnapshot {
    pub fn from_record(uuid: &str, record: &PlayerRecord) -> Self {
        let stats = &record.stats;
        let achievements = &record.achievements;

        Self {
            uuid: uuid.to_string(),
            display_name: record
                .displayname
                .clone()
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            bedwars: BedwarsStats {
                wins: stats.bedwars.wins_bedwars,
                stars: achievements.bedwars_level,
                final_kills: stats.bedwars.final_kills_bedwars,
                final_deaths: stats.bedwars.final_deaths_bedwars,
            },
            duels: DuelsStats {
                wins: stats.duels.wins,
                losses: stats.duels.losses,
                kills: stats.duels.kills,
            },
            skywars: SkywarsStats {
                stars: achievements.skywars_you_re_a_star,
                wins: stats.skywars.wins,
                losses: stats.skywars.losses,
            },
            skyblock: SkyblockStats {
                level: achievements.skyblock_leveling,
            },
        }
    }
}

/// A player's standing in their current guild
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GuildMembership {
    pub uuid: String,
    pub guild_name: Option<String>,
    pub weekly_experience: u64,
}

impl GuildMembership {
    /// Build from the player's guild lookup; no guild means no experience
    pub fn from_guild(uuid: &str, guild: Option<&GuildRecord>) -> Self {
        let Some(guild) = guild else {
            return Self {
                uuid: uuid.to_string(),
                ..Self::default()
            };
        };

        let weekly_experience = guild
            .member(uuid)
            .map(|m| m.weekly_experience())
            .unwrap_or(0);

        Self {
            uuid: uuid.to_string(),
            guild_name: Some(
                guild
                    .name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            ),
            weekly_experience,
        }
    }

    /// Name to show, `"None"` when the player has no guild
    pub fn display_guild(&self) -> &str {
        self.guild_name.as_deref().unwrap_or(NO_GUILD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GuildMemberRecord;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const UUID: &str = "b876ec32e396476ba1158438d83c67d4";

    #[test]
    fn test_snapshot_from_full_record() {
        let record: PlayerRecord = serde_json::from_value(json!({
            "displayname": "Technoblade",
            "stats": {
                "Bedwars": {
                    "wins_bedwars": 3100,
                    "final_kills_bedwars": 9000,
                    "final_deaths_bedwars": 1200
                },
                "Duels": { "wins": 8000, "losses": 2000, "kills": 15000 },
                "SkyWars": { "wins": 400, "losses": 300 }
            },
            "achievements": {
                "bedwars_level": 512,
                "skywars_you_re_a_star": 18,
                "skyblock_leveling": 210
            }
        }))
        .unwrap();

        let snapshot = PlayerSnapshot::from_record(UUID, &record);

        assert_eq!(
            snapshot,
            PlayerSnapshot {
                uuid: UUID.to_string(),
                display_name: "Technoblade".to_string(),
                bedwars: BedwarsStats {
                    wins: 3100,
                    stars: 512,
                    final_kills: 9000,
                    final_deaths: 1200,
                },
                duels: DuelsStats {
                    wins: 8000,
                    losses: 2000,
                    kills: 15000,
                },
                skywars: SkywarsStats {
                    stars: 18,
                    wins: 400,
                    losses: 300,
                },
                skyblock: SkyblockStats { level: 210 },
            }
        );
        assert_eq!(snapshot.bedwars.fkdr(), 7.5);
        assert_eq!(snapshot.duels.wlr(), 4.0);
        assert_eq!(snapshot.skywars.wlr(), 1.33);
    }

    #[test]
    fn test_snapshot_from_empty_record() {
        let snapshot = PlayerSnapshot::from_record(UUID, &PlayerRecord::default());

        assert_eq!(snapshot.display_name, UNKNOWN_NAME);
        assert_eq!(snapshot.bedwars, BedwarsStats::default());
        assert_eq!(snapshot.bedwars.fkdr(), 0.0);
        assert_eq!(snapshot.duels.wlr(), 0.0);
    }

    #[test]
    fn test_zero_deaths_behaves_like_one() {
        let zero = BedwarsStats {
            final_kills: 25,
            final_deaths: 0,
            ..Default::default()
        };
        let one = BedwarsStats {
            final_deaths: 1,
            ..zero.clone()
        };
        assert_eq!(zero.fkdr(), one.fkdr());
        assert_eq!(zero.fkdr(), 25.0);
    }

    #[test]
    fn test_membership() {
        let guild = GuildRecord {
            name: Some("Defeat".to_string()),
            members: vec![GuildMemberRecord {
                uuid: UUID.to_string(),
                exp_history: [("2025-06-14".to_string(), 60000), ("2025-06-13".to_string(), 45000)]
                    .into_iter()
                    .collect(),
            }],
        };

        let membership = GuildMembership::from_guild(UUID, Some(&guild));
        assert_eq!(membership.display_guild(), "Defeat");
        assert_eq!(membership.weekly_experience, 105000);

        let outsider = GuildMembership::from_guild("069a79f444e94726a5befca90e38aaf5", Some(&guild));
        assert_eq!(outsider.display_guild(), "Defeat");
        assert_eq!(outsider.weekly_experience, 0);

        let guildless = GuildMembership::from_guild(UUID, None);
        assert_eq!(guildless.display_guild(), NO_GUILD);
        assert_eq!(guildless.weekly_experience, 0);
    }
}
