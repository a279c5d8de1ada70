//! Embed rendering for check reports

use chrono::NaiveTime;
use reqcheck_core::{
    Category, PlayerReport, RosterEntry, RosterReport, Status, config::Branding,
};
use serenity::{
    builder::{CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter},
    model::colour::Colour,
};

pub const MAX_EMBED_FIELDS: usize = 25;
pub const MAX_EMBEDS_PER_MESSAGE: usize = 10;
pub const MAX_MESSAGE_EMBED_CHARS: usize = 6000;

const ROSTER_TITLE: &str = "Guild Requirement Check";
const ROSTER_DESCRIPTION: &str = "Shows Bedwars Wins + Weekly GEXP requirement compliance.";
const EMPTY_ROSTER: &str = "No members could be checked.";

pub fn circle(status: Status) -> &'static str {
    match status {
        Status::Pass => "🟢",
        Status::Partial => "🟡",
        Status::Fail => "🔴",
    }
}

pub fn avatar_url(name: &str) -> String {
    format!("https://minotar.net/helm/{}/150.png", name)
}

/// (name, value) for each inline field of the player embed
pub fn player_fields(report: &PlayerReport) -> Vec<(String, String)> {
    let player = &report.player;
    let heading = |category: Category| {
        format!(
            "{} {}",
            category.label(),
            circle(report.result.category(category))
        )
    };

    vec![
        (
            heading(Category::Bedwars),
            format!(
                "Wins: **{}**\nStars: **{}**\nFKDR: **{:?}**",
                player.bedwars.wins,
                player.bedwars.stars,
                player.bedwars.fkdr()
            ),
        ),
        (
            heading(Category::Duels),
            format!(
                "Wins: **{}**\nWLR: **{:?}**\nKills: **{}**",
                player.duels.wins,
                player.duels.wlr(),
                player.duels.kills
            ),
        ),
        (
            heading(Category::Skywars),
            format!(
                "Stars: **{}**\nWLR: **{:?}**",
                player.skywars.stars,
                player.skywars.wlr()
            ),
        ),
        (
            heading(Category::Skyblock),
            format!("Level: **{}**\nNetworth: **N/A**", player.skyblock.level),
        ),
        (
            heading(Category::GuildExperience),
            format!(
                "Current Guild: **{}**\nGEXP: **{}**",
                report.guild.display_guild(),
                report.guild.weekly_experience
            ),
        ),
    ]
}

pub fn player_footer(now: NaiveTime, branding: &Branding) -> String {
    format!("Today at {} | {}", now.format("%H:%M"), branding.footer_brand)
}

/// The detailed `/reqcheck` embed
pub fn player_embed(report: &PlayerReport, branding: &Branding, now: NaiveTime) -> CreateEmbed {
    let name = &report.player.display_name;

    let mut embed = CreateEmbed::new()
        .description(format!("Below is the requirement check for **{}**!", name))
        .colour(Colour::DARK_PURPLE)
        .author(
            CreateEmbedAuthor::new(format!("{} | {}", name, report.guild.display_guild()))
                .icon_url(avatar_url(name)),
        );

    if let Some(banner) = &branding.banner_url {
        embed = embed.image(banner);
    }

    embed
        .fields(
            player_fields(report)
                .into_iter()
                .map(|(name, value)| (name, value, true)),
        )
        .footer(CreateEmbedFooter::new(player_footer(now, branding)))
}

pub fn roster_field(entry: &RosterEntry) -> (String, String) {
    (
        format!("{} | {}", circle(entry.status), entry.name),
        format!(
            "**Bedwars Wins:** {}\n**GEXP:** {}",
            entry.bedwars_wins, entry.weekly_experience
        ),
    )
}

pub fn roster_footer(report: &RosterReport) -> String {
    format!(
        "{} checked · {} skipped",
        report.entries.len(),
        report.skipped
    )
}

/// One embed's worth of roster output, with the character count Discord limits on
#[derive(Debug, Clone)]
struct RosterChunk {
    embed: CreateEmbed,
    chars: usize,
}

fn roster_chunks(report: &RosterReport, branding: &Branding) -> Vec<RosterChunk> {
    let fields: Vec<(String, String)> = report.entries.iter().map(roster_field).collect();
    let footer = roster_footer(report);
    let groups: Vec<&[(String, String)]> = if fields.is_empty() {
        vec![&[]]
    } else {
        fields.chunks(MAX_EMBED_FIELDS).collect()
    };
    let last = groups.len() - 1;

    groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let mut embed = CreateEmbed::new().colour(Colour::BLUE);
            let mut chars = 0;

            if i == 0 {
                let description = if fields.is_empty() {
                    format!("{}\n{}", ROSTER_DESCRIPTION, EMPTY_ROSTER)
                } else {
                    ROSTER_DESCRIPTION.to_string()
                };
                chars += ROSTER_TITLE.chars().count() + description.chars().count();
                embed = embed.title(ROSTER_TITLE).description(description);
                if let Some(banner) = &branding.banner_url {
                    embed = embed.image(banner);
                }
            }

            for (name, value) in group {
                chars += name.chars().count() + value.chars().count();
            }
            embed = embed.fields(group.iter().map(|(n, v)| (n.clone(), v.clone(), false)));

            if i == last {
                chars += footer.chars().count();
                embed = embed.footer(CreateEmbedFooter::new(footer.clone()));
            }

            RosterChunk { embed, chars }
        })
        .collect()
}

/// Pack chunk sizes into messages without crossing the per-message limits,
/// returning how many chunks go into each message
fn pack_messages(sizes: &[usize]) -> Vec<usize> {
    let mut messages = Vec::new();
    let mut count = 0;
    let mut chars = 0;

    for size in sizes {
        if count > 0
            && (count == MAX_EMBEDS_PER_MESSAGE || chars + size > MAX_MESSAGE_EMBED_CHARS)
        {
            messages.push(count);
            count = 0;
            chars = 0;
        }
        count += 1;
        chars += size;
    }
    if count > 0 {
        messages.push(count);
    }

    messages
}

/// The `/guildcheck` output, one `Vec` of embeds per message to send
pub fn roster_messages(report: &RosterReport, branding: &Branding) -> Vec<Vec<CreateEmbed>> {
    let chunks = roster_chunks(report, branding);
    let sizes: Vec<usize> = chunks.iter().map(|c| c.chars).collect();

    let mut chunks = chunks.into_iter();
    pack_messages(&sizes)
        .into_iter()
        .map(|n| chunks.by_ref().take(n).map(|c| c.embed).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqcheck_core::{
        GuildMembership, PlayerSnapshot, Requirements,
        stats::{BedwarsStats, DuelsStats, SkyblockStats, SkywarsStats},
    };
    use serde_json::Value;

    fn report() -> PlayerReport {
        let player = PlayerSnapshot {
            uuid: "b876ec32e396476ba1158438d83c67d4".to_string(),
            display_name: "Technoblade".to_string(),
            bedwars: BedwarsStats {
                wins: 3100,
                stars: 512,
                final_kills: 9000,
                final_deaths: 1200,
            },
            duels: DuelsStats {
                wins: 7000,
                losses: 1000,
                kills: 15000,
            },
            skywars: SkywarsStats {
                stars: 18,
                wins: 400,
                losses: 300,
            },
            skyblock: SkyblockStats { level: 120 },
        };
        let guild = GuildMembership {
            uuid: player.uuid.clone(),
            guild_name: Some("Defeat".to_string()),
            weekly_experience: 150_000,
        };
        let result = Requirements::STANDARD.evaluate(&player, &guild);
        PlayerReport {
            player,
            guild,
            result,
        }
    }

    fn entry(i: usize) -> RosterEntry {
        RosterEntry {
            uuid: format!("uuid-{i}"),
            name: format!("Member{i}"),
            bedwars_wins: 3000,
            bedwars_stars: 350,
            weekly_experience: 50_000,
            status: Status::Partial,
        }
    }

    fn roster(n: usize) -> RosterReport {
        RosterReport {
            guild_name: "Defeat".to_string(),
            entries: (0..n).map(entry).collect(),
            skipped: 1,
        }
    }

    fn to_json(embed: &CreateEmbed) -> Value {
        serde_json::to_value(embed).unwrap()
    }

    #[test]
    fn test_player_fields() {
        let fields = player_fields(&report());

        assert_eq!(
            fields,
            vec![
                (
                    "Bedwars 🟢".to_string(),
                    "Wins: **3100**\nStars: **512**\nFKDR: **7.5**".to_string()
                ),
                (
                    "Duels 🔴".to_string(),
                    "Wins: **7000**\nWLR: **7.0**\nKills: **15000**".to_string()
                ),
                (
                    "Skywars 🟢".to_string(),
                    "Stars: **18**\nWLR: **1.33**".to_string()
                ),
                (
                    "Skyblock 🔴".to_string(),
                    "Level: **120**\nNetworth: **N/A**".to_string()
                ),
                (
                    "Guild 🟢".to_string(),
                    "Current Guild: **Defeat**\nGEXP: **150000**".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_player_embed() {
        let branding = Branding {
            footer_brand: "Defeat Guild".to_string(),
            banner_url: Some("https://example.com/banner.png".to_string()),
        };
        let now = NaiveTime::from_hms_opt(9, 5, 0).unwrap();
        let json = to_json(&player_embed(&report(), &branding, now));

        assert_eq!(json["author"]["name"], "Technoblade | Defeat");
        assert_eq!(
            json["author"]["icon_url"],
            "https://minotar.net/helm/Technoblade/150.png"
        );
        assert_eq!(json["footer"]["text"], "Today at 09:05 | Defeat Guild");
        assert_eq!(json["image"]["url"], "https://example.com/banner.png");
        assert_eq!(json["fields"].as_array().unwrap().len(), 5);
        assert_eq!(json["fields"][0]["inline"], true);
    }

    #[test]
    fn test_roster_field() {
        let (name, value) = roster_field(&entry(3));
        assert_eq!(name, "🟡 | Member3");
        assert_eq!(value, "**Bedwars Wins:** 3000\n**GEXP:** 50000");
    }

    #[test]
    fn test_small_roster_is_one_embed() {
        let messages = roster_messages(&roster(3), &Branding::default());
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].len(), 1);

        let json = to_json(&messages[0][0]);
        assert_eq!(json["title"], ROSTER_TITLE);
        assert_eq!(json["fields"].as_array().unwrap().len(), 3);
        assert_eq!(json["fields"][0]["inline"], false);
        assert_eq!(json["footer"]["text"], "3 checked · 1 skipped");
    }

    #[test]
    fn test_large_roster_respects_limits() {
        let messages = roster_messages(&roster(125), &Branding::default());

        let embeds: Vec<Value> = messages.iter().flatten().map(to_json).collect();
        assert_eq!(embeds.len(), 5);

        let total_fields: usize = embeds
            .iter()
            .map(|e| e["fields"].as_array().map_or(0, |f| f.len()))
            .sum();
        assert_eq!(total_fields, 125);
        assert!(embeds.iter().all(|e| {
            e["fields"].as_array().map_or(0, |f| f.len()) <= MAX_EMBED_FIELDS
        }));
        assert!(messages.iter().all(|m| m.len() <= MAX_EMBEDS_PER_MESSAGE));
        assert!(messages.len() > 1);

        assert_eq!(embeds[0]["title"], ROSTER_TITLE);
        assert!(embeds[1].get("title").is_none_or(Value::is_null));
        assert_eq!(embeds[4]["footer"]["text"], "125 checked · 1 skipped");
    }

    #[test]
    fn test_empty_roster() {
        let mut report = roster(0);
        report.skipped = 4;
        let messages = roster_messages(&report, &Branding::default());

        assert_eq!(messages.len(), 1);
        let json = to_json(&messages[0][0]);
        assert!(json["description"].as_str().unwrap().contains(EMPTY_ROSTER));
        assert_eq!(json["footer"]["text"], "0 checked · 4 skipped");
    }

    #[test]
    fn test_pack_messages() {
        assert_eq!(pack_messages(&[]), Vec::<usize>::new());
        assert_eq!(pack_messages(&[100; 12]), vec![10, 2]);
        assert_eq!(pack_messages(&[2500, 2500, 2500]), vec![2, 1]);
        assert_eq!(pack_messages(&[7000, 10]), vec![1, 1]);
    }
}
