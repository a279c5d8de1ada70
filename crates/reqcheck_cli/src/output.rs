use owo_colors::OwoColorize;
use reqcheck_core::{Category, PlayerReport, RosterEntry, RosterReport, Status};

/// Standard output formatting for the CLI
#[derive(Default)]
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    /// Print a system/status message (indented)
    pub fn status(&self, message: &str) {
        println!("  {}", message.dimmed());
    }

    /// Print an info message (indented)
    pub fn info(&self, label: &str, value: &str) {
        println!("  {} {}", label.bright_blue(), value);
    }

    /// Print a section header
    pub fn section(&self, title: &str) {
        println!();
        println!("{}", title.bright_cyan().bold());
        println!("{}", "─".repeat(40).dimmed());
    }

    /// Print a list item (already indented)
    pub fn list_item(&self, item: &str) {
        println!("    • {}", item);
    }

    /// Print a single-player check the way the embed lays it out
    pub fn player_report(&self, report: &PlayerReport) {
        let player = &report.player;
        self.section(&format!(
            "{} | {}",
            player.display_name,
            report.guild.display_guild()
        ));

        for category in Category::ALL {
            let status = report.result.category(category);
            println!();
            println!("  {} {}", status_marker(status), category.label().bold());
            for line in category_lines(report, category) {
                self.list_item(&line);
            }
        }

        println!();
        self.info("Overall:", &status_word(report.result.overall()));
    }

    /// Print the roster check, one line per member
    pub fn roster_report(&self, report: &RosterReport) {
        self.section(&format!("Guild Requirement Check: {}", report.guild_name));

        if report.entries.is_empty() {
            self.status("No members could be checked.");
        }
        for entry in &report.entries {
            println!("  {} {}", status_marker(entry.status), roster_line(entry));
        }

        println!();
        self.status(&format!(
            "{} checked · {} skipped",
            report.entries.len(),
            report.skipped
        ));
    }
}

fn status_marker(status: Status) -> String {
    match status {
        Status::Pass => "●".bright_green().to_string(),
        Status::Partial => "●".yellow().to_string(),
        Status::Fail => "●".bright_red().to_string(),
    }
}

fn status_word(status: Status) -> String {
    match status {
        Status::Pass => status.to_string().bright_green().to_string(),
        Status::Partial => status.to_string().yellow().to_string(),
        Status::Fail => status.to_string().bright_red().to_string(),
    }
}

fn category_lines(report: &PlayerReport, category: Category) -> Vec<String> {
    let player = &report.player;
    match category {
        Category::Bedwars => vec![
            format!("Wins: {}", player.bedwars.wins),
            format!("Stars: {}", player.bedwars.stars),
            format!("FKDR: {:?}", player.bedwars.fkdr()),
        ],
        Category::Duels => vec![
            format!("Wins: {}", player.duels.wins),
            format!("WLR: {:?}", player.duels.wlr()),
            format!("Kills: {}", player.duels.kills),
        ],
        Category::Skywars => vec![
            format!("Stars: {}", player.skywars.stars),
            format!("WLR: {:?}", player.skywars.wlr()),
        ],
        Category::Skyblock => vec![format!("Level: {}", player.skyblock.level)],
        Category::GuildExperience => vec![
            format!("Current Guild: {}", report.guild.display_guild()),
            format!("GEXP: {}", report.guild.weekly_experience),
        ],
    }
}

fn roster_line(entry: &RosterEntry) -> String {
    format!(
        "{:<16} wins {:>6}  stars {:>4}  gexp {:>7}",
        entry.name, entry.bedwars_wins, entry.bedwars_stars, entry.weekly_experience
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqcheck_core::{
        GuildMembership, PlayerSnapshot, RequirementResult,
        stats::{BedwarsStats, DuelsStats},
    };

    #[test]
    fn test_roster_line_is_aligned() {
        let entry = RosterEntry {
            uuid: "u".to_string(),
            name: "Steve".to_string(),
            bedwars_wins: 2500,
            bedwars_stars: 300,
            weekly_experience: 100_000,
            status: Status::Pass,
        };
        assert_eq!(
            roster_line(&entry),
            "Steve            wins   2500  stars  300  gexp  100000"
        );
    }

    #[test]
    fn test_category_lines() {
        let report = PlayerReport {
            player: PlayerSnapshot {
                display_name: "Alex".to_string(),
                bedwars: BedwarsStats {
                    wins: 10,
                    stars: 2,
                    final_kills: 5,
                    final_deaths: 0,
                },
                duels: DuelsStats {
                    wins: 3,
                    losses: 2,
                    kills: 9,
                },
                ..Default::default()
            },
            guild: GuildMembership::default(),
            result: RequirementResult::default(),
        };

        assert_eq!(
            category_lines(&report, Category::Bedwars),
            vec!["Wins: 10", "Stars: 2", "FKDR: 5.0"]
        );
        assert_eq!(
            category_lines(&report, Category::Duels),
            vec!["Wins: 3", "WLR: 1.5", "Kills: 9"]
        );
        assert_eq!(
            category_lines(&report, Category::GuildExperience),
            vec!["Current Guild: None", "GEXP: 0"]
        );
    }
}
