//! Requirement evaluation
//!
//! Pure functions of a snapshot. Ratios are compared after rounding to two
//! places, the same value the embeds display.

use std::fmt;

use serde::Serialize;

use crate::stats::{GuildMembership, PlayerSnapshot};

/// Fixed guild requirements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Requirements {
    pub bedwars_wins: u64,
    pub bedwars_stars: u64,
    pub duels_wins: u64,
    pub duels_wlr: f64,
    pub skywars_stars: u64,
    pub skyblock_level: u64,
    pub weekly_experience: u64,
}

impl Requirements {
    pub const STANDARD: Self = Self {
        bedwars_wins: 2500,
        bedwars_stars: 300,
        duels_wins: 7500,
        duels_wlr: 2.5,
        skywars_stars: 10,
        skyblock_level: 140,
        weekly_experience: 100_000,
    };

    pub fn bedwars(&self, wins: u64, stars: u64) -> bool {
        wins >= self.bedwars_wins && stars >= self.bedwars_stars
    }

    /// `wlr` is expected already rounded to two places
    pub fn duels(&self, wins: u64, wlr: f64) -> bool {
        wins >= self.duels_wins && wlr >= self.duels_wlr
    }

    pub fn skywars(&self, stars: u64) -> bool {
        stars >= self.skywars_stars
    }

    pub fn skyblock(&self, level: u64) -> bool {
        level >= self.skyblock_level
    }

    pub fn guild_experience(&self, weekly: u64) -> bool {
        weekly >= self.weekly_experience
    }

    /// Evaluate every category for one player
    pub fn evaluate(&self, player: &PlayerSnapshot, guild: &GuildMembership) -> RequirementResult {
        RequirementResult {
            bedwars: self.bedwars(player.bedwars.wins, player.bedwars.stars),
            duels: self.duels(player.duels.wins, player.duels.wlr()),
            skywars: self.skywars(player.skywars.stars),
            skyblock: self.skyblock(player.skyblock.level),
            guild_experience: self.guild_experience(guild.weekly_experience),
        }
    }

    /// The simplified roster rule: Bedwars and weekly experience only
    pub fn roster_status(&self, wins: u64, stars: u64, weekly: u64) -> Status {
        Status::from_checks(&[self.bedwars(wins, stars), self.guild_experience(weekly)])
    }
}

/// Traffic-light status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Green
    Pass,
    /// Yellow
    Partial,
    /// Red
    Fail,
}

impl Status {
    /// Green if every check passed, yellow if some did, red otherwise.
    /// An empty set of checks is red.
    pub fn from_checks(checks: &[bool]) -> Self {
        let passed = checks.iter().filter(|c| **c).count();
        if passed > 0 && passed == checks.len() {
            Self::Pass
        } else if passed > 0 {
            Self::Partial
        } else {
            Self::Fail
        }
    }

    pub fn from_bool(passed: bool) -> Self {
        if passed { Self::Pass } else { Self::Fail }
    }

    pub fn colour_name(&self) -> &'static str {
        match self {
            Self::Pass => "green",
            Self::Partial => "yellow",
            Self::Fail => "red",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.colour_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Bedwars,
    Duels,
    Skywars,
    Skyblock,
    GuildExperience,
}

impl Category {
    pub const ALL: [Self; 5] = [
        Self::Bedwars,
        Self::Duels,
        Self::Skywars,
        Self::Skyblock,
        Self::GuildExperience,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bedwars => "Bedwars",
            Self::Duels => "Duels",
            Self::Skywars => "Skywars",
            Self::Skyblock => "Skyblock",
            Self::GuildExperience => "Guild",
        }
    }
}

/// Pass/fail per tracked category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RequirementResult {
    pub bedwars: bool,
    pub duels: bool,
    pub skywars: bool,
    pub skyblock: bool,
    pub guild_experience: bool,
}

impl RequirementResult {
    pub fn passed(&self, category: Category) -> bool {
        match category {
            Category::Bedwars => self.bedwars,
            Category::Duels => self.duels,
            Category::Skywars => self.skywars,
            Category::Skyblock => self.skyblock,
            Category::GuildExperience => self.guild_experience,
        }
    }

    pub fn category(&self, category: Category) -> Status {
        Status::from_bool(self.passed(category))
    }

    /// Aggregate over all five categories
    pub fn overall(&self) -> Status {
        let checks = Category::ALL.map(|c| self.passed(c));
        Status::from_checks(&checks)
    }
}
