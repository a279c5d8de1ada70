//! Mojang and Hypixel lookups
//!
//! [`StatsSource`] is what the check operations talk to. [`HypixelClient`]
//! implements it over plain HTTP GETs: no retries, no rate limiting, and the
//! reqwest default timeouts.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::{
    config::HypixelSettings,
    error::{CheckError, Result},
};

/// A Mojang profile, as returned by the username lookup
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MojangProfile {
    /// Undashed UUID
    pub id: String,
    pub name: String,
}

/// The parts of a Hypixel player record the checks read
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerRecord {
    pub displayname: Option<String>,
    pub stats: PlayerStatsRecord,
    pub achievements: AchievementsRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerStatsRecord {
    #[serde(rename = "Bedwars")]
    pub bedwars: BedwarsRecord,
    #[serde(rename = "Duels")]
    pub duels: DuelsRecord,
    #[serde(rename = "SkyWars")]
    pub skywars: SkywarsRecord,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BedwarsRecord {
    #[serde(deserialize_with = "lenient_count")]
    pub wins_bedwars: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub final_kills_bedwars: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub final_deaths_bedwars: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DuelsRecord {
    #[serde(deserialize_with = "lenient_count")]
    pub wins: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub losses: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub kills: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkywarsRecord {
    #[serde(deserialize_with = "lenient_count")]
    pub wins: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub losses: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AchievementsRecord {
    #[serde(deserialize_with = "lenient_count")]
    pub bedwars_level: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub skywars_you_re_a_star: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub skyblock_leveling: u64,
}

/// A Hypixel guild with its member list
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GuildRecord {
    pub name: Option<String>,
    pub members: Vec<GuildMemberRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GuildMemberRecord {
    pub uuid: String,
    /// Experience earned per day over the last week, keyed by date
    #[serde(rename = "expHistory", deserialize_with = "lenient_history")]
    pub exp_history: BTreeMap<String, u64>,
}

impl GuildRecord {
    /// Find a member by UUID, ignoring dashes and case
    pub fn member(&self, uuid: &str) -> Option<&GuildMemberRecord> {
        let wanted = normalize_uuid(uuid);
        self.members
            .iter()
            .find(|m| normalize_uuid(&m.uuid) == wanted)
    }
}

impl GuildMemberRecord {
    pub fn weekly_experience(&self) -> u64 {
        self.exp_history.values().sum()
    }
}

pub fn normalize_uuid(uuid: &str) -> String {
    uuid.chars()
        .filter(|c| *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Counters are non-negative integers; anything else degrades to a count instead of failing
fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                v
            } else if let Some(v) = n.as_f64() {
                if v.is_finite() && v > 0.0 { v as u64 } else { 0 }
            } else {
                0
            }
        }
        _ => 0,
    }
}

fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
}

fn lenient_history<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(day, exp)| (day, count_from_value(&exp)))
        .collect())
}

/// Source of player and guild data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Resolve a username to a Mojang profile, `None` if no such player exists
    async fn resolve_profile(&self, username: &str) -> Result<Option<MojangProfile>>;

    /// Fetch a player's Hypixel record
    async fn player(&self, uuid: &str) -> Result<Option<PlayerRecord>>;

    /// Fetch the guild a player belongs to
    async fn guild_by_player(&self, uuid: &str) -> Result<Option<GuildRecord>>;

    /// Fetch a guild by its name
    async fn guild_by_name(&self, name: &str) -> Result<Option<GuildRecord>>;
}

/// Hypixel wraps every answer in `{ success, cause, <payload> }`, where the
/// payload key is `player` or `guild` depending on the endpoint
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    cause: Option<String>,
    #[serde(alias = "player", alias = "guild")]
    payload: Option<T>,
}

impl<T> Envelope<T> {
    /// `success: false` is a rejection; a null or missing payload means not found
    fn into_payload(self, endpoint: &str) -> Result<Option<T>> {
        if !self.success {
            return Err(CheckError::api_rejected(endpoint, self.cause));
        }
        Ok(self.payload)
    }
}

/// HTTP-backed [`StatsSource`]
#[derive(Debug, Clone)]
pub struct HypixelClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    mojang_base_url: String,
}

impl HypixelClient {
    pub fn new(settings: &HypixelSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("reqcheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CheckError::fetch_failed("http client", e))?;

        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            mojang_base_url: settings.mojang_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn profile_request(&self, username: &str) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/users/profiles/minecraft/{}",
            self.mojang_base_url, username
        );
        self.http.get(url)
    }

    fn hypixel_request(&self, path: &str, lookup: (&str, &str)) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}/{}", self.base_url, path))
            .query(&[("key", self.api_key.as_str()), lookup])
    }

    async fn fetch_hypixel<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>> {
        debug!("GET hypixel {}", endpoint);
        let response = request
            .send()
            .await
            .map_err(|e| CheckError::fetch_failed(endpoint, e))?;
        debug!("hypixel {} answered {}", endpoint, response.status());

        // Hypixel reports failures in the body, so decode regardless of status
        response
            .json::<Envelope<T>>()
            .await
            .map_err(|e| CheckError::fetch_failed(endpoint, e))?
            .into_payload(endpoint)
    }
}

#[async_trait]
impl StatsSource for HypixelClient {
    async fn resolve_profile(&self, username: &str) -> Result<Option<MojangProfile>> {
        const ENDPOINT: &str = "mojang profile";
        debug!("GET mojang profile for {}", username);

        let response = self
            .profile_request(username)
            .send()
            .await
            .map_err(|e| CheckError::fetch_failed(ENDPOINT, e))?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => return Ok(None),
            _ => {}
        }

        let response = response
            .error_for_status()
            .map_err(|e| CheckError::fetch_failed(ENDPOINT, e))?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| CheckError::fetch_failed(ENDPOINT, e))?;

        Ok(parse_profile(body))
    }

    async fn player(&self, uuid: &str) -> Result<Option<PlayerRecord>> {
        self.fetch_hypixel("hypixel /player", self.hypixel_request("player", ("uuid", uuid)))
            .await
    }

    async fn guild_by_player(&self, uuid: &str) -> Result<Option<GuildRecord>> {
        self.fetch_hypixel("hypixel /guild", self.hypixel_request("guild", ("player", uuid)))
            .await
    }

    async fn guild_by_name(&self, name: &str) -> Result<Option<GuildRecord>> {
        self.fetch_hypixel("hypixel /guild", self.hypixel_request("guild", ("name", name)))
            .await
    }
}

/// A profile body without an `id` means the name did not resolve
fn parse_profile(body: Value) -> Option<MojangProfile> {
    let id = body.get("id")?.as_str()?.to_string();
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(MojangProfile { id, name })
}
