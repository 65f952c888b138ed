//! Tracked queries, subscribers and search results.
//!
//! Queries and subscribers are owned by the persistence collaborator; results
//! are produced by the search source and live for a single pass.


use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::utils::time::Timestamp;

/// Search result identifier. Ordered; 0 means "nothing seen yet".
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(pub u64);

impl ResultId {
    pub const NONE: ResultId = ResultId(0);

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ResultId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResultId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(ResultId)
    }
}

impl From<u64> for ResultId {
    fn from(id: u64) -> Self {
        ResultId(id)
    }
}

/// A persisted search term with incremental-fetch bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedQuery {
    pub id: u64,
    pub query: String,
    /// High-water mark: largest result identifier observed so far.
    #[serde(default)]
    pub max_seen: ResultId,
    #[serde(default)]
    pub last_update: Option<Timestamp>,
    /// Eligible for re-poll once `next_update <= now`.
    #[serde(default)]
    pub next_update: Timestamp,
}

impl TrackedQuery {
    pub fn new(
        id: u64,
        query: impl Into<String>,
    ) -> Self {
        Self {
            id,
            query: query.into(),
            max_seen: ResultId::NONE,
            last_update: None,
            next_update: 0,
        }
    }

    pub fn is_due(
        &self,
        now: Timestamp,
    ) -> bool {
        self.next_update <= now
    }

    pub fn never_polled(&self) -> bool {
        self.max_seen.is_none()
    }
}

/// Presence reported by the delivery transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    #[default]
    Available,
    Chat,
    Away,
    #[serde(rename = "xa")]
    ExtendedAway,
    #[serde(rename = "dnd")]
    DoNotDisturb,
    Offline,
    Unavailable,
    Unsubscribed,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Available => "available",
            Presence::Chat => "chat",
            Presence::Away => "away",
            Presence::ExtendedAway => "xa",
            Presence::DoNotDisturb => "dnd",
            Presence::Offline => "offline",
            Presence::Unavailable => "unavailable",
            Presence::Unsubscribed => "unsubscribed",
        }
    }
}

impl FromStr for Presence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "available" => Ok(Presence::Available),
            "chat" => Ok(Presence::Chat),
            "away" => Ok(Presence::Away),
            "xa" => Ok(Presence::ExtendedAway),
            "dnd" => Ok(Presence::DoNotDisturb),
            "offline" => Ok(Presence::Offline),
            "unavailable" => Ok(Presence::Unavailable),
            "unsubscribed" => Ok(Presence::Unsubscribed),
            other => Err(format!("unknown presence: {other}")),
        }
    }
}

/// A delivery address watching one or more tracked queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    pub address: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub presence: Presence,
    /// Low-water mark: results at or below this id are never delivered.
    #[serde(default)]
    pub min_id: ResultId,
}

fn default_active() -> bool {
    true
}

impl Subscriber {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            language: None,
            active: true,
            presence: Presence::Available,
            min_id: ResultId::NONE,
        }
    }

    /// Whether the subscriber should receive notifications right now.
    ///
    /// `xa` and `dnd` count as somewhat unavailable.
    pub fn is_available(&self) -> bool {
        self.active && matches!(self.presence, Presence::Available | Presence::Chat | Presence::Away)
    }

    /// Whether the subscriber counts as an active watcher for re-poll scheduling.
    pub fn counts_toward_load(&self) -> bool {
        self.active
            && !matches!(
                self.presence,
                Presence::DoNotDisturb | Presence::Offline | Presence::Unavailable
            )
    }
}

/// One search hit. Ephemeral, never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: ResultId,
    /// Text of the tracked query that surfaced this result
    pub query: String,
    /// Author handle, without a leading `@`
    pub author: String,
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
}
