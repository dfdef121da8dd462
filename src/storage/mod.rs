//! Storage layer for the growth map document.
//!
//! All application state lives in one JSON [`Document`] persisted whole into a single
//! storage slot. The [`JournalStore`] owns the load-mutate-save cycle; backends only
//! know how to read and write the serialized text.

mod backend;
mod defaults;
mod file;
mod store;


pub use backend::{MemoryBackend, StorageBackend};
pub use defaults::{default_document, default_habits, default_regions, default_reminders};
pub use file::FileBackend;
pub use store::JournalStore;

use std::collections::BTreeMap;

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::local_day;

/// The single persisted root object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Journal entries, newest first.
    pub entries: Vec<Entry>,
    /// Regions keyed by region id.
    pub regions: BTreeMap<String, Region>,
    /// Tracked habits in display order.
    #[serde(
        default = "defaults::default_habits",
        deserialize_with = "habits_or_default"
    )]
    pub habits: Vec<Habit>,
    /// Reminder configuration.
    #[serde(
        default = "defaults::default_reminders",
        deserialize_with = "reminders_or_default"
    )]
    pub reminders: Reminders,
    /// Aggregate statistics.
    pub stats: Stats,
}

/// A recorded journal entry. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Creation time in epoch milliseconds.
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    /// Raw transcript.
    pub text: String,
    pub analysis: Analysis,
}

impl Entry {
    /// Create an entry stamped at `now`.
    pub fn new(text: impl Into<String>, analysis: Analysis, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis(),
            timestamp: now,
            text: text.into(),
            analysis,
        }
    }
}

/// Structured LLM output for one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: String,
    #[serde(default)]
    pub content_emojis: Vec<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub overall_sentiment: Sentiment,
    #[serde(default)]
    pub growth_tip: String,
    #[serde(default)]
    pub detected_habits: Vec<String>,
}

/// Overall tone of an entry.
///
/// Stored documents may hold any string the model once returned, so deserialization maps
/// unknown or missing values to [`Sentiment::Neutral`]. Use [`FromStr`] for strict parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!("unknown sentiment '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .and_then(|s| s.trim().to_lowercase().parse().ok())
            .unwrap_or_default())
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// A theme detected in one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Free-form label such as "fear" or "Inner Critic".
    pub id: String,
    /// Strength in `[0, 1]`.
    pub strength: f64,
    #[serde(default)]
    pub reason: String,
    #[serde(rename = "isNew", default)]
    pub is_new: bool,
    #[serde(
        rename = "suggestedColor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub suggested_color: Option<String>,
    #[serde(
        rename = "suggestedPosition",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub suggested_position: Option<Position>,
}

impl Part {
    /// A part matching an existing region.
    pub fn existing(id: impl Into<String>, strength: f64) -> Self {
        Self {
            id: id.into(),
            strength,
            reason: String::new(),
            is_new: false,
            suggested_color: None,
            suggested_position: None,
        }
    }

    /// A part the analysis believes is not yet on the map.
    pub fn new_part(id: impl Into<String>, strength: f64) -> Self {
        Self {
            is_new: true,
            ..Self::existing(id, strength)
        }
    }

    /// Set the reason text.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Set the suggested colour for a new region.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.suggested_color = Some(color.into());
        self
    }

    /// Set the suggested layout position for a new region.
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.suggested_position = Some(Position { x, y });
        self
    }
}

/// Layout coordinates on the map canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A persistent bucket for one recurring theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    pub name: String,
    pub color: String,
    pub size: f64,
    pub x: f64,
    pub y: f64,
    pub intensity: f64,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A recurring daily action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub streak: u32,
    #[serde(rename = "lastCompleted", default)]
    pub last_completed: Option<DateTime<Utc>>,
    pub color: String,
}

impl Habit {
    /// Whether the habit was completed on the given local calendar day.
    pub fn completed_on(&self, day: NaiveDate) -> bool {
        self.last_completed
            .as_ref()
            .map(|ts| local_day(ts) == day)
            .unwrap_or(false)
    }
}

/// Reminder configuration. Times are `HH:MM`, 24-hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminders {
    pub enabled: bool,
    #[serde(rename = "journalTime")]
    pub journal_time: String,
    #[serde(rename = "eveningTime")]
    pub evening_time: String,
}

/// Aggregate statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Growth score, `0..=100`.
    pub score: u32,
    #[serde(rename = "daysTraveled")]
    pub days_traveled: u32,
    #[serde(rename = "lastActive")]
    pub last_active: DateTime<Utc>,
    #[serde(rename = "totalEntries")]
    pub total_entries: u64,
}

fn habits_or_default<'de, D>(deserializer: D) -> Result<Vec<Habit>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_else(defaults::default_habits))
}

fn reminders_or_default<'de, D>(deserializer: D) -> Result<Reminders, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_else(defaults::default_reminders))
}

impl Document {
    /// Display names of every region, in id order.
    pub fn part_names(&self) -> Vec<String> {
        self.regions.values().map(|r| r.name.clone()).collect()
    }

    /// Look up a habit by id.
    pub fn habit(&self, id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }
}
