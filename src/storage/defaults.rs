//! Seed data for a fresh document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{Document, Habit, Region, Reminders, Stats};

/// Starting growth score.
pub const INITIAL_SCORE: u32 = 45;

// (id, name, color, size, x, y, intensity)
const SEED_REGIONS: [(&str, &str, &str, f64, f64, f64, f64); 12] = [
    ("fear", "Fear", "#ff3e3e", 55.0, 280.0, 200.0, 0.5),
    ("shame", "Shame", "#b056da", 45.0, 320.0, 420.0, 0.4),
    ("critic", "Inner Critic", "#6a6a6a", 50.0, 120.0, 350.0, 0.5),
    ("joy", "Joy", "#ffcc00", 100.0, 480.0, 280.0, 0.8),
    ("growth", "Growth", "#00ff88", 85.0, 680.0, 450.0, 0.7),
    ("calm", "Calm", "#00d2ff", 70.0, 520.0, 580.0, 0.6),
    ("connection", "Connection", "#ff7e33", 60.0, 720.0, 220.0, 0.5),
    ("anger", "Anger", "#ff4b2b", 40.0, 100.0, 180.0, 0.3),
    ("sadness", "Sadness", "#64748b", 40.0, 820.0, 550.0, 0.3),
    ("courage", "Courage", "#f9d423", 50.0, 560.0, 130.0, 0.4),
    ("vulnerability", "Vulnerability", "#ff75c3", 50.0, 380.0, 130.0, 0.4),
    ("curiosity", "Curiosity", "#00f2fe", 55.0, 780.0, 380.0, 0.5),
];

// (id, name, icon, color)
const SEED_HABITS: [(&str, &str, &str, &str); 5] = [
    ("journal", "Daily Journal", "📝", "#00d2ff"),
    ("meditation", "Meditation", "🧘", "#b056da"),
    ("exercise", "Exercise", "💪", "#00ff88"),
    ("gratitude", "Gratitude", "🙏", "#ffcc00"),
    ("sleep", "Good Sleep", "😴", "#64748b"),
];

/// The fixed seed regions.
pub fn default_regions() -> BTreeMap<String, Region> {
    SEED_REGIONS
        .iter()
        .map(|&(id, name, color, size, x, y, intensity)| {
            (
                id.to_string(),
                Region {
                    id: id.to_string(),
                    name: name.to_string(),
                    color: color.to_string(),
                    size,
                    x,
                    y,
                    intensity,
                    created_at: None,
                },
            )
        })
        .collect()
}

/// The fixed seed habits, none completed.
pub fn default_habits() -> Vec<Habit> {
    SEED_HABITS
        .iter()
        .map(|&(id, name, icon, color)| Habit {
            id: id.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
            streak: 0,
            last_completed: None,
            color: color.to_string(),
        })
        .collect()
}

/// Reminders off, 09:00 and 21:00.
pub fn default_reminders() -> Reminders {
    Reminders {
        enabled: false,
        journal_time: "09:00".to_string(),
        evening_time: "21:00".to_string(),
    }
}

/// A fresh document as of `now`.
pub fn default_document(now: DateTime<Utc>) -> Document {
    Document {
        entries: Vec::new(),
        regions: default_regions(),
        habits: default_habits(),
        reminders: default_reminders(),
        stats: Stats {
            score: INITIAL_SCORE,
            days_traveled: 1,
            last_active: now,
            total_entries: 0,
        },
    }
}
