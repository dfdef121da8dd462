//! Read-only projections of the document for front ends.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::region_id;
use crate::storage::{Document, Entry, Habit, Region};

/// Regions shown in the "top parts" list.
pub const TOP_PARTS: usize = 5;
/// Entries shown in the recent list.
pub const RECENT_ENTRIES: usize = 10;

/// Dashboard view of the map.
#[derive(Debug, Clone, Serialize)]
pub struct MapSummary {
    pub score: u32,
    pub days_traveled: u32,
    pub total_entries: u64,
    pub parts_discovered: usize,
    /// Largest regions first.
    pub top_parts: Vec<Region>,
    /// Growth tip of the newest entry.
    pub latest_tip: Option<String>,
    pub recent_entries: Vec<Entry>,
    pub habits: Vec<HabitStatus>,
}

/// A habit with its completion state for one day.
#[derive(Debug, Clone, Serialize)]
pub struct HabitStatus {
    pub habit: Habit,
    pub completed_today: bool,
}

impl MapSummary {
    /// Summarize `doc` as seen on `today`.
    pub fn from_document(doc: &Document, today: NaiveDate) -> Self {
        let mut top_parts: Vec<Region> = doc.regions.values().cloned().collect();
        top_parts.sort_by(|a, b| b.size.total_cmp(&a.size));
        top_parts.truncate(TOP_PARTS);

        Self {
            score: doc.stats.score,
            days_traveled: doc.stats.days_traveled,
            total_entries: doc.stats.total_entries,
            parts_discovered: doc.regions.len(),
            top_parts,
            latest_tip: doc
                .entries
                .first()
                .map(|e| e.analysis.growth_tip.clone())
                .filter(|tip| !tip.is_empty()),
            recent_entries: doc.entries.iter().take(RECENT_ENTRIES).cloned().collect(),
            habits: doc
                .habits
                .iter()
                .map(|h| HabitStatus {
                    habit: h.clone(),
                    completed_today: h.completed_on(today),
                })
                .collect(),
        }
    }
}

/// Colour of the region a part label resolves to.
pub fn part_color<'a>(doc: &'a Document, label: &str) -> Option<&'a str> {
    doc.regions.get(&region_id(label)).map(|r| r.color.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{default_document, Analysis, Sentiment};
    use chrono::{Local, Utc};

    fn entry(id: i64, tip: &str) -> Entry {
        Entry {
            id,
            timestamp: Utc::now(),
            text: format!("entry {}", id),
            analysis: Analysis {
                summary: String::new(),
                content_emojis: vec![],
                parts: vec![],
                overall_sentiment: Sentiment::Neutral,
                growth_tip: tip.to_string(),
                detected_habits: vec![],
            },
        }
    }

    #[test]
    fn test_top_parts_sorted_by_size() {
        let doc = default_document(Utc::now());
        let summary = MapSummary::from_document(&doc, Local::now().date_naive());

        let names: Vec<&str> = summary.top_parts.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Joy", "Growth", "Calm", "Connection", "Curiosity"]);
        assert_eq!(summary.parts_discovered, 12);
        assert!(summary.latest_tip.is_none());
    }

    #[test]
    fn test_recent_entries_and_latest_tip() {
        let mut doc = default_document(Utc::now());
        for id in (0..12).rev() {
            doc.entries.push(entry(id, &format!("tip {}", id)));
        }
        let summary = MapSummary::from_document(&doc, Local::now().date_naive());

        assert_eq!(summary.recent_entries.len(), RECENT_ENTRIES);
        assert_eq!(summary.recent_entries[0].id, 11);
        assert_eq!(summary.latest_tip.as_deref(), Some("tip 11"));
    }

    #[test]
    fn test_habit_completion_flags() {
        let mut doc = default_document(Utc::now());
        let now = Utc::now();
        doc.habits[0].last_completed = Some(now);
        let today = crate::clock::local_day(&now);

        let summary = MapSummary::from_document(&doc, today);
        assert!(summary.habits[0].completed_today);
        assert!(!summary.habits[1].completed_today);
    }

    #[test]
    fn test_part_color_uses_region_id() {
        let doc = default_document(Utc::now());
        assert_eq!(part_color(&doc, "Joy"), Some("#ffcc00"));
        assert_eq!(part_color(&doc, "Perfectionism"), None);
    }
}
