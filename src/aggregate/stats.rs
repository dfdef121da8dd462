use chrono::{DateTime, Local, Utc};

use crate::clock::local_day;
use crate::storage::{Document, Part};

/// Part labels that raise the growth score.
pub const POSITIVE_PARTS: [&str; 10] = [
    "joy",
    "growth",
    "calm",
    "courage",
    "connection",
    "curiosity",
    "gratitude",
    "hope",
    "self-compassion",
    "wisdom",
];

/// Score gained per positive part.
pub const SCORE_PER_POSITIVE_PART: u32 = 3;
/// Upper bound of the growth score.
pub const MAX_SCORE: u32 = 100;

/// Number of parts whose lower-cased label is a positive part.
pub fn positive_count(parts: &[Part]) -> usize {
    parts
        .iter()
        .filter(|p| POSITIVE_PARTS.contains(&p.id.to_lowercase().as_str()))
        .count()
}

/// Update the aggregate stats for one recorded entry.
///
/// The score only ever rises, capped at [`MAX_SCORE`]. The day count rises at most once
/// per local calendar day.
pub fn record_entry_stats(doc: &mut Document, parts: &[Part], now: DateTime<Local>) {
    let stats = &mut doc.stats;
    stats.total_entries += 1;

    let gained = u32::try_from(positive_count(parts))
        .unwrap_or(u32::MAX)
        .saturating_mul(SCORE_PER_POSITIVE_PART);
    if stats.score < MAX_SCORE {
        stats.score = stats.score.saturating_add(gained).min(MAX_SCORE);
    }

    if local_day(&stats.last_active) != now.date_naive() {
        stats.days_traveled += 1;
        stats.last_active = now.with_timezone(&Utc);
    }
}
