use chrono::{DateTime, Local, Utc};
use tracing::debug;

use super::region_id;
use crate::clock::local_day;
use crate::storage::{Document, Habit};

/// Id of the habit completed by every recorded entry.
pub const JOURNAL_HABIT_ID: &str = "journal";
/// Icon for habits added without one.
pub const DEFAULT_HABIT_ICON: &str = "✨";
/// Colour for habits added without one.
pub const DEFAULT_HABIT_COLOR: &str = "#00d2ff";

/// Mark a habit completed at `now`.
///
/// Completing twice on the same local day changes nothing. A completion on the day after
/// the previous one extends the streak; any longer gap (or a first completion) restarts it
/// at 1. Returns `true` if the habit changed.
pub fn complete_habit(doc: &mut Document, habit_id: &str, now: DateTime<Local>) -> bool {
    let Some(habit) = doc.habits.iter_mut().find(|h| h.id == habit_id) else {
        debug!(habit = %habit_id, "Unknown habit, nothing to complete");
        return false;
    };

    let today = now.date_naive();
    let last_day = habit.last_completed.as_ref().map(local_day);

    if last_day == Some(today) {
        return false;
    }

    let yesterday = today.pred_opt();
    if last_day.is_some() && last_day == yesterday {
        habit.streak += 1;
    } else {
        habit.streak = 1;
    }
    habit.last_completed = Some(now.with_timezone(&Utc));

    debug!(habit = %habit_id, streak = habit.streak, "Habit completed");
    true
}

/// Build a new habit with a slug id derived from its name.
pub fn new_habit(name: &str, icon: &str, color: &str) -> Habit {
    Habit {
        id: region_id(name.trim()),
        name: name.trim().to_string(),
        icon: icon.to_string(),
        streak: 0,
        last_completed: None,
        color: color.to_string(),
    }
}

/// Append `habit` unless one with the same id exists. Returns `true` if inserted.
pub fn insert_habit(doc: &mut Document, habit: Habit) -> bool {
    if doc.habits.iter().any(|h| h.id == habit.id) {
        return false;
    }
    doc.habits.push(habit);
    true
}

/// Remove the habit with `habit_id`. Returns `true` if one was removed.
pub fn remove_habit(doc: &mut Document, habit_id: &str) -> bool {
    let before = doc.habits.len();
    doc.habits.retain(|h| h.id != habit_id);
    doc.habits.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::default_document;
    use chrono::{Duration, TimeZone};

    fn noon(day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
    }

    fn streak(doc: &Document, id: &str) -> u32 {
        doc.habit(id).map(|h| h.streak).unwrap_or_default()
    }

    #[test]
    fn test_first_completion_starts_streak() {
        let mut doc = default_document(Utc::now());
        assert!(complete_habit(&mut doc, "meditation", noon(1)));
        assert_eq!(streak(&doc, "meditation"), 1);
        assert_eq!(
            doc.habit("meditation").unwrap().last_completed,
            Some(noon(1).with_timezone(&Utc))
        );
    }

    #[test]
    fn test_same_day_completion_is_noop() {
        let mut doc = default_document(Utc::now());
        complete_habit(&mut doc, "exercise", noon(1));
        let later = noon(1) + Duration::hours(6);
        assert!(!complete_habit(&mut doc, "exercise", later));
        assert_eq!(streak(&doc, "exercise"), 1);
        assert_eq!(
            doc.habit("exercise").unwrap().last_completed,
            Some(noon(1).with_timezone(&Utc))
        );
    }

    #[test]
    fn test_consecutive_days_extend_streak() {
        let mut doc = default_document(Utc::now());
        for day in 1..=4 {
            complete_habit(&mut doc, "sleep", noon(day));
        }
        assert_eq!(streak(&doc, "sleep"), 4);
    }

    #[test]
    fn test_gap_resets_streak() {
        let mut doc = default_document(Utc::now());
        complete_habit(&mut doc, "sleep", noon(1));
        complete_habit(&mut doc, "sleep", noon(2));
        complete_habit(&mut doc, "sleep", noon(4));
        assert_eq!(streak(&doc, "sleep"), 1);
    }

    #[test]
    fn test_unknown_habit_is_noop() {
        let mut doc = default_document(Utc::now());
        let before = doc.clone();
        assert!(!complete_habit(&mut doc, "juggling", noon(1)));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_insert_habit_is_idempotent() {
        let mut doc = default_document(Utc::now());
        assert!(insert_habit(&mut doc, new_habit("Cold Showers", "🚿", "#00f2fe")));
        assert!(!insert_habit(&mut doc, new_habit("cold  showers", "❄️", "#ffffff")));

        let habit = doc.habit("cold-showers").unwrap();
        assert_eq!(habit.icon, "🚿");
        assert_eq!(doc.habits.len(), 6);
    }

    #[test]
    fn test_remove_habit() {
        let mut doc = default_document(Utc::now());
        assert!(remove_habit(&mut doc, "gratitude"));
        assert!(!remove_habit(&mut doc, "gratitude"));
        assert!(doc.habit("gratitude").is_none());
    }
}
