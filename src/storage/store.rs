use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveTime, Utc};
use tracing::{debug, info, warn};

use super::{default_document, Document, Entry, Habit, MemoryBackend, Reminders, StorageBackend};
use crate::aggregate::habits::{
    insert_habit, new_habit, remove_habit, DEFAULT_HABIT_COLOR, DEFAULT_HABIT_ICON,
    JOURNAL_HABIT_ID,
};
use crate::aggregate::{apply_parts, complete_habit, record_entry_stats};
use crate::clock::{Clock, SystemClock};
use crate::error::{AppError, AppResult, StorageError, StorageResult};

/// Default morning reminder time.
pub const DEFAULT_JOURNAL_TIME: &str = "09:00";
/// Default evening reminder time.
pub const DEFAULT_EVENING_TIME: &str = "21:00";

/// Handle to the persisted growth map document.
///
/// Every mutating operation loads the current document, applies one change, saves the
/// whole document and returns it. Mutations through the same handle are serialized; two
/// processes sharing one file are last-write-wins.
pub struct JournalStore {
    backend: Box<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl JournalStore {
    /// Create a store over `backend` using wall-clock time.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self::with_clock(backend, Arc::new(SystemClock))
    }

    /// Create a store over `backend` with an explicit time source.
    pub fn with_clock(backend: impl StorageBackend + 'static, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend: Box::new(backend),
            clock,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store backed by an empty in-memory slot.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// The store's time source.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Load the document, creating and persisting the default one on first run.
    ///
    /// Documents written before habits or reminders existed get their defaults in
    /// memory only; they are written back on the next save.
    pub fn load(&self) -> StorageResult<Document> {
        let _guard = self.lock();
        self.load_unlocked()
    }

    /// Replace the stored document with `doc`.
    pub fn save(&self, doc: &Document) -> StorageResult<()> {
        let _guard = self.lock();
        self.save_unlocked(doc)
    }

    /// Record a journal entry and fold its analysis into the map.
    ///
    /// The entry goes to the front of `entries`, its parts grow (or create) regions, the
    /// journal habit is completed and the stats are updated, all before a single save.
    pub fn add_entry(&self, entry: Entry) -> StorageResult<Document> {
        let entry_id = entry.id;
        let part_count = entry.analysis.parts.len();

        let doc = self.mutate(|doc, now| {
            let utc_now = now.with_timezone(&Utc);
            let parts = entry.analysis.parts.clone();
            doc.entries.insert(0, entry);

            apply_parts(doc, &parts, utc_now, &mut rand::thread_rng());
            complete_habit(doc, JOURNAL_HABIT_ID, now);
            record_entry_stats(doc, &parts, now);
            true
        })?;

        info!(
            entry_id = entry_id,
            parts = part_count,
            score = doc.stats.score,
            total_entries = doc.stats.total_entries,
            "Entry recorded"
        );
        Ok(doc)
    }

    /// Mark a habit completed today. Unknown ids and repeat completions are no-ops.
    pub fn complete_habit(&self, habit_id: &str) -> StorageResult<Document> {
        self.mutate(|doc, now| {
            let changed = complete_habit(doc, habit_id, now);
            if changed {
                info!(habit = %habit_id, "Habit completed");
            }
            changed
        })
    }

    /// Add a habit named `name`. Does nothing if a habit with the same slug exists.
    pub fn add_habit(
        &self,
        name: &str,
        icon: Option<&str>,
        color: Option<&str>,
    ) -> AppResult<Document> {
        if name.trim().is_empty() {
            return Err(AppError::validation("name", "Habit name cannot be empty"));
        }

        let habit = new_habit(
            name,
            icon.filter(|i| !i.trim().is_empty())
                .unwrap_or(DEFAULT_HABIT_ICON),
            color.unwrap_or(DEFAULT_HABIT_COLOR),
        );
        let habit_id = habit.id.clone();

        let doc = self.mutate(|doc, _| {
            let inserted = insert_habit(doc, habit);
            if inserted {
                info!(habit = %habit_id, "Habit added");
            } else {
                debug!(habit = %habit_id, "Habit already exists");
            }
            inserted
        })?;
        Ok(doc)
    }

    /// Remove a habit by id.
    pub fn remove_habit(&self, habit_id: &str) -> StorageResult<Document> {
        self.mutate(|doc, _| {
            if remove_habit(doc, habit_id) {
                info!(habit = %habit_id, "Habit removed");
            }
            true
        })
    }

    /// Replace the reminder configuration. Times default to 09:00 and 21:00.
    pub fn set_reminders(
        &self,
        enabled: bool,
        journal_time: Option<&str>,
        evening_time: Option<&str>,
    ) -> AppResult<Document> {
        let journal_time = journal_time.unwrap_or(DEFAULT_JOURNAL_TIME);
        let evening_time = evening_time.unwrap_or(DEFAULT_EVENING_TIME);
        validate_time("journal_time", journal_time)?;
        validate_time("evening_time", evening_time)?;

        let reminders = Reminders {
            enabled,
            journal_time: journal_time.to_string(),
            evening_time: evening_time.to_string(),
        };

        let doc = self.mutate(|doc, _| {
            doc.reminders = reminders;
            true
        })?;
        info!(enabled = enabled, "Reminders updated");
        Ok(doc)
    }

    /// Erase all stored state. The next load starts from the default document.
    pub fn reset(&self) -> StorageResult<()> {
        let _guard = self.lock();
        self.backend.clear()?;
        warn!(location = %self.backend.describe(), "Growth map reset");
        Ok(())
    }

    /// All entries, newest first.
    pub fn entries(&self) -> StorageResult<Vec<Entry>> {
        Ok(self.load()?.entries)
    }

    /// All habits in display order.
    pub fn habits(&self) -> StorageResult<Vec<Habit>> {
        Ok(self.load()?.habits)
    }

    /// Display names of every region, for the analysis prompt.
    pub fn existing_part_names(&self) -> StorageResult<Vec<String>> {
        Ok(self.load()?.part_names())
    }

    /// Load, apply `f`, and save if `f` reports a change. Returns the resulting document.
    fn mutate<F>(&self, f: F) -> StorageResult<Document>
    where
        F: FnOnce(&mut Document, DateTime<Local>) -> bool,
    {
        let _guard = self.lock();
        let mut doc = self.load_unlocked()?;
        if f(&mut doc, self.clock.now()) {
            self.save_unlocked(&doc)?;
        }
        Ok(doc)
    }

    fn load_unlocked(&self) -> StorageResult<Document> {
        match self.backend.read()? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
                message: e.to_string(),
            }),
            None => {
                let doc = default_document(self.clock.now().with_timezone(&Utc));
                self.save_unlocked(&doc)?;
                info!(location = %self.backend.describe(), "Created default growth map");
                Ok(doc)
            }
        }
    }

    fn save_unlocked(&self, doc: &Document) -> StorageResult<()> {
        let raw = serde_json::to_string(doc)?;
        self.backend.write(&raw)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn validate_time(field: &str, value: &str) -> AppResult<()> {
    let well_formed = value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok();
    if well_formed {
        Ok(())
    } else {
        Err(AppError::validation(
            field,
            format!("'{}' is not a 24-hour HH:MM time", value),
        ))
    }
}
