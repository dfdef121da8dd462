//! Recording journal entries.
//!
//! Recording happens in two phases. First the text is analyzed remotely, which may fail
//! and is replaced by a fallback analysis when it does. Then the entry and its analysis
//! are applied to the store synchronously. Nothing is written until the second phase.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::gemini::{fallback_analysis, Analyzer};
use crate::storage::{Document, Entry, JournalStore};

/// Shortest entry (trimmed, in characters) worth recording.
pub const MIN_ENTRY_CHARS: usize = 5;

/// Result of recording an entry.
#[derive(Debug, Clone)]
pub struct RecordedEntry {
    /// Document after the entry was applied.
    pub document: Document,
    /// Labels of parts the analysis reported as new.
    pub new_parts: Vec<String>,
    /// Whether the fallback analysis was used.
    pub degraded: bool,
}

/// Records entries and scans pages through an [`Analyzer`].
pub struct JournalService {
    store: Arc<JournalStore>,
    analyzer: Arc<dyn Analyzer>,
}

impl JournalService {
    /// Create a service over `store` and `analyzer`.
    pub fn new(store: Arc<JournalStore>, analyzer: Arc<dyn Analyzer>) -> Self {
        Self { store, analyzer }
    }

    /// The underlying store.
    pub fn store(&self) -> &JournalStore {
        &self.store
    }

    /// Analyze `text` and record it as a new entry.
    ///
    /// Text shorter than [`MIN_ENTRY_CHARS`] is rejected. Analysis failures never block
    /// recording; the entry is stored with the fallback analysis instead.
    pub async fn record(&self, text: &str) -> AppResult<RecordedEntry> {
        if text.trim().chars().count() < MIN_ENTRY_CHARS {
            return Err(AppError::validation(
                "text",
                format!("Entry must be at least {} characters", MIN_ENTRY_CHARS),
            ));
        }

        let existing = self.store.existing_part_names()?;

        let (analysis, degraded) = match self.analyzer.analyze(text, &existing).await {
            Ok(analysis) => (analysis, false),
            Err(e) => {
                warn!(error = %e, "Analysis failed, recording entry with fallback analysis");
                (fallback_analysis(), true)
            }
        };

        let new_parts: Vec<String> = analysis
            .parts
            .iter()
            .filter(|p| p.is_new)
            .map(|p| p.id.clone())
            .collect();

        let now = self.store.clock().now().with_timezone(&Utc);
        let entry = Entry::new(text, analysis, now);
        let document = self.store.add_entry(entry)?;

        if !new_parts.is_empty() {
            info!(parts = %new_parts.join(", "), "New parts discovered");
        }

        Ok(RecordedEntry {
            document,
            new_parts,
            degraded,
        })
    }

    /// Transcribe a photographed journal page. The document is not touched.
    pub async fn scan(&self, image: &[u8], mime_type: &str) -> AppResult<String> {
        if image.is_empty() {
            return Err(AppError::validation("image", "Image is empty"));
        }

        match self.analyzer.transcribe(image, mime_type).await {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => Err(AppError::NoTextFound),
            Err(e) => {
                warn!(error = %e, "Scan failed");
                Err(AppError::NoTextFound)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::GeminiError;
    use crate::gemini::{MockAnalyzer, FALLBACK_SUMMARY};
    use crate::storage::{Analysis, MemoryBackend, Part, Sentiment};
    use chrono::{Local, TimeZone};

    fn store() -> Arc<JournalStore> {
        let clock = FixedClock::new(Local.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap());
        Arc::new(JournalStore::with_clock(MemoryBackend::new(), Arc::new(clock)))
    }

    fn analysis(parts: Vec<Part>) -> Analysis {
        Analysis {
            summary: "A good day.".to_string(),
            content_emojis: vec!["🌞".to_string()],
            parts,
            overall_sentiment: Sentiment::Positive,
            growth_tip: "Keep going.".to_string(),
            detected_habits: vec![],
        }
    }

    #[tokio::test]
    async fn test_record_passes_existing_parts_and_applies_analysis() {
        let mut analyzer = MockAnalyzer::new();
        analyzer
            .expect_analyze()
            .withf(|text, existing| {
                text == "Grateful for my friends today"
                    && existing.iter().any(|n| n == "Inner Critic")
            })
            .times(1)
            .returning(|_, _| {
                Ok(analysis(vec![
                    Part::new_part("Gratitude", 0.5).with_color("#ffd93d"),
                    Part::existing("connection", 0.4),
                ]))
            });

        let service = JournalService::new(store(), Arc::new(analyzer));
        let recorded = service.record("Grateful for my friends today").await.unwrap();

        assert!(!recorded.degraded);
        assert_eq!(recorded.new_parts, vec!["Gratitude".to_string()]);
        let doc = &recorded.document;
        assert_eq!(doc.entries.len(), 1);
        assert_eq!(doc.entries[0].text, "Grateful for my friends today");
        assert_eq!(doc.regions["gratitude"].color, "#ffd93d");
        assert_eq!(doc.stats.score, 51);
    }

    #[tokio::test]
    async fn test_record_uses_fallback_on_analysis_failure() {
        let mut analyzer = MockAnalyzer::new();
        analyzer
            .expect_analyze()
            .times(1)
            .returning(|_, _| Err(GeminiError::EmptyCandidates));

        let service = JournalService::new(store(), Arc::new(analyzer));
        let recorded = service.record("Nothing much happened").await.unwrap();

        assert!(recorded.degraded);
        assert!(recorded.new_parts.is_empty());
        let entry = &recorded.document.entries[0];
        assert_eq!(entry.analysis.summary, FALLBACK_SUMMARY);
        assert_eq!(recorded.document.stats.total_entries, 1);
    }

    #[tokio::test]
    async fn test_record_rejects_short_text_without_writing() {
        let mut analyzer = MockAnalyzer::new();
        analyzer.expect_analyze().times(0);

        let store = store();
        let service = JournalService::new(Arc::clone(&store), Arc::new(analyzer));
        let result = service.record("  hi  ").await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
        assert!(store.entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scan_returns_text() {
        let mut analyzer = MockAnalyzer::new();
        analyzer
            .expect_transcribe()
            .withf(|image, mime| image == b"png-bytes" && mime == "image/png")
            .returning(|_, _| Ok("Dear diary".to_string()));

        let service = JournalService::new(store(), Arc::new(analyzer));
        let text = service.scan(b"png-bytes", "image/png").await.unwrap();
        assert_eq!(text, "Dear diary");
    }

    #[tokio::test]
    async fn test_scan_failure_is_no_text_found_and_leaves_document() {
        let mut analyzer = MockAnalyzer::new();
        analyzer
            .expect_transcribe()
            .returning(|_, _| Err(GeminiError::EmptyCandidates));

        let store = store();
        let before = store.load().unwrap();
        let service = JournalService::new(Arc::clone(&store), Arc::new(analyzer));

        let result = service.scan(b"blurry", "image/jpeg").await;
        assert!(matches!(result, Err(AppError::NoTextFound)));
        assert_eq!(store.load().unwrap(), before);
    }
}
