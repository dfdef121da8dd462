//! # Growth Map
//!
//! A journaling engine that turns free-form entries into a map of emotional "parts".
//! Each entry is analyzed by Gemini, and the reported parts grow regions on the map,
//! advance habit streaks and move a growth score.
//!
//! ## Architecture
//!
//! ```text
//! CLI → JournalService → Analyzer (Gemini HTTP)
//!              ↓
//!        JournalStore → StorageBackend (JSON file)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use growth_map::{Config, FileBackend, GeminiAnalyzer, GeminiClient, JournalService, JournalStore};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let store = Arc::new(JournalStore::new(FileBackend::from_config(&config.storage)));
//!     let client = GeminiClient::new(&config.gemini, config.request.clone())?;
//!     let service = JournalService::new(store, Arc::new(GeminiAnalyzer::new(client)));
//!     let recorded = service.record("Grateful for a quiet morning").await?;
//!     println!("score: {}", recorded.document.stats.score);
//!     Ok(())
//! }
//! ```

/// Region, habit and stats updates applied for each entry.
pub mod aggregate;
/// Command-line front end.
pub mod cli;
/// Time source used for day boundaries.
pub mod clock;
/// Configuration management.
pub mod config;
/// Error types and result aliases for the application.
pub mod error;
/// JSON export of the whole document.
pub mod export;
/// Gemini API client and entry analysis.
pub mod gemini;
/// Entry recording and page scanning.
pub mod journal;
/// Prompts sent to the model and shown to the writer.
pub mod prompts;
/// Document model and persistence.
pub mod storage;
/// Dashboard projections of the document.
pub mod summary;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use error::{AppError, AppResult, GeminiError, StorageError};
pub use gemini::{Analyzer, GeminiAnalyzer, GeminiClient};
pub use journal::{JournalService, RecordedEntry};
pub use storage::{Document, FileBackend, JournalStore, MemoryBackend, StorageBackend};
pub use summary::MapSummary;
