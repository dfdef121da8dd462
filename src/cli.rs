//! Command-line interface for the growth map.
//!
//! Each command runs against a [`JournalService`] and renders a plain-text report.

use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::error::{AppError, AppResult};
use crate::export::export_to_dir;
use crate::journal::JournalService;
use crate::prompts::random_prompt;
use crate::storage::{Document, Habit, Part, Sentiment};
use crate::summary::{part_color, MapSummary};

/// Growth map journaling CLI.
#[derive(Parser, Debug)]
#[command(name = "growth-map", version)]
#[command(about = "Journal entries analyzed into a growing map of emotional parts")]
pub struct Cli {
    /// Path of the document file (overrides GROWTH_MAP_DATA_PATH)
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Record a journal entry from an argument, a file, or stdin
    Write {
        /// Entry text; read from --file or stdin when omitted
        text: Option<String>,

        /// Read the entry from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Transcribe a photographed journal page
    Scan {
        /// Image file (png, jpg, webp, heic, gif)
        image: PathBuf,

        /// Record the transcription as an entry
        #[arg(long)]
        record: bool,

        /// MIME type, inferred from the file extension when omitted
        #[arg(long)]
        mime_type: Option<String>,
    },

    /// Manage tracked habits
    Habits {
        #[command(subcommand)]
        command: HabitCommands,
    },

    /// Show or change reminder settings
    Reminders {
        /// Turn reminders on
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Turn reminders off
        #[arg(long)]
        disable: bool,

        /// Morning reminder time (HH:MM)
        #[arg(long)]
        journal_time: Option<String>,

        /// Evening reminder time (HH:MM)
        #[arg(long)]
        evening_time: Option<String>,
    },

    /// Show score, top parts, habits and recent entries
    Summary {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export the full document to a dated JSON file
    Export {
        /// Output directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },

    /// Print a reflective writing prompt
    Prompt,

    /// Delete all entries, regions and habits
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

/// Habit subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum HabitCommands {
    /// List habits with streaks
    List,

    /// Mark a habit done for today
    Complete {
        /// Habit id, e.g. "meditation"
        id: String,
    },

    /// Add a habit
    Add {
        /// Habit name
        name: String,

        /// Emoji icon
        #[arg(long)]
        icon: Option<String>,

        /// Hex colour
        #[arg(long)]
        color: Option<String>,
    },

    /// Remove a habit
    Remove {
        /// Habit id
        id: String,
    },
}

/// Execute a command and return the text to print.
pub async fn execute_command(command: Commands, service: &JournalService) -> AppResult<String> {
    let store = service.store();
    match command {
        Commands::Write { text, file } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_text_file(&path)?,
                (None, None) => read_stdin()?,
            };
            record(service, &text).await
        }
        Commands::Scan {
            image,
            record: also_record,
            mime_type,
        } => {
            let mime_type = match mime_type {
                Some(m) => m,
                None => mime_for_path(&image)
                    .ok_or_else(|| {
                        AppError::validation("image", "Unknown image type, pass --mime-type")
                    })?
                    .to_string(),
            };
            let bytes = std::fs::read(&image).map_err(|e| {
                AppError::validation("image", format!("{}: {}", image.display(), e))
            })?;

            let text = service.scan(&bytes, &mime_type).await?;
            if also_record {
                let report = record(service, &text).await?;
                Ok(format!("{}\n\n{}", text, report))
            } else {
                Ok(text)
            }
        }
        Commands::Habits { command } => {
            let habits = match command {
                HabitCommands::List => store.habits()?,
                HabitCommands::Complete { id } => {
                    let doc = store.load()?;
                    if doc.habit(&id).is_none() {
                        return Err(AppError::validation("id", format!("No habit '{}'", id)));
                    }
                    store.complete_habit(&id)?.habits
                }
                HabitCommands::Add { name, icon, color } => {
                    store
                        .add_habit(&name, icon.as_deref(), color.as_deref())?
                        .habits
                }
                HabitCommands::Remove { id } => store.remove_habit(&id)?.habits,
            };
            Ok(render_habits(&habits, store.clock().today()))
        }
        Commands::Reminders {
            enable,
            disable,
            journal_time,
            evening_time,
        } => {
            let current = store.load()?.reminders;
            let doc = if enable || disable || journal_time.is_some() || evening_time.is_some() {
                let enabled = enable || (!disable && current.enabled);
                store.set_reminders(
                    enabled,
                    Some(journal_time.as_deref().unwrap_or(&current.journal_time)),
                    Some(evening_time.as_deref().unwrap_or(&current.evening_time)),
                )?
            } else {
                store.load()?
            };
            let r = &doc.reminders;
            Ok(format!(
                "Reminders: {} (journal {}, evening {})",
                if r.enabled { "on" } else { "off" },
                r.journal_time,
                r.evening_time
            ))
        }
        Commands::Summary { json } => {
            let summary = MapSummary::from_document(&store.load()?, store.clock().today());
            if json {
                serde_json::to_string_pretty(&summary).map_err(|e| AppError::Internal {
                    message: e.to_string(),
                })
            } else {
                Ok(render_summary(&summary))
            }
        }
        Commands::Export { out } => {
            let doc = store.load()?;
            let path = export_to_dir(&doc, &out, store.clock().today())?;
            Ok(format!("Exported to {}", path.display()))
        }
        Commands::Prompt => Ok(random_prompt().to_string()),
        Commands::Reset { yes } => {
            if !yes {
                return Err(AppError::validation(
                    "yes",
                    "Reset deletes your entire map and all entries; pass --yes to confirm",
                ));
            }
            store.reset()?;
            Ok("Growth map reset.".to_string())
        }
    }
}

async fn record(service: &JournalService, text: &str) -> AppResult<String> {
    let recorded = service.record(text).await?;
    let doc = &recorded.document;

    let mut out = String::new();
    if let Some(entry) = doc.entries.first() {
        let analysis = &entry.analysis;
        let _ = writeln!(
            out,
            "{} {} {}",
            sentiment_emoji(analysis.overall_sentiment),
            analysis.overall_sentiment,
            analysis.content_emojis.join(" ")
        );
        let _ = writeln!(out, "{}", analysis.summary);
        if !analysis.parts.is_empty() {
            let _ = writeln!(out, "Parts: {}", render_parts(doc, &analysis.parts));
        }
        if !analysis.growth_tip.is_empty() {
            let _ = writeln!(out, "💡 {}", analysis.growth_tip);
        }
    }
    if !recorded.new_parts.is_empty() {
        let _ = writeln!(
            out,
            "New part discovered! {} has been added to your map",
            recorded.new_parts.join(", ")
        );
    }
    if recorded.degraded {
        let _ = writeln!(out, "(analysis unavailable, entry recorded)");
    }
    let _ = write!(
        out,
        "Growth {}% · {} · {} entries",
        doc.stats.score,
        days_label(doc.stats.days_traveled),
        doc.stats.total_entries
    );
    Ok(out)
}

fn render_summary(summary: &MapSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Growth {}% · {} · {} entries · {} parts discovered",
        summary.score,
        days_label(summary.days_traveled),
        summary.total_entries,
        summary.parts_discovered
    );

    let top: Vec<&str> = summary.top_parts.iter().map(|r| r.name.as_str()).collect();
    let _ = writeln!(out, "Top parts: {}", top.join(", "));

    if let Some(tip) = &summary.latest_tip {
        let _ = writeln!(out, "💡 {}", tip);
    }

    let _ = writeln!(out, "\nHabits");
    for status in &summary.habits {
        let _ = writeln!(
            out,
            "  {} {}",
            if status.completed_today { "✓" } else { " " },
            habit_line(&status.habit)
        );
    }

    if !summary.recent_entries.is_empty() {
        let _ = writeln!(out, "\nRecent entries");
        for entry in &summary.recent_entries {
            let _ = writeln!(
                out,
                "  {} {} {}",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                sentiment_emoji(entry.analysis.overall_sentiment),
                entry.analysis.summary
            );
        }
    }
    out.trim_end().to_string()
}

/// Part labels with the colour of the region each one landed in.
fn render_parts(doc: &Document, parts: &[Part]) -> String {
    parts
        .iter()
        .map(|p| {
            let mut label = p.id.clone();
            if let Some(color) = part_color(doc, &p.id) {
                let _ = write!(label, " ({})", color);
            }
            if p.is_new {
                label.push_str(" ✨");
            }
            label
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_habits(habits: &[Habit], today: chrono::NaiveDate) -> String {
    habits
        .iter()
        .map(|h| {
            format!(
                "{} {}  [{}]",
                if h.completed_on(today) { "✓" } else { " " },
                habit_line(h),
                h.id
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn habit_line(habit: &Habit) -> String {
    format!("{} {} · {} day streak 🔥", habit.icon, habit.name, habit.streak)
}

fn days_label(days: u32) -> String {
    if days == 1 {
        "1 Day".to_string()
    } else {
        format!("{} Days", days)
    }
}

fn sentiment_emoji(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "😊",
        Sentiment::Neutral => "😐",
        Sentiment::Negative => "😔",
    }
}

fn read_text_file(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| AppError::validation("file", format!("{}: {}", path.display(), e)))
}

fn read_stdin() -> AppResult<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|e| AppError::validation("stdin", e.to_string()))?;
    Ok(text)
}

/// MIME type for an image path, from its extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
