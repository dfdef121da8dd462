//! Gemini API client and the entry analyzer built on it.

mod analyzer;
mod client;
mod types;


#[cfg(test)]
pub use analyzer::MockAnalyzer;
pub use analyzer::{
    fallback_analysis, parse_analysis, Analyzer, GeminiAnalyzer, FALLBACK_SUMMARY,
    NEW_PART_PALETTE,
};
pub use client::GeminiClient;
pub use types::{
    Candidate, Content, ContentPart, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, InlineData, UsageMetadata,
};
