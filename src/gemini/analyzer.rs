use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use super::client::GeminiClient;
use super::types::{ContentPart, GenerateContentRequest};
use crate::aggregate::regions::random_position;
use crate::error::{GeminiError, GeminiResult};
use crate::prompts::{analysis_prompt, TRANSCRIPTION_PROMPT};
use crate::storage::{Analysis, Part, Sentiment};

/// Colours handed to new parts when the model suggests none.
pub const NEW_PART_PALETTE: [&str; 15] = [
    "#ff6b6b", "#feca57", "#48dbfb", "#ff9ff3", "#54a0ff", "#5f27cd", "#00d2d3", "#ff6b81",
    "#7bed9f", "#eccc68", "#a29bfe", "#fd79a8", "#00cec9", "#fab1a0", "#81ecec",
];

/// Summary recorded when analysis fails.
pub const FALLBACK_SUMMARY: &str = "Analysis unavailable, but entry recorded.";

/// The remote collaborator that turns journal text into an [`Analysis`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze `text`, given the display names of the regions already on the map.
    async fn analyze(&self, text: &str, existing_parts: &[String]) -> GeminiResult<Analysis>;

    /// Transcribe the text in an image. Never returns an empty string.
    async fn transcribe(&self, image: &[u8], mime_type: &str) -> GeminiResult<String>;
}

/// [`Analyzer`] backed by Gemini.
#[derive(Clone)]
pub struct GeminiAnalyzer {
    client: GeminiClient,
}

impl GeminiAnalyzer {
    /// Create an analyzer over `client`
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(&self, text: &str, existing_parts: &[String]) -> GeminiResult<Analysis> {
        debug!(
            chars = text.chars().count(),
            existing = existing_parts.len(),
            "Requesting entry analysis"
        );

        let request = GenerateContentRequest::from_text(analysis_prompt(text, existing_parts))
            .with_json_output();
        let completion = self.client.generate_text(&request).await?;
        let analysis = parse_analysis(&completion, &mut rand::thread_rng())?;

        info!(
            parts = analysis.parts.len(),
            new_parts = analysis.parts.iter().filter(|p| p.is_new).count(),
            sentiment = %analysis.overall_sentiment,
            "Entry analysis received"
        );
        Ok(analysis)
    }

    async fn transcribe(&self, image: &[u8], mime_type: &str) -> GeminiResult<String> {
        debug!(bytes = image.len(), mime_type = %mime_type, "Requesting transcription");

        let request = GenerateContentRequest::new(vec![
            ContentPart::text(TRANSCRIPTION_PROMPT),
            ContentPart::inline_data(mime_type, general_purpose::STANDARD.encode(image)),
        ]);
        let text = self.client.generate_text(&request).await?;
        let text = text.trim();

        if text.is_empty() {
            return Err(GeminiError::EmptyCandidates);
        }

        info!(chars = text.chars().count(), "Transcription received");
        Ok(text.to_string())
    }
}

/// Parse and validate the model's completion text into an [`Analysis`].
///
/// Markdown code fences are stripped before parsing. Parts with a blank id are dropped,
/// strengths are clamped to `[0, 1]`, and every new part gets a colour and a position.
pub fn parse_analysis<R: Rng + ?Sized>(completion: &str, rng: &mut R) -> GeminiResult<Analysis> {
    let json = extract_json(completion);
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| GeminiError::InvalidResponse {
            message: format!("Analysis is not valid JSON: {}", e),
        })?;

    // Stored documents read unknown sentiments as neutral; fresh analyses must be exact.
    let sentiment = value.get("overall_sentiment").and_then(|v| v.as_str());
    if let Err(e) = sentiment.unwrap_or_default().parse::<Sentiment>() {
        return Err(GeminiError::InvalidResponse { message: e });
    }

    let mut analysis: Analysis =
        serde_json::from_value(value).map_err(|e| GeminiError::InvalidResponse {
            message: format!("Analysis has the wrong shape: {}", e),
        })?;

    analysis.parts.retain(|p| !p.id.trim().is_empty());
    for part in &mut analysis.parts {
        part.strength = if part.strength.is_finite() {
            part.strength.clamp(0.0, 1.0)
        } else {
            0.0
        };

        if part.is_new {
            if part.suggested_color.as_deref().map_or(true, |c| c.trim().is_empty()) {
                part.suggested_color = NEW_PART_PALETTE.choose(rng).map(|c| c.to_string());
            }
            part.suggested_position = Some(random_position(rng));
        }
    }

    Ok(analysis)
}

/// The analysis recorded when the remote call fails.
pub fn fallback_analysis() -> Analysis {
    Analysis {
        summary: FALLBACK_SUMMARY.to_string(),
        content_emojis: vec!["💭".to_string(), "📝".to_string(), "✨".to_string()],
        parts: vec![Part::existing("growth", 0.1).with_reason("Self-expression")],
        overall_sentiment: Sentiment::Neutral,
        growth_tip: "Continue exploring your inner landscape.".to_string(),
        detected_habits: Vec::new(),
    }
}

fn extract_json(completion: &str) -> &str {
    let trimmed = completion.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.trim_end().trim_end_matches("```"))
        .unwrap_or(trimmed)
        .trim();

    if unfenced.starts_with('{') {
        return unfenced;
    }
    // Prose around the object
    match (unfenced.find('{'), unfenced.rfind('}')) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}
