//! Centralized prompt definitions
//!
//! Holds the instructions sent to Gemini for entry analysis and page transcription,
//! plus the reflective writing prompts offered to the user.

use rand::seq::SliceRandom;

/// Region names offered to the model when the map is empty.
pub const DEFAULT_PART_NAMES: &str = "Fear, Shame, Inner Critic, Joy, Growth, Calm, Connection, \
Anger, Sadness, Courage, Vulnerability, Curiosity";

/// Instructions for analyzing one journal entry.
///
/// `{existing_parts}` and `{entry}` are substituted by [`analysis_prompt`].
pub const ANALYSIS_PROMPT: &str = r##"Analyze the following journal entry for therapeutic parts (Internal Family Systems style) and personal growth themes.

EXISTING PARTS in the user's map: {existing_parts}

Instructions:
1. Identify which existing parts are active in this entry
2. If you detect a NEW theme/part not in the existing list (e.g., "Gratitude", "Perfectionism", "Hope", "Protector", "Exile", "Firefighter", "Self-Compassion", "Wisdom"), include it as a new part
3. For new parts, suggest a color that feels emotionally appropriate
4. Generate 3-5 emojis that represent the MEANING and CONTENT of what the person wrote (topics, activities and themes, not only emotions). Work might be 💼, family 🏠, exercise 🏃, nature 🌳, food 🍽️, sleep 😴, music 🎵, reading 📚.

Return ONLY a JSON object with this structure:
{
  "summary": "one sentence summary",
  "content_emojis": ["💆", "🧘", "✨", "🌿"],
  "parts": [
    { "id": "fear", "strength": 0.8, "reason": "why", "isNew": false },
    { "id": "gratitude", "strength": 0.6, "reason": "expressed thankfulness", "isNew": true, "suggestedColor": "#ffd93d" }
  ],
  "overall_sentiment": "positive" | "neutral" | "negative",
  "growth_tip": "a short encouraging prompt based on the content",
  "detected_habits": ["meditation", "exercise"]
}

strength must be between 0.0 and 1.0.

Entry: "{entry}""##;

/// Instructions for transcribing a photographed journal page.
pub const TRANSCRIPTION_PROMPT: &str = r#"Transcribe the handwritten or printed journal text in this image exactly as written.

Guidelines:
- Preserve the writer's wording; fix nothing except obvious line-break hyphenation
- Join lines into natural paragraphs
- Omit page numbers, dates in margins and doodles
- If there is no legible text, respond with an empty message

Respond with the transcribed text only, no commentary."#;

/// Build the analysis prompt for `entry`, listing the parts already on the map.
pub fn analysis_prompt(entry: &str, existing_parts: &[String]) -> String {
    let existing = if existing_parts.is_empty() {
        DEFAULT_PART_NAMES.to_string()
    } else {
        existing_parts.join(", ")
    };

    ANALYSIS_PROMPT
        .replace("{existing_parts}", &existing)
        .replace("{entry}", entry)
}

/// Reflective writing prompts.
pub const JOURNAL_PROMPTS: [&str; 14] = [
    "How are you feeling in your body right now?",
    "What's one thing your Inner Critic has been saying today?",
    "Where in your life did you feel a sense of Growth today?",
    "Is there a small Joy you might have overlooked?",
    "What does your Fear want to protect you from today?",
    "How does it feel to be seen and heard in this space?",
    "Describe a moment where you felt Calm or at peace.",
    "Which 'part' of you needs the most love right now?",
    "If your Anger had a voice, what would it be shouting?",
    "Think of a moment you felt Connected to someone or something.",
    "What are you grateful for today?",
    "What habit would support your growth right now?",
    "How did you practice self-compassion today?",
    "What's a small win you can celebrate?",
];

/// Pick a writing prompt at random.
pub fn random_prompt() -> &'static str {
    JOURNAL_PROMPTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(JOURNAL_PROMPTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_prompt_embeds_entry_and_parts() {
        let prompt = analysis_prompt(
            "I felt brave today",
            &["Joy".to_string(), "Inner Critic".to_string()],
        );
        assert!(prompt.contains("EXISTING PARTS in the user's map: Joy, Inner Critic"));
        assert!(prompt.contains("Entry: \"I felt brave today\""));
        assert!(!prompt.contains("{entry}"));
    }

    #[test]
    fn test_analysis_prompt_keeps_full_json_example() {
        assert!(ANALYSIS_PROMPT.contains(r##""suggestedColor": "#ffd93d""##));
        assert!(ANALYSIS_PROMPT.contains("\"overall_sentiment\""));
        assert!(ANALYSIS_PROMPT.ends_with("Entry: \"{entry}\""));
    }

    #[test]
    fn test_analysis_prompt_falls_back_to_default_parts() {
        let prompt = analysis_prompt("text", &[]);
        assert!(prompt.contains(DEFAULT_PART_NAMES));
    }

    #[test]
    fn test_random_prompt_is_from_list() {
        let prompt = random_prompt();
        assert!(JOURNAL_PROMPTS.contains(&prompt));
    }
}
