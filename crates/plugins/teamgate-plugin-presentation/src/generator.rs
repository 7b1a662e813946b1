//! Asking a model for a slide outline

use crate::types::{Presentation, Slide};
use teamgate_core::segment;

/// Instruction placed before every outline request
pub const DESIGNER_PREAMBLE: &str = "You are an expert presentation designer. Create engaging, \
well-structured presentations with clear, concise content.";

/// Speaker notes on the slide used when the model's reply is unusable
pub const FALLBACK_NOTES: &str = "AI response parsing failed, showing fallback content";

/// Full prompt for an outline of `slides` slides
pub fn outline_prompt(topic: &str, style: &str, slides: usize) -> String {
    format!(
        r#"{preamble}

Create a professional presentation on "{topic}" with exactly {slides} slides.
Style: {style}

Format the response as JSON with this structure:
{{
    "title": "Presentation Title",
    "slides": [
        {{
            "title": "Slide Title",
            "content": ["Bullet point 1", "Bullet point 2", "Bullet point 3"],
            "notes": "Speaker notes for this slide"
        }}
    ]
}}

Make each slide informative but concise. Include practical examples and actionable insights."#,
        preamble = DESIGNER_PREAMBLE,
    )
}

/// One-slide deck standing in for an unparsable reply
pub fn fallback_presentation(topic: &str) -> Presentation {
    Presentation {
        title: topic.to_string(),
        slides: vec![Slide {
            title: "Introduction".to_string(),
            content: vec![format!("Welcome to our presentation on {}", topic)],
            notes: FALLBACK_NOTES.to_string(),
        }],
    }
}

/// Read a deck out of a model reply
///
/// Reasoning spans are dropped first. The whole answer is tried as JSON,
/// then the outermost `{...}` inside it, to get past code fences and
/// chatter around the object.
pub fn parse_presentation(raw: &str) -> Option<Presentation> {
    let answer = segment(raw).answer;
    if let Ok(p) = serde_json::from_str::<Presentation>(&answer) {
        return Some(p);
    }
    let start = answer.find('{')?;
    let end = answer.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&answer[start..=end]).ok()
}

/// Parsed deck, or the fallback for `topic`
pub fn presentation_from_reply(raw: &str, topic: &str) -> Presentation {
    match parse_presentation(raw) {
        Some(p) => p,
        None => {
            tracing::warn!(topic = %topic, "model reply was not a presentation, using fallback");
            fallback_presentation(topic)
        }
    }
}
