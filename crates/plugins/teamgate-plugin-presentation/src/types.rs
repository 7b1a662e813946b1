//! Presentation documents and request bodies

use serde::{Deserialize, Serialize};

/// Slide count when a request names none
pub const DEFAULT_SLIDES: usize = 8;
/// Largest accepted slide count
pub const MAX_SLIDES: usize = 50;
/// Style when a request names none
pub const DEFAULT_STYLE: &str = "professional";

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

fn default_slides() -> usize {
    DEFAULT_SLIDES
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    /// Bullet points
    #[serde(default)]
    pub content: Vec<String>,
    /// Speaker notes
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub title: String,
    #[serde(default)]
    pub slides: Vec<Slide>,
}

/// Body of a generation request
#[derive(Debug, Clone, Deserialize)]
pub struct PresentationRequest {
    #[serde(default)]
    pub topic: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_slides")]
    pub slides: usize,
}

/// Listing entry for a stored presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationSummary {
    pub id: String,
    pub title: String,
    pub slide_count: usize,
    pub created_at: String,
}

/// A freshly generated and stored presentation
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPresentation {
    pub success: bool,
    pub presentation_id: String,
    pub presentation: Presentation,
}
