//! Slide deck generation
//!
//! A [`PresentationService`] asks the model for a JSON outline of a topic,
//! falls back to a one-slide deck when the reply cannot be read, and keeps
//! every result as a JSON file in a [`PresentationStore`].

#![warn(clippy::all)]

pub mod generator;
pub mod store;
pub mod types;

pub use generator::{
    fallback_presentation, outline_prompt, parse_presentation, presentation_from_reply,
    DESIGNER_PREAMBLE, FALLBACK_NOTES,
};
pub use store::{created_at, validate_id, PresentationStore};
pub use types::{
    GeneratedPresentation, Presentation, PresentationRequest, PresentationSummary, Slide,
    DEFAULT_SLIDES, DEFAULT_STYLE, MAX_SLIDES,
};

use std::path::PathBuf;
use std::sync::Arc;
use teamgate_core::{GenerationOptions, Result, TeamgateError, TextGenerator};

/// Subdirectory of the data directory holding presentation files
pub const PRESENTATIONS_DIR: &str = "presentations";

pub struct PresentationService {
    generator: Arc<dyn TextGenerator>,
    store: PresentationStore,
    options: GenerationOptions,
}

impl PresentationService {
    /// Service writing to `<data_dir>/presentations`
    pub fn new(generator: Arc<dyn TextGenerator>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            generator,
            store: PresentationStore::new(data_dir.into().join(PRESENTATIONS_DIR)),
            options: GenerationOptions {
                model: None,
                temperature: Some(0.7),
                max_tokens: Some(2000),
            },
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.options.model = Some(model.into());
        self
    }

    pub fn store(&self) -> &PresentationStore {
        &self.store
    }

    /// Generate, store and return a deck
    pub async fn generate(&self, request: &PresentationRequest) -> Result<GeneratedPresentation> {
        let topic = request.topic.trim();
        if topic.is_empty() {
            return Err(TeamgateError::validation("Topic is required"));
        }
        if request.slides == 0 || request.slides > MAX_SLIDES {
            return Err(TeamgateError::validation(format!(
                "slides must be between 1 and {}",
                MAX_SLIDES
            )));
        }

        tracing::info!(
            topic = %topic,
            slides = request.slides,
            style = %request.style,
            "generating presentation"
        );
        let prompt = outline_prompt(topic, &request.style, request.slides);
        let raw = self.generator.generate(&prompt, &self.options).await?;
        let presentation = presentation_from_reply(&raw, topic);
        let presentation_id = self.store.save(&presentation).await?;

        Ok(GeneratedPresentation {
            success: true,
            presentation_id,
            presentation,
        })
    }

    pub async fn get(&self, id: &str) -> Result<Presentation> {
        self.store.get(id).await
    }

    pub async fn list(&self) -> Result<Vec<PresentationSummary>> {
        self.store.list().await
    }
}
