//! Remote edit client backed by the Gemini image model.
//!
//! [`ImageEditor`] is the seam the orchestrator talks to. [`GeminiEditor`] is
//! the production implementation; tests substitute their own.

use crate::config::Config;
use crate::error::{AppError, RemoteEditError, Result};
use crate::image_processing::{EditedImage, ImageProcessor, SourceImage};
use crate::prompt::{user_request, SYSTEM_INSTRUCTION};
use async_trait::async_trait;
use gemini_rust::{Blob, Content, Gemini, Message, Part, Role};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// A remote capability that edits an image according to a prompt.
#[async_trait]
pub trait ImageEditor: Send + Sync {
    /// Sends one edit request. No retries and no timeout beyond the transport's.
    async fn edit(&self, image: &SourceImage, prompt: &str) -> std::result::Result<EditedImage, RemoteEditError>;
}

pub struct GeminiEditor {
    client: Gemini,
    model_name: String,
}

impl GeminiEditor {
    pub fn new(config: &Config) -> Result<Self> {
        // Explicit base URL avoids the BadScheme error from the default builder
        let base_url = url::Url::parse(BASE_URL)
            .map_err(|e| AppError::config(format!("Invalid base URL: {}", e)))?;

        let model_name = if config.model_name.starts_with("models/") {
            config.model_name.clone()
        } else {
            format!("models/{}", config.model_name)
        };
        let model_url = format!("{}{}", BASE_URL, model_name);

        let client = Gemini::with_model_and_base_url(&config.gemini_api_key, model_url, base_url)
            .map_err(|e| AppError::gemini(format!("Failed to create Gemini client: {}", e)))?;

        Ok(Self { client, model_name })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn build_message(image: &SourceImage, prompt: &str) -> Message {
        let instruction_part = Part::Text {
            text: SYSTEM_INSTRUCTION.to_string(),
            thought: None,
            thought_signature: None,
        };

        let request_part = Part::Text {
            text: user_request(prompt),
            thought: None,
            thought_signature: None,
        };

        let image_part = Part::InlineData {
            inline_data: Blob {
                mime_type: image.mime().as_str().to_string(),
                data: ImageProcessor::strip_data_url_header(image.data_url()).to_string(),
            },
        };

        Message {
            role: Role::User,
            content: Content {
                role: Some(Role::User),
                parts: Some(vec![instruction_part, request_part, image_part]),
            },
        }
    }
}

/// Returns the first non-empty inline image payload.
fn first_inline_image(parts: &[Part]) -> Option<&str> {
    parts.iter().find_map(|part| match part {
        Part::InlineData { inline_data, .. } if !inline_data.data.is_empty() => {
            Some(inline_data.data.as_str())
        }
        _ => None,
    })
}

#[async_trait]
impl ImageEditor for GeminiEditor {
    async fn edit(&self, image: &SourceImage, prompt: &str) -> std::result::Result<EditedImage, RemoteEditError> {
        tracing::info!(model = %self.model_name, prompt_len = prompt.len(), "sending edit request");

        let message = Self::build_message(image, prompt);
        let response = self
            .client
            .generate_content()
            .with_messages(vec![message])
            .execute()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Gemini API error");
                RemoteEditError::new(e.to_string())
            })?;

        let data = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.as_deref())
            .and_then(first_inline_image)
            .ok_or_else(|| {
                tracing::error!("Gemini response contained no image part");
                RemoteEditError::no_image()
            })?;

        EditedImage::from_base64(data).map_err(|e| {
            tracing::error!(error = %e, "Gemini returned an undecodable image");
            RemoteEditError::new(e.to_string())
        })
    }
}
