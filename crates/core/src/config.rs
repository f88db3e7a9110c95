use std::env;
use std::path::PathBuf;
use crate::error::{AppError, Result};
use dotenvy::dotenv;

/// Model used when `GEMINI_MODEL` is not set. Optimized for image edits.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

#[derive(Clone, Debug)]
pub struct Config {
    pub gemini_api_key: String,
    pub model_name: String,
    /// Directory where edited images are written.
    pub output_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_blank("GEMINI_API_KEY")
            .or_else(|| non_blank("API_KEY"))
            .ok_or_else(|| AppError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;

        let model_name = non_blank("GEMINI_MODEL")
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let output_dir = lookup("MANDRAKE_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            gemini_api_key: api_key,
            model_name,
            output_dir,
        })
    }
}
