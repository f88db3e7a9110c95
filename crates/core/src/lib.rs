//! Mandrake Studio Core Library
//!
//! Preset-driven photo editing on top of Google's Gemini image model. A user
//! loads a photo, toggles tools from a fixed catalog, optionally writes a
//! custom request, and the composed prompt is sent with the photo to the
//! remote editor.
//!
//! # Overview
//!
//! - **Catalog**: the fixed list of editing presets via [`catalog`]
//! - **Selection**: immutable toggle state via [`selection`]
//! - **Prompt**: pure prompt assembly via [`prompt`]
//! - **Images**: validation, data URLs and result files via [`image_processing`]
//! - **Remote editing**: the [`ImageEditor`] seam and its Gemini implementation via [`gemini`]
//! - **Orchestration**: the request lifecycle via [`studio`]
//!
//! # Quick Start
//!
//! ```ignore
//! use mandrake_core::{Config, SourceImage};
//!
//! mandrake_core::init();
//! let config = Config::load()?;
//! let mut studio = mandrake_core::gemini_studio(&config)?;
//!
//! studio.select_image(SourceImage::from_path("selfie.jpg")?);
//! studio.toggle_tool("fundo_urban")?;
//! studio.generate().await;
//! let path = studio.save_result(&config.output_dir)?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod gemini;
pub mod image_processing;
pub mod prompt;
pub mod selection;
pub mod studio;

// Re-export primary types for convenience
pub use catalog::{Tool, ToolCategory, CATALOG};
pub use config::Config;
pub use error::{AppError, RemoteEditError, Result, ValidationError};
pub use gemini::{GeminiEditor, ImageEditor};
pub use image_processing::{EditedImage, SourceImage};
pub use selection::{Selection, SelectionEffect};
pub use studio::{EditStatus, Studio};

/// Builds a [`Studio`] that edits through Gemini.
pub fn gemini_studio(config: &Config) -> Result<Studio> {
    let editor = GeminiEditor::new(config)?;
    Ok(Studio::new(Box::new(editor)))
}

/// Initializes the library by loading environment variables.
///
/// Call this once at application startup before reading configuration.
pub fn init() {
    let _ = dotenvy::dotenv();
}
