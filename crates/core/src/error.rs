//! Error types for the mandrake-core library.
//!
//! Three families live here:
//! - [`AppError`] for infrastructure failures (config, IO, decoding, API setup),
//! - [`ValidationError`] for generation attempts rejected before any network I/O,
//! - [`RemoteEditError`] for failures of the remote edit call itself.

use thiserror::Error;

/// Errors that can occur within the mandrake-core library.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors (missing keys, invalid values).
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required environment variable was not found.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Image reading, decoding or encoding failed.
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// The image is not one of the accepted formats (PNG, JPEG, WEBP).
    #[error("Unsupported image format: {0}")]
    UnsupportedImage(String),

    /// A tool id that is not part of the catalog.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// General Gemini API error.
    #[error("Gemini API error: {0}")]
    GeminiApi(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an image processing error with the given message.
    pub fn image(msg: impl Into<String>) -> Self {
        Self::ImageProcessing(msg.into())
    }

    /// Creates a Gemini API error with the given message.
    pub fn gemini(msg: impl Into<String>) -> Self {
        Self::GeminiApi(msg.into())
    }
}

/// A generation attempt rejected before reaching the remote editor.
///
/// The `Display` text is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No photo has been loaded yet.
    #[error("Carregue uma foto antes de gerar.")]
    NoImage,

    /// No tool is active and the custom request is blank.
    #[error("Selecione pelo menos uma ferramenta ou descreva sua edição.")]
    NoInstructions,

    /// A previous generation has not resolved yet.
    #[error("Uma edição já está em andamento.")]
    InFlight,
}

/// Failure of the remote edit capability.
///
/// Carries the underlying technical message. It is meant for logs, never for
/// the user-facing status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RemoteEditError(pub String);

impl RemoteEditError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// The response carried no inline image part.
    pub fn no_image() -> Self {
        Self::new("No image data found in response")
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// A convenient alias for Result with [`AppError`].
pub type Result<T> = std::result::Result<T, AppError>;
