//! Edit orchestration.
//!
//! The [`Studio`] owns the session: the loaded photo, the tool selection and
//! the request status. It follows a small state machine:
//!
//! `Idle` -> `Loading` -> `Succeeded` | `Failed` -> `Loading` (regenerate)
//!                                              \-> `Idle` (reset)
//!
//! Generation is split into [`Studio::begin_generate`] and [`Studio::finish`]
//! so a front end can keep responding while the request is in flight. A
//! ticket issued before the last reset or photo change is stale and its
//! outcome is dropped.

use crate::error::{AppError, RemoteEditError, Result, ValidationError};
use crate::gemini::ImageEditor;
use crate::image_processing::{EditedImage, SourceImage};
use crate::prompt;
use crate::selection::{Selection, SelectionEffect};

/// Message shown for any remote failure. Details go to the log only.
pub const GENERIC_FAILURE: &str = "Erro na edição. Tente novamente.";

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum EditStatus {
    #[default]
    Idle,
    Loading,
    Succeeded(EditedImage),
    /// Holds the user-facing message.
    Failed(String),
}

impl EditStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, EditStatus::Loading)
    }
}

/// Everything needed to run one remote edit, detached from the studio.
#[derive(Clone, Debug)]
pub struct EditTicket {
    epoch: u64,
    pub image: SourceImage,
    pub prompt: String,
}

pub struct Studio {
    editor: Box<dyn ImageEditor>,
    selection: Selection,
    original: Option<SourceImage>,
    status: EditStatus,
    epoch: u64,
}

impl Studio {
    pub fn new(editor: Box<dyn ImageEditor>) -> Self {
        Self {
            editor,
            selection: Selection::default(),
            original: None,
            status: EditStatus::Idle,
            epoch: 0,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn status(&self) -> &EditStatus {
        &self.status
    }

    pub fn original_image(&self) -> Option<&SourceImage> {
        self.original.as_ref()
    }

    /// Present only when the last generation succeeded.
    pub fn result_image(&self) -> Option<&EditedImage> {
        match &self.status {
            EditStatus::Succeeded(image) => Some(image),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            EditStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Loads a new photo, clearing any previous result or error.
    pub fn select_image(&mut self, image: SourceImage) {
        let (width, height) = image.dimensions();
        tracing::info!(width, height, mime = image.mime().as_str(), "photo selected");
        self.original = Some(image);
        self.status = EditStatus::Idle;
        self.epoch += 1;
    }

    pub fn toggle_tool(&mut self, id: &str) -> Result<Option<SelectionEffect>> {
        let (next, effect) = self.selection.toggle(id)?;
        tracing::debug!(tool = id, active = next.is_active(id), "tool toggled");
        self.selection = next;
        Ok(effect)
    }

    /// Replaces the whole selection, e.g. one built from command-line flags.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn set_custom_text(&mut self, text: impl Into<String>) {
        self.selection = self.selection.with_custom_text(text);
    }

    /// The prompt that would be sent right now.
    pub fn prompt(&self) -> String {
        prompt::compose(&self.selection.active_tools(), self.selection.custom_text())
    }

    /// Whether the generate trigger should be enabled.
    pub fn can_generate(&self) -> bool {
        self.original.is_some() && self.selection.has_instructions() && !self.status.is_loading()
    }

    /// Validates preconditions and moves to `Loading`.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InFlight`] if a request is already pending. The
    ///   status is left untouched.
    /// - [`ValidationError::NoImage`] / [`ValidationError::NoInstructions`]:
    ///   the status becomes `Failed` with the validation message.
    pub fn begin_generate(&mut self) -> std::result::Result<EditTicket, ValidationError> {
        if self.status.is_loading() {
            tracing::debug!("generate ignored, request already in flight");
            return Err(ValidationError::InFlight);
        }

        let validation = match &self.original {
            None => Err(ValidationError::NoImage),
            Some(_) if !self.selection.has_instructions() => Err(ValidationError::NoInstructions),
            Some(image) => Ok(image.clone()),
        };

        let image = match validation {
            Ok(image) => image,
            Err(err) => {
                tracing::warn!(reason = %err, "generate rejected");
                self.status = EditStatus::Failed(err.to_string());
                return Err(err);
            }
        };

        self.status = EditStatus::Loading;
        Ok(EditTicket {
            epoch: self.epoch,
            image,
            prompt: self.prompt(),
        })
    }

    /// Applies the outcome of a ticket. Returns `false` if the ticket is stale.
    pub fn finish(
        &mut self,
        ticket: EditTicket,
        outcome: std::result::Result<EditedImage, RemoteEditError>,
    ) -> bool {
        if ticket.epoch != self.epoch || !self.status.is_loading() {
            tracing::info!("discarding result of a superseded request");
            return false;
        }

        self.status = match outcome {
            Ok(image) => {
                tracing::info!(size = image.bytes().len(), "edit succeeded");
                EditStatus::Succeeded(image)
            }
            Err(err) => {
                tracing::error!(error = %err, "edit failed");
                EditStatus::Failed(GENERIC_FAILURE.to_string())
            }
        };
        true
    }

    /// Runs a full generation against the configured editor.
    ///
    /// Validation failures are reflected in the status and never reach the
    /// editor. Returns the resulting status.
    pub async fn generate(&mut self) -> &EditStatus {
        if let Ok(ticket) = self.begin_generate() {
            let outcome = self.editor.edit(&ticket.image, &ticket.prompt).await;
            self.finish(ticket, outcome);
        }
        &self.status
    }

    /// Clears the session and restores the default selection.
    pub fn reset(&mut self) {
        tracing::info!("session reset");
        self.original = None;
        self.status = EditStatus::Idle;
        self.selection = Selection::default();
        self.epoch += 1;
    }

    /// Saves the current result into `dir`.
    pub fn save_result(&self, dir: impl AsRef<std::path::Path>) -> Result<std::path::PathBuf> {
        let image = self
            .result_image()
            .ok_or_else(|| AppError::image("No edited image to save"))?;
        image.save_to(dir)
    }
}
