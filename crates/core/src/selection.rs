//! Tool selection state.
//!
//! A [`Selection`] is an immutable value: every toggle returns a new one.
//! Presentation side effects (moving focus to the text input) are returned as
//! [`SelectionEffect`] values for the front end to act on.

use crate::catalog::{self, Tool, DEFAULT_SELECTION, FREE_FORM_TOOL_ID, UNRESTRICTED_TOOL_ID};
use crate::error::{AppError, Result};

/// Side effect requested by a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionEffect {
    /// The custom request input should receive focus.
    FocusCustomText,
}

/// Active tool ids (in the order they were picked) plus the free-text request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    active: Vec<&'static str>,
    custom_text: String,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            active: DEFAULT_SELECTION.to_vec(),
            custom_text: String::new(),
        }
    }
}

impl Selection {
    /// A selection with nothing active and no custom text.
    pub fn empty() -> Self {
        Self {
            active: Vec::new(),
            custom_text: String::new(),
        }
    }

    /// Removes `id` if active, adds it otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::UnknownTool`] if `id` is not in the catalog.
    pub fn toggle(&self, id: &str) -> Result<(Selection, Option<SelectionEffect>)> {
        let tool = catalog::find(id).ok_or_else(|| AppError::UnknownTool(id.to_string()))?;

        let mut next = self.clone();
        if let Some(pos) = next.active.iter().position(|active| *active == tool.id) {
            next.active.remove(pos);
            return Ok((next, None));
        }

        next.active.push(tool.id);
        let effect = (tool.id == FREE_FORM_TOOL_ID).then_some(SelectionEffect::FocusCustomText);
        Ok((next, effect))
    }

    pub fn with_custom_text(&self, text: impl Into<String>) -> Selection {
        Selection {
            active: self.active.clone(),
            custom_text: text.into(),
        }
    }

    pub fn custom_text(&self) -> &str {
        &self.custom_text
    }

    /// Active ids in the order they were picked.
    pub fn active_ids(&self) -> &[&'static str] {
        &self.active
    }

    /// Active tools in catalog order.
    pub fn active_tools(&self) -> Vec<&'static Tool> {
        catalog::CATALOG
            .iter()
            .filter(|tool| self.is_active(tool.id))
            .collect()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().any(|active| *active == id)
    }

    pub fn is_unrestricted(&self) -> bool {
        self.is_active(UNRESTRICTED_TOOL_ID)
    }

    /// True when at least one tool is active or the custom request is not blank.
    pub fn has_instructions(&self) -> bool {
        !self.active.is_empty() || !self.custom_text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_holds_default_subset() {
        let selection = Selection::default();
        assert_eq!(selection.active_ids(), DEFAULT_SELECTION);
        assert!(selection.custom_text().is_empty());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let selection = Selection::empty();
        let (on, effect) = selection.toggle("fundo_urban").unwrap();
        assert!(on.is_active("fundo_urban"));
        assert_eq!(effect, None);

        let (off, _) = on.toggle("fundo_urban").unwrap();
        assert!(!off.is_active("fundo_urban"));
        // original value untouched
        assert!(selection.active_ids().is_empty());
    }

    #[test]
    fn free_form_requests_focus_only_on_activation() {
        let (on, effect) = Selection::empty().toggle(FREE_FORM_TOOL_ID).unwrap();
        assert_eq!(effect, Some(SelectionEffect::FocusCustomText));

        let (_, effect) = on.toggle(FREE_FORM_TOOL_ID).unwrap();
        assert_eq!(effect, None);
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let err = Selection::default().toggle("chapeu").unwrap_err();
        assert!(matches!(err, AppError::UnknownTool(id) if id == "chapeu"));
    }

    #[test]
    fn active_tools_follow_catalog_order() {
        let (s, _) = Selection::empty().toggle("fundo_urban").unwrap();
        let (s, _) = s.toggle("juliet").unwrap();
        let ids: Vec<_> = s.active_tools().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["juliet", "fundo_urban"]);
        assert_eq!(s.active_ids(), &["fundo_urban", "juliet"]);
    }

    #[test]
    fn blank_text_is_not_an_instruction() {
        let s = Selection::empty().with_custom_text("   ");
        assert!(!s.has_instructions());
        assert!(s.with_custom_text("boné").has_instructions());
        assert!(Selection::default().has_instructions());
    }

    #[test]
    fn unrestricted_flag_tracks_tool() {
        let (s, _) = Selection::default().toggle(UNRESTRICTED_TOOL_ID).unwrap();
        assert!(s.is_unrestricted());
        assert!(!Selection::default().is_unrestricted());
    }
}
