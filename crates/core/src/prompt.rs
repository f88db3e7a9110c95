//! Prompt assembly for the remote editor.

use crate::catalog::{self, Tool, UNRESTRICTED_TOOL_ID};

/// Fixed framing sent ahead of every user request.
pub const SYSTEM_INSTRUCTION: &str = "Instruction: You are an advanced AI photo editor. Edit the input image based on the user's request. You are capable of both realistic photo retouching and complete artistic transformations. Follow the user's prompt precisely, whether they ask for subtle adjustments or drastic changes.";

/// Prefix of the text part that carries the composed prompt.
pub const USER_REQUEST_PREFIX: &str = "User Request: ";

/// Closing instruction used unless unrestricted mode is active.
pub const REALISM_SUFFIX: &str = "Mantenha a imagem realista, preserve a identidade da pessoa e garanta que todas as modificações pareçam naturais e profissionais.";

/// Closing instruction used when unrestricted mode is active.
pub const UNRESTRICTED_SUFFIX: &str = "Execute a edição com total liberdade criativa. Ignore restrições de realismo ou preservação de identidade se o pedido exigir.";

/// Builds the final instruction string.
///
/// Tools are emitted in catalog order whatever order they arrive in, and a
/// tool listed twice contributes its fragment once. Fragments are joined with
/// a single space, followed by the trimmed custom text, then exactly one
/// closing suffix. With no fragments and no text the suffix is returned alone;
/// callers are expected to block generation before that point.
pub fn compose(active_tools: &[&Tool], custom_text: &str) -> String {
    let mut ordered: Vec<&Tool> = active_tools.to_vec();
    // Ids outside the catalog keep their relative order at the end
    ordered.sort_by_key(|tool| catalog::position(tool.id).unwrap_or(usize::MAX));
    ordered.dedup_by_key(|tool| tool.id);

    let fragments = ordered
        .iter()
        .map(|tool| tool.prompt_fragment)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let combined = format!("{} {}", fragments, custom_text.trim());
    let combined = combined.trim();

    let unrestricted = active_tools.iter().any(|tool| tool.id == UNRESTRICTED_TOOL_ID);
    let suffix = if unrestricted {
        UNRESTRICTED_SUFFIX
    } else {
        REALISM_SUFFIX
    };

    if combined.is_empty() {
        suffix.to_string()
    } else {
        format!("{}. {}", combined, suffix)
    }
}

/// The text part sent alongside the image.
pub fn user_request(prompt: &str) -> String {
    format!("{}{}", USER_REQUEST_PREFIX, prompt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ToolCategory, CATALOG, FREE_FORM_TOOL_ID};

    fn tool(id: &'static str, fragment: &'static str) -> Tool {
        Tool {
            id,
            name: id,
            description: "",
            icon: "",
            category: ToolCategory::Style,
            prompt_fragment: fragment,
        }
    }

    #[test]
    fn joins_fragments_and_custom_text() {
        let a = tool("juliet", "A");
        let b = tool("corrente", "B");
        let prompt = compose(&[&a, &b], "C");
        assert_eq!(prompt, format!("A B C. {}", REALISM_SUFFIX));
        assert!(prompt.starts_with("A B C. Mantenha a imagem realista"));
    }

    #[test]
    fn custom_text_is_trimmed() {
        let a = tool("juliet", "A");
        assert_eq!(compose(&[&a], "  boné  "), format!("A boné. {}", REALISM_SUFFIX));
    }

    #[test]
    fn empty_fragments_are_skipped() {
        let a = tool("juliet", "A");
        let free = catalog::find(FREE_FORM_TOOL_ID).unwrap();
        assert_eq!(compose(&[&a, free], ""), format!("A. {}", REALISM_SUFFIX));
    }

    #[test]
    fn unrestricted_switches_suffix() {
        let unrestricted = catalog::find(UNRESTRICTED_TOOL_ID).unwrap();
        let prompt = compose(&[unrestricted], "vire um desenho");
        assert_eq!(prompt, format!("vire um desenho. {}", UNRESTRICTED_SUFFIX));
        assert!(!prompt.contains(REALISM_SUFFIX));
    }

    #[test]
    fn nothing_selected_yields_suffix_alone() {
        assert_eq!(compose(&[], "   "), REALISM_SUFFIX);
    }

    #[test]
    fn every_fragment_appears_once_in_catalog_order() {
        let with_fragments: Vec<&Tool> = CATALOG.iter().filter(|t| t.has_fragment()).collect();
        let prompt = compose(&with_fragments, "");

        let mut last = 0;
        for tool in &with_fragments {
            assert_eq!(prompt.matches(tool.prompt_fragment).count(), 1, "{}", tool.id);
            let at = prompt.find(tool.prompt_fragment).unwrap();
            assert!(at >= last, "{} out of order", tool.id);
            last = at;
        }
        assert!(prompt.ends_with(REALISM_SUFFIX));
    }

    #[test]
    fn selection_order_does_not_change_output() {
        let juliet = catalog::find("juliet").unwrap();
        let fundo = catalog::find("fundo_urban").unwrap();

        let prompt = compose(&[fundo, juliet], "");

        assert_eq!(prompt, compose(&[juliet, fundo], ""));
        assert!(prompt.find(juliet.prompt_fragment).unwrap() < prompt.find(fundo.prompt_fragment).unwrap());
    }

    #[test]
    fn repeated_tool_contributes_once() {
        let juliet = catalog::find("juliet").unwrap();

        let prompt = compose(&[juliet, juliet], "");

        assert_eq!(prompt.matches(juliet.prompt_fragment).count(), 1);
        assert_eq!(prompt, format!("{}. {}", juliet.prompt_fragment, REALISM_SUFFIX));
    }

    #[test]
    fn user_request_is_prefixed() {
        assert_eq!(user_request("X"), "User Request: X");
    }
}
