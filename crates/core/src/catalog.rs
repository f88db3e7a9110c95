//! The fixed catalog of editing presets.
//!
//! Tools are defined once at startup and never change. Catalog order is
//! significant: the prompt composer concatenates fragments in this order,
//! whatever order the user picked them in.

use serde::Serialize;
use std::fmt;

/// Grouping shown next to each tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    Style,
    Cleanup,
    Background,
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ToolCategory::Style => "style",
            ToolCategory::Cleanup => "cleanup",
            ToolCategory::Background => "background",
        };
        f.write_str(label)
    }
}

/// A predefined editing instruction with its display metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Tool {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub category: ToolCategory,
    /// Instruction fragment added to the prompt. Empty for tools that only
    /// change behavior (free-form text, unrestricted mode).
    pub prompt_fragment: &'static str,
}

impl Tool {
    pub fn has_fragment(&self) -> bool {
        !self.prompt_fragment.is_empty()
    }
}

/// Activating this tool moves the user to the custom request input.
pub const FREE_FORM_TOOL_ID: &str = "editor_livre";

/// Switches the closing instruction from realism to creative freedom.
pub const UNRESTRICTED_TOOL_ID: &str = "sem_limites";

/// Tools active on startup and after every reset.
pub const DEFAULT_SELECTION: &[&str] = &["juliet", "corrente"];

pub static CATALOG: &[Tool] = &[
    Tool {
        id: "juliet",
        name: "Juliet de Prata",
        description: "Os famosos óculos Juliet reflexivos.",
        icon: "🕶️",
        category: ToolCategory::Style,
        prompt_fragment: "Adicione óculos escuros estilo 'Juliet' (Oakley Romeo) prateados reflexivos no rosto da pessoa perfeitamente encaixados.",
    },
    Tool {
        id: "corrente",
        name: "Corrente 25g",
        description: "Corrente de prata grossa no pescoço.",
        icon: "🔗",
        category: ToolCategory::Style,
        prompt_fragment: "Adicione uma corrente grossa de prata legítima estilo '25 gramas' no pescoço da pessoa.",
    },
    Tool {
        id: "limpar_espelho",
        name: "Limpar Espelho",
        description: "Remove manchas e sujeira do reflexo.",
        icon: "✨",
        category: ToolCategory::Cleanup,
        prompt_fragment: "Remova todas as manchas de dedo, poeira e sujeira do espelho. Deixe o reflexo cristalino e limpo.",
    },
    Tool {
        id: "remover_carros",
        name: "Tirar Carros",
        description: "Limpa os carros do fundo da imagem.",
        icon: "🚗",
        category: ToolCategory::Cleanup,
        prompt_fragment: "Remova todos os veículos e carros visíveis no fundo da imagem e preencha o cenário de forma natural.",
    },
    Tool {
        id: "cabelo_regua",
        name: "Corte na Régua",
        description: "Disfarçado perfeito (fade).",
        icon: "💈",
        category: ToolCategory::Style,
        prompt_fragment: "Ajuste o corte de cabelo da pessoa para um 'fade' ou 'disfarçado' perfeito e bem marcado nas laterais (na régua).",
    },
    Tool {
        id: "fundo_urban",
        name: "Fundo Noturno",
        description: "Cenário urbano de luxo à noite.",
        icon: "🌃",
        category: ToolCategory::Background,
        prompt_fragment: "Troque o fundo da imagem por um cenário urbano moderno de uma metrópole à noite com luzes bokeh.",
    },
    Tool {
        id: FREE_FORM_TOOL_ID,
        name: "Editor Livre",
        description: "Edite qualquer coisa com texto.",
        icon: "🪄",
        category: ToolCategory::Style,
        prompt_fragment: "",
    },
    Tool {
        id: UNRESTRICTED_TOOL_ID,
        name: "Sem Restrições",
        description: "Libera a IA para mudanças drásticas.",
        icon: "🔓",
        category: ToolCategory::Style,
        prompt_fragment: "",
    },
];

/// Looks up a tool by id.
pub fn find(id: &str) -> Option<&'static Tool> {
    CATALOG.iter().find(|tool| tool.id == id)
}

/// Index of a tool in catalog order.
pub fn position(id: &str) -> Option<usize> {
    CATALOG.iter().position(|tool| tool.id == id)
}
