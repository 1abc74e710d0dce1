//! Static catalog of models known to work with the analyzer.

use std::collections::BTreeMap;

use serde::Serialize;

pub struct ModelInfo {
    pub id: &'static str,
    pub description: &'static str,
}

pub const AVAILABLE_MODELS: &[ModelInfo] = &[
    ModelInfo {
        id: "gemini-2.5-flash-preview-05-20",
        description: "Latest preview with high RPM (10 RPM, 250K TPM)",
    },
    ModelInfo {
        id: "gemini-2.5-flash-preview-04-17",
        description: "Latest preview with high RPM (10 RPM, 250K TPM)",
    },
    ModelInfo {
        id: "gemini-2.5-pro-preview-05-06",
        description: "Pro version with advanced capabilities",
    },
    ModelInfo {
        id: "gemini-2.0-flash",
        description: "Stable, fast model (15 RPM)",
    },
    ModelInfo {
        id: "gemini-2.0-flash-lite",
        description: "Lightweight version (30 RPM)",
    },
    ModelInfo {
        id: "gemini-1.5-flash",
        description: "Stable general-purpose model",
    },
    ModelInfo {
        id: "gemini-1.5-flash-8b",
        description: "Lightweight 8B parameter model",
    },
    ModelInfo {
        id: "gemini-1.5-pro",
        description: "Pro version for complex tasks",
    },
    ModelInfo {
        id: "gemma-3-27b-it",
        description: "Open model, 27B parameters",
    },
    ModelInfo {
        id: "gemma-3-12b-it",
        description: "Open model, 12B parameters",
    },
    ModelInfo {
        id: "gemma-3-4b-it",
        description: "Open model, 4B parameters",
    },
    ModelInfo {
        id: "gemma-3-1b-it",
        description: "Open model, 1B parameters",
    },
];

/// The informational listing returned by the `list_models` tool.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelListing {
    pub default_model: String,
    pub available_models: Vec<&'static str>,
    pub model_capabilities: BTreeMap<&'static str, &'static str>,
}

pub fn listing(default_model: &str) -> ModelListing {
    ModelListing {
        default_model: default_model.to_string(),
        available_models: AVAILABLE_MODELS.iter().map(|m| m.id).collect(),
        model_capabilities: AVAILABLE_MODELS
            .iter()
            .map(|m| (m.id, m.description))
            .collect(),
    }
}
