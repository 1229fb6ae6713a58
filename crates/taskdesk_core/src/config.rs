use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub max_output: u64,
}

/// Catalogue of languages, models and tuning defaults served by
/// `GET /task/alignment/config`. When the fetch fails the client falls
/// back to [`ServiceConfig::fallback`] so the selection UI is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub models: BTreeMap<String, ModelInfo>,
    #[serde(default)]
    pub thresholds: BTreeMap<String, u64>,
    #[serde(default = "default_buffer_chars")]
    pub buffer_chars: u32,
}

fn default_buffer_chars() -> u32 {
    2000
}

const FALLBACK_LANGUAGES: &[(&str, &str)] = &[
    ("中文", "中文（简体/繁体）"),
    ("英语", "English"),
    ("日语", "日本語"),
    ("韩语", "한국어"),
    ("法语", "Français"),
    ("德语", "Deutsch"),
    ("西班牙语", "Español"),
    ("俄语", "Русский"),
];

const FALLBACK_MODELS: &[&str] = &[
    "Google Gemini 2.5 Flash",
    "Google Gemini 2.5 Pro",
    "Google: Gemini 3 Pro Preview",
];

impl ServiceConfig {
    /// Hardcoded defaults used when the config endpoint is unreachable or
    /// answers with a non-OK status.
    pub fn fallback() -> Self {
        let languages = FALLBACK_LANGUAGES
            .iter()
            .map(|(name, description)| (name.to_string(), description.to_string()))
            .collect();
        let models = FALLBACK_MODELS
            .iter()
            .map(|name| (name.to_string(), ModelInfo::default()))
            .collect();
        Self {
            languages,
            models,
            thresholds: BTreeMap::new(),
            buffer_chars: default_buffer_chars(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::fallback()
    }
}
