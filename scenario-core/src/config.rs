use serde::{Deserialize, Serialize};
use scenario_script::{Language, TranslateSettings};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub data_path:  String, // reference tables (excel JSON)
    pub story_path: String,
    pub log_path:   String,
    pub log_level:  String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    pub language:      String,
    pub user_name:     String,
    pub resource_root: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub preload_ahead: usize,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            data_path:  "data/".into(),
            story_path: "story/".into(),
            log_path:   "logs/".into(),
            log_level:  "info".into(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        let settings = TranslateSettings::default();
        Self {
            language: "jp".into(),
            user_name: settings.user_name,
            resource_root: settings.resource_root,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self { preload_ahead: 20 }
    }
}

impl TranslateConfig {
    pub fn to_settings(&self) -> TranslateSettings {
        let language = Language::parse(&self.language).unwrap_or_else(|| {
            log::warn!("Unknown language '{}', falling back to jp", self.language);
            Language::Jp
        });
        TranslateSettings {
            language,
            user_name: self.user_name.clone(),
            resource_root: self.resource_root.clone(),
        }
    }
}
