use serde::{Deserialize, Serialize};

use crate::raw::Language;
use crate::resource::{resource_url, ResourceKind};
use crate::tables::ReferenceTables;

/// Player-facing settings that influence translation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateSettings {
    pub language: Language,
    pub user_name: String,
    /// Prefix of every derived resource URL.
    pub resource_root: String,
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            language: Language::Jp,
            user_name: "先生".into(),
            resource_root: String::new(),
        }
    }
}

/// Everything a translation call reads besides the rows themselves.
#[derive(Debug, Clone, Copy)]
pub struct TranslateContext<'a> {
    pub tables: &'a ReferenceTables,
    pub settings: &'a TranslateSettings,
}

impl<'a> TranslateContext<'a> {
    pub fn new(tables: &'a ReferenceTables, settings: &'a TranslateSettings) -> Self {
        Self { tables, settings }
    }

    pub fn language(&self) -> Language {
        self.settings.language
    }

    pub fn url(&self, kind: ResourceKind, name: &str) -> String {
        resource_url(&self.settings.resource_root, kind, name)
    }
}
