//! Input rows as they come out of the exported story spreadsheets.

use serde::{Deserialize, Serialize};

/// Language variants a story row carries text for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Jp,
    Cn,
    Tw,
    En,
    Th,
}

impl Language {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "jp" | "ja" => Some(Language::Jp),
            "cn" | "zh" => Some(Language::Cn),
            "tw" => Some(Language::Tw),
            "en" => Some(Language::En),
            "th" => Some(Language::Th),
            _ => None,
        }
    }
}

/// One spreadsheet record. Never mutated by translation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawRow {
    pub group_id: u64,
    pub selection_group: u32,
    #[serde(rename = "BGMId")]
    pub bgm_id: u64,
    pub sound: String,
    pub transition: u64,
    #[serde(rename = "BGName")]
    pub bg_name: u64,
    #[serde(rename = "BGEffect")]
    pub bg_effect: u64,
    pub popup_file_name: String,
    pub script_kr: String,
    pub text_jp: Option<String>,
    pub text_cn: Option<String>,
    pub text_tw: Option<String>,
    pub text_en: Option<String>,
    pub text_th: Option<String>,
    pub voice_jp: String,
}

impl RawRow {
    /// Text for `lang`, `None` when the column is missing or blank.
    pub fn text(&self, lang: Language) -> Option<&str> {
        let text = match lang {
            Language::Jp => self.text_jp.as_deref(),
            Language::Cn => self.text_cn.as_deref(),
            Language::Tw => self.text_tw.as_deref(),
            Language::En => self.text_en.as_deref(),
            Language::Th => self.text_th.as_deref(),
        };
        text.filter(|t| !t.trim().is_empty())
    }
}
