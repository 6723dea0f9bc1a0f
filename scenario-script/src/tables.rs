//! Reference tables consulted during translation.
//!
//! The tables are filled once by the data loader and then only borrowed.
//! Record field names follow the exported excel JSON.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::raw::Language;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CharacterRecord {
    pub character_name: u64,
    pub production_step: String,
    #[serde(rename = "NameKR")]
    pub name_kr: String,
    #[serde(rename = "NicknameKR")]
    pub nickname_kr: Option<String>,
    #[serde(rename = "NameJP")]
    pub name_jp: Option<String>,
    #[serde(rename = "NicknameJP")]
    pub nickname_jp: Option<String>,
    #[serde(rename = "NameCN")]
    pub name_cn: Option<String>,
    #[serde(rename = "NicknameCN")]
    pub nickname_cn: Option<String>,
    #[serde(rename = "NameTW")]
    pub name_tw: Option<String>,
    #[serde(rename = "NicknameTW")]
    pub nickname_tw: Option<String>,
    #[serde(rename = "NameEN")]
    pub name_en: Option<String>,
    #[serde(rename = "NicknameEN")]
    pub nickname_en: Option<String>,
    #[serde(rename = "NameTH")]
    pub name_th: Option<String>,
    #[serde(rename = "NicknameTH")]
    pub nickname_th: Option<String>,
    pub shape: String,
    pub spine_prefab_name: String,
    pub small_portrait: String,
}

impl CharacterRecord {
    /// Display name in `lang`, falling back to Japanese and then Korean.
    pub fn name(&self, lang: Language) -> &str {
        let localized = match lang {
            Language::Jp => self.name_jp.as_deref(),
            Language::Cn => self.name_cn.as_deref(),
            Language::Tw => self.name_tw.as_deref(),
            Language::En => self.name_en.as_deref(),
            Language::Th => self.name_th.as_deref(),
        };
        localized
            .filter(|n| !n.is_empty())
            .or(self.name_jp.as_deref().filter(|n| !n.is_empty()))
            .unwrap_or(&self.name_kr)
    }

    pub fn nickname(&self, lang: Language) -> Option<&str> {
        let localized = match lang {
            Language::Jp => self.nickname_jp.as_deref(),
            Language::Cn => self.nickname_cn.as_deref(),
            Language::Tw => self.nickname_tw.as_deref(),
            Language::En => self.nickname_en.as_deref(),
            Language::Th => self.nickname_th.as_deref(),
        };
        localized
            .filter(|n| !n.is_empty())
            .or(self.nickname_jp.as_deref().filter(|n| !n.is_empty()))
    }

    /// Hologram-style rendering.
    pub fn is_signal(&self) -> bool {
        self.shape == "Signal"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BgType {
    #[default]
    Image,
    Spine,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BgRecord {
    pub name: u64,
    pub production_step: String,
    #[serde(rename = "BGFileName")]
    pub bg_file_name: String,
    #[serde(rename = "BGType")]
    pub bg_type: BgType,
    pub animation_repeat: bool,
    pub animation_name: String,
    pub spine_scale: f32,
    pub spine_local_pos_x: i32,
    pub spine_local_pos_y: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BgmRecord {
    pub id: u64,
    pub path: String,
    pub volume: f32,
    pub loop_start_time: f32,
    pub loop_end_time: f32,
    pub loop_transtion_time: f32,
    pub loop_offset_time: f32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct TransitionRecord {
    pub name: u64,
    pub transition_out: String,
    pub transition_out_duration: u32,
    pub transition_out_resource: Option<String>,
    pub transition_in: String,
    pub transition_in_duration: u32,
    pub transition_in_resource: Option<String>,
}

impl TransitionRecord {
    pub const OVERLAP: &'static str = "bgoverlap";

    /// Duration of a background cross-fade, if this is one.
    pub fn overlap_duration(&self) -> Option<u32> {
        if self.transition_in == Self::OVERLAP {
            Some(self.transition_in_duration)
        } else if self.transition_out == Self::OVERLAP {
            Some(self.transition_out_duration)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BgEffectRecord {
    pub name: u64,
    pub effect: String,
    pub scroll: String,
    pub scroll_time: u32,
    pub scroll_from: i32,
    pub scroll_to: i32,
}

/// Playback configuration for one live-2D background.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct L2dConfig {
    pub name: String,
    pub play_queue: Vec<String>,
    pub other_spine: Vec<String>,
}

impl L2dConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Read-only snapshot of every lookup table translation needs.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTables {
    pub character_names: FxHashMap<String, u64>,
    pub characters: FxHashMap<u64, CharacterRecord>,
    pub backgrounds: FxHashMap<u64, BgRecord>,
    pub bgms: FxHashMap<u64, BgmRecord>,
    pub transitions: FxHashMap<u64, TransitionRecord>,
    pub bg_effects: FxHashMap<u64, BgEffectRecord>,
    pub l2d_configs: FxHashMap<String, L2dConfig>,
}

impl ReferenceTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a character and indexes its Korean name unless an explicit
    /// name mapping already exists.
    pub fn insert_character(&mut self, record: CharacterRecord) {
        if !record.name_kr.is_empty() {
            self.character_names
                .entry(record.name_kr.clone())
                .or_insert(record.character_name);
        }
        self.characters.insert(record.character_name, record);
    }

    pub fn insert_character_name(&mut self, name: impl Into<String>, id: u64) {
        self.character_names.insert(name.into(), id);
    }

    pub fn insert_background(&mut self, record: BgRecord) {
        self.backgrounds.insert(record.name, record);
    }

    pub fn insert_bgm(&mut self, record: BgmRecord) {
        self.bgms.insert(record.id, record);
    }

    pub fn insert_transition(&mut self, record: TransitionRecord) {
        self.transitions.insert(record.name, record);
    }

    pub fn insert_bg_effect(&mut self, record: BgEffectRecord) {
        self.bg_effects.insert(record.name, record);
    }

    pub fn insert_l2d_config(&mut self, config: L2dConfig) {
        self.l2d_configs.insert(config.name.clone(), config);
    }

    pub fn character_id(&self, name: &str) -> Option<u64> {
        self.character_names.get(name.trim()).copied()
    }

    pub fn character(&self, id: u64) -> Option<&CharacterRecord> {
        self.characters.get(&id)
    }

    pub fn character_by_name(&self, name: &str) -> Option<&CharacterRecord> {
        self.character_id(name).and_then(|id| self.character(id))
    }

    pub fn background(&self, id: u64) -> Option<&BgRecord> {
        self.backgrounds.get(&id)
    }

    pub fn bgm(&self, id: u64) -> Option<&BgmRecord> {
        self.bgms.get(&id)
    }

    pub fn transition(&self, id: u64) -> Option<&TransitionRecord> {
        self.transitions.get(&id)
    }

    pub fn bg_effect(&self, id: u64) -> Option<&BgEffectRecord> {
        self.bg_effects.get(&id)
    }

    pub fn l2d_config(&self, name: &str) -> Option<&L2dConfig> {
        self.l2d_configs.get(name)
    }
}
