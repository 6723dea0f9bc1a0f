//! The translated timeline handed to the playback layer.
//!
//! Every type here is plain data: no resource handles, no references back
//! into the tables. Resource fields are already-derived URLs.

use serde::{Deserialize, Serialize};

use crate::tables::{BgEffectRecord, L2dConfig, TransitionRecord};

/// One atomic, independently playable step of the story.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryUnit {
    pub group_id: u64,
    pub selection_group: u32,
    #[serde(rename = "type")]
    pub unit_type: UnitType,
    pub characters: Vec<CharacterInstance>,
    pub text_about: TextAbout,
    pub audio: Option<UnitAudio>,
    pub bg: Option<Background>,
    pub l2d: Option<L2d>,
    pub transition: Option<TransitionRecord>,
    pub effect: UnitEffect,
    pub hide: Option<HideTarget>,
    pub show: Option<ShowTarget>,
    pub video: Option<Video>,
    pub popup_url: Option<String>,
}

impl StoryUnit {
    pub fn character_at(&self, position: u8) -> Option<&CharacterInstance> {
        self.characters.iter().find(|c| c.position == position)
    }

    pub fn character_index(&self, position: u8) -> Option<usize> {
        self.characters.iter().position(|c| c.position == position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnitType {
    Title,
    Place,
    #[default]
    Text,
    Option,
    St,
    EffectOnly,
    Continue,
}

/// A character standing in one of the five stage slots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterInstance {
    pub position: u8,
    pub character_id: u64,
    pub face: String,
    pub highlight: bool,
    pub signal: bool,
    pub spine_url: String,
    pub effects: Vec<CharacterEffect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EffectKind {
    Emotion,
    Action,
    Fx,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterEffect {
    pub kind: EffectKind,
    pub name: String,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAbout {
    pub show_text: ShowText,
    pub options: Vec<StoryOption>,
    pub st: Option<StText>,
    pub title_info: Option<TitleInfo>,
    pub word: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowText {
    pub text: Vec<Text>,
    pub speaker: Option<Speaker>,
}

/// A run of dialogue text sharing the same inline style.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub content: String,
    pub wait_time: Option<u32>,
    pub effects: Vec<TextEffect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "value", rename_all = "camelCase")]
pub enum TextEffect {
    Ruby(String),
    Color(String),
    Bold,
    Italic,
    FontSize(u32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    pub name: String,
    pub nickname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryOption {
    pub selection_group: u32,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StMode {
    Serial,
    Instant,
    Smooth,
}

impl StMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "serial" => Some(StMode::Serial),
            "instant" => Some(StMode::Instant),
            "smooth" => Some(StMode::Smooth),
            _ => None,
        }
    }
}

/// `[[x, y], mode, duration]` of a floating-text directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StArgs(pub [i32; 2], pub StMode, pub u32);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StText {
    pub st_args: Option<StArgs>,
    pub middle: bool,
    pub clear: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleInfo {
    pub title: String,
    pub subtitle: Option<String>,
    pub next_episode: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAudio {
    pub bgm: Option<Bgm>,
    pub sound_url: Option<String>,
    pub voice_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bgm {
    pub url: String,
    pub args: BgmArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BgmArgs {
    pub volume: f32,
    pub loop_start: f32,
    pub loop_end: f32,
    pub loop_transition: f32,
    pub loop_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    pub url: String,
    pub overlap: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct L2d {
    pub name: String,
    pub url: String,
    pub animation_name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitEffect {
    pub bg_effect: Option<BgEffectRecord>,
    pub others: Vec<OtherEffect>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OtherEffect {
    Wait { ms: u32 },
    BgShake,
    ZoomInstant { x: i32, y: i32, size: u32 },
    ZoomMove { x: i32, y: i32, size: u32, duration: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HideTarget {
    All,
    Menu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShowTarget {
    Menu,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub video_url: String,
    pub sound_url: String,
}

/// Output of one translation call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub units: Vec<StoryUnit>,
    /// Configs of every live-2D background the story uses, keyed by derived name.
    pub l2d_configs: std::collections::BTreeMap<String, L2dConfig>,
    #[serde(skip)]
    pub diagnostics: Vec<crate::error::TranslateError>,
}
