#![allow(dead_code)]

use scenario_script::tables::{
    BgEffectRecord, BgRecord, BgType, BgmRecord, CharacterRecord, L2dConfig, TransitionRecord,
};
use scenario_script::{RawRow, ReferenceTables, TranslateSettings};

pub const YUUKA: u64 = 1001;
pub const NOA: u64 = 1002;

pub const BG_CLASSROOM: u64 = 10;
pub const BG_LOBBY_SPINE: u64 = 20;
pub const BGM_THEME: u64 = 5;
pub const TRANSITION_OVERLAP: u64 = 7;
pub const TRANSITION_FADE: u64 = 8;
pub const EFFECT_SCROLL: u64 = 3;

pub fn tables() -> ReferenceTables {
    let mut tables = ReferenceTables::new();
    tables.insert_character(CharacterRecord {
        character_name: YUUKA,
        name_kr: "유우카".into(),
        name_jp: Some("ユウカ".into()),
        nickname_jp: Some("セミナー".into()),
        name_en: Some("Yuuka".into()),
        spine_prefab_name: "UIs/03_Scenario/02_Character/CharacterSpine_yuuka".into(),
        ..Default::default()
    });
    tables.insert_character(CharacterRecord {
        character_name: NOA,
        name_kr: "노아".into(),
        name_jp: Some("ノア".into()),
        shape: "Signal".into(),
        spine_prefab_name: "UIs/03_Scenario/02_Character/CharacterSpine_noa".into(),
        ..Default::default()
    });
    tables.insert_background(BgRecord {
        name: BG_CLASSROOM,
        bg_file_name: "UIs/03_Scenario/01_Background/BG_Classroom".into(),
        bg_type: BgType::Image,
        ..Default::default()
    });
    tables.insert_background(BgRecord {
        name: BG_LOBBY_SPINE,
        bg_file_name: "SpineBG_Lobby_CH0184".into(),
        bg_type: BgType::Spine,
        animation_name: "Idle_01".into(),
        ..Default::default()
    });
    tables.insert_bgm(BgmRecord {
        id: BGM_THEME,
        path: "Audio/BGM/Theme_01".into(),
        volume: 0.8,
        loop_start_time: 1.5,
        loop_end_time: 60.0,
        ..Default::default()
    });
    tables.insert_transition(TransitionRecord {
        name: TRANSITION_OVERLAP,
        transition_in: "bgoverlap".into(),
        transition_in_duration: 500,
        transition_out: "bgoverlap".into(),
        transition_out_duration: 500,
        ..Default::default()
    });
    tables.insert_transition(TransitionRecord {
        name: TRANSITION_FADE,
        transition_in: "fade".into(),
        transition_in_duration: 300,
        transition_out: "fade".into(),
        transition_out_duration: 300,
        ..Default::default()
    });
    tables.insert_bg_effect(BgEffectRecord {
        name: EFFECT_SCROLL,
        effect: "BG_ScrollT_0.5".into(),
        scroll: "Vertical".into(),
        scroll_time: 1000,
        ..Default::default()
    });
    tables.insert_l2d_config(L2dConfig {
        name: "CH0184_home".into(),
        play_queue: vec!["Idle_01".into(), "Start_Idle_01".into()],
        other_spine: Vec::new(),
    });
    tables
}

pub fn settings() -> TranslateSettings {
    TranslateSettings {
        resource_root: "https://cdn.example".into(),
        user_name: "Sensei".into(),
        ..Default::default()
    }
}

/// A row with script and Japanese text.
pub fn row(script: &str, text: &str) -> RawRow {
    RawRow {
        group_id: 1,
        script_kr: script.into(),
        text_jp: (!text.is_empty()).then(|| text.to_string()),
        ..Default::default()
    }
}
