mod common;

use common::*;
use scenario_script::unit::{
    EffectKind, HideTarget, OtherEffect, ShowTarget, StArgs, StMode, TextEffect, UnitType,
};
use scenario_script::{translate, translate_units, RawRow, TranslateContext, TranslateError};

fn run(rows: &[RawRow]) -> scenario_script::Story {
    let tables = tables();
    let settings = settings();
    translate(rows, &TranslateContext::new(&tables, &settings)).unwrap_or_else(|e| {
        panic!("translation failed: {e}");
    })
}

fn run_err(rows: &[RawRow]) -> TranslateError {
    let tables = tables();
    let settings = settings();
    translate(rows, &TranslateContext::new(&tables, &settings)).unwrap_err()
}

#[test]
fn test_speaking_character_slot() {
    let story = run(&[row("1;유우카;12;안녕", "こんにちは")]);
    let unit = &story.units[0];

    assert_eq!(unit.unit_type, UnitType::Text);
    assert_eq!(unit.characters.len(), 1);
    let yuuka = &unit.characters[0];
    assert_eq!(yuuka.position, 1);
    assert_eq!(yuuka.character_id, YUUKA);
    assert_eq!(yuuka.face, "12");
    assert!(yuuka.highlight);
    assert!(!yuuka.signal);
    assert_eq!(
        yuuka.spine_url,
        "https://cdn.example/spine/yuuka_spr/yuuka_spr.skel"
    );

    let show = &unit.text_about.show_text;
    assert_eq!(show.text.len(), 1);
    assert_eq!(show.text[0].content, "こんにちは");
    let speaker = show.speaker.as_ref().unwrap();
    assert_eq!(speaker.name, "ユウカ");
    assert_eq!(speaker.nickname.as_deref(), Some("セミナー"));
}

#[test]
fn test_floating_text() {
    let story = run(&[row("#st;[-1200,-530];serial;60;안녕", "こんにちは")]);
    let unit = &story.units[0];

    assert_eq!(unit.unit_type, UnitType::St);
    let st = unit.text_about.st.as_ref().unwrap();
    assert_eq!(st.st_args, Some(StArgs([-1200, -530], StMode::Serial, 60)));
    assert!(!st.middle);
    assert_eq!(
        serde_json::to_value(st.st_args.unwrap()).unwrap(),
        serde_json::json!([[-1200, -530], "serial", 60])
    );
    assert_eq!(unit.text_about.show_text.text[0].content, "こんにちは");
}

#[test]
fn test_floating_text_without_trailing_text_has_no_dialogue() {
    let story = run(&[row("#st;[0,0];instant;0", "")]);
    let unit = &story.units[0];
    assert_eq!(unit.unit_type, UnitType::St);
    assert!(unit.text_about.show_text.text.is_empty());
}

#[test]
fn test_middle_floating_text_parses_tags() {
    let story = run(&[row("#stm;[300,-100];smooth;30", "[FF6666]赤[-]い")]);
    let unit = &story.units[0];
    let st = unit.text_about.st.as_ref().unwrap();

    assert_eq!(st.st_args, Some(StArgs([0, -100], StMode::Smooth, 30)));
    assert!(st.middle);
    let text = &unit.text_about.show_text.text;
    assert_eq!(text.len(), 2);
    assert_eq!(text[0].content, "赤");
    assert_eq!(text[0].effects, vec![TextEffect::Color("#FF6666".into())]);
    assert_eq!(text[1].content, "い");
    assert!(text[1].effects.is_empty());
}

#[test]
fn test_empty_row_is_effect_only() {
    let story = run(&[row("", "")]);
    assert_eq!(story.units[0].unit_type, UnitType::EffectOnly);
    assert!(story.units[0].characters.is_empty());
}

#[test]
fn test_plain_text_row_is_text() {
    let story = run(&[row("", "[USERNAME]さん、おはよう")]);
    assert_eq!(story.units[0].unit_type, UnitType::Text);
}

#[test]
fn test_spine_background_becomes_l2d() {
    let mut r = row("", "");
    r.bg_name = BG_LOBBY_SPINE;
    let story = run(&[r]);
    let unit = &story.units[0];

    assert!(unit.bg.is_none());
    let l2d = unit.l2d.as_ref().unwrap();
    assert_eq!(l2d.name, "CH0184_home");
    assert_eq!(l2d.animation_name, "Idle_01");
    assert_eq!(
        l2d.url,
        "https://cdn.example/spine/CH0184_home/CH0184_home.skel"
    );
    let config = &story.l2d_configs["CH0184_home"];
    assert_eq!(config.play_queue, vec!["Idle_01", "Start_Idle_01"]);
}

#[test]
fn test_l2d_config_is_registered_once() {
    let mut a = row("", "");
    a.bg_name = BG_LOBBY_SPINE;
    let b = a.clone();
    let story = run(&[a, b]);
    assert_eq!(story.l2d_configs.len(), 1);
    assert!(story.units.iter().all(|u| u.l2d.is_some()));
}

#[test]
fn test_image_background_consumes_overlap_transition() {
    let mut r = row("", "");
    r.bg_name = BG_CLASSROOM;
    r.transition = TRANSITION_OVERLAP;
    let story = run(&[r]);
    let unit = &story.units[0];

    let bg = unit.bg.as_ref().unwrap();
    assert_eq!(bg.url, "https://cdn.example/bg/BG_Classroom.jpg");
    assert_eq!(bg.overlap, Some(500));
    assert!(unit.transition.is_none());
    assert!(unit.l2d.is_none());
}

#[test]
fn test_plain_transition_is_kept() {
    let mut r = row("", "");
    r.bg_name = BG_CLASSROOM;
    r.transition = TRANSITION_FADE;
    let story = run(&[r]);
    let unit = &story.units[0];

    assert_eq!(unit.bg.as_ref().unwrap().overlap, None);
    assert_eq!(unit.transition.as_ref().unwrap().transition_in, "fade");
}

#[test]
fn test_audio_and_effects_resolve_from_ids() {
    let mut r = row("", "");
    r.bgm_id = BGM_THEME;
    r.sound = "SE_Click".into();
    r.voice_jp = "yuuka_01".into();
    r.bg_effect = EFFECT_SCROLL;
    r.popup_file_name = "Popup_Letter".into();
    let story = run(&[r]);
    let unit = &story.units[0];

    let audio = unit.audio.as_ref().unwrap();
    let bgm = audio.bgm.as_ref().unwrap();
    assert_eq!(bgm.url, "https://cdn.example/Audio/BGM/Theme_01.ogg");
    assert_eq!(bgm.args.loop_start, 1.5);
    assert_eq!(
        audio.sound_url.as_deref(),
        Some("https://cdn.example/Audio/Sound/SE_Click.wav")
    );
    assert_eq!(
        audio.voice_url.as_deref(),
        Some("https://cdn.example/Audio/VoiceJp/yuuka_01.wav")
    );
    assert_eq!(
        unit.effect.bg_effect.as_ref().unwrap().effect,
        "BG_ScrollT_0.5"
    );
    assert_eq!(
        unit.popup_url.as_deref(),
        Some("https://cdn.example/UIs/03_Scenario/04_ScenarioImage/Popup_Letter.png")
    );
}

#[test]
fn test_unknown_row_ids_leave_fields_absent() {
    let mut r = row("", "");
    r.bgm_id = 999;
    r.bg_name = 999;
    r.transition = 999;
    r.bg_effect = 999;
    let story = run(&[r]);
    let unit = &story.units[0];
    assert!(unit.audio.is_none());
    assert!(unit.bg.is_none() && unit.l2d.is_none());
    assert!(unit.transition.is_none());
    assert!(unit.effect.bg_effect.is_none());
}

#[test]
fn test_character_effect_resolves_backward() {
    let rows = [
        row("3;노아;05\n#3;em;Sweat", ""),
        row("1;유우카;01;안녕", "やあ"),
        row("#3;em;Heart", ""),
    ];
    let story = run(&rows);
    let unit = &story.units[2];

    assert_eq!(unit.characters.len(), 1);
    let noa = &unit.characters[0];
    assert_eq!(noa.position, 3);
    assert_eq!(noa.character_id, NOA);
    assert_eq!(noa.face, "05");
    assert!(noa.signal);
    assert_eq!(noa.effects.len(), 1);
    assert_eq!(noa.effects[0].kind, EffectKind::Emotion);
    assert_eq!(noa.effects[0].name, "Heart");
    assert!(!noa.effects[0].is_async);

    // the source unit is untouched
    assert_eq!(story.units[0].characters[0].effects.len(), 1);
}

#[test]
fn test_character_effect_on_declared_slot_appends() {
    let story = run(&[row("2;유우카;03\n#2;a;hophop;async\n#2;fx;[shot]", "")]);
    let effects = &story.units[0].characters[0].effects;
    assert_eq!(effects.len(), 2);
    assert_eq!(effects[0].kind, EffectKind::Action);
    assert_eq!(effects[0].name, "hophop");
    assert!(effects[0].is_async);
    assert_eq!(effects[1].kind, EffectKind::Fx);
    assert_eq!(effects[1].name, "shot");
}

#[test]
fn test_undeclared_slot_aborts() {
    let err = run_err(&[row("", ""), row("#4;em;Heart", "")]);
    match err {
        TranslateError::SlotNeverDeclared { row, slot, raw } => {
            assert_eq!(row, 1);
            assert_eq!(slot, 4);
            assert_eq!(raw, "#4;em;Heart");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_unknown_character_aborts() {
    let err = run_err(&[row("1;없는학생;01;안녕", "やあ")]);
    assert!(!err.is_recoverable());
    match err {
        TranslateError::ReferenceNotFound { row, table, id, .. } => {
            assert_eq!(row, 0);
            assert_eq!(table, "character name");
            assert_eq!(id, "없는학생");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_name_without_character_record_aborts() {
    let mut tables = tables();
    tables.insert_character_name("유령", 9999);
    let settings = settings();
    let err = translate(
        &[row("2;유령;01;안녕", "やあ")],
        &TranslateContext::new(&tables, &settings),
    )
    .unwrap_err();
    match err {
        TranslateError::ReferenceNotFound { row, table, id, .. } => {
            assert_eq!(row, 0);
            assert_eq!(table, "character");
            assert_eq!(id, "9999");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_redeclared_slot_keeps_positions_unique() {
    let story = run(&[row("1;유우카;01\n1;유우카;02;말", "言葉")]);
    let unit = &story.units[0];
    assert_eq!(unit.characters.len(), 1);
    assert_eq!(unit.characters[0].face, "02");
}

#[test]
fn test_silent_characters_default_to_highlighted() {
    let story = run(&[
        row("1;유우카;01\n2;노아;03", ""),
        row("1;유우카;01;안녕\n2;노아;03", "やあ"),
    ]);
    assert!(story.units[0].characters.iter().all(|c| c.highlight));

    let second = &story.units[1];
    assert!(second.character_at(1).unwrap().highlight);
    assert!(!second.character_at(2).unwrap().highlight);
}

#[test]
fn test_options_parse_language_text() {
    let story = run(&[row(
        "[s1] 첫째\n[s2] 둘째",
        "[s1] [b]一つ目[/b]\n[s2] 二つ目\nbroken line\n[ns] どちらでもない",
    )]);
    let unit = &story.units[0];

    assert_eq!(unit.unit_type, UnitType::Option);
    let options = &unit.text_about.options;
    assert_eq!(options.len(), 3);
    assert_eq!(options[0].selection_group, 1);
    assert_eq!(options[0].text, "一つ目");
    assert_eq!(options[1].selection_group, 2);
    assert_eq!(options[2].selection_group, 0);

    assert_eq!(story.diagnostics.len(), 1);
    assert!(matches!(
        &story.diagnostics[0],
        TranslateError::MalformedOption { row: 0, line, .. } if line == "broken line"
    ));
}

#[test]
fn test_explicit_directive_wins_over_dialogue() {
    let story = run(&[row("#st;[0,0];instant;0;x\n1;유우카;01;안녕", "やあ")]);
    assert_eq!(story.units[0].unit_type, UnitType::St);
}

#[test]
fn test_title_place_and_continue() {
    let story = run(&[
        row("#title;1화;시작", "第1話;はじまり"),
        row("#nextepisode;다음", "次回"),
        row("#place;교실", "[b]教室[/b]"),
        row("#continued", ""),
    ]);

    assert_eq!(story.units[0].unit_type, UnitType::Title);
    let title = story.units[0].text_about.title_info.as_ref().unwrap();
    assert_eq!(title.title, "はじまり");
    assert_eq!(title.subtitle.as_deref(), Some("第1話"));
    assert!(!title.next_episode);

    let next = story.units[1].text_about.title_info.as_ref().unwrap();
    assert_eq!(story.units[1].unit_type, UnitType::Title);
    assert_eq!(next.title, "次回");
    assert!(next.next_episode);

    assert_eq!(story.units[2].unit_type, UnitType::Place);
    assert_eq!(story.units[2].text_about.word.as_deref(), Some("教室"));

    assert_eq!(story.units[3].unit_type, UnitType::Continue);
}

#[test]
fn test_narration_speaker_is_display_only() {
    let story = run(&[row("#na;노아;말", "こんにちは"), row("#na;그냥", "ただの語り")]);

    let named = &story.units[0];
    assert!(named.characters.is_empty());
    assert_eq!(
        named.text_about.show_text.speaker.as_ref().unwrap().name,
        "ノア"
    );
    assert_eq!(named.text_about.show_text.text[0].content, "こんにちは");

    let plain = &story.units[1];
    assert!(plain.text_about.show_text.speaker.is_none());
    assert_eq!(plain.text_about.show_text.text[0].content, "ただの語り");
}

#[test]
fn test_effect_directives_accumulate_in_order() {
    let story = run(&[row(
        "#wait;1000;#bgshake\n#zmc;instant;100,-200;1500\n#zmc;move;0,0;1000;800",
        "",
    )]);
    assert_eq!(
        story.units[0].effect.others,
        vec![
            OtherEffect::Wait { ms: 1000 },
            OtherEffect::BgShake,
            OtherEffect::ZoomInstant { x: 100, y: -200, size: 1500 },
            OtherEffect::ZoomMove { x: 0, y: 0, size: 1000, duration: 800 },
        ]
    );
}

#[test]
fn test_oversized_numbers_clamp_instead_of_zeroing() {
    let story = run(&[row("#wait;99999999999
#zmc;instant;-99999999999,5;1", "")]);
    assert_eq!(
        story.units[0].effect.others,
        vec![
            OtherEffect::Wait { ms: u32::MAX },
            OtherEffect::ZoomInstant { x: i32::MIN, y: 5, size: 1 },
        ]
    );
}

#[test]
fn test_menu_visibility_video_and_clear() {
    let story = run(&[
        row("#all;hide", ""),
        row("#hidemenu\n#clearST", ""),
        row("#showmenu", ""),
        row("#video;Video/OP;Audio/OP", ""),
    ]);
    assert_eq!(story.units[0].hide, Some(HideTarget::All));
    assert_eq!(story.units[1].hide, Some(HideTarget::Menu));
    assert!(story.units[1].text_about.st.as_ref().unwrap().clear);
    assert_eq!(story.units[2].show, Some(ShowTarget::Menu));

    let video = story.units[3].video.as_ref().unwrap();
    assert_eq!(video.video_url, "https://cdn.example/Video/OP");
    assert_eq!(video.sound_url, "https://cdn.example/Audio/OP");
}

#[test]
fn test_fontsize_applies_to_existing_text_only() {
    let story = run(&[row("#fontsize;10\n1;유우카;01;안녕\n#fontsize;40", "あ[wa:200]い")]);
    let text = &story.units[0].text_about.show_text.text;
    assert_eq!(text.len(), 2);
    for t in text {
        assert_eq!(t.effects, vec![TextEffect::FontSize(40)]);
    }
    assert_eq!(text[1].wait_time, Some(200));
}

#[test]
fn test_output_length_matches_input() {
    let rows: Vec<RawRow> = (0..50)
        .map(|i| match i % 5 {
            0 => row("1;유우카;01;안녕", "やあ"),
            1 => row("#1;em;Heart", ""),
            2 => row("[s1] 예\n[s2] 아니", "[s1] はい\nいいえ"),
            3 => row("#wait;100", ""),
            _ => row("", "地の文"),
        })
        .collect();
    let story = run(&rows);
    assert_eq!(story.units.len(), rows.len());
}

#[test]
fn test_translation_is_idempotent() {
    let rows = vec![
        row("3;노아;05\n#3;em;Sweat", ""),
        row("1;유우카;01;안녕", "やあ"),
        row("#3;em;Heart", ""),
        row("#st;[0,0];serial;10;x", "テキスト"),
    ];
    let first = {
        let tables = tables();
        let settings = settings();
        translate_units(&rows, &TranslateContext::new(&tables, &settings)).unwrap()
    };
    let second = {
        let tables = tables();
        let settings = settings();
        translate_units(&rows, &TranslateContext::new(&tables, &settings)).unwrap()
    };
    assert_eq!(first, second);
}

#[test]
fn test_positions_unique_and_highlight_never_all_false() {
    let rows = vec![
        row("1;유우카;01\n2;노아;02", ""),
        row("2;노아;03;말", "話"),
        row("#1;em;Heart\n#2;em;Sad", ""),
        row("1;유우카;04\n#2;a;d", ""),
    ];
    let story = run(&rows);
    for unit in &story.units {
        let mut positions: Vec<u8> = unit.characters.iter().map(|c| c.position).collect();
        let total = positions.len();
        positions.sort_unstable();
        positions.dedup();
        assert_eq!(positions.len(), total);
        if !unit.characters.is_empty() {
            assert!(unit.characters.iter().any(|c| c.highlight));
        }
    }
}
