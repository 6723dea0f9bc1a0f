//! Directive grammar of the story script.
//!
//! Each [`Directive`] pairs an anchored pattern with a pure `apply` step that
//! folds the captured parameters into the unit being built. Directives are
//! tried in [`Directive::ALL`] order against the unconsumed remainder of a
//! segment; the patterns are written so that at most one can match a given
//! prefix (every `#` keyword is distinct, slots start with a digit, options
//! with `[`).

use std::fmt::Display;
use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::TranslateContext;
use crate::error::{Result, TranslateError};
use crate::raw::RawRow;
use crate::resolver;
use crate::resource::ResourceKind;
use crate::text::{generate_text, strip_tags};
use crate::unit::{
    CharacterEffect, CharacterInstance, EffectKind, HideTarget, OtherEffect, ShowTarget, Speaker,
    StArgs, StMode, StText, StoryOption, StoryUnit, TextEffect, TitleInfo, UnitType, Video,
};

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($re).unwrap());
    };
}

pattern!(TITLE, r"(?i)^#title(?:;.*)?$");
pattern!(NEXT_EPISODE, r"(?i)^#nextepisode(?:;.*)?$");
pattern!(PLACE, r"(?i)^#place(?:;.*)?$");
pattern!(CONTINUED, r"(?i)^#continued(?:;|$)");
pattern!(NA, r"(?i)^#na;([^;]*)(?:;([^;]*))?(?:;.*)?$");
pattern!(ST, r"(?i)^#st;\[(-?\d+),\s*(-?\d+)\];(serial|instant|smooth);(\d+)(?:;(.*))?$");
pattern!(STM, r"(?i)^#stm;\[(-?\d+),\s*(-?\d+)\];(serial|instant|smooth);(\d+)(?:;(.*))?$");
pattern!(CLEAR_ST, r"(?i)^#clearst(?:;|$)");
pattern!(WAIT, r"(?i)^#wait;(\d+)(?:;|$)");
pattern!(FONT_SIZE, r"(?i)^#fontsize;(\d+)(?:;|$)");
pattern!(ALL_HIDE, r"(?i)^#all;hide(?:;|$)");
pattern!(HIDE_MENU, r"(?i)^#hidemenu(?:;|$)");
pattern!(SHOW_MENU, r"(?i)^#showmenu(?:;|$)");
pattern!(ZMC_INSTANT, r"(?i)^#zmc;instant;(-?\d+),\s*(-?\d+);(\d+)(?:;|$)");
pattern!(ZMC_MOVE, r"(?i)^#zmc;move;(-?\d+),\s*(-?\d+);(\d+);(\d+)(?:;|$)");
pattern!(BG_SHAKE, r"(?i)^#bgshake(?:;|$)");
pattern!(VIDEO, r"(?i)^#video;([^;]+);([^;]+)(?:;|$)");
pattern!(CHARACTER_EFFECT, r"(?i)^#([1-5]);(em|a|fx);\[?([^;\]]+)\]?(?:;(async))?(?:;|$)");
pattern!(CHARACTER_SLOT, r"^([1-5]);([^;]+);(\d+)(?:;(.*))?$");
pattern!(OPTION, r"^\[n?s(\d{0,2})\](.*)$");

/// Shape of a single line of option text.
static OPTION_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[n?s(\d{0,2})\]\s*(.+)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Title,
    NextEpisode,
    Place,
    Continued,
    Na,
    St,
    Stm,
    ClearSt,
    Wait,
    FontSize,
    AllHide,
    HideMenu,
    ShowMenu,
    ZmcInstant,
    ZmcMove,
    BgShake,
    Video,
    CharacterEffect,
    CharacterSlot,
    Option,
}

pub trait CaptureInt: FromStr<Err = ParseIntError> + Default + Display {
    const MIN: Self;
    const MAX: Self;
}

macro_rules! capture_int {
    ($($t:ty),*) => {
        $(impl CaptureInt for $t {
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
        })*
    };
}

capture_int!(u8, u16, u32, u64, i32, i64);

/// Positional capture groups of a matched directive, group 0 excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captures<'t>(pub Vec<Option<&'t str>>);

impl<'t> Captures<'t> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Group `i` when it participated in the match with non-blank text.
    pub fn get(&self, i: usize) -> Option<&'t str> {
        self.0
            .get(i)
            .copied()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn str(&self, i: usize) -> &'t str {
        self.get(i).unwrap_or_default()
    }

    /// Group `i` as an integer. Out-of-range values clamp to the bounds of
    /// `T`; anything else unparsable is `T::default()`.
    pub fn int<T: CaptureInt>(&self, i: usize) -> T {
        let Some(s) = self.get(i) else {
            return T::default();
        };
        match s.parse::<T>() {
            Ok(v) => v,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => {
                    log::warn!("numeric parameter {} out of range, clamped to {}", s, T::MAX);
                    T::MAX
                }
                IntErrorKind::NegOverflow => {
                    log::warn!("numeric parameter {} out of range, clamped to {}", s, T::MIN);
                    T::MIN
                }
                _ => T::default(),
            },
        }
    }

    /// Number of groups that actually captured something.
    pub fn present(&self) -> usize {
        (0..self.0.len()).filter(|&i| self.get(i).is_some()).count()
    }
}

/// A directive recognized at the start of some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveMatch<'t> {
    pub directive: Directive,
    pub captures: Captures<'t>,
    /// Byte length of the consumed prefix.
    pub len: usize,
}

/// Read-only inputs available to `apply`.
#[derive(Debug, Clone, Copy)]
pub struct Env<'a> {
    pub ctx: TranslateContext<'a>,
    pub row: &'a RawRow,
    pub row_index: usize,
    pub finalized: &'a [StoryUnit],
}

impl Env<'_> {
    fn row_text(&self) -> Option<&str> {
        self.row.text(self.ctx.language())
    }

    fn user_name(&self) -> &str {
        &self.ctx.settings.user_name
    }
}

impl Directive {
    /// Every directive in matching order.
    pub const ALL: [Directive; 20] = [
        Directive::Title,
        Directive::NextEpisode,
        Directive::Place,
        Directive::Continued,
        Directive::Na,
        Directive::St,
        Directive::Stm,
        Directive::ClearSt,
        Directive::Wait,
        Directive::FontSize,
        Directive::AllHide,
        Directive::HideMenu,
        Directive::ShowMenu,
        Directive::ZmcInstant,
        Directive::ZmcMove,
        Directive::BgShake,
        Directive::Video,
        Directive::CharacterEffect,
        Directive::CharacterSlot,
        Directive::Option,
    ];

    pub fn pattern(self) -> &'static Regex {
        match self {
            Directive::Title => &TITLE,
            Directive::NextEpisode => &NEXT_EPISODE,
            Directive::Place => &PLACE,
            Directive::Continued => &CONTINUED,
            Directive::Na => &NA,
            Directive::St => &ST,
            Directive::Stm => &STM,
            Directive::ClearSt => &CLEAR_ST,
            Directive::Wait => &WAIT,
            Directive::FontSize => &FONT_SIZE,
            Directive::AllHide => &ALL_HIDE,
            Directive::HideMenu => &HIDE_MENU,
            Directive::ShowMenu => &SHOW_MENU,
            Directive::ZmcInstant => &ZMC_INSTANT,
            Directive::ZmcMove => &ZMC_MOVE,
            Directive::BgShake => &BG_SHAKE,
            Directive::Video => &VIDEO,
            Directive::CharacterEffect => &CHARACTER_EFFECT,
            Directive::CharacterSlot => &CHARACTER_SLOT,
            Directive::Option => &OPTION,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Directive::Title => "title",
            Directive::NextEpisode => "nextepisode",
            Directive::Place => "place",
            Directive::Continued => "continued",
            Directive::Na => "na",
            Directive::St => "st",
            Directive::Stm => "stm",
            Directive::ClearSt => "clearST",
            Directive::Wait => "wait",
            Directive::FontSize => "fontsize",
            Directive::AllHide => "all;hide",
            Directive::HideMenu => "hidemenu",
            Directive::ShowMenu => "showmenu",
            Directive::ZmcInstant => "zmc;instant",
            Directive::ZmcMove => "zmc;move",
            Directive::BgShake => "bgshake",
            Directive::Video => "video",
            Directive::CharacterEffect => "character-effect",
            Directive::CharacterSlot => "character-slot",
            Directive::Option => "option",
        }
    }

    /// Matches this directive against the start of `text`.
    pub fn matches(self, text: &str) -> Option<DirectiveMatch<'_>> {
        let caps = self.pattern().captures(text)?;
        let whole = caps.get(0)?;
        let groups = caps.iter().skip(1).map(|g| g.map(|m| m.as_str())).collect();
        Some(DirectiveMatch {
            directive: self,
            captures: Captures(groups),
            len: whole.end(),
        })
    }

    /// Folds matched captures into `unit`.
    ///
    /// Only a reference to an undeclared character or slot fails. Malformed
    /// option lines are reported through `warnings` and skipped.
    pub fn apply(
        self,
        caps: &Captures<'_>,
        unit: &mut StoryUnit,
        env: &Env<'_>,
        warnings: &mut Vec<TranslateError>,
    ) -> Result<()> {
        match self {
            Directive::Title | Directive::NextEpisode => {
                unit.unit_type = UnitType::Title;
                unit.text_about.title_info = Some(title_info(
                    env.row_text().unwrap_or_default(),
                    self == Directive::NextEpisode,
                    env.user_name(),
                ));
            }
            Directive::Place => {
                unit.unit_type = UnitType::Place;
                unit.text_about.word =
                    Some(strip_tags(env.row_text().unwrap_or_default(), env.user_name()));
            }
            Directive::Continued => unit.unit_type = UnitType::Continue,
            Directive::Na => apply_na(caps, unit, env),
            Directive::St | Directive::Stm => apply_st(self == Directive::Stm, caps, unit, env),
            Directive::ClearSt => {
                unit.text_about.st.get_or_insert_with(StText::default).clear = true;
            }
            Directive::Wait => unit.effect.others.push(OtherEffect::Wait { ms: caps.int(0) }),
            Directive::FontSize => {
                let size: u32 = caps.int(0);
                for text in &mut unit.text_about.show_text.text {
                    text.effects.push(TextEffect::FontSize(size));
                }
            }
            Directive::AllHide => unit.hide = Some(HideTarget::All),
            Directive::HideMenu => unit.hide = Some(HideTarget::Menu),
            Directive::ShowMenu => unit.show = Some(ShowTarget::Menu),
            Directive::ZmcInstant => unit.effect.others.push(OtherEffect::ZoomInstant {
                x: caps.int(0),
                y: caps.int(1),
                size: caps.int(2),
            }),
            Directive::ZmcMove => unit.effect.others.push(OtherEffect::ZoomMove {
                x: caps.int(0),
                y: caps.int(1),
                size: caps.int(2),
                duration: caps.int(3),
            }),
            Directive::BgShake => unit.effect.others.push(OtherEffect::BgShake),
            Directive::Video => {
                unit.video = Some(Video {
                    video_url: env.ctx.url(ResourceKind::Video, caps.str(0)),
                    sound_url: env.ctx.url(ResourceKind::Video, caps.str(1)),
                });
            }
            Directive::CharacterEffect => apply_character_effect(caps, unit, env)?,
            Directive::CharacterSlot => apply_character_slot(caps, unit, env)?,
            Directive::Option => apply_option(unit, env, warnings),
        }
        Ok(())
    }
}

/// First directive in [`Directive::ALL`] order matching the start of `text`.
pub fn match_directive(text: &str) -> Option<DirectiveMatch<'_>> {
    Directive::ALL.iter().find_map(|d| d.matches(text))
}

/// Dialogue may only claim the unit type when no explicit directive did.
fn claim_text(unit: &mut StoryUnit) {
    if matches!(unit.unit_type, UnitType::Text | UnitType::EffectOnly) {
        unit.unit_type = UnitType::Text;
    }
}

fn title_info(text: &str, next_episode: bool, user_name: &str) -> TitleInfo {
    let parts: Vec<String> = text
        .split(';')
        .map(|p| strip_tags(p.trim(), user_name))
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [] => TitleInfo {
            next_episode,
            ..Default::default()
        },
        [title] => TitleInfo {
            title: title.clone(),
            subtitle: None,
            next_episode,
        },
        [subtitle, rest @ ..] => TitleInfo {
            title: rest.join(" "),
            subtitle: Some(subtitle.clone()),
            next_episode,
        },
    }
}

fn apply_na(caps: &Captures<'_>, unit: &mut StoryUnit, env: &Env<'_>) {
    let lang = env.ctx.language();
    let speaker = caps.get(1).and_then(|_| caps.get(0)).map(|name| {
        match env.ctx.tables.character_by_name(name) {
            Some(record) => Speaker {
                name: record.name(lang).to_string(),
                nickname: record.nickname(lang).map(str::to_string),
            },
            None => {
                log::debug!("row {}: narration speaker {:?} has no character entry", env.row_index, name);
                Speaker {
                    name: name.to_string(),
                    nickname: None,
                }
            }
        }
    });
    let fallback = caps.get(1).or(caps.get(0)).unwrap_or_default();
    let text = env.row_text().unwrap_or(fallback);

    unit.text_about.show_text.text = generate_text(text, false, env.user_name());
    unit.text_about.show_text.speaker = speaker;
    if !unit.text_about.show_text.text.is_empty() {
        claim_text(unit);
    }
}

fn apply_st(middle: bool, caps: &Captures<'_>, unit: &mut StoryUnit, env: &Env<'_>) {
    let x = if middle { 0 } else { caps.int(0) };
    let mode = StMode::parse(&caps.str(2).to_ascii_lowercase()).unwrap_or(StMode::Serial);
    let args = StArgs([x, caps.int(1)], mode, caps.int(3));

    unit.unit_type = UnitType::St;
    let st = unit.text_about.st.get_or_insert_with(StText::default);
    st.st_args = Some(args);
    st.middle = middle;

    let trailing = caps.get(4);
    if middle || trailing.is_some() {
        let source = env.row_text().or(trailing).unwrap_or_default();
        unit.text_about.show_text.text = generate_text(source, middle, env.user_name());
    }
}

fn apply_character_slot(caps: &Captures<'_>, unit: &mut StoryUnit, env: &Env<'_>) -> Result<()> {
    let tables = env.ctx.tables;
    let position: u8 = caps.int(0);
    let name = caps.str(1);
    let face = caps.str(2);
    let talk = caps.get(3);

    let not_found = |table: &'static str, id: String| TranslateError::ReferenceNotFound {
        row: env.row_index,
        table,
        id,
        raw: env.row.script_kr.clone(),
    };
    let id = tables
        .character_id(name)
        .ok_or_else(|| not_found("character name", name.to_string()))?;
    let record = tables
        .character(id)
        .ok_or_else(|| not_found("character", id.to_string()))?;

    let spine_url = env.ctx.url(ResourceKind::CharacterSpine, &record.spine_prefab_name);
    match unit.character_index(position) {
        Some(idx) => {
            let existing = &mut unit.characters[idx];
            existing.character_id = id;
            existing.face = face.to_string();
            existing.highlight = talk.is_some();
            existing.signal = record.is_signal();
            existing.spine_url = spine_url;
        }
        None => unit.characters.push(CharacterInstance {
            position,
            character_id: id,
            face: face.to_string(),
            highlight: talk.is_some(),
            signal: record.is_signal(),
            spine_url,
            effects: Vec::new(),
        }),
    }

    if let Some(talk) = talk {
        let lang = env.ctx.language();
        let text = env.row_text().unwrap_or(talk);
        unit.text_about.show_text.text = generate_text(text, false, env.user_name());
        unit.text_about.show_text.speaker = Some(Speaker {
            name: record.name(lang).to_string(),
            nickname: record.nickname(lang).map(str::to_string),
        });
        for other in unit.characters.iter_mut().filter(|c| c.position != position) {
            other.highlight = false;
        }
        claim_text(unit);
    }
    Ok(())
}

fn apply_character_effect(caps: &Captures<'_>, unit: &mut StoryUnit, env: &Env<'_>) -> Result<()> {
    let position: u8 = caps.int(0);
    let kind = match caps.str(1).to_ascii_lowercase().as_str() {
        "em" => EffectKind::Emotion,
        "fx" => EffectKind::Fx,
        _ => EffectKind::Action,
    };
    let effect = CharacterEffect {
        kind,
        name: caps.str(2).to_string(),
        is_async: caps.get(3).is_some(),
    };

    let idx = resolver::resolve(
        unit,
        position,
        env.finalized,
        env.row_index,
        &env.row.script_kr,
    )?;
    unit.characters[idx].effects.push(effect);
    Ok(())
}

fn apply_option(unit: &mut StoryUnit, env: &Env<'_>, warnings: &mut Vec<TranslateError>) {
    // Every option line of the script matches; the text column is parsed once.
    if unit.unit_type == UnitType::Option {
        return;
    }
    unit.unit_type = UnitType::Option;

    let source = env.row_text().unwrap_or(&env.row.script_kr);
    for line in source.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match OPTION_LINE.captures(line) {
            Some(caps) => unit.text_about.options.push(StoryOption {
                selection_group: caps[1].parse().unwrap_or(0),
                text: strip_tags(caps[2].trim(), env.user_name()),
            }),
            None => {
                let err = TranslateError::MalformedOption {
                    row: env.row_index,
                    line: line.to_string(),
                    raw: env.row.script_kr.clone(),
                };
                log::warn!("{}", err);
                warnings.push(err);
            }
        }
    }
}
