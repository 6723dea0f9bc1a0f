use std::collections::BTreeMap;

use crate::context::TranslateContext;
use crate::error::{Result, TranslateError};
use crate::grammar::{self, Env};
use crate::raw::RawRow;
use crate::resource::{l2d_spine_name, ResourceKind};
use crate::tables::{BgType, L2dConfig};
use crate::tokenizer::{skip_separators, tokenize};
use crate::unit::{Background, Bgm, BgmArgs, L2d, StoryUnit, UnitAudio, UnitType};

pub struct UnitBuilder<'a> {
    ctx: TranslateContext<'a>,
    row: &'a RawRow,
    index: usize,
    unit: StoryUnit,
}

impl<'a> UnitBuilder<'a> {
    pub fn new(ctx: TranslateContext<'a>, row: &'a RawRow, index: usize) -> Self {
        let popup_url = (!row.popup_file_name.is_empty())
            .then(|| ctx.url(ResourceKind::PopupImage, &row.popup_file_name));
        let unit = StoryUnit {
            group_id: row.group_id,
            selection_group: row.selection_group,
            popup_url,
            ..Default::default()
        };
        Self { ctx, row, index, unit }
    }

    // `finalized` holds the units of rows 0..index
    pub fn build(
        mut self,
        finalized: &[StoryUnit],
        l2d: &mut BTreeMap<String, L2dConfig>,
        warnings: &mut Vec<TranslateError>,
    ) -> Result<StoryUnit> {
        self.resolve_audio();
        self.resolve_transition();
        self.resolve_background(l2d);
        self.resolve_bg_effect();
        self.default_type();
        self.fold_script(finalized, warnings)?;
        self.default_highlight();
        Ok(self.unit)
    }

    fn resolve_audio(&mut self) {
        let row = self.row;
        let mut audio = UnitAudio::default();

        if row.bgm_id != 0 {
            match self.ctx.tables.bgm(row.bgm_id) {
                Some(bgm) => {
                    audio.bgm = Some(Bgm {
                        url: self.ctx.url(ResourceKind::Bgm, &bgm.path),
                        args: BgmArgs {
                            volume: bgm.volume,
                            loop_start: bgm.loop_start_time,
                            loop_end: bgm.loop_end_time,
                            loop_transition: bgm.loop_transtion_time,
                            loop_offset: bgm.loop_offset_time,
                        },
                    });
                }
                None => log::warn!("row {}: unknown BGM id {}", self.index, row.bgm_id),
            }
        }
        if !row.sound.is_empty() {
            audio.sound_url = Some(self.ctx.url(ResourceKind::Sound, &row.sound));
        }
        if !row.voice_jp.is_empty() {
            audio.voice_url = Some(self.ctx.url(ResourceKind::VoiceJp, &row.voice_jp));
        }

        if audio != UnitAudio::default() {
            self.unit.audio = Some(audio);
        }
    }

    fn resolve_transition(&mut self) {
        let id = self.row.transition;
        if id == 0 {
            return;
        }
        self.unit.transition = self.ctx.tables.transition(id).cloned();
        if self.unit.transition.is_none() {
            log::warn!("row {}: unknown transition id {}", self.index, id);
        }
    }

    fn resolve_background(&mut self, l2d: &mut BTreeMap<String, L2dConfig>) {
        let id = self.row.bg_name;
        if id == 0 {
            return;
        }
        let Some(record) = self.ctx.tables.background(id) else {
            log::warn!("row {}: unknown background id {}", self.index, id);
            return;
        };

        match record.bg_type {
            BgType::Spine => {
                let name = l2d_spine_name(&record.bg_file_name);
                let tables = self.ctx.tables;
                l2d.entry(name.clone()).or_insert_with(|| {
                    log::debug!("registering live-2D config {}", name);
                    tables
                        .l2d_config(&name)
                        .cloned()
                        .unwrap_or_else(|| L2dConfig::named(&name))
                });
                self.unit.l2d = Some(L2d {
                    url: self.ctx.url(ResourceKind::L2dSpine, &name),
                    animation_name: record.animation_name.clone(),
                    name,
                });
            }
            BgType::Image | BgType::Unknown => {
                // A cross-fade transition belongs to the background, not the unit.
                let overlap = self
                    .unit
                    .transition
                    .as_ref()
                    .and_then(|t| t.overlap_duration());
                if overlap.is_some() {
                    self.unit.transition = None;
                }
                self.unit.bg = Some(Background {
                    url: self.ctx.url(ResourceKind::Bg, &record.bg_file_name),
                    overlap,
                });
            }
        }
    }

    fn resolve_bg_effect(&mut self) {
        let id = self.row.bg_effect;
        if id == 0 {
            return;
        }
        self.unit.effect.bg_effect = self.ctx.tables.bg_effect(id).cloned();
        if self.unit.effect.bg_effect.is_none() {
            log::warn!("row {}: unknown BG effect id {}", self.index, id);
        }
    }

    fn default_type(&mut self) {
        self.unit.unit_type = match self.row.text(self.ctx.language()) {
            Some(_) => UnitType::Text,
            None => UnitType::EffectOnly,
        };
    }

    fn fold_script(
        &mut self,
        finalized: &[StoryUnit],
        warnings: &mut Vec<TranslateError>,
    ) -> Result<()> {
        let row = self.row;
        let env = Env {
            ctx: self.ctx,
            row,
            row_index: self.index,
            finalized,
        };

        for segment in tokenize(&row.script_kr) {
            let mut rest = segment.text;
            while let Some(m) = grammar::match_directive(rest) {
                log::trace!(
                    "row {} line {}: {} {:?}",
                    self.index,
                    segment.line,
                    m.directive.name(),
                    m.captures
                );
                m.directive.apply(&m.captures, &mut self.unit, &env, warnings)?;
                if m.len == 0 {
                    break;
                }
                rest = skip_separators(&rest[m.len..]);
            }
            if !rest.is_empty() {
                log::debug!(
                    "row {} line {}: unrecognized script {:?} (head {:?})",
                    self.index,
                    segment.line,
                    rest,
                    segment.head()
                );
            }
        }
        Ok(())
    }

    fn default_highlight(&mut self) {
        if !self.unit.characters.iter().any(|c| c.highlight) {
            for c in &mut self.unit.characters {
                c.highlight = true;
            }
        }
    }
}
