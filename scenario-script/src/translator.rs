use std::collections::BTreeMap;

use crate::builder::UnitBuilder;
use crate::context::TranslateContext;
use crate::error::{Result, TranslateError};
use crate::raw::RawRow;
use crate::tables::L2dConfig;
use crate::unit::{Story, StoryUnit};

/// Accumulates finalized units row by row.
///
/// Only the finalized prefix is visible to backward resolution; the unit of
/// the current row is owned by its builder until it is pushed.
pub struct Translator<'a> {
    ctx: TranslateContext<'a>,
    units: Vec<StoryUnit>,
    l2d_configs: BTreeMap<String, L2dConfig>,
    diagnostics: Vec<TranslateError>,
}

impl<'a> Translator<'a> {
    pub fn new(ctx: TranslateContext<'a>) -> Self {
        Self {
            ctx,
            units: Vec::new(),
            l2d_configs: BTreeMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Translates the next row and appends its unit.
    pub fn push_row(&mut self, row: &RawRow) -> Result<&StoryUnit> {
        let index = self.units.len();
        log::debug!("translating row {} (group {})", index, row.group_id);

        let unit = UnitBuilder::new(self.ctx, row, index).build(
            &self.units,
            &mut self.l2d_configs,
            &mut self.diagnostics,
        )?;
        self.units.push(unit);
        Ok(&self.units[index])
    }

    pub fn finish(self) -> Story {
        Story {
            units: self.units,
            l2d_configs: self.l2d_configs,
            diagnostics: self.diagnostics,
        }
    }
}

/// Translates `rows` in order into one unit per row.
///
/// Fails on the first reference to an undeclared character or stage slot.
/// Malformed option lines do not fail; they end up in `Story::diagnostics`.
pub fn translate(rows: &[RawRow], ctx: &TranslateContext<'_>) -> Result<Story> {
    let mut translator = Translator::new(*ctx);
    for row in rows {
        if let Err(err) = translator.push_row(row) {
            log::error!("translation aborted: {}", err);
            return Err(err);
        }
    }
    let story = translator.finish();
    log::info!(
        "translated {} rows ({} live-2D configs, {} diagnostics)",
        story.units.len(),
        story.l2d_configs.len(),
        story.diagnostics.len()
    );
    Ok(story)
}

pub fn translate_units(rows: &[RawRow], ctx: &TranslateContext<'_>) -> Result<Vec<StoryUnit>> {
    translate(rows, ctx).map(|story| story.units)
}
