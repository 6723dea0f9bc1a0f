//! Replaying a translated story from any index.

use std::sync::Arc;
use scenario_script::unit::{Background, Bgm, CharacterInstance, HideTarget, L2d, StoryUnit};

/// What is on stage when playback lands on a unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StageState {
    pub bg: Option<Background>,
    pub l2d: Option<L2d>,
    pub bgm: Option<Bgm>,
    pub characters: Vec<CharacterInstance>,
}

/// Cursor over a translated story.
///
/// Units tagged with a selection group only play when that group was the
/// player's last choice.
#[derive(Debug, Clone)]
pub struct Timeline {
    units: Arc<[StoryUnit]>,
    index: usize,
    // (option unit index, selection group), oldest first
    choices: Vec<(usize, u32)>,
}

impl Timeline {
    pub fn new(units: impl Into<Arc<[StoryUnit]>>) -> Self {
        Self {
            units: units.into(),
            index: 0,
            choices: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[StoryUnit] {
        &self.units
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&StoryUnit> {
        self.units.get(self.index)
    }

    /// Records the player's answer to the current option unit.
    pub fn choose(&mut self, selection_group: u32) {
        log::debug!("selection group {} chosen at unit {}", selection_group, self.index);
        if let Some(last) = self.choices.last_mut() {
            if last.0 == self.index {
                last.1 = selection_group;
                return;
            }
        }
        self.choices.push((self.index, selection_group));
    }

    pub fn chosen(&self) -> Option<u32> {
        self.choices.last().map(|&(_, group)| group)
    }

    /// Moves to the next unit on the chosen branch.
    pub fn advance(&mut self) -> Option<&StoryUnit> {
        let next = self.next_in_branch(self.index + 1)?;
        self.index = next;
        self.units.get(next)
    }

    /// First index at or after `from` that belongs to the chosen branch.
    pub fn next_in_branch(&self, from: usize) -> Option<usize> {
        (from..self.units.len()).find(|&i| self.in_branch(&self.units[i]))
    }

    fn in_branch(&self, unit: &StoryUnit) -> bool {
        match (unit.selection_group, self.chosen()) {
            (0, _) => true,
            (group, Some(chosen)) => group == chosen,
            (_, None) => false,
        }
    }

    /// Jumps to `index` (clamped) and forgets any branch taken after it.
    pub fn seek(&mut self, index: usize) -> Option<&StoryUnit> {
        if self.units.is_empty() {
            return None;
        }
        self.index = index.min(self.units.len() - 1);
        while self.choices.last().is_some_and(|&(at, _)| at >= self.index) {
            self.choices.pop();
        }
        self.current()
    }

    /// Reconstructs the stage at `index` by looking backward.
    pub fn stage_at(&self, index: usize) -> StageState {
        let end = (index + 1).min(self.units.len());
        let history = &self.units[..end];
        let mut stage = StageState::default();

        for unit in history.iter().rev() {
            if let Some(bg) = &unit.bg {
                stage.bg = Some(bg.clone());
                break;
            }
            if let Some(l2d) = &unit.l2d {
                stage.l2d = Some(l2d.clone());
                break;
            }
        }

        stage.bgm = history
            .iter()
            .rev()
            .find_map(|u| u.audio.as_ref().and_then(|a| a.bgm.clone()));

        for unit in history.iter().rev() {
            if !unit.characters.is_empty() {
                stage.characters = unit
                    .characters
                    .iter()
                    .map(|c| CharacterInstance {
                        effects: Vec::new(),
                        ..c.clone()
                    })
                    .collect();
                break;
            }
            if unit.hide == Some(HideTarget::All) {
                break;
            }
        }
        stage
    }
}
