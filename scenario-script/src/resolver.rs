use crate::error::{Result, TranslateError};
use crate::unit::{CharacterInstance, StoryUnit};

pub fn last_occupant(finalized: &[StoryUnit], before: usize, slot: u8) -> Option<&CharacterInstance> {
    finalized[..before.min(finalized.len())]
        .iter()
        .rev()
        .find_map(|unit| unit.character_at(slot))
}

/// Index of the character in `slot`, copied forward from the newest
/// finalized unit that had one. Effects are not copied.
pub fn resolve(
    unit: &mut StoryUnit,
    slot: u8,
    finalized: &[StoryUnit],
    row: usize,
    raw: &str,
) -> Result<usize> {
    if let Some(idx) = unit.character_index(slot) {
        return Ok(idx);
    }

    let Some(previous) = last_occupant(finalized, row, slot) else {
        return Err(TranslateError::SlotNeverDeclared {
            row,
            slot,
            raw: raw.to_string(),
        });
    };

    log::trace!(
        "row {}: slot {} copied forward (character {})",
        row,
        slot,
        previous.character_id
    );
    unit.characters.push(CharacterInstance {
        effects: Vec::new(),
        ..previous.clone()
    });
    Ok(unit.characters.len() - 1)
}
