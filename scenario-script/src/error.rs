/// Errors raised while translating raw story rows.
///
/// Every variant carries the index of the offending row and the raw script
/// text that produced it, so the caller can decide whether to skip the unit
/// or halt playback.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslateError {
    #[error("row {row}: `{id}` is not present in the {table} table (script: {raw:?})")]
    ReferenceNotFound {
        row: usize,
        table: &'static str,
        id: String,
        raw: String,
    },

    #[error("row {row}: option line {line:?} is malformed (script: {raw:?})")]
    MalformedOption {
        row: usize,
        line: String,
        raw: String,
    },

    #[error("row {row}: slot {slot} was never declared by an earlier row (script: {raw:?})")]
    SlotNeverDeclared {
        row: usize,
        slot: u8,
        raw: String,
    },
}

impl TranslateError {
    pub fn row(&self) -> usize {
        match self {
            TranslateError::ReferenceNotFound { row, .. }
            | TranslateError::MalformedOption { row, .. }
            | TranslateError::SlotNeverDeclared { row, .. } => *row,
        }
    }

    /// Whether translation can continue past this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TranslateError::MalformedOption { .. })
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
