//! Translation of exported story spreadsheets into a playable timeline.
//!
//! Raw rows carry a semicolon-delimited script field next to per-language
//! text. [`translate`] turns every row into exactly one [`StoryUnit`],
//! resolving characters, backgrounds, audio and transitions against a
//! read-only [`ReferenceTables`] snapshot and deriving every resource URL.

pub mod builder;
pub mod context;
pub mod error;
pub mod grammar;
pub mod raw;
pub mod resolver;
pub mod resource;
pub mod tables;
pub mod text;
pub mod tokenizer;
pub mod translator;
pub mod unit;

pub use context::{TranslateContext, TranslateSettings};
pub use error::TranslateError;
pub use raw::{Language, RawRow};
pub use tables::ReferenceTables;
pub use translator::{translate, translate_units, Translator};
pub use unit::{Story, StoryUnit, UnitType};
