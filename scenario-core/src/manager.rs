use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use walkdir::WalkDir;

use scenario_script::tables::{
    BgEffectRecord, BgRecord, BgmRecord, CharacterRecord, L2dConfig, TransitionRecord,
};
use scenario_script::{translate, RawRow, ReferenceTables, Story, TranslateContext, TranslateSettings};

pub const CHARACTER_TABLE: &str = "ScenarioCharacterNameExcelTable.json";
pub const CHARACTER_NAME_TABLE: &str = "CharacterNameTable.json";
pub const BG_TABLE: &str = "ScenarioBGNameExcelTable.json";
pub const BGM_TABLE: &str = "BGMExcelTable.json";
pub const TRANSITION_TABLE: &str = "ScenarioTransitionExcelTable.json";
pub const BG_EFFECT_TABLE: &str = "ScenarioBGEffectExcelTable.json";
pub const L2D_CONFIG_TABLE: &str = "L2dConfig.json";

/// Excel exports wrap their rows in `DataList`; hand-written files may not.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListFile<T> {
    Wrapped {
        #[serde(rename = "DataList", alias = "content")]
        data_list: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<T> ListFile<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            ListFile::Wrapped { data_list } => data_list,
            ListFile::Bare(v) => v,
        }
    }
}

/// Loads reference tables and story files, and translates stories on request.
pub struct StoryManager {
    pub tables: ReferenceTables,

    // file stem -> rows
    pub stories: BTreeMap<String, Vec<RawRow>>,

    story_sources: FxHashMap<String, PathBuf>,
}

impl StoryManager {
    pub fn new() -> Self {
        Self {
            tables: ReferenceTables::new(),
            stories: BTreeMap::new(),
            story_sources: FxHashMap::default(),
        }
    }

    /// Reads every known table from `data_dir`. Missing files leave the
    /// table empty; unreadable or malformed ones are an error.
    pub fn load_tables(&mut self, data_dir: impl AsRef<Path>) -> Result<()> {
        let dir = data_dir.as_ref();
        info!("Loading reference tables from {:?}", dir);

        // explicit names first so they win over the Korean-name index
        if let Some(names) = read_optional::<FxHashMap<String, u64>>(&dir.join(CHARACTER_NAME_TABLE))? {
            for (name, id) in names {
                self.tables.insert_character_name(name, id);
            }
        }
        for record in read_list::<CharacterRecord>(&dir.join(CHARACTER_TABLE))? {
            self.tables.insert_character(record);
        }
        for record in read_list::<BgRecord>(&dir.join(BG_TABLE))? {
            self.tables.insert_background(record);
        }
        for record in read_list::<BgmRecord>(&dir.join(BGM_TABLE))? {
            self.tables.insert_bgm(record);
        }
        for record in read_list::<TransitionRecord>(&dir.join(TRANSITION_TABLE))? {
            self.tables.insert_transition(record);
        }
        for record in read_list::<BgEffectRecord>(&dir.join(BG_EFFECT_TABLE))? {
            self.tables.insert_bg_effect(record);
        }
        for config in read_list::<L2dConfig>(&dir.join(L2D_CONFIG_TABLE))? {
            self.tables.insert_l2d_config(config);
        }

        info!(
            "Tables loaded. Characters: {}, Backgrounds: {}, BGM: {}, Transitions: {}, BG effects: {}",
            self.tables.characters.len(),
            self.tables.backgrounds.len(),
            self.tables.bgms.len(),
            self.tables.transitions.len(),
            self.tables.bg_effects.len(),
        );
        Ok(())
    }

    /// Scans `root_dir` for `*.json` story files.
    pub fn load_project(&mut self, root_dir: impl AsRef<Path>) -> Result<usize> {
        let root = root_dir.as_ref();
        info!("Scanning story project at: {:?}", root);

        let mut loaded_count = 0;
        for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|e| e == "json") {
                self.load_story_file(path)?;
                loaded_count += 1;
            }
        }

        info!("Project loaded. Files: {}, Stories: {}", loaded_count, self.stories.len());
        Ok(loaded_count)
    }

    pub fn load_story_file(&mut self, path: &Path) -> Result<()> {
        let key = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .with_context(|| format!("Story path has no file name: {:?}", path))?;

        if let Some(existing) = self.story_sources.get(&key) {
            if existing != path {
                anyhow::bail!(
                    "Story collision detected!\n  Story '{}' is defined in:\n    1. {:?}\n    2. {:?}",
                    key, existing, path
                );
            }
        }

        let rows: Vec<RawRow> = read_list(path)?;
        log::debug!("Loaded story {} ({} rows)", key, rows.len());
        self.story_sources.insert(key.clone(), path.to_path_buf());
        self.stories.insert(key, rows);
        Ok(())
    }

    pub fn insert_story(&mut self, name: impl Into<String>, rows: Vec<RawRow>) {
        self.stories.insert(name.into(), rows);
    }

    pub fn story(&self, name: &str) -> Option<&[RawRow]> {
        self.stories.get(name).map(Vec::as_slice)
    }

    pub fn story_names(&self) -> impl Iterator<Item = &str> {
        self.stories.keys().map(String::as_str)
    }

    pub fn translate(&self, name: &str, settings: &TranslateSettings) -> Result<Story> {
        let rows = self
            .story(name)
            .with_context(|| format!("Story '{}' is not loaded", name))?;
        let ctx = TranslateContext::new(&self.tables, settings);
        let story = translate(rows, &ctx).with_context(|| format!("Failed to translate story '{}'", name))?;
        for diagnostic in &story.diagnostics {
            warn!("{}: {}", name, diagnostic);
        }
        Ok(story)
    }
}

impl Default for StoryManager {
    fn default() -> Self {
        Self::new()
    }
}

fn read_optional<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {:?}", path))?;
    Ok(Some(value))
}

fn read_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    match read_optional::<ListFile<T>>(path)? {
        Some(list) => Ok(list.into_vec()),
        None => {
            warn!("Table {:?} not found, leaving it empty.", path);
            Ok(Vec::new())
        }
    }
}
