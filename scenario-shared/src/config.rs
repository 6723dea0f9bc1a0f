//! Process-wide configuration store.
//!
//! The TOML file is read once at startup; sections are deserialized on
//! demand with [`get`]. Library code that must stay pure (translation)
//! receives its settings explicitly instead of reading from here.

use std::fs;
use std::path::Path;
use std::sync::RwLock;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;
use toml::Table;

static GLOBAL_CONFIG: OnceCell<RwLock<Table>> = OnceCell::new();

pub fn init<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();

    let content = if path.exists() {
        log::info!("Loading config from {:?}", path);
        fs::read_to_string(path)?
    } else {
        log::warn!("Config file not found at {:?}, using defaults.", path);
        String::new()
    };

    init_from_str(&content)
}

/// Installs `content` as the global configuration.
pub fn init_from_str(content: &str) -> anyhow::Result<()> {
    let table: Table = toml::from_str(content).unwrap_or_else(|e| {
        log::error!("Config syntax error: {}, using empty config.", e);
        Table::new()
    });

    GLOBAL_CONFIG
        .set(RwLock::new(table))
        .map_err(|_| anyhow::anyhow!("Config already initialized"))
}

pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}

/// Section `key` deserialized as `T`; `T::default()` when the store is not
/// initialized, the section is missing, or it does not fit `T`.
pub fn get<T: DeserializeOwned + Default>(key: &str) -> T {
    let Some(store) = GLOBAL_CONFIG.get() else {
        log::warn!("Config read for '[{}]' before init. Using default.", key);
        return T::default();
    };
    let read_guard = match store.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    match read_guard.get(key) {
        Some(value) => value.clone().try_into().unwrap_or_else(|e| {
            log::warn!("Config section '[{}]' mismatch: {}. Using default.", key, e);
            T::default()
        }),
        None => T::default(),
    }
}

/// Overwrites section `key` at runtime.
pub fn set<T: serde::Serialize>(key: &str, value: &T) -> anyhow::Result<()> {
    let store = GLOBAL_CONFIG
        .get()
        .ok_or_else(|| anyhow::anyhow!("Config not initialized"))?;
    let value = toml::Value::try_from(value)?;
    let mut guard = store
        .write()
        .map_err(|_| anyhow::anyhow!("Config lock poisoned"))?;
    guard.insert(key.to_string(), value);
    Ok(())
}
