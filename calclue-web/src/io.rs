//! Browser-side persistence and logging using Web APIs

use calclue_core::{SettingsError, SettingsStore};
use log::{Level, Log, Metadata, Record};

/// Settings blob kept under one `localStorage` key
pub struct LocalStorageStore {
    key: String,
}

impl LocalStorageStore {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage(&self) -> Result<web_sys::Storage, SettingsError> {
        let window = web_sys::window().ok_or_else(|| SettingsError::Store("No window".into()))?;
        window
            .local_storage()
            .map_err(|e| SettingsError::Store(format!("{e:?}")))?
            .ok_or_else(|| SettingsError::Store("No localStorage".into()))
    }
}

impl SettingsStore for LocalStorageStore {
    fn load(&self) -> Result<Option<String>, SettingsError> {
        self.storage()?
            .get_item(&self.key)
            .map_err(|e| SettingsError::Store(format!("{e:?}")))
    }

    fn save(&self, blob: &str) -> Result<(), SettingsError> {
        self.storage()?
            .set_item(&self.key, blob)
            .map_err(|e| SettingsError::Store(format!("{e:?}")))
    }
}

/// Forwards `log` records to the browser console
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl ConsoleLogger {
    pub fn install(level: log::LevelFilter) {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(level);
        }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("[calclue] {}", record.args());
        match record.level() {
            Level::Error => web_sys::console::error_1(&line.into()),
            Level::Warn => web_sys::console::warn_1(&line.into()),
            Level::Info => web_sys::console::info_1(&line.into()),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line.into()),
        }
    }

    fn flush(&self) {}
}
