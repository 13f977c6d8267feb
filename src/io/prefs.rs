//! Currency display preference persistence
//!
//! Storage failures are never surfaced: a failed read falls back to USD
//! and a failed write is skipped. The trait keeps callers testable
//! without a real storage backend.

use crate::domain::currency::Currency;
use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub trait PreferenceStore {
    /// The saved currency, or USD when nothing usable is stored.
    fn load(&self) -> Currency;
    /// Persist the preference. Failures are swallowed.
    fn save(&self, currency: Currency);
}

/// File-backed store: a single currency code on one line.
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Currency {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Currency::from_code(contents.trim()).unwrap_or_default(),
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "preference_read_failed");
                Currency::default()
            }
        }
    }

    fn save(&self, currency: Currency) {
        if let Err(e) = fs::write(&self.path, currency.code()) {
            debug!(path = %self.path.display(), error = %e, "preference_write_skipped");
        }
    }
}

/// In-memory store for tests and sessions without a storage backend.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    current: Cell<Option<Currency>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Currency {
        self.current.get().unwrap_or_default()
    }

    fn save(&self, currency: Currency) {
        self.current.set(Some(currency));
    }
}
