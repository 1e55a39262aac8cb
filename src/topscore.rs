//! Top score persistence
//!
//! A single number survives between sessions. It is read once at startup and
//! written once per game over that beats it.

use crate::error::StoreError;

/// Where the top score lives between sessions
pub trait TopScoreStore {
    /// Stored top score, 0 if absent or unreadable
    fn load_top_score(&self) -> u64;

    /// Persist a new top score
    fn save_top_score(&mut self, value: u64) -> Result<(), StoreError>;
}

/// Interpret a stored top score. Anything that is not a finite, non-negative
/// number reads as 0; fractional values are floored.
pub fn parse_top_score(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };

    match serde_json::from_str::<f64>(raw.trim()) {
        Ok(v) if v.is_finite() && v >= 0.0 => v.floor() as u64,
        Ok(v) => {
            log::warn!("Stored top score out of range ({}), using 0", v);
            0
        }
        Err(e) => {
            log::warn!("Stored top score unreadable ({}), using 0", e);
            0
        }
    }
}

/// In-process store for the native runner and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u64>,
    /// Number of successful saves
    pub saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top_score(value: u64) -> Self {
        Self {
            value: Some(value),
            saves: 0,
        }
    }
}

impl TopScoreStore for MemoryStore {
    fn load_top_score(&self) -> u64 {
        self.value.unwrap_or(0)
    }

    fn save_top_score(&mut self, value: u64) -> Result<(), StoreError> {
        self.value = Some(value);
        self.saves += 1;
        Ok(())
    }
}

/// Browser LocalStorage, or an error when the host has none
#[cfg(target_arch = "wasm32")]
pub(crate) fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(StoreError::Unavailable)
}

/// Top score kept in LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    const STORAGE_KEY: &'static str = "lane_dash_top_score";
}

#[cfg(target_arch = "wasm32")]
impl TopScoreStore for LocalStorageStore {
    fn load_top_score(&self) -> u64 {
        let stored = match local_storage() {
            Ok(storage) => storage.get_item(Self::STORAGE_KEY).ok().flatten(),
            Err(e) => {
                log::warn!("Top score not loaded: {}", e);
                None
            }
        };
        let top = parse_top_score(stored.as_deref());
        log::info!("Loaded top score {}", top);
        top
    }

    fn save_top_score(&mut self, value: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&value).map_err(|e| StoreError::Encode(e.to_string()))?;
        local_storage()?
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|e| StoreError::write(Self::STORAGE_KEY, e))?;
        log::info!("Top score saved ({})", value);
        Ok(())
    }
}
