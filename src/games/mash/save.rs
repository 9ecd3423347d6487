//! MASH セーブ/ロード機能。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! 保存先は [`KeyValueStore`]。ブラウザでは localStorage、テストではメモリ上の map。
//! 消去ラン中の状態は保存しない（完了した結果だけが履歴に残る）。

use std::collections::HashMap;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::error::SaveError;
use super::state::{
    CategoryDraft, HistoryEntry, MashState, Mode, Template, HISTORY_LIMIT, MAX_STEP_COUNT,
    TEMPLATE_LIMIT,
};

const SAVE_VERSION: u32 = 1;
const MIN_COMPATIBLE_VERSION: u32 = 1;

pub const STORAGE_KEY: &str = "mash_fortune_save";

/// A string key-value settings store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError>;
    fn remove(&mut self, key: &str);
}

/// In-memory store for native builds and tests.
#[derive(Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// Browser localStorage.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SaveError> {
        let storage =
            Self::storage().ok_or_else(|| SaveError::Storage("localStorage unavailable".into()))?;
        storage
            .set_item(key, value)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: MashSave,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct MashSave {
    mode: Mode,
    last_step_count: u32,
    /// Categories and answers currently being edited.
    drafts: Vec<CategoryDraft>,
    templates: Vec<Template>,
    /// Oldest first.
    history: Vec<HistoryEntry>,
    rng_state: u64,
}

fn extract_save(state: &MashState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: MashSave {
            mode: state.mode,
            last_step_count: state.last_step_count,
            drafts: state.drafts.clone(),
            templates: state.templates.clone(),
            history: state.history.clone(),
            rng_state: state.rng_state,
        },
    }
}

fn apply_save(state: &mut MashState, save: MashSave) {
    state.mode = save.mode;
    state.last_step_count = save.last_step_count.min(MAX_STEP_COUNT);
    // An empty list means the save predates drafts; keep the defaults.
    if !save.drafts.is_empty() {
        state.drafts = save.drafts;
    }
    state.templates = save.templates;
    state.templates.truncate(TEMPLATE_LIMIT);
    state.history = save.history;
    if state.history.len() > HISTORY_LIMIT {
        let excess = state.history.len() - HISTORY_LIMIT;
        state.history.drain(..excess);
    }
    if save.rng_state != 0 {
        state.rng_state = save.rng_state;
    }
}

/// Write the persistent part of `state`. Clears the dirty flag on success.
pub fn save_game(state: &mut MashState, store: &mut dyn KeyValueStore) -> Result<(), SaveError> {
    let json = serde_json::to_string(&extract_save(state))?;
    store.set(STORAGE_KEY, &json)?;
    state.dirty = false;
    Ok(())
}

/// Restore from `store`. Unreadable or incompatible data is discarded and
/// the game starts fresh.
pub fn load_game(state: &mut MashState, store: &mut dyn KeyValueStore) -> bool {
    let Some(json) = store.get(STORAGE_KEY) else {
        return false;
    };

    let save_data: SaveData = match serde_json::from_str(&json) {
        Ok(d) => d,
        Err(e) => {
            warn!("MASH: セーブデータのパースに失敗（破棄します）: {e}");
            store.remove(STORAGE_KEY);
            return false;
        }
    };

    if save_data.version < MIN_COMPATIBLE_VERSION {
        warn!(
            "MASH: セーブバージョンが古すぎます (saved={}, min_compatible={})",
            save_data.version, MIN_COMPATIBLE_VERSION
        );
        store.remove(STORAGE_KEY);
        return false;
    }

    apply_save(state, save_data.game);
    info!(
        "MASH: loaded {} templates, {} history entries",
        state.templates.len(),
        state.history.len()
    );
    true
}

pub fn delete_save(store: &mut dyn KeyValueStore) {
    store.remove(STORAGE_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::mash::logic;
    use crate::games::mash::state::Screen;
    use crate::games::mash::story::TemplateStory;

    fn played_state() -> MashState {
        let mut s = MashState::new();
        for d in &mut s.drafts {
            d.answers = vec!["one".into(), "two".into()];
        }
        s.mode = Mode::Story;
        logic::start_game(&mut s, &TemplateStory).unwrap();
        logic::save_template(&mut s).unwrap();
        s.last_step_count = 7;
        s
    }

    #[test]
    fn save_and_load_roundtrip() {
        let mut store = MemoryStore::default();
        let mut original = played_state();
        save_game(&mut original, &mut store).unwrap();
        assert!(!original.dirty);

        let mut restored = MashState::new();
        assert!(load_game(&mut restored, &mut store));
        assert_eq!(restored.mode, Mode::Story);
        assert_eq!(restored.last_step_count, 7);
        assert_eq!(restored.history, original.history);
        assert_eq!(restored.templates, original.templates);
        assert_eq!(restored.drafts, original.drafts);
        assert_eq!(restored.rng_state, original.rng_state);
        // Screens and transient state always start fresh.
        assert_eq!(restored.screen, Screen::Setup);
        assert!(restored.fortune.is_none());
    }

    #[test]
    fn missing_save_is_not_an_error() {
        let mut store = MemoryStore::default();
        let mut s = MashState::new();
        assert!(!load_game(&mut s, &mut store));
        assert_eq!(s.drafts.len(), 6);
    }

    #[test]
    fn corrupt_save_is_discarded() {
        let mut store = MemoryStore::default();
        store.set(STORAGE_KEY, "{not json").unwrap();
        let mut s = MashState::new();
        assert!(!load_game(&mut s, &mut store));
        assert!(store.get(STORAGE_KEY).is_none());
    }

    #[test]
    fn too_old_version_is_discarded() {
        let mut store = MemoryStore::default();
        store
            .set(STORAGE_KEY, r#"{"version":0,"game":{"last_step_count":5}}"#)
            .unwrap();
        let mut s = MashState::new();
        assert!(!load_game(&mut s, &mut store));
        assert_eq!(s.last_step_count, 0);
        assert!(store.get(STORAGE_KEY).is_none());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let mut store = MemoryStore::default();
        store
            .set(STORAGE_KEY, r#"{"version":1,"game":{"last_step_count":12}}"#)
            .unwrap();
        let mut s = MashState::new();
        assert!(load_game(&mut s, &mut store));
        assert_eq!(s.last_step_count, 12);
        assert_eq!(s.mode, Mode::Spiral);
        assert_eq!(s.drafts.len(), 6);
        assert!(s.history.is_empty());
    }

    #[test]
    fn oversized_lists_are_trimmed_on_load() {
        let mut s = played_state();
        let entry = s.history[0].clone();
        s.history = vec![entry; HISTORY_LIMIT + 3];
        let mut store = MemoryStore::default();
        save_game(&mut s, &mut store).unwrap();

        let mut restored = MashState::new();
        load_game(&mut restored, &mut store);
        assert_eq!(restored.history.len(), HISTORY_LIMIT);
    }

    #[test]
    fn delete_removes_key() {
        let mut store = MemoryStore::default();
        let mut s = played_state();
        save_game(&mut s, &mut store).unwrap();
        delete_save(&mut store);
        assert!(store.get(STORAGE_KEY).is_none());
    }
}
