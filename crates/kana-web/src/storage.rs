use kana_core::{KeyValueStore, MemoryStore, StorageError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// `window.localStorage`, or an in-memory map when the browser refuses
/// access (private browsing, disabled storage). In the fallback case history
/// simply does not survive a reload.
pub enum BrowserStore {
    Local(Storage),
    Memory(MemoryStore),
}

impl BrowserStore {
    pub fn open() -> Self {
        match web_sys::window().map(|w| w.local_storage()) {
            Some(Ok(Some(storage))) => BrowserStore::Local(storage),
            other => {
                log::warn!("storage: localStorage unavailable ({other:?}), history will not persist");
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            BrowserStore::Local(storage) => storage
                .get_item(key)
                .map_err(|e| StorageError::Unavailable(format!("{e:?}"))),
            BrowserStore::Memory(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            BrowserStore::Local(storage) => storage
                .set_item(key, value)
                .map_err(|e| classify(key, value, e)),
            BrowserStore::Memory(store) => store.set(key, value),
        }
    }
}

fn classify(key: &str, value: &str, err: JsValue) -> StorageError {
    let name = js_sys::Reflect::get(&err, &JsValue::from_str("name"))
        .ok()
        .and_then(|n| n.as_string());
    match name.as_deref() {
        Some("QuotaExceededError") | Some("NS_ERROR_DOM_QUOTA_REACHED") => {
            StorageError::QuotaExceeded {
                key: key.to_string(),
                bytes: value.len(),
            }
        }
        _ => StorageError::Unavailable(format!("{err:?}")),
    }
}
