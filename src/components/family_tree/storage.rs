//! Key-value persistence for tree state.
//!
//! Every record lives under one string key. Writes are synchronous and go
//! straight to the backend; a failed write is logged and dropped so callers keep
//! working from their in-memory copy for the rest of the session.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Key scheme shared by every store.
pub mod keys {
	/// Prefix of photo data URL records.
	pub const PHOTO_PREFIX: &str = "photo:";
	/// Prefix of display name records.
	pub const NAME_PREFIX: &str = "name:";
	/// Prefix of JSON position records.
	pub const POS_PREFIX: &str = "pos:";
	/// The single JSON record holding every edge.
	pub const CONNECTIONS: &str = "connections";

	/// Photo record key of a card.
	pub fn photo(id: &str) -> String {
		format!("{PHOTO_PREFIX}{id}")
	}

	/// Name record key of a card.
	pub fn name(id: &str) -> String {
		format!("{NAME_PREFIX}{id}")
	}

	/// Position record key of a card.
	pub fn pos(id: &str) -> String {
		format!("{POS_PREFIX}{id}")
	}
}

/// Why a backend operation failed.
#[derive(Error, Debug)]
pub enum StorageError {
	/// No backend, or the user disabled it.
	#[error("storage is unavailable")]
	Unavailable,

	/// The write did not fit.
	#[error("storage quota exceeded while writing {key}")]
	QuotaExceeded {
		/// Key being written.
		key: String,
	},

	/// Any other backend failure, with its message.
	#[error("storage backend error: {0}")]
	Backend(String),

	/// A stored record did not decode.
	#[error("corrupt record under {key}: {source}")]
	Corrupt {
		/// Key of the record.
		key: String,
		/// Decoder error.
		source: serde_json::Error,
	},
}

/// A synchronous string key-value backend.
pub trait KeyValueStore {
	/// Value under `key`, `None` if absent.
	fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
	/// Replaces the value under `key`.
	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
	/// Deletes `key`; absent keys are not an error.
	fn remove(&mut self, key: &str) -> Result<(), StorageError>;
	/// Every key currently stored.
	fn keys(&self) -> Result<Vec<String>, StorageError>;
}

/// In-memory backend, optionally bounded by a byte quota over keys and values.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	entries: BTreeMap<String, String>,
	quota: Option<usize>,
	disabled: bool,
}

impl MemoryStore {
	/// An unbounded empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// An empty store holding at most `bytes` of keys plus values.
	pub fn with_quota(bytes: usize) -> Self {
		Self {
			quota: Some(bytes),
			..Self::default()
		}
	}

	/// A backend that refuses every operation, like storage disabled by the user.
	pub fn disabled() -> Self {
		Self {
			disabled: true,
			..Self::default()
		}
	}

	fn used_without(&self, key: &str) -> usize {
		self.entries
			.iter()
			.filter(|(k, _)| k.as_str() != key)
			.map(|(k, v)| k.len() + v.len())
			.sum()
	}
}

impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		if self.disabled {
			return Err(StorageError::Unavailable);
		}
		Ok(self.entries.get(key).cloned())
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		if self.disabled {
			return Err(StorageError::Unavailable);
		}
		if let Some(quota) = self.quota {
			if self.used_without(key) + key.len() + value.len() > quota {
				return Err(StorageError::QuotaExceeded { key: key.into() });
			}
		}
		self.entries.insert(key.into(), value.into());
		Ok(())
	}

	fn remove(&mut self, key: &str) -> Result<(), StorageError> {
		if self.disabled {
			return Err(StorageError::Unavailable);
		}
		self.entries.remove(key);
		Ok(())
	}

	fn keys(&self) -> Result<Vec<String>, StorageError> {
		if self.disabled {
			return Err(StorageError::Unavailable);
		}
		Ok(self.entries.keys().cloned().collect())
	}
}

/// The browser's per-origin `localStorage`.
pub struct BrowserStore {
	storage: web_sys::Storage,
}

impl BrowserStore {
	/// Opens `window.localStorage`.
	pub fn local() -> Result<Self, StorageError> {
		let window = web_sys::window().ok_or(StorageError::Unavailable)?;
		let storage = window
			.local_storage()
			.map_err(js_error)?
			.ok_or(StorageError::Unavailable)?;
		Ok(Self { storage })
	}
}

fn js_error(err: JsValue) -> StorageError {
	if let Some(dom) = err.dyn_ref::<web_sys::DomException>() {
		return StorageError::Backend(format!("{}: {}", dom.name(), dom.message()));
	}
	if let Some(js) = err.dyn_ref::<js_sys::Error>() {
		return StorageError::Backend(String::from(js.message()));
	}
	StorageError::Backend(format!("{err:?}"))
}

fn is_quota_error(err: &JsValue) -> bool {
	err.dyn_ref::<web_sys::DomException>()
		.is_some_and(|dom| dom.name() == "QuotaExceededError")
}

impl KeyValueStore for BrowserStore {
	fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
		self.storage.get_item(key).map_err(js_error)
	}

	fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
		self.storage.set_item(key, value).map_err(|err| {
			if is_quota_error(&err) {
				StorageError::QuotaExceeded { key: key.into() }
			} else {
				js_error(err)
			}
		})
	}

	fn remove(&mut self, key: &str) -> Result<(), StorageError> {
		self.storage.remove_item(key).map_err(js_error)
	}

	fn keys(&self) -> Result<Vec<String>, StorageError> {
		let len = self.storage.length().map_err(js_error)?;
		let mut out = Vec::with_capacity(len as usize);
		for i in 0..len {
			if let Some(key) = self.storage.key(i).map_err(js_error)? {
				out.push(key);
			}
		}
		Ok(out)
	}
}

/// Shared, single-threaded handle over a backend.
///
/// All stores of one board hold clones of the same handle. Failures are
/// logged here and reported to the caller as `None` / `false`.
#[derive(Clone)]
pub struct StoreHandle {
	inner: Rc<RefCell<dyn KeyValueStore>>,
}

impl StoreHandle {
	/// Wraps `store` for sharing.
	pub fn new(store: impl KeyValueStore + 'static) -> Self {
		Self {
			inner: Rc::new(RefCell::new(store)),
		}
	}

	/// Value under `key`; read failures yield `None`.
	pub fn get(&self, key: &str) -> Option<String> {
		match self.inner.borrow().get(key) {
			Ok(value) => value,
			Err(err) => {
				warn!("read of {key} failed: {err}");
				None
			}
		}
	}

	/// Writes `value`, returning false if the write was dropped.
	pub fn set(&self, key: &str, value: &str) -> bool {
		match self.inner.borrow_mut().set(key, value) {
			Ok(()) => true,
			Err(err) => {
				warn!("write of {key} dropped: {err}");
				false
			}
		}
	}

	/// Deletes `key`, logging failures.
	pub fn remove(&self, key: &str) {
		if let Err(err) = self.inner.borrow_mut().remove(key) {
			warn!("removal of {key} failed: {err}");
		}
	}

	/// Removes every key matching `pred`, returning how many were removed.
	pub fn remove_where(&self, pred: impl Fn(&str) -> bool) -> usize {
		let keys = match self.inner.borrow().keys() {
			Ok(keys) => keys,
			Err(err) => {
				warn!("key listing failed: {err}");
				return 0;
			}
		};
		let doomed: Vec<_> = keys.into_iter().filter(|k| pred(k)).collect();
		for key in &doomed {
			self.remove(key);
		}
		doomed.len()
	}

	/// Decodes a JSON record. Absent, unreadable and corrupt records all yield `None`.
	pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		let raw = self.get(key)?;
		match serde_json::from_str(&raw) {
			Ok(value) => Some(value),
			Err(source) => {
				let err = StorageError::Corrupt {
					key: key.into(),
					source,
				};
				warn!("ignoring {err}");
				None
			}
		}
	}

	/// Encodes `value` as JSON and writes it.
	pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
		match serde_json::to_string(value) {
			Ok(raw) => self.set(key, &raw),
			Err(err) => {
				warn!("could not encode {key}: {err}");
				false
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn is_tree_key(key: &str) -> bool {
		key.starts_with(keys::PHOTO_PREFIX)
			|| key.starts_with(keys::NAME_PREFIX)
			|| key.starts_with(keys::POS_PREFIX)
			|| key == keys::CONNECTIONS
	}

	#[test]
	fn quota_rejects_oversized_write_and_keeps_previous_value() {
		let mut store = MemoryStore::with_quota(16);
		store.set("name:a", "Ann").unwrap();
		let err = store.set("name:a", "a much longer name").unwrap_err();
		assert!(matches!(err, StorageError::QuotaExceeded { .. }));
		assert_eq!(store.get("name:a").unwrap().as_deref(), Some("Ann"));
	}

	#[test]
	fn handle_swallows_failures() {
		let handle = StoreHandle::new(MemoryStore::disabled());
		assert!(!handle.set("pos:a", "{}"));
		assert_eq!(handle.get("pos:a"), None);
		assert_eq!(handle.remove_where(is_tree_key), 0);
	}

	#[test]
	fn corrupt_json_reads_as_absent() {
		let handle = StoreHandle::new(MemoryStore::new());
		handle.set(keys::CONNECTIONS, "[{not json");
		assert_eq!(handle.load_json::<Vec<u8>>(keys::CONNECTIONS), None);
	}

	#[test]
	fn remove_where_only_touches_tree_keys() {
		let handle = StoreHandle::new(MemoryStore::new());
		for key in ["photo:a", "name:a", "pos:a", "connections", "theme"] {
			handle.set(key, "x");
		}
		assert_eq!(handle.remove_where(is_tree_key), 4);
		assert_eq!(handle.get("theme").as_deref(), Some("x"));
	}
}
