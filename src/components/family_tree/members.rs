use std::collections::HashMap;

use super::storage::{StoreHandle, keys};
use super::types::NodeId;

/// Display name and photo for each card.
///
/// Like `PositionStore`, edits land in a session cache before being written
/// through, so a dropped write still shows the edited value until reload.
pub struct ProfileStore {
	store: StoreHandle,
	default_name: String,
	names: HashMap<NodeId, String>,
	photos: HashMap<NodeId, String>,
}

impl ProfileStore {
	/// A profile store over `store`; blank renames fall back to `default_name`.
	pub fn new(store: StoreHandle, default_name: impl Into<String>) -> Self {
		Self {
			store,
			default_name: default_name.into(),
			names: HashMap::new(),
			photos: HashMap::new(),
		}
	}

	/// Last saved name, if the member was ever renamed.
	pub fn name(&self, id: &str) -> Option<String> {
		self.names
			.get(id)
			.cloned()
			.or_else(|| self.store.get(&keys::name(id)))
			.filter(|n| !n.is_empty())
	}

	/// Trims `raw`, falls back to the default name when nothing is left, and
	/// stores the result. Returns the name that should be displayed.
	pub fn rename(&mut self, id: &str, raw: &str) -> String {
		let cleaned = raw.trim();
		let name = if cleaned.is_empty() {
			self.default_name.clone()
		} else {
			cleaned.to_owned()
		};
		self.names.insert(id.into(), name.clone());
		self.store.set(&keys::name(id), &name);
		name
	}

	/// Last uploaded photo as a data URL.
	pub fn photo(&self, id: &str) -> Option<String> {
		self.photos
			.get(id)
			.cloned()
			.or_else(|| self.store.get(&keys::photo(id)))
			.filter(|p| !p.is_empty())
	}

	/// Stores a photo data URL. An empty upload is ignored.
	pub fn set_photo(&mut self, id: &str, data_url: &str) -> bool {
		if data_url.is_empty() {
			return false;
		}
		self.photos.insert(id.into(), data_url.to_owned());
		self.store.set(&keys::photo(id), data_url);
		true
	}

	/// Forgets every name and photo, in memory and in storage.
	pub fn clear_all(&mut self) {
		self.names.clear();
		self.photos.clear();
		self.store.remove_where(|key| {
			key.starts_with(keys::NAME_PREFIX) || key.starts_with(keys::PHOTO_PREFIX)
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::family_tree::storage::MemoryStore;

	fn profiles() -> (StoreHandle, ProfileStore) {
		let handle = StoreHandle::new(MemoryStore::new());
		(handle.clone(), ProfileStore::new(handle, "Name"))
	}

	#[test]
	fn rename_trims_and_defaults() {
		let (handle, mut profiles) = profiles();
		assert_eq!(profiles.rename("member1", "  Grandma Rose \n"), "Grandma Rose");
		assert_eq!(handle.get("name:member1").as_deref(), Some("Grandma Rose"));
		assert_eq!(profiles.rename("member1", "   "), "Name");
		assert_eq!(profiles.name("member1").as_deref(), Some("Name"));
	}

	#[test]
	fn empty_photo_is_a_no_op() {
		let (_, mut profiles) = profiles();
		assert!(profiles.set_photo("member1", "data:image/png;base64,AAAA"));
		assert!(!profiles.set_photo("member1", ""));
		assert_eq!(
			profiles.photo("member1").as_deref(),
			Some("data:image/png;base64,AAAA")
		);
	}

	#[test]
	fn reads_back_stored_profile_after_reload() {
		let (handle, mut profiles) = profiles();
		profiles.rename("member1", "Ann");
		profiles.set_photo("member1", "data:x");
		let reloaded = ProfileStore::new(handle, "Name");
		assert_eq!(reloaded.name("member1").as_deref(), Some("Ann"));
		assert_eq!(reloaded.photo("member1").as_deref(), Some("data:x"));
	}

	#[test]
	fn dropped_writes_keep_session_values() {
		let handle = StoreHandle::new(MemoryStore::disabled());
		let mut profiles = ProfileStore::new(handle, "Name");
		profiles.rename("member1", "Opa");
		assert!(profiles.set_photo("member1", "data:image/png;base64,AAAA"));
		assert_eq!(profiles.name("member1").as_deref(), Some("Opa"));
		assert_eq!(
			profiles.photo("member1").as_deref(),
			Some("data:image/png;base64,AAAA")
		);
	}

	#[test]
	fn clear_all_keeps_positions() {
		let (handle, mut profiles) = profiles();
		handle.set("pos:member1", r#"{"left":1.0,"top":2.0}"#);
		profiles.rename("member1", "Ann");
		profiles.set_photo("member1", "data:x");
		profiles.clear_all();
		assert_eq!(profiles.name("member1"), None);
		assert_eq!(profiles.photo("member1"), None);
		assert!(handle.get("pos:member1").is_some());
	}
}
