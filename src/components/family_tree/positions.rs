use std::collections::HashMap;

use log::warn;

use super::storage::{StoreHandle, keys};
use super::types::{NodeId, Position};

/// Per-card placement, written through to storage on every mutation.
///
/// Reads go to the in-memory cache first; a cache miss falls back to the
/// backend. A dropped write therefore still leaves the position correct for the
/// current session.
pub struct PositionStore {
	store: StoreHandle,
	cache: HashMap<NodeId, Position>,
}

impl PositionStore {
	/// An empty cache over `store`.
	pub fn new(store: StoreHandle) -> Self {
		Self {
			store,
			cache: HashMap::new(),
		}
	}

	/// `None` means the card uses its default placement.
	pub fn get(&mut self, id: &str) -> Option<Position> {
		if let Some(pos) = self.cache.get(id) {
			return Some(*pos);
		}
		let pos = self
			.store
			.load_json::<Position>(&keys::pos(id))
			.filter(Position::is_finite)?;
		self.cache.insert(id.into(), pos);
		Some(pos)
	}

	/// Stores an already clamped position. Non-finite coordinates are refused.
	pub fn set(&mut self, id: &str, pos: Position) {
		if !pos.is_finite() {
			warn!("refusing non-finite position for {id}: {pos:?}");
			return;
		}
		self.cache.insert(id.into(), pos);
		self.store.save_json(&keys::pos(id), &pos);
	}

	/// Reverts one card to its default placement.
	pub fn clear(&mut self, id: &str) {
		self.cache.remove(id);
		self.store.remove(&keys::pos(id));
	}

	/// Reverts every card to its default placement.
	pub fn clear_all(&mut self) {
		self.cache.clear();
		self.store
			.remove_where(|key| key.starts_with(keys::POS_PREFIX));
	}
}
