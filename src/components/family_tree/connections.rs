use log::{debug, info};

use super::storage::{StoreHandle, keys};
use super::types::Edge;

/// Ordered parent -> child edges, mirrored to storage as one snapshot.
///
/// This is an unconstrained directed multigraph: duplicates and cycles are
/// kept exactly as entered. Only self-loops are refused.
pub struct ConnectionGraph {
	store: StoreHandle,
	edges: Vec<Edge>,
}

impl ConnectionGraph {
	/// Loads the stored snapshot; a missing or corrupt record yields no edges.
	pub fn load(store: StoreHandle) -> Self {
		let edges: Vec<Edge> = store.load_json(keys::CONNECTIONS).unwrap_or_default();
		debug!("loaded {} connections", edges.len());
		Self { store, edges }
	}

	/// Appends `from -> to` and persists. Returns false for a self-loop.
	pub fn add_edge(&mut self, from_id: &str, to_id: &str) -> bool {
		if from_id == to_id {
			debug!("ignoring self-link on {from_id}");
			return false;
		}
		self.edges.push(Edge::new(from_id, to_id));
		self.persist();
		info!("linked {from_id} -> {to_id}");
		true
	}

	/// Drops every edge and persists the empty sequence.
	/// Destructive; callers confirm before invoking.
	pub fn clear(&mut self) {
		self.edges.clear();
		self.persist();
	}

	/// Forgets the in-memory edges and removes the stored record entirely.
	pub fn forget(&mut self) {
		self.edges.clear();
		self.store.remove(keys::CONNECTIONS);
	}

	/// Edges in insertion order.
	pub fn all(&self) -> &[Edge] {
		&self.edges
	}

	/// True when there is nothing to clear.
	pub fn is_empty(&self) -> bool {
		self.edges.is_empty()
	}

	fn persist(&self) {
		self.store.save_json(keys::CONNECTIONS, &self.edges);
	}
}
