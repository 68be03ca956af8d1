use serde::{Deserialize, Serialize};

/// Identifier of a member card. Stable for the page's lifetime.
pub type NodeId = String;

/// Container-relative placement of a card's top-left corner, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// Distance from the container's left edge.
	pub left: f64,
	/// Distance from the container's top edge.
	pub top: f64,
}

impl Position {
	/// A position at `left`, `top`.
	pub fn new(left: f64, top: f64) -> Self {
		Self { left, top }
	}

	/// False if either coordinate is NaN or infinite.
	pub fn is_finite(&self) -> bool {
		self.left.is_finite() && self.top.is_finite()
	}
}

/// Directed parent -> child connector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
	/// Parent card.
	pub from_id: NodeId,
	/// Child card.
	pub to_id: NodeId,
}

impl Edge {
	/// An edge from `from_id` down to `to_id`.
	pub fn new(from_id: impl Into<NodeId>, to_id: impl Into<NodeId>) -> Self {
		Self {
			from_id: from_id.into(),
			to_id: to_id.into(),
		}
	}
}

/// Where a card sits when it has no stored position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
	/// Explicit container-relative corner.
	At(Position),
	/// Horizontally centered in the container at the given top offset.
	Centered {
		/// Distance from the container's top edge.
		top: f64,
	},
}

/// A member known before anything was loaded from storage.
#[derive(Clone, Debug)]
pub struct MemberSeed {
	/// Card id, also the storage key suffix.
	pub id: NodeId,
	/// Name shown until the user renames the card.
	pub name: Option<String>,
	/// Where the card sits until it is dragged.
	pub placement: Placement,
}

/// Initial roster handed to the board.
#[derive(Clone, Debug, Default)]
pub struct FamilyData {
	/// Members in display order.
	pub members: Vec<MemberSeed>,
}
