use log::{debug, info};

use super::config::TreeConfig;
use super::connections::ConnectionGraph;
use super::geometry::{Point, Rect, clamp_position};
use super::lines::{LinkSurface, paint, route_links};
use super::members::ProfileStore;
use super::positions::PositionStore;
use super::storage::StoreHandle;
use super::types::{Edge, FamilyData, MemberSeed, NodeId, Placement, Position};

/// Rendering surface and layout oracle the board runs against.
///
/// All rectangles are in viewport coordinates. The DOM implementation reads
/// live bounding boxes; `SceneHost` keeps them in memory.
pub trait TreeHost: LinkSurface {
	/// Current box of the container cards are positioned in.
	fn container(&self) -> Rect;
	/// Current box of a card, or `None` if no such card is on screen.
	fn node(&self, id: &str) -> Option<Rect>;
	/// Moves a card to `placement`; a no-op for unknown cards.
	fn place(&mut self, id: &str, placement: Placement);
	/// Asks the user to approve a destructive action.
	fn confirm(&self, message: &str) -> bool;
	/// Toggles a transient visual state on a card.
	fn mark(&mut self, _id: &str, _mark: Mark, _on: bool) {}
}

/// Transient visual state of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mark {
	/// The card follows the pointer.
	Dragging,
	/// The card was picked as parent and waits for a child click.
	PendingParent,
}

/// Which part of a card the pointer went down on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerTarget {
	/// Card body.
	Card,
	/// Photo, which opens the file picker on click.
	Photo,
	/// Name label.
	Name {
		/// The label is currently being edited.
		editing: bool,
	},
}

/// Input delivered to [`FamilyTreeState::dispatch`]. Points are in viewport
/// coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum TreeEvent {
	/// Pointer pressed on a card.
	PointerDown {
		/// Card under the pointer.
		id: NodeId,
		/// Part of the card that was hit.
		target: PointerTarget,
		/// Pointer location.
		at: Point,
	},
	/// Pointer moved anywhere on the page.
	PointerMove {
		/// Pointer location.
		at: Point,
	},
	/// Pointer released anywhere on the page.
	PointerUp,
	/// Card clicked; only meaningful in link mode.
	Click {
		/// Clicked card.
		id: NodeId,
	},
	/// Name label edit committed.
	Rename {
		/// Renamed card.
		id: NodeId,
		/// Raw label text, trimmed before saving.
		text: String,
	},
	/// Photo upload finished reading.
	PhotoLoaded {
		/// Card the photo belongs to.
		id: NodeId,
		/// Image as a data URL; empty means nothing was picked.
		data_url: String,
	},
	/// Link-mode toolbar switch.
	ToggleLinkMode,
	/// Clear-Lines toolbar action; asks for confirmation.
	ClearLines,
	/// Reset-All toolbar action; asks for confirmation.
	ResetAll,
	/// Add-Member toolbar action.
	AddMember,
	/// The container changed size.
	Resize,
}

/// What a dispatched event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
	/// No state changed.
	Ignored,
	/// State or drawing changed; the card list is unchanged.
	Updated,
	/// Cards were added or removed; the view must rebuild its card list.
	RosterChanged,
}

#[derive(Clone, Debug)]
struct DragState {
	node: NodeId,
	start: Point,
	origin: Position,
	current: Position,
}

/// Link-mode selection state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LinkState {
	/// Clicks keep their default meaning.
	#[default]
	Inactive,
	/// Next card click picks the parent.
	AwaitingParent,
	/// Next click on another card creates the edge.
	AwaitingChild {
		/// Parent picked by the previous click.
		parent: NodeId,
	},
}

/// Owns every piece of mutable board state.
pub struct FamilyTreeState {
	/// Presentation settings and prompts.
	pub config: TreeConfig,
	seeds: Vec<MemberSeed>,
	roster: Vec<MemberSeed>,
	positions: PositionStore,
	connections: ConnectionGraph,
	profiles: ProfileStore,
	drag: Option<DragState>,
	link: LinkState,
}

impl FamilyTreeState {
	/// Builds the board over `data`, loading connections from `store`.
	pub fn new(data: &FamilyData, config: TreeConfig, store: StoreHandle) -> Self {
		Self {
			seeds: data.members.clone(),
			roster: data.members.clone(),
			positions: PositionStore::new(store.clone()),
			connections: ConnectionGraph::load(store.clone()),
			profiles: ProfileStore::new(store, config.default_name.clone()),
			config,
			drag: None,
			link: LinkState::Inactive,
		}
	}

	/// Places every card from storage (or its default) and draws connectors.
	pub fn initialize(&mut self, host: &mut impl TreeHost) {
		let ids: Vec<NodeId> = self.roster.iter().map(|m| m.id.clone()).collect();
		for id in &ids {
			let placement = self.placement(id);
			host.place(id, placement);
		}
		self.redraw(host);
		info!(
			"family tree ready: {} members, {} connections",
			self.roster.len(),
			self.connections.all().len()
		);
	}

	/// Current members, seeds first, then added members in order.
	pub fn roster(&self) -> &[MemberSeed] {
		&self.roster
	}

	/// Edges in insertion order.
	pub fn connections(&self) -> &[Edge] {
		self.connections.all()
	}

	/// Link-mode state.
	pub fn link(&self) -> &LinkState {
		&self.link
	}

	/// True while link mode is on.
	pub fn is_linking(&self) -> bool {
		self.link != LinkState::Inactive
	}

	/// Card currently being dragged.
	pub fn dragging(&self) -> Option<&str> {
		self.drag.as_ref().map(|d| d.node.as_str())
	}

	/// Stored position if any, else the member's default.
	pub fn placement(&mut self, id: &str) -> Placement {
		if let Some(pos) = self.positions.get(id) {
			return Placement::At(pos);
		}
		self.roster
			.iter()
			.find(|m| m.id == id)
			.map(|m| m.placement)
			.unwrap_or(Placement::Centered {
				top: self.config.new_member_top,
			})
	}

	/// Saved name, else the seed name, else the default.
	pub fn name(&self, id: &str) -> String {
		self.profiles
			.name(id)
			.or_else(|| {
				self.roster
					.iter()
					.find(|m| m.id == id)
					.and_then(|m| m.name.clone())
			})
			.unwrap_or_else(|| self.config.default_name.clone())
	}

	/// Saved photo data URL, else the placeholder.
	pub fn photo(&self, id: &str) -> String {
		self.profiles
			.photo(id)
			.unwrap_or_else(|| self.config.placeholder_photo.clone())
	}

	/// Runs one event through the drag and link machines.
	pub fn dispatch(&mut self, event: TreeEvent, host: &mut impl TreeHost) -> Outcome {
		match event {
			TreeEvent::PointerDown { id, target, at } => self.pointer_down(&id, target, at, host),
			TreeEvent::PointerMove { at } => self.pointer_move(at, host),
			TreeEvent::PointerUp => self.pointer_up(host),
			TreeEvent::Click { id } => self.click(&id, host),
			TreeEvent::Rename { id, text } => {
				self.profiles.rename(&id, &text);
				self.redraw(host);
				Outcome::Updated
			}
			TreeEvent::PhotoLoaded { id, data_url } => {
				if !self.profiles.set_photo(&id, &data_url) {
					return Outcome::Ignored;
				}
				self.redraw(host);
				Outcome::Updated
			}
			TreeEvent::ToggleLinkMode => self.toggle_link_mode(host),
			TreeEvent::ClearLines => self.clear_lines(host),
			TreeEvent::ResetAll => self.reset_all(host),
			TreeEvent::AddMember => self.add_member(host),
			TreeEvent::Resize => {
				self.redraw(host);
				Outcome::Updated
			}
		}
	}

	/// Recomputes every connector from current card boxes.
	pub fn redraw(&self, host: &mut impl TreeHost) {
		let container = host.container();
		let curves = route_links(&container, self.connections.all(), |id| host.node(id));
		paint(host, &container, &curves);
	}

	fn pointer_down(
		&mut self,
		id: &str,
		target: PointerTarget,
		at: Point,
		host: &mut impl TreeHost,
	) -> Outcome {
		if matches!(
			target,
			PointerTarget::Photo | PointerTarget::Name { editing: true }
		) || self.drag.is_some()
		{
			return Outcome::Ignored;
		}
		let Some(rect) = host.node(id) else {
			return Outcome::Ignored;
		};
		let container = host.container();
		let origin = clamp_position(rect.offset_in(&container), &rect, &container);
		self.drag = Some(DragState {
			node: id.into(),
			start: at,
			origin,
			current: origin,
		});
		host.mark(id, Mark::Dragging, true);
		debug!("drag start {id} at {origin:?}");
		Outcome::Updated
	}

	fn pointer_move(&mut self, at: Point, host: &mut impl TreeHost) -> Outcome {
		let Some(drag) = self.drag.as_mut() else {
			return Outcome::Ignored;
		};
		let Some(rect) = host.node(&drag.node) else {
			return Outcome::Ignored;
		};
		let container = host.container();
		let moved = Position::new(
			drag.origin.left + (at.x - drag.start.x),
			drag.origin.top + (at.y - drag.start.y),
		);
		drag.current = clamp_position(moved, &rect, &container);
		let (id, pos) = (drag.node.clone(), drag.current);
		host.place(&id, Placement::At(pos));
		self.redraw(host);
		Outcome::Updated
	}

	fn pointer_up(&mut self, host: &mut impl TreeHost) -> Outcome {
		let Some(drag) = self.drag.take() else {
			return Outcome::Ignored;
		};
		host.place(&drag.node, Placement::At(drag.current));
		host.mark(&drag.node, Mark::Dragging, false);
		self.positions.set(&drag.node, drag.current);
		debug!("drag end {} at {:?}", drag.node, drag.current);
		Outcome::Updated
	}

	fn click(&mut self, id: &str, host: &mut impl TreeHost) -> Outcome {
		match std::mem::take(&mut self.link) {
			LinkState::Inactive => Outcome::Ignored,
			LinkState::AwaitingParent => {
				host.mark(id, Mark::PendingParent, true);
				self.link = LinkState::AwaitingChild { parent: id.into() };
				Outcome::Updated
			}
			LinkState::AwaitingChild { parent } => {
				if !self.connections.add_edge(&parent, id) {
					self.link = LinkState::AwaitingChild { parent };
					return Outcome::Ignored;
				}
				host.mark(&parent, Mark::PendingParent, false);
				self.link = LinkState::AwaitingParent;
				self.redraw(host);
				Outcome::Updated
			}
		}
	}

	fn toggle_link_mode(&mut self, host: &mut impl TreeHost) -> Outcome {
		self.link = match std::mem::take(&mut self.link) {
			LinkState::Inactive => LinkState::AwaitingParent,
			LinkState::AwaitingChild { parent } => {
				host.mark(&parent, Mark::PendingParent, false);
				LinkState::Inactive
			}
			LinkState::AwaitingParent => LinkState::Inactive,
		};
		debug!("link mode {}", if self.is_linking() { "on" } else { "off" });
		Outcome::Updated
	}

	fn clear_lines(&mut self, host: &mut impl TreeHost) -> Outcome {
		if self.connections.is_empty() || !host.confirm(&self.config.clear_lines_prompt) {
			return Outcome::Ignored;
		}
		self.connections.clear();
		self.redraw(host);
		info!("connections cleared");
		Outcome::Updated
	}

	fn reset_all(&mut self, host: &mut impl TreeHost) -> Outcome {
		if !host.confirm(&self.config.reset_prompt) {
			return Outcome::Ignored;
		}
		if let Some(drag) = self.drag.take() {
			host.mark(&drag.node, Mark::Dragging, false);
		}
		if let LinkState::AwaitingChild { parent } = &self.link {
			host.mark(parent, Mark::PendingParent, false);
			self.link = LinkState::AwaitingParent;
		}
		self.positions.clear_all();
		self.profiles.clear_all();
		self.connections.forget();
		self.roster = self.seeds.clone();
		for seed in &self.roster {
			host.place(&seed.id, seed.placement);
		}
		self.redraw(host);
		info!("board reset to {} members", self.roster.len());
		Outcome::RosterChanged
	}

	fn add_member(&mut self, host: &mut impl TreeHost) -> Outcome {
		let mut n = self.roster.len() + 1;
		while self.roster.iter().any(|m| m.id == format!("member{n}")) {
			n += 1;
		}
		let id = format!("member{n}");
		self.roster.push(MemberSeed {
			id: id.clone(),
			name: None,
			placement: Placement::Centered {
				top: self.config.new_member_top,
			},
		});
		let placement = self.placement(&id);
		host.place(&id, placement);
		self.redraw(host);
		info!("added {id}");
		Outcome::RosterChanged
	}
}
