//! Headless [`TreeHost`] that keeps card boxes and painted curves in memory.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use super::geometry::{Curve, Rect};
use super::lines::LinkSurface;
use super::state::{Mark, TreeHost};
use super::types::{NodeId, Placement, Position};

/// In-memory cards, overlay and prompt log.
pub struct SceneHost {
	container: Rect,
	card_width: f64,
	card_height: f64,
	cards: BTreeMap<NodeId, Rect>,
	marks: HashSet<(NodeId, Mark)>,
	overlay: (f64, f64),
	curves: Vec<Curve>,
	answer: bool,
	prompts: RefCell<Vec<String>>,
}

impl SceneHost {
	/// A scene whose cards are created at `card_width` x `card_height` when
	/// first placed. Confirmation prompts are approved until told otherwise.
	pub fn new(container: Rect, card_width: f64, card_height: f64) -> Self {
		Self {
			container,
			card_width,
			card_height,
			cards: BTreeMap::new(),
			marks: HashSet::new(),
			overlay: (0.0, 0.0),
			curves: Vec::new(),
			answer: true,
			prompts: RefCell::new(Vec::new()),
		}
	}

	/// Takes a card off the scene, as if its element was deleted.
	pub fn remove_card(&mut self, id: &str) -> Option<Rect> {
		self.cards.remove(id)
	}

	/// Card corner relative to the container.
	pub fn position(&self, id: &str) -> Option<Position> {
		self.cards.get(id).map(|r| r.offset_in(&self.container))
	}

	/// Changes the container size, keeping its origin.
	pub fn resize_container(&mut self, width: f64, height: f64) {
		self.container.width = width;
		self.container.height = height;
	}

	/// Answer given to every later confirmation prompt.
	pub fn answer_prompts(&mut self, answer: bool) {
		self.answer = answer;
	}

	/// Every prompt shown so far, oldest first.
	pub fn prompts(&self) -> Vec<String> {
		self.prompts.borrow().clone()
	}

	/// Curves painted since the last clear.
	pub fn curves(&self) -> &[Curve] {
		&self.curves
	}

	/// Overlay size set by the last redraw.
	pub fn overlay_size(&self) -> (f64, f64) {
		self.overlay
	}

	/// Whether `mark` is currently on for `id`.
	pub fn is_marked(&self, id: &str, mark: Mark) -> bool {
		self.marks.contains(&(id.to_owned(), mark))
	}
}

impl LinkSurface for SceneHost {
	fn resize_overlay(&mut self, width: f64, height: f64) {
		self.overlay = (width, height);
	}

	fn clear_overlay(&mut self) {
		self.curves.clear();
	}

	fn draw_curve(&mut self, curve: &Curve) {
		self.curves.push(*curve);
	}
}

impl TreeHost for SceneHost {
	fn container(&self) -> Rect {
		self.container
	}

	fn node(&self, id: &str) -> Option<Rect> {
		self.cards.get(id).copied()
	}

	fn place(&mut self, id: &str, placement: Placement) {
		let (width, height) = self
			.cards
			.get(id)
			.map(|r| (r.width, r.height))
			.unwrap_or((self.card_width, self.card_height));
		let (left, top) = match placement {
			Placement::At(pos) => (pos.left, pos.top),
			Placement::Centered { top } => ((self.container.width - width) / 2.0, top),
		};
		self.cards.insert(
			id.into(),
			Rect::new(
				self.container.left + left,
				self.container.top + top,
				width,
				height,
			),
		);
	}

	fn confirm(&self, message: &str) -> bool {
		self.prompts.borrow_mut().push(message.into());
		self.answer
	}

	fn mark(&mut self, id: &str, mark: Mark, on: bool) {
		if on {
			self.marks.insert((id.into(), mark));
		} else {
			self.marks.remove(&(id.to_owned(), mark));
		}
	}
}
