//! Anchor points and clamping over viewport-space bounding boxes.

use super::types::Position;

/// A point in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
}

impl Point {
	/// A point at `x`, `y`.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Axis-aligned bounding box, as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	/// Left edge.
	pub left: f64,
	/// Top edge.
	pub top: f64,
	/// Horizontal extent.
	pub width: f64,
	/// Vertical extent.
	pub height: f64,
}

impl Rect {
	/// A box with its top-left corner at `left`, `top`.
	pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
		Self {
			left,
			top,
			width,
			height,
		}
	}

	/// Corner of `self` relative to the origin of `container`.
	pub fn offset_in(&self, container: &Rect) -> Position {
		Position::new(self.left - container.left, self.top - container.top)
	}
}

/// Bottom-center of `node`, relative to `container`.
pub fn anchor_bottom(node: &Rect, container: &Rect) -> Point {
	Point::new(
		node.left - container.left + node.width / 2.0,
		node.top - container.top + node.height,
	)
}

/// Top-center of `node`, relative to `container`.
pub fn anchor_top(node: &Rect, container: &Rect) -> Point {
	Point::new(
		node.left - container.left + node.width / 2.0,
		node.top - container.top,
	)
}

/// Keeps a card of `node` size fully inside `container`.
///
/// When the card is larger than the container the far bound collapses onto 0,
/// so the result is never negative.
pub fn clamp_position(pos: Position, node: &Rect, container: &Rect) -> Position {
	let max_left = (container.width - node.width).max(0.0);
	let max_top = (container.height - node.height).max(0.0);
	Position::new(pos.left.clamp(0.0, max_left), pos.top.clamp(0.0, max_top))
}

/// Cubic connector from a parent's bottom anchor to a child's top anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curve {
	/// Start, on the parent.
	pub from: Point,
	/// First control point.
	pub ctrl1: Point,
	/// Second control point.
	pub ctrl2: Point,
	/// End, on the child.
	pub to: Point,
}

impl Curve {
	/// S-curve whose control points are pulled half the horizontal distance
	/// toward each other.
	pub fn link(a: Point, b: Point) -> Self {
		let dx = (b.x - a.x) / 2.0;
		Self {
			from: a,
			ctrl1: Point::new(a.x + dx, a.y),
			ctrl2: Point::new(b.x - dx, b.y),
			to: b,
		}
	}

	/// The curve as SVG path data.
	pub fn path_data(&self) -> String {
		format!(
			"M {} {} C {} {}, {} {}, {} {}",
			self.from.x,
			self.from.y,
			self.ctrl1.x,
			self.ctrl1.y,
			self.ctrl2.x,
			self.ctrl2.y,
			self.to.x,
			self.to.y
		)
	}
}
