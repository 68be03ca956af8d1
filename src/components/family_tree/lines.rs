//! Connector routing and painting.
//!
//! Edges whose endpoints cannot be resolved to a live card are skipped without
//! error: the stored graph may legitimately reference cards that no longer
//! exist, and those edges simply have no curve.

use super::geometry::{Curve, Rect, anchor_bottom, anchor_top};
use super::types::Edge;

/// Overlay that connector curves are painted onto.
pub trait LinkSurface {
	/// Sets the overlay's coordinate space to `width` x `height` pixels.
	fn resize_overlay(&mut self, width: f64, height: f64);
	/// Discards every previously painted curve.
	fn clear_overlay(&mut self);
	/// Strokes one connector.
	fn draw_curve(&mut self, curve: &Curve);
}

/// One curve per resolvable edge, in edge order.
pub fn route_links<F>(container: &Rect, edges: &[Edge], resolve: F) -> Vec<Curve>
where
	F: Fn(&str) -> Option<Rect>,
{
	edges
		.iter()
		.filter_map(|edge| {
			let from = resolve(&edge.from_id)?;
			let to = resolve(&edge.to_id)?;
			Some(Curve::link(
				anchor_bottom(&from, container),
				anchor_top(&to, container),
			))
		})
		.collect()
}

/// Full redraw: resize to the container, wipe, then paint every curve.
pub fn paint<S: LinkSurface + ?Sized>(surface: &mut S, container: &Rect, curves: &[Curve]) {
	surface.resize_overlay(container.width, container.height);
	surface.clear_overlay();
	for curve in curves {
		surface.draw_curve(curve);
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::components::family_tree::geometry::Point;
	use pretty_assertions::assert_eq;

	#[derive(Default)]
	struct Recorder {
		size: (f64, f64),
		curves: Vec<Curve>,
	}

	impl LinkSurface for Recorder {
		fn resize_overlay(&mut self, width: f64, height: f64) {
			self.size = (width, height);
		}

		fn clear_overlay(&mut self) {
			self.curves.clear();
		}

		fn draw_curve(&mut self, curve: &Curve) {
			self.curves.push(*curve);
		}
	}

	fn cards() -> HashMap<&'static str, Rect> {
		HashMap::from([
			("a", Rect::new(100.0, 50.0, 100.0, 100.0)),
			("b", Rect::new(300.0, 300.0, 100.0, 100.0)),
		])
	}

	#[test]
	fn routes_parent_bottom_to_child_top() {
		let container = Rect::new(0.0, 0.0, 800.0, 600.0);
		let cards = cards();
		let edges = [Edge::new("a", "b")];
		let curves = route_links(&container, &edges, |id| cards.get(id).copied());
		assert_eq!(
			curves,
			vec![Curve::link(Point::new(150.0, 150.0), Point::new(350.0, 300.0))]
		);
	}

	#[test]
	fn dangling_edges_are_skipped() {
		let container = Rect::new(0.0, 0.0, 800.0, 600.0);
		let cards = cards();
		let edges = [
			Edge::new("a", "gone"),
			Edge::new("gone", "b"),
			Edge::new("b", "a"),
		];
		let curves = route_links(&container, &edges, |id| cards.get(id).copied());
		assert_eq!(curves.len(), 1);
		assert_eq!(curves[0].from, Point::new(350.0, 400.0));
	}

	#[test]
	fn repaint_is_idempotent() {
		let container = Rect::new(0.0, 0.0, 640.0, 480.0);
		let cards = cards();
		let edges = [Edge::new("a", "b"), Edge::new("a", "b")];
		let curves = route_links(&container, &edges, |id| cards.get(id).copied());
		let mut surface = Recorder::default();
		paint(&mut surface, &container, &curves);
		let first = surface.curves.clone();
		paint(&mut surface, &container, &curves);
		assert_eq!(surface.curves, first);
		assert_eq!(surface.curves.len(), 2);
		assert_eq!(surface.size, (640.0, 480.0));
	}
}
