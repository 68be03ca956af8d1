use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::geometry::Curve;
use super::lines::LinkSurface;

/// Connector overlay backed by a 2D canvas stacked over the cards.
pub struct CanvasOverlay {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	color: String,
	line_width: f64,
}

impl CanvasOverlay {
	/// `None` if the canvas has no 2D context.
	pub fn new(canvas: HtmlCanvasElement, color: &str, line_width: f64) -> Option<Self> {
		let ctx = canvas
			.get_context("2d")
			.ok()
			.flatten()?
			.dyn_into::<CanvasRenderingContext2d>()
			.ok()?;
		Some(Self {
			canvas,
			ctx,
			color: color.to_owned(),
			line_width,
		})
	}
}

impl LinkSurface for CanvasOverlay {
	fn resize_overlay(&mut self, width: f64, height: f64) {
		let (w, h) = (width.max(0.0) as u32, height.max(0.0) as u32);
		if self.canvas.width() != w || self.canvas.height() != h {
			self.canvas.set_width(w);
			self.canvas.set_height(h);
		}
	}

	fn clear_overlay(&mut self) {
		let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
		self.ctx.clear_rect(0.0, 0.0, w, h);
	}

	fn draw_curve(&mut self, curve: &Curve) {
		// Resizing the canvas resets context state, so style is set per stroke.
		self.ctx.set_stroke_style_str(&self.color);
		self.ctx.set_line_width(self.line_width);
		self.ctx.set_line_cap("round");
		self.ctx.begin_path();
		self.ctx.move_to(curve.from.x, curve.from.y);
		self.ctx.bezier_curve_to(
			curve.ctrl1.x,
			curve.ctrl1.y,
			curve.ctrl2.x,
			curve.ctrl2.y,
			curve.to.x,
			curve.to.y,
		);
		self.ctx.stroke();
	}
}
