use serde::Deserialize;

/// Presentation and prompt settings for a board.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
	/// Image shown on cards without an uploaded photo.
	pub placeholder_photo: String,
	/// Name used for unnamed cards and blank renames.
	pub default_name: String,
	/// Top offset of a freshly added member, which is centered horizontally.
	pub new_member_top: f64,
	/// CSS color of connector strokes.
	pub link_color: String,
	/// Connector stroke width in pixels.
	pub link_width: f64,
	/// Confirmation text for Reset-All.
	pub reset_prompt: String,
	/// Confirmation text for Clear-Lines.
	pub clear_lines_prompt: String,
}

impl Default for TreeConfig {
	fn default() -> Self {
		Self {
			placeholder_photo: "images/placeholder.png".into(),
			default_name: "Name".into(),
			new_member_top: 500.0,
			link_color: "#4a3c2a".into(),
			link_width: 2.0,
			reset_prompt: "Clear all photos, names, positions, and connectors?".into(),
			clear_lines_prompt: "Remove all family connectors?".into(),
		}
	}
}
