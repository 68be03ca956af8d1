use leptos::prelude::*;
use log::warn;

use crate::components::family_tree::{
	FamilyData, FamilyTreeBoard, MemberSeed, Placement, Position, TreeConfig,
};

/// Element holding optional JSON overrides for [`TreeConfig`].
const CONFIG_ELEMENT_ID: &str = "family-tree-config";

/// The starting roster: two grandparents, two parents and two children.
fn seed_family() -> FamilyData {
	let seeds = [
		("member1", "Grandpa", 160.0, 40.0),
		("member2", "Grandma", 460.0, 40.0),
		("member3", "Father", 160.0, 220.0),
		("member4", "Mother", 460.0, 220.0),
		("member5", "Son", 220.0, 400.0),
		("member6", "Daughter", 400.0, 400.0),
	];
	let members = seeds
		.into_iter()
		.map(|(id, name, left, top)| MemberSeed {
			id: id.into(),
			name: Some(name.into()),
			placement: Placement::At(Position::new(left, top)),
		})
		.collect();
	FamilyData { members }
}

fn page_config() -> TreeConfig {
	let raw = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
		.and_then(|el| el.text_content());
	let Some(raw) = raw else {
		return TreeConfig::default();
	};
	serde_json::from_str(&raw).unwrap_or_else(|err| {
		warn!("ignoring malformed #{CONFIG_ELEMENT_ID}: {err}");
		TreeConfig::default()
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="family-tree-page">
				<h1>"Family Tree"</h1>
				<p class="subtitle">
					"Click a photo to upload, click a name to edit, drag cards to arrange them."
				</p>
				<FamilyTreeBoard data=seed_family() config=page_config() />
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn seed_ids_are_unique() {
		let data = seed_family();
		let mut ids: Vec<_> = data.members.iter().map(|m| m.id.as_str()).collect();
		ids.sort_unstable();
		ids.dedup();
		assert_eq!(ids.len(), data.members.len());
	}
}
