use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	Document, Element, FileReader, FocusEvent, HtmlCanvasElement, HtmlElement, HtmlImageElement,
	HtmlInputElement, KeyboardEvent, MouseEvent, Window,
};

use super::config::TreeConfig;
use super::geometry::{Curve, Point, Rect};
use super::lines::LinkSurface;
use super::render::CanvasOverlay;
use super::state::{FamilyTreeState, Mark, Outcome, PointerTarget, TreeEvent, TreeHost};
use super::storage::{BrowserStore, MemoryStore, StoreHandle};
use super::types::{FamilyData, Placement};

/// What the card list renders for one member.
#[derive(Clone, Debug, PartialEq)]
struct MemberView {
	id: String,
	name: String,
	photo: String,
	style: String,
	revision: u64,
}

fn placement_style(placement: Placement) -> String {
	match placement {
		Placement::At(pos) => format!("left: {}px; top: {}px;", pos.left, pos.top),
		Placement::Centered { top } => {
			format!("left: 50%; top: {top}px; transform: translateX(-50%);")
		}
	}
}

fn member_views(state: &mut FamilyTreeState, revision: u64) -> Vec<MemberView> {
	let ids: Vec<String> = state.roster().iter().map(|m| m.id.clone()).collect();
	ids.into_iter()
		.map(|id| MemberView {
			name: state.name(&id),
			photo: state.photo(&id),
			style: placement_style(state.placement(&id)),
			id,
			revision,
		})
		.collect()
}

fn rect(r: web_sys::DomRect) -> Rect {
	Rect::new(r.left(), r.top(), r.width(), r.height())
}

/// Live DOM host: cards are absolutely positioned children of `tree`.
struct DomHost {
	window: Window,
	document: Document,
	tree: HtmlElement,
	overlay: CanvasOverlay,
}

impl DomHost {
	fn card(&self, id: &str) -> Option<HtmlElement> {
		self.document
			.get_element_by_id(id)
			.and_then(|el| el.dyn_into::<HtmlElement>().ok())
	}
}

impl LinkSurface for DomHost {
	fn resize_overlay(&mut self, width: f64, height: f64) {
		self.overlay.resize_overlay(width, height);
	}

	fn clear_overlay(&mut self) {
		self.overlay.clear_overlay();
	}

	fn draw_curve(&mut self, curve: &Curve) {
		self.overlay.draw_curve(curve);
	}
}

impl TreeHost for DomHost {
	fn container(&self) -> Rect {
		rect(self.tree.get_bounding_client_rect())
	}

	fn node(&self, id: &str) -> Option<Rect> {
		self.document
			.get_element_by_id(id)
			.map(|el| rect(el.get_bounding_client_rect()))
	}

	fn place(&mut self, id: &str, placement: Placement) {
		let Some(card) = self.card(id) else {
			return;
		};
		let style = card.style();
		let (left, top, transform) = match placement {
			Placement::At(pos) => (format!("{}px", pos.left), format!("{}px", pos.top), ""),
			Placement::Centered { top } => ("50%".into(), format!("{top}px"), "translateX(-50%)"),
		};
		let _ = style.set_property("left", &left);
		let _ = style.set_property("top", &top);
		let _ = style.set_property("transform", transform);
	}

	fn confirm(&self, message: &str) -> bool {
		self.window.confirm_with_message(message).unwrap_or(false)
	}

	fn mark(&mut self, id: &str, mark: Mark, on: bool) {
		let class = match mark {
			Mark::Dragging => "dragging",
			Mark::PendingParent => "pending-parent",
		};
		if let Some(card) = self.card(id) {
			let _ = card.class_list().toggle_with_force(class, on);
		}
	}
}

/// Board state plus its host once the DOM is mounted.
#[derive(Clone)]
struct Board {
	state: Rc<RefCell<FamilyTreeState>>,
	host: Rc<RefCell<Option<DomHost>>>,
}

impl Board {
	fn dispatch(&self, event: TreeEvent) -> Outcome {
		let mut host = self.host.borrow_mut();
		let Some(host) = host.as_mut() else {
			return Outcome::Ignored;
		};
		self.state.borrow_mut().dispatch(event, host)
	}

	fn redraw(&self) {
		if let Some(host) = self.host.borrow_mut().as_mut() {
			self.state.borrow().redraw(host);
		}
	}

	fn is_linking(&self) -> bool {
		self.state.borrow().is_linking()
	}

	/// Rebuilds the card list, then redraws once the new cards are laid out.
	fn refresh_cards(&self, members: RwSignal<Vec<MemberView>>) {
		let revision = members.with_untracked(|m| m.first().map_or(0, |v| v.revision)) + 1;
		members.set(member_views(&mut self.state.borrow_mut(), revision));
		let board = self.clone();
		let redraw = Closure::once_into_js(move || board.redraw());
		if let Some(window) = web_sys::window() {
			let _ = window.request_animation_frame(redraw.unchecked_ref());
		}
	}
}

fn event_element(ev: &web_sys::Event) -> Option<Element> {
	ev.target()?.dyn_into::<Element>().ok()
}

fn card_of(el: &Element) -> Option<Element> {
	el.closest(".member").ok().flatten()
}

fn pointer_target(el: &Element) -> PointerTarget {
	match el.tag_name().as_str() {
		"IMG" => PointerTarget::Photo,
		"P" => PointerTarget::Name {
			editing: el
				.dyn_ref::<HtmlElement>()
				.is_some_and(HtmlElement::is_content_editable),
		},
		_ => PointerTarget::Card,
	}
}

fn start_name_edit(name: &HtmlElement) {
	if let Err(err) = name.set_attribute("contenteditable", "true") {
		debug!("could not make name editable: {err:?}");
		return;
	}
	if let Err(err) = name.focus() {
		debug!("could not focus name editor: {err:?}");
	}
	let Some(window) = web_sys::window() else {
		return;
	};
	let (Some(document), Ok(Some(selection))) = (window.document(), window.get_selection()) else {
		debug!("no selection to place the caret in");
		return;
	};
	let selected = document.create_range().and_then(|range| {
		range.select_node_contents(name)?;
		selection.remove_all_ranges()?;
		selection.add_range(&range)
	});
	if let Err(err) = selected {
		debug!("could not select name text: {err:?}");
	}
}

fn read_photo(board: Board, card: Element, input: HtmlInputElement) {
	let Some(file) = input.files().and_then(|files| files.get(0)) else {
		return;
	};
	let Ok(reader) = FileReader::new() else {
		return;
	};
	let id = card.id();
	let reader_done = reader.clone();
	let onload = Closure::once_into_js(move || {
		let Some(data_url) = reader_done.result().ok().and_then(|r| r.as_string()) else {
			return;
		};
		if data_url.is_empty() {
			return;
		}
		if let Ok(Some(img)) = card.query_selector("img") {
			if let Ok(img) = img.dyn_into::<HtmlImageElement>() {
				img.set_src(&data_url);
			}
		}
		board.dispatch(TreeEvent::PhotoLoaded { id, data_url });
	});
	reader.set_onload(Some(onload.unchecked_ref()));
	if let Err(err) = reader.read_as_data_url(&file) {
		warn!("could not read {}: {err:?}", file.name());
	}
	input.set_value("");
}

fn open_store() -> StoreHandle {
	match BrowserStore::local() {
		Ok(store) => StoreHandle::new(store),
		Err(err) => {
			warn!("{err}; changes will not survive a reload");
			StoreHandle::new(MemoryStore::new())
		}
	}
}

/// Family tree board: member cards over a connector canvas, with a toolbar.
///
/// Card positions, names, photos and connectors persist to `localStorage`,
/// falling back to session-only memory when it is unavailable.
#[component]
pub fn FamilyTreeBoard(
	/// Members shown on first load and restored by Reset-All.
	data: FamilyData,
	/// Presentation settings and prompt texts.
	#[prop(default = TreeConfig::default())]
	config: TreeConfig,
) -> impl IntoView {
	let tree_ref = NodeRef::<leptos::html::Div>::new();
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (link_color, link_width) = (config.link_color.clone(), config.link_width);

	let mut state = FamilyTreeState::new(&data, config, open_store());
	let members = RwSignal::new(member_views(&mut state, 0));
	let linking = RwSignal::new(false);
	let board = Board {
		state: Rc::new(RefCell::new(state)),
		host: Rc::new(RefCell::new(None)),
	};

	let move_cb: Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>> = Rc::new(RefCell::new(None));
	let up_cb: Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	let board_init = board.clone();
	Effect::new(move |_| {
		let (Some(tree), Some(canvas)) = (tree_ref.get(), canvas_ref.get()) else {
			return;
		};
		if board_init.host.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(overlay) = CanvasOverlay::new(canvas, &link_color, link_width) else {
			warn!("2d context unavailable; connectors will not be drawn");
			return;
		};
		let window: Window = web_sys::window().unwrap();
		let Some(document) = window.document() else {
			return;
		};
		let mut host = DomHost {
			window: window.clone(),
			document,
			tree: tree.into(),
			overlay,
		};
		board_init.state.borrow_mut().initialize(&mut host);
		*board_init.host.borrow_mut() = Some(host);

		let board_move = board_init.clone();
		*move_cb.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
			board_move.dispatch(TreeEvent::PointerMove {
				at: Point::new(ev.client_x() as f64, ev.client_y() as f64),
			});
		}));
		let board_up = board_init.clone();
		*up_cb.borrow_mut() = Some(Closure::new(move |_: MouseEvent| {
			board_up.dispatch(TreeEvent::PointerUp);
		}));
		let board_resize = board_init.clone();
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			board_resize.dispatch(TreeEvent::Resize);
		}));

		if let Some(ref cb) = *move_cb.borrow() {
			let _ = window.add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
		}
		if let Some(ref cb) = *up_cb.borrow() {
			let _ = window.add_event_listener_with_callback("mouseup", cb.as_ref().unchecked_ref());
		}
		if let Some(ref cb) = *resize_cb.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
	});

	let board_md = board.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(el) = event_element(&ev) else {
			return;
		};
		let Some(card) = card_of(&el) else {
			return;
		};
		let outcome = board_md.dispatch(TreeEvent::PointerDown {
			id: card.id(),
			target: pointer_target(&el),
			at: Point::new(ev.client_x() as f64, ev.client_y() as f64),
		});
		if outcome != Outcome::Ignored {
			ev.prevent_default();
		}
	};

	let board_click = board.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(el) = event_element(&ev) else {
			return;
		};
		let Some(card) = card_of(&el) else {
			return;
		};
		if board_click.is_linking() {
			board_click.dispatch(TreeEvent::Click { id: card.id() });
			return;
		}
		match pointer_target(&el) {
			PointerTarget::Photo => {
				if let Ok(Some(input)) = card.query_selector("input[type=file]") {
					if let Ok(input) = input.dyn_into::<HtmlInputElement>() {
						input.click();
					}
				}
			}
			PointerTarget::Name { editing: false } => {
				if let Ok(name) = el.dyn_into::<HtmlElement>() {
					start_name_edit(&name);
				}
			}
			_ => {}
		}
	};

	let board_change = board.clone();
	let on_change = move |ev: web_sys::Event| {
		let Some(el) = event_element(&ev) else {
			return;
		};
		let (Some(card), Ok(input)) = (card_of(&el), el.dyn_into::<HtmlInputElement>()) else {
			return;
		};
		read_photo(board_change.clone(), card, input);
	};

	let board_blur = board.clone();
	let on_focusout = move |ev: FocusEvent| {
		let Some(el) = event_element(&ev) else {
			return;
		};
		if el.tag_name() != "P" || !el.has_attribute("contenteditable") {
			return;
		}
		let Some(card) = card_of(&el) else {
			return;
		};
		let _ = el.remove_attribute("contenteditable");
		let id = card.id();
		board_blur.dispatch(TreeEvent::Rename {
			id: id.clone(),
			text: el.text_content().unwrap_or_default(),
		});
		let name = board_blur.state.borrow().name(&id);
		el.set_text_content(Some(&name));
	};

	let on_keydown = move |ev: KeyboardEvent| {
		if ev.key() != "Enter" {
			return;
		}
		let Some(el) = event_element(&ev) else {
			return;
		};
		if let Ok(name) = el.dyn_into::<HtmlElement>() {
			if name.is_content_editable() {
				ev.prevent_default();
				// focusout does the saving
				let _ = name.blur();
			}
		}
	};

	let board_reset = board.clone();
	let on_reset = move |_: MouseEvent| {
		if board_reset.dispatch(TreeEvent::ResetAll) == Outcome::RosterChanged {
			board_reset.refresh_cards(members);
		}
	};

	let board_add = board.clone();
	let on_add = move |_: MouseEvent| {
		if board_add.dispatch(TreeEvent::AddMember) == Outcome::RosterChanged {
			board_add.refresh_cards(members);
		}
	};

	let board_link = board.clone();
	let on_link = move |_: MouseEvent| {
		board_link.dispatch(TreeEvent::ToggleLinkMode);
		linking.set(board_link.is_linking());
		debug!("link mode toggled");
	};

	let board_clear = board.clone();
	let on_clear = move |_: MouseEvent| {
		board_clear.dispatch(TreeEvent::ClearLines);
	};

	view! {
		<div class="tree-container">
			<div
				class="toolbar"
				title=move || {
					if linking.get() {
						"Link Mode: click a parent, then a child to create a connector"
					} else {
						""
					}
				}
			>
				<button on:click=on_reset>"Reset All"</button>
				<button on:click=on_add>"Add New Member"</button>
				<button class:active=move || linking.get() on:click=on_link>
					{move || if linking.get() { "Link Mode (On)" } else { "Link Mode" }}
				</button>
				<button on:click=on_clear>"Clear Lines"</button>
			</div>
			<div
				node_ref=tree_ref
				class="tree"
				on:mousedown=on_mousedown
				on:click=on_click
				on:change=on_change
				on:focusout=on_focusout
				on:keydown=on_keydown
				style="position: relative;"
			>
				<canvas
					node_ref=canvas_ref
					class="link-layer"
					style="position: absolute; inset: 0; pointer-events: none;"
				/>
				<For
					each=move || members.get()
					key=|m| (m.id.clone(), m.revision)
					children=move |m| {
						view! {
							<div class="member" id=m.id style=m.style>
								<img
									src=m.photo
									alt="Family member photo"
									title="Click to upload photo"
									style="cursor: pointer;"
								/>
								<p title="Click to edit name" style="cursor: text;">
									{m.name}
								</p>
								<input type="file" accept="image/*" style="display: none;" />
							</div>
						}
					}
				/>
			</div>
		</div>
	}
}
