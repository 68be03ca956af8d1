use family_tree_board::components::family_tree::{
	Edge, FamilyData, FamilyTreeState, LinkState, MemberSeed, MemoryStore, Outcome, Placement,
	Point, PointerTarget, Position, Rect, SceneHost, StoreHandle, TreeConfig, TreeEvent,
};
use pretty_assertions::assert_eq;

fn family(ids: &[&str]) -> FamilyData {
	FamilyData {
		members: ids
			.iter()
			.enumerate()
			.map(|(i, id)| MemberSeed {
				id: (*id).into(),
				name: None,
				placement: Placement::At(Position::new(150.0 * i as f64, 100.0 * i as f64)),
			})
			.collect(),
	}
}

fn open(store: &StoreHandle, ids: &[&str]) -> (FamilyTreeState, SceneHost) {
	let mut state = FamilyTreeState::new(&family(ids), TreeConfig::default(), store.clone());
	let mut host = SceneHost::new(Rect::new(0.0, 0.0, 800.0, 600.0), 100.0, 100.0);
	state.initialize(&mut host);
	(state, host)
}

fn link(state: &mut FamilyTreeState, host: &mut SceneHost, parent: &str, child: &str) {
	state.dispatch(TreeEvent::Click { id: parent.into() }, host);
	state.dispatch(TreeEvent::Click { id: child.into() }, host);
}

#[test]
fn edges_round_trip_through_the_connections_key() {
	let store = StoreHandle::new(MemoryStore::new());
	let (mut state, mut host) = open(&store, &["A", "B"]);
	state.dispatch(TreeEvent::ToggleLinkMode, &mut host);
	link(&mut state, &mut host, "A", "B");

	assert_eq!(state.connections(), &[Edge::new("A", "B")]);
	let stored: Vec<Edge> =
		serde_json::from_str(&store.get("connections").unwrap()).unwrap();
	assert_eq!(stored, vec![Edge::new("A", "B")]);

	assert_eq!(state.dispatch(TreeEvent::ClearLines, &mut host), Outcome::Updated);
	assert!(state.connections().is_empty());
	let stored: Vec<Edge> =
		serde_json::from_str(&store.get("connections").unwrap()).unwrap();
	assert!(stored.is_empty());
}

#[test]
fn far_drag_clamps_to_container() {
	let store = StoreHandle::new(MemoryStore::new());
	let (mut state, mut host) = open(&store, &["A"]);
	state.dispatch(
		TreeEvent::PointerDown {
			id: "A".into(),
			target: PointerTarget::Card,
			at: Point::new(0.0, 0.0),
		},
		&mut host,
	);
	state.dispatch(
		TreeEvent::PointerMove {
			at: Point::new(1_000_000.0, 1_000_000.0),
		},
		&mut host,
	);
	state.dispatch(TreeEvent::PointerUp, &mut host);

	assert_eq!(host.position("A"), Some(Position::new(700.0, 500.0)));
	let stored: Position = serde_json::from_str(&store.get("pos:A").unwrap()).unwrap();
	assert_eq!(stored, Position::new(700.0, 500.0));
}

#[test]
fn self_click_keeps_pending_parent() {
	let store = StoreHandle::new(MemoryStore::new());
	let (mut state, mut host) = open(&store, &["A", "B"]);
	state.dispatch(TreeEvent::ToggleLinkMode, &mut host);
	state.dispatch(TreeEvent::Click { id: "A".into() }, &mut host);
	let repeat = state.dispatch(TreeEvent::Click { id: "A".into() }, &mut host);

	assert_eq!(repeat, Outcome::Ignored);
	assert!(state.connections().is_empty());
	assert_eq!(
		state.link(),
		&LinkState::AwaitingChild {
			parent: "A".into()
		}
	);

	state.dispatch(TreeEvent::Click { id: "B".into() }, &mut host);
	assert_eq!(state.connections(), &[Edge::new("A", "B")]);
	assert_eq!(state.link(), &LinkState::AwaitingParent);
}

#[test]
fn removed_child_is_skipped_when_drawing() {
	let store = StoreHandle::new(MemoryStore::new());
	let (mut state, mut host) = open(&store, &["A", "B", "C"]);
	state.dispatch(TreeEvent::ToggleLinkMode, &mut host);
	link(&mut state, &mut host, "A", "B");
	link(&mut state, &mut host, "A", "C");
	assert_eq!(host.curves().len(), 2);

	host.remove_card("B");
	state.dispatch(TreeEvent::Resize, &mut host);
	assert_eq!(host.curves().len(), 1);
	assert_eq!(host.curves()[0].to, Point::new(350.0, 200.0));
	assert_eq!(state.connections().len(), 2);
}

#[test]
fn redraw_is_idempotent() {
	let store = StoreHandle::new(MemoryStore::new());
	let (mut state, mut host) = open(&store, &["A", "B"]);
	state.dispatch(TreeEvent::ToggleLinkMode, &mut host);
	link(&mut state, &mut host, "A", "B");
	link(&mut state, &mut host, "A", "B");

	state.redraw(&mut host);
	let first = host.curves().to_vec();
	state.redraw(&mut host);
	assert_eq!(host.curves(), first.as_slice());
	assert_eq!(first.len(), 2);
}

#[test]
fn reload_restores_positions_names_and_duplicate_edges() {
	let store = StoreHandle::new(MemoryStore::new());
	{
		let (mut state, mut host) = open(&store, &["A", "B"]);
		state.dispatch(
			TreeEvent::PointerDown {
				id: "B".into(),
				target: PointerTarget::Card,
				at: Point::new(0.0, 0.0),
			},
			&mut host,
		);
		state.dispatch(
			TreeEvent::PointerMove {
				at: Point::new(100.0, 50.0),
			},
			&mut host,
		);
		state.dispatch(TreeEvent::PointerUp, &mut host);
		state.dispatch(
			TreeEvent::Rename {
				id: "A".into(),
				text: "Oma".into(),
			},
			&mut host,
		);
		state.dispatch(TreeEvent::ToggleLinkMode, &mut host);
		link(&mut state, &mut host, "A", "B");
		link(&mut state, &mut host, "A", "B");
	}

	let (state, host) = open(&store, &["A", "B"]);
	assert_eq!(host.position("B"), Some(Position::new(250.0, 150.0)));
	assert_eq!(state.name("A"), "Oma");
	assert_eq!(
		state.connections(),
		&[Edge::new("A", "B"), Edge::new("A", "B")]
	);
	assert_eq!(host.curves().len(), 2);
}

#[test]
fn reset_all_wipes_storage_and_added_members() {
	let store = StoreHandle::new(MemoryStore::new());
	store.set("theme", "dark");
	let (mut state, mut host) = open(&store, &["A", "B"]);
	state.dispatch(TreeEvent::AddMember, &mut host);
	state.dispatch(
		TreeEvent::PhotoLoaded {
			id: "A".into(),
			data_url: "data:image/png;base64,AAAA".into(),
		},
		&mut host,
	);
	state.dispatch(TreeEvent::ToggleLinkMode, &mut host);
	link(&mut state, &mut host, "A", "member3");

	host.answer_prompts(false);
	assert_eq!(state.dispatch(TreeEvent::ResetAll, &mut host), Outcome::Ignored);
	assert_eq!(state.roster().len(), 3);

	host.answer_prompts(true);
	assert_eq!(state.dispatch(TreeEvent::ResetAll, &mut host), Outcome::RosterChanged);
	assert_eq!(state.roster().len(), 2);
	assert!(state.connections().is_empty());
	assert!(host.curves().is_empty());
	assert_eq!(state.photo("A"), "images/placeholder.png");
	assert_eq!(store.get("photo:A"), None);
	assert_eq!(store.get("connections"), None);
	assert_eq!(store.get("theme").as_deref(), Some("dark"));
	assert_eq!(
		host.prompts(),
		vec![TreeConfig::default().reset_prompt; 2]
	);
}

#[test]
fn storage_failure_degrades_to_session_only() {
	let store = StoreHandle::new(MemoryStore::with_quota(64));
	let (mut state, mut host) = open(&store, &["A", "B"]);
	let photo = format!("data:image/png;base64,{}", "A".repeat(256));
	state.dispatch(
		TreeEvent::PhotoLoaded {
			id: "A".into(),
			data_url: photo,
		},
		&mut host,
	);
	assert_eq!(store.get("photo:A"), None);

	state.dispatch(TreeEvent::ToggleLinkMode, &mut host);
	link(&mut state, &mut host, "A", "B");
	assert_eq!(state.connections(), &[Edge::new("A", "B")]);
	assert_eq!(host.curves().len(), 1);
}

#[test]
fn profile_edits_survive_dropped_writes() {
	let store = StoreHandle::new(MemoryStore::disabled());
	let (mut state, mut host) = open(&store, &["A"]);
	state.dispatch(
		TreeEvent::Rename {
			id: "A".into(),
			text: " Opa ".into(),
		},
		&mut host,
	);
	assert_eq!(state.name("A"), "Opa");

	let store = StoreHandle::new(MemoryStore::with_quota(64));
	let (mut state, mut host) = open(&store, &["A"]);
	let photo = format!("data:image/png;base64,{}", "A".repeat(256));
	let outcome = state.dispatch(
		TreeEvent::PhotoLoaded {
			id: "A".into(),
			data_url: photo.clone(),
		},
		&mut host,
	);
	assert_eq!(outcome, Outcome::Updated);
	assert_eq!(store.get("photo:A"), None);
	assert_eq!(state.photo("A"), photo);
}
