//! Draggable member cards joined by parent -> child connectors.
//!
//! [`FamilyTreeBoard`] is the Leptos view. Everything below it is plain Rust
//! driven through [`FamilyTreeState::dispatch`], so the same state machine runs
//! against the DOM or against a [`SceneHost`].

mod component;
mod config;
mod connections;
mod geometry;
mod lines;
mod members;
mod positions;
mod render;
mod scene;
mod state;
mod storage;
mod types;

pub use component::FamilyTreeBoard;
pub use config::TreeConfig;
pub use connections::ConnectionGraph;
pub use geometry::{Curve, Point, Rect, anchor_bottom, anchor_top, clamp_position};
pub use lines::{LinkSurface, paint, route_links};
pub use members::ProfileStore;
pub use positions::PositionStore;
pub use scene::SceneHost;
pub use state::{FamilyTreeState, LinkState, Mark, Outcome, PointerTarget, TreeEvent, TreeHost};
pub use storage::{BrowserStore, KeyValueStore, MemoryStore, StorageError, StoreHandle};
pub use types::{Edge, FamilyData, MemberSeed, NodeId, Placement, Position};
