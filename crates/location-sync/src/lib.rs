//! location-sync: Keeps a client-side router and an application state store
//! in agreement about the current location.
//!
//! This crate provides:
//! - The synchronization protocol (echo suppression, startup arbitration)
//! - `Navigator` and `Store` trait abstractions for the two collaborators
//! - In-memory collaborators for testing and demos
//! - An event bus reporting every synchronizer decision

pub mod actions;
pub mod events;
pub mod navigator;
pub mod router_listener;
pub mod state;
pub mod store;
pub mod store_listener;
pub mod stream;
pub mod synchronizer;

pub use actions::{RouterAction, RouterLocation, UPDATE_LOCATION};
pub use events::{EventBus, LocationEvent, Subscription};
pub use navigator::{InMemoryRouter, NavigationError, NavigationEvent, Navigator};
pub use router_listener::RouterDecision;
pub use state::{SyncPhase, SyncState};
pub use store::{InMemoryStore, LocationSelector, Store};
pub use store_listener::StoreDecision;
pub use synchronizer::{LocationSynchronizer, RenderRefresh, SyncError, SyncOptions};
