//! Store trait abstraction for the application state store.
//!
//! Implementations:
//! - `InMemoryStore` - Reducer-driven store for testing and the demo binary
//! - Application stores - Bridge their state snapshots and dispatch

use std::sync::{Arc, Mutex, RwLock};

use futures::stream::{self, BoxStream, StreamExt};

use crate::actions::{RouterAction, json_router_reducer};
use crate::stream::Broadcaster;

/// Projection from a state snapshot to the location it records.
pub type LocationSelector<St> = Arc<dyn Fn(&St) -> Option<String> + Send + Sync>;

/// Reducer applied by [`InMemoryStore`] on dispatch.
pub type Reducer<St> = Box<dyn Fn(&St, &RouterAction) -> St + Send + Sync>;

/// The state store as seen by the synchronizer.
pub trait Store: Send + Sync {
    type State: Send + 'static;

    /// Snapshot of the full current state.
    fn state(&self) -> Self::State;

    /// Stream of state snapshots, starting with the current one.
    fn subscribe(&self) -> BoxStream<'static, Self::State>;

    fn dispatch(&self, action: RouterAction);
}

/// Read the store's current location through `select`.
///
/// An empty location counts as no location.
pub fn location_from_store<St: Send + 'static>(
    store: &dyn Store<State = St>,
    select: &LocationSelector<St>,
) -> Option<String> {
    select(&store.state()).filter(|location| !location.is_empty())
}

/// In-memory store for testing.
pub struct InMemoryStore<St> {
    state: RwLock<St>,
    reducer: Reducer<St>,
    updates: Broadcaster<St>,
    /// Every action dispatched, in order.
    dispatched: Mutex<Vec<RouterAction>>,
}

impl<St: Clone> InMemoryStore<St> {
    pub fn new(
        initial: St,
        reducer: impl Fn(&St, &RouterAction) -> St + Send + Sync + 'static,
    ) -> Self {
        Self {
            state: RwLock::new(initial),
            reducer: Box::new(reducer),
            updates: Broadcaster::new(),
            dispatched: Mutex::new(Vec::new()),
        }
    }

    /// Overwrite the whole state without an action, as a devtools replay or
    /// undo would.
    pub fn replace_state(&self, state: St) {
        let mut current = self.state.write().unwrap_or_else(|e| e.into_inner());
        *current = state;
        self.updates.send(&current);
    }

    pub fn dispatched(&self) -> Vec<RouterAction> {
        self.dispatched
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of live state subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.updates.receiver_count()
    }
}

impl InMemoryStore<serde_json::Value> {
    /// JSON document store keeping the location in its `router` field.
    pub fn json(initial: serde_json::Value) -> Self {
        Self::new(initial, json_router_reducer)
    }
}

impl<St> Store for InMemoryStore<St>
where
    St: Clone + Send + Sync + 'static,
{
    type State = St;

    fn state(&self) -> St {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn subscribe(&self) -> BoxStream<'static, St> {
        // Subscribe before reading so no update falls between the two.
        let updates = self.updates.subscribe();
        let current = self.state();
        stream::once(async move { current }).chain(updates).boxed()
    }

    fn dispatch(&self, action: RouterAction) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        *state = (self.reducer)(&*state, &action);
        self.dispatched
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(action);
        self.updates.send(&state);
    }
}
