//! Event infrastructure for location-sync.
//!
//! Provides `LocationEvent` for debug/monitoring and `EventBus` for subscriptions.
//! Every listener decision taken by a live session is published here.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

use serde::Serialize;

/// Decisions taken by the synchronizer, for real-time monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LocationEvent {
    /// Router moved; the store was sent `UPDATE_LOCATION`.
    StoreUpdated { location: String },
    /// Router completion caused by a store-originated navigation.
    RouterEchoSuppressed { location: String },
    /// First router location already matched the store. Nothing dispatched.
    InitialLocationAgreed { location: String },
    /// Store emitted before the router reported its first location.
    StoreChangeDeferred { location: String },
    /// Store emission matched the last accepted location.
    StoreEchoSuppressed { location: String },
    /// Store moved on its own; the router was told to follow.
    NavigationRequested { location: String },
    /// A requested navigation resolved.
    NavigationSettled {
        location: String,
        /// `false` when the router cancelled the navigation.
        navigated: bool,
    },
    NavigationFailed { location: String, error: String },
}

impl LocationEvent {
    pub fn location(&self) -> &str {
        match self {
            Self::StoreUpdated { location }
            | Self::RouterEchoSuppressed { location }
            | Self::InitialLocationAgreed { location }
            | Self::StoreChangeDeferred { location }
            | Self::StoreEchoSuppressed { location }
            | Self::NavigationRequested { location }
            | Self::NavigationSettled { location, .. }
            | Self::NavigationFailed { location, .. } => location,
        }
    }
}

/// Subscription handle that unsubscribes automatically when dropped.
///
/// Follows the disposer pattern: hold this value to keep receiving events,
/// drop it (or let it go out of scope) to unsubscribe.
pub struct Subscription {
    bus: Weak<EventBus>,
    id: usize,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

type Callback = Arc<dyn Fn(LocationEvent) + Send + Sync>;

/// Event bus for publishing location events to subscribers.
///
/// Thread-safe for use in multi-threaded Tokio runtime.
/// Wrap in `Arc` to enable subscriptions.
pub struct EventBus {
    callbacks: RwLock<Vec<(usize, Callback)>>,
    next_id: AtomicUsize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self {
            callbacks: RwLock::new(Vec::new()),
            next_id: AtomicUsize::new(0),
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events. Returns `Subscription` that unsubscribes on drop.
    ///
    /// Requires `self` to be wrapped in `Arc`.
    pub fn subscribe(
        self: &Arc<Self>,
        callback: impl Fn(LocationEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.callbacks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, Arc::new(callback)));
        Subscription {
            bus: Arc::downgrade(self),
            id,
        }
    }

    fn unsubscribe(&self, id: usize) {
        self.callbacks
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .retain(|(i, _)| *i != id);
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: LocationEvent) {
        // Clone the list so a callback may subscribe without deadlocking.
        let callbacks: Vec<_> = self
            .callbacks
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();

        for callback in callbacks {
            callback(event.clone());
        }
    }
}
