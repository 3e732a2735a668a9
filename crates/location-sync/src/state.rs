//! Session state shared by the router and store listeners.
//!
//! One `SyncState` exists per live session. It is owned by the session's
//! dispatch loop and mutated only through the listener transitions in
//! `router_listener` and `store_listener`.

/// Where a live session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No router location seen yet; store changes are deferred.
    AwaitingInitialLocation,
    /// Both sides have a baseline.
    Steady {
        /// A store-originated navigation is in flight.
        time_travelling: bool,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    /// Last location accepted by either listener.
    pub current_location: Option<String>,
    /// First location the router reported this session. Set once.
    pub initial_location: Option<String>,
    /// Set while a store-triggered navigation awaits its completion echo.
    pub is_time_travelling: bool,
    /// Last location the router reported, echoes included.
    pub last_router_location: Option<String>,
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SyncPhase {
        match self.initial_location {
            None => SyncPhase::AwaitingInitialLocation,
            Some(_) => SyncPhase::Steady {
                time_travelling: self.is_time_travelling,
            },
        }
    }

    /// Apply the `initial_location` fallback to a raw store location.
    pub(crate) fn with_initial_fallback(&self, location_in_store: Option<String>) -> Option<String> {
        location_in_store.or_else(|| self.initial_location.clone())
    }
}
