//! Router side of the protocol: reacting to a new router location.

use crate::actions::RouterAction;
use crate::state::SyncState;

/// Outcome of one router location emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterDecision {
    /// Completion of a navigation the store side requested. Ignored.
    Echo,
    /// First location of the session, and the store already records it.
    InitialAgreement,
    /// The store must be told about the new location.
    Dispatch(RouterAction),
}

impl SyncState {
    /// Handle a location reported by the router.
    ///
    /// `location_in_store` reads the store's raw location; it is only called
    /// for the first location of the session.
    pub fn on_router_location<F>(&mut self, location: &str, location_in_store: F) -> RouterDecision
    where
        F: FnOnce() -> Option<String>,
    {
        self.last_router_location = Some(location.to_string());

        if self.is_time_travelling {
            // Navigation promise resolves before the router emits its change.
            self.is_time_travelling = false;
            return RouterDecision::Echo;
        }

        self.current_location = Some(location.to_string());

        if self.initial_location.is_none() {
            self.initial_location = Some(location.to_string());

            let stored = self.with_initial_fallback(location_in_store());
            if stored.as_deref() == Some(location) {
                return RouterDecision::InitialAgreement;
            }
        }

        RouterDecision::Dispatch(RouterAction::update_location(location))
    }
}
