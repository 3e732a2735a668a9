//! Store side of the protocol: reacting to a new store location, and to the
//! completion of the navigation that reaction requested.

use crate::navigator::NavigationError;
use crate::state::SyncState;

/// Outcome of one store location emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreDecision {
    /// The router has not reported a baseline yet.
    AwaitingInitialLocation,
    /// The store agrees with the last accepted location, usually because it
    /// is recording our own dispatch.
    InSync,
    /// The store moved on its own; the router must follow.
    Navigate(String),
}

impl SyncState {
    /// Handle a location emitted by the store.
    ///
    /// `location_in_store` reads the store's raw current location.
    pub fn on_store_location<F>(&mut self, location: &str, location_in_store: F) -> StoreDecision
    where
        F: FnOnce() -> Option<String>,
    {
        if self.initial_location.is_none() {
            return StoreDecision::AwaitingInitialLocation;
        }

        let stored = self.with_initial_fallback(location_in_store());
        if self.current_location == stored {
            return StoreDecision::InSync;
        }

        self.is_time_travelling = true;
        self.current_location = Some(location.to_string());
        StoreDecision::Navigate(location.to_string())
    }

    /// Handle the result of the navigation to `target` requested by
    /// [`StoreDecision::Navigate`].
    ///
    /// Returns whether the render pipeline should be refreshed.
    pub fn on_navigation_settled(
        &mut self,
        target: &str,
        result: &Result<bool, NavigationError>,
    ) -> bool {
        match result {
            Ok(true) => {
                // The router was already at `target`, so its deduplicated
                // location sequence emits nothing. Otherwise the completion
                // echo clears the flag.
                if self.last_router_location.as_deref() == Some(target)
                    && self.current_location.as_deref() == Some(target)
                {
                    self.is_time_travelling = false;
                }
                true
            }
            // No completion echo will follow.
            Ok(false) => {
                self.is_time_travelling = false;
                true
            }
            Err(_) => {
                self.is_time_travelling = false;
                false
            }
        }
    }
}
