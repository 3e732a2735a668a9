//! LocationSynchronizer: binds a router and a state store together.
//!
//! A session runs both listeners in one task:
//!
//! 1. Router location → `on_router_location` → maybe `UPDATE_LOCATION` to the store
//! 2. Store location → `on_store_location` → maybe `navigate_by_url` on the router
//! 3. Navigation settled → `on_navigation_settled` → maybe refresh the render pipeline
//!
//! Events from all three sources are handled one at a time, so the session's
//! `SyncState` needs no locking. The echo each side's reaction produces on
//! the other side is recognised through that state and dropped.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::{BoxStream, FuturesUnordered, StreamExt};
use futures::{FutureExt, future};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::actions::RouterLocation;
use crate::events::{EventBus, LocationEvent};
use crate::navigator::{NavigationError, Navigator};
use crate::router_listener::RouterDecision;
use crate::state::SyncState;
use crate::store::{LocationSelector, Store, location_from_store};
use crate::store_listener::StoreDecision;
use crate::stream::{distinct_until_changed, url_state};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("Location sync already initialized; call destroy before initializing again")]
    AlreadyInitialized,

    #[error("Location sync must be initialized inside a Tokio runtime")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, SyncError>;

/// Forces the UI to re-render after a store-originated navigation.
pub trait RenderRefresh: Send + Sync {
    fn tick(&self);
}

impl<F> RenderRefresh for F
where
    F: Fn() + Send + Sync,
{
    fn tick(&self) {
        self()
    }
}

/// Options for [`LocationSynchronizer::initialize`].
pub struct SyncOptions<St> {
    select_location: LocationSelector<St>,
    url_state: Option<BoxStream<'static, String>>,
}

impl<St> SyncOptions<St> {
    /// Read the location from wherever the state keeps it.
    pub fn with_selector(select: impl Fn(&St) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            select_location: Arc::new(select),
            url_state: None,
        }
    }

    /// Use a custom router location sequence instead of the navigator's
    /// completed navigations.
    pub fn with_url_state(mut self, url_state: BoxStream<'static, String>) -> Self {
        self.url_state = Some(url_state);
        self
    }
}

impl<St: RouterLocation + 'static> Default for SyncOptions<St> {
    fn default() -> Self {
        Self::with_selector(|state: &St| state.router_location())
    }
}

/// A live session. Dropping it stops both listeners.
struct SyncSession {
    task: JoinHandle<()>,
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Keeps the router's location and the store's recorded location in step.
pub struct LocationSynchronizer<St> {
    navigator: Arc<dyn Navigator>,
    store: Arc<dyn Store<State = St>>,
    refresh: Arc<dyn RenderRefresh>,
    events: Arc<EventBus>,
    session: Option<SyncSession>,
}

impl<St: Send + 'static> LocationSynchronizer<St> {
    pub fn new<N, S, R>(navigator: Arc<N>, store: Arc<S>, refresh: Arc<R>) -> Self
    where
        N: Navigator + 'static,
        S: Store<State = St> + 'static,
        R: RenderRefresh + 'static,
    {
        Self {
            navigator,
            store,
            refresh,
            events: Arc::new(EventBus::new()),
            session: None,
        }
    }

    /// Bus publishing every decision of the live session.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    /// Start synchronizing.
    ///
    /// Both collaborators are subscribed before this returns, so nothing they
    /// emit afterwards is missed. Fails if a session is already live; the live
    /// session is left untouched.
    pub fn initialize(&mut self, options: SyncOptions<St>) -> Result<()> {
        if self.session.is_some() {
            return Err(SyncError::AlreadyInitialized);
        }
        let runtime = Handle::try_current().map_err(|_| SyncError::NoRuntime)?;

        let SyncOptions {
            select_location,
            url_state: custom_url_state,
        } = options;

        // Custom sequences get the same deduplication as the default one.
        let router_locations = distinct_until_changed(
            custom_url_state.unwrap_or_else(|| url_state(self.navigator.as_ref())),
        )
        .fuse()
        .boxed();

        let select = Arc::clone(&select_location);
        let store_locations = distinct_until_changed(
            self.store
                .subscribe()
                .map(move |state| select(&state).filter(|location| !location.is_empty())),
        )
        .filter_map(future::ready)
        .fuse()
        .boxed();

        let session = Session {
            navigator: Arc::clone(&self.navigator),
            store: Arc::clone(&self.store),
            refresh: Arc::clone(&self.refresh),
            events: Arc::clone(&self.events),
            select_location,
            state: SyncState::new(),
            in_flight: FuturesUnordered::new(),
        };

        let task = runtime.spawn(session.run(router_locations, store_locations));
        self.session = Some(SyncSession { task });
        info!("Location sync initialized");
        Ok(())
    }

    /// Stop synchronizing. Safe to call when not initialized.
    ///
    /// The next `initialize` starts from a fresh `SyncState`.
    pub fn destroy(&mut self) {
        if self.session.take().is_some() {
            info!("Location sync destroyed");
        }
    }
}

type NavigationFuture = BoxFuture<'static, (String, std::result::Result<bool, NavigationError>)>;

/// State and collaborators owned by a session's task.
struct Session<St> {
    navigator: Arc<dyn Navigator>,
    store: Arc<dyn Store<State = St>>,
    refresh: Arc<dyn RenderRefresh>,
    events: Arc<EventBus>,
    select_location: LocationSelector<St>,
    state: SyncState,
    /// Store-originated navigations awaiting completion.
    in_flight: FuturesUnordered<NavigationFuture>,
}

impl<St: Send + 'static> Session<St> {
    async fn run(
        mut self,
        mut router_locations: BoxStream<'static, String>,
        mut store_locations: BoxStream<'static, String>,
    ) {
        loop {
            tokio::select! {
                biased;

                Some(location) = router_locations.next() => {
                    self.on_router_location(location);
                }

                Some((location, result)) = self.in_flight.next() => {
                    self.on_navigation_settled(location, result);
                }

                Some(location) = store_locations.next() => {
                    self.on_store_location(location);
                }

                else => break,
            }
        }

        debug!("Location sync sources closed");
    }

    fn on_router_location(&mut self, location: String) {
        let decision = self.state.on_router_location(&location, || {
            location_from_store(self.store.as_ref(), &self.select_location)
        });

        match decision {
            RouterDecision::Echo => {
                debug!("Skipping router location {} (navigation echo)", location);
                self.events.emit(LocationEvent::RouterEchoSuppressed { location });
            }
            RouterDecision::InitialAgreement => {
                debug!("Router and store agree on initial location {}", location);
                self.events.emit(LocationEvent::InitialLocationAgreed { location });
            }
            RouterDecision::Dispatch(action) => {
                info!("Router moved to {}, updating store", location);
                self.store.dispatch(action);
                self.events.emit(LocationEvent::StoreUpdated { location });
            }
        }
    }

    fn on_store_location(&mut self, location: String) {
        let decision = self.state.on_store_location(&location, || {
            location_from_store(self.store.as_ref(), &self.select_location)
        });

        match decision {
            StoreDecision::AwaitingInitialLocation => {
                debug!("Deferring store location {} until the router reports", location);
                self.events.emit(LocationEvent::StoreChangeDeferred { location });
            }
            StoreDecision::InSync => {
                debug!("Skipping store location {} (already current)", location);
                self.events.emit(LocationEvent::StoreEchoSuppressed { location });
            }
            StoreDecision::Navigate(target) => {
                info!("Store moved to {}, navigating router", target);
                let navigator = Arc::clone(&self.navigator);
                let url = target.clone();
                self.in_flight.push(
                    async move {
                        let result = navigator.navigate_by_url(&url).await;
                        (url, result)
                    }
                    .boxed(),
                );
                self.events
                    .emit(LocationEvent::NavigationRequested { location: target });
            }
        }
    }

    fn on_navigation_settled(
        &mut self,
        location: String,
        result: std::result::Result<bool, NavigationError>,
    ) {
        let refresh = self.state.on_navigation_settled(&location, &result);
        if refresh {
            self.refresh.tick();
        }

        match result {
            Ok(navigated) => {
                if !navigated {
                    debug!("Navigation to {} was cancelled", location);
                }
                self.events.emit(LocationEvent::NavigationSettled {
                    location,
                    navigated,
                });
            }
            Err(e) => {
                warn!("Navigation to {} failed: {}", location, e);
                self.events.emit(LocationEvent::NavigationFailed {
                    location,
                    error: e.to_string(),
                });
            }
        }
    }
}
