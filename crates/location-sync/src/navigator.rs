//! Navigator trait abstraction for the client-side router.
//!
//! Implementations:
//! - `InMemoryRouter` - For testing and the demo binary
//! - Framework routers - Bridge their navigation events and commands

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use thiserror::Error;
use tracing::debug;

use crate::stream::Broadcaster;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No route matches: {0}")]
    UnknownRoute(String),

    #[error("Navigation rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, NavigationError>;

/// Navigation lifecycle events published by a router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    Start {
        id: u64,
        url: String,
    },
    /// Navigation completed; the router now shows `url_after_redirects`.
    End {
        id: u64,
        url: String,
        url_after_redirects: String,
    },
    Cancel {
        id: u64,
        url: String,
        reason: String,
    },
    Error {
        id: u64,
        url: String,
        error: String,
    },
}

impl NavigationEvent {
    pub fn id(&self) -> u64 {
        match self {
            Self::Start { id, .. }
            | Self::End { id, .. }
            | Self::Cancel { id, .. }
            | Self::Error { id, .. } => *id,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Self::End { .. })
    }

    /// Path the router settled on, for `End` events.
    pub fn into_completed_url(self) -> Option<String> {
        match self {
            Self::End {
                url_after_redirects,
                ..
            } => Some(url_after_redirects),
            _ => None,
        }
    }
}

/// The navigation subsystem as seen by the synchronizer.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Stream of lifecycle events emitted after this call.
    fn events(&self) -> BoxStream<'static, NavigationEvent>;

    /// Currently resolved path.
    fn path(&self) -> String;

    /// Navigate to `url`.
    ///
    /// Resolves to `Ok(true)` once the navigation completed, `Ok(false)` when
    /// it was cancelled before completing.
    async fn navigate_by_url(&self, url: &str) -> Result<bool>;
}

/// In-memory router for testing.
pub struct InMemoryRouter {
    path: RwLock<String>,
    /// Accepted paths. `None` accepts everything.
    routes: Option<HashSet<String>>,
    /// Paths whose navigation is cancelled, as a guard would.
    blocked: HashSet<String>,
    events: Broadcaster<NavigationEvent>,
    next_id: AtomicU64,
    /// Every `navigate_by_url` call, in order.
    navigations: Mutex<Vec<String>>,
}

impl InMemoryRouter {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            path: RwLock::new(initial_path.into()),
            routes: None,
            blocked: HashSet::new(),
            events: Broadcaster::new(),
            next_id: AtomicU64::new(1),
            navigations: Mutex::new(Vec::new()),
        }
    }

    /// Restrict navigation to the given paths.
    pub fn with_routes<I, P>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.routes = Some(routes.into_iter().map(Into::into).collect());
        self
    }

    /// Cancel navigations to the given paths.
    pub fn with_blocked<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.blocked = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Emit the boot navigation for the current path.
    pub fn initial_navigation(&self) {
        let url = self.path();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.events.send(&NavigationEvent::Start {
            id,
            url: url.clone(),
        });
        self.events.send(&NavigationEvent::End {
            id,
            url: url.clone(),
            url_after_redirects: url,
        });
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of live event subscribers.
    pub fn listener_count(&self) -> usize {
        self.events.receiver_count()
    }
}

#[async_trait]
impl Navigator for InMemoryRouter {
    fn events(&self) -> BoxStream<'static, NavigationEvent> {
        self.events.subscribe().boxed()
    }

    fn path(&self) -> String {
        self.path.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    async fn navigate_by_url(&self, url: &str) -> Result<bool> {
        self.navigations
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.events.send(&NavigationEvent::Start {
            id,
            url: url.to_string(),
        });

        if let Some(routes) = &self.routes {
            if !routes.contains(url) {
                let err = NavigationError::UnknownRoute(url.to_string());
                self.events.send(&NavigationEvent::Error {
                    id,
                    url: url.to_string(),
                    error: err.to_string(),
                });
                return Err(err);
            }
        }

        if self.blocked.contains(url) {
            debug!("Navigation to {} cancelled by guard", url);
            self.events.send(&NavigationEvent::Cancel {
                id,
                url: url.to_string(),
                reason: "blocked by guard".to_string(),
            });
            return Ok(false);
        }

        *self.path.write().unwrap_or_else(|e| e.into_inner()) = url.to_string();
        self.events.send(&NavigationEvent::End {
            id,
            url: url.to_string(),
            url_after_redirects: url.to_string(),
        });
        Ok(true)
    }
}
