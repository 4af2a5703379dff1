// src/application/guard.rs
use crate::application::router::Route;
use crate::application::SessionStore;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Route),
}

/// Authorization check consulted before a protected view is constructed.
/// Holds no state of its own.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    session: SessionStore,
}

impl RouteGuard {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub fn can_activate(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn check(&self, route: &Route) -> Decision {
        if !route.is_protected() || self.can_activate() {
            return Decision::Allow;
        }
        debug!(path = %route.path(), "Guard denied navigation");
        Decision::Redirect(Route::Login)
    }
}
