// src/application/router.rs
use crate::application::guard::{Decision, RouteGuard};
use std::fmt;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Signup,
    NewNote,
    EditNote(String),
}

impl Route {
    /// Parse a route path. The root path is not a route; see [`Navigator`].
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        match path {
            "/home" => Some(Route::Home),
            "/login" => Some(Route::Login),
            "/signup" => Some(Route::Signup),
            "/new-note" => Some(Route::NewNote),
            _ => path
                .strip_prefix("/edit-note/")
                .filter(|id| !id.is_empty() && !id.contains('/'))
                .map(|id| Route::EditNote(id.to_string())),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/home".to_string(),
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::NewNote => "/new-note".to_string(),
            Route::EditNote(id) => format!("/edit-note/{id}"),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Home | Route::NewNote | Route::EditNote(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Enter(Route),
    /// The guard refused `from` and sent the user to `to`.
    Redirect { from: Route, to: Route },
    NotFound(String),
}

/// Resolves paths to routes and applies the root redirect and the guard.
#[derive(Debug, Clone)]
pub struct Navigator {
    guard: RouteGuard,
}

impl Navigator {
    pub fn new(guard: RouteGuard) -> Self {
        Self { guard }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn navigate(&self, path: &str) -> Navigation {
        let path = path.trim();
        let route = if path.is_empty() || path == "/" {
            debug!("Root path, redirecting to home");
            Route::Home
        } else {
            match Route::parse(path) {
                Some(route) => route,
                None => return Navigation::NotFound(path.to_string()),
            }
        };
        self.enter(route)
    }

    pub fn enter(&self, route: Route) -> Navigation {
        match self.guard.check(&route) {
            Decision::Allow => Navigation::Enter(route),
            Decision::Redirect(to) => Navigation::Redirect { from: route, to },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::SessionStore;
    use crate::infrastructure::MemoryStore;
    use std::sync::Arc;

    fn navigator(logged_in: bool) -> Navigator {
        let session = SessionStore::new(Arc::new(MemoryStore::new()));
        if logged_in {
            session.login("token").expect("Login should succeed");
        }
        Navigator::new(RouteGuard::new(session))
    }

    #[test]
    fn given_known_paths_when_parsing_then_returns_routes() {
        assert_eq!(Route::parse("/home"), Some(Route::Home));
        assert_eq!(Route::parse("/login"), Some(Route::Login));
        assert_eq!(Route::parse("/signup/"), Some(Route::Signup));
        assert_eq!(Route::parse("/new-note"), Some(Route::NewNote));
        assert_eq!(
            Route::parse("/edit-note/42"),
            Some(Route::EditNote("42".to_string()))
        );
    }

    #[test]
    fn given_bad_edit_paths_when_parsing_then_returns_none() {
        assert_eq!(Route::parse("/edit-note/"), None);
        assert_eq!(Route::parse("/edit-note/1/2"), None);
        assert_eq!(Route::parse("/settings"), None);
    }

    #[test]
    fn given_route_when_formatting_path_then_round_trips() {
        let route = Route::EditNote("abc".to_string());
        assert_eq!(Route::parse(&route.path()), Some(route));
    }

    #[test]
    fn given_root_path_when_logged_in_then_enters_home() {
        let nav = navigator(true);
        assert_eq!(nav.navigate(""), Navigation::Enter(Route::Home));
        assert_eq!(nav.navigate("/"), Navigation::Enter(Route::Home));
    }

    #[test]
    fn given_root_path_when_logged_out_then_redirects_home_to_login() {
        let nav = navigator(false);
        assert_eq!(
            nav.navigate("/"),
            Navigation::Redirect {
                from: Route::Home,
                to: Route::Login
            }
        );
    }

    #[test]
    fn given_public_path_when_logged_out_then_enters() {
        let nav = navigator(false);
        assert_eq!(nav.navigate("/signup"), Navigation::Enter(Route::Signup));
    }

    #[test]
    fn given_unknown_path_when_navigating_then_not_found() {
        let nav = navigator(true);
        assert_eq!(
            nav.navigate("/nowhere"),
            Navigation::NotFound("/nowhere".to_string())
        );
    }
}
