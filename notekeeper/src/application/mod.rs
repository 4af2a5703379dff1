// src/application/mod.rs
pub mod api;
pub mod guard;
pub mod router;
pub mod scope;
pub mod session;
pub mod views;

pub use api::{AuthApi, NotesApi};
pub use guard::{Decision, RouteGuard};
pub use router::{Navigation, Navigator, Route};
pub use scope::{ScopeHandle, ViewScope};
pub use session::{KeyValueStore, SessionStore};
