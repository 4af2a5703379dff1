// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::env;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{AuthApi, NotesApi};
use crate::domain::{
    AuthResponse, ClientError, Credentials, Note, NoteDraft, NotePatch, Role, SignupRequest,
    TokenClaims, User,
};

/// Operations of [`MockApi`] that can be configured to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    List,
    Get,
    Create,
    Update,
    Delete,
    Login,
    Signup,
    Verify,
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    Status(u16),
    Network,
}

#[derive(Default)]
struct MockState {
    notes: BTreeMap<String, Note>,
    accounts: HashMap<(String, String), String>,
    failures: HashMap<MockOp, Failure>,
    calls: Vec<String>,
    next_id: u64,
}

/// Shared in-memory stand-in for the remote API.
///
/// Clones share state, so a test can keep one handle and inspect the
/// calls a view made through another.
///
/// # Examples
///
/// ```
/// use notekeeper::util::testing::{sample_note, MockApi, MockOp};
///
/// let api = MockApi::builder()
///     .with_note(sample_note("1", "Title", "Body"))
///     .with_status(MockOp::Delete, 403)
///     .build();
/// assert!(api.calls().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    pub fn builder() -> MockApiBuilder {
        MockApiBuilder::new()
    }

    /// Calls received so far, e.g. `["list", "delete 1"]`.
    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn stored_note(&self, id: &str) -> Option<Note> {
        self.lock().notes.get(id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin(&self, op: MockOp, call: String, resource: &str) -> Result<MutexGuard<'_, MockState>, ClientError> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.failures.get(&op) {
            Some(Failure::Status(status)) => Err(ClientError::from_status(*status, "", resource)),
            Some(Failure::Network) => Err(ClientError::Network("connection refused".to_string())),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl NotesApi for MockApi {
    async fn list_notes(&self) -> Result<Vec<Note>, ClientError> {
        let state = self.begin(MockOp::List, "list".to_string(), "notes")?;
        Ok(state.notes.values().cloned().collect())
    }

    async fn get_note(&self, id: &str) -> Result<Note, ClientError> {
        let state = self.begin(MockOp::Get, format!("get {id}"), id)?;
        state
            .notes
            .get(id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(id.to_string()))
    }

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ClientError> {
        let mut state = self.begin(MockOp::Create, "create".to_string(), "notes")?;
        state.next_id += 1;
        let now = Utc::now();
        let note = Note {
            id: format!("mock-{}", state.next_id),
            title: draft.title.clone(),
            content: draft.content.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            user_id: "mock-user".to_string(),
            is_public: draft.is_public,
            tags: draft.tags.clone(),
        };
        state.notes.insert(note.id.clone(), note.clone());
        Ok(note)
    }

    async fn update_note(&self, id: &str, patch: &NotePatch) -> Result<Note, ClientError> {
        let mut state = self.begin(MockOp::Update, format!("update {id}"), id)?;
        let note = state
            .notes
            .get_mut(id)
            .ok_or_else(|| ClientError::NotFound(id.to_string()))?;
        patch.apply_to(note);
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete_note(&self, id: &str) -> Result<(), ClientError> {
        let mut state = self.begin(MockOp::Delete, format!("delete {id}"), id)?;
        state
            .notes
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ClientError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl AuthApi for MockApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        let state = self.begin(MockOp::Login, "login".to_string(), "auth/login")?;
        let key = (credentials.email.clone(), credentials.password.clone());
        match state.accounts.get(&key) {
            Some(token) => Ok(AuthResponse {
                token: token.clone(),
                expires_at: None,
                user_id: Some("mock-user".to_string()),
            }),
            None => Err(ClientError::Unauthorized { status: 401 }),
        }
    }

    async fn signup(&self, request: &SignupRequest) -> Result<User, ClientError> {
        let _state = self.begin(MockOp::Signup, "signup".to_string(), "auth/signup")?;
        Ok(User {
            id: "mock-user".to_string(),
            username: request.username.clone(),
            email: request.email.clone(),
            created_at: Some(Utc::now()),
            updated_at: None,
            last_login: None,
            role: Role::User,
            active: true,
            profile: None,
        })
    }

    async fn verify_token(&self) -> Result<TokenClaims, ClientError> {
        let _state = self.begin(MockOp::Verify, "verify".to_string(), "token")?;
        Ok(TokenClaims {
            user_id: "mock-user".to_string(),
            role: Role::User,
            exp: None,
        })
    }
}

/// Builder for MockApi
///
/// Provides a fluent interface for configuring mock behavior.
#[derive(Default)]
pub struct MockApiBuilder {
    state: MockState,
}

impl MockApiBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a note that the server already holds
    pub fn with_note(mut self, note: Note) -> Self {
        self.state.notes.insert(note.id.clone(), note);
        self
    }

    /// Accept this email/password pair on login and hand out `token`
    pub fn with_account(mut self, email: &str, password: &str, token: &str) -> Self {
        self.state
            .accounts
            .insert((email.to_string(), password.to_string()), token.to_string());
        self
    }

    /// Make `op` fail as if the server answered with `status`
    pub fn with_status(mut self, op: MockOp, status: u16) -> Self {
        self.state.failures.insert(op, Failure::Status(status));
        self
    }

    /// Make `op` fail before reaching the server
    pub fn with_network_failure(mut self, op: MockOp) -> Self {
        self.state.failures.insert(op, Failure::Network);
        self
    }

    pub fn build(self) -> MockApi {
        MockApi {
            state: Arc::new(Mutex::new(self.state)),
        }
    }
}

/// A server-shaped note with fixed ownership and fresh timestamps.
pub fn sample_note(id: &str, title: &str, content: &str) -> Note {
    let now = Utc::now();
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        created_at: now,
        updated_at: now,
        deleted_at: None,
        user_id: "mock-user".to_string(),
        is_public: false,
        tags: vec![],
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "reqwest", "rustls", "mio", "h2"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init() {
        init_test_setup().expect("Failed to initialize test setup");
    }

    #[tokio::test]
    async fn given_note_added_when_getting_note_then_returns_note() {
        let api = MockApi::builder()
            .with_note(sample_note("123", "Test Question", "Test Answer"))
            .build();

        let result = api.get_note("123").await.expect("Note should exist");

        assert_eq!(result.id, "123");
        assert_eq!(result.title, "Test Question");
    }

    #[tokio::test]
    async fn given_no_note_when_getting_note_then_returns_not_found() {
        let api = MockApi::builder().build();

        let result = api.get_note("999").await;

        assert!(matches!(result, Err(ClientError::NotFound(id)) if id == "999"));
    }

    #[tokio::test]
    async fn given_network_failure_configured_when_listing_then_returns_network_error() {
        let api = MockApi::builder()
            .with_network_failure(MockOp::List)
            .build();

        let result = api.list_notes().await;

        assert!(matches!(result, Err(ClientError::Network(_))));
        assert_eq!(api.calls(), vec!["list"]);
    }

    #[tokio::test]
    async fn given_created_note_when_updating_content_then_title_is_kept() {
        let api = MockApi::builder().build();
        let created = api
            .create_note(&NoteDraft::new("A", "B"))
            .await
            .expect("Create should succeed");

        let patch = NotePatch {
            content: Some("C".to_string()),
            ..Default::default()
        };
        let updated = api
            .update_note(&created.id, &patch)
            .await
            .expect("Update should succeed");

        assert_eq!(updated.title, "A");
        assert_eq!(updated.content, "C");
        assert_eq!(api.stored_note(&created.id), Some(updated));
    }
}
