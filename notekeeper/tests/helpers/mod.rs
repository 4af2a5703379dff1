use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration as ChronoDuration, Utc};
use notekeeper::application::SessionStore;
use notekeeper::domain::{
    AuthResponse, Credentials, Note, NoteDraft, NotePatch, Role, SignupRequest, TokenClaims, User,
};
use notekeeper::infrastructure::{FileStore, HttpClient};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;

#[derive(Default)]
struct ServerState {
    notes: BTreeMap<String, Note>,
    // email -> (password, user id)
    accounts: HashMap<String, (String, String)>,
    // token -> user id
    tokens: HashMap<String, String>,
    next_id: u64,
    list_delay: Option<Duration>,
}

type Shared = Arc<Mutex<ServerState>>;

fn lock(state: &Shared) -> MutexGuard<'_, ServerState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-process fake of the notes API, listening on an ephemeral port
#[allow(dead_code)]
pub struct TestServer {
    pub base_url: String,
    state: Shared,
    handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestServer {
    pub async fn start() -> Result<Self> {
        let state: Shared = Arc::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind test server")?;
        let addr = listener.local_addr()?;

        let app = Router::new()
            .route("/api/notes", get(list_notes).post(create_note))
            .route(
                "/api/notes/{id}",
                get(get_note).patch(update_note).delete(delete_note),
            )
            .route("/api/auth/login", post(login))
            .route("/api/auth/signup", post(signup))
            .route("/api/token", get(token))
            .route("/broken/notes", get(broken_notes))
            .with_state(state.clone());

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}/api"),
            state,
            handle,
        })
    }

    /// Base URL under which every notes response is malformed
    pub fn broken_base_url(&self) -> String {
        self.base_url.replace("/api", "/broken")
    }

    pub fn with_account(&self, email: &str, password: &str) -> &Self {
        let mut state = lock(&self.state);
        let user_id = format!("user-{}", state.accounts.len() + 1);
        state
            .accounts
            .insert(email.to_string(), (password.to_string(), user_id));
        self
    }

    pub fn set_list_delay(&self, delay: Duration) {
        lock(&self.state).list_delay = Some(delay);
    }

    pub fn note_ids(&self) -> Vec<String> {
        lock(&self.state).notes.keys().cloned().collect()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Session persisted in a temporary file, plus a client bound to it
#[allow(dead_code)]
pub struct TestSession {
    _dir: TempDir,
    pub session_path: PathBuf,
    pub session: SessionStore,
    pub client: HttpClient,
}

#[allow(dead_code)]
impl TestSession {
    pub fn new(base_url: &str) -> Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create temporary directory")?;
        let session_path = dir.path().join("session.json");
        let session = SessionStore::new(Arc::new(FileStore::new(&session_path)));
        let client = HttpClient::new(base_url, session.clone())?;
        Ok(Self {
            _dir: dir,
            session_path,
            session,
            client,
        })
    }
}

fn authorize(state: &ServerState, headers: &HeaderMap) -> Result<String, StatusCode> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    state
        .tokens
        .get(token)
        .cloned()
        .ok_or(StatusCode::UNAUTHORIZED)
}

fn owned_note<'a>(
    state: &'a mut ServerState,
    user_id: &str,
    id: &str,
) -> Result<&'a mut Note, StatusCode> {
    state
        .notes
        .get_mut(id)
        .filter(|note| note.user_id == user_id)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_notes(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Vec<Note>>, StatusCode> {
    let delay = lock(&state).list_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    let state = lock(&state);
    let user_id = authorize(&state, &headers)?;
    let notes = state
        .notes
        .values()
        .filter(|note| note.user_id == user_id)
        .cloned()
        .collect();
    Ok(Json(notes))
}

async fn get_note(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Note>, StatusCode> {
    let mut state = lock(&state);
    let user_id = authorize(&state, &headers)?;
    Ok(Json(owned_note(&mut state, &user_id, &id)?.clone()))
}

async fn create_note(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(draft): Json<NoteDraft>,
) -> Result<(StatusCode, Json<Note>), StatusCode> {
    let mut state = lock(&state);
    let user_id = authorize(&state, &headers)?;
    if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    state.next_id += 1;
    let now = Utc::now();
    let note = Note {
        id: format!("note-{}", state.next_id),
        title: draft.title,
        content: draft.content,
        created_at: now,
        updated_at: now,
        deleted_at: None,
        user_id,
        is_public: draft.is_public,
        tags: draft.tags,
    };
    state.notes.insert(note.id.clone(), note.clone());
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update_note(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(patch): Json<NotePatch>,
) -> Result<Json<Note>, StatusCode> {
    let mut state = lock(&state);
    let user_id = authorize(&state, &headers)?;
    let note = owned_note(&mut state, &user_id, &id)?;
    patch.apply_to(note);
    note.updated_at = Utc::now();
    Ok(Json(note.clone()))
}

async fn delete_note(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut state = lock(&state);
    let user_id = authorize(&state, &headers)?;
    owned_note(&mut state, &user_id, &id)?;
    state.notes.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

async fn login(
    State(state): State<Shared>,
    Json(creds): Json<Credentials>,
) -> Result<Json<AuthResponse>, StatusCode> {
    let mut state = lock(&state);
    let user_id = match state.accounts.get(&creds.email) {
        Some((password, user_id)) if *password == creds.password => user_id.clone(),
        _ => return Err(StatusCode::UNAUTHORIZED),
    };
    let token = format!("token-{}-{}", user_id, state.tokens.len() + 1);
    state.tokens.insert(token.clone(), user_id.clone());
    Ok(Json(AuthResponse {
        token,
        expires_at: Some(Utc::now() + ChronoDuration::days(30)),
        user_id: Some(user_id),
    }))
}

async fn signup(
    State(state): State<Shared>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>), StatusCode> {
    let mut state = lock(&state);
    if state.accounts.contains_key(&request.email) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let user_id = format!("user-{}", state.accounts.len() + 1);
    state.accounts.insert(
        request.email.clone(),
        (request.password.clone(), user_id.clone()),
    );
    let now = Utc::now();
    Ok((
        StatusCode::CREATED,
        Json(User {
            id: user_id,
            username: request.username,
            email: request.email,
            created_at: Some(now),
            updated_at: Some(now),
            last_login: None,
            role: Role::User,
            active: true,
            profile: None,
        }),
    ))
}

async fn token(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<TokenClaims>, StatusCode> {
    let state = lock(&state);
    let user_id = authorize(&state, &headers)?;
    Ok(Json(TokenClaims {
        user_id,
        role: Role::User,
        exp: None,
    }))
}

async fn broken_notes() -> &'static str {
    r#"[{"id": 1, "title": null}]"#
}
