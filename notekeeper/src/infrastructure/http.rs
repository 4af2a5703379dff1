// src/infrastructure/http.rs
use crate::application::{AuthApi, NotesApi, SessionStore};
use crate::domain::{
    AuthResponse, ClientError, Credentials, Note, NoteDraft, NotePatch, SignupRequest, TokenClaims,
    User,
};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

const NOTES: &str = "notes";

/// HTTP implementation of the notes and auth APIs.
///
/// The bearer token is read from the session store for every request. No
/// retries and no timeouts: a failed request is returned as is.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionStore,
}

impl HttpClient {
    /// `base_url` is the API root, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: &str, session: SessionStore) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }
        debug!(base_url = %parsed, "Created API client");
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: parsed,
            session,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        trace!(%method, %url, "Building request");
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => {
                debug!("No session token, sending request without credentials");
                builder
            }
        }
    }

    async fn execute(&self, builder: RequestBuilder, resource: &str) -> Result<Response, ClientError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        debug!(%status, resource, "Received response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(status.as_u16(), &body, resource))
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        resource: &str,
    ) -> Result<T, ClientError> {
        let response = self.execute(builder, resource).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(format!("{resource}: {e}")))
    }
}

fn note_id(id: &str) -> Result<&str, ClientError> {
    if id.trim().is_empty() {
        return Err(ClientError::InvalidId);
    }
    Ok(id)
}

#[async_trait]
impl NotesApi for HttpClient {
    #[instrument(level = "debug", skip(self))]
    async fn list_notes(&self) -> Result<Vec<Note>, ClientError> {
        let url = self.endpoint(&[NOTES])?;
        self.fetch(self.request(Method::GET, url), NOTES).await
    }

    #[instrument(level = "debug", skip(self))]
    async fn get_note(&self, id: &str) -> Result<Note, ClientError> {
        let id = note_id(id)?;
        let url = self.endpoint(&[NOTES, id])?;
        self.fetch(self.request(Method::GET, url), id).await
    }

    #[instrument(level = "debug", skip(self, draft), fields(title = %draft.title))]
    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ClientError> {
        let url = self.endpoint(&[NOTES])?;
        self.fetch(self.request(Method::POST, url).json(draft), NOTES)
            .await
    }

    #[instrument(level = "debug", skip(self, patch))]
    async fn update_note(&self, id: &str, patch: &NotePatch) -> Result<Note, ClientError> {
        let id = note_id(id)?;
        if patch.is_empty() {
            return Err(ClientError::Validation("nothing to update".to_string()));
        }
        let url = self.endpoint(&[NOTES, id])?;
        self.fetch(self.request(Method::PATCH, url).json(patch), id)
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_note(&self, id: &str) -> Result<(), ClientError> {
        let id = note_id(id)?;
        let url = self.endpoint(&[NOTES, id])?;
        self.execute(self.request(Method::DELETE, url), id).await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for HttpClient {
    #[instrument(level = "debug", skip(self, credentials))]
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        let url = self.endpoint(&["auth", "login"])?;
        self.fetch(self.http.post(url).json(credentials), "auth/login")
            .await
    }

    #[instrument(level = "debug", skip(self, request), fields(username = %request.username))]
    async fn signup(&self, request: &SignupRequest) -> Result<User, ClientError> {
        let url = self.endpoint(&["auth", "signup"])?;
        self.fetch(self.http.post(url).json(request), "auth/signup")
            .await
    }

    #[instrument(level = "debug", skip(self))]
    async fn verify_token(&self) -> Result<TokenClaims, ClientError> {
        let url = self.endpoint(&["token"])?;
        self.fetch(self.request(Method::GET, url), "token").await
    }
}
