// src/application/api.rs
use crate::domain::{
    AuthResponse, ClientError, Credentials, Note, NoteDraft, NotePatch, SignupRequest, TokenClaims,
    User,
};
use async_trait::async_trait;

/// CRUD operations of the remote notes resource.
#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn list_notes(&self) -> Result<Vec<Note>, ClientError>;

    async fn get_note(&self, id: &str) -> Result<Note, ClientError>;

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ClientError>;

    /// Partial update; fields absent from `patch` are left unchanged.
    async fn update_note(&self, id: &str, patch: &NotePatch) -> Result<Note, ClientError>;

    async fn delete_note(&self, id: &str) -> Result<(), ClientError>;
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError>;

    async fn signup(&self, request: &SignupRequest) -> Result<User, ClientError>;

    /// Ask the server to decode the current session token.
    async fn verify_token(&self) -> Result<TokenClaims, ClientError>;
}
