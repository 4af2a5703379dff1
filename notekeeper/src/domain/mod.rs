// src/domain/mod.rs
pub mod error;
pub mod note;
pub mod user;

pub use error::{ClientError, ErrorKind};
pub use note::{Note, NoteDraft, NotePatch, Tag};
pub use user::{AuthResponse, Credentials, Link, Profile, Role, SignupRequest, TokenClaims, User};
