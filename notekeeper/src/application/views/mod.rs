// src/application/views/mod.rs
pub mod forms;
pub mod home;
pub mod login;
pub mod note_editor;
pub mod signup;

pub use forms::{LoginForm, NoteForm, SignupForm};
pub use home::HomeView;
pub use login::LoginView;
pub use note_editor::{EditorMode, NoteEditorView};
pub use signup::SignupView;

use crate::domain::{ClientError, ErrorKind};
use std::fmt;

/// Error state shown by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ViewError {
    /// The server rejected the session; the user has to log in again.
    pub fn requires_login(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }
}

impl From<&ClientError> for ViewError {
    fn from(err: &ClientError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<ClientError> for ViewError {
    fn from(err: ClientError) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ViewError {}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(ViewError),
}

impl ViewStatus {
    /// Record a failed operation. A cancelled request leaves the status alone.
    pub(crate) fn fail(&mut self, err: ClientError) -> ViewError {
        let view_err = ViewError::from(&err);
        if view_err.kind != ErrorKind::Cancelled {
            *self = ViewStatus::Failed(view_err.clone());
        }
        view_err
    }

    /// Mark the view busy. Returns the status to put back if the request is cancelled.
    pub(crate) fn begin(&mut self) -> ViewStatus {
        std::mem::replace(self, ViewStatus::Loading)
    }

    /// Record the failure of a request started with [`ViewStatus::begin`].
    /// A cancelled request restores `previous`.
    pub(crate) fn settle(&mut self, previous: ViewStatus, err: ClientError) -> ViewError {
        if matches!(err, ClientError::Cancelled) {
            *self = previous;
        }
        self.fail(err)
    }

    pub fn error(&self) -> Option<&ViewError> {
        match self {
            ViewStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}
