// src/application/views/note_editor.rs
use crate::application::router::Route;
use crate::application::scope::{ScopeHandle, ViewScope};
use crate::application::views::{NoteForm, ViewError, ViewStatus};
use crate::application::NotesApi;
use crate::domain::Note;
use tracing::{debug, info, instrument};

/// Fixed when the editor is constructed; never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(String),
}

pub struct NoteEditorView<A: NotesApi> {
    api: A,
    mode: EditorMode,
    scope: ViewScope,
    pub form: NoteForm,
    saved: Option<Note>,
    status: ViewStatus,
}

impl<A: NotesApi> NoteEditorView<A> {
    /// `note_id` is the route parameter: absent for a new note.
    pub fn new(api: A, note_id: Option<String>) -> Self {
        let mode = match note_id {
            Some(id) => EditorMode::Edit(id),
            None => EditorMode::Create,
        };
        Self {
            api,
            mode,
            scope: ViewScope::new(),
            form: NoteForm::default(),
            saved: None,
            status: ViewStatus::Idle,
        }
    }

    /// Editor for `/new-note` or `/edit-note/{id}`; `None` for any other route.
    pub fn for_route(api: A, route: &Route) -> Option<Self> {
        match route {
            Route::NewNote => Some(Self::new(api, None)),
            Route::EditNote(id) => Some(Self::new(api, Some(id.clone()))),
            _ => None,
        }
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    /// The note returned by the last successful submit.
    pub fn saved(&self) -> Option<&Note> {
        self.saved.as_ref()
    }

    pub fn scope(&self) -> ScopeHandle {
        self.scope.handle()
    }

    /// In edit mode, fetch the note and pre-populate the form.
    #[instrument(level = "debug", skip(self))]
    pub async fn mount(&mut self) -> Result<(), ViewError> {
        let EditorMode::Edit(id) = &self.mode else {
            self.status = ViewStatus::Ready;
            return Ok(());
        };

        let previous = self.status.begin();
        match self.scope.run(self.api.get_note(id)).await {
            Ok(note) => {
                debug!(note_id = %note.id, "Loaded note for editing");
                self.form.title = note.title;
                self.form.content = note.content;
                self.status = ViewStatus::Ready;
                Ok(())
            }
            Err(e) => Err(self.status.settle(previous, e)),
        }
    }

    /// Create or update depending on the mode, then go back to the list.
    #[instrument(level = "debug", skip(self))]
    pub async fn submit(&mut self) -> Result<Route, ViewError> {
        let (previous, result) = match &self.mode {
            EditorMode::Create => {
                let draft = self.form.to_draft().map_err(|e| self.status.fail(e))?;
                let previous = self.status.begin();
                (previous, self.scope.run(self.api.create_note(&draft)).await)
            }
            EditorMode::Edit(id) => {
                let patch = self.form.to_patch().map_err(|e| self.status.fail(e))?;
                let previous = self.status.begin();
                (previous, self.scope.run(self.api.update_note(id, &patch)).await)
            }
        };

        let note = result.map_err(|e| self.status.settle(previous, e))?;
        info!(note_id = %note.id, mode = ?self.mode, "Saved note");
        self.saved = Some(note);
        self.status = ViewStatus::Ready;
        Ok(Route::Home)
    }
}
