// src/application/views/home.rs
use crate::application::scope::{ScopeHandle, ViewScope};
use crate::application::views::{ViewError, ViewStatus};
use crate::application::NotesApi;
use crate::domain::Note;
use tracing::{debug, info, instrument};

/// The note list.
pub struct HomeView<A: NotesApi> {
    api: A,
    scope: ViewScope,
    notes: Vec<Note>,
    status: ViewStatus,
}

impl<A: NotesApi> HomeView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            scope: ViewScope::new(),
            notes: Vec::new(),
            status: ViewStatus::Idle,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn scope(&self) -> ScopeHandle {
        self.scope.handle()
    }

    /// Fetch the list into local state.
    #[instrument(level = "debug", skip(self))]
    pub async fn mount(&mut self) -> Result<(), ViewError> {
        let previous = self.status.begin();
        match self.scope.run(self.api.list_notes()).await {
            Ok(notes) => {
                debug!(count = notes.len(), "Fetched notes");
                self.notes = notes;
                self.status = ViewStatus::Ready;
                Ok(())
            }
            Err(e) => Err(self.status.settle(previous, e)),
        }
    }

    /// Delete remotely, then drop the note from the local list without a re-fetch.
    #[instrument(level = "debug", skip(self))]
    pub async fn delete(&mut self, id: &str) -> Result<(), ViewError> {
        match self.scope.run(self.api.delete_note(id)).await {
            Ok(()) => {
                self.notes.retain(|note| note.id != id);
                info!(note_id = id, "Deleted note");
                Ok(())
            }
            Err(e) => Err(self.status.fail(e)),
        }
    }
}
