// src/ports/text.rs
use crate::application::views::{NoteForm, ViewError};
use crate::constants::PREVIEW_MAX_CHARS;
use crate::domain::{ErrorKind, Note};
use crate::util::text::preview;
use std::fmt::Write;

/// Renders view state for the terminal.
#[derive(Debug, Default)]
pub struct TextPresenter;

impl TextPresenter {
    pub fn new() -> Self {
        Self
    }

    /// One line per note: id, title and a content preview.
    pub fn render_list(&self, notes: &[Note]) -> String {
        if notes.is_empty() {
            return "No notes.\n".to_string();
        }

        let id_width = notes.iter().map(|n| n.id.len()).max().unwrap_or(0);
        let mut out = String::new();
        for note in notes {
            let _ = writeln!(
                out,
                "{:<id_width$}  {}  {}",
                note.id,
                note.title,
                preview(&note.content, PREVIEW_MAX_CHARS),
            );
        }
        out
    }

    pub fn render_note(&self, note: &Note) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}", note.title);
        let _ = writeln!(out, "id:      {}", note.id);
        let _ = writeln!(out, "updated: {}", note.updated_at.format("%Y-%m-%d %H:%M"));
        if note.is_public {
            let _ = writeln!(out, "public:  yes");
        }
        if !note.tags.is_empty() {
            let names: Vec<&str> = note.tags.iter().map(|t| t.name.as_str()).collect();
            let _ = writeln!(out, "tags:    {}", names.join(", "));
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", note.content);
        out
    }

    pub fn render_form(&self, form: &NoteForm) -> String {
        format!("title:   {}\ncontent: {}\n", form.title, form.content)
    }

    pub fn render_error(&self, err: &ViewError) -> String {
        let hint = match err.kind {
            ErrorKind::Unauthorized => " (run `notekeeper login`)",
            ErrorKind::Network => " (is the API server reachable?)",
            _ => "",
        };
        format!("{}{}", err.message, hint)
    }
}
