use uuid::Uuid;

use crate::logic::now_fixed_offset;
use crate::models::{Note, NotePatch, lenient_time};
use crate::store::Document;

/// Notes are opaque documents; content is stored and returned untouched.
pub struct NoteBook {
    notes: Vec<Note>,
    doc: Box<dyn Document<Vec<Note>>>,
}

impl NoteBook {
    pub fn load(doc: impl Document<Vec<Note>> + 'static) -> Self {
        let notes = match doc.read() {
            Ok(Some(notes)) => notes,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "notes unreadable, starting empty");
                Vec::new()
            }
        };

        Self {
            notes,
            doc: Box::new(doc),
        }
    }

    fn persist(&self) {
        if let Err(e) = self.doc.write(&self.notes) {
            tracing::error!(error = %e, "failed to save notes");
        }
    }

    pub fn get_all(&self) -> Vec<Note> {
        self.notes.clone()
    }

    pub fn replace_all(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.persist();
    }

    // newest first, like the notes grid
    pub fn create(&mut self, title: String, content: String) -> Note {
        let now = now_fixed_offset().to_rfc3339();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            created_at: now.clone(),
            updated_at: now,
            extra: Default::default(),
        };
        self.notes.insert(0, note.clone());
        self.persist();
        note
    }

    pub fn update(&mut self, id: &str, patch: NotePatch) -> Option<Note> {
        let note = self.notes.iter_mut().find(|n| n.id == id)?;
        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        // never earlier than a parseable createdAt
        let now = now_fixed_offset();
        note.updated_at = match lenient_time::parse(&note.created_at) {
            Some(created) if created > now => note.created_at.clone(),
            _ => now.to_rfc3339(),
        };

        let updated = note.clone();
        self.persist();
        Some(updated)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.persist();
        self.notes.len() != before
    }
}
