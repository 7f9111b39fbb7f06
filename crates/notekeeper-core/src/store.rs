//! Note storage.
//!
//! `NoteStore` is the seam the HTTP layer depends on; `InMemoryNoteStore` is the
//! only implementation (process memory, lost on restart). Records are kept in
//! a `DashMap` so writes to one id are exclusive while unrelated ids proceed in
//! parallel. A creation sequence number keeps listing order stable.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::{NotesError, Result};
use crate::note::{NewNote, Note, NotePatch};

pub trait NoteStore: Send + Sync {
    /// Insert a new note under a freshly generated id.
    fn create(&self, new: NewNote) -> Note;
    /// All live notes in creation order.
    fn list(&self) -> Vec<Note>;
    fn get(&self, id: &str) -> Result<Note>;
    /// Apply a partial update and return the resulting note.
    fn update(&self, id: &str, patch: NotePatch) -> Result<Note>;
    fn delete(&self, id: &str) -> Result<()>;
    /// Number of live notes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

struct StoredNote {
    note: Note,
    created_seq: u64,
}

pub struct InMemoryNoteStore {
    notes: DashMap<String, StoredNote>,
    seq: AtomicU64,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self {
            notes: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryNoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteStore for InMemoryNoteStore {
    fn create(&self, new: NewNote) -> Note {
        let created_seq = self.seq.fetch_add(1, Ordering::Relaxed);
        // v4 collisions are not expected, but an occupied slot must never be overwritten.
        loop {
            let id = Uuid::new_v4().to_string();
            match self.notes.entry(id) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    let note = new.into_note(slot.key().clone());
                    slot.insert(StoredNote {
                        note: note.clone(),
                        created_seq,
                    });
                    return note;
                }
            }
        }
    }

    fn list(&self) -> Vec<Note> {
        let mut entries: Vec<(u64, Note)> = self
            .notes
            .iter()
            .map(|e| (e.value().created_seq, e.value().note.clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, note)| note).collect()
    }

    fn get(&self, id: &str) -> Result<Note> {
        self.notes
            .get(id)
            .map(|e| e.value().note.clone())
            .ok_or(NotesError::NotFound)
    }

    fn update(&self, id: &str, patch: NotePatch) -> Result<Note> {
        let mut entry = self.notes.get_mut(id).ok_or(NotesError::NotFound)?;
        patch.apply(&mut entry.note);
        Ok(entry.note.clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.notes
            .remove(id)
            .map(|_| ())
            .ok_or(NotesError::NotFound)
    }

    fn len(&self) -> usize {
        self.notes.len()
    }
}
