//! The note store: the single owned list of notes plus the active note.
//!
//! Every mutation is applied to a working copy, written through to storage
//! under [`NOTES_KEY`], and only then committed in memory. A failed write
//! leaves the previous state untouched.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{MenuState, Note, NoteChanges, format_timestamp};
use crate::pipeline;
use crate::storage::{NOTES_KEY, Storage, StorageError};
use crate::transfer::{self, ImportError};

/// Prompt passed to the confirmation gate before a delete
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this note?";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Failed to serialize notes: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Note not found: {0}")]
    NoteNotFound(String),
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),
}

/// Source of "now" for timestamps
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Synchronous yes/no gate for destructive actions
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

pub struct NoteStore<S: Storage, C: Clock = SystemClock> {
    storage: S,
    clock: C,
    notes: Vec<Note>,
    active_id: Option<String>,
}

impl<S: Storage, C: Clock> NoteStore<S, C> {
    /// Load the persisted list. A missing entry or unparsable JSON starts an
    /// empty store; only a failing storage read is an error.
    pub fn load(storage: S, clock: C) -> Result<Self, StoreError> {
        let notes = match storage.get(NOTES_KEY)? {
            Some(raw) => match serde_json::from_str::<Vec<Note>>(&raw) {
                Ok(notes) => notes,
                Err(e) => {
                    tracing::warn!(error = %e, "persisted notes unreadable, starting empty");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        tracing::info!(count = notes.len(), "notes loaded");

        Ok(Self {
            storage,
            clock,
            notes,
            active_id: None,
        })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active_note(&self) -> Option<&Note> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Make an existing note active. Not a mutation, nothing is persisted.
    pub fn select(&mut self, id: &str) -> Result<(), StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NoteNotFound(id.to_string()));
        }
        self.active_id = Some(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.active_id = None;
    }

    /// Prepend a fresh empty note and make it active
    pub fn create_note(&mut self) -> Result<String, StoreError> {
        let note = Note::new(self.clock.now());
        let id = note.id.clone();

        let mut notes = Vec::with_capacity(self.notes.len() + 1);
        notes.push(note);
        notes.extend(self.notes.iter().cloned());
        self.commit(notes)?;

        self.active_id = Some(id.clone());
        tracing::info!(note_id = %id, "note created");
        Ok(id)
    }

    /// Merge `changes` into the active note and stamp `updatedAt`.
    /// Returns `false` when no note is active.
    pub fn update_active_note(&mut self, changes: NoteChanges) -> Result<bool, StoreError> {
        let Some(active_id) = self.active_id.clone() else {
            return Ok(false);
        };
        let now = self.clock.now();

        let mut notes = self.notes.clone();
        let note = notes
            .iter_mut()
            .find(|note| note.id == active_id)
            .ok_or_else(|| StoreError::NoteNotFound(active_id.clone()))?;
        changes.apply_to(note);
        note.updated_at = update_stamp(note, now);
        self.commit(notes)?;

        tracing::debug!(note_id = %active_id, "note updated");
        Ok(true)
    }

    /// Delete after the gate agrees. If the active note goes, the first
    /// remaining note in display order under `menu` becomes active.
    /// Returns `false` when the gate declined.
    pub fn delete_note(
        &mut self,
        id: &str,
        menu: &MenuState,
        confirm: &mut dyn Confirm,
    ) -> Result<bool, StoreError> {
        if self.get(id).is_none() {
            return Err(StoreError::NoteNotFound(id.to_string()));
        }
        if !confirm.confirm(DELETE_PROMPT) {
            tracing::debug!(note_id = %id, "delete declined");
            return Ok(false);
        }

        let notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|note| note.id != id)
            .cloned()
            .collect();
        self.commit(notes)?;

        if self.active_id.as_deref() == Some(id) {
            self.active_id = pipeline::filter_and_sort(&self.notes, menu)
                .first()
                .map(|note| note.id.clone())
                .or_else(|| self.notes.first().map(|note| note.id.clone()));
        }
        tracing::info!(note_id = %id, "note deleted");
        Ok(true)
    }

    /// Flip the favorite flag. Favoriting is not a content edit, so
    /// `updatedAt` is left alone.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut notes = self.notes.clone();
        let note = notes
            .iter_mut()
            .find(|note| note.id == id)
            .ok_or_else(|| StoreError::NoteNotFound(id.to_string()))?;
        note.favorite = !note.favorite;
        let favorite = note.favorite;
        self.commit(notes)?;

        tracing::debug!(note_id = %id, favorite, "favorite toggled");
        Ok(favorite)
    }

    /// Append a trimmed tag to the active note unless it is empty or already
    /// present (exact match). Returns whether the tag list changed.
    pub fn add_tag(&mut self, input: &str) -> Result<bool, StoreError> {
        let tag = input.trim();
        if tag.is_empty() {
            return Ok(false);
        }
        let Some(note) = self.active_note() else {
            return Ok(false);
        };
        if note.has_tag(tag) {
            return Ok(false);
        }

        let mut tags = note.tags.clone();
        tags.push(tag.to_string());
        self.update_active_note(NoteChanges::tags(tags))
    }

    /// Drop the exact matching tag from the active note
    pub fn remove_tag(&mut self, tag: &str) -> Result<bool, StoreError> {
        let Some(note) = self.active_note() else {
            return Ok(false);
        };
        if !note.has_tag(tag) {
            return Ok(false);
        }

        let tags = note.tags.iter().filter(|t| *t != tag).cloned().collect();
        self.update_active_note(NoteChanges::tags(tags))
    }

    /// Append the records of an import payload to the end of the list.
    /// Malformed payloads leave the store unchanged.
    pub fn import_notes(&mut self, text: &str) -> Result<usize, StoreError> {
        let mut records = transfer::parse_import(text, self.clock.now())?;
        let regenerated =
            transfer::assign_unique_ids(&mut records, self.notes.iter().map(|note| note.id.as_str()));
        if regenerated > 0 {
            tracing::warn!(regenerated, "imported notes given fresh ids");
        }

        let count = records.len();
        let mut notes = self.notes.clone();
        notes.extend(records);
        self.commit(notes)?;

        tracing::info!(count, "notes imported");
        Ok(count)
    }

    /// The whole list as pretty-printed JSON
    pub fn export_all(&self) -> Result<String, StoreError> {
        Ok(transfer::export_json(&self.notes)?)
    }

    fn commit(&mut self, notes: Vec<Note>) -> Result<(), StoreError> {
        let text = serde_json::to_string(&notes)?;
        self.storage.set(NOTES_KEY, &text)?;
        self.notes = notes;
        Ok(())
    }
}

/// `now`, but never earlier than the note's creation
fn update_stamp(note: &Note, now: DateTime<Utc>) -> String {
    match note.created() {
        Some(created) if now < created => note.created_at.clone(),
        _ => format_timestamp(now),
    }
}
