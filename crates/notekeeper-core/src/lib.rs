//! notekeeper core: note model, store contract, and the shared error surface.
//!
//! This crate holds everything the HTTP service needs that is not transport
//! specific: the `Note` record, the partial-update `NotePatch`, the `NoteStore`
//! trait with its in-memory implementation, and `NotesError`. It carries no
//! runtime dependencies so the store can be exercised directly in tests.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `NotesError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod note;
pub mod store;

/// Shared result type.
pub use error::{Result, NotesError};
pub use note::{NewNote, Note, NotePatch};
pub use store::{InMemoryNoteStore, NoteStore};
