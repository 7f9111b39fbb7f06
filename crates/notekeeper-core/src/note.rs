//! Note record and the request shapes that create or modify it.

use serde::{Deserialize, Serialize};

/// A stored note. `title` and `content` are kept exactly as supplied and are
/// omitted from JSON when they were never provided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Body of a create request. Both fields are optional and not validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewNote {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NewNote {
    pub fn into_note(self, id: String) -> Note {
        Note {
            id,
            title: self.title,
            content: self.content,
        }
    }
}

/// Field-level partial update.
///
/// `None` (field absent or `null`) leaves the stored value untouched;
/// `Some` replaces it, including with an empty string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl NotePatch {
    pub fn apply(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = Some(title);
        }
        if let Some(content) = self.content {
            note.content = Some(content);
        }
    }
}
