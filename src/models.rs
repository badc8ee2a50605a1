use chrono::{DateTime, SecondsFormat, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title shown for notes whose title is empty
pub const UNTITLED: &str = "Untitled";

/// A single note. Field names on the wire are camelCase so persisted state and
/// `notes.json` share one layout.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String, // ISO 8601, kept verbatim
    pub updated_at: String, // ISO 8601, kept verbatim
    pub favorite: bool,
    pub tags: Vec<String>,
}

impl Note {
    /// Create an empty note stamped with `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        let stamp = format_timestamp(now);
        Self {
            id: new_note_id(),
            title: String::new(),
            content: String::new(),
            created_at: stamp.clone(),
            updated_at: stamp,
            favorite: false,
            tags: Vec::new(),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.updated_at)
    }

    /// Exact, case-sensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// `query_lower` must already be lowercased
    pub fn matches_search(&self, query_lower: &str) -> bool {
        self.title.to_lowercase().contains(query_lower)
            || self.content.to_lowercase().contains(query_lower)
            || self.tags.iter().any(|t| t.to_lowercase().contains(query_lower))
    }

    /// Local calendar date of the last update, for list rows
    pub fn updated_date_label(&self) -> String {
        match self.updated() {
            Some(updated) => updated
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d")
                .to_string(),
            None => self.updated_at.clone(),
        }
    }
}

/// Partial set of fields merged into the active note by an edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub favorite: Option<bool>,
}

impl NoteChanges {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn tags(tags: Vec<String>) -> Self {
        Self {
            tags: Some(tags),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none() && self.favorite.is_none()
    }

    pub(crate) fn apply_to(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(content) = self.content {
            note.content = content;
        }
        if let Some(tags) = self.tags {
            note.tags = tags;
        }
        if let Some(favorite) = self.favorite {
            note.favorite = favorite;
        }
    }
}

/// Ordering applied to the filtered note list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Updated,
    Created,
    Title,
    Favorite,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Updated, SortKey::Created, SortKey::Title, SortKey::Favorite];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Updated => "Last Updated",
            SortKey::Created => "Created Date",
            SortKey::Title => "Title",
            SortKey::Favorite => "Favorites",
        }
    }

    /// Next key in selector order, wrapping around
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Ephemeral menu/view state. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    pub is_open: bool,
    pub search: String,
    pub sort_by: SortKey,
    pub show_favorites_only: bool,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            is_open: true,
            search: String::new(),
            sort_by: SortKey::Updated,
            show_favorites_only: false,
        }
    }
}

pub fn new_note_id() -> String {
    Uuid::new_v4().to_string()
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
