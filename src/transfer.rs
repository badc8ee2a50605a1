//! `notes.json` export and import.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{Note, format_timestamp, new_note_id};

/// File name offered for exports
pub const EXPORT_FILE_NAME: &str = "notes.json";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read import file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Expected a JSON array of notes")]
    NotAnArray,
    #[error("Record {index} is not a note object")]
    InvalidRecord { index: usize },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize notes: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write export file: {0}")]
    WriteError(#[from] std::io::Error),
}

/// Pretty-printed (2-space) JSON array of all notes. An empty list is `[]`.
pub fn export_json(notes: &[Note]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(notes)
}

/// Write `notes.json` into `dir`, returning the written path
pub fn export_to_dir(dir: &Path, notes: &[Note]) -> Result<PathBuf, ExportError> {
    let path = dir.join(EXPORT_FILE_NAME);
    export_to_file(&path, notes)?;
    Ok(path)
}

pub fn export_to_file(path: &Path, notes: &[Note]) -> Result<(), ExportError> {
    let text = export_json(notes)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    Ok(())
}

pub fn read_import_file(path: &Path) -> Result<String, ImportError> {
    Ok(fs::read_to_string(path)?)
}

/// Parse an import payload into note records.
///
/// The root must be an array and every element an object; anything else fails
/// the whole import. Fields are otherwise taken as given: missing, null or
/// mistyped ones fall back to defaults and missing timestamps to `now`.
pub fn parse_import(text: &str, now: DateTime<Utc>) -> Result<Vec<Note>, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(elements) = value else {
        return Err(ImportError::NotAnArray);
    };

    let stamp = format_timestamp(now);
    let mut notes = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let Value::Object(fields) = element else {
            return Err(ImportError::InvalidRecord { index });
        };
        let mut note = note_from_fields(&fields);
        if note.created_at.is_empty() {
            note.created_at = stamp.clone();
        }
        if note.updated_at.is_empty() {
            note.updated_at = note.created_at.clone();
        }
        notes.push(note);
    }
    Ok(notes)
}

fn note_from_fields(fields: &Map<String, Value>) -> Note {
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let tags = match fields.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    Note {
        id: text("id"),
        title: text("title"),
        content: text("content"),
        created_at: text("createdAt"),
        updated_at: text("updatedAt"),
        favorite: fields.get("favorite").and_then(Value::as_bool).unwrap_or(false),
        tags,
    }
}

/// Give fresh ids to records whose id is empty, already taken by `existing`,
/// or repeated earlier in `records`. Returns how many ids were replaced.
pub fn assign_unique_ids<'a>(records: &mut [Note], existing: impl IntoIterator<Item = &'a str>) -> usize {
    let mut taken: HashSet<String> = existing.into_iter().map(str::to_string).collect();
    let mut replaced = 0;
    for record in records.iter_mut() {
        if record.id.is_empty() || taken.contains(&record.id) {
            record.id = new_note_id();
            replaced += 1;
        }
        taken.insert(record.id.clone());
    }
    replaced
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn export_of_empty_list_is_brackets() {
        assert_eq!(export_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn export_uses_two_space_indentation() {
        let note = Note {
            id: "x".to_string(),
            tags: vec!["a".to_string()],
            ..Note::default()
        };
        let text = export_json(&[note]).unwrap();
        assert!(text.starts_with("[\n  {\n    \"id\": \"x\""));
        assert!(text.contains("\n    \"tags\": [\n      \"a\"\n    ]"));
    }

    #[test]
    fn non_array_payload_is_rejected() {
        let err = parse_import(r#"{"a":1}"#, now()).unwrap_err();
        assert!(matches!(err, ImportError::NotAnArray));
    }

    #[test]
    fn unparsable_payload_is_rejected() {
        let err = parse_import("not json", now()).unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn non_object_element_is_rejected() {
        let err = parse_import(r#"[{"id":"a"}, 3]"#, now()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidRecord { index: 1 }));
    }

    #[test]
    fn record_is_taken_verbatim() {
        let text = r#"[{"id":"x","title":"t","content":"","createdAt":"...","updatedAt":"...","favorite":false,"tags":[]}]"#;
        let notes = parse_import(text, now()).unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "x");
        assert_eq!(notes[0].title, "t");
        assert_eq!(notes[0].created_at, "...");
        assert_eq!(notes[0].updated_at, "...");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let notes = parse_import(r#"[{"title":"only title","extra":true}]"#, now()).unwrap();
        assert_eq!(notes[0].title, "only title");
        assert_eq!(notes[0].id, "");
        assert_eq!(notes[0].created_at, "2024-05-01T12:00:00.000Z");
        assert_eq!(notes[0].updated_at, notes[0].created_at);
        assert!(notes[0].tags.is_empty());
    }

    #[test]
    fn null_and_mistyped_fields_take_defaults() {
        let text = r#"[
            {"id":"x","title":null,"content":7,"favorite":"yes","tags":"x"},
            {"id":"y","tags":["work",null,3,"home"],"favorite":true}
        ]"#;
        let notes = parse_import(text, now()).unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id, "x");
        assert_eq!(notes[0].title, "");
        assert_eq!(notes[0].content, "");
        assert!(!notes[0].favorite);
        assert!(notes[0].tags.is_empty());
        assert_eq!(notes[1].tags, vec!["work", "home"]);
        assert!(notes[1].favorite);
    }

    #[test]
    fn colliding_and_missing_ids_are_regenerated() {
        let mut records = vec![
            Note { id: "keep".to_string(), ..Note::default() },
            Note { id: "taken".to_string(), ..Note::default() },
            Note { id: "keep".to_string(), ..Note::default() },
            Note::default(),
        ];
        let replaced = assign_unique_ids(&mut records, ["taken"]);
        assert_eq!(replaced, 3);
        assert_eq!(records[0].id, "keep");
        assert_ne!(records[1].id, "taken");
        assert_ne!(records[2].id, "keep");
        assert!(!records[3].id.is_empty());
        let unique: HashSet<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn export_to_dir_writes_notes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_to_dir(dir.path(), &[]).unwrap();
        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }
}
