use notepad::storage::{MemoryStorage, SqliteStorage};
use notepad::store::{NoteStore, StoreError, SystemClock};
use notepad::transfer::{self, EXPORT_FILE_NAME, ImportError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const ONE_NOTE: &str = r#"[{"id":"x","title":"t","content":"","createdAt":"...","updatedAt":"...","favorite":false,"tags":[]}]"#;

fn memory_store() -> NoteStore<MemoryStorage> {
    NoteStore::load(MemoryStorage::new(), SystemClock).unwrap()
}

#[test]
fn non_array_import_leaves_store_unchanged() {
    let mut store = memory_store();
    store.create_note().unwrap();
    let before = store.notes().to_vec();

    let err = store.import_notes(r#"{"a":1}"#).unwrap_err();
    assert!(matches!(err, StoreError::Import(ImportError::NotAnArray)));
    assert_eq!(store.notes(), before.as_slice());
}

#[test]
fn single_record_import_appends_verbatim() {
    let mut store = memory_store();
    let existing = store.create_note().unwrap();

    assert_eq!(store.import_notes(ONE_NOTE).unwrap(), 1);
    assert_eq!(store.len(), 2);
    assert_eq!(store.notes()[0].id, existing);

    let imported = &store.notes()[1];
    assert_eq!(imported.id, "x");
    assert_eq!(imported.title, "t");
    assert_eq!(imported.created_at, "...");
    assert_eq!(imported.updated_at, "...");
}

#[test]
fn null_fields_import_with_defaults() {
    let mut store = memory_store();
    let text = r#"[{"id":"x","title":null,"content":"c","createdAt":"...","updatedAt":"...","favorite":null,"tags":"x"}]"#;

    assert_eq!(store.import_notes(text).unwrap(), 1);
    let imported = &store.notes()[0];
    assert_eq!(imported.id, "x");
    assert_eq!(imported.title, "");
    assert_eq!(imported.display_title(), "Untitled");
    assert_eq!(imported.content, "c");
    assert!(!imported.favorite);
    assert!(imported.tags.is_empty());
}

#[test]
fn importing_the_same_file_twice_keeps_ids_unique() {
    let mut store = memory_store();
    store.import_notes(ONE_NOTE).unwrap();
    store.import_notes(ONE_NOTE).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.notes()[0].id, "x");
    assert_ne!(store.notes()[1].id, "x");
    assert_eq!(store.notes()[1].title, "t");
}

#[test]
fn empty_store_exports_brackets() {
    assert_eq!(memory_store().export_all().unwrap(), "[]");
}

#[test]
fn export_then_import_into_fresh_store() {
    let dir = TempDir::new().unwrap();
    let mut source = memory_store();
    source.create_note().unwrap();
    source.add_tag("work").unwrap();
    source.create_note().unwrap();

    let path = transfer::export_to_dir(dir.path(), source.notes()).unwrap();
    assert_eq!(path, dir.path().join(EXPORT_FILE_NAME));

    let text = transfer::read_import_file(&path).unwrap();
    assert!(text.contains("\n  {\n    \"id\""));

    let storage = SqliteStorage::open(&dir.path().join("notepad.db")).unwrap();
    let mut target = NoteStore::load(storage, SystemClock).unwrap();
    assert_eq!(target.import_notes(&text).unwrap(), 2);
    assert_eq!(target.notes(), source.notes());
}

#[test]
fn missing_import_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let err = transfer::read_import_file(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, ImportError::ReadError(_)));
}
