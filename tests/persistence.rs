use notepad::models::NoteChanges;
use notepad::storage::{NOTES_KEY, SqliteStorage, Storage};
use notepad::store::{NoteStore, SystemClock};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn open(dir: &TempDir) -> NoteStore<SqliteStorage> {
    let storage = SqliteStorage::open(&dir.path().join("data").join("notepad.db")).unwrap();
    NoteStore::load(storage, SystemClock).unwrap()
}

#[test]
fn notes_survive_a_reload() {
    let dir = TempDir::new().unwrap();
    let (kept, favorite) = {
        let mut store = open(&dir);
        let first = store.create_note().unwrap();
        store.update_active_note(NoteChanges::title("Shopping")).unwrap();
        store.add_tag("home").unwrap();
        let second = store.create_note().unwrap();
        store.update_active_note(NoteChanges::content("buy milk")).unwrap();
        store.toggle_favorite(&second).unwrap();
        (first, second)
    };

    let store = open(&dir);
    assert_eq!(store.len(), 2);
    // Newest first, nothing active after a restart
    assert_eq!(store.notes()[0].id, favorite);
    assert_eq!(store.notes()[1].id, kept);
    assert!(store.active_note().is_none());

    let shopping = store.get(&kept).unwrap();
    assert_eq!(shopping.title, "Shopping");
    assert_eq!(shopping.tags, vec!["home"]);
    let milk = store.get(&favorite).unwrap();
    assert_eq!(milk.content, "buy milk");
    assert!(milk.favorite);
}

#[test]
fn deletes_are_persisted() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(&dir);
        let id = store.create_note().unwrap();
        store.create_note().unwrap();
        let menu = Default::default();
        assert!(store.delete_note(&id, &menu, &mut |_: &str| true).unwrap());
    }
    assert_eq!(open(&dir).len(), 1);
}

#[test]
fn corrupt_state_loads_as_empty_and_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notepad.db");
    {
        let mut storage = SqliteStorage::open(&path).unwrap();
        storage.set(NOTES_KEY, "{not json").unwrap();
    }

    let mut store = NoteStore::load(SqliteStorage::open(&path).unwrap(), SystemClock).unwrap();
    assert!(store.is_empty());

    store.create_note().unwrap();
    let raw = store.storage().get(NOTES_KEY).unwrap().unwrap();
    assert!(raw.starts_with('['));
}

#[test]
fn persisted_json_uses_camel_case_fields() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.create_note().unwrap();

    let raw = store.storage().get(NOTES_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let note = &value[0];
    for field in ["id", "title", "content", "createdAt", "updatedAt", "favorite", "tags"] {
        assert!(note.get(field).is_some(), "missing {field}");
    }
}
