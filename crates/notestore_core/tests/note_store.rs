use notestore_core::db::open_db_in_memory;
use notestore_core::{
    EditNotePayload, NewNote, NoteEdit, NoteStore, NoteStoreError, SqliteNoteRepository,
    DEFAULT_NOTE_TITLE,
};
use rusqlite::Connection;

fn new_note(title: Option<&str>, body: &str, tags: &[&str]) -> NewNote {
    NewNote {
        title: title.map(str::to_string),
        body: body.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

fn note_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_then_get_returns_matching_record() {
    let conn = open_db_in_memory().unwrap();
    let store = NoteStore::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let id = store
        .create(
            new_note(Some("Shopping"), "milk, eggs", &["home", "errands", "home"]),
            "u1",
        )
        .unwrap();
    let note = store.get_by_id(&id).unwrap();

    assert_eq!(note.id, id);
    assert_eq!(note.title, "Shopping");
    assert_eq!(note.body, "milk, eggs");
    assert_eq!(note.tags, vec!["home", "errands", "home"]);
    assert_eq!(note.owner, "u1");
    assert_eq!(note.created_at, note.updated_at);
}

#[test]
fn create_without_title_uses_placeholder() {
    let conn = open_db_in_memory().unwrap();
    let store = NoteStore::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let id = store.create(new_note(None, "body", &[]), "u1").unwrap();
    let note = store.get_by_id(&id).unwrap();
    assert_eq!(note.title, DEFAULT_NOTE_TITLE);
    assert!(note.tags.is_empty());
}

#[test]
fn list_only_returns_callers_notes_in_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = NoteStore::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let first = store.create(new_note(Some("a"), "one", &[]), "u1").unwrap();
    for idx in 0..5 {
        store
            .create(new_note(None, &format!("other {idx}"), &[]), "u2")
            .unwrap();
    }
    let second = store.create(new_note(Some("b"), "two", &[]), "u1").unwrap();

    let listed = store.list("u1").unwrap();
    let ids: Vec<_> = listed.iter().map(|note| note.id.clone()).collect();
    assert_eq!(ids, vec![first, second]);
    assert!(listed.iter().all(|note| note.owner == "u1"));

    assert_eq!(store.list("u2").unwrap().len(), 5);
    assert!(store.list("nobody").unwrap().is_empty());
}

#[test]
fn verify_owner_distinguishes_missing_and_foreign_notes() {
    let conn = open_db_in_memory().unwrap();
    let store = NoteStore::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let id = store.create(new_note(None, "body", &[]), "u1").unwrap();

    store.verify_owner(&id, "u1").unwrap();
    assert!(matches!(
        store.verify_owner(&id, "u2"),
        Err(NoteStoreError::Unauthorized(_))
    ));
    assert!(matches!(
        store.verify_owner("missing", "u1"),
        Err(NoteStoreError::NotFound(_))
    ));
}

#[test]
fn edit_replaces_fields_and_advances_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let store = NoteStore::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let id = store
        .create(new_note(Some("old"), "old body", &["x"]), "u1")
        .unwrap();
    let before = store.get_by_id(&id).unwrap();

    store
        .edit_by_id(
            &id,
            NoteEdit {
                title: "new".to_string(),
                body: "new body".to_string(),
                tags: vec!["y".to_string(), "x".to_string()],
            },
        )
        .unwrap();

    let after = store.get_by_id(&id).unwrap();
    assert_eq!(after.title, "new");
    assert_eq!(after.body, "new body");
    assert_eq!(after.tags, vec!["y", "x"]);
    assert!(after.updated_at > before.updated_at);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.owner, before.owner);
}

#[test]
fn repeated_edits_keep_updated_at_strictly_increasing() {
    let conn = open_db_in_memory().unwrap();
    let store = NoteStore::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let id = store.create(new_note(None, "body", &[]), "u1").unwrap();

    let mut previous = store.get_by_id(&id).unwrap().updated_at;
    for round in 0..3 {
        let edit = NoteEdit {
            title: format!("t{round}"),
            body: format!("b{round}"),
            tags: Vec::new(),
        };
        store.edit_by_id(&id, edit).unwrap();
        let current = store.get_by_id(&id).unwrap().updated_at;
        assert!(current > previous);
        previous = current;
    }
}

#[test]
fn edit_with_incomplete_payload_is_rejected_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let store = NoteStore::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let id = store.create(new_note(Some("keep"), "keep", &[]), "u1").unwrap();

    let payload = EditNotePayload {
        title: Some("changed".to_string()),
        body: None,
        tags: Some(Vec::new()),
    };
    let result = NoteEdit::try_from(payload)
        .map_err(NoteStoreError::from)
        .and_then(|edit| store.edit_by_id(&id, edit));
    assert!(matches!(result, Err(NoteStoreError::ValidationFailure(_))));

    let blank_body = NoteEdit {
        title: "changed".to_string(),
        body: "  ".to_string(),
        tags: Vec::new(),
    };
    assert!(matches!(
        store.edit_by_id(&id, blank_body),
        Err(NoteStoreError::ValidationFailure(_))
    ));
    assert_eq!(store.get_by_id(&id).unwrap().title, "keep");
}

#[test]
fn edit_and_delete_of_missing_id_fail_without_mutation() {
    let conn = open_db_in_memory().unwrap();
    let store = NoteStore::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let id = store.create(new_note(Some("t"), "b", &[]), "u1").unwrap();

    let edit = NoteEdit {
        title: "x".to_string(),
        body: "y".to_string(),
        tags: Vec::new(),
    };
    assert!(matches!(
        store.edit_by_id("missing", edit),
        Err(NoteStoreError::NotFound(_))
    ));
    assert!(matches!(
        store.delete_by_id("missing"),
        Err(NoteStoreError::NotFound(_))
    ));

    assert_eq!(note_count(&conn), 1);
    assert_eq!(store.get_by_id(&id).unwrap().body, "b");
}

#[test]
fn delete_is_hard_and_second_delete_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = NoteStore::new(SqliteNoteRepository::try_new(&conn).unwrap());
    let id = store.create(new_note(None, "body", &[]), "u1").unwrap();

    store.delete_by_id(&id).unwrap();
    assert_eq!(note_count(&conn), 0);
    assert!(matches!(
        store.delete_by_id(&id),
        Err(NoteStoreError::NotFound(_))
    ));
    assert!(matches!(
        store.verify_owner(&id, "u1"),
        Err(NoteStoreError::NotFound(_))
    ));
}

#[test]
fn owner_verified_lifecycle_end_to_end() {
    let conn = open_db_in_memory().unwrap();
    let store = NoteStore::new(SqliteNoteRepository::try_new(&conn).unwrap());

    let id = store
        .create(new_note(Some("Shopping"), "milk, eggs", &["home"]), "u1")
        .unwrap();

    let note = store.get_by_id(&id).unwrap();
    assert_eq!(note.title, "Shopping");
    assert_eq!(note.owner, "u1");

    let denied = store.verify_owner(&id, "u2").unwrap_err();
    assert!(matches!(denied, NoteStoreError::Unauthorized(_)));
    assert_eq!(denied.status_code(), 403);

    store.verify_owner(&id, "u1").unwrap();
    store.delete_by_id(&id).unwrap();

    let gone = store.get_by_id(&id).unwrap_err();
    assert!(matches!(gone, NoteStoreError::NotFound(_)));
    assert_eq!(gone.status_code(), 404);
}
