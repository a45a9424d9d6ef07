use pharmadesk_core::db::open_db_in_memory;
use pharmadesk_core::{
    NewNote, Note, NoteColor, NoteRepository, Priority, RepoError, SqliteNoteRepository, UserId,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

fn user(value: &str) -> UserId {
    UserId::new(value).unwrap()
}

fn note(owner: &str, title: &str, created_at: i64) -> Note {
    Note::create(user(owner), NewNote::new(title), created_at).unwrap()
}

#[test]
fn insert_and_find_by_id_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let mut stored = note("u1", "restock ibuprofen", 42);
    stored.content = "two boxes".to_string();
    stored.color = NoteColor::Green;
    stored.priority = Priority::High;
    let id = repo.insert(&stored).unwrap();

    let loaded = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(loaded, stored);
}

#[test]
fn find_by_id_returns_none_for_unknown_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    assert!(repo.find_by_id(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn owner_listing_is_scoped_and_ordered() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();

    let old_pinned = {
        let mut value = note("u1", "old pinned", 100);
        value.is_pinned = true;
        value
    };
    let newest = note("u1", "newest", 300);
    let middle = note("u1", "middle", 200);
    let foreign = note("u2", "foreign", 400);
    for value in [&old_pinned, &newest, &middle, &foreign] {
        repo.insert(value).unwrap();
    }

    let listed = repo.find_by_owner_sorted(&user("u1")).unwrap();
    let ids: Vec<_> = listed.iter().map(|value| value.id).collect();
    assert_eq!(ids, vec![old_pinned.id, newest.id, middle.id]);
    assert!(listed.iter().all(|value| value.owner == user("u1")));
}

#[test]
fn save_keeps_owner_and_creation_time() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let original = note("u1", "draft", 10);
    repo.insert(&original).unwrap();

    let mut changed = original.clone();
    changed.title = "final".to_string();
    changed.owner = user("intruder");
    changed.created_at = 999;
    repo.save(&changed).unwrap();

    let loaded = repo.find_by_id(original.id).unwrap().unwrap();
    assert_eq!(loaded.title, "final");
    assert_eq!(loaded.owner, user("u1"));
    assert_eq!(loaded.created_at, 10);
}

#[test]
fn save_and_delete_report_not_found_for_missing_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let ghost = note("u1", "ghost", 0);

    assert!(matches!(repo.save(&ghost), Err(RepoError::NotFound(id)) if id == ghost.id));
    assert!(matches!(
        repo.delete_by_id(ghost.id),
        Err(RepoError::NotFound(id)) if id == ghost.id
    ));
}

#[test]
fn delete_removes_row_permanently() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let stored = note("u1", "to remove", 0);
    repo.insert(&stored).unwrap();

    repo.delete_by_id(stored.id).unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn insert_rejects_invalid_note_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let mut invalid = note("u1", "valid", 0);
    invalid.title = " ".to_string();

    assert!(matches!(repo.insert(&invalid), Err(RepoError::Validation(_))));
}

#[test]
fn invalid_persisted_color_is_reported_not_masked() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let stored = note("u1", "tagged", 0);
    repo.insert(&stored).unwrap();
    conn.execute(
        "UPDATE notes SET color = 'magenta' WHERE uuid = ?1;",
        params![stored.id.to_string()],
    )
    .unwrap();

    let err = repo.find_by_id(stored.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("magenta")));
}

#[test]
fn invalid_persisted_title_is_invalid_data_not_validation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteNoteRepository::try_new(&conn).unwrap();
    let stored = note("u1", "readable", 0);
    repo.insert(&stored).unwrap();
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE notes SET title = '\t' WHERE uuid = ?1;",
        params![stored.id.to_string()],
    )
    .unwrap();

    let err = repo.find_by_id(stored.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("title")));
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}

#[test]
fn try_new_rejects_notes_table_missing_columns() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE notes (uuid TEXT PRIMARY KEY, owner_id TEXT);")
        .unwrap();
    let err = SqliteNoteRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::MissingRequiredColumn {
            table: "notes",
            column: "title"
        }
    ));
}
