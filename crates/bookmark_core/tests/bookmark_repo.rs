use bookmark_core::db::open_db_in_memory;
use bookmark_core::{
    BookmarkPatch, BookmarkRepository, BookmarkValidationError, NewBookmark, RepoError,
    SqliteBookmarkRepository, SqliteUserRepository, UserRepository,
};
use rusqlite::{params, Connection};

fn seed_user(conn: &Connection, email: &str) -> i64 {
    SqliteUserRepository::try_new(conn)
        .unwrap()
        .create_user(email)
        .unwrap()
        .id
}

#[test]
fn find_bookmark_ignores_owner_but_owned_lookup_does_not() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn, "owner@example.com");
    let other = seed_user(&conn, "other@example.com");
    let repo = SqliteBookmarkRepository::try_new(&conn).unwrap();

    let created = repo
        .create_bookmark(owner, &NewBookmark::new("t", "l"))
        .unwrap();

    assert!(repo.find_bookmark(created.id).unwrap().is_some());
    assert!(repo.find_owned_bookmark(owner, created.id).unwrap().is_some());
    assert!(repo.find_owned_bookmark(other, created.id).unwrap().is_none());
}

#[test]
fn update_and_delete_are_keyed_on_owner() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn, "owner@example.com");
    let other = seed_user(&conn, "other@example.com");
    let repo = SqliteBookmarkRepository::try_new(&conn).unwrap();
    let created = repo
        .create_bookmark(owner, &NewBookmark::new("t", "l"))
        .unwrap();

    let patch = BookmarkPatch {
        title: Some("x".to_string()),
        ..BookmarkPatch::default()
    };
    let err = repo.update_bookmark(other, created.id, &patch).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "bookmark", id } if id == created.id));

    let err = repo.delete_bookmark(other, created.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));

    let stored = repo.find_bookmark(created.id).unwrap().unwrap();
    assert_eq!(stored.title, "t");
    assert_eq!(stored.user_id, owner);
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn, "owner@example.com");
    let repo = SqliteBookmarkRepository::try_new(&conn).unwrap();

    let err = repo
        .create_bookmark(owner, &NewBookmark::new("title", ""))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(BookmarkValidationError::EmptyLink)
    ));

    let created = repo
        .create_bookmark(owner, &NewBookmark::new("title", "link"))
        .unwrap();
    let patch = BookmarkPatch {
        title: Some(String::new()),
        ..BookmarkPatch::default()
    };
    let err = repo.update_bookmark(owner, created.id, &patch).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(BookmarkValidationError::EmptyTitle)
    ));
}

#[test]
fn whitespace_only_title_and_link_are_stored_verbatim() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn, "owner@example.com");
    let repo = SqliteBookmarkRepository::try_new(&conn).unwrap();

    let created = repo
        .create_bookmark(owner, &NewBookmark::new(" ", "  "))
        .unwrap();
    assert_eq!(created.title, " ");
    assert_eq!(created.link, "  ");

    let patch = BookmarkPatch {
        title: Some("\t".to_string()),
        ..BookmarkPatch::default()
    };
    let updated = repo.update_bookmark(owner, created.id, &patch).unwrap();
    assert_eq!(updated.title, "\t");

    let listed = repo.list_bookmarks(owner).unwrap();
    assert_eq!(listed, vec![updated]);
}

#[test]
fn update_never_moves_updated_at_backwards() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn, "owner@example.com");
    let repo = SqliteBookmarkRepository::try_new(&conn).unwrap();
    let created = repo
        .create_bookmark(owner, &NewBookmark::new("t", "l"))
        .unwrap();

    let future = created.updated_at + 86_400_000;
    conn.execute(
        "UPDATE bookmarks SET updated_at = ?1 WHERE id = ?2;",
        params![future, created.id],
    )
    .unwrap();

    let updated = repo
        .update_bookmark(owner, created.id, &BookmarkPatch::default())
        .unwrap();
    assert_eq!(updated.updated_at, future);
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn, "owner@example.com");
    let repo = SqliteBookmarkRepository::try_new(&conn).unwrap();

    let first = repo
        .create_bookmark(owner, &NewBookmark::new("t", "l"))
        .unwrap();
    repo.delete_bookmark(owner, first.id).unwrap();
    let second = repo
        .create_bookmark(owner, &NewBookmark::new("t", "l"))
        .unwrap();
    assert!(second.id > first.id);
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteBookmarkRepository::try_new(&conn)
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(err, RepoError::MissingRequiredTable("users")));
}

#[test]
fn invalid_persisted_rows_are_reported() {
    let conn = open_db_in_memory().unwrap();
    let owner = seed_user(&conn, "owner@example.com");
    let repo = SqliteBookmarkRepository::try_new(&conn).unwrap();
    let created = repo
        .create_bookmark(owner, &NewBookmark::new("t", "l"))
        .unwrap();

    // Bypass the CHECK constraint to simulate a corrupted row.
    conn.execute_batch("PRAGMA ignore_check_constraints = ON;")
        .unwrap();
    conn.execute(
        "UPDATE bookmarks SET title = '' WHERE id = ?1;",
        [created.id],
    )
    .unwrap();

    let err = repo.find_bookmark(created.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
