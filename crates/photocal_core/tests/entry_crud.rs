use photocal_core::db::migrations::latest_version;
use photocal_core::db::open_db_in_memory;
use photocal_core::{
    CalendarDay, EntryListQuery, PhotoEntry, PhotoEntryRepository, RepoError,
    SqlitePhotoEntryRepository,
};
use rusqlite::Connection;

#[test]
fn upsert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();

    let entry = entry_for("2026-08-14", "morning hike");
    repo.upsert_entry(&entry).unwrap();

    let loaded = repo.get_entry(entry.day).unwrap().unwrap();
    assert_eq!(loaded, entry);
}

#[test]
fn get_missing_day_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();

    let day = day("2026-08-14");
    assert_eq!(repo.get_entry(day).unwrap(), None);
}

#[test]
fn upsert_twice_replaces_the_previous_entry() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();

    let first = entry_for("2026-08-14", "first photo");
    repo.upsert_entry(&first).unwrap();

    let second = PhotoEntry::new(first.day, "photo-2026-08-14.png", "second photo");
    repo.upsert_entry(&second).unwrap();

    let loaded = repo.get_entry(first.day).unwrap().unwrap();
    assert_eq!(loaded.description, "second photo");

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM photo_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn upsert_replacement_refreshes_updated_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();

    let entry = entry_for("2026-08-14", "draft");
    repo.upsert_entry(&entry).unwrap();
    conn.execute("UPDATE photo_entries SET updated_at = 1000;", [])
        .unwrap();

    repo.upsert_entry(&entry).unwrap();

    let updated_at: i64 = conn
        .query_row(
            "SELECT updated_at FROM photo_entries WHERE day = '2026-08-14';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(updated_at > 1000);
}

#[test]
fn update_description_changes_only_the_caption() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();

    let entry = entry_for("2026-08-14", "old caption");
    repo.upsert_entry(&entry).unwrap();

    repo.update_description(entry.day, "new caption").unwrap();

    let loaded = repo.get_entry(entry.day).unwrap().unwrap();
    assert_eq!(loaded.description, "new caption");
    assert_eq!(loaded.image_filename, entry.image_filename);
}

#[test]
fn update_description_on_missing_day_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();

    let missing = day("2026-08-14");
    let err = repo.update_description(missing, "caption").unwrap_err();
    assert!(matches!(err, RepoError::NotFound(day) if day == missing));
}

#[test]
fn list_filters_by_month_and_orders_by_day() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();

    repo.upsert_entry(&entry_for("2026-08-20", "late august")).unwrap();
    repo.upsert_entry(&entry_for("2026-08-03", "early august")).unwrap();
    repo.upsert_entry(&entry_for("2026-07-31", "july")).unwrap();
    repo.upsert_entry(&entry_for("2025-08-14", "other year")).unwrap();

    let august = repo
        .list_entries(&EntryListQuery::for_month(2026, 8))
        .unwrap();

    assert_eq!(august.len(), 2);
    assert_eq!(august[0].day.to_string(), "2026-08-03");
    assert_eq!(august[1].day.to_string(), "2026-08-20");
}

#[test]
fn list_without_month_filter_returns_everything_in_day_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();

    repo.upsert_entry(&entry_for("2026-02-10", "b")).unwrap();
    repo.upsert_entry(&entry_for("2025-12-01", "a")).unwrap();
    repo.upsert_entry(&entry_for("2026-03-05", "c")).unwrap();

    let all = repo.list_entries(&EntryListQuery::default()).unwrap();
    let days: Vec<String> = all.iter().map(|entry| entry.day.to_string()).collect();
    assert_eq!(days, ["2025-12-01", "2026-02-10", "2026-03-05"]);
}

#[test]
fn list_pagination_with_limit_and_offset_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();

    repo.upsert_entry(&entry_for("2026-05-01", "a")).unwrap();
    repo.upsert_entry(&entry_for("2026-05-02", "b")).unwrap();
    repo.upsert_entry(&entry_for("2026-05-03", "c")).unwrap();
    repo.upsert_entry(&entry_for("2026-05-04", "d")).unwrap();

    let query = EntryListQuery {
        limit: Some(2),
        offset: 1,
        ..EntryListQuery::default()
    };
    let page = repo.list_entries(&query).unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].day.to_string(), "2026-05-02");
    assert_eq!(page[1].day.to_string(), "2026-05-03");
}

#[test]
fn list_pagination_with_offset_only_path_is_stable() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();

    repo.upsert_entry(&entry_for("2026-05-01", "a")).unwrap();
    repo.upsert_entry(&entry_for("2026-05-02", "b")).unwrap();
    repo.upsert_entry(&entry_for("2026-05-03", "c")).unwrap();

    let query = EntryListQuery {
        offset: 1,
        ..EntryListQuery::default()
    };
    let page = repo.list_entries(&query).unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page[0].day.to_string(), "2026-05-02");
    assert_eq!(page[1].day.to_string(), "2026-05-03");
}

#[test]
fn validation_failure_blocks_upsert() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();

    let invalid = PhotoEntry::new(day("2026-08-14"), "../escape.png", "bad");
    let err = repo.upsert_entry(&invalid).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM photo_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn read_rejects_tampered_day_key() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO photo_entries (day, image_filename, description)
         VALUES ('not-a-day', 'photo.png', 'bad row');",
        [],
    )
    .unwrap();

    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();
    let err = repo.list_entries(&EntryListQuery::default()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn read_rejects_tampered_filename() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO photo_entries (day, image_filename, description)
         VALUES ('2026-08-14', '../../etc/passwd', 'bad row');",
        [],
    )
    .unwrap();

    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();
    let err = repo.get_entry(day("2026-08-14")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqlitePhotoEntryRepository::try_new(&conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePhotoEntryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("photo_entries"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE photo_entries (
            day TEXT PRIMARY KEY NOT NULL,
            image_filename TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqlitePhotoEntryRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "photo_entries",
            column: "description"
        })
    ));
}

fn day(text: &str) -> CalendarDay {
    text.parse().unwrap()
}

fn entry_for(day_text: &str, description: &str) -> PhotoEntry {
    let day = day(day_text);
    PhotoEntry::new(
        day,
        format!("photo-{day}.png"),
        description,
    )
}
