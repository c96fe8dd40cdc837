use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use photocal_core::db::open_db_in_memory;
use photocal_core::{
    photo_filename, CalendarDay, PhotoEntry, PhotoEntryRepository, PhotoStore,
    SqlitePhotoEntryRepository, StoreError,
};
use rusqlite::Connection;
use std::io::Cursor;
use tempfile::TempDir;

#[test]
fn save_then_get_entry_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    let day = day("2026-08-14");
    let image = test_image(8, 8, 10);
    let saved = store.save_photo(&image, day, "morning hike").unwrap();

    assert_eq!(saved.day, day);
    assert_eq!(saved.image_filename, "photo-2026-08-14.png");
    assert_eq!(saved.description, "morning hike");

    let loaded = store.get_entry(day).unwrap().unwrap();
    assert_eq!(loaded, saved);
}

#[test]
fn saved_image_reads_back_pixel_identical() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    let day = day("2026-08-14");
    let image = test_image(8, 8, 42);
    store.save_photo(&image, day, "").unwrap();

    let loaded = store.get_image(day).unwrap();
    assert_eq!(loaded.to_rgb8().as_raw(), image.to_rgb8().as_raw());
}

#[test]
fn save_twice_overwrites_entry_and_image() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    let day = day("2026-08-14");
    store
        .save_photo(&test_image(8, 8, 1), day, "first photo")
        .unwrap();
    store
        .save_photo(&test_image(8, 8, 2), day, "second photo")
        .unwrap();

    let entry = store.get_entry(day).unwrap().unwrap();
    assert_eq!(entry.description, "second photo");

    let loaded = store.get_image(day).unwrap();
    assert_eq!(loaded.to_rgb8().get_pixel(0, 0)[0], 2);

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM photo_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn get_image_for_empty_day_is_none() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    assert!(store.get_image(day("2026-08-14")).is_none());
}

#[test]
fn missing_image_file_degrades_to_none() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    let day = day("2026-08-14");
    let saved = store.save_photo(&test_image(8, 8, 3), day, "vanishing").unwrap();

    let path = store.image_path(&saved.image_filename).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(store.get_image(day).is_none());
    // The index row is untouched; only the image read degrades.
    assert!(store.get_entry(day).unwrap().is_some());
}

#[test]
fn corrupt_image_file_degrades_to_none() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    let day = day("2026-08-14");
    let saved = store.save_photo(&test_image(8, 8, 4), day, "soon corrupt").unwrap();

    let path = store.image_path(&saved.image_filename).unwrap();
    std::fs::write(&path, b"these are not PNG bytes").unwrap();

    assert!(store.get_image(day).is_none());
}

#[test]
fn load_image_rejects_path_like_names() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    assert!(store.load_image("../../etc/passwd").is_none());
    assert!(store.load_image("").is_none());
}

#[test]
fn thumbnail_is_written_and_bounded() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    let day = day("2026-08-14");
    store
        .save_photo(&test_image(512, 300, 5), day, "wide shot")
        .unwrap();

    let thumb_path = store.thumbnail_path(day).unwrap();
    let (width, height) = image::image_dimensions(&thumb_path).unwrap();
    assert!(width <= 256 && height <= 256, "thumbnail {width}x{height} too large");
}

#[test]
fn thumbnail_path_is_none_before_any_save() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    assert!(store.thumbnail_path(day("2026-08-14")).is_none());
}

#[test]
fn save_removes_file_left_by_a_differently_named_entry() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    let day = day("2026-08-14");

    // Simulate an index row written by an older build that embedded a
    // random component in file names.
    let repo = SqlitePhotoEntryRepository::try_new(&conn).unwrap();
    repo.upsert_entry(&PhotoEntry::new(day, "img-93AF.png", "legacy"))
        .unwrap();
    let legacy_path = store.image_path("img-93AF.png").unwrap();
    test_image(4, 4, 6)
        .save_with_format(&legacy_path, ImageFormat::Png)
        .unwrap();

    store.save_photo(&test_image(4, 4, 7), day, "fresh").unwrap();

    assert!(!legacy_path.exists(), "legacy image file should be removed");
    let current = store.image_path(&photo_filename(day)).unwrap();
    assert!(current.is_file());
}

#[test]
fn save_description_updates_caption_and_keeps_image() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    let day = day("2026-08-14");
    store.save_photo(&test_image(8, 8, 8), day, "first words").unwrap();

    let updated = store.save_description(day, "better words").unwrap();
    assert_eq!(updated.description, "better words");

    let loaded = store.get_image(day).unwrap();
    assert_eq!(loaded.to_rgb8().get_pixel(0, 0)[0], 8);
}

#[test]
fn save_description_without_photo_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    let missing = day("2026-08-14");
    let err = store.save_description(missing, "caption").unwrap_err();
    assert!(matches!(err, StoreError::EntryNotFound(day) if day == missing));
}

#[test]
fn save_photo_bytes_accepts_encoded_images() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    let day = day("2026-08-14");
    let image = test_image(8, 8, 9);
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();

    let saved = store.save_photo_bytes(&bytes, day, "from picker").unwrap();
    assert_eq!(saved.image_filename, photo_filename(day));

    let loaded = store.get_image(day).unwrap();
    assert_eq!(loaded.to_rgb8().as_raw(), image.to_rgb8().as_raw());
}

#[test]
fn save_photo_bytes_rejects_undecodable_input() {
    let conn = open_db_in_memory().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = store_fixture(&conn, &dir);

    let err = store
        .save_photo_bytes(b"definitely not an image", day("2026-08-14"), "junk")
        .unwrap_err();
    assert!(matches!(err, StoreError::ImageDecode(_)));

    assert!(store.get_entry(day("2026-08-14")).unwrap().is_none());
}

fn day(text: &str) -> CalendarDay {
    text.parse().unwrap()
}

fn test_image(width: u32, height: u32, seed: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, move |x, y| {
        Rgb([seed, (x % 256) as u8, (y % 256) as u8])
    }))
}

fn store_fixture<'conn>(
    conn: &'conn Connection,
    dir: &TempDir,
) -> PhotoStore<SqlitePhotoEntryRepository<'conn>> {
    let repo = SqlitePhotoEntryRepository::try_new(conn).unwrap();
    PhotoStore::new(repo, dir.path()).unwrap()
}
