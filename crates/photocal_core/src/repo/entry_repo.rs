//! Photo entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide day-keyed CRUD APIs over the `photo_entries` index.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `PhotoEntry::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Saving over an existing day replaces the row, never duplicates it.
//!
//! # See also
//! - docs/architecture/data-model.md

use crate::db::{migrations::latest_version, DbError};
use crate::model::day::CalendarDay;
use crate::model::entry::{EntryValidationError, PhotoEntry};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const ENTRY_SELECT_SQL: &str = "SELECT
    day,
    image_filename,
    description
FROM photo_entries";

const ENTRIES_DEFAULT_LIMIT: u32 = 30;
const ENTRIES_LIMIT_MAX: u32 = 100;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entry persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntryValidationError),
    Db(DbError),
    NotFound(CalendarDay),
    InvalidData(String),
    /// Connection has not been migrated to the version this build expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(day) => write!(f, "no photo entry for day {day}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is not migrated: expected schema version {expected_version}, found {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntryValidationError> for RepoError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryListQuery {
    /// Restrict to one calendar month as `(year, month)`, month in 1..=12.
    /// A month outside that range matches nothing.
    pub month: Option<(i32, u32)>,
    /// Maximum rows to return. `None` returns every match (a single month
    /// holds at most 31); `Some` is clamped to 100 and 0 falls back to 30.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u32,
}

impl EntryListQuery {
    /// Query for every entry of one month, oldest day first.
    pub fn for_month(year: i32, month: u32) -> Self {
        Self {
            month: Some((year, month)),
            ..Self::default()
        }
    }
}

/// Repository interface for photo entry operations.
pub trait PhotoEntryRepository {
    /// Inserts the entry, or replaces the existing row for the same day.
    fn upsert_entry(&self, entry: &PhotoEntry) -> RepoResult<()>;
    /// Gets one entry by day.
    fn get_entry(&self, day: CalendarDay) -> RepoResult<Option<PhotoEntry>>;
    /// Lists entries ordered by day ascending.
    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<PhotoEntry>>;
    /// Rewrites only the caption of an existing entry.
    fn update_description(&self, day: CalendarDay, description: &str) -> RepoResult<()>;
}

/// SQLite-backed photo entry repository.
pub struct SqlitePhotoEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePhotoEntryRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// Fails fast when the connection was not opened through
    /// [`crate::db::open_db`], so schema drift is caught at the boundary
    /// instead of as a mid-operation SQL error.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PhotoEntryRepository for SqlitePhotoEntryRepository<'_> {
    fn upsert_entry(&self, entry: &PhotoEntry) -> RepoResult<()> {
        entry.validate()?;

        self.conn.execute(
            "INSERT INTO photo_entries (day, image_filename, description)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (day) DO UPDATE SET
                image_filename = excluded.image_filename,
                description = excluded.description,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                entry.day.to_string(),
                entry.image_filename.as_str(),
                entry.description.as_str(),
            ],
        )?;

        Ok(())
    }

    fn get_entry(&self, day: CalendarDay) -> RepoResult<Option<PhotoEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE day = ?1;"))?;

        let mut rows = stmt.query([day.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn list_entries(&self, query: &EntryListQuery) -> RepoResult<Vec<PhotoEntry>> {
        let mut sql = format!("{ENTRY_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some((year, month)) = query.month {
            // Day keys are canonical `YYYY-MM-DD` text, so one month is a
            // plain prefix match.
            sql.push_str(" AND day LIKE ?");
            bind_values.push(Value::Text(format!("{year:04}-{month:02}-%")));
        }

        sql.push_str(" ORDER BY day ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(normalize_entry_limit(limit))));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn update_description(&self, day: CalendarDay, description: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE photo_entries
             SET
                description = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE day = ?1;",
            params![day.to_string(), description],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(day));
        }

        Ok(())
    }
}

/// Normalizes a caller-provided list limit according to the entries contract.
pub fn normalize_entry_limit(limit: u32) -> u32 {
    match limit {
        0 => ENTRIES_DEFAULT_LIMIT,
        value if value > ENTRIES_LIMIT_MAX => ENTRIES_LIMIT_MAX,
        value => value,
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<PhotoEntry> {
    let day_text: String = row.get("day")?;
    let day = CalendarDay::from_str(&day_text).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid day value `{day_text}` in photo_entries.day: {err}"
        ))
    })?;

    let entry = PhotoEntry {
        day,
        image_filename: row.get("image_filename")?,
        description: row.get("description")?,
    };
    entry.validate()?;
    Ok(entry)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 =
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "photo_entries")? {
        return Err(RepoError::MissingRequiredTable("photo_entries"));
    }

    for column in [
        "day",
        "image_filename",
        "description",
        "created_at",
        "updated_at",
    ] {
        if !table_has_column(conn, "photo_entries", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "photo_entries",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
