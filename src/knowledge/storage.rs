//! SQLite storage for knowledge items
//!
//! One table, `knowledge_items`, keyed by a UUID stored as TEXT. Timestamps
//! are stored as UTC Unix milliseconds so range queries and ordering are
//! plain integer comparisons.

use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local, SubsecRound, TimeZone, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;
use uuid::Uuid;

use super::models::{normalize_title, KnowledgeItem};
use super::scheduler::{day_window, next_review_date};

#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Knowledge item not found: {0}")]
    NotFound(Uuid),

    #[error("Knowledge item {0} is being reviewed concurrently, try again")]
    Conflict(Uuid),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Attempts at the compare-and-swap review update before giving up
const MAX_REVIEW_ATTEMPTS: usize = 5;

const ITEM_COLUMNS: &str =
    "id, title, created_at, last_reviewed_at, review_count, next_review_date";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS knowledge_items (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL CHECK (length(trim(title)) > 0),
        created_at INTEGER NOT NULL,
        last_reviewed_at INTEGER NOT NULL,
        review_count INTEGER NOT NULL DEFAULT 0 CHECK (review_count >= 0),
        next_review_date INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_knowledge_items_next_review
        ON knowledge_items(next_review_date);
    CREATE INDEX IF NOT EXISTS idx_knowledge_items_created
        ON knowledge_items(created_at);
"#;

/// Parse a user-supplied item id
pub fn parse_item_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| KnowledgeError::Validation(format!("invalid knowledge item id: {}", raw)))
}

/// Store owning the connection to the knowledge database.
///
/// The connection is opened explicitly and released when the store is
/// dropped; nothing is cached between calls.
pub struct KnowledgeStore {
    conn: Connection,
}

impl KnowledgeStore {
    /// Open (or create) the database at `path` and make sure the table exists
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        log::debug!("Opened knowledge database at {:?}", path);
        Self::with_connection(conn)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        // The CLI and the server may share one database file
        conn.busy_timeout(Duration::from_secs(5))?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Create the table and indexes if they are missing. Safe to call repeatedly.
    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(SCHEMA)?;
        log::debug!("Knowledge table initialized");
        Ok(())
    }

    // ==================== Create ====================

    /// Add a new item due one day from now
    pub fn add(&self, title: &str) -> Result<KnowledgeItem> {
        self.add_at(title, &Local::now())
    }

    /// Add a new item as if created at `now`
    pub fn add_at<Tz: TimeZone>(
        &self,
        title: &str,
        now: &DateTime<Tz>,
    ) -> Result<KnowledgeItem> {
        let title = normalize_title(title)
            .ok_or_else(|| KnowledgeError::Validation("title must not be empty".to_string()))?;

        let now = now.clone().trunc_subsecs(3);
        let item = KnowledgeItem::new(title, &now);

        self.conn.execute(
            "INSERT INTO knowledge_items
                 (id, title, created_at, last_reviewed_at, review_count, next_review_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                item.id.to_string(),
                item.title,
                item.created_at.timestamp_millis(),
                item.last_reviewed_at.timestamp_millis(),
                item.review_count,
                item.next_review_date.timestamp_millis(),
            ],
        )?;

        log::debug!("Added knowledge item {} due {}", item.id, item.next_review_date);
        Ok(item)
    }

    // ==================== Read ====================

    /// Get a single item
    pub fn get(&self, id: Uuid) -> Result<KnowledgeItem> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM knowledge_items WHERE id = ?1", ITEM_COLUMNS),
                params![id.to_string()],
                item_from_row,
            )
            .optional()?
            .ok_or(KnowledgeError::NotFound(id))
    }

    /// All items, newest first
    pub fn list_all(&self) -> Result<Vec<KnowledgeItem>> {
        self.query_items(
            &format!(
                "SELECT {} FROM knowledge_items ORDER BY created_at DESC, rowid DESC",
                ITEM_COLUMNS
            ),
            params![],
        )
    }

    /// Items due today in the local time zone, earliest first
    pub fn list_due_today(&self) -> Result<Vec<KnowledgeItem>> {
        self.list_due_on(&Local::now())
    }

    /// Items due on the calendar day containing `reference`, in its time zone
    pub fn list_due_on<Tz: TimeZone>(
        &self,
        reference: &DateTime<Tz>,
    ) -> Result<Vec<KnowledgeItem>> {
        let (start, end) = day_window(reference);
        self.query_items(
            &format!(
                "SELECT {} FROM knowledge_items
                 WHERE next_review_date >= ?1 AND next_review_date < ?2
                 ORDER BY next_review_date ASC, rowid ASC",
                ITEM_COLUMNS
            ),
            params![start.timestamp_millis(), end.timestamp_millis()],
        )
    }

    fn query_items<P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> Result<Vec<KnowledgeItem>> {
        let mut stmt = self.conn.prepare(sql)?;
        let items = stmt
            .query_map(params, item_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    // ==================== Review ====================

    /// Record a review now and schedule the next one
    pub fn mark_reviewed(&self, id: Uuid) -> Result<KnowledgeItem> {
        self.mark_reviewed_at(id, &Local::now())
    }

    /// Record a review at `now` and schedule the next one.
    ///
    /// The update only applies if `review_count` is unchanged since it was
    /// read, so two concurrent reviews can never collapse into one.
    pub fn mark_reviewed_at<Tz: TimeZone>(
        &self,
        id: Uuid,
        now: &DateTime<Tz>,
    ) -> Result<KnowledgeItem> {
        let now = now.clone().trunc_subsecs(3);
        self.review_with_retries(id, |current| self.swap_review(current, &now))
    }

    /// Read the item and hand it to `swap` until a swap applies, at most
    /// `MAX_REVIEW_ATTEMPTS` times
    fn review_with_retries<F>(&self, id: Uuid, mut swap: F) -> Result<KnowledgeItem>
    where
        F: FnMut(&KnowledgeItem) -> Result<Option<KnowledgeItem>>,
    {
        for attempt in 1..=MAX_REVIEW_ATTEMPTS {
            let current = self.get(id)?;
            if let Some(updated) = swap(&current)? {
                log::debug!(
                    "Reviewed knowledge item {} ({} reviews), next due {}",
                    id,
                    updated.review_count,
                    updated.next_review_date
                );
                return Ok(updated);
            }
            log::warn!(
                "Review count of {} changed while reviewing (attempt {}), retrying",
                id,
                attempt
            );
        }

        Err(KnowledgeError::Conflict(id))
    }

    /// Apply a review to `current` if the stored review count still matches it.
    /// Returns `None` when the row changed or disappeared in the meantime.
    fn swap_review<Tz: TimeZone>(
        &self,
        current: &KnowledgeItem,
        now: &DateTime<Tz>,
    ) -> Result<Option<KnowledgeItem>> {
        let review_count = current.review_count + 1;
        let next = next_review_date(review_count, now).with_timezone(&Utc);
        let reviewed_at = now.with_timezone(&Utc);

        let updated = self
            .conn
            .query_row(
                &format!(
                    "UPDATE knowledge_items
                     SET last_reviewed_at = ?1, review_count = ?2, next_review_date = ?3
                     WHERE id = ?4 AND review_count = ?5
                     RETURNING {}",
                    ITEM_COLUMNS
                ),
                params![
                    reviewed_at.timestamp_millis(),
                    review_count,
                    next.timestamp_millis(),
                    current.id.to_string(),
                    current.review_count,
                ],
                item_from_row,
            )
            .optional()?;

        Ok(updated)
    }

    // ==================== Delete ====================

    /// Delete an item. Deleting an unknown id is not an error.
    pub fn delete(&self, id: Uuid) -> Result<()> {
        let removed = self.conn.execute(
            "DELETE FROM knowledge_items WHERE id = ?1",
            params![id.to_string()],
        )?;

        if removed == 0 {
            log::debug!("Knowledge item {} already absent, nothing to delete", id);
        } else {
            log::debug!("Deleted knowledge item {}", id);
        }
        Ok(())
    }
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<KnowledgeItem> {
    let id: String = row.get(0)?;
    let id = Uuid::parse_str(&id)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

    Ok(KnowledgeItem {
        id,
        title: row.get(1)?,
        created_at: timestamp_column(row, 2)?,
        last_reviewed_at: timestamp_column(row, 3)?,
        review_count: row.get(4)?,
        next_review_date: timestamp_column(row, 5)?,
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(idx)?;
    Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Integer,
            format!("timestamp out of range: {}", millis).into(),
        )
    })
}
