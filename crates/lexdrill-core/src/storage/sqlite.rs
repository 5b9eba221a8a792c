//! SQLite Storage Implementation
//!
//! The durable item store. Separate reader/writer connections behind
//! mutexes give interior mutability: all methods take `&self`, so the store
//! is `Send + Sync` and the session layer can hold an `Arc<SqliteStore>`
//! while the prefetch task reads concurrently.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};

use crate::srs::ReviewOutcome;
use crate::storage::{ItemStore, Result, StoreError};
use crate::vocab::{DeckStats, SynonymEntry, VocabularyItem, DEFAULT_EASE_FACTOR};

const ITEM_COLUMNS: &str = "id, word, definition,
    synonym1_text, synonym1_definition, synonym1_example,
    synonym2_text, synonym2_definition, synonym2_example,
    synonym3_text, synonym3_definition, synonym3_example,
    is_bookmarked, times_reviewed, times_correct, ease_factor,
    interval, repetition_count, last_reviewed, next_review_date, quality";

/// Parse seed data: a JSON array of items, learning fields defaulted
pub fn load_seed_json(json: &str) -> Result<Vec<VocabularyItem>> {
    serde_json::from_str(json).map_err(|e| StoreError::Init(format!("invalid seed data: {e}")))
}

// ============================================================================
// STORE
// ============================================================================

/// SQLite-backed item store
pub struct SqliteStore {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
}

impl SqliteStore {
    /// Apply PRAGMAs to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    }

    /// Open (or create) a store. `None` uses the platform data directory.
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => {
                let proj_dirs = ProjectDirs::from("com", "lexdrill", "core").ok_or_else(|| {
                    StoreError::Init("Could not determine project directories".to_string())
                })?;
                let data_dir = proj_dirs.data_dir();
                std::fs::create_dir_all(data_dir)?;
                data_dir.join("lexdrill.db")
            }
        };

        let writer_conn = Connection::open(&path)?;
        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        super::migrations::apply_migrations(&writer_conn)?;

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
        })
    }

    fn reader(&self) -> Result<MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StoreError::Init("Reader lock poisoned".into()))
    }

    fn writer(&self) -> Result<MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StoreError::Init("Writer lock poisoned".into()))
    }

    /// Convert a row to VocabularyItem
    fn row_to_item(row: &rusqlite::Row) -> rusqlite::Result<VocabularyItem> {
        Ok(VocabularyItem {
            id: row.get("id")?,
            word: row.get("word")?,
            definition: row.get("definition")?,
            synonyms: [
                SynonymEntry {
                    text: row.get("synonym1_text")?,
                    definition: row.get("synonym1_definition")?,
                    example: row.get("synonym1_example")?,
                },
                SynonymEntry {
                    text: row.get("synonym2_text")?,
                    definition: row.get("synonym2_definition")?,
                    example: row.get("synonym2_example")?,
                },
                SynonymEntry {
                    text: row.get("synonym3_text")?,
                    definition: row.get("synonym3_definition")?,
                    example: row.get("synonym3_example")?,
                },
            ],
            is_bookmarked: row.get("is_bookmarked")?,
            times_reviewed: row.get("times_reviewed")?,
            times_correct: row.get("times_correct")?,
            ease_factor: row.get("ease_factor")?,
            interval: row.get("interval")?,
            repetition_count: row.get("repetition_count")?,
            last_reviewed: row.get("last_reviewed")?,
            next_review_date: row.get("next_review_date")?,
            quality: row.get("quality")?,
        })
    }

    fn query_items(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<VocabularyItem>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(sql)?;
        let rows = stmt.query_map(params, |row| Self::row_to_item(row))?;

        let mut items = Vec::new();
        for item in rows {
            items.push(item?);
        }
        Ok(items)
    }

    /// Seed-data load: insert items that are not present yet, keyed by id.
    /// Returns the number of rows actually inserted.
    pub fn import_items(&self, items: &[VocabularyItem]) -> Result<usize> {
        let writer = self.writer()?;
        let mut inserted = 0;
        for item in items {
            inserted += writer.execute(
                "INSERT OR IGNORE INTO vocabulary_items (
                    id, word, definition,
                    synonym1_text, synonym1_definition, synonym1_example,
                    synonym2_text, synonym2_definition, synonym2_example,
                    synonym3_text, synonym3_definition, synonym3_example,
                    is_bookmarked, times_reviewed, times_correct, ease_factor,
                    interval, repetition_count, last_reviewed, next_review_date, quality
                ) VALUES (
                    ?1, ?2, ?3,
                    ?4, ?5, ?6,
                    ?7, ?8, ?9,
                    ?10, ?11, ?12,
                    ?13, ?14, ?15, ?16,
                    ?17, ?18, ?19, ?20, ?21
                )",
                params![
                    item.id,
                    item.word,
                    item.definition,
                    item.synonyms[0].text,
                    item.synonyms[0].definition,
                    item.synonyms[0].example,
                    item.synonyms[1].text,
                    item.synonyms[1].definition,
                    item.synonyms[1].example,
                    item.synonyms[2].text,
                    item.synonyms[2].definition,
                    item.synonyms[2].example,
                    item.is_bookmarked,
                    item.times_reviewed,
                    item.times_correct,
                    item.ease_factor,
                    item.interval,
                    item.repetition_count,
                    item.last_reviewed,
                    item.next_review_date,
                    item.quality,
                ],
            )?;
        }
        tracing::info!(inserted, total = items.len(), "seed items imported");
        Ok(inserted)
    }
}

impl ItemStore for SqliteStore {
    fn get_all(&self) -> Result<Vec<VocabularyItem>> {
        self.query_items(
            &format!("SELECT {ITEM_COLUMNS} FROM vocabulary_items"),
            [],
        )
    }

    fn get_by_id(&self, id: i64) -> Result<Option<VocabularyItem>> {
        let reader = self.reader()?;
        let mut stmt = reader.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM vocabulary_items WHERE id = ?1"
        ))?;
        let item = stmt
            .query_row(params![id], |row| Self::row_to_item(row))
            .optional()?;
        Ok(item)
    }

    fn get_overdue(&self, now_ms: i64) -> Result<Vec<VocabularyItem>> {
        self.query_items(
            &format!(
                "SELECT {ITEM_COLUMNS} FROM vocabulary_items
                 WHERE next_review_date > 0 AND next_review_date <= ?1"
            ),
            params![now_ms],
        )
    }

    fn get_unseen(&self) -> Result<Vec<VocabularyItem>> {
        // No ORDER BY: unseen selection is arbitrary by design
        self.query_items(
            &format!("SELECT {ITEM_COLUMNS} FROM vocabulary_items WHERE times_reviewed = 0"),
            [],
        )
    }

    fn get_random(&self, n: usize, exclude: Option<i64>) -> Result<Vec<VocabularyItem>> {
        self.query_items(
            &format!(
                "SELECT {ITEM_COLUMNS} FROM vocabulary_items
                 WHERE (?1 IS NULL OR id != ?1)
                 ORDER BY RANDOM() LIMIT ?2"
            ),
            params![exclude, n as i64],
        )
    }

    fn get_bookmarked(&self) -> Result<Vec<VocabularyItem>> {
        self.query_items(
            &format!("SELECT {ITEM_COLUMNS} FROM vocabulary_items WHERE is_bookmarked = 1"),
            [],
        )
    }

    fn get_random_bookmarked(&self, n: usize, exclude: Option<i64>) -> Result<Vec<VocabularyItem>> {
        self.query_items(
            &format!(
                "SELECT {ITEM_COLUMNS} FROM vocabulary_items
                 WHERE is_bookmarked = 1 AND (?1 IS NULL OR id != ?1)
                 ORDER BY RANDOM() LIMIT ?2"
            ),
            params![exclude, n as i64],
        )
    }

    fn apply_review_outcome(&self, id: i64, outcome: &ReviewOutcome) -> Result<VocabularyItem> {
        let changed = {
            let writer = self.writer()?;
            writer.execute(
                "UPDATE vocabulary_items SET
                    times_reviewed = times_reviewed + 1,
                    times_correct = times_correct + ?1,
                    ease_factor = ?2,
                    interval = ?3,
                    repetition_count = ?4,
                    last_reviewed = ?5,
                    next_review_date = ?6,
                    quality = ?7
                WHERE id = ?8",
                params![
                    outcome.was_correct as i64,
                    outcome.ease_factor,
                    outcome.interval,
                    outcome.repetition_count,
                    outcome.reviewed_at,
                    outcome.next_review_date,
                    outcome.quality as i64,
                    id,
                ],
            )?
        };
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.get_by_id(id)?.ok_or(StoreError::NotFound(id))
    }

    fn set_bookmark(&self, id: i64, bookmarked: bool) -> Result<()> {
        let changed = self.writer()?.execute(
            "UPDATE vocabulary_items SET is_bookmarked = ?1 WHERE id = ?2",
            params![bookmarked, id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn reset_all_learning_state(&self) -> Result<()> {
        let reset = self.writer()?.execute(
            "UPDATE vocabulary_items SET
                times_reviewed = 0,
                times_correct = 0,
                ease_factor = ?1,
                interval = 0,
                repetition_count = 0,
                last_reviewed = 0,
                next_review_date = 0,
                quality = 0",
            params![DEFAULT_EASE_FACTOR],
        )?;
        tracing::info!(items = reset, "learning state reset");
        Ok(())
    }

    fn get_stats(&self) -> Result<DeckStats> {
        let now_ms = Utc::now().timestamp_millis();
        let reader = self.reader()?;
        let stats = reader.query_row(
            "SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN next_review_date > 0 AND next_review_date <= ?1 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN times_reviewed = 0 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(is_bookmarked), 0),
                COALESCE(AVG(ease_factor), 0.0),
                COALESCE(SUM(times_reviewed), 0),
                COALESCE(SUM(times_correct), 0)
             FROM vocabulary_items",
            params![now_ms],
            |row| {
                Ok(DeckStats {
                    total_items: row.get(0)?,
                    due_for_review: row.get(1)?,
                    unseen: row.get(2)?,
                    bookmarked: row.get(3)?,
                    average_ease: row.get(4)?,
                    reviews_total: row.get(5)?,
                    correct_total: row.get(6)?,
                })
            },
        )?;
        Ok(stats)
    }

    fn count_reviewed_since(&self, since_ms: i64) -> Result<i64> {
        let reader = self.reader()?;
        let count = reader.query_row(
            "SELECT COUNT(*) FROM vocabulary_items WHERE last_reviewed >= ?1 AND last_reviewed > 0",
            params![since_ms],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

// ============================================================================
// TESTS
// ============================================================================
