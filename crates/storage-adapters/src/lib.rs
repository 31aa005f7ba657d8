//! # storage-adapters
//!
//! SQLite implementation of the `TakeStore` port. Maps between the
//! relational rows and the strict `Take` domain shape, applying defaults
//! for anything missing at the boundary.
//!
//! Votes live as plain integer columns bumped with `SET c = c + 1`, and
//! comments live in their own autoincrement-ordered table, so both
//! mutations are atomic inside the engine — no client-side
//! read-modify-write, no lost updates under concurrent sessions.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{bail, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{NewTake, Take, TakeStore, VoteChoice, Votes};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS takes (
    id          BLOB PRIMARY KEY,
    text        TEXT NOT NULL,
    yes_votes   INTEGER NOT NULL DEFAULT 0,
    no_votes    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    is_flagged  INTEGER NOT NULL DEFAULT 0,
    flag_reason TEXT NOT NULL DEFAULT ''
);
CREATE TABLE IF NOT EXISTS comments (
    seq     INTEGER PRIMARY KEY AUTOINCREMENT,
    take_id BLOB NOT NULL,
    body    TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_comments_take ON comments (take_id, seq);
";

pub struct SqliteTakeStore {
    pool: SqlitePool,
}

// Helpers for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

impl SqliteTakeStore {
    /// Opens (creating if missing) the database at `url` and bootstraps
    /// the schema.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid sqlite url: {url}"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("failed to open sqlite database")?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .context("failed to bootstrap takes schema")?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl TakeStore for SqliteTakeStore {
    /// Assigns the id and the canonical timestamp on the store side, like
    /// any managed document store would.
    async fn insert(&self, new: NewTake) -> anyhow::Result<Uuid> {
        let id = Uuid::now_v7();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO takes (id, text, yes_votes, no_votes, created_at, is_flagged, flag_reason)
             VALUES (?, ?, 0, 0, ?, ?, ?)",
        )
        .bind(uuid_to_blob(id))
        .bind(&new.text)
        .bind(created_at)
        .bind(new.is_flagged)
        .bind(&new.flag_reason)
        .execute(&self.pool)
        .await?;

        tracing::debug!(%id, flagged = new.is_flagged, "inserted take");
        Ok(id)
    }

    /// Single in-engine UPDATE; concurrent votes from other sessions can
    /// never be lost to interleaving.
    async fn increment_vote(&self, id: Uuid, choice: VoteChoice) -> anyhow::Result<()> {
        let sql = match choice {
            VoteChoice::Yes => "UPDATE takes SET yes_votes = yes_votes + 1 WHERE id = ?",
            VoteChoice::No => "UPDATE takes SET no_votes = no_votes + 1 WHERE id = ?",
        };
        let result = sqlx::query(sql)
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            bail!("take {id} not found");
        }
        Ok(())
    }

    /// Appends via a guarded INSERT ... SELECT so a comment can never land
    /// on a nonexistent take; autoincrement `seq` totally orders appends.
    async fn append_comment(&self, id: Uuid, text: &str) -> anyhow::Result<()> {
        let result = sqlx::query(
            "INSERT INTO comments (take_id, body)
             SELECT id, ? FROM takes WHERE id = ?",
        )
        .bind(text)
        .bind(uuid_to_blob(id))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            bail!("take {id} not found");
        }
        Ok(())
    }

    /// Full scan, comments stitched back in append order, timestamps
    /// normalized to UTC.
    async fn list_all(&self) -> anyhow::Result<Vec<Take>> {
        let comment_rows = sqlx::query("SELECT take_id, body FROM comments ORDER BY seq ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut comments_by_take: HashMap<Uuid, Vec<String>> = HashMap::new();
        for row in comment_rows {
            let take_id = blob_to_uuid(row.get::<Vec<u8>, _>("take_id").as_slice());
            comments_by_take
                .entry(take_id)
                .or_default()
                .push(row.get("body"));
        }

        let rows = sqlx::query(
            "SELECT id, text, yes_votes, no_votes, created_at, is_flagged, flag_reason FROM takes",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice());
                Take {
                    id,
                    text: row.get("text"),
                    votes: Votes {
                        yes: row.get::<i64, _>("yes_votes").max(0) as u64,
                        no: row.get::<i64, _>("no_votes").max(0) as u64,
                    },
                    comments: comments_by_take.remove(&id).unwrap_or_default(),
                    created_at: row.get::<DateTime<Utc>, _>("created_at"),
                    is_flagged: row.get("is_flagged"),
                    flag_reason: row.get("flag_reason"),
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn file_backed_store() -> (tempfile::TempDir, Arc<SqliteTakeStore>) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("takes.db").display());
        let store = SqliteTakeStore::new(&url).await.unwrap();
        (dir, Arc::new(store))
    }

    fn new_take(text: &str) -> NewTake {
        NewTake {
            text: text.to_string(),
            is_flagged: false,
            flag_reason: String::new(),
        }
    }

    #[tokio::test]
    async fn insert_then_list_round_trips_all_fields() {
        let (_dir, store) = file_backed_store().await;

        let id = store
            .insert(NewTake {
                text: "Defense wins championships".to_string(),
                is_flagged: true,
                flag_reason: "negativity".to_string(),
            })
            .await
            .unwrap();

        let takes = store.list_all().await.unwrap();
        assert_eq!(takes.len(), 1);
        let take = &takes[0];
        assert_eq!(take.id, id);
        assert_eq!(take.text, "Defense wins championships");
        assert!(take.is_flagged);
        assert_eq!(take.flag_reason, "negativity");
        assert_eq!(take.votes, Votes::default());
        assert!(take.comments.is_empty());
    }

    #[tokio::test]
    async fn concurrent_yes_votes_all_land() {
        let (_dir, store) = file_backed_store().await;
        let id = store.insert(new_take("clutch gene is real")).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.increment_vote(id, VoteChoice::Yes).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let takes = store.list_all().await.unwrap();
        assert_eq!(takes[0].votes, Votes { yes: 20, no: 0 });
    }

    #[tokio::test]
    async fn comments_come_back_in_append_order() {
        let (_dir, store) = file_backed_store().await;
        let id = store.insert(new_take("ring counting is lazy")).await.unwrap();
        let other = store.insert(new_take("another")).await.unwrap();

        store.append_comment(id, "agree").await.unwrap();
        store.append_comment(other, "interleaved").await.unwrap();
        store.append_comment(id, "disagree").await.unwrap();
        store.append_comment(id, "undecided").await.unwrap();

        let takes = store.list_all().await.unwrap();
        let take = takes.iter().find(|t| t.id == id).unwrap();
        assert_eq!(take.comments, vec!["agree", "disagree", "undecided"]);
        let other_take = takes.iter().find(|t| t.id == other).unwrap();
        assert_eq!(other_take.comments, vec!["interleaved"]);
    }

    #[tokio::test]
    async fn mutations_against_unknown_id_are_errors() {
        let (_dir, store) = file_backed_store().await;
        let missing = Uuid::now_v7();

        assert!(store.increment_vote(missing, VoteChoice::No).await.is_err());
        assert!(store.append_comment(missing, "ghost").await.is_err());
    }

    #[tokio::test]
    async fn created_at_is_assigned_by_the_store_and_monotonic_enough() {
        let (_dir, store) = file_backed_store().await;
        let before = Utc::now();
        store.insert(new_take("timestamped")).await.unwrap();
        let after = Utc::now();

        let takes = store.list_all().await.unwrap();
        assert!(takes[0].created_at >= before);
        assert!(takes[0].created_at <= after);
    }
}
