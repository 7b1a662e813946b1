//! SQLite conversation store
//!
//! Two tables: `conversations(id, title, created_at, updated_at)` and
//! `messages(id, conversation_id, role, content, model_used, timestamp)`.
//! Timestamps are RFC 3339 text written by the application.

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::str::FromStr;
use teamgate_core::{Conversation, ConversationStore, Result, StoredMessage, TeamgateError};
use tracing::{debug, info};

fn db_err(e: sqlx::Error) -> TeamgateError {
    TeamgateError::storage(format!("SQLite error: {}", e))
}

// Fixed precision keeps text ordering equal to time ordering
fn now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// SQLite-backed chat history
pub struct SqliteConversationStore {
    pool: SqlitePool,
}

impl SqliteConversationStore {
    /// Open (creating if missing) the database at `database_url` and
    /// ensure the schema exists.
    ///
    /// `sqlite::memory:` and `:memory:` give a private in-memory database
    /// on a single connection.
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Opening SQLite chat history at: {}", database_url);

        let in_memory = database_url.contains(":memory:");
        let opts = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| TeamgateError::config(format!("Invalid SQLite URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        if !in_memory {
            ensure_parent_dir(opts.get_filename()).await?;
        }

        // Every connection to :memory: is a separate database
        let pool_opts = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_opts
            .connect_with(opts)
            .await
            .map_err(db_err)?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Wrap an existing pool; the schema is created if missing
    pub async fn from_pool(pool: SqlitePool) -> Result<Self> {
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        debug!("Initializing chat history schema...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS conversations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                conversation_id INTEGER NOT NULL REFERENCES conversations(id) ON DELETE CASCADE,
                role TEXT NOT NULL,
                content TEXT NOT NULL,
                model_used TEXT,
                timestamp TEXT NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_messages_conversation ON messages(conversation_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    /// Close the pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

async fn ensure_parent_dir(file: &Path) -> Result<()> {
    if let Some(parent) = file.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

fn row_to_conversation(row: &SqliteRow) -> Result<Conversation> {
    Ok(Conversation {
        id: row.try_get("id").map_err(db_err)?,
        title: row.try_get("title").map_err(db_err)?,
        created_at: row.try_get("created_at").map_err(db_err)?,
        updated_at: row.try_get("updated_at").map_err(db_err)?,
    })
}

fn row_to_message(row: &SqliteRow) -> Result<StoredMessage> {
    Ok(StoredMessage {
        id: row.try_get("id").map_err(db_err)?,
        conversation_id: row.try_get("conversation_id").map_err(db_err)?,
        role: row.try_get("role").map_err(db_err)?,
        content: row.try_get("content").map_err(db_err)?,
        model_used: row.try_get("model_used").map_err(db_err)?,
        timestamp: row.try_get("timestamp").map_err(db_err)?,
    })
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn create_conversation(&self, title: &str) -> Result<Conversation> {
        let ts = now();
        let result = sqlx::query(
            "INSERT INTO conversations (title, created_at, updated_at) VALUES (?, ?, ?)",
        )
        .bind(title)
        .bind(&ts)
        .bind(&ts)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        let id = result.last_insert_rowid();
        debug!(conversation_id = id, "conversation created");
        Ok(Conversation {
            id,
            title: title.to_string(),
            created_at: ts.clone(),
            updated_at: ts,
        })
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let rows = sqlx::query(
            "SELECT id, title, created_at, updated_at FROM conversations ORDER BY updated_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_conversation).collect()
    }

    async fn get_conversation(&self, id: i64) -> Result<Option<Conversation>> {
        let row = sqlx::query(
            "SELECT id, title, created_at, updated_at FROM conversations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(row_to_conversation).transpose()
    }

    async fn add_message(
        &self,
        conversation_id: i64,
        role: &str,
        content: &str,
        model_used: Option<&str>,
    ) -> Result<StoredMessage> {
        let ts = now();
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        let touched = sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
            .bind(&ts)
            .bind(conversation_id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        if touched.rows_affected() == 0 {
            return Err(TeamgateError::not_found(format!(
                "Conversation {} not found",
                conversation_id
            )));
        }

        let result = sqlx::query(
            "INSERT INTO messages (conversation_id, role, content, model_used, timestamp) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(conversation_id)
        .bind(role)
        .bind(content)
        .bind(model_used)
        .bind(&ts)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        Ok(StoredMessage {
            id: result.last_insert_rowid(),
            conversation_id,
            role: role.to_string(),
            content: content.to_string(),
            model_used: model_used.map(str::to_string),
            timestamp: ts,
        })
    }

    async fn messages(&self, conversation_id: i64) -> Result<Vec<StoredMessage>> {
        let rows = sqlx::query(
            "SELECT id, conversation_id, role, content, model_used, timestamp FROM messages WHERE conversation_id = ? ORDER BY id ASC",
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_message).collect()
    }

    async fn delete_conversation(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        sqlx::query("DELETE FROM messages WHERE conversation_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        let result = sqlx::query("DELETE FROM conversations WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        tx.commit().await.map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
