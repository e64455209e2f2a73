use tokio_rusqlite::Connection;
use log::info;
use async_trait::async_trait;
use std::sync::Arc;

use super::{Statement, StorageAdapter, StorageError};

/// Where a `sqlite:///...` URI points.
enum DatabaseLocation {
    File(String),
    Memory,
}

fn parse_database_uri(uri: &str) -> Result<DatabaseLocation, StorageError> {
    let rest = uri
        .strip_prefix("sqlite://")
        .ok_or_else(|| StorageError::InvalidUri(uri.to_string()))?;

    // `sqlite:///name.db` is relative, `sqlite:////abs/name.db` absolute.
    match rest {
        ":memory:" => Ok(DatabaseLocation::Memory),
        path => match path.strip_prefix('/').unwrap_or(path) {
            "" => Err(StorageError::InvalidUri(uri.to_string())),
            path => Ok(DatabaseLocation::File(path.to_string())),
        },
    }
}

#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Connection>,
}

impl SqliteStorage {
    pub async fn new(database_uri: &str) -> Result<Self, StorageError> {
        let conn = match parse_database_uri(database_uri)? {
            DatabaseLocation::File(path) => Connection::open(path)
                .await
                .map_err(|e| StorageError::Connection(e.to_string()))?,
            DatabaseLocation::Memory => Connection::open_in_memory()
                .await
                .map_err(|e| StorageError::Connection(e.to_string()))?,
        };

        let storage = Self { conn: Arc::new(conn) };
        storage.initialize().await?;
        Ok(storage)
    }

    async fn initialize(&self) -> Result<(), StorageError> {
        self.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS statements (
                        id INTEGER PRIMARY KEY,
                        text TEXT NOT NULL,
                        in_response_to TEXT,
                        conversation TEXT NOT NULL,
                        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
                    );
                    CREATE INDEX IF NOT EXISTS idx_statements_in_response_to
                        ON statements(in_response_to);",
                )
            })
            .await?;

        info!("Statement storage initialized");
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn insert(&self, statement: Statement) -> Result<(), StorageError> {
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO statements (text, in_response_to, conversation) VALUES (?1, ?2, ?3)",
                    (
                        &statement.text,
                        &statement.in_response_to,
                        &statement.conversation,
                    ),
                )
            })
            .await?;

        Ok(())
    }

    async fn find_responses_to(&self, text: &str) -> Result<Vec<Statement>, StorageError> {
        let text = text.to_string();
        let result = self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT text, in_response_to, conversation
                     FROM statements
                     WHERE in_response_to = ?
                     ORDER BY created_at",
                )?;

                let rows = stmt.query_map([&text], |row| {
                    Ok(Statement {
                        text: row.get::<_, String>(0)?,
                        in_response_to: row.get::<_, Option<String>>(1)?,
                        conversation: row.get::<_, String>(2)?,
                    })
                })?;

                let mut statements = Vec::new();
                for row in rows {
                    statements.push(row?);
                }

                Ok(statements)
            })
            .await?;

        Ok(result)
    }

    async fn all_texts(&self) -> Result<Vec<String>, StorageError> {
        let result = self.conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT DISTINCT text FROM statements")?;

                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

                let mut texts = Vec::new();
                for row in rows {
                    texts.push(row?);
                }

                Ok(texts)
            })
            .await?;

        Ok(result)
    }

    async fn random_statement(&self) -> Result<Option<Statement>, StorageError> {
        let result = self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT text, in_response_to, conversation
                     FROM statements
                     ORDER BY RANDOM()
                     LIMIT 1",
                )?;

                let mut rows = stmt.query([])?;

                if let Some(row) = rows.next()? {
                    Ok(Some(Statement {
                        text: row.get::<_, String>(0)?,
                        in_response_to: row.get::<_, Option<String>>(1)?,
                        conversation: row.get::<_, String>(2)?,
                    }))
                } else {
                    Ok(None)
                }
            })
            .await?;

        Ok(result)
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let result = self.conn
            .call(|conn| {
                conn.query_row("SELECT COUNT(*) FROM statements", [], |row| {
                    row.get::<_, i64>(0)
                })
            })
            .await?;

        Ok(result as u64)
    }
}
