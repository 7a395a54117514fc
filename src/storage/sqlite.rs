//! SQLite storage backend

use super::traits::{DocumentStore, OpenStore, SetOptions, StorageError, StorageResult};
use crate::document::{shallow_merge, DocPath, Document};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed document store
///
/// Uses a single table keyed by the encoded document path, with the body
/// stored as JSON text. Thread-safe via internal mutex on the connection.
/// Merging writes run inside an immediate transaction so the read and the
/// write of one `set` call cannot interleave with another connection's.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                path TEXT PRIMARY KEY,
                body_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Readers do not block the writer
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Unavailable("sqlite connection mutex poisoned".to_string()))
    }

    fn read_document(conn: &Connection, path: &DocPath) -> StorageResult<Option<Document>> {
        let key = path.key();
        let body: Option<String> = conn
            .query_row(
                "SELECT body_json FROM documents WHERE path = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match body {
            Some(json) => match serde_json::from_str(&json)? {
                serde_json::Value::Object(document) => Ok(Some(document)),
                _ => Err(StorageError::NotADocument(key)),
            },
            None => Ok(None),
        }
    }

    fn write_document(conn: &Connection, path: &DocPath, document: &Document) -> StorageResult<()> {
        conn.execute(
            r#"
            INSERT INTO documents (path, body_json, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(path) DO UPDATE SET
                body_json = excluded.body_json,
                updated_at = excluded.updated_at
            "#,
            params![
                path.key(),
                serde_json::to_string(document)?,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn load(&self, path: &DocPath) -> StorageResult<Option<Document>> {
        let conn = self.lock()?;
        Self::read_document(&conn, path)
    }

    fn store(&self, path: &DocPath, document: Document, options: SetOptions) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let body = match Self::read_document(&tx, path)? {
            Some(mut existing) if options.merge => {
                shallow_merge(&mut existing, document);
                existing
            }
            _ => document,
        };
        Self::write_document(&tx, path, &body)?;

        tx.commit()?;
        Ok(())
    }

    fn remove(&self, path: &DocPath) -> StorageResult<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM documents WHERE path = ?1", params![path.key()])?;
        Ok(deleted > 0)
    }

    fn children(&self, collection: &DocPath) -> StorageResult<Vec<DocPath>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT path FROM documents
             WHERE substr(path, 1, length(?1) + 1) = ?1 || '/'
             ORDER BY path",
        )?;
        let keys = stmt
            .query_map(params![collection.key()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut paths = Vec::with_capacity(keys.len());
        for key in keys {
            let path = DocPath::parse(&key)?;
            // Only direct children; deeper documents share the prefix
            if path.len() == collection.len() + 1 {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn get(&self, path: &DocPath) -> StorageResult<Option<Document>> {
        self.load(path)
    }

    async fn set(&self, path: &DocPath, document: Document, options: SetOptions) -> StorageResult<()> {
        self.store(path, document, options)
    }

    async fn delete(&self, path: &DocPath) -> StorageResult<bool> {
        self.remove(path)
    }

    async fn list(&self, collection: &DocPath) -> StorageResult<Vec<DocPath>> {
        self.children(collection)
    }
}
