use std::{str::FromStr, sync::Arc, time::Duration as StdDuration};

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow}, Pool, Row, Sqlite};

use crate::domain::{
    error::TodoResult,
    page::{Page, PageRequest},
    repository::TodoRepository,
    todo::{Todo, TodoId, TodoInput},
};

const COLUMNS: &str = "id, title, description, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteTodoRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteTodoRepository {
    pub async fn connect(database_url: &str) -> TodoResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(StdDuration::from_secs(5));
        let pool = if is_memory_url(database_url) {
            // Every in-memory connection is its own database; pin a single one for the pool's lifetime.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(options)
                .await?
        };
        Ok(Self { pool: Arc::new(pool) })
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoRepository {
    async fn init(&self) -> TodoResult<()> {
        sqlx::migrate!()
            .run(&*self.pool)
            .await
            .map_err(sqlx::Error::from)?;
        Ok(())
    }

    async fn create(&self, input: TodoInput) -> TodoResult<Todo> {
        let now = Utc::now();
        let id = TodoId::new();
        sqlx::query(
            "INSERT INTO todos (id, title, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(id.to_string())
        .bind(&input.title)
        .bind(&input.description)
        .bind(format_timestamp(now))
        .bind(format_timestamp(now))
        .execute(&*self.pool)
        .await?;
        Ok(Todo { id, title: input.title, description: input.description, created_at: now, updated_at: now })
    }

    async fn get(&self, id: TodoId) -> TodoResult<Option<Todo>> {
        let row = sqlx::query(&format!("SELECT {COLUMNS} FROM todos WHERE id = ?1"))
            .bind(id.to_string())
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(row_to_todo).transpose()?)
    }

    async fn list(&self, request: PageRequest) -> TodoResult<Page<Todo>> {
        let mut tx = self.pool.begin().await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&mut *tx)
            .await?;
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM todos ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2"
        ))
        .bind(i64::from(request.limit()))
        .bind(i64::try_from(request.offset()).unwrap_or(i64::MAX))
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        let items = rows.into_iter().map(row_to_todo).collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, request, u64::try_from(total).unwrap_or_default()))
    }

    async fn update(&self, id: TodoId, input: TodoInput) -> TodoResult<Option<Todo>> {
        // Each attempt is one guarded write statement, so no connection ever holds a read
        // lock while waiting for the write lock. The guard fails only when another writer
        // already moved `updated_at` past our stamp; re-read and try again.
        loop {
            let Some(current) = self.get(id).await? else { return Ok(None) };
            let stamp = format_timestamp(next_update_stamp(current.updated_at));
            let row = sqlx::query(&format!(
                "UPDATE todos SET title = ?2, description = ?3, updated_at = ?4
                 WHERE id = ?1 AND updated_at < ?4
                 RETURNING {COLUMNS}"
            ))
            .bind(id.to_string())
            .bind(&input.title)
            .bind(&input.description)
            .bind(&stamp)
            .fetch_optional(&*self.pool)
            .await?;
            if let Some(row) = row {
                return Ok(Some(row_to_todo(row)?));
            }
            tracing::debug!(%id, "concurrent update moved updated_at, retrying");
        }
    }

    async fn delete(&self, id: TodoId) -> TodoResult<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id.to_string())
            .execute(&*self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Creates the parent directory of a file-backed SQLite URL. The file itself is created on connect.
pub fn prepare_sqlite_file(database_url: &str) -> std::io::Result<()> {
    if is_memory_url(database_url) { return Ok(()); }
    let Some(path) = database_url.strip_prefix("sqlite://").or_else(|| database_url.strip_prefix("sqlite:")) else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() { std::fs::create_dir_all(parent)?; }
    }
    Ok(())
}

fn is_memory_url(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

/// Fixed-width so that lexical order in the store equals chronological order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// `updated_at` must move strictly forward even when the clock has not ticked.
fn next_update_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous { now } else { previous + Duration::nanoseconds(1) }
}

fn row_to_todo(row: SqliteRow) -> Result<Todo, sqlx::Error> {
    let id_str: String = row.try_get("id")?;
    let created_at_str: String = row.try_get("created_at")?;
    let updated_at_str: String = row.try_get("updated_at")?;

    Ok(Todo {
        id: TodoId::from_str(&id_str).map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        created_at: parse_timestamp(&created_at_str)?,
        updated_at: parse_timestamp(&updated_at_str)?,
    })
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
