use super::{BlogStore, StoreError};
use crate::blog_post::{BlogFields, BlogPost};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

#[derive(sqlx::FromRow)]
struct BlogRow {
    id: i64,
    author: String,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BlogRow> for BlogPost {
    fn from(row: BlogRow) -> Self {
        BlogPost {
            id: row.id.to_string(),
            author: row.author,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let connect_options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let mut options = SqlitePoolOptions::new();
        if url.contains(":memory:") {
            // every connection would otherwise open its own empty database
            options = options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = options.connect_with(connect_options).await?;
        sqlx::query(
            r#"
                CREATE TABLE IF NOT EXISTS blogs (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    author TEXT NOT NULL,
                    title TEXT NOT NULL,
                    content TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
            "#,
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }
}

fn parse_id(id: &str) -> Result<i64, StoreError> {
    id.parse().map_err(|_| StoreError::InvalidId(id.to_string()))
}

#[async_trait]
impl BlogStore for SqliteStore {
    async fn list(&self) -> Result<Vec<BlogPost>, StoreError> {
        let rows: Vec<BlogRow> = sqlx::query_as(
            r#"
                SELECT id, author, title, content, created_at, updated_at
                FROM blogs
                ORDER BY id;
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(BlogPost::from).collect())
    }

    async fn find(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        let id = parse_id(id)?;
        let row: Option<BlogRow> = sqlx::query_as(
            r#"
                SELECT id, author, title, content, created_at, updated_at
                FROM blogs
                WHERE id = ?;
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(BlogPost::from))
    }

    async fn insert(&self, fields: BlogFields) -> Result<BlogPost, StoreError> {
        let now = Utc::now();
        let row: BlogRow = sqlx::query_as(
            r#"
                INSERT INTO blogs(author, title, content, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?)
                RETURNING id, author, title, content, created_at, updated_at
            "#,
        )
        .bind(fields.author)
        .bind(fields.title)
        .bind(fields.content)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update(&self, id: &str, fields: BlogFields) -> Result<Option<BlogPost>, StoreError> {
        let id = parse_id(id)?;
        let row: Option<BlogRow> = sqlx::query_as(
            r#"
                UPDATE blogs
                SET author = ?, title = ?, content = ?, updated_at = ?
                WHERE id = ?
                RETURNING id, author, title, content, created_at, updated_at
            "#,
        )
        .bind(fields.author)
        .bind(fields.title)
        .bind(fields.content)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(BlogPost::from))
    }

    async fn delete(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        let id = parse_id(id)?;
        let row: Option<BlogRow> = sqlx::query_as(
            r#"
                DELETE FROM blogs
                WHERE id = ?
                RETURNING id, author, title, content, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(BlogPost::from))
    }
}
