//! Blog post persistence.
//!
//! Handlers only see [`BlogStore`]; [`connect`] picks the backend from the
//! connection string.

use crate::blog_post::{BlogFields, BlogPost};
use async_trait::async_trait;
use std::sync::Arc;

pub mod mongo;
pub mod sqlite;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid blog id: {0}")]
    InvalidId(String),

    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),

    #[error(transparent)]
    Mongo(#[from] mongodb::error::Error),

    #[error(transparent)]
    Sqlite(#[from] sqlx::Error),
}

#[async_trait]
pub trait BlogStore: Send + Sync {
    async fn list(&self) -> Result<Vec<BlogPost>, StoreError>;

    async fn find(&self, id: &str) -> Result<Option<BlogPost>, StoreError>;

    async fn insert(&self, fields: BlogFields) -> Result<BlogPost, StoreError>;

    /// Replaces author, title and content. `None` when no post has `id`.
    async fn update(&self, id: &str, fields: BlogFields) -> Result<Option<BlogPost>, StoreError>;

    /// Removes the post and returns it. `None` when no post has `id`.
    async fn delete(&self, id: &str) -> Result<Option<BlogPost>, StoreError>;
}

pub async fn connect(url: &str) -> Result<Arc<dyn BlogStore>, StoreError> {
    if url.starts_with("mongodb://") || url.starts_with("mongodb+srv://") {
        Ok(Arc::new(mongo::MongoStore::connect(url).await?))
    } else if url.starts_with("sqlite:") {
        Ok(Arc::new(sqlite::SqliteStore::connect(url).await?))
    } else {
        Err(StoreError::UnsupportedUrl(url.to_string()))
    }
}
