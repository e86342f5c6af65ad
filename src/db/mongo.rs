use super::{BlogStore, StoreError};
use crate::blog_post::{BlogFields, BlogPost};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use serde::{Deserialize, Serialize};

const DEFAULT_DATABASE: &str = "test";
const COLLECTION: &str = "blogs";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlogDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    author: String,
    title: String,
    content: String,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

fn to_chrono(at: bson::DateTime) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(at.timestamp_millis())
        .single()
        .unwrap_or_default()
}

impl From<BlogDocument> for BlogPost {
    fn from(document: BlogDocument) -> Self {
        BlogPost {
            id: document.id.to_hex(),
            author: document.author,
            title: document.title,
            content: document.content,
            created_at: to_chrono(document.created_at),
            updated_at: to_chrono(document.updated_at),
        }
    }
}

pub struct MongoStore {
    blogs: Collection<BlogDocument>,
}

impl MongoStore {
    /// Opens the client and pings the server so an unreachable store fails now
    /// instead of on the first request.
    pub async fn connect(url: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(url).await?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        database.run_command(doc! { "ping": 1 }).await?;
        tracing::debug!(database = %database.name(), "mongodb ping succeeded");
        Ok(Self {
            blogs: database.collection(COLLECTION),
        })
    }
}

fn parse_id(id: &str) -> Result<ObjectId, StoreError> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

#[async_trait]
impl BlogStore for MongoStore {
    async fn list(&self) -> Result<Vec<BlogPost>, StoreError> {
        let documents: Vec<BlogDocument> = self.blogs.find(doc! {}).await?.try_collect().await?;
        Ok(documents.into_iter().map(BlogPost::from).collect())
    }

    async fn find(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        let id = parse_id(id)?;
        let document = self.blogs.find_one(doc! { "_id": id }).await?;
        Ok(document.map(BlogPost::from))
    }

    async fn insert(&self, fields: BlogFields) -> Result<BlogPost, StoreError> {
        let now = bson::DateTime::now();
        let document = BlogDocument {
            id: ObjectId::new(),
            author: fields.author,
            title: fields.title,
            content: fields.content,
            created_at: now,
            updated_at: now,
        };
        self.blogs.insert_one(&document).await?;
        Ok(document.into())
    }

    async fn update(&self, id: &str, fields: BlogFields) -> Result<Option<BlogPost>, StoreError> {
        let id = parse_id(id)?;
        let changes = doc! {
            "$set": {
                "author": fields.author.as_str(),
                "title": fields.title.as_str(),
                "content": fields.content.as_str(),
                "updatedAt": bson::DateTime::now(),
            }
        };
        let document = self
            .blogs
            .find_one_and_update(doc! { "_id": id }, changes)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(document.map(BlogPost::from))
    }

    async fn delete(&self, id: &str) -> Result<Option<BlogPost>, StoreError> {
        let id = parse_id(id)?;
        let document = self.blogs.find_one_and_delete(doc! { "_id": id }).await?;
        Ok(document.map(BlogPost::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_converts_to_post() {
        let id = ObjectId::new();
        let created = bson::DateTime::from_millis(1_700_000_000_000);
        let post = BlogPost::from(BlogDocument {
            id,
            author: "Will".into(),
            title: "Hello".into(),
            content: "World".into(),
            created_at: created,
            updated_at: created,
        });

        assert_eq!(post.id, id.to_hex());
        assert_eq!(post.created_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(post.updated_at, post.created_at);
    }

    #[test]
    fn document_uses_timestamp_field_names() {
        let document = BlogDocument {
            id: ObjectId::new(),
            author: "Will".into(),
            title: "Hello".into(),
            content: "World".into(),
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
        };
        let raw = bson::to_document(&document).unwrap();
        assert!(raw.contains_key("_id"));
        assert!(raw.contains_key("createdAt"));
        assert!(raw.contains_key("updatedAt"));
    }

    #[test]
    fn malformed_object_id_is_invalid() {
        assert!(matches!(parse_id("not-an-id"), Err(StoreError::InvalidId(_))));
        assert!(parse_id("507f1f77bcf86cd799439011").is_ok());
    }
}
