use crate::extract::text_field;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored blog post as it is returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /` and `PATCH /{id}`. Fields are loosely typed on the wire so
/// that a missing or falsy field reaches the handler instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct BlogDraft {
    pub author: Option<Value>,
    pub title: Option<Value>,
    pub content: Option<Value>,
}

/// The user-supplied fields of a post, all known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogFields {
    pub author: String,
    pub title: String,
    pub content: String,
}

impl BlogDraft {
    pub fn into_fields(self) -> Option<BlogFields> {
        Some(BlogFields {
            author: text_field(self.author)?,
            title: text_field(self.title)?,
            content: text_field(self.content)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(author: Option<&str>, title: Option<&str>, content: Option<&str>) -> BlogDraft {
        BlogDraft {
            author: author.map(|v| json!(v)),
            title: title.map(|v| json!(v)),
            content: content.map(|v| json!(v)),
        }
    }

    #[test]
    fn complete_draft_yields_fields() {
        let fields = draft(Some("Will"), Some("Hello"), Some("World")).into_fields();
        assert_eq!(
            fields,
            Some(BlogFields {
                author: "Will".into(),
                title: "Hello".into(),
                content: "World".into(),
            })
        );
    }

    #[test]
    fn missing_or_empty_fields_are_rejected() {
        assert!(draft(None, Some("Hello"), Some("World")).into_fields().is_none());
        assert!(draft(Some("Will"), Some(""), Some("World")).into_fields().is_none());
        assert!(draft(Some("Will"), Some("Hello"), None).into_fields().is_none());
        assert!(BlogDraft::default().into_fields().is_none());
    }

    #[test]
    fn falsy_and_numeric_fields_follow_truthiness() {
        let falsy: BlogDraft =
            serde_json::from_value(json!({ "author": false, "title": "t", "content": "c" })).unwrap();
        assert!(falsy.into_fields().is_none());

        let numeric: BlogDraft =
            serde_json::from_value(json!({ "author": 7, "title": "t", "content": "c" })).unwrap();
        assert_eq!(numeric.into_fields().unwrap().author, "7");
    }

    #[test]
    fn post_serializes_with_store_style_keys() {
        let post = BlogPost {
            id: "1".into(),
            author: "Will".into(),
            title: "Hello".into(),
            content: "World".into(),
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        };
        let value = serde_json::to_value(&post).unwrap();
        assert_eq!(value["_id"], "1");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }
}
