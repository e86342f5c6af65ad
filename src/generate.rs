//! Drafts blog content with the configured text generator.

use crate::completion::TextGenerator;
use crate::error::{AppError, Result};
use crate::extract::{text_field, RequestBody};
use actix_web::{post, web, HttpResponse};
use ammonia::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    pub title: Option<Value>,
}

/// The JSON shape the model is asked to answer with.
#[derive(Debug, Deserialize, Serialize)]
pub struct GeneratedPost {
    pub content: String,
    pub summary: String,
    pub tags: Vec<String>,
}

fn build_prompt(title: &str) -> String {
    format!(
        r#"Write a blog post titled "{title}".
Respond with a single JSON object and nothing else, using exactly this shape:
{{"content": "<the full post as HTML using <h2>, <h3>, <p>, <ul>, <ol>, <li>, <strong> and <em>>", "summary": "<a plain-text summary of two or three sentences>", "tags": ["<tag>", "<tag>", "<tag>"]}}
The tags array must contain exactly three short lowercase tags."#
    )
}

fn sanitize_html(html: &str) -> String {
    let mut builder = Builder::default();
    builder
        .add_tags(&["img", "h1", "h2", "h3", "h4", "h5", "h6", "em", "strong", "ul", "ol", "li"])
        .add_tag_attributes("img", &["src", "alt", "title"]);
    builder.clean(html).to_string()
}

#[post("/generate-content")]
pub async fn generate_content(
    generator: web::Data<dyn TextGenerator>,
    request: RequestBody<GenerateRequest>,
) -> Result<HttpResponse> {
    let title = text_field(request.into_inner().title).ok_or(AppError::MissingTitle)?;
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::MissingTitle);
    }

    let raw = generator.complete(&build_prompt(title)).await?;
    let draft: GeneratedPost =
        serde_json::from_str(raw.trim()).map_err(|err| AppError::MalformedCompletion {
            message: err.to_string(),
            raw: raw.clone(),
        })?;

    tracing::info!(%title, tags = ?draft.tags, "content generated");
    Ok(HttpResponse::Ok().json(GeneratedPost {
        content: sanitize_html(&draft.content),
        summary: draft.summary,
        tags: draft.tags,
    }))
}
