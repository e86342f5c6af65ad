use crate::blog_post::BlogDraft;
use crate::db::BlogStore;
use crate::error::{AppError, Result};
use crate::extract::RequestBody;
use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde_json::json;

#[get("/")]
pub async fn list_blogs(store: web::Data<dyn BlogStore>) -> Result<HttpResponse> {
    let blogs = store.list().await?;
    if blogs.is_empty() {
        return Err(AppError::NoBlogs);
    }
    Ok(HttpResponse::Ok().json(json!({ "blogs": blogs })))
}

#[get("/{id}")]
pub async fn get_blog(
    store: web::Data<dyn BlogStore>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let blog = store.find(&id).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(json!({ "blog": blog })))
}

#[post("/")]
pub async fn create_blog(
    store: web::Data<dyn BlogStore>,
    draft: RequestBody<BlogDraft>,
) -> Result<HttpResponse> {
    let fields = draft.into_inner().into_fields().ok_or(AppError::MissingFields)?;
    let blog = store.insert(fields).await?;
    tracing::info!(id = %blog.id, "blog created");
    Ok(HttpResponse::Created().json(json!({
        "msg": "successfully created",
        "newBlog": blog,
    })))
}

#[patch("/{id}")]
pub async fn update_blog(
    store: web::Data<dyn BlogStore>,
    id: web::Path<String>,
    draft: RequestBody<BlogDraft>,
) -> Result<HttpResponse> {
    let fields = draft.into_inner().into_fields().ok_or(AppError::MissingFields)?;
    let blog = store.update(&id, fields).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(json!({
        "msg": "successfully updated blog",
        "blog": blog,
    })))
}

#[delete("/{id}")]
pub async fn delete_blog(
    store: web::Data<dyn BlogStore>,
    id: web::Path<String>,
) -> Result<HttpResponse> {
    let blog = store.delete(&id).await?.ok_or(AppError::NothingToDelete)?;
    tracing::info!(id = %blog.id, "blog deleted");
    Ok(HttpResponse::Ok().json(json!({
        "msg": "Deleted Blogs",
        "blog": blog,
    })))
}
