/// Post handlers - create, read, update, delete, upload and the personalised feed
use crate::config::UploadConfig;
use crate::error::{AppError, Result};
use crate::models::{CreatePostRequest, FeedQuery, Post, UpdatePostRequest, UploadResponse};
use crate::repository::{PostRepository, UserRepository};
use crate::services::RankingService;
use actix_middleware::Principal;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures::StreamExt;
use sqlx::PgPool;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

fn ensure_author(post: &Post, principal: &Principal) -> Result<()> {
    if post.user_id != Some(principal.user_id) {
        return Err(AppError::Forbidden("only the author can modify this post".into()));
    }
    Ok(())
}

/// Create a new post authored by the caller
pub async fn create_post(
    pool: web::Data<PgPool>,
    principal: Principal,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;

    UserRepository::new(pool.get_ref().clone())
        .ensure(principal.user_id, &principal.username, principal.email.as_deref())
        .await?;
    let post = PostRepository::new(pool.get_ref().clone())
        .create(principal.user_id, &req)
        .await?;

    info!(user_id = %principal.user_id, post_id = %post.id, category = %post.category, "post created");
    Ok(HttpResponse::Created().json(post))
}

/// All posts the caller may see, newest first
pub async fn list_posts(pool: web::Data<PgPool>, principal: Principal) -> Result<HttpResponse> {
    let posts = PostRepository::new(pool.get_ref().clone())
        .list_visible(principal.user_id)
        .await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// Personalised feed page
pub async fn get_feed(
    ranking: web::Data<RankingService>,
    principal: Principal,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse> {
    debug!(user_id = %principal.user_id, page = ?query.page, size = ?query.size, "feed request");
    let feed = ranking.feed(&principal, query.page, query.size).await?;
    Ok(HttpResponse::Ok().json(feed))
}

pub async fn get_post(
    pool: web::Data<PgPool>,
    principal: Principal,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = PostRepository::new(pool.get_ref().clone())
        .find_by_id(*post_id)
        .await?
        .filter(|p| !p.is_private || p.user_id == Some(principal.user_id))
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;

    Ok(HttpResponse::Ok().json(post))
}

pub async fn update_post(
    pool: web::Data<PgPool>,
    principal: Principal,
    post_id: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let repo = PostRepository::new(pool.get_ref().clone());

    let existing = repo
        .find_by_id(*post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
    ensure_author(&existing, &principal)?;

    let post = repo
        .update(*post_id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post together with its likes and comments
pub async fn delete_post(
    pool: web::Data<PgPool>,
    principal: Principal,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let repo = PostRepository::new(pool.get_ref().clone());

    let existing = repo
        .find_by_id(*post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {}", post_id)))?;
    ensure_author(&existing, &principal)?;

    repo.delete(*post_id).await?;
    info!(user_id = %principal.user_id, post_id = %post_id, "post deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Coarse media type from a MIME type; only images and videos are accepted.
fn media_kind(mime_type: &str) -> Option<&'static str> {
    match mime_type.split('/').next() {
        Some("image") => Some("image"),
        Some("video") => Some("video"),
        _ => None,
    }
}

fn file_extension(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
}

/// Store uploaded media files and return their public URLs.
///
/// Either every file in the request is kept or none is.
pub async fn upload_media(
    principal: Principal,
    upload: web::Data<UploadConfig>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    tokio::fs::create_dir_all(&upload.dir).await?;

    let mut stored = Vec::new();
    match receive_files(&upload, &mut payload, &mut stored).await {
        Ok(response) => {
            info!(user_id = %principal.user_id, files = response.media_urls.len(), "media uploaded");
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            discard(&stored).await;
            Err(e)
        }
    }
}

/// Writes each multipart field to disk. Paths are pushed to `stored`
/// before the file is created so partial writes can be cleaned up.
async fn receive_files(
    upload: &UploadConfig,
    payload: &mut Multipart,
    stored: &mut Vec<PathBuf>,
) -> Result<UploadResponse> {
    let mut response = UploadResponse {
        media_urls: Vec::new(),
        media_types: Vec::new(),
    };

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(format!("invalid multipart body: {}", e)))?;

        let mime_type = field.content_type().map(|m| m.essence_str().to_string()).unwrap_or_default();
        let kind = media_kind(&mime_type)
            .ok_or_else(|| AppError::BadRequest(format!("unsupported media type '{}'", mime_type)))?;
        let ext = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .and_then(file_extension)
            .unwrap_or_else(|| "bin".to_string());

        let stored_name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = upload.dir.join(&stored_name);
        stored.push(path.clone());
        let mut file = tokio::fs::File::create(&path).await?;
        let mut written = 0usize;

        while let Some(chunk) = field.next().await {
            let bytes = chunk.map_err(|e| AppError::BadRequest(format!("upload interrupted: {}", e)))?;
            written += bytes.len();
            if written > upload.max_bytes {
                return Err(AppError::BadRequest(format!(
                    "file exceeds the {} byte upload limit",
                    upload.max_bytes
                )));
            }
            file.write_all(&bytes).await?;
        }
        file.flush().await?;

        response
            .media_urls
            .push(format!("{}/{}", upload.public_prefix.trim_end_matches('/'), stored_name));
        response.media_types.push(kind.to_string());
    }

    if response.media_urls.is_empty() {
        return Err(AppError::BadRequest("no files uploaded".into()));
    }
    Ok(response)
}

async fn discard(paths: &[PathBuf]) {
    for path in paths {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!(path = %path.display(), "discarded upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(error = %e, path = %path.display(), "failed to remove rejected upload"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_middleware::SessionVerifier;
    use actix_web::{http::StatusCode, test, App};

    const SECRET: &str = "upload-test-secret-at-least-32-bytes-long";
    const BOUNDARY: &str = "cookbookboundary";

    fn multipart_body(parts: &[(&str, &str, &str)]) -> Vec<u8> {
        let mut body = String::new();
        for (filename, content_type, data) in parts {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n{data}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body.into_bytes()
    }

    fn upload_config(max_bytes: usize) -> UploadConfig {
        UploadConfig {
            dir: std::env::temp_dir().join(format!("cookbook-upload-{}", Uuid::new_v4())),
            max_bytes,
            public_prefix: "/uploads/".to_string(),
        }
    }

    async fn post_upload(config: &UploadConfig, body: Vec<u8>) -> (StatusCode, serde_json::Value) {
        let verifier = SessionVerifier::new(SECRET).unwrap();
        let token = verifier.issue(Uuid::new_v4(), "alice", None).unwrap();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(verifier))
                .app_data(web::Data::new(config.clone()))
                .route("/upload", web::post().to(upload_media)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/upload")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .insert_header((
                "Content-Type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let json: serde_json::Value = test::read_body_json(resp).await;
        (status, json)
    }

    fn stored_files(config: &UploadConfig) -> usize {
        std::fs::read_dir(&config.dir).map(|d| d.count()).unwrap_or(0)
    }

    #[actix_web::test]
    async fn test_upload_stores_files() {
        let config = upload_config(1024);
        let body = multipart_body(&[("cake.PNG", "image/png", "png-bytes"), ("clip.mp4", "video/mp4", "mp4")]);

        let (status, json) = post_upload(&config, body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["media_types"], serde_json::json!(["image", "video"]));
        let first = json["media_urls"][0].as_str().unwrap();
        assert!(first.starts_with("/uploads/"));
        assert!(first.ends_with(".png"));
        assert_eq!(stored_files(&config), 2);

        std::fs::remove_dir_all(&config.dir).unwrap();
    }

    #[actix_web::test]
    async fn test_rejected_field_discards_earlier_files() {
        let config = upload_config(1024);
        let body = multipart_body(&[("cake.png", "image/png", "png-bytes"), ("notes.pdf", "application/pdf", "pdf")]);

        let (status, _) = post_upload(&config, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(stored_files(&config), 0);

        std::fs::remove_dir_all(&config.dir).unwrap();
    }

    #[actix_web::test]
    async fn test_oversized_file_discards_batch() {
        let config = upload_config(8);
        let body = multipart_body(&[("a.png", "image/png", "tiny"), ("b.png", "image/png", "far-too-large-for-limit")]);

        let (status, json) = post_upload(&config, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("upload limit"));
        assert_eq!(stored_files(&config), 0);

        std::fs::remove_dir_all(&config.dir).unwrap();
    }

    #[::core::prelude::v1::test]
    fn test_media_kind() {
        assert_eq!(media_kind("image/png"), Some("image"));
        assert_eq!(media_kind("video/mp4"), Some("video"));
        assert_eq!(media_kind("application/pdf"), None);
        assert_eq!(media_kind(""), None);
    }

    #[::core::prelude::v1::test]
    fn test_file_extension() {
        assert_eq!(file_extension("cake.JPG").as_deref(), Some("jpg"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension("../../etc/passwd"), None);
        assert_eq!(file_extension("evil.p/hp"), None);
    }
}
