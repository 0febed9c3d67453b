use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use std::path::Path;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct UploadParams {
    /// Original file name; only the extension is kept.
    #[schema(example = "doctor-note.pdf")]
    pub file_name: String,
}

fn extension_of(file_name: &str) -> &str {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
}

/// Stored names are generated server-side; anything else (dots, separators)
/// is refused on read so the handler can never leave the upload directory.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        && !name.contains("..")
}

/// Upload a supporting document
///
/// The client uploads before submitting the request and passes the returned
/// url as the submission's `file_url`. An upload failure therefore aborts
/// the whole submission; no request row ever references a missing document.
#[utoipa::path(
    post,
    path = "/api/documents",
    params(UploadParams),
    request_body(content = Vec<u8>, description = "Raw file bytes", content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Document stored", body = Object, example = json!({
            "url": "/api/documents/7-b0e7a9c4.pdf"
        })),
        (status = 400, description = "Empty upload"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Documents"
)]
pub async fn upload_document(
    auth: AuthUser,
    config: web::Data<Config>,
    params: web::Query<UploadParams>,
    body: web::Bytes,
) -> actix_web::Result<impl Responder> {
    if body.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Upload body must not be empty"
        })));
    }

    let stored_name = format!(
        "{}-{}.{}",
        auth.user_id,
        Uuid::new_v4(),
        extension_of(&params.file_name)
    );

    let dir = config.upload_dir.clone();
    let path = Path::new(&dir).join(&stored_name);

    web::block(move || {
        std::fs::create_dir_all(&dir)?;
        std::fs::write(&path, &body)
    })
    .await?
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Document write failed");
        ApiError::Persistence
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "url": format!("{}/documents/{}", config.api_prefix, stored_name)
    })))
}

/// Download a stored document
#[utoipa::path(
    get,
    path = "/api/documents/{name}",
    params(
        ("name" = String, Path, description = "Stored document name")
    ),
    responses(
        (status = 200, description = "Document bytes", content_type = "application/octet-stream"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Document not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Documents"
)]
pub async fn download_document(
    _auth: AuthUser,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let name = path.into_inner();

    if !is_safe_name(&name) {
        return Err(ApiError::NotFound("document").into());
    }

    let full_path = Path::new(&config.upload_dir).join(&name);

    let bytes = web::block(move || std::fs::read(&full_path)).await?;

    match bytes {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type("application/octet-stream")
            .body(bytes)),
        Err(_) => Err(ApiError::NotFound("document").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_name_shape_is_accepted() {
        assert!(is_safe_name("7-b0e7a9c4-1f00-4df2-a6ab-9c1ffb6a1f00.pdf"));
        assert!(is_safe_name("12-deadbeef.bin"));
    }

    #[test]
    fn traversal_attempts_are_refused() {
        assert!(!is_safe_name("../etc/passwd"));
        assert!(!is_safe_name("a/../../b"));
        assert!(!is_safe_name("dir/file.pdf"));
        assert!(!is_safe_name(""));
    }

    #[test]
    fn extension_falls_back_to_bin() {
        assert_eq!(extension_of("note.pdf"), "pdf");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("no_extension"), "bin");
    }
}
