// handlers/listings/photo.rs - PUT /listings/:id/photo handler

use std::path::{Path as FsPath, PathBuf};

use axum::{
    extract::{Multipart, Path, State},
    Extension,
};

use crate::error::ApiError;
use crate::handlers::parse_id;
use crate::middleware::auth::ensure_owner;
use crate::middleware::{ApiResponse, ApiResult, AuthAccount};
use crate::services::ListingService;
use crate::state::AppState;

use super::load_listing;

const FILE_FIELD: &str = "file";

/// Accept a single image in the multipart field `file` and store it as
/// `photo_<listing id><ext>` under the upload directory.
pub async fn listing_photo(
    State(state): State<AppState>,
    Extension(AuthAccount(account)): Extension<AuthAccount>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<String> {
    let id = parse_id(&id)?;
    let listing = load_listing(&state.pool, id).await?;
    ensure_owner(&account, listing.account_id, "update this listing")?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        upload = Some((content_type, file_name, bytes));
        break;
    }

    let (content_type, file_name, bytes) =
        upload.ok_or_else(|| ApiError::bad_request("Please upload a file"))?;

    let extension = validate_photo(
        content_type.as_deref(),
        file_name.as_deref(),
        bytes.len(),
        state.config.api.max_file_upload_bytes,
    )?;

    let stored_name = format!("photo_{}{}", listing.id, extension);
    let dir = PathBuf::from(&state.config.api.file_upload_path);
    let write = async {
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&stored_name), &bytes).await
    };
    if let Err(e) = write.await {
        tracing::error!(listing_id = %listing.id, "Photo write failed: {}", e);
        return Err(ApiError::InternalServerError("Problem with file upload".to_string()));
    }

    ListingService::new(state.pool.clone())
        .set_photo(listing.id, &stored_name)
        .await?;

    tracing::info!(listing_id = %listing.id, photo = %stored_name, size = bytes.len(), "photo uploaded");
    Ok(ApiResponse::success(stored_name))
}

/// Check an upload and return the extension (with leading dot, possibly empty)
/// to store it under.
pub fn validate_photo(
    content_type: Option<&str>,
    file_name: Option<&str>,
    size: usize,
    max_bytes: usize,
) -> Result<String, ApiError> {
    if !content_type.is_some_and(|ct| ct.starts_with("image")) {
        return Err(ApiError::bad_request("Please upload an image file"));
    }
    if size > max_bytes {
        return Err(ApiError::bad_request(format!(
            "Please upload an image less than {} bytes",
            max_bytes
        )));
    }

    let extension = file_name
        .and_then(|name| FsPath::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();
    Ok(extension)
}
