//! Image endpoints: multipart upload, listing, editing, bulk delete.

use axum::Json;
use axum::extract::multipart::{Multipart, MultipartError};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use uuid::Uuid;

use gallery_core::error::AppError;
use gallery_service::image::{UpdateImageRequest, UploadImageRequest};

use crate::dto::request::{BulkDeleteImagesDto, ImageListQuery, UpdateImageDto, parse_uuid_list};
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// `POST /api/images/upload`
///
/// Multipart form: one or more `files` parts, plus optional `title`,
/// `description`, and comma-separated `tags` fields applied to the batch.
pub async fn upload_images(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut files: Vec<(String, bytes::Bytes)> = Vec::new();
    let mut title = String::new();
    let mut description: Option<String> = None;
    let mut tags_raw: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_err)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" | "file" => {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .unwrap_or("upload")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_err)?;
                files.push((file_name, data));
            }
            "title" => title = field.text().await.map_err(multipart_err)?,
            "description" => description = Some(field.text().await.map_err(multipart_err)?),
            "tags" => tags_raw = Some(field.text().await.map_err(multipart_err)?),
            _ => {}
        }
    }

    let tag_ids = parse_uuid_list(tags_raw.as_deref())?;
    let uploads = files
        .into_iter()
        .map(|(file_name, data)| UploadImageRequest {
            file_name,
            data,
            title: title.clone(),
            description: description.clone(),
        })
        .collect();

    let created = state.images.upload(&auth, uploads, tag_ids).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": created })),
    ))
}

/// `GET /api/images`
pub async fn list_images(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(filter): Query<ImageListQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let tag_ids = filter.tag_ids()?;
    let page = state
        .images
        .list(&auth, filter.keyword, tag_ids, pagination.to_page_request())
        .await?;
    Ok(Json(json!({ "success": true, "data": page })))
}

/// `GET /api/images/{id}`
pub async fn get_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state.images.get(&auth, id).await?;
    Ok(Json(json!({ "success": true, "data": image })))
}

/// `PUT` / `PATCH /api/images/{id}`
pub async fn update_image(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateImageDto>,
) -> Result<impl IntoResponse, ApiError> {
    let image = state
        .images
        .update(
            &auth,
            id,
            UpdateImageRequest {
                title: body.title,
                description: body.description,
                tag_ids: body.tag_ids,
            },
        )
        .await?;
    Ok(Json(json!({ "success": true, "data": image })))
}

/// `POST /api/images/bulk-delete`
pub async fn bulk_delete_images(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<BulkDeleteImagesDto>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validated(body)?;
    let deleted = state.images.bulk_delete(&auth, body.image_ids).await?;
    Ok(Json(
        json!({ "success": true, "data": { "deleted": deleted } }),
    ))
}

fn multipart_err(e: MultipartError) -> AppError {
    AppError::validation(format!("Invalid multipart body: {e}"))
}
