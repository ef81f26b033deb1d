use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::core::error::AppError;
use crate::core::extractor::{AppJson, AppQuery, SessionToken};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    DownloadQuery, FileResponseDto, ListFilesQuery, UploadFileDto,
};
use crate::features::files::services::{
    BestEffortFailure, DownloadService, FileContent, ListingService, UploadService,
    VisibilityService,
};
use crate::shared::types::{ApiResponse, Meta};

/// State for file handlers
#[derive(Clone)]
pub struct FilesState {
    pub upload_service: Arc<UploadService>,
    pub listing_service: Arc<ListingService>,
    pub visibility_service: Arc<VisibilityService>,
    pub download_service: Arc<DownloadService>,
}

/// Upload a file or create a folder
///
/// Content is sent base64 encoded in `data` and is required unless `type` is
/// "folder". Image uploads also queue thumbnail generation.
#[utoipa::path(
    post,
    path = "/api/files",
    tag = "files",
    request_body = UploadFileDto,
    responses(
        (status = 201, description = "File created", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Missing or invalid field, or invalid parent"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    State(state): State<FilesState>,
    AppJson(dto): AppJson<UploadFileDto>,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>), AppError> {
    let outcome = state.upload_service.upload(&user, dto).await?;

    for failure in &outcome.degraded {
        match failure {
            BestEffortFailure::StorageDirectory(e) => warn!(
                "Upload of file {} stored without a storage directory: {}",
                outcome.record.id, e
            ),
            BestEffortFailure::BlobWrite(e) => warn!(
                "Upload of file {} stored without its content: {}",
                outcome.record.id, e
            ),
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(outcome.record.into()), None, None)),
    ))
}

/// Get one of the current user's files
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File found", body = ApiResponse<FileResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn get_file(
    user: AuthenticatedUser,
    State(state): State<FilesState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FileResponseDto>>, AppError> {
    let record = state.listing_service.get_owned(&user, &id).await?;
    Ok(Json(ApiResponse::success(Some(record.into()), None, None)))
}

/// List the current user's files, newest first, 20 per page
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Page of files, empty past the last page", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Unusable page or listing unavailable")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn list_files(
    user: AuthenticatedUser,
    State(state): State<FilesState>,
    AppQuery(query): AppQuery<ListFilesQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>, AppError> {
    let page = ListingService::parse_page(query.page.as_deref())?;
    let records = state
        .listing_service
        .list(&user, query.parent_id.as_deref(), page)
        .await?;

    let files = records.into_iter().map(FileResponseDto::from).collect();
    Ok(Json(ApiResponse::success(
        Some(files),
        None,
        Some(Meta { page: page.index }),
    )))
}

/// Make a file downloadable by anyone
#[utoipa::path(
    put,
    path = "/api/files/{id}/publish",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File published", body = ApiResponse<FileResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn publish_file(
    user: AuthenticatedUser,
    State(state): State<FilesState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FileResponseDto>>, AppError> {
    let record = state.visibility_service.publish(&user, &id).await?;
    Ok(Json(ApiResponse::success(Some(record.into()), None, None)))
}

/// Restrict a file to its owner
#[utoipa::path(
    put,
    path = "/api/files/{id}/unpublish",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File unpublished", body = ApiResponse<FileResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn unpublish_file(
    user: AuthenticatedUser,
    State(state): State<FilesState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<FileResponseDto>>, AppError> {
    let record = state.visibility_service.unpublish(&user, &id).await?;
    Ok(Json(ApiResponse::success(Some(record.into()), None, None)))
}

/// Download file content
///
/// Public files need no session. Private files are only served to their
/// owner; anyone else gets 404.
#[utoipa::path(
    get,
    path = "/api/files/{id}/data",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID"),
        DownloadQuery
    ),
    responses(
        (status = 200, description = "Raw file content with a Content-Type derived from the file name"),
        (status = 400, description = "A folder doesn't have content"),
        (status = 404, description = "Not found")
    ),
    security(
        ("session_token" = [])
    )
)]
pub async fn download_file(
    SessionToken(token): SessionToken,
    State(state): State<FilesState>,
    Path(id): Path<String>,
    AppQuery(query): AppQuery<DownloadQuery>,
) -> Result<Response, AppError> {
    let FileContent { data, content_type } = state
        .download_service
        .download(&id, token.as_deref(), query.size.as_deref())
        .await?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], data).into_response())
}
