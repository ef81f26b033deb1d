use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::files::handlers::{
    download_file, get_file, list_files, publish_file, unpublish_file, upload_file, FilesState,
};

/// Routes requiring a session
pub fn protected_routes(state: FilesState) -> Router {
    Router::new()
        .route("/api/files", post(upload_file).get(list_files))
        .route("/api/files/{id}", get(get_file))
        .route("/api/files/{id}/publish", put(publish_file))
        .route("/api/files/{id}/unpublish", put(unpublish_file))
        .with_state(state)
}

/// Routes resolving the session themselves, if at all
pub fn public_routes(state: FilesState) -> Router {
    Router::new()
        .route("/api/files/{id}/data", get(download_file))
        .with_state(state)
}
