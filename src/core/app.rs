//! Service wiring and the API router
//!
//! Collaborators are built by the caller (`main` with PostgreSQL, tests with
//! in-memory doubles) and injected here.

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};

use crate::core::middleware;
use crate::features::auth::{routes as auth_routes, SessionResolver, UserStore};
use crate::features::files::{
    routes as files_routes, DownloadService, FileStore, FilesState, ListingService,
    UploadService, VisibilityService,
};
use crate::modules::cache::KeyValueCache;
use crate::modules::queue::ThumbnailQueue;
use crate::modules::storage::LocalStorage;

/// Every service the API depends on
#[derive(Clone)]
pub struct AppServices {
    pub session_resolver: Arc<SessionResolver>,
    pub files: FilesState,
}

impl AppServices {
    pub fn new(
        cache: Arc<dyn KeyValueCache>,
        users: Arc<dyn UserStore>,
        file_store: Arc<dyn FileStore>,
        storage: Arc<LocalStorage>,
        thumbnails: Arc<dyn ThumbnailQueue>,
    ) -> Self {
        let session_resolver = Arc::new(SessionResolver::new(cache, users));

        let files = FilesState {
            upload_service: Arc::new(UploadService::new(
                Arc::clone(&file_store),
                Arc::clone(&storage),
                thumbnails,
            )),
            listing_service: Arc::new(ListingService::new(Arc::clone(&file_store))),
            visibility_service: Arc::new(VisibilityService::new(Arc::clone(&file_store))),
            download_service: Arc::new(DownloadService::new(
                file_store,
                storage,
                Arc::clone(&session_resolver),
            )),
        };

        Self {
            session_resolver,
            files,
        }
    }
}

/// Simple health check endpoint (no auth required)
async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// API routes without the HTTP plumbing layers added by `main`
pub fn build_router(services: AppServices) -> Router {
    // Protected routes (require a session token)
    let protected_routes = Router::new()
        .merge(auth_routes::protected_routes())
        .merge(files_routes::protected_routes(services.files.clone()))
        .route_layer(axum::middleware::from_fn_with_state(
            Arc::clone(&services.session_resolver),
            middleware::session_middleware,
        ));

    // Public routes (session resolved lazily, if at all)
    let public_routes = Router::new().merge(files_routes::public_routes(services.files));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use serde_json::{json, Value};

    use crate::shared::test_helpers::TestApp;

    fn token() -> axum::http::HeaderName {
        TestApp::token_header()
    }

    async fn upload(app: &TestApp, token_value: &str, body: Value) -> Value {
        let response = app
            .server
            .post("/api/files")
            .add_header(token(), token_value.to_string())
            .json(&body)
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["data"].clone()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = TestApp::new();

        app.server.get("/health").await.assert_status_ok();
    }

    #[tokio::test]
    async fn test_me_returns_session_user() {
        let app = TestApp::new();
        let (user, session) = app.sign_in("bob@example.com");

        let response = app
            .server
            .get("/api/auth/me")
            .add_header(token(), session)
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["id"], user.id.to_string());
        assert_eq!(body["data"]["email"], "bob@example.com");
    }

    #[tokio::test]
    async fn test_protected_routes_require_session() {
        let app = TestApp::new();

        let response = app
            .server
            .post("/api/files")
            .json(&json!({ "name": "a.txt", "type": "file", "data": "SGVsbG8=" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>()["message"], "Unauthorized");

        app.server
            .get("/api/files")
            .add_header(token(), "unknown-token".to_string())
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        app.server
            .put("/api/files/0/publish")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        assert!(app.files.records().is_empty());
    }

    #[tokio::test]
    async fn test_upload_publish_download_flow() {
        let app = TestApp::new();
        let (user, session) = app.sign_in("bob@example.com");

        let file = upload(
            &app,
            &session,
            json!({ "name": "a.txt", "type": "file", "data": "SGVsbG8=" }),
        )
        .await;
        assert_eq!(file["userId"], user.id.to_string());
        assert_eq!(file["name"], "a.txt");
        assert_eq!(file["type"], "file");
        assert_eq!(file["isPublic"], false);
        assert_eq!(file["parentId"], 0);
        let id = file["id"].as_str().unwrap().to_string();
        let data_path = format!("/api/files/{}/data", id);

        let owner = app
            .server
            .get(&data_path)
            .add_header(token(), session.clone())
            .await;
        owner.assert_status_ok();
        assert_eq!(owner.as_bytes().as_ref(), b"Hello");
        assert_eq!(owner.headers()[header::CONTENT_TYPE], "text/plain");

        app.server
            .get(&data_path)
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let published = app
            .server
            .put(&format!("/api/files/{}/publish", id))
            .add_header(token(), session.clone())
            .await;
        published.assert_status_ok();
        assert_eq!(published.json::<Value>()["data"]["isPublic"], true);

        let anonymous = app.server.get(&data_path).await;
        anonymous.assert_status_ok();
        assert_eq!(anonymous.as_bytes().as_ref(), b"Hello");

        app.server
            .put(&format!("/api/files/{}/unpublish", id))
            .add_header(token(), session)
            .await
            .assert_status_ok();
        app.server
            .get(&data_path)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_validation_messages() {
        let app = TestApp::new();
        let (_, session) = app.sign_in("bob@example.com");

        let cases = [
            (json!({ "type": "file", "data": "SGVsbG8=" }), "Missing name"),
            (json!({ "name": "a.txt", "data": "SGVsbG8=" }), "Missing type"),
            (
                json!({ "name": "a.txt", "type": "video", "data": "SGVsbG8=" }),
                "Invalid type",
            ),
            (json!({ "name": "a.txt", "type": "file" }), "Missing data"),
            (
                json!({ "name": "a.txt", "type": "file", "data": "SGVsbG8=", "parentId": "3f2b" }),
                "Parent not found",
            ),
        ];

        for (body, message) in cases {
            let response = app
                .server
                .post("/api/files")
                .add_header(token(), session.clone())
                .json(&body)
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
            assert_eq!(response.json::<Value>()["message"], message);
        }
        assert!(app.files.records().is_empty());
    }

    #[tokio::test]
    async fn test_upload_into_folder_and_list_by_parent() {
        let app = TestApp::new();
        let (_, session) = app.sign_in("bob@example.com");

        let folder = upload(&app, &session, json!({ "name": "docs", "type": "folder" })).await;
        let folder_id = folder["id"].as_str().unwrap().to_string();
        let child = upload(
            &app,
            &session,
            json!({ "name": "a.txt", "type": "file", "data": "SGVsbG8=", "parentId": folder_id }),
        )
        .await;
        assert_eq!(child["parentId"], folder_id.as_str());

        let in_folder = app
            .server
            .get("/api/files")
            .add_query_param("parentId", &folder_id)
            .add_header(token(), session.clone())
            .await;
        in_folder.assert_status_ok();
        let body = in_folder.json::<Value>();
        assert_eq!(body["data"], json!([child]));
        assert_eq!(body["meta"]["page"], 0);

        let at_root = app
            .server
            .get("/api/files")
            .add_query_param("parentId", "0")
            .add_header(token(), session.clone())
            .await
            .json::<Value>();
        assert_eq!(at_root["data"], json!([folder]));

        let nested_in_file = app
            .server
            .post("/api/files")
            .add_header(token(), session)
            .json(&json!({ "name": "b.txt", "type": "file", "data": "SGVsbG8=", "parentId": child["id"] }))
            .await;
        nested_in_file.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            nested_in_file.json::<Value>()["message"],
            "Parent is not a folder"
        );
    }

    #[tokio::test]
    async fn test_listing_pages() {
        let app = TestApp::new();
        let (_, session) = app.sign_in("bob@example.com");
        for i in 0..25 {
            upload(&app, &session, json!({ "name": format!("d{}", i), "type": "folder" })).await;
        }

        let page = |index: u32| {
            app.server
                .get("/api/files")
                .add_query_param("page", index)
                .add_header(token(), session.clone())
        };

        let first = page(0).await.json::<Value>();
        assert_eq!(first["data"].as_array().unwrap().len(), 20);
        assert_eq!(first["data"][0]["name"], "d24");

        let second = page(1).await.json::<Value>();
        assert_eq!(second["data"].as_array().unwrap().len(), 5);
        assert_eq!(second["meta"]["page"], 1);

        let past_end = page(2).await;
        past_end.assert_status_ok();
        assert_eq!(past_end.json::<Value>()["data"], json!([]));
    }

    #[tokio::test]
    async fn test_unusable_page_is_not_found() {
        let app = TestApp::new();
        let (_, session) = app.sign_in("bob@example.com");
        upload(&app, &session, json!({ "name": "docs", "type": "folder" })).await;

        for page in ["abc", "-1"] {
            let response = app
                .server
                .get("/api/files")
                .add_query_param("page", page)
                .add_header(token(), session.clone())
                .await;
            response.assert_status(StatusCode::NOT_FOUND);
            assert_eq!(response.json::<Value>()["message"], "Not found");
        }

        let empty_page = app
            .server
            .get("/api/files")
            .add_query_param("page", "")
            .add_header(token(), session)
            .await;
        empty_page.assert_status_ok();
        assert_eq!(empty_page.json::<Value>()["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_size_downloads_the_file_itself() {
        let app = TestApp::new();
        let (_, session) = app.sign_in("bob@example.com");
        let file = upload(
            &app,
            &session,
            json!({ "name": "a.txt", "type": "file", "data": "SGVsbG8=", "isPublic": true }),
        )
        .await;

        let response = app
            .server
            .get(&format!("/api/files/{}/data", file["id"].as_str().unwrap()))
            .add_query_param("size", "")
            .await;

        response.assert_status_ok();
        assert_eq!(response.as_bytes().as_ref(), b"Hello");
    }

    #[tokio::test]
    async fn test_other_users_files_are_not_found() {
        let app = TestApp::new();
        let (_, owner) = app.sign_in("owner@example.com");
        let (_, other) = app.sign_in("other@example.com");
        let file = upload(
            &app,
            &owner,
            json!({ "name": "a.txt", "type": "file", "data": "SGVsbG8=" }),
        )
        .await;
        let id = file["id"].as_str().unwrap();

        for path in [
            format!("/api/files/{}", id),
            format!("/api/files/{}/data", id),
        ] {
            app.server
                .get(&path)
                .add_header(token(), other.clone())
                .await
                .assert_status(StatusCode::NOT_FOUND);
        }
        app.server
            .put(&format!("/api/files/{}/publish", id))
            .add_header(token(), other.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let listing = app
            .server
            .get("/api/files")
            .add_header(token(), other)
            .await
            .json::<Value>();
        assert_eq!(listing["data"], json!([]));
        assert!(!app.files.records()[0].is_public);
    }

    #[tokio::test]
    async fn test_download_folder_and_thumbnail_variants() {
        let app = TestApp::new();
        let (_, session) = app.sign_in("bob@example.com");
        let folder = upload(&app, &session, json!({ "name": "docs", "type": "folder" })).await;

        let response = app
            .server
            .get(&format!("/api/files/{}/data", folder["id"].as_str().unwrap()))
            .add_header(token(), session.clone())
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            "A folder doesn't have content"
        );

        let image = upload(
            &app,
            &session,
            json!({ "name": "cat.png", "type": "image", "data": "iVBORw0KGgo=" }),
        )
        .await;
        let id = image["id"].as_str().unwrap();
        let stored = app
            .files
            .records()
            .into_iter()
            .find(|r| r.id.to_string() == id)
            .unwrap();
        let local_path = stored.local_path.unwrap();
        assert!(local_path.starts_with(&*app.storage_dir.path().to_string_lossy()));
        let job = app
            .thumbnails
            .next_job(std::time::Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(job.file_id, stored.id);
        std::fs::write(format!("{}_250", local_path), b"thumb").unwrap();

        let thumbnail = app
            .server
            .get(&format!("/api/files/{}/data", id))
            .add_query_param("size", "250")
            .add_header(token(), session.clone())
            .await;
        thumbnail.assert_status_ok();
        assert_eq!(thumbnail.as_bytes().as_ref(), b"thumb");
        assert_eq!(thumbnail.headers()[header::CONTENT_TYPE], "image/png");

        app.server
            .get(&format!("/api/files/{}/data", id))
            .add_query_param("size", "500")
            .add_header(token(), session.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);
        app.server
            .get(&format!("/api/files/{}/data", id))
            .add_query_param("size", "../x")
            .add_header(token(), session)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
