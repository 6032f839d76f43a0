mod content;
mod entries;
mod home;
mod pip_videos;
mod popular_brands;
mod upload;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::services::entries::EntryService;
use crate::services::media::MediaStore;
use crate::services::repository::EntryRepository;

// Define the OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        home::root,
        content::create_content,
        content::list_content,
        content::list_live_content,
        content::get_content,
        content::update_content,
        content::toggle_content_status,
        content::delete_content,
        popular_brands::create_popular_brand,
        popular_brands::list_popular_brands,
        popular_brands::list_live_popular_brands,
        popular_brands::get_popular_brand,
        popular_brands::update_popular_brand,
        popular_brands::toggle_popular_brand_status,
        popular_brands::delete_popular_brand,
        pip_videos::create_pip_video,
        pip_videos::list_pip_videos,
        pip_videos::get_pip_video,
        pip_videos::update_pip_video,
        pip_videos::delete_pip_video,
    ),
    components(
        schemas(
            home::RootResponse,
            entries::EntryResponse,
            crate::models::media::MediaDescriptor,
            crate::entities::placed_entry::MediaKind,
            crate::entities::placed_entry::EntryStatus,
        )
    ),
    tags(
        (name = "General", description = "Health check"),
        (name = "Premium Brands", description = "Brand entries with optional scheduling"),
        (name = "Popular Brands", description = "Featured brands placed on tiles 1-28"),
        (name = "PiP Videos", description = "Picture-in-picture video playlist")
    ),
    info(
        title = "Promo Placement API",
        version = "0.1.0",
        description = "Admin API for ranked, scheduled brand placements and their media",
    )
)]
struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub entries: EntryService,
}

impl AppState {
    pub fn new(repo: Arc<dyn EntryRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self {
            entries: EntryService::new(repo, media),
        }
    }
}

pub fn create_routes(state: AppState, cors_origins: &[String]) -> Router {
    // Swagger UI (stateless)
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    let app_routes = Router::new()
        .route("/", get(home::root))
        .route(
            "/api/content",
            post(content::create_content).get(content::list_content),
        )
        .route("/api/content/live/now", get(content::list_live_content))
        .route(
            "/api/content/{id}",
            get(content::get_content)
                .put(content::update_content)
                .delete(content::delete_content),
        )
        .route(
            "/api/content/{id}/toggle-status",
            patch(content::toggle_content_status),
        )
        .route(
            "/api/popular-brands",
            post(popular_brands::create_popular_brand).get(popular_brands::list_popular_brands),
        )
        .route(
            "/api/popular-brands/live/now",
            get(popular_brands::list_live_popular_brands),
        )
        .route(
            "/api/popular-brands/{id}",
            get(popular_brands::get_popular_brand)
                .put(popular_brands::update_popular_brand)
                .delete(popular_brands::delete_popular_brand),
        )
        .route(
            "/api/popular-brands/{id}/toggle-status",
            patch(popular_brands::toggle_popular_brand_status),
        )
        .route(
            "/api/pip-videos",
            post(pip_videos::create_pip_video).get(pip_videos::list_pip_videos),
        )
        .route(
            "/api/pip-videos/{id}",
            get(pip_videos::get_pip_video)
                .put(pip_videos::update_pip_video)
                .delete(pip_videos::delete_pip_video),
        )
        .layer(DefaultBodyLimit::max(upload::BODY_LIMIT))
        .with_state(state);

    Router::new()
        .merge(swagger_router)
        .merge(app_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::entities::placed_entry::{EntryKind, EntryStatus};
    use crate::services::testing::{entry, InMemoryEntryRepository, RecordingMediaStore};

    const BOUNDARY: &str = "promo-test-boundary";

    struct TestApp {
        router: Router,
        repo: Arc<InMemoryEntryRepository>,
        media: Arc<RecordingMediaStore>,
    }

    fn app_with(entries: Vec<crate::entities::placed_entry::Model>) -> TestApp {
        let repo = Arc::new(InMemoryEntryRepository::with(entries));
        let media = Arc::new(RecordingMediaStore::default());
        let router = create_routes(AppState::new(repo.clone(), media.clone()), &[]);
        TestApp {
            router,
            repo,
            media,
        }
    }

    fn multipart(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Body {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((filename, content_type, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"media\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Body::from(body)
    }

    async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let resp = router.clone().oneshot(request).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn multipart_request(method: &str, uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(body)
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    const FEATURED: [(&str, &str); 8] = [
        ("brandName", "Acme"),
        ("description", "Spring launch"),
        ("tile", "3"),
        ("rank", "5"),
        ("priority", "true"),
        ("link", "https://acme.example"),
        ("startDateTime", "2026-03-01T00:00:00Z"),
        ("endDateTime", "2026-04-01T00:00:00Z"),
    ];

    #[tokio::test]
    async fn health_check() {
        let app = app_with(vec![]);
        let (status, body) = call(&app.router, empty_request("GET", "/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "API is running");
    }

    #[tokio::test]
    async fn create_popular_brand_then_conflict() {
        let app = app_with(vec![]);
        let file = Some(("banner.gif", "image/gif", &b"GIF89a"[..]));

        let (status, body) = call(
            &app.router,
            multipart_request("POST", "/api/popular-brands", multipart(&FEATURED, file)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Popular Brand saved successfully");
        assert_eq!(body["data"]["tile"], 3);
        assert_eq!(body["data"]["rank"], 5);
        assert_eq!(body["data"]["status"], "active");
        assert_eq!(body["data"]["autoplaySpeed"], 3000);
        assert_eq!(body["data"]["media"]["type"], "gif");
        assert_eq!(body["data"]["media"]["filename"], "banner.gif");

        let (status, body) = call(
            &app.router,
            multipart_request("POST", "/api/popular-brands", multipart(&FEATURED, file)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Rank 5 already exists in Tile 3"));
        assert_eq!(app.repo.all().len(), 1);
    }

    #[tokio::test]
    async fn create_without_file_is_rejected() {
        let app = app_with(vec![]);
        let (status, body) = call(
            &app.router,
            multipart_request("POST", "/api/popular-brands", multipart(&FEATURED, None)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Image/Media file is required");
    }

    #[tokio::test]
    async fn disallowed_mime_is_rejected() {
        let app = app_with(vec![]);
        let (status, body) = call(
            &app.router,
            multipart_request(
                "POST",
                "/api/popular-brands",
                multipart(&FEATURED, Some(("notes.pdf", "application/pdf", b"%PDF"))),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Only images, videos and GIFs are allowed!");
        assert!(app.media.uploads().is_empty());
    }

    #[tokio::test]
    async fn oversized_file_is_rejected() {
        let app = app_with(vec![]);
        let data = vec![0u8; crate::models::media::MAX_UPLOAD_BYTES + 1];
        let (status, body) = call(
            &app.router,
            multipart_request(
                "POST",
                "/api/popular-brands",
                multipart(&FEATURED, Some(("big.mp4", "video/mp4", data.as_slice()))),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "File too large. Maximum size is 50MB");
        assert!(app.media.uploads().is_empty());
        assert!(app.repo.all().is_empty());
    }

    #[tokio::test]
    async fn file_at_the_size_limit_is_accepted() {
        let app = app_with(vec![]);
        let data = vec![0u8; crate::models::media::MAX_UPLOAD_BYTES];
        let (status, body) = call(
            &app.router,
            multipart_request(
                "POST",
                "/api/popular-brands",
                multipart(&FEATURED, Some(("full.mp4", "video/mp4", data.as_slice()))),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["media"]["type"], "video");
        assert_eq!(app.media.uploads().len(), 1);
        assert_eq!(app.media.uploads()[0].data.len(), data.len());
    }

    #[tokio::test]
    async fn validation_errors_are_joined() {
        let app = app_with(vec![]);
        let (status, body) = call(
            &app.router,
            multipart_request(
                "POST",
                "/api/pip-videos",
                multipart(&[("rank", "0")], Some(("a.mp4", "video/mp4", b"\0"))),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["message"],
            "link is required, Rank is required and must be at least 1"
        );
    }

    #[tokio::test]
    async fn list_orders_by_tile_priority_rank() {
        let low = entry(EntryKind::PopularBrand, Some(1), false, 0);
        let top = entry(EntryKind::PopularBrand, Some(1), true, 2);
        let next_tile = entry(EntryKind::PopularBrand, Some(2), true, 1);
        let app = app_with(vec![next_tile.clone(), low.clone(), top.clone()]);

        let (status, body) = call(&app.router, empty_request("GET", "/api/popular-brands")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        let ids: Vec<String> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            ids,
            vec![top.id.to_string(), low.id.to_string(), next_tile.id.to_string()]
        );
    }

    #[tokio::test]
    async fn live_now_skips_expired_entries() {
        let now = chrono::Utc::now();
        let mut current = entry(EntryKind::Content, None, false, 0);
        current.start_date_time = Some(now - chrono::Duration::hours(1));
        current.end_date_time = Some(now + chrono::Duration::hours(1));
        let mut expired = entry(EntryKind::Content, None, true, 1);
        expired.start_date_time = Some(now - chrono::Duration::days(2));
        expired.end_date_time = Some(now - chrono::Duration::days(1));
        let app = app_with(vec![current.clone(), expired]);

        let (status, body) = call(&app.router, empty_request("GET", "/api/content/live/now")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["data"][0]["id"], current.id.to_string());
    }

    #[tokio::test]
    async fn update_with_json_body_keeps_media() {
        let existing = entry(EntryKind::PopularBrand, Some(3), false, 0);
        let app = app_with(vec![existing.clone()]);

        let request = Request::builder()
            .method("PUT")
            .uri(format!("/api/popular-brands/{}", existing.id))
            .header("content-type", "application/json")
            .body(Body::from(
                json!({ "priority": true, "rank": 4, "status": "inactive" }).to_string(),
            ))
            .unwrap();
        let (status, body) = call(&app.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["priority"], true);
        assert_eq!(body["data"]["rank"], 4);
        assert_eq!(body["data"]["status"], "inactive");
        assert_eq!(body["data"]["media"]["publicId"], existing.media_public_id);
        assert!(app.media.destroyed().is_empty());
    }

    #[tokio::test]
    async fn update_with_file_replaces_media() {
        let existing = entry(EntryKind::PipVideo, None, false, 2);
        let app = app_with(vec![existing.clone()]);

        let (status, body) = call(
            &app.router,
            multipart_request(
                "PUT",
                &format!("/api/pip-videos/{}", existing.id),
                multipart(&[], Some(("clip.mp4", "video/mp4", b"\0\0"))),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["media"]["type"], "video");
        assert!(body["data"].get("priority").is_none());
        assert_eq!(app.media.destroyed().len(), 1);
        assert_eq!(app.media.destroyed()[0].0, existing.media_public_id);
    }

    #[tokio::test]
    async fn toggle_status_flips() {
        let existing = entry(EntryKind::Content, None, false, 0);
        let app = app_with(vec![existing.clone()]);

        let (status, body) = call(
            &app.router,
            empty_request("PATCH", &format!("/api/content/{}/toggle-status", existing.id)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Status changed to inactive");
        assert_eq!(app.repo.all()[0].status, Some(EntryStatus::Inactive));
    }

    #[tokio::test]
    async fn delete_unknown_id_is_not_found() {
        let app = app_with(vec![]);
        for uri in [
            format!("/api/popular-brands/{}", uuid::Uuid::new_v4()),
            "/api/popular-brands/not-a-uuid".to_string(),
        ] {
            let (status, body) = call(&app.router, empty_request("DELETE", &uri)).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["message"], "Popular Brand not found");
        }
        assert!(app.media.destroyed().is_empty());
    }

    #[tokio::test]
    async fn delete_releases_media_and_record() {
        let existing = entry(EntryKind::Content, None, true, 1);
        let app = app_with(vec![existing.clone()]);

        let (status, body) = call(
            &app.router,
            empty_request("DELETE", &format!("/api/content/{}", existing.id)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Premium Brand deleted successfully");
        assert!(app.repo.all().is_empty());
        assert_eq!(app.media.destroyed().len(), 1);
    }
}
