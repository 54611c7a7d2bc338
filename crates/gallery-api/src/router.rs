//! Router assembly: routes, middleware stack, CORS.

use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::middleware as axum_middleware;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use gallery_core::config::server::CorsConfig;

use crate::handlers::{auth, health, image, share, tag, user};
use crate::middleware::request_logging;
use crate::state::AppState;

/// Builds the complete application router.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health))
        .merge(auth_routes())
        .merge(user_routes())
        .merge(tag_routes())
        .merge(image_routes())
        .merge(share_routes());

    Router::new()
        .nest("/api", api)
        .layer(axum_middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(DefaultBodyLimit::max(
            state.config.storage.max_upload_size_bytes as usize,
        ))
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/send-verification-code",
            post(user::send_verification_code),
        )
        .route("/users/register", post(user::register))
        .route("/users/captcha", get(user::captcha))
        .route(
            "/users/profile",
            get(user::profile).put(user::update_profile),
        )
}

fn tag_routes() -> Router<AppState> {
    Router::new().route("/tags", get(tag::list_tags).post(tag::create_tag))
}

fn image_routes() -> Router<AppState> {
    Router::new()
        .route("/images/upload", post(image::upload_images))
        .route("/images", get(image::list_images))
        .route(
            "/images/{id}",
            get(image::get_image)
                .put(image::update_image)
                .patch(image::update_image),
        )
        .route("/images/bulk-delete", post(image::bulk_delete_images))
}

fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/images/share", post(share::create_share_link))
        .route("/images/share/manage", get(share::list_share_links))
        .route(
            "/images/share/manage/delete",
            post(share::revoke_share_links).delete(share::delete_share_links),
        )
        .route("/share/{code}", get(share::access_share))
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age_seconds));

    if config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors.allow_methods(methods)
}
