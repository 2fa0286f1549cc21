use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::handlers;
use crate::shared::state::AppState;
use crate::system;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // D100 Gym overview
        .route(
            "/api/dashboard/stats",
            get(handlers::d100_gym_overview::get_stats),
        )
        // A001 Member handlers
        .route(
            "/api/members",
            get(handlers::a001_member::list).post(handlers::a001_member::create),
        )
        .route(
            "/api/members/testdata",
            post(handlers::a001_member::insert_test_data),
        )
        .route(
            "/api/members/:id",
            get(handlers::a001_member::get_by_id)
                .patch(handlers::a001_member::update)
                .delete(handlers::a001_member::delete)
                .post(handlers::a001_member::renew),
        )
        .route(
            "/api/members/:id/memberships",
            get(handlers::a001_member::list_memberships),
        )
        // A002 Membership type handlers
        .route(
            "/api/membership-types",
            get(handlers::a002_membership_type::list)
                .post(handlers::a002_membership_type::create),
        )
        .route(
            "/api/membership-types/:id",
            patch(handlers::a002_membership_type::update)
                .delete(handlers::a002_membership_type::delete),
        )
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors)
        .with_state(state)
}
