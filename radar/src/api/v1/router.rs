use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let artists = Router::new()
        .route("/{slug}/profile", get(handlers::artists::get_profile))
        .route(
            "/{slug}/scores:refresh",
            post(handlers::artists::refresh_scores),
        );

    let users = Router::new()
        .route(
            "/{userId}/insights",
            get(handlers::insights::list_insights),
        )
        .route(
            "/{userId}/insights:generate",
            post(handlers::insights::generate_insights),
        );

    let rosters = Router::new()
        .route(
            "/{rosterId}/collaborations",
            get(handlers::collaborations::roster_collaborations),
        )
        .route(
            "/{rosterId}/collaborations/{slug}",
            get(handlers::collaborations::candidate_collaborations),
        );

    let public_routes = Router::new().route("/health", get(handlers::health_check));

    let protected_routes = Router::new()
        .route("/pulse", get(handlers::pulse::get_pulse))
        .route(
            "/collaborations:assess",
            get(handlers::collaborations::assess_pairing),
        )
        .route(
            "/admin/cache",
            get(handlers::cache::cache_stats).delete(handlers::cache::clear_cache),
        )
        .nest("/artists", artists)
        .nest("/users", users)
        .nest("/rosters", rosters)
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
