use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    // Marketplace browsing is public; profile mutation is not.
    let protected = Router::new()
        .route("/update-profile/{user_id}", post(handlers::update_profile))
        .route("/delete-doctor/{user_id}", delete(handlers::delete_doctor))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/doctors", get(handlers::get_all_doctors))
        .route("/search-doctors", get(handlers::search_doctors))
        .route("/doctor-availability/{doctor_id}", get(handlers::doctor_availability))
        .merge(protected)
        .with_state(state)
}
