use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn patient_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/delete-patient/{user_id}", delete(handlers::delete_patient))
        .route(
            "/profile-extras/{user_id}",
            get(handlers::get_profile_extras).put(handlers::put_profile_extras),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
