use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

pub fn medicine_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/medicines", get(handlers::get_medicines))
        .with_state(state)
}
