use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use medicine_cell::router::medicine_routes;
use patient_cell::router::patient_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    let user_routes = doctor_routes(state.clone())
        .merge(appointment_routes(state.clone()))
        .merge(patient_routes(state.clone()))
        .merge(medicine_routes(state.clone()));

    Router::new()
        .route("/", get(|| async { "CareLink API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/user", user_routes)
}
