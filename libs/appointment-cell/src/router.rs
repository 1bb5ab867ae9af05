use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    let protected = Router::new()
        .route("/book-appointment", post(handlers::book_appointment))
        .route(
            "/patients-bookings/{patient_id}",
            get(handlers::patients_bookings),
        )
        .route(
            "/doctors-bookings/{doctor_id}",
            get(handlers::doctors_bookings),
        )
        .route(
            "/delete-appointment/{id}",
            delete(handlers::delete_appointment),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route(
            "/available-appointment/{doctor_id}",
            get(handlers::available_appointments),
        )
        .merge(protected)
        .with_state(state)
}
