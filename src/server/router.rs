//! Route table

use super::handlers::{
    create_booking, get_booking, health_check, list_cities, list_clients, list_tours,
    update_booking,
};
use super::host::ServerHost;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

/// Build the booking routes:
/// - GET /health, GET /healthz
/// - GET /tours/all, GET /clients/all, GET /cities/all
/// - POST /bookings
/// - GET /bookings/{id}, PUT /bookings/{id}
pub fn build_booking_routes(host: Arc<ServerHost>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
        .route("/tours/all", get(list_tours))
        .route("/clients/all", get(list_clients))
        .route("/cities/all", get(list_cities))
        .route("/bookings", post(create_booking))
        .route("/bookings/{id}", get(get_booking).put(update_booking))
        .with_state(host)
}
