//! HTTP handlers for the booking back office

use super::host::ServerHost;
use crate::booking::model::{City, Client, Tour};
use crate::booking::payload::{BookingPayload, BookingRecord};
use crate::core::error::{DeskError, DeskResult, ValidationError};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

pub type HostState = State<Arc<ServerHost>>;

/// `GET /health`
pub async fn health_check(State(host): HostState) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": host.service_name,
    }))
}

/// `GET /tours/all`
pub async fn list_tours(State(host): HostState) -> DeskResult<Json<Vec<Tour>>> {
    Ok(Json(host.api.list_tours().await?))
}

/// `GET /clients/all`
pub async fn list_clients(State(host): HostState) -> DeskResult<Json<Vec<Client>>> {
    Ok(Json(host.api.list_clients().await?))
}

/// `GET /cities/all`
pub async fn list_cities(State(host): HostState) -> DeskResult<Json<Vec<City>>> {
    Ok(Json(host.api.list_cities().await?))
}

/// `POST /bookings`
pub async fn create_booking(
    State(host): HostState,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> DeskResult<(StatusCode, Json<BookingRecord>)> {
    let Json(payload) = payload.map_err(json_error)?;
    let record = host.api.create_booking(payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PUT /bookings/{id}`
pub async fn update_booking(
    State(host): HostState,
    Path(id): Path<String>,
    payload: Result<Json<BookingPayload>, JsonRejection>,
) -> DeskResult<Json<BookingRecord>> {
    let id = parse_id(id)?;
    let Json(payload) = payload.map_err(json_error)?;
    Ok(Json(host.api.update_booking(id, payload).await?))
}

/// `GET /bookings/{id}`
pub async fn get_booking(
    State(host): HostState,
    Path(id): Path<String>,
) -> DeskResult<Json<BookingRecord>> {
    let id = parse_id(id)?;
    Ok(Json(host.api.get_booking(id).await?))
}

fn parse_id(id: String) -> DeskResult<Uuid> {
    Uuid::parse_str(&id).map_err(|_| ValidationError::InvalidUuid { value: id }.into())
}

fn json_error(rejection: JsonRejection) -> DeskError {
    ValidationError::InvalidJson {
        message: rejection.body_text(),
    }
    .into()
}
