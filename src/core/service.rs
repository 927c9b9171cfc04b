//! Remote API contract consumed by the booking form

use crate::booking::model::{City, Client, Tour};
use crate::booking::payload::{BookingPayload, BookingRecord};
use crate::core::error::DeskResult;
use async_trait::async_trait;
use uuid::Uuid;

/// The back-office API as seen by a booking form
///
/// Implementations are agnostic to transport: the in-memory store serves
/// tests and the embedded server, the HTTP client talks to a remote server.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// `GET /tours/all`
    async fn list_tours(&self) -> DeskResult<Vec<Tour>>;

    /// `GET /clients/all`
    async fn list_clients(&self) -> DeskResult<Vec<Client>>;

    /// `GET /cities/all`
    async fn list_cities(&self) -> DeskResult<Vec<City>>;

    /// `POST /bookings`
    async fn create_booking(&self, payload: BookingPayload) -> DeskResult<BookingRecord>;

    /// `PUT /bookings/{id}`
    async fn update_booking(&self, id: Uuid, payload: BookingPayload)
    -> DeskResult<BookingRecord>;

    /// `GET /bookings/{id}`
    async fn get_booking(&self, id: Uuid) -> DeskResult<BookingRecord>;
}
