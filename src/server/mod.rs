//! HTTP server exposing the booking back office
//!
//! `ServerBuilder` wires a [`BookingApi`](crate::core::service::BookingApi)
//! implementation to the REST routes:
//! - reference collections (`/tours/all`, `/clients/all`, `/cities/all`)
//! - booking create, update and fetch
//! - health checks

pub mod builder;
pub mod handlers;
pub mod host;
pub mod router;

pub use builder::ServerBuilder;
pub use host::ServerHost;
pub use router::build_booking_routes;
