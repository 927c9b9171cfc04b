//! Remote implementations of [`BookingApi`](crate::core::service::BookingApi)

#[cfg(feature = "http-client")]
pub mod http;

#[cfg(feature = "http-client")]
pub use http::HttpBookingApi;
