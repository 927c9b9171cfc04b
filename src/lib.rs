//! # tourdesk
//!
//! Booking back-office core for a travel agency: keeps a booking's per-day
//! itinerary and its group traveler list consistent with the selected tour,
//! the primary client and the declared capacity, and serves the bookings over
//! a REST API.
//!
//! ## Features
//!
//! - **Date sequencing**: itinerary days stay numbered `1..n` on consecutive
//!   UTC dates from the journey date
//! - **Capacity-bounded members**: the traveler list never exceeds
//!   `adults + children - 1`; shrinking capacity names the dropped members
//! - **Form orchestration**: tour and client selection reseed the itinerary
//!   and members; stale reference loads are discarded
//! - **Shared validation**: the form and the server run the same payload checks
//! - **REST server and HTTP client** behind one [`BookingApi`](core::BookingApi) trait
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tourdesk::prelude::*;
//!
//! let config = DeskConfig::default_config();
//! let store = InMemoryBookingStore::from_seed(&config.seed);
//!
//! let mut form = BookingForm::new(session);
//! form.load_references(&store).await;
//! form.set_journey_date(journey_date)?;
//! form.select_tour(tour_id)?;
//! form.select_client(client_id)?;
//! let record = form.submit(&store).await?;
//! ```

pub mod booking;
pub mod client;
pub mod config;
pub mod core;
pub mod observability;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    pub use crate::booking::{
        BookingForm, BookingPayload, BookingRecord, CapacityField, CapacityInput, City, Client,
        FormState, ItineraryEntry, LoadState, Notice, PrototypeMember, ReferenceKind, Tour,
        TourDay, TourType, TravelerMember, fetch_references, itinerary, members,
    };

    pub use crate::config::DeskConfig;

    pub use crate::core::{
        dates::{nights_between, utc_today},
        entity::Entity,
        error::{DeskError, DeskResult, FieldValidationError, PreconditionError},
        service::BookingApi,
        session::{PERM_BOOKING_CREATE, PERM_BOOKING_UPDATE, Session},
    };

    pub use crate::server::ServerBuilder;
    pub use crate::storage::InMemoryBookingStore;

    #[cfg(feature = "http-client")]
    pub use crate::client::HttpBookingApi;

    pub use async_trait::async_trait;
    pub use chrono::NaiveDate;
    pub use uuid::Uuid;
}
