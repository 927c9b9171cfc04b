//! Booking itinerary and group membership synchronization
//!
//! - [`itinerary`]: day/date sequencing of the per-day plan
//! - [`members`]: the capacity-bounded traveler list
//! - [`form`]: the orchestrator tying both to tour/client selection
//! - [`reference`]: tours, clients and cities cached by the form
//! - [`payload`]: the submitted booking and its validation

pub mod form;
pub mod itinerary;
pub mod members;
pub mod model;
pub mod payload;
pub mod reference;

pub use form::{BookingForm, FormState, Notice};
pub use model::{
    CapacityField, CapacityInput, City, Client, ItineraryEntry, PrototypeMember, Tour, TourDay,
    TourType, TravelerMember,
};
pub use payload::{BookingPayload, BookingRecord};
pub use reference::{LoadState, LoadTicket, ReferenceBatch, ReferenceKind, fetch_references};
