//! Building blocks shared by the booking modules, the server and the client

pub mod dates;
pub mod entity;
pub mod error;
pub mod service;
pub mod session;
pub mod validation;

pub use entity::{Entity, find_by_id};
pub use error::{DeskError, DeskResult, ErrorResponse, FieldValidationError};
pub use service::BookingApi;
pub use session::Session;
