//! Typed error handling for tourdesk
//!
//! Every failure in the crate is scoped to a single booking form or a single
//! request; nothing here is fatal to the process. The variants follow the way
//! failures are recovered:
//!
//! - [`ValidationError`]: malformed input, shown inline per field, blocks submission
//! - [`PreconditionError`]: an action attempted in a state that does not allow it;
//!   rejected before any state mutation
//! - [`EntityError`]: a referenced tour, client, city or booking does not exist
//! - [`RemoteError`]: reference-data fetch failures and rejected submissions
//! - [`ConfigError`]: configuration parsing problems
//!
//! # Example
//!
//! ```rust,ignore
//! use tourdesk::prelude::*;
//!
//! match form.select_tour(tour_id) {
//!     Ok(()) => {}
//!     Err(DeskError::Precondition(PreconditionError::MissingJourneyDate)) => {
//!         // inline error already recorded on "journeyDate"
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The main error type for tourdesk
#[derive(Debug)]
pub enum DeskError {
    /// Input validation errors
    Validation(ValidationError),

    /// Action rejected because the form is not in a state that allows it
    Precondition(PreconditionError),

    /// Referenced entity errors
    Entity(EntityError),

    /// Remote API errors (fetch and submission)
    Remote(RemoteError),

    /// Configuration errors
    Config(ConfigError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for DeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeskError::Validation(e) => write!(f, "{}", e),
            DeskError::Precondition(e) => write!(f, "{}", e),
            DeskError::Entity(e) => write!(f, "{}", e),
            DeskError::Remote(e) => write!(f, "{}", e),
            DeskError::Config(e) => write!(f, "{}", e),
            DeskError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DeskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DeskError::Validation(e) => Some(e),
            DeskError::Precondition(e) => Some(e),
            DeskError::Entity(e) => Some(e),
            DeskError::Remote(e) => Some(e),
            DeskError::Config(e) => Some(e),
            DeskError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    /// Field errors carried in `details.fields`, if any
    pub fn field_errors(&self) -> Vec<FieldValidationError> {
        self.details
            .as_ref()
            .and_then(|details| details.get("fields"))
            .and_then(|fields| serde_json::from_value(fields.clone()).ok())
            .unwrap_or_default()
    }
}

impl DeskError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeskError::Validation(e) => e.status_code(),
            DeskError::Precondition(_) => StatusCode::CONFLICT,
            DeskError::Entity(e) => e.status_code(),
            DeskError::Remote(e) => e.status_code(),
            DeskError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DeskError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DeskError::Validation(e) => e.error_code(),
            DeskError::Precondition(e) => e.error_code(),
            DeskError::Entity(e) => e.error_code(),
            DeskError::Remote(e) => e.error_code(),
            DeskError::Config(_) => "CONFIG_ERROR",
            DeskError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Per-field errors carried by this error, if it has any
    pub fn field_errors(&self) -> Option<&[FieldValidationError]> {
        match self {
            DeskError::Validation(ValidationError::FieldErrors(errors)) => Some(errors),
            DeskError::Remote(RemoteError::Rejected { fields, .. }) if !fields.is_empty() => {
                Some(fields)
            }
            _ => None,
        }
    }

    /// Shorthand for a single-field validation error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        DeskError::Validation(ValidationError::FieldErrors(vec![FieldValidationError::new(
            field, message,
        )]))
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            DeskError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            DeskError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            DeskError::Remote(RemoteError::Rejected { fields, .. }) if !fields.is_empty() => {
                Some(serde_json::json!({ "fields": fields }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for DeskError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug)]
pub enum ValidationError {
    /// One or more field validation errors
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    InvalidJson { message: String },

    /// Invalid UUID format
    InvalidUuid { value: String },
}

/// A single field validation error
///
/// `field` uses the wire path of the field, e.g. `groupTourMembers[0].mobile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(f, "Validation errors: {}", msgs.join(", "))
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
            ValidationError::InvalidUuid { value } => {
                write!(f, "Invalid UUID format: {}", value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::FieldErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::InvalidJson { .. } => StatusCode::BAD_REQUEST,
            ValidationError::InvalidUuid { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            ValidationError::InvalidUuid { .. } => "INVALID_UUID",
        }
    }
}

impl From<ValidationError> for DeskError {
    fn from(err: ValidationError) -> Self {
        DeskError::Validation(err)
    }
}

// =============================================================================
// Precondition Errors
// =============================================================================

/// An action was attempted in a state that does not allow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    /// A tour was selected before a journey date was chosen
    MissingJourneyDate,

    /// The traveler list is already at its maximum length
    MemberCapacityReached { max_members: u32 },

    /// Capacity fields are only editable on a group tour booking
    CapacityNotEditable,

    /// A reference collection has not finished loading (or failed)
    ReferenceNotReady { collection: String },

    /// Index-addressed operation out of range
    IndexOutOfRange {
        list: String,
        index: usize,
        len: usize,
    },

    /// The form has been submitted or cancelled
    FormClosed,

    /// The session lacks the permission required for the action
    PermissionDenied { permission: String },
}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreconditionError::MissingJourneyDate => {
                write!(f, "Select a journey date before selecting a tour")
            }
            PreconditionError::MemberCapacityReached { max_members } => {
                write!(
                    f,
                    "Cannot add more members: the booking allows at most {} besides the client",
                    max_members
                )
            }
            PreconditionError::CapacityNotEditable => {
                write!(f, "Traveler counts can only be edited for a group tour")
            }
            PreconditionError::ReferenceNotReady { collection } => {
                write!(f, "{} are not loaded yet", collection)
            }
            PreconditionError::IndexOutOfRange { list, index, len } => {
                write!(
                    f,
                    "No {} entry at index {} (list has {} entries)",
                    list, index, len
                )
            }
            PreconditionError::FormClosed => {
                write!(f, "The booking form is no longer open")
            }
            PreconditionError::PermissionDenied { permission } => {
                write!(f, "Missing permission: {}", permission)
            }
        }
    }
}

impl std::error::Error for PreconditionError {}

impl PreconditionError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PreconditionError::MissingJourneyDate => "MISSING_JOURNEY_DATE",
            PreconditionError::MemberCapacityReached { .. } => "MEMBER_CAPACITY_REACHED",
            PreconditionError::CapacityNotEditable => "CAPACITY_NOT_EDITABLE",
            PreconditionError::ReferenceNotReady { .. } => "REFERENCE_NOT_READY",
            PreconditionError::IndexOutOfRange { .. } => "INDEX_OUT_OF_RANGE",
            PreconditionError::FormClosed => "FORM_CLOSED",
            PreconditionError::PermissionDenied { .. } => "PERMISSION_DENIED",
        }
    }
}

impl From<PreconditionError> for DeskError {
    fn from(err: PreconditionError) -> Self {
        DeskError::Precondition(err)
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to referenced entities
#[derive(Debug)]
pub enum EntityError {
    /// Entity was not found
    NotFound { entity_type: String, id: Uuid },
}

impl fmt::Display for EntityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityError::NotFound { entity_type, id } => {
                write!(f, "{} with id '{}' not found", entity_type, id)
            }
        }
    }
}

impl std::error::Error for EntityError {}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
        }
    }
}

impl From<EntityError> for DeskError {
    fn from(err: EntityError) -> Self {
        DeskError::Entity(err)
    }
}

// =============================================================================
// Remote Errors
// =============================================================================

/// Errors coming back from the remote API
#[derive(Debug)]
pub enum RemoteError {
    /// The request never produced a usable response
    Transport { message: String },

    /// The API rejected the request
    ///
    /// `fields` is empty when the server returned a generic error.
    Rejected {
        status: u16,
        code: String,
        message: String,
        fields: Vec<FieldValidationError>,
    },

    /// The response body could not be decoded
    Decode { message: String },
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Transport { message } => {
                write!(f, "Remote API unreachable: {}", message)
            }
            RemoteError::Rejected {
                status,
                code,
                message,
                ..
            } => {
                write!(f, "Remote API rejected request ({} {}): {}", status, code, message)
            }
            RemoteError::Decode { message } => {
                write!(f, "Failed to decode remote response: {}", message)
            }
        }
    }
}

impl std::error::Error for RemoteError {}

impl RemoteError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RemoteError::Transport { .. } => StatusCode::BAD_GATEWAY,
            RemoteError::Rejected { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            RemoteError::Decode { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RemoteError::Transport { .. } => "REMOTE_TRANSPORT_ERROR",
            RemoteError::Rejected { .. } => "REMOTE_REJECTED",
            RemoteError::Decode { .. } => "REMOTE_DECODE_ERROR",
        }
    }
}

impl From<RemoteError> for DeskError {
    fn from(err: RemoteError) -> Self {
        DeskError::Remote(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for DeskError {
    fn from(err: ConfigError) -> Self {
        DeskError::Config(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for DeskError {
    fn from(err: serde_json::Error) -> Self {
        DeskError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for DeskError {
    fn from(err: std::io::Error) -> Self {
        DeskError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for DeskError {
    fn from(err: serde_yaml::Error) -> Self {
        DeskError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<anyhow::Error> for DeskError {
    fn from(err: anyhow::Error) -> Self {
        DeskError::Internal(err.to_string())
    }
}

/// A specialized Result type for tourdesk operations
pub type DeskResult<T> = Result<T, DeskError>;
