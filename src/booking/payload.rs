//! Submitted booking payload and its validation
//!
//! The same checks run in the form before submission and in the server on
//! receipt, so a payload the form lets through is one the server accepts.

use crate::booking::itinerary;
use crate::booking::model::{CapacityInput, Client, ItineraryEntry, Tour, TravelerMember};
use crate::core::error::{DeskError, DeskResult, FieldValidationError, ValidationError};
use crate::core::validation::schema_errors;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Body of `POST /bookings` and `PUT /bookings/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub client_id: Uuid,
    pub tour_id: Uuid,
    pub journey_date: NaiveDate,
    #[serde(default)]
    pub capacity: CapacityInput,
    #[serde(default)]
    #[validate(nested)]
    pub booking_details: Vec<ItineraryEntry>,
    #[serde(default)]
    #[validate(nested)]
    pub group_tour_members: Vec<TravelerMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
}

impl BookingPayload {
    /// Checks that need no reference data: field schema, itinerary sequence
    /// anchored at the journey date, and the member bound
    pub fn check(&self) -> Vec<FieldValidationError> {
        let mut errors = schema_errors(self);
        errors.extend(itinerary::check_sequence(
            &self.booking_details,
            Some(self.journey_date),
        ));

        let max_members = self.capacity.max_members();
        if self.group_tour_members.len() > max_members as usize {
            errors.push(FieldValidationError::new(
                "groupTourMembers",
                format!(
                    "At most {} members allowed besides the client (found {})",
                    max_members,
                    self.group_tour_members.len()
                ),
            ));
        }
        errors
    }

    /// Checks against the reference data the payload points at
    ///
    /// `tour` and `client` are the records found for `tourId` / `clientId`, if
    /// any. `known_city` tells whether an itinerary location exists.
    pub fn check_references(
        &self,
        tour: Option<&Tour>,
        client: Option<&Client>,
        known_city: impl Fn(Uuid) -> bool,
    ) -> Vec<FieldValidationError> {
        let mut errors = Vec::new();

        match tour {
            None => errors.push(FieldValidationError::new("tourId", "Unknown tour")),
            Some(tour) if !tour.is_group() && !self.group_tour_members.is_empty() => {
                errors.push(FieldValidationError::new(
                    "groupTourMembers",
                    format!("'{}' is not a group tour and cannot list members", tour.name),
                ));
            }
            Some(_) => {}
        }

        if client.is_none() {
            errors.push(FieldValidationError::new("clientId", "Unknown client"));
        }

        for (i, entry) in self.booking_details.iter().enumerate() {
            let unknown = entry.location_id.is_some_and(|id| !known_city(id));
            if unknown {
                errors.push(FieldValidationError::new(
                    format!("bookingDetails[{}].locationId", i),
                    "Unknown city",
                ));
            }
        }
        errors
    }

    /// [`check`](Self::check) as a result
    pub fn validate_payload(&self) -> DeskResult<()> {
        into_result(self.check())
    }
}

/// Turn collected field errors into a validation failure
pub fn into_result(mut errors: Vec<FieldValidationError>) -> DeskResult<()> {
    if errors.is_empty() {
        return Ok(());
    }
    errors.sort_by(|a, b| a.field.cmp(&b.field));
    errors.dedup();
    Err(DeskError::Validation(ValidationError::FieldErrors(errors)))
}

/// A stored booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: BookingPayload,
}

impl BookingRecord {
    pub fn new(payload: BookingPayload) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            payload,
        }
    }

    /// Replace the payload wholesale and bump `updated_at`
    pub fn replace(&mut self, payload: BookingPayload) {
        self.payload = payload;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::model::{TourDay, TourType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn payload() -> BookingPayload {
        let days = vec![TourDay::default(), TourDay::default()];
        BookingPayload {
            client_id: Uuid::new_v4(),
            tour_id: Uuid::new_v4(),
            journey_date: date(2024, 6, 1),
            capacity: CapacityInput::new(3, 0, 0),
            booking_details: itinerary::seed(Some(date(2024, 6, 1)), &days),
            group_tour_members: vec![TravelerMember {
                name: "Anu".into(),
                mobile: "9876543210".into(),
                ..Default::default()
            }],
            branch_id: None,
            created_by: None,
        }
    }

    fn tour(tour_type: TourType) -> Tour {
        Tour {
            id: Uuid::new_v4(),
            name: "Golden Triangle".into(),
            tour_type,
            capacity: CapacityInput::new(3, 0, 0),
            itinerary: vec![],
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        assert!(payload().check().is_empty());
        assert!(payload().validate_payload().is_ok());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(payload()).unwrap();
        assert!(json["bookingDetails"].is_array());
        assert!(json["groupTourMembers"].is_array());
        assert_eq!(json["journeyDate"], "2024-06-01");
        assert!(json.get("branchId").is_none());
    }

    #[test]
    fn test_member_schema_errors_have_paths() {
        let mut p = payload();
        p.group_tour_members[0].mobile = "12345".into();
        p.group_tour_members[0].name = String::new();

        let fields: Vec<String> = p.check().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"groupTourMembers[0].mobile".to_string()));
        assert!(fields.contains(&"groupTourMembers[0].name".to_string()));
    }

    #[test]
    fn test_itinerary_must_start_on_journey_date() {
        let mut p = payload();
        p.journey_date = date(2024, 6, 5);
        let fields: Vec<String> = p.check().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["bookingDetails[0].date", "bookingDetails[1].date"]
        );
    }

    #[test]
    fn test_member_bound() {
        let mut p = payload();
        p.capacity = CapacityInput::new(1, 0, 0);
        let errors = p.check();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "groupTourMembers");
    }

    #[test]
    fn test_reference_checks() {
        let p = payload();
        let group = tour(TourType::Group);
        let individual = tour(TourType::Individual);

        let errors = p.check_references(None, None, |_| true);
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["tourId", "clientId"]);

        let errors = p.check_references(Some(&individual), None, |_| true);
        assert!(errors.iter().any(|e| e.field == "groupTourMembers"));

        let mut p = p;
        p.booking_details[1].location_id = Some(Uuid::new_v4());
        let client = Client {
            id: p.client_id,
            name: "Meera".into(),
            mobile: "9876543210".into(),
            email: None,
            family_friends: vec![],
        };
        let errors = p.check_references(Some(&group), Some(&client), |_| false);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "bookingDetails[1].locationId");
    }

    #[test]
    fn test_record_flattens_payload() {
        let record = BookingRecord::new(payload());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], record.id.to_string());
        assert!(json["bookingDetails"].is_array());

        let parsed: BookingRecord = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
    }
}
