//! Booking domain records
//!
//! Wire names are camelCase to match the API payloads (`bookingDetails`,
//! `groupTourMembers`, `locationId`, ...).

use crate::core::entity::Entity;
use crate::core::validation::{optional_date, optional_email, optional_mobile};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// =============================================================================
// Capacity
// =============================================================================

/// Seats always attributed to the primary client, never to listed members
pub const RESERVED_SEATS: u32 = 1;

/// Traveler counts of a tour or a group booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityInput {
    pub adults: u32,
    /// Children aged 5 to 11
    pub children_band_a: u32,
    /// Children under 5
    pub children_band_b: u32,
}

impl CapacityInput {
    pub fn new(adults: u32, children_band_a: u32, children_band_b: u32) -> Self {
        Self {
            adults,
            children_band_a,
            children_band_b,
        }
    }

    pub fn total_travelers(&self) -> u32 {
        self.adults
            .saturating_add(self.children_band_a)
            .saturating_add(self.children_band_b)
    }

    /// Travelers that can be listed besides the primary client
    pub fn max_members(&self) -> u32 {
        self.total_travelers().saturating_sub(RESERVED_SEATS)
    }

    pub fn get(&self, field: CapacityField) -> u32 {
        match field {
            CapacityField::Adults => self.adults,
            CapacityField::ChildrenBandA => self.children_band_a,
            CapacityField::ChildrenBandB => self.children_band_b,
        }
    }

    pub fn set(&mut self, field: CapacityField, value: u32) {
        match field {
            CapacityField::Adults => self.adults = value,
            CapacityField::ChildrenBandA => self.children_band_a = value,
            CapacityField::ChildrenBandB => self.children_band_b = value,
        }
    }
}

/// One editable traveler count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CapacityField {
    Adults,
    ChildrenBandA,
    ChildrenBandB,
}

impl CapacityField {
    /// Wire name of the field inside `capacity`
    pub fn wire_name(&self) -> &'static str {
        match self {
            CapacityField::Adults => "adults",
            CapacityField::ChildrenBandA => "childrenBandA",
            CapacityField::ChildrenBandB => "childrenBandB",
        }
    }
}

// =============================================================================
// Reference entities
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TourType {
    /// Several named travelers share one booking
    Group,
    #[default]
    Individual,
}

/// A day of a tour's stored itinerary, used to seed booking details
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourDay {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location_id: Option<Uuid>,
}

/// Tour product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub tour_type: TourType,
    #[serde(default)]
    pub capacity: CapacityInput,
    #[serde(default)]
    pub itinerary: Vec<TourDay>,
}

impl Tour {
    pub fn is_group(&self) -> bool {
        self.tour_type == TourType::Group
    }
}

impl Entity for Tour {
    fn resource_name() -> &'static str {
        "tours"
    }

    fn resource_name_singular() -> &'static str {
        "tour"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Family member or friend stored on a client record
///
/// Every field may be missing; dates may arrive as full timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrototypeMember {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub relation: Option<String>,
    pub date_of_birth: Option<String>,
    pub food_type: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub id_proof_type: Option<String>,
    pub id_proof_number: Option<String>,
}

/// Client master record (the booking's account holder)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub family_friends: Vec<PrototypeMember>,
}

impl Entity for Client {
    fn resource_name() -> &'static str {
        "clients"
    }

    fn resource_name_singular() -> &'static str {
        "client"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
}

impl Entity for City {
    fn resource_name() -> &'static str {
        "cities"
    }

    fn resource_name_singular() -> &'static str {
        "city"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Booking rows
// =============================================================================

/// One day of a booking's itinerary (a "booking detail")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryEntry {
    #[validate(range(min = 1, message = "Day must be a positive number"))]
    pub day: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location_id: Option<Uuid>,
}

/// A named traveler on a group booking, besides the primary client
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelerMember {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[validate(length(min = 1, message = "Member name is required"))]
    pub name: String,
    pub gender: String,
    pub relation: String,
    #[validate(custom(function = "optional_date"))]
    pub date_of_birth: String,
    pub food_type: String,
    #[validate(custom(function = "optional_mobile"))]
    pub mobile: String,
    #[validate(custom(function = "optional_email"))]
    pub email: String,
    pub id_proof_type: String,
    pub id_proof_number: String,
}

impl TravelerMember {
    /// Name used when reporting the member to the user
    pub fn display_name(&self, position: usize) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            format!("Member {}", position + 1)
        } else {
            name.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_members_reserves_client_seat() {
        assert_eq!(CapacityInput::new(3, 0, 0).max_members(), 2);
        assert_eq!(CapacityInput::new(2, 1, 1).max_members(), 3);
        assert_eq!(CapacityInput::new(1, 0, 0).max_members(), 0);
        assert_eq!(CapacityInput::new(0, 0, 0).max_members(), 0);
    }

    #[test]
    fn test_capacity_total_saturates() {
        let capacity = CapacityInput::new(u32::MAX, 5, 5);
        assert_eq!(capacity.total_travelers(), u32::MAX);
    }

    #[test]
    fn test_capacity_field_accessors() {
        let mut capacity = CapacityInput::default();
        capacity.set(CapacityField::ChildrenBandA, 4);
        assert_eq!(capacity.get(CapacityField::ChildrenBandA), 4);
        assert_eq!(capacity.children_band_a, 4);
        assert_eq!(CapacityField::ChildrenBandB.wire_name(), "childrenBandB");
    }

    #[test]
    fn test_itinerary_entry_wire_shape() {
        let entry = ItineraryEntry {
            day: 1,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            description: "Arrival".into(),
            location_id: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["day"], 1);
        assert_eq!(json["date"], "2024-06-01");
        assert!(json.get("locationId").is_some());
    }

    #[test]
    fn test_tour_deserializes_with_defaults() {
        let json = serde_json::json!({
            "id": Uuid::nil(),
            "name": "Kerala Backwaters",
            "tourType": "group",
            "capacity": { "adults": 3, "childrenBandA": 1, "childrenBandB": 0 }
        });
        let tour: Tour = serde_json::from_value(json).unwrap();
        assert!(tour.is_group());
        assert_eq!(tour.capacity.max_members(), 3);
        assert!(tour.itinerary.is_empty());
    }

    #[test]
    fn test_member_display_name_falls_back_to_position() {
        let mut member = TravelerMember::default();
        assert_eq!(member.display_name(2), "Member 3");
        member.name = " Ravi ".into();
        assert_eq!(member.display_name(2), "Ravi");
    }
}
