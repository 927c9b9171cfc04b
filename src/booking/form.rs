//! Booking form orchestration
//!
//! [`BookingForm`] owns the in-progress booking: the journey date, the tour
//! and client selections, the itinerary and the member list. Every user action
//! is a `&mut self` method that either applies fully or leaves the form as it
//! was and returns an error.
//!
//! Reference collections are loaded in three steps so the form is never
//! borrowed across an await:
//!
//! ```ignore
//! if let Some(ticket) = form.begin_reference_load() {
//!     let batch = fetch_references(&api, &ticket).await;
//!     form.apply_references(batch);
//! }
//! ```

use crate::booking::itinerary;
use crate::booking::members;
use crate::booking::model::{
    CapacityField, CapacityInput, City, Client, ItineraryEntry, Tour, TravelerMember,
};
use crate::booking::payload::{BookingPayload, BookingRecord, into_result};
use crate::booking::reference::{
    LoadState, LoadTicket, ReferenceBatch, ReferenceData, fetch_references,
};
use crate::core::entity::{Entity, find_by_id};
use crate::core::error::{
    DeskError, DeskResult, EntityError, FieldValidationError, PreconditionError,
};
use crate::core::service::BookingApi;
use crate::core::session::{PERM_BOOKING_CREATE, PERM_BOOKING_UPDATE, Session};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Where the form stands in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Empty,
    TourSelected,
    ClientSelected,
    BothSelected,
    Submitted,
    Cancelled,
}

impl FormState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FormState::Submitted | FormState::Cancelled)
    }
}

/// User-facing messages raised by form actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Members removed from the tail after a capacity change
    MembersDropped { names: Vec<String> },
    /// An action was refused; the form is unchanged
    Rejected { message: String },
    /// A reference collection failed to load
    LoadFailed { collection: String, message: String },
    /// Submission failed without field-level details
    SubmissionFailed { message: String },
    Saved { booking_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Open,
    Submitted,
    Cancelled,
}

/// A booking being created or edited
#[derive(Debug, Clone)]
pub struct BookingForm {
    session: Session,
    booking_id: Option<Uuid>,
    lifecycle: Lifecycle,
    journey_date: Option<NaiveDate>,
    tour_id: Option<Uuid>,
    client_id: Option<Uuid>,
    capacity: CapacityInput,
    itinerary: Vec<ItineraryEntry>,
    members: Vec<TravelerMember>,
    references: ReferenceData,
    field_errors: BTreeMap<String, String>,
    notices: Vec<Notice>,
    generation: u64,
}

impl BookingForm {
    /// An empty form for a new booking
    pub fn new(session: Session) -> Self {
        Self {
            session,
            booking_id: None,
            lifecycle: Lifecycle::Open,
            journey_date: None,
            tour_id: None,
            client_id: None,
            capacity: CapacityInput::default(),
            itinerary: Vec::new(),
            members: Vec::new(),
            references: ReferenceData::default(),
            field_errors: BTreeMap::new(),
            notices: Vec::new(),
            generation: 0,
        }
    }

    /// A form pre-filled from a stored booking; submitting it updates the record
    pub fn for_existing(session: Session, record: BookingRecord) -> Self {
        let payload = record.payload;
        let mut form = Self::new(session);
        form.booking_id = Some(record.id);
        form.journey_date = Some(payload.journey_date);
        form.tour_id = Some(payload.tour_id);
        form.client_id = Some(payload.client_id);
        form.capacity = payload.capacity;
        form.itinerary = payload.booking_details;
        form.members = payload.group_tour_members;
        form
    }

    pub fn state(&self) -> FormState {
        match self.lifecycle {
            Lifecycle::Submitted => FormState::Submitted,
            Lifecycle::Cancelled => FormState::Cancelled,
            Lifecycle::Open => match (self.tour_id.is_some(), self.client_id.is_some()) {
                (false, false) => FormState::Empty,
                (true, false) => FormState::TourSelected,
                (false, true) => FormState::ClientSelected,
                (true, true) => FormState::BothSelected,
            },
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Set in edit mode and after a successful submission
    pub fn booking_id(&self) -> Option<Uuid> {
        self.booking_id
    }

    pub fn journey_date(&self) -> Option<NaiveDate> {
        self.journey_date
    }

    pub fn tour_id(&self) -> Option<Uuid> {
        self.tour_id
    }

    pub fn client_id(&self) -> Option<Uuid> {
        self.client_id
    }

    pub fn capacity(&self) -> &CapacityInput {
        &self.capacity
    }

    pub fn max_members(&self) -> u32 {
        members::compute_max_members(&self.capacity)
    }

    pub fn itinerary(&self) -> &[ItineraryEntry] {
        &self.itinerary
    }

    pub fn members(&self) -> &[TravelerMember] {
        &self.members
    }

    pub fn references(&self) -> &ReferenceData {
        &self.references
    }

    /// The selected tour, once tours are loaded
    pub fn selected_tour(&self) -> Option<&Tour> {
        self.tour_id.and_then(|id| self.references.tours.get(id))
    }

    /// The selected client, once clients are loaded
    pub fn selected_client(&self) -> Option<&Client> {
        self.client_id.and_then(|id| self.references.clients.get(id))
    }

    /// Inline errors keyed by wire path (`groupTourMembers[0].mobile`)
    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    /// Drain the notices raised since the last call
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn can_select_tour(&self) -> bool {
        self.is_open() && self.references.tours.is_ready()
    }

    pub fn can_select_client(&self) -> bool {
        self.is_open() && self.references.clients.is_ready()
    }

    /// Capacity is editable only while a group tour is selected
    pub fn can_edit_capacity(&self) -> bool {
        self.is_open() && self.selected_tour().is_some_and(Tour::is_group)
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle == Lifecycle::Open
    }

    pub fn set_journey_date(&mut self, date: NaiveDate) -> DeskResult<()> {
        self.ensure_open()?;
        self.journey_date = Some(date);
        self.field_errors.remove("journeyDate");

        if !self.itinerary.is_empty() {
            let entries = std::mem::take(&mut self.itinerary);
            self.itinerary = itinerary::resequence(entries, date);
            debug!(journey_date = %date, entries = self.itinerary.len(), "itinerary re-dated");
        }
        Ok(())
    }

    /// Select a tour and reseed the itinerary, capacity and members from it
    ///
    /// Without a journey date the selection is refused and the form is left
    /// exactly as it was, apart from an inline `journeyDate` error.
    pub fn select_tour(&mut self, tour_id: Uuid) -> DeskResult<()> {
        self.ensure_open()?;
        let tour = lookup(&self.references.tours, tour_id).map_err(|e| self.reject(e))?;

        let Some(start) = self.journey_date else {
            self.field_errors.insert(
                "journeyDate".to_string(),
                "Select a journey date before choosing a tour".to_string(),
            );
            debug!(tour_id = %tour_id, "tour selection refused without journey date");
            return Err(PreconditionError::MissingJourneyDate.into());
        };

        self.tour_id = Some(tour.id);
        self.field_errors.remove("tourId");
        self.itinerary = itinerary::seed(Some(start), &tour.itinerary);
        self.capacity = tour.capacity;

        if tour.is_group() {
            match self.selected_client().map(|c| c.family_friends.clone()) {
                Some(prototypes) => {
                    self.members = members::seed_from_prototype(&prototypes, self.max_members());
                }
                None => self.reconcile_members(),
            }
        } else {
            self.members.clear();
        }

        info!(
            tour_id = %tour.id,
            tour = %tour.name,
            group = tour.is_group(),
            days = self.itinerary.len(),
            members = self.members.len(),
            "tour selected"
        );
        Ok(())
    }

    /// Select the primary client; a selected group tour takes its members
    /// from the client's family and friends
    pub fn select_client(&mut self, client_id: Uuid) -> DeskResult<()> {
        self.ensure_open()?;
        let client = lookup(&self.references.clients, client_id).map_err(|e| self.reject(e))?;

        if self.tour_id.is_some() {
            self.references
                .tours
                .require()
                .map(|_| ())
                .map_err(|e| self.reject(e))?;
        }
        let group = self.selected_tour().is_some_and(Tour::is_group);

        self.client_id = Some(client.id);
        self.field_errors.remove("clientId");
        if group {
            self.members = members::seed_from_prototype(&client.family_friends, self.max_members());
        }

        info!(
            client_id = %client.id,
            client = %client.name,
            members = self.members.len(),
            "client selected"
        );
        Ok(())
    }

    pub fn append_itinerary_entry(&mut self) -> DeskResult<()> {
        self.ensure_open()?;
        let entry = itinerary::append_now(&self.itinerary, self.journey_date);
        debug!(day = entry.day, date = %entry.date, "itinerary entry appended");
        self.itinerary.push(entry);
        Ok(())
    }

    pub fn remove_itinerary_entry(&mut self, index: usize) -> DeskResult<()> {
        self.ensure_open()?;
        self.itinerary = itinerary::remove_and_resequence(&self.itinerary, index, self.journey_date)
            .map_err(|e| self.reject(e))?;
        self.clear_errors_under("bookingDetails");
        Ok(())
    }

    /// Change an entry's description and location; day and date stay derived
    pub fn update_itinerary_entry(
        &mut self,
        index: usize,
        description: impl Into<String>,
        location_id: Option<Uuid>,
    ) -> DeskResult<()> {
        self.ensure_open()?;
        self.check_index("itinerary", index, self.itinerary.len())?;

        let path = format!("bookingDetails[{}].locationId", index);
        if let Some(city_id) = location_id {
            let unknown = self
                .references
                .cities
                .items()
                .is_some_and(|cities| find_by_id(cities, city_id).is_none());
            if unknown {
                self.field_errors.insert(path.clone(), "Unknown city".to_string());
                return Err(DeskError::field(path, "Unknown city"));
            }
        }

        let entry = &mut self.itinerary[index];
        entry.description = description.into();
        entry.location_id = location_id;
        self.field_errors.remove(&path);
        Ok(())
    }

    pub fn edit_capacity(&mut self, field: CapacityField, value: u32) -> DeskResult<()> {
        self.ensure_open()?;
        if !self.can_edit_capacity() {
            return Err(self.reject(PreconditionError::CapacityNotEditable));
        }

        self.capacity.set(field, value);
        debug!(
            field = field.wire_name(),
            value,
            max_members = self.max_members(),
            "capacity edited"
        );
        self.reconcile_members();
        Ok(())
    }

    pub fn add_member(&mut self) -> DeskResult<()> {
        self.ensure_open()?;
        let max_members = self.max_members();
        members::append(&mut self.members, max_members).map_err(|e| self.reject(e))
    }

    pub fn remove_member(&mut self, index: usize) -> DeskResult<TravelerMember> {
        self.ensure_open()?;
        let removed = members::remove(&mut self.members, index).map_err(|e| self.reject(e))?;
        self.clear_errors_under("groupTourMembers");
        Ok(removed)
    }

    /// Replace the member at `index`; the persisted id is kept when the new
    /// record carries none
    pub fn update_member(&mut self, index: usize, mut member: TravelerMember) -> DeskResult<()> {
        self.ensure_open()?;
        self.check_index("member", index, self.members.len())?;

        let slot = &mut self.members[index];
        if member.id.is_none() {
            member.id = slot.id;
        }
        *slot = member;
        self.clear_errors_under(&format!("groupTourMembers[{}]", index));
        Ok(())
    }

    /// Start loading every collection that is not ready yet
    ///
    /// Returns `None` when the form is closed or nothing needs loading. A new
    /// ticket supersedes any load still in flight.
    pub fn begin_reference_load(&mut self) -> Option<LoadTicket> {
        if !self.is_open() {
            return None;
        }
        let kinds = self.references.pending();
        if kinds.is_empty() {
            return None;
        }

        self.generation += 1;
        self.references.mark_loading(&kinds);
        debug!(generation = self.generation, ?kinds, "reference load started");
        Some(LoadTicket {
            generation: self.generation,
            kinds,
        })
    }

    /// Apply a finished load; returns `false` when the batch was discarded
    pub fn apply_references(&mut self, batch: ReferenceBatch) -> bool {
        if !self.is_open() || batch.generation != self.generation {
            debug!(
                batch_generation = batch.generation,
                current_generation = self.generation,
                open = self.is_open(),
                "discarding stale reference batch"
            );
            return false;
        }

        for (kind, message) in self.references.apply(batch) {
            warn!(collection = kind.label(), error = %message, "reference load failed");
            self.notices.push(Notice::LoadFailed {
                collection: kind.label().to_string(),
                message,
            });
        }
        true
    }

    /// Load all pending reference collections from `api`
    pub async fn load_references(&mut self, api: &dyn BookingApi) -> bool {
        let Some(ticket) = self.begin_reference_load() else {
            return false;
        };
        let batch = fetch_references(api, &ticket).await;
        self.apply_references(batch)
    }

    /// Validate the form and build the payload to submit
    ///
    /// On failure the per-field errors are recorded on the form and returned.
    pub fn prepare_submission(&mut self) -> DeskResult<BookingPayload> {
        self.ensure_open()?;
        let permission = if self.booking_id.is_some() {
            PERM_BOOKING_UPDATE
        } else {
            PERM_BOOKING_CREATE
        };
        self.session
            .require(permission)
            .map_err(|e| self.reject(e))?;

        let (Some(journey_date), Some(tour_id), Some(client_id)) =
            (self.journey_date, self.tour_id, self.client_id)
        else {
            let mut errors = Vec::new();
            if self.journey_date.is_none() {
                errors.push(FieldValidationError::new("journeyDate", "Select a journey date"));
            }
            if self.tour_id.is_none() {
                errors.push(FieldValidationError::new("tourId", "Select a tour"));
            }
            if self.client_id.is_none() {
                errors.push(FieldValidationError::new("clientId", "Select a client"));
            }
            return Err(self.fail_validation(errors));
        };

        let payload = BookingPayload {
            client_id,
            tour_id,
            journey_date,
            capacity: self.capacity,
            booking_details: self.itinerary.clone(),
            group_tour_members: self.members.clone(),
            branch_id: self.session.branch_id,
            created_by: Some(self.session.user_id),
        };

        let mut errors = payload.check();
        if let Some(cities) = self.references.cities.items() {
            let known_city = |id: Uuid| find_by_id::<City>(cities, id).is_some();
            if self.references.tours.is_ready() && self.references.clients.is_ready() {
                errors.extend(payload.check_references(
                    self.selected_tour(),
                    self.selected_client(),
                    known_city,
                ));
            }
        }

        if !errors.is_empty() {
            return Err(self.fail_validation(errors));
        }
        self.field_errors.clear();
        Ok(payload)
    }

    /// Validate and send the booking
    ///
    /// Server-side field errors land on the form's inline errors; other
    /// failures raise a [`Notice::SubmissionFailed`]. The form stays open on
    /// failure.
    pub async fn submit(&mut self, api: &dyn BookingApi) -> DeskResult<BookingRecord> {
        let payload = self.prepare_submission()?;
        let result = match self.booking_id {
            Some(id) => api.update_booking(id, payload).await,
            None => api.create_booking(payload).await,
        };

        match result {
            Ok(record) => {
                self.lifecycle = Lifecycle::Submitted;
                self.booking_id = Some(record.id);
                self.generation += 1;
                self.references.abandon_loading();
                self.notices.push(Notice::Saved {
                    booking_id: record.id,
                });
                info!(booking_id = %record.id, members = record.payload.group_tour_members.len(), "booking submitted");
                Ok(record)
            }
            Err(e) => {
                match e.field_errors() {
                    Some(fields) if !fields.is_empty() => {
                        self.record_field_errors(fields);
                    }
                    _ => self.notices.push(Notice::SubmissionFailed {
                        message: e.to_string(),
                    }),
                }
                warn!(error = %e, "booking submission failed");
                Err(e)
            }
        }
    }

    /// Close the form without submitting; in-flight loads are discarded
    pub fn cancel(&mut self) -> DeskResult<()> {
        self.ensure_open()?;
        self.lifecycle = Lifecycle::Cancelled;
        self.generation += 1;
        self.references.abandon_loading();
        self.itinerary.clear();
        self.members.clear();
        self.field_errors.clear();
        info!(booking_id = ?self.booking_id, "booking form cancelled");
        Ok(())
    }

    fn ensure_open(&mut self) -> DeskResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(self.reject(PreconditionError::FormClosed))
        }
    }

    fn check_index(&mut self, list: &str, index: usize, len: usize) -> DeskResult<()> {
        if index < len {
            return Ok(());
        }
        Err(self.reject(PreconditionError::IndexOutOfRange {
            list: list.to_string(),
            index,
            len,
        }))
    }

    /// Record a refused action as a notice and hand the error back
    fn reject(&mut self, err: impl Into<DeskError>) -> DeskError {
        let err = err.into();
        debug!(error = %err, "booking form action rejected");
        self.notices.push(Notice::Rejected {
            message: err.to_string(),
        });
        err
    }

    fn reconcile_members(&mut self) {
        let max_members = self.max_members();
        let outcome = members::reconcile(std::mem::take(&mut self.members), max_members);
        let names = outcome.dropped_names();
        self.members = outcome.kept;

        if !names.is_empty() {
            warn!(dropped = ?names, max_members, "members dropped after capacity change");
            self.notices.push(Notice::MembersDropped { names });
        }
    }

    fn fail_validation(&mut self, errors: Vec<FieldValidationError>) -> DeskError {
        self.record_field_errors(&errors);
        match into_result(errors) {
            Err(e) => e,
            Ok(()) => DeskError::Internal("validation failed without errors".to_string()),
        }
    }

    fn record_field_errors(&mut self, errors: &[FieldValidationError]) {
        self.field_errors.clear();
        for error in errors {
            self.field_errors
                .entry(error.field.clone())
                .or_insert_with(|| error.message.clone());
        }
    }

    fn clear_errors_under(&mut self, prefix: &str) {
        self.field_errors.retain(|field, _| !field.starts_with(prefix));
    }
}

fn lookup<T: Entity>(state: &LoadState<T>, id: Uuid) -> DeskResult<T> {
    let items = state.require()?;
    find_by_id(items, id).cloned().ok_or_else(|| {
        EntityError::NotFound {
            entity_type: T::resource_name_singular().to_string(),
            id,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::model::{PrototypeMember, TourDay, TourType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session() -> Session {
        Session::new(Uuid::new_v4(), "Asha", "agent")
            .with_permissions([PERM_BOOKING_CREATE, PERM_BOOKING_UPDATE])
    }

    fn tour(tour_type: TourType, adults: u32, days: usize) -> Tour {
        Tour {
            id: Uuid::new_v4(),
            name: "Kerala Backwaters".into(),
            tour_type,
            capacity: CapacityInput::new(adults, 0, 0),
            itinerary: (0..days)
                .map(|i| TourDay {
                    description: format!("Day {}", i + 1),
                    location_id: None,
                })
                .collect(),
        }
    }

    fn client(family: &[&str]) -> Client {
        Client {
            id: Uuid::new_v4(),
            name: "Meera".into(),
            mobile: "9876543210".into(),
            email: None,
            family_friends: family
                .iter()
                .map(|n| PrototypeMember {
                    name: Some(n.to_string()),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn loaded(tours: Vec<Tour>, clients: Vec<Client>) -> BookingForm {
        let mut form = BookingForm::new(session());
        form.references.tours = LoadState::Ready(tours);
        form.references.clients = LoadState::Ready(clients);
        form.references.cities = LoadState::Ready(vec![]);
        form
    }

    #[test]
    fn test_state_follows_selections() {
        let t = tour(TourType::Individual, 2, 1);
        let c = client(&[]);
        let mut form = loaded(vec![t.clone()], vec![c.clone()]);
        assert_eq!(form.state(), FormState::Empty);

        form.select_client(c.id).unwrap();
        assert_eq!(form.state(), FormState::ClientSelected);

        form.set_journey_date(date(2024, 6, 1)).unwrap();
        form.select_tour(t.id).unwrap();
        assert_eq!(form.state(), FormState::BothSelected);
    }

    #[test]
    fn test_group_tour_then_client_seeds_members() {
        let t = tour(TourType::Group, 3, 2);
        let c = client(&["Anu", "Bala", "Chitra", "Dev", "Esha"]);
        let mut form = loaded(vec![t.clone()], vec![c.clone()]);

        form.set_journey_date(date(2024, 6, 1)).unwrap();
        form.select_tour(t.id).unwrap();
        assert!(form.members().is_empty());

        form.select_client(c.id).unwrap();
        let names: Vec<&str> = form.members().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Anu", "Bala"]);
    }

    #[test]
    fn test_individual_tour_clears_members() {
        let group = tour(TourType::Group, 4, 1);
        let single = tour(TourType::Individual, 4, 1);
        let c = client(&["Anu", "Bala"]);
        let mut form = loaded(vec![group.clone(), single.clone()], vec![c.clone()]);

        form.set_journey_date(date(2024, 6, 1)).unwrap();
        form.select_client(c.id).unwrap();
        form.select_tour(group.id).unwrap();
        assert_eq!(form.members().len(), 2);

        form.select_tour(single.id).unwrap();
        assert!(form.members().is_empty());
        assert!(!form.can_edit_capacity());
    }

    #[test]
    fn test_select_tour_requires_loaded_tours() {
        let mut form = BookingForm::new(session());
        form.set_journey_date(date(2024, 6, 1)).unwrap();
        let err = form.select_tour(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.error_code(), "REFERENCE_NOT_READY");
        assert!(!form.can_select_tour());
    }

    #[test]
    fn test_select_unknown_tour() {
        let mut form = loaded(vec![], vec![]);
        form.set_journey_date(date(2024, 6, 1)).unwrap();
        let err = form.select_tour(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.error_code(), "ENTITY_NOT_FOUND");
        assert_eq!(form.tour_id(), None);
    }

    #[test]
    fn test_journey_date_change_redates_itinerary() {
        let t = tour(TourType::Individual, 2, 3);
        let mut form = loaded(vec![t.clone()], vec![]);
        form.set_journey_date(date(2024, 6, 1)).unwrap();
        form.select_tour(t.id).unwrap();

        form.set_journey_date(date(2024, 7, 30)).unwrap();
        let dates: Vec<NaiveDate> = form.itinerary().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2024, 7, 30), date(2024, 7, 31), date(2024, 8, 1)]);
    }

    #[test]
    fn test_capacity_not_editable_without_group_tour() {
        let mut form = loaded(vec![], vec![]);
        let err = form.edit_capacity(CapacityField::Adults, 5).unwrap_err();
        assert_eq!(err.error_code(), "CAPACITY_NOT_EDITABLE");
        assert!(matches!(form.take_notices()[..], [Notice::Rejected { .. }]));
    }

    #[test]
    fn test_add_member_at_capacity_warns() {
        let t = tour(TourType::Group, 2, 1);
        let mut form = loaded(vec![t.clone()], vec![]);
        form.set_journey_date(date(2024, 6, 1)).unwrap();
        form.select_tour(t.id).unwrap();

        form.add_member().unwrap();
        let err = form.add_member().unwrap_err();
        assert_eq!(err.error_code(), "MEMBER_CAPACITY_REACHED");
        assert_eq!(form.members().len(), 1);
    }

    #[test]
    fn test_update_member_keeps_persisted_id() {
        let t = tour(TourType::Group, 3, 1);
        let mut form = loaded(vec![t.clone()], vec![]);
        form.set_journey_date(date(2024, 6, 1)).unwrap();
        form.select_tour(t.id).unwrap();
        form.add_member().unwrap();
        let id = Uuid::new_v4();
        form.members[0].id = Some(id);

        form.update_member(
            0,
            TravelerMember {
                name: "Ravi".into(),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(form.members()[0].id, Some(id));
        assert_eq!(form.members()[0].name, "Ravi");
        assert!(form.update_member(3, TravelerMember::default()).is_err());
    }

    #[test]
    fn test_update_itinerary_rejects_unknown_city() {
        let t = tour(TourType::Individual, 2, 2);
        let mut form = loaded(vec![t.clone()], vec![]);
        form.set_journey_date(date(2024, 6, 1)).unwrap();
        form.select_tour(t.id).unwrap();

        let err = form
            .update_itinerary_entry(1, "Houseboat", Some(Uuid::new_v4()))
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert!(form.field_error("bookingDetails[1].locationId").is_some());
        assert_eq!(form.itinerary()[1].description, "Day 2");

        form.update_itinerary_entry(1, "Houseboat", None).unwrap();
        assert_eq!(form.itinerary()[1].description, "Houseboat");
        assert!(form.field_error("bookingDetails[1].locationId").is_none());
    }

    #[test]
    fn test_prepare_submission_requires_selections() {
        let mut form = loaded(vec![], vec![]);
        let err = form.prepare_submission().unwrap_err();
        let fields: Vec<&str> = err
            .field_errors()
            .unwrap()
            .iter()
            .map(|e| e.field.as_str())
            .collect();
        assert_eq!(fields, vec!["clientId", "journeyDate", "tourId"]);
        assert!(form.field_error("tourId").is_some());
    }

    #[test]
    fn test_prepare_submission_requires_permission() {
        let mut form = BookingForm::new(Session::new(Uuid::new_v4(), "Guest", "viewer"));
        let err = form.prepare_submission().unwrap_err();
        assert_eq!(err.error_code(), "PERMISSION_DENIED");
    }

    #[test]
    fn test_closed_form_rejects_mutation() {
        let mut form = loaded(vec![], vec![]);
        form.cancel().unwrap();
        assert_eq!(form.state(), FormState::Cancelled);
        assert!(form.state().is_terminal());

        let err = form.set_journey_date(date(2024, 6, 1)).unwrap_err();
        assert_eq!(err.error_code(), "FORM_CLOSED");
        assert!(form.cancel().is_err());
        assert!(form.begin_reference_load().is_none());
    }

    #[test]
    fn test_stale_batch_is_discarded() {
        let mut form = BookingForm::new(session());
        let first = form.begin_reference_load().unwrap();
        let second = form.begin_reference_load().unwrap();
        assert!(second.generation > first.generation);

        let stale = ReferenceBatch {
            generation: first.generation,
            tours: Some(Ok(vec![])),
            clients: None,
            cities: None,
        };
        assert!(!form.apply_references(stale));
        assert!(form.references().tours.is_loading());
    }

    #[test]
    fn test_for_existing_prefills_edit_mode() {
        let payload = BookingPayload {
            client_id: Uuid::new_v4(),
            tour_id: Uuid::new_v4(),
            journey_date: date(2024, 6, 1),
            capacity: CapacityInput::new(2, 1, 0),
            booking_details: vec![],
            group_tour_members: vec![TravelerMember {
                name: "Anu".into(),
                ..Default::default()
            }],
            branch_id: None,
            created_by: None,
        };
        let record = BookingRecord::new(payload);
        let form = BookingForm::for_existing(session(), record.clone());

        assert_eq!(form.booking_id(), Some(record.id));
        assert_eq!(form.state(), FormState::BothSelected);
        assert_eq!(form.max_members(), 2);
        assert_eq!(form.members().len(), 1);
    }
}
