//! In-memory back office for tests, demos and the embedded server

use crate::booking::model::{City, Client, Tour};
use crate::booking::payload::{BookingPayload, BookingRecord, into_result};
use crate::config::SeedConfig;
use crate::core::entity::Entity;
use crate::core::error::{DeskError, DeskResult, EntityError};
use crate::core::service::BookingApi;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

fn lock_error(e: impl std::fmt::Display) -> DeskError {
    DeskError::Internal(format!("Failed to acquire lock: {}", e))
}

/// Thread-safe collection of one reference entity type
#[derive(Clone)]
pub struct ReferenceStore<T: Entity> {
    items: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Entity> ReferenceStore<T> {
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let map = items.into_iter().map(|item| (item.id(), item)).collect();
        Self {
            items: Arc::new(RwLock::new(map)),
        }
    }

    pub fn get(&self, id: Uuid) -> DeskResult<Option<T>> {
        let items = self.items.read().map_err(lock_error)?;
        Ok(items.get(&id).cloned())
    }

    /// All items ordered by name
    pub fn list(&self) -> DeskResult<Vec<T>> {
        let items = self.items.read().map_err(lock_error)?;
        let mut list: Vec<T> = items.values().cloned().collect();
        list.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
        Ok(list)
    }

    pub fn ids(&self) -> DeskResult<HashSet<Uuid>> {
        let items = self.items.read().map_err(lock_error)?;
        Ok(items.keys().copied().collect())
    }
}

/// Bookings plus the reference data they point at
///
/// Every write is validated the same way a form validates before submitting,
/// plus referential checks against the stored tours, clients and cities.
#[derive(Clone)]
pub struct InMemoryBookingStore {
    tours: ReferenceStore<Tour>,
    clients: ReferenceStore<Client>,
    cities: ReferenceStore<City>,
    bookings: Arc<RwLock<HashMap<Uuid, BookingRecord>>>,
}

impl InMemoryBookingStore {
    pub fn from_seed(seed: &SeedConfig) -> Self {
        info!(
            tours = seed.tours.len(),
            clients = seed.clients.len(),
            cities = seed.cities.len(),
            "seeding in-memory booking store"
        );
        Self {
            tours: ReferenceStore::from_items(seed.tours.iter().cloned()),
            clients: ReferenceStore::from_items(seed.clients.iter().cloned()),
            cities: ReferenceStore::from_items(seed.cities.iter().cloned()),
            bookings: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn booking_count(&self) -> DeskResult<usize> {
        Ok(self.bookings.read().map_err(lock_error)?.len())
    }

    /// Full server-side validation of a payload
    pub fn validate(&self, payload: &BookingPayload) -> DeskResult<()> {
        let mut errors = payload.check();
        let tour = self.tours.get(payload.tour_id)?;
        let client = self.clients.get(payload.client_id)?;
        let cities = self.cities.ids()?;
        errors.extend(payload.check_references(tour.as_ref(), client.as_ref(), |id| {
            cities.contains(&id)
        }));

        if !errors.is_empty() {
            debug!(errors = errors.len(), "booking payload rejected");
        }
        into_result(errors)
    }

    fn not_found(id: Uuid) -> DeskError {
        EntityError::NotFound {
            entity_type: "booking".to_string(),
            id,
        }
        .into()
    }
}

#[async_trait]
impl BookingApi for InMemoryBookingStore {
    async fn list_tours(&self) -> DeskResult<Vec<Tour>> {
        self.tours.list()
    }

    async fn list_clients(&self) -> DeskResult<Vec<Client>> {
        self.clients.list()
    }

    async fn list_cities(&self) -> DeskResult<Vec<City>> {
        self.cities.list()
    }

    async fn create_booking(&self, payload: BookingPayload) -> DeskResult<BookingRecord> {
        self.validate(&payload)?;
        let record = BookingRecord::new(payload);

        let mut bookings = self.bookings.write().map_err(lock_error)?;
        bookings.insert(record.id, record.clone());
        info!(
            booking_id = %record.id,
            tour_id = %record.payload.tour_id,
            members = record.payload.group_tour_members.len(),
            "booking created"
        );
        Ok(record)
    }

    async fn update_booking(
        &self,
        id: Uuid,
        payload: BookingPayload,
    ) -> DeskResult<BookingRecord> {
        if !self.bookings.read().map_err(lock_error)?.contains_key(&id) {
            return Err(Self::not_found(id));
        }
        self.validate(&payload)?;

        let mut bookings = self.bookings.write().map_err(lock_error)?;
        let record = bookings.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        record.replace(payload);
        info!(booking_id = %id, "booking updated");
        Ok(record.clone())
    }

    async fn get_booking(&self, id: Uuid) -> DeskResult<BookingRecord> {
        let bookings = self.bookings.read().map_err(lock_error)?;
        bookings.get(&id).cloned().ok_or_else(|| Self::not_found(id))
    }
}
