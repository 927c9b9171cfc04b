//! Reference data cached by a booking form
//!
//! Tours, clients and cities are fetched independently and may still be
//! loading (or have failed) when the user acts. Selectors that depend on a
//! collection stay disabled until it is [`LoadState::Ready`].
//!
//! Fetching is split from applying: [`fetch_references`] borrows nothing from
//! the form, and the resulting [`ReferenceBatch`] is tagged with the load
//! generation so the form can drop results that arrive after it was closed or
//! after a newer load started.

use crate::booking::model::{City, Client, Tour};
use crate::core::entity::{Entity, find_by_id};
use crate::core::error::{DeskResult, PreconditionError};
use crate::core::service::BookingApi;
use uuid::Uuid;

/// Load status of one reference collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(Vec<T>),
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn items(&self) -> Option<&[T]> {
        match self {
            LoadState::Ready(items) => Some(items),
            _ => None,
        }
    }
}

impl<T: Entity> LoadState<T> {
    /// Items of a ready collection, or a precondition error naming it
    pub fn require(&self) -> Result<&[T], PreconditionError> {
        self.items().ok_or_else(|| PreconditionError::ReferenceNotReady {
            collection: T::resource_name().to_string(),
        })
    }

    /// Look up an item; `None` when not loaded or absent
    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.items().and_then(|items| find_by_id(items, id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Tours,
    Clients,
    Cities,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 3] = [
        ReferenceKind::Tours,
        ReferenceKind::Clients,
        ReferenceKind::Cities,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Tours => Tour::resource_name(),
            ReferenceKind::Clients => Client::resource_name(),
            ReferenceKind::Cities => City::resource_name(),
        }
    }
}

/// Permission to run one reference load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub kinds: Vec<ReferenceKind>,
}

impl LoadTicket {
    pub fn wants(&self, kind: ReferenceKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Results of one reference load; `None` for collections not requested
#[derive(Debug)]
pub struct ReferenceBatch {
    pub generation: u64,
    pub tours: Option<DeskResult<Vec<Tour>>>,
    pub clients: Option<DeskResult<Vec<Client>>>,
    pub cities: Option<DeskResult<Vec<City>>>,
}

/// Fetch the collections named by `ticket` concurrently
///
/// The three requests race independently; a failure in one does not affect
/// the others.
pub async fn fetch_references(api: &dyn BookingApi, ticket: &LoadTicket) -> ReferenceBatch {
    let tours = async {
        if ticket.wants(ReferenceKind::Tours) {
            Some(api.list_tours().await)
        } else {
            None
        }
    };
    let clients = async {
        if ticket.wants(ReferenceKind::Clients) {
            Some(api.list_clients().await)
        } else {
            None
        }
    };
    let cities = async {
        if ticket.wants(ReferenceKind::Cities) {
            Some(api.list_cities().await)
        } else {
            None
        }
    };

    let (tours, clients, cities) = futures::join!(tours, clients, cities);
    ReferenceBatch {
        generation: ticket.generation,
        tours,
        clients,
        cities,
    }
}

/// The three reference collections a booking form depends on
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub tours: LoadState<Tour>,
    pub clients: LoadState<Client>,
    pub cities: LoadState<City>,
}

impl ReferenceData {
    /// Collections that are not ready
    ///
    /// Collections still loading are included: starting a new load supersedes
    /// the one in flight, whose results will be discarded.
    pub fn pending(&self) -> Vec<ReferenceKind> {
        ReferenceKind::ALL
            .into_iter()
            .filter(|kind| match kind {
                ReferenceKind::Tours => !self.tours.is_ready(),
                ReferenceKind::Clients => !self.clients.is_ready(),
                ReferenceKind::Cities => !self.cities.is_ready(),
            })
            .collect()
    }

    pub fn mark_loading(&mut self, kinds: &[ReferenceKind]) {
        for kind in kinds {
            match kind {
                ReferenceKind::Tours => self.tours = LoadState::Loading,
                ReferenceKind::Clients => self.clients = LoadState::Loading,
                ReferenceKind::Cities => self.cities = LoadState::Loading,
            }
        }
    }

    /// Put a batch's results in place and return the failures
    pub fn apply(&mut self, batch: ReferenceBatch) -> Vec<(ReferenceKind, String)> {
        let mut failures = Vec::new();
        if let Some(result) = batch.tours {
            self.tours = settle(result, ReferenceKind::Tours, &mut failures);
        }
        if let Some(result) = batch.clients {
            self.clients = settle(result, ReferenceKind::Clients, &mut failures);
        }
        if let Some(result) = batch.cities {
            self.cities = settle(result, ReferenceKind::Cities, &mut failures);
        }
        failures
    }

    /// Return loading collections to idle so they can be requested again
    pub fn abandon_loading(&mut self) {
        if self.tours.is_loading() {
            self.tours = LoadState::Idle;
        }
        if self.clients.is_loading() {
            self.clients = LoadState::Idle;
        }
        if self.cities.is_loading() {
            self.cities = LoadState::Idle;
        }
    }
}

fn settle<T>(
    result: DeskResult<Vec<T>>,
    kind: ReferenceKind,
    failures: &mut Vec<(ReferenceKind, String)>,
) -> LoadState<T> {
    match result {
        Ok(items) => LoadState::Ready(items),
        Err(e) => {
            let message = e.to_string();
            failures.push((kind, message.clone()));
            LoadState::Failed(message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{DeskError, RemoteError};

    fn city(name: &str) -> City {
        City {
            id: Uuid::new_v4(),
            name: name.into(),
            state: None,
        }
    }

    #[test]
    fn test_pending_skips_ready_collections() {
        let mut data = ReferenceData::default();
        assert_eq!(data.pending(), ReferenceKind::ALL.to_vec());

        data.tours = LoadState::Loading;
        data.cities = LoadState::Ready(vec![]);
        data.clients = LoadState::Failed("boom".into());
        assert_eq!(
            data.pending(),
            vec![ReferenceKind::Tours, ReferenceKind::Clients]
        );
    }

    #[test]
    fn test_apply_records_failures() {
        let mut data = ReferenceData::default();
        data.mark_loading(&ReferenceKind::ALL);

        let pune = city("Pune");
        let failures = data.apply(ReferenceBatch {
            generation: 1,
            tours: Some(Err(DeskError::Remote(RemoteError::Transport {
                message: "connection refused".into(),
            }))),
            clients: None,
            cities: Some(Ok(vec![pune.clone()])),
        });

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, ReferenceKind::Tours);
        assert!(matches!(data.tours, LoadState::Failed(_)));
        assert!(data.clients.is_loading());
        assert_eq!(data.cities.get(pune.id), Some(&pune));
    }

    #[test]
    fn test_require_names_collection() {
        let state: LoadState<Tour> = LoadState::Loading;
        assert_eq!(
            state.require().unwrap_err(),
            PreconditionError::ReferenceNotReady {
                collection: "tours".into()
            }
        );
    }

    #[test]
    fn test_abandon_loading() {
        let mut data = ReferenceData::default();
        data.mark_loading(&[ReferenceKind::Tours]);
        data.abandon_loading();
        assert_eq!(data.tours, LoadState::Idle);
    }
}
