//! Client-side reservation list store.
//!
//! Holds the last fetched list together with a loading/error status. Every
//! operation moves the status through `Loading` and settles it on exit; writes
//! always re-fetch the whole list instead of patching it locally.

use std::fmt::Display;

use super::api::{ClientError, ReservationApi};
use crate::models::{Reservation, ReservationInput};

const LOAD_FAILED: &str = "Failed to load reservations. Please try again later.";
const DETAIL_FAILED: &str = "Failed to load the reservation details.";
const CREATE_FAILED: &str = "Failed to create the reservation. Check your input and try again.";
const UPDATE_FAILED: &str = "Failed to update the reservation. Check your input and try again.";
const DELETE_FAILED: &str = "Failed to delete the reservation. Please try again later.";

/// Where the store's reservations come from.
#[allow(async_fn_in_trait)]
pub trait ReservationGateway {
    type Error: Display;

    async fn list(&self) -> Result<Vec<Reservation>, Self::Error>;
    async fn get(&self, id: &str) -> Result<Reservation, Self::Error>;
    async fn create(&self, input: &ReservationInput) -> Result<Reservation, Self::Error>;
    async fn update(&self, id: &str, input: &ReservationInput)
        -> Result<Reservation, Self::Error>;
    async fn delete(&self, id: &str) -> Result<(), Self::Error>;
}

impl ReservationGateway for ReservationApi {
    type Error = ClientError;

    async fn list(&self) -> Result<Vec<Reservation>, ClientError> {
        ReservationApi::list(self).await
    }

    async fn get(&self, id: &str) -> Result<Reservation, ClientError> {
        ReservationApi::get(self, id).await
    }

    async fn create(&self, input: &ReservationInput) -> Result<Reservation, ClientError> {
        ReservationApi::create(self, input).await
    }

    async fn update(&self, id: &str, input: &ReservationInput) -> Result<Reservation, ClientError> {
        ReservationApi::update(self, id, input).await
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        ReservationApi::delete(self, id).await.map(|_| ())
    }
}

/// Store status. `Idle` until the first call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StoreStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Sets `Loading` on creation and settles the status when finished or dropped.
struct LoadingGuard<'a> {
    status: &'a mut StoreStatus,
    settled: bool,
}

impl<'a> LoadingGuard<'a> {
    fn begin(status: &'a mut StoreStatus) -> Self {
        *status = StoreStatus::Loading;
        Self {
            status,
            settled: false,
        }
    }

    fn succeed(mut self) {
        *self.status = StoreStatus::Loaded;
        self.settled = true;
    }

    fn fail(mut self, message: &str) {
        *self.status = StoreStatus::Failed(message.to_string());
        self.settled = true;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        // Cancelled mid-flight: release the loading flag without an outcome.
        if !self.settled {
            *self.status = StoreStatus::Idle;
        }
    }
}

/// Reservation list cache with explicit loading/error state.
pub struct ReservationStore<G> {
    gateway: G,
    reservations: Vec<Reservation>,
    status: StoreStatus,
}

impl<G: ReservationGateway> ReservationStore<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            reservations: Vec::new(),
            status: StoreStatus::Idle,
        }
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn status(&self) -> &StoreStatus {
        &self.status
    }

    pub fn loading(&self) -> bool {
        self.status == StoreStatus::Loading
    }

    /// Human-readable message of the last failure, cleared when a new call starts.
    pub fn error(&self) -> Option<&str> {
        match &self.status {
            StoreStatus::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Replace the cached list with a fresh one. Returns whether it succeeded.
    pub async fn fetch_reservations(&mut self) -> bool {
        let guard = LoadingGuard::begin(&mut self.status);

        match self.gateway.list().await {
            Ok(reservations) => {
                self.reservations = reservations;
                guard.succeed();
                true
            }
            Err(e) => {
                tracing::error!("Failed to fetch reservations: {}", e);
                guard.fail(LOAD_FAILED);
                false
            }
        }
    }

    /// Fetch one reservation without touching the cached list.
    pub async fn get_reservation(&mut self, id: &str) -> Option<Reservation> {
        let guard = LoadingGuard::begin(&mut self.status);

        match self.gateway.get(id).await {
            Ok(reservation) => {
                guard.succeed();
                Some(reservation)
            }
            Err(e) => {
                tracing::error!("Failed to fetch reservation {}: {}", id, e);
                guard.fail(DETAIL_FAILED);
                None
            }
        }
    }

    pub async fn create_reservation(&mut self, input: &ReservationInput) -> Option<Reservation> {
        let guard = LoadingGuard::begin(&mut self.status);

        match self.gateway.create(input).await {
            Ok(reservation) => {
                refresh(&self.gateway, &mut self.reservations, guard).await;
                Some(reservation)
            }
            Err(e) => {
                tracing::error!("Failed to create reservation: {}", e);
                guard.fail(CREATE_FAILED);
                None
            }
        }
    }

    pub async fn update_reservation(
        &mut self,
        id: &str,
        input: &ReservationInput,
    ) -> Option<Reservation> {
        let guard = LoadingGuard::begin(&mut self.status);

        match self.gateway.update(id, input).await {
            Ok(reservation) => {
                refresh(&self.gateway, &mut self.reservations, guard).await;
                Some(reservation)
            }
            Err(e) => {
                tracing::error!("Failed to update reservation {}: {}", id, e);
                guard.fail(UPDATE_FAILED);
                None
            }
        }
    }

    /// Cancel a reservation. Returns whether the delete succeeded.
    pub async fn delete_reservation(&mut self, id: &str) -> bool {
        let guard = LoadingGuard::begin(&mut self.status);

        match self.gateway.delete(id).await {
            Ok(()) => {
                refresh(&self.gateway, &mut self.reservations, guard).await;
                true
            }
            Err(e) => {
                tracing::error!("Failed to delete reservation {}: {}", id, e);
                guard.fail(DELETE_FAILED);
                false
            }
        }
    }
}

/// Re-fetch after a successful write. A failed re-fetch records the load
/// error but does not undo the write's result.
async fn refresh<G: ReservationGateway>(
    gateway: &G,
    reservations: &mut Vec<Reservation>,
    guard: LoadingGuard<'_>,
) {
    match gateway.list().await {
        Ok(fresh) => {
            *reservations = fresh;
            guard.succeed();
        }
        Err(e) => {
            tracing::error!("Failed to fetch reservations: {}", e);
            guard.fail(LOAD_FAILED);
        }
    }
}
