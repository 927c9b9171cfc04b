//! Shared state behind every HTTP handler
//!
//! The host only knows the [`BookingApi`] contract, so the same routes can
//! front the in-memory store or any other implementation.

use crate::core::service::BookingApi;
use std::sync::Arc;

#[derive(Clone)]
pub struct ServerHost {
    pub api: Arc<dyn BookingApi>,

    /// Reported by the health endpoint
    pub service_name: String,
}

impl ServerHost {
    pub fn new(api: Arc<dyn BookingApi>) -> Self {
        Self {
            api,
            service_name: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }
}
