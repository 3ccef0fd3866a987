//! Application state shared across handlers

use std::sync::Arc;

use medreq_core::MedicationStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn MedicationStore>,
}

impl AppState {
    pub fn new(store: impl MedicationStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Build state around a store the caller keeps a handle to.
    pub fn shared(store: Arc<dyn MedicationStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn MedicationStore {
        self.store.as_ref()
    }
}
