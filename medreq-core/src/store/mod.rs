//! Persistence seam for the medication request domain
//!
//! Implementations:
//! - [`MemoryStore`]: process-local tables, used for tests and as the
//!   fallback when no database is configured
//! - `PgStore` in medreq-server: PostgreSQL via sqlx
//!
//! Every method is a single logical operation; atomicity per call is the
//! implementation's responsibility.

pub mod memory;
pub mod seed;

use async_trait::async_trait;

use crate::models::{
    Clinician, Medication, MedicationRequest, MedicationRequestDetail, MedicationRequestPatch,
    NewClinician, NewMedication, NewMedicationRequest, NewPatient, Patient, RequestFilter,
};

pub use memory::MemoryStore;
pub use seed::{SeedData, SeedSummary};

/// Storage failure. Not-found is not an error at this layer: lookups return
/// `Option`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique or referential constraint rejected the write
    #[error("conflict: {0}")]
    Conflict(String),

    /// Anything else the backend reports (connectivity, decoding, ...)
    #[error("storage backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Typed access to patients, clinicians, medications and medication requests.
#[async_trait]
pub trait MedicationStore: Send + Sync + 'static {
    async fn patient(&self, id: i64) -> StoreResult<Option<Patient>>;

    async fn clinician(&self, id: i64) -> StoreResult<Option<Clinician>>;

    async fn medication(&self, id: i64) -> StoreResult<Option<Medication>>;

    async fn insert_patient(&self, patient: NewPatient) -> StoreResult<Patient>;

    /// Fails with [`StoreError::Conflict`] on a duplicate `registration_id`.
    async fn insert_clinician(&self, clinician: NewClinician) -> StoreResult<Clinician>;

    /// Fails with [`StoreError::Conflict`] on a duplicate `code`.
    async fn insert_medication(&self, medication: NewMedication) -> StoreResult<Medication>;

    async fn insert_request(&self, request: NewMedicationRequest) -> StoreResult<MedicationRequest>;

    /// Requests of one patient narrowed by `filter`, expanded with their
    /// referenced entities, ordered by id ascending.
    async fn list_requests(
        &self,
        patient_id: i64,
        filter: &RequestFilter,
    ) -> StoreResult<Vec<MedicationRequestDetail>>;

    /// Apply `patch` to the request keyed by (`request_id`, `patient_id`).
    ///
    /// Returns `None` when no request matches both ids. An empty patch
    /// returns the request unchanged.
    async fn patch_request(
        &self,
        patient_id: i64,
        request_id: i64,
        patch: &MedicationRequestPatch,
    ) -> StoreResult<Option<MedicationRequestDetail>>;
}
