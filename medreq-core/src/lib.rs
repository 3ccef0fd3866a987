//! medreq-core: medication request domain
//!
//! Entities, validated request shapes, the [`MedicationStore`] persistence
//! seam and the create/list/update operations built on top of it. Nothing in
//! this crate knows about SQL or HTTP.

pub mod models;
pub mod service;
pub mod store;

pub use models::{
    Clinician, CreateMedicationRequest, Medication, MedicationForm, MedicationRequest,
    MedicationRequestDetail, MedicationRequestPatch, NewClinician, NewMedication,
    NewMedicationRequest, NewPatient, Patient, RequestChange, RequestFilter, RequestStatus, Sex,
    ValidationError,
};
pub use service::{RequestService, ServiceError};
pub use store::{MedicationStore, MemoryStore, SeedData, SeedSummary, StoreError, StoreResult};
