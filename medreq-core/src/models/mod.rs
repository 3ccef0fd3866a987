//! Domain models with validation at deserialisation
//!
//! Enumerated fields and request shapes reject malformed input when they are
//! decoded, before any store access.

pub mod entities;
pub mod enums;
pub mod request;
pub mod validation;

pub use entities::{
    Clinician, Medication, MedicationRequest, MedicationRequestDetail, NewClinician,
    NewMedication, NewMedicationRequest, NewPatient, Patient,
};
pub use enums::{MedicationForm, RequestStatus, Sex};
pub use request::{CreateMedicationRequest, MedicationRequestPatch, RequestChange, RequestFilter};
pub use validation::ValidationError;
