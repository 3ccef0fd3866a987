//! Stored entities and their insert shapes

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{MedicationForm, RequestStatus, Sex};

/// Patient record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
}

/// Patient fields before the store assigns an id
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
}

/// Clinician record. `registration_id` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinician {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub registration_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewClinician {
    pub first_name: String,
    pub last_name: String,
    pub registration_id: String,
}

/// Medication record. `code` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: i64,
    pub code: String,
    pub code_name: String,
    pub code_system: String,
    pub strength_value: f64,
    pub strength_unit: String,
    pub form: MedicationForm,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewMedication {
    pub code: String,
    pub code_name: String,
    pub code_system: String,
    pub strength_value: f64,
    pub strength_unit: String,
    pub form: MedicationForm,
}

/// Medication request as stored: references by id only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRequest {
    pub id: i64,
    pub patient_id: i64,
    pub clinician_id: i64,
    pub medication_id: i64,
    pub reason_text: Option<String>,
    pub prescribed_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: Option<String>,
    pub status: RequestStatus,
}

/// Medication request fields before the store assigns an id
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedicationRequest {
    pub patient_id: i64,
    pub clinician_id: i64,
    pub medication_id: i64,
    pub reason_text: Option<String>,
    pub prescribed_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: Option<String>,
    pub status: RequestStatus,
}

impl NewMedicationRequest {
    /// Assign an id, producing the stored record.
    pub fn into_stored(self, id: i64) -> MedicationRequest {
        MedicationRequest {
            id,
            patient_id: self.patient_id,
            clinician_id: self.clinician_id,
            medication_id: self.medication_id,
            reason_text: self.reason_text,
            prescribed_date: self.prescribed_date,
            start_date: self.start_date,
            end_date: self.end_date,
            frequency: self.frequency,
            status: self.status,
        }
    }
}

/// Medication request expanded with the entities it references.
///
/// Serialises flat: the request's own fields followed by nested
/// `patient`, `clinician` and `medication` objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRequestDetail {
    #[serde(flatten)]
    pub request: MedicationRequest,
    pub patient: Patient,
    pub clinician: Clinician,
    pub medication: Medication,
}
