//! Reference data loaded into a store at startup
//!
//! A seed document is JSON with three optional arrays:
//!
//! ```json
//! {
//!   "patients":    [{"first_name": "Ram", "last_name": "Kumar", "date_of_birth": "1990-01-01", "sex": "male"}],
//!   "clinicians":  [{"first_name": "Jane", "last_name": "Smith", "registration_id": "REG123"}],
//!   "medications": [{"code": "373265006", "code_name": "Paracetamol", "code_system": "SNOMED",
//!                    "strength_value": 500.0, "strength_unit": "mg", "form": "tablet"}]
//! }
//! ```
//!
//! Rows are inserted in document order, so on an empty store the first
//! patient gets id 1.

use serde::Deserialize;

use super::{MedicationStore, StoreResult};
use crate::models::{NewClinician, NewMedication, NewPatient};

/// Patients, clinicians and medications to insert through a [`MedicationStore`]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeedData {
    pub patients: Vec<NewPatient>,
    pub clinicians: Vec<NewClinician>,
    pub medications: Vec<NewMedication>,
}

/// Row counts inserted by [`SeedData::load_into`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub patients: usize,
    pub clinicians: usize,
    pub medications: usize,
}

impl SeedData {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Insert every row. Stops at the first failure; rows already inserted
    /// stay.
    pub async fn load_into(&self, store: &dyn MedicationStore) -> StoreResult<SeedSummary> {
        for patient in &self.patients {
            store.insert_patient(patient.clone()).await?;
        }
        for clinician in &self.clinicians {
            store.insert_clinician(clinician.clone()).await?;
        }
        for medication in &self.medications {
            store.insert_medication(medication.clone()).await?;
        }

        let summary = SeedSummary {
            patients: self.patients.len(),
            clinicians: self.clinicians.len(),
            medications: self.medications.len(),
        };
        tracing::debug!(?summary, "seed data loaded");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryStore, StoreError};

    const SEED: &str = r#"{
        "patients": [
            {"first_name": "Ram", "last_name": "Kumar", "date_of_birth": "1990-01-01", "sex": "male"}
        ],
        "clinicians": [
            {"first_name": "Jane", "last_name": "Smith", "registration_id": "REG123"}
        ],
        "medications": [
            {"code": "373265006", "code_name": "Paracetamol", "code_system": "SNOMED",
             "strength_value": 500.0, "strength_unit": "mg", "form": "tablet"}
        ]
    }"#;

    #[tokio::test]
    async fn load_populates_empty_store() {
        let store = MemoryStore::new();
        let seed = SeedData::from_json(SEED).unwrap();

        let summary = seed.load_into(&store).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                patients: 1,
                clinicians: 1,
                medications: 1
            }
        );

        let patient = store.patient(1).await.unwrap().unwrap();
        assert_eq!(patient.first_name, "Ram");
        assert!(store.clinician(1).await.unwrap().is_some());
        assert!(store.medication(1).await.unwrap().is_some());
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let seed = SeedData::from_json(r#"{"clinicians": []}"#).unwrap();
        assert_eq!(seed, SeedData::default());
    }

    #[test]
    fn rejects_unknown_sections_and_bad_enums() {
        assert!(SeedData::from_json(r#"{"doctors": []}"#).is_err());

        let bad_sex = r#"{"patients": [
            {"first_name": "A", "last_name": "B", "date_of_birth": "1990-01-01", "sex": "other"}
        ]}"#;
        assert!(SeedData::from_json(bad_sex).is_err());
    }

    #[tokio::test]
    async fn duplicate_code_is_a_conflict() {
        let store = MemoryStore::new();
        let mut seed = SeedData::from_json(SEED).unwrap();
        seed.medications.push(seed.medications[0].clone());

        let err = seed.load_into(&store).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
