//! In-memory store
//!
//! All four tables sit behind one `RwLock`, so each trait call observes and
//! mutates a consistent snapshot. Ids come from per-table sequences starting
//! at 1 and are never reused.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MedicationStore, StoreError, StoreResult};
use crate::models::{
    Clinician, Medication, MedicationRequest, MedicationRequestDetail, MedicationRequestPatch,
    NewClinician, NewMedication, NewMedicationRequest, NewPatient, Patient, RequestFilter,
};

#[derive(Debug, Default)]
struct Sequence(i64);

impl Sequence {
    fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Default)]
struct Tables {
    patients: BTreeMap<i64, Patient>,
    clinicians: BTreeMap<i64, Clinician>,
    medications: BTreeMap<i64, Medication>,
    requests: BTreeMap<i64, MedicationRequest>,
    patient_ids: Sequence,
    clinician_ids: Sequence,
    medication_ids: Sequence,
    request_ids: Sequence,
}

impl Tables {
    fn expand(&self, request: &MedicationRequest) -> StoreResult<MedicationRequestDetail> {
        let dangling = |table: &str, id: i64| {
            StoreError::Backend(format!(
                "medication request {} references missing {} {}",
                request.id, table, id
            ))
        };

        Ok(MedicationRequestDetail {
            request: request.clone(),
            patient: self
                .patients
                .get(&request.patient_id)
                .cloned()
                .ok_or_else(|| dangling("patient", request.patient_id))?,
            clinician: self
                .clinicians
                .get(&request.clinician_id)
                .cloned()
                .ok_or_else(|| dangling("clinician", request.clinician_id))?,
            medication: self
                .medications
                .get(&request.medication_id)
                .cloned()
                .ok_or_else(|| dangling("medication", request.medication_id))?,
        })
    }
}

/// Process-local [`MedicationStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored medication requests.
    pub async fn request_count(&self) -> usize {
        self.tables.read().await.requests.len()
    }
}

#[async_trait]
impl MedicationStore for MemoryStore {
    async fn patient(&self, id: i64) -> StoreResult<Option<Patient>> {
        Ok(self.tables.read().await.patients.get(&id).cloned())
    }

    async fn clinician(&self, id: i64) -> StoreResult<Option<Clinician>> {
        Ok(self.tables.read().await.clinicians.get(&id).cloned())
    }

    async fn medication(&self, id: i64) -> StoreResult<Option<Medication>> {
        Ok(self.tables.read().await.medications.get(&id).cloned())
    }

    async fn insert_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        let mut tables = self.tables.write().await;
        let stored = Patient {
            id: tables.patient_ids.next(),
            first_name: patient.first_name,
            last_name: patient.last_name,
            date_of_birth: patient.date_of_birth,
            sex: patient.sex,
        };
        tables.patients.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn insert_clinician(&self, clinician: NewClinician) -> StoreResult<Clinician> {
        let mut tables = self.tables.write().await;
        if tables
            .clinicians
            .values()
            .any(|c| c.registration_id == clinician.registration_id)
        {
            return Err(StoreError::Conflict(format!(
                "clinician registration_id '{}' already exists",
                clinician.registration_id
            )));
        }

        let stored = Clinician {
            id: tables.clinician_ids.next(),
            first_name: clinician.first_name,
            last_name: clinician.last_name,
            registration_id: clinician.registration_id,
        };
        tables.clinicians.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn insert_medication(&self, medication: NewMedication) -> StoreResult<Medication> {
        let mut tables = self.tables.write().await;
        if tables.medications.values().any(|m| m.code == medication.code) {
            return Err(StoreError::Conflict(format!(
                "medication code '{}' already exists",
                medication.code
            )));
        }

        let stored = Medication {
            id: tables.medication_ids.next(),
            code: medication.code,
            code_name: medication.code_name,
            code_system: medication.code_system,
            strength_value: medication.strength_value,
            strength_unit: medication.strength_unit,
            form: medication.form,
        };
        tables.medications.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn insert_request(&self, request: NewMedicationRequest) -> StoreResult<MedicationRequest> {
        let mut tables = self.tables.write().await;

        // Mirror the foreign keys of the relational schema.
        if !tables.patients.contains_key(&request.patient_id)
            || !tables.clinicians.contains_key(&request.clinician_id)
            || !tables.medications.contains_key(&request.medication_id)
        {
            return Err(StoreError::Conflict(
                "medication request references a missing entity".to_owned(),
            ));
        }

        let id = tables.request_ids.next();
        let stored = request.into_stored(id);
        tables.requests.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_requests(
        &self,
        patient_id: i64,
        filter: &RequestFilter,
    ) -> StoreResult<Vec<MedicationRequestDetail>> {
        let tables = self.tables.read().await;
        tables
            .requests
            .values()
            .filter(|r| r.patient_id == patient_id && filter.matches(r))
            .map(|r| tables.expand(r))
            .collect()
    }

    async fn patch_request(
        &self,
        patient_id: i64,
        request_id: i64,
        patch: &MedicationRequestPatch,
    ) -> StoreResult<Option<MedicationRequestDetail>> {
        let mut tables = self.tables.write().await;
        let Some(request) = tables
            .requests
            .get_mut(&request_id)
            .filter(|r| r.patient_id == patient_id)
        else {
            return Ok(None);
        };

        patch.apply(request);
        let updated = request.clone();
        tables.expand(&updated).map(Some)
    }
}
