//! Medication request operations
//!
//! Create, list and partial update on top of any [`MedicationStore`]. Each
//! operation resolves the entities it depends on first and fails with
//! [`ServiceError::NotFound`] naming the first one missing.

use crate::models::{
    CreateMedicationRequest, MedicationRequestDetail, MedicationRequestPatch, RequestFilter,
};
use crate::store::{MedicationStore, StoreError};

/// Operation failure
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn not_found(resource: &'static str) -> ServiceError {
    tracing::debug!(resource, "lookup found nothing");
    ServiceError::NotFound { resource }
}

/// Medication request operations bound to a store
pub struct RequestService<'a> {
    store: &'a dyn MedicationStore,
}

impl<'a> RequestService<'a> {
    pub fn new(store: &'a dyn MedicationStore) -> Self {
        Self { store }
    }

    /// Create a request for `patient_id`.
    ///
    /// Patient, clinician and medication are checked in that order; nothing is
    /// written unless all three exist. The response embeds the resolved
    /// entities.
    pub async fn create(
        &self,
        patient_id: i64,
        payload: CreateMedicationRequest,
    ) -> Result<MedicationRequestDetail, ServiceError> {
        let patient = self
            .store
            .patient(patient_id)
            .await?
            .ok_or_else(|| not_found("patient"))?;
        let clinician = self
            .store
            .clinician(payload.clinician_id)
            .await?
            .ok_or_else(|| not_found("clinician"))?;
        let medication = self
            .store
            .medication(payload.medication_id)
            .await?
            .ok_or_else(|| not_found("medication"))?;

        let request = self
            .store
            .insert_request(payload.for_patient(patient.id))
            .await?;

        tracing::info!(
            request_id = request.id,
            patient_id = patient.id,
            status = %request.status,
            "medication request created"
        );

        Ok(MedicationRequestDetail {
            request,
            patient,
            clinician,
            medication,
        })
    }

    /// List a patient's requests narrowed by `filter`, ordered by id.
    ///
    /// An empty list is a normal result; only a missing patient is an error.
    pub async fn list(
        &self,
        patient_id: i64,
        filter: &RequestFilter,
    ) -> Result<Vec<MedicationRequestDetail>, ServiceError> {
        if self.store.patient(patient_id).await?.is_none() {
            return Err(not_found("patient"));
        }

        let requests = self.store.list_requests(patient_id, filter).await?;
        tracing::debug!(patient_id, count = requests.len(), "medication requests listed");
        Ok(requests)
    }

    /// Overwrite the fields present in `patch` on the request identified by
    /// both `patient_id` and `request_id`.
    pub async fn update(
        &self,
        patient_id: i64,
        request_id: i64,
        patch: &MedicationRequestPatch,
    ) -> Result<MedicationRequestDetail, ServiceError> {
        let updated = self
            .store
            .patch_request(patient_id, request_id, patch)
            .await?
            .ok_or_else(|| not_found("medication request"))?;

        tracing::info!(
            request_id,
            patient_id,
            fields = patch.changes().len(),
            "medication request updated"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        MedicationForm, NewClinician, NewMedication, NewPatient, RequestChange, RequestStatus, Sex,
    };
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct Fixture {
        store: MemoryStore,
        patient_id: i64,
        other_patient_id: i64,
        clinician_id: i64,
        medication_id: i64,
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let patient = store
            .insert_patient(NewPatient {
                first_name: "Ram".into(),
                last_name: "Kumar".into(),
                date_of_birth: date(1990, 1, 1),
                sex: Sex::Male,
            })
            .await
            .unwrap();
        let other = store
            .insert_patient(NewPatient {
                first_name: "Sita".into(),
                last_name: "Devi".into(),
                date_of_birth: date(1985, 6, 20),
                sex: Sex::Female,
            })
            .await
            .unwrap();
        let clinician = store
            .insert_clinician(NewClinician {
                first_name: "Jane".into(),
                last_name: "Smith".into(),
                registration_id: "REG123".into(),
            })
            .await
            .unwrap();
        let medication = store
            .insert_medication(NewMedication {
                code: "747006".into(),
                code_name: "Oxamniquine".into(),
                code_system: "SNOMED".into(),
                strength_value: 5.0,
                strength_unit: "g/ml".into(),
                form: MedicationForm::Tablet,
            })
            .await
            .unwrap();

        Fixture {
            store,
            patient_id: patient.id,
            other_patient_id: other.id,
            clinician_id: clinician.id,
            medication_id: medication.id,
        }
    }

    impl Fixture {
        fn payload(&self, prescribed: NaiveDate, status: RequestStatus) -> CreateMedicationRequest {
            CreateMedicationRequest {
                clinician_id: self.clinician_id,
                medication_id: self.medication_id,
                reason_text: None,
                prescribed_date: prescribed,
                start_date: prescribed.succ_opt().unwrap(),
                end_date: None,
                frequency: Some("3 times/day".into()),
                status,
            }
        }

        fn service(&self) -> RequestService<'_> {
            RequestService::new(&self.store)
        }
    }

    #[tokio::test]
    async fn create_embeds_resolved_entities() {
        let fx = fixture().await;
        let created = fx
            .service()
            .create(fx.patient_id, fx.payload(date(2025, 5, 15), RequestStatus::default()))
            .await
            .unwrap();

        assert_eq!(created.request.status, RequestStatus::Active);
        assert_eq!(created.request.reason_text, None);
        assert_eq!(created.patient.first_name, "Ram");
        assert_eq!(created.clinician.registration_id, "REG123");
        assert_eq!(created.medication.code_name, "Oxamniquine");
    }

    #[tokio::test]
    async fn create_reports_missing_entity_and_persists_nothing() {
        let fx = fixture().await;
        let service = fx.service();

        let err = service
            .create(999, fx.payload(date(2025, 5, 15), RequestStatus::Active))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { resource: "patient" }));

        let mut payload = fx.payload(date(2025, 5, 15), RequestStatus::Active);
        payload.clinician_id = 999;
        let err = service.create(fx.patient_id, payload).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { resource: "clinician" }));

        let mut payload = fx.payload(date(2025, 5, 15), RequestStatus::Active);
        payload.medication_id = 999;
        let err = service.create(fx.patient_id, payload).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { resource: "medication" }));

        assert_eq!(fx.store.request_count().await, 0);
    }

    #[tokio::test]
    async fn list_empty_and_missing_patient() {
        let fx = fixture().await;
        let service = fx.service();

        let listed = service
            .list(fx.patient_id, &RequestFilter::default())
            .await
            .unwrap();
        assert!(listed.is_empty());

        let err = service.list(999, &RequestFilter::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { resource: "patient" }));
    }

    #[tokio::test]
    async fn list_filters_compose_as_intersection() {
        let fx = fixture().await;
        let service = fx.service();

        let seeds = [
            (date(2025, 5, 1), RequestStatus::Active),
            (date(2025, 5, 10), RequestStatus::Completed),
            (date(2025, 5, 15), RequestStatus::Active),
            (date(2025, 5, 20), RequestStatus::OnHold),
            (date(2025, 5, 31), RequestStatus::Active),
        ];
        for (prescribed, status) in seeds {
            service
                .create(fx.patient_id, fx.payload(prescribed, status))
                .await
                .unwrap();
        }
        // Belongs to someone else and must never show up.
        service
            .create(fx.other_patient_id, fx.payload(date(2025, 5, 15), RequestStatus::Active))
            .await
            .unwrap();

        let ids = |items: Vec<MedicationRequestDetail>| -> Vec<i64> {
            items.into_iter().map(|d| d.request.id).collect()
        };

        let by_status = RequestFilter {
            status: Some("active".into()),
            ..Default::default()
        };
        let from = RequestFilter {
            prescribed_from: Some(date(2025, 5, 10)),
            ..Default::default()
        };
        let to = RequestFilter {
            prescribed_to: Some(date(2025, 5, 20)),
            ..Default::default()
        };
        let combined = RequestFilter {
            status: Some("active".into()),
            prescribed_from: Some(date(2025, 5, 10)),
            prescribed_to: Some(date(2025, 5, 20)),
        };

        let status_ids = ids(service.list(fx.patient_id, &by_status).await.unwrap());
        let from_ids = ids(service.list(fx.patient_id, &from).await.unwrap());
        let to_ids = ids(service.list(fx.patient_id, &to).await.unwrap());
        let combined_ids = ids(service.list(fx.patient_id, &combined).await.unwrap());

        assert_eq!(status_ids, vec![1, 3, 5]);
        assert_eq!(from_ids, vec![2, 3, 4, 5]);
        assert_eq!(to_ids, vec![1, 2, 3, 4]);

        let intersection: Vec<i64> = status_ids
            .into_iter()
            .filter(|id| from_ids.contains(id) && to_ids.contains(id))
            .collect();
        assert_eq!(combined_ids, intersection);
        assert_eq!(combined_ids, vec![3]);
    }

    #[tokio::test]
    async fn list_unknown_status_is_empty() {
        let fx = fixture().await;
        let service = fx.service();
        service
            .create(fx.patient_id, fx.payload(date(2025, 5, 15), RequestStatus::Active))
            .await
            .unwrap();

        let filter = RequestFilter {
            status: Some("paused".into()),
            ..Default::default()
        };
        assert!(service.list(fx.patient_id, &filter).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_touches_only_patched_fields() {
        let fx = fixture().await;
        let service = fx.service();
        let created = service
            .create(fx.patient_id, fx.payload(date(2025, 5, 15), RequestStatus::Active))
            .await
            .unwrap();

        let patch =
            MedicationRequestPatch::new().with(RequestChange::Status(RequestStatus::Completed));
        let updated = service
            .update(fx.patient_id, created.request.id, &patch)
            .await
            .unwrap();

        let mut expected = created.request.clone();
        expected.status = RequestStatus::Completed;
        assert_eq!(updated.request, expected);
    }

    #[tokio::test]
    async fn update_through_other_patient_is_not_found() {
        let fx = fixture().await;
        let service = fx.service();
        let created = service
            .create(fx.patient_id, fx.payload(date(2025, 5, 15), RequestStatus::Active))
            .await
            .unwrap();

        let patch =
            MedicationRequestPatch::new().with(RequestChange::Status(RequestStatus::Cancelled));
        let err = service
            .update(fx.other_patient_id, created.request.id, &patch)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { resource: "medication request" }));

        let unchanged = service
            .list(fx.patient_id, &RequestFilter::default())
            .await
            .unwrap();
        assert_eq!(unchanged[0].request.status, RequestStatus::Active);
    }

    #[tokio::test]
    async fn any_status_may_follow_any_other() {
        let fx = fixture().await;
        let service = fx.service();
        let created = service
            .create(fx.patient_id, fx.payload(date(2025, 5, 15), RequestStatus::Cancelled))
            .await
            .unwrap();

        for status in [RequestStatus::Active, RequestStatus::Active, RequestStatus::OnHold] {
            let patch = MedicationRequestPatch::new().with(RequestChange::Status(status));
            let updated = service
                .update(fx.patient_id, created.request.id, &patch)
                .await
                .unwrap();
            assert_eq!(updated.request.status, status);
        }
    }
}
