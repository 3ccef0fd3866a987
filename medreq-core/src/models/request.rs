//! Caller-facing shapes for the medication request operations

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{MedicationRequest, NewMedicationRequest, RequestStatus, ValidationError};

/// Create payload. The patient comes from the resource path.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreateMedicationRequest {
    pub clinician_id: i64,
    pub medication_id: i64,
    pub reason_text: Option<String>,
    pub prescribed_date: NaiveDate,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub frequency: Option<String>,
    #[serde(default)]
    pub status: RequestStatus,
}

impl CreateMedicationRequest {
    /// Bind the payload to the patient it is created for.
    pub fn for_patient(self, patient_id: i64) -> NewMedicationRequest {
        NewMedicationRequest {
            patient_id,
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

/// Optional narrowing applied when listing a patient's requests.
///
/// `status` is compared as a raw string: a value outside the enumerated set
/// is not an error, it simply matches nothing. Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequestFilter {
    pub status: Option<String>,
    pub prescribed_from: Option<NaiveDate>,
    pub prescribed_to: Option<NaiveDate>,
}

impl RequestFilter {
    /// Status to match, ignoring an empty string.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }

    pub fn matches(&self, request: &MedicationRequest) -> bool {
        if let Some(status) = self.status() {
            if request.status.as_str() != status {
                return false;
            }
        }
        if let Some(from) = self.prescribed_from {
            if request.prescribed_date < from {
                return false;
            }
        }
        if let Some(to) = self.prescribed_to {
            if request.prescribed_date > to {
                return false;
            }
        }
        true
    }
}

/// One field overwrite carried by a partial update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestChange {
    EndDate(Option<NaiveDate>),
    Frequency(Option<String>),
    Status(RequestStatus),
}

/// Partial update of a medication request.
///
/// Built from the keys actually present in the JSON object, so an omitted
/// field and a field set to `null` stay distinguishable. Keys other than
/// `end_date`, `frequency` and `status` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct MedicationRequestPatch {
    changes: Vec<RequestChange>,
}

impl MedicationRequestPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a change, replacing any earlier change to the same field.
    pub fn with(mut self, change: RequestChange) -> Self {
        self.changes
            .retain(|existing| std::mem::discriminant(existing) != std::mem::discriminant(&change));
        self.changes.push(change);
        self
    }

    pub fn changes(&self) -> &[RequestChange] {
        &self.changes
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Overwrite the patched fields of `request` in place.
    pub fn apply(&self, request: &mut MedicationRequest) {
        for change in &self.changes {
            match change {
                RequestChange::EndDate(end_date) => request.end_date = *end_date,
                RequestChange::Frequency(frequency) => request.frequency = frequency.clone(),
                RequestChange::Status(status) => request.status = *status,
            }
        }
    }
}

impl TryFrom<Map<String, Value>> for MedicationRequestPatch {
    type Error = ValidationError;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut patch = Self::new();

        if let Some(value) = fields.remove("end_date") {
            patch = patch.with(RequestChange::EndDate(decode_field("end_date", value)?));
        }
        if let Some(value) = fields.remove("frequency") {
            patch = patch.with(RequestChange::Frequency(decode_field("frequency", value)?));
        }
        if let Some(value) = fields.remove("status") {
            let status = decode_field("status", value)?
                .ok_or(ValidationError::NullNotAllowed { field: "status" })?;
            patch = patch.with(RequestChange::Status(status));
        }

        Ok(patch)
    }
}

fn decode_field<T: DeserializeOwned>(
    field: &'static str,
    value: Value,
) -> Result<Option<T>, ValidationError> {
    serde_json::from_value(value).map_err(|e| ValidationError::InvalidFormat {
        field,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stored() -> MedicationRequest {
        CreateMedicationRequest {
            clinician_id: 2,
            medication_id: 3,
            reason_text: Some("Infection treatment".into()),
            prescribed_date: date(2025, 5, 15),
            start_date: date(2025, 5, 16),
            end_date: None,
            frequency: Some("3 times/day".into()),
            status: RequestStatus::Active,
        }
        .for_patient(1)
        .into_stored(10)
    }

    #[test]
    fn create_defaults_status_to_active() {
        let payload: CreateMedicationRequest = serde_json::from_value(json!({
            "clinician_id": 2,
            "medication_id": 3,
            "prescribed_date": "2025-05-15",
            "start_date": "2025-05-16"
        }))
        .unwrap();

        assert_eq!(payload.status, RequestStatus::Active);
        assert_eq!(payload.reason_text, None);
        assert_eq!(payload.end_date, None);
    }

    #[test]
    fn create_rejects_bad_shapes() {
        let missing_start = json!({
            "clinician_id": 2,
            "medication_id": 3,
            "prescribed_date": "2025-05-15"
        });
        assert!(serde_json::from_value::<CreateMedicationRequest>(missing_start).is_err());

        let bad_date = json!({
            "clinician_id": 2,
            "medication_id": 3,
            "prescribed_date": "15/05/2025",
            "start_date": "2025-05-16"
        });
        assert!(serde_json::from_value::<CreateMedicationRequest>(bad_date).is_err());

        let bad_status = json!({
            "clinician_id": 2,
            "medication_id": 3,
            "prescribed_date": "2025-05-15",
            "start_date": "2025-05-16",
            "status": "paused"
        });
        assert!(serde_json::from_value::<CreateMedicationRequest>(bad_status).is_err());
    }

    #[test]
    fn patch_distinguishes_absent_from_null() {
        let patch: MedicationRequestPatch =
            serde_json::from_value(json!({ "frequency": null })).unwrap();
        assert_eq!(patch.changes(), &[RequestChange::Frequency(None)]);

        let empty: MedicationRequestPatch = serde_json::from_value(json!({})).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn patch_ignores_immutable_fields() {
        let patch: MedicationRequestPatch = serde_json::from_value(json!({
            "status": "completed",
            "patient_id": 99,
            "reason_text": "changed",
            "start_date": "2030-01-01"
        }))
        .unwrap();

        assert_eq!(patch.changes(), &[RequestChange::Status(RequestStatus::Completed)]);

        let mut request = stored();
        let before = request.clone();
        patch.apply(&mut request);

        assert_eq!(request.status, RequestStatus::Completed);
        assert_eq!(request.patient_id, before.patient_id);
        assert_eq!(request.reason_text, before.reason_text);
        assert_eq!(request.start_date, before.start_date);
        assert_eq!(request.frequency, before.frequency);
    }

    #[test]
    fn patch_rejects_null_status() {
        let err = serde_json::from_value::<MedicationRequestPatch>(json!({ "status": null }))
            .unwrap_err();
        assert!(err.to_string().contains("status cannot be null"));
    }

    #[test]
    fn patch_rejects_bad_values() {
        assert!(
            serde_json::from_value::<MedicationRequestPatch>(json!({ "end_date": "tomorrow" }))
                .is_err()
        );
        assert!(
            serde_json::from_value::<MedicationRequestPatch>(json!({ "status": "paused" }))
                .is_err()
        );
        assert!(serde_json::from_value::<MedicationRequestPatch>(json!(["status"])).is_err());
    }

    #[test]
    fn patch_apply_sets_and_clears() {
        let mut request = stored();
        let patch = MedicationRequestPatch::new()
            .with(RequestChange::EndDate(Some(date(2025, 5, 30))))
            .with(RequestChange::Frequency(None));
        patch.apply(&mut request);

        assert_eq!(request.end_date, Some(date(2025, 5, 30)));
        assert_eq!(request.frequency, None);
        assert_eq!(request.status, RequestStatus::Active);
    }

    #[test]
    fn with_replaces_same_field() {
        let patch = MedicationRequestPatch::new()
            .with(RequestChange::Status(RequestStatus::OnHold))
            .with(RequestChange::Status(RequestStatus::Cancelled));
        assert_eq!(patch.changes(), &[RequestChange::Status(RequestStatus::Cancelled)]);
    }

    #[test]
    fn filter_bounds_are_inclusive() {
        let request = stored();
        let on_day = RequestFilter {
            status: None,
            prescribed_from: Some(date(2025, 5, 15)),
            prescribed_to: Some(date(2025, 5, 15)),
        };
        assert!(on_day.matches(&request));

        let after = RequestFilter {
            prescribed_from: Some(date(2025, 5, 16)),
            ..Default::default()
        };
        assert!(!after.matches(&request));

        let before = RequestFilter {
            prescribed_to: Some(date(2025, 5, 14)),
            ..Default::default()
        };
        assert!(!before.matches(&request));
    }

    #[test]
    fn filter_status_is_raw_string() {
        let request = stored();
        let unknown = RequestFilter {
            status: Some("paused".into()),
            ..Default::default()
        };
        assert!(!unknown.matches(&request));

        let empty = RequestFilter {
            status: Some(String::new()),
            ..Default::default()
        };
        assert!(empty.matches(&request));
        assert_eq!(empty.status(), None);
    }
}
