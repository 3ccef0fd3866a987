//! PostgreSQL-backed [`MedicationStore`]
//!
//! - Enum columns are TEXT guarded by CHECK constraints; rows are decoded
//!   through the enums' `FromStr`
//! - Request reads JOIN patient, clinician and medication in one query
//! - Patches build an UPDATE over the present fields only

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use medreq_core::{
    Clinician, Medication, MedicationRequest, MedicationRequestDetail, MedicationRequestPatch,
    MedicationStore, NewClinician, NewMedication, NewMedicationRequest, NewPatient, Patient,
    RequestChange, RequestFilter, StoreResult,
};

use super::DbError;

const REQUEST_COLUMNS: &str = "id, patient_id, clinician_id, medication_id, reason_text, \
     prescribed_date, start_date, end_date, frequency, status";

/// Request joined with its three referenced rows. Referenced columns are
/// prefixed `p_`, `c_` and `m_`.
const DETAIL_SELECT: &str = r#"
    SELECT
        r.id, r.patient_id, r.clinician_id, r.medication_id, r.reason_text,
        r.prescribed_date, r.start_date, r.end_date, r.frequency, r.status,
        p.first_name AS p_first_name, p.last_name AS p_last_name,
        p.date_of_birth AS p_date_of_birth, p.sex AS p_sex,
        c.first_name AS c_first_name, c.last_name AS c_last_name,
        c.registration_id AS c_registration_id,
        m.code AS m_code, m.code_name AS m_code_name, m.code_system AS m_code_system,
        m.strength_value AS m_strength_value, m.strength_unit AS m_strength_unit,
        m.form AS m_form
    FROM medication_requests r
    JOIN patients p ON p.id = r.patient_id
    JOIN clinicians c ON c.id = r.clinician_id
    JOIN medications m ON m.id = r.medication_id
"#;

fn patient_from_row(row: &PgRow) -> Result<Patient, DbError> {
    Ok(Patient {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        date_of_birth: row.try_get("date_of_birth")?,
        sex: row.try_get::<String, _>("sex")?.parse()?,
    })
}

fn clinician_from_row(row: &PgRow) -> Result<Clinician, DbError> {
    Ok(Clinician {
        id: row.try_get("id")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        registration_id: row.try_get("registration_id")?,
    })
}

fn medication_from_row(row: &PgRow) -> Result<Medication, DbError> {
    Ok(Medication {
        id: row.try_get("id")?,
        code: row.try_get("code")?,
        code_name: row.try_get("code_name")?,
        code_system: row.try_get("code_system")?,
        strength_value: row.try_get("strength_value")?,
        strength_unit: row.try_get("strength_unit")?,
        form: row.try_get::<String, _>("form")?.parse()?,
    })
}

fn request_from_row(row: &PgRow) -> Result<MedicationRequest, DbError> {
    Ok(MedicationRequest {
        id: row.try_get("id")?,
        patient_id: row.try_get("patient_id")?,
        clinician_id: row.try_get("clinician_id")?,
        medication_id: row.try_get("medication_id")?,
        reason_text: row.try_get("reason_text")?,
        prescribed_date: row.try_get("prescribed_date")?,
        start_date: row.try_get("start_date")?,
        end_date: row.try_get("end_date")?,
        frequency: row.try_get("frequency")?,
        status: row.try_get::<String, _>("status")?.parse()?,
    })
}

fn detail_from_row(row: &PgRow) -> Result<MedicationRequestDetail, DbError> {
    let request = request_from_row(row)?;
    Ok(MedicationRequestDetail {
        patient: Patient {
            id: request.patient_id,
            first_name: row.try_get("p_first_name")?,
            last_name: row.try_get("p_last_name")?,
            date_of_birth: row.try_get("p_date_of_birth")?,
            sex: row.try_get::<String, _>("p_sex")?.parse()?,
        },
        clinician: Clinician {
            id: request.clinician_id,
            first_name: row.try_get("c_first_name")?,
            last_name: row.try_get("c_last_name")?,
            registration_id: row.try_get("c_registration_id")?,
        },
        medication: Medication {
            id: request.medication_id,
            code: row.try_get("m_code")?,
            code_name: row.try_get("m_code_name")?,
            code_system: row.try_get("m_code_system")?,
            strength_value: row.try_get("m_strength_value")?,
            strength_unit: row.try_get("m_strength_unit")?,
            form: row.try_get::<String, _>("m_form")?.parse()?,
        },
        request,
    })
}

/// PostgreSQL store over a shared pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_patient(&self, id: i64) -> Result<Option<Patient>, DbError> {
        sqlx::query(
            "SELECT id, first_name, last_name, date_of_birth, sex FROM patients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(patient_from_row)
        .transpose()
    }

    async fn fetch_clinician(&self, id: i64) -> Result<Option<Clinician>, DbError> {
        sqlx::query(
            "SELECT id, first_name, last_name, registration_id FROM clinicians WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(clinician_from_row)
        .transpose()
    }

    async fn fetch_medication(&self, id: i64) -> Result<Option<Medication>, DbError> {
        sqlx::query(
            r#"
            SELECT id, code, code_name, code_system, strength_value, strength_unit, form
            FROM medications
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .as_ref()
        .map(medication_from_row)
        .transpose()
    }

    async fn list_for_patient(
        &self,
        patient_id: i64,
        filter: &RequestFilter,
    ) -> Result<Vec<MedicationRequestDetail>, DbError> {
        let sql = format!(
            r#"{DETAIL_SELECT}
            WHERE r.patient_id = $1
              AND ($2::text IS NULL OR r.status = $2)
              AND ($3::date IS NULL OR r.prescribed_date >= $3)
              AND ($4::date IS NULL OR r.prescribed_date <= $4)
            ORDER BY r.id
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(patient_id)
            .bind(filter.status())
            .bind(filter.prescribed_from)
            .bind(filter.prescribed_to)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(detail_from_row).collect()
    }

    /// UPDATE the present fields and read back the joined row, in one
    /// transaction.
    async fn patch(
        &self,
        patient_id: i64,
        request_id: i64,
        patch: &MedicationRequestPatch,
    ) -> Result<Option<MedicationRequestDetail>, DbError> {
        let mut tx = self.pool.begin().await?;

        if !patch.is_empty() {
            let mut update = QueryBuilder::<Postgres>::new("UPDATE medication_requests SET ");
            {
                let mut fields = update.separated(", ");
                for change in patch.changes() {
                    match change {
                        RequestChange::EndDate(end_date) => {
                            fields.push("end_date = ");
                            fields.push_bind_unseparated(*end_date);
                        }
                        RequestChange::Frequency(frequency) => {
                            fields.push("frequency = ");
                            fields.push_bind_unseparated(frequency.clone());
                        }
                        RequestChange::Status(status) => {
                            fields.push("status = ");
                            fields.push_bind_unseparated(status.as_str());
                        }
                    }
                }
            }
            update
                .push(" WHERE id = ")
                .push_bind(request_id)
                .push(" AND patient_id = ")
                .push_bind(patient_id);

            let result = update.build().execute(&mut *tx).await?;
            if result.rows_affected() == 0 {
                return Ok(None);
            }
        }

        let sql = format!("{DETAIL_SELECT} WHERE r.id = $1 AND r.patient_id = $2");
        let detail = sqlx::query(&sql)
            .bind(request_id)
            .bind(patient_id)
            .fetch_optional(&mut *tx)
            .await?
            .as_ref()
            .map(detail_from_row)
            .transpose()?;

        tx.commit().await?;
        Ok(detail)
    }
}

#[async_trait]
impl MedicationStore for PgStore {
    async fn patient(&self, id: i64) -> StoreResult<Option<Patient>> {
        Ok(self.fetch_patient(id).await?)
    }

    async fn clinician(&self, id: i64) -> StoreResult<Option<Clinician>> {
        Ok(self.fetch_clinician(id).await?)
    }

    async fn medication(&self, id: i64) -> StoreResult<Option<Medication>> {
        Ok(self.fetch_medication(id).await?)
    }

    async fn insert_patient(&self, patient: NewPatient) -> StoreResult<Patient> {
        let row = sqlx::query(
            r#"
            INSERT INTO patients (first_name, last_name, date_of_birth, sex)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, date_of_birth, sex
            "#,
        )
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(patient.date_of_birth)
        .bind(patient.sex.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(patient_from_row(&row)?)
    }

    async fn insert_clinician(&self, clinician: NewClinician) -> StoreResult<Clinician> {
        let row = sqlx::query(
            r#"
            INSERT INTO clinicians (first_name, last_name, registration_id)
            VALUES ($1, $2, $3)
            RETURNING id, first_name, last_name, registration_id
            "#,
        )
        .bind(&clinician.first_name)
        .bind(&clinician.last_name)
        .bind(&clinician.registration_id)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(clinician_from_row(&row)?)
    }

    async fn insert_medication(&self, medication: NewMedication) -> StoreResult<Medication> {
        let row = sqlx::query(
            r#"
            INSERT INTO medications
                (code, code_name, code_system, strength_value, strength_unit, form)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, code, code_name, code_system, strength_value, strength_unit, form
            "#,
        )
        .bind(&medication.code)
        .bind(&medication.code_name)
        .bind(&medication.code_system)
        .bind(medication.strength_value)
        .bind(&medication.strength_unit)
        .bind(medication.form.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(medication_from_row(&row)?)
    }

    async fn insert_request(&self, request: NewMedicationRequest) -> StoreResult<MedicationRequest> {
        let sql = format!(
            r#"
            INSERT INTO medication_requests
                (patient_id, clinician_id, medication_id, reason_text,
                 prescribed_date, start_date, end_date, frequency, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {REQUEST_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(request.patient_id)
            .bind(request.clinician_id)
            .bind(request.medication_id)
            .bind(&request.reason_text)
            .bind(request.prescribed_date)
            .bind(request.start_date)
            .bind(request.end_date)
            .bind(&request.frequency)
            .bind(request.status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(request_from_row(&row)?)
    }

    async fn list_requests(
        &self,
        patient_id: i64,
        filter: &RequestFilter,
    ) -> StoreResult<Vec<MedicationRequestDetail>> {
        Ok(self.list_for_patient(patient_id, filter).await?)
    }

    async fn patch_request(
        &self,
        patient_id: i64,
        request_id: i64,
        patch: &MedicationRequestPatch,
    ) -> StoreResult<Option<MedicationRequestDetail>> {
        Ok(self.patch(patient_id, request_id, patch).await?)
    }
}
