//! Database migrations for the medication request tables

use sqlx::PgPool;

use super::DbError;

/// Create all tables and indexes if they do not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running medreq migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS patients (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            date_of_birth DATE NOT NULL,
            sex TEXT NOT NULL CHECK (sex IN ('male', 'female'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS clinicians (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            registration_id TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS medications (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            code TEXT NOT NULL UNIQUE,
            code_name TEXT NOT NULL,
            code_system TEXT NOT NULL,
            strength_value DOUBLE PRECISION NOT NULL,
            strength_unit TEXT NOT NULL,
            form TEXT NOT NULL CHECK (form IN ('powder', 'tablet', 'capsule', 'syrup'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS medication_requests (
            id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
            patient_id BIGINT NOT NULL REFERENCES patients(id),
            clinician_id BIGINT NOT NULL REFERENCES clinicians(id),
            medication_id BIGINT NOT NULL REFERENCES medications(id),
            reason_text TEXT,
            prescribed_date DATE NOT NULL,
            start_date DATE NOT NULL,
            end_date DATE,
            frequency TEXT,
            status TEXT NOT NULL DEFAULT 'active'
                CHECK (status IN ('active', 'on-hold', 'cancelled', 'completed'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_medication_requests_patient
        ON medication_requests(patient_id, prescribed_date)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("medreq migrations complete");
    Ok(())
}
