//! Out-of-band registration of reference entities
//!
//! Patients, clinicians and medications have no HTTP creation endpoint; they
//! are inserted here and read-only afterwards.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;

use medreq_core::{
    MedicationForm, MedicationStore, NewClinician, NewMedication, NewPatient, Sex,
};
use medreq_server::PgStore;

use crate::config::DatabaseArgs;

#[derive(Parser, Debug)]
pub struct RegisterArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(subcommand)]
    pub command: RegisterCommands,
}

#[derive(Subcommand, Debug)]
pub enum RegisterCommands {
    /// Register a patient
    Patient(PatientArgs),
    /// Register a clinician (registration id must be unique)
    Clinician(ClinicianArgs),
    /// Register a medication (code must be unique)
    Medication(MedicationArgs),
}

#[derive(Parser, Debug)]
pub struct PatientArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub date_of_birth: NaiveDate,

    /// male or female
    #[arg(long)]
    pub sex: Sex,
}

#[derive(Parser, Debug)]
pub struct ClinicianArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Professional registration identifier
    #[arg(long)]
    pub registration_id: String,
}

#[derive(Parser, Debug)]
pub struct MedicationArgs {
    /// Code within the coding system (e.g. a SNOMED concept id)
    #[arg(long)]
    pub code: String,

    #[arg(long)]
    pub code_name: String,

    #[arg(long, default_value = "SNOMED")]
    pub code_system: String,

    #[arg(long)]
    pub strength_value: f64,

    /// Strength unit (e.g. g/ml)
    #[arg(long)]
    pub strength_unit: String,

    /// powder, tablet, capsule or syrup
    #[arg(long)]
    pub form: MedicationForm,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run_register(args: RegisterArgs) -> Result<()> {
    let store = PgStore::new(args.database.require().await?);

    match args.command {
        RegisterCommands::Patient(args) => {
            let patient = store
                .insert_patient(NewPatient {
                    first_name: args.first_name,
                    last_name: args.last_name,
                    date_of_birth: args.date_of_birth,
                    sex: args.sex,
                })
                .await
                .context("Failed to register patient")?;
            tracing::info!(patient_id = patient.id, "patient registered");
            print_json(&patient)
        }
        RegisterCommands::Clinician(args) => {
            let clinician = store
                .insert_clinician(NewClinician {
                    first_name: args.first_name,
                    last_name: args.last_name,
                    registration_id: args.registration_id,
                })
                .await
                .context("Failed to register clinician")?;
            tracing::info!(clinician_id = clinician.id, "clinician registered");
            print_json(&clinician)
        }
        RegisterCommands::Medication(args) => {
            let medication = store
                .insert_medication(NewMedication {
                    code: args.code,
                    code_name: args.code_name,
                    code_system: args.code_system,
                    strength_value: args.strength_value,
                    strength_unit: args.strength_unit,
                    form: args.form,
                })
                .await
                .context("Failed to register medication")?;
            tracing::info!(medication_id = medication.id, "medication registered");
            print_json(&medication)
        }
    }
}
