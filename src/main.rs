use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hpms_core::{
    export, ActivityLog, AdmissionStatus, Age, BloodType, CategoryField, CoreConfig, Gender,
    NewPatient, NonEmptyText, PatientId, PatientRecord, PatientUpdate, RecordStore, SearchIndex,
    StatsAggregator,
};

#[derive(Parser)]
#[command(name = "hpms")]
#[command(about = "Hospital patient management registry CLI")]
struct Cli {
    /// Directory holding the registry snapshot and activity log
    #[arg(long, env = "HPMS_DATA_DIR", default_value = "hpms_data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new patient
    Register {
        /// Full name
        #[arg(long)]
        name: NonEmptyText,
        /// Age in years (1-150)
        #[arg(long)]
        age: Age,
        /// Contact number
        #[arg(long)]
        contact: NonEmptyText,
        /// Gender (male, female, other)
        #[arg(long)]
        gender: Option<Gender>,
        /// Postal address
        #[arg(long)]
        address: Option<String>,
        /// Blood type (A+, A-, B+, B-, AB+, AB-, O+, O-)
        #[arg(long)]
        blood_type: Option<BloodType>,
        /// Free-text medical history
        #[arg(long)]
        medical_history: Option<String>,
    },
    /// Show a single patient record
    Get {
        /// Patient id
        id: PatientId,
    },
    /// List all patients in registration order
    List,
    /// Update fields of an existing patient
    Update {
        /// Patient id
        id: PatientId,
        #[arg(long)]
        name: Option<NonEmptyText>,
        #[arg(long)]
        age: Option<Age>,
        #[arg(long)]
        gender: Option<Gender>,
        #[arg(long)]
        contact: Option<NonEmptyText>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        blood_type: Option<BloodType>,
        #[arg(long)]
        medical_history: Option<String>,
    },
    /// Delete a patient record
    Delete {
        /// Patient id
        id: PatientId,
    },
    /// Search patients by name
    Search {
        /// Case-insensitive substring to look for
        query: String,
        /// Also match against id and contact
        #[arg(long)]
        all_fields: bool,
    },
    /// Admit a patient to a ward
    Admit {
        /// Patient id
        id: PatientId,
        /// Ward or department name
        #[arg(long)]
        ward: NonEmptyText,
    },
    /// Discharge an admitted patient
    Discharge {
        /// Patient id
        id: PatientId,
    },
    /// Show dashboard statistics
    Stats {
        /// Group counts by a field (gender, blood-type, status, ward)
        #[arg(long)]
        by: Option<CategoryField>,
    },
    /// Export the registry as CSV
    Export {
        /// Output file; writes to stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the recent activity feed
    Activity,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hpms=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    tracing::info!("++ Opening registry in {}", cli.data_dir.display());

    let cfg = Arc::new(CoreConfig::new(cli.data_dir)?);
    let store = RecordStore::open(cfg.clone())?;
    let activity = ActivityLog::open(cfg)?;

    match cli.command {
        Commands::Register {
            name,
            age,
            contact,
            gender,
            address,
            blood_type,
            medical_history,
        } => {
            let record = store.register(NewPatient {
                name,
                age,
                contact,
                gender,
                address,
                blood_type,
                medical_history,
            })?;
            activity.record(format!("Registered patient {} ({})", record.name, record.id));
            println!("Registered patient with id {}", record.id);
        }
        Commands::Get { id } => {
            print_record(&store.get(id)?);
        }
        Commands::List => {
            let patients = store.list_all();
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in &patients {
                    println!("{}", summary_line(patient));
                }
            }
        }
        Commands::Update {
            id,
            name,
            age,
            gender,
            contact,
            address,
            blood_type,
            medical_history,
        } => {
            let changes = PatientUpdate {
                name,
                age,
                gender,
                contact,
                address,
                blood_type,
                medical_history,
                admission_status: None,
            };
            if changes.is_empty() {
                anyhow::bail!("nothing to update; pass at least one field flag");
            }
            let record = store.update(id, changes)?;
            activity.record(format!("Updated patient {} ({})", record.name, record.id));
            println!("Updated patient {}", record.id);
        }
        Commands::Delete { id } => {
            let removed = store.delete(id)?;
            activity.record(format!("Deleted patient {} ({})", removed.name, removed.id));
            println!("Deleted patient {}", removed.id);
        }
        Commands::Search { query, all_fields } => {
            let index = SearchIndex::new(&store);
            let hits = if all_fields {
                index.search_any(&query)
            } else {
                index.search(&query)
            };
            if hits.is_empty() {
                println!("No matching patients.");
            } else {
                for patient in &hits {
                    println!("{}", summary_line(patient));
                }
            }
        }
        Commands::Admit { id, ward } => {
            let record = store.update(
                id,
                PatientUpdate {
                    admission_status: Some(AdmissionStatus::Admitted { ward }),
                    ..PatientUpdate::default()
                },
            )?;
            activity.record(format!(
                "Admitted patient {} ({}) to {}",
                record.name,
                record.id,
                record
                    .admission_status
                    .ward()
                    .map(NonEmptyText::as_str)
                    .unwrap_or_default()
            ));
            println!("Admitted patient {}", record.id);
        }
        Commands::Discharge { id } => {
            let record = store.update(
                id,
                PatientUpdate {
                    admission_status: Some(AdmissionStatus::Discharged),
                    ..PatientUpdate::default()
                },
            )?;
            activity.record(format!("Discharged patient {} ({})", record.name, record.id));
            println!("Discharged patient {}", record.id);
        }
        Commands::Stats { by } => {
            let stats = StatsAggregator::new(&store);
            match by {
                Some(field) => {
                    for (bucket, count) in stats.count_by_category(field) {
                        println!("{bucket}: {count}");
                    }
                }
                None => {
                    println!("Total patients: {}", stats.total_count());
                    println!("Currently admitted: {}", stats.admitted_count());
                    let recent = stats.recently_registered(10);
                    if !recent.is_empty() {
                        println!("Recently registered:");
                        for patient in &recent {
                            println!("  {}", summary_line(patient));
                        }
                    }
                }
            }
        }
        Commands::Export { out } => {
            let records = store.list_all();
            match out {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    export::write_csv(&records, file)?;
                    println!("Exported {} records to {}", records.len(), path.display());
                }
                None => {
                    export::write_csv(&records, std::io::stdout().lock())?;
                }
            }
        }
        Commands::Activity => {
            let entries = activity.entries();
            if entries.is_empty() {
                println!("No recent activity.");
            } else {
                for entry in &entries {
                    println!(
                        "{}  {}",
                        entry.at.format("%Y-%m-%d %H:%M:%S"),
                        entry.message
                    );
                }
            }
        }
    }

    Ok(())
}

fn summary_line(patient: &PatientRecord) -> String {
    format!(
        "ID: {}, Name: {}, Age: {}, Status: {}, Registered: {}",
        patient.id,
        patient.name,
        patient.age,
        patient.admission_status,
        patient.registered_at.format("%Y-%m-%d")
    )
}

fn print_record(patient: &PatientRecord) {
    println!("ID:              {}", patient.id);
    println!("Name:            {}", patient.name);
    println!("Age:             {}", patient.age);
    println!(
        "Gender:          {}",
        patient.gender.map(|g| g.label()).unwrap_or("-")
    );
    println!("Contact:         {}", patient.contact);
    println!(
        "Address:         {}",
        patient.address.as_deref().unwrap_or("-")
    );
    println!(
        "Blood type:      {}",
        patient.blood_type.map(|b| b.label()).unwrap_or("-")
    );
    println!(
        "Medical history: {}",
        patient.medical_history.as_deref().unwrap_or("-")
    );
    println!("Status:          {}", patient.admission_status);
    println!(
        "Registered:      {}",
        patient.registered_at.format("%Y-%m-%d %H:%M:%S")
    );
}
