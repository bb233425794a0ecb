use crate::record::PatientId;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("no patient record with id {0}")]
    NotFound(PatientId),
    #[error("failed to read registry file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write registry file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize registry snapshot: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize registry snapshot: {0}")]
    Deserialization(serde_json::Error),
    #[error("failed to write CSV export: {0}")]
    Csv(csv::Error),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
