//! The patient record schema.
//!
//! This module defines the fixed, typed field set every record in the
//! registry carries. Validation happens when values are constructed
//! ([`NonEmptyText`], [`Age`]) or parsed (the `FromStr` impls used by the
//! CLI), so a `PatientRecord` held by the store is always well-formed.

use crate::error::{RegistryError, RegistryResult};
use chrono::{DateTime, Utc};
use hpms_types::{Age, NonEmptyText};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique, immutable identifier of a patient record.
///
/// Assigned by the store at registration and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(Uuid);

impl PatientId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its string form.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Validation` if the input is not a UUID.
    pub fn parse(input: &str) -> RegistryResult<Self> {
        let uuid = Uuid::parse_str(input.trim())
            .map_err(|e| RegistryError::Validation(format!("invalid patient id: {e}")))?;
        Ok(Self(uuid))
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PatientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PatientId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

/// Error returned when a categorical field value cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("unrecognised value for {field}: {value}")]
pub struct ParseFieldError {
    field: &'static str,
    value: String,
}

impl ParseFieldError {
    pub(crate) fn new(field: &'static str, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// Patient gender as captured on the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Gender {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(ParseFieldError::new("gender", s)),
        }
    }
}

/// ABO/Rh blood group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BloodType {
    #[serde(rename = "A+")]
    APositive,
    #[serde(rename = "A-")]
    ANegative,
    #[serde(rename = "B+")]
    BPositive,
    #[serde(rename = "B-")]
    BNegative,
    #[serde(rename = "AB+")]
    AbPositive,
    #[serde(rename = "AB-")]
    AbNegative,
    #[serde(rename = "O+")]
    OPositive,
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodType {
    pub fn label(&self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
        }
    }
}

impl std::fmt::Display for BloodType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for BloodType {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A+" => Ok(BloodType::APositive),
            "A-" => Ok(BloodType::ANegative),
            "B+" => Ok(BloodType::BPositive),
            "B-" => Ok(BloodType::BNegative),
            "AB+" => Ok(BloodType::AbPositive),
            "AB-" => Ok(BloodType::AbNegative),
            "O+" => Ok(BloodType::OPositive),
            "O-" => Ok(BloodType::ONegative),
            _ => Err(ParseFieldError::new("blood type", s)),
        }
    }
}

/// Administrative status of a patient.
///
/// A patient has a ward exactly while admitted, so the ward lives on the
/// `Admitted` variant rather than as a free-standing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdmissionStatus {
    /// Registered with the hospital but not currently an inpatient.
    Registered,
    /// Admitted to a named ward or department.
    Admitted { ward: NonEmptyText },
    /// Previously admitted, now discharged.
    Discharged,
}

impl AdmissionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AdmissionStatus::Registered => "registered",
            AdmissionStatus::Admitted { .. } => "admitted",
            AdmissionStatus::Discharged => "discharged",
        }
    }

    /// The ward the patient occupies, if currently admitted.
    pub fn ward(&self) -> Option<&NonEmptyText> {
        match self {
            AdmissionStatus::Admitted { ward } => Some(ward),
            _ => None,
        }
    }
}

impl std::fmt::Display for AdmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdmissionStatus::Admitted { ward } => write!(f, "admitted ({ward})"),
            other => f.write_str(other.label()),
        }
    }
}

/// One patient's demographic and administrative data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: PatientId,
    pub name: NonEmptyText,
    pub age: Age,
    #[serde(default)]
    pub gender: Option<Gender>,
    pub contact: NonEmptyText,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub blood_type: Option<BloodType>,
    #[serde(default)]
    pub medical_history: Option<String>,
    pub admission_status: AdmissionStatus,
    pub registered_at: DateTime<Utc>,
}

/// Fields supplied when registering a new patient.
///
/// Name, age and contact are required; everything else is optional.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub age: Age,
    pub contact: NonEmptyText,
    pub gender: Option<Gender>,
    pub address: Option<String>,
    pub blood_type: Option<BloodType>,
    pub medical_history: Option<String>,
}

/// A partial update: `None` leaves the corresponding field untouched.
///
/// `id` and `registered_at` are not updatable.
#[derive(Debug, Clone, Default)]
pub struct PatientUpdate {
    pub name: Option<NonEmptyText>,
    pub age: Option<Age>,
    pub gender: Option<Gender>,
    pub contact: Option<NonEmptyText>,
    pub address: Option<String>,
    pub blood_type: Option<BloodType>,
    pub medical_history: Option<String>,
    pub admission_status: Option<AdmissionStatus>,
}

impl PatientUpdate {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.gender.is_none()
            && self.contact.is_none()
            && self.address.is_none()
            && self.blood_type.is_none()
            && self.medical_history.is_none()
            && self.admission_status.is_none()
    }
}

impl PatientRecord {
    /// Builds a record from registration fields with a fresh identifier.
    pub(crate) fn create(new: NewPatient) -> Self {
        Self {
            id: PatientId::new(),
            name: new.name,
            age: new.age,
            gender: new.gender,
            contact: new.contact,
            address: new.address,
            blood_type: new.blood_type,
            medical_history: new.medical_history,
            admission_status: AdmissionStatus::Registered,
            registered_at: Utc::now(),
        }
    }

    /// Applies a partial update, leaving unset fields unchanged.
    pub(crate) fn apply(&mut self, changes: PatientUpdate) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(age) = changes.age {
            self.age = age;
        }
        if let Some(gender) = changes.gender {
            self.gender = Some(gender);
        }
        if let Some(contact) = changes.contact {
            self.contact = contact;
        }
        if let Some(address) = changes.address {
            self.address = Some(address);
        }
        if let Some(blood_type) = changes.blood_type {
            self.blood_type = Some(blood_type);
        }
        if let Some(medical_history) = changes.medical_history {
            self.medical_history = Some(medical_history);
        }
        if let Some(status) = changes.admission_status {
            self.admission_status = status;
        }
    }
}
