//! CSV export of the registry.
//!
//! One row per record; the admission status is split into its label and
//! ward columns so the output loads cleanly into a spreadsheet.

use crate::error::{RegistryError, RegistryResult};
use crate::record::PatientRecord;
use std::io;

const HEADER: [&str; 11] = [
    "id",
    "name",
    "age",
    "gender",
    "contact",
    "address",
    "blood_type",
    "medical_history",
    "status",
    "ward",
    "registered_at",
];

/// Writes `records` as CSV, header row first.
///
/// Quoting and escaping are handled by the `csv` writer, so names or
/// histories containing commas and quotes survive a round trip through a
/// spreadsheet.
pub fn write_csv<W: io::Write>(records: &[PatientRecord], writer: W) -> RegistryResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(HEADER).map_err(RegistryError::Csv)?;

    for record in records {
        out.write_record([
            record.id.to_string(),
            record.name.as_str().to_string(),
            record.age.to_string(),
            record.gender.map(|g| g.label().to_string()).unwrap_or_default(),
            record.contact.as_str().to_string(),
            record.address.clone().unwrap_or_default(),
            record
                .blood_type
                .map(|b| b.label().to_string())
                .unwrap_or_default(),
            record.medical_history.clone().unwrap_or_default(),
            record.admission_status.label().to_string(),
            record
                .admission_status
                .ward()
                .map(|w| w.as_str().to_string())
                .unwrap_or_default(),
            record.registered_at.to_rfc3339(),
        ])
        .map_err(RegistryError::Csv)?;
    }

    out.flush().map_err(RegistryError::FileWrite)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BloodType, Gender, NewPatient};
    use crate::store::RecordStore;
    use hpms_types::{Age, NonEmptyText};

    #[test]
    fn export_writes_header_and_one_row_per_record() {
        let store = RecordStore::in_memory();
        store
            .register(NewPatient {
                name: NonEmptyText::new("Alice Smith").expect("name should be valid"),
                age: Age::new(30).expect("age should be valid"),
                contact: NonEmptyText::new("0700 000000").expect("contact should be valid"),
                gender: Some(Gender::Female),
                address: Some("1 High Street".into()),
                blood_type: Some(BloodType::OPositive),
                medical_history: None,
            })
            .expect("register should succeed");
        store
            .register(NewPatient {
                name: NonEmptyText::new("Bob, \"Bobby\" Jones").expect("name should be valid"),
                age: Age::new(45).expect("age should be valid"),
                contact: NonEmptyText::new("0800 111111").expect("contact should be valid"),
                gender: None,
                address: None,
                blood_type: None,
                medical_history: Some("asthma".into()),
            })
            .expect("register should succeed");

        let mut buf = Vec::new();
        write_csv(&store.list_all(), &mut buf).expect("export should succeed");
        let csv_text = String::from_utf8(buf).expect("output should be UTF-8");

        let lines: Vec<&str> = csv_text.lines().collect();
        assert_eq!(lines.len(), 3, "header plus two rows");
        assert_eq!(lines[0], HEADER.join(","));
        assert!(lines[1].contains("Alice Smith"));
        assert!(lines[1].contains("O+"));
        assert!(
            lines[2].contains("\"Bob, \"\"Bobby\"\" Jones\""),
            "comma and quotes should be escaped: {}",
            lines[2]
        );
    }

    #[test]
    fn export_of_empty_store_is_header_only() {
        let mut buf = Vec::new();
        write_csv(&[], &mut buf).expect("export should succeed");
        let csv_text = String::from_utf8(buf).expect("output should be UTF-8");
        assert_eq!(csv_text.lines().count(), 1);
    }
}
