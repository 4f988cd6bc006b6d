use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info};

use super::ImportError;
use crate::domain::{Availability, AvailabilityType};

/// Availability export with `Employee,Date,Type` columns. Blank employee rows are skipped.
pub struct AvailabilityCsvImporter;

impl AvailabilityCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Availability>, ImportError> {
        let file = std::fs::File::open(path.as_ref())?;
        let availabilities = Self::from_reader(file)?;
        info!(
            path = %path.as_ref().display(),
            rows = availabilities.len(),
            "availability export loaded"
        );
        Ok(availabilities)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Availability>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut availabilities = Vec::new();

        for (index, record) in csv_reader.deserialize::<AvailabilityRow>().enumerate() {
            let row = record?;
            // Header is line 1.
            let line = index + 2;
            if row.employee.is_empty() {
                debug!(line, "skipping availability row without employee");
                continue;
            }
            availabilities.push(row.into_availability(line)?);
        }

        Ok(availabilities)
    }
}

#[derive(Debug, Deserialize)]
struct AvailabilityRow {
    #[serde(rename = "Employee")]
    employee: String,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Type")]
    kind: String,
}

impl AvailabilityRow {
    fn into_availability(self, line: usize) -> Result<Availability, ImportError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            ImportError::InvalidDate {
                row: line,
                value: self.date.clone(),
            }
        })?;
        let kind = parse_kind(&self.kind).ok_or_else(|| ImportError::UnknownType {
            row: line,
            value: self.kind.clone(),
        })?;
        Ok(Availability::new(self.employee, date, kind))
    }
}

fn parse_kind(value: &str) -> Option<AvailabilityType> {
    match value.to_ascii_uppercase().as_str() {
        "UNAVAILABLE" => Some(AvailabilityType::Unavailable),
        "DESIRED" => Some(AvailabilityType::Desired),
        "UNDESIRED" => Some(AvailabilityType::Undesired),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_skips_blank_employees() {
        let csv = "Employee,Date,Type\nR2a A, 2024-07-04 ,unavailable\n,2024-07-05,DESIRED\nR3a P,2024-08-01,Undesired\n";
        let rows = AvailabilityCsvImporter::from_reader(csv.as_bytes()).expect("csv parses");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].employee, "R2a A");
        assert_eq!(
            rows[0].date,
            NaiveDate::from_ymd_opt(2024, 7, 4).expect("valid date")
        );
        assert_eq!(rows[0].kind, AvailabilityType::Unavailable);
        assert_eq!(rows[1].kind, AvailabilityType::Undesired);
    }

    #[test]
    fn reports_the_offending_line() {
        let csv = "Employee,Date,Type\nR2a A,2024-07-04,UNAVAILABLE\nR2a A,07/05/2024,DESIRED\n";
        match AvailabilityCsvImporter::from_reader(csv.as_bytes()) {
            Err(ImportError::InvalidDate { row, value }) => {
                assert_eq!(row, 3);
                assert_eq!(value, "07/05/2024");
            }
            other => panic!("expected invalid date, got {other:?}"),
        }

        let csv = "Employee,Date,Type\nR2a A,2024-07-04,MAYBE\n";
        assert!(matches!(
            AvailabilityCsvImporter::from_reader(csv.as_bytes()),
            Err(ImportError::UnknownType { row: 2, .. })
        ));
    }
}
