use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::RvError;

/// The roster that ships inside the binary. Used when no file is given.
const BUNDLED_ACCOUNTS: &str = include_str!("../data/accounts.json");

/// One account row. Records are immutable once loaded and the dataset
/// keeps its on-disk order for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Record {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub ip_address: String,
    pub balance: f64,
}

/// Closed set of record attributes. Filtering and rendering only ever go
/// through these variants, so an unknown field name can not reach the
/// filter path at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    FirstName,
    LastName,
    IpAddress,
    Balance,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Id,
        Field::FirstName,
        Field::LastName,
        Field::IpAddress,
        Field::Balance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::IpAddress => "ip_address",
            Field::Balance => "balance",
        }
    }

    /// Construction-time validation for field names coming from the
    /// outside (e.g. the --field cli flag).
    pub fn from_name(name: &str) -> Result<Field, RvError> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == name)
            .ok_or_else(|| RvError::UnknownField(name.to_string()))
    }

    /// Canonical string form of the attribute, the representation the
    /// filter matches against. Floats go through Display, so 1234.5
    /// stringifies as "1234.5" and not "1234.50".
    pub fn value_of(&self, record: &Record) -> String {
        match self {
            Field::Id => record.id.to_string(),
            Field::FirstName => record.first_name.clone(),
            Field::LastName => record.last_name.clone(),
            Field::IpAddress => record.ip_address.clone(),
            Field::Balance => record.balance.to_string(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Field::Id | Field::Balance)
    }
}

/// Distinct field names across the dataset, first-occurrence order, no
/// duplicates however many records are scanned. Pure and deterministic,
/// recomputing it for the same dataset gives the same catalog.
pub fn derive_fields(records: &[Record]) -> Vec<Field> {
    let mut fields = Vec::new();
    for _record in records {
        for field in Field::ALL {
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
    }
    fields
}

/// Indices of the records whose `field` value contains `term`,
/// case-insensitive, in the dataset's original order. An empty term
/// matches every record.
pub fn filter(records: &[Record], field: Field, term: &str) -> Vec<usize> {
    let needle = term.to_lowercase();
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| field.value_of(r).to_lowercase().contains(&needle))
        .map(|(idx, _)| idx)
        .collect()
}

pub fn load_bundled() -> Result<Vec<Record>, RvError> {
    let records: Vec<Record> = serde_json::from_str(BUNDLED_ACCOUNTS)?;
    info!("Loaded {} bundled records", records.len());
    Ok(records)
}

pub fn load_file(path: &Path) -> Result<Vec<Record>, RvError> {
    let path = check_file(path)?;
    let raw = fs::read_to_string(&path)?;
    let records: Vec<Record> = serde_json::from_str(&raw)?;
    if records.is_empty() {
        return Err(RvError::LoadingFailed("Dataset has no records!".into()));
    }
    info!("Loaded {} records from {}", records.len(), path.display());
    debug!("First record: {:?}", records[0]);
    Ok(records)
}

fn check_file(path: &Path) -> Result<PathBuf, RvError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => RvError::FileNotFound,
        ErrorKind::PermissionDenied => RvError::PermissionDenied,
        _ => RvError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(RvError::LoadingFailed("Not a file!".into()));
    }

    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("JSON") => Ok(path.to_path_buf()),
        _ => Err(RvError::UnknownFileType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(id: i64, first: &str) -> Record {
        Record {
            id,
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            ip_address: "10.0.0.1".to_string(),
            balance: 0.0,
        }
    }

    fn names() -> Vec<Record> {
        vec![record(1, "Ann"), record(2, "Bob"), record(3, "Anna")]
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let data = names();
        let hits = filter(&data, Field::FirstName, "an");
        let found: Vec<&str> = hits.iter().map(|&i| data[i].first_name.as_str()).collect();
        assert_eq!(found, vec!["Ann", "Anna"]);

        assert_eq!(filter(&data, Field::FirstName, "AN"), hits);
        assert_eq!(filter(&data, Field::FirstName, "An"), hits);
    }

    #[test]
    fn empty_term_matches_everything() {
        let data = names();
        assert_eq!(filter(&data, Field::FirstName, ""), vec![0, 1, 2]);
        assert_eq!(filter(&data, Field::Balance, ""), vec![0, 1, 2]);
    }

    #[test]
    fn no_match_gives_empty_view() {
        let data = names();
        assert_eq!(filter(&data, Field::FirstName, "zzz"), Vec::<usize>::new());
    }

    #[test]
    fn filter_preserves_dataset_order() {
        let mut data = names();
        data.push(record(4, "Annabel"));
        let hits = filter(&data, Field::FirstName, "ann");
        assert_eq!(hits, vec![0, 2, 3]);
    }

    #[test]
    fn filter_matches_stringified_numerics() {
        let mut data = names();
        data[1].balance = 1234.5;
        // Display form of the float, not the currency rendering
        assert_eq!(filter(&data, Field::Balance, "34.5"), vec![1]);
        assert_eq!(filter(&data, Field::Id, "2"), vec![1]);
    }

    #[test]
    fn derived_fields_are_deduped_and_ordered() {
        let data = names();
        let fields = derive_fields(&data);
        assert_eq!(
            fields,
            vec![
                Field::Id,
                Field::FirstName,
                Field::LastName,
                Field::IpAddress,
                Field::Balance
            ]
        );
        // Stable however often it is recomputed
        assert_eq!(fields, derive_fields(&data));
    }

    #[test]
    fn field_names_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()).unwrap(), field);
        }
        assert!(Field::from_name("middle_name").is_err());
    }

    #[test]
    fn bundled_dataset_parses() {
        let records = load_bundled().unwrap();
        assert!(!records.is_empty());
        assert_eq!(records[0].id, 1);
    }
}
