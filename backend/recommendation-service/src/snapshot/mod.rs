//! JSON-lines snapshot reader for the startup loads.
//!
//! One JSON object per line; blank lines are skipped. Any unreadable or
//! malformed line aborts the load.

use crate::error::{AppError, Result};
use crate::models::{DefaultRecord, PersonalRecord, SimilarityRecord};
use crate::services::{OfflineCatalog, OfflineSnapshot, SimilarityIndex};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| {
        AppError::Snapshot(format!("Failed to open {}: {}", path.display(), e))
    })?;
    parse_jsonl(BufReader::new(file), &path.display().to_string())
}

pub fn parse_jsonl<T, R>(reader: R, source: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: BufRead,
{
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line
            .map_err(|e| AppError::Snapshot(format!("{}:{}: {}", source, idx + 1, e)))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line)
            .map_err(|e| AppError::Snapshot(format!("{}:{}: {}", source, idx + 1, e)))?;
        records.push(record);
    }
    Ok(records)
}

pub fn load_offline_catalog(
    catalog: &OfflineCatalog,
    personal_path: &Path,
    default_path: &Path,
) -> Result<()> {
    let personal: Vec<PersonalRecord> = read_jsonl(personal_path)?;
    info!(path = %personal_path.display(), records = personal.len(), "Read personal snapshot");
    catalog.load(OfflineSnapshot::Personal(personal))?;

    let default: Vec<DefaultRecord> = read_jsonl(default_path)?;
    info!(path = %default_path.display(), records = default.len(), "Read default snapshot");
    catalog.load(OfflineSnapshot::Default(default))?;

    Ok(())
}

pub fn load_similarity_index(index: &SimilarityIndex, path: &Path) -> Result<usize> {
    let records: Vec<SimilarityRecord> = read_jsonl(path)?;
    info!(path = %path.display(), records = records.len(), "Read similarity snapshot");
    index.load(records)
}
