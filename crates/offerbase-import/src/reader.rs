//! Input readers: JSON (single object or array), CSV with a header row, and
//! the recursive data-file discovery walk used by directory imports.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::ImportError;

/// Splits a parsed JSON document into raw records.
///
/// Accepts either a single object or an array; non-object array entries are
/// logged and dropped rather than failing the batch.
///
/// # Errors
///
/// Returns [`ImportError::UnsupportedShape`] for scalar or null documents.
pub fn read_json_records(data: Value) -> Result<Vec<Map<String, Value>>, ImportError> {
    match data {
        Value::Object(map) => Ok(vec![map]),
        Value::Array(entries) => Ok(entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::Object(map) => Some(map),
                other => {
                    tracing::warn!(%other, "skipping non-object JSON entry");
                    None
                }
            })
            .collect()),
        _ => Err(ImportError::UnsupportedShape),
    }
}

/// Reads and splits a JSON file into raw records.
///
/// # Errors
///
/// Returns [`ImportError::Io`] / [`ImportError::Json`] on read or parse
/// failure, [`ImportError::UnsupportedShape`] for non-object documents.
pub fn read_json_file(path: &Path) -> Result<Vec<Map<String, Value>>, ImportError> {
    let content = fs::read_to_string(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let data: Value = serde_json::from_str(&content).map_err(|e| ImportError::Json {
        path: path.display().to_string(),
        source: e,
    })?;
    read_json_records(data)
}

/// Reads CSV rows into raw records.
///
/// Headers are matched case-insensitively (lowercased before mapping) and
/// every cell is kept as a string for the type coercer. Empty cells are
/// omitted so the defaulter treats them as absent. Rows with more cells
/// than headers are tolerated; the overflow cells are dropped.
///
/// # Errors
///
/// Returns [`ImportError::Csv`] if the input is not parseable as CSV.
pub fn read_csv_records<R: Read>(input: R) -> Result<Vec<Map<String, Value>>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let mut record = Map::new();
        for (index, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let Some(header) = headers.get(index) else {
                continue;
            };
            if header.is_empty() {
                continue;
            }
            record.insert(header.clone(), Value::String(cell.to_string()));
        }
        if !record.is_empty() {
            records.push(record);
        }
    }

    Ok(records)
}

/// Opens and reads a CSV file into raw records.
///
/// # Errors
///
/// Returns [`ImportError::Io`] on open failure or [`ImportError::Csv`] on
/// parse failure.
pub fn read_csv_file(path: &Path) -> Result<Vec<Map<String, Value>>, ImportError> {
    let file = fs::File::open(path).map_err(|e| ImportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    read_csv_records(file)
}

/// Recursively collects `*.json` and `*.csv` files under `dir`
/// (case-insensitive extensions), sorted for deterministic import order.
///
/// # Errors
///
/// Returns [`ImportError::Io`] if a directory cannot be read.
pub fn discover_data_files(dir: &Path) -> Result<Vec<PathBuf>, ImportError> {
    let mut files = Vec::new();
    walk(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), ImportError> {
    let entries = fs::read_dir(dir).map_err(|e| ImportError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ImportError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if is_data_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_data_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            ext == "json" || ext == "csv"
        })
}
