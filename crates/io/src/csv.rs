// Population table CSV import/export

use std::io::{Read, Write};
use std::path::Path;

use wardpop_core::PopulationRecord;

use crate::error::IoError;

/// Read a population table with header
/// `Region,Council,Ward,Total_Pop,Male_Pop,Female_Pop`.
pub fn read_population(path: &Path) -> Result<Vec<PopulationRecord>, IoError> {
    let content = read_file_as_utf8(path)?;
    let records = parse_population(&content, path)?;
    log::info!("read {} population records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse population CSV text. `path` only labels errors.
pub fn parse_population(content: &str, path: &Path) -> Result<Vec<PopulationRecord>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    reader
        .deserialize::<PopulationRecord>()
        .map(|row| row.map_err(|e| parse_error(path, &e)))
        .collect()
}

pub fn write_population(path: &Path, records: &[PopulationRecord]) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_population_to(file, records).map_err(|message| IoError::Write {
        path: path.to_path_buf(),
        message,
    })?;
    log::info!("wrote {} population records to {}", records.len(), path.display());
    Ok(())
}

/// Serialize records with the published header, even when empty.
pub fn write_population_to<W: Write>(out: W, records: &[PopulationRecord]) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer
        .write_record(["Region", "Council", "Ward", "Total_Pop", "Male_Pop", "Female_Pop"])
        .map_err(|e| e.to_string())?;
    for record in records {
        writer.serialize(record).map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let open_err = |source| IoError::Open { path: path.to_path_buf(), source };
    let mut file = std::fs::File::open(path).map_err(open_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(open_err)?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            log::warn!("{} is not UTF-8; decoding as Windows-1252", path.display());
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn parse_error(path: &Path, e: &csv::Error) -> IoError {
    IoError::Parse {
        path: path.to_path_buf(),
        line: e.position().map(|p| p.line()),
        message: match e.kind() {
            csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
            _ => e.to_string(),
        },
    }
}
