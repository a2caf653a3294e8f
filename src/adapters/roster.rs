use crate::adapters::result_log::FIELD_SEPARATOR;
use crate::domain::model::{ParticipantRecord, Platform};
use crate::utils::error::{Result, VerifyError};
use crate::utils::validation::validate_input_file;
use calamine::{open_workbook, Reader, Xlsx};
use regex::Regex;
use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["xlsx", "csv"];

/// Column layout of a roster file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    /// `identifier, <five handles>`
    Spreadsheet,
    /// `identifier, name, <five handles>`
    Delimited,
}

impl RosterFormat {
    fn handle_offset(self) -> usize {
        match self {
            RosterFormat::Spreadsheet => 1,
            RosterFormat::Delimited => 2,
        }
    }
}

/// Validates `path` and loads every participant up to the first blank row.
pub fn load_roster(path: &Path) -> Result<Vec<ParticipantRecord>> {
    let extension = validate_input_file(path, &SUPPORTED_EXTENSIONS)?;
    let participants = match extension.as_str() {
        "xlsx" => load_xlsx(path)?,
        _ => load_csv(path)?,
    };
    tracing::info!("📋 Loaded {} participants from {}", participants.len(), path.display());
    Ok(participants)
}

fn load_xlsx(path: &Path) -> Result<Vec<ParticipantRecord>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| VerifyError::UnsupportedInput {
            path: path.display().to_string(),
            reason: "workbook has no worksheets".to_string(),
        })??;

    let rows = range
        .rows()
        .skip(1)
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>());
    rows_to_participants(rows, RosterFormat::Spreadsheet)
}

fn load_csv(path: &Path) -> Result<Vec<ParticipantRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    // Empty lines never reach us as records, so a gap in the line numbers
    // is the blank row that ends the roster.
    let headers = reader.headers()?.clone();
    let mut next_line = headers
        .position()
        .map(|pos| pos.line() + spanned_lines(&headers));

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let start = record.position().map(|pos| pos.line());
        if let (Some(expected), Some(start)) = (next_line, start) {
            if start > expected {
                tracing::debug!("Blank line {} ends the roster", expected);
                break;
            }
        }
        next_line = start.map(|line| line + spanned_lines(&record));
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }
    rows_to_participants(rows, RosterFormat::Delimited)
}

/// Physical lines a record occupies, counting newlines inside quoted fields.
fn spanned_lines(record: &csv::StringRecord) -> u64 {
    1 + record
        .iter()
        .map(|field| field.matches('\n').count() as u64)
        .sum::<u64>()
}

/// Turns data rows (header already removed) into participants. Stops at the
/// first row where every cell is empty or the literal `None`. Identifiers
/// containing the result log separator are rejected up front.
pub fn rows_to_participants<I>(rows: I, format: RosterFormat) -> Result<Vec<ParticipantRecord>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let cleaner = CellCleaner::new()?;
    let offset = format.handle_offset();
    let mut participants = Vec::new();

    for (row_number, row) in rows.into_iter().enumerate() {
        let cells: Vec<String> = row.iter().map(|c| cleaner.clean(c)).collect();
        if cells.iter().all(|c| c.is_empty() || c == "None") {
            tracing::debug!("Blank row {} ends the roster", row_number + 2);
            break;
        }

        let Some(id) = cells.first().filter(|id| !id.is_empty()) else {
            tracing::warn!("⚠️ Row {} has handles but no identifier, skipping", row_number + 2);
            continue;
        };

        if id.contains(FIELD_SEPARATOR) {
            tracing::error!("❌ Row {} identifier '{}' cannot be logged", row_number + 2, id);
            return Err(VerifyError::UnloggableIdentifier { id: id.clone() });
        }

        let mut participant = ParticipantRecord::new(id.clone());
        for platform in Platform::ALL {
            if let Some(handle) = cells.get(offset + platform.index()) {
                participant.handles.insert(platform, handle.clone());
            }
        }
        tracing::debug!("Loading participant {}", participant.id);
        participants.push(participant);
    }

    Ok(participants)
}

/// Strips tabs, line breaks and other control whitespace pasted into cells.
struct CellCleaner {
    re: Regex,
}

impl CellCleaner {
    fn new() -> Result<Self> {
        let re = Regex::new(r"[\t\n\x0B\f\r]+").map_err(|e| VerifyError::ConfigError {
            message: format!("cell cleaning pattern: {}", e),
        })?;
        Ok(Self { re })
    }

    fn clean(&self, cell: &str) -> String {
        self.re.replace_all(cell, "").trim().to_string()
    }
}
