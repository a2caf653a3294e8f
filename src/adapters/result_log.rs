use crate::domain::model::ResultRecord;
use crate::domain::ports::ResultSink;
use crate::utils::error::{Result, VerifyError};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

pub const FIELD_SEPARATOR: &str = ", ";

/// Per-platform text log, one `identifier, handle, bool` line per record.
/// Every record is flushed as soon as it is appended.
pub struct ResultLog {
    path: PathBuf,
    file: File,
}

impl ResultLog {
    /// Opens the log for one pass. `resume` keeps earlier records; otherwise
    /// the file starts empty.
    pub fn open(path: impl Into<PathBuf>, resume: bool) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut options = OpenOptions::new();
        options.create(true);
        if resume {
            options.append(true);
        } else {
            options.write(true).truncate(true);
        }
        let file = options.open(&path)?;

        tracing::debug!(
            "Opened result log {} ({})",
            path.display(),
            if resume { "append" } else { "truncate" }
        );
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for ResultLog {
    fn append(&mut self, record: &ResultRecord) -> Result<()> {
        if record.participant_id.contains(FIELD_SEPARATOR) {
            return Err(VerifyError::UnloggableIdentifier {
                id: record.participant_id.clone(),
            });
        }
        writeln!(self.file, "{}", format_line(record))?;
        self.file.flush()?;
        tracing::debug!(
            "Data written to {} for participant {}: {}, {}",
            self.path.display(),
            record.participant_id,
            record.handle,
            record.exists
        );
        Ok(())
    }
}

pub fn format_line(record: &ResultRecord) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        record.participant_id,
        record.handle,
        record.exists,
        sep = FIELD_SEPARATOR
    )
}

/// Parses one log line. The identifier ends at the first separator and the
/// flag starts after the last one; whatever sits between is the handle.
pub fn parse_line(line: &str) -> Option<ResultRecord> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (participant_id, rest) = line.split_once(FIELD_SEPARATOR)?;
    let (handle, flag) = rest.rsplit_once(FIELD_SEPARATOR)?;
    let exists = match flag.trim().to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        _ => return None,
    };
    Some(ResultRecord {
        participant_id: participant_id.trim().to_string(),
        handle: handle.trim().to_string(),
        exists,
    })
}

/// Reads every record in file order. Blank lines are ignored.
pub fn read_log(path: &Path) -> Result<Vec<ResultRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_line(&line).ok_or_else(|| VerifyError::MalformedLogLine {
            path: path.display().to_string(),
            line: index + 1,
            content: line.clone(),
        })?;
        records.push(record);
    }

    Ok(records)
}
