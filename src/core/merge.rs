//! Joins the per-platform result logs into `participant_details.csv`.
//!
//! Rows are keyed by participant identifier, so one short or reordered log
//! cannot shift another platform's values into the wrong row.

use crate::adapters::result_log::read_log;
use crate::config::Settings;
use crate::domain::model::{ParticipantRecord, Platform, ResultRecord};
use crate::utils::error::Result;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

pub const REPORT_FILE_NAME: &str = "participant_details.csv";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedRow {
    pub participant_id: String,
    pub handles: [Option<String>; 5],
    pub exists: [Option<bool>; 5],
}

impl CombinedRow {
    fn new(participant_id: &str) -> Self {
        Self {
            participant_id: participant_id.to_string(),
            ..Self::default()
        }
    }

    fn to_fields(&self) -> Vec<String> {
        let mut fields = Vec::with_capacity(11);
        fields.push(self.participant_id.clone());
        fields.extend(self.handles.iter().map(|h| h.clone().unwrap_or_default()));
        fields.extend(
            self.exists
                .iter()
                .map(|e| e.map(|b| b.to_string()).unwrap_or_default()),
        );
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    pub report_path: PathBuf,
    pub rows: usize,
    pub missing_logs: Vec<Platform>,
}

pub fn report_header() -> Vec<String> {
    let mut header = vec!["Handle".to_string()];
    header.extend(Platform::ALL.iter().map(|p| format!("{} Handle", p)));
    header.extend(Platform::ALL.iter().map(|p| format!("{} URL Exists", p)));
    header
}

/// Keyed join of the logs. Row order follows `roster_order` first, then the
/// first appearance of any remaining identifier across the logs in platform
/// order. Participants with no record anywhere get no row. When a log holds
/// several records for one participant, the last one wins.
pub fn combine(
    logs: &BTreeMap<Platform, Vec<ResultRecord>>,
    roster_order: &[String],
) -> Vec<CombinedRow> {
    let mut order: Vec<String> = Vec::new();
    let mut rows: HashMap<String, CombinedRow> = HashMap::new();

    for platform in Platform::ALL {
        let Some(records) = logs.get(&platform) else {
            continue;
        };
        for record in records {
            let row = rows
                .entry(record.participant_id.clone())
                .or_insert_with(|| {
                    order.push(record.participant_id.clone());
                    CombinedRow::new(&record.participant_id)
                });
            row.handles[platform.index()] = Some(record.handle.clone());
            row.exists[platform.index()] = Some(record.exists);
        }
    }

    let mut combined = Vec::with_capacity(rows.len());
    for id in roster_order.iter().chain(order.iter()) {
        if let Some(row) = rows.remove(id) {
            combined.push(row);
        }
    }
    combined
}

pub fn write_report(path: &Path, rows: &[CombinedRow]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(report_header())?;
    for row in rows {
        writer.write_record(row.to_fields())?;
        tracing::debug!("Writing data for participant {}", row.participant_id);
    }
    writer.flush()?;
    Ok(())
}

/// Reads whichever per-platform logs exist under the output directory and
/// writes the combined report next to them.
pub fn merge_logs(settings: &Settings, roster: Option<&[ParticipantRecord]>) -> Result<MergeSummary> {
    let mut logs = BTreeMap::new();
    let mut missing_logs = Vec::new();

    for platform in Platform::ALL {
        let path = settings.log_path(platform);
        if !path.is_file() {
            tracing::warn!("⚠️ No result log for {} at {}", platform, path.display());
            missing_logs.push(platform);
            continue;
        }
        let records = read_log(&path)?;
        tracing::info!("Finished reading {} records from {}", records.len(), path.display());
        logs.insert(platform, records);
    }

    let roster_order: Vec<String> = roster
        .map(|participants| participants.iter().map(|p| p.id.clone()).collect())
        .unwrap_or_default();
    let rows = combine(&logs, &roster_order);

    let report_path = settings.report_path();
    write_report(&report_path, &rows)?;
    tracing::info!("✅ Finished writing {} rows to {}", rows.len(), report_path.display());

    Ok(MergeSummary {
        report_path,
        rows: rows.len(),
        missing_logs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, handle: &str, exists: bool) -> ResultRecord {
        ResultRecord {
            participant_id: id.to_string(),
            handle: handle.to_string(),
            exists,
        }
    }

    #[test]
    fn test_header_has_eleven_columns_in_fixed_order() {
        let header = report_header();
        assert_eq!(header.len(), 11);
        assert_eq!(header[0], "Handle");
        assert_eq!(header[1], "GeeksForGeeks Handle");
        assert_eq!(header[5], "HackerRank Handle");
        assert_eq!(header[6], "GeeksForGeeks URL Exists");
        assert_eq!(header[10], "HackerRank URL Exists");
    }

    #[test]
    fn test_uneven_logs_stay_aligned_by_identifier() {
        let mut logs = BTreeMap::new();
        logs.insert(
            Platform::Codeforces,
            vec![record("P1", "tourist", true), record("P2", "petr", true)],
        );
        logs.insert(Platform::LeetCode, vec![record("P2", "p2_lc", false)]);

        let rows = combine(&logs, &[]);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].participant_id, "P1");
        assert_eq!(rows[0].handles[Platform::LeetCode.index()], None);

        assert_eq!(rows[1].participant_id, "P2");
        assert_eq!(rows[1].handles[Platform::LeetCode.index()].as_deref(), Some("p2_lc"));
        assert_eq!(rows[1].exists[Platform::LeetCode.index()], Some(false));
        assert_eq!(rows[1].exists[Platform::Codeforces.index()], Some(true));
    }

    #[test]
    fn test_roster_order_wins_and_duplicates_keep_last() {
        let mut logs = BTreeMap::new();
        logs.insert(
            Platform::CodeChef,
            vec![
                record("P1", "a", false),
                record("P2", "b", true),
                record("P1", "a", true),
                record("X9", "stray", true),
            ],
        );

        let roster = vec!["P2".to_string(), "P1".to_string(), "P5".to_string()];
        let rows = combine(&logs, &roster);
        let ids: Vec<_> = rows.iter().map(|r| r.participant_id.as_str()).collect();

        assert_eq!(ids, vec!["P2", "P1", "X9"]);
        assert_eq!(rows[1].exists[Platform::CodeChef.index()], Some(true));
    }

    #[test]
    fn test_row_fields_leave_missing_platforms_blank() {
        let mut row = CombinedRow::new("P1");
        row.handles[Platform::HackerRank.index()] = Some("hr".to_string());
        row.exists[Platform::HackerRank.index()] = Some(false);

        let fields = row.to_fields();
        assert_eq!(fields.len(), 11);
        assert_eq!(fields[5], "hr");
        assert_eq!(fields[10], "false");
        assert_eq!(fields[1], "");
        assert_eq!(fields[6], "");
    }
}
