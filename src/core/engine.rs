use crate::adapters::result_log::ResultLog;
use crate::adapters::roster::load_roster;
use crate::config::Settings;
use crate::core::merge::{merge_logs, MergeSummary};
use crate::core::runner::BatchRunner;
use crate::domain::model::{PassSummary, Platform, Selection};
use crate::domain::ports::Probe;
use crate::utils::error::Result;
use std::path::Path;

#[derive(Debug)]
pub enum RunReport {
    Probed(Vec<(Platform, PassSummary)>),
    Combined(MergeSummary),
}

/// Top-level flow for one invocation: load the roster, then either run the
/// selected platform passes or merge the existing logs.
pub struct VerifierEngine<P: Probe> {
    runner: BatchRunner<P>,
    settings: Settings,
}

impl<P: Probe> VerifierEngine<P> {
    pub fn new(probe: P, settings: Settings) -> Self {
        Self {
            runner: BatchRunner::new(probe, settings.sentinels.clone()),
            settings,
        }
    }

    /// The roster is loaded in every mode, so an unreadable roster aborts a
    /// combine run before the report is touched.
    pub async fn run(&self, roster_path: &Path, selection: Selection) -> Result<RunReport> {
        let participants = load_roster(roster_path)?;

        if selection == Selection::Combine {
            let summary = merge_logs(&self.settings, Some(&participants))?;
            return Ok(RunReport::Combined(summary));
        }

        let mut passes = Vec::new();
        for platform in selection.platforms() {
            let mut log = ResultLog::open(self.settings.log_path(platform), self.settings.resume)?;
            let summary = self
                .runner
                .run_platform(platform, &participants, &mut log)
                .await?;
            tracing::info!("📁 {} results saved to: {}", platform, log.path().display());
            passes.push((platform, summary));
        }

        Ok(RunReport::Probed(passes))
    }
}
