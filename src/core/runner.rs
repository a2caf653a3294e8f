use crate::domain::model::{ParticipantRecord, PassSummary, Platform, ResultRecord};
use crate::domain::ports::{Probe, ResultSink};
use crate::utils::error::Result;
use tracing::Instrument;

/// Drives one platform pass at a time, strictly sequentially.
pub struct BatchRunner<P: Probe> {
    probe: P,
    sentinels: Vec<String>,
}

impl<P: Probe> BatchRunner<P> {
    pub fn new(probe: P, sentinels: Vec<String>) -> Self {
        Self { probe, sentinels }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Probes every applicable handle for `platform` and appends one record
    /// per probed participant to `sink`, in roster order. A false first
    /// attempt is retried once and the second outcome is kept.
    pub async fn run_platform<S: ResultSink>(
        &self,
        platform: Platform,
        participants: &[ParticipantRecord],
        sink: &mut S,
    ) -> Result<PassSummary> {
        let span = tracing::info_span!("pass", platform = %platform);
        self.run_pass(platform, participants, sink)
            .instrument(span)
            .await
    }

    async fn run_pass<S: ResultSink>(
        &self,
        platform: Platform,
        participants: &[ParticipantRecord],
        sink: &mut S,
    ) -> Result<PassSummary> {
        let total = participants.len();
        let mut summary = PassSummary::default();
        tracing::info!("🚀 Processing {} handles for {} participants", platform, total);

        for (index, participant) in participants.iter().enumerate() {
            let Some(handle) = participant.handle_for(platform, &self.sentinels) else {
                tracing::debug!("({}/{}) {} has no {} handle, skipping", index + 1, total, participant.id, platform);
                summary.skipped += 1;
                continue;
            };

            tracing::debug!("Checking {} URL for participant {}", platform, participant.id);
            let mut outcome = self.probe.classify(platform, handle).await;
            tracing::debug!(
                "{} URL exists: {}, Response URL: {}",
                platform,
                outcome.exists,
                outcome.resolved_url
            );

            if !outcome.exists {
                tracing::debug!("Retrying {} URL check for participant {}", platform, participant.id);
                outcome = self.probe.classify(platform, handle).await;
                summary.retried += 1;
                tracing::debug!(
                    "{} URL retry: {} ({:?}), Response URL: {}",
                    platform,
                    outcome.exists,
                    outcome.classification,
                    outcome.resolved_url
                );
            }

            let record = ResultRecord {
                participant_id: participant.id.clone(),
                handle: handle.to_string(),
                exists: outcome.exists,
            };
            sink.append(&record)?;

            summary.probed += 1;
            if record.exists {
                summary.existing += 1;
            } else {
                summary.missing += 1;
            }
            tracing::info!(
                "({}/{}) {}: {} -> {}",
                index + 1,
                total,
                participant.id,
                record.handle,
                record.exists
            );
        }

        tracing::info!(
            "✅ Finished {}: {} probed, {} exist, {} missing, {} skipped, {} retried",
            platform,
            summary.probed,
            summary.existing,
            summary.missing,
            summary.skipped,
            summary.retried
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ProbeOutcome, EXCEPTION_MARKER};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Replays scripted outcomes per handle and records every call.
    struct ScriptedProbe {
        script: Mutex<HashMap<String, VecDeque<ProbeOutcome>>>,
        calls: Mutex<Vec<(Platform, String)>>,
    }

    impl ScriptedProbe {
        fn new(entries: Vec<(&str, Vec<ProbeOutcome>)>) -> Self {
            Self {
                script: Mutex::new(
                    entries
                        .into_iter()
                        .map(|(h, outcomes)| (h.to_string(), outcomes.into()))
                        .collect(),
                ),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls_for(&self, handle: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|(_, h)| h == handle).count()
        }
    }

    #[async_trait]
    impl Probe for ScriptedProbe {
        async fn classify(&self, platform: Platform, handle: &str) -> ProbeOutcome {
            self.calls.lock().unwrap().push((platform, handle.to_string()));
            self.script
                .lock()
                .unwrap()
                .get_mut(handle)
                .and_then(|q| q.pop_front())
                .unwrap_or_else(ProbeOutcome::transport_error)
        }
    }

    #[derive(Default)]
    struct MemorySink {
        records: Vec<ResultRecord>,
    }

    impl ResultSink for MemorySink {
        fn append(&mut self, record: &ResultRecord) -> Result<()> {
            self.records.push(record.clone());
            Ok(())
        }
    }

    fn sentinels() -> Vec<String> {
        vec!["#N/A".to_string()]
    }

    #[tokio::test]
    async fn test_existing_handle_is_probed_once() {
        let probe = ScriptedProbe::new(vec![("tourist", vec![ProbeOutcome::exists("https://codeforces.com/profile/tourist")])]);
        let runner = BatchRunner::new(probe, sentinels());
        let participants = vec![ParticipantRecord::new("P1").with_handle(Platform::Codeforces, "tourist")];
        let mut sink = MemorySink::default();

        let summary = runner.run_platform(Platform::Codeforces, &participants, &mut sink).await.unwrap();

        assert_eq!(runner.probe().calls_for("tourist"), 1);
        assert_eq!(summary.retried, 0);
        assert_eq!(
            sink.records,
            vec![ResultRecord { participant_id: "P1".into(), handle: "tourist".into(), exists: true }]
        );
    }

    #[tokio::test]
    async fn test_false_outcome_is_retried_once_and_second_kept() {
        let probe = ScriptedProbe::new(vec![
            ("flaky", vec![ProbeOutcome::transport_error(), ProbeOutcome::exists("u")]),
            ("ghost", vec![ProbeOutcome::not_found("https://codeforces.com/"), ProbeOutcome::not_found("https://codeforces.com/")]),
        ]);
        let runner = BatchRunner::new(probe, sentinels());
        let participants = vec![
            ParticipantRecord::new("P1").with_handle(Platform::Codeforces, "flaky"),
            ParticipantRecord::new("P2").with_handle(Platform::Codeforces, "ghost"),
        ];
        let mut sink = MemorySink::default();

        let summary = runner.run_platform(Platform::Codeforces, &participants, &mut sink).await.unwrap();

        assert_eq!(runner.probe().calls_for("flaky"), 2);
        assert_eq!(runner.probe().calls_for("ghost"), 2);
        assert_eq!(summary.retried, 2);
        assert_eq!(summary.existing, 1);
        assert_eq!(summary.missing, 1);
        assert!(sink.records[0].exists);
        assert!(!sink.records[1].exists);
    }

    #[tokio::test]
    async fn test_never_succeeding_probe_still_yields_one_record() {
        let probe = ScriptedProbe::new(vec![]);
        let runner = BatchRunner::new(probe, sentinels());
        let participants = vec![ParticipantRecord::new("P9").with_handle(Platform::LeetCode, "offline")];
        let mut sink = MemorySink::default();

        runner.run_platform(Platform::LeetCode, &participants, &mut sink).await.unwrap();

        assert_eq!(runner.probe().calls_for("offline"), 2);
        assert_eq!(sink.records.len(), 1);
        assert!(!sink.records[0].exists);
        assert_ne!(sink.records[0].handle, EXCEPTION_MARKER);
    }

    #[tokio::test]
    async fn test_sentinel_handles_never_produce_records() {
        let probe = ScriptedProbe::new(vec![("real", vec![ProbeOutcome::exists("u")])]);
        let runner = BatchRunner::new(probe, sentinels());
        let participants = vec![
            ParticipantRecord::new("P1").with_handle(Platform::HackerRank, "#N/A"),
            ParticipantRecord::new("P2").with_handle(Platform::HackerRank, "real"),
            ParticipantRecord::new("P3"),
        ];

        for platform in Platform::ALL {
            let mut sink = MemorySink::default();
            let summary = runner.run_platform(platform, &participants, &mut sink).await.unwrap();
            assert!(sink.records.iter().all(|r| r.participant_id != "P1" && r.participant_id != "P3"));
            if platform != Platform::HackerRank {
                assert!(sink.records.is_empty());
                assert_eq!(summary.skipped, 3);
            }
        }
        assert!(runner.probe().calls.lock().unwrap().iter().all(|(_, h)| h != "#N/A"));
    }

    #[tokio::test]
    async fn test_records_follow_roster_order() {
        let probe = ScriptedProbe::new(vec![
            ("c", vec![ProbeOutcome::exists("u")]),
            ("a", vec![ProbeOutcome::exists("u")]),
            ("b", vec![ProbeOutcome::exists("u")]),
        ]);
        let runner = BatchRunner::new(probe, sentinels());
        let participants: Vec<_> = ["c", "a", "b"]
            .into_iter()
            .map(|h| ParticipantRecord::new(format!("id-{}", h)).with_handle(Platform::CodeChef, h))
            .collect();
        let mut sink = MemorySink::default();

        runner.run_platform(Platform::CodeChef, &participants, &mut sink).await.unwrap();

        let ids: Vec<_> = sink.records.iter().map(|r| r.participant_id.as_str()).collect();
        assert_eq!(ids, vec!["id-c", "id-a", "id-b"]);
    }
}
