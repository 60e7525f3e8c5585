use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use thirtyfour::WebDriver;
use thirtyfour::support::sleep;
use tracing::{info, warn};

use crate::alert::AlertSink;
use crate::models::outcome::AttemptOutcome;
use crate::scraping::constants::*;
use crate::scraping::pages::{LocationSelectPage, snapshot_path};

/// One end-to-end pass through the scheduling flow.
#[async_trait]
pub trait AvailabilityProbe {
    async fn run_attempt(&self) -> Result<AttemptOutcome>;
    async fn snapshot(&self, file_name: &str) -> Result<()>;
}

/// Probe backed by the live MyChart flow. A fresh page chain is built per
/// attempt; no state carries across attempts besides the session itself.
pub struct MyChartProbe {
    driver: Arc<WebDriver>,
}

impl MyChartProbe {
    pub fn new(driver: Arc<WebDriver>) -> Self {
        MyChartProbe { driver }
    }
}

#[async_trait]
impl AvailabilityProbe for MyChartProbe {
    async fn run_attempt(&self) -> Result<AttemptOutcome> {
        let location_page = LocationSelectPage::new(&self.driver);
        location_page
            .navigate()
            .await
            .context("failed to load the triage page")?;

        if let Err(e) = location_page.snapshot(LOCATION_PAGE_SNAPSHOT).await {
            warn!("failed to capture {LOCATION_PAGE_SNAPSHOT}: {e}");
        }

        let scheduling_page = location_page
            .select_first_location()
            .await
            .context("no location card appeared")?;

        let outcome = scheduling_page
            .classify_availability()
            .await
            .context("failed to inspect the scheduling frame")?;

        if outcome.may_be_bookable() {
            if let Err(e) = scheduling_page.snapshot(SCHEDULING_READY_SNAPSHOT).await {
                warn!("failed to capture {SCHEDULING_READY_SNAPSHOT}: {e}");
            }
        }

        Ok(outcome)
    }

    async fn snapshot(&self, file_name: &str) -> Result<()> {
        self.driver
            .screenshot(&snapshot_path(file_name))
            .await
            .with_context(|| format!("failed to capture {file_name}"))
    }
}

/// Repeats attempts forever on a fixed interval. Ends on the first attempt
/// that fails to prove "no slot" (one alert dispatched, positive outcome
/// returned) or on any error from the probe or the sink.
pub async fn run<P, N>(probe: &P, notifier: &N, poll_interval: Duration) -> Result<AttemptOutcome>
where
    P: AvailabilityProbe,
    N: AlertSink,
{
    loop {
        let outcome = probe.run_attempt().await?;

        if outcome.may_be_bookable() {
            if let Err(e) = probe.snapshot(AVAILABLE_SNAPSHOT).await {
                warn!("failed to capture {AVAILABLE_SNAPSHOT}: {e}");
            }
            notifier.send_alert().await.context("alert dispatch failed")?;
            return Ok(outcome);
        }

        info!(
            "better luck next time, retrying in {}s",
            poll_interval.as_secs()
        );
        sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::anyhow;

    use super::*;

    struct ScriptedProbe {
        outcomes: Mutex<Vec<Result<AttemptOutcome>>>,
        attempts: AtomicUsize,
        snapshots: AtomicUsize,
        snapshot_fails: bool,
    }

    impl ScriptedProbe {
        fn new(outcomes: Vec<Result<AttemptOutcome>>) -> Self {
            ScriptedProbe {
                outcomes: Mutex::new(outcomes),
                attempts: AtomicUsize::new(0),
                snapshots: AtomicUsize::new(0),
                snapshot_fails: false,
            }
        }

        fn with_failing_snapshots(mut self) -> Self {
            self.snapshot_fails = true;
            self
        }
    }

    #[async_trait]
    impl AvailabilityProbe for ScriptedProbe {
        async fn run_attempt(&self) -> Result<AttemptOutcome> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            self.outcomes.lock().unwrap().remove(0)
        }

        async fn snapshot(&self, _file_name: &str) -> Result<()> {
            self.snapshots.fetch_add(1, Ordering::SeqCst);
            if self.snapshot_fails {
                Err(anyhow!("disk full"))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Default)]
    struct CountingSink {
        sends: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl AlertSink for CountingSink {
        async fn send_alert(&self) -> Result<()> {
            self.sends.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(anyhow!("authentication failed"))
            } else {
                Ok(())
            }
        }
    }

    fn interval() -> Duration {
        Duration::from_millis(1)
    }

    #[tokio::test]
    async fn keeps_polling_while_the_marker_is_located() {
        let probe = ScriptedProbe::new(vec![
            Ok(AttemptOutcome::NoSlot),
            Ok(AttemptOutcome::SlotAvailable),
        ]);
        let sink = CountingSink::default();

        let outcome = run(&probe, &sink, interval()).await.unwrap();

        assert_eq!(outcome, AttemptOutcome::SlotAvailable);
        assert_eq!(probe.attempts.load(Ordering::SeqCst), 2);
        assert_eq!(sink.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn an_unproven_no_slot_is_treated_as_bookable() {
        let probe = ScriptedProbe::new(vec![Ok(AttemptOutcome::Indeterminate)]);
        let sink = CountingSink::default();

        let outcome = run(&probe, &sink, interval()).await.unwrap();

        assert_eq!(outcome, AttemptOutcome::Indeterminate);
        assert_eq!(probe.attempts.load(Ordering::SeqCst), 1);
        assert_eq!(sink.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn probe_errors_stop_the_loop_without_alerting() {
        let probe = ScriptedProbe::new(vec![Err(anyhow!("session lost"))]);
        let sink = CountingSink::default();

        let err = run(&probe, &sink, interval()).await.unwrap_err();

        assert!(err.to_string().contains("session lost"));
        assert_eq!(sink.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn a_failed_alert_is_not_retried() {
        let probe = ScriptedProbe::new(vec![Ok(AttemptOutcome::SlotAvailable)]);
        let sink = CountingSink {
            sends: AtomicUsize::new(0),
            fail: true,
        };

        let err = run(&probe, &sink, interval()).await.unwrap_err();

        assert!(err.to_string().contains("alert dispatch failed"));
        assert_eq!(sink.sends.load(Ordering::SeqCst), 1);
        assert_eq!(probe.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn snapshot_failure_never_blocks_the_alert() {
        let probe =
            ScriptedProbe::new(vec![Ok(AttemptOutcome::SlotAvailable)]).with_failing_snapshots();
        let sink = CountingSink::default();

        let outcome = run(&probe, &sink, interval()).await.unwrap();

        assert_eq!(outcome, AttemptOutcome::SlotAvailable);
        assert_eq!(probe.snapshots.load(Ordering::SeqCst), 1);
        assert_eq!(sink.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn snapshot_failure_on_negative_attempts_keeps_polling() {
        let probe = ScriptedProbe::new(vec![
            Ok(AttemptOutcome::NoSlot),
            Ok(AttemptOutcome::NoSlot),
            Ok(AttemptOutcome::SlotAvailable),
        ])
        .with_failing_snapshots();
        let sink = CountingSink::default();

        let outcome = run(&probe, &sink, interval()).await.unwrap();

        assert_eq!(outcome, AttemptOutcome::SlotAvailable);
        assert_eq!(probe.attempts.load(Ordering::SeqCst), 3);
        assert_eq!(sink.sends.load(Ordering::SeqCst), 1);
    }
}
