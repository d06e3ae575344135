// ── Poll scheduler ──
//
// One `Monitor` per device. Each tick runs fetch → build → detect → log
// inline, so at most one poll is ever in flight; ticks that fall due
// during a slow poll are skipped, not queued.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use upsentry_api::Transport;

use crate::catalog::{ALARM_TABLE, AlarmSource, IdentifierSet, Vendor, identifiers_for};
use crate::convert::build_snapshot;
use crate::detect::{Change, MonitorState};
use crate::error::CoreError;
use crate::event;
use crate::model::Snapshot;

const REPORT_CHANNEL_SIZE: usize = 64;

/// Outcome of one completed poll cycle.
#[derive(Debug, Clone)]
pub struct PollReport {
    pub at: DateTime<Utc>,
    pub outcome: PollOutcome,
}

#[derive(Debug, Clone)]
pub enum PollOutcome {
    Succeeded { snapshot: Snapshot, change: Change },
    Failed { error: Arc<CoreError> },
}

impl PollReport {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match &self.outcome {
            PollOutcome::Succeeded { snapshot, .. } => Some(snapshot),
            PollOutcome::Failed { .. } => None,
        }
    }
}

/// Periodic poller for a single device.
pub struct Monitor<T> {
    transport: T,
    identifiers: IdentifierSet,
    period: Duration,
    report_tx: broadcast::Sender<PollReport>,
}

impl<T: Transport + 'static> Monitor<T> {
    /// A zero `period` is raised to one millisecond.
    pub fn new(transport: T, vendor: Vendor, period: Duration) -> Self {
        let (report_tx, _) = broadcast::channel(REPORT_CHANNEL_SIZE);
        Self {
            transport,
            identifiers: identifiers_for(vendor),
            period: period.max(Duration::from_millis(1)),
            report_tx,
        }
    }

    pub fn vendor(&self) -> Vendor {
        self.identifiers.vendor()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Receive a [`PollReport`] for every cycle completed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PollReport> {
        self.report_tx.subscribe()
    }

    /// Fetch and decode one snapshot without touching any state.
    pub async fn fetch_snapshot(&self) -> Result<Snapshot, CoreError> {
        let raw = self.transport.get(self.identifiers.identifiers()).await?;
        let rows = match self.vendor().profile().alarms {
            AlarmSource::TableWalk => self.transport.walk(&ALARM_TABLE).await?,
            AlarmSource::ScalarCodes => Vec::new(),
        };
        Ok(build_snapshot(&self.identifiers, &raw, &rows)?)
    }

    /// Fetch, build, and compare against `state`.
    ///
    /// `state` only advances once a snapshot is fully built.
    pub async fn poll_once(&self, state: &mut MonitorState) -> Result<(Snapshot, Change), CoreError> {
        let snapshot = self.fetch_snapshot().await?;
        let change = state.advance(snapshot.clone());
        Ok((snapshot, change))
    }

    async fn cycle(&self, state: &mut MonitorState) {
        let outcome = match self.poll_once(state).await {
            Ok((snapshot, change)) => {
                event::poll_succeeded(&snapshot, &change);
                PollOutcome::Succeeded { snapshot, change }
            }
            Err(e) => {
                event::poll_failed(&e);
                PollOutcome::Failed { error: Arc::new(e) }
            }
        };
        // No subscribers is fine.
        let _ = self.report_tx.send(PollReport {
            at: Utc::now(),
            outcome,
        });
    }

    /// Poll every period until `cancel` fires. The first poll happens one
    /// full period after start. Returns the final state.
    pub async fn run(self, cancel: CancellationToken) -> MonitorState {
        let mut state = MonitorState::new();
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval.tick().await; // consume the immediate first tick

        debug!(vendor = %self.vendor(), period_ms = self.period.as_millis(), "monitor started");
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = interval.tick() => self.cycle(&mut state).await,
            }
        }
        debug!("monitor stopped");
        state
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<MonitorState> {
        tokio::spawn(self.run(cancel))
    }
}
