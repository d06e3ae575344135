// ── Change detection ──
//
// Decides whether a poll is worth reporting at INFO. Only the four
// operator-facing battery fields count; manufacturer, power, and seconds
// on battery drift too often to be useful as change triggers.

use crate::catalog::TelemetryField;
use crate::model::Snapshot;

/// Fields compared between consecutive snapshots.
pub const COMPARED_FIELDS: [TelemetryField; 4] = [
    TelemetryField::BatteryChargeRemainingPercent,
    TelemetryField::BatteryRemainingMinutes,
    TelemetryField::BatteryStatus,
    TelemetryField::OutputMode,
];

/// Outcome of comparing a snapshot against its predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// First snapshot of the session, or at least one compared field moved.
    pub log_at_info: bool,
    /// Compared fields whose value differs from the predecessor.
    pub changed: Vec<TelemetryField>,
}

/// Compare `current` against `previous`.
pub fn detect(previous: Option<&Snapshot>, current: &Snapshot) -> Change {
    match previous {
        None => Change {
            log_at_info: true,
            changed: Vec::new(),
        },
        Some(previous) => {
            let changed: Vec<_> = COMPARED_FIELDS
                .into_iter()
                .filter(|&field| previous.field(field) != current.field(field))
                .collect();
            Change {
                log_at_info: !changed.is_empty(),
                changed,
            }
        }
    }
}

/// Last successfully built snapshot of one monitoring session.
#[derive(Debug, Default)]
pub struct MonitorState {
    last: Option<Snapshot>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.last.as_ref()
    }

    /// Compare `current` with the stored snapshot, then store `current`
    /// regardless of the outcome.
    pub fn advance(&mut self, current: Snapshot) -> Change {
        let change = detect(self.last.as_ref(), &current);
        self.last = Some(current);
        change
    }
}
