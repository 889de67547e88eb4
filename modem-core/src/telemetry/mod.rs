//! Telemetry event catalog and ring buffer shared by firmware and host targets.
//!
//! The power controller records every pin write, power-key pulse, and state
//! transition it performs. Hosts drain the ring for diagnostics consoles and
//! tests assert on it to pin down pulse ordering, all without allocating.

use core::fmt;

use heapless::{HistoryBuf, OldestOrdered};

use crate::lines::ControlLineId;
use crate::power::{PowerRequest, PowerState};

/// Identifier assigned to each recorded telemetry event.
pub type EventId = u32;

/// Total number of telemetry entries retained in memory by default.
pub const TELEMETRY_RING_CAPACITY: usize = 64;

/// Discriminated power-control events shared across all targets.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PowerEvent {
    /// A control line was driven to a level.
    LineSet { line: ControlLineId, level: bool },
    /// The power key was pulsed for the given hold time.
    PowerKeyPulse { hold_ms: u32 },
    /// The raw status input was sampled to resolve an unknown state.
    StatusSampled { raw: bool },
    /// The requested power intent changed through configuration.
    RequestChanged {
        from: PowerRequest,
        to: PowerRequest,
    },
    /// The hardware-state estimate transitioned.
    StateChanged { from: PowerState, to: PowerState },
}

impl fmt::Display for PowerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerEvent::LineSet { line, level } => {
                write!(f, "line-set {line}={}", level_label(*level))
            }
            PowerEvent::PowerKeyPulse { hold_ms } => write!(f, "pwrkey-pulse {hold_ms}ms"),
            PowerEvent::StatusSampled { raw } => {
                write!(f, "status-sampled raw={}", level_label(*raw))
            }
            PowerEvent::RequestChanged { from, to } => {
                write!(f, "request-changed {from} -> {to}")
            }
            PowerEvent::StateChanged { from, to } => {
                write!(f, "state-changed {} -> {}", from.label(), to.label())
            }
        }
    }
}

const fn level_label(level: bool) -> &'static str {
    if level { "high" } else { "low" }
}

/// Telemetry record stored in the ring buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TelemetryRecord {
    pub id: EventId,
    pub event: PowerEvent,
}

/// Telemetry ring buffer type alias.
pub type TelemetryRing<const CAPACITY: usize = TELEMETRY_RING_CAPACITY> =
    HistoryBuf<TelemetryRecord, CAPACITY>;

/// Records power-control events into a fixed-size ring buffer.
pub struct TelemetryRecorder<const CAPACITY: usize = TELEMETRY_RING_CAPACITY> {
    ring: TelemetryRing<CAPACITY>,
    next_event_id: EventId,
}

impl<const CAPACITY: usize> TelemetryRecorder<CAPACITY> {
    /// Creates a new telemetry recorder with an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ring: HistoryBuf::new(),
            next_event_id: 0,
        }
    }

    /// Records an event and returns its assigned identifier.
    pub fn record(&mut self, event: PowerEvent) -> EventId {
        let id = self.next_event_id;
        self.next_event_id = self.next_event_id.wrapping_add(1);
        self.ring.write(TelemetryRecord { id, event });
        id
    }

    /// Returns an iterator over the recorded telemetry in chronological order.
    pub fn oldest_first(&self) -> OldestOrdered<'_, TelemetryRecord> {
        self.ring.oldest_ordered()
    }

    /// Returns the most recent telemetry record, if available.
    pub fn latest(&self) -> Option<&TelemetryRecord> {
        self.ring.recent()
    }

    /// Returns the number of records currently stored.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` when no telemetry records are stored.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

impl<const CAPACITY: usize> Default for TelemetryRecorder<CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}
