//! Fixed pulse and bring-up timing shared by firmware and host targets.
//!
//! The hold times encode the modem's hardware power-on/power-off contract.
//! Shortening them violates the contract; lengthening is safe.

use crate::lines::ControlLineId;

/// Minimum hold time for a power-key pulse.
pub const POWER_KEY_PULSE_MS: u32 = 1_000;

/// Settle delay between stages of the bring-up sequence.
pub const BRING_UP_SETTLE_MS: u32 = 30;

/// Single write applied to a control line during bring-up.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LineWrite {
    pub line: ControlLineId,
    pub level: bool,
    /// Blocking settle delay after the write, zero for none.
    pub settle_after_ms: u32,
}

impl LineWrite {
    pub const fn new(line: ControlLineId, level: bool, settle_after_ms: u32) -> Self {
        Self {
            line,
            level,
            settle_after_ms,
        }
    }
}

/// Ordered writes establishing the baseline electrical configuration.
///
/// Executed exactly once per controller lifetime, before any state-machine
/// logic runs. Note that enabling `battery` flips the status input from
/// 0 (on) to 1 (off), which is not desired when the modem should keep its
/// state (e.g., a retained PIN) across reboots. How to reliably establish
/// the command channel to an already-powered modem remains an open question,
/// so the sequence is kept as-is rather than resequenced.
pub const BRING_UP_STEPS: [LineWrite; 5] = [
    // Enable the battery domain and let it settle.
    LineWrite::new(ControlLineId::Battery, true, BRING_UP_SETTLE_MS),
    LineWrite::new(ControlLineId::Reset, false, 0),
    LineWrite::new(ControlLineId::HostReady, false, 0),
    // Deasserted DTR keeps the modem out of suspend.
    LineWrite::new(ControlLineId::Dtr, false, 0),
    // Low W_DISABLE enables RF.
    LineWrite::new(ControlLineId::Enable, false, BRING_UP_SETTLE_MS),
];
