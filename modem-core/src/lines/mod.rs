//! Control-line catalog and the pin/delay provider traits.
//!
//! The power controller drives the modem through six digital outputs and
//! observes it through a single digital input. Everything in this module is
//! `no_std` friendly so the same definitions can back the MCU fixture
//! firmware and the host-side emulator.

use core::fmt;

/// Identifier for the logical control lines exposed to the modem.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ControlLineId {
    /// Battery sense enable for the modem power domain.
    Battery,
    /// Data-terminal-ready, held low to keep the modem out of suspend.
    Dtr,
    /// W_DISABLE input, low while RF is allowed.
    Enable,
    /// AP-ready handshake toward the modem.
    HostReady,
    /// Power key, pulsed to request a power transition.
    PowerKey,
    /// Modem reset input.
    Reset,
}

impl ControlLineId {
    /// Deterministic index for lookups into [`ALL_CONTROL_LINES`].
    pub const fn as_index(self) -> usize {
        match self {
            ControlLineId::Battery => 0,
            ControlLineId::Dtr => 1,
            ControlLineId::Enable => 2,
            ControlLineId::HostReady => 3,
            ControlLineId::PowerKey => 4,
            ControlLineId::Reset => 5,
        }
    }

    /// Attempts to construct a [`ControlLineId`] from a raw index.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ControlLineId::Battery),
            1 => Some(ControlLineId::Dtr),
            2 => Some(ControlLineId::Enable),
            3 => Some(ControlLineId::HostReady),
            4 => Some(ControlLineId::PowerKey),
            5 => Some(ControlLineId::Reset),
            _ => None,
        }
    }
}

impl fmt::Display for ControlLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(line_by_id(*self).name)
    }
}

/// Metadata describing how a control line is routed to the modem.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ControlLine {
    pub id: ControlLineId,
    /// Session name used on consoles and in pin-session configs.
    pub name: &'static str,
    /// SoC pad the line rides on the PinePhone mainboard.
    pub soc_pad: &'static str,
    /// Level the bring-up sequence leaves the line at.
    pub bring_up_level: bool,
}

impl ControlLine {
    pub const fn new(
        id: ControlLineId,
        name: &'static str,
        soc_pad: &'static str,
        bring_up_level: bool,
    ) -> Self {
        Self {
            id,
            name,
            soc_pad,
            bring_up_level,
        }
    }
}

/// Compile-time catalog of every control line.
pub const ALL_CONTROL_LINES: [ControlLine; 6] = [
    ControlLine::new(ControlLineId::Battery, "battery", "PL7", true),
    ControlLine::new(ControlLineId::Dtr, "dtr", "PB2", false),
    ControlLine::new(ControlLineId::Enable, "enable", "PH8", false),
    ControlLine::new(ControlLineId::HostReady, "host-ready", "PH7", false),
    ControlLine::new(ControlLineId::PowerKey, "pwrkey", "PB3", false),
    ControlLine::new(ControlLineId::Reset, "reset", "PC4", false),
];

/// Retrieve control-line metadata by identifier.
pub const fn line_by_id(id: ControlLineId) -> ControlLine {
    ALL_CONTROL_LINES[id.as_index()]
}

/// Session name of the status input line.
///
/// The status line has inverted polarity: it reads `true` while the modem is
/// electrically off and `false` while it is on.
pub const STATUS_LINE_NAME: &str = "status";

/// Abstraction over the physical control lines and the status input.
///
/// A controller instance assumes exclusive ownership of its line set for its
/// entire lifetime; no two controllers may share one.
pub trait ModemLines {
    /// Drives the requested control line to the given level.
    fn set(&mut self, line: ControlLineId, level: bool);

    /// Samples the raw status input (inverted sense, `true` = modem off).
    fn status(&mut self) -> bool;
}

/// Blocking millisecond delay primitive used while pulsing lines.
pub trait Delayer {
    /// Blocks the caller for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Line provider that performs no hardware interaction.
///
/// The status input reads as "off", matching an unpowered modem.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopModemLines;

impl NoopModemLines {
    /// Creates a new no-op line provider.
    pub const fn new() -> Self {
        Self
    }
}

impl ModemLines for NoopModemLines {
    fn set(&mut self, _: ControlLineId, _: bool) {}

    fn status(&mut self) -> bool {
        true
    }
}

impl Delayer for NoopModemLines {
    fn delay_ms(&mut self, _: u32) {}
}
