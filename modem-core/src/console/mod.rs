//! Debug-console command grammar shared by firmware and host targets.
//!
//! Commands remain short and bounded, so the parser composes `winnow`
//! combinators directly over the input line. Both the emulator's stdio loop
//! and the firmware's UART console feed lines through [`parse_line`] and map
//! the resulting [`Command`] onto configuration records via
//! [`ConfigBuilder`].

use core::fmt;

use winnow::ascii::{Caseless, dec_uint, space1};
use winnow::combinator::{alt, opt, preceded};
use winnow::prelude::*;

use crate::config::ModemConfig;

/// Power setting requested on the console.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PowerSetting {
    On,
    Off,
    /// Drop the `power` attribute, leaving the hardware as-is.
    Auto,
}

/// Parsed console command.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Command {
    Power(PowerSetting),
    AtProtocol(bool),
    Status,
    Report,
    Events,
    Tick(u32),
    Help,
}

/// Help text surfaced by the `help` command.
pub const HELP_TOPICS: &[(&str, &str)] = &[
    ("power", "power <on|off|auto>  - request a modem power state"),
    ("at", "at <on|off>          - mark the AT protocol path up or down"),
    ("status", "status               - one-line power status"),
    ("report", "report               - attribute-style power report"),
    ("events", "events               - dump recorded telemetry"),
    ("tick", "tick [n]             - advance n seconds (emulator only)"),
    ("help", "help                 - this list"),
];

/// Error produced when a console line cannot be parsed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConsoleError {
    /// Line contained no command.
    Empty,
    /// Line did not match any known command shape.
    Unrecognized,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::Empty => f.write_str("empty command line"),
            ConsoleError::Unrecognized => {
                f.write_str("unrecognized command, try `help`")
            }
        }
    }
}

fn on_off(input: &mut &str) -> ModalResult<bool> {
    alt((
        Caseless("on").value(true),
        Caseless("off").value(false),
    ))
    .parse_next(input)
}

fn power_setting(input: &mut &str) -> ModalResult<PowerSetting> {
    alt((
        Caseless("on").value(PowerSetting::On),
        Caseless("off").value(PowerSetting::Off),
        Caseless("auto").value(PowerSetting::Auto),
    ))
    .parse_next(input)
}

fn command(input: &mut &str) -> ModalResult<Command> {
    alt((
        preceded((Caseless("power"), space1), power_setting).map(Command::Power),
        preceded((Caseless("at"), space1), on_off).map(Command::AtProtocol),
        Caseless("status").value(Command::Status),
        Caseless("report").value(Command::Report),
        Caseless("events").value(Command::Events),
        preceded(Caseless("tick"), opt(preceded(space1, dec_uint)))
            .map(|count: Option<u32>| Command::Tick(count.unwrap_or(1))),
        Caseless("help").value(Command::Help),
    ))
    .parse_next(input)
}

/// Parses one console line into a [`Command`].
pub fn parse_line(line: &str) -> Result<Command, ConsoleError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(ConsoleError::Empty);
    }

    command.parse(trimmed).map_err(|_| ConsoleError::Unrecognized)
}

/// Accumulates console toggles into configuration records.
///
/// The `at` toggle is sticky: it applies to every subsequent `power` command
/// until changed, mirroring how the two attributes appear together in a
/// configuration source.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ConfigBuilder {
    at_protocol: Option<bool>,
}

impl ConfigBuilder {
    /// Builder with no `at` toggle recorded yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { at_protocol: None }
    }

    /// Records an explicit `at on` / `at off` toggle.
    pub fn set_at_protocol(&mut self, enabled: bool) {
        self.at_protocol = Some(enabled);
    }

    /// Maps a `power` command onto a configuration record.
    ///
    /// `power off` defaults the AT protocol path to down so the hard
    /// power-down is actually honored; an explicit earlier `at on` wins and
    /// the controller will then leave the hardware alone.
    #[must_use]
    pub fn config_for(&self, setting: PowerSetting) -> ModemConfig {
        match setting {
            PowerSetting::On => ModemConfig {
                power: Some(true),
                at_protocol: self.at_protocol,
            },
            PowerSetting::Off => ModemConfig {
                power: Some(false),
                at_protocol: Some(self.at_protocol.unwrap_or(false)),
            },
            PowerSetting::Auto => ModemConfig {
                power: None,
                at_protocol: self.at_protocol,
            },
        }
    }
}
