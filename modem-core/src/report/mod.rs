//! Status reporting for the power controller.
//!
//! Reports are a flat attribute set, not a nested document: a `power`
//! attribute carrying the state label, plus the elapsed counter of the
//! matching transient state when one is active. [`ReportFormatter`] keeps
//! the textual rendering consistent across console front-ends.

use core::fmt;

use crate::power::PowerState;

/// State copied out of the controller for reporting.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PowerSnapshot {
    pub state: PowerState,
    pub startup_seconds: u32,
    pub shutdown_seconds: u32,
}

impl PowerSnapshot {
    /// Snapshot of a controller that has not driven anything yet.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            state: PowerState::Unknown,
            startup_seconds: 0,
            shutdown_seconds: 0,
        }
    }
}

/// Structured-output consumer receiving report attributes.
pub trait ReportSink {
    /// Receives a string-valued attribute.
    fn attribute(&mut self, name: &str, value: &str);

    /// Receives an unsigned-valued attribute.
    fn attribute_u32(&mut self, name: &str, value: u32);
}

/// Renders the snapshot into the sink. Always succeeds.
///
/// `startup_seconds` is present iff the state is starting up and
/// `shutdown_seconds` iff it is shutting down; counters left over from an
/// earlier transition are never reported.
pub fn generate_report<S: ReportSink>(snapshot: &PowerSnapshot, sink: &mut S) {
    sink.attribute("power", snapshot.state.label());

    if snapshot.state == PowerState::StartingUp {
        sink.attribute_u32("startup_seconds", snapshot.startup_seconds);
    }

    if snapshot.state == PowerState::ShuttingDown {
        sink.attribute_u32("shutdown_seconds", snapshot.shutdown_seconds);
    }
}

/// Helper that renders a [`PowerSnapshot`] as a single `key=value` line.
#[derive(Clone, Copy, Debug)]
pub struct ReportFormatter<'a> {
    snapshot: &'a PowerSnapshot,
}

impl<'a> ReportFormatter<'a> {
    /// Creates a new formatter for the provided snapshot.
    #[must_use]
    pub const fn new(snapshot: &'a PowerSnapshot) -> Self {
        Self { snapshot }
    }

    /// Writes the status line (e.g. `power="starting up" startup_seconds=3`).
    pub fn write_line<W: fmt::Write>(&self, writer: &mut W) -> fmt::Result {
        write!(writer, "power=\"{}\"", self.snapshot.state.label())?;

        if self.snapshot.state == PowerState::StartingUp {
            write!(writer, " startup_seconds={}", self.snapshot.startup_seconds)?;
        }

        if self.snapshot.state == PowerState::ShuttingDown {
            write!(
                writer,
                " shutdown_seconds={}",
                self.snapshot.shutdown_seconds
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for ReportFormatter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_line(f)
    }
}
