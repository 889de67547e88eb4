//! Power state machine for the modem's power-key protocol.
//!
//! The controller holds the operator's desired power intent and an estimate
//! of the modem's actual state, and converges the two by issuing timed
//! power-key pulses and watching the single status input. The intermediate
//! hardware states are unobservable, so `StartingUp`/`ShuttingDown` are
//! tracked explicitly and confirmed from the status line on periodic polls.

use core::fmt;

use crate::config::ModemConfig;
use crate::lines::{ControlLineId, Delayer, ModemLines};
use crate::report::{PowerSnapshot, ReportSink};
use crate::telemetry::{PowerEvent, TelemetryRecorder};

pub mod sequence;

pub use sequence::{BRING_UP_SETTLE_MS, BRING_UP_STEPS, POWER_KEY_PULSE_MS};

/// Operator-requested target power state.
///
/// Set exclusively by configuration application, never inferred from
/// hardware.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PowerRequest {
    #[default]
    DontCare,
    Off,
    On,
}

impl fmt::Display for PowerRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PowerRequest::DontCare => "don't care",
            PowerRequest::Off => "off",
            PowerRequest::On => "on",
        })
    }
}

/// The controller's belief about the modem's actual power state.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum PowerState {
    /// Initial value, resolved from the status line on the first drive.
    #[default]
    Unknown,
    Off,
    /// Power-key pulse issued, waiting for the status line to confirm "on".
    StartingUp,
    On,
    /// Power-key pulse issued, waiting for the status line to confirm "off".
    ShuttingDown,
}

impl PowerState {
    /// Report label for the state.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PowerState::Unknown => "unknown",
            PowerState::Off => "off",
            PowerState::StartingUp => "starting up",
            PowerState::On => "on",
            PowerState::ShuttingDown => "shutting down",
        }
    }

    /// Returns `true` while a hardware transition awaits confirmation.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, PowerState::StartingUp | PowerState::ShuttingDown)
    }

    /// Resolves a raw status-line sample (inverted sense, `true` = off).
    #[must_use]
    pub const fn from_status_line(raw: bool) -> Self {
        if raw { PowerState::Off } else { PowerState::On }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sequences modem power-up and power-down over an exclusive pin set.
///
/// One instance exists per modem device, constructed once at process start
/// and injected into anything needing power status. The construction-time
/// bring-up sequence and all pulses run synchronously on the caller's
/// thread; a drive call can block for over a second while a pulse holds.
pub struct PowerController<P>
where
    P: ModemLines + Delayer,
{
    provider: P,
    requested: PowerRequest,
    state: PowerState,
    startup_seconds: u32,
    shutdown_seconds: u32,
    telemetry: TelemetryRecorder,
}

impl<P> PowerController<P>
where
    P: ModemLines + Delayer,
{
    /// Takes exclusive ownership of the pin set and drives the bring-up
    /// sequence ([`BRING_UP_STEPS`]) before any state-machine logic runs.
    pub fn new(provider: P) -> Self {
        let mut controller = Self {
            provider,
            requested: PowerRequest::DontCare,
            state: PowerState::Unknown,
            startup_seconds: 0,
            shutdown_seconds: 0,
            telemetry: TelemetryRecorder::new(),
        };
        controller.run_bring_up();
        controller
    }

    fn run_bring_up(&mut self) {
        for step in &BRING_UP_STEPS {
            self.write(step.line, step.level);
            if step.settle_after_ms > 0 {
                self.provider.delay_ms(step.settle_after_ms);
            }
        }
    }

    /// Derives the desired power intent from the latest configuration.
    ///
    /// Intent depends only on the supplied record, never on prior intent:
    /// an explicit `power=true` requests power-up, while power-down via the
    /// power key is requested only when the AT protocol path is disabled as
    /// well. Anything else leaves the hardware as-is. No pins are touched
    /// until the next drive call.
    pub fn apply_config(&mut self, config: &ModemConfig) {
        let requested = if config.power == Some(true) {
            PowerRequest::On
        } else if !config.at_protocol() {
            PowerRequest::Off
        } else {
            PowerRequest::DontCare
        };

        if requested != self.requested {
            self.telemetry.record(PowerEvent::RequestChanged {
                from: self.requested,
                to: requested,
            });
        }
        self.requested = requested;
    }

    /// Runs state-machine steps until a step leaves the state unchanged.
    ///
    /// Safe to call at arbitrary frequency: once the hardware state matches
    /// the requested intent this is a no-op. Side effects are pin writes,
    /// blocking delays, and telemetry records.
    pub fn drive_state_transitions(&mut self) {
        loop {
            let orig_state = self.state;

            match self.requested {
                PowerRequest::DontCare => {}
                PowerRequest::On => self.drive_power_up(),
                PowerRequest::Off => self.drive_power_down(),
            }

            if orig_state == self.state {
                break;
            }
        }
    }

    fn drive_power_up(&mut self) {
        if self.state == PowerState::Unknown {
            self.resolve_unknown();
        }

        match self.state {
            PowerState::Off => {
                self.pulse_power_key();
                self.startup_seconds = 0;
                self.shutdown_seconds = 0;
                self.set_state(PowerState::StartingUp);
            }

            PowerState::StartingUp => {
                self.startup_seconds = self.startup_seconds.saturating_add(1);
                if !self.provider.status() {
                    self.set_state(PowerState::On);
                }
            }

            PowerState::Unknown | PowerState::On | PowerState::ShuttingDown => {}
        }
    }

    fn drive_power_down(&mut self) {
        if self.state == PowerState::Unknown {
            self.resolve_unknown();
        }

        match self.state {
            PowerState::Unknown | PowerState::Off => {}

            PowerState::StartingUp | PowerState::On => {
                // Park the modem in a safe electrical state before pulsing.
                self.write(ControlLineId::Reset, true);
                self.write(ControlLineId::Enable, true);

                self.pulse_power_key();
                self.shutdown_seconds = 0;
                self.set_state(PowerState::ShuttingDown);
            }

            PowerState::ShuttingDown => {
                self.shutdown_seconds = self.shutdown_seconds.saturating_add(1);
                if self.provider.status() {
                    self.set_state(PowerState::Off);
                }
            }
        }
    }

    fn resolve_unknown(&mut self) {
        let raw = self.provider.status();
        self.telemetry.record(PowerEvent::StatusSampled { raw });
        self.set_state(PowerState::from_status_line(raw));
    }

    fn pulse_power_key(&mut self) {
        self.write(ControlLineId::PowerKey, true);
        self.provider.delay_ms(POWER_KEY_PULSE_MS);
        self.write(ControlLineId::PowerKey, false);
        self.telemetry.record(PowerEvent::PowerKeyPulse {
            hold_ms: POWER_KEY_PULSE_MS,
        });
    }

    fn write(&mut self, line: ControlLineId, level: bool) {
        self.provider.set(line, level);
        self.telemetry.record(PowerEvent::LineSet { line, level });
    }

    fn set_state(&mut self, next: PowerState) {
        if next != self.state {
            self.telemetry.record(PowerEvent::StateChanged {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
    }

    /// Returns `true` while the controller wants a re-drive on the next
    /// periodic tick even without a configuration change, so the transient
    /// counters advance and status-line confirmation is observed promptly.
    #[must_use]
    pub fn needs_update_each_second(&self) -> bool {
        self.state.is_transient()
    }

    /// Current hardware-state estimate.
    #[must_use]
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Current desired power intent.
    #[must_use]
    pub fn request(&self) -> PowerRequest {
        self.requested
    }

    /// Copies the state needed for reporting.
    #[must_use]
    pub fn snapshot(&self) -> PowerSnapshot {
        PowerSnapshot {
            state: self.state,
            startup_seconds: self.startup_seconds,
            shutdown_seconds: self.shutdown_seconds,
        }
    }

    /// Renders the current status into the sink. Always succeeds.
    pub fn generate_report<S: ReportSink>(&self, sink: &mut S) {
        crate::report::generate_report(&self.snapshot(), sink);
    }

    /// Accesses the recorded telemetry.
    pub fn telemetry(&self) -> &TelemetryRecorder {
        &self.telemetry
    }

    /// Accesses the underlying pin/delay provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutably accesses the underlying pin/delay provider.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}
