use std::cell::RefCell;
use std::rc::Rc;

use modem_core::console::{Command, ConfigBuilder, HELP_TOPICS, parse_line};
use modem_core::lines::{ControlLineId, Delayer, ModemLines};
use modem_core::power::PowerController;
use modem_core::report::{ReportFormatter, ReportSink, generate_report};

/// Shortest power-key hold the simulated modem reacts to.
///
/// The controller holds the key for a full second, so anything at or below
/// that works here; half a second leaves headroom for experimenting with
/// shorter pulses through `tick`.
const MIN_KEY_HOLD_MS: u64 = 500;

/// Simulated transition latencies, configurable from the command line.
#[derive(Clone, Copy, Debug)]
pub struct SimTimings {
    pub startup_ms: u64,
    pub shutdown_ms: u64,
}

impl Default for SimTimings {
    fn default() -> Self {
        Self {
            startup_ms: 3_000,
            shutdown_ms: 2_000,
        }
    }
}

/// Virtual modem standing in for the real hardware.
///
/// Time only moves when the controller delays or the console issues `tick`,
/// so transitions are deterministic and inspectable between commands.
#[derive(Debug)]
pub struct ModemSim {
    timings: SimTimings,
    now_ms: u64,
    battery: bool,
    powered: bool,
    key_down_at: Option<u64>,
    pending: Option<PendingToggle>,
}

#[derive(Clone, Copy, Debug)]
struct PendingToggle {
    deadline_ms: u64,
    powered: bool,
}

impl ModemSim {
    pub fn new(timings: SimTimings) -> Self {
        Self {
            timings,
            now_ms: 0,
            battery: false,
            powered: false,
            key_down_at: None,
            pending: None,
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
        self.settle();
    }

    pub fn is_powered(&mut self) -> bool {
        self.settle();
        self.powered
    }

    fn settle(&mut self) {
        if let Some(toggle) = self.pending
            && self.now_ms >= toggle.deadline_ms
        {
            self.powered = toggle.powered && self.battery;
            self.pending = None;
        }
    }

    fn set_battery(&mut self, level: bool) {
        self.battery = level;
        if !level {
            // Pulling battery power is immediate, no graceful shutdown.
            self.powered = false;
            self.pending = None;
            self.key_down_at = None;
        }
    }

    fn set_power_key(&mut self, level: bool) {
        if level {
            if self.key_down_at.is_none() {
                self.key_down_at = Some(self.now_ms);
            }
            return;
        }

        let Some(pressed_at) = self.key_down_at.take() else {
            return;
        };
        let held_ms = self.now_ms.saturating_sub(pressed_at);
        if self.battery && held_ms >= MIN_KEY_HOLD_MS {
            let latency_ms = if self.powered {
                self.timings.shutdown_ms
            } else {
                self.timings.startup_ms
            };
            // Latency runs from the start of the press, so the hold time
            // itself counts toward the transition.
            self.pending = Some(PendingToggle {
                deadline_ms: pressed_at + latency_ms,
                powered: !self.powered,
            });
        }
    }
}

/// Cloneable handle so session and controller share one [`ModemSim`].
#[derive(Clone)]
pub struct SharedModem {
    inner: Rc<RefCell<ModemSim>>,
}

impl SharedModem {
    pub fn new(timings: SimTimings) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ModemSim::new(timings))),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.inner.borrow_mut().advance(ms);
    }

    pub fn is_powered(&self) -> bool {
        self.inner.borrow_mut().is_powered()
    }
}

impl ModemLines for SharedModem {
    fn set(&mut self, line: ControlLineId, level: bool) {
        let mut sim = self.inner.borrow_mut();
        match line {
            ControlLineId::Battery => sim.set_battery(level),
            ControlLineId::PowerKey => sim.set_power_key(level),
            // The remaining control lines do not change the simulated supply.
            ControlLineId::Dtr
            | ControlLineId::Enable
            | ControlLineId::HostReady
            | ControlLineId::Reset => {}
        }
    }

    fn status(&mut self) -> bool {
        let mut sim = self.inner.borrow_mut();
        sim.settle();
        !sim.powered
    }
}

impl Delayer for SharedModem {
    fn delay_ms(&mut self, ms: u32) {
        self.inner.borrow_mut().advance(u64::from(ms));
    }
}

struct LineSink {
    lines: Vec<String>,
}

impl ReportSink for LineSink {
    fn attribute(&mut self, name: &str, value: &str) {
        self.lines.push(format!("{name}=\"{value}\""));
    }

    fn attribute_u32(&mut self, name: &str, value: u32) {
        self.lines.push(format!("{name}={value}"));
    }
}

pub struct Session {
    controller: PowerController<SharedModem>,
    modem: SharedModem,
    builder: ConfigBuilder,
}

impl Session {
    pub fn new(timings: SimTimings) -> Self {
        let modem = SharedModem::new(timings);
        let controller = PowerController::new(modem.clone());
        Self {
            controller,
            modem,
            builder: ConfigBuilder::new(),
        }
    }

    pub fn handle_command(&mut self, line: &str) -> Vec<String> {
        match parse_line(line) {
            Ok(Command::Power(setting)) => {
                let config = self.builder.config_for(setting);
                self.controller.apply_config(&config);
                self.controller.drive_state_transitions();
                vec![self.status_line()]
            }
            Ok(Command::AtProtocol(enabled)) => {
                self.builder.set_at_protocol(enabled);
                let label = if enabled { "up" } else { "down" };
                vec![format!("at protocol marked {label}")]
            }
            Ok(Command::Status) => vec![self.status_line()],
            Ok(Command::Report) => {
                let snapshot = self.controller.snapshot();
                let mut sink = LineSink { lines: Vec::new() };
                generate_report(&snapshot, &mut sink);
                sink.lines
            }
            Ok(Command::Events) => self.dump_events(),
            Ok(Command::Tick(seconds)) => self.tick(seconds),
            Ok(Command::Help) => Self::help_lines(),
            Err(err) => vec![format!("ERR {err}")],
        }
    }

    fn tick(&mut self, seconds: u32) -> Vec<String> {
        for _ in 0..seconds {
            self.modem.advance(1_000);
            if self.controller.needs_update_each_second() {
                self.controller.drive_state_transitions();
            }
        }
        vec![format!("advanced {seconds}s"), self.status_line()]
    }

    fn dump_events(&self) -> Vec<String> {
        let telemetry = self.controller.telemetry();
        if telemetry.is_empty() {
            return vec!["(no telemetry recorded)".to_string()];
        }
        telemetry
            .oldest_first()
            .map(|record| format!("#{:<4} {}", record.id, record.event))
            .collect()
    }

    fn status_line(&self) -> String {
        let snapshot = self.controller.snapshot();
        format!(
            "{} (modem {})",
            ReportFormatter::new(&snapshot),
            if self.modem.is_powered() {
                "powered"
            } else {
                "unpowered"
            }
        )
    }

    fn help_lines() -> Vec<String> {
        let mut lines = Vec::with_capacity(HELP_TOPICS.len() + 1);
        lines.push("Available commands:".to_string());
        for (_, detail) in HELP_TOPICS {
            lines.push(format!("  {detail}"));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modem_core::power::PowerState;

    fn session() -> Session {
        Session::new(SimTimings::default())
    }

    #[test]
    fn power_on_walks_through_startup() {
        let mut session = session();

        let lines = session.handle_command("power on");
        assert_eq!(session.controller.state(), PowerState::StartingUp);
        assert_eq!(
            lines,
            ["power=\"starting up\" startup_seconds=1 (modem unpowered)"]
        );

        // Default startup latency is three seconds; the pulse hold already
        // consumed one of them.
        session.handle_command("tick 2");
        assert_eq!(session.controller.state(), PowerState::On);
        assert!(session.modem.is_powered());
    }

    #[test]
    fn power_off_walks_through_shutdown() {
        let mut session = session();
        session.handle_command("power on");
        session.handle_command("tick 2");
        assert_eq!(session.controller.state(), PowerState::On);

        session.handle_command("power off");
        assert_eq!(session.controller.state(), PowerState::ShuttingDown);

        session.handle_command("tick 1");
        assert_eq!(session.controller.state(), PowerState::Off);
        assert!(!session.modem.is_powered());
    }

    #[test]
    fn sticky_at_toggle_keeps_modem_untouched_on_power_off() {
        let mut session = session();
        session.handle_command("power on");
        session.handle_command("tick 2");

        session.handle_command("at on");
        session.handle_command("power auto");
        assert_eq!(session.controller.state(), PowerState::On);
        assert!(session.modem.is_powered());
    }

    #[test]
    fn report_lists_attributes_per_state() {
        let mut session = session();
        session.handle_command("power on");

        let lines = session.handle_command("report");
        assert_eq!(lines, ["power=\"starting up\"", "startup_seconds=1"]);
    }

    #[test]
    fn events_dump_includes_the_pulse() {
        let mut session = session();
        session.handle_command("power on");

        let lines = session.handle_command("events");
        assert!(
            lines
                .iter()
                .any(|line| line.contains("pwrkey-pulse 1000ms"))
        );
    }

    #[test]
    fn malformed_lines_answer_with_an_error() {
        let mut session = session();
        let lines = session.handle_command("power sideways");
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("ERR "));
    }

    #[test]
    fn short_key_press_is_ignored_by_the_sim() {
        let mut sim = ModemSim::new(SimTimings::default());
        sim.set_battery(true);
        sim.set_power_key(true);
        sim.advance(200);
        sim.set_power_key(false);
        sim.advance(10_000);
        assert!(!sim.is_powered());
    }

    #[test]
    fn battery_drop_cuts_power_immediately() {
        let mut sim = ModemSim::new(SimTimings::default());
        sim.set_battery(true);
        sim.set_power_key(true);
        sim.advance(1_000);
        sim.set_power_key(false);
        sim.advance(5_000);
        assert!(sim.is_powered());

        sim.set_battery(false);
        assert!(!sim.is_powered());
    }
}
