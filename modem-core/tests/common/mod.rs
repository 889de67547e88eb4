//! Shared fake pin/delay provider for the integration suites.

#![allow(dead_code)]

use modem_core::lines::{ControlLineId, Delayer, ModemLines};
use modem_core::power::PowerController;

/// One observed interaction with the fake hardware, in order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Set(ControlLineId, bool),
    Delay(u32),
    Status(bool),
}

/// Recording provider with a directly scriptable status line.
pub struct FakeModem {
    pub ops: Vec<Op>,
    pub status: bool,
}

impl FakeModem {
    pub fn new(status: bool) -> Self {
        Self {
            ops: Vec::new(),
            status,
        }
    }

    /// Drains and returns everything observed so far.
    pub fn take_ops(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }
}

impl ModemLines for FakeModem {
    fn set(&mut self, line: ControlLineId, level: bool) {
        self.ops.push(Op::Set(line, level));
    }

    fn status(&mut self) -> bool {
        self.ops.push(Op::Status(self.status));
        self.status
    }
}

impl Delayer for FakeModem {
    fn delay_ms(&mut self, ms: u32) {
        self.ops.push(Op::Delay(ms));
    }
}

/// Constructs a controller and discards the bring-up traffic.
pub fn fresh_controller(status: bool) -> PowerController<FakeModem> {
    let mut controller = PowerController::new(FakeModem::new(status));
    let _ = controller.provider_mut().take_ops();
    controller
}

/// Extracts the hold time of every completed power-key pulse.
pub fn power_key_pulses(ops: &[Op]) -> Vec<u32> {
    ops.windows(3)
        .filter_map(|window| match *window {
            [
                Op::Set(ControlLineId::PowerKey, true),
                Op::Delay(hold),
                Op::Set(ControlLineId::PowerKey, false),
            ] => Some(hold),
            _ => None,
        })
        .collect()
}
