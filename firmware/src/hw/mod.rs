//! GPIO and delay bindings for the bench fixture.
//!
//! The fixture routes the modem's six control lines and the status input to
//! MCU pins; this module adapts the Embassy GPIO drivers onto the pin/delay
//! traits owned by `modem-core`. Pad assignments on the modem side are
//! documented in the shared line catalog.

#![cfg(target_os = "none")]

use embassy_stm32::gpio::{Input, Level, Output};
use embassy_time::{Duration, block_for};
use modem_core::lines::{ControlLineId, Delayer, ModemLines};

/// Push-pull outputs plus the status input wired to the modem header.
pub struct FixtureLines<'d> {
    battery: Output<'d>,
    dtr: Output<'d>,
    enable: Output<'d>,
    host_ready: Output<'d>,
    pwrkey: Output<'d>,
    reset: Output<'d>,
    status: Input<'d>,
}

impl<'d> FixtureLines<'d> {
    pub fn new(
        battery: Output<'d>,
        dtr: Output<'d>,
        enable: Output<'d>,
        host_ready: Output<'d>,
        pwrkey: Output<'d>,
        reset: Output<'d>,
        status: Input<'d>,
    ) -> Self {
        Self {
            battery,
            dtr,
            enable,
            host_ready,
            pwrkey,
            reset,
            status,
        }
    }

    fn output_mut(&mut self, line: ControlLineId) -> &mut Output<'d> {
        match line {
            ControlLineId::Battery => &mut self.battery,
            ControlLineId::Dtr => &mut self.dtr,
            ControlLineId::Enable => &mut self.enable,
            ControlLineId::HostReady => &mut self.host_ready,
            ControlLineId::PowerKey => &mut self.pwrkey,
            ControlLineId::Reset => &mut self.reset,
        }
    }
}

impl ModemLines for FixtureLines<'_> {
    fn set(&mut self, line: ControlLineId, level: bool) {
        let output = self.output_mut(line);
        output.set_level(if level { Level::High } else { Level::Low });
    }

    fn status(&mut self) -> bool {
        self.status.is_high()
    }
}

impl Delayer for FixtureLines<'_> {
    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(u64::from(ms)));
    }
}
