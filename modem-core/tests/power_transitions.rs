mod common;

use common::{Op, fresh_controller, power_key_pulses};
use modem_core::config::ModemConfig;
use modem_core::lines::ControlLineId;
use modem_core::power::{POWER_KEY_PULSE_MS, PowerState};

#[test]
fn power_up_completes_over_periodic_ticks() {
    let mut controller = fresh_controller(true);
    controller.apply_config(&ModemConfig::power_on());

    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::StartingUp);
    assert_eq!(controller.snapshot().startup_seconds, 1);
    assert!(controller.needs_update_each_second());

    // Two more seconds with the status line still reading "off".
    controller.drive_state_transitions();
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::StartingUp);
    assert_eq!(controller.snapshot().startup_seconds, 3);

    controller.provider_mut().status = false;
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::On);
    assert!(!controller.needs_update_each_second());

    let ops = controller.provider_mut().take_ops();
    let pulses = power_key_pulses(&ops);
    assert_eq!(pulses.len(), 1);
    assert!(pulses[0] >= 1_000, "pulse hold violates hardware contract");
}

#[test]
fn power_down_completes_over_periodic_ticks() {
    let mut controller = fresh_controller(false);
    controller.apply_config(&ModemConfig::power_on());
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::On);
    let _ = controller.provider_mut().take_ops();

    controller.apply_config(&ModemConfig::power_off());
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::ShuttingDown);
    assert_eq!(controller.snapshot().shutdown_seconds, 1);
    assert!(controller.needs_update_each_second());

    controller.provider_mut().status = true;
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::Off);

    let ops = controller.provider_mut().take_ops();
    assert_eq!(power_key_pulses(&ops).len(), 1);

    // The safe-state writes precede the pulse.
    let reset_at = ops
        .iter()
        .position(|op| *op == Op::Set(ControlLineId::Reset, true))
        .expect("reset asserted");
    let enable_at = ops
        .iter()
        .position(|op| *op == Op::Set(ControlLineId::Enable, true))
        .expect("enable asserted");
    let pulse_at = ops
        .iter()
        .position(|op| *op == Op::Set(ControlLineId::PowerKey, true))
        .expect("power key pulsed");
    assert!(reset_at < pulse_at);
    assert!(enable_at < pulse_at);
}

#[test]
fn power_up_pulse_uses_contract_hold_time() {
    let mut controller = fresh_controller(true);
    controller.apply_config(&ModemConfig::power_on());
    controller.drive_state_transitions();

    let ops = controller.provider_mut().take_ops();
    assert_eq!(power_key_pulses(&ops), [POWER_KEY_PULSE_MS]);
}

#[test]
fn shutdown_from_starting_up_is_allowed() {
    // A power-up that has not confirmed yet can still be aborted hard.
    let mut controller = fresh_controller(true);
    controller.apply_config(&ModemConfig::power_on());
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::StartingUp);
    let _ = controller.provider_mut().take_ops();

    controller.apply_config(&ModemConfig::power_off());
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::ShuttingDown);

    let ops = controller.provider_mut().take_ops();
    assert_eq!(power_key_pulses(&ops).len(), 1);
}
