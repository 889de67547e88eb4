mod common;

use common::{fresh_controller, power_key_pulses};
use modem_core::config::ModemConfig;
use modem_core::power::PowerState;

#[test]
fn unknown_resolves_from_status_line_before_acting() {
    // Status reads "off": a power-up request pulses immediately.
    let mut controller = fresh_controller(true);
    controller.apply_config(&ModemConfig::power_on());
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::StartingUp);

    // Status reads "on": a power-up request converges without a pulse.
    let mut controller = fresh_controller(false);
    controller.apply_config(&ModemConfig::power_on());
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::On);
    let ops = controller.provider_mut().take_ops();
    assert!(power_key_pulses(&ops).is_empty());
}

#[test]
fn unknown_with_power_down_request_converges_in_one_call() {
    // Hardware persisted "on" across a process restart; software state did
    // not. The first drive resolves the estimate and starts the shutdown.
    let mut controller = fresh_controller(false);
    controller.apply_config(&ModemConfig::power_off());
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::ShuttingDown);

    // Already off: nothing to do.
    let mut controller = fresh_controller(true);
    controller.apply_config(&ModemConfig::power_off());
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::Off);
    let ops = controller.provider_mut().take_ops();
    assert!(power_key_pulses(&ops).is_empty());
}

#[test]
fn repeated_drives_after_convergence_are_no_ops() {
    let mut controller = fresh_controller(false);
    controller.apply_config(&ModemConfig::power_on());
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::On);
    let _ = controller.provider_mut().take_ops();

    for _ in 0..5 {
        controller.drive_state_transitions();
    }

    assert!(controller.provider_mut().take_ops().is_empty());
    assert_eq!(controller.state(), PowerState::On);
    assert_eq!(controller.snapshot().startup_seconds, 0);
}

#[test]
fn stuck_startup_counts_forever_without_timeout() {
    // The status line never confirms. There is deliberately no forced
    // transition; the growing counter is the only signal an operator gets.
    let mut controller = fresh_controller(true);
    controller.apply_config(&ModemConfig::power_on());

    for _ in 0..120 {
        controller.drive_state_transitions();
        assert_eq!(controller.state(), PowerState::StartingUp);
        assert!(controller.needs_update_each_second());
    }

    assert_eq!(controller.snapshot().startup_seconds, 120);

    let ops = controller.provider_mut().take_ops();
    assert_eq!(power_key_pulses(&ops).len(), 1, "no retry pulses");
}

#[test]
fn needs_update_tracks_transient_states_only() {
    let mut controller = fresh_controller(true);
    assert!(!controller.needs_update_each_second()); // Unknown

    controller.apply_config(&ModemConfig::power_on());
    controller.drive_state_transitions();
    assert!(controller.needs_update_each_second()); // StartingUp

    controller.provider_mut().status = false;
    controller.drive_state_transitions();
    assert!(!controller.needs_update_each_second()); // On

    controller.apply_config(&ModemConfig::power_off());
    controller.drive_state_transitions();
    assert!(controller.needs_update_each_second()); // ShuttingDown

    controller.provider_mut().status = true;
    controller.drive_state_transitions();
    assert!(!controller.needs_update_each_second()); // Off
}
