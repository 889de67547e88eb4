mod common;

use common::{fresh_controller, power_key_pulses};
use modem_core::config::ModemConfig;
use modem_core::power::{PowerRequest, PowerState};

#[test]
fn intent_depends_only_on_the_latest_config() {
    let cases = [
        (ModemConfig::unspecified(), PowerRequest::DontCare),
        (ModemConfig::power_on(), PowerRequest::On),
        (
            ModemConfig {
                power: Some(true),
                at_protocol: Some(false),
            },
            PowerRequest::On,
        ),
        (
            ModemConfig {
                power: Some(false),
                at_protocol: None,
            },
            PowerRequest::DontCare,
        ),
        (
            ModemConfig {
                power: Some(false),
                at_protocol: Some(true),
            },
            PowerRequest::DontCare,
        ),
        (ModemConfig::power_off(), PowerRequest::Off),
        (
            ModemConfig {
                power: None,
                at_protocol: Some(false),
            },
            PowerRequest::Off,
        ),
    ];

    let mut controller = fresh_controller(true);
    for (config, expected) in cases {
        controller.apply_config(&config);
        assert_eq!(controller.request(), expected, "config {config:?}");
    }

    // Prior intent does not leak: a strong request followed by a weak one.
    controller.apply_config(&ModemConfig::power_on());
    controller.apply_config(&ModemConfig::unspecified());
    assert_eq!(controller.request(), PowerRequest::DontCare);
}

#[test]
fn applying_config_touches_no_pins() {
    let mut controller = fresh_controller(true);
    controller.apply_config(&ModemConfig::power_on());
    controller.apply_config(&ModemConfig::power_off());
    assert!(controller.provider_mut().take_ops().is_empty());
}

#[test]
fn absent_power_with_at_disabled_requests_power_down() {
    let mut controller = fresh_controller(false);
    controller.apply_config(&ModemConfig::power_on());
    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::On);
    let _ = controller.provider_mut().take_ops();

    controller.apply_config(&ModemConfig {
        power: None,
        at_protocol: Some(false),
    });
    assert_eq!(controller.request(), PowerRequest::Off);

    controller.drive_state_transitions();
    assert_eq!(controller.state(), PowerState::ShuttingDown);
    assert_eq!(controller.snapshot().shutdown_seconds, 1);

    let ops = controller.provider_mut().take_ops();
    assert_eq!(power_key_pulses(&ops).len(), 1);
}

#[test]
fn power_false_with_protocol_up_is_a_no_op() {
    // Powering off while the AT protocol is expected would pull the modem
    // out from under protocol-dependent logic, so the request is ignored.
    for initial_status in [true, false] {
        let mut controller = fresh_controller(initial_status);
        controller.apply_config(&ModemConfig {
            power: Some(false),
            at_protocol: None,
        });
        assert_eq!(controller.request(), PowerRequest::DontCare);

        controller.drive_state_transitions();
        assert_eq!(controller.state(), PowerState::Unknown);
        assert!(controller.provider_mut().take_ops().is_empty());
    }
}
