//! Scheduler for the power controller.
//!
//! Implements the drive contract: `apply_config` before every drive, a drive
//! on every configuration change, and a 1 s re-drive cadence while the
//! controller reports an in-flight transition. Power-key pulses block this
//! task for over a second; nothing latency-critical shares it.

use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Ticker};

use crate::hw::FixtureLines;
use modem_core::power::PowerController;
use modem_core::telemetry::{EventId, TelemetryRecorder};

#[embassy_executor::task]
pub async fn run(mut controller: PowerController<FixtureLines<'static>>) -> ! {
    let receiver = super::CONFIG_QUEUE.receiver();
    let mut ticker = Ticker::every(Duration::from_secs(1));
    let mut last_logged: Option<EventId> = None;

    loop {
        if controller.needs_update_each_second() {
            match select(receiver.receive(), ticker.next()).await {
                Either::First(config) => controller.apply_config(&config),
                Either::Second(()) => {}
            }
        } else {
            let config = receiver.receive().await;
            controller.apply_config(&config);
            ticker.reset();
        }

        controller.drive_state_transitions();

        let snapshot = controller.snapshot();
        super::SNAPSHOT.lock(|cell| cell.set(snapshot));
        defmt::info!("power state: {=str}", snapshot.state.label());

        flush_telemetry(controller.telemetry(), &mut last_logged);
    }
}

/// Mirrors telemetry records onto the defmt log exactly once each.
fn flush_telemetry(telemetry: &TelemetryRecorder, last_logged: &mut Option<EventId>) {
    for record in telemetry.oldest_first() {
        if last_logged.is_none_or(|id| record.id > id) {
            defmt::info!(
                "power event #{=u32}: {}",
                record.id,
                defmt::Display2Format(&record.event)
            );
            *last_logged = Some(record.id);
        }
    }
}
