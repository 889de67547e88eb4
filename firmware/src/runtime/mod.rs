use core::cell::Cell;

use cortex_m::interrupt;
use cortex_m::register::primask;
use critical_section::{self, RawRestoreState};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_stm32 as hal;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::ThreadModeRawMutex;
use embassy_sync::channel::Channel;

use crate::hw::FixtureLines;
use modem_core::config::ModemConfig;
use modem_core::power::PowerController;
use modem_core::report::PowerSnapshot;

mod console_task;
mod power_task;

critical_section::set_impl!(InterruptCriticalSection);

struct InterruptCriticalSection;

unsafe impl critical_section::Impl for InterruptCriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        let primask = primask::read();
        interrupt::disable();
        primask.is_active()
    }

    unsafe fn release(restore_state: RawRestoreState) {
        if restore_state {
            unsafe {
                interrupt::enable();
            }
        }
    }
}

/// Depth of the configuration queue between console and power task.
pub(crate) const CONFIG_QUEUE_DEPTH: usize = 4;

pub(crate) type ConfigQueue =
    Channel<ThreadModeRawMutex, ModemConfig, CONFIG_QUEUE_DEPTH>;

pub(crate) static CONFIG_QUEUE: ConfigQueue = Channel::new();

/// Latest snapshot published by the power task for console queries.
pub(crate) static SNAPSHOT: Mutex<ThreadModeRawMutex, Cell<PowerSnapshot>> =
    Mutex::new(Cell::new(PowerSnapshot::unknown()));

#[embassy_executor::main]
pub async fn main(spawner: Spawner) {
    let config = hal::Config::default();
    let hal::Peripherals {
        PA0,
        PA1,
        PA2,
        PA3,
        PA4,
        PA5,
        PA6,
        USART5,
        PB0,
        PB1,
        ..
    } = hal::init(config);

    let lines = FixtureLines::new(
        Output::new(PA0, Level::Low, Speed::Low), // battery
        Output::new(PA1, Level::Low, Speed::Low), // dtr
        Output::new(PA2, Level::Low, Speed::Low), // enable
        Output::new(PA3, Level::Low, Speed::Low), // host-ready
        Output::new(PA4, Level::Low, Speed::Low), // pwrkey
        Output::new(PA5, Level::Low, Speed::Low), // reset
        Input::new(PA6, Pull::None),              // status
    );

    // Bring-up pulses run here, once, before any task observes the modem.
    let controller = PowerController::new(lines);
    defmt::info!("modem bring-up sequence complete");

    spawner
        .spawn(power_task::run(controller))
        .expect("failed to spawn power task");

    spawner
        .spawn(console_task::run(USART5, PB0, PB1))
        .expect("failed to spawn console task");
}
