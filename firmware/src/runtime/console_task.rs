//! UART debug console for the fixture.
//!
//! Assembles command lines from the console UART, parses them with the
//! shared grammar, and forwards configuration records to the power task.
//! Status queries answer from the snapshot the power task publishes.

use core::fmt::Write as _;

use embassy_stm32 as hal;
use embassy_stm32::Peri;
use embassy_stm32::usart::{BufferedUart, Config as UartConfig};
use embassy_time::{Duration, Timer};
use embedded_io_async::Write;
use heapless::String;
use static_cell::StaticCell;

use crate::console::LineBuffer;
use modem_core::console::{Command, ConfigBuilder, HELP_TOPICS, parse_line};
use modem_core::report::{PowerSnapshot, ReportFormatter, ReportSink, generate_report};

const CONSOLE_BAUD: u32 = 115_200;
const CONSOLE_BUFFER_SIZE: usize = 256;

static TX_BUFFER: StaticCell<[u8; CONSOLE_BUFFER_SIZE]> = StaticCell::new();
static RX_BUFFER: StaticCell<[u8; CONSOLE_BUFFER_SIZE]> = StaticCell::new();

embassy_stm32::bind_interrupts!(struct ConsoleIrqs {
    USART3_4_5_6_LPUART1 => embassy_stm32::usart::BufferedInterruptHandler<hal::peripherals::USART5>;
});

#[embassy_executor::task]
pub async fn run(
    usart: Peri<'static, hal::peripherals::USART5>,
    tx_pin: Peri<'static, hal::peripherals::PB0>,
    rx_pin: Peri<'static, hal::peripherals::PB1>,
) -> ! {
    let mut config = UartConfig::default();
    config.baudrate = CONSOLE_BAUD;

    let uart = BufferedUart::new(
        usart,
        rx_pin,
        tx_pin,
        TX_BUFFER.init([0; CONSOLE_BUFFER_SIZE]),
        RX_BUFFER.init([0; CONSOLE_BUFFER_SIZE]),
        ConsoleIrqs,
        config,
    )
    .expect("failed to initialize console UART");

    let (mut uart_tx, mut uart_rx) = uart.split();

    let mut line_buffer = LineBuffer::new();
    let mut builder = ConfigBuilder::new();
    let mut ingress = [0u8; 32];

    send_line(&mut uart_tx, "modem power fixture console; `help` for commands").await;

    loop {
        match uart_rx.read(&mut ingress).await {
            Ok(count) if count > 0 => {
                for &byte in &ingress[..count] {
                    if let Some(line) = line_buffer.push(byte) {
                        handle_line(line.as_str(), &mut builder, &mut uart_tx).await;
                    }
                }
            }
            Ok(_) => {}
            Err(_) => {
                defmt::warn!("console: UART read error");
                Timer::after(Duration::from_millis(5)).await;
            }
        }
    }
}

async fn handle_line<W: Write>(line: &str, builder: &mut ConfigBuilder, tx: &mut W) {
    match parse_line(line) {
        Ok(Command::Power(setting)) => {
            let config = builder.config_for(setting);
            super::CONFIG_QUEUE.send(config).await;
            send_line(tx, "config queued").await;
        }
        Ok(Command::AtProtocol(enabled)) => {
            builder.set_at_protocol(enabled);
            send_line(tx, if enabled { "at_protocol=on" } else { "at_protocol=off" }).await;
        }
        Ok(Command::Status) => {
            let snapshot = latest_snapshot();
            let mut response: String<96> = String::new();
            if ReportFormatter::new(&snapshot).write_line(&mut response).is_ok() {
                send_line(tx, response.as_str()).await;
            }
        }
        Ok(Command::Report) => {
            let snapshot = latest_snapshot();
            let mut sink = ConsoleReportSink::default();
            generate_report(&snapshot, &mut sink);
            send_line(tx, sink.rendered.as_str()).await;
        }
        Ok(Command::Events) => {
            send_line(tx, "events: streamed to the defmt log").await;
        }
        Ok(Command::Tick(_)) => {
            send_line(tx, "tick: emulator-only command").await;
        }
        Ok(Command::Help) => {
            for (_, help) in HELP_TOPICS {
                send_line(tx, help).await;
            }
        }
        Err(error) => {
            let mut response: String<64> = String::new();
            if write!(response, "{error}").is_ok() {
                send_line(tx, response.as_str()).await;
            }
        }
    }
}

fn latest_snapshot() -> PowerSnapshot {
    super::SNAPSHOT.lock(core::cell::Cell::get)
}

/// Report sink rendering one `name=value` pair per fragment.
#[derive(Default)]
struct ConsoleReportSink {
    rendered: String<96>,
}

impl ConsoleReportSink {
    fn separator(&mut self) {
        if !self.rendered.is_empty() {
            let _ = self.rendered.push(' ');
        }
    }
}

impl ReportSink for ConsoleReportSink {
    fn attribute(&mut self, name: &str, value: &str) {
        self.separator();
        let _ = write!(self.rendered, "{name}={value}");
    }

    fn attribute_u32(&mut self, name: &str, value: u32) {
        self.separator();
        let _ = write!(self.rendered, "{name}={value}");
    }
}

async fn send_line<W: Write>(tx: &mut W, line: &str) {
    if write_all(tx, line.as_bytes()).await {
        let _ = write_all(tx, b"\r\n").await;
        if tx.flush().await.is_err() {
            defmt::warn!("console: UART flush error");
        }
    }
}

async fn write_all<W: Write>(tx: &mut W, mut data: &[u8]) -> bool {
    while !data.is_empty() {
        match tx.write(data).await {
            Ok(count) if count > 0 => data = &data[count..],
            Ok(_) => {}
            Err(_) => {
                defmt::warn!("console: UART write error");
                return false;
            }
        }
    }
    true
}
