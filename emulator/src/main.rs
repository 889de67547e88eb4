mod session;

use std::env;
use std::io::{self, BufRead, Write};
use std::process;

use session::{Session, SimTimings};

fn main() -> io::Result<()> {
    let timings = parse_timings().unwrap_or_else(|err| {
        eprintln!("{err}");
        eprintln!("Usage: modem-emulator [--startup-secs <n>] [--shutdown-secs <n>]");
        process::exit(2);
    });

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut session = Session::new(timings);
    let mut line = String::new();

    writeln!(
        writer,
        "Modem Power Emulator ready. Type `help` for commands or `exit` to quit."
    )?;

    loop {
        line.clear();
        write!(writer, "> ")?;
        writer.flush()?;

        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            writeln!(writer)?;
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if should_terminate(trimmed) {
            writeln!(writer, "Session closed.")?;
            break;
        }

        for response in session.handle_command(trimmed) {
            writeln!(writer, "{response}")?;
        }
    }

    Ok(())
}

fn should_terminate(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

fn parse_timings() -> Result<SimTimings, String> {
    let mut timings = SimTimings::default();
    let mut args = env::args().skip(1);

    while let Some(arg) = args.next() {
        let (flag, value) = match arg.split_once('=') {
            Some((flag, value)) => (flag.to_string(), value.to_string()),
            None => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("Expected value after {arg}"))?;
                (arg, value)
            }
        };

        let seconds: u64 = value
            .parse()
            .map_err(|_| format!("Expected a number of seconds, got `{value}`"))?;

        match flag.as_str() {
            "--startup-secs" => timings.startup_ms = seconds * 1_000,
            "--shutdown-secs" => timings.shutdown_ms = seconds * 1_000,
            other => return Err(format!("Unknown option `{other}`")),
        }
    }

    Ok(timings)
}
