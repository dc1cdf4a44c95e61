use std::{collections::BTreeMap, env, time::Duration};

use gxe_ups::{
    DRIVER_NAME, DRIVER_VERSION,
    config::{DriverConfig, MIN_POLL_INTERVAL},
    driver::GxeUps,
    sink::TelemetrySink,
    transport::SerialTransport,
};
use inquire::Select;
use serialport::SerialPort;

// Configuration constants - adjust these for your setup
const BAUD_RATE: u32 = 9600;
const SERIAL_TIMEOUT_MS: u64 = 1000;

pub struct PortWrapper(Box<dyn SerialPort>);

#[derive(Debug)]
pub struct IoError(std::io::Error);

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl embedded_io::Error for IoError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self.0.kind() {
            std::io::ErrorKind::NotFound => embedded_io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => embedded_io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::BrokenPipe => embedded_io::ErrorKind::BrokenPipe,
            std::io::ErrorKind::InvalidInput => embedded_io::ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => embedded_io::ErrorKind::InvalidData,
            // A read timeout ends the response.
            std::io::ErrorKind::TimedOut => embedded_io::ErrorKind::TimedOut,
            std::io::ErrorKind::Interrupted => embedded_io::ErrorKind::Interrupted,
            std::io::ErrorKind::Unsupported => embedded_io::ErrorKind::Unsupported,
            _ => embedded_io::ErrorKind::Other,
        }
    }
}

impl embedded_io::ErrorType for PortWrapper {
    type Error = IoError;
}

impl embedded_io::Read for PortWrapper {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        std::io::Read::read(&mut self.0, buf).map_err(IoError)
    }
}

impl embedded_io::ReadReady for PortWrapper {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        self.0
            .bytes_to_read()
            .map(|waiting| waiting > 0)
            .map_err(|e| IoError(e.into()))
    }
}

impl embedded_io::Write for PortWrapper {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write(&mut self.0, buf).map_err(IoError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        std::io::Write::flush(&mut self.0).map_err(IoError)
    }
}

/// Prints every change as it is published.
#[derive(Default)]
struct PrintingSink {
    values: BTreeMap<String, String>,
    status: Vec<String>,
    pending: Vec<String>,
}

impl TelemetrySink for PrintingSink {
    fn set(&mut self, name: &str, value: &str) {
        if self.values.get(name).map(String::as_str) != Some(value) {
            println!("{:<28} {}", name, value);
            self.values.insert(name.to_string(), value.to_string());
        }
    }

    fn mark_stale(&mut self) {
        println!("-- data stale");
    }

    fn mark_ok(&mut self) {}

    fn begin_alarms(&mut self) {
        self.pending.clear();
    }

    fn raise_alarm(&mut self, name: &str) {
        self.pending.push(name.to_string());
    }

    fn commit_alarms(&mut self) {
        println!("{:<28} [{}]", "ups.alarm", self.pending.join("] ["));
    }

    fn begin_status(&mut self) {
        self.pending.clear();
    }

    fn set_status(&mut self, token: &str) {
        self.pending.push(token.to_string());
    }

    fn commit_status(&mut self) {
        self.status = std::mem::take(&mut self.pending);
        println!("{:<28} {}", "ups.status", self.status.join(" "));
    }

    fn get_status(&self, token: &str) -> bool {
        self.status.iter().any(|t| t == token)
    }
}

fn main() {
    env_logger::init();

    // Get serial port from command line arg or interactive selection
    let port_name = env::args().nth(1).unwrap_or_else(|| {
        let ports = serialport::available_ports().expect("Failed to enumerate serial ports");

        if ports.is_empty() {
            eprintln!("No serial ports found!");
            std::process::exit(1);
        }

        let port_names: Vec<String> = ports.iter().map(|p| p.port_name.clone()).collect();

        Select::new("Select a serial port:", port_names)
            .prompt()
            .expect("Failed to select port")
    });
    let command = env::args().nth(2);

    println!("{} {}", DRIVER_NAME, DRIVER_VERSION);
    println!("Using port: {}", port_name);

    let port = serialport::new(&port_name, BAUD_RATE)
        .timeout(Duration::from_millis(SERIAL_TIMEOUT_MS))
        .open()
        .expect("Failed to open serial port");

    let mut config = DriverConfig::default();
    if let Ok(address) = env::var("GXE_ADDR") {
        config = config.with_address(&address).expect("Bad GXE_ADDR");
    }

    let mut ups: GxeUps<_> = GxeUps::new(SerialTransport::new(PortWrapper(port)), config);
    let mut sink = PrintingSink::default();

    ups.init_info(&mut sink).expect("UPS did not identify itself");

    let interval = Duration::from_secs(MIN_POLL_INTERVAL.to_secs().into());
    if let Some(command) = command {
        // The UPS ignores a frame sent too soon after the previous one.
        std::thread::sleep(interval);
        println!("{}: {:?}", command, ups.instant_command(&command));
    }

    loop {
        std::thread::sleep(interval);
        ups.update_info(&mut sink);
    }
}
