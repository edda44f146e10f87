//! Serial port handling
//!
//! Opens and configures the sensor link. The sensor streams continuously,
//! so ports are opened with an effectively unbounded read timeout and the
//! raw 8N1 settings the firmware expects.

use std::collections::HashMap;
#[cfg(target_os = "linux")]
use std::fs;
use std::time::Duration;

use serialport::{SerialPort, SerialPortType};

use super::ProtocolError;

// serialport requires a finite timeout; this one is long enough that reads
// block for all practical purposes.
const READ_TIMEOUT: Duration = Duration::from_millis(u32::MAX as u64);

/// An available serial port candidate.
#[derive(Debug, Clone)]
pub struct PortInfo {
    /// Port path, e.g. "/dev/ttyACM0".
    pub name: String,
    /// Product name reported by the device, if any.
    pub product: Option<String>,
    /// Device serial number, if any.
    pub serial_number: Option<String>,
}

/// List candidate serial ports in a deterministic order: ttyACM before
/// ttyUSB, numeric suffixes ascending, everything else last by name.
pub fn list_ports() -> Vec<PortInfo> {
    let mut by_name: HashMap<String, PortInfo> = HashMap::new();

    for info in serialport::available_ports().unwrap_or_default() {
        let (product, serial_number) = match info.port_type {
            SerialPortType::UsbPort(usb) => (usb.product, usb.serial_number),
            _ => (None, None),
        };
        by_name
            .entry(info.port_name.clone())
            .or_insert_with(|| PortInfo {
                name: info.port_name,
                product,
                serial_number,
            });
    }

    // Some platforms miss CDC-ACM devices in the enumeration; pick up any
    // /dev entries the API did not report.
    #[cfg(target_os = "linux")]
    if let Ok(entries) = fs::read_dir("/dev") {
        for entry in entries.flatten() {
            if let Some(fname) = entry.file_name().to_str() {
                if fname.starts_with("ttyACM") || fname.starts_with("ttyUSB") {
                    let full = format!("/dev/{}", fname);
                    by_name.entry(full.clone()).or_insert(PortInfo {
                        name: full,
                        product: None,
                        serial_number: None,
                    });
                }
            }
        }
    }

    let mut ports: Vec<PortInfo> = by_name.into_values().collect();
    ports.sort_by_key(|port| sort_key(&port.name));
    ports
}

fn sort_key(name: &str) -> (u8, usize, String) {
    let basename = name.rsplit('/').next().unwrap_or(name);
    for (rank, prefix) in [(0u8, "ttyACM"), (1, "ttyUSB")] {
        if let Some(suffix) = basename.strip_prefix(prefix) {
            let num = suffix.parse::<usize>().unwrap_or(usize::MAX);
            return (rank, num, basename.to_string());
        }
    }
    (2, 0, basename.to_string())
}

/// Open a serial port at the given baud rate.
pub fn open_port(name: &str, baud_rate: u32) -> Result<Box<dyn SerialPort>, ProtocolError> {
    serialport::new(name, baud_rate)
        .timeout(READ_TIMEOUT)
        .open()
        .map_err(|err| ProtocolError::SerialError(err.to_string()))
}

/// Configure a port for the sensor link: raw 8N1, no flow control.
pub fn configure_port(port: &mut dyn SerialPort) -> Result<(), ProtocolError> {
    port.set_data_bits(serialport::DataBits::Eight)
        .map_err(|err| ProtocolError::SerialError(err.to_string()))?;
    port.set_parity(serialport::Parity::None)
        .map_err(|err| ProtocolError::SerialError(err.to_string()))?;
    port.set_stop_bits(serialport::StopBits::One)
        .map_err(|err| ProtocolError::SerialError(err.to_string()))?;
    port.set_flow_control(serialport::FlowControl::None)
        .map_err(|err| ProtocolError::SerialError(err.to_string()))?;
    Ok(())
}
