//! `gridwatch ports` - serial port listing

use anyhow::Result;

use gridwatch_core::protocol::list_ports;

pub fn run() -> Result<()> {
    let ports = list_ports();
    if ports.is_empty() {
        println!("no serial ports found");
        return Ok(());
    }

    for port in ports {
        match (port.product, port.serial_number) {
            (Some(product), Some(serial)) => println!("{}  {} ({})", port.name, product, serial),
            (Some(product), None) => println!("{}  {}", port.name, product),
            _ => println!("{}", port.name),
        }
    }
    Ok(())
}
