//! Run one discovery pass and print the result as JSON.
//!
//! ```sh
//! cargo run --example discover_json
//! ```

use std::net::UdpSocket;
use std::time::Duration;

use remote_discovery::Scanner;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let socket = UdpSocket::bind("0.0.0.0:1901")?;
    socket.set_nonblocking(true)?;

    let scanner = Scanner::new(Duration::from_secs(10))?;
    let devices = scanner.run(&socket, Duration::from_secs(5), |device| {
        eprintln!("found {} at {}", device.name, device.ip);
    })?;

    println!("{}", serde_json::to_string_pretty(&devices)?);
    Ok(())
}
