//! SSDP-based discovery of Sonos-compatible renderers.
//!
//! A discovery pass multicasts one M-SEARCH datagram for the ZonePlayer
//! device type, then listens on a caller-owned UDP socket for a fixed
//! wall-clock window. Each response is resolved to a renderer by fetching
//! its description document and reading the room name out of it.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::net::UdpSocket;
//! use std::time::Duration;
//! use remote_discovery::Scanner;
//!
//! let socket = UdpSocket::bind("0.0.0.0:1901")?;
//! socket.set_nonblocking(true)?;
//!
//! let scanner = Scanner::new(Duration::from_secs(10))?;
//! let devices = scanner.run(&socket, Duration::from_secs(5), |device| {
//!     println!("found {} at {}", device.name, device.ip);
//! })?;
//! println!("{} renderer(s) on the network", devices.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod ssdp;

pub mod scan;

pub use scan::Scanner;

use serde::Serialize;

/// A renderer discovered on the local network.
///
/// The name is the room name from the device description; the address is
/// derived from the description location URL carried in the SSDP response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    /// Room name, e.g. "Living Room".
    pub name: String,
    /// IPv4 address as a string, e.g. "192.168.1.50".
    pub ip: String,
}
