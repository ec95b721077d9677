//! Cloud-free discovery and control of Sonos-compatible renderers.
//!
//! [`SonosRemote`] is a local-network client built for hosts like
//! touchscreen remotes: it discovers renderers over SSDP, keeps them in an
//! owned registry, and issues volume, mute, and transport commands over
//! SOAP. There is no cloud dependency and no background machinery: every
//! call runs on the caller's thread and returns an explicit outcome.
//!
//! # Quick Start
//!
//! ```no_run
//! use sonos_remote::SonosRemote;
//!
//! let mut remote = SonosRemote::new();
//! remote.init()?;
//!
//! let count = remote.discover()?;
//! println!("{count} renderer(s) found");
//!
//! if let Some(device) = remote.devices().first() {
//!     let ip = device.ip.clone();
//!     remote.set_volume(&ip, 25)?;
//!     remote.play(&ip)?;
//! }
//! # Ok::<(), sonos_remote::ControlError>(())
//! ```
//!
//! # Concurrency
//!
//! The client is single-threaded and holds shared mutable state with no
//! internal locking. A multi-tasking host must route every call, commands
//! and discovery alike, through one external mutual-exclusion point.

mod actions;
mod config;
mod controller;
mod registry;
mod status;

pub use config::ClientConfig;
pub use controller::{DeviceFoundCallback, LogSink, SonosRemote};
pub use registry::DeviceRegistry;
pub use status::{TrackInfo, TransportState};

pub use remote_discovery::Device;
pub use remote_soap::client::{HttpReply, Transport};
pub use remote_soap::{outcome_label, ControlError, Result};
