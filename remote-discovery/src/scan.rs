//! The timed discovery pass.
//!
//! One pass sends a single M-SEARCH, then polls the socket non-blocking
//! for a fixed wall-clock window. Every response datagram carrying the
//! renderer marker is resolved to a device by fetching its description
//! document over HTTP. Per-responder faults are expected on this channel
//! and never abort the pass.

use std::net::{Ipv4Addr, UdpSocket};
use std::time::{Duration, Instant};

use remote_soap::xml::extract_tag;
use remote_soap::{ControlError, Result};

use crate::ssdp;
use crate::Device;

/// Sleep between empty socket polls.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs discovery passes over a caller-owned UDP socket.
///
/// The socket must be bound and set non-blocking before a pass; the
/// scanner never owns it, so the caller controls the bound port and the
/// socket's lifetime across passes.
pub struct Scanner {
    group: String,
    http: reqwest::blocking::Client,
}

impl Scanner {
    /// Create a scanner whose description fetches give up after
    /// `fetch_timeout`.
    pub fn new(fetch_timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| ControlError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            group: ssdp::SSDP_GROUP.to_string(),
            http,
        })
    }

    /// Redirect the search datagram to an address other than the SSDP
    /// multicast group. Loopback harnesses use this; production traffic
    /// keeps the default.
    #[doc(hidden)]
    pub fn set_group(&mut self, group: impl Into<String>) {
        self.group = group.into();
    }

    /// Run one discovery pass.
    ///
    /// Listens for exactly `window` of wall-clock time. There is no early
    /// exit once devices have answered: slower responders may still be on
    /// their way, so the whole window is always consumed.
    ///
    /// Devices are de-duplicated by IP within the pass; a later response
    /// for the same IP replaces the earlier entry wholesale, and
    /// `on_found` fires exactly once per distinct IP added during the
    /// pass. Returns the devices in discovery order, however many there
    /// are; an empty pass is not an error. Only a failure to send the
    /// search datagram fails the pass.
    pub fn run(
        &self,
        socket: &UdpSocket,
        window: Duration,
        mut on_found: impl FnMut(&Device),
    ) -> Result<Vec<Device>> {
        socket
            .send_to(ssdp::search_request().as_bytes(), self.group.as_str())
            .map_err(|e| ControlError::Network(format!("failed to send search request: {e}")))?;
        tracing::debug!(group = %self.group, "search request sent");

        let mut found: Vec<Device> = Vec::new();
        let mut buf = [0u8; 2048];
        let start = Instant::now();

        while start.elapsed() < window {
            match socket.recv_from(&mut buf) {
                Ok((len, _)) => {
                    if let Ok(text) = std::str::from_utf8(&buf[..len]) {
                        self.handle_response(text, &mut found, &mut on_found);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    // Receive faults are as expected as lost datagrams on
                    // this channel; keep polling until the window ends.
                    tracing::debug!(error = %e, "discovery receive error");
                    std::thread::sleep(POLL_INTERVAL);
                }
            }
        }

        tracing::info!(count = found.len(), "discovery pass complete");
        Ok(found)
    }

    /// Resolve one SSDP datagram to a device, if it is one.
    fn handle_response(
        &self,
        text: &str,
        found: &mut Vec<Device>,
        on_found: &mut impl FnMut(&Device),
    ) {
        if !ssdp::is_renderer_response(text) {
            return;
        }
        let Some(url) = ssdp::location(text) else {
            return;
        };
        let Some(ip) = ssdp::ip_from_url(url) else {
            return;
        };
        if ip.parse::<Ipv4Addr>().is_err() {
            tracing::debug!(ip, "discarding response with malformed address");
            return;
        }

        let xml = match self.fetch_description(url) {
            Ok(xml) => xml,
            Err(e) => {
                tracing::debug!(url, error = %e, "description fetch failed");
                return;
            }
        };
        let Some(name) = parse_description(&xml) else {
            return;
        };

        let device = Device {
            name,
            ip: ip.to_string(),
        };
        match found.iter().position(|d| d.ip == device.ip) {
            // Same responder answered again; the later description wins.
            Some(index) => found[index] = device,
            None => {
                tracing::info!(name = %device.name, ip = %device.ip, "discovered renderer");
                on_found(&device);
                found.push(device);
            }
        }
    }

    fn fetch_description(&self, url: &str) -> std::result::Result<String, reqwest::Error> {
        self.http.get(url).send()?.error_for_status()?.text()
    }
}

/// Pull the room name out of a device description.
///
/// Responders advertising a negative internal speaker size are
/// non-addressable sub-components (bonded surrounds, subwoofers) and are
/// discarded, as are descriptions carrying no room name.
pub(crate) fn parse_description(xml: &str) -> Option<String> {
    if let Some(size) = extract_tag(xml, "internalSpeakerSize") {
        if size.trim().parse::<i32>().is_ok_and(|s| s < 0) {
            return None;
        }
    }
    match extract_tag(xml, "roomName") {
        Some(name) if !name.is_empty() => Some(name.to_string()),
        _ => None,
    }
}
