//! The top-level client: owns the registry, the discovery socket, and the
//! SOAP client, and exposes the command surface hosts call into.

use std::net::UdpSocket;

use remote_discovery::{Device, Scanner};
use remote_soap::client::{SoapClient, Transport};
use remote_soap::xml::{extract_tag, unescape_minimal};
use remote_soap::{ControlError, Result};

use crate::actions;
use crate::config::ClientConfig;
use crate::registry::DeviceRegistry;
use crate::status::{parse_clock, TrackInfo, TransportState};

/// Invoked once for each device newly found during a discovery pass.
pub type DeviceFoundCallback = Box<dyn FnMut(&Device) + Send>;

/// Host-facing sink for log lines; fed only while logging is enabled.
pub type LogSink = Box<dyn Fn(&str) + Send>;

/// Step applied by [`SonosRemote::increase_volume`] and
/// [`SonosRemote::decrease_volume`].
const VOLUME_STEP: i16 = 5;

/// Discovery-and-control client for Sonos-compatible renderers.
///
/// The client is one owned unit of state: registry, discovery socket, and
/// HTTP transport. Nothing here is synchronized internally: a
/// multi-tasking host must serialize every call (commands and discovery
/// alike) through one external lock, never holding it across multiple
/// calls.
pub struct SonosRemote {
    config: ClientConfig,
    soap: SoapClient,
    custom_transport: bool,
    scanner: Option<Scanner>,
    socket: Option<UdpSocket>,
    registry: DeviceRegistry,
    device_found: Option<DeviceFoundCallback>,
    log_sink: Option<LogSink>,
}

impl SonosRemote {
    /// Create a client with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a client with a custom configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        let soap = SoapClient::new(config.soap_timeout, config.max_retries);
        Self::assemble(config, soap, false)
    }

    /// Create a client whose control requests go through a custom
    /// transport instead of live HTTP. Stubs and instrumentation use this.
    pub fn with_transport(config: ClientConfig, transport: Box<dyn Transport + Send>) -> Self {
        let soap = SoapClient::with_transport(transport, config.max_retries);
        Self::assemble(config, soap, true)
    }

    fn assemble(config: ClientConfig, soap: SoapClient, custom_transport: bool) -> Self {
        Self {
            config,
            soap,
            custom_transport,
            scanner: None,
            socket: None,
            registry: DeviceRegistry::default(),
            device_found: None,
            log_sink: None,
        }
    }

    /// Bind the discovery socket and build the HTTP side. Idempotent.
    ///
    /// Until this succeeds, every discovery and command call fails with
    /// [`ControlError::InvalidDevice`].
    pub fn init(&mut self) -> Result<()> {
        if self.socket.is_some() {
            return Ok(());
        }

        let socket = UdpSocket::bind(("0.0.0.0", self.config.discovery_port))
            .map_err(|e| ControlError::Network(format!("failed to bind discovery socket: {e}")))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| ControlError::Network(format!("failed to configure socket: {e}")))?;

        self.scanner = Some(Scanner::new(self.config.soap_timeout)?);
        self.socket = Some(socket);

        tracing::debug!(port = self.config.discovery_port, "client initialized");
        self.log("client initialized");
        Ok(())
    }

    /// Drop the discovery socket and forget every known device.
    pub fn shutdown(&mut self) {
        if self.socket.is_none() {
            return;
        }
        self.socket = None;
        self.scanner = None;
        self.registry.clear();
        tracing::debug!("client shut down");
        self.log("client shut down");
    }

    pub fn is_initialized(&self) -> bool {
        self.socket.is_some()
    }

    /// Current configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Swap the configuration. The retry limit applies immediately;
    /// network timeouts bind when [`SonosRemote::init`] builds the socket
    /// and HTTP clients, so re-init to apply those.
    pub fn set_config(&mut self, config: ClientConfig) {
        if self.custom_transport {
            self.soap.set_max_retries(config.max_retries);
        } else {
            self.soap = SoapClient::new(config.soap_timeout, config.max_retries);
        }
        self.config = config;
    }

    /// Register the callback fired for each device newly found during a
    /// discovery pass.
    pub fn on_device_found(&mut self, callback: impl FnMut(&Device) + Send + 'static) {
        self.device_found = Some(Box::new(callback));
    }

    /// Register the host-facing log sink. Lines reach it only while
    /// `enable_logging` is set.
    pub fn set_log_sink(&mut self, sink: impl Fn(&str) + Send + 'static) {
        self.log_sink = Some(Box::new(sink));
    }

    // ------------------------------------------------------------------
    // Discovery
    // ------------------------------------------------------------------

    /// Run one discovery pass and replace the registry with its result.
    ///
    /// Blocks the calling thread for the full `discovery_timeout` window;
    /// there is no early exit and no cancellation. Returns the number of
    /// devices now in the registry; zero devices is still success. Only
    /// an uninitialized client or a failure to send the search datagram
    /// fails the pass, in which case the registry is left untouched.
    pub fn discover(&mut self) -> Result<usize> {
        let window = self.config.discovery_timeout;
        let logging = self.config.enable_logging;

        let (Some(socket), Some(scanner)) = (self.socket.as_ref(), self.scanner.as_ref()) else {
            return Err(ControlError::InvalidDevice);
        };

        let sink = self.log_sink.as_ref();
        emit(sink, logging, "starting discovery pass");

        let mut callback = self.device_found.as_mut();
        let devices = scanner.run(socket, window, |device| {
            if let Some(hook) = callback.as_mut() {
                hook(device);
            }
        })?;

        let count = devices.len();
        self.registry.replace(devices);
        emit(sink, logging, &format!("discovery complete, {count} device(s)"));
        Ok(count)
    }

    /// Devices found by the most recent pass, in discovery order.
    pub fn devices(&self) -> &[Device] {
        self.registry.devices()
    }

    pub fn device_count(&self) -> usize {
        self.registry.len()
    }

    /// Look up a device by room name (ASCII case-insensitive, exact).
    ///
    /// The reference is a snapshot view: the next discovery pass may
    /// replace the registry, so don't hold it across passes.
    pub fn device_by_name(&self, name: &str) -> Option<&Device> {
        self.registry.by_name(name)
    }

    /// Look up a device by exact address.
    pub fn device_by_ip(&self, ip: &str) -> Option<&Device> {
        self.registry.by_ip(ip)
    }

    // ------------------------------------------------------------------
    // Volume and mute
    // ------------------------------------------------------------------

    /// Set the master volume, `0..=100`.
    pub fn set_volume(&self, ip: &str, volume: u8) -> Result<()> {
        if self.socket.is_none() {
            return Err(ControlError::InvalidDevice);
        }
        if volume > 100 {
            return Err(ControlError::InvalidParam(format!("volume {volume} out of range 0..=100")));
        }
        self.command(ip, actions::RENDERING_CONTROL, "SetVolume", &actions::set_volume(volume))?;
        tracing::debug!(ip, volume, "volume set");
        self.log(&format!("volume set to {volume} on {ip}"));
        Ok(())
    }

    /// Read the master volume.
    pub fn get_volume(&self, ip: &str) -> Result<u8> {
        let response =
            self.command(ip, actions::RENDERING_CONTROL, "GetVolume", &actions::get_volume())?;
        semantic_field(response, "CurrentVolume", |raw| raw.parse::<u8>().ok())
    }

    /// Shift the volume by `delta`, clamped into `0..=100`, and return the
    /// volume that was written.
    ///
    /// This is a read-modify-write of device state: another controller
    /// changing the volume between the two requests goes undetected.
    pub fn adjust_volume(&self, ip: &str, delta: i16) -> Result<u8> {
        let current = self.get_volume(ip)?;
        let target = (i16::from(current) + delta).clamp(0, 100) as u8;
        self.set_volume(ip, target)?;
        Ok(target)
    }

    /// Nudge the volume up one step.
    pub fn increase_volume(&self, ip: &str) -> Result<u8> {
        self.adjust_volume(ip, VOLUME_STEP)
    }

    /// Nudge the volume down one step.
    pub fn decrease_volume(&self, ip: &str) -> Result<u8> {
        self.adjust_volume(ip, -VOLUME_STEP)
    }

    /// Mute or unmute the master channel.
    pub fn set_mute(&self, ip: &str, mute: bool) -> Result<()> {
        self.command(ip, actions::RENDERING_CONTROL, "SetMute", &actions::set_mute(mute))?;
        tracing::debug!(ip, mute, "mute set");
        Ok(())
    }

    /// Read the master mute state.
    pub fn get_mute(&self, ip: &str) -> Result<bool> {
        let response =
            self.command(ip, actions::RENDERING_CONTROL, "GetMute", &actions::get_mute())?;
        semantic_field(response, "CurrentMute", |raw| match raw {
            "1" => Some(true),
            "0" => Some(false),
            _ => None,
        })
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    pub fn play(&self, ip: &str) -> Result<()> {
        self.transport_command(ip, "Play")
    }

    pub fn pause(&self, ip: &str) -> Result<()> {
        self.transport_command(ip, "Pause")
    }

    pub fn stop(&self, ip: &str) -> Result<()> {
        self.transport_command(ip, "Stop")
    }

    pub fn next(&self, ip: &str) -> Result<()> {
        self.transport_command(ip, "Next")
    }

    pub fn previous(&self, ip: &str) -> Result<()> {
        self.transport_command(ip, "Previous")
    }

    /// Read the playback state.
    pub fn transport_state(&self, ip: &str) -> Result<TransportState> {
        let response = self.command(
            ip,
            actions::AV_TRANSPORT,
            "GetTransportInfo",
            &actions::get_transport_info(),
        )?;
        semantic_field(response, "CurrentTransportState", TransportState::from_wire)
    }

    /// Read the current track metadata and progress.
    ///
    /// A renderer with nothing loaded reports no metadata and
    /// non-clock progress values; those come back as empty strings and
    /// zero durations rather than an error.
    pub fn track_info(&self, ip: &str) -> Result<TrackInfo> {
        let response = self.command(
            ip,
            actions::AV_TRANSPORT,
            "GetPositionInfo",
            &actions::get_position_info(),
        )?;

        let duration = extract_tag(&response, "TrackDuration")
            .and_then(parse_clock)
            .unwrap_or_default();
        let position = extract_tag(&response, "RelTime")
            .and_then(parse_clock)
            .unwrap_or_default();

        // Metadata rides entity-escaped inside its carrier field.
        let (title, artist) = match extract_tag(&response, "TrackMetaData") {
            Some(meta) => {
                let didl = unescape_minimal(meta);
                (
                    extract_tag(&didl, "dc:title").unwrap_or_default().to_string(),
                    extract_tag(&didl, "dc:creator").unwrap_or_default().to_string(),
                )
            }
            None => (String::new(), String::new()),
        };

        Ok(TrackInfo { title, artist, position, duration })
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn transport_command(&self, ip: &str, action: &str) -> Result<()> {
        self.command(ip, actions::AV_TRANSPORT, action, &actions::transport(action))?;
        tracing::debug!(ip, action, "transport command sent");
        self.log(&format!("{action} sent to {ip}"));
        Ok(())
    }

    fn command(&self, ip: &str, service: &str, action: &str, body: &str) -> Result<String> {
        if self.socket.is_none() {
            return Err(ControlError::InvalidDevice);
        }
        self.soap.call(ip, service, action, body)
    }

    fn log(&self, message: &str) {
        emit(self.log_sink.as_ref(), self.config.enable_logging, message);
    }

    /// Redirect discovery search datagrams, for loopback test harnesses.
    #[doc(hidden)]
    pub fn redirect_discovery_group(&mut self, group: &str) {
        if let Some(scanner) = self.scanner.as_mut() {
            scanner.set_group(group);
        }
    }
}

impl Default for SonosRemote {
    fn default() -> Self {
        Self::new()
    }
}

/// A 200 response whose expected field is missing or unreadable is a
/// protocol fault, not a transport success.
fn semantic_field<T>(
    response: String,
    tag: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T> {
    match extract_tag(&response, tag).and_then(|raw| parse(raw)) {
        Some(value) => Ok(value),
        None => Err(ControlError::SoapFault { body: response }),
    }
}

fn emit(sink: Option<&LogSink>, enabled: bool, message: &str) {
    if enabled {
        if let Some(sink) = sink {
            sink(message);
        }
    }
}
