//! SOAP request construction, transport, and outcome classification.
//!
//! A control request is one action body fragment wrapped in a fixed
//! envelope and POSTed to the renderer's service control endpoint. The
//! wire itself sits behind the [`Transport`] trait so command paths can be
//! exercised against recorded stubs; [`UreqTransport`] is the production
//! implementation.

use std::net::Ipv4Addr;
use std::thread;
use std::time::Duration;

use crate::error::{ControlError, Result};

/// Port renderers expose their control endpoints on.
const CONTROL_PORT: u16 = 1400;

/// Fixed outer envelope; exactly one action fragment goes in the body.
const ENVELOPE_OPEN: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
    <s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\" \
    s:encodingStyle=\"http://schemas.xmlsoap.org/soap/encoding/\"><s:Body>";
const ENVELOPE_CLOSE: &str = "</s:Body></s:Envelope>";

/// Status and body of one completed HTTP POST attempt.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// One HTTP POST against a control endpoint.
pub trait Transport {
    /// Perform a single POST. `Ok` carries any HTTP status, including
    /// error statuses; `Err` means the request never completed.
    fn post(&self, url: &str, soap_action: &str, envelope: &str) -> Result<HttpReply>;
}

/// Production transport over a `ureq` agent.
///
/// The agent enforces connect and read timeouts per attempt; there is no
/// deadline spanning a whole retry sequence. Each POST opens and closes
/// its own connection.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout_connect(timeout)
                .timeout_read(timeout)
                .build(),
        }
    }
}

impl Transport for UreqTransport {
    fn post(&self, url: &str, soap_action: &str, envelope: &str) -> Result<HttpReply> {
        let result = self
            .agent
            .post(url)
            .set("Content-Type", "text/xml; charset=\"utf-8\"")
            .set("SOAPACTION", soap_action)
            .send_string(envelope);

        match result {
            Ok(response) => {
                let status = response.status();
                let body = response
                    .into_string()
                    .map_err(|e| ControlError::Network(e.to_string()))?;
                Ok(HttpReply { status, body })
            }
            // ureq reports non-2xx statuses as errors; recover the reply
            // so classification sees the real status and fault body.
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                Ok(HttpReply { status, body })
            }
            Err(e) => Err(ControlError::Network(e.to_string())),
        }
    }
}

/// SOAP control client for Sonos-compatible renderers.
pub struct SoapClient {
    transport: Box<dyn Transport + Send>,
    max_retries: u32,
}

impl SoapClient {
    /// Create a client that talks HTTP with a per-attempt `timeout`.
    pub fn new(timeout: Duration, max_retries: u32) -> Self {
        Self::with_transport(Box::new(UreqTransport::new(timeout)), max_retries)
    }

    /// Create a client over a custom transport (stubs, instrumentation).
    pub fn with_transport(transport: Box<dyn Transport + Send>, max_retries: u32) -> Self {
        Self {
            transport,
            max_retries,
        }
    }

    pub fn set_max_retries(&mut self, max_retries: u32) {
        self.max_retries = max_retries;
    }

    /// Send one action to the renderer at `ip` and classify the outcome.
    ///
    /// `body_fragment` is a single action element; it is wrapped in the
    /// fixed envelope and POSTed to
    /// `http://{ip}:1400/MediaRenderer/{service}/Control`. The request is
    /// retried until the first HTTP 200, up to the configured attempt
    /// count, sleeping `100 ms * attempt` between attempts (linear).
    ///
    /// Returns the response body on 200. A final 500 maps to
    /// [`ControlError::SoapFault`] with the fault body captured; any other
    /// final status, or a transport failure, maps to
    /// [`ControlError::Network`] with no body. A malformed `ip` fails
    /// [`ControlError::InvalidParam`] before any I/O.
    pub fn call(&self, ip: &str, service: &str, action: &str, body_fragment: &str) -> Result<String> {
        if ip.parse::<Ipv4Addr>().is_err() {
            return Err(ControlError::InvalidParam(format!("malformed IPv4 address: {ip}")));
        }

        let envelope = format!("{ENVELOPE_OPEN}{body_fragment}{ENVELOPE_CLOSE}");
        let url = format!("http://{ip}:{CONTROL_PORT}/MediaRenderer/{service}/Control");
        let soap_action = format!("\"urn:schemas-upnp-org:service:{service}:1#{action}\"");

        let mut last = Err(ControlError::Network("no attempts made".to_string()));
        for attempt in 1..=self.max_retries {
            last = self.transport.post(&url, &soap_action, &envelope);
            if matches!(last, Ok(ref reply) if reply.status == 200) {
                break;
            }
            tracing::debug!(ip, action, attempt, "control request attempt failed");
            if attempt < self.max_retries {
                thread::sleep(Duration::from_millis(100 * u64::from(attempt)));
            }
        }

        match last {
            Ok(reply) if reply.status == 200 => Ok(reply.body),
            Ok(reply) if reply.status == 500 => Err(ControlError::SoapFault { body: reply.body }),
            Ok(reply) => Err(ControlError::Network(format!("HTTP status {}", reply.status))),
            Err(e) => Err(e),
        }
    }
}
