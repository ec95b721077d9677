//! SOAP control protocol layer for Sonos-compatible renderers.
//!
//! This crate provides the wire-level building blocks shared by the
//! discovery and control layers: the closed outcome taxonomy, minimal
//! single-field extraction from XML-shaped payloads, and a SOAP client
//! that POSTs action envelopes to a renderer's control endpoint with
//! retry and outcome classification.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use remote_soap::client::SoapClient;
//! use remote_soap::xml::extract_tag;
//!
//! let client = SoapClient::new(Duration::from_secs(10), 3);
//! let body = "<u:GetVolume xmlns:u=\"urn:schemas-upnp-org:service:RenderingControl:1\">\
//!             <InstanceID>0</InstanceID><Channel>Master</Channel></u:GetVolume>";
//! let response = client.call("192.168.1.50", "RenderingControl", "GetVolume", body)?;
//! let volume = extract_tag(&response, "CurrentVolume");
//! # Ok::<(), remote_soap::ControlError>(())
//! ```

mod error;

pub mod client;
pub mod xml;

pub use error::{outcome_label, ControlError, Result};
