//! SSDP search request and response handling.
//!
//! Responses arrive over a lossy multicast channel and are handled
//! line-by-line as HTTP-style headers; anything that does not parse is
//! simply skipped by the caller.

/// Default SSDP multicast group and port.
pub(crate) const SSDP_GROUP: &str = "239.255.255.250:1900";

/// Device type answered by compatible renderers.
pub(crate) const SEARCH_TARGET: &str = "urn:schemas-upnp-org:device:ZonePlayer:1";

/// The fixed M-SEARCH datagram for the renderer device type.
pub(crate) fn search_request() -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: 239.255.255.250:1900\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: 1\r\n\
         ST: {SEARCH_TARGET}\r\n\
         USER-AGENT: sonos-remote/0.1 UPnP/1.0\r\n\
         \r\n"
    )
}

/// True when a datagram carries the renderer type marker.
pub(crate) fn is_renderer_response(text: &str) -> bool {
    text.contains("ZonePlayer")
}

/// Extract the description location URL from an SSDP response.
pub(crate) fn location(response: &str) -> Option<&str> {
    response
        .lines()
        .find_map(|line| header_value(line.trim(), "LOCATION:"))
}

/// Extract the IP portion of a location URL like
/// `http://192.168.1.50:1400/xml/device_description.xml`.
pub(crate) fn ip_from_url(url: &str) -> Option<&str> {
    url.split("//").nth(1)?.split(':').next()
}

/// Extract a header value from a line like `HEADER: value`.
fn header_value<'a>(line: &'a str, header: &str) -> Option<&'a str> {
    if line.len() > header.len() && line[..header.len()].eq_ignore_ascii_case(header) {
        Some(line[header.len()..].trim())
    } else {
        None
    }
}
