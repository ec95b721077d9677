//! Command-path tests for the client facade, run against an in-memory
//! renderer wired in through the transport seam. No live HTTP or UDP
//! traffic is involved except a loopback sink for the discovery search
//! datagram.

use std::net::UdpSocket;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use remote_soap::xml::extract_tag;
use rstest::rstest;
use sonos_remote::{
    outcome_label, ClientConfig, ControlError, HttpReply, Result, SonosRemote, TrackInfo,
    Transport, TransportState,
};

const IP: &str = "192.168.1.50";

/// Entity-escaped DIDL payload as a renderer reports it.
const TRACK_METADATA: &str = "&lt;DIDL-Lite&gt;&lt;item&gt;\
    &lt;dc:title&gt;So What&lt;/dc:title&gt;\
    &lt;dc:creator&gt;Miles Davis&lt;/dc:creator&gt;\
    &lt;/item&gt;&lt;/DIDL-Lite&gt;";

/// Mutable state of the fake renderer, shared with the test body.
#[derive(Debug)]
struct Renderer {
    volume: u8,
    mute: bool,
    transport_state: &'static str,
    /// Every action that reached the renderer, in order.
    actions: Vec<String>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            volume: 0,
            mute: false,
            transport_state: "STOPPED",
            actions: Vec::new(),
        }
    }
}

/// Transport stub behaving like one renderer that honors the actions this
/// client sends.
struct RendererTransport {
    renderer: Arc<Mutex<Renderer>>,
}

impl RendererTransport {
    fn new() -> (Self, Arc<Mutex<Renderer>>) {
        let renderer = Arc::new(Mutex::new(Renderer::default()));
        let transport = Self {
            renderer: Arc::clone(&renderer),
        };
        (transport, renderer)
    }
}

fn response(action: &str, service: &str, inner: &str) -> HttpReply {
    HttpReply {
        status: 200,
        body: format!(
            "<s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\"><s:Body>\
             <u:{action}Response xmlns:u=\"urn:schemas-upnp-org:service:{service}:1\">{inner}\
             </u:{action}Response></s:Body></s:Envelope>"
        ),
    }
}

impl Transport for RendererTransport {
    fn post(&self, _url: &str, soap_action: &str, envelope: &str) -> Result<HttpReply> {
        let action = soap_action
            .rsplit('#')
            .next()
            .unwrap_or_default()
            .trim_end_matches('"')
            .to_string();

        let mut renderer = self.renderer.lock().unwrap();
        renderer.actions.push(action.clone());

        let reply = match action.as_str() {
            "SetVolume" => {
                renderer.volume = extract_tag(envelope, "DesiredVolume")
                    .and_then(|raw| raw.parse().ok())
                    .expect("SetVolume without a desired volume");
                response("SetVolume", "RenderingControl", "")
            }
            "GetVolume" => response(
                "GetVolume",
                "RenderingControl",
                &format!("<CurrentVolume>{}</CurrentVolume>", renderer.volume),
            ),
            "SetMute" => {
                renderer.mute = extract_tag(envelope, "DesiredMute") == Some("1");
                response("SetMute", "RenderingControl", "")
            }
            "GetMute" => response(
                "GetMute",
                "RenderingControl",
                &format!("<CurrentMute>{}</CurrentMute>", u8::from(renderer.mute)),
            ),
            "Play" => {
                renderer.transport_state = "PLAYING";
                response("Play", "AVTransport", "")
            }
            "Pause" => {
                renderer.transport_state = "PAUSED_PLAYBACK";
                response("Pause", "AVTransport", "")
            }
            "Stop" => {
                renderer.transport_state = "STOPPED";
                response("Stop", "AVTransport", "")
            }
            "Next" | "Previous" => response(&action, "AVTransport", ""),
            "GetTransportInfo" => response(
                "GetTransportInfo",
                "AVTransport",
                &format!(
                    "<CurrentTransportState>{}</CurrentTransportState>\
                     <CurrentTransportStatus>OK</CurrentTransportStatus>\
                     <CurrentSpeed>1</CurrentSpeed>",
                    renderer.transport_state
                ),
            ),
            "GetPositionInfo" => response(
                "GetPositionInfo",
                "AVTransport",
                &format!(
                    "<Track>1</Track>\
                     <TrackDuration>0:03:25</TrackDuration>\
                     <TrackMetaData>{TRACK_METADATA}</TrackMetaData>\
                     <RelTime>0:01:10</RelTime>\
                     <AbsTime>NOT_IMPLEMENTED</AbsTime>"
                ),
            ),
            other => panic!("renderer stub does not handle {other}"),
        };
        Ok(reply)
    }
}

/// Always answers with the same reply, whatever the request.
struct FixedTransport {
    reply: HttpReply,
}

impl Transport for FixedTransport {
    fn post(&self, _url: &str, _soap_action: &str, _envelope: &str) -> Result<HttpReply> {
        Ok(self.reply.clone())
    }
}

/// Ephemeral discovery port so parallel tests never collide on a bind.
fn config() -> ClientConfig {
    ClientConfig {
        discovery_port: 0,
        ..ClientConfig::default()
    }
}

fn client(transport: impl Transport + Send + 'static) -> SonosRemote {
    let mut remote = SonosRemote::with_transport(config(), Box::new(transport));
    remote.init().expect("init");
    remote
}

fn fixed_client(status: u16, body: &str) -> SonosRemote {
    client(FixedTransport {
        reply: HttpReply {
            status,
            body: body.to_string(),
        },
    })
}

#[test]
fn test_volume_round_trips_across_the_whole_range() {
    let (transport, _) = RendererTransport::new();
    let remote = client(transport);

    for volume in 0..=100u8 {
        remote.set_volume(IP, volume).expect("set");
        assert_eq!(remote.get_volume(IP).expect("get"), volume);
    }
}

#[rstest]
#[case(101)]
#[case(200)]
#[case(255)]
fn test_out_of_range_volume_is_rejected_before_any_request(#[case] volume: u8) {
    let (transport, renderer) = RendererTransport::new();
    let remote = client(transport);

    let result = remote.set_volume(IP, volume);
    assert!(matches!(result, Err(ControlError::InvalidParam(_))), "accepted {volume}");
    assert!(renderer.lock().unwrap().actions.is_empty());
}

#[test]
fn test_increase_volume_clamps_at_the_top() {
    let (transport, renderer) = RendererTransport::new();
    renderer.lock().unwrap().volume = 98;
    let remote = client(transport);

    assert_eq!(remote.increase_volume(IP).expect("increase"), 100);
    assert_eq!(renderer.lock().unwrap().volume, 100);
}

#[test]
fn test_decrease_volume_clamps_at_zero() {
    let (transport, renderer) = RendererTransport::new();
    renderer.lock().unwrap().volume = 3;
    let remote = client(transport);

    assert_eq!(remote.decrease_volume(IP).expect("decrease"), 0);
    assert_eq!(renderer.lock().unwrap().volume, 0);
}

#[test]
fn test_adjust_volume_applies_the_delta() {
    let (transport, renderer) = RendererTransport::new();
    renderer.lock().unwrap().volume = 50;
    let remote = client(transport);

    assert_eq!(remote.adjust_volume(IP, 20).expect("up"), 70);
    assert_eq!(remote.adjust_volume(IP, -30).expect("down"), 40);
    assert_eq!(renderer.lock().unwrap().volume, 40);
}

#[test]
fn test_mute_round_trip() {
    let (transport, renderer) = RendererTransport::new();
    let remote = client(transport);

    remote.set_mute(IP, true).expect("mute");
    assert!(renderer.lock().unwrap().mute);
    assert!(remote.get_mute(IP).expect("get"));

    remote.set_mute(IP, false).expect("unmute");
    assert!(!remote.get_mute(IP).expect("get"));
}

#[test]
fn test_get_volume_reclassifies_a_missing_field_as_a_soap_fault() {
    let remote = fixed_client(200, "<s:Envelope><s:Body></s:Body></s:Envelope>");

    match remote.get_volume(IP) {
        Err(ControlError::SoapFault { body }) => assert!(body.contains("s:Envelope")),
        other => panic!("expected SoapFault, got {other:?}"),
    }
}

#[test]
fn test_get_volume_reclassifies_an_unreadable_field_as_a_soap_fault() {
    let remote = fixed_client(200, "<CurrentVolume>loud</CurrentVolume>");
    assert!(matches!(remote.get_volume(IP), Err(ControlError::SoapFault { .. })));
}

#[test]
fn test_get_mute_reclassifies_an_unknown_token_as_a_soap_fault() {
    let remote = fixed_client(200, "<CurrentMute>maybe</CurrentMute>");
    assert!(matches!(remote.get_mute(IP), Err(ControlError::SoapFault { .. })));
}

#[test]
fn test_transport_commands_reach_the_renderer_in_order() {
    let (transport, renderer) = RendererTransport::new();
    let remote = client(transport);

    remote.play(IP).expect("play");
    remote.pause(IP).expect("pause");
    remote.stop(IP).expect("stop");
    remote.next(IP).expect("next");
    remote.previous(IP).expect("previous");

    let actions = renderer.lock().unwrap().actions.clone();
    assert_eq!(actions, ["Play", "Pause", "Stop", "Next", "Previous"]);
}

#[test]
fn test_transport_state_follows_the_renderer() {
    let (transport, _) = RendererTransport::new();
    let remote = client(transport);

    assert_eq!(remote.transport_state(IP).expect("state"), TransportState::Stopped);

    remote.play(IP).expect("play");
    assert_eq!(remote.transport_state(IP).expect("state"), TransportState::Playing);

    remote.pause(IP).expect("pause");
    assert_eq!(
        remote.transport_state(IP).expect("state"),
        TransportState::PausedPlayback
    );
}

#[test]
fn test_unknown_transport_state_is_a_soap_fault() {
    let remote = fixed_client(200, "<CurrentTransportState>CUSTOM_MODE</CurrentTransportState>");
    assert!(matches!(remote.transport_state(IP), Err(ControlError::SoapFault { .. })));
}

#[test]
fn test_track_info_parses_metadata_and_progress() {
    let (transport, _) = RendererTransport::new();
    let remote = client(transport);

    let track = remote.track_info(IP).expect("track info");
    assert_eq!(track.title, "So What");
    assert_eq!(track.artist, "Miles Davis");
    assert_eq!(track.duration, Duration::from_secs(205));
    assert_eq!(track.position, Duration::from_secs(70));
}

#[test]
fn test_track_info_with_nothing_loaded_reports_defaults() {
    let remote = fixed_client(
        200,
        "<TrackDuration>NOT_IMPLEMENTED</TrackDuration><RelTime>NOT_IMPLEMENTED</RelTime>",
    );
    assert_eq!(remote.track_info(IP).expect("track info"), TrackInfo::default());
}

#[test]
fn test_every_operation_requires_initialization() {
    let (transport, renderer) = RendererTransport::new();
    let mut remote = SonosRemote::with_transport(config(), Box::new(transport));

    assert!(matches!(remote.discover(), Err(ControlError::InvalidDevice)));
    assert!(matches!(remote.set_volume(IP, 10), Err(ControlError::InvalidDevice)));
    assert!(matches!(remote.get_volume(IP), Err(ControlError::InvalidDevice)));
    assert!(matches!(remote.set_mute(IP, true), Err(ControlError::InvalidDevice)));
    assert!(matches!(remote.play(IP), Err(ControlError::InvalidDevice)));
    assert!(matches!(remote.transport_state(IP), Err(ControlError::InvalidDevice)));
    assert!(matches!(remote.track_info(IP), Err(ControlError::InvalidDevice)));
    assert!(renderer.lock().unwrap().actions.is_empty());
}

#[rstest]
#[case("")]
#[case("speaker.local")]
#[case("192.168.1")]
#[case("192.168.1.256")]
fn test_malformed_ip_is_rejected_before_any_request(#[case] bad: &str) {
    let (transport, renderer) = RendererTransport::new();
    let remote = client(transport);

    assert!(matches!(remote.play(bad), Err(ControlError::InvalidParam(_))), "accepted {bad:?}");
    assert!(renderer.lock().unwrap().actions.is_empty());
}

#[test]
fn test_shutdown_resets_the_client() {
    let (transport, _) = RendererTransport::new();
    let mut remote = client(transport);
    assert!(remote.is_initialized());

    remote.shutdown();
    assert!(!remote.is_initialized());
    assert!(remote.devices().is_empty());
    assert!(matches!(remote.set_volume(IP, 10), Err(ControlError::InvalidDevice)));

    remote.init().expect("re-init");
    assert!(remote.is_initialized());
}

#[test]
fn test_empty_discovery_pass_succeeds_and_logs() {
    // Absorbs the outgoing search datagram; nothing ever answers.
    let search_sink = UdpSocket::bind("127.0.0.1:0").expect("bind sink");
    let sink_addr = search_sink.local_addr().expect("sink addr").to_string();

    let mut cfg = config();
    cfg.discovery_timeout = Duration::from_millis(200);
    cfg.enable_logging = true;

    let (transport, _) = RendererTransport::new();
    let mut remote = SonosRemote::with_transport(cfg, Box::new(transport));

    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink_lines = Arc::clone(&lines);
    remote.set_log_sink(move |line| sink_lines.lock().unwrap().push(line.to_string()));

    let found = Arc::new(Mutex::new(0u32));
    let found_count = Arc::clone(&found);
    remote.on_device_found(move |_| *found_count.lock().unwrap() += 1);

    remote.init().expect("init");
    remote.redirect_discovery_group(&sink_addr);

    let outcome = remote.discover();
    assert_eq!(outcome_label(&outcome), "Success");
    assert_eq!(outcome.expect("discover"), 0);
    assert!(remote.devices().is_empty());
    assert_eq!(*found.lock().unwrap(), 0);

    let lines = lines.lock().unwrap();
    assert!(lines.iter().any(|l| l.contains("starting discovery pass")), "lines: {lines:?}");
    assert!(lines.iter().any(|l| l.contains("0 device(s)")), "lines: {lines:?}");
}

#[test]
fn test_log_sink_is_silent_while_logging_is_disabled() {
    let (transport, _) = RendererTransport::new();
    let mut remote = SonosRemote::with_transport(config(), Box::new(transport));

    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink_lines = Arc::clone(&lines);
    remote.set_log_sink(move |line| sink_lines.lock().unwrap().push(line.to_string()));

    remote.init().expect("init");
    remote.set_volume(IP, 10).expect("set");

    assert!(lines.lock().unwrap().is_empty());
}
