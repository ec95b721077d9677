//! Walk the client surface against whatever renderers answer on the
//! local network: discover, list, then read status from the first one.
//!
//! Run with: cargo run -p sonos-remote --example basic_usage

use std::time::Duration;

use sonos_remote::{outcome_label, ClientConfig, SonosRemote};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut remote = SonosRemote::with_config(ClientConfig {
        discovery_timeout: Duration::from_secs(5),
        enable_logging: true,
        ..ClientConfig::default()
    });
    remote.set_log_sink(|line| eprintln!("[client] {line}"));
    remote.on_device_found(|device| println!("  + {} ({})", device.name, device.ip));

    remote.init()?;

    println!("Searching for renderers...");
    let count = remote.discover()?;
    println!("{count} renderer(s) found");

    let Some(device) = remote.devices().first().cloned() else {
        println!("Nothing to control; check that speakers are on this network");
        return Ok(());
    };

    println!("\nUsing {} at {}", device.name, device.ip);

    let volume = remote.get_volume(&device.ip)?;
    println!("volume: {volume}%");
    println!("muted: {}", remote.get_mute(&device.ip)?);

    let state = remote.transport_state(&device.ip);
    println!("transport: {}", outcome_label(&state));
    if let Ok(state) = state {
        println!("playing: {}", state.is_playing());
    }

    let track = remote.track_info(&device.ip)?;
    if track.title.is_empty() {
        println!("no track loaded");
    } else {
        println!(
            "now playing: {} by {} ({:?} / {:?})",
            track.title, track.artist, track.position, track.duration
        );
    }

    Ok(())
}
