//! Playback status types reported by renderers.

use std::time::Duration;

/// Transport state as reported by GetTransportInfo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Playing,
    PausedPlayback,
    Stopped,
    Transitioning,
}

impl TransportState {
    /// Map a wire token onto a state; `None` for tokens this client does
    /// not model.
    pub(crate) fn from_wire(token: &str) -> Option<Self> {
        match token {
            "PLAYING" => Some(Self::Playing),
            "PAUSED_PLAYBACK" => Some(Self::PausedPlayback),
            "STOPPED" => Some(Self::Stopped),
            "TRANSITIONING" => Some(Self::Transitioning),
            _ => None,
        }
    }

    /// Whether the renderer is producing (or about to produce) audio.
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing | Self::Transitioning)
    }
}

/// Current track metadata and progress.
///
/// Fields default to empty/zero when the renderer reports nothing, which
/// is what a stopped player does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackInfo {
    pub title: String,
    pub artist: String,
    /// Position within the track.
    pub position: Duration,
    /// Total track length.
    pub duration: Duration,
}

/// Parse a renderer clock value of the form `H:MM:SS`.
pub(crate) fn parse_clock(text: &str) -> Option<Duration> {
    let mut parts = text.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes > 59 || seconds > 59 {
        return None;
    }
    Some(Duration::from_secs(hours * 3600 + minutes * 60 + seconds))
}
