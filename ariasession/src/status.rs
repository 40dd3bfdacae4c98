//! Read-only status snapshot exposed to presentation layers

use serde::Serialize;

/// The tuple of booleans a UI needs to render the playback button and its
/// indicators. Published on a watch channel by the session controller;
/// field names serialize in camelCase to match the web UI contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    /// True only between a `Started` event and the next `Paused`/`Ended`
    pub is_playing: bool,
    /// Mirror of the shared loading signal
    pub is_loading: bool,
    /// True while the retry timer is armed
    pub is_reconnecting: bool,
    /// True after a load failure until a new attempt successfully starts
    pub is_stream_dead: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_camel_case() {
        let status = StatusSnapshot {
            is_playing: true,
            is_loading: false,
            is_reconnecting: false,
            is_stream_dead: false,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["isPlaying"], true);
        assert_eq!(json["isLoading"], false);
        assert_eq!(json["isReconnecting"], false);
        assert_eq!(json["isStreamDead"], false);
    }
}
