//! Now-playing data model and payload parsing

use serde::{Deserialize, Serialize};

/// Currently playing track, as published by the station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    /// Station name (first payload line)
    pub station: Option<String>,
    /// Track title
    pub title: Option<String>,
    /// Track artist; stations omit it for jingles and unnamed sets
    pub artist: Option<String>,
}

impl NowPlaying {
    /// Parse the two-line now-playing payload.
    ///
    /// Line 1 is the station name; line 2 is `"<title> - <artist>"`, split
    /// on the first `" - "` occurrence so titles containing the separator
    /// later on survive. A missing artist yields `None`, not an error, and
    /// a payload without a second line yields an empty track.
    pub fn parse(payload: &str) -> Self {
        let mut lines = payload.lines();
        let station = lines
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let Some(track_line) = lines.next().map(str::trim).filter(|s| !s.is_empty()) else {
            return Self {
                station,
                title: None,
                artist: None,
            };
        };

        match track_line.split_once(" - ") {
            Some((title, artist)) => Self {
                station,
                title: Some(title.trim().to_string()),
                artist: Some(artist.trim().to_string()),
            },
            None => Self {
                station,
                title: Some(track_line.to_string()),
                artist: None,
            },
        }
    }
}
