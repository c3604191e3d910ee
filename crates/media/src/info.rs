use serde::{Deserialize, Serialize};

/// Raw track metadata as reported by a media controller.
///
/// Any field may be missing; [`MediaInfo::from_metadata`] fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaMetadata {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
}

/// Normalized "now playing" record pushed to the frontend.
///
/// Every field is always present. `MediaInfo::default()` is the
/// "nothing playing" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    pub artist: String,
    pub title: String,
    pub album: String,
    /// Always empty: album art would need bitmap decoding.
    pub cover_url: String,
}

impl MediaInfo {
    /// Normalize controller metadata. A missing record yields the sentinel.
    pub fn from_metadata(metadata: Option<&MediaMetadata>) -> Self {
        let Some(metadata) = metadata else {
            return Self::default();
        };

        Self {
            artist: metadata.artist.clone().unwrap_or_default(),
            title: metadata.title.clone().unwrap_or_default(),
            album: metadata.album.clone().unwrap_or_default(),
            cover_url: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<&MediaMetadata> for MediaInfo {
    fn from(metadata: &MediaMetadata) -> Self {
        Self::from_metadata(Some(metadata))
    }
}
