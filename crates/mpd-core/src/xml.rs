//! MPD document read/write on top of quick-xml's serde support.

use std::path::Path;

use crate::error::ManifestError;
use crate::schema::Mpd;

/// Parse an MPD document.
///
/// Duration attributes are validated while reading; a malformed value fails
/// the whole document rather than being dropped.
pub fn from_xml(input: &str) -> Result<Mpd, ManifestError> {
    let mpd: Mpd =
        quick_xml::de::from_str(input).map_err(|e| ManifestError::Deserialize(e.to_string()))?;
    tracing::debug!(
        periods = mpd.periods.len(),
        duration = ?mpd.media_presentation_duration,
        "parsed MPD"
    );
    Ok(mpd)
}

/// Serialize an MPD document (without an XML declaration).
pub fn to_xml(mpd: &Mpd) -> Result<String, ManifestError> {
    quick_xml::se::to_string(mpd).map_err(|e| ManifestError::Serialize(e.to_string()))
}

/// Read and parse an MPD file.
pub fn read_file(path: impl AsRef<Path>) -> Result<Mpd, ManifestError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read MPD file");
    from_xml(&text)
}
