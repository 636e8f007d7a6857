//! # mpd-core
//!
//! MPEG-DASH media presentation description (MPD) data model.
//!
//! The manifest schema is plain serde-mapped data; the interesting part is
//! the [`Duration`] attribute type, which round-trips through the XML
//! Duration Data Type subset `P[nD][T[nH][nM][nS]]`.
//!
//! ## Crate structure
//!
//! - [`duration`] — Nanosecond `Duration` value, unit ladder, accessors
//! - [`xsd`] — `PnDTnHnMnS` formatter and parser
//! - [`error`] — Duration and manifest error types
//! - [`schema`] — MPD element structs (Period, SegmentTimeline, ...)
//! - [`xml`] — MPD document read/write

pub mod duration;
pub mod error;
pub mod schema;
pub mod xml;
pub mod xsd;

pub use duration::{Duration, HOUR, MICROSECOND, MILLISECOND, MINUTE, NANOSECOND, SECOND};
pub use error::{DurationError, DurationField, ManifestError};
pub use schema::Mpd;
pub use xsd::parse_duration;
