//! MPD element structs.
//!
//! Plain data mapped with serde using quick-xml naming: `@name` fields are
//! XML attributes, everything else is a child element. Optional attributes
//! are `Option` so that an absent attribute stays distinguishable from a
//! malformed one (which fails deserialization).

use serde::{Deserialize, Serialize};

use crate::duration::{Duration, SECOND};

// ── MPD ─────────────────────────────────────────────────────────────

/// Root `MPD` element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "MPD")]
pub struct Mpd {
    #[serde(rename = "@xmlns", skip_serializing_if = "Option::is_none")]
    pub xmlns: Option<String>,
    #[serde(rename = "@profiles", skip_serializing_if = "Option::is_none")]
    pub profiles: Option<String>,
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub presentation_type: Option<PresentationType>,
    #[serde(
        rename = "@availabilityStartTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub availability_start_time: Option<String>,
    #[serde(
        rename = "@mediaPresentationDuration",
        skip_serializing_if = "Option::is_none"
    )]
    pub media_presentation_duration: Option<Duration>,
    #[serde(rename = "@minBufferTime", skip_serializing_if = "Option::is_none")]
    pub min_buffer_time: Option<Duration>,
    #[serde(
        rename = "@minimumUpdatePeriod",
        skip_serializing_if = "Option::is_none"
    )]
    pub minimum_update_period: Option<Duration>,
    #[serde(
        rename = "@timeShiftBufferDepth",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_shift_buffer_depth: Option<Duration>,
    #[serde(
        rename = "@maxSegmentDuration",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_segment_duration: Option<Duration>,
    #[serde(
        rename = "@suggestedPresentationDelay",
        skip_serializing_if = "Option::is_none"
    )]
    pub suggested_presentation_delay: Option<Duration>,
    #[serde(rename = "BaseURL", default, skip_serializing_if = "Vec::is_empty")]
    pub base_urls: Vec<String>,
    #[serde(rename = "Period", default, skip_serializing_if = "Vec::is_empty")]
    pub periods: Vec<Period>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationType {
    Static,
    Dynamic,
}

impl Mpd {
    /// `@mediaPresentationDuration`, or the sum of the period durations when
    /// every period declares one. `None` if the sum overflows.
    pub fn presentation_duration(&self) -> Option<Duration> {
        if let Some(d) = self.media_presentation_duration {
            return Some(d);
        }
        if self.periods.is_empty() {
            return None;
        }
        self.periods
            .iter()
            .try_fold(Duration::ZERO, |acc, p| acc.checked_add(p.duration?))
    }
}

// ── Period / AdaptationSet / Representation ─────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Period {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "@start", skip_serializing_if = "Option::is_none")]
    pub start: Option<Duration>,
    #[serde(rename = "@duration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
    #[serde(rename = "BaseURL", default, skip_serializing_if = "Vec::is_empty")]
    pub base_urls: Vec<String>,
    #[serde(
        rename = "AdaptationSet",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub adaptation_sets: Vec<AdaptationSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptationSet {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    #[serde(rename = "@contentType", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "@mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(rename = "@lang", skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(
        rename = "@segmentAlignment",
        skip_serializing_if = "Option::is_none"
    )]
    pub segment_alignment: Option<bool>,
    #[serde(
        rename = "SegmentTemplate",
        skip_serializing_if = "Option::is_none"
    )]
    pub segment_template: Option<SegmentTemplate>,
    #[serde(
        rename = "Representation",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub representations: Vec<Representation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Representation {
    #[serde(rename = "@id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "@bandwidth", skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<u64>,
    #[serde(rename = "@width", skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(rename = "@height", skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "@frameRate", skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<String>,
    #[serde(rename = "@codecs", skip_serializing_if = "Option::is_none")]
    pub codecs: Option<String>,
    #[serde(rename = "@mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(rename = "BaseURL", default, skip_serializing_if = "Vec::is_empty")]
    pub base_urls: Vec<String>,
    #[serde(rename = "SegmentBase", skip_serializing_if = "Option::is_none")]
    pub segment_base: Option<SegmentBase>,
    #[serde(rename = "SegmentList", skip_serializing_if = "Option::is_none")]
    pub segment_list: Option<SegmentList>,
    #[serde(
        rename = "SegmentTemplate",
        skip_serializing_if = "Option::is_none"
    )]
    pub segment_template: Option<SegmentTemplate>,
}

// ── Segment addressing ──────────────────────────────────────────────

/// Single-segment addressing (`SegmentBase`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentBase {
    #[serde(rename = "@timescale", skip_serializing_if = "Option::is_none")]
    pub timescale: Option<u32>,
    #[serde(
        rename = "@presentationTimeOffset",
        skip_serializing_if = "Option::is_none"
    )]
    pub presentation_time_offset: Option<u64>,
    #[serde(rename = "@indexRange", skip_serializing_if = "Option::is_none")]
    pub index_range: Option<String>,
    #[serde(rename = "@indexRangeExact", skip_serializing_if = "Option::is_none")]
    pub index_range_exact: Option<bool>,
    #[serde(
        rename = "@availabilityTimeOffset",
        skip_serializing_if = "Option::is_none"
    )]
    pub availability_time_offset: Option<f64>,
    #[serde(
        rename = "@availabilityTimeComplete",
        skip_serializing_if = "Option::is_none"
    )]
    pub availability_time_complete: Option<bool>,
    #[serde(rename = "Initialization", skip_serializing_if = "Option::is_none")]
    pub initialization: Option<Url>,
    #[serde(
        rename = "RepresentationIndex",
        skip_serializing_if = "Option::is_none"
    )]
    pub representation_index: Option<Url>,
}

impl SegmentBase {
    /// `@presentationTimeOffset` as elapsed time.
    pub fn presentation_offset(&self) -> Duration {
        media_time_to_duration(
            self.presentation_time_offset.unwrap_or(0),
            self.timescale.unwrap_or(1),
        )
    }
}

/// Explicit segment list (`SegmentList`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentList {
    #[serde(rename = "@timescale", skip_serializing_if = "Option::is_none")]
    pub timescale: Option<u32>,
    #[serde(
        rename = "@presentationTimeOffset",
        skip_serializing_if = "Option::is_none"
    )]
    pub presentation_time_offset: Option<u64>,
    #[serde(rename = "@duration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(rename = "@startNumber", skip_serializing_if = "Option::is_none")]
    pub start_number: Option<u64>,
    #[serde(rename = "@indexRange", skip_serializing_if = "Option::is_none")]
    pub index_range: Option<String>,
    #[serde(rename = "@indexRangeExact", skip_serializing_if = "Option::is_none")]
    pub index_range_exact: Option<bool>,
    #[serde(
        rename = "@availabilityTimeOffset",
        skip_serializing_if = "Option::is_none"
    )]
    pub availability_time_offset: Option<f64>,
    #[serde(
        rename = "@availabilityTimeComplete",
        skip_serializing_if = "Option::is_none"
    )]
    pub availability_time_complete: Option<bool>,
    #[serde(rename = "Initialization", skip_serializing_if = "Option::is_none")]
    pub initialization: Option<Url>,
    #[serde(
        rename = "RepresentationIndex",
        skip_serializing_if = "Option::is_none"
    )]
    pub representation_index: Option<Url>,
    #[serde(rename = "SegmentTimeline", skip_serializing_if = "Option::is_none")]
    pub segment_timeline: Option<SegmentTimeline>,
    #[serde(
        rename = "BitstreamSwitching",
        skip_serializing_if = "Option::is_none"
    )]
    pub bitstream_switching: Option<Url>,
    #[serde(rename = "SegmentURL", default, skip_serializing_if = "Vec::is_empty")]
    pub segment_urls: Vec<SegmentUrl>,
}

impl SegmentList {
    /// Nominal segment length from `@duration` / `@timescale`.
    pub fn segment_duration(&self) -> Option<Duration> {
        self.duration
            .map(|d| media_time_to_duration(d, self.timescale.unwrap_or(1)))
    }
}

/// Template-based addressing (`SegmentTemplate`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentTemplate {
    #[serde(rename = "@timescale", skip_serializing_if = "Option::is_none")]
    pub timescale: Option<u32>,
    #[serde(
        rename = "@presentationTimeOffset",
        skip_serializing_if = "Option::is_none"
    )]
    pub presentation_time_offset: Option<u64>,
    #[serde(rename = "@duration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(rename = "@startNumber", skip_serializing_if = "Option::is_none")]
    pub start_number: Option<u64>,
    #[serde(rename = "@media", skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(rename = "@initialization", skip_serializing_if = "Option::is_none")]
    pub initialization: Option<String>,
    #[serde(rename = "@index", skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(rename = "@indexRange", skip_serializing_if = "Option::is_none")]
    pub index_range: Option<String>,
    #[serde(rename = "@indexRangeExact", skip_serializing_if = "Option::is_none")]
    pub index_range_exact: Option<bool>,
    #[serde(
        rename = "@availabilityTimeOffset",
        skip_serializing_if = "Option::is_none"
    )]
    pub availability_time_offset: Option<f64>,
    #[serde(
        rename = "@availabilityTimeComplete",
        skip_serializing_if = "Option::is_none"
    )]
    pub availability_time_complete: Option<bool>,
    /// `Initialization` element, as opposed to the `@initialization` template.
    #[serde(rename = "Initialization", skip_serializing_if = "Option::is_none")]
    pub initialization_url: Option<Url>,
    #[serde(
        rename = "RepresentationIndex",
        skip_serializing_if = "Option::is_none"
    )]
    pub representation_index: Option<Url>,
    #[serde(rename = "SegmentTimeline", skip_serializing_if = "Option::is_none")]
    pub segment_timeline: Option<SegmentTimeline>,
    #[serde(
        rename = "BitstreamSwitching",
        skip_serializing_if = "Option::is_none"
    )]
    pub bitstream_switching: Option<Url>,
}

impl SegmentTemplate {
    /// Nominal segment length from `@duration` / `@timescale`.
    pub fn segment_duration(&self) -> Option<Duration> {
        self.duration
            .map(|d| media_time_to_duration(d, self.timescale.unwrap_or(1)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentUrl {
    #[serde(rename = "@media", skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    #[serde(rename = "@mediaRange", skip_serializing_if = "Option::is_none")]
    pub media_range: Option<String>,
    #[serde(rename = "@index", skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(rename = "@indexRange", skip_serializing_if = "Option::is_none")]
    pub index_range: Option<String>,
}

/// `Initialization` / `RepresentationIndex` reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Url {
    #[serde(rename = "@sourceURL", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(rename = "@range", skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

// ── SegmentTimeline ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentTimeline {
    #[serde(rename = "S", default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<SegmentTimelineSegment>,
}

/// One `S` element: a run of `@r + 1` segments of length `@d`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentTimelineSegment {
    #[serde(rename = "@t", skip_serializing_if = "Option::is_none")]
    pub start_time: Option<u64>,
    #[serde(rename = "@d")]
    pub duration: u64,
    #[serde(rename = "@r", skip_serializing_if = "Option::is_none")]
    pub repeat_count: Option<i64>,
}

/// A single media segment resolved from a timeline, in timescale units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEntry {
    pub start: u64,
    pub duration: u64,
}

/// A run of equal-length segments after `@t` and `@r` are resolved.
#[derive(Debug, Clone, Copy)]
struct Run {
    start: u64,
    duration: u64,
    count: u64,
}

impl SegmentTimeline {
    /// Resolve each `S` into a run.
    ///
    /// A missing `@t` continues from the end of the previous run. A negative
    /// `@r` repeats up to the next `S@t`; on the last `S` there is no bound,
    /// so the run holds a single segment.
    fn runs(&self) -> Vec<Run> {
        let mut runs = Vec::with_capacity(self.segments.len());
        let mut cursor = 0u64;

        for (i, s) in self.segments.iter().enumerate() {
            let start = s.start_time.unwrap_or(cursor);
            let count = match s.repeat_count {
                _ if s.duration == 0 => 1,
                Some(r) if r < 0 => {
                    match self.segments.get(i + 1).and_then(|next| next.start_time) {
                        Some(next_t) => next_t.saturating_sub(start).div_ceil(s.duration).max(1),
                        None => 1,
                    }
                }
                Some(r) => r as u64 + 1,
                None => 1,
            };
            cursor = start.saturating_add(count.saturating_mul(s.duration));
            runs.push(Run {
                start,
                duration: s.duration,
                count,
            });
        }
        runs
    }

    /// Expand `S` runs into individual segments.
    pub fn entries(&self) -> impl Iterator<Item = TimelineEntry> {
        self.runs().into_iter().flat_map(|run| {
            (0..run.count).map(move |k| TimelineEntry {
                start: run.start.saturating_add(k.saturating_mul(run.duration)),
                duration: run.duration,
            })
        })
    }

    /// Number of segments described, without expanding them.
    pub fn segment_count(&self) -> u64 {
        self.runs()
            .iter()
            .fold(0u64, |acc, run| acc.saturating_add(run.count))
    }

    /// Total length of the timeline, in timescale units.
    pub fn total_duration(&self) -> u64 {
        self.runs().iter().fold(0u64, |acc, run| {
            acc.saturating_add(run.count.saturating_mul(run.duration))
        })
    }
}

/// Convert a count of `timescale` units into elapsed time, truncating below
/// one tick. A zero timescale is treated as 1. Saturates at the largest
/// representable duration.
pub fn media_time_to_duration(units: u64, timescale: u32) -> Duration {
    let ts = u128::from(timescale.max(1));
    let per_sec = SECOND.as_nanos() as u128;
    let units = u128::from(units);
    let nanos = (units / ts) * per_sec + (units % ts) * per_sec / ts;
    Duration::from_nanos(i64::try_from(nanos).unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::{HOUR, MILLISECOND, MINUTE};

    fn s(t: Option<u64>, d: u64, r: Option<i64>) -> SegmentTimelineSegment {
        SegmentTimelineSegment {
            start_time: t,
            duration: d,
            repeat_count: r,
        }
    }

    #[test]
    fn timeline_expands_repeats() {
        let tl = SegmentTimeline {
            segments: vec![s(Some(0), 90_000, Some(2)), s(None, 45_000, None)],
        };
        let starts: Vec<u64> = tl.entries().map(|e| e.start).collect();
        assert_eq!(starts, vec![0, 90_000, 180_000, 270_000]);
        assert_eq!(tl.segment_count(), 4);
        assert_eq!(tl.total_duration(), 315_000);
    }

    #[test]
    fn timeline_explicit_start_resets_cursor() {
        let tl = SegmentTimeline {
            segments: vec![s(Some(100), 10, None), s(Some(500), 10, Some(1))],
        };
        let entries: Vec<TimelineEntry> = tl.entries().collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].start, 500);
        assert_eq!(entries[2].start, 510);
    }

    #[test]
    fn negative_repeat_fills_to_next_start() {
        let tl = SegmentTimeline {
            segments: vec![s(Some(0), 4, Some(-1)), s(Some(10), 4, None)],
        };
        let starts: Vec<u64> = tl.entries().map(|e| e.start).collect();
        assert_eq!(starts, vec![0, 4, 8, 10]);
    }

    #[test]
    fn negative_repeat_on_last_segment_is_single() {
        let tl = SegmentTimeline {
            segments: vec![s(Some(0), 4, Some(-1))],
        };
        assert_eq!(tl.entries().count(), 1);
    }

    #[test]
    fn zero_duration_segment_does_not_repeat() {
        let tl = SegmentTimeline {
            segments: vec![s(Some(0), 0, Some(1_000_000))],
        };
        assert_eq!(tl.entries().count(), 1);
    }

    #[test]
    fn huge_repeat_is_counted_without_expanding() {
        let tl = SegmentTimeline {
            segments: vec![s(Some(0), 2, Some(i64::MAX))],
        };
        assert_eq!(tl.segment_count(), 1u64 << 63);
        assert_eq!(tl.total_duration(), u64::MAX);
        assert_eq!(tl.entries().nth(3).map(|e| e.start), Some(6));
    }

    #[test]
    fn media_time_conversion() {
        assert_eq!(media_time_to_duration(90_000, 90_000), SECOND);
        assert_eq!(media_time_to_duration(45_000, 90_000), 500 * MILLISECOND);
        assert_eq!(media_time_to_duration(1, 3), Duration::from_nanos(333_333_333));
        assert_eq!(media_time_to_duration(7, 0), 7 * SECOND);
        assert_eq!(
            media_time_to_duration(u64::MAX, 1),
            Duration::from_nanos(i64::MAX)
        );
    }

    #[test]
    fn template_segment_duration() {
        let tpl = SegmentTemplate {
            timescale: Some(1000),
            duration: Some(4000),
            ..Default::default()
        };
        assert_eq!(tpl.segment_duration(), Some(4 * SECOND));
        assert_eq!(SegmentTemplate::default().segment_duration(), None);
    }

    #[test]
    fn segment_base_offset() {
        let base = SegmentBase {
            timescale: Some(48_000),
            presentation_time_offset: Some(96_000),
            ..Default::default()
        };
        assert_eq!(base.presentation_offset(), 2 * SECOND);
    }

    #[test]
    fn presentation_duration_falls_back_to_periods() {
        let mut mpd = Mpd {
            periods: vec![
                Period {
                    duration: Some(HOUR),
                    ..Default::default()
                },
                Period {
                    duration: Some(30 * MINUTE),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(mpd.presentation_duration(), Some(HOUR + 30 * MINUTE));

        mpd.periods.push(Period::default());
        assert_eq!(mpd.presentation_duration(), None);

        mpd.media_presentation_duration = Some(MINUTE);
        assert_eq!(mpd.presentation_duration(), Some(MINUTE));

        assert_eq!(Mpd::default().presentation_duration(), None);
    }

    #[test]
    fn presentation_duration_overflow_is_none() {
        let long = Period {
            duration: Some(2_562_047 * HOUR),
            ..Default::default()
        };
        let mpd = Mpd {
            periods: vec![long.clone(), long],
            ..Default::default()
        };
        assert_eq!(mpd.presentation_duration(), None);
    }
}
