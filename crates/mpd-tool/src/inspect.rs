//! Manifest summary for `mpd-tool inspect`.

use std::fmt;

use mpd_core::schema::{media_time_to_duration, AdaptationSet, Mpd, PresentationType};
use mpd_core::Duration;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ManifestSummary {
    pub presentation_type: Option<&'static str>,
    pub presentation_duration: Option<Duration>,
    pub min_buffer_time: Option<Duration>,
    pub periods: Vec<PeriodSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub id: Option<String>,
    pub start: Option<Duration>,
    pub duration: Option<Duration>,
    pub adaptation_sets: Vec<AdaptationSetSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdaptationSetSummary {
    pub content_type: Option<String>,
    pub representations: usize,
    /// Segments described by the set-level `SegmentTimeline`, if any.
    pub timeline_segments: Option<u64>,
    pub timeline_duration: Option<Duration>,
    pub segment_duration: Option<Duration>,
}

impl ManifestSummary {
    pub fn from_mpd(mpd: &Mpd) -> Self {
        ManifestSummary {
            presentation_type: mpd.presentation_type.map(|t| match t {
                PresentationType::Static => "static",
                PresentationType::Dynamic => "dynamic",
            }),
            presentation_duration: mpd.presentation_duration(),
            min_buffer_time: mpd.min_buffer_time,
            periods: mpd
                .periods
                .iter()
                .map(|p| PeriodSummary {
                    id: p.id.clone(),
                    start: p.start,
                    duration: p.duration,
                    adaptation_sets: p.adaptation_sets.iter().map(summarize_set).collect(),
                })
                .collect(),
        }
    }
}

fn summarize_set(set: &AdaptationSet) -> AdaptationSetSummary {
    let template = set.segment_template.as_ref();
    let timeline = template.and_then(|t| t.segment_timeline.as_ref());
    let timescale = template.and_then(|t| t.timescale).unwrap_or(1);

    AdaptationSetSummary {
        content_type: set
            .content_type
            .clone()
            .or_else(|| set.mime_type.clone()),
        representations: set.representations.len(),
        timeline_segments: timeline.map(|tl| tl.segment_count()),
        timeline_duration: timeline
            .map(|tl| media_time_to_duration(tl.total_duration(), timescale)),
        segment_duration: template.and_then(|t| t.segment_duration()),
    }
}

fn opt(d: Option<Duration>) -> String {
    d.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

impl fmt::Display for ManifestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "type:      {}", self.presentation_type.unwrap_or("static"))?;
        writeln!(f, "duration:  {}", opt(self.presentation_duration))?;
        writeln!(f, "minBuffer: {}", opt(self.min_buffer_time))?;
        for (i, p) in self.periods.iter().enumerate() {
            writeln!(
                f,
                "period {} [{}] start={} duration={}",
                i,
                p.id.as_deref().unwrap_or("-"),
                opt(p.start),
                opt(p.duration)
            )?;
            for set in &p.adaptation_sets {
                write!(
                    f,
                    "  {} x{}",
                    set.content_type.as_deref().unwrap_or("unknown"),
                    set.representations
                )?;
                if let Some(n) = set.timeline_segments {
                    write!(f, " timeline={} segments/{}", n, opt(set.timeline_duration))?;
                }
                if let Some(d) = set.segment_duration {
                    write!(f, " segment={}", d)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mpd_core::{HOUR, SECOND};

    const LIVE: &str = r#"<MPD type="dynamic" minBufferTime="PT2S" timeShiftBufferDepth="PT30S">
  <Period id="live" start="PT0S">
    <AdaptationSet contentType="audio">
      <SegmentTemplate timescale="48000" duration="96000" media="a_$Number$.m4s"/>
      <Representation id="a128" bandwidth="128000"/>
      <Representation id="a64" bandwidth="64000"/>
    </AdaptationSet>
    <AdaptationSet mimeType="video/mp4">
      <SegmentTemplate timescale="1000">
        <SegmentTimeline><S t="0" d="4000" r="9"/></SegmentTimeline>
      </SegmentTemplate>
    </AdaptationSet>
  </Period>
</MPD>"#;

    #[test]
    fn summarizes_live_manifest() {
        let mpd = mpd_core::xml::from_xml(LIVE).unwrap();
        let summary = ManifestSummary::from_mpd(&mpd);
        assert_eq!(summary.presentation_type, Some("dynamic"));
        assert_eq!(summary.presentation_duration, None);
        assert_eq!(summary.min_buffer_time, Some(2 * SECOND));

        let sets = &summary.periods[0].adaptation_sets;
        assert_eq!(sets[0].representations, 2);
        assert_eq!(sets[0].segment_duration, Some(2 * SECOND));
        assert_eq!(sets[0].timeline_segments, None);

        assert_eq!(sets[1].content_type.as_deref(), Some("video/mp4"));
        assert_eq!(sets[1].timeline_segments, Some(10));
        assert_eq!(sets[1].timeline_duration, Some(40 * SECOND));
    }

    #[test]
    fn text_report_renders_durations() {
        let mpd = Mpd {
            media_presentation_duration: Some(HOUR),
            ..Default::default()
        };
        let text = ManifestSummary::from_mpd(&mpd).to_string();
        assert!(text.contains("duration:  PT1H"), "{text}");
        assert!(text.contains("minBuffer: -"), "{text}");
    }

    #[test]
    fn json_report_uses_attribute_text() {
        let mpd = mpd_core::xml::from_xml(LIVE).unwrap();
        let json = serde_json::to_value(ManifestSummary::from_mpd(&mpd)).unwrap();
        assert_eq!(json["min_buffer_time"], "PT2S");
        assert_eq!(json["periods"][0]["adaptation_sets"][1]["timeline_duration"], "PT40S");
    }
}
