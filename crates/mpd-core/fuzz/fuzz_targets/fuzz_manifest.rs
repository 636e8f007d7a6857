#![no_main]

use libfuzzer_sys::fuzz_target;

/// Fuzz MPD document parsing.
///
/// Arbitrary XML must only ever produce an error, never a panic. A parsed
/// document that serializes must read back and serialize to the same text.
/// Text is compared rather than values since `NaN` float attributes are never
/// equal to themselves.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(mpd) = mpd_core::xml::from_xml(text) {
        let _ = mpd.presentation_duration();
        for period in &mpd.periods {
            for set in &period.adaptation_sets {
                if let Some(timeline) = set
                    .segment_template
                    .as_ref()
                    .and_then(|t| t.segment_timeline.as_ref())
                {
                    let _ = timeline.segment_count();
                    let _ = timeline.total_duration();
                }
            }
        }

        if let Ok(xml) = mpd_core::xml::to_xml(&mpd) {
            let again = mpd_core::xml::from_xml(&xml).expect("written MPD must parse");
            let rewritten = mpd_core::xml::to_xml(&again).expect("written MPD must re-serialize");
            assert_eq!(rewritten, xml);
        }
    }
});
