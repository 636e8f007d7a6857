#![no_main]

use libfuzzer_sys::fuzz_target;
use mpd_core::{parse_duration, Duration};

/// Fuzz the XML duration parser.
///
/// The parser must never panic. Anything it accepts is non-negative and must
/// survive a format/parse roundtrip unchanged.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(d) = parse_duration(text) {
        assert!(!d.is_negative());

        let rendered = d.to_string();
        let reparsed: Duration = rendered.parse().expect("formatted duration must parse");
        assert_eq!(reparsed, d, "{text} -> {rendered}");
    }
});
