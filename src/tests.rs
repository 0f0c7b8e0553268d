#[cfg(test)]
mod session_tests {
    use crate::core::errors::{FontError, PlotError, TransportError};
    use crate::core::session::{PlotSession, WordOutcome};
    use crate::core::settings::{MissingGlyphPolicy, PlotSettings};
    use crate::font_source::FontTable;
    use crate::geometry::DrawingArea;
    use crate::transport::testing::{ScriptedChannel, SharedLog};
    use crate::transport::{Transport, TransportSettings};
    use std::io;
    use std::time::Duration;

    // "A" is a 15 unit bar, "I" a 10 unit bar
    const FONT: &str = "\
999 65 2
0 0 0
15 0 1
999 73 2
0 0 0
10 0 1
";

    fn settings(area: DrawingArea) -> PlotSettings {
        PlotSettings {
            font_size: 18.0,
            area,
            transport: TransportSettings {
                settle: Duration::ZERO,
                ack_timeout: Some(Duration::from_millis(10)),
                ready_timeout: Some(Duration::from_millis(10)),
                feed_rate: 1000,
            },
            ..PlotSettings::default()
        }
    }

    fn words(list: &[&str]) -> Vec<io::Result<String>> {
        list.iter().map(|w| Ok(w.to_string())).collect()
    }

    fn open(settings: &PlotSettings) -> (Transport<ScriptedChannel>, SharedLog) {
        let (channel, log) = ScriptedChannel::grbl();
        (Transport::open(channel, settings.transport).unwrap(), log)
    }

    /// Lines sent after the wake token and the three initialization commands
    fn stream(log: &SharedLog) -> Vec<String> {
        log.borrow().sent[4..].to_vec()
    }

    #[test]
    fn test_single_glyph_round_trip() {
        let font = FontTable::from_source("999 65 2\n0 0 0\n10 0 1\n");
        let settings = settings(DrawingArea::new(100.0, 50.0));
        let (transport, log) = open(&settings);

        let summary = PlotSession::new(&font, &settings, transport)
            .run(words(&["A"]))
            .unwrap();

        assert_eq!(summary.words_drawn, 1);
        assert_eq!(
            stream(&log),
            vec!["G0 X0.000 Y0.000\n", "S1000\n", "G1 X10.000 Y0.000\n", "S0\n", "S0\n"]
        );
        assert!(log.borrow().closed);
    }

    #[test]
    fn test_second_word_follows_word_spacing() {
        let font = FontTable::from_source(FONT);
        let settings = settings(DrawingArea::new(100.0, 50.0));
        let (transport, log) = open(&settings);

        PlotSession::new(&font, &settings, transport)
            .run(words(&["I", "I"]))
            .unwrap();

        // 10mm glyph + 2.7mm letter gap + 14.4mm word gap
        let sent = stream(&log);
        assert_eq!(sent[4], "G0 X27.100 Y0.000\n");
        assert_eq!(sent[6], "G1 X37.100 Y0.000\n");
    }

    #[test]
    fn test_vertical_exhaustion_is_reported() {
        let font = FontTable::from_source(FONT);
        let settings = settings(DrawingArea::new(20.0, 30.0));
        let (transport, log) = open(&settings);

        let error = PlotSession::new(&font, &settings, transport)
            .run(words(&["A", "A", "A", "A"]))
            .unwrap_err();

        match error {
            PlotError::VerticalSpaceExhausted { word, baseline } => {
                assert_eq!(word, "A");
                assert_eq!(baseline, -46.0);
            }
            other => panic!("unexpected error: {other}"),
        }

        let sent = stream(&log);
        // Two words of four lines each, then the closing pen lift
        assert_eq!(sent.len(), 9);
        assert_eq!(sent[4], "G0 X0.000 Y-23.000\n");
        assert!(log.borrow().closed);
    }

    #[test]
    fn test_missing_glyph_ends_run() {
        let font = FontTable::from_source(FONT);
        let settings = settings(DrawingArea::new(100.0, 50.0));
        let (transport, log) = open(&settings);

        let error = PlotSession::new(&font, &settings, transport)
            .run(words(&["AB", "A"]))
            .unwrap_err();

        assert!(matches!(error, PlotError::GlyphNotFound { ref word, .. } if word == "AB"));
        assert_eq!(stream(&log), vec!["S0\n"]);
        assert!(log.borrow().closed);
    }

    #[test]
    fn test_missing_glyph_can_be_skipped() {
        let font = FontTable::from_source(FONT);
        let mut settings = settings(DrawingArea::new(100.0, 50.0));
        settings.missing_glyphs = MissingGlyphPolicy::SkipWord;
        let (transport, _log) = open(&settings);

        let summary = PlotSession::new(&font, &settings, transport)
            .run(words(&["B", "A", "ZZ"]))
            .unwrap();

        assert_eq!(summary.words_drawn, 1);
        assert_eq!(summary.words_skipped, 2);
    }

    #[test]
    fn test_draw_word_outcomes() {
        let font = FontTable::from_source(FONT);
        let mut settings = settings(DrawingArea::new(100.0, 50.0));
        settings.missing_glyphs = MissingGlyphPolicy::SkipWord;
        let (transport, _log) = open(&settings);
        let mut session = PlotSession::new(&font, &settings, transport);

        assert_eq!(session.draw_word("I").unwrap(), WordOutcome::Drawn { commands: 4 });
        assert_eq!(session.draw_word("Q").unwrap(), WordOutcome::Skipped);
        assert!(session.cursor().x > 0.0);
    }

    #[test]
    fn test_non_ascii_word_is_rejected() {
        let font = FontTable::from_source(FONT);
        let settings = settings(DrawingArea::new(100.0, 50.0));
        let (transport, _log) = open(&settings);

        let error = PlotSession::new(&font, &settings, transport)
            .run(words(&["Aé"]))
            .unwrap_err();

        assert!(matches!(error, PlotError::EncodingMismatch { .. }));
        assert!(error.to_string().contains("Aé"));
    }

    #[test]
    fn test_silent_device_becomes_transport_fault() {
        let font = FontTable::from_source(FONT);
        let settings = settings(DrawingArea::new(100.0, 50.0));
        let (channel, log) = ScriptedChannel::with_replies(["$\r\n", "ok\r\n", "ok\r\n", "ok\r\n", "ok\r\n"]);
        let transport = Transport::open(channel, settings.transport).unwrap();

        let error = PlotSession::new(&font, &settings, transport)
            .run(words(&["A"]))
            .unwrap_err();

        assert!(matches!(
            error,
            PlotError::Transport(TransportError::AcknowledgmentTimeout { .. })
        ));
        assert!(log.borrow().closed);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_allocation_failure_is_never_skipped() {
        let font = FontTable::from_source("999 65 9223372036854775807\n0 0 0\n");
        let mut settings = settings(DrawingArea::new(100.0, 50.0));
        settings.missing_glyphs = MissingGlyphPolicy::SkipWord;
        let (transport, log) = open(&settings);
        let mut session = PlotSession::new(&font, &settings, transport);

        let error = session.draw_word("A").unwrap_err();

        assert!(matches!(
            error,
            PlotError::AllocationFailure { ref word, source: FontError::Allocation { code: 65, .. } }
                if word == "A"
        ));
        assert!(stream(&log).is_empty());
    }

    #[test]
    fn test_cursor_never_moves_up() {
        let font = FontTable::from_source(FONT);
        let settings = settings(DrawingArea::new(40.0, 500.0));
        let (transport, _log) = open(&settings);
        let mut session = PlotSession::new(&font, &settings, transport);

        let mut previous_y = session.cursor().y;
        for _ in 0..12 {
            session.draw_word("AI").unwrap();
            let y = session.cursor().y;
            assert!(y <= previous_y);
            previous_y = y;
        }
        assert!(previous_y < 0.0);
    }
}

#[cfg(test)]
mod pipeline_tests {
    use crate::core::errors::PlotError;
    use crate::core::session::PlotSession;
    use crate::core::settings::PlotSettings;
    use crate::font_source::FontTable;
    use crate::io::WordReader;
    use crate::transport::{DryRunChannel, Transport, TransportSettings};
    use std::fs;
    use std::io::BufReader;
    use std::time::Duration;

    #[test]
    fn test_text_file_to_gcode_program() {
        let dir = tempfile::tempdir().unwrap();
        let font_path = dir.path().join("font.txt");
        let text_path = dir.path().join("text.txt");
        fs::write(&font_path, "999 72 3\n0 0 0\n0 18 1\n9 18 1\n999 105 2\n0 0 0\n0 9 1\n").unwrap();
        fs::write(&text_path, "Hi\n  iH\n").unwrap();

        let font = FontTable::load(&font_path).unwrap();
        let text = fs::File::open(&text_path).unwrap();
        let settings = PlotSettings {
            font_size: 9.0,
            transport: TransportSettings {
                settle: Duration::ZERO,
                ..TransportSettings::default()
            },
            ..PlotSettings::default()
        };

        let mut program = Vec::new();
        let summary = {
            let transport =
                Transport::open(DryRunChannel::new(&mut program), settings.transport).unwrap();
            PlotSession::new(&font, &settings, transport)
                .run(WordReader::new(BufReader::new(text)))
                .unwrap()
        };

        assert_eq!(summary.words_drawn, 2);
        let program = String::from_utf8(program).unwrap();
        let lines: Vec<&str> = program.lines().collect();
        assert_eq!(&lines[..3], &["G1 X0 Y0 F1000", "M3", "S0"]);
        assert_eq!(lines[3], "G0 X0.000 Y0.000");
        assert_eq!(lines[4], "S1000");
        assert_eq!(lines[5], "G1 X0.000 Y9.000");
        assert_eq!(lines.last(), Some(&"S0"));
        assert!(lines.iter().all(|line| !line.is_empty()));
    }

    #[test]
    fn test_invalid_text_byte_fails_only_its_word() {
        let font = FontTable::from_source("999 65 2\n0 0 0\n10 0 1\n");
        let settings = PlotSettings {
            transport: TransportSettings {
                settle: Duration::ZERO,
                ..TransportSettings::default()
            },
            ..PlotSettings::default()
        };

        let mut program = Vec::new();
        let error = {
            let transport =
                Transport::open(DryRunChannel::new(&mut program), settings.transport).unwrap();
            PlotSession::new(&font, &settings, transport)
                .run(WordReader::new(&b"A A caf\xe9\n"[..]))
                .unwrap_err()
        };

        assert!(matches!(error, PlotError::EncodingMismatch { ref word, .. } if word.starts_with("caf")));
        assert!(error.to_string().contains("caf"));
        let program = String::from_utf8(program).unwrap();
        assert_eq!(program.matches("S1000").count(), 2);
    }
}
