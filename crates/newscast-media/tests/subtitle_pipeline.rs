//! End-to-end subtitle generation tests (no encoder required).

use newscast_media::layers::{ticker_excerpt, CompositionGraph, Layer};
use newscast_media::subtitles::{build_subtitle_track, write_srt, TRAILING_PAD_SECS};
use newscast_models::parse_srt_timestamp;

const SCRIPT: &str = "\
Welcome to today's AI briefing. Researchers announced a new open model \
that tops several reasoning benchmarks! Meanwhile, package downloads for \
inference tooling keep climbing. Will the trend continue? Analysts think so.";

#[tokio::test]
async fn srt_file_round_trips_with_valid_timing() {
    let duration = 93.6;
    let track = build_subtitle_track(SCRIPT, duration, "AI DAILY NEWSCAST");
    assert_eq!(track.cues.len(), 5);
    track.validate(TRAILING_PAD_SECS).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("episode_subtitles.srt");
    write_srt(&track, &path).await.unwrap();

    let contents = tokio::fs::read_to_string(&path).await.unwrap();
    let blocks: Vec<&str> = contents.trim_end().split("\n\n").collect();
    assert_eq!(blocks.len(), 5);

    let mut previous_start = -1.0;
    for (i, block) in blocks.iter().enumerate() {
        let mut lines = block.lines();
        let index: usize = lines.next().unwrap().parse().unwrap();
        assert_eq!(index, i + 1);

        let (start_s, end_s) = lines.next().unwrap().split_once(" --> ").unwrap();
        let start = parse_srt_timestamp(start_s).unwrap();
        let end = parse_srt_timestamp(end_s).unwrap();

        assert!(start >= previous_start);
        assert!(end >= start);
        // SRT rendering rounds to milliseconds
        assert!(end <= duration + TRAILING_PAD_SECS + 0.001);
        previous_start = start;

        assert!(!lines.next().unwrap().is_empty());
    }
}

#[tokio::test]
async fn rerunning_produces_identical_subtitle_files() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.srt");
    let second = dir.path().join("second.srt");

    for path in [&first, &second] {
        let track = build_subtitle_track(SCRIPT, 120.0, "AI DAILY NEWSCAST");
        write_srt(&track, path).await.unwrap();
    }

    let a = tokio::fs::read(&first).await.unwrap();
    let b = tokio::fs::read(&second).await.unwrap();
    assert_eq!(a, b);
}

#[test]
fn hostile_script_yields_a_clean_filter_chain() {
    let hostile = r#"Breaking: "quotes" and \backslashes\; also [labels] everywhere."#;

    let mut graph = CompositionGraph::new();
    graph.push(Layer::Background { input_index: 0 });
    graph.push(Layer::BrandText {
        text: hostile.to_string(),
        font_file: "font.ttf".to_string(),
    });
    graph.push(Layer::Ticker {
        text: ticker_excerpt(hostile),
        font_file: "font.ttf".to_string(),
    });

    let serialized = graph.serialize().unwrap();

    // Every drawtext payload must be free of chain-breaking characters
    let mut rest = serialized.filter_complex.as_str();
    while let Some(start) = rest.find("text='") {
        let payload = &rest[start + 6..];
        let end = payload.find('\'').expect("payload must be terminated");
        let inner = &payload[..end];
        assert!(!inner.contains(':'), "colon leaked into payload: {inner}");
        assert!(!inner.contains('\\'), "backslash leaked into payload: {inner}");
        assert!(!inner.contains('"'), "quote leaked into payload: {inner}");
        rest = &payload[end..];
    }
}
