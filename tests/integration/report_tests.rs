//! Level reporting tests.
//!
//! Tests verify:
//! - Every level produces one summary, in order
//! - Reporting does not touch cache state
//! - Custom reporters receive the same summaries

use tile_octree::{report_levels, LevelReporter, LevelSummary, TracingReporter};

use super::test_utils::pyramid;

/// Reporter that renders summaries to strings.
#[derive(Default)]
struct LineReporter {
    lines: Vec<String>,
}

impl LevelReporter for LineReporter {
    fn report(&mut self, summary: &LevelSummary) {
        self.lines.push(summary.to_string());
    }
}

#[test]
fn test_report_lines() {
    let pyramid = pyramid(1000, 800, 100);

    let mut reporter = LineReporter::default();
    pyramid.report(&mut reporter);

    assert_eq!(
        reporter.lines,
        vec![
            "Level 0: (1000, 800) = 800000 pixels -> (10, 8) = 80 tiles",
            "Level 1: (500, 400) = 200000 pixels -> (5, 4) = 20 tiles",
            "Level 2: (250, 200) = 50000 pixels -> (3, 2) = 6 tiles",
            "Level 3: (125, 100) = 12500 pixels -> (2, 1) = 2 tiles",
            "Level 4: (62, 50) = 3100 pixels -> (1, 1) = 1 tiles",
        ]
    );
}

#[test]
fn test_reporting_leaves_cache_untouched() {
    let mut pyramid = pyramid(1000, 800, 100);
    pyramid.get_chunk(0, 0, 0, true).unwrap();

    let mut summaries: Vec<LevelSummary> = Vec::new();
    pyramid.report(&mut summaries);
    pyramid.report(&mut TracingReporter);

    assert_eq!(summaries.len(), pyramid.num_levels());
    assert_eq!(pyramid.level(0).unwrap().len(), 1);
    assert!(pyramid.levels()[1..].iter().all(|level| level.is_empty()));
}

#[test]
fn test_report_tail_with_start_level() {
    let pyramid = pyramid(1000, 800, 100);

    let mut summaries: Vec<LevelSummary> = Vec::new();
    report_levels(&pyramid.levels()[3..], 3, &mut summaries);

    let indices: Vec<_> = summaries.iter().map(|s| s.level_index).collect();
    assert_eq!(indices, vec![3, 4]);
    assert_eq!(summaries, pyramid.summaries()[3..].to_vec());
}

#[test]
fn test_dyn_reporter() {
    let pyramid = pyramid(512, 512, 256);

    let mut lines = LineReporter::default();
    let reporter: &mut dyn LevelReporter = &mut lines;
    pyramid.report(reporter);

    assert_eq!(lines.lines.len(), 2);
    assert!(lines.lines[1].ends_with("-> (1, 1) = 1 tiles"));
}
