// DRCScope - tests/e2e_pipeline.rs
//
// End-to-end tests for the discovery, ingestion, and aggregation pipeline.
//
// These tests exercise the real filesystem, real walkdir traversal, real
// rayon ingestion, and real CSV/JSON export: from raw report files on disk
// to the dashboard and its exported forms.

use drcscope::app::ingest::{ingest_files, IngestConfig};
use drcscope::app::state::{AppState, SessionView};
use drcscope::core::aggregate::aggregate;
use drcscope::core::discovery::{discover_reports, DiscoveryConfig};
use drcscope::core::export::{export_csv, export_json};
use drcscope::core::model::{BlockStatus, Category, Readiness};
use drcscope::core::parser::parse_content;
use drcscope::ui::report::render_text;
use std::fs;
use std::path::PathBuf;

// =============================================================================
// Helpers
// =============================================================================

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Discover, ingest, and load a set of paths into a fresh session.
fn run_pipeline(paths: &[PathBuf]) -> AppState {
    let (files, warnings) = discover_reports(paths, &DiscoveryConfig::default()).unwrap();
    let outcome = ingest_files(&files, &IngestConfig::default()).unwrap();
    let mut state = AppState::new(false);
    state.warnings.extend(warnings);
    state.load(outcome);
    state
}

// =============================================================================
// Discovery E2E
// =============================================================================

/// Walking the fixtures directory finds every .rpt and .summary file,
/// nested ones included, and skips unrelated files.
#[test]
fn e2e_discovers_fixture_reports() {
    let (files, warnings) =
        discover_reports(&[fixtures_dir()], &DiscoveryConfig::default()).unwrap();
    assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");

    let names: Vec<_> = files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_str().unwrap().to_string())
        .collect();

    assert_eq!(names.len(), 4, "got {names:?}");
    for expected in [
        "blockA.rpt",
        "clean_block.rpt",
        "crlf_block.rpt",
        "dense_block.summary",
    ] {
        assert!(
            names.contains(&expected.to_string()),
            "expected {expected} in {names:?}"
        );
    }
    assert!(!names.contains(&"notes.txt".to_string()));
}

#[test]
fn e2e_missing_root_is_fatal() {
    let missing = fixtures_dir().join("does_not_exist");
    assert!(discover_reports(&[missing], &DiscoveryConfig::default()).is_err());
}

// =============================================================================
// Single report
// =============================================================================

/// One WIDTH rule with three results: one WARNING block, one Width cell.
#[test]
fn e2e_single_width_result() {
    let result = parse_content(
        "RULECHECK M1.MIN_WIDTH .......... TOTAL Result Count = 3",
        "blockA.rpt",
    );
    let agg = aggregate(&result.records);

    assert_eq!(agg.total_count, 3);
    assert_eq!(agg.blocks.len(), 1);
    assert_eq!(agg.blocks[0].status, BlockStatus::Warning);
    assert_eq!(agg.categories.get("blockA.rpt", Category::Width), 3);
    assert_eq!(Readiness::from_total(agg.total_count), Readiness::ActionRequired);
}

/// A report without result lines contributes a CLEAN block alongside a
/// report that has results.
#[test]
fn e2e_clean_block_alongside_results() {
    let state = run_pipeline(&[fixture("blockA.rpt"), fixture("clean_block.rpt")]);
    let dashboard = state.dashboard().expect("results expected");

    assert_eq!(dashboard.file_count, 2);
    assert_eq!(dashboard.total_violations, 4);

    let clean = dashboard
        .blocks
        .iter()
        .find(|b| b.source_file == "clean_block.rpt")
        .expect("clean block row");
    assert_eq!(clean.total_count, 0);
    assert_eq!(clean.status, BlockStatus::Clean);

    let row = dashboard.categories.row("clean_block.rpt").unwrap();
    assert_eq!(row.total(), 0);
}

#[test]
fn e2e_only_clean_reports_is_ready() {
    let state = run_pipeline(&[fixture("clean_block.rpt")]);
    assert!(matches!(
        state.view,
        SessionView::NoViolations { file_count: 1 }
    ));
    assert_eq!(state.verdict(), Some(Readiness::Ready));
    assert!(render_text(&state).contains("No DRC violations found"));
}

// =============================================================================
// Whole-directory run
// =============================================================================

#[test]
fn e2e_directory_run_aggregates_all_blocks() {
    let state = run_pipeline(&[fixtures_dir()]);
    let dashboard = state.dashboard().expect("results expected");

    assert_eq!(dashboard.file_count, 4);
    assert_eq!(dashboard.total_violations, 19);
    assert_eq!(dashboard.verdict, Readiness::ActionRequired);

    let status_of = |name: &str| {
        dashboard
            .blocks
            .iter()
            .find(|b| b.source_file == name)
            .map(|b| (b.total_count, b.status))
    };
    assert_eq!(status_of("blockA.rpt"), Some((4, BlockStatus::Warning)));
    assert_eq!(status_of("clean_block.rpt"), Some((0, BlockStatus::Clean)));
    assert_eq!(status_of("crlf_block.rpt"), Some((3, BlockStatus::Warning)));
    assert_eq!(
        status_of("dense_block.summary"),
        Some((12, BlockStatus::Fail))
    );

    let table = &dashboard.categories;
    assert_eq!(table.get("blockA.rpt", Category::Width), 3);
    assert_eq!(table.get("blockA.rpt", Category::Enclosure), 1);
    assert_eq!(table.get("crlf_block.rpt", Category::Spacing), 2);
    assert_eq!(table.get("crlf_block.rpt", Category::General), 1);
    assert_eq!(table.get("dense_block.summary", Category::Density), 12);
    assert_eq!(table.total(), dashboard.total_violations);

    let block_sum: u64 = dashboard.blocks.iter().map(|b| b.total_count).sum();
    assert_eq!(block_sum, dashboard.total_violations);
}

/// CRLF line endings parse the same as LF.
#[test]
fn e2e_crlf_report_parses() {
    let bytes = fs::read(fixture("nested/crlf_block.rpt")).unwrap();
    let content = String::from_utf8(bytes).unwrap();
    let result = parse_content(&content, "crlf_block.rpt");

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.records[0].rule, "GATE_SEP");
    assert_eq!(result.records[0].category, Category::Spacing);
    assert_eq!(result.records[1].category, Category::General);
}

/// Same-named reports in sibling directories stay separate blocks.
#[test]
fn e2e_same_file_name_in_sibling_dirs_stays_separate() {
    let dir = tempfile::tempdir().unwrap();
    for block in ["blockA", "blockB"] {
        let sub = dir.path().join(block);
        fs::create_dir(&sub).unwrap();
        fs::write(
            sub.join("drc.rpt"),
            "RULECHECK M1.MIN_WIDTH .. TOTAL Result Count = 3\n",
        )
        .unwrap();
    }

    let state = run_pipeline(&[dir.path().to_path_buf()]);
    let dashboard = state.dashboard().expect("results expected");

    assert_eq!(dashboard.file_count, 2);
    assert_eq!(dashboard.total_violations, 6);
    assert_eq!(dashboard.blocks.len(), 2);
    for block in &dashboard.blocks {
        assert_eq!(block.total_count, 3);
        assert_eq!(block.status, BlockStatus::Warning);
        assert!(block.source_file.ends_with("drc.rpt"));
    }
    assert!(
        state.warnings.iter().any(|w| w.contains("drc.rpt")),
        "warnings: {:?}",
        state.warnings
    );
}

// =============================================================================
// Decode failures
// =============================================================================

#[test]
fn e2e_invalid_utf8_is_skipped_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("good.rpt"),
        "RULECHECK M1.MIN_WIDTH .. TOTAL Result Count = 2\n",
    )
    .unwrap();
    fs::write(dir.path().join("bad.rpt"), [0x52u8, 0xFF, 0xFE, 0x0A]).unwrap();

    let state = run_pipeline(&[dir.path().to_path_buf()]);
    let dashboard = state.dashboard().expect("good report still ingested");
    assert_eq!(dashboard.file_count, 1);
    assert_eq!(dashboard.total_violations, 2);
    assert!(
        state.warnings.iter().any(|w| w.contains("bad.rpt")),
        "warnings: {:?}",
        state.warnings
    );
}

#[test]
fn e2e_invalid_utf8_aborts_in_strict_mode() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.rpt"), [0xC3u8, 0x28]).unwrap();

    let (files, _) =
        discover_reports(&[dir.path().to_path_buf()], &DiscoveryConfig::default()).unwrap();
    let config = IngestConfig {
        strict: true,
        ..IngestConfig::default()
    };
    assert!(ingest_files(&files, &config).is_err());
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_exports_written_to_disk() {
    let state = run_pipeline(&[fixture("blockA.rpt"), fixture("nested/dense_block.summary")]);
    let dashboard = state.dashboard().unwrap();
    let dir = tempfile::tempdir().unwrap();

    let csv_path = dir.path().join("violations.csv");
    let written = export_csv(
        &dashboard.records,
        fs::File::create(&csv_path).unwrap(),
        &csv_path,
    )
    .unwrap();
    assert_eq!(written, 6);

    let csv_text = fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv_text.lines();
    assert_eq!(lines.next(), Some("layer,rule,count,filename,Category"));
    assert_eq!(lines.next(), Some("M1,MIN_WIDTH,3,blockA.rpt,Width"));
    assert!(csv_text.contains("M3,DENSITY_MIN,10,dense_block.summary,Density"));

    let json_path = dir.path().join("dashboard.json");
    export_json(
        dashboard,
        fs::File::create(&json_path).unwrap(),
        &json_path,
        chrono::Utc::now(),
    )
    .unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(value["total_violations"], 16);
    assert_eq!(value["verdict"], "ACTION REQUIRED");
    assert_eq!(value["blocks"].as_array().unwrap().len(), 2);
}
