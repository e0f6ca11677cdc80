// DRCScope - ui/report.rs
//
// Terminal rendering of the session state: headline metrics, the block
// status table, and a horizontal bar chart of violations by category.
// Presentation only: reads AppState, never mutates it.

use crate::app::state::{AppState, SessionView};
use crate::core::model::{BlockStatus, CategoryTable, Dashboard};
use crate::util::constants;
use std::fmt::{self, Write};

/// Render the full text report for `state`.
pub fn render_text(state: &AppState) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, state);
    out
}

fn write_report(out: &mut String, state: &AppState) -> fmt::Result {
    writeln!(
        out,
        "{} v{} - Physical Verification Summary",
        constants::APP_NAME,
        constants::APP_VERSION
    )?;
    writeln!(out)?;

    match &state.view {
        SessionView::Idle => {
            writeln!(out, "{}", state.status_message)?;
            writeln!(
                out,
                "Pass one or more DRC report files ({}) or directories to assess tape-out readiness.",
                constants::DEFAULT_INCLUDE_PATTERNS.join(", ")
            )?;
        }
        SessionView::NoViolations { file_count } => {
            write_metrics(out, *file_count, 0, "READY")?;
            writeln!(out)?;
            writeln!(out, "No DRC violations found in the supplied reports.")?;
        }
        SessionView::Results(dashboard) => {
            write_dashboard(out, dashboard, state.debug_mode)?;
        }
    }

    if !state.warnings.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings ({})", state.warnings.len())?;
        for warning in &state.warnings {
            writeln!(out, "  ! {warning}")?;
        }
    }
    Ok(())
}

fn write_metrics(out: &mut String, files: usize, violations: u64, verdict: &str) -> fmt::Result {
    writeln!(
        out,
        "Total Blocks: {files}    Total Violations: {violations}    Status: {verdict}"
    )
}

fn write_dashboard(out: &mut String, dashboard: &Dashboard, show_records: bool) -> fmt::Result {
    write_metrics(
        out,
        dashboard.file_count,
        dashboard.total_violations,
        dashboard.verdict.label(),
    )?;

    // ---------------------------------------------------------------------
    // Block status table
    // ---------------------------------------------------------------------
    writeln!(out)?;
    writeln!(out, "Block Status Summary")?;
    let name_width = dashboard
        .blocks
        .iter()
        .map(|b| b.source_file.chars().count())
        .max()
        .unwrap_or(0)
        .max("filename".len());
    writeln!(out, "  {:<name_width$}  {:>8}  status", "filename", "count")?;
    for block in &dashboard.blocks {
        writeln!(
            out,
            "  {:<name_width$}  {:>8}  {} {}",
            block.source_file,
            block.total_count,
            status_marker(block.status),
            block.status
        )?;
    }

    // ---------------------------------------------------------------------
    // Category chart
    // ---------------------------------------------------------------------
    writeln!(out)?;
    writeln!(out, "Violations by Category")?;
    write_category_chart(out, &dashboard.categories, name_width)?;

    if show_records {
        writeln!(out)?;
        writeln!(out, "Records ({})", dashboard.records.len())?;
        for r in &dashboard.records {
            writeln!(
                out,
                "  {:<name_width$}  {}.{} = {} [{}]",
                r.source_file, r.layer, r.rule, r.count, r.category
            )?;
        }
    }
    Ok(())
}

/// One group per observed category, one bar per block inside the group.
fn write_category_chart(out: &mut String, table: &CategoryTable, name_width: usize) -> fmt::Result {
    let max = table
        .rows()
        .flat_map(|(_, row)| row.iter().map(|(_, count)| count))
        .max()
        .unwrap_or(0);

    for category in table.columns() {
        writeln!(
            out,
            "  {category} (total {})",
            table.column_total(*category)
        )?;
        for (file, row) in table.rows() {
            let count = row.get(*category);
            writeln!(
                out,
                "    {:<name_width$}  {:>8}  {}",
                file,
                count,
                bar(count, max)
            )?;
        }
    }
    Ok(())
}

/// Bar scaled against the largest cell. Any non-zero count gets at least
/// one mark so it is never visually indistinguishable from zero.
fn bar(count: u64, max: u64) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let width = constants::CHART_BAR_WIDTH as u128;
    let scaled = (u128::from(count) * width / u128::from(max)).max(1);
    "#".repeat(scaled as usize)
}

fn status_marker(status: BlockStatus) -> &'static str {
    match status {
        BlockStatus::Clean => "[ok]",
        BlockStatus::Warning => "[!!]",
        BlockStatus::Fail => "[XX]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ingest::{ingest_sources, IngestConfig, ReportSource};

    fn state_for(files: &[(&str, &str)]) -> AppState {
        let sources = files
            .iter()
            .map(|(name, text)| ReportSource {
                name: (*name).to_string(),
                bytes: text.as_bytes().to_vec(),
            })
            .collect();
        let mut state = AppState::new(false);
        state.load(ingest_sources(sources, &IngestConfig::default()).unwrap());
        state
    }

    #[test]
    fn test_idle_view() {
        let text = render_text(&AppState::new(false));
        assert!(text.contains("Pass one or more DRC report files"));
        assert!(!text.contains("Block Status Summary"));
    }

    #[test]
    fn test_no_violations_view() {
        let text = render_text(&state_for(&[("a.rpt", "no results here")]));
        assert!(text.contains("No DRC violations found"));
        assert!(text.contains("Status: READY"));
    }

    #[test]
    fn test_results_view() {
        let text = render_text(&state_for(&[
            ("blockA.rpt", "RULECHECK M1.MIN_WIDTH .......... TOTAL Result Count = 3"),
            ("blockB.rpt", "RULECHECK M2.DENSITY_LOW .. TOTAL Result Count = 10"),
        ]));
        assert!(text.contains("Total Blocks: 2"));
        assert!(text.contains("Total Violations: 13"));
        assert!(text.contains("Status: ACTION REQUIRED"));
        assert!(text.contains("[!!] WARNING"));
        assert!(text.contains("[XX] FAIL"));
        assert!(text.contains("Density (total 10)"));
        assert!(text.contains("Width (total 3)"));
        assert!(!text.contains("Antenna"));
    }

    #[test]
    fn test_warnings_listed() {
        let mut state = AppState::new(false);
        state.warnings.push("config problem".to_string());
        assert!(render_text(&state).contains("! config problem"));
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0, 10), "");
        assert_eq!(bar(10, 10).len(), constants::CHART_BAR_WIDTH);
        assert_eq!(bar(1, 1_000_000).len(), 1);
        assert_eq!(bar(u64::MAX, u64::MAX).len(), constants::CHART_BAR_WIDTH);
    }
}
