// DRCScope - app/state.rs
//
// Application state for one session. Owned by main and handed to the
// renderer; the core layer never sees it.

use crate::app::ingest::IngestOutcome;
use crate::core::aggregate;
use crate::core::model::{Dashboard, Readiness};

/// What the session currently has to show.
#[derive(Debug, Clone)]
pub enum SessionView {
    /// No report was ingested. Prompt for input.
    Idle,

    /// Reports were ingested but none contained a result line.
    NoViolations { file_count: usize },

    /// At least one result line was found.
    Results(Box<Dashboard>),
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Current view.
    pub view: SessionView,

    /// Status message for the summary line.
    pub status_message: String,

    /// Non-fatal warnings accumulated during the current session
    /// (config problems, discovery limits, skipped reports).
    pub warnings: Vec<String>,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    /// Create initial state.
    pub fn new(debug_mode: bool) -> Self {
        Self {
            view: SessionView::Idle,
            status_message: "Ready. Pass report files or directories to begin.".to_string(),
            warnings: Vec::new(),
            debug_mode,
        }
    }

    /// Replace the current view with the result of an ingestion run.
    pub fn load(&mut self, outcome: IngestOutcome) {
        self.warnings.extend(outcome.warnings.iter().cloned());
        for failure in &outcome.failures {
            self.warnings.push(format!("Skipped {failure}"));
        }

        let file_count = outcome.reports.len();
        if file_count == 0 {
            self.view = SessionView::Idle;
            self.status_message = if outcome.failures.is_empty() {
                "No report files found.".to_string()
            } else {
                format!(
                    "None of the {} report file(s) could be read.",
                    outcome.failures.len()
                )
            };
            return;
        }

        let aggregation = aggregate::aggregate_reports(&outcome.reports);
        if aggregation.blocks.is_empty() {
            self.view = SessionView::NoViolations { file_count };
            self.status_message =
                format!("No DRC violations found in the {file_count} report file(s).");
            return;
        }

        let records = outcome
            .reports
            .into_iter()
            .flat_map(|r| r.records)
            .collect();
        let dashboard = Dashboard::new(file_count, aggregation, records);
        self.status_message = format!(
            "{} violation(s) across {} block(s): {}",
            dashboard.total_violations, dashboard.file_count, dashboard.verdict
        );
        self.view = SessionView::Results(Box::new(dashboard));
    }

    /// The dashboard, when there are results to show.
    pub fn dashboard(&self) -> Option<&Dashboard> {
        match &self.view {
            SessionView::Results(dashboard) => Some(dashboard.as_ref()),
            _ => None,
        }
    }

    /// Readiness verdict, or `None` while idle.
    pub fn verdict(&self) -> Option<Readiness> {
        match &self.view {
            SessionView::Idle => None,
            SessionView::NoViolations { .. } => Some(Readiness::Ready),
            SessionView::Results(dashboard) => Some(dashboard.verdict),
        }
    }

    /// Clear all results and reset to initial state.
    pub fn clear(&mut self) {
        self.view = SessionView::Idle;
        self.warnings.clear();
        self.status_message = "Ready.".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ingest::{ingest_sources, IngestConfig, ReportSource};

    fn outcome(files: &[(&str, &str)]) -> IngestOutcome {
        let sources = files
            .iter()
            .map(|(name, text)| ReportSource {
                name: (*name).to_string(),
                bytes: text.as_bytes().to_vec(),
            })
            .collect();
        ingest_sources(sources, &IngestConfig::default()).unwrap()
    }

    #[test]
    fn test_zero_files_is_idle() {
        let mut state = AppState::new(false);
        state.load(IngestOutcome::default());
        assert!(matches!(state.view, SessionView::Idle));
        assert!(state.verdict().is_none());
    }

    #[test]
    fn test_no_matching_lines_is_no_violations() {
        let mut state = AppState::new(false);
        state.load(outcome(&[("a.rpt", "header only"), ("b.rpt", "")]));
        assert!(matches!(
            state.view,
            SessionView::NoViolations { file_count: 2 }
        ));
        assert_eq!(state.verdict(), Some(Readiness::Ready));
        assert!(state.dashboard().is_none());
    }

    #[test]
    fn test_results_view() {
        let mut state = AppState::new(false);
        state.load(outcome(&[
            ("a.rpt", "nothing"),
            ("b.rpt", "RULECHECK M1.DENSITY .. TOTAL Result Count = 10"),
        ]));
        let dashboard = state.dashboard().unwrap();
        assert_eq!(dashboard.file_count, 2);
        assert_eq!(dashboard.total_violations, 10);
        assert_eq!(dashboard.blocks.len(), 2);
        assert_eq!(dashboard.records.len(), 1);
        assert_eq!(state.verdict(), Some(Readiness::ActionRequired));
    }

    #[test]
    fn test_all_zero_counts_is_ready_with_results() {
        let mut state = AppState::new(false);
        state.load(outcome(&[(
            "a.rpt",
            "RULECHECK M1.MIN_WIDTH .. TOTAL Result Count = 0",
        )]));
        assert_eq!(state.verdict(), Some(Readiness::Ready));
        assert!(state.dashboard().is_some());
    }

    #[test]
    fn test_clear_resets() {
        let mut state = AppState::new(true);
        state.warnings.push("w".to_string());
        state.load(outcome(&[("a.rpt", "RULECHECK M1.W .. TOTAL Result Count = 1")]));
        state.clear();
        assert!(matches!(state.view, SessionView::Idle));
        assert!(state.warnings.is_empty());
    }
}
