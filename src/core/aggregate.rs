// DRCScope - core/aggregate.rs
//
// Rolls violation records up into block summaries, a dense category table,
// and a grand total. Pure functions over complete inputs; there is no
// incremental update path.

use crate::core::model::{
    Aggregation, BlockStatus, BlockSummary, Category, CategoryCounts, CategoryTable,
    ViolationRecord,
};
use std::collections::{BTreeMap, BTreeSet};

/// One report's parse output, as handed to `aggregate_reports`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReport {
    /// Identifier used as the block name.
    pub source_file: String,
    /// Records from this report, in line order.
    pub records: Vec<ViolationRecord>,
}

/// Accumulates per-block category rows. BTreeMap keeps blocks sorted by
/// source file so output order never depends on hash order.
#[derive(Default)]
struct Accumulator {
    rows: BTreeMap<String, CategoryCounts>,
    columns: BTreeSet<Category>,
    total: u64,
}

impl Accumulator {
    fn ensure_block(&mut self, source_file: &str) {
        if !self.rows.contains_key(source_file) {
            self.rows
                .insert(source_file.to_string(), CategoryCounts::default());
        }
    }

    fn add(&mut self, record: &ViolationRecord) {
        self.ensure_block(&record.source_file);
        if let Some(row) = self.rows.get_mut(&record.source_file) {
            row.add(record.category, record.count);
        }
        self.columns.insert(record.category);
        self.total = self.total.saturating_add(record.count);
    }

    fn finish(self) -> Aggregation {
        let blocks = self
            .rows
            .iter()
            .map(|(file, row)| {
                let total_count = row.total();
                BlockSummary {
                    source_file: file.clone(),
                    total_count,
                    status: BlockStatus::from_total(total_count),
                }
            })
            .collect();

        Aggregation {
            total_count: self.total,
            blocks,
            categories: CategoryTable::new(self.rows, self.columns.into_iter().collect()),
        }
    }
}

/// Aggregate a flat record set.
///
/// Blocks are exactly the distinct `source_file` values in `records`; records
/// sharing a source file collapse into one block. Empty input yields a zero
/// total with no blocks and an empty table.
pub fn aggregate(records: &[ViolationRecord]) -> Aggregation {
    let mut acc = Accumulator::default();
    for record in records {
        acc.add(record);
    }
    acc.finish()
}

/// Aggregate per-report parse results.
///
/// Unlike `aggregate`, a report with no matching lines still gets a CLEAN
/// block with a zero category row. When no report produced any record at all
/// the result is the same empty aggregation `aggregate(&[])` returns, which
/// callers present as "no violations found".
pub fn aggregate_reports(reports: &[ParsedReport]) -> Aggregation {
    if reports.iter().all(|r| r.records.is_empty()) {
        return Aggregation::default();
    }

    let mut acc = Accumulator::default();
    for report in reports {
        acc.ensure_block(&report.source_file);
        for record in &report.records {
            acc.add(record);
        }
    }

    let aggregation = acc.finish();
    tracing::debug!(
        reports = reports.len(),
        blocks = aggregation.blocks.len(),
        total = aggregation.total_count,
        "Aggregation complete"
    );
    aggregation
}
