// DRCScope - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

// =============================================================================
// Violation record (normalised output of parsing)
// =============================================================================

/// One matched `RULECHECK ... TOTAL Result Count = N` line.
///
/// Created by the report parser and never mutated afterwards. `category` is
/// always derived from `layer` and `rule`; there is no way to supply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViolationRecord {
    /// Design layer or rule-group name, verbatim from the report.
    pub layer: String,

    /// Rule name within the layer, verbatim from the report.
    pub rule: String,

    /// Reported total violation count for this rule.
    pub count: u64,

    /// Identifier of the originating report (file name or full path).
    pub source_file: String,

    /// Engineering category derived from `layer` and `rule`.
    pub category: Category,
}

impl ViolationRecord {
    /// Build a record, deriving its category through the rule classifier.
    pub fn new(layer: &str, rule: &str, count: u64, source_file: &str) -> Self {
        Self {
            layer: layer.to_string(),
            rule: rule.to_string(),
            count,
            source_file: source_file.to_string(),
            category: crate::core::classifier::classify(layer, rule),
        }
    }
}

// =============================================================================
// Category
// =============================================================================

/// Engineering category of a design rule.
///
/// Variant order is the column order of the category table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Category {
    Density,
    Antenna,
    Width,
    Spacing,
    Enclosure,
    General,
}

impl Category {
    /// Number of categories; the width of a category table row.
    pub const COUNT: usize = 6;

    /// Returns all variants in column order.
    pub fn all() -> &'static [Category; Category::COUNT] {
        &[
            Category::Density,
            Category::Antenna,
            Category::Width,
            Category::Spacing,
            Category::Enclosure,
            Category::General,
        ]
    }

    /// Human-readable label for display and export.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Density => "Density",
            Category::Antenna => "Antenna",
            Category::Width => "Width",
            Category::Spacing => "Spacing",
            Category::Enclosure => "Enclosure",
            Category::General => "General",
        }
    }

    /// Column index in a category table row.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Block status and readiness verdict
// =============================================================================

/// Per-block status derived from the block's summed violation count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BlockStatus {
    Clean,
    Warning,
    Fail,
}

impl BlockStatus {
    /// CLEAN at 0, WARNING below `FAIL_THRESHOLD`, FAIL at or above it.
    pub fn from_total(total: u64) -> Self {
        if total == 0 {
            BlockStatus::Clean
        } else if total < constants::FAIL_THRESHOLD {
            BlockStatus::Warning
        } else {
            BlockStatus::Fail
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BlockStatus::Clean => "CLEAN",
            BlockStatus::Warning => "WARNING",
            BlockStatus::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Overall tape-out readiness across every ingested block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Readiness {
    #[serde(rename = "READY")]
    Ready,
    #[serde(rename = "ACTION REQUIRED")]
    ActionRequired,
}

impl Readiness {
    pub fn from_total(total: u64) -> Self {
        if total == 0 {
            Readiness::Ready
        } else {
            Readiness::ActionRequired
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Readiness::Ready => "READY",
            Readiness::ActionRequired => "ACTION REQUIRED",
        }
    }
}

impl std::fmt::Display for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Aggregation outputs
// =============================================================================

/// One row of the block status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    pub source_file: String,
    pub total_count: u64,
    pub status: BlockStatus,
}

/// Dense per-category counts for one block. Every category is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts([u64; Category::COUNT]);

impl CategoryCounts {
    pub fn get(&self, category: Category) -> u64 {
        self.0[category.index()]
    }

    pub(crate) fn add(&mut self, category: Category, count: u64) {
        let cell = &mut self.0[category.index()];
        *cell = cell.saturating_add(count);
    }

    /// Sum over all categories.
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// `(category, count)` pairs in column order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        Category::all().iter().map(move |c| (*c, self.get(*c)))
    }
}

impl Serialize for CategoryCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Category::COUNT))?;
        for (category, count) in self.iter() {
            map.serialize_entry(category.label(), &count)?;
        }
        map.end()
    }
}

/// Violation counts keyed by (source file, category).
///
/// Rows are ordered by source file. Lookups for a file or category that never
/// appeared return 0 rather than signalling absence, so consumers can treat
/// the table as a dense matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTable {
    rows: BTreeMap<String, CategoryCounts>,

    /// Categories that at least one record was classified into, in column
    /// order. Lets renderers hide columns no record ever touched.
    columns: Vec<Category>,
}

impl CategoryTable {
    pub(crate) fn new(rows: BTreeMap<String, CategoryCounts>, columns: Vec<Category>) -> Self {
        Self { rows, columns }
    }

    /// Count for one cell; 0 for any combination with no contributions.
    pub fn get(&self, source_file: &str, category: Category) -> u64 {
        self.rows
            .get(source_file)
            .map(|row| row.get(category))
            .unwrap_or(0)
    }

    /// The full row for one block, if that block is in the table.
    pub fn row(&self, source_file: &str) -> Option<&CategoryCounts> {
        self.rows.get(source_file)
    }

    /// All rows ordered by source file.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &CategoryCounts)> {
        self.rows.iter().map(|(file, row)| (file.as_str(), row))
    }

    pub fn columns(&self) -> &[Category] {
        &self.columns
    }

    /// Sum of one category column across all blocks.
    pub fn column_total(&self, category: Category) -> u64 {
        self.rows.values().map(|row| row.get(category)).sum()
    }

    /// Sum of every cell.
    pub fn total(&self) -> u64 {
        self.rows.values().map(CategoryCounts::total).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of one aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    pub total_count: u64,
    pub blocks: Vec<BlockSummary>,
    pub categories: CategoryTable,
}

// =============================================================================
// Dashboard (everything a presentation layer or exporter consumes)
// =============================================================================

/// Summary metrics plus all tables for one ingestion session.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// Number of report files successfully ingested.
    pub file_count: usize,

    /// Sum of every record's count.
    pub total_violations: u64,

    pub verdict: Readiness,

    pub blocks: Vec<BlockSummary>,

    pub categories: CategoryTable,

    /// Flat record list in ingestion order.
    pub records: Vec<ViolationRecord>,
}

impl Dashboard {
    pub fn new(file_count: usize, aggregation: Aggregation, records: Vec<ViolationRecord>) -> Self {
        Self {
            file_count,
            total_violations: aggregation.total_count,
            verdict: Readiness::from_total(aggregation.total_count),
            blocks: aggregation.blocks,
            categories: aggregation.categories,
            records,
        }
    }
}
