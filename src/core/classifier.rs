// DRCScope - core/classifier.rs
//
// Rule-to-category classification by ordered substring tests.
//
// The rule table is evaluated top to bottom and the first hit wins, so a rule
// named DENSITY_WIDTH_CHECK is Density, not Width. Only the Density and
// Antenna tests look at the layer name; the rest look at the rule alone.

use crate::core::model::Category;

/// Uppercased inputs handed to each predicate.
struct Names<'a> {
    layer: &'a str,
    rule: &'a str,
}

/// One entry of the classification table.
struct ClassRule {
    category: Category,
    matches: fn(&Names<'_>) -> bool,
}

/// Priority-ordered classification table. General is the fallback and is
/// not listed.
const RULES: &[ClassRule] = &[
    ClassRule {
        category: Category::Density,
        matches: |n| n.rule.contains("DENSITY") || n.layer.contains("DENSITY"),
    },
    ClassRule {
        category: Category::Antenna,
        matches: |n| n.rule.contains("ANTENNA") || n.layer.contains("ANTENNA"),
    },
    ClassRule {
        category: Category::Width,
        matches: |n| n.rule.contains("WIDTH"),
    },
    ClassRule {
        category: Category::Spacing,
        matches: |n| n.rule.contains("SPACE") || n.rule.contains("SEP"),
    },
    ClassRule {
        category: Category::Enclosure,
        matches: |n| n.rule.contains("ENCL"),
    },
];

/// Classify a rule into its engineering category.
///
/// Pure and total: the same `(layer, rule)` always yields the same category,
/// and anything unrecognised is `General`.
pub fn classify(layer: &str, rule: &str) -> Category {
    let layer = layer.to_uppercase();
    let rule = rule.to_uppercase();
    let names = Names {
        layer: &layer,
        rule: &rule,
    };

    RULES
        .iter()
        .find(|r| (r.matches)(&names))
        .map(|r| r.category)
        .unwrap_or(Category::General)
}
