//! Shopping-list aggregation.
//!
//! Collapses every ingredient occurrence across the recipes in a user's cart
//! into one line per `(name, measurement_unit)` pair. Matching is exact and
//! case-sensitive; lines are ordered by name, then unit.

use std::collections::BTreeMap;
use std::fmt;

/// File name offered to clients downloading the report.
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

/// One ingredient amount contributed by a recipe in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientOccurrence {
    pub name: String,
    pub measurement_unit: String,
    pub amount: u64,
}

impl IngredientOccurrence {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: u64) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// Aggregated report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListLine {
    pub name: String,
    pub measurement_unit: String,
    pub total: u64,
}

impl fmt::Display for ShoppingListLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} {}", self.name, self.total, self.measurement_unit)
    }
}

/// Deduplicated shopping list.
///
/// # Examples
/// ```
/// use backend::domain::{IngredientOccurrence, ShoppingListReport};
///
/// let report = ShoppingListReport::aggregate([
///     IngredientOccurrence::new("A", "g", 2),
///     IngredientOccurrence::new("B", "kg", 1),
///     IngredientOccurrence::new("A", "g", 3),
/// ]);
/// assert_eq!(report.render(), "A - 5 g\nB - 1 kg\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingListReport {
    lines: Vec<ShoppingListLine>,
}

impl ShoppingListReport {
    /// Sum occurrences per `(name, unit)`.
    ///
    /// Idempotent over pre-grouped input: feeding already-summed rows yields
    /// the same report as feeding the raw occurrences.
    pub fn aggregate(occurrences: impl IntoIterator<Item = IngredientOccurrence>) -> Self {
        let mut totals: BTreeMap<(String, String), u64> = BTreeMap::new();
        for occurrence in occurrences {
            let entry = totals
                .entry((occurrence.name, occurrence.measurement_unit))
                .or_default();
            *entry = entry.saturating_add(occurrence.amount);
        }
        let lines = totals
            .into_iter()
            .map(|((name, measurement_unit), total)| ShoppingListLine {
                name,
                measurement_unit,
                total,
            })
            .collect();
        Self { lines }
    }

    /// Lines in report order.
    pub fn lines(&self) -> &[ShoppingListLine] {
        &self.lines
    }

    /// Whether the cart contributed no ingredients.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Render as `"<name> - <total> <unit>\n"` lines.
    pub fn render(&self) -> String {
        self.lines.iter().map(|line| format!("{line}\n")).collect()
    }
}
