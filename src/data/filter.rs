use std::collections::BTreeSet;

use super::codes::{IncomeRatio, Race, Sex};
use super::model::DemographicRow;

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Multi-select filter over the three demographic dimensions.
///
/// An empty set means the dimension is unconstrained. A row passes when, for
/// every constrained dimension, its value is one of the selected values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub race: BTreeSet<Race>,
    pub sex: BTreeSet<Sex>,
    pub income_ratio: BTreeSet<IncomeRatio>,
}

/// The filterable columns of the state data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Race,
    Sex,
    IncomeRatio,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Race, Dimension::Sex, Dimension::IncomeRatio];

    /// Placeholder text of the dimension's dropdown.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Race => "Race",
            Dimension::Sex => "Sex",
            Dimension::IncomeRatio => "IPR",
        }
    }
}

impl FilterSpec {
    /// Whether every dimension is unconstrained.
    pub fn is_unconstrained(&self) -> bool {
        self.race.is_empty() && self.sex.is_empty() && self.income_ratio.is_empty()
    }

    /// Number of selected values in one dimension.
    pub fn selected_count(&self, dim: Dimension) -> usize {
        match dim {
            Dimension::Race => self.race.len(),
            Dimension::Sex => self.sex.len(),
            Dimension::IncomeRatio => self.income_ratio.len(),
        }
    }

    /// Drop every selection in one dimension.
    pub fn clear(&mut self, dim: Dimension) {
        match dim {
            Dimension::Race => self.race.clear(),
            Dimension::Sex => self.sex.clear(),
            Dimension::IncomeRatio => self.income_ratio.clear(),
        }
    }

    /// Whether `row` satisfies every constrained dimension.
    pub fn matches(&self, row: &DemographicRow) -> bool {
        admits(&self.race, &row.race)
            && admits(&self.sex, &row.sex)
            && admits(&self.income_ratio, &row.income_ratio)
    }
}

/// Add `value` if absent, remove it if present.
pub fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

fn admits<T: Ord>(selected: &BTreeSet<T>, value: &T) -> bool {
    selected.is_empty() || selected.contains(value)
}

/// Keep the rows passing `spec`, preserving their order.
///
/// An unconstrained spec returns the input untouched.
pub fn apply_filter(rows: Vec<DemographicRow>, spec: &FilterSpec) -> Vec<DemographicRow> {
    if spec.is_unconstrained() {
        return rows;
    }
    let before = rows.len();
    let kept: Vec<DemographicRow> = rows.into_iter().filter(|r| spec.matches(r)).collect();
    log::debug!("filter kept {} of {} rows", kept.len(), before);
    kept
}
