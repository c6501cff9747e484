use super::codes::Sex;
use super::model::{CountyRow, DemographicRow, Selection, TimeRow, FIRST_YEAR, LAST_YEAR};

// ---------------------------------------------------------------------------
// Chart projections
// ---------------------------------------------------------------------------

/// Counties ranked by uninsured rate, highest first. Ties keep fetch order.
pub fn county_view(mut rows: Vec<CountyRow>) -> Vec<CountyRow> {
    rows.sort_by(|a, b| b.percent_uninsured.total_cmp(&a.percent_uninsured));
    rows
}

/// Rows for the grouped race-by-income chart: the sex dimension collapsed to
/// its `Both` total.
pub fn demographic_view(rows: Vec<DemographicRow>) -> Vec<DemographicRow> {
    rows.into_iter().filter(|r| r.sex == Sex::Both).collect()
}

/// Time series in ascending year order.
pub fn time_view(mut rows: Vec<TimeRow>) -> Vec<TimeRow> {
    rows.sort_by_key(|r| r.year);
    rows
}

/// The dashboard's tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    County,
    Demographic,
    Time,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::County, ViewMode::Demographic, ViewMode::Time];

    pub fn tab_label(self) -> &'static str {
        match self {
            ViewMode::County => "County",
            ViewMode::Demographic => "Race and IPR",
            ViewMode::Time => "Over Time",
        }
    }
}

/// Rows arranged for one chart, with its title.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapedView {
    County { title: String, rows: Vec<CountyRow> },
    Demographic { title: String, rows: Vec<DemographicRow> },
    Time { title: String, rows: Vec<TimeRow> },
}

impl ShapedView {
    pub fn title(&self) -> &str {
        match self {
            ShapedView::County { title, .. }
            | ShapedView::Demographic { title, .. }
            | ShapedView::Time { title, .. } => title,
        }
    }

    pub fn mode(&self) -> ViewMode {
        match self {
            ShapedView::County { .. } => ViewMode::County,
            ShapedView::Demographic { .. } => ViewMode::Demographic,
            ShapedView::Time { .. } => ViewMode::Time,
        }
    }
}

/// Chart title for a tab: "{state} {year}", or the full year span for the
/// time series.
pub fn chart_title(mode: ViewMode, selection: &Selection) -> String {
    match mode {
        ViewMode::County | ViewMode::Demographic => {
            format!("{} {}", selection.statename, selection.year)
        }
        ViewMode::Time => format!("{} {FIRST_YEAR} - {LAST_YEAR}", selection.statename),
    }
}

// ---------------------------------------------------------------------------
// Comparison colour bands for the data table
// ---------------------------------------------------------------------------

/// How far a row sits from the state baseline, in percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonBand {
    FarBelow,
    Below,
    Neutral,
    Above,
    FarAbove,
}

impl ComparisonBand {
    pub fn classify(comparison: f64) -> Self {
        if comparison >= 10.0 {
            ComparisonBand::FarAbove
        } else if comparison > 0.0 {
            ComparisonBand::Above
        } else if comparison <= -10.0 {
            ComparisonBand::FarBelow
        } else if comparison < 0.0 {
            ComparisonBand::Below
        } else {
            ComparisonBand::Neutral
        }
    }
}
