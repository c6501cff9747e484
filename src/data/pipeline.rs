use super::comparison::with_comparison;
use super::error::{DashError, DashResult};
use super::filter::{apply_filter, FilterSpec};
use super::model::{is_supported_year, CountyRow, DemographicRow, Selection, StateCode, TimeRow};
use super::repository::RowRepository;
use super::view::{chart_title, county_view, demographic_view, time_view, ShapedView, ViewMode};

// ---------------------------------------------------------------------------
// Query context: NoSelection → SelectionActive
// ---------------------------------------------------------------------------

/// What the dashboard is currently asked to show.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryContext {
    #[default]
    NoSelection,
    Active(Selection),
}

impl QueryContext {
    /// The active selection, or [`DashError::NoSelection`].
    pub fn selection(&self) -> DashResult<&Selection> {
        match self {
            QueryContext::NoSelection => Err(DashError::NoSelection),
            QueryContext::Active(sel) => Ok(sel),
        }
    }

    /// Decode a location path. `/` is the landing page; anything else must be
    /// `/{statename}/{statecode}/{year}`.
    pub fn from_path(path: &str) -> DashResult<Self> {
        let trimmed = path.trim_start_matches('/');
        if trimmed.is_empty() {
            return Ok(QueryContext::NoSelection);
        }

        let parts: Vec<&str> = trimmed.trim_end_matches('/').split('/').collect();
        let [name, code, year] = parts.as_slice() else {
            return Err(DashError::InvalidSelection(format!(
                "expected /state/code/year, got '{path}'"
            )));
        };

        let statename = name.replace("%20", " ");
        if statename.trim().is_empty() {
            return Err(DashError::InvalidSelection("empty state name".into()));
        }
        if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DashError::InvalidSelection(format!(
                "state code '{code}' is not two digits"
            )));
        }
        let year: i64 = year
            .parse()
            .map_err(|_| DashError::InvalidSelection(format!("year '{year}' is not a number")))?;
        if !is_supported_year(year) {
            return Err(DashError::InvalidSelection(format!(
                "year {year} is outside the SAHIE range"
            )));
        }

        Ok(QueryContext::Active(Selection {
            statename,
            statecode: code.to_string(),
            year,
        }))
    }

    /// The path that reproduces this context.
    pub fn to_path(&self) -> String {
        match self {
            QueryContext::NoSelection => "/".to_string(),
            QueryContext::Active(sel) => format!(
                "/{}/{}/{}",
                sel.statename.replace(' ', "%20"),
                sel.statecode,
                sel.year
            ),
        }
    }
}

/// Path for the Submit action, once both a state and a year are picked.
///
/// Returns `None` while either dropdown is empty or the code is unknown.
pub fn submit_path(states: &[StateCode], statecode: Option<&str>, year: Option<i64>) -> Option<String> {
    let (code, year) = (statecode?, year?);
    let state = states.iter().find(|s| s.code == code)?;
    Some(
        QueryContext::Active(Selection {
            statename: state.name.clone(),
            statecode: state.code.clone(),
            year,
        })
        .to_path(),
    )
}

// ---------------------------------------------------------------------------
// Pipeline: repository → comparison → filter → view
// ---------------------------------------------------------------------------

/// Synchronous shaping pass over an injected repository.
pub struct Pipeline<'a> {
    repo: &'a dyn RowRepository,
}

impl<'a> Pipeline<'a> {
    pub fn new(repo: &'a dyn RowRepository) -> Self {
        Pipeline { repo }
    }

    /// The demographic breakdown with comparison to the state baseline.
    pub fn state_table(&self, ctx: &QueryContext) -> DashResult<Vec<DemographicRow>> {
        let sel = ctx.selection()?;
        let rows = self.repo.fetch_demographic_rows(&sel.statecode, sel.year)?;
        with_comparison(rows)
    }

    /// The state data table after the multi-select filters.
    pub fn filtered_table(&self, ctx: &QueryContext, spec: &FilterSpec) -> DashResult<Vec<DemographicRow>> {
        Ok(apply_filter(self.state_table(ctx)?, spec))
    }

    pub fn county_table(&self, ctx: &QueryContext) -> DashResult<Vec<CountyRow>> {
        let sel = ctx.selection()?;
        self.repo.fetch_county_rows(&sel.statecode, sel.year)
    }

    pub fn time_table(&self, ctx: &QueryContext) -> DashResult<Vec<TimeRow>> {
        let sel = ctx.selection()?;
        self.repo.fetch_time_rows(&sel.statecode)
    }

    /// Fetch and shape only what one tab needs.
    pub fn view(&self, ctx: &QueryContext, mode: ViewMode) -> DashResult<ShapedView> {
        let sel = ctx.selection()?;
        let title = chart_title(mode, sel);
        Ok(match mode {
            ViewMode::County => ShapedView::County {
                title,
                rows: county_view(self.county_table(ctx)?),
            },
            ViewMode::Demographic => ShapedView::Demographic {
                title,
                rows: demographic_view(self.state_table(ctx)?),
            },
            ViewMode::Time => ShapedView::Time {
                title,
                rows: time_view(self.time_table(ctx)?),
            },
        })
    }

    /// Fetch all three tables for the current selection.
    pub fn snapshot(&self, ctx: &QueryContext) -> DashResult<Snapshot> {
        let selection = ctx.selection()?.clone();
        Ok(Snapshot {
            demographic: self.state_table(ctx),
            county: self.county_table(ctx),
            time: self.time_table(ctx),
            selection,
        })
    }
}

// ---------------------------------------------------------------------------
// Snapshot – the row sets held for one selection
// ---------------------------------------------------------------------------

/// Tables fetched for one selection, replaced wholesale when it changes.
///
/// Each table keeps its own outcome, so a missing county breakdown does not
/// hide the state table.
#[derive(Debug)]
pub struct Snapshot {
    pub selection: Selection,
    pub demographic: DashResult<Vec<DemographicRow>>,
    pub county: DashResult<Vec<CountyRow>>,
    pub time: DashResult<Vec<TimeRow>>,
}

impl Snapshot {
    /// The filtered state data table.
    pub fn table(&self, spec: &FilterSpec) -> Result<Vec<DemographicRow>, &DashError> {
        let rows = self.demographic.as_ref()?;
        Ok(apply_filter(rows.clone(), spec))
    }

    /// Shape the cached rows for one tab.
    pub fn view(&self, mode: ViewMode) -> Result<ShapedView, &DashError> {
        let title = chart_title(mode, &self.selection);
        Ok(match mode {
            ViewMode::County => ShapedView::County {
                title,
                rows: county_view(self.county.as_ref()?.clone()),
            },
            ViewMode::Demographic => ShapedView::Demographic {
                title,
                rows: demographic_view(self.demographic.as_ref()?.clone()),
            },
            ViewMode::Time => ShapedView::Time {
                title,
                rows: time_view(self.time.as_ref()?.clone()),
            },
        })
    }
}
