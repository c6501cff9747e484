use std::path::{Path, PathBuf};

use sahie_dash::config::Config;
use sahie_dash::data::error::DashError;
use sahie_dash::data::export::export_csv;
use sahie_dash::data::filter::{toggle, Dimension, FilterSpec};
use sahie_dash::data::model::{DemographicRow, StateCode};
use sahie_dash::data::pipeline::{submit_path, Pipeline, QueryContext, Snapshot};
use sahie_dash::data::repository::{RowRepository, SqliteRepository};
use sahie_dash::data::codes::{IncomeRatio, Race, Sex};
use sahie_dash::data::view::{ShapedView, ViewMode};

use crate::color::RaceColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    repo: SqliteRepository,

    /// Dropdown options, read once per database.
    pub states: Vec<StateCode>,

    /// Dropdown values not yet submitted.
    pub pending_state: Option<String>,
    pub pending_year: Option<i64>,

    /// Location path of the current view ("/" or "/state/code/year").
    pub path: String,

    pub context: QueryContext,

    /// Rows fetched for the active selection.
    pub snapshot: Option<Snapshot>,

    pub filters: FilterSpec,

    /// State table after filters (cached).
    pub visible_rows: Result<Vec<DemographicRow>, String>,

    pub tab: ViewMode,

    pub race_colors: RaceColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let repo = SqliteRepository::new(&config.database);
        let mut state = Self {
            pending_year: config.default_year,
            config,
            repo,
            states: Vec::new(),
            pending_state: None,
            path: "/".to_string(),
            context: QueryContext::NoSelection,
            snapshot: None,
            filters: FilterSpec::default(),
            visible_rows: Err(DashError::NoSelection.to_string()),
            tab: ViewMode::default(),
            race_colors: RaceColors::default(),
            status_message: None,
        };
        state.reload_state_codes();
        state
    }

    pub fn database(&self) -> &Path {
        self.repo.path()
    }

    /// Point the dashboard at another database file and return to the
    /// landing page.
    pub fn open_database(&mut self, path: PathBuf) {
        log::info!("opening database {}", path.display());
        self.repo = SqliteRepository::new(&path);
        self.config.database = path;
        self.pending_state = None;
        self.navigate("/");
        self.reload_state_codes();
    }

    fn reload_state_codes(&mut self) {
        match self.repo.fetch_state_codes() {
            Ok(states) => {
                log::info!("{} states available", states.len());
                self.states = states;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("failed to read state codes: {e}");
                self.states.clear();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// The Submit button's target, if both dropdowns are set.
    pub fn submit_target(&self) -> Option<String> {
        submit_path(&self.states, self.pending_state.as_deref(), self.pending_year)
    }

    pub fn submit(&mut self) {
        if let Some(path) = self.submit_target() {
            self.navigate(&path);
        }
    }

    /// Switch to the view named by `path`, refetching every table.
    pub fn navigate(&mut self, path: &str) {
        let context = match QueryContext::from_path(path) {
            Ok(ctx) => ctx,
            Err(e) => {
                log::warn!("ignoring path {path}: {e}");
                self.status_message = Some(format!("Error: {e}"));
                return;
            }
        };

        self.path = context.to_path();
        self.snapshot = match Pipeline::new(&self.repo).snapshot(&context) {
            Ok(snapshot) => {
                for err in snapshot_errors(&snapshot) {
                    log::warn!("{}: {err}", self.path);
                }
                Some(snapshot)
            }
            Err(DashError::NoSelection) => None,
            Err(e) => {
                log::error!("loading {}: {e}", self.path);
                None
            }
        };
        self.context = context;
        self.status_message = self
            .snapshot
            .as_ref()
            .and_then(|s| snapshot_errors(s).find(|e| !e.is_placeholder()))
            .map(|e| format!("Error: {e}"));
        self.refilter();
    }

    /// Recompute `visible_rows` after a filter or selection change.
    pub fn refilter(&mut self) {
        self.visible_rows = match &self.snapshot {
            Some(snapshot) => snapshot.table(&self.filters).map_err(|e| e.to_string()),
            None => Err(DashError::NoSelection.to_string()),
        };
    }

    /// Rows for the active tab.
    pub fn shaped_view(&self) -> Result<ShapedView, String> {
        match &self.snapshot {
            Some(snapshot) => snapshot.view(self.tab).map_err(|e| e.to_string()),
            None => Err(DashError::NoSelection.to_string()),
        }
    }

    pub fn toggle_race(&mut self, race: Race) {
        toggle(&mut self.filters.race, race);
        self.refilter();
    }

    pub fn toggle_sex(&mut self, sex: Sex) {
        toggle(&mut self.filters.sex, sex);
        self.refilter();
    }

    pub fn toggle_income_ratio(&mut self, ratio: IncomeRatio) {
        toggle(&mut self.filters.income_ratio, ratio);
        self.refilter();
    }

    pub fn clear_filter(&mut self, dim: Dimension) {
        self.filters.clear(dim);
        self.refilter();
    }

    /// Write the filtered state table to `path`.
    pub fn export_table(&mut self, path: &Path) {
        let Ok(rows) = &self.visible_rows else {
            self.status_message = Some("Nothing to export".to_string());
            return;
        };
        if let Err(e) = export_csv(path, rows) {
            log::error!("export failed: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn snapshot_errors(snapshot: &Snapshot) -> impl Iterator<Item = &DashError> {
    [
        snapshot.demographic.as_ref().err(),
        snapshot.county.as_ref().err(),
        snapshot.time.as_ref().err(),
    ]
    .into_iter()
    .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use sahie_dash::data::repository::init_schema;

    fn seeded_state() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("censusdata.db");
        let conn = Connection::open(&path).unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO statecodes VALUES ('New Mexico', '35');
            INSERT INTO statedata VALUES ('All Races', 'Both', 'All Incomes', 9.5, 2016, '35');
            INSERT INTO statedata VALUES ('Hispanic', 'Both', 'All Incomes', 11.0, 2016, '35');
            INSERT INTO statedata VALUES ('White', 'Male', 'All Incomes', 7.25, 2016, '35');
            INSERT INTO countydata VALUES (12.0, 'Luna County', 2016, '35', '029');
            INSERT INTO countydata VALUES (8.0, 'Los Alamos County', 2016, '35', '028');
            INSERT INTO timedata VALUES (11.0, 'New Mexico', 2015, '35');
            INSERT INTO timedata VALUES (9.5, 'New Mexico', 2016, '35');
            "#,
        )
        .unwrap();
        drop(conn);
        let config = Config {
            database: path,
            ..Config::default()
        };
        (dir, AppState::new(config))
    }

    #[test]
    fn starts_on_landing_page() {
        let (_dir, state) = seeded_state();
        assert_eq!(state.states.len(), 1);
        assert_eq!(state.context, QueryContext::NoSelection);
        assert!(state.shaped_view().is_err());
        assert!(state.visible_rows.is_err());
    }

    #[test]
    fn submit_loads_selection_and_filters() {
        let (_dir, mut state) = seeded_state();
        state.pending_state = Some("35".into());
        state.submit();
        assert!(state.snapshot.is_none(), "year still missing");

        state.pending_year = Some(2016);
        state.submit();
        assert_eq!(state.path, "/New%20Mexico/35/2016");
        assert_eq!(state.visible_rows.as_ref().unwrap().len(), 3);

        state.toggle_race(Race::Hispanic);
        let rows = state.visible_rows.as_ref().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].comparison_to_state, Some(1.5));

        state.clear_filter(Dimension::Race);
        assert_eq!(state.visible_rows.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn tabs_shape_cached_rows() {
        let (_dir, mut state) = seeded_state();
        state.navigate("/New%20Mexico/35/2016");

        let ShapedView::County { title, rows } = state.shaped_view().unwrap() else {
            panic!("county tab expected");
        };
        assert_eq!(title, "New Mexico 2016");
        assert_eq!(rows[0].county, "Luna County");

        state.tab = ViewMode::Demographic;
        let ShapedView::Demographic { rows, .. } = state.shaped_view().unwrap() else {
            panic!("demographic tab expected");
        };
        assert_eq!(rows.len(), 2);

        state.navigate("/");
        assert!(state.snapshot.is_none());
    }

    #[test]
    fn export_writes_filtered_rows() {
        let (dir, mut state) = seeded_state();
        state.navigate("/New%20Mexico/35/2016");
        state.toggle_sex(Sex::Male);
        let out = dir.path().join("table.csv");
        state.export_table(&out);
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("White,Male,All Incomes,7.25,-2.25"));
    }
}
