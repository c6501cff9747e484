use thiserror::Error;

/// Failures of the data-shaping core.
///
/// `NoSelection` and `NotFound` are expected conditions that the UI maps to a
/// placeholder; the rest are faults shown to the user as errors.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("select a state and year to see the percentage of people without health insurance")]
    NoSelection,

    /// `statecode` is `None` for lookups not scoped to a state.
    #[error("no {table} rows{}", scope(.statecode, .year))]
    NotFound {
        table: &'static str,
        statecode: Option<String>,
        year: Option<i64>,
    },

    #[error("no All Races / Both / All Incomes baseline row in a batch of {rows} rows")]
    BaselineMissing { rows: usize },

    #[error("{count} All Races / Both / All Incomes baseline rows in one batch")]
    BaselineAmbiguous { count: usize },

    #[error("data source error: {0}")]
    DataSource(#[from] rusqlite::Error),

    #[error("malformed {column} value '{value}' in {table}")]
    MalformedValue {
        table: &'static str,
        column: &'static str,
        value: String,
    },

    #[error("invalid selection: {0}")]
    InvalidSelection(String),
}

impl DashError {
    /// Whether the condition should render as a neutral placeholder rather
    /// than an error.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, DashError::NoSelection | DashError::NotFound { .. })
    }

    /// Storage unreachable or holding data the core cannot decode.
    pub fn is_data_source(&self) -> bool {
        matches!(
            self,
            DashError::DataSource(_) | DashError::MalformedValue { .. }
        )
    }
}

fn scope(statecode: &Option<String>, year: &Option<i64>) -> String {
    let mut out = String::new();
    if let Some(code) = statecode {
        out.push_str(" for state ");
        out.push_str(code);
    }
    if let Some(y) = year {
        out.push_str(&format!(" in {y}"));
    }
    out
}

pub type DashResult<T> = Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_classification() {
        assert!(DashError::NoSelection.is_placeholder());
        let nf = DashError::NotFound {
            table: "countydata",
            statecode: Some("06".into()),
            year: Some(2012),
        };
        assert!(nf.is_placeholder());
        assert_eq!(nf.to_string(), "no countydata rows for state 06 in 2012");

        let unscoped = DashError::NotFound {
            table: "statecodes",
            statecode: None,
            year: None,
        };
        assert_eq!(unscoped.to_string(), "no statecodes rows");
        assert!(!DashError::BaselineMissing { rows: 3 }.is_placeholder());
    }

    #[test]
    fn malformed_values_count_as_data_source_faults() {
        let err = DashError::MalformedValue {
            table: "statedata",
            column: "Race",
            value: "Martian".into(),
        };
        assert!(err.is_data_source());
        assert!(!err.is_placeholder());
    }
}
