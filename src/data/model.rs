use serde::{Deserialize, Serialize};

use super::codes::{IncomeRatio, Race, Sex};

/// First and last year covered by SAHIE estimates.
pub const FIRST_YEAR: i64 = 2006;
pub const LAST_YEAR: i64 = 2019;

/// Whether `year` lies in the supported SAHIE range.
pub fn is_supported_year(year: i64) -> bool {
    (FIRST_YEAR..=LAST_YEAR).contains(&year)
}

// ---------------------------------------------------------------------------
// StateCode – one row of `statecodes`
// ---------------------------------------------------------------------------

/// A state name and its two-digit FIPS code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCode {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Statecode")]
    pub code: String,
}

// ---------------------------------------------------------------------------
// DemographicRow – one row of `statedata` for a (state, year)
// ---------------------------------------------------------------------------

/// Uninsured rate for one race / sex / income band in a state and year.
///
/// `comparison_to_state` is `None` as fetched and filled in by
/// [`with_comparison`](super::comparison::with_comparison).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemographicRow {
    #[serde(rename = "Race")]
    pub race: Race,
    #[serde(rename = "Sex")]
    pub sex: Sex,
    #[serde(rename = "IPR")]
    pub income_ratio: IncomeRatio,
    #[serde(rename = "Percent Uninsured")]
    pub percent_uninsured: f64,
    #[serde(rename = "Comparison to State")]
    pub comparison_to_state: Option<f64>,
}

impl DemographicRow {
    pub fn new(race: Race, sex: Sex, income_ratio: IncomeRatio, percent_uninsured: f64) -> Self {
        DemographicRow {
            race,
            sex,
            income_ratio,
            percent_uninsured,
            comparison_to_state: None,
        }
    }

    /// The All Races / Both / All Incomes row a comparison is measured from.
    pub fn is_baseline(&self) -> bool {
        self.race == Race::AllRaces
            && self.sex == Sex::Both
            && self.income_ratio == IncomeRatio::AllIncomes
    }
}

// ---------------------------------------------------------------------------
// CountyRow / TimeRow
// ---------------------------------------------------------------------------

/// Uninsured rate of one county in a state and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyRow {
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "Percent Uninsured")]
    pub percent_uninsured: f64,
}

/// Statewide uninsured rate for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRow {
    #[serde(rename = "Year")]
    pub year: i64,
    #[serde(rename = "Percent Uninsured")]
    pub percent_uninsured: f64,
}

// ---------------------------------------------------------------------------
// Selection – the active query context
// ---------------------------------------------------------------------------

/// The state and year the dashboard is showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub statename: String,
    pub statecode: String,
    pub year: i64,
}
