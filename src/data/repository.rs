use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::{params, Connection, OpenFlags};

use super::codes::{Category, IncomeRatio, Race, Sex};
use super::error::{DashError, DashResult};
use super::model::{CountyRow, DemographicRow, StateCode, TimeRow};

// ---------------------------------------------------------------------------
// Repository interface
// ---------------------------------------------------------------------------

/// Read-only access to the four SAHIE tables.
///
/// Every call goes back to storage; nothing is cached between calls. An empty
/// result is reported as [`DashError::NotFound`].
pub trait RowRepository: Send + Sync {
    fn fetch_state_codes(&self) -> DashResult<Vec<StateCode>>;

    /// Demographic breakdown with `comparison_to_state` still unset.
    fn fetch_demographic_rows(&self, statecode: &str, year: i64) -> DashResult<Vec<DemographicRow>>;

    fn fetch_county_rows(&self, statecode: &str, year: i64) -> DashResult<Vec<CountyRow>>;

    fn fetch_time_rows(&self, statecode: &str) -> DashResult<Vec<TimeRow>>;
}

// ---------------------------------------------------------------------------
// SQLite implementation
// ---------------------------------------------------------------------------

/// Repository over a `censusdata.db` file.
///
/// The database is opened read-only for each query and closed when the call
/// returns, on success and error paths alike.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    db_path: PathBuf,
}

impl SqliteRepository {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        SqliteRepository {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> DashResult<Connection> {
        Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            log::error!("opening {}: {e}", self.db_path.display());
            DashError::DataSource(e)
        })
    }
}

impl RowRepository for SqliteRepository {
    fn fetch_state_codes(&self) -> DashResult<Vec<StateCode>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT Name, Statecode FROM statecodes ORDER BY Name")?;
        let codes = stmt
            .query_map([], |row| {
                Ok(StateCode {
                    name: row.get(0)?,
                    code: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        log::debug!("read {} state codes", codes.len());
        non_empty(codes, "statecodes", None, None)
    }

    fn fetch_demographic_rows(&self, statecode: &str, year: i64) -> DashResult<Vec<DemographicRow>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            r#"SELECT Race, Sex, IPR, "Percent Uninsured" FROM statedata
               WHERE State = ?1 AND CAST(Year AS INTEGER) = ?2"#,
        )?;
        let raw = stmt
            .query_map(params![statecode, year], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Value>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let rows = raw
            .into_iter()
            .map(|(race, sex, ipr, pct)| {
                Ok(DemographicRow::new(
                    decode_column::<Race>(&race)?,
                    decode_column::<Sex>(&sex)?,
                    decode_column::<IncomeRatio>(&ipr)?,
                    decode_percent(pct, "statedata")?,
                ))
            })
            .collect::<DashResult<Vec<_>>>()?;

        log::debug!("read {} statedata rows for {statecode}/{year}", rows.len());
        non_empty(rows, "statedata", Some(statecode), Some(year))
    }

    fn fetch_county_rows(&self, statecode: &str, year: i64) -> DashResult<Vec<CountyRow>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            r#"SELECT County, "Percent Uninsured" FROM countydata
               WHERE statecode = ?1 AND CAST(Year AS INTEGER) = ?2"#,
        )?;
        let raw = stmt
            .query_map(params![statecode, year], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Value>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let rows = raw
            .into_iter()
            .map(|(county, pct)| {
                Ok(CountyRow {
                    county,
                    percent_uninsured: decode_percent(pct, "countydata")?,
                })
            })
            .collect::<DashResult<Vec<_>>>()?;

        log::debug!("read {} countydata rows for {statecode}/{year}", rows.len());
        non_empty(rows, "countydata", Some(statecode), Some(year))
    }

    fn fetch_time_rows(&self, statecode: &str) -> DashResult<Vec<TimeRow>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            r#"SELECT Year, "Percent Uninsured" FROM timedata WHERE Statecode = ?1"#,
        )?;
        let raw = stmt
            .query_map(params![statecode], |row| {
                Ok((row.get::<_, Value>(0)?, row.get::<_, Value>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let rows = raw
            .into_iter()
            .map(|(year, pct)| {
                Ok(TimeRow {
                    year: decode_year(year, "timedata")?,
                    percent_uninsured: decode_percent(pct, "timedata")?,
                })
            })
            .collect::<DashResult<Vec<_>>>()?;

        log::debug!("read {} timedata rows for {statecode}", rows.len());
        non_empty(rows, "timedata", Some(statecode), None)
    }
}

// ---------------------------------------------------------------------------
// Cell decoding
// ---------------------------------------------------------------------------

fn decode_column<C: Category>(raw: &str) -> DashResult<C> {
    C::decode(raw).ok_or_else(|| DashError::MalformedValue {
        table: "statedata",
        column: C::COLUMN,
        value: raw.to_string(),
    })
}

/// The census loader may leave numeric columns as TEXT, so accept numerals
/// stored in any of SQLite's value classes.
fn decode_percent(value: Value, table: &'static str) -> DashResult<f64> {
    let pct = match &value {
        Value::Real(f) => Some(*f),
        Value::Integer(i) => Some(*i as f64),
        Value::Text(s) => s.trim().parse::<f64>().ok(),
        Value::Null | Value::Blob(_) => None,
    };
    pct.filter(|p| p.is_finite())
        .ok_or_else(|| malformed(table, "Percent Uninsured", &value))
}

fn decode_year(value: Value, table: &'static str) -> DashResult<i64> {
    let year = match &value {
        Value::Integer(i) => Some(*i),
        Value::Real(f) if f.fract() == 0.0 => Some(*f as i64),
        Value::Text(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    year.ok_or_else(|| malformed(table, "Year", &value))
}

fn malformed(table: &'static str, column: &'static str, value: &Value) -> DashError {
    let value = match value {
        Value::Text(s) => s.clone(),
        other => format!("{other:?}"),
    };
    DashError::MalformedValue {
        table,
        column,
        value,
    }
}

fn non_empty<T>(
    rows: Vec<T>,
    table: &'static str,
    statecode: Option<&str>,
    year: Option<i64>,
) -> DashResult<Vec<T>> {
    if rows.is_empty() {
        Err(DashError::NotFound {
            table,
            statecode: statecode.map(str::to_string),
            year,
        })
    } else {
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Create the four SAHIE tables if they do not exist yet.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS statecodes (Name text, Statecode text);
        CREATE TABLE IF NOT EXISTS statedata (
            Race text, Sex text, IPR text, "Percent Uninsured" real, Year integer, State text
        );
        CREATE TABLE IF NOT EXISTS countydata (
            "Percent Uninsured" real, County text, Year integer, statecode text, countycode text
        );
        CREATE TABLE IF NOT EXISTS timedata (
            "Percent Uninsured" real, State text, Year integer, Statecode text
        );
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (tempfile::TempDir, SqliteRepository) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("censusdata.db");
        let conn = Connection::open(&path).unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO statecodes VALUES ('Wyoming', '56'), ('Alabama', '01');
            INSERT INTO statedata VALUES ('All Races', 'Both', 'All Incomes', 11.5, 2014, '01');
            INSERT INTO statedata VALUES ('0', '2', 'Between 138% - 400% of Poverty', 13.0, 2014, '01');
            INSERT INTO statedata VALUES ('Purple', 'Both', 'All Incomes', 1.0, 2015, '01');
            "#,
        )
        .unwrap();
        (dir, SqliteRepository::new(path))
    }

    #[test]
    fn state_codes_are_sorted_by_name() {
        let (_dir, repo) = seeded();
        let codes = repo.fetch_state_codes().unwrap();
        assert_eq!(codes[0].name, "Alabama");
        assert_eq!(codes[1].code, "56");
    }

    #[test]
    fn demographic_rows_are_decoded() {
        let (_dir, repo) = seeded();
        let rows = repo.fetch_demographic_rows("01", 2014).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].race, Race::AllRaces);
        assert_eq!(rows[1].sex, Sex::Female);
        assert_eq!(rows[1].income_ratio, IncomeRatio::Between138And400);
        assert!(rows.iter().all(|r| r.comparison_to_state.is_none()));
    }

    #[test]
    fn undecodable_label_is_a_data_source_fault() {
        let (_dir, repo) = seeded();
        let err = repo.fetch_demographic_rows("01", 2015).unwrap_err();
        assert!(err.is_data_source(), "{err}");
    }

    #[test]
    fn empty_result_is_not_found() {
        let (_dir, repo) = seeded();
        assert!(matches!(
            repo.fetch_county_rows("01", 2014),
            Err(DashError::NotFound { table: "countydata", year: Some(2014), .. })
        ));
        assert!(matches!(
            repo.fetch_time_rows("99"),
            Err(DashError::NotFound { year: None, .. })
        ));
    }

    /// Tables as the census loader leaves them: every column TEXT.
    fn text_typed() -> (tempfile::TempDir, SqliteRepository) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("censusdata.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE statecodes (Name TEXT, Statecode TEXT);
            CREATE TABLE statedata (
                Race TEXT, Sex TEXT, IPR TEXT, "Percent Uninsured" TEXT, Year TEXT, State TEXT
            );
            CREATE TABLE countydata (
                "Percent Uninsured" TEXT, County TEXT, Year TEXT, statecode TEXT, countycode TEXT
            );
            CREATE TABLE timedata ("Percent Uninsured" TEXT, State TEXT, Year TEXT, Statecode TEXT);
            INSERT INTO statedata VALUES ('0', '0', '0', '8.1', '2012', '39');
            INSERT INTO statedata VALUES ('3', '0', '0', '10.35', '2012', '39');
            INSERT INTO statedata VALUES ('1', '0', '0', 'n/a', '2013', '39');
            INSERT INTO countydata VALUES ('12.4', 'Adams County, Ohio', '2012', '39', '001');
            INSERT INTO timedata VALUES ('8.1', 'Ohio', '2012', '39');
            INSERT INTO timedata VALUES ('9.0', 'Ohio', '2006', '39');
            INSERT INTO timedata VALUES ('7.0', 'Utah', 'soon', '49');
            "#,
        )
        .unwrap();
        (dir, SqliteRepository::new(path))
    }

    #[test]
    fn text_numerals_are_accepted() {
        let (_dir, repo) = text_typed();

        let rows = repo.fetch_demographic_rows("39", 2012).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].percent_uninsured, 8.1);
        assert_eq!(rows[1].race, Race::Hispanic);
        assert_eq!(rows[1].percent_uninsured, 10.35);

        let county = repo.fetch_county_rows("39", 2012).unwrap();
        assert_eq!(county[0].percent_uninsured, 12.4);

        let time = repo.fetch_time_rows("39").unwrap();
        let years: Vec<i64> = time.iter().map(|r| r.year).collect();
        assert_eq!(years, [2012, 2006]);
        assert_eq!(time[1].percent_uninsured, 9.0);
    }

    #[test]
    fn non_numeric_text_is_malformed() {
        let (_dir, repo) = text_typed();
        assert!(matches!(
            repo.fetch_demographic_rows("39", 2013),
            Err(DashError::MalformedValue { column: "Percent Uninsured", ref value, .. }) if value == "n/a"
        ));
        assert!(matches!(
            repo.fetch_time_rows("49"),
            Err(DashError::MalformedValue { table: "timedata", column: "Year", .. })
        ));
    }

    #[test]
    fn empty_state_codes_table_has_no_state_scope() {
        let (_dir, repo) = text_typed();
        let err = repo.fetch_state_codes().unwrap_err();
        assert!(matches!(err, DashError::NotFound { statecode: None, .. }));
        assert_eq!(err.to_string(), "no statecodes rows");
    }

    #[test]
    fn missing_database_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.db");
        let repo = SqliteRepository::new(&path);
        assert!(matches!(repo.fetch_state_codes(), Err(DashError::DataSource(_))));
        assert!(!path.exists());
    }
}
