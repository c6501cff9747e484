//! Writes a synthetic `censusdata.db` with the four SAHIE tables.
//!
//! Usage: `generate_sample [OUTPUT]` (default `censusdata.db`).

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};

use sahie_dash::data::codes::{Category, IncomeRatio, Race, Sex};
use sahie_dash::data::comparison::round_half_up;
use sahie_dash::data::model::{FIRST_YEAR, LAST_YEAR};
use sahie_dash::data::repository::init_schema;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`, rounded to one decimal like the census rates.
    fn pct(&mut self, lo: f64, hi: f64) -> f64 {
        round_half_up(lo + (hi - lo) * self.next_f64(), 1)
    }
}

/// (name, FIPS code, baseline uninsured rate in the first year, counties)
const STATES: &[(&str, &str, f64, &[&str])] = &[
    ("Alabama", "01", 15.0, &["Autauga County", "Baldwin County", "Barbour County"]),
    ("California", "06", 19.5, &["Alameda County", "Fresno County", "Kern County", "Marin County"]),
    ("New Mexico", "35", 23.0, &["Bernalillo County", "Los Alamos County", "Luna County"]),
    ("Rhode Island", "44", 11.0, &["Bristol County", "Kent County", "Providence County"]),
    ("Texas", "48", 25.5, &["Harris County", "Travis County", "Starr County", "Collin County"]),
];

fn race_offset(race: Race) -> f64 {
    match race {
        Race::AllRaces => 0.0,
        Race::White => -3.0,
        Race::Black => 2.0,
        Race::Hispanic => 11.0,
    }
}

fn income_offset(ratio: IncomeRatio) -> f64 {
    match ratio {
        IncomeRatio::AllIncomes => 0.0,
        IncomeRatio::AtOrBelow200 => 7.0,
        IncomeRatio::AtOrBelow250 => 6.0,
        IncomeRatio::AtOrBelow138 => 9.0,
        IncomeRatio::AtOrBelow400 => 4.0,
        IncomeRatio::Between138And400 => 3.0,
    }
}

/// The census loader stores the long-form IPR label.
fn stored_ipr_label(ratio: IncomeRatio) -> &'static str {
    ratio.aliases().first().copied().unwrap_or(ratio.label())
}

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("censusdata.db"));
    if output.exists() {
        bail!("{} already exists; remove it first", output.display());
    }

    let mut rng = SimpleRng::new(42);
    let mut conn = Connection::open(&output)
        .with_context(|| format!("creating {}", output.display()))?;
    init_schema(&conn).context("creating tables")?;

    let tx = conn.transaction()?;
    let mut demographic_rows = 0usize;
    let mut county_rows = 0usize;

    for &(name, code, start_rate, counties) in STATES {
        tx.execute("INSERT INTO statecodes VALUES (?1, ?2)", params![name, code])?;

        for year in FIRST_YEAR..=LAST_YEAR {
            // Rates fall after 2013 as coverage expands.
            let trend = if year <= 2013 { 0.0 } else { (year - 2013) as f64 * -1.2 };
            let base = round_half_up((start_rate + trend).max(3.0), 1);

            tx.execute(
                r#"INSERT INTO timedata ("Percent Uninsured", State, Year, Statecode) VALUES (?1, ?2, ?3, ?4)"#,
                params![base, name, year, code],
            )?;

            for &race in Race::ALL {
                for &sex in Sex::ALL {
                    for &ratio in IncomeRatio::ALL {
                        let pct = if race == Race::AllRaces
                            && sex == Sex::Both
                            && ratio == IncomeRatio::AllIncomes
                        {
                            base
                        } else {
                            let centre = base + race_offset(race) + income_offset(ratio);
                            rng.pct((centre - 1.5).max(1.0), centre + 1.5)
                        };
                        tx.execute(
                            r#"INSERT INTO statedata (Race, Sex, IPR, "Percent Uninsured", Year, State)
                               VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
                            params![race.label(), sex.label(), stored_ipr_label(ratio), pct, year, code],
                        )?;
                        demographic_rows += 1;
                    }
                }
            }

            for (i, county) in counties.iter().enumerate() {
                let pct = rng.pct((base - 5.0).max(1.0), base + 8.0);
                let countycode = format!("{:03}", i * 2 + 1);
                tx.execute(
                    r#"INSERT INTO countydata ("Percent Uninsured", County, Year, statecode, countycode)
                       VALUES (?1, ?2, ?3, ?4, ?5)"#,
                    params![pct, format!("{county}, {name}"), year, code, countycode],
                )?;
                county_rows += 1;
            }
        }
    }
    tx.commit()?;

    log::info!(
        "{demographic_rows} statedata rows, {county_rows} countydata rows across {} states",
        STATES.len()
    );
    println!("Wrote sample census data to {}", output.display());
    Ok(())
}
