use super::error::{DashError, DashResult};
use super::model::DemographicRow;

/// Round half away from zero to `places` decimals.
///
/// The scaled value is nudged by a few ULPs first so that differences such
/// as `10.35 - 8.10` (stored as `2.2499999999999996`) land on `2.25`.
pub fn round_half_up(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    let nudge = scaled.abs() * f64::EPSILON * 8.0;
    let rounded = (scaled + nudge.copysign(scaled)).round() / factor;
    // Avoid handing out -0.0 for a zero difference.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Fill `comparison_to_state` for a (state, year) batch.
///
/// Each row's comparison is its uninsured rate minus the batch's
/// All Races / Both / All Incomes rate, rounded to two decimals. The batch
/// must contain exactly one such baseline row.
pub fn with_comparison(mut rows: Vec<DemographicRow>) -> DashResult<Vec<DemographicRow>> {
    let baseline = baseline_percent(&rows)?;
    for row in &mut rows {
        row.comparison_to_state = Some(round_half_up(row.percent_uninsured - baseline, 2));
    }
    Ok(rows)
}

/// The uninsured rate of the unique baseline row.
pub fn baseline_percent(rows: &[DemographicRow]) -> DashResult<f64> {
    let mut baselines = rows.iter().filter(|r| r.is_baseline());
    let first = baselines.next().ok_or_else(|| {
        log::warn!("baseline row missing from batch of {} rows", rows.len());
        DashError::BaselineMissing { rows: rows.len() }
    })?;
    let extra = baselines.count();
    if extra > 0 {
        log::warn!("{} baseline rows in one batch", extra + 1);
        return Err(DashError::BaselineAmbiguous { count: extra + 1 });
    }
    Ok(first.percent_uninsured)
}
