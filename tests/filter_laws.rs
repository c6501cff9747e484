use proptest::prelude::*;

use sahie_dash::data::codes::{Category, IncomeRatio, Race, Sex};
use sahie_dash::data::filter::{apply_filter, FilterSpec};
use sahie_dash::data::model::DemographicRow;

fn pick<C: Category>() -> impl Strategy<Value = C> {
    (0..C::ALL.len()).prop_map(|i| C::ALL[i])
}

fn row() -> impl Strategy<Value = DemographicRow> {
    (pick::<Race>(), pick::<Sex>(), pick::<IncomeRatio>(), 0.0f64..60.0)
        .prop_map(|(race, sex, ipr, pct)| DemographicRow::new(race, sex, ipr, pct))
}

fn spec() -> impl Strategy<Value = FilterSpec> {
    (
        prop::collection::btree_set(pick::<Race>(), 0..=2),
        prop::collection::btree_set(pick::<Sex>(), 0..=2),
        prop::collection::btree_set(pick::<IncomeRatio>(), 0..=3),
    )
        .prop_map(|(race, sex, income_ratio)| FilterSpec {
            race,
            sex,
            income_ratio,
        })
}

proptest! {
    #[test]
    fn unconstrained_filter_is_identity(rows in prop::collection::vec(row(), 0..40)) {
        prop_assert_eq!(apply_filter(rows.clone(), &FilterSpec::default()), rows);
    }

    #[test]
    fn filter_is_idempotent(rows in prop::collection::vec(row(), 0..40), spec in spec()) {
        let once = apply_filter(rows, &spec);
        prop_assert_eq!(apply_filter(once.clone(), &spec), once);
    }

    #[test]
    fn kept_rows_satisfy_every_dimension(rows in prop::collection::vec(row(), 0..40), spec in spec()) {
        let kept = apply_filter(rows.clone(), &spec);
        for r in &kept {
            prop_assert!(spec.race.is_empty() || spec.race.contains(&r.race));
            prop_assert!(spec.sex.is_empty() || spec.sex.contains(&r.sex));
            prop_assert!(spec.income_ratio.is_empty() || spec.income_ratio.contains(&r.income_ratio));
        }
        let dropped = rows.iter().filter(|r| !spec.matches(r)).count();
        prop_assert_eq!(kept.len() + dropped, rows.len());
    }

    #[test]
    fn single_race_selects_exact_subset(rows in prop::collection::vec(row(), 0..40), race in pick::<Race>()) {
        let mut spec = FilterSpec::default();
        spec.race.insert(race);
        let expected: Vec<_> = rows.iter().filter(|r| r.race == race).cloned().collect();
        prop_assert_eq!(apply_filter(rows, &spec), expected);
    }
}
