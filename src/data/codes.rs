use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Categorical dimensions of the SAHIE state breakdown
// ---------------------------------------------------------------------------

/// Shared behaviour of the three categorical columns (`Race`, `Sex`, `IPR`).
///
/// Each dimension has a fixed set of census codes and a human label per code.
/// `decode` accepts the numeric code, the display label, or any alias the ETL
/// may have written to the store.
pub trait Category: Sized + Copy + Ord + fmt::Debug + 'static {
    /// Column name in the `statedata` table.
    const COLUMN: &'static str;

    /// All values in census code order.
    const ALL: &'static [Self];

    /// Numeric census code ("0", "1", …).
    fn code(self) -> &'static str;

    /// Display label.
    fn label(self) -> &'static str;

    /// Alternative spellings found in the store.
    fn aliases(self) -> &'static [&'static str] {
        &[]
    }

    /// Decode a code, label or alias.
    fn decode(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.iter().copied().find(|v| {
            v.code() == raw || v.label() == raw || v.aliases().iter().any(|a| *a == raw)
        })
    }
}

macro_rules! impl_label_serde {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                <$ty>::decode(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "unknown {} value '{raw}'",
                        <$ty as Category>::COLUMN
                    ))
                })
            }
        }
    };
}

/// `RACECAT` in the census API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Race {
    AllRaces,
    White,
    Black,
    Hispanic,
}

impl Category for Race {
    const COLUMN: &'static str = "Race";
    const ALL: &'static [Self] = &[Race::AllRaces, Race::White, Race::Black, Race::Hispanic];

    fn code(self) -> &'static str {
        match self {
            Race::AllRaces => "0",
            Race::White => "1",
            Race::Black => "2",
            Race::Hispanic => "3",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Race::AllRaces => "All Races",
            Race::White => "White",
            Race::Black => "Black",
            Race::Hispanic => "Hispanic",
        }
    }
}

/// `SEXCAT` in the census API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    Both,
    Male,
    Female,
}

impl Category for Sex {
    const COLUMN: &'static str = "Sex";
    const ALL: &'static [Self] = &[Sex::Both, Sex::Male, Sex::Female];

    fn code(self) -> &'static str {
        match self {
            Sex::Both => "0",
            Sex::Male => "1",
            Sex::Female => "2",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Sex::Both => "Both",
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

/// `IPRCAT` in the census API: income-to-poverty ratio band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IncomeRatio {
    AllIncomes,
    AtOrBelow200,
    AtOrBelow250,
    AtOrBelow138,
    AtOrBelow400,
    Between138And400,
}

impl Category for IncomeRatio {
    const COLUMN: &'static str = "IPR";
    const ALL: &'static [Self] = &[
        IncomeRatio::AllIncomes,
        IncomeRatio::AtOrBelow200,
        IncomeRatio::AtOrBelow250,
        IncomeRatio::AtOrBelow138,
        IncomeRatio::AtOrBelow400,
        IncomeRatio::Between138And400,
    ];

    fn code(self) -> &'static str {
        match self {
            IncomeRatio::AllIncomes => "0",
            IncomeRatio::AtOrBelow200 => "1",
            IncomeRatio::AtOrBelow250 => "2",
            IncomeRatio::AtOrBelow138 => "3",
            IncomeRatio::AtOrBelow400 => "4",
            IncomeRatio::Between138And400 => "5",
        }
    }

    fn label(self) -> &'static str {
        match self {
            IncomeRatio::AllIncomes => "All Incomes",
            IncomeRatio::AtOrBelow200 => "<= 200% of Poverty",
            IncomeRatio::AtOrBelow250 => "<= 250% of Poverty",
            IncomeRatio::AtOrBelow138 => "<= 138% of Poverty",
            IncomeRatio::AtOrBelow400 => "<= 400% of Poverty",
            IncomeRatio::Between138And400 => "138% - 400% of Poverty",
        }
    }

    // Long-form labels written by the census loader.
    fn aliases(self) -> &'static [&'static str] {
        match self {
            IncomeRatio::AllIncomes => &[],
            IncomeRatio::AtOrBelow200 => &["At or Below 200% of Poverty"],
            IncomeRatio::AtOrBelow250 => &["At or Below 250% of Poverty"],
            IncomeRatio::AtOrBelow138 => &["At or Below 138% of Poverty"],
            IncomeRatio::AtOrBelow400 => &["At or Below 400% of Poverty"],
            IncomeRatio::Between138And400 => &["Between 138% - 400% of Poverty"],
        }
    }
}

impl_label_serde!(Race);
impl_label_serde!(Sex);
impl_label_serde!(IncomeRatio);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_codes_and_labels() {
        assert_eq!(Race::decode("0"), Some(Race::AllRaces));
        assert_eq!(Race::decode("Hispanic"), Some(Race::Hispanic));
        assert_eq!(Sex::decode("2"), Some(Sex::Female));
        assert_eq!(Sex::decode(" Both "), Some(Sex::Both));
        assert_eq!(Race::decode("Asian"), None);
    }

    #[test]
    fn income_ratio_accepts_long_form_labels() {
        assert_eq!(
            IncomeRatio::decode("Between 138% - 400% of Poverty"),
            Some(IncomeRatio::Between138And400)
        );
        assert_eq!(
            IncomeRatio::decode("138% - 400% of Poverty"),
            Some(IncomeRatio::Between138And400)
        );
        assert_eq!(
            IncomeRatio::decode("At or Below 138% of Poverty"),
            Some(IncomeRatio::AtOrBelow138)
        );
        assert_eq!(IncomeRatio::decode("5"), Some(IncomeRatio::Between138And400));
    }

    #[test]
    fn every_code_is_distinct() {
        let codes: std::collections::BTreeSet<_> =
            IncomeRatio::ALL.iter().map(|v| v.code()).collect();
        assert_eq!(codes.len(), IncomeRatio::ALL.len());
        assert_eq!(IncomeRatio::ALL.len(), 6);
    }

    #[test]
    fn serializes_as_display_label() {
        let json = serde_json::to_string(&IncomeRatio::AtOrBelow200).unwrap();
        assert_eq!(json, "\"<= 200% of Poverty\"");
        let back: IncomeRatio = serde_json::from_str("\"At or Below 200% of Poverty\"").unwrap();
        assert_eq!(back, IncomeRatio::AtOrBelow200);
        assert!(serde_json::from_str::<Sex>("\"Unknown\"").is_err());
    }
}
