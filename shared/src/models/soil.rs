//! Soil texture models

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Textural soil category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SoilCategory {
    Sandy,
    Loamy,
    Clay,
    Silty,
}

impl SoilCategory {
    pub const ALL: [SoilCategory; 4] = [
        SoilCategory::Sandy,
        SoilCategory::Loamy,
        SoilCategory::Clay,
        SoilCategory::Silty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilCategory::Sandy => "Sandy",
            SoilCategory::Loamy => "Loamy",
            SoilCategory::Clay => "Clay",
            SoilCategory::Silty => "Silty",
        }
    }
}

impl std::fmt::Display for SoilCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown soil category: {0}")]
pub struct UnknownSoilCategory(pub String);

impl FromStr for SoilCategory {
    type Err = UnknownSoilCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandy" => Ok(SoilCategory::Sandy),
            "loamy" => Ok(SoilCategory::Loamy),
            "clay" => Ok(SoilCategory::Clay),
            "silty" => Ok(SoilCategory::Silty),
            _ => Err(UnknownSoilCategory(s.to_string())),
        }
    }
}

/// Mean sand/clay/silt mass fractions of the 0-5 cm layer.
///
/// Units are whatever the upstream reports (g/kg for SoilGrids); only the
/// relative order matters for classification.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct SoilFractions {
    pub sand: Option<f64>,
    pub clay: Option<f64>,
    pub silt: Option<f64>,
}

impl SoilFractions {
    pub fn new(sand: f64, clay: f64, silt: f64) -> Self {
        Self {
            sand: Some(sand),
            clay: Some(clay),
            silt: Some(silt),
        }
    }

    /// Assign a layer mean by case-insensitive substring match on its name,
    /// checked in the order sand, clay, silt. Unrelated layers are ignored.
    pub fn record_layer(&mut self, name: &str, mean: f64) {
        let name = name.to_lowercase();
        if name.contains("sand") {
            self.sand = Some(mean);
        } else if name.contains("clay") {
            self.clay = Some(mean);
        } else if name.contains("silt") {
            self.silt = Some(mean);
        }
    }

    /// Classify, or `None` when any fraction is missing
    pub fn classify(&self) -> Option<SoilCategory> {
        match (self.sand, self.clay, self.silt) {
            (Some(sand), Some(clay), Some(silt)) => Some(classify_soil(sand, clay, silt)),
            _ => None,
        }
    }
}

/// Classify soil texture from its three fractions.
///
/// The first category (Sandy, Clay, Silty) whose fraction is greater than or
/// equal to both others wins; Loamy otherwise. Ties therefore resolve in that
/// fixed order.
pub fn classify_soil(sand: f64, clay: f64, silt: f64) -> SoilCategory {
    if sand >= clay && sand >= silt {
        SoilCategory::Sandy
    } else if clay >= sand && clay >= silt {
        SoilCategory::Clay
    } else if silt >= sand && silt >= clay {
        SoilCategory::Silty
    } else {
        SoilCategory::Loamy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_dominant_fraction() {
        assert_eq!(classify_soil(600.0, 200.0, 200.0), SoilCategory::Sandy);
        assert_eq!(classify_soil(200.0, 500.0, 300.0), SoilCategory::Clay);
        assert_eq!(classify_soil(150.0, 250.0, 600.0), SoilCategory::Silty);
    }

    #[test]
    fn test_tie_break_order() {
        assert_eq!(classify_soil(40.0, 40.0, 20.0), SoilCategory::Sandy);
        assert_eq!(classify_soil(20.0, 40.0, 40.0), SoilCategory::Clay);
        assert_eq!(classify_soil(40.0, 20.0, 40.0), SoilCategory::Sandy);
        assert_eq!(classify_soil(33.0, 33.0, 33.0), SoilCategory::Sandy);
    }

    #[test]
    fn test_loamy_fallback_when_nothing_dominates() {
        assert_eq!(classify_soil(f64::NAN, f64::NAN, f64::NAN), SoilCategory::Loamy);
    }

    #[test]
    fn test_missing_fraction_is_indeterminate() {
        let fractions = SoilFractions {
            sand: Some(400.0),
            clay: None,
            silt: Some(200.0),
        };
        assert_eq!(fractions.classify(), None);
    }

    #[test]
    fn test_record_layer_by_name() {
        let mut fractions = SoilFractions::default();
        fractions.record_layer("Sand", 420.0);
        fractions.record_layer("clay", 310.0);
        fractions.record_layer("silt", 270.0);
        fractions.record_layer("phh2o", 65.0);

        assert_eq!(fractions, SoilFractions::new(420.0, 310.0, 270.0));
        assert_eq!(fractions.classify(), Some(SoilCategory::Sandy));
    }

    #[test]
    fn test_parse_category() {
        assert_eq!("loamy".parse::<SoilCategory>(), Ok(SoilCategory::Loamy));
        assert_eq!(" Clay ".parse::<SoilCategory>(), Ok(SoilCategory::Clay));
        assert!("peat".parse::<SoilCategory>().is_err());
    }

    proptest! {
        #[test]
        fn classification_picks_a_largest_fraction(
            sand in 0.0f64..1000.0,
            clay in 0.0f64..1000.0,
            silt in 0.0f64..1000.0,
        ) {
            let largest = sand.max(clay).max(silt);
            let chosen = match classify_soil(sand, clay, silt) {
                SoilCategory::Sandy => sand,
                SoilCategory::Clay => clay,
                SoilCategory::Silty => silt,
                SoilCategory::Loamy => f64::NAN,
            };
            prop_assert_eq!(chosen, largest);
        }
    }
}
