use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{MacroError, Result};

/// Upper bound accepted for any single macro target, in grams.
pub const MAX_MACRO_TARGET_G: f64 = 500.0;

/// A single orderable menu item for the current date.
///
/// Names are not unique: the same dish can appear at several locations and
/// meal periods, each as its own item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,

    pub protein_g: f64,

    pub carb_g: f64,

    pub fat_g: f64,

    pub location: String,

    pub meal_period: String,

    #[serde(default)]
    pub traits: BTreeSet<String>,

    /// Display only.
    #[serde(default)]
    pub serving_size: String,
}

impl Item {
    /// Sum of the three tracked macros in grams.
    #[inline]
    pub fn macro_sum(&self) -> f64 {
        self.protein_g + self.carb_g + self.fat_g
    }

    /// Items with no macros carry no optimization signal and are never stored.
    #[inline]
    pub fn has_signal(&self) -> bool {
        self.macro_sum() > 0.0
    }

    /// Estimated calories using 4/4/9 kcal per gram.
    #[inline]
    pub fn estimated_calories(&self) -> f64 {
        self.protein_g * 4.0 + self.carb_g * 4.0 + self.fat_g * 9.0
    }

    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.contains(name)
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "{} @ {}/{}: P:{} C:{} F:{}",
            self.name, self.location, self.meal_period, self.protein_g, self.carb_g, self.fat_g
        )
    }
}

/// Aggregate macros of a set of items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub protein_g: f64,
    pub carb_g: f64,
    pub fat_g: f64,
}

impl MacroTotals {
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a Item>,
    {
        items.into_iter().fold(Self::default(), |acc, item| Self {
            protein_g: acc.protein_g + item.protein_g,
            carb_g: acc.carb_g + item.carb_g,
            fat_g: acc.fat_g + item.fat_g,
        })
    }

    pub fn estimated_calories(&self) -> f64 {
        self.protein_g * 4.0 + self.carb_g * 4.0 + self.fat_g * 9.0
    }
}

/// Desired grams of each macro for one meal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTarget {
    pub protein_g: f64,
    pub carb_g: f64,
    pub fat_g: f64,
}

impl MacroTarget {
    pub fn new(protein_g: f64, carb_g: f64, fat_g: f64) -> Self {
        Self {
            protein_g,
            carb_g,
            fat_g,
        }
    }

    /// Reject non-finite, negative or unreasonably high targets.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("protein", self.protein_g),
            ("carbohydrate", self.carb_g),
            ("fat", self.fat_g),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MacroError::InvalidInput(format!(
                    "{} target must be a non-negative number",
                    label
                )));
            }
            if value > MAX_MACRO_TARGET_G {
                return Err(MacroError::InvalidInput(format!(
                    "{} target of {}g is unreasonably high (max {}g)",
                    label, value, MAX_MACRO_TARGET_G
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> Item {
        Item {
            name: "Grilled Chicken".to_string(),
            protein_g: 30.0,
            carb_g: 2.0,
            fat_g: 5.0,
            location: "Wiley".to_string(),
            meal_period: "Lunch".to_string(),
            traits: BTreeSet::from(["Soy".to_string()]),
            serving_size: "1 breast".to_string(),
        }
    }

    #[test]
    fn test_estimated_calories() {
        let item = sample_item();
        assert!((item.estimated_calories() - 173.0).abs() < 0.001);
    }

    #[test]
    fn test_has_signal() {
        let mut item = sample_item();
        assert!(item.has_signal());

        item.protein_g = 0.0;
        item.carb_g = 0.0;
        item.fat_g = 0.0;
        assert!(!item.has_signal());
    }

    #[test]
    fn test_totals_from_items() {
        let a = sample_item();
        let mut b = sample_item();
        b.protein_g = 10.0;
        let totals = MacroTotals::from_items([&a, &b]);
        assert!((totals.protein_g - 40.0).abs() < 0.001);
        assert!((totals.carb_g - 4.0).abs() < 0.001);
        assert!((totals.fat_g - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_validate_target() {
        assert!(MacroTarget::new(40.0, 60.0, 20.0).validate().is_ok());
        assert!(MacroTarget::new(-10.0, 60.0, 20.0).validate().is_err());
        assert!(MacroTarget::new(600.0, 60.0, 20.0).validate().is_err());
        assert!(MacroTarget::new(f64::NAN, 60.0, 20.0).validate().is_err());
    }
}
