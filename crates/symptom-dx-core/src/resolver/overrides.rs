//! Hardcoded override rules evaluated before any table lookup.
//!
//! Rules are ordered; the first whose trigger is a substring of the
//! case-folded label wins. "gestational diabetes" triggers the diabetes rule.

use serde::{Deserialize, Serialize};

pub const HYPERTENSION_PRECAUTIONS: &str = "meditation,salt baths,reduce stress,get proper sleep";
pub const HYPERTENSION_DESCRIPTION: &str = "Hypertension is a condition in which the force of the blood against the artery walls is too high. Usually hypertension is defined as blood pressure above 140/90, and is considered severe if the pressure is above 180/120.";

pub const DIABETES_PRECAUTIONS: &str =
    "eat healthy foods,exercise regularly,monitor blood sugar,monitor blood pressure";
pub const DIABETES_DESCRIPTION: &str = "Diabetes is a disease that occurs when your blood glucose, also called blood sugar, is too high. Blood glucose is your main source of energy and comes from the food you eat.";

/// A special-cased condition with fixed precautions and description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OverrideRule {
    /// Rule name for logs
    pub name: String,
    /// Lower-case substring that triggers the rule
    pub trigger: String,
    pub precautions: String,
    pub description: String,
}

impl OverrideRule {
    pub fn new(
        name: impl Into<String>,
        trigger: impl Into<String>,
        precautions: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            trigger: trigger.into().to_lowercase(),
            precautions: precautions.into(),
            description: description.into(),
        }
    }

    /// `folded_label` must already be case-folded.
    pub fn matches(&self, folded_label: &str) -> bool {
        folded_label.contains(&self.trigger)
    }
}

/// Ordered override list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRules {
    rules: Vec<OverrideRule>,
}

impl Default for OverrideRules {
    fn default() -> Self {
        Self::new(vec![
            OverrideRule::new(
                "hypertension",
                "hypertension",
                HYPERTENSION_PRECAUTIONS,
                HYPERTENSION_DESCRIPTION,
            ),
            OverrideRule::new(
                "diabetes",
                "diabetes",
                DIABETES_PRECAUTIONS,
                DIABETES_DESCRIPTION,
            ),
        ])
    }
}

impl OverrideRules {
    pub fn new(rules: Vec<OverrideRule>) -> Self {
        Self { rules }
    }

    /// No overrides: every label goes through the tables.
    pub fn none() -> Self {
        Self { rules: Vec::new() }
    }

    /// First rule matching the case-folded label.
    pub fn find(&self, folded_label: &str) -> Option<&OverrideRule> {
        self.rules.iter().find(|rule| rule.matches(folded_label))
    }

    pub fn rules(&self) -> &[OverrideRule] {
        &self.rules
    }
}
