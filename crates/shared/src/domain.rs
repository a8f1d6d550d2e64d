use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One form value on the wire: a number when the raw string fully parses
/// as one, otherwise the string itself.
///
/// Numeric grammar: the whole raw value must parse as an `i64` (kept
/// integral on the wire) or as a finite `f64`. Empty strings, padded
/// strings, and non-finite results (`inf`, `NaN`) stay text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Number),
    Text(String),
}

impl FieldValue {
    pub fn coerce(raw: &str) -> Self {
        if raw.is_empty() {
            return FieldValue::Text(String::new());
        }
        if let Ok(int) = raw.parse::<i64>() {
            return FieldValue::Number(int.into());
        }
        if let Ok(float) = raw.parse::<f64>() {
            if float.is_finite() {
                if let Some(number) = Number::from_f64(float) {
                    return FieldValue::Number(number);
                }
            }
        }
        FieldValue::Text(raw.to_string())
    }

    pub fn is_number(&self) -> bool {
        matches!(self, FieldValue::Number(_))
    }
}

/// A field on the simplified input form, with the default the original
/// predictor assumes when the user leaves it alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub default: &'static str,
}

/// The eight simplified inputs the prediction form posts. The backend
/// merges these into its full feature table and fills the rest with its
/// own defaults, so extra fields pass through untouched.
pub const FORM_FIELDS: &[FormField] = &[
    FormField {
        name: "GrLivArea",
        label: "Above-ground living area (sq ft)",
        default: "1500",
    },
    FormField {
        name: "LotArea",
        label: "Lot area (sq ft)",
        default: "10000",
    },
    FormField {
        name: "OverallQual",
        label: "Overall quality (1-10)",
        default: "5",
    },
    FormField {
        name: "YearBuilt",
        label: "Year built",
        default: "2000",
    },
    FormField {
        name: "BedroomAbvGr",
        label: "Bedrooms above ground",
        default: "3",
    },
    FormField {
        name: "FullBath",
        label: "Full bathrooms",
        default: "2",
    },
    FormField {
        name: "TotRmsAbvGrd",
        label: "Total rooms above ground",
        default: "6",
    },
    FormField {
        name: "GarageCars",
        label: "Garage capacity (cars)",
        default: "2",
    },
];

/// One set of user-entered feature values, still raw strings. Created on
/// each submission and discarded once serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormInput {
    values: BTreeMap<String, String>,
}

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form state as the UI first presents it: every catalog field at
    /// its default value.
    pub fn with_defaults() -> Self {
        let mut input = Self::new();
        for field in FORM_FIELDS {
            input.set(field.name, field.default);
        }
        input
    }

    pub fn set(&mut self, name: impl Into<String>, raw: impl Into<String>) {
        self.values.insert(name.into(), raw.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, raw)| (name.as_str(), raw.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
