use std::fmt;

use serde::{Deserialize, Serialize};

/// A sticker price as entered.
///
/// Numbers are stored as numbers; anything else the user typed is kept
/// verbatim so a save/load cycle never rewrites it. Totals go through
/// [`Price::amount`], which treats unusable values as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl Price {
    /// Numeric value used for totals. Blank, non-numeric and non-finite
    /// values count as 0; numeric text counts as its number.
    pub fn amount(&self) -> f64 {
        let n = match self {
            Price::Number(n) => *n,
            Price::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    0.0
                } else {
                    s.parse::<f64>().unwrap_or(0.0)
                }
            }
        };
        if n.is_finite() { n } else { 0.0 }
    }

    /// Coerce user input the way an explicit price edit does: numeric text
    /// becomes a number, blank becomes 0, anything else is rejected.
    pub fn from_input(input: &str) -> Option<Price> {
        let s = input.trim();
        if s.is_empty() {
            return Some(Price::Number(0.0));
        }
        let s = s.strip_prefix('$').unwrap_or(s);
        s.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Price::Number)
    }
}

impl Default for Price {
    fn default() -> Self {
        Price::Number(0.0)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Number(n) => write!(f, "{}", format_amount(*n)),
            Price::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Format an amount for display: whole numbers without decimals, others
/// with two.
pub fn format_amount(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{:.2}", n)
    }
}
