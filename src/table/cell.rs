//! # Cell Values
//!
//! A spreadsheet cell reduced to the value kinds the table store keeps.
//! Styling, formulas and number formats are not modelled.

use serde_json::Value;

/// A single cell value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Build a text cell
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Textual representation used for key comparison.
    ///
    /// Integral numbers render without a fractional part, so a numeric
    /// `3.0` cell and a text `"3"` cell compare equal to the key `"3"`.
    pub fn to_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => match integral(*n) {
                Some(i) => i.to_string(),
                None => n.to_string(),
            },
            Cell::Bool(true) => "TRUE".to_string(),
            Cell::Bool(false) => "FALSE".to_string(),
        }
    }

    /// JSON representation used by the list endpoint
    pub fn to_json(&self) -> Value {
        match self {
            Cell::Empty => Value::Null,
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Number(n) => match integral(*n) {
                Some(i) => Value::from(i),
                None => serde_json::Number::from_f64(*n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
            },
            Cell::Bool(b) => Value::Bool(*b),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// Largest magnitude an f64 holds with every integer exactly representable
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT {
        Some(n as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integral_numbers_render_without_fraction() {
        assert_eq!(Cell::Number(3.0).to_text(), "3");
        assert_eq!(Cell::Number(-12.0).to_text(), "-12");
        assert_eq!(Cell::Number(2.5).to_text(), "2.5");
    }

    #[test]
    fn test_text_and_empty() {
        assert_eq!(Cell::text("7").to_text(), "7");
        assert_eq!(Cell::Empty.to_text(), "");
        assert_eq!(Cell::Bool(true).to_text(), "TRUE");
    }

    #[test]
    fn test_json_rendering() {
        assert_eq!(Cell::Number(4.0).to_json(), json!(4));
        assert_eq!(Cell::Number(0.25).to_json(), json!(0.25));
        assert_eq!(Cell::Number(f64::NAN).to_json(), Value::Null);
        assert_eq!(Cell::text("Dune").to_json(), json!("Dune"));
        assert_eq!(Cell::Empty.to_json(), Value::Null);
        assert_eq!(Cell::Bool(false).to_json(), json!(false));
    }
}
