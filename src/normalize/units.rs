//! Measurement unit conversion
//!
//! Turns free-text bar measurements such as `"1 1/2 cl"` into a gram
//! equivalent (`"15.00 g"`). Anything that does not look like
//! `<quantity> <unit>` with a known unit is passed through untouched.

/// Grams per unit, matched by substring against the lowercased unit token.
///
/// Order matters: the first key contained in the unit token wins.
pub const CONVERSION_TABLE: &[(&str, f64)] = &[
    ("oz", 28.3),
    ("cl", 10.0),
    ("ml", 1.0),
    ("tblsp", 14.2),
    ("tsp", 5.7),
    ("cup", 240.0),
    ("glass", 240.0),
    ("can", 304.8),
    ("drop", 0.05),
    ("splash", 5.91),
    ("shot", 44.0),
];

/// Look up the gram factor for a unit token.
pub fn grams_per_unit(unit: &str) -> Option<f64> {
    let lower = unit.to_lowercase();
    CONVERSION_TABLE
        .iter()
        .find(|(key, _)| lower.contains(key))
        .map(|(_, factor)| *factor)
}

/// Convert a measurement to its gram equivalent, formatted as `"<n>.<nn> g"`.
///
/// Returns the input unchanged when it has fewer than two tokens, when the
/// quantity is not a sum of numbers/fractions, or when the unit is unknown.
pub fn convert(text: &str) -> String {
    to_grams(text)
        .map(|grams| format!("{:.2} g", grams))
        .unwrap_or_else(|| text.to_string())
}

fn to_grams(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let (unit, quantity_parts) = parts.split_last()?;
    if quantity_parts.is_empty() {
        return None;
    }

    let quantity = parse_quantity(quantity_parts)?;
    let factor = grams_per_unit(unit)?;
    Some(quantity * factor)
}

/// Sum of every token, e.g. `["1", "1/2"]` -> 1.5
fn parse_quantity(tokens: &[&str]) -> Option<f64> {
    tokens
        .iter()
        .map(|token| parse_number(token))
        .sum::<Option<f64>>()
}

/// Parse an integer, decimal or `a/b` fraction.
fn parse_number(token: &str) -> Option<f64> {
    match token.split_once('/') {
        Some((numerator, denominator)) => {
            let numerator: i64 = numerator.parse().ok()?;
            let denominator: i64 = denominator.parse().ok()?;
            if denominator <= 0 {
                return None;
            }
            Some(numerator as f64 / denominator as f64)
        }
        None => parse_decimal(token),
    }
}

fn parse_decimal(token: &str) -> Option<f64> {
    // f64::from_str also accepts "inf" and "NaN", which are not quantities
    let numeric = token.chars().any(|c| c.is_ascii_digit())
        && token
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'));
    if !numeric {
        return None;
    }
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_whole_units() {
        assert_eq!(convert("2 oz"), "56.60 g");
        assert_eq!(convert("3 cl"), "30.00 g");
        assert_eq!(convert("1 shot"), "44.00 g");
        assert_eq!(convert("2 dashes"), "2 dashes");
    }

    #[test]
    fn test_convert_fractions() {
        assert_eq!(convert("1 1/2 cl"), "15.00 g");
        assert_eq!(convert("1/2 cup"), "120.00 g");
        assert_eq!(convert("3/4 cl"), "7.50 g");
        assert_eq!(convert("0.5 tsp"), "2.85 g");
    }

    #[test]
    fn test_unit_is_case_insensitive_substring() {
        assert_eq!(convert("2 Tblsp"), "28.40 g");
        assert_eq!(convert("1 Splashes"), "5.91 g");
        assert_eq!(convert("2 cans"), "609.60 g");
        assert_eq!(convert("3 drops"), "0.15 g");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(convert(""), "");
        assert_eq!(convert("oz"), "oz");
        assert_eq!(convert("Juice of 1"), "Juice of 1");
        assert_eq!(convert("Fill with soda"), "Fill with soda");
        assert_eq!(convert("10 g"), "10 g");
        assert_eq!(convert("1/0 oz"), "1/0 oz");
        assert_eq!(convert("inf oz"), "inf oz");
        assert_eq!(convert("1-2 shot"), "1-2 shot");
    }

    #[test]
    fn test_first_key_wins() {
        // "tblsp" is declared before "tsp"
        assert_eq!(grams_per_unit("tblsp"), Some(14.2));
        assert_eq!(grams_per_unit("TSP"), Some(5.7));
        assert_eq!(grams_per_unit("g"), None);
    }
}
