//! Soil test submission model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// pH range most crops tolerate, inclusive (6.0 to 7.5)
pub fn ph_comfort_range() -> (Decimal, Decimal) {
    (Decimal::new(60, 1), Decimal::new(75, 1))
}

/// Soil chemistry readings as entered by the farmer
///
/// Values are kept as entered; only pH is ever interpreted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SoilData {
    pub ph: String,
    /// Electrical conductivity, dS/m
    pub ec: String,
    /// Organic carbon, %
    pub oc: String,
    pub soil_type: String,
    /// Nitrogen, kg/ha
    pub n: String,
    /// Phosphorus, kg/ha
    pub p: String,
    /// Potassium, kg/ha
    pub k: String,
    /// Calcium, ppm
    pub ca: String,
    /// Magnesium, ppm
    pub mg: String,
    /// Sulphur, ppm
    pub s: String,
}

/// Read the number at the start of `input` the way a browser's
/// `parseFloat` does: leading whitespace is skipped and anything after the
/// number is ignored, so "5.5 acidic" reads as 5.5 and "1e1" as 10.
pub fn parse_leading_decimal(input: &str) -> Option<Decimal> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        start + bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count()
    };

    let negative = bytes.first() == Some(&b'-');
    let int_start = usize::from(matches!(bytes.first(), Some(&(b'+' | b'-'))));
    let int_end = digits_from(int_start);
    let (frac, end) = match bytes.get(int_end) {
        Some(&b'.') => {
            let frac_end = digits_from(int_end + 1);
            (&s[int_end + 1..frac_end], frac_end)
        }
        _ => ("", int_end),
    };
    let int = &s[int_start..int_end];
    if int.is_empty() && frac.is_empty() {
        return None;
    }

    let mantissa = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if int.is_empty() { "0" } else { int },
        if frac.is_empty() { "0" } else { frac },
    );

    if matches!(bytes.get(end), Some(&(b'e' | b'E'))) {
        let sign_len = usize::from(matches!(bytes.get(end + 1), Some(&(b'+' | b'-'))));
        let exp_end = digits_from(end + 1 + sign_len);
        if exp_end > end + 1 + sign_len {
            let exponent = s[end + 1..exp_end].trim_start_matches('+');
            return Decimal::from_scientific(&format!("{mantissa}e{exponent}")).ok();
        }
    }
    Decimal::from_str(&mantissa).ok()
}

impl SoilData {
    /// pH as a number, read from the start of the field
    pub fn ph_value(&self) -> Option<Decimal> {
        parse_leading_decimal(&self.ph)
    }

    /// True when pH is numeric and outside 6.0..=7.5
    pub fn is_ph_out_of_range(&self) -> bool {
        let (min, max) = ph_comfort_range();
        self.ph_value()
            .map(|ph| ph < min || ph > max)
            .unwrap_or(false)
    }
}

impl Default for SoilData {
    fn default() -> Self {
        Self {
            ph: "7".to_string(),
            ec: "1".to_string(),
            oc: "0.5".to_string(),
            soil_type: "Loamy".to_string(),
            n: "50".to_string(),
            p: "20".to_string(),
            k: "100".to_string(),
            ca: "1000".to_string(),
            mg: "200".to_string(),
            s: "10".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ph(ph: &str) -> SoilData {
        SoilData {
            ph: ph.to_string(),
            ..SoilData::default()
        }
    }

    #[test]
    fn test_ph_bounds_are_inclusive() {
        assert!(!with_ph("6.0").is_ph_out_of_range());
        assert!(!with_ph("7.5").is_ph_out_of_range());
        assert!(!with_ph("7").is_ph_out_of_range());
        assert!(with_ph("5.9").is_ph_out_of_range());
        assert!(with_ph("7.6").is_ph_out_of_range());
    }

    #[test]
    fn test_non_numeric_ph_is_not_flagged() {
        assert!(!with_ph("").is_ph_out_of_range());
        assert!(!with_ph("acidic").is_ph_out_of_range());
        assert_eq!(with_ph(" 6.5 ").ph_value(), Some(Decimal::new(65, 1)));
    }

    #[test]
    fn test_ph_reads_leading_number() {
        assert_eq!(with_ph("5.5 acidic").ph_value(), Some(Decimal::new(55, 1)));
        assert_eq!(with_ph("1e1").ph_value(), Some(Decimal::from(10)));
        assert_eq!(with_ph(".5").ph_value(), Some(Decimal::new(5, 1)));
        assert_eq!(with_ph("7.").ph_value(), Some(Decimal::from(7)));
        assert_eq!(with_ph("-3").ph_value(), Some(Decimal::from(-3)));
        assert_eq!(with_ph("6e").ph_value(), Some(Decimal::from(6)));
        assert_eq!(with_ph(".").ph_value(), None);

        assert!(with_ph("5.5 acidic").is_ph_out_of_range());
        assert!(with_ph("1e1").is_ph_out_of_range());
        assert!(!with_ph("6.8 (lab)").is_ph_out_of_range());
    }
}
