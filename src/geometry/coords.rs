//! Coordinate parsing
//!
//! Latitudes and longitudes arrive either as plain numbers or as strings in
//! degree/minute/second notation (`60°15'30"`), possibly nested in sequences
//! describing a ring or a set of rings.

use serde::Deserialize;

use crate::error::{ReleaseError, Result};

const DEGREE_MARK: char = '°';

/// A raw coordinate value as written in a configuration file
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CoordTree {
    Number(f64),
    Text(String),
    Seq(Vec<CoordTree>),
}

/// A coordinate value with every leaf converted to decimal degrees
#[derive(Debug, Clone, PartialEq)]
pub enum NumericTree {
    Scalar(f64),
    Seq(Vec<NumericTree>),
}

impl CoordTree {
    /// Convert every leaf to decimal degrees, keeping the nesting shape
    pub fn resolve(&self) -> Result<NumericTree> {
        match self {
            CoordTree::Number(value) => {
                finite(&value.to_string(), *value).map(NumericTree::Scalar)
            }
            CoordTree::Text(token) => parse_coordinate(token).map(NumericTree::Scalar),
            CoordTree::Seq(items) => items
                .iter()
                .map(CoordTree::resolve)
                .collect::<Result<Vec<_>>>()
                .map(NumericTree::Seq),
        }
    }
}

impl From<f64> for CoordTree {
    fn from(value: f64) -> Self {
        CoordTree::Number(value)
    }
}

impl From<&str> for CoordTree {
    fn from(value: &str) -> Self {
        CoordTree::Text(value.to_string())
    }
}

impl<T: Into<CoordTree>> From<Vec<T>> for CoordTree {
    fn from(values: Vec<T>) -> Self {
        CoordTree::Seq(values.into_iter().map(Into::into).collect())
    }
}

impl NumericTree {
    /// Nesting depth: 0 for a scalar, 1 for a ring, 2 for a set of rings
    pub fn depth(&self) -> usize {
        match self {
            NumericTree::Scalar(_) => 0,
            NumericTree::Seq(items) => 1 + items.iter().map(NumericTree::depth).max().unwrap_or(0),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            NumericTree::Scalar(value) => Some(*value),
            NumericTree::Seq(_) => None,
        }
    }

    /// Flat sequence of scalars, if this is a depth-1 sequence
    pub fn as_values(&self) -> Option<Vec<f64>> {
        match self {
            NumericTree::Scalar(_) => None,
            NumericTree::Seq(items) => items.iter().map(NumericTree::as_scalar).collect(),
        }
    }

    /// Sequence of flat sequences, if this is a depth-2 sequence
    pub fn as_nested_values(&self) -> Option<Vec<Vec<f64>>> {
        match self {
            NumericTree::Scalar(_) => None,
            NumericTree::Seq(items) => items.iter().map(NumericTree::as_values).collect(),
        }
    }
}

/// Parse a single coordinate token into decimal degrees
///
/// Accepts plain numbers (`"60.25"`) and degree notation with optional
/// minutes and seconds: `60°`, `60°15'`, `60°15'30"` (seconds may also be
/// terminated by two single quotes). A leading minus sign negates the whole
/// value, so `-3°30'` is -3.5 rather than -3 + 0.5 as some older tools read it.
/// Non-finite values (`NaN`, `inf`) are rejected.
pub fn parse_coordinate(token: &str) -> Result<f64> {
    let trimmed = token.trim();

    if !trimmed.contains(DEGREE_MARK) {
        return parse_number(token, trimmed);
    }

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let body = body.replace('"', "''");
    let mut parts = body.split(DEGREE_MARK);
    let deg_str = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(ReleaseError::format(token, "more than one degree mark"));
    }

    let degrees = parse_number(token, deg_str)?;
    let (minutes, seconds) = if rest.contains("''") {
        let rest = rest.replace("''", "");
        let (min_str, sec_str) = rest
            .split_once('\'')
            .ok_or_else(|| ReleaseError::format(token, "seconds given without minutes"))?;
        if sec_str.contains('\'') {
            return Err(ReleaseError::format(token, "too many minute marks"));
        }
        (parse_number(token, min_str)?, parse_number(token, sec_str)?)
    } else if rest.contains('\'') {
        let (min_str, tail) = rest.split_once('\'').unwrap_or((rest, ""));
        if !tail.trim().is_empty() {
            return Err(ReleaseError::format(token, "unexpected text after minutes"));
        }
        (parse_number(token, min_str)?, 0.0)
    } else {
        if !rest.trim().is_empty() {
            return Err(ReleaseError::format(token, "unexpected text after degrees"));
        }
        (0.0, 0.0)
    };

    let value = degrees + minutes / 60.0 + seconds / 3600.0;
    Ok(if negative { -value } else { value })
}

fn parse_number(token: &str, text: &str) -> Result<f64> {
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|e| ReleaseError::format(token, e.to_string()))?;
    finite(token, value)
}

fn finite(token: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ReleaseError::format(token, "coordinate is not a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format_dms(value: f64) -> String {
        let degrees = value.trunc();
        let minutes = ((value - degrees) * 60.0).trunc();
        let seconds = (value - degrees - minutes / 60.0) * 3600.0;
        format!("{}°{}'{}\"", degrees, minutes, seconds)
    }

    #[test]
    fn test_parse_dms() {
        let value = parse_coordinate("60°15'30\"").unwrap();
        assert!((value - (60.0 + 15.0 / 60.0 + 30.0 / 3600.0)).abs() < 1e-12);
    }

    #[test]
    fn test_parse_seconds_with_double_single_quote() {
        let value = parse_coordinate("5°30'36''").unwrap();
        assert!((value - 5.51).abs() < 1e-12);
    }

    #[test]
    fn test_parse_degrees_minutes() {
        let value = parse_coordinate("59°01.5'").unwrap();
        assert!((value - (59.0 + 1.5 / 60.0)).abs() < 1e-12);
    }

    #[test]
    fn test_parse_degrees_only() {
        assert_eq!(parse_coordinate("4°").unwrap(), 4.0);
    }

    #[test]
    fn test_parse_negative_dms() {
        let value = parse_coordinate("-3°30'").unwrap();
        assert!((value + 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(parse_coordinate("60.125").unwrap(), 60.125);
        assert_eq!(parse_coordinate(" -4.5 ").unwrap(), -4.5);
    }

    #[test]
    fn test_dms_round_trip() {
        for value in [0.5, 5.123456, 59.999, 60.258333, 71.05] {
            let parsed = parse_coordinate(&format_dms(value)).unwrap();
            assert!((parsed - value).abs() < 1e-9, "{} -> {}", value, parsed);
        }
    }

    #[test]
    fn test_number_string_round_trip() {
        for value in [0.0, 1.5, -12.75, 60.000001, 179.99] {
            assert_eq!(parse_coordinate(&value.to_string()).unwrap(), value);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for token in ["north", "60°N", "60°15'x", "1°2°", "", "60°a'"] {
            let err = parse_coordinate(token).unwrap_err();
            assert!(matches!(err, ReleaseError::Format { .. }), "{}", token);
        }
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        for token in ["NaN", "nan", "inf", "-inf", "infinity", "1e400", "NaN°"] {
            let err = parse_coordinate(token).unwrap_err();
            assert!(matches!(err, ReleaseError::Format { .. }), "{}", token);
        }
        assert!(CoordTree::Number(f64::NAN).resolve().is_err());
        assert!(CoordTree::from(vec![60.0, f64::INFINITY]).resolve().is_err());
    }

    #[test]
    fn test_resolve_keeps_numbers() {
        let tree = CoordTree::Number(60.123456789);
        assert_eq!(tree.resolve().unwrap(), NumericTree::Scalar(60.123456789));
    }

    #[test]
    fn test_resolve_nested_shape() {
        let tree = CoordTree::from(vec![
            CoordTree::from(vec!["60°30'", "61°"]),
            CoordTree::from(vec![CoordTree::Number(62.0), CoordTree::from("62.5")]),
        ]);
        let resolved = tree.resolve().unwrap();

        assert_eq!(resolved.depth(), 2);
        assert_eq!(
            resolved.as_nested_values().unwrap(),
            vec![vec![60.5, 61.0], vec![62.0, 62.5]]
        );
    }

    #[test]
    fn test_resolve_propagates_error() {
        let tree = CoordTree::from(vec!["60°", "bad"]);
        assert!(tree.resolve().is_err());
    }

    #[test]
    fn test_deserialize_mixed_tokens() {
        let tree: CoordTree = serde_json::from_str(r#"[60, "60°30'", [1.5]]"#).unwrap();
        let resolved = tree.resolve().unwrap();
        assert_eq!(
            resolved,
            NumericTree::Seq(vec![
                NumericTree::Scalar(60.0),
                NumericTree::Scalar(60.5),
                NumericTree::Seq(vec![NumericTree::Scalar(1.5)]),
            ])
        );
    }
}
