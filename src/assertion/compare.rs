//! Built-in comparison kinds.

use std::str::FromStr;

use regex::Regex;
use serde_json::Value;
use strum_macros::{Display, EnumIter, EnumString};

use super::Comparer;

/// The comparison kinds understood by [`DefaultComparer`].
///
/// Kind names are matched case-insensitively, with the aliases test authors
/// actually write (`eq`, `!=`, `>` and so on).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum Comparison {
    /// Loose equality: numeric text and numbers compare equal.
    #[strum(to_string = "equal", serialize = "equals", serialize = "eq", serialize = "==")]
    Equal,
    /// Negation of [`Comparison::Equal`].
    #[strum(
        to_string = "notEqual",
        serialize = "not_equal",
        serialize = "ne",
        serialize = "!="
    )]
    NotEqual,
    /// Substring match against the textual form of the actual value.
    #[strum(to_string = "contains", serialize = "contain")]
    Contains,
    /// Negation of [`Comparison::Contains`].
    #[strum(to_string = "notContains", serialize = "not_contains")]
    NotContains,
    /// Numeric greater-than.
    #[strum(
        to_string = "greaterThan",
        serialize = "greater_than",
        serialize = "gt",
        serialize = ">"
    )]
    GreaterThan,
    /// Numeric greater-than-or-equal.
    #[strum(
        to_string = "greaterOrEqual",
        serialize = "greater_or_equal",
        serialize = "ge",
        serialize = ">="
    )]
    GreaterOrEqual,
    /// Numeric less-than.
    #[strum(
        to_string = "lessThan",
        serialize = "less_than",
        serialize = "lt",
        serialize = "<"
    )]
    LessThan,
    /// Numeric less-than-or-equal.
    #[strum(
        to_string = "lessOrEqual",
        serialize = "less_or_equal",
        serialize = "le",
        serialize = "<="
    )]
    LessOrEqual,
    /// The expected value is a regular expression matched against the
    /// textual form of the actual value.
    #[strum(to_string = "regex", serialize = "matches")]
    Regex,
    /// Membership: the actual value occurs in the expected collection (a
    /// JSON array, or plain text searched for the actual value).
    #[strum(to_string = "in")]
    In,
    /// Negation of [`Comparison::In`].
    #[strum(to_string = "notIn", serialize = "not_in")]
    NotIn,
    /// The actual value is present and not JSON null (expected is ignored).
    #[strum(to_string = "exists", serialize = "notEmpty", serialize = "not_empty")]
    Exists,
}

/// Built-in [`Comparer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultComparer;

impl DefaultComparer {
    /// Creates the comparer.
    pub fn new() -> Self {
        Self
    }
}

impl Comparer for DefaultComparer {
    fn compare(&self, kind: &str, actual: &Value, expect: &str) -> (bool, String) {
        let comparison = match Comparison::from_str(kind.trim()) {
            Ok(c) => c,
            Err(_) => {
                return (
                    false,
                    format!("assertion failed: unsupported comparison '{kind}'"),
                )
            }
        };
        let shown = value_text(actual);
        match comparison {
            Comparison::Equal => {
                if loosely_equal(actual, expect) {
                    (true, format!("assertion passed: {shown} equals {expect}"))
                } else {
                    (
                        false,
                        format!("assertion failed: expected {expect}, got {shown}"),
                    )
                }
            }
            Comparison::NotEqual => {
                if loosely_equal(actual, expect) {
                    (
                        false,
                        format!("assertion failed: {shown} equals {expect} but should not"),
                    )
                } else {
                    (
                        true,
                        format!("assertion passed: {shown} does not equal {expect}"),
                    )
                }
            }
            Comparison::Contains => {
                if shown.contains(expect) {
                    (true, format!("assertion passed: value contains {expect}"))
                } else {
                    (
                        false,
                        format!("assertion failed: {shown} does not contain {expect}"),
                    )
                }
            }
            Comparison::NotContains => {
                if shown.contains(expect) {
                    (
                        false,
                        format!("assertion failed: {shown} contains {expect} but should not"),
                    )
                } else {
                    (
                        true,
                        format!("assertion passed: value does not contain {expect}"),
                    )
                }
            }
            Comparison::GreaterThan
            | Comparison::GreaterOrEqual
            | Comparison::LessThan
            | Comparison::LessOrEqual => numeric_compare(actual, expect, comparison),
            Comparison::Regex => match Regex::new(expect) {
                Ok(pattern) => {
                    if pattern.is_match(&shown) {
                        (true, format!("assertion passed: {shown} matches {expect}"))
                    } else {
                        (
                            false,
                            format!("assertion failed: {shown} does not match {expect}"),
                        )
                    }
                }
                Err(e) => (
                    false,
                    format!("assertion failed: invalid pattern '{expect}': {e}"),
                ),
            },
            Comparison::In => {
                if is_member(actual, expect) {
                    (true, format!("assertion passed: {shown} is in {expect}"))
                } else {
                    (
                        false,
                        format!("assertion failed: {shown} is not in {expect}"),
                    )
                }
            }
            Comparison::NotIn => {
                if is_member(actual, expect) {
                    (
                        false,
                        format!("assertion failed: {shown} is in {expect} but should not be"),
                    )
                } else {
                    (
                        true,
                        format!("assertion passed: {shown} is not in {expect}"),
                    )
                }
            }
            Comparison::Exists => {
                if actual.is_null() {
                    (false, "assertion failed: value is null or missing".to_string())
                } else {
                    (true, format!("assertion passed: value {shown} exists"))
                }
            }
        }
    }
}

/// Textual form used for display and loose comparison: strings are taken
/// raw, everything else is compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Equality that tolerates the stringly-typed expected side: `200` equals
/// `"200"`, structured expectations are compared as parsed JSON.
fn loosely_equal(actual: &Value, expect: &str) -> bool {
    if let Ok(expected) = serde_json::from_str::<Value>(expect) {
        if &expected == actual {
            return true;
        }
    }
    value_text(actual) == expect
}

/// Membership test for `in`/`notIn`: a JSON-array expectation checks each
/// element for loose equality, anything else is searched as text.
fn is_member(actual: &Value, expect: &str) -> bool {
    if let Ok(Value::Array(elements)) = serde_json::from_str::<Value>(expect) {
        return elements
            .iter()
            .any(|element| element == actual || value_text(element) == value_text(actual));
    }
    expect.contains(&value_text(actual))
}

fn numeric_compare(actual: &Value, expect: &str, comparison: Comparison) -> (bool, String) {
    let shown = value_text(actual);
    let lhs = match actual.as_f64().or_else(|| shown.parse::<f64>().ok()) {
        Some(n) => n,
        None => {
            return (
                false,
                format!("assertion failed: '{shown}' is not numeric"),
            )
        }
    };
    let rhs = match expect.trim().parse::<f64>() {
        Ok(n) => n,
        Err(_) => {
            return (
                false,
                format!("assertion failed: expected value '{expect}' is not numeric"),
            )
        }
    };
    let (passed, relation) = match comparison {
        Comparison::GreaterThan => (lhs > rhs, "greater than"),
        Comparison::GreaterOrEqual => (lhs >= rhs, "greater than or equal to"),
        Comparison::LessOrEqual => (lhs <= rhs, "less than or equal to"),
        _ => (lhs < rhs, "less than"),
    };
    if passed {
        (
            true,
            format!("assertion passed: {shown} is {relation} {expect}"),
        )
    } else {
        (
            false,
            format!("assertion failed: {shown} is not {relation} {expect}"),
        )
    }
}
