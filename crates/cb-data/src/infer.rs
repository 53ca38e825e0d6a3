//! Value and column type inference
//!
//! Classification is purely syntactic and ordered from strictest to
//! loosest: integer, float, boolean, datetime, string. Note that `"0"`
//! and `"1"` classify as integers before the boolean check sees them; a
//! column is boolean only when its non-digit forms (`true`, `yes`, ...)
//! keep the integer and float checks from passing.

use cb_core::ColumnType;

/// Classify a single trimmed value
pub fn detect_value_type(value: &str) -> ColumnType {
    let v = value.trim().to_lowercase();

    if is_integer(&v) {
        ColumnType::Integer
    } else if is_numeric(&v) {
        ColumnType::Float
    } else if is_boolean(&v) {
        ColumnType::Boolean
    } else if is_date_like(&v) {
        ColumnType::DateTime
    } else {
        ColumnType::String
    }
}

/// Classify a column from its sampled values.
///
/// A strict AND: every sample must satisfy a type's check for the column
/// to get that type, so one stray value demotes the whole column. An
/// empty sample set defaults to string.
pub fn detect_column_type(values: &[String]) -> ColumnType {
    if values.is_empty() {
        return ColumnType::String;
    }

    let mut int = true;
    let mut float = true;
    let mut boolean = true;
    let mut date = true;

    for value in values {
        let v = value.trim();
        int &= is_integer(v);
        float &= is_numeric(v);
        boolean &= is_boolean(&v.to_lowercase());
        date &= is_date_like(v);
    }

    if int {
        ColumnType::Integer
    } else if float {
        ColumnType::Float
    } else if boolean {
        ColumnType::Boolean
    } else if date {
        ColumnType::DateTime
    } else {
        ColumnType::String
    }
}

/// Optional minus sign followed by digits only
fn is_integer(v: &str) -> bool {
    let digits = v.strip_prefix('-').unwrap_or(v);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Anything `f64` parses to a finite number ("1e5", ".5", "-2.25", ...)
fn is_numeric(v: &str) -> bool {
    v.parse::<f64>().map(|f| f.is_finite()).unwrap_or(false)
}

/// Case-insensitive boolean literal; expects `v` already lowercased
fn is_boolean(v: &str) -> bool {
    matches!(v, "true" | "false" | "yes" | "no" | "0" | "1")
}

/// `YYYY-(M)M-(D)D` or `(M)M-(D)D-YY(YY)`, with `-` or `/` at each
/// position independently. Syntactic only; `13/45/2020` passes.
fn is_date_like(v: &str) -> bool {
    let mut groups: Vec<usize> = Vec::with_capacity(3);
    let mut current = 0usize;

    for c in v.chars() {
        if c.is_ascii_digit() {
            current += 1;
        } else if c == '-' || c == '/' {
            if current == 0 || groups.len() == 2 {
                return false;
            }
            groups.push(current);
            current = 0;
        } else {
            return false;
        }
    }
    if current == 0 || groups.len() != 2 {
        return false;
    }
    groups.push(current);

    let (a, b, c) = (groups[0], groups[1], groups[2]);
    (a == 4 && (1..=2).contains(&b) && (1..=2).contains(&c))
        || ((1..=2).contains(&a) && (1..=2).contains(&b) && (2..=4).contains(&c))
}
