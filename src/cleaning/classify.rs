use crate::dataset::{DATE_FORMAT, TypeTag};
use chrono::NaiveDate;

/// Classifies a single value. Total: every input gets exactly one tag.
///
/// First match wins:
/// 1. an exact `YYYY-MM-DD` calendar date is `Datetime`
/// 2. a plain run of decimal digits with no leading zero is `Number`
/// 3. anything else that parses as a float is `Float`
/// 4. everything else is `Object`
///
/// Digit runs also parse as floats, so they must be caught before the float
/// check. `"007"`, `"+5"` and `"1e3"` are therefore `Float`, and `"1,000"`
/// is `Object`.
pub fn classify(value: &str) -> TypeTag {
    let value = value.trim();
    if is_iso_date(value) {
        TypeTag::Datetime
    } else if is_plain_integer(value) {
        TypeTag::Number
    } else if value.parse::<f64>().is_ok() {
        TypeTag::Float
    } else {
        TypeTag::Object
    }
}

fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    shape_ok && NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
}

fn is_plain_integer(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| b.is_ascii_digit())
        && (value.len() == 1 || !value.starts_with('0'))
}
