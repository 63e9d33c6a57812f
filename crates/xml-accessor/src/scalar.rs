//! Scalar coercion helpers.

/// Parse an integer from its integer or decimal lexical form.
///
/// Decimal and exponent forms are truncated toward zero. Values outside the
/// `i64` range, infinities and NaN are rejected.
pub(crate) fn parse_integer(value: &str) -> Option<i64> {
    if let Ok(integer) = value.parse::<i64>() {
        return Some(integer);
    }
    let numeric_chars = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !numeric_chars || !value.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let number: f64 = value.parse().ok()?;
    let truncated = number.trunc();
    // i64::MIN is exactly representable, i64::MAX is not
    if !(-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&truncated) {
        return None;
    }
    Some(truncated as i64)
}

/// Parse an `xs:boolean` literal.
pub(crate) fn parse_boolean(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Shorten serialized XML for error messages.
pub(crate) fn excerpt(xml: &str, max_chars: usize) -> String {
    let mut chars = xml.char_indices();
    match chars.nth(max_chars) {
        Some((cut, _)) => format!("{}...", &xml[..cut]),
        None => xml.to_string(),
    }
}
