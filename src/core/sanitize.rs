// src/core/sanitize.rs
//! Numeric cell parsers behind the lenient CSV adapters.
//! All of them are total: a value they cannot read comes back as `None`.

/// Whole number stored in a CSV cell: `"12"`, `" 12 "`, `"12.0"` (from
/// float-typed exports), `"-3"`. Fractions and anything else are `None`.
pub fn parse_whole(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Euro amounts as shown on the site: `"€ 1.234.567"`, `"1.234.567 €"`,
/// `"+250.000"`. Thousands separators (`.`/`,`) are dropped; the site never
/// shows cents.
pub fn parse_money(s: &str) -> Option<i64> {
    let s = s.trim();
    let body = match s.find('€') {
        Some(i) => {
            let after = s[i + '€'.len_utf8()..].trim_start();
            if after.starts_with(|c: char| c.is_ascii_digit()) { after } else { s[..i].trim_end() }
        }
        None => s,
    };
    let body = body.trim_start_matches(['+', ' ']);
    let negative = body.starts_with('-');
    let body = body.trim_start_matches('-');

    let number: String = body
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .filter(|c| c.is_ascii_digit())
        .collect();
    if number.is_empty() {
        return None;
    }
    let value: i64 = number.parse().ok()?;
    if negative { Some(-value) } else { Some(value) }
}
