//! Small utility helpers used across modules.

/// Largest magnitude at which every integer is exactly representable as f64.
const MAX_EXACT_F64_INT: f64 = 9_007_199_254_740_992.0;

/// Parse a user- or query-supplied number as an integer.
///
/// Accepts plain base-10 integers (`"42"`, `"-3"`, `"+7"`) and numeric literals
/// whose value is integral (`"7.0"`, `"1e1"`), the same values a browser's
/// `Number(...)` would turn into whole numbers. Anything else is `None`.
pub fn parse_integral(s: &str) -> Option<i64> {
  let s = s.trim();
  if s.is_empty() {
    return None;
  }
  if let Ok(v) = s.parse::<i64>() {
    return Some(v);
  }
  let f = s.parse::<f64>().ok()?;
  if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_F64_INT {
    Some(f as i64)
  } else {
    None
  }
}
