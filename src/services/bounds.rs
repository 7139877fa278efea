/// Clamps an optional integer into `min..=max`, substituting `fallback` when absent.
pub fn clamp_or(value: Option<i64>, min: i64, max: i64, fallback: i64) -> i64 {
    value.unwrap_or(fallback).clamp(min, max)
}

/// Trimmed, non-empty text or `None`.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
