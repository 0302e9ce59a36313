//! Survival time strings
//!
//! The backend stores durations as .NET `TimeSpan` values, which travel
//! over JSON as `HH:MM:SS.fffffff`. Only millisecond precision is ever
//! produced; the trailing digits are zero padding.

/// Format whole seconds as `HH:MM:SS.fff0000`. Hours are not wrapped
/// at 24. Negative or non-finite input formats as zero.
pub fn format(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).floor() as u64
    } else {
        0
    };
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let ms = total_ms % 1000;
    format!("{:02}:{:02}:{:02}.{:03}0000", hours, minutes, secs, ms)
}

/// Parse a `TimeSpan` string back to seconds, keeping millisecond
/// precision. Returns `None` for anything not shaped `H:M:S[.f]`.
pub fn parse_secs(value: &str) -> Option<f64> {
    let mut parts = value.trim().split(':');
    let (hours, minutes, rest) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let hours: u64 = hours.parse().ok()?;
    let minutes: u64 = minutes.parse().ok()?;
    let (whole, fraction) = match rest.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (rest, None),
    };
    let secs: u64 = whole.parse().ok()?;
    let millis = match fraction {
        Some(digits) if !digits.is_empty() => {
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let head: String = digits.chars().take(3).collect();
            // "45" means 450 ms
            let scale = 10u64.pow(3 - head.len() as u32);
            head.parse::<u64>().ok()? * scale
        }
        _ => 0,
    };

    Some((hours * 3600 + minutes * 60 + secs) as f64 + millis as f64 / 1000.0)
}

/// Short human display: `M:SS`, or `H:MM:SS` once an hour has passed.
/// Unparseable input is returned unchanged.
pub fn display(value: &str) -> String {
    let Some(seconds) = parse_secs(value) else {
        return value.to_string();
    };
    let whole = seconds.floor() as u64;
    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
