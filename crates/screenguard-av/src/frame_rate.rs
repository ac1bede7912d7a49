//! Frame-rate expression parsing.

/// Parse a frame-rate expression such as `"25/1"`, `"30000/1001"` or `"25"`.
///
/// The result is rounded to two decimal places. Parsing is tolerant: any
/// malformed expression, a zero denominator, or a non-finite result yields
/// `0.0`, which callers treat as "frame rate unknown".
///
/// # Example
///
/// ```
/// use screenguard_av::parse_fps;
///
/// assert_eq!(parse_fps("30000/1001"), 29.97);
/// assert_eq!(parse_fps("25"), 25.0);
/// assert_eq!(parse_fps("25/0"), 0.0);
/// ```
pub fn parse_fps(expr: &str) -> f64 {
    match try_parse_fps(expr) {
        Some(fps) => fps,
        None => {
            #[cfg(feature = "tracing")]
            tracing::debug!(expr, "unparseable frame rate, treating as unknown");
            0.0
        }
    }
}

fn try_parse_fps(expr: &str) -> Option<f64> {
    let fps = match expr.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => expr.trim().parse().ok()?,
    };

    let fps = round2(fps);
    fps.is_finite().then_some(fps)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
