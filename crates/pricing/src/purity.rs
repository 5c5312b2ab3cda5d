//! Purity token resolution.

/// Resolve a purity token to a fraction of pure metal content.
///
/// Known karat/percent labels map directly. Bare numbers are read as karat
/// when `0 < n <= 24` and as a percentage (capped at 100) above that.
/// Unparseable, zero, or negative tokens fall back to full purity; catalog
/// data is lenient by contract, so this is a default, not an error.
pub fn purity_fraction(token: &str) -> f64 {
    match token.trim().to_ascii_lowercase().as_str() {
        "24kt" => return 1.0,
        "22kt" => return 0.92,
        "20kt" => return 0.84,
        "18kt" => return 0.75,
        "14kt" => return 0.583,
        "80%" => return 0.8,
        _ => {}
    }

    match token.trim().parse::<f64>() {
        Ok(n) if n > 24.0 => (n / 100.0).min(1.0),
        Ok(n) if n > 0.0 => n / 24.0,
        _ => 1.0,
    }
}
