//! Engineering units and SI prefix handling.

/// Parse a value with an optional SI suffix (`18p`, `600f`, `12.5`).
///
/// Supported suffixes:
/// - MEG (mega, 1e6)
/// - K (kilo, 1e3)
/// - M (milli, 1e-3)
/// - U (micro, 1e-6)
/// - N (nano, 1e-9)
/// - P (pico, 1e-12)
/// - F (femto, 1e-15)
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim().to_uppercase();

    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }

    let num_end = s
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+' && c != 'E')
        .unwrap_or(s.len());

    if num_end == 0 {
        return None;
    }

    let (num_str, suffix) = s.split_at(num_end);
    let value: f64 = num_str.parse().ok()?;

    let multiplier = match suffix {
        "MEG" => 1e6,
        "K" => 1e3,
        "M" => 1e-3,
        "U" => 1e-6,
        "N" => 1e-9,
        "P" => 1e-12,
        "F" => 1e-15,
        _ => return None,
    };

    Some(value * multiplier)
}

/// Parse a value in `unit` (given as its SI multiplier), accepting either a
/// plain number already in that unit or a suffixed absolute value.
///
/// `parse_scaled("18", 1e-12)` and `parse_scaled("18p", 1e-12)` both give 18.
pub fn parse_scaled(s: &str, unit: f64) -> Option<f64> {
    let trimmed = s.trim();
    if let Ok(v) = trimmed.parse::<f64>() {
        return Some(v);
    }
    parse_value(trimmed).map(|v| v / unit)
}

/// Format a value with an SI prefix and unit symbol
pub fn format_si(value: f64, unit: &str) -> String {
    let abs_value = value.abs();

    let (scaled, prefix) = if abs_value >= 1e6 {
        (value / 1e6, "M")
    } else if abs_value >= 1e3 {
        (value / 1e3, "k")
    } else if abs_value >= 1.0 {
        (value, "")
    } else if abs_value >= 1e-3 {
        (value * 1e3, "m")
    } else if abs_value >= 1e-6 {
        (value * 1e6, "u")
    } else if abs_value >= 1e-9 {
        (value * 1e9, "n")
    } else if abs_value >= 1e-12 {
        (value * 1e12, "p")
    } else if abs_value >= 1e-15 {
        (value * 1e15, "f")
    } else if abs_value == 0.0 {
        (0.0, "")
    } else {
        (value * 1e18, "a")
    };

    format!("{:.4} {}{}", scaled, prefix, unit)
}

/// Capacitance in fF with two decimals, the customary unit for C1
pub fn format_capacitance(farad: f64) -> String {
    format!("{:.2} fF", farad * 1e15)
}

/// Inductance in mH with three decimals
pub fn format_inductance(henry: f64) -> String {
    format!("{:.3} mH", henry * 1e3)
}
