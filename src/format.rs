//! Number formatting shared by the input summary and chart axes

/// Format a dollar amount rounded to whole dollars with thousands separators
///
/// `575000.0` becomes `"$575,000"`, `-1234.6` becomes `"-$1,235"`.
pub fn currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${}", value);
    }
    let rounded = value.round();
    let digits = group_thousands(rounded.abs() as u64);
    if rounded < 0.0 {
        format!("-${}", digits)
    } else {
        format!("${}", digits)
    }
}

/// Format a value already expressed in percent, e.g. `2.0` -> `"2.00%"`
pub fn percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}

/// Axis tick for a percentage axis: whole numbers drop the decimals
pub fn percent_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}%", value)
    } else {
        format!("{:.1}%", value)
    }
}

/// Axis tick for a unitless axis
pub fn plain_tick(value: f64) -> String {
    if value.abs() >= 1000.0 {
        let digits = group_thousands(value.abs().round() as u64);
        if value < 0.0 {
            format!("-{}", digits)
        } else {
            digits
        }
    } else if (value - value.round()).abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn group_thousands(value: u64) -> String {
    let raw = value.to_string();
    let mut grouped = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
