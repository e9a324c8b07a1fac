use strokesim_core::stats::ConfidenceInterval;

/// Insert thousands separators into a non-negative integer
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// Format a currency value rounded to whole dollars (e.g. `$12,345`)
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let dollars = group_thousands(value.abs().round() as u64);
    if value < 0.0 && value.round() != 0.0 {
        format!("-${dollars}")
    } else {
        format!("${dollars}")
    }
}

/// Format a proportion as a percentage
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

/// `estimate (lower, upper)` with `decimals` digits
pub fn format_estimate_interval(
    estimate: f64,
    interval: &ConfidenceInterval,
    decimals: usize,
) -> String {
    format!(
        "{estimate:.decimals$} ({:.decimals$}, {:.decimals$})",
        interval.lower, interval.upper
    )
}

/// `$estimate ($lower, $upper)`
pub fn format_currency_interval(estimate: f64, interval: &ConfidenceInterval) -> String {
    format!(
        "{} ({}, {})",
        format_currency(estimate),
        format_currency(interval.lower),
        format_currency(interval.upper)
    )
}
