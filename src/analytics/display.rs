/// One crore rupees.
pub const CRORE: f64 = 10_000_000.0;

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// One-decimal fixed point, e.g. `"80.0"`.
pub fn format_percent(value: f64) -> String {
    format!("{:.1}", value)
}

/// Rupee amount in crore with one decimal, e.g. `"2.5"` for 25,000,000.
pub fn format_crore(amount: f64) -> String {
    format!("{:.1}", amount / CRORE)
}
