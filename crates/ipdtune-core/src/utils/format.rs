/// Format a value with no decimals, rounding halves away from zero
pub fn format_whole(value: f32) -> String {
    format!("{:.0}", value.round())
}

/// Format a value with one decimal, rounding halves away from zero
pub fn format_one_decimal(value: f32) -> String {
    let rounded = (value as f64 * 10.0).round() / 10.0;
    format!("{:.1}", rounded)
}
