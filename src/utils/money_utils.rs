/// Copper per gold piece.
pub const COPPER_PER_GOLD: i64 = 10_000;

/// Whole gold from copper, rounding toward zero.
pub fn copper_to_gold(copper: i64) -> i64 {
    copper / COPPER_PER_GOLD
}

/// Fractional gold for charts.
pub fn copper_to_gold_f64(copper: i64) -> f64 {
    copper as f64 / COPPER_PER_GOLD as f64
}

/// `1234567890` copper -> `"123.456g"` (dot thousands separator, whole gold only).
pub fn format_gold(copper: i64) -> String {
    format!("{}g", group_thousands(copper_to_gold(copper)))
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
