//! Human-readable sizes

const KIB: u64 = 1024;
const MIB: u64 = 1024 * 1024;

/// Formats a byte count as `B`, `KB` or `MB` with one decimal
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let value = bytes as f64;
    if bytes < KIB {
        format!("{bytes} B")
    } else if bytes < MIB {
        format!("{:.1} KB", tenths(value / KIB as f64))
    } else {
        format!("{:.1} MB", tenths(value / MIB as f64))
    }
}

/// Rounds to one decimal, ties away from zero
fn tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
