use crate::models::NutrientEntry;

/// Format the first nutrient whose name contains `name` (case-insensitive) as
/// `"<value to 1dp> <unit>"`, or `"0 <unit>"` when none matches.
pub fn extract(nutrients: &[NutrientEntry], name: &str, unit: &str) -> String {
    let needle = name.to_lowercase();

    nutrients
        .iter()
        .find(|n| n.name.to_lowercase().contains(&needle))
        .map(|n| format!("{} {}", one_decimal(n.value), unit))
        .unwrap_or_else(|| format!("0 {}", unit))
}

/// One decimal place, exact ties rounded away from zero.
///
/// `{:.1}` already rounds the exact binary value, so it only differs on true
/// ties. A double sits exactly halfway between two tenths only when it is an
/// odd multiple of 0.25 (0.25, 1.25, 22.75, ...).
fn one_decimal(value: f64) -> String {
    let magnitude = value.abs();
    let quarters = magnitude * 4.0;

    if quarters.fract() != 0.0 || quarters % 2.0 != 1.0 || !quarters.is_finite() {
        return format!("{:.1}", value);
    }

    // magnitude * 10 is exact for quarters, so this lands on the upper tenth
    let tenths = (magnitude * 10.0 + 0.5) as u64;
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}{}.{}", sign, tenths / 10, tenths % 10)
}
