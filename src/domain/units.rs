// Relative derating to absolute watts
use super::series::Series;
use std::collections::HashMap;

/// Motor -> absolute output (W) at the reference input power
pub type ReferencePowerMap = HashMap<String, f64>;

/// Read each motor's output at the power-table row whose input is nearest to
/// `reference_input`. Motors without a reading in that row are left out.
pub fn reference_power_map(power: &Series, reference_input: f64) -> ReferencePowerMap {
    let Some(row) = power.nearest_row(reference_input) else {
        return ReferencePowerMap::new();
    };

    power
        .columns()
        .iter()
        .filter_map(|motor| row.value(motor).map(|v| (motor.clone(), v)))
        .collect()
}

/// Rescale percent-of-start readings to watts for the given motors.
///
/// Motors with no reference power pass through unchanged.
pub fn to_absolute_watts(series: &Series, reference: &ReferencePowerMap, motors: &[String]) -> Series {
    let mut converted = series.clone();
    for motor in motors {
        if !series.has_column(motor) {
            continue;
        }
        if let Some(&watts) = reference.get(motor) {
            converted = converted.map_column(motor, |percent| percent / 100.0 * watts);
        }
    }
    converted
}
