// Windowed statistics over the start of a run
use super::series::Series;
use serde::Serialize;

/// Mean and minimum of one motor over a window.
/// Both are `None` when the motor has no reading inside the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowStats {
    pub motor: String,
    pub mean: Option<f64>,
    pub minimum: Option<f64>,
}

/// Statistics over the rows with x in `[min_x, min_x + window]`, one entry per
/// requested motor in request order.
pub fn window_stats(series: &Series, window: f64, motors: &[String]) -> Vec<WindowStats> {
    let in_window = match series.x_range() {
        Some((start, _)) => series.filter_range(start, start + window),
        None => series.clone(),
    };

    motors
        .iter()
        .map(|motor| {
            let values: Vec<f64> = in_window
                .rows()
                .iter()
                .filter_map(|r| r.value(motor))
                .collect();

            WindowStats {
                motor: motor.clone(),
                mean: mean(&values),
                minimum: values.iter().copied().reduce(f64::min),
            }
        })
        .collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
