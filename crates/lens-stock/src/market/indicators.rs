//! Technical indicator arithmetic
//!
//! Every function here tolerates short or degenerate input by returning
//! `None` instead of a partial or undefined value; callers omit the field.

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percent change from `previous` to `current`, rounded to two decimals.
///
/// `None` when the denominator is zero.
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    Some(round2((current - previous) / previous * 100.0))
}

/// Simple moving average over the trailing `window` values.
///
/// The window is clamped to the available data length, so a series shorter
/// than the nominal window still produces an average. `None` for an empty
/// series or a zero window.
pub fn simple_moving_average(values: &[f64], window: usize) -> Option<f64> {
    if values.is_empty() || window == 0 {
        return None;
    }
    let window = window.min(values.len());
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Relative Strength Index over the trailing `period` close-to-close deltas.
///
/// RS = mean gain / mean loss over the lookback, RSI = 100 − 100/(1+RS).
/// When the loss average is zero the ratio is undefined; the result is
/// clamped to 100. `None` when fewer than `period` deltas are available.
pub fn relative_strength_index(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let tail = &deltas[deltas.len() - period..];

    let gain_avg = tail.iter().filter(|d| **d > 0.0).sum::<f64>() / period as f64;
    let loss_avg = -tail.iter().filter(|d| **d < 0.0).sum::<f64>() / period as f64;

    if loss_avg == 0.0 {
        return Some(100.0);
    }

    let rs = gain_avg / loss_avg;
    Some(100.0 - 100.0 / (1.0 + rs))
}
