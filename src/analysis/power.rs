use ndarray::ArrayView1;

/// Smoothed supply-power trend in mW from per-row bus voltage and current.
/// The trend, not the raw product, feeds the reported average so switching
/// noise on the supply rail does not bias it.
pub fn power_trend(
    bus_v: ArrayView1<f64>,
    current_ma: ArrayView1<f64>,
    window_cap: usize,
) -> Vec<f64> {
    let raw: Vec<f64> = bus_v
        .iter()
        .zip(current_ma.iter())
        .map(|(v, i)| v * i)
        .collect();
    smooth_trend(&raw, window_cap)
}

/// Order-2 Savitzky-Golay smoothing. Window is half the series rounded to
/// odd, capped by `window_cap` and clamped to the series length; when no
/// valid window exists the raw signal is returned unchanged.
pub fn smooth_trend(raw: &[f64], window_cap: usize) -> Vec<f64> {
    let window = smoothing_window(raw.len(), window_cap);
    let half_width = window / 2;
    match sg_coefficients(half_width, 2) {
        Some(coeffs) => apply_symmetric_filter(raw, &coeffs, half_width),
        None => raw.to_vec(),
    }
}

pub fn average_power_mw(trend: &[f64]) -> f64 {
    if trend.is_empty() {
        return 0.0;
    }
    trend.iter().sum::<f64>() / trend.len() as f64
}

/// Mean of strictly-positive readings only; a sensor that never produced a
/// valid reading reports the 0.0 sentinel, not an average of garbage.
pub fn average_temperature(temp: Option<ArrayView1<f64>>) -> f64 {
    let temp = match temp {
        Some(t) => t,
        None => return 0.0,
    };
    let mut sum = 0.0;
    let mut count = 0usize;
    for &value in temp.iter() {
        if value > 0.0 {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn smoothing_window(len: usize, cap: usize) -> usize {
    let mut window = (len / 2) | 1;
    if window > cap {
        window = cap | 1;
    }
    if window > len {
        window = if len % 2 == 0 { len.saturating_sub(1) } else { len };
    }
    window
}

/// Least-squares smoothing coefficients for a window of `2m+1` samples and
/// the given polynomial order, via the normal equations of the
/// Vandermonde-like design matrix.
fn sg_coefficients(half_width: usize, poly_order: usize) -> Option<Vec<f64>> {
    let m = half_width;
    if m == 0 {
        return None;
    }
    let window = 2 * m + 1;
    if poly_order >= window {
        return None;
    }

    let p = poly_order + 1;
    let n = window;

    // J[i][k] = (i - m)^k
    let mut design = vec![vec![0.0; p]; n];
    for (idx, row) in design.iter_mut().enumerate() {
        let x = idx as f64 - m as f64;
        let mut xk = 1.0;
        for slot in row.iter_mut() {
            *slot = xk;
            xk *= x;
        }
    }

    // J^T J
    let mut jtj = vec![vec![0.0; p]; p];
    for row in 0..p {
        for col in 0..p {
            jtj[row][col] = (0..n).map(|i| design[i][row] * design[i][col]).sum();
        }
    }

    // Invert via Gauss-Jordan on [JTJ | I]
    let mut aug = vec![vec![0.0; 2 * p]; p];
    for i in 0..p {
        aug[i][..p].copy_from_slice(&jtj[i]);
        aug[i][p + i] = 1.0;
    }
    for col in 0..p {
        let mut max_row = col;
        for row in (col + 1)..p {
            if aug[row][col].abs() > aug[max_row][col].abs() {
                max_row = row;
            }
        }
        aug.swap(col, max_row);

        let pivot = aug[col][col];
        if pivot.abs() < 1e-15 {
            return None;
        }
        for value in aug[col].iter_mut() {
            *value /= pivot;
        }
        for row in 0..p {
            if row != col {
                let factor = aug[row][col];
                for jj in 0..2 * p {
                    aug[row][jj] -= factor * aug[col][jj];
                }
            }
        }
    }

    // Smoothing kernel is the deriv-0 row of the pseudoinverse:
    // c_i = sum_k inv(JTJ)[0][k] * J[i][k]
    let mut coeffs = vec![0.0; n];
    for (i, slot) in coeffs.iter_mut().enumerate() {
        *slot = (0..p).map(|k| aug[0][p + k] * design[i][k]).sum();
    }
    Some(coeffs)
}

/// Symmetric convolution with mirror padding at both ends.
fn apply_symmetric_filter(data: &[f64], coeffs: &[f64], half_width: usize) -> Vec<f64> {
    let n = data.len();
    let m = half_width as i64;
    let mut output = vec![0.0; n];

    for (i, slot) in output.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (k, &c) in coeffs.iter().enumerate() {
            let j = i as i64 + k as i64 - m;
            let idx = if j < 0 {
                (-j) as usize
            } else if j >= n as i64 {
                2 * n - 2 - j as usize
            } else {
                j as usize
            };
            sum += c * data[idx.min(n - 1)];
        }
        *slot = sum;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn window_rule() {
        assert_eq!(smoothing_window(5000, 51), 51);
        assert_eq!(smoothing_window(200, 51), 51);
        assert_eq!(smoothing_window(40, 51), 21);
        assert_eq!(smoothing_window(20, 51), 11);
        assert_eq!(smoothing_window(10, 51), 5);
        assert_eq!(smoothing_window(3, 51), 1);
    }

    #[test]
    fn constant_signal_is_unchanged() {
        let raw = vec![48.5; 120];
        let trend = smooth_trend(&raw, 51);
        for value in trend {
            assert!((value - 48.5).abs() < 1e-9);
        }
    }

    #[test]
    fn quadratic_is_reproduced_exactly_in_the_interior() {
        let raw: Vec<f64> = (0..80).map(|i| 0.5 * (i * i) as f64 - 3.0 * i as f64).collect();
        let trend = smooth_trend(&raw, 21);
        for i in 11..69 {
            assert!(
                (trend[i] - raw[i]).abs() < 1e-6,
                "interior sample {} drifted: {} vs {}",
                i,
                trend[i],
                raw[i]
            );
        }
    }

    #[test]
    fn spike_amplitude_is_suppressed() {
        let mut raw = vec![66.0; 200];
        raw[100] = 660.0;
        let trend = smooth_trend(&raw, 51);
        let peak = trend.iter().cloned().fold(f64::MIN, f64::max);
        assert!(peak < 0.5 * 660.0, "trend peak {} not suppressed", peak);
    }

    #[test]
    fn edge_spike_moves_the_smoothed_average_off_the_raw_mean() {
        // An outlier inside the mirror-padded edge is weighted twice, so the
        // trend mean visibly departs from the raw mean
        let mut raw = vec![100.0; 30];
        raw[0] = 1000.0;
        let trend = smooth_trend(&raw, 51);
        let raw_mean = average_power_mw(&raw);
        let trend_mean = average_power_mw(&trend);
        assert!(
            (raw_mean - trend_mean).abs() > 5.0,
            "raw mean {} vs trend mean {}",
            raw_mean,
            trend_mean
        );
    }

    #[test]
    fn degenerate_series_falls_back_to_raw() {
        let raw = vec![5.0, 6.0, 7.0];
        assert_eq!(smooth_trend(&raw, 51), raw);
    }

    #[test]
    fn trend_mean_of_empty_series_is_zero() {
        assert_eq!(average_power_mw(&[]), 0.0);
    }

    #[test]
    fn power_is_voltage_times_current() {
        let bus_v = Array1::from_elem(60, 3.3);
        let current = Array1::from_elem(60, 20.0);
        let trend = power_trend(bus_v.view(), current.view(), 51);
        assert_eq!(trend.len(), 60);
        for value in trend {
            assert!((value - 66.0).abs() < 1e-9);
        }
    }

    #[test]
    fn temperature_averages_only_positive_readings() {
        let temp = Array1::from_vec(vec![0.0, -1.0, 33.0, 35.0]);
        assert!((average_temperature(Some(temp.view())) - 34.0).abs() < 1e-12);
    }

    #[test]
    fn temperature_sentinel_when_no_valid_reading() {
        let temp = Array1::from_vec(vec![0.0, -3.0, -0.5]);
        assert_eq!(average_temperature(Some(temp.view())), 0.0);
        assert_eq!(average_temperature(None), 0.0);
    }
}
