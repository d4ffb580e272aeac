use ndarray::ArrayView1;

use crate::analysis::Calibration;
use crate::error::{Error, Result};

/// AC amplitudes and the derived perfusion/oximetry ratios for one capture.
#[derive(Debug, Clone, Copy)]
pub struct PulseRatios {
    pub ac_red_rms: f64,
    pub ac_ir_rms: f64,
    /// (AC_ir / DC_ir) * 100, before the display scale is applied.
    pub pi_raw: f64,
    /// (AC_red/DC_red) / (AC_ir/DC_ir), uncorrected.
    pub r_ratio: f64,
}

pub fn rms(signal: ArrayView1<f64>) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    (signal.fold(0.0, |acc, v| acc + v * v) / signal.len() as f64).sqrt()
}

/// Per-channel AC/DC ratios and the red/infrared ratio-of-ratios.
///
/// A zero DC level or a pulseless infrared channel leaves the ratio
/// undefined; that is a degenerate capture, not a computable outcome.
pub fn pulse_ratios(
    red_ac: ArrayView1<f64>,
    dc_red: f64,
    ir_ac: ArrayView1<f64>,
    dc_ir: f64,
) -> Result<PulseRatios> {
    if dc_ir == 0.0 {
        return Err(Error::DivisionByZero("infrared DC level is zero"));
    }
    if dc_red == 0.0 {
        return Err(Error::DivisionByZero("red DC level is zero"));
    }

    let ac_ir_rms = rms(ir_ac);
    let ac_red_rms = rms(red_ac);
    if ac_ir_rms == 0.0 {
        return Err(Error::DivisionByZero("infrared channel is pulseless"));
    }

    Ok(PulseRatios {
        ac_red_rms,
        ac_ir_rms,
        pi_raw: ac_ir_rms / dc_ir * 100.0,
        r_ratio: (ac_red_rms / dc_red) / (ac_ir_rms / dc_ir),
    })
}

/// Empirical quadratic SpO2 calibration over the corrected ratio, clipped to
/// the sensor's validated range. Out-of-range values are reporting
/// artifacts, never surfaced raw.
pub fn spo2_from_ratio(r_ratio: f64, calibration: &Calibration) -> f64 {
    let r = r_ratio * calibration.r_ratio_correction;
    let [a, b, c] = calibration.spo2_quadratic;
    let spo2 = a * r * r + b * r + c;
    let (lo, hi) = calibration.spo2_clamp;
    spo2.clamp(lo, hi)
}
