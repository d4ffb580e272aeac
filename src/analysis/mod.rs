use std::error::Error as StdError;

use ndarray::{Array1, ArrayView1};
use ndarray_stats::QuantileExt;
use serde::Serialize;
use slog::{debug, info, warn, Logger};

pub mod filter;
pub mod hr;
pub mod oximetry;
pub mod power;
pub mod spectral;

#[cfg(test)]
mod plotters;

use crate::error::Result;
use crate::record::SampleSeries;
use spectral::Psd;

/// Sensor-batch calibration. The PI display scale, the R-ratio correction
/// and the clamp bounds are hand-tuned against one hardware revision;
/// recalibrate them when the optical front-end changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calibration {
    /// ADC ceiling of the optical front-end.
    pub adc_full_scale: f64,
    /// Reporting convention only: displayed PI is the raw index times this.
    pub pi_display_scale: f64,
    /// Scales the raw ratio-of-ratios before the quadratic map.
    pub r_ratio_correction: f64,
    /// SpO2 = a·r² + b·r + c over the corrected ratio.
    pub spo2_quadratic: [f64; 3],
    /// Validated reporting range; values outside it are clipped.
    pub spo2_clamp: (f64, f64),
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            adc_full_scale: 262_143.0,
            pi_display_scale: 10.0,
            r_ratio_correction: 0.45,
            spo2_quadratic: [-45.060, 30.354, 94.845],
            spo2_clamp: (92.0, 99.0),
        }
    }
}

/// Per-run tuning, immutable once the analysis starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameters {
    /// Fallback when the capture timestamps cannot establish a rate.
    pub fs_default: f64,
    pub filter_cutoff_low: f64,
    pub filter_cutoff_high: f64,
    pub filter_order: u32,
    pub peak_min_separation_s: f64,
    pub peak_prominence_factor: f64,
    pub snr_segment_max: usize,
    pub snr_noise_floor: f64,
    pub power_window_cap: usize,
    pub calibration: Calibration,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            fs_default: 100.0,
            filter_cutoff_low: 0.7,
            filter_cutoff_high: 3.5,
            filter_order: 4,
            peak_min_separation_s: 0.45,
            peak_prominence_factor: 0.5,
            snr_segment_max: 1024,
            snr_noise_floor: 0.005,
            power_window_cap: 51,
            calibration: Calibration::default(),
        }
    }
}

/// One run's derived record. Nothing here carries across runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub fs_hz: f64,
    pub hr_bpm: f64,
    pub spo2_pct: f64,
    pub pi_pct: f64,
    pub snr_db: f64,
    pub ir_dc: f64,
    pub headroom_pct: f64,
    pub avg_temp_c: f64,
    pub avg_power_mw: f64,
}

/// Derived signals handed to the visualization collaborator: pulse waveform
/// with peak indices, the PSD, and the power trend. Consumed downstream
/// only; nothing feeds back into the pipeline.
pub struct Artifacts {
    pub ir_ac: Array1<f64>,
    pub red_ac: Array1<f64>,
    pub peaks: Vec<usize>,
    pub psd: Psd,
    pub power_trend: Vec<f64>,
}

type Plotter = Box<
    dyn Fn(
            ArrayView1<f64>,
            &str,
            &str,
            Option<Vec<usize>>,
        ) -> std::result::Result<(), Box<dyn StdError>>
        + Send
        + Sync,
>;

pub struct Analysis {
    pub params: Parameters,

    pub plotter: Option<Plotter>,

    logger: Logger,
}

impl Analysis {
    pub fn new(params: Parameters) -> Self {
        let logger = crate::log::create_logger("analysis".to_string());
        Self {
            params,
            plotter: None,
            logger,
        }
    }

    /// Run the whole pipeline over one cleaned capture.
    pub fn analyze(&self, series: &SampleSeries) -> Result<(Metrics, Artifacts)> {
        let params = &self.params;
        let cal = &params.calibration;

        let fs = estimate_sampling_rate(series.time_ms.view(), params.fs_default);
        debug!(self.logger, "estimated sampling rate"; "fs_hz" => fs, "rows" => series.len());

        self.check_saturation(series);

        let ir_dc = series.ir.mean().unwrap_or(0.0);
        let red_dc = series.red.mean().unwrap_or(0.0);

        let ir_centered = &series.ir - ir_dc;
        let red_centered = &series.red - red_dc;
        self.plot_signal(ir_centered.view(), "IR (DC removed)", "signal_ir_raw.png", None);

        let ir_ac = filter::bandpass_filter(
            ir_centered.view(),
            params.filter_cutoff_low,
            params.filter_cutoff_high,
            params.filter_order,
            fs,
        )?;
        let red_ac = filter::bandpass_filter(
            red_centered.view(),
            params.filter_cutoff_low,
            params.filter_cutoff_high,
            params.filter_order,
            fs,
        )?;
        self.plot_signal(ir_ac.view(), "IR AC (filtered)", "signal_ir_ac.png", None);

        let peaks = hr::detect_pulse_peaks(
            ir_ac.view(),
            fs,
            params.peak_min_separation_s,
            params.peak_prominence_factor,
        );
        let hr_bpm = hr::estimate_hr(peaks.len(), series.span_seconds());
        debug!(self.logger, "pulse detection"; "peaks" => peaks.len(), "hr_bpm" => hr_bpm);
        self.plot_signal(
            ir_ac.view(),
            "Pulse peaks",
            "signal_peaks.png",
            Some(peaks.clone()),
        );

        let ratios = oximetry::pulse_ratios(red_ac.view(), red_dc, ir_ac.view(), ir_dc)?;
        let spo2_pct = oximetry::spo2_from_ratio(ratios.r_ratio, cal);
        let pi_pct = ratios.pi_raw * cal.pi_display_scale;

        let psd = spectral::welch_psd(
            ir_ac.as_slice().unwrap_or(&[]),
            fs,
            params.snr_segment_max,
        );
        let snr_db = spectral::bounded_snr_db(
            &psd,
            (params.filter_cutoff_low, params.filter_cutoff_high),
            params.snr_noise_floor,
        );

        let power_trend = power::power_trend(
            series.bus_v.view(),
            series.current_ma.view(),
            params.power_window_cap,
        );
        let avg_power_mw = power::average_power_mw(&power_trend);
        let avg_temp_c = power::average_temperature(series.temp.as_ref().map(|t| t.view()));

        let headroom_pct = (cal.adc_full_scale - ir_dc) / cal.adc_full_scale * 100.0;

        info!(self.logger, "analysis complete";
            "hr_bpm" => hr_bpm,
            "spo2_pct" => spo2_pct,
            "snr_db" => snr_db,
            "avg_power_mw" => avg_power_mw
        );

        let metrics = Metrics {
            fs_hz: fs,
            hr_bpm,
            spo2_pct,
            pi_pct,
            snr_db,
            ir_dc,
            headroom_pct,
            avg_temp_c,
            avg_power_mw,
        };
        let artifacts = Artifacts {
            ir_ac,
            red_ac,
            peaks,
            psd,
            power_trend,
        };
        Ok((metrics, artifacts))
    }

    fn check_saturation(&self, series: &SampleSeries) {
        let full_scale = self.params.calibration.adc_full_scale;
        for (name, channel) in [("ir", &series.ir), ("red", &series.red)] {
            if let Ok(&max) = channel.max() {
                if max >= full_scale {
                    warn!(self.logger, "channel reaches ADC full scale, capture is clipped";
                        "channel" => name, "max" => max);
                }
            }
        }
    }

    fn plot_signal(
        &self,
        signal: ArrayView1<f64>,
        title: &str,
        filename: &str,
        points: Option<Vec<usize>>,
    ) {
        if let Some(plot) = &self.plotter {
            if let Err(e) = plot(signal, title, filename, points) {
                warn!(self.logger, "plot failed"; "file" => filename, "error" => %e);
            }
        }
    }
}

/// Effective sampling rate from the mean inter-sample delta. The capture is
/// assumed near-uniform; nothing downstream resamples.
pub fn estimate_sampling_rate(time_ms: ArrayView1<f64>, fs_default: f64) -> f64 {
    if time_ms.len() < 2 {
        return fs_default;
    }
    let mut sum = 0.0;
    for pair in time_ms.windows(2) {
        sum += pair[1] - pair[0];
    }
    let mean_delta = sum / (time_ms.len() - 1) as f64;
    if mean_delta > 0.0 && mean_delta.is_finite() {
        1000.0 / mean_delta
    } else {
        fs_default
    }
}
