use rustfft::{num_complex::Complex, FftPlanner};
use std::f64::consts::PI;

/// One-sided power spectral density, V²/Hz against frequency in Hz.
#[derive(Debug, Clone, Default)]
pub struct Psd {
    pub freqs: Vec<f64>,
    pub power: Vec<f64>,
}

impl Psd {
    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }
}

/// Welch estimate: Hann-windowed segments with 50% overlap, per-segment mean
/// removal, periodograms averaged and normalized to density. Segment length
/// is capped by `max_segment` and by the signal itself.
pub fn welch_psd(signal: &[f64], fs: f64, max_segment: usize) -> Psd {
    let n = signal.len();
    if n < 2 || fs <= 0.0 {
        return Psd::default();
    }

    let nperseg = max_segment.clamp(2, n);
    let hop = nperseg - nperseg / 2;
    let window: Vec<f64> = (0..nperseg)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / nperseg as f64).cos()))
        .collect();
    let window_power: f64 = window.iter().map(|w| w * w).sum();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(nperseg);

    let bins = nperseg / 2 + 1;
    let mut accumulated = vec![0.0f64; bins];
    let mut segments = 0usize;
    let mut start = 0usize;
    while start + nperseg <= n {
        let segment = &signal[start..start + nperseg];
        let mean = segment.iter().sum::<f64>() / nperseg as f64;

        let mut buffer: Vec<Complex<f64>> = segment
            .iter()
            .zip(&window)
            .map(|(&s, &w)| Complex::new((s - mean) * w, 0.0))
            .collect();
        fft.process(&mut buffer);

        for (slot, value) in accumulated.iter_mut().zip(&buffer) {
            *slot += value.norm_sqr();
        }
        segments += 1;
        start += hop;
    }
    if segments == 0 {
        return Psd::default();
    }

    let scale = 1.0 / (fs * window_power * segments as f64);
    let mut power: Vec<f64> = accumulated.iter().map(|p| p * scale).collect();

    // One-sided: double everything except DC, and except Nyquist when the
    // segment length is even
    let upper = if nperseg % 2 == 0 { bins - 1 } else { bins };
    for slot in &mut power[1..upper] {
        *slot *= 2.0;
    }

    let freqs = (0..bins).map(|k| k as f64 * fs / nperseg as f64).collect();
    Psd { freqs, power }
}

/// Bounded in-band SNR in dB.
///
/// Noise power (total minus in-band) is floored at `noise_floor_frac` of the
/// in-band power before the ratio, so short or clean segments cannot report
/// an implausibly high figure. The floor value is calibrated against
/// downstream reports; keep its numeric behavior unchanged. Returns the 0.0
/// sentinel when no usable bin lands in the band.
pub fn bounded_snr_db(psd: &Psd, band: (f64, f64), noise_floor_frac: f64) -> f64 {
    let (low, high) = band;
    let first = psd.freqs.iter().position(|&f| f >= low);
    let last = psd.freqs.iter().rposition(|&f| f <= high);
    let (first, last) = match (first, last) {
        (Some(a), Some(b)) if a < b => (a, b),
        _ => return 0.0,
    };

    let signal_power = trapezoid(&psd.freqs[first..=last], &psd.power[first..=last]);
    if signal_power <= 0.0 {
        return 0.0;
    }
    let total_power = trapezoid(&psd.freqs, &psd.power);
    let noise_power = (total_power - signal_power).max(noise_floor_frac * signal_power);

    10.0 * (signal_power / noise_power).log10()
}

fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) * 0.5)
        .sum()
}
