use find_peaks::PeakFinder;
use ndarray::ArrayView1;

/// Pulse peaks in the filtered infrared channel.
///
/// The separation gate caps the detectable rate (0.45 s spacing is ~133 BPM)
/// so dicrotic notches are not double-counted; the prominence gate rejects
/// low-amplitude noise peaks relative to the signal's own spread.
pub fn detect_pulse_peaks(
    signal: ArrayView1<f64>,
    fs: f64,
    min_separation_s: f64,
    prominence_factor: f64,
) -> Vec<usize> {
    let slice: &[f64] = match signal.as_slice() {
        Some(s) => s,
        None => return Vec::new(),
    };
    if slice.len() < 3 {
        return Vec::new();
    }

    let distance = ((fs * min_separation_s) as usize).max(1);
    let prominence = prominence_factor * signal.std(0.0);

    let peaks = PeakFinder::new(slice)
        .with_min_prominence(prominence)
        .with_min_distance(distance)
        .find_peaks();

    let mut positions: Vec<usize> = peaks.iter().map(|p| p.position.start).collect();
    positions.sort_unstable();
    positions
}

/// Beats per minute from the detected peak count over the capture span.
/// Fewer than 2 peaks cannot establish a rhythm; 0.0 is the undetermined
/// sentinel, not an error.
pub fn estimate_hr(peak_count: usize, span_seconds: f64) -> f64 {
    if peak_count < 2 || span_seconds <= 0.0 {
        return 0.0;
    }
    peak_count as f64 / span_seconds * 60.0
}
