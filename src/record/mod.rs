use ndarray::Array1;

pub mod loader;

/// A cleaned capture: column-oriented, strictly time-ordered, edge-trimmed,
/// re-indexed from zero. The whole series is held in memory because the
/// zero-phase filter downstream needs the full sequence.
pub struct SampleSeries {
    pub time_ms: Array1<f64>,
    pub red: Array1<f64>,
    pub ir: Array1<f64>,
    pub temp: Option<Array1<f64>>,
    pub bus_v: Array1<f64>,
    pub current_ma: Array1<f64>,
}

impl SampleSeries {
    pub fn len(&self) -> usize {
        self.time_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_ms.is_empty()
    }

    /// Elapsed time between the first and last sample, in seconds.
    pub fn span_seconds(&self) -> f64 {
        if self.len() < 2 {
            return 0.0;
        }
        (self.time_ms[self.len() - 1] - self.time_ms[0]) / 1000.0
    }
}
