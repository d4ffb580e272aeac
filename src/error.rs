use thiserror::Error;

/// Failures that abort an analysis run. Degenerate-but-valid measurement
/// outcomes (no peaks, no in-band spectral energy, no positive temperature
/// reading) are reported as 0.0 sentinels instead and never reach here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("record header is missing required column `{0}`")]
    Schema(String),

    #[error("no usable samples after numeric coercion and edge trimming")]
    EmptySeries,

    #[error("band-pass design invalid: high cutoff {highcut} Hz at fs {fs} Hz reaches Nyquist")]
    FilterDesign { highcut: f64, fs: f64 },

    #[error("ratio undefined, {0}")]
    DivisionByZero(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
