pub mod analysis;
pub mod error;
pub mod log;
pub mod record;
pub mod report;

pub use analysis::{Analysis, Artifacts, Calibration, Metrics, Parameters};
pub use error::Error;
pub use record::SampleSeries;
