use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use slog::info;

use oxilab::analysis::{Analysis, Parameters};
use oxilab::record::loader;
use oxilab::report;

fn main() -> Result<()> {
    let logger = oxilab::log::create_logger("main".to_string());

    let path = env::args().nth(1).context("usage: oxilab <capture.csv>")?;
    info!(logger, "processing capture"; "file" => &path);

    let series =
        loader::load_series(Path::new(&path)).with_context(|| format!("loading {}", path))?;
    info!(logger, "cleaned series"; "rows" => series.len(), "span_s" => series.span_seconds());

    let analysis = Analysis::new(Parameters::default());
    let (metrics, _artifacts) = analysis.analyze(&series)?;

    println!("{}", report::render(&metrics, &analysis.params.calibration));
    Ok(())
}
