use std::fs::File;
use std::io;
use std::path::Path;

use ndarray::Array1;

use crate::error::{Error, Result};
use crate::record::SampleSeries;

pub const REQUIRED_COLUMNS: [&str; 5] = ["Time(ms)", "Red", "IR", "Bus_V", "Current_mA"];
pub const TEMP_COLUMN: &str = "Temp";

/// Fraction of rows dropped from each end of the capture, guarding against
/// filter warm-up and connection transients.
const EDGE_TRIM_FRACTION: f64 = 0.05;

/// Fewer usable rows than this cannot carry any rhythm information.
const MIN_ROWS: usize = 2;

pub fn load_series(path: &Path) -> Result<SampleSeries> {
    let file = File::open(path)?;
    read_series(file)
}

/// Parse a capture from any reader. Header names may be whitespace-padded;
/// every mandatory cell (and `Temp` when the column exists) must coerce to a
/// finite float or the whole row is dropped. The acquisition side appends
/// best-effort serial lines, so ragged or garbled rows are skipped, and a
/// re-sent header line inside the data region fails coercion like any other
/// bad row.
pub fn read_series<R: io::Read>(input: R) -> Result<SampleSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut column_indices = [0usize; REQUIRED_COLUMNS.len()];
    for (slot, name) in column_indices.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::Schema(name.to_string()))?;
    }
    let temp_index = headers.iter().position(|h| h == TEMP_COLUMN);

    let mut time_ms = Vec::new();
    let mut red = Vec::new();
    let mut ir = Vec::new();
    let mut bus_v = Vec::new();
    let mut current_ma = Vec::new();
    let mut temp: Option<Vec<f64>> = temp_index.map(|_| Vec::new());

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => continue,
        };

        let mut row = [0.0f64; REQUIRED_COLUMNS.len()];
        let mut usable = true;
        for (slot, &idx) in row.iter_mut().zip(&column_indices) {
            match record.get(idx).and_then(parse_finite) {
                Some(v) => *slot = v,
                None => {
                    usable = false;
                    break;
                }
            }
        }
        if !usable {
            continue;
        }

        let row_temp = match temp_index {
            Some(idx) => match record.get(idx).and_then(parse_finite) {
                Some(v) => Some(v),
                None => continue,
            },
            None => None,
        };

        time_ms.push(row[0]);
        red.push(row[1]);
        ir.push(row[2]);
        bus_v.push(row[3]);
        current_ma.push(row[4]);
        if let (Some(col), Some(v)) = (temp.as_mut(), row_temp) {
            col.push(v);
        }
    }

    let rows = time_ms.len();
    let cut = (rows as f64 * EDGE_TRIM_FRACTION) as usize;
    if rows > 2 * cut && cut > 0 {
        for col in [&mut time_ms, &mut red, &mut ir, &mut bus_v, &mut current_ma] {
            trim_edges(col, cut);
        }
        if let Some(col) = temp.as_mut() {
            trim_edges(col, cut);
        }
    }

    if time_ms.len() < MIN_ROWS {
        return Err(Error::EmptySeries);
    }

    Ok(SampleSeries {
        time_ms: Array1::from_vec(time_ms),
        red: Array1::from_vec(red),
        ir: Array1::from_vec(ir),
        temp: temp.map(Array1::from_vec),
        bus_v: Array1::from_vec(bus_v),
        current_ma: Array1::from_vec(current_ma),
    })
}

fn parse_finite(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn trim_edges(col: &mut Vec<f64>, cut: usize) {
    let rows = col.len();
    col.drain(..cut);
    col.truncate(rows - 2 * cut);
}
