use biquad::{Biquad, Coefficients, DirectForm1, Q_BUTTERWORTH_F64, ToHertz, Type};
use ndarray::{Array1, ArrayView1};

use crate::error::{Error, Result};

/// Band-pass with zero net phase shift: `order/2` Butterworth-Q high-pass
/// sections at the low cutoff cascaded with `order/2` low-pass sections at
/// the high cutoff, run forward and then backward over the sequence. The
/// backward pass cancels the phase lag of the forward pass, so peak timing
/// in the output matches the input.
///
/// Fails when the high cutoff reaches Nyquist; the section design would be
/// unstable and must never be applied.
pub fn bandpass_filter(
    data: ArrayView1<f64>,
    lowcut: f64,
    highcut: f64,
    order: u32,
    fs: f64,
) -> Result<Array1<f64>> {
    if highcut >= 0.5 * fs {
        return Err(Error::FilterDesign { highcut, fs });
    }

    let low_coeff = Coefficients::<f64>::from_params(
        Type::LowPass,
        fs.hz(),
        highcut.hz(),
        Q_BUTTERWORTH_F64,
    )
    .map_err(|_| Error::FilterDesign { highcut, fs })?;

    let high_coeff = Coefficients::<f64>::from_params(
        Type::HighPass,
        fs.hz(),
        lowcut.hz(),
        Q_BUTTERWORTH_F64,
    )
    .map_err(|_| Error::FilterDesign { highcut, fs })?;

    // Each section is second order, so order 4 means two of each kind per pass.
    let sections = (order.max(2) / 2) as usize;

    let mut filtered = data.to_owned();
    for _ in 0..sections {
        filtered = forward_filter(filtered.view(), &low_coeff);
        filtered = forward_filter(filtered.view(), &high_coeff);
    }
    for _ in 0..sections {
        filtered = backward_filter(filtered.view(), &low_coeff);
        filtered = backward_filter(filtered.view(), &high_coeff);
    }

    Ok(filtered)
}

fn forward_filter(data: ArrayView1<f64>, coefficients: &Coefficients<f64>) -> Array1<f64> {
    let mut filter = DirectForm1::<f64>::new(*coefficients);

    let mut processed_data = data.to_owned();
    for sample in processed_data.iter_mut() {
        *sample = filter.run(*sample);
    }

    processed_data
}

fn backward_filter(data: ArrayView1<f64>, coefficients: &Coefficients<f64>) -> Array1<f64> {
    // Fresh filter state per pass
    let mut filter = DirectForm1::<f64>::new(*coefficients);

    let mut processed_data = data.to_owned();

    // Reverse, run, re-reverse to restore original order
    if let Some(slice) = processed_data.as_slice_mut() {
        slice.reverse();
    }
    for sample in processed_data.iter_mut() {
        *sample = filter.run(*sample);
    }
    if let Some(slice) = processed_data.as_slice_mut() {
        slice.reverse();
    }

    processed_data
}
