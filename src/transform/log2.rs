//! Log2 transform with a zero floor

use crate::data::LabeledMatrix;

/// log2 of a single value, with non-positive (and NaN) inputs mapped to 0
#[inline]
pub fn floored_log2(value: f64) -> f64 {
    if value > 0.0 {
        value.log2()
    } else {
        0.0
    }
}

/// Elementwise `log2(x)` for `x > 0`, and 0 otherwise.
/// Expression data can contain zeros and background-subtracted negatives;
/// flooring keeps every output finite.
pub fn log2_transform(matrix: &LabeledMatrix) -> LabeledMatrix {
    let mut out = matrix.clone();
    let mut floored = 0usize;
    out.values_mut().mapv_inplace(|v| {
        if !(v > 0.0) {
            floored += 1;
        }
        floored_log2(v)
    });
    if floored > 0 {
        log::debug!("log2: {} non-positive values set to 0", floored);
    }
    out
}
