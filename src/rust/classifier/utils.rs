use ndarray::ArrayViewD;

use super::error::ScanError;
use crate::preprocess::{input_shape, ImageTensor};
use crate::taxonomy::ProbabilityVector;

pub(crate) fn check_input_shape(tensor: &ImageTensor) -> Result<(), ScanError> {
    let expected = input_shape();
    if tensor.shape() != expected {
        return Err(ScanError::ShapeMismatch {
            expected: expected.to_vec(),
            actual: tensor.shape().to_vec(),
        });
    }
    Ok(())
}

/// Flattens a `[1, K]` (or `[K]`) model output into a validated vector.
pub(crate) fn output_to_probabilities(output: ArrayViewD<'_, f32>) -> Result<ProbabilityVector, ScanError> {
    let batch = output.shape().first().copied().unwrap_or(0);
    if output.ndim() > 1 && batch != 1 {
        return Err(ScanError::InvalidOutput(format!(
            "Expected a single batch row, got output shape {:?}",
            output.shape()
        )));
    }
    ProbabilityVector::new(output.iter().copied().collect())
}
