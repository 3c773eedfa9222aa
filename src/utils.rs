use ndarray::{Array1, Array2, ArrayView1, Axis};

/// `lhs ⊗ rhs`, shaped `(lhs.len(), rhs.len())`
pub fn outer_product(lhs: ArrayView1<f64>, rhs: ArrayView1<f64>) -> Array2<f64> {
    let a = lhs.insert_axis(Axis(1));
    let b = rhs.insert_axis(Axis(0));

    a.dot(&b)
}

/// Largest element, ignoring NaNs; `-inf` for an empty vector
pub fn max_value(values: &Array1<f64>) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
