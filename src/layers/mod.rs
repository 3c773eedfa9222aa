pub mod feed_forward;
pub mod dropout;

use std::fmt::Debug;
use ndarray::{Array1, Array2};
use crate::activation::Activation;

/// Capability set shared by every dense layer kind the network stacks.
pub trait Layer: Debug {
    /// Width of the input vector
    fn inputs(&self) -> usize;
    /// Width of the output vector
    fn neurons(&self) -> usize;

    fn weights(&self) -> &Array2<f64>;
    fn bias(&self) -> &Array1<f64>;

    fn forward(&self, input: &Array1<f64>, activation: &Activation) -> Array1<f64>;

    /// Applies one gradient descent step. `input` must be the vector the
    /// matching `forward` call consumed.
    fn backward(&mut self, input: &Array1<f64>, error: &Array1<f64>, rate: f64);

    /// Whether input unit `index` contributed to the last forward pass
    fn is_kept(&self, _index: usize) -> bool {
        true
    }

    /// Factor applied to the weighted input contributions in forward
    fn scale(&self) -> f64 {
        1.0
    }

    fn parameter_count(&self) -> usize {
        self.weights().len() + self.bias().len()
    }
}

pub use feed_forward::FeedForwardLayer;
pub use dropout::DropoutLayer;
