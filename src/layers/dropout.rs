use log::trace;
use ndarray::{Array1, Array2};
use rand::Rng;

use super::{FeedForwardLayer, Layer};
use crate::activation::Activation;
use crate::error::NetworkError;

/// A dense layer whose *inputs* can be dropped out.
///
/// The mask is only redrawn by [`DropoutLayer::set_dropout`], so every
/// forward/backward pair until the next call shares one subnetwork.
#[derive(Debug, Clone)]
pub struct DropoutLayer {
    layer: FeedForwardLayer,
    dropout_rate: f64,
    mask: Vec<bool>,
    is_training: bool,
}

impl DropoutLayer {
    pub fn new<R: Rng + ?Sized>(inputs: usize, neurons: usize, rng: &mut R) -> Self {
        DropoutLayer::from_layer(FeedForwardLayer::new(inputs, neurons, rng))
    }

    /// Wraps a dense layer with rate 0 and every input kept
    pub fn from_layer(layer: FeedForwardLayer) -> Self {
        let mask = vec![true; layer.inputs()];
        DropoutLayer {
            layer,
            dropout_rate: 0.0,
            mask,
            is_training: true,
        }
    }

    /// Sets the dropout rate and redraws the mask, keeping each input with
    /// probability `1 - rate`.
    pub fn set_dropout<R: Rng + ?Sized>(&mut self, rate: f64, rng: &mut R) -> Result<(), NetworkError> {
        validate_rate(rate)?;
        self.dropout_rate = rate;

        for keep in self.mask.iter_mut() {
            *keep = rng.random::<f64>() >= rate;
        }
        // an all-dropped draw would zero the whole signal
        if !self.mask.iter().any(|&keep| keep) {
            trace!("dropout mask rolled all-false at rate {}, keeping unit 0", rate);
            if let Some(first) = self.mask.first_mut() {
                *first = true;
            }
        }

        Ok(())
    }

    pub fn set_training(&mut self, is_training: bool) {
        self.is_training = is_training;
    }

    pub fn is_training(&self) -> bool {
        self.is_training
    }

    pub fn dropout_rate(&self) -> f64 {
        self.dropout_rate
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }
}

pub(crate) fn validate_rate(rate: f64) -> Result<(), NetworkError> {
    if (0.0..1.0).contains(&rate) {
        Ok(())
    } else {
        Err(NetworkError::InvalidDropoutRate(rate))
    }
}

impl Layer for DropoutLayer {
    fn inputs(&self) -> usize {
        self.layer.inputs()
    }

    fn neurons(&self) -> usize {
        self.layer.neurons()
    }

    fn weights(&self) -> &Array2<f64> {
        self.layer.weights()
    }

    fn bias(&self) -> &Array1<f64> {
        self.layer.bias()
    }

    fn forward(&self, input: &Array1<f64>, activation: &Activation) -> Array1<f64> {
        if self.is_training {
            self.layer.forward_masked(input, activation, |i| self.mask[i], self.scale())
        } else {
            self.layer.forward(input, activation)
        }
    }

    fn backward(&mut self, input: &Array1<f64>, error: &Array1<f64>, rate: f64) {
        if self.is_training {
            let mask = &self.mask;
            self.layer.backward_masked(input, error, rate, |i| mask[i]);
        } else {
            self.layer.backward(input, error, rate);
        }
    }

    fn is_kept(&self, index: usize) -> bool {
        !self.is_training || self.mask[index]
    }

    fn scale(&self) -> f64 {
        if self.is_training {
            1.0 / (1.0 - self.dropout_rate)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationType;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_layer() -> DropoutLayer {
        DropoutLayer::from_layer(FeedForwardLayer::from_parameters(
            array![[1.0, -1.0], [0.5, 2.0], [0.0, 1.0]],
            array![0.1, -0.2],
        ))
    }

    #[test]
    fn test_new_layer_keeps_everything() {
        let layer = DropoutLayer::new(5, 2, &mut StdRng::seed_from_u64(3));
        assert_eq!(layer.dropout_rate(), 0.0);
        assert_eq!(layer.mask(), &[true; 5]);
        assert_eq!(layer.scale(), 1.0);
    }

    #[test]
    fn test_rate_zero_matches_plain_forward() {
        let mut layer = fixed_layer();
        let plain = fixed_layer().layer;
        let input = array![0.5, -1.0, 2.0];
        let activation: Activation = ActivationType::Sigmoid.into();

        layer.set_dropout(0.0, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_abs_diff_eq!(
            layer.forward(&input, &activation),
            plain.forward(&input, &activation),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_mask_never_empty() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut layer = DropoutLayer::new(1, 1, &mut rng);
        for rate in [0.0, 0.5, 0.9, 0.999, 0.999_999] {
            for _ in 0..200 {
                layer.set_dropout(rate, &mut rng).unwrap();
                assert!(layer.mask().iter().any(|&keep| keep), "rate {}", rate);
            }
        }

        let mut wide = DropoutLayer::new(4, 1, &mut rng);
        for _ in 0..200 {
            wide.set_dropout(0.99, &mut rng).unwrap();
            assert!(wide.mask().iter().any(|&keep| keep));
        }
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let mut layer = fixed_layer();
        let mut rng = StdRng::seed_from_u64(0);
        for rate in [1.0, 1.5, -0.1, f64::NAN] {
            assert!(matches!(
                layer.set_dropout(rate, &mut rng),
                Err(NetworkError::InvalidDropoutRate(_))
            ));
        }
        assert_eq!(layer.dropout_rate(), 0.0);
    }

    #[test]
    fn test_masked_forward_scales_kept_inputs() {
        let mut layer = fixed_layer();
        layer.dropout_rate = 0.5;
        layer.mask = vec![true, false, true];
        let output = layer.forward(&array![1.0, 2.0, 3.0], &ActivationType::Linear.into());

        // bias + 2 * (1 * row0 + 3 * row2)
        assert_abs_diff_eq!(output, array![0.1 + 2.0, -0.2 + 2.0 * (-1.0 + 3.0)], epsilon = 1e-12);
        assert!(!layer.is_kept(1));
        assert_eq!(layer.scale(), 2.0);
    }

    #[test]
    fn test_masked_backward_leaves_dropped_rows() {
        let mut layer = fixed_layer();
        layer.dropout_rate = 0.5;
        layer.mask = vec![true, false, true];
        layer.backward(&array![1.0, 2.0, 3.0], &array![1.0, 1.0], 0.1);

        assert_eq!(layer.weights().row(1), array![0.5, 2.0]);
        assert_abs_diff_eq!(layer.weights().row(0), array![0.9, -1.1], epsilon = 1e-12);
        assert_abs_diff_eq!(layer.weights().row(2), array![-0.3, 0.7], epsilon = 1e-12);
        assert_abs_diff_eq!(*layer.bias(), array![0.0, -0.3], epsilon = 1e-12);
    }

    #[test]
    fn test_inference_ignores_mask() {
        let mut layer = fixed_layer();
        let plain = fixed_layer().layer;
        let input = array![1.0, 2.0, 3.0];
        let activation: Activation = ActivationType::Linear.into();

        layer.set_dropout(0.9, &mut StdRng::seed_from_u64(2)).unwrap();
        layer.set_training(false);

        assert!(!layer.is_training());
        assert!((0..3).all(|i| layer.is_kept(i)));
        assert_eq!(layer.scale(), 1.0);
        assert_abs_diff_eq!(
            layer.forward(&input, &activation),
            plain.forward(&input, &activation),
            epsilon = 1e-12
        );
    }
}
