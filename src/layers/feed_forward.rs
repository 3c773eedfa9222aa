use crate::activation::Activation;
use crate::layers::Layer;
use crate::utils::outer_product;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::StandardNormal;

/// A fully connected layer.
///
/// Weights are stored as `(inputs × neurons)`, so column `j` holds the
/// incoming weights of unit `j`.
#[derive(Debug, Clone)]
pub struct FeedForwardLayer {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl FeedForwardLayer {
    /// Constructs a layer with every weight and bias drawn from a standard
    /// normal distribution
    ///
    /// # Arguments
    ///
    /// * `inputs` - Number of inputs to this layer
    /// * `neurons` - Number of neurons in this layer
    /// * `rng` - Random source used for initialization
    pub fn new<R: Rng + ?Sized>(inputs: usize, neurons: usize, rng: &mut R) -> Self {
        let weights = Array2::<f64>::from_shape_fn((inputs, neurons), |_| rng.sample(StandardNormal));
        let bias = Array1::<f64>::from_shape_fn(neurons, |_| rng.sample(StandardNormal));

        FeedForwardLayer { weights, bias }
    }

    /// Builds a layer from known parameters
    pub fn from_parameters(weights: Array2<f64>, bias: Array1<f64>) -> Self {
        assert_eq!(weights.ncols(), bias.len(), "Bias size does not match layer's neuron count");
        FeedForwardLayer { weights, bias }
    }

    /// Activates `bias + scale * Σ contributions`, where `keep` selects which
    /// input rows contribute.
    pub(crate) fn forward_masked(
        &self,
        input: &Array1<f64>,
        activation: &Activation,
        keep: impl Fn(usize) -> bool,
        scale: f64,
    ) -> Array1<f64> {
        assert_eq!(input.len(), self.inputs(), "Input size does not match layer's input size");

        let mut sum = Array1::<f64>::zeros(self.neurons());
        for (i, row) in self.weights.outer_iter().enumerate() {
            if keep(i) {
                sum.scaled_add(input[i], &row);
            }
        }

        (sum * scale + &self.bias).mapv(activation.apply)
    }

    /// Gradient step restricted to the input rows selected by `keep`
    pub(crate) fn backward_masked(
        &mut self,
        input: &Array1<f64>,
        error: &Array1<f64>,
        rate: f64,
        keep: impl Fn(usize) -> bool,
    ) {
        assert_eq!(input.len(), self.inputs(), "Input size does not match layer's input size");
        assert_eq!(error.len(), self.neurons(), "Error size does not match layer's neuron count");

        for (i, mut row) in self.weights.outer_iter_mut().enumerate() {
            if keep(i) {
                row.scaled_add(-rate * input[i], error);
            }
        }
        self.bias.scaled_add(-rate, error);
    }
}

impl Layer for FeedForwardLayer {
    fn inputs(&self) -> usize {
        self.weights.nrows()
    }

    fn neurons(&self) -> usize {
        self.weights.ncols()
    }

    fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    fn forward(&self, input: &Array1<f64>, activation: &Activation) -> Array1<f64> {
        assert_eq!(input.len(), self.inputs(), "Input size does not match layer's input size");

        let output = input.dot(&self.weights) + &self.bias;
        output.mapv(activation.apply)
    }

    fn backward(&mut self, input: &Array1<f64>, error: &Array1<f64>, rate: f64) {
        assert_eq!(input.len(), self.inputs(), "Input size does not match layer's input size");
        assert_eq!(error.len(), self.neurons(), "Error size does not match layer's neuron count");

        self.weights.scaled_add(-rate, &outer_product(input.view(), error.view()));
        self.bias.scaled_add(-rate, error);
    }
}
