use log::{debug, info};
use ndarray::{Array1, Zip};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::activation::Activation;
use crate::error::NetworkError;
use crate::hyperparameters::{Hyperparameters, NetworkConfig};
use crate::layers::dropout::validate_rate;
use crate::layers::{DropoutLayer, Layer};
use crate::loss::LossFunction;
use crate::utils::max_value;

/// Whether dropout masks and scaling are applied by forward passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Training,
    Inference,
}

/// A dense feedforward network trained one sample at a time.
#[derive(Debug, Clone)]
pub struct Network {
    learning_rate: f64,
    hidden: Vec<DropoutLayer>,
    output: DropoutLayer,
    hidden_activation: Activation,
    output_activation: Activation,
    loss: LossFunction,
    rng: StdRng,
    mode: Mode,
}

impl Network {
    /// Create a new network from `config`.
    ///
    /// `config.sizes` lists the width of every stage, `[inputs, h1, ..., outputs]`;
    /// every stage after the input becomes one layer. All weights and biases
    /// are drawn from a standard normal distribution.
    pub fn new(config: NetworkConfig) -> Result<Self, NetworkError> {
        let sizes = &config.sizes;
        if sizes.len() < 2 {
            return Err(NetworkError::TooFewLayers(sizes.len()));
        }
        if let Some(index) = sizes.iter().position(|&size| size == 0) {
            return Err(NetworkError::EmptyLayer { index });
        }
        if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
            return Err(NetworkError::InvalidLearningRate(config.learning_rate));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let depth = sizes.len() - 2;
        let hidden: Vec<DropoutLayer> = sizes
            .windows(2)
            .take(depth)
            .map(|pair| DropoutLayer::new(pair[0], pair[1], &mut rng))
            .collect();
        let output = DropoutLayer::new(sizes[depth], sizes[depth + 1], &mut rng);

        debug!(
            "built network {:?} with {} hidden layer(s), learning rate {}",
            sizes, depth, config.learning_rate
        );

        Ok(Network {
            learning_rate: config.learning_rate,
            hidden,
            output,
            hidden_activation: config.hidden_activation,
            output_activation: config.output_activation,
            loss: config.loss,
            rng,
            mode: Mode::Training,
        })
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn input_len(&self) -> usize {
        self.hidden.first().unwrap_or(&self.output).inputs()
    }

    pub fn output_len(&self) -> usize {
        self.output.neurons()
    }

    pub fn hidden_layers(&self) -> &[DropoutLayer] {
        &self.hidden
    }

    pub fn output_layer(&self) -> &DropoutLayer {
        &self.output
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switches every layer between masked training passes and plain
    /// inference passes. Dropout rates and masks are left untouched.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        let is_training = mode == Mode::Training;
        for layer in self.hidden.iter_mut() {
            layer.set_training(is_training);
        }
        self.output.set_training(is_training);
    }

    /// Sets dropout rates and redraws every mask.
    ///
    /// `rates` holds either one rate for the whole network or one rate per
    /// layer, hidden layers first and the output layer last. Masks persist
    /// until the next call, so reset to `&[0.0]` (or switch to
    /// [`Mode::Inference`]) before evaluating.
    pub fn set_dropout(&mut self, rates: &[f64]) -> Result<(), NetworkError> {
        let expected = self.hidden.len() + 1;
        if rates.len() != 1 && rates.len() != expected {
            return Err(NetworkError::DropoutRateCount { expected, actual: rates.len() });
        }
        for &rate in rates {
            validate_rate(rate)?;
        }

        let rate_for = |index: usize| if rates.len() == 1 { rates[0] } else { rates[index] };
        for (index, layer) in self.hidden.iter_mut().enumerate() {
            layer.set_dropout(rate_for(index), &mut self.rng)?;
        }
        self.output.set_dropout(rate_for(expected - 1), &mut self.rng)?;

        debug!("dropout rates set to {:?}", rates);
        Ok(())
    }

    /// Feeds `input` through every layer and returns the prediction
    pub fn predict(&self, input: &Array1<f64>) -> Array1<f64> {
        let hidden = self
            .hidden
            .iter()
            .fold(input.clone(), |x, layer| layer.forward(&x, &self.hidden_activation));
        self.output.forward(&hidden, &self.output_activation)
    }

    /// Activations of every stage: the input first, the prediction last
    fn forward_trace(&self, input: &Array1<f64>) -> Vec<Array1<f64>> {
        let mut trace = Vec::with_capacity(self.hidden.len() + 2);
        trace.push(input.clone());
        for layer in &self.hidden {
            let next = layer.forward(&trace[trace.len() - 1], &self.hidden_activation);
            trace.push(next);
        }
        let prediction = self.output.forward(&trace[trace.len() - 1], &self.output_activation);
        trace.push(prediction);
        trace
    }

    /// Performs one forward pass and one backpropagation sweep on a single
    /// example, updating every layer.
    pub fn train(&mut self, input: &Array1<f64>, target: &Array1<f64>) {
        assert_eq!(target.len(), self.output_len(), "Target size does not match network's output size");

        let trace = self.forward_trace(input);
        let depth = self.hidden.len();
        let rate = self.learning_rate;

        let loss_prime = self.loss.derivative;
        let output_prime = self.output_activation.derivative;
        let hidden_prime = self.hidden_activation.derivative;

        let error = Zip::from(&trace[depth + 1])
            .and(target)
            .map_collect(|&prediction, &target| loss_prime(prediction, target) * output_prime(prediction));

        // Each signal sent down is taken from the layer just updated.
        self.output.backward(&trace[depth], &error, rate);
        let mut downstream = self.output.weights().dot(&error);

        for k in (0..depth).rev() {
            let upper: &dyn Layer = if k + 1 == depth { &self.output } else { &self.hidden[k + 1] };
            let error = hidden_error(upper, &downstream, &trace[k + 1], hidden_prime);

            let layer = &mut self.hidden[k];
            layer.backward(&trace[k], &error, rate);
            if k > 0 {
                downstream = layer.weights().dot(&error);
            }
        }
    }

    /// Counts the samples whose one-hot target unit holds the maximum
    /// prediction. Ties with other units count as correct.
    pub fn evaluate(&self, inputs: &[Array1<f64>], targets: &[Array1<f64>]) -> usize {
        assert_eq!(inputs.len(), targets.len(), "Number of inputs does not match number of targets");

        inputs
            .iter()
            .zip(targets)
            .filter(|(input, target)| {
                let prediction = self.predict(input);
                let class = target.iter().position(|&y| y == 1.0).unwrap_or(0);
                let max = max_value(&prediction);
                prediction.get(class).is_some_and(|&p| p == max)
            })
            .count()
    }

    /// Mean loss over a set of samples
    pub fn loss(&self, inputs: &[Array1<f64>], targets: &[Array1<f64>]) -> f64 {
        assert_eq!(inputs.len(), targets.len(), "Number of inputs does not match number of targets");
        if inputs.is_empty() {
            return 0.0;
        }

        let total: f64 = inputs
            .iter()
            .zip(targets)
            .map(|(input, target)| (self.loss.calculate)(&self.predict(input), target))
            .sum();
        total / inputs.len() as f64
    }

    /// Mean loss of the whole network, ignoring any dropout masks in place.
    /// The current mode is restored afterwards.
    fn full_loss(&mut self, inputs: &[Array1<f64>], targets: &[Array1<f64>]) -> f64 {
        let mode = self.mode;
        self.set_mode(Mode::Inference);
        let loss = self.loss(inputs, targets);
        self.set_mode(mode);
        loss
    }

    /// Trains for `hyperparameters.epochs` epochs, redrawing dropout masks at
    /// the start of each one, then resets dropout to 0. Returns the final
    /// mean loss.
    ///
    /// The loss logged every `log_every` epochs is that of the full network,
    /// not of the subnetwork the epoch's masks selected.
    pub fn fit(
        &mut self,
        inputs: &[Array1<f64>],
        targets: &[Array1<f64>],
        hyperparameters: &Hyperparameters,
    ) -> Result<f64, NetworkError> {
        if inputs.len() != targets.len() {
            return Err(NetworkError::SampleCountMismatch {
                inputs: inputs.len(),
                targets: targets.len(),
            });
        }

        let epochs = hyperparameters.epochs;
        for epoch in 0..epochs {
            self.set_dropout(&hyperparameters.dropout)?;
            for (input, target) in inputs.iter().zip(targets) {
                self.train(input, target);
            }

            let log_every = hyperparameters.log_every;
            if log_every > 0 && (epoch + 1) % log_every == 0 {
                info!("Epoch {} / {}, Loss: {}", epoch + 1, epochs, self.full_loss(inputs, targets));
            }
        }

        self.set_dropout(&[0.0])?;
        Ok(self.loss(inputs, targets))
    }
}

/// Error of the layer below `upper`, given `downstream = upper.weights · upper_error`
/// and that layer's activated `outputs`. Inputs `upper` dropped get no error;
/// kept ones are scaled as they were in the forward pass.
fn hidden_error(
    upper: &dyn Layer,
    downstream: &Array1<f64>,
    outputs: &Array1<f64>,
    derivative: fn(f64) -> f64,
) -> Array1<f64> {
    let scale = upper.scale();
    Array1::from_shape_fn(outputs.len(), |j| {
        if upper.is_kept(j) {
            downstream[j] * derivative(outputs[j]) * scale
        } else {
            0.0
        }
    })
}
