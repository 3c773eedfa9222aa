use crate::activation::{Activation, ActivationType};
use crate::loss::{Loss, LossFunction};

/// Construction parameters for a [`Network`](crate::Network)
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Widths of every stage, input first and output last
    pub sizes: Vec<usize>,

    /// Step size of the gradient descent update
    pub learning_rate: f64,

    pub hidden_activation: Activation,
    pub output_activation: Activation,
    pub loss: LossFunction,

    /// Seed for weight initialization and dropout masks; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl NetworkConfig {
    pub fn new(sizes: &[usize]) -> Self {
        NetworkConfig {
            sizes: sizes.to_vec(),
            ..Default::default()
        }
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn hidden_activation(mut self, activation: impl Into<Activation>) -> Self {
        self.hidden_activation = activation.into();
        self
    }

    pub fn output_activation(mut self, activation: impl Into<Activation>) -> Self {
        self.output_activation = activation.into();
        self
    }

    /// Uses the same activation for hidden and output layers
    pub fn activation(self, activation: impl Into<Activation>) -> Self {
        let activation = activation.into();
        self.hidden_activation(activation).output_activation(activation)
    }

    pub fn loss(mut self, loss: impl Into<LossFunction>) -> Self {
        self.loss = loss.into();
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            sizes: vec![1, 1],
            learning_rate: 0.1,
            hidden_activation: ActivationType::Sigmoid.into(),
            output_activation: ActivationType::Sigmoid.into(),
            loss: Loss::MeanSquaredError.into(),
            seed: None,
        }
    }
}

/// Hyperparameters for the training loop
#[derive(Debug, Clone)]
pub struct Hyperparameters {
    /// Number of training epochs
    pub epochs: usize,

    /// Dropout rates redrawn at the start of every epoch
    pub dropout: Vec<f64>,

    /// Log the epoch loss every `log_every` epochs (0 disables)
    pub log_every: usize,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Hyperparameters {
            epochs: 100,
            dropout: vec![0.0],
            log_every: 10,
        }
    }
}
