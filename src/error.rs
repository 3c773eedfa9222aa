use thiserror::Error;

/// Configuration errors raised while building or reconfiguring a network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("A network needs at least an input and an output size, got {0} size(s)")]
    TooFewLayers(usize),

    #[error("Layer {index} has zero units")]
    EmptyLayer { index: usize },

    #[error("Learning rate must be finite and positive, got {0}")]
    InvalidLearningRate(f64),

    #[error("Expected 1 or {expected} dropout rates, got {actual}")]
    DropoutRateCount { expected: usize, actual: usize },

    #[error("Dropout rate must be in [0, 1), got {0}")]
    InvalidDropoutRate(f64),

    #[error("Got {inputs} inputs but {targets} targets")]
    SampleCountMismatch { inputs: usize, targets: usize },
}
