//! A small dense feedforward network trained by online gradient descent,
//! with optional inverted dropout.
//!
//! ```
//! use dnn::{ActivationType, Loss, Mode, Network, NetworkConfig};
//! use ndarray::array;
//!
//! let mut network = Network::new(
//!     NetworkConfig::new(&[2, 2, 1])
//!         .activation(ActivationType::Linear)
//!         .loss(Loss::MeanSquaredError)
//!         .learning_rate(0.05)
//!         .seed(42),
//! )
//! .unwrap();
//!
//! for _ in 0..200 {
//!     network.train(&array![1.0, 0.0], &array![1.0]);
//! }
//! network.set_mode(Mode::Inference);
//! assert_eq!(network.predict(&array![1.0, 0.0]).len(), 1);
//! ```

pub mod activation;
pub mod layers;
pub mod loss;
mod error;
mod hyperparameters;
mod network;
mod utils;

pub use activation::{Activation, ActivationType};
pub use error::NetworkError;
pub use hyperparameters::{Hyperparameters, NetworkConfig};
pub use layers::{DropoutLayer, FeedForwardLayer, Layer};
pub use loss::{Loss, LossFunction};
pub use network::{Mode, Network};
