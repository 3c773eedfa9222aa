/// Enum representing different activation function types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActivationType {
    Sigmoid,
    ReLU,
    LeakyReLU,
    Tanh,
    Softplus,
    Linear,
}

impl ActivationType {
    /// Applies the activation function to a given input
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ActivationType::Sigmoid => sigmoid(x),
            ActivationType::ReLU => relu(x),
            ActivationType::LeakyReLU => leaky_relu(x),
            ActivationType::Tanh => tanh(x),
            ActivationType::Softplus => softplus(x),
            ActivationType::Linear => linear(x),
        }
    }

    /// Computes the derivative of the activation function.
    ///
    /// `y` is the *activated* output, which is what the network keeps around
    /// for every unit after a forward pass.
    pub fn derivative(&self, y: f64) -> f64 {
        match self {
            ActivationType::Sigmoid => sigmoid_prime(y),
            ActivationType::ReLU => relu_prime(y),
            ActivationType::LeakyReLU => leaky_relu_prime(y),
            ActivationType::Tanh => tanh_prime(y),
            ActivationType::Softplus => softplus_prime(y),
            ActivationType::Linear => linear_prime(y),
        }
    }
}

/// An activation strategy as consumed by the network: a pair of pure
/// scalar functions.
#[derive(Clone, Copy)]
pub struct Activation {
    pub apply: fn(f64) -> f64,
    pub derivative: fn(f64) -> f64,
}

impl Activation {
    pub fn new(apply: fn(f64) -> f64, derivative: fn(f64) -> f64) -> Self {
        Activation { apply, derivative }
    }
}

impl std::fmt::Debug for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Activation").finish_non_exhaustive()
    }
}

impl From<ActivationType> for Activation {
    fn from(activation: ActivationType) -> Self {
        match activation {
            ActivationType::Sigmoid => Activation::new(sigmoid, sigmoid_prime),
            ActivationType::ReLU => Activation::new(relu, relu_prime),
            ActivationType::LeakyReLU => Activation::new(leaky_relu, leaky_relu_prime),
            ActivationType::Tanh => Activation::new(tanh, tanh_prime),
            ActivationType::Softplus => Activation::new(softplus, softplus_prime),
            ActivationType::Linear => Activation::new(linear, linear_prime),
        }
    }
}

const LEAKY_SLOPE: f64 = 0.01;

pub fn linear(x: f64) -> f64 {
    x
}

pub fn linear_prime(_y: f64) -> f64 {
    1.0
}

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub fn sigmoid_prime(y: f64) -> f64 {
    y * (1.0 - y)
}

pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

pub fn tanh_prime(y: f64) -> f64 {
    1.0 - y * y
}

pub fn softplus(x: f64) -> f64 {
    x.exp().ln_1p()
}

// d/dx ln(1 + e^x) = sigmoid(x) = 1 - e^-y
pub fn softplus_prime(y: f64) -> f64 {
    -(-y).exp_m1()
}

pub fn relu(x: f64) -> f64 {
    x.max(0.0)
}

pub fn relu_prime(y: f64) -> f64 {
    if y > 0.0 { 1.0 } else { 0.0 }
}

pub fn leaky_relu(x: f64) -> f64 {
    if x > 0.0 { x } else { LEAKY_SLOPE * x }
}

pub fn leaky_relu_prime(y: f64) -> f64 {
    if y > 0.0 { 1.0 } else { LEAKY_SLOPE }
}
