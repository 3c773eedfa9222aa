use ndarray::Array1;

const HUBER_DELTA: f64 = 1.0;
const EPSILON: f64 = 1e-15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Loss {
    MeanSquaredError,
    MeanAbsoluteError,
    Huber,
    CrossEntropyLoss,
}

impl Loss {
    pub fn calculate(&self, prediction: &Array1<f64>, target: &Array1<f64>) -> f64 {
        match self {
            Loss::MeanSquaredError => mean_squared_error(prediction, target),
            Loss::MeanAbsoluteError => mean_absolute_error(prediction, target),
            Loss::Huber => huber(prediction, target),
            Loss::CrossEntropyLoss => cross_entropy(prediction, target),
        }
    }

    /// Derivative of the loss with respect to a single predicted unit.
    pub fn derivative(&self, prediction: f64, target: f64) -> f64 {
        match self {
            Loss::MeanSquaredError => mean_squared_error_prime(prediction, target),
            Loss::MeanAbsoluteError => mean_absolute_error_prime(prediction, target),
            Loss::Huber => huber_prime(prediction, target),
            Loss::CrossEntropyLoss => cross_entropy_prime(prediction, target),
        }
    }
}

/// A loss strategy as consumed by the network. `derivative` is the
/// per-unit gradient driving backpropagation; `calculate` is only used for
/// reporting.
#[derive(Clone, Copy)]
pub struct LossFunction {
    pub calculate: fn(&Array1<f64>, &Array1<f64>) -> f64,
    pub derivative: fn(f64, f64) -> f64,
}

impl LossFunction {
    pub fn new(
        calculate: fn(&Array1<f64>, &Array1<f64>) -> f64,
        derivative: fn(f64, f64) -> f64,
    ) -> Self {
        LossFunction { calculate, derivative }
    }
}

impl std::fmt::Debug for LossFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LossFunction").finish_non_exhaustive()
    }
}

impl From<Loss> for LossFunction {
    fn from(loss: Loss) -> Self {
        match loss {
            Loss::MeanSquaredError => LossFunction::new(mean_squared_error, mean_squared_error_prime),
            Loss::MeanAbsoluteError => LossFunction::new(mean_absolute_error, mean_absolute_error_prime),
            Loss::Huber => LossFunction::new(huber, huber_prime),
            Loss::CrossEntropyLoss => LossFunction::new(cross_entropy, cross_entropy_prime),
        }
    }
}

pub fn mean_squared_error(prediction: &Array1<f64>, target: &Array1<f64>) -> f64 {
    (target - prediction).mapv(|e| e * e).mean().unwrap_or(0.0)
}

// Gradient of the half squared error, so a unit step lands on the target
pub fn mean_squared_error_prime(prediction: f64, target: f64) -> f64 {
    prediction - target
}

pub fn mean_absolute_error(prediction: &Array1<f64>, target: &Array1<f64>) -> f64 {
    (prediction - target).mapv(f64::abs).mean().unwrap_or(0.0)
}

pub fn mean_absolute_error_prime(prediction: f64, target: f64) -> f64 {
    let diff = prediction - target;
    if diff > 0.0 {
        1.0
    } else if diff < 0.0 {
        -1.0
    } else {
        0.0
    }
}

pub fn huber(prediction: &Array1<f64>, target: &Array1<f64>) -> f64 {
    (target - prediction)
        .mapv(|e| {
            if e.abs() > HUBER_DELTA {
                HUBER_DELTA * (e.abs() - 0.5 * HUBER_DELTA)
            } else {
                0.5 * e * e
            }
        })
        .sum()
}

pub fn huber_prime(prediction: f64, target: f64) -> f64 {
    (prediction - target).clamp(-HUBER_DELTA, HUBER_DELTA)
}

// Cross entropy loss: -Σ(target * log(prediction)), clipped to avoid log(0)
pub fn cross_entropy(prediction: &Array1<f64>, target: &Array1<f64>) -> f64 {
    let safe_pred = prediction.mapv(|x| x.clamp(EPSILON, 1.0 - EPSILON));
    -(target * safe_pred.mapv(f64::ln)).sum()
}

pub fn cross_entropy_prime(prediction: f64, target: f64) -> f64 {
    -target / prediction.clamp(EPSILON, 1.0 - EPSILON)
}
