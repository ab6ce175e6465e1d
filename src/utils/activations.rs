//! Activation functions for perceptron layers
//!
//! Each layer owns one [`ActivationFunction`] by value. All three variants express
//! their derivative in terms of the activated *output* `y = f(x)`, which is the
//! value the layer already holds during backpropagation:
//!
//! - Sigmoid: `f'(x) = y * (1 - y)`
//! - ReLU: `f'(x) = 1` if `y > 0`, else `0`
//! - Parametric ReLU: `f'(x) = 1` if `y > 0`, else `leak` (the sign of `y`
//!   matches the sign of `x` for a positive leak)

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, Result};

/// Leak used by [`ActivationFunction::parametric_relu_default`].
pub const DEFAULT_LEAK: f64 = 0.01;

/// Elementwise nonlinearity applied after a layer's affine transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum ActivationFunction {
    /// Logistic function `1 / (1 + exp(-x))`.
    #[default]
    Sigmoid,
    /// Rectified linear unit `max(0, x)`.
    ReLU,
    /// Leaky rectifier `x` for `x > 0`, `leak * x` otherwise. The leak is fixed.
    ParametricReLU { leak: f64 },
}

impl ActivationFunction {
    /// Parametric ReLU with [`DEFAULT_LEAK`].
    pub fn parametric_relu_default() -> Self {
        ActivationFunction::ParametricReLU { leak: DEFAULT_LEAK }
    }

    /// Looks up a function by its [`name`](Self::name). `leak` is only used
    /// for `"parametric_relu"`.
    pub fn from_name(name: &str, leak: f64) -> Option<Self> {
        [
            ActivationFunction::Sigmoid,
            ActivationFunction::ReLU,
            ActivationFunction::ParametricReLU { leak },
        ]
        .into_iter()
        .find(|candidate| candidate.name() == name)
    }

    /// Fails unless a parametric ReLU leak is positive and finite.
    ///
    /// [`derivative`](Self::derivative) reads the sign of the pre-activation off
    /// the output, which only holds for a positive leak.
    pub fn validate(&self) -> Result<()> {
        match *self {
            ActivationFunction::ParametricReLU { leak } if !(leak.is_finite() && leak > 0.0) => {
                Err(NetworkError::InvalidConfiguration(format!(
                    "parametric ReLU leak must be positive and finite, got {leak}"
                )))
            }
            _ => Ok(()),
        }
    }

    /// Applies the function to a single pre-activation value.
    pub fn apply(&self, x: f64) -> f64 {
        match *self {
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            ActivationFunction::ParametricReLU { leak } => {
                if x > 0.0 {
                    x
                } else {
                    leak * x
                }
            }
        }
    }

    /// Derivative evaluated at the activated output `y`.
    pub fn derivative(&self, y: f64) -> f64 {
        match *self {
            ActivationFunction::Sigmoid => sigmoid_derivative(y),
            ActivationFunction::ReLU => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            ActivationFunction::ParametricReLU { leak } => {
                if y > 0.0 {
                    1.0
                } else {
                    leak
                }
            }
        }
    }

    /// Applies the function to every element.
    pub fn apply_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&x| self.apply(x)).collect()
    }

    /// Derivative at every element of an already activated vector.
    pub fn derivative_all(&self, outputs: &[f64]) -> Vec<f64> {
        outputs.iter().map(|&y| self.derivative(y)).collect()
    }

    /// Short lowercase name, matching the identifiers accepted in architecture files.
    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::ReLU => "relu",
            ActivationFunction::ParametricReLU { .. } => "parametric_relu",
        }
    }
}

/// Sigmoid activation function.
///
/// Returns the sigmoid of the input: 1 / (1 + exp(-x))
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative assuming x = sigmoid(z).
///
/// Returns the derivative: x * (1 - x)
pub fn sigmoid_derivative(x: f64) -> f64 {
    x * (1.0 - x)
}
