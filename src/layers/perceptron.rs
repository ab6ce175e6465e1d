//! Fully connected perceptron layer with momentum updates
//!
//! This module provides [`PerceptronLayer`], which performs
//! `output = activation(weights · input + biases)` and trains its parameters
//! with averaged gradients blended into persistent momentum buffers.

use rand::Rng;
use tracing::trace;

use crate::error::{ensure_len, NetworkError, Result};
use crate::layers::Layer;
use crate::utils::activations::ActivationFunction;
use crate::utils::matrix::{add_into, blend_into, Matrix};

/// Dense layer owning its weights, biases, activation and training buffers.
///
/// # Fields
///
/// * `weights` - `outputs × inputs` matrix
/// * `biases` - one per output; all zero and never updated when bias is disabled
/// * `delta_weights` / `delta_biases` - gradients accumulated since the last update
/// * `momentum_weights` / `momentum_biases` - last applied step, kept for the lifetime of the layer
/// * `current_number_of_steps` - examples accumulated since the last update
///
/// # Example
///
/// ```
/// use multilayer_perceptron::layers::{Layer, PerceptronLayer};
/// use multilayer_perceptron::utils::{ActivationFunction, SimpleRng};
///
/// let mut rng = SimpleRng::new(42);
/// let layer = PerceptronLayer::new(3, 2, ActivationFunction::Sigmoid, true, &mut rng).unwrap();
/// assert_eq!(layer.number_of_inputs(), 3);
/// assert_eq!(layer.number_of_outputs(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PerceptronLayer {
    weights: Matrix,
    delta_weights: Matrix,
    momentum_weights: Matrix,
    biases: Vec<f64>,
    delta_biases: Vec<f64>,
    momentum_biases: Vec<f64>,
    activation_function: ActivationFunction,
    current_number_of_steps: usize,
    is_bias_enabled: bool,
}

impl PerceptronLayer {
    /// Create a new layer with Xavier initialization.
    ///
    /// Weights (and biases, when enabled) are sampled uniformly from
    /// `[-limit, limit)` with `limit = sqrt(6 / (inputs + outputs))`.
    /// Momentum and gradient buffers start at zero.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if either width is zero, their product overflows,
    /// or the activation is a parametric ReLU without a positive finite leak.
    pub fn new<R: Rng + ?Sized>(
        number_of_inputs: usize,
        number_of_outputs: usize,
        activation_function: ActivationFunction,
        enable_bias: bool,
        rng: &mut R,
    ) -> Result<Self> {
        if number_of_inputs == 0 || number_of_outputs == 0 {
            return Err(NetworkError::InvalidConfiguration(format!(
                "layer widths must be positive, got {number_of_inputs} inputs and {number_of_outputs} outputs"
            )));
        }
        activation_function.validate()?;

        // Xavier initialization: limit = sqrt(6 / (fan_in + fan_out))
        let limit = (6.0 / (number_of_inputs as f64 + number_of_outputs as f64)).sqrt();

        let weights = Matrix::from_fn(number_of_outputs, number_of_inputs, |_, _| {
            rng.gen_range(-limit..limit)
        })?;
        let biases = if enable_bias {
            (0..number_of_outputs)
                .map(|_| rng.gen_range(-limit..limit))
                .collect()
        } else {
            vec![0.0; number_of_outputs]
        };

        Self::from_parts(weights, biases, activation_function, enable_bias)
    }

    /// Builds a layer from explicit parameters with zeroed training buffers.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for an empty weight matrix, a disabled bias
    ///   whose vector is not all zero, or an invalid parametric ReLU leak
    /// - `DimensionMismatch` if `biases` does not have one entry per output row
    pub fn from_parts(
        weights: Matrix,
        biases: Vec<f64>,
        activation_function: ActivationFunction,
        enable_bias: bool,
    ) -> Result<Self> {
        let (outputs, inputs) = (weights.rows(), weights.cols());
        if inputs == 0 || outputs == 0 {
            return Err(NetworkError::InvalidConfiguration(
                "layer weight matrix must not be empty".to_string(),
            ));
        }
        ensure_len("layer biases", outputs, biases.len())?;
        activation_function.validate()?;
        if !enable_bias && biases.iter().any(|&b| b != 0.0) {
            return Err(NetworkError::InvalidConfiguration(
                "bias-disabled layer must have an all-zero bias vector".to_string(),
            ));
        }

        Ok(Self {
            weights,
            delta_weights: Matrix::zeros(outputs, inputs)?,
            momentum_weights: Matrix::zeros(outputs, inputs)?,
            biases,
            delta_biases: vec![0.0; outputs],
            momentum_biases: vec![0.0; outputs],
            activation_function,
            current_number_of_steps: 0,
            is_bias_enabled: enable_bias,
        })
    }

    /// Replaces the momentum buffers, e.g. when restoring a persisted layer.
    pub fn with_momentum(mut self, momentum_weights: Matrix, momentum_biases: Vec<f64>) -> Result<Self> {
        self.weights
            .ensure_same_shape(&momentum_weights, "layer weight momentum")?;
        ensure_len("layer bias momentum", self.biases.len(), momentum_biases.len())?;
        if !self.is_bias_enabled && momentum_biases.iter().any(|&b| b != 0.0) {
            return Err(NetworkError::InvalidConfiguration(
                "bias-disabled layer must have an all-zero bias momentum".to_string(),
            ));
        }

        self.momentum_weights = momentum_weights;
        self.momentum_biases = momentum_biases;
        Ok(self)
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn weight_momentum(&self) -> &Matrix {
        &self.momentum_weights
    }

    pub fn bias_momentum(&self) -> &[f64] {
        &self.momentum_biases
    }

    pub fn accumulated_weight_gradient(&self) -> &Matrix {
        &self.delta_weights
    }

    pub fn accumulated_bias_gradient(&self) -> &[f64] {
        &self.delta_biases
    }

    /// Examples accumulated since the last update.
    pub fn accumulated_steps(&self) -> usize {
        self.current_number_of_steps
    }

    pub fn activation_function(&self) -> ActivationFunction {
        self.activation_function
    }

    pub fn is_bias_enabled(&self) -> bool {
        self.is_bias_enabled
    }

    /// `errors ⊙ f'(outputs)`
    fn local_errors(&self, errors: &[f64], outputs: &[f64]) -> Vec<f64> {
        self.activation_function
            .derivative_all(outputs)
            .into_iter()
            .zip(errors)
            .map(|(d, &e)| e * d)
            .collect()
    }

    /// Same as [`Layer::backpropagate`] but reuses outputs recorded during the
    /// forward pass instead of recomputing them.
    pub fn backpropagate_from_outputs(&self, outputs: &[f64], errors: &[f64]) -> Result<Vec<f64>> {
        ensure_len("layer outputs", self.number_of_outputs(), outputs.len())?;
        ensure_len("layer errors", self.number_of_outputs(), errors.len())?;

        let local = self.local_errors(errors, outputs);
        self.weights.transpose_mat_vec(&local)
    }

    fn reset_step_data(&mut self) {
        self.delta_weights.fill(0.0);
        self.delta_biases.iter_mut().for_each(|d| *d = 0.0);
        self.current_number_of_steps = 0;
    }
}

impl Layer for PerceptronLayer {
    fn feed_forward(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        ensure_len("layer inputs", self.number_of_inputs(), inputs.len())?;

        let mut pre_activation = self.weights.mat_vec(inputs)?;
        if self.is_bias_enabled {
            add_into(&mut pre_activation, &self.biases);
        }
        Ok(self.activation_function.apply_all(&pre_activation))
    }

    fn backpropagate(&self, inputs: &[f64], errors: &[f64]) -> Result<Vec<f64>> {
        let outputs = self.feed_forward(inputs)?;
        self.backpropagate_from_outputs(&outputs, errors)
    }

    fn calculate_next_step(
        &mut self,
        inputs: &[f64],
        errors: &[f64],
        outputs: &[f64],
    ) -> Result<()> {
        // All checks run before any buffer is touched.
        ensure_len("layer inputs", self.number_of_inputs(), inputs.len())?;
        ensure_len("layer errors", self.number_of_outputs(), errors.len())?;
        ensure_len("layer outputs", self.number_of_outputs(), outputs.len())?;

        let local = self.local_errors(errors, outputs);
        self.delta_weights.add_outer_product(&local, inputs)?;
        if self.is_bias_enabled {
            add_into(&mut self.delta_biases, &local);
        }
        self.current_number_of_steps += 1;
        Ok(())
    }

    fn update(&mut self, learning_coefficient: f64, momentum_coefficient: f64) {
        if self.current_number_of_steps == 0 {
            return;
        }

        let scale = learning_coefficient / self.current_number_of_steps as f64;
        trace!(
            steps = self.current_number_of_steps,
            learning_coefficient,
            momentum_coefficient,
            "applying layer update"
        );

        blend_into(
            self.momentum_weights.as_mut_slice(),
            momentum_coefficient,
            self.delta_weights.as_slice(),
            scale,
        );
        add_into(self.weights.as_mut_slice(), self.momentum_weights.as_slice());

        if self.is_bias_enabled {
            blend_into(
                &mut self.momentum_biases,
                momentum_coefficient,
                &self.delta_biases,
                scale,
            );
            add_into(&mut self.biases, &self.momentum_biases);
        }

        self.reset_step_data();
    }

    fn number_of_inputs(&self) -> usize {
        self.weights.cols()
    }

    fn number_of_outputs(&self) -> usize {
        self.weights.rows()
    }

    fn parameter_count(&self) -> usize {
        let biases = if self.is_bias_enabled {
            self.biases.len()
        } else {
            0
        };
        self.weights.as_slice().len() + biases
    }
}
