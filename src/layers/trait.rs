//! Layer trait definition for perceptron layers
//!
//! This module defines the contract the network engine relies on: a forward
//! transform, reverse-mode error propagation, gradient accumulation and the
//! momentum update that applies the accumulated gradient.

use crate::error::Result;

/// Core trait for network layers.
///
/// A training step for one example calls the methods in this order:
/// 1. `feed_forward` on every layer, input to output
/// 2. `backpropagate` on every layer but the first, output to input
/// 3. `calculate_next_step` on every layer
/// 4. `update` on every layer
///
/// Steps 1 and 2 never mutate the layer. Step 3 only touches the gradient
/// accumulation buffers, and step 4 folds them into the parameters.
///
/// # Example
///
/// ```ignore
/// let outputs = layer.feed_forward(&inputs)?;
/// let errors: Vec<f64> = targets.iter().zip(&outputs).map(|(t, o)| t - o).collect();
/// let previous_errors = layer.backpropagate(&inputs, &errors)?;
///
/// layer.calculate_next_step(&inputs, &errors, &outputs)?;
/// layer.update(0.5, 0.9);
/// ```
pub trait Layer {
    /// Forward propagation through the layer.
    ///
    /// Returns `activation(weights · inputs + biases)`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if `inputs` is not `number_of_inputs()` long.
    fn feed_forward(&self, inputs: &[f64]) -> Result<Vec<f64>>;

    /// Error signal for the preceding layer.
    ///
    /// `errors` is the error arriving at this layer's output. The local error
    /// `errors ⊙ f'(output)` is formed and `weightsᵀ · local` is returned.
    fn backpropagate(&self, inputs: &[f64], errors: &[f64]) -> Result<Vec<f64>>;

    /// Accumulates this example's gradient contribution without applying it.
    ///
    /// `inputs` and `outputs` are the values recorded during the forward pass;
    /// `errors` is the error arriving at this layer's output.
    fn calculate_next_step(&mut self, inputs: &[f64], errors: &[f64], outputs: &[f64])
        -> Result<()>;

    /// Applies the averaged accumulated gradient through the momentum buffers
    /// and clears the accumulation.
    fn update(&mut self, learning_coefficient: f64, momentum_coefficient: f64);

    /// Get the input width of the layer.
    fn number_of_inputs(&self) -> usize;

    /// Get the output width of the layer.
    fn number_of_outputs(&self) -> usize;

    /// Number of trainable parameters (weights plus enabled biases).
    fn parameter_count(&self) -> usize;
}
