//! Multilayer perceptron: an ordered chain of perceptron layers
//!
//! The network owns its layers and drives inference, training and evaluation
//! across them. Topology is fixed at construction; only layer parameters change,
//! and only during [`MultiLayerPerceptron::train`].

mod persistence;
mod testing;
mod training;

pub use testing::{TestingResults, TestingResultsPerExample};
pub use training::{TrainingExample, TrainingParameters, TrainingResults};

use rand::Rng;
use tracing::debug;

use crate::error::{ensure_len, NetworkError, Result};
use crate::layers::{Layer, PerceptronLayer};
use crate::utils::activations::ActivationFunction;

/// Feedforward network of dense layers.
///
/// # Example
///
/// ```
/// use multilayer_perceptron::network::MultiLayerPerceptron;
/// use multilayer_perceptron::utils::SimpleRng;
///
/// let mut rng = SimpleRng::new(42);
/// let network = MultiLayerPerceptron::new(&[2, 3, 1], None, &mut rng).unwrap();
///
/// let output = network.feed_forward(&[0.5, -0.5]).unwrap();
/// assert_eq!(output.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLayerPerceptron {
    layers: Vec<PerceptronLayer>,
}

impl MultiLayerPerceptron {
    /// Creates a network of sigmoid layers.
    ///
    /// `number_of_neurons_per_layer` lists the input width followed by every
    /// layer's output width, so `[2, 3, 1]` builds two layers (2→3 and 3→1).
    /// `enable_bias_per_layer` defaults to all enabled when `None`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for fewer than two widths, a zero width, or a bias
    /// list whose length differs from the number of layers.
    pub fn new<R: Rng + ?Sized>(
        number_of_neurons_per_layer: &[usize],
        enable_bias_per_layer: Option<&[bool]>,
        rng: &mut R,
    ) -> Result<Self> {
        let layer_count = number_of_neurons_per_layer.len().saturating_sub(1);
        let activations = vec![ActivationFunction::Sigmoid; layer_count];
        Self::with_activations(
            number_of_neurons_per_layer,
            enable_bias_per_layer,
            &activations,
            rng,
        )
    }

    /// Creates a network with an explicit activation function per layer.
    pub fn with_activations<R: Rng + ?Sized>(
        number_of_neurons_per_layer: &[usize],
        enable_bias_per_layer: Option<&[bool]>,
        activations: &[ActivationFunction],
        rng: &mut R,
    ) -> Result<Self> {
        if number_of_neurons_per_layer.len() < 2 {
            return Err(NetworkError::InvalidConfiguration(format!(
                "at least two layer widths are required, got {}",
                number_of_neurons_per_layer.len()
            )));
        }
        let layer_count = number_of_neurons_per_layer.len() - 1;

        let default_bias;
        let enable_bias_per_layer = match enable_bias_per_layer {
            Some(flags) => flags,
            None => {
                default_bias = vec![true; layer_count];
                &default_bias
            }
        };
        if enable_bias_per_layer.len() != layer_count {
            return Err(NetworkError::InvalidConfiguration(format!(
                "expected {layer_count} bias flags, got {}",
                enable_bias_per_layer.len()
            )));
        }
        if activations.len() != layer_count {
            return Err(NetworkError::InvalidConfiguration(format!(
                "expected {layer_count} activation functions, got {}",
                activations.len()
            )));
        }

        let layers = number_of_neurons_per_layer
            .windows(2)
            .zip(enable_bias_per_layer)
            .zip(activations)
            .map(|((widths, &enable_bias), &activation)| {
                PerceptronLayer::new(widths[0], widths[1], activation, enable_bias, &mut *rng)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(topology = ?number_of_neurons_per_layer, "created multilayer perceptron");
        Ok(Self { layers })
    }

    /// Assembles a network from existing layers, checking that they chain.
    pub fn from_layers(layers: Vec<PerceptronLayer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(NetworkError::InvalidConfiguration(
                "a network needs at least one layer".to_string(),
            ));
        }
        for pair in layers.windows(2) {
            ensure_len(
                "layer chain",
                pair[0].number_of_outputs(),
                pair[1].number_of_inputs(),
            )?;
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[PerceptronLayer] {
        &self.layers
    }

    /// Input width of the first layer.
    pub fn number_of_inputs(&self) -> usize {
        self.layers[0].number_of_inputs()
    }

    /// Output width of the last layer.
    pub fn number_of_outputs(&self) -> usize {
        self.layers[self.layers.len() - 1].number_of_outputs()
    }

    /// Widths in the construction format: input width then every output width.
    pub fn topology(&self) -> Vec<usize> {
        std::iter::once(self.number_of_inputs())
            .chain(self.layers.iter().map(|layer| layer.number_of_outputs()))
            .collect()
    }

    /// Total trainable parameters across all layers.
    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.parameter_count()).sum()
    }

    /// Runs the input through every layer and returns the final output.
    pub fn feed_forward(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        ensure_len("network inputs", self.number_of_inputs(), inputs.len())?;

        let mut neurons = inputs.to_vec();
        for layer in &self.layers {
            neurons = layer.feed_forward(&neurons)?;
        }
        Ok(neurons)
    }

    /// Output of every layer in forward order (the input itself is not included).
    pub fn feed_forward_per_layer(&self, inputs: &[f64]) -> Result<Vec<Vec<f64>>> {
        ensure_len("network inputs", self.number_of_inputs(), inputs.len())?;

        let mut outputs: Vec<Vec<f64>> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let layer_inputs = outputs.last().map_or(inputs, Vec::as_slice);
            let layer_outputs = layer.feed_forward(layer_inputs)?;
            outputs.push(layer_outputs);
        }
        Ok(outputs)
    }

    /// Error arriving at every layer's output, in forward order.
    ///
    /// `outputs_per_layer` is what [`feed_forward_per_layer`](Self::feed_forward_per_layer)
    /// returned and `output_errors` is the error at the network output. The last
    /// entry of the result is `output_errors` itself; each earlier entry is the
    /// following layer's backpropagated error. The first layer's error with
    /// respect to the network input is not computed.
    pub fn backpropagate_errors_per_layer(
        &self,
        outputs_per_layer: &[Vec<f64>],
        output_errors: &[f64],
    ) -> Result<Vec<Vec<f64>>> {
        ensure_len("per-layer outputs", self.layers.len(), outputs_per_layer.len())?;
        ensure_len("network errors", self.number_of_outputs(), output_errors.len())?;

        let mut errors = vec![Vec::new(); self.layers.len()];
        errors[self.layers.len() - 1] = output_errors.to_vec();

        for index in (1..self.layers.len()).rev() {
            let propagated = self.layers[index]
                .backpropagate_from_outputs(&outputs_per_layer[index], &errors[index])?;
            errors[index - 1] = propagated;
        }
        Ok(errors)
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [PerceptronLayer] {
        &mut self.layers
    }
}
