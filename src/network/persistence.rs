//! Binary save and load of a whole network
//!
//! The file is a `bincode` encoding of [`NetworkSnapshot`]: a format tag and,
//! per layer in forward order, its shape, weights, biases, momentum buffers,
//! activation function and bias flag. Gradient accumulation buffers are not
//! stored; they are always empty between updates.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MultiLayerPerceptron;
use crate::error::{NetworkError, Result};
use crate::layers::{Layer, PerceptronLayer};
use crate::utils::activations::ActivationFunction;
use crate::utils::matrix::Matrix;

const FORMAT_TAG: [u8; 4] = *b"MLP1";

#[derive(Debug, Serialize, Deserialize)]
struct NetworkSnapshot {
    format: [u8; 4],
    layers: Vec<LayerSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct LayerSnapshot {
    number_of_inputs: u64,
    number_of_outputs: u64,
    weights: Vec<f64>,
    biases: Vec<f64>,
    momentum_weights: Vec<f64>,
    momentum_biases: Vec<f64>,
    activation_function: ActivationFunction,
    is_bias_enabled: bool,
}

impl LayerSnapshot {
    fn capture(layer: &PerceptronLayer) -> Self {
        Self {
            number_of_inputs: layer.number_of_inputs() as u64,
            number_of_outputs: layer.number_of_outputs() as u64,
            weights: layer.weights().as_slice().to_vec(),
            biases: layer.biases().to_vec(),
            momentum_weights: layer.weight_momentum().as_slice().to_vec(),
            momentum_biases: layer.bias_momentum().to_vec(),
            activation_function: layer.activation_function(),
            is_bias_enabled: layer.is_bias_enabled(),
        }
    }

    fn restore(self, index: usize) -> Result<PerceptronLayer> {
        let malformed = |reason: String| {
            NetworkError::MalformedPersistedState(format!("layer {index}: {reason}"))
        };

        let inputs = usize::try_from(self.number_of_inputs)
            .map_err(|_| malformed("input width does not fit in memory".to_string()))?;
        let outputs = usize::try_from(self.number_of_outputs)
            .map_err(|_| malformed("output width does not fit in memory".to_string()))?;

        let weights = Matrix::from_vec(outputs, inputs, self.weights)
            .map_err(|e| malformed(e.to_string()))?;
        let momentum_weights = Matrix::from_vec(outputs, inputs, self.momentum_weights)
            .map_err(|e| malformed(e.to_string()))?;

        PerceptronLayer::from_parts(
            weights,
            self.biases,
            self.activation_function,
            self.is_bias_enabled,
        )
        .and_then(|layer| layer.with_momentum(momentum_weights, self.momentum_biases))
        .map_err(|e| malformed(e.to_string()))
    }
}

impl MultiLayerPerceptron {
    /// Encodes the full layer sequence.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let snapshot = NetworkSnapshot {
            format: FORMAT_TAG,
            layers: self.layers().iter().map(LayerSnapshot::capture).collect(),
        };
        bincode::serialize(&snapshot).map_err(|e| {
            NetworkError::MalformedPersistedState(format!("failed to encode network: {e}"))
        })
    }

    /// Decodes a network produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// `MalformedPersistedState` if the bytes do not decode, carry the wrong
    /// format tag, hold no layers, or describe inconsistent shapes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: NetworkSnapshot = bincode::deserialize(bytes).map_err(|e| {
            NetworkError::MalformedPersistedState(format!("failed to decode network: {e}"))
        })?;

        if snapshot.format != FORMAT_TAG {
            return Err(NetworkError::MalformedPersistedState(
                "unrecognised format tag".to_string(),
            ));
        }

        let layers = snapshot
            .layers
            .into_iter()
            .enumerate()
            .map(|(index, layer)| layer.restore(index))
            .collect::<Result<Vec<_>>>()?;

        MultiLayerPerceptron::from_layers(layers)
            .map_err(|e| NetworkError::MalformedPersistedState(e.to_string()))
    }

    /// Writes the network to `path`, replacing any existing file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path.as_ref(), bytes)?;
        debug!(path = %path.as_ref().display(), "saved network");
        Ok(())
    }

    /// Reads a network saved with [`save_to_file`](Self::save_to_file).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        let network = Self::from_bytes(&bytes)?;
        debug!(
            path = %path.as_ref().display(),
            topology = ?network.topology(),
            "loaded network"
        );
        Ok(network)
    }

    /// Replaces this network with the one stored at `path`.
    ///
    /// The current network is left untouched if reading or decoding fails.
    pub fn read_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        *self = Self::from_file(path)?;
        Ok(())
    }
}
