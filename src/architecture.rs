//! Architecture configuration structures
//!
//! This module describes network topologies in JSON so they can be changed
//! without touching code, and builds a [`MultiLayerPerceptron`] from them.

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use crate::error::{NetworkError, Result};
use crate::network::MultiLayerPerceptron;
use crate::utils::activations::{ActivationFunction, DEFAULT_LEAK};

/// Activation entry of an architecture file.
///
/// ```json
/// { "type": "parametric_relu", "leak": 0.05 }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ActivationConfig {
    /// "sigmoid", "relu" or "parametric_relu"
    #[serde(rename = "type")]
    pub activation_type: String,
    /// Leak for "parametric_relu" (default 0.01)
    pub leak: Option<f64>,
}

impl ActivationConfig {
    fn to_activation(&self, index: usize) -> Result<ActivationFunction> {
        let name = self.activation_type.to_lowercase();
        let activation = ActivationFunction::from_name(&name, self.leak.unwrap_or(DEFAULT_LEAK))
            .ok_or_else(|| {
                NetworkError::InvalidConfiguration(format!(
                    "Layer {index}: unknown activation function '{name}'. Must be one of: sigmoid, relu, parametric_relu"
                ))
            })?;
        activation.validate().map_err(|e| {
            NetworkError::InvalidConfiguration(format!("Layer {index}: {e}"))
        })?;
        Ok(activation)
    }
}

/// Network topology read from an architecture file.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchitectureConfig {
    /// Widths from the input layer to the output layer
    pub neurons_per_layer: Vec<usize>,
    /// One bias flag per layer (default: all enabled)
    pub enable_bias_per_layer: Option<Vec<bool>>,
    /// One activation per layer (default: sigmoid)
    pub activations: Option<Vec<ActivationConfig>>,
}

impl ArchitectureConfig {
    /// Number of layers the configuration describes.
    pub fn layer_count(&self) -> usize {
        self.neurons_per_layer.len().saturating_sub(1)
    }

    fn activation_functions(&self) -> Result<Vec<ActivationFunction>> {
        match &self.activations {
            Some(activations) => activations
                .iter()
                .enumerate()
                .map(|(i, activation)| activation.to_activation(i))
                .collect(),
            None => Ok(vec![ActivationFunction::Sigmoid; self.layer_count()]),
        }
    }
}

/// Parses and validates an architecture from a JSON string.
pub fn parse_architecture(contents: &str) -> Result<ArchitectureConfig> {
    let config: ArchitectureConfig = serde_json::from_str(contents)?;
    validate_architecture(&config)?;
    Ok(config)
}

/// Loads an architecture configuration from a JSON file.
///
/// # Examples
///
/// ```no_run
/// use multilayer_perceptron::architecture::load_architecture;
///
/// let arch = load_architecture("config/and_gate_architecture.json").unwrap();
/// assert_eq!(arch.layer_count(), 2);
/// ```
pub fn load_architecture<P: AsRef<Path>>(path: P) -> Result<ArchitectureConfig> {
    let contents = fs::read_to_string(path)?;
    parse_architecture(&contents)
}

/// Validates an architecture configuration.
///
/// Checks that:
/// - there are at least two widths (one layer) and none is zero
/// - the bias and activation lists, when present, have one entry per layer
/// - every activation entry is recognised
fn validate_architecture(config: &ArchitectureConfig) -> Result<()> {
    if config.neurons_per_layer.len() < 2 {
        return Err(NetworkError::InvalidConfiguration(
            "Architecture must have at least one layer".to_string(),
        ));
    }

    if let Some(index) = config.neurons_per_layer.iter().position(|&n| n == 0) {
        return Err(NetworkError::InvalidConfiguration(format!(
            "Width {index} must be greater than 0"
        )));
    }

    let layer_count = config.layer_count();
    if let Some(flags) = &config.enable_bias_per_layer {
        if flags.len() != layer_count {
            return Err(NetworkError::InvalidConfiguration(format!(
                "enable_bias_per_layer has {} entries for {layer_count} layers",
                flags.len()
            )));
        }
    }
    if let Some(activations) = &config.activations {
        if activations.len() != layer_count {
            return Err(NetworkError::InvalidConfiguration(format!(
                "activations has {} entries for {layer_count} layers",
                activations.len()
            )));
        }
    }

    config.activation_functions().map(|_| ())
}

/// Builds a freshly initialised network from an architecture configuration.
///
/// # Examples
///
/// ```
/// use multilayer_perceptron::architecture::{build_network, parse_architecture};
/// use multilayer_perceptron::utils::SimpleRng;
///
/// let config = parse_architecture(r#"{"neurons_per_layer": [2, 2, 1]}"#).unwrap();
/// let mut rng = SimpleRng::new(42);
/// let network = build_network(&config, &mut rng).unwrap();
/// assert_eq!(network.topology(), vec![2, 2, 1]);
/// ```
pub fn build_network<R: Rng + ?Sized>(
    config: &ArchitectureConfig,
    rng: &mut R,
) -> Result<MultiLayerPerceptron> {
    let activations = config.activation_functions()?;
    MultiLayerPerceptron::with_activations(
        &config.neurons_per_layer,
        config.enable_bias_per_layer.as_deref(),
        &activations,
        rng,
    )
}
