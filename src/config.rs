//! Configuration structures for training
//!
//! This module parses training hyperparameters from JSON files and turns them
//! into [`TrainingParameters`].

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{NetworkError, Result};
use crate::network::TrainingParameters;

/// Training configuration as stored on disk.
///
/// Only `number_of_epochs` and `learning_coefficient` are required; every other
/// field falls back to the [`TrainingParameters`] default.
///
/// # Example
///
/// ```json
/// {
///   "number_of_epochs": 5000,
///   "cost_goal": 0.001,
///   "learning_coefficient": 0.5,
///   "momentum_coefficient": 0.9,
///   "shuffle_each_epoch": true,
///   "epoch_interval": 100,
///   "seed": 42
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainingConfig {
    pub number_of_epochs: usize,
    pub learning_coefficient: f64,
    pub cost_goal: Option<f64>,
    pub learning_coefficient_change: Option<f64>,
    pub momentum_coefficient: Option<f64>,
    pub shuffle_each_epoch: Option<bool>,
    pub epoch_interval: Option<usize>,
    pub batch_size: Option<usize>,
    pub clamp_learning_coefficient: Option<bool>,
    /// Seed for weight initialisation and shuffling.
    pub seed: Option<u64>,
}

impl TrainingConfig {
    /// Converts the configuration into training parameters, applying defaults.
    pub fn parameters(&self) -> TrainingParameters {
        let defaults = TrainingParameters::default();
        TrainingParameters {
            number_of_epochs: self.number_of_epochs,
            cost_goal: self.cost_goal.unwrap_or(defaults.cost_goal),
            learning_coefficient: self.learning_coefficient,
            learning_coefficient_change: self
                .learning_coefficient_change
                .unwrap_or(defaults.learning_coefficient_change),
            momentum_coefficient: self
                .momentum_coefficient
                .unwrap_or(defaults.momentum_coefficient),
            shuffle_each_epoch: self
                .shuffle_each_epoch
                .unwrap_or(defaults.shuffle_each_epoch),
            epoch_interval: self.epoch_interval.unwrap_or(defaults.epoch_interval),
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            clamp_learning_coefficient: self
                .clamp_learning_coefficient
                .unwrap_or(defaults.clamp_learning_coefficient),
        }
    }
}

/// Parses and validates a training configuration from a JSON string.
pub fn parse_config(contents: &str) -> Result<TrainingConfig> {
    let config: TrainingConfig = serde_json::from_str(contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Loads a training configuration from a JSON file.
///
/// # Examples
///
/// ```no_run
/// use multilayer_perceptron::config::load_config;
///
/// let cfg = load_config("config/and_gate_training.json").unwrap();
/// assert_eq!(cfg.number_of_epochs, 5000);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

fn invalid(message: impl Into<String>) -> NetworkError {
    NetworkError::InvalidConfiguration(message.into())
}

fn validate_config(config: &TrainingConfig) -> Result<()> {
    if config.number_of_epochs == 0 {
        return Err(invalid("number_of_epochs must be greater than 0"));
    }

    if !config.learning_coefficient.is_finite() || config.learning_coefficient < 0.0 {
        return Err(invalid("learning_coefficient must be finite and non-negative"));
    }

    if let Some(change) = config.learning_coefficient_change {
        if !change.is_finite() {
            return Err(invalid("learning_coefficient_change must be finite"));
        }
    }

    if let Some(momentum) = config.momentum_coefficient {
        if !(0.0..1.0).contains(&momentum) {
            return Err(invalid("momentum_coefficient must be in [0, 1)"));
        }
    }

    if let Some(goal) = config.cost_goal {
        if goal.is_nan() || goal < 0.0 {
            return Err(invalid("cost_goal must be non-negative"));
        }
    }

    if config.epoch_interval == Some(0) {
        return Err(invalid("epoch_interval must be greater than 0"));
    }

    if config.batch_size == Some(0) {
        return Err(invalid("batch_size must be greater than 0"));
    }

    Ok(())
}
