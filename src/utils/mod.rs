//! Shared utilities for the perceptron engine
//!
//! This module provides the numeric kernels, activation functions, learning
//! rate schedules and the seedable random number generator used by layers and
//! networks.

pub mod activations;
pub mod lr_scheduler;
pub mod matrix;
pub mod rng;

pub use activations::ActivationFunction;
pub use lr_scheduler::{LRScheduler, LinearDecay};
pub use matrix::Matrix;
pub use rng::SimpleRng;
