//! Layer abstractions for the perceptron engine
//!
//! This module provides the Layer trait and the fully connected perceptron
//! layer the network is built from.

mod r#trait;
pub mod perceptron;

// Re-export the Layer trait for convenience
pub use perceptron::PerceptronLayer;
pub use r#trait::Layer;
