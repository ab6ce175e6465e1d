//! Multilayer perceptron trained by backpropagation with momentum
//!
//! This library provides a dense feedforward network whose layers apply an
//! affine transform followed by an elementwise activation, together with the
//! training loop that fits it to labelled examples.
//!
//! # Modules
//!
//! - `layers`: Layer trait and the perceptron layer
//! - `network`: the multilayer perceptron, training, testing and persistence
//! - `utils`: matrix kernels, activation functions, LR scheduling, RNG
//! - `config`: Training configuration structures
//! - `architecture`: Architecture configuration and network building
//! - `error`: error taxonomy shared by every module
//!
//! # Example
//!
//! ```
//! use multilayer_perceptron::network::{MultiLayerPerceptron, TrainingExample, TrainingParameters};
//! use multilayer_perceptron::utils::SimpleRng;
//!
//! let mut rng = SimpleRng::new(42);
//! let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();
//!
//! let examples = vec![
//!     TrainingExample::new(vec![0.0, 0.0], vec![0.0]),
//!     TrainingExample::new(vec![1.0, 1.0], vec![1.0]),
//! ];
//! let parameters = TrainingParameters::new(100, 0.001, 0.5).with_momentum_coefficient(0.9);
//! network.train(&examples, &parameters, &mut rng).unwrap();
//! ```

pub mod architecture;
pub mod config;
pub mod error;
pub mod layers;
pub mod network;
pub mod utils;

pub use error::{NetworkError, Result};
