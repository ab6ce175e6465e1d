//! Evaluation of a network against labelled examples

use super::{MultiLayerPerceptron, TrainingExample};
use crate::error::Result;
use crate::utils::matrix::{difference, sum_of_squares};

/// Everything recorded while evaluating one example.
#[derive(Debug, Clone, PartialEq)]
pub struct TestingResultsPerExample {
    /// Output of every layer, in forward order.
    pub neurons: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
    /// Error arriving at every layer's output, in forward order.
    pub errors: Vec<Vec<f64>>,
    /// Sum of squared output errors.
    pub cost: f64,
}

impl TestingResultsPerExample {
    /// Final network output for this example.
    pub fn outputs(&self) -> &[f64] {
        self.neurons.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestingResults {
    /// Mean per-example cost (zero for an empty example set).
    pub global_cost: f64,
    pub per_example: Vec<TestingResultsPerExample>,
}

impl MultiLayerPerceptron {
    /// Evaluates the network on `examples` without changing any parameter.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if any example does not fit the network.
    pub fn test(&self, examples: &[TrainingExample]) -> Result<TestingResults> {
        let mut per_example = Vec::with_capacity(examples.len());

        for example in examples {
            self.check_example(example)?;

            let neurons = self.feed_forward_per_layer(example.inputs())?;
            let output_errors = difference(example.targets(), &neurons[neurons.len() - 1])?;
            let cost = sum_of_squares(&output_errors);
            let errors = self.backpropagate_errors_per_layer(&neurons, &output_errors)?;

            per_example.push(TestingResultsPerExample {
                neurons,
                targets: example.targets().to_vec(),
                errors,
                cost,
            });
        }

        let global_cost = if per_example.is_empty() {
            0.0
        } else {
            per_example.iter().map(|r| r.cost).sum::<f64>() / per_example.len() as f64
        };

        Ok(TestingResults {
            global_cost,
            per_example,
        })
    }
}
