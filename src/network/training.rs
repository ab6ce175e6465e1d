//! Epoch-based training by backpropagation with momentum

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};

use super::MultiLayerPerceptron;
use crate::error::{ensure_len, NetworkError, Result};
use crate::layers::Layer;
use crate::utils::lr_scheduler::{LRScheduler, LinearDecay};
use crate::utils::matrix::{difference, sum_of_squares};

/// One labelled example: network input and the expected network output.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingExample {
    inputs: Vec<f64>,
    targets: Vec<f64>,
}

impl TrainingExample {
    pub fn new(inputs: Vec<f64>, targets: Vec<f64>) -> Self {
        Self { inputs, targets }
    }

    pub fn inputs(&self) -> &[f64] {
        &self.inputs
    }

    pub fn targets(&self) -> &[f64] {
        &self.targets
    }
}

/// Hyperparameters of a training run.
///
/// `Default` gives a single epoch at learning coefficient 0.1 with the
/// remaining fields at their conventional values: no decay, no momentum,
/// shuffling on, cost sampled every epoch, online (per-example) updates.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingParameters {
    pub number_of_epochs: usize,
    /// Training stops after the first epoch whose mean cost is below this.
    pub cost_goal: f64,
    pub learning_coefficient: f64,
    /// Total amount removed from the learning coefficient over `number_of_epochs`.
    pub learning_coefficient_change: f64,
    pub momentum_coefficient: f64,
    /// Draw a fresh permutation of the examples every epoch.
    pub shuffle_each_epoch: bool,
    /// Record the epoch cost every `epoch_interval` epochs.
    pub epoch_interval: usize,
    /// Examples accumulated before each parameter update.
    pub batch_size: usize,
    /// Stop the linear decay at zero instead of letting it turn negative.
    pub clamp_learning_coefficient: bool,
}

impl Default for TrainingParameters {
    fn default() -> Self {
        Self {
            number_of_epochs: 1,
            cost_goal: 0.0,
            learning_coefficient: 0.1,
            learning_coefficient_change: 0.0,
            momentum_coefficient: 0.0,
            shuffle_each_epoch: true,
            epoch_interval: 1,
            batch_size: 1,
            clamp_learning_coefficient: false,
        }
    }
}

impl TrainingParameters {
    pub fn new(number_of_epochs: usize, cost_goal: f64, learning_coefficient: f64) -> Self {
        Self {
            number_of_epochs,
            cost_goal,
            learning_coefficient,
            ..Self::default()
        }
    }

    pub fn with_learning_coefficient_change(mut self, change: f64) -> Self {
        self.learning_coefficient_change = change;
        self
    }

    pub fn with_momentum_coefficient(mut self, momentum: f64) -> Self {
        self.momentum_coefficient = momentum;
        self
    }

    pub fn with_shuffle(mut self, shuffle_each_epoch: bool) -> Self {
        self.shuffle_each_epoch = shuffle_each_epoch;
        self
    }

    pub fn with_epoch_interval(mut self, epoch_interval: usize) -> Self {
        self.epoch_interval = epoch_interval;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_clamped_learning_coefficient(mut self, clamp: bool) -> Self {
        self.clamp_learning_coefficient = clamp;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.epoch_interval == 0 {
            return Err(NetworkError::InvalidConfiguration(
                "epoch_interval must be greater than 0".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(NetworkError::InvalidConfiguration(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    fn scheduler(&self) -> LinearDecay {
        let scheduler = LinearDecay::new(
            self.learning_coefficient,
            self.learning_coefficient_change,
            self.number_of_epochs,
        );
        if self.clamp_learning_coefficient {
            scheduler.clamped_at_zero()
        } else {
            scheduler
        }
    }
}

/// Cost trajectory of a training run. Observational only.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainingResults {
    pub epoch_interval: usize,
    /// Mean epoch cost at epochs `0, interval, 2·interval, …` plus the last epoch run.
    pub cost_per_epoch_interval: Vec<f64>,
    pub epochs_run: usize,
    /// Mean cost of the last epoch run; `None` if no epoch ran.
    pub final_cost: Option<f64>,
    pub reached_cost_goal: bool,
}

impl TrainingResults {
    /// Epoch index of every entry in `cost_per_epoch_interval`.
    pub fn sampled_epochs(&self) -> Vec<usize> {
        let count = self.cost_per_epoch_interval.len();
        (0..count)
            .map(|sample| {
                if sample + 1 == count {
                    self.epochs_run.saturating_sub(1)
                } else {
                    sample * self.epoch_interval
                }
            })
            .collect()
    }
}

impl MultiLayerPerceptron {
    /// Trains the network on `examples`.
    ///
    /// For every epoch the examples are visited (in a fresh random order when
    /// shuffling is enabled) and each one goes through a forward pass, a
    /// backward pass and a gradient accumulation on every layer. Layers are
    /// updated with the current learning and momentum coefficients after every
    /// `batch_size` examples and once more for a trailing partial batch.
    ///
    /// After each epoch the mean of the per-example sum of squared output
    /// errors is compared to `cost_goal`; training stops there if it is lower.
    /// Otherwise the learning coefficient decays linearly by
    /// `learning_coefficient_change / number_of_epochs`.
    ///
    /// # Errors
    ///
    /// `DimensionMismatch` if any example does not fit the network and
    /// `InvalidConfiguration` for a zero interval or batch size. Both are
    /// detected before any parameter changes.
    ///
    /// # Example
    ///
    /// ```
    /// use multilayer_perceptron::network::{MultiLayerPerceptron, TrainingExample, TrainingParameters};
    /// use multilayer_perceptron::utils::SimpleRng;
    ///
    /// let mut rng = SimpleRng::new(42);
    /// let mut network = MultiLayerPerceptron::new(&[1, 1], None, &mut rng).unwrap();
    /// let examples = vec![TrainingExample::new(vec![1.0], vec![1.0])];
    ///
    /// let results = network
    ///     .train(&examples, &TrainingParameters::new(10, 0.0, 0.5), &mut rng)
    ///     .unwrap();
    /// assert_eq!(results.epochs_run, 10);
    /// ```
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        examples: &[TrainingExample],
        parameters: &TrainingParameters,
        rng: &mut R,
    ) -> Result<TrainingResults> {
        parameters.validate()?;
        for example in examples {
            self.check_example(example)?;
        }

        let mut results = TrainingResults {
            epoch_interval: parameters.epoch_interval,
            ..TrainingResults::default()
        };
        if examples.is_empty() || parameters.number_of_epochs == 0 {
            debug!("nothing to train");
            return Ok(results);
        }

        let mut scheduler = parameters.scheduler();
        debug!(
            initial = scheduler.get_lr(),
            decrement = scheduler.decrement(),
            "learning coefficient schedule"
        );
        let mut warned_negative = false;
        let mut order: Vec<usize> = (0..examples.len()).collect();

        for epoch in 0..parameters.number_of_epochs {
            if parameters.shuffle_each_epoch {
                // Independent permutation every epoch, not a reshuffle of the last one.
                order.iter_mut().enumerate().for_each(|(i, slot)| *slot = i);
                order.shuffle(rng);
            }

            let learning_coefficient = scheduler.get_lr();
            if learning_coefficient < 0.0 && !warned_negative {
                warn!(epoch, learning_coefficient, "learning coefficient decayed below zero");
                warned_negative = true;
            }

            let mut cost = 0.0;
            let mut pending = 0;
            for &index in &order {
                cost += self.accumulate_example(&examples[index])?;
                pending += 1;
                if pending == parameters.batch_size {
                    self.update_layers(learning_coefficient, parameters.momentum_coefficient);
                    pending = 0;
                }
            }
            if pending > 0 {
                self.update_layers(learning_coefficient, parameters.momentum_coefficient);
            }

            cost /= examples.len() as f64;
            if !cost.is_finite() {
                warn!(epoch, cost, "epoch cost is not finite");
            }

            results.epochs_run = epoch + 1;
            results.final_cost = Some(cost);
            let sampled = epoch % parameters.epoch_interval == 0;
            if sampled {
                results.cost_per_epoch_interval.push(cost);
                info!(epoch, cost, learning_coefficient, "epoch finished");
            }

            if cost < parameters.cost_goal {
                if !sampled {
                    results.cost_per_epoch_interval.push(cost);
                }
                results.reached_cost_goal = true;
                info!(epoch, cost, goal = parameters.cost_goal, "cost goal reached");
                return Ok(results);
            }

            scheduler.step();
        }

        debug!(
            steps = scheduler.current_epoch(),
            learning_coefficient = scheduler.get_lr(),
            "learning coefficient after training"
        );
        if (results.epochs_run - 1) % parameters.epoch_interval != 0 {
            if let Some(cost) = results.final_cost {
                results.cost_per_epoch_interval.push(cost);
            }
        }
        Ok(results)
    }

    /// Fails unless the example matches the network's input and output widths.
    pub(crate) fn check_example(&self, example: &TrainingExample) -> Result<()> {
        ensure_len("example inputs", self.number_of_inputs(), example.inputs().len())?;
        ensure_len("example targets", self.number_of_outputs(), example.targets().len())
    }

    /// Forward and backward pass for one example, then gradient accumulation on
    /// every layer. Returns the example's cost.
    ///
    /// Every fallible step runs before the first accumulation, so an error
    /// leaves all layer buffers as they were.
    fn accumulate_example(&mut self, example: &TrainingExample) -> Result<f64> {
        let outputs = self.feed_forward_per_layer(example.inputs())?;
        let output_errors = difference(example.targets(), &outputs[outputs.len() - 1])?;
        let errors = self.backpropagate_errors_per_layer(&outputs, &output_errors)?;

        for (index, layer) in self.layers_mut().iter_mut().enumerate() {
            let inputs = if index == 0 {
                example.inputs()
            } else {
                outputs[index - 1].as_slice()
            };
            layer.calculate_next_step(inputs, &errors[index], &outputs[index])?;
        }

        Ok(sum_of_squares(&output_errors))
    }

    fn update_layers(&mut self, learning_coefficient: f64, momentum_coefficient: f64) {
        for layer in self.layers_mut() {
            layer.update(learning_coefficient, momentum_coefficient);
        }
    }
}
