//! Learning rate scheduler trait and the linear decay used by training
//!
//! Training lowers the learning coefficient once per completed epoch. The
//! schedule lives behind [`LRScheduler`] so the training loop only asks for the
//! current value and advances it.

/// Core trait for learning rate schedulers.
///
/// # Example
///
/// ```ignore
/// let mut scheduler = LinearDecay::new(0.5, 0.4, 100);
///
/// for epoch in 0..100 {
///     let lr = scheduler.get_lr();
///     // ... train with current learning rate ...
///     scheduler.step();
/// }
/// ```
pub trait LRScheduler {
    /// Get the current learning rate.
    fn get_lr(&self) -> f64;

    /// Advance the scheduler to the next epoch.
    ///
    /// Call this once per epoch, after the epoch has been trained.
    fn step(&mut self);

    /// Reset the scheduler to its initial state.
    fn reset(&mut self);
}

/// Linear learning rate decay.
///
/// Every call to [`LRScheduler::step`] subtracts `total_change / number_of_epochs`
/// from the current rate, so after `number_of_epochs` steps the rate has dropped
/// by `total_change`.
///
/// The rate is not bounded below unless [`LinearDecay::clamped_at_zero`] is
/// used: a `total_change` larger than the initial rate makes it negative, which
/// turns subsequent updates into gradient *ascent*.
///
/// # Example
///
/// ```
/// use multilayer_perceptron::utils::lr_scheduler::{LRScheduler, LinearDecay};
///
/// let mut scheduler = LinearDecay::new(0.5, 0.4, 4);
/// scheduler.step();
/// assert!((scheduler.get_lr() - 0.4).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearDecay {
    initial_lr: f64,
    decrement: f64,
    current_epoch: usize,
    current_lr: f64,
    clamp_at_zero: bool,
}

impl LinearDecay {
    /// Creates a linear decay that removes `total_change` over `number_of_epochs` steps.
    ///
    /// A zero `number_of_epochs` produces a constant schedule.
    pub fn new(initial_lr: f64, total_change: f64, number_of_epochs: usize) -> Self {
        let decrement = if number_of_epochs == 0 {
            0.0
        } else {
            total_change / number_of_epochs as f64
        };

        Self {
            initial_lr,
            decrement,
            current_epoch: 0,
            current_lr: initial_lr,
            clamp_at_zero: false,
        }
    }

    /// Never lets the rate fall below zero.
    pub fn clamped_at_zero(mut self) -> Self {
        self.clamp_at_zero = true;
        self.current_lr = self.current_lr.max(0.0);
        self
    }

    /// Amount subtracted per step.
    pub fn decrement(&self) -> f64 {
        self.decrement
    }

    /// Number of steps taken since construction or the last reset.
    pub fn current_epoch(&self) -> usize {
        self.current_epoch
    }
}

impl LRScheduler for LinearDecay {
    fn get_lr(&self) -> f64 {
        self.current_lr
    }

    fn step(&mut self) {
        self.current_epoch += 1;
        self.current_lr -= self.decrement;
        if self.clamp_at_zero && self.current_lr < 0.0 {
            self.current_lr = 0.0;
        }
    }

    fn reset(&mut self) {
        self.current_epoch = 0;
        self.current_lr = if self.clamp_at_zero {
            self.initial_lr.max(0.0)
        } else {
            self.initial_lr
        };
    }
}
