//! Tests for epoch training
//!
//! This file covers:
//! - Convergence on a small logic gate
//! - Cost trajectory, early exit and sampling interval
//! - Determinism under a fixed seed
//! - Learning coefficient decay, batching and validation

use multilayer_perceptron::network::{
    MultiLayerPerceptron, TrainingExample, TrainingParameters,
};
use multilayer_perceptron::utils::{ActivationFunction, SimpleRng};
use multilayer_perceptron::NetworkError;

fn and_examples() -> Vec<TrainingExample> {
    vec![
        TrainingExample::new(vec![0.0, 0.0], vec![0.0]),
        TrainingExample::new(vec![0.0, 1.0], vec![0.0]),
        TrainingExample::new(vec![1.0, 0.0], vec![0.0]),
        TrainingExample::new(vec![1.0, 1.0], vec![1.0]),
    ]
}

// ============================================================================
// Convergence Tests
// ============================================================================

mod convergence_tests {
    use super::*;

    #[test]
    fn test_learns_and_gate() {
        let mut rng = SimpleRng::new(42);
        let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();
        let parameters = TrainingParameters::new(5000, 0.001, 0.5).with_momentum_coefficient(0.9);

        let results = network.train(&and_examples(), &parameters, &mut rng).unwrap();

        assert!(results.reached_cost_goal);
        assert!(results.final_cost.unwrap() < 0.001);
        assert!(results.epochs_run < 5000);

        for example in and_examples() {
            let output = network.feed_forward(example.inputs()).unwrap()[0];
            if example.targets()[0] > 0.5 {
                assert!(output > 0.9, "{:?} -> {output}", example.inputs());
            } else {
                assert!(output < 0.1, "{:?} -> {output}", example.inputs());
            }
        }
    }

    #[test]
    fn test_cost_decreases_without_momentum() {
        let mut rng = SimpleRng::new(42);
        let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();
        let parameters = TrainingParameters::new(200, 0.0, 0.1);

        let results = network.train(&and_examples(), &parameters, &mut rng).unwrap();

        let costs = &results.cost_per_epoch_interval;
        assert_eq!(costs.len(), 200);
        assert!(costs[costs.len() - 1] < costs[0]);
    }

    #[test]
    fn test_full_batch_training_reduces_cost() {
        let mut rng = SimpleRng::new(5);
        let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();
        let initial = network.test(&and_examples()).unwrap().global_cost;

        let parameters = TrainingParameters::new(2000, 0.0, 0.5)
            .with_momentum_coefficient(0.9)
            .with_batch_size(4);
        network.train(&and_examples(), &parameters, &mut rng).unwrap();

        let trained = network.test(&and_examples()).unwrap().global_cost;
        assert!(trained < 0.5 * initial, "{initial} -> {trained}");
    }

    #[test]
    fn test_single_layer_network_trains() {
        let mut rng = SimpleRng::new(13);
        let mut network = MultiLayerPerceptron::new(&[2, 1], None, &mut rng).unwrap();

        let results = network
            .train(
                &and_examples(),
                &TrainingParameters::new(300, 0.0, 0.5),
                &mut rng,
            )
            .unwrap();

        let costs = &results.cost_per_epoch_interval;
        assert!(costs[costs.len() - 1] < costs[0]);
    }

    #[test]
    fn test_relu_networks_train_without_error() {
        for activation in [
            ActivationFunction::ReLU,
            ActivationFunction::ParametricReLU { leak: 0.05 },
        ] {
            let mut rng = SimpleRng::new(31);
            let mut network = MultiLayerPerceptron::with_activations(
                &[2, 4, 1],
                None,
                &[activation, ActivationFunction::Sigmoid],
                &mut rng,
            )
            .unwrap();

            let results = network
                .train(
                    &and_examples(),
                    &TrainingParameters::new(50, 0.0, 0.1),
                    &mut rng,
                )
                .unwrap();

            assert_eq!(results.epochs_run, 50);
            assert!(results.final_cost.unwrap().is_finite());
        }
    }
}

// ============================================================================
// Cost Trajectory Tests
// ============================================================================

mod trajectory_tests {
    use super::*;

    #[test]
    fn test_early_exit_when_goal_above_cost() {
        let mut rng = SimpleRng::new(1);
        let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();

        // Sigmoid outputs keep every example cost below 1.
        let results = network
            .train(
                &and_examples(),
                &TrainingParameters::new(100, 10.0, 0.5),
                &mut rng,
            )
            .unwrap();

        assert_eq!(results.epochs_run, 1);
        assert!(results.reached_cost_goal);
        assert_eq!(results.cost_per_epoch_interval.len(), 1);
    }

    #[test]
    fn test_goal_zero_runs_every_epoch() {
        let mut rng = SimpleRng::new(1);
        let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();

        let results = network
            .train(
                &and_examples(),
                &TrainingParameters::new(25, 0.0, 0.5),
                &mut rng,
            )
            .unwrap();

        assert_eq!(results.epochs_run, 25);
        assert!(!results.reached_cost_goal);
    }

    #[test]
    fn test_interval_sampling_includes_last_epoch() {
        let mut rng = SimpleRng::new(1);
        let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();

        let results = network
            .train(
                &and_examples(),
                &TrainingParameters::new(25, 0.0, 0.5).with_epoch_interval(10),
                &mut rng,
            )
            .unwrap();

        // Epochs 0, 10, 20 and the final epoch 24.
        assert_eq!(results.epoch_interval, 10);
        assert_eq!(results.cost_per_epoch_interval.len(), 4);
        assert_eq!(
            results.cost_per_epoch_interval.last().copied(),
            results.final_cost
        );
    }

    #[test]
    fn test_empty_example_set() {
        let mut rng = SimpleRng::new(1);
        let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();
        let before = network.clone();

        let results = network
            .train(&[], &TrainingParameters::new(10, 0.0, 0.5), &mut rng)
            .unwrap();

        assert_eq!(results.epochs_run, 0);
        assert!(results.cost_per_epoch_interval.is_empty());
        assert_eq!(network, before);
    }
}

// ============================================================================
// Determinism Tests
// ============================================================================

mod determinism_tests {
    use super::*;

    fn run(seed: u64, shuffle: bool) -> (MultiLayerPerceptron, Vec<f64>) {
        let mut rng = SimpleRng::new(seed);
        let mut network = MultiLayerPerceptron::new(&[2, 3, 1], None, &mut rng).unwrap();
        let parameters = TrainingParameters::new(100, 0.0, 0.5)
            .with_momentum_coefficient(0.5)
            .with_shuffle(shuffle);

        let results = network.train(&and_examples(), &parameters, &mut rng).unwrap();
        (network, results.cost_per_epoch_interval)
    }

    #[test]
    fn test_same_seed_same_result() {
        assert_eq!(run(99, true), run(99, true));
        assert_eq!(run(99, false), run(99, false));
    }

    #[test]
    fn test_shuffle_changes_trajectory() {
        assert_ne!(run(99, true).1, run(99, false).1);
    }
}

// ============================================================================
// Learning Coefficient Tests
// ============================================================================

mod learning_coefficient_tests {
    use super::*;

    #[test]
    fn test_zero_learning_coefficient_freezes_parameters() {
        let mut rng = SimpleRng::new(17);
        let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();
        let before = network.clone();

        let results = network
            .train(
                &and_examples(),
                &TrainingParameters::new(20, 0.0, 0.0).with_momentum_coefficient(0.9),
                &mut rng,
            )
            .unwrap();

        for (layer, original) in network.layers().iter().zip(before.layers()) {
            assert_eq!(layer.weights(), original.weights());
            assert_eq!(layer.biases(), original.biases());
        }
        let costs = &results.cost_per_epoch_interval;
        assert!(costs.iter().all(|&c| (c - costs[0]).abs() < 1e-12));
    }

    #[test]
    fn test_decay_to_zero_freezes_late_epochs() {
        // lc goes 0.2, 0.1, 0.0 over three epochs; the last epoch changes nothing,
        // so two networks trained for 2 and 3 epochs end up equal.
        let train = |epochs: usize, change: f64| {
            let mut rng = SimpleRng::new(23);
            let mut network = MultiLayerPerceptron::new(&[2, 1], None, &mut rng).unwrap();
            let parameters = TrainingParameters::new(epochs, 0.0, 0.2)
                .with_learning_coefficient_change(change)
                .with_shuffle(false);
            network.train(&and_examples(), &parameters, &mut rng).unwrap();
            network
        };

        let three = train(3, 0.3);
        let two = train(2, 0.2);
        for (a, b) in three.layers().iter().zip(two.layers()) {
            for (x, y) in a.weights().as_slice().iter().zip(b.weights().as_slice()) {
                assert!((x - y).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_unclamped_decay_allows_negative_coefficient() {
        let mut rng = SimpleRng::new(4);
        let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();

        let results = network
            .train(
                &and_examples(),
                &TrainingParameters::new(40, 0.0, 0.1).with_learning_coefficient_change(1.0),
                &mut rng,
            )
            .unwrap();

        assert_eq!(results.epochs_run, 40);
        assert!(results.final_cost.unwrap().is_finite());
    }

    #[test]
    fn test_clamped_decay_stops_at_zero() {
        // With clamping, epochs after the coefficient hits zero leave the
        // parameters alone once momentum is disabled.
        let train = |epochs: usize| {
            let mut rng = SimpleRng::new(4);
            let mut network = MultiLayerPerceptron::new(&[2, 1], None, &mut rng).unwrap();
            let parameters = TrainingParameters::new(epochs, 0.0, 0.1)
                .with_learning_coefficient_change(epochs as f64)
                .with_clamped_learning_coefficient(true)
                .with_shuffle(false);
            network.train(&and_examples(), &parameters, &mut rng).unwrap();
            network
        };

        // One training epoch at 0.1, then the coefficient is clamped to zero.
        let long = train(10);
        let short = train(1);
        for (a, b) in long.layers().iter().zip(short.layers()) {
            assert_eq!(a.weights(), b.weights());
            assert_eq!(a.biases(), b.biases());
        }
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

mod validation_tests {
    use super::*;

    #[test]
    fn test_mismatched_inputs_rejected_before_training() {
        let mut rng = SimpleRng::new(2);
        let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();
        let before = network.clone();

        let mut examples = and_examples();
        examples.push(TrainingExample::new(vec![1.0], vec![1.0]));

        let result = network.train(&examples, &TrainingParameters::new(5, 0.0, 0.5), &mut rng);
        assert!(matches!(result, Err(NetworkError::DimensionMismatch { .. })));
        assert_eq!(network, before);
    }

    #[test]
    fn test_zero_epoch_interval_rejected() {
        let mut rng = SimpleRng::new(2);
        let mut network = MultiLayerPerceptron::new(&[2, 2, 1], None, &mut rng).unwrap();

        let result = network.train(
            &and_examples(),
            &TrainingParameters::new(5, 0.0, 0.5).with_epoch_interval(0),
            &mut rng,
        );
        assert!(matches!(result, Err(NetworkError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_default_parameters() {
        let parameters = TrainingParameters::default();

        assert_eq!(parameters.number_of_epochs, 1);
        assert_eq!(parameters.learning_coefficient_change, 0.0);
        assert_eq!(parameters.momentum_coefficient, 0.0);
        assert!(parameters.shuffle_each_epoch);
        assert_eq!(parameters.epoch_interval, 1);
        assert_eq!(parameters.batch_size, 1);
        assert!(!parameters.clamp_learning_coefficient);
    }
}
