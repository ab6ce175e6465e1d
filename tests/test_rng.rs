// Tests for RNG reproducibility and distribution through the rand traits.

use multilayer_perceptron::utils::SimpleRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

mod tests {
    use super::*;

    #[test]
    fn test_rng_same_seed_produces_same_sequence() {
        let mut a = SimpleRng::new(12345);
        let mut b = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds_produce_different_sequences() {
        let mut a = SimpleRng::new(1);
        let mut b = SimpleRng::new(2);
        let first: Vec<u32> = (0..10).map(|_| a.next_u32()).collect();
        let second: Vec<u32> = (0..10).map(|_| b.next_u32()).collect();
        assert_ne!(first, second);
    }

    #[test]
    fn test_rng_zero_seed_uses_default() {
        let mut zero = SimpleRng::new(0);
        let mut fallback = SimpleRng::new(0x9e3779b97f4a7c15);
        assert_eq!(zero.next_u64(), fallback.next_u64());
        assert_ne!(SimpleRng::new(0).next_u64(), 0);
    }

    #[test]
    fn test_seed_from_u64_matches_new() {
        let mut seeded = SimpleRng::seed_from_u64(77);
        let mut direct = SimpleRng::new(77);
        for _ in 0..20 {
            assert_eq!(seeded.next_u32(), direct.next_u32());
        }
    }

    #[test]
    fn test_from_seed_bytes() {
        let mut from_bytes = SimpleRng::from_seed(42u64.to_le_bytes());
        let mut direct = SimpleRng::new(42);
        assert_eq!(from_bytes.next_u64(), direct.next_u64());
    }

    #[test]
    fn test_fill_bytes_partial_chunk() {
        let mut rng = SimpleRng::new(9);
        let mut reference = SimpleRng::new(9);

        let mut dest = [0u8; 11];
        rng.fill_bytes(&mut dest);

        let first = reference.next_u64().to_le_bytes();
        let second = reference.next_u64().to_le_bytes();
        assert_eq!(&dest[..8], &first);
        assert_eq!(&dest[8..], &second[..3]);
    }

    #[test]
    fn test_gen_range_f64_within_bounds() {
        let mut rng = SimpleRng::new(42);
        for _ in 0..10_000 {
            let value = rng.gen_range(-0.5..0.5);
            assert!((-0.5..0.5).contains(&value));
        }
    }

    #[test]
    fn test_gen_range_f64_distribution() {
        let mut rng = SimpleRng::new(42);
        let n = 10_000;
        let values: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();

        let mean = values.iter().sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.02, "mean = {mean}");

        let below_quarter = values.iter().filter(|&&v| v < 0.25).count();
        assert!((2_200..2_800).contains(&below_quarter));
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SimpleRng::new(5);
        let mut order: Vec<usize> = (0..50).collect();
        order.shuffle(&mut rng);

        assert_ne!(order, (0..50).collect::<Vec<_>>());
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_shuffle_reproducible() {
        let shuffled = |seed| {
            let mut rng = SimpleRng::new(seed);
            let mut order: Vec<usize> = (0..20).collect();
            order.shuffle(&mut rng);
            order
        };
        assert_eq!(shuffled(3), shuffled(3));
        assert_ne!(shuffled(3), shuffled(4));
    }

    #[test]
    fn test_clone_continues_identically() {
        let mut rng = SimpleRng::new(100);
        rng.next_u64();
        let mut copy = rng.clone();
        for _ in 0..10 {
            assert_eq!(rng.next_u64(), copy.next_u64());
        }
    }
}
