use rand::{Rng, RngCore};

/// Draws an index from `items` proportionally to `weight`.
///
/// The draw is `uniform[0, 1) * total`; weights are subtracted in order and
/// the first item that brings the draw to `<= 0` wins. If floating-point drift
/// leaves the draw positive after the last item, the last item wins.
pub fn pick_weighted<T>(
    items: &[T],
    total: f64,
    weight: impl Fn(&T) -> f64,
    rng: &mut dyn RngCore,
) -> Option<usize> {
    if items.is_empty() {
        return None;
    }

    let mut draw = rng.gen::<f64>() * total;
    for (idx, item) in items.iter().enumerate() {
        draw -= weight(item);
        if draw <= 0.0 {
            return Some(idx);
        }
    }

    Some(items.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_empty_items() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let items: [f64; 0] = [];
        assert_eq!(pick_weighted(&items, 0.0, |w| *w, &mut rng), None);
    }

    #[test]
    fn test_zero_weights_pick_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let items = [0.0, 0.0, 0.0];
        assert_eq!(pick_weighted(&items, 0.0, |w| *w, &mut rng), Some(0));
    }

    #[test]
    fn test_zero_weight_item_never_wins_after_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let items = [1.0, 0.0, 1.0];
        for _ in 0..500 {
            let idx = pick_weighted(&items, 2.0, |w| *w, &mut rng).unwrap();
            assert_ne!(idx, 1);
        }
    }

    #[test]
    fn test_distribution_follows_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let items = [1.0, 3.0];
        let mut counts = [0usize; 2];
        for _ in 0..4000 {
            counts[pick_weighted(&items, 4.0, |w| *w, &mut rng).unwrap()] += 1;
        }
        let share = counts[1] as f64 / 4000.0;
        assert!((share - 0.75).abs() < 0.05, "share was {}", share);
    }

    #[test]
    fn test_drift_falls_back_to_last() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // Stated total larger than the real sum.
        let items = [0.1, 0.1];
        for _ in 0..100 {
            assert!(pick_weighted(&items, 10.0, |w| *w, &mut rng).is_some());
        }
    }
}
