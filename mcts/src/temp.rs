use anyhow::{anyhow, Result};
use board::MoveMask;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// Converts the visit counts of a position's moves into a move distribution.
///
/// With a temperature of zero the distribution is one-hot on a move with the most visits, ties
/// broken uniformly at random among the legal candidates. Otherwise each count is raised to
/// `1 / temperature` and normalized. Illegal moves always receive zero. When no legal move has
/// been visited the distribution is uniform over the legal moves.
pub fn visits_to_distribution<R: Rng + ?Sized>(
    visits: &[usize],
    moves: &MoveMask,
    temperature: f32,
    rng: &mut R,
) -> Vec<f32> {
    let mut distribution = vec![0.0; visits.len()];
    let max_visits = moves
        .legal_indices()
        .filter_map(|i| visits.get(i).copied())
        .max()
        .unwrap_or(0);

    if max_visits == 0 {
        let num_legal = moves.count_legal();
        for i in moves.legal_indices() {
            distribution[i] = 1.0 / num_legal as f32;
        }

        return distribution;
    }

    if temperature == 0.0 {
        let best: Vec<usize> = moves
            .legal_indices()
            .filter(|i| visits[*i] == max_visits)
            .collect();

        let chosen = best[rng.gen_range(0..best.len())];
        distribution[chosen] = 1.0;

        return distribution;
    }

    // Scaled by the maximum so that small temperatures cannot overflow.
    let exponent = 1.0 / temperature as f64;
    let weights: Vec<f64> = visits
        .iter()
        .enumerate()
        .map(|(i, v)| {
            if moves.is_legal(i) {
                (*v as f64 / max_visits as f64).powf(exponent)
            } else {
                0.0
            }
        })
        .collect();

    let sum: f64 = weights.iter().sum();

    for (p, w) in distribution.iter_mut().zip(weights) {
        *p = (w / sum) as f32;
    }

    distribution
}

/// Samples a move index proportionally to `distribution`.
pub fn sample_action<R: Rng + ?Sized>(distribution: &[f32], rng: &mut R) -> Result<usize> {
    let weighted_index = WeightedIndex::new(distribution)
        .map_err(|e| anyhow!("Cannot sample from distribution {:?}: {}", distribution, e))?;

    Ok(weighted_index.sample(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn all_legal(n: usize) -> MoveMask {
        MoveMask::new(vec![true; n])
    }

    fn entropy(distribution: &[f32]) -> f32 {
        distribution
            .iter()
            .filter(|p| **p > 0.0)
            .map(|p| -p * p.ln())
            .sum()
    }

    #[test]
    fn test_zero_temperature_is_one_hot_on_most_visited() {
        let mut rng = StdRng::seed_from_u64(1);
        let distribution = visits_to_distribution(&[1, 7, 3, 0], &all_legal(4), 0.0, &mut rng);

        assert_eq!(distribution, vec![0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_zero_temperature_breaks_ties_uniformly() {
        let mut rng = StdRng::seed_from_u64(42);
        let visits = [5, 2, 5, 0, 5];
        let mut chosen = [0usize; 5];
        let repetitions = 3000;

        for _ in 0..repetitions {
            let distribution = visits_to_distribution(&visits, &all_legal(5), 0.0, &mut rng);

            assert_approx_eq!(distribution.iter().sum::<f32>(), 1.0);
            let index = distribution.iter().position(|p| *p == 1.0).unwrap();
            chosen[index] += 1;
        }

        assert_eq!(chosen[1], 0);
        assert_eq!(chosen[3], 0);

        for index in [0, 2, 4] {
            let frequency = chosen[index] as f32 / repetitions as f32;
            assert!(
                (frequency - 1.0 / 3.0).abs() < 0.05,
                "Index {} chosen with frequency {}",
                index,
                frequency
            );
        }
    }

    #[test]
    fn test_zero_temperature_ignores_illegal_ties() {
        let mut rng = StdRng::seed_from_u64(3);
        let moves = MoveMask::new(vec![false, true, true]);

        for _ in 0..50 {
            let distribution = visits_to_distribution(&[0, 0, 4], &moves, 0.0, &mut rng);
            assert_eq!(distribution, vec![0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_temperature_one_is_proportional() {
        let mut rng = StdRng::seed_from_u64(1);
        let distribution = visits_to_distribution(&[1, 3, 0, 4], &all_legal(4), 1.0, &mut rng);

        assert_approx_eq!(distribution[0], 0.125);
        assert_approx_eq!(distribution[1], 0.375);
        assert_approx_eq!(distribution[2], 0.0);
        assert_approx_eq!(distribution[3], 0.5);
    }

    #[test]
    fn test_higher_temperature_is_flatter() {
        let mut rng = StdRng::seed_from_u64(1);
        let visits = [10, 4, 1, 6, 2];
        let mut last_entropy = 0.0;
        let mut last_max = 1.0;

        for temperature in [0.1, 0.25, 0.5, 1.0, 2.0, 4.0] {
            let distribution = visits_to_distribution(&visits, &all_legal(5), temperature, &mut rng);
            let max = distribution.iter().cloned().fold(0.0, f32::max);

            assert_approx_eq!(distribution.iter().sum::<f32>(), 1.0);
            assert!(entropy(&distribution) > last_entropy);
            assert!(max < last_max);

            last_entropy = entropy(&distribution);
            last_max = max;
        }
    }

    #[test]
    fn test_tiny_temperature_does_not_overflow() {
        let mut rng = StdRng::seed_from_u64(1);
        let distribution = visits_to_distribution(&[400, 399, 1], &all_legal(3), 0.001, &mut rng);

        assert!(distribution.iter().all(|p| p.is_finite()));
        assert_approx_eq!(distribution.iter().sum::<f32>(), 1.0);
        assert!(distribution[0] > 0.99);
    }

    #[test]
    fn test_unvisited_falls_back_to_uniform_over_legal() {
        let mut rng = StdRng::seed_from_u64(1);
        let moves = MoveMask::new(vec![true, false, true, true]);
        let distribution = visits_to_distribution(&[0, 0, 0, 0], &moves, 1.0, &mut rng);

        assert_approx_eq!(distribution[0], 1.0 / 3.0);
        assert_approx_eq!(distribution[1], 0.0);
        assert_approx_eq!(distribution[3], 1.0 / 3.0);
    }

    #[test]
    fn test_sample_action_follows_weights() {
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..100 {
            assert_eq!(sample_action(&[0.0, 0.0, 1.0], &mut rng).unwrap(), 2);
        }

        assert!(sample_action(&[0.0, 0.0], &mut rng).is_err());
    }
}
