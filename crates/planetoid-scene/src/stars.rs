//! Background star placement.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Scatter `count` points uniformly over directions, at distances in
/// `[min_radius, max_radius)` from the origin. Deterministic for a seed.
pub fn scatter_stars(count: u32, min_radius: f32, max_radius: f32, seed: u64) -> Vec<Vec3> {
    let (lo, hi) = if min_radius <= max_radius {
        (min_radius, max_radius)
    } else {
        (max_radius, min_radius)
    };
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let theta = rng.random::<f32>() * std::f32::consts::TAU;
            let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
            let direction =
                Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
            let radius = if hi > lo { rng.random_range(lo..hi) } else { lo };
            direction * radius
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_and_shell() {
        let stars = scatter_stars(200, 500.0, 1000.0, 7);
        assert_eq!(stars.len(), 200);
        for s in &stars {
            let r = s.length();
            // Direction normalization adds a little float noise.
            assert!(r >= 500.0 - 1e-2 && r < 1000.0 + 1e-2, "radius {r}");
        }
    }

    #[test]
    fn test_deterministic_per_seed() {
        assert_eq!(scatter_stars(16, 500.0, 1000.0, 3), scatter_stars(16, 500.0, 1000.0, 3));
        assert_ne!(scatter_stars(16, 500.0, 1000.0, 3), scatter_stars(16, 500.0, 1000.0, 4));
    }

    #[test]
    fn test_swapped_bounds() {
        for s in scatter_stars(50, 1000.0, 500.0, 1) {
            assert!(s.length() >= 500.0 - 1e-2 && s.length() < 1000.0 + 1e-2);
        }
    }

    #[test]
    fn test_degenerate_shell() {
        for s in scatter_stars(10, 600.0, 600.0, 9) {
            assert!((s.length() - 600.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_spread_over_both_hemispheres() {
        let stars = scatter_stars(200, 500.0, 1000.0, 11);
        assert!(stars.iter().any(|s| s.y > 0.0));
        assert!(stars.iter().any(|s| s.y < 0.0));
    }

    #[test]
    fn test_zero_count() {
        assert!(scatter_stars(0, 500.0, 1000.0, 0).is_empty());
    }
}
