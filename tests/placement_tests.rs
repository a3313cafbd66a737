use glam::Vec2;
use gratitude_grove::core::{PlacementConstraint, SpatialPlacer};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(test)]
mod placement_tests {
    use super::*;

    #[test]
    fn test_ten_thousand_samples_stay_in_annulus() {
        let constraint = PlacementConstraint::default();
        let mut placer = SpatialPlacer::with_rng(StdRng::seed_from_u64(7));
        for _ in 0..10_000 {
            let p = placer.place(&constraint);
            let radial = Vec2::new(p.x, p.z).length();
            assert!(radial >= 4.0 - 1e-4 && radial <= 8.0 + 1e-4, "radius {}", radial);
            assert!(p.y >= 1.5 && p.y <= 5.0, "height {}", p.y);
        }
    }

    #[test]
    fn test_samples_cover_every_quadrant() {
        let constraint = PlacementConstraint::default();
        let mut placer = SpatialPlacer::with_rng(StdRng::seed_from_u64(11));
        let mut quadrants = [false; 4];
        for _ in 0..1_000 {
            let p = placer.place(&constraint);
            let index = (p.x >= 0.0) as usize * 2 + (p.z >= 0.0) as usize;
            quadrants[index] = true;
        }
        assert!(quadrants.iter().all(|seen| *seen));
    }

    #[test]
    fn test_degenerate_range_collapses_to_bound() {
        let constraint = PlacementConstraint::new(5.0, 5.0, 3.0, 3.0).unwrap();
        let mut placer = SpatialPlacer::with_rng(StdRng::seed_from_u64(3));
        for _ in 0..100 {
            let p = placer.place(&constraint);
            assert!((Vec2::new(p.x, p.z).length() - 5.0).abs() < 1e-3);
            assert!((p.y - 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        assert!(PlacementConstraint::new(8.0, 4.0, 1.5, 5.0).is_err());
        assert!(PlacementConstraint::new(4.0, 8.0, 5.0, 1.5).is_err());
        assert!(PlacementConstraint::new(-1.0, 8.0, 1.5, 5.0).is_err());
    }
}
