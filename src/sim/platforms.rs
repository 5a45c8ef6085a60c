//! Procedural platform layouts
//!
//! Every room rolls its own static collision layout once, at session start.

use glam::Vec2;
use rand::Rng;

use super::aabb::Aabb;
use crate::tuning::{PlatformLayout, PlatformTuning};

/// Height above a platform top at which clues float
const CLUE_HOVER: f32 = 0.5;

/// Generate one room's platforms
pub fn generate_platforms<R: Rng>(tuning: &PlatformTuning, rng: &mut R) -> Vec<Aabb> {
    let count = tuning.min_count + rng.random_range(0..=tuning.extra_count);
    let mut platforms = Vec::with_capacity(count as usize * 2);

    for _ in 0..count {
        let platform = roll_platform(tuning, rng);
        match tuning.layout {
            PlatformLayout::Random => platforms.push(platform),
            PlatformLayout::Mirrored => {
                platforms.push(platform);
                platforms.push(platform.mirrored_x());
            }
        }
    }

    log::debug!(
        "Generated {} platforms ({:?} layout)",
        platforms.len(),
        tuning.layout
    );
    platforms
}

fn roll_platform<R: Rng>(tuning: &PlatformTuning, rng: &mut R) -> Aabb {
    let width = rng.random_range(tuning.min_width..=tuning.max_width);
    let x = rng.random_range(tuning.min_x..=tuning.max_x);
    let y = rng.random_range(tuning.min_y..=tuning.max_y);
    Aabb::from_center(
        Vec2::new(x, y),
        Vec2::new(width / 2.0, tuning.thickness / 2.0),
    )
}

/// Pick `count` clue positions hovering over random platforms
///
/// Falls back to floor height at the room center when there are no platforms.
pub fn clue_spots<R: Rng>(platforms: &[Aabb], count: u32, floor: f32, rng: &mut R) -> Vec<Vec2> {
    (0..count)
        .map(|_| {
            if platforms.is_empty() {
                return Vec2::new(0.0, floor + CLUE_HOVER);
            }
            let platform = &platforms[rng.random_range(0..platforms.len())];
            let half = (platform.width() / 2.0 - 0.2).max(0.0);
            let center = platform.center();
            let x = if half > 0.0 {
                center.x + rng.random_range(-half..=half)
            } else {
                center.x
            };
            Vec2::new(x, platform.top + CLUE_HOVER)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_random_layout_within_ranges() {
        let tuning = PlatformTuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            let platforms = generate_platforms(&tuning, &mut rng);
            let n = platforms.len() as u32;
            assert!(n >= tuning.min_count && n <= tuning.min_count + tuning.extra_count);
            for p in &platforms {
                let c = p.center();
                assert!(c.x >= tuning.min_x - 1e-4 && c.x <= tuning.max_x + 1e-4);
                assert!(c.y >= tuning.min_y - 1e-4 && c.y <= tuning.max_y + 1e-4);
                assert!(p.width() >= tuning.min_width - 1e-4);
                assert!(p.width() <= tuning.max_width + 1e-4);
                assert!((p.top - p.bottom - tuning.thickness).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_mirrored_layout_is_symmetric() {
        let tuning = PlatformTuning {
            layout: PlatformLayout::Mirrored,
            min_x: 2.0,
            max_x: 6.0,
            ..PlatformTuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let platforms = generate_platforms(&tuning, &mut rng);
        assert_eq!(platforms.len() % 2, 0);
        for pair in platforms.chunks(2) {
            assert_eq!(pair[0].mirrored_x(), pair[1]);
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let tuning = PlatformTuning::default();
        let a = generate_platforms(&tuning, &mut Pcg32::seed_from_u64(9));
        let b = generate_platforms(&tuning, &mut Pcg32::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_clues_float_over_platforms() {
        let platforms = vec![Aabb::new(-1.0, 1.9, 1.0, 2.1)];
        let mut rng = Pcg32::seed_from_u64(1);
        let spots = clue_spots(&platforms, 3, 0.0, &mut rng);
        assert_eq!(spots.len(), 3);
        for spot in spots {
            assert!((spot.y - 2.6).abs() < 1e-5);
            assert!(spot.x.abs() <= 0.8 + 1e-5);
        }
        let spots = clue_spots(&[], 1, 0.0, &mut rng);
        assert_eq!(spots[0], Vec2::new(0.0, 0.5));
    }
}
