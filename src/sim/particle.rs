//! Star-seed particles poured into the bowl

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::MixTuning;

/// Number of cosmetic seed variants
pub const SEED_VARIANTS: u8 = 3;

/// One simulated star seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Resting point on the bowl floor (pour phase target)
    pub ground: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Touched its ground target
    pub landed: bool,
    /// Speed under the rest threshold. Advisory only, never freezes physics.
    pub settled: bool,
    /// Cosmetic variant in `0..SEED_VARIANTS`
    pub img_index: u8,
    /// Progress percentage at which this seed starts fading into the dough
    pub vanish_threshold: f32,
}

impl Particle {
    /// A resting, landed particle at `pos` (used for staging scenes and tests)
    pub fn at_rest(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            ground: pos,
            vel: Vec2::ZERO,
            radius,
            landed: true,
            settled: true,
            img_index: 0,
            vanish_threshold: 100.0,
        }
    }

    /// Spawn a seed above a random point of the bowl floor
    pub fn spawn<R: Rng>(rng: &mut R, tuning: &MixTuning) -> Self {
        // sqrt keeps the targets uniform over the disc area
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let r = rng.random::<f32>().sqrt() * tuning.spawn_radius();
        let ground = tuning.bowl_center + Vec2::new(angle.cos(), angle.sin()) * r;

        let drop_height = sample_span(rng, tuning.drop_height_min, tuning.drop_height_span);
        let radius = sample_span(rng, tuning.radius_min, tuning.radius_span);
        let img_index = rng.random_range(0..SEED_VARIANTS);
        let vanish_threshold = sample_span(rng, tuning.vanish_min, tuning.vanish_span);

        Self {
            pos: Vec2::new(ground.x, ground.y - drop_height),
            ground,
            vel: Vec2::ZERO,
            radius,
            landed: false,
            settled: false,
            img_index,
            vanish_threshold,
        }
    }

    /// Opacity while the dough forms: fully visible until `vanish_threshold`,
    /// then fading out over the next 10 percent of progress
    pub fn alpha(&self, progress: f32) -> f32 {
        if progress > self.vanish_threshold {
            (1.0 - (progress - self.vanish_threshold) / 10.0).max(0.0)
        } else {
            1.0
        }
    }
}

/// Uniform in `[min, min + span)`; a non-positive span yields `min`
fn sample_span<R: Rng>(rng: &mut R, min: f32, span: f32) -> f32 {
    if span > 0.0 {
        rng.random_range(min..min + span)
    } else {
        min
    }
}

/// Pour `count` fresh seeds
pub fn spawn_particles<R: Rng>(rng: &mut R, count: usize, tuning: &MixTuning) -> Vec<Particle> {
    (0..count).map(|_| Particle::spawn(rng, tuning)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_ranges() {
        let tuning = MixTuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for p in spawn_particles(&mut rng, 200, &tuning) {
            assert!(p.ground.distance(tuning.bowl_center) <= tuning.spawn_radius() + 1e-3);
            let drop = p.ground.y - p.pos.y;
            assert!((300.0..500.0).contains(&drop), "drop {drop}");
            assert!((8.0..12.0).contains(&p.radius));
            assert!(p.img_index < SEED_VARIANTS);
            assert!((50.0..90.0).contains(&p.vanish_threshold));
            assert!(!p.landed && !p.settled);
            assert_eq!(p.vel, Vec2::ZERO);
            assert_eq!(p.pos.x, p.ground.x);
        }
    }

    /// Generator stuck at its largest output
    struct MaxRng;

    impl rand::RngCore for MaxRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dst: &mut [u8]) {
            dst.fill(0xff);
        }
    }

    #[test]
    fn test_spawn_ranges_exclude_upper_bound() {
        let tuning = MixTuning::default();
        let p = Particle::spawn(&mut MaxRng, &tuning);
        assert!(p.vanish_threshold < 90.0, "vanish {}", p.vanish_threshold);
        assert!(p.radius < 12.0, "radius {}", p.radius);
        assert!(p.img_index < SEED_VARIANTS);

        let drop = sample_span(&mut MaxRng, tuning.drop_height_min, tuning.drop_height_span);
        assert!(drop < 500.0, "drop {drop}");
    }

    #[test]
    fn test_zero_span_is_fixed() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(sample_span(&mut rng, 8.0, 0.0), 8.0);
    }

    #[test]
    fn test_alpha_fades_after_threshold() {
        let mut p = Particle::at_rest(Vec2::ZERO, 10.0);
        p.vanish_threshold = 60.0;
        assert_eq!(p.alpha(10.0), 1.0);
        assert_eq!(p.alpha(60.0), 1.0);
        assert!((p.alpha(65.0) - 0.5).abs() < 1e-5);
        assert_eq!(p.alpha(80.0), 0.0);
    }
}
