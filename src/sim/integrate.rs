//! Per-frame particle integration
//!
//! Semi-implicit Euler in frame units: velocities are per-frame displacements
//! and every call advances exactly one frame.

use glam::Vec2;

use super::particle::Particle;
use crate::tuning::MixTuning;

/// Pull a landed particle down the bowl slope toward the center.
/// Strength grows linearly with distance from the center.
#[inline]
fn slope_pull(p: &mut Particle, center: Vec2, bowl_radius: f32, slope: f32, epsilon: f32) {
    let to_center = center - p.pos;
    let dist = to_center.length();
    if dist > epsilon && bowl_radius > 0.0 {
        p.vel += to_center / dist * slope * (dist / bowl_radius);
    }
}

/// Pour/settle frame: falling seeds accelerate toward their ground target,
/// landed seeds slide toward the center.
///
/// Returns the number of seeds that bounced this frame.
pub fn integrate_pour(particles: &mut [Particle], tuning: &MixTuning) -> usize {
    let mut bounces = 0;

    for p in particles.iter_mut() {
        if !p.landed {
            p.vel.y += tuning.gravity;
            p.pos.y += p.vel.y;

            if p.pos.y >= p.ground.y {
                p.pos = p.ground;
                if p.vel.y.abs() > tuning.bounce_speed {
                    p.vel.y *= -tuning.bounce_restitution;
                    bounces += 1;
                } else {
                    p.vel.y = 0.0;
                    p.landed = true;
                }
            }
        }

        if p.landed {
            slope_pull(
                p,
                tuning.bowl_center,
                tuning.bowl_radius,
                tuning.pour_slope,
                tuning.center_epsilon,
            );
            p.vel *= tuning.pour_damping;
            p.pos += p.vel;
        }
    }

    bounces
}

/// Mix frame: every seed is in the dough; damp, move, then slide toward the center
pub fn integrate_mix(particles: &mut [Particle], tuning: &MixTuning) {
    for p in particles.iter_mut() {
        p.vel *= tuning.mix_damping;
        p.pos += p.vel;
        slope_pull(
            p,
            tuning.bowl_center,
            tuning.bowl_radius,
            tuning.mix_slope,
            tuning.center_epsilon,
        );
    }
}

/// Keep seeds inside the bowl rim, bouncing them back off it.
///
/// Returns the number of seeds that hit the rim.
pub fn contain(particles: &mut [Particle], tuning: &MixTuning) -> usize {
    let limit = tuning.containment_radius();
    if limit <= f32::EPSILON {
        return 0;
    }

    let mut hits = 0;
    for p in particles.iter_mut() {
        let offset = p.pos - tuning.bowl_center;
        let dist = offset.length();
        if dist > limit {
            p.pos = tuning.bowl_center + offset / dist * limit;
            p.vel *= -tuning.rim_restitution;
            hits += 1;
        }
    }
    hits
}

/// Refresh the advisory `settled` flag
pub fn update_settled(particles: &mut [Particle], settle_speed: f32) {
    for p in particles.iter_mut() {
        p.settled = p.vel.x.abs() < settle_speed && p.vel.y.abs() < settle_speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn falling(ground: Vec2, height: f32) -> Particle {
        Particle {
            pos: ground - Vec2::new(0.0, height),
            ground,
            landed: false,
            settled: false,
            ..Particle::at_rest(ground, 10.0)
        }
    }

    #[test]
    fn test_fall_accelerates() {
        let tuning = MixTuning::default();
        let mut ps = vec![falling(tuning.bowl_center, 300.0)];
        integrate_pour(&mut ps, &tuning);
        assert_eq!(ps[0].vel.y, 0.5);
        integrate_pour(&mut ps, &tuning);
        assert_eq!(ps[0].vel.y, 1.0);
        assert!((ps[0].pos.y - (tuning.bowl_center.y - 298.5)).abs() < 1e-3);
    }

    #[test]
    fn test_hard_landing_bounces_then_lands() {
        let tuning = MixTuning::default();
        let mut ps = vec![falling(tuning.bowl_center, 100.0)];
        let mut bounces = 0;
        for _ in 0..200 {
            bounces += integrate_pour(&mut ps, &tuning);
            if ps[0].landed {
                break;
            }
        }
        assert!(ps[0].landed);
        assert!(bounces >= 1);
        assert_eq!(ps[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_soft_landing_settles_immediately() {
        let tuning = MixTuning::default();
        let mut ps = vec![falling(tuning.bowl_center, 0.25)];
        let bounces = integrate_pour(&mut ps, &tuning);
        assert_eq!(bounces, 0);
        assert!(ps[0].landed);
        assert_eq!(ps[0].pos, tuning.bowl_center);
    }

    #[test]
    fn test_slope_pulls_toward_center() {
        let tuning = MixTuning::default();
        let start = tuning.bowl_center + Vec2::new(100.0, 0.0);
        let mut ps = vec![Particle::at_rest(start, 10.0)];
        integrate_mix(&mut ps, &tuning);
        assert!(ps[0].vel.x < 0.0);
        assert!(ps[0].vel.y.abs() < 1e-6);
        // 0.15 * (100 / 150)
        assert!((ps[0].vel.x + 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_no_pull_at_center() {
        let tuning = MixTuning::default();
        let mut ps = vec![Particle::at_rest(tuning.bowl_center + Vec2::new(2.0, 0.0), 10.0)];
        integrate_mix(&mut ps, &tuning);
        assert_eq!(ps[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_containment_clamps_and_reflects() {
        let tuning = MixTuning::default();
        let mut p = Particle::at_rest(tuning.bowl_center + Vec2::new(0.0, 200.0), 10.0);
        p.vel = Vec2::new(0.0, 4.0);
        let mut ps = vec![p];
        assert_eq!(contain(&mut ps, &tuning), 1);
        assert!((ps[0].pos.distance(tuning.bowl_center) - 135.0).abs() < 1e-3);
        assert_eq!(ps[0].vel, Vec2::new(0.0, -2.0));
    }

    #[test]
    fn test_containment_skips_degenerate_bowl() {
        let tuning = MixTuning {
            bowl_radius: 10.0,
            containment_margin: 10.0,
            ..MixTuning::default()
        };
        let mut ps = vec![Particle::at_rest(Vec2::new(9000.0, 0.0), 10.0)];
        assert_eq!(contain(&mut ps, &tuning), 0);
        assert!(ps[0].pos.is_finite());
    }

    #[test]
    fn test_settled_is_advisory() {
        let tuning = MixTuning::default();
        let mut p = Particle::at_rest(tuning.bowl_center + Vec2::new(50.0, 0.0), 10.0);
        p.vel = Vec2::new(0.01, 0.0);
        let mut ps = vec![p];
        update_settled(&mut ps, tuning.settle_speed);
        assert!(ps[0].settled);

        // Settled seeds keep moving
        let before = ps[0].pos;
        integrate_mix(&mut ps, &tuning);
        assert_ne!(ps[0].pos, before);
    }
}
