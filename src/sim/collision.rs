//! Seed-to-seed collision resolution
//!
//! Plain O(n²) scan over landed pairs. A session never holds more than 150
//! seeds, so there is no broad phase.

use glam::Vec2;

use super::particle::Particle;

/// Overlap between two circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the second circle toward the first
    pub normal: Vec2,
    /// How far the circles interpenetrate
    pub penetration: f32,
}

impl Contact {
    /// Displacement applied to the first circle (the second gets the negation).
    /// Each side takes half of the overlap.
    #[inline]
    pub fn push(&self) -> Vec2 {
        self.normal * (self.penetration * 0.5)
    }
}

/// Check two circles for overlap.
///
/// Coincident centers have no separating direction and report no contact;
/// floating-point drift pulls them apart on a later frame.
pub fn circle_contact(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> Option<Contact> {
    let delta = a_pos - b_pos;
    let dist = delta.length();
    let min_dist = a_radius + b_radius;

    if dist < min_dist && dist > 0.0 {
        Some(Contact {
            normal: delta / dist,
            penetration: min_dist - dist,
        })
    } else {
        None
    }
}

/// Separate every overlapping pair of landed seeds once.
///
/// Both seeds move half the overlap apart and receive a velocity kick of
/// `impulse` times their push, which reads as an inelastic shove.
/// Returns the number of pairs resolved.
pub fn resolve_collisions(particles: &mut [Particle], impulse: f32) -> usize {
    let mut resolved = 0;

    for i in 0..particles.len() {
        let (head, tail) = particles.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.landed {
            continue;
        }

        for b in tail.iter_mut().filter(|b| b.landed) {
            let Some(contact) = circle_contact(a.pos, a.radius, b.pos, b.radius) else {
                continue;
            };
            let push = contact.push();

            a.pos += push;
            b.pos -= push;
            a.vel += push * impulse;
            b.vel -= push * impulse;
            resolved += 1;
        }
    }

    resolved
}
