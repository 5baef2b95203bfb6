//! Data-driven mixing balance
//!
//! Every physical constant of the bowl lives here so that a host can ship a
//! JSON override without rebuilding. Missing fields fall back to defaults.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tunable constants for one mixing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixTuning {
    // === Bowl ===
    /// Bowl center in simulation pixels
    pub bowl_center: Vec2,
    /// Bowl radius in pixels
    pub bowl_radius: f32,
    /// Ground targets stay this far inside the rim
    pub spawn_margin: f32,
    /// Containment circle is this far inside the rim (mix phase)
    pub containment_margin: f32,
    /// Pointer still drags dough this far outside the rim
    pub activation_margin: f32,

    // === Spawning ===
    /// Minimum drop height above the ground target
    pub drop_height_min: f32,
    /// Random extra drop height
    pub drop_height_span: f32,
    /// Minimum particle radius
    pub radius_min: f32,
    /// Random extra particle radius
    pub radius_span: f32,
    /// Progress percentage at which the earliest particles start fading
    pub vanish_min: f32,
    /// Random extra fade threshold
    pub vanish_span: f32,

    // === Pour physics ===
    /// Downward acceleration per frame while falling
    pub gravity: f32,
    /// Landing speeds above this bounce instead of settling
    pub bounce_speed: f32,
    /// Velocity kept (inverted) after a bounce
    pub bounce_restitution: f32,
    /// Centripetal slope strength while pouring
    pub pour_slope: f32,
    /// Per-frame velocity decay while pouring
    pub pour_damping: f32,

    // === Mix physics ===
    /// Centripetal slope strength while mixing
    pub mix_slope: f32,
    /// Per-frame velocity decay while mixing
    pub mix_damping: f32,
    /// Velocity kept (inverted) after hitting the rim
    pub rim_restitution: f32,
    /// No centripetal pull closer than this to the center
    pub center_epsilon: f32,

    // === Collisions ===
    /// Velocity impulse per unit of positional push
    pub collision_impulse: f32,
    /// Per-axis speed under which a particle counts as settled
    pub settle_speed: f32,

    // === Agitation ===
    /// Particles within this distance of the pointer are pushed
    pub agitate_radius: f32,
    /// Share of the pointer movement transferred at the pointer center
    pub agitate_strength: f32,
    /// Total width of the per-axis random jitter
    pub agitate_jitter: f32,
    /// Drag distance per progress percent (K)
    pub progress_divisor: f32,
    /// Movement below this never triggers a cue
    pub cue_min_move: f32,
    /// Frames between "mix" cues
    pub mix_cue_cooldown: u32,
    /// Frames between "knead" cues
    pub knead_cue_cooldown: u32,

    // === Timer and scoring ===
    /// Mixing time budget in seconds
    pub mix_duration: f32,
    /// Score points per progress percent
    pub score_per_progress: f32,
}

impl Default for MixTuning {
    fn default() -> Self {
        Self {
            bowl_center: Vec2::new(500.0, 300.0),
            bowl_radius: 150.0,
            spawn_margin: 20.0,
            containment_margin: 15.0,
            activation_margin: 50.0,

            drop_height_min: 300.0,
            drop_height_span: 200.0,
            radius_min: 8.0,
            radius_span: 4.0,
            vanish_min: 50.0,
            vanish_span: 40.0,

            gravity: 0.5,
            bounce_speed: 2.0,
            bounce_restitution: 0.3,
            pour_slope: 0.1,
            pour_damping: 0.95,

            mix_slope: 0.15,
            mix_damping: 0.9,
            rim_restitution: 0.5,
            center_epsilon: 5.0,

            collision_impulse: 0.1,
            settle_speed: 0.05,

            agitate_radius: 80.0,
            agitate_strength: 0.5,
            agitate_jitter: 2.0,
            progress_divisor: 200.0,
            cue_min_move: 1.0,
            mix_cue_cooldown: 180,  // 3 seconds
            knead_cue_cooldown: 120, // 2 seconds

            mix_duration: 10.0,
            score_per_progress: 0.3,
        }
    }
}

impl MixTuning {
    /// Parse a tuning override; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the full tuning table
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Radius of the disc ground targets are drawn from
    pub fn spawn_radius(&self) -> f32 {
        (self.bowl_radius - self.spawn_margin).max(0.0)
    }

    /// Radius of the mix-phase containment circle
    pub fn containment_radius(&self) -> f32 {
        self.bowl_radius - self.containment_margin
    }

    /// Pointer must be closer than this to the center to count as dragging
    pub fn activation_radius(&self) -> f32 {
        self.bowl_radius + self.activation_margin
    }

    /// Progress for a cumulative drag distance, capped at 100
    pub fn progress_for(&self, drag_distance: f32) -> f32 {
        if self.progress_divisor <= 0.0 {
            return 100.0;
        }
        (drag_distance / self.progress_divisor).min(100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = MixTuning::from_json(r#"{ "bowl_radius": 200.0, "mix_duration": 5.0 }"#)
            .expect("valid json");
        assert_eq!(tuning.bowl_radius, 200.0);
        assert_eq!(tuning.mix_duration, 5.0);
        assert_eq!(tuning.gravity, MixTuning::default().gravity);
        assert_eq!(tuning.bowl_center, Vec2::new(500.0, 300.0));
    }

    #[test]
    fn test_round_trip() {
        let tuning = MixTuning::default();
        let json = tuning.to_json().expect("serializable");
        assert_eq!(MixTuning::from_json(&json).expect("parses"), tuning);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(MixTuning::from_json("{ bowl_radius: }").is_err());
    }

    #[test]
    fn test_progress_caps_at_100() {
        let tuning = MixTuning::default();
        assert_eq!(tuning.progress_for(0.0), 0.0);
        assert!((tuning.progress_for(2_000.0) - 10.0).abs() < 1e-4);
        assert_eq!(tuning.progress_for(1.0e9), 100.0);
    }

    #[test]
    fn test_derived_radii() {
        let tuning = MixTuning::default();
        assert_eq!(tuning.spawn_radius(), 130.0);
        assert_eq!(tuning.containment_radius(), 135.0);
        assert_eq!(tuning.activation_radius(), 200.0);
    }
}
