//! Damped spring used to smooth presentation values.
//!
//! ## Usage
//!
//! Feed a changing target into a [`Spring`] once per frame to follow it
//! without visual jumps.
//!
//! ```
//! use vitrine_components::spring::{Spring, SpringSpec};
//!
//! let spec = SpringSpec::default();
//! let mut spring = Spring::new(0.0);
//! spring.set_target(1.0);
//!
//! let mut frames = 0;
//! while spring.step(1.0 / 60.0, &spec) {
//!     frames += 1;
//! }
//! assert_eq!(spring.value(), 1.0);
//! assert!(frames > 10);
//! ```

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Stiffness used by scroll-linked smoothing.
pub const DEFAULT_STIFFNESS: f32 = 50.0;
/// Damping used by scroll-linked smoothing.
pub const DEFAULT_DAMPING: f32 = 15.0;
/// Distance to target below which a spring may settle.
pub const DEFAULT_REST_DELTA: f32 = 0.001;
/// Speed below which a spring may settle.
pub const DEFAULT_REST_SPEED: f32 = 0.01;

/// Longest integration step; longer frames are split.
const MAX_SUBSTEP: f32 = 1.0 / 240.0;

/// Physical parameters of a spring.
///
/// `damping` is the viscous damping coefficient, not a ratio. With the
/// defaults (stiffness 50, damping 15, mass 1) the spring is just past
/// critical damping and does not overshoot.
#[derive(Clone, Copy, Debug, PartialEq, Setters, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringSpec {
    /// Restoring force per unit of displacement. Zero snaps to the target.
    pub stiffness: f32,
    /// Opposing force per unit of velocity.
    pub damping: f32,
    /// Mass of the simulated body.
    pub mass: f32,
    /// Settle threshold on the distance to target.
    pub rest_delta: f32,
    /// Settle threshold on the velocity.
    pub rest_speed: f32,
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
            mass: 1.0,
            rest_delta: DEFAULT_REST_DELTA,
            rest_speed: DEFAULT_REST_SPEED,
        }
    }
}

impl SpringSpec {
    /// A spring with the given stiffness and damping and default thresholds.
    pub fn new(stiffness: f32, damping: f32) -> Self {
        Self {
            stiffness,
            damping,
            ..Self::default()
        }
    }

    /// Damping relative to critical damping (1.0 = critical).
    pub fn damping_ratio(&self) -> f32 {
        let critical = 2.0 * (self.stiffness * self.mass).sqrt();
        if critical <= 0.0 {
            return f32::INFINITY;
        }
        self.damping / critical
    }

    /// Checks that every parameter is finite and in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("stiffness", "finite and non-negative", self.stiffness, self.stiffness >= 0.0),
            ("damping", "finite and non-negative", self.damping, self.damping >= 0.0),
            ("mass", "finite and positive", self.mass, self.mass > 0.0),
            ("rest_delta", "finite and non-negative", self.rest_delta, self.rest_delta >= 0.0),
            ("rest_speed", "finite and non-negative", self.rest_speed, self.rest_speed >= 0.0),
        ];
        for (field, requirement, value, in_range) in checks {
            if !value.is_finite() || !in_range {
                return Err(ConfigError::InvalidSpring {
                    field,
                    requirement,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// One damped spring following a scalar target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// A spring at rest on `value`.
    pub fn new(value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
        }
    }

    /// Jumps to `value` and stops.
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Changes the target; velocity carries over.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Current position.
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current velocity, in units per second.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Position the spring is moving towards.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the spring sits exactly on its target without velocity.
    pub fn is_at_rest(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    /// Whether the spring is within the settle thresholds of `spec`.
    pub fn is_settled(&self, spec: &SpringSpec) -> bool {
        (self.value - self.target).abs() <= spec.rest_delta
            && self.velocity.abs() <= spec.rest_speed
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Once within the thresholds of `spec` the spring snaps exactly onto its
    /// target and stops. Returns whether it is still moving.
    pub fn step(&mut self, dt: f32, spec: &SpringSpec) -> bool {
        if self.is_at_rest() {
            return false;
        }
        if spec.stiffness <= 0.0 || self.is_settled(spec) {
            self.snap_to(self.target);
            return false;
        }

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if dt == 0.0 {
            return true;
        }

        let substeps = (dt / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let h = dt / substeps as f32;
        for _ in 0..substeps {
            let displacement = self.value - self.target;
            let force = -spec.stiffness * displacement - spec.damping * self.velocity;
            self.velocity += force / spec.mass * h;
            self.value += self.velocity * h;
        }

        if self.is_settled(spec) {
            self.snap_to(self.target);
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_rest(spring: &mut Spring, spec: &SpringSpec, max_frames: usize) -> usize {
        for frame in 0..max_frames {
            if !spring.step(1.0 / 60.0, spec) {
                return frame;
            }
        }
        panic!("spring did not settle within {max_frames} frames");
    }

    #[test]
    fn settles_exactly_on_target() {
        let spec = SpringSpec::default();
        let mut spring = Spring::new(100.0);
        spring.set_target(0.0);
        run_to_rest(&mut spring, &spec, 1200);
        assert_eq!(spring.value(), 0.0);
        assert_eq!(spring.velocity(), 0.0);
        assert!(!spring.step(1.0 / 60.0, &spec));
    }

    #[test]
    fn default_spec_does_not_overshoot() {
        let spec = SpringSpec::default();
        assert!(spec.damping_ratio() > 1.0);

        let mut spring = Spring::new(0.0);
        spring.set_target(1.0);
        while spring.step(1.0 / 60.0, &spec) {
            assert!(spring.value() <= 1.0 + spec.rest_delta);
        }
    }

    #[test]
    fn underdamped_spring_overshoots_but_settles() {
        let spec = SpringSpec::new(300.0, 5.0);
        let mut spring = Spring::new(0.0);
        spring.set_target(1.0);
        let mut peak: f32 = 0.0;
        while spring.step(1.0 / 60.0, &spec) {
            peak = peak.max(spring.value());
        }
        assert!(peak > 1.0);
        assert_eq!(spring.value(), 1.0);
    }

    #[test]
    fn zero_stiffness_snaps() {
        let spec = SpringSpec::new(0.0, 0.0);
        let mut spring = Spring::new(0.0);
        spring.set_target(5.0);
        assert!(!spring.step(1.0 / 60.0, &spec));
        assert_eq!(spring.value(), 5.0);
    }

    #[test]
    fn zero_delta_keeps_state() {
        let spec = SpringSpec::default();
        let mut spring = Spring::new(0.0);
        spring.set_target(1.0);
        assert!(spring.step(0.0, &spec));
        assert_eq!(spring.value(), 0.0);
    }

    #[test]
    fn retargeting_keeps_velocity() {
        let spec = SpringSpec::default();
        let mut spring = Spring::new(0.0);
        spring.set_target(1.0);
        spring.step(0.05, &spec);
        let velocity = spring.velocity();
        assert!(velocity > 0.0);
        spring.set_target(0.5);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        assert!(SpringSpec::default().validate().is_ok());
        assert!(matches!(
            SpringSpec::default().mass(0.0).validate(),
            Err(ConfigError::InvalidSpring { field: "mass", .. })
        ));
        assert!(matches!(
            SpringSpec::default().stiffness(f32::NAN).validate(),
            Err(ConfigError::InvalidSpring {
                field: "stiffness",
                ..
            })
        ));
        assert!(matches!(
            SpringSpec::default().rest_delta(-1.0).validate(),
            Err(ConfigError::InvalidSpring {
                field: "rest_delta",
                ..
            })
        ));
    }

    #[test]
    fn deserializes_with_defaults() {
        let spec: SpringSpec = serde_json::from_str(r#"{"stiffness": 100.0}"#).unwrap();
        assert_eq!(spec.stiffness, 100.0);
        assert_eq!(spec.damping, DEFAULT_DAMPING);
        assert_eq!(spec.rest_delta, DEFAULT_REST_DELTA);
    }
}
