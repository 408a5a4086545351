use crate::error::ConeError;
use crate::geometry::{angle_within_arc, normalize_angle, Point};

/// Cone represents the directional range an agent can see into.
/// Angles are in degrees, measured with `atan2` in map-space (y grows downward
/// on screen, so increasing angles turn clockwise there).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cone {
    pub origin: Point,
    /// Direction the cone points at
    pub facing: f32,
    /// Half of the cone's opening; 180 or more covers the full circle
    pub half_angle: f32,
}

impl Cone {
    /// Create a cone, rejecting non-finite input and negative half-angles
    pub fn new(origin: Point, facing: f32, half_angle: f32) -> Result<Self, ConeError> {
        check_finite("origin.x", origin.x)?;
        check_finite("origin.y", origin.y)?;
        check_finite("facing", facing)?;
        check_finite("half_angle", half_angle)?;
        if half_angle < 0.0 {
            return Err(ConeError::NegativeHalfAngle(half_angle));
        }

        Ok(Cone {
            origin,
            facing,
            half_angle,
        })
    }

    pub fn start_angle(&self) -> f32 {
        normalize_angle(self.facing - self.half_angle)
    }

    pub fn end_angle(&self) -> f32 {
        normalize_angle(self.facing + self.half_angle)
    }

    /// Degrees swept from start to end, at most 360
    pub fn span(&self) -> f32 {
        (self.half_angle * 2.0).min(360.0)
    }

    pub fn is_full_circle(&self) -> bool {
        self.half_angle >= 180.0
    }

    /// Offset of `angle` from the start angle, in [0, 360)
    pub fn offset_of(&self, angle: f32) -> f32 {
        normalize_angle(angle - self.start_angle())
    }

    pub fn contains_angle(&self, angle: f32) -> bool {
        if self.is_full_circle() {
            return true;
        }
        angle_within_arc(angle, self.start_angle(), self.end_angle())
    }
}

fn check_finite(field: &'static str, value: f32) -> Result<(), ConeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConeError::NonFinite { field, value })
    }
}
