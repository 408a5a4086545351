use crate::cone::Cone;
use crate::error::ConeError;
use crate::geometry::Point;

/// Agent whose pose drives the visibility cone
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    /// Position in map units
    pub position: Point,

    /// Facing direction in degrees
    pub facing: f32,

    /// Map units travelled per second
    pub speed: f32,
}

impl Agent {
    /// Create a new agent at the given position, facing along +x
    pub fn new(position: Point, speed: f32) -> Self {
        Agent {
            position,
            facing: 0.0,
            speed,
        }
    }

    /// Turn to face `target`. Facing is unchanged when target is the
    /// agent's own position.
    pub fn aim_at(&mut self, target: Point) {
        if target != self.position {
            self.facing = self.position.angle_to(target);
        }
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.position.x += dx;
        self.position.y += dy;
    }

    /// Grid cell (col, row) the agent's position falls in
    pub fn cell(&self, cell_size: f32) -> (i32, i32) {
        (
            (self.position.x / cell_size).floor() as i32,
            (self.position.y / cell_size).floor() as i32,
        )
    }

    /// Visibility cone for the current pose
    pub fn cone(&self, half_angle: f32) -> Result<Cone, ConeError> {
        Cone::new(self.position, self.facing, half_angle)
    }
}
