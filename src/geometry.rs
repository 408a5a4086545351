use serde::{Deserialize, Serialize};

/// Margin added to every side of a segment's bounding box when checking
/// whether an intersection lies on it. Absorbs float error at shared endpoints.
pub const FUDGE: f32 = 4.0;

/// A point in map-space units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub fn distance_squared(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: Point) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Angle in degrees from this point towards `other`, in (-180, 180]
    pub fn angle_to(&self, other: Point) -> f32 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }

    /// Point reached by travelling `length` units from `self` at `angle` degrees
    pub fn from_polar(&self, angle: f32, length: f32) -> Point {
        let rad = angle.to_radians();
        Point {
            x: self.x + rad.cos() * length,
            y: self.y + rad.sin() * length,
        }
    }
}

/// An ordered pair of points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    pub fn new(p1: Point, p2: Point) -> Self {
        Segment { p1, p2 }
    }

    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Segment {
            p1: Point::new(x1, y1),
            p2: Point::new(x2, y2),
        }
    }

    pub fn length(&self) -> f32 {
        self.p1.distance(self.p2)
    }

    pub fn is_axis_aligned(&self) -> bool {
        self.p1.x == self.p2.x || self.p1.y == self.p2.y
    }

    /// Check if `p` is inside this segment's bounding box grown by `margin`
    pub fn bounds_contain(&self, p: Point, margin: f32) -> bool {
        let (min_x, max_x) = min_max(self.p1.x, self.p2.x);
        let (min_y, max_y) = min_max(self.p1.y, self.p2.y);
        p.x >= min_x - margin && p.x <= max_x + margin && p.y >= min_y - margin && p.y <= max_y + margin
    }

    /// Check if `p` lies on the segment itself (not just its line), within `tolerance`
    pub fn contains_point(&self, p: Point, tolerance: f32) -> bool {
        let dx = self.p2.x - self.p1.x;
        let dy = self.p2.y - self.p1.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            return self.p1.distance(p) <= tolerance;
        }
        // Perpendicular distance from p to the segment's line
        let cross = (p.x - self.p1.x) * dy - (p.y - self.p1.y) * dx;
        if (cross / len).abs() > tolerance {
            return false;
        }
        self.bounds_contain(p, tolerance)
    }
}

fn min_max(a: f32, b: f32) -> (f32, f32) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Intersect two segments.
///
/// Each segment is taken as the line `Ax + By = C` with `A = y2 - y1`,
/// `B = x1 - x2` and `C = A*x1 + B*y1`. Parallel lines (including collinear
/// and zero-length segments) give `None`. Otherwise the solved point is
/// returned only if it falls within both bounding boxes grown by [`FUDGE`].
pub fn intersect(a: &Segment, b: &Segment) -> Option<Point> {
    let a1 = a.p2.y - a.p1.y;
    let b1 = a.p1.x - a.p2.x;
    let c1 = a1 * a.p1.x + b1 * a.p1.y;

    let a2 = b.p2.y - b.p1.y;
    let b2 = b.p1.x - b.p2.x;
    let c2 = a2 * b.p1.x + b2 * b.p1.y;

    let det = a1 * b2 - a2 * b1;
    if det == 0.0 {
        return None;
    }

    let p = Point {
        x: (b2 * c1 - b1 * c2) / det,
        y: (a1 * c2 - a2 * c1) / det,
    };

    if !p.x.is_finite() || !p.y.is_finite() {
        return None;
    }

    if a.bounds_contain(p, FUDGE) && b.bounds_contain(p, FUDGE) {
        Some(p)
    } else {
        None
    }
}

/// Wrap any angle in degrees into [0, 360)
pub fn normalize_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Check if sweeping counter-clockwise (increasing degrees) from `start`
/// reaches `angle` no later than `end`. Works across the 0/360 boundary.
pub fn angle_within_arc(angle: f32, start: f32, end: f32) -> bool {
    let offset = normalize_angle(angle - start);
    let span = normalize_angle(end - start);
    offset <= span
}
