use crate::cone::Cone;
use crate::geometry::{intersect, normalize_angle, Point, Segment};
use std::iter;
use tracing::trace;

/// Default length of every swept ray, in map units
pub const DEFAULT_RAY_LENGTH: f32 = 1000.0;

/// Candidate angles closer than this (degrees) are swept once
const ANGLE_EPSILON: f32 = 1e-4;

/// Distance under which the origin counts as lying on a segment
const ON_SEGMENT_TOLERANCE: f32 = 1e-3;

/// One slice of the visibility fan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityTriangle {
    pub origin: Point,
    pub previous: Point,
    pub current: Point,
}

impl VisibilityTriangle {
    pub fn area(&self) -> f32 {
        cross(self.origin, self.previous, self.current).abs() / 2.0
    }

    /// Point-in-triangle test (edges count as inside). Zero-area triangles
    /// contain nothing.
    pub fn contains_point(&self, p: Point) -> bool {
        if self.area() <= f32::EPSILON {
            return false;
        }
        let d1 = cross(p, self.origin, self.previous);
        let d2 = cross(p, self.previous, self.current);
        let d3 = cross(p, self.current, self.origin);

        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }
}

fn cross(o: Point, a: Point, b: Point) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Where a swept ray ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Ray direction in degrees, [0, 360)
    pub angle: f32,
    pub point: Point,
    /// False when the ray reached full length
    pub blocked: bool,
}

/// Visible area within a cone: triangles anchored at the origin, in sweep order
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityFan {
    pub origin: Point,
    pub triangles: Vec<VisibilityTriangle>,
    /// Every swept ray, in sweep order. Useful for debug drawing.
    pub rays: Vec<RayHit>,
}

impl VisibilityFan {
    pub fn contains_point(&self, p: Point) -> bool {
        self.triangles.iter().any(|t| t.contains_point(p))
    }

    pub fn area(&self) -> f32 {
        self.triangles.iter().map(|t| t.area()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

/// Compute the visibility fan for `cone` against `segments`.
///
/// Rays are cast at the cone's two borders and towards every segment
/// endpoint inside the cone, in a single sweep from the start border to the
/// end border. Each ray stops at its nearest hit. Consecutive ray ends form
/// the fan's triangles.
pub fn calculate_visibility(cone: &Cone, segments: &[Segment], ray_length: f32) -> VisibilityFan {
    let origin = cone.origin;
    let start = cone.start_angle();
    let span = cone.span();

    // Offsets from the start angle; the borders are added separately
    let mut interior: Vec<f32> = Vec::new();
    for segment in segments {
        for endpoint in [segment.p1, segment.p2] {
            if endpoint == origin {
                continue; // No direction to it
            }
            let angle = origin.angle_to(endpoint);
            if !cone.contains_angle(angle) {
                continue;
            }
            let offset = cone.offset_of(angle);
            if offset > ANGLE_EPSILON && offset < span - ANGLE_EPSILON {
                interior.push(offset);
            }
        }
    }
    interior.sort_by(f32::total_cmp);
    interior.dedup_by(|a, b| (*a - *b).abs() < ANGLE_EPSILON);

    let rays: Vec<RayHit> = iter::once(0.0)
        .chain(interior)
        .chain(iter::once(span))
        .map(|offset| cast_ray(origin, normalize_angle(start + offset), ray_length, segments))
        .collect();

    let triangles: Vec<VisibilityTriangle> = rays
        .windows(2)
        .map(|pair| VisibilityTriangle {
            origin,
            previous: pair[0].point,
            current: pair[1].point,
        })
        .collect();

    trace!(
        segments = segments.len(),
        rays = rays.len(),
        triangles = triangles.len(),
        "visibility sweep"
    );

    VisibilityFan {
        origin,
        triangles,
        rays,
    }
}

/// Cast one ray and stop it at the nearest segment it meets
pub fn cast_ray(origin: Point, angle: f32, ray_length: f32, segments: &[Segment]) -> RayHit {
    let rad = angle.to_radians();
    let (dir_x, dir_y) = (rad.cos(), rad.sin());
    let ray = Segment::new(origin, origin.from_polar(angle, ray_length));

    let mut nearest: Option<(f32, Point)> = None;
    for segment in segments {
        let hit = match intersect(&ray, segment) {
            Some(p) => {
                // The fudge margin can report a wall just behind the origin
                let along = (p.x - origin.x) * dir_x + (p.y - origin.y) * dir_y;
                if along < -ON_SEGMENT_TOLERANCE {
                    continue;
                }
                // Crossing the line of a wall the origin stands on: the ray
                // leaves the wall, so only rays running along it stop here
                if along <= ON_SEGMENT_TOLERANCE && segment.contains_point(origin, ON_SEGMENT_TOLERANCE) {
                    continue;
                }
                p
            }
            // Collinear with a segment the origin stands on
            None if segment.contains_point(origin, ON_SEGMENT_TOLERANCE) => origin,
            None => continue,
        };

        let dist = origin.distance_squared(hit);
        if nearest.map_or(true, |(best, _)| dist < best) {
            nearest = Some((dist, hit));
        }
    }

    match nearest {
        Some((_, point)) => RayHit {
            angle,
            point,
            blocked: true,
        },
        None => RayHit {
            angle,
            point: ray.p2,
            blocked: false,
        },
    }
}
