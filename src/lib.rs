pub mod agent;
pub mod cone;
pub mod config;
pub mod edges;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod level;
pub mod map;
pub mod visibility;

pub use agent::Agent;
pub use cone::Cone;
pub use edges::{polygonize, Edge, EdgeSet, EdgeSide};
pub use geometry::{angle_within_arc, intersect, normalize_angle, Point, Segment};
pub use grid::{Grid, Tile};
pub use map::SightMap;
pub use visibility::{calculate_visibility, VisibilityFan, VisibilityTriangle};
