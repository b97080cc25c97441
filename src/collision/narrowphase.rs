use glam::Vec2;

use crate::{
    collision::contact::CollisionManifold,
    core::{rigidbody::Body, shape::Shape},
};

/// Axis used whenever a direction degenerates to zero length.
pub const FALLBACK_AXIS: Vec2 = Vec2::Y;

/// Exact circle-circle overlap test.
pub struct CircleCircle;

impl CircleCircle {
    pub fn intersect(
        center_a: Vec2,
        radius_a: f32,
        center_b: Vec2,
        radius_b: f32,
    ) -> Option<CollisionManifold> {
        let delta = center_b - center_a;
        let radii = radius_a + radius_b;
        let dist_sq = delta.length_squared();
        if dist_sq >= radii * radii {
            return None;
        }

        let dist = dist_sq.sqrt();
        let normal = if dist > f32::EPSILON {
            delta / dist
        } else {
            FALLBACK_AXIS
        };

        Some(CollisionManifold::new(
            normal,
            radii - dist,
            center_a + normal * radius_a,
        ))
    }
}

/// World-space view of a body used by the separating axis test.
enum ConvexProxy {
    Circle { center: Vec2, radius: f32 },
    Polygon { vertices: Vec<Vec2> },
}

impl ConvexProxy {
    fn from_body(body: &Body) -> Self {
        match body.shape() {
            Shape::Circle { radius } => ConvexProxy::Circle {
                center: body.position,
                radius: *radius,
            },
            Shape::Polygon { .. } => ConvexProxy::Polygon {
                vertices: body.world_vertices().unwrap_or_default(),
            },
        }
    }

    fn project(&self, axis: Vec2) -> (f32, f32) {
        match self {
            ConvexProxy::Circle { center, radius } => {
                let c = center.dot(axis);
                (c - radius, c + radius)
            }
            ConvexProxy::Polygon { vertices } => vertices.iter().fold(
                (f32::INFINITY, f32::NEG_INFINITY),
                |(min, max), v| {
                    let p = v.dot(axis);
                    (min.min(p), max.max(p))
                },
            ),
        }
    }

    /// Farthest point along `direction`.
    fn support(&self, direction: Vec2) -> Vec2 {
        match self {
            ConvexProxy::Circle { center, radius } => {
                *center + direction.normalize_or(FALLBACK_AXIS) * *radius
            }
            ConvexProxy::Polygon { vertices } => {
                let mut best_point = Vec2::ZERO;
                let mut best_dot = f32::NEG_INFINITY;
                for v in vertices {
                    let dot = v.dot(direction);
                    if dot > best_dot {
                        best_dot = dot;
                        best_point = *v;
                    }
                }
                best_point
            }
        }
    }

    fn push_edge_normals(&self, axes: &mut Vec<Vec2>) {
        if let ConvexProxy::Polygon { vertices } = self {
            for (i, v) in vertices.iter().enumerate() {
                let next = vertices[(i + 1) % vertices.len()];
                axes.push((next - *v).perp().normalize_or(FALLBACK_AXIS));
            }
        }
    }

    fn closest_boundary_point(vertices: &[Vec2], point: Vec2) -> Vec2 {
        let mut best = point;
        let mut best_dist_sq = f32::INFINITY;
        for (i, a) in vertices.iter().enumerate() {
            let b = vertices[(i + 1) % vertices.len()];
            let edge = b - *a;
            let len_sq = edge.length_squared();
            let t = if len_sq > f32::EPSILON {
                ((point - *a).dot(edge) / len_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let candidate = *a + edge * t;
            let dist_sq = candidate.distance_squared(point);
            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best = candidate;
            }
        }
        best
    }
}

/// Separating axis theorem for polygon-polygon and circle-polygon pairs.
pub struct SATAlgorithm;

impl SATAlgorithm {
    pub fn intersect(body_a: &Body, body_b: &Body) -> Option<CollisionManifold> {
        let proxy_a = ConvexProxy::from_body(body_a);
        let proxy_b = ConvexProxy::from_body(body_b);

        let mut axes = Vec::new();
        proxy_a.push_edge_normals(&mut axes);
        proxy_b.push_edge_normals(&mut axes);

        match (&proxy_a, &proxy_b) {
            (ConvexProxy::Circle { center, .. }, ConvexProxy::Polygon { vertices })
            | (ConvexProxy::Polygon { vertices }, ConvexProxy::Circle { center, .. }) => {
                let closest = ConvexProxy::closest_boundary_point(vertices, *center);
                axes.push((closest - *center).normalize_or(FALLBACK_AXIS));
            }
            _ => {}
        }

        let mut min_overlap = f32::INFINITY;
        let mut min_axis = FALLBACK_AXIS;

        for axis in axes {
            let (min_a, max_a) = proxy_a.project(axis);
            let (min_b, max_b) = proxy_b.project(axis);
            let overlap = max_a.min(max_b) - min_a.max(min_b);

            if overlap <= 0.0 {
                return None;
            }

            if overlap < min_overlap {
                min_overlap = overlap;
                min_axis = axis;
            }
        }

        if !min_overlap.is_finite() {
            return None;
        }

        let normal = if min_axis.dot(body_b.position - body_a.position) < 0.0 {
            -min_axis
        } else {
            min_axis
        };

        let contact_point = match (&proxy_a, &proxy_b) {
            (ConvexProxy::Circle { .. }, _) => proxy_a.support(normal),
            (_, ConvexProxy::Circle { .. }) => proxy_b.support(-normal),
            _ => (proxy_a.support(normal) + proxy_b.support(-normal)) * 0.5,
        };

        Some(CollisionManifold::new(normal, min_overlap, contact_point))
    }
}

/// Narrow phase dispatcher choosing the exact test for a body pair.
pub struct NarrowPhase;

impl NarrowPhase {
    pub fn collide(body_a: &Body, body_b: &Body) -> Option<CollisionManifold> {
        match (body_a.shape(), body_b.shape()) {
            (Shape::Circle { radius: radius_a }, Shape::Circle { radius: radius_b }) => {
                CircleCircle::intersect(body_a.position, *radius_a, body_b.position, *radius_b)
            }
            _ => SATAlgorithm::intersect(body_a, body_b),
        }
    }
}
