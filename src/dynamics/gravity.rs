//! Approximate mutual gravity with a Barnes–Hut quadtree.
//!
//! The tree is rebuilt from scratch every step. Nodes live in a flat arena and refer to
//! their four children by index, so a whole tree is dropped with a single `Vec`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{
    config::{DEFAULT_GRAVITATIONAL_CONSTANT, DEFAULT_SOFTENING, DEFAULT_THETA},
    core::{rigidbody::Body, types::Aabb},
    error::{PhysicsError, Result},
};

/// Subdivision stops here; deeper bodies share a leaf.
pub const MAX_DEPTH: u32 = 32;

/// Parameters of the Barnes–Hut force evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutualGravity {
    /// Opening angle. `0` degenerates to exact pairwise summation.
    pub theta: f32,
    pub gravitational_constant: f32,
    /// Added to every squared distance.
    pub softening: f32,
}

impl Default for MutualGravity {
    fn default() -> Self {
        Self {
            theta: DEFAULT_THETA,
            gravitational_constant: DEFAULT_GRAVITATIONAL_CONSTANT,
            softening: DEFAULT_SOFTENING,
        }
    }
}

impl MutualGravity {
    pub fn validate(&self) -> Result<()> {
        if !(self.theta.is_finite() && self.theta >= 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "theta must be non-negative, got {}",
                self.theta
            )));
        }
        if !self.gravitational_constant.is_finite() {
            return Err(PhysicsError::InvalidConfig(
                "gravitational constant must be finite".into(),
            ));
        }
        if !(self.softening.is_finite() && self.softening >= 0.0) {
            return Err(PhysicsError::InvalidConfig(format!(
                "softening must be non-negative, got {}",
                self.softening
            )));
        }
        Ok(())
    }

    /// Builds a tree over the gravity sources and adds the resulting forces to every
    /// movable body with mass. Returns the number of bodies inserted as sources.
    ///
    /// Static bodies with mass are always sources and go in first; movable bodies join
    /// them only when `movable_sources` is set.
    pub fn accumulate(
        &self,
        bodies: &mut [Body],
        movable_sources: bool,
        bounds: Option<Aabb>,
    ) -> usize {
        let sources: Vec<usize> = bodies
            .iter()
            .enumerate()
            .filter(|(_, body)| body.is_static() && body.mass() > 0.0)
            .chain(
                bodies
                    .iter()
                    .enumerate()
                    .filter(|(_, body)| movable_sources && !body.is_static()),
            )
            .map(|(index, _)| index)
            .collect();

        if sources.is_empty() {
            return 0;
        }

        let root_bounds = bounds.unwrap_or_else(|| {
            let mut fitted = Aabb::empty();
            for &index in &sources {
                fitted.extend(bodies[index].position);
            }
            fitted
        });
        if !root_bounds.is_valid() {
            log::warn!("mutual gravity skipped: source bounds are not finite");
            return 0;
        }

        let mut tree = QuadTree::from_bounds(&root_bounds);
        let mut inserted = 0;
        for &index in &sources {
            let body = &bodies[index];
            if tree.insert(index, body.position, body.mass()) {
                inserted += 1;
            }
        }
        if inserted < sources.len() {
            log::trace!(
                "{} gravity sources fell outside the tree bounds",
                sources.len() - inserted
            );
        }

        for (index, body) in bodies.iter_mut().enumerate() {
            if body.is_static() {
                continue;
            }
            let force = tree.compute_force(index, body.position, body.mass(), self);
            body.apply_force(force);
        }

        inserted
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    body: usize,
    position: Vec2,
    mass: f32,
}

/// One square region of the tree.
#[derive(Debug, Clone)]
pub struct QuadNode {
    pub center: Vec2,
    pub half_size: f32,
    pub mass: f32,
    pub center_of_mass: Vec2,
    count: usize,
    depth: u32,
    /// Index of the first of four consecutive children.
    first_child: Option<usize>,
    /// Entries held directly by a leaf: one, or several once `MAX_DEPTH` is reached.
    occupants: Vec<usize>,
}

impl QuadNode {
    fn new(center: Vec2, half_size: f32, depth: u32) -> Self {
        Self {
            center,
            half_size,
            mass: 0.0,
            center_of_mass: Vec2::ZERO,
            count: 0,
            depth,
            first_child: None,
            occupants: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of bodies inserted at or below this node.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn size(&self) -> f32 {
        self.half_size * 2.0
    }

    fn contains(&self, point: Vec2) -> bool {
        (point.x - self.center.x).abs() <= self.half_size
            && (point.y - self.center.y).abs() <= self.half_size
    }

    fn quadrant(&self, point: Vec2) -> usize {
        usize::from(point.x >= self.center.x) + 2 * usize::from(point.y >= self.center.y)
    }

    fn accumulate(&mut self, position: Vec2, mass: f32) {
        let total = self.mass + mass;
        if total > 0.0 {
            self.center_of_mass = (self.center_of_mass * self.mass + position * mass) / total;
        }
        self.mass = total;
        self.count += 1;
    }
}

/// Barnes–Hut quadtree over point masses.
#[derive(Debug, Clone)]
pub struct QuadTree {
    nodes: Vec<QuadNode>,
    entries: Vec<Entry>,
}

impl QuadTree {
    pub fn new(center: Vec2, half_size: f32) -> Self {
        Self {
            nodes: vec![QuadNode::new(center, half_size, 0)],
            entries: Vec::new(),
        }
    }

    /// Smallest square covering `bounds`, padded slightly so edge bodies stay inside.
    pub fn from_bounds(bounds: &Aabb) -> Self {
        let half = bounds.half_extents().max_element();
        let half_size = (half * 1.01).max(1.0);
        Self::new(bounds.center(), half_size)
    }

    pub fn root(&self) -> &QuadNode {
        &self.nodes[0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a point mass. Returns `false` if `position` lies outside the root region.
    pub fn insert(&mut self, body: usize, position: Vec2, mass: f32) -> bool {
        if !position.is_finite() || !self.nodes[0].contains(position) {
            return false;
        }
        let entry = self.entries.len();
        self.entries.push(Entry {
            body,
            position,
            mass,
        });
        self.insert_entry(0, entry);
        true
    }

    fn insert_entry(&mut self, start: usize, entry: usize) {
        let Entry { position, mass, .. } = self.entries[entry];
        let mut node = start;

        loop {
            self.nodes[node].accumulate(position, mass);

            if let Some(first) = self.nodes[node].first_child {
                node = first + self.nodes[node].quadrant(position);
                continue;
            }

            let leaf = &mut self.nodes[node];
            if leaf.occupants.is_empty() || leaf.depth >= MAX_DEPTH {
                leaf.occupants.push(entry);
                return;
            }

            let first = self.subdivide(node);
            let displaced = std::mem::take(&mut self.nodes[node].occupants);
            for old in displaced {
                let child = first + self.nodes[node].quadrant(self.entries[old].position);
                self.insert_entry(child, old);
            }
            node = first + self.nodes[node].quadrant(position);
        }
    }

    fn subdivide(&mut self, node: usize) -> usize {
        let parent = &self.nodes[node];
        let quarter = parent.half_size * 0.5;
        let depth = parent.depth + 1;
        let center = parent.center;

        let first = self.nodes.len();
        // Same order as `QuadNode::quadrant`: x bit first, then y bit.
        for offset in [
            Vec2::new(-quarter, -quarter),
            Vec2::new(quarter, -quarter),
            Vec2::new(-quarter, quarter),
            Vec2::new(quarter, quarter),
        ] {
            self.nodes.push(QuadNode::new(center + offset, quarter, depth));
        }
        self.nodes[node].first_child = Some(first);
        first
    }

    /// Approximate gravitational force on `target` (a body index) at `position`.
    ///
    /// The target's own mass never attracts itself.
    pub fn compute_force(
        &self,
        target: usize,
        position: Vec2,
        mass: f32,
        params: &MutualGravity,
    ) -> Vec2 {
        let mut force = Vec2::ZERO;
        self.force_from(0, target, position, mass, params, &mut force);
        force
    }

    fn force_from(
        &self,
        node_index: usize,
        target: usize,
        position: Vec2,
        mass: f32,
        params: &MutualGravity,
        force: &mut Vec2,
    ) {
        let node = &self.nodes[node_index];
        if node.is_empty() {
            return;
        }

        let (node_mass, center_of_mass) = if node.is_leaf() {
            match self.without_target(node, target) {
                Some(aggregate) => aggregate,
                None => return,
            }
        } else {
            (node.mass, node.center_of_mass)
        };

        let delta = center_of_mass - position;
        let dist_sq = delta.length_squared() + params.softening;
        let dist = dist_sq.sqrt();
        if dist <= f32::EPSILON {
            return;
        }

        if node.is_leaf() || node.size() / dist < params.theta {
            let magnitude = params.gravitational_constant * mass * node_mass / dist_sq;
            *force += delta * (magnitude / dist);
            return;
        }

        if let Some(first) = node.first_child {
            for child in first..first + 4 {
                self.force_from(child, target, position, mass, params, force);
            }
        }
    }

    /// Leaf mass and center of mass with `target` removed; `None` if nothing remains.
    fn without_target(&self, leaf: &QuadNode, target: usize) -> Option<(f32, Vec2)> {
        let own: Vec<&Entry> = leaf
            .occupants
            .iter()
            .map(|&entry| &self.entries[entry])
            .filter(|entry| entry.body == target)
            .collect();
        if own.is_empty() {
            return Some((leaf.mass, leaf.center_of_mass));
        }
        if own.len() == leaf.occupants.len() {
            return None;
        }

        let mut mass = leaf.mass;
        let mut weighted = leaf.center_of_mass * leaf.mass;
        for entry in own {
            mass -= entry.mass;
            weighted -= entry.position * entry.mass;
        }
        if mass <= 0.0 {
            return None;
        }
        Some((mass, weighted / mass))
    }
}

/// Exact softened pairwise force from `sources` (position, mass) on a point mass.
pub fn pairwise_force(
    sources: &[(Vec2, f32)],
    position: Vec2,
    mass: f32,
    params: &MutualGravity,
) -> Vec2 {
    let mut force = Vec2::ZERO;
    for &(source, source_mass) in sources {
        let delta = source - position;
        let dist_sq = delta.length_squared() + params.softening;
        let dist = dist_sq.sqrt();
        if dist <= f32::EPSILON {
            continue;
        }
        let magnitude = params.gravitational_constant * mass * source_mass / dist_sq;
        force += delta * (magnitude / dist);
    }
    force
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(theta: f32) -> MutualGravity {
        MutualGravity {
            theta,
            gravitational_constant: 1.0,
            softening: 0.0,
        }
    }

    #[test]
    fn aggregates_mass_and_center_of_mass() {
        let mut tree = QuadTree::new(Vec2::ZERO, 100.0);
        assert!(tree.insert(0, Vec2::new(-50.0, 0.0), 1.0));
        assert!(tree.insert(1, Vec2::new(50.0, 0.0), 3.0));

        let root = tree.root();
        assert_relative_eq!(root.mass, 4.0);
        assert_relative_eq!(root.center_of_mass.x, 25.0);
        assert_eq!(root.count(), 2);
        assert!(!root.is_leaf());
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn rejects_points_outside_the_root() {
        let mut tree = QuadTree::new(Vec2::ZERO, 10.0);
        assert!(!tree.insert(0, Vec2::new(11.0, 0.0), 1.0));
        assert!(!tree.insert(0, Vec2::new(f32::NAN, 0.0), 1.0));
        assert!(tree.is_empty());
        assert!(tree.root().is_empty());
    }

    #[test]
    fn single_body_feels_no_force_from_itself() {
        let mut tree = QuadTree::new(Vec2::ZERO, 10.0);
        tree.insert(7, Vec2::new(1.0, 1.0), 5.0);
        assert_eq!(tree.compute_force(7, Vec2::new(1.0, 1.0), 5.0, &params(0.5)), Vec2::ZERO);
    }

    #[test]
    fn two_bodies_attract_each_other() {
        let mut tree = QuadTree::new(Vec2::ZERO, 100.0);
        tree.insert(0, Vec2::new(-10.0, 0.0), 2.0);
        tree.insert(1, Vec2::new(10.0, 0.0), 3.0);

        let on_first = tree.compute_force(0, Vec2::new(-10.0, 0.0), 2.0, &params(0.5));
        let on_second = tree.compute_force(1, Vec2::new(10.0, 0.0), 3.0, &params(0.5));
        assert_relative_eq!(on_first.x, 6.0 / 400.0, epsilon = 1e-7);
        assert_relative_eq!(on_second.x, -6.0 / 400.0, epsilon = 1e-7);
    }

    #[test]
    fn coincident_bodies_share_a_capped_leaf() {
        let mut tree = QuadTree::new(Vec2::ZERO, 10.0);
        tree.insert(0, Vec2::ONE, 1.0);
        tree.insert(1, Vec2::ONE, 2.0);
        tree.insert(2, Vec2::new(-5.0, -5.0), 1.0);

        assert_eq!(tree.root().count(), 3);
        assert!(tree.node_count() <= 1 + 4 * MAX_DEPTH as usize);

        let softened = MutualGravity {
            softening: 1.0,
            ..params(0.0)
        };
        // Body 0 feels body 1 (same spot) only through softening, plus body 2.
        let force = tree.compute_force(0, Vec2::ONE, 1.0, &softened);
        let expected = pairwise_force(
            &[(Vec2::ONE, 2.0), (Vec2::new(-5.0, -5.0), 1.0)],
            Vec2::ONE,
            1.0,
            &softened,
        );
        assert_relative_eq!(force.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(force.y, expected.y, epsilon = 1e-5);
    }

    #[test]
    fn softening_keeps_near_coincident_force_finite() {
        let mut tree = QuadTree::new(Vec2::ZERO, 10.0);
        tree.insert(0, Vec2::ZERO, 1.0e6);
        let force = tree.compute_force(
            1,
            Vec2::new(1.0e-6, 0.0),
            1.0,
            &MutualGravity::default(),
        );
        assert!(force.is_finite());
    }
}
