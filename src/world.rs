use std::{ops::Range, time::Instant};

use glam::Vec2;
use log::{debug, warn};

use crate::{
    collision::{broadphase::SpatialGrid, narrowphase::NarrowPhase},
    config::{WorldConfig, DEFAULT_BROADPHASE_CELL_SIZE},
    core::{rigidbody::Body, types::Aabb},
    dynamics::{
        gravity::MutualGravity,
        integrator::Integrator,
        solver::{pair_mut, ImpulseSolver},
    },
    error::{PhysicsError, Result},
    utils::{
        logging::{warn_if_frame_budget_exceeded, ScopedTimer},
        math::lerp,
        profiling::{PhaseTimer, StepProfiler},
    },
};

/// Hook invoked once at the end of every step with that step's `dt`.
pub type StepCallback = Box<dyn FnMut(f32) + Send + Sync>;

/// Central simulation container: owns the bodies and runs the per-step pipeline.
///
/// Bodies are addressed by their position in insertion order. Contacts are resolved in
/// place, so the order bodies were added in is part of the simulation result.
pub struct World {
    pub gravity: Vec2,
    /// Fraction of linear and angular velocity kept after each step, in `(0, 1]`.
    pub damping: f32,
    pub collisions_enabled: bool,
    pub mutual_gravity_enabled: bool,
    /// Movable bodies also act as gravity sources, not only static ones.
    pub movable_mutual_gravity_enabled: bool,
    pub cell_size: f32,
    pub mutual_gravity: MutualGravity,
    pub solver: ImpulseSolver,
    pub bounds: Option<Aabb>,
    bodies: Vec<Body>,
    config: WorldConfig,
    max_acceleration: f32,
    custom_callback: Option<StepCallback>,
    last_profile: StepProfiler,
    step_count: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::from_valid_config(WorldConfig::default())
    }
}

impl World {
    pub fn new(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        debug!("creating world with {config:?}");
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: WorldConfig) -> Self {
        Self {
            gravity: config.gravity,
            damping: config.damping,
            collisions_enabled: config.collisions_enabled,
            mutual_gravity_enabled: config.mutual_gravity_enabled,
            movable_mutual_gravity_enabled: config.movable_mutual_gravity_enabled,
            cell_size: config.cell_size,
            mutual_gravity: config.mutual_gravity,
            solver: config.solver,
            bounds: config.bounds,
            bodies: Vec::new(),
            config,
            max_acceleration: 0.0,
            custom_callback: None,
            last_profile: StepProfiler::default(),
            step_count: 0,
        }
    }

    fn apply_config(&mut self) {
        let config = &self.config;
        self.gravity = config.gravity;
        self.damping = config.damping;
        self.collisions_enabled = config.collisions_enabled;
        self.mutual_gravity_enabled = config.mutual_gravity_enabled;
        self.movable_mutual_gravity_enabled = config.movable_mutual_gravity_enabled;
        self.cell_size = config.cell_size;
        self.mutual_gravity = config.mutual_gravity;
        self.solver = config.solver;
        self.bounds = config.bounds;
    }

    /// Configuration the world was created with; [`World::clear`] returns to it.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Appends a body and returns its index.
    pub fn add(&mut self, body: Body) -> usize {
        let index = self.bodies.len();
        self.bodies.push(body);
        index
    }

    /// Appends several bodies in order and returns their index range.
    pub fn extend<I>(&mut self, bodies: I) -> Range<usize>
    where
        I: IntoIterator<Item = Body>,
    {
        let start = self.bodies.len();
        self.bodies.extend(bodies);
        debug!("added {} bodies", self.bodies.len() - start);
        start..self.bodies.len()
    }

    /// Removes the body at `index`, shifting later bodies down by one.
    pub fn remove(&mut self, index: usize) -> Result<Body> {
        if index >= self.bodies.len() {
            return Err(PhysicsError::BodyIndexOutOfRange {
                index,
                len: self.bodies.len(),
            });
        }
        debug!("removing body {index}");
        Ok(self.bodies.remove(index))
    }

    /// Drops every body and resets flags, gravity, callback, and diagnostics.
    pub fn clear(&mut self) {
        debug!("clearing world with {} bodies", self.bodies.len());
        self.bodies.clear();
        self.apply_config();
        self.custom_callback = None;
        self.max_acceleration = 0.0;
        self.last_profile.reset();
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable access to body state. The collection itself only changes through
    /// [`World::add`], [`World::remove`], and [`World::clear`].
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn body_mut(&mut self, index: usize) -> Option<&mut Body> {
        self.bodies.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn set_custom_callback<F>(&mut self, callback: F)
    where
        F: FnMut(f32) + Send + Sync + 'static,
    {
        self.custom_callback = Some(Box::new(callback));
    }

    pub fn clear_custom_callback(&mut self) {
        self.custom_callback = None;
    }

    pub fn has_custom_callback(&self) -> bool {
        self.custom_callback.is_some()
    }

    /// Exponentially smoothed largest body acceleration, for renderer color scaling.
    pub fn max_acceleration(&self) -> f32 {
        self.max_acceleration
    }

    pub fn last_profile(&self) -> &StepProfiler {
        &self.last_profile
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Broad phase over the current body positions, as `step` builds it.
    pub fn build_grid(&self) -> SpatialGrid {
        let mut grid = SpatialGrid::new(self.effective_cell_size());
        grid.rebuild(&self.bodies);
        grid
    }

    fn effective_cell_size(&self) -> f32 {
        if self.cell_size.is_finite() && self.cell_size > 0.0 {
            self.cell_size
        } else {
            warn!(
                "cell size {} is not positive; using {DEFAULT_BROADPHASE_CELL_SIZE}",
                self.cell_size
            );
            DEFAULT_BROADPHASE_CELL_SIZE
        }
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Order: broad phase, mutual gravity, integration, collisions, callback.
    pub fn step(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            warn!("ignoring step with dt = {dt}");
            return;
        }

        let _timer = ScopedTimer::new("world::step");
        let started = Instant::now();
        let mut profile = StepProfiler {
            body_count: self.bodies.len(),
            ..StepProfiler::default()
        };

        let grid = {
            let _phase = PhaseTimer::new(&mut profile.grid_time);
            self.build_grid()
        };
        profile.occupied_cells = grid.occupied_cells();

        if self.mutual_gravity_enabled {
            let _phase = PhaseTimer::new(&mut profile.gravity_time);
            profile.gravity_sources = self.mutual_gravity.accumulate(
                &mut self.bodies,
                self.movable_mutual_gravity_enabled,
                self.bounds,
            );
        }

        {
            let _phase = PhaseTimer::new(&mut profile.integration_time);
            let observed = Integrator::new(self.damping).step(&mut self.bodies, self.gravity, dt);
            self.max_acceleration = lerp(
                self.max_acceleration,
                observed,
                self.config.acceleration_smoothing,
            );
        }

        if self.collisions_enabled {
            let _phase = PhaseTimer::new(&mut profile.collision_time);
            for (i, j) in grid.potential_pairs() {
                let Some((a, b)) = pair_mut(&mut self.bodies, i, j) else {
                    continue;
                };
                if a.is_static() && b.is_static() {
                    continue;
                }
                profile.pairs_tested += 1;
                if let Some(manifold) = NarrowPhase::collide(a, b) {
                    self.solver.resolve(a, b, &manifold);
                    profile.contacts_resolved += 1;
                }
            }
        }

        if let Some(callback) = self.custom_callback.as_mut() {
            callback(dt);
        }

        profile.total_step_time = started.elapsed();
        if let Some(budget) = self.config.frame_budget_ms {
            warn_if_frame_budget_exceeded(profile.total_step_time, budget);
        }
        profile.report();
        self.last_profile = profile;
        self.step_count += 1;
    }
}
