use std::time::{Duration, Instant};

/// Timing and counters for the most recent [`crate::World::step`].
#[derive(Debug, Default, Clone, Copy)]
pub struct StepProfiler {
    pub grid_time: Duration,
    pub gravity_time: Duration,
    pub integration_time: Duration,
    pub collision_time: Duration,
    pub total_step_time: Duration,

    pub body_count: usize,
    pub occupied_cells: usize,
    pub pairs_tested: usize,
    pub contacts_resolved: usize,
    pub gravity_sources: usize,
}

impl StepProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Logs the profile at `debug` level.
    pub fn report(&self) {
        let total_us = self.total_step_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        log::debug!(
            "step: {} bodies, {} cells, {} pairs tested, {} contacts, {} gravity sources",
            self.body_count,
            self.occupied_cells,
            self.pairs_tested,
            self.contacts_resolved,
            self.gravity_sources
        );
        for (label, phase) in [
            ("grid", self.grid_time),
            ("gravity", self.gravity_time),
            ("integrate", self.integration_time),
            ("collide", self.collision_time),
        ] {
            log::debug!(
                "  {label:<10} {:.3} ms ({:.1}%)",
                phase.as_secs_f32() * 1000.0,
                (phase.as_micros() as f32 / total_us) * 100.0
            );
        }
    }
}

/// Adds the lifetime of the guard to `output`.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}
