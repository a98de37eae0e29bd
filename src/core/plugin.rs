//! CorePlugin wires the simulation clock and the repeating task scheduler.
use bevy::prelude::*;
use std::time::Duration;

use crate::core::scheduler::RepeatingScheduler;

const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;
const MAX_TIME_SCALE: f32 = 100.0;

/// Tracks scaled simulation time derived from real frame deltas.
#[derive(Resource, Debug)]
pub struct SimulationClock {
    time_scale: f32,
    last_scaled_delta: Duration,
}

impl SimulationClock {
    /// Creates a new clock with the provided time-scale multiplier.
    ///
    /// The scale is clamped to a finite range; non-finite values use the default.
    pub fn new(time_scale: f32) -> Self {
        let time_scale = if time_scale.is_finite() {
            time_scale.clamp(MIN_TIME_SCALE, MAX_TIME_SCALE)
        } else {
            DEFAULT_TIME_SCALE
        };
        Self {
            time_scale,
            last_scaled_delta: Duration::ZERO,
        }
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Last scaled delta; every timed system in the game reads this instead of `Time`.
    pub fn last_scaled_delta(&self) -> Duration {
        self.last_scaled_delta
    }

    /// Applies a real delta to the clock, storing the scaled duration.
    pub fn tick(&mut self, real_delta: Duration) {
        self.last_scaled_delta = real_delta.mul_f32(self.time_scale);
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

/// System set for the clock and scheduler; gameplay systems run after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoreTimingSet;

/// Registers simulation timing systems and resources.
#[derive(Debug, Clone, Copy)]
pub struct CorePlugin {
    time_scale: f32,
}

impl CorePlugin {
    pub const fn with_time_scale(time_scale: f32) -> Self {
        Self { time_scale }
    }
}

impl Default for CorePlugin {
    fn default() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE,
        }
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimulationClock::new(self.time_scale))
            .init_resource::<RepeatingScheduler>()
            .add_systems(Startup, log_startup_time_scale)
            .add_systems(
                Update,
                (update_simulation_clock, advance_repeating_tasks)
                    .chain()
                    .in_set(CoreTimingSet),
            );
    }
}

fn update_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

/// Advances every scheduled task by the scaled delta, collecting the ones due this frame.
pub fn advance_repeating_tasks(
    clock: Res<SimulationClock>,
    mut scheduler: ResMut<RepeatingScheduler>,
) {
    scheduler.advance(clock.last_scaled_delta());
}

fn log_startup_time_scale(clock: Res<SimulationClock>) {
    info!(
        "CorePlugin initialised with time scale: {:.3}",
        clock.time_scale()
    );
}
