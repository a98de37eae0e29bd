//! Repeating task scheduler with explicit, synchronously cancellable handles.
use std::{collections::BTreeMap, fmt, time::Duration};

use bevy::prelude::*;

/// Handle returned by [`RepeatingScheduler::schedule`].
///
/// Handles are issued in increasing order, so ordering handles orders tasks by
/// the moment they were scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Fixed-interval repeating timers driven by the simulation clock.
///
/// Each call to [`advance`](Self::advance) records the tasks that came due
/// during that step. A task fires at most once per step, however large the
/// step is. Cancelling a task also removes it from the current due list, so a
/// cancelled task is never reported again.
#[derive(Resource, Debug, Default)]
pub struct RepeatingScheduler {
    next: u64,
    tasks: BTreeMap<TaskHandle, Timer>,
    due: Vec<TaskHandle>,
}

impl RepeatingScheduler {
    /// Schedules a task that comes due every `interval`, first after one full interval.
    pub fn schedule(&mut self, interval: Duration) -> TaskHandle {
        let handle = TaskHandle(self.next);
        self.next += 1;
        self.tasks
            .insert(handle, Timer::new(interval, TimerMode::Repeating));
        handle
    }

    /// Cancels a task. Returns `false` when the handle was not scheduled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        self.due.retain(|due| *due != handle);
        self.tasks.remove(&handle).is_some()
    }

    /// Number of live tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Ticks every timer and replaces the due list with the tasks that finished.
    pub fn advance(&mut self, delta: Duration) {
        self.due.clear();
        for (handle, timer) in self.tasks.iter_mut() {
            if timer.tick(delta).just_finished() {
                self.due.push(*handle);
            }
        }
    }

    /// Tasks that came due during the last [`advance`](Self::advance), in scheduling order.
    pub fn due(&self) -> &[TaskHandle] {
        &self.due
    }

    pub fn is_due(&self, handle: TaskHandle) -> bool {
        self.due.contains(&handle)
    }
}
