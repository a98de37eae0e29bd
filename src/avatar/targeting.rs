//! Targeting controller: periodic view-direction probe, hit resolution and prompt hysteresis.
use std::{collections::HashMap, time::Duration};

use bevy::prelude::*;

use crate::{
    core::scheduler::{RepeatingScheduler, TaskHandle},
    world::components::{ObjectId, ProbeCategory, TargetCapability},
};

use super::{errors::InteractionError, state::AvatarState};

const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_PROBE_DISTANCE: f32 = 150.0;

/// Where the avatar is looking from, and which way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPose {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl ViewPose {
    pub fn from_global(eye: &GlobalTransform) -> Self {
        Self {
            origin: eye.translation(),
            direction: eye.forward().as_vec3(),
        }
    }
}

/// A single segment query against the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRequest {
    pub origin: Vec3,
    /// Unit length, or zero when the pose had no usable direction.
    pub direction: Vec3,
    pub max_distance: f32,
    pub category: ProbeCategory,
    /// Object that must never be reported as a hit (the probing avatar).
    pub ignore: Option<ObjectId>,
}

impl ProbeRequest {
    pub fn end(&self) -> Vec3 {
        self.origin + self.direction * self.max_distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    pub object: ObjectId,
    pub distance: f32,
}

/// World service answering "what is the nearest blocking object along this segment".
pub trait RayProbe {
    fn probe(&self, request: &ProbeRequest) -> Option<ProbeHit>;
}

/// What the world knows about a targetable object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub name: String,
    pub capability: TargetCapability,
}

/// Resolves probe hits into targets. `None` means the object is not targetable.
pub trait TargetRegistry {
    fn describe(&self, object: ObjectId) -> Option<TargetDescriptor>;
}

/// Per-frame snapshot of the targetable objects in the world.
#[derive(Debug, Default)]
pub struct TargetDirectory {
    entries: HashMap<ObjectId, TargetDescriptor>,
}

impl FromIterator<(ObjectId, TargetDescriptor)> for TargetDirectory {
    fn from_iter<T: IntoIterator<Item = (ObjectId, TargetDescriptor)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl TargetRegistry for TargetDirectory {
    fn describe(&self, object: ObjectId) -> Option<TargetDescriptor> {
        self.entries.get(&object).cloned()
    }
}

/// Presentation collaborator receiving prompt updates.
pub trait PromptSink {
    fn show_prompt(&mut self, name: &str, interactable: bool);
    fn hide_prompt(&mut self);
}

/// Identity of the current target. Never owns the object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRef {
    pub object: ObjectId,
    pub name: String,
    pub capability: TargetCapability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptState {
    Hidden,
    Shown { object: ObjectId, interactable: bool },
}

/// Result of one probe tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Inactive,
    Miss,
    /// Something blocked the ray but it is not a target.
    Blocked(ObjectId),
    Targeted(ObjectId),
}

/// The segment covered by the most recent probe, kept for debug drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeTrace {
    pub start: Vec3,
    pub end: Vec3,
    pub hit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSettings {
    pub interval: Duration,
    pub max_distance: f32,
    pub category: ProbeCategory,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_PROBE_INTERVAL,
            max_distance: DEFAULT_PROBE_DISTANCE,
            category: ProbeCategory::WorldDynamic,
        }
    }
}

/// Sole owner of the avatar's current target and probe task.
#[derive(Component, Debug)]
pub struct TargetingController {
    settings: ProbeSettings,
    task: Option<TaskHandle>,
    current: Option<TargetRef>,
    prompt: PromptState,
    last_trace: Option<ProbeTrace>,
}

impl TargetingController {
    pub fn new(settings: ProbeSettings) -> Self {
        Self {
            settings,
            task: None,
            current: None,
            prompt: PromptState::Hidden,
            last_trace: None,
        }
    }

    pub fn probe_task(&self) -> Option<TaskHandle> {
        self.task
    }

    pub fn current_target(&self) -> Option<&TargetRef> {
        self.current.as_ref()
    }

    #[cfg_attr(not(feature = "probe_debug"), allow(dead_code))]
    pub fn last_trace(&self) -> Option<ProbeTrace> {
        self.last_trace
    }

    /// Starts the repeating probe. Returns `Ok(false)` when targeting was already active.
    pub fn start_targeting(
        &mut self,
        state: Option<&mut AvatarState>,
        scheduler: &mut RepeatingScheduler,
    ) -> Result<bool, InteractionError> {
        let state = state.ok_or(InteractionError::MissingAvatarState)?;
        if state.is_targeting_active() {
            return Ok(false);
        }

        if let Some(stale) = self.task.take() {
            scheduler.cancel(stale);
        }
        self.task = Some(scheduler.schedule(self.settings.interval));
        state.set_targeting_active(true);
        Ok(true)
    }

    /// Cancels the probe and hides the prompt. Returns `Ok(false)` when targeting was idle.
    ///
    /// The probe task is cancelled before this returns, so it cannot fire again.
    pub fn stop_targeting(
        &mut self,
        state: Option<&mut AvatarState>,
        scheduler: &mut RepeatingScheduler,
        prompt: &mut dyn PromptSink,
    ) -> Result<bool, InteractionError> {
        let state = state.ok_or(InteractionError::MissingAvatarState)?;
        if !state.is_targeting_active() {
            return Ok(false);
        }

        self.cancel_probe(scheduler);
        prompt.hide_prompt();
        self.prompt = PromptState::Hidden;
        self.current = None;
        self.last_trace = None;
        state.set_targeting_active(false);
        Ok(true)
    }

    /// Drops the probe task without touching prompt or flags (used on despawn).
    pub fn cancel_probe(&mut self, scheduler: &mut RepeatingScheduler) {
        if let Some(task) = self.task.take() {
            scheduler.cancel(task);
        }
    }

    /// True when this controller's probe task came due on the last scheduler step.
    pub fn is_probe_due(&self, scheduler: &RepeatingScheduler) -> bool {
        self.task.is_some_and(|task| scheduler.is_due(task))
    }

    /// Runs one probe and emits at most one prompt event.
    pub fn probe_tick(
        &mut self,
        state: &AvatarState,
        pose: ViewPose,
        avatar: Option<ObjectId>,
        probe: &dyn RayProbe,
        registry: &dyn TargetRegistry,
        prompt: &mut dyn PromptSink,
    ) -> ProbeOutcome {
        if !state.is_targeting_active() {
            return ProbeOutcome::Inactive;
        }

        let request = ProbeRequest {
            origin: pose.origin,
            direction: pose.direction.normalize_or_zero(),
            max_distance: self.settings.max_distance,
            category: self.settings.category,
            ignore: avatar,
        };
        let hit = probe
            .probe(&request)
            .filter(|hit| Some(hit.object) != avatar);

        self.last_trace = Some(ProbeTrace {
            start: request.origin,
            end: request.end(),
            hit: hit.is_some(),
        });

        let Some(hit) = hit else {
            self.release_target(prompt);
            return ProbeOutcome::Miss;
        };

        let Some(descriptor) = registry.describe(hit.object) else {
            self.release_target(prompt);
            return ProbeOutcome::Blocked(hit.object);
        };

        let interactable = descriptor.capability.is_interactable();
        let shown = PromptState::Shown {
            object: hit.object,
            interactable,
        };
        if self.prompt != shown {
            debug!(
                "Targeting {} ({}) at {:.1} units",
                descriptor.name, hit.object, hit.distance
            );
            prompt.show_prompt(&descriptor.name, interactable);
            self.prompt = shown;
        }

        self.current = Some(TargetRef {
            object: hit.object,
            name: descriptor.name,
            capability: descriptor.capability,
        });
        ProbeOutcome::Targeted(hit.object)
    }

    /// Forgets the current target and hides the prompt unconditionally.
    pub fn clear_target(&mut self, prompt: &mut dyn PromptSink) {
        self.current = None;
        prompt.hide_prompt();
        self.prompt = PromptState::Hidden;
    }

    fn release_target(&mut self, prompt: &mut dyn PromptSink) {
        if let Some(lost) = self.current.take() {
            debug!("Lost target {} ({})", lost.name, lost.object);
        }
        if self.prompt != PromptState::Hidden {
            prompt.hide_prompt();
            self.prompt = PromptState::Hidden;
        }
    }
}

impl Default for TargetingController {
    fn default() -> Self {
        Self::new(ProbeSettings::default())
    }
}
