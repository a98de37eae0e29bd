//! Interaction dispatcher: routes decoded input to the controllers behind capability gates.
use bevy::prelude::*;

use crate::{core::scheduler::RepeatingScheduler, world::components::ObjectId};

use super::{
    equip::{EquipController, ItemPresence},
    errors::InteractionError,
    state::AvatarState,
    targeting::{PromptSink, TargetRegistry, TargetingController},
};

/// Receives raw movement and rotation contributions.
pub trait AvatarMotion {
    fn add_movement(&mut self, forward: f32, right: f32);
    fn add_look(&mut self, yaw: f32, pitch: f32);
}

/// Runs the interaction effect a target carries. The dispatcher never knows what it does.
pub trait InteractionEffects {
    fn perform_interaction(&mut self, object: ObjectId);
}

/// Borrows one avatar's state and controllers for the duration of a dispatch.
pub struct InteractionDispatcher<'a> {
    pub state: Option<&'a mut AvatarState>,
    pub targeting: &'a mut TargetingController,
    pub equip: &'a mut EquipController,
}

impl InteractionDispatcher<'_> {
    /// Forwards `axes.y` as forward and `axes.x` as right. Returns whether input was applied.
    pub fn on_move(&mut self, axes: Vec2, motion: &mut dyn AvatarMotion) -> bool {
        match self.state.as_deref() {
            Some(state) if state.can_move => {
                motion.add_movement(axes.y, axes.x);
                true
            }
            _ => false,
        }
    }

    /// Forwards `axes.x` as yaw and `axes.y` as pitch. Returns whether input was applied.
    pub fn on_look(&mut self, axes: Vec2, motion: &mut dyn AvatarMotion) -> bool {
        match self.state.as_deref() {
            Some(state) if state.can_look => {
                motion.add_look(axes.x, axes.y);
                true
            }
            _ => false,
        }
    }

    pub fn on_start_targeting(
        &mut self,
        scheduler: &mut RepeatingScheduler,
    ) -> Result<bool, InteractionError> {
        let state = self
            .state
            .as_deref_mut()
            .ok_or(InteractionError::MissingAvatarState)?;
        if !state.can_target {
            return Err(InteractionError::TargetingDisabled);
        }
        self.targeting.start_targeting(Some(state), scheduler)
    }

    pub fn on_stop_targeting(
        &mut self,
        scheduler: &mut RepeatingScheduler,
        prompt: &mut dyn PromptSink,
    ) -> Result<bool, InteractionError> {
        self.targeting
            .stop_targeting(self.state.as_deref_mut(), scheduler, prompt)
    }

    /// Performs the current target's interaction, then clears the target and hides the prompt.
    pub fn on_interact(
        &mut self,
        registry: &dyn TargetRegistry,
        effects: &mut dyn InteractionEffects,
        prompt: &mut dyn PromptSink,
    ) -> Result<ObjectId, InteractionError> {
        let state = self
            .state
            .as_deref()
            .ok_or(InteractionError::MissingAvatarState)?;
        if !state.is_targeting_active() {
            return Err(InteractionError::TargetingInactive);
        }
        let object = self
            .targeting
            .current_target()
            .map(|target| target.object)
            .ok_or(InteractionError::NoTarget)?;

        let Some(descriptor) = registry.describe(object) else {
            self.targeting.clear_target(prompt);
            return Err(InteractionError::TargetVanished { object });
        };
        if !descriptor.capability.is_interactable() {
            return Err(InteractionError::NotInteractable { object });
        }

        effects.perform_interaction(object);
        self.targeting.clear_target(prompt);
        Ok(object)
    }

    pub fn on_unequip(
        &mut self,
        presence: &mut dyn ItemPresence,
    ) -> Result<ObjectId, InteractionError> {
        self.equip.unequip(self.state.as_deref_mut(), presence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::avatar::equip::test_support::RecordingPresence;
    use crate::avatar::targeting::test_support::*;
    use crate::world::components::TargetCapability;

    const KEY: ObjectId = ObjectId::new(30);
    const STATUE: ObjectId = ObjectId::new(31);

    #[derive(Debug, Default)]
    struct RecordingMotion {
        movement: Vec2,
        look: Vec2,
    }

    impl AvatarMotion for RecordingMotion {
        fn add_movement(&mut self, forward: f32, right: f32) {
            self.movement += Vec2::new(right, forward);
        }

        fn add_look(&mut self, yaw: f32, pitch: f32) {
            self.look += Vec2::new(yaw, pitch);
        }
    }

    #[derive(Debug, Default)]
    struct RecordingEffects {
        performed: Vec<ObjectId>,
    }

    impl InteractionEffects for RecordingEffects {
        fn perform_interaction(&mut self, object: ObjectId) {
            self.performed.push(object);
        }
    }

    fn registry() -> crate::avatar::targeting::TargetDirectory {
        directory(&[
            (KEY, "Key", TargetCapability::Interactable),
            (STATUE, "Statue", TargetCapability::Inert),
        ])
    }

    #[test]
    fn move_is_ignored_when_movement_disabled() {
        let mut state = AvatarState::new(false, true, true);
        let mut targeting = TargetingController::default();
        let mut equip = EquipController::default();
        let mut motion = RecordingMotion::default();

        let mut dispatcher = InteractionDispatcher {
            state: Some(&mut state),
            targeting: &mut targeting,
            equip: &mut equip,
        };
        assert!(!dispatcher.on_move(Vec2::new(1.0, 0.0), &mut motion));
        assert!(dispatcher.on_look(Vec2::new(0.5, -0.5), &mut motion));

        assert_eq!(motion.movement, Vec2::ZERO);
        assert_eq!(motion.look, Vec2::new(0.5, -0.5));
    }

    #[test]
    fn move_and_look_pass_axes_through_raw() {
        let mut state = AvatarState::new(true, false, true);
        let mut targeting = TargetingController::default();
        let mut equip = EquipController::default();
        let mut motion = RecordingMotion::default();

        let mut dispatcher = InteractionDispatcher {
            state: Some(&mut state),
            targeting: &mut targeting,
            equip: &mut equip,
        };
        assert!(dispatcher.on_move(Vec2::new(1.0, 1.0), &mut motion));
        assert!(!dispatcher.on_look(Vec2::ONE, &mut motion));

        // No diagonal normalisation.
        assert_eq!(motion.movement, Vec2::new(1.0, 1.0));
        assert_eq!(motion.look, Vec2::ZERO);
    }

    #[test]
    fn missing_state_ignores_everything() {
        let mut targeting = TargetingController::default();
        let mut equip = EquipController::default();
        let mut motion = RecordingMotion::default();
        let mut scheduler = RepeatingScheduler::default();

        let mut dispatcher = InteractionDispatcher {
            state: None,
            targeting: &mut targeting,
            equip: &mut equip,
        };
        assert!(!dispatcher.on_move(Vec2::X, &mut motion));
        assert_eq!(
            dispatcher.on_start_targeting(&mut scheduler),
            Err(InteractionError::MissingAvatarState)
        );
        assert_eq!(scheduler.len(), 0);
    }

    #[test]
    fn targeting_capability_gates_start() {
        let mut state = AvatarState::new(true, true, false);
        let mut targeting = TargetingController::default();
        let mut equip = EquipController::default();
        let mut scheduler = RepeatingScheduler::default();

        let mut dispatcher = InteractionDispatcher {
            state: Some(&mut state),
            targeting: &mut targeting,
            equip: &mut equip,
        };
        assert_eq!(
            dispatcher.on_start_targeting(&mut scheduler),
            Err(InteractionError::TargetingDisabled)
        );
        assert!(!state.is_targeting_active());
    }

    #[test]
    fn interact_without_target_changes_nothing() {
        let mut state = AvatarState::default();
        let mut targeting = TargetingController::default();
        let mut equip = EquipController::default();
        let mut scheduler = RepeatingScheduler::default();
        let mut prompt = RecordingPrompt::default();
        let mut effects = RecordingEffects::default();

        let mut dispatcher = InteractionDispatcher {
            state: Some(&mut state),
            targeting: &mut targeting,
            equip: &mut equip,
        };
        assert_eq!(
            dispatcher.on_interact(&registry(), &mut effects, &mut prompt),
            Err(InteractionError::TargetingInactive)
        );

        dispatcher.on_start_targeting(&mut scheduler).unwrap();
        let before = dispatcher.state.as_deref().cloned();
        assert_eq!(
            dispatcher.on_interact(&registry(), &mut effects, &mut prompt),
            Err(InteractionError::NoTarget)
        );
        assert_eq!(dispatcher.state.as_deref().cloned(), before);
        assert_eq!(dispatcher.equip.held(), None);
        assert!(effects.performed.is_empty());
        assert!(prompt.calls.is_empty());
    }

    #[test]
    fn interact_runs_effect_and_clears_target() {
        let mut state = AvatarState::default();
        let mut targeting = TargetingController::default();
        let mut equip = EquipController::default();
        let mut scheduler = RepeatingScheduler::default();
        let mut prompt = RecordingPrompt::default();
        let mut effects = RecordingEffects::default();
        let registry = registry();

        targeting
            .start_targeting(Some(&mut state), &mut scheduler)
            .unwrap();
        targeting.probe_tick(&state, forward_pose(), None, &hit(KEY), &registry, &mut prompt);
        prompt.take();

        let mut dispatcher = InteractionDispatcher {
            state: Some(&mut state),
            targeting: &mut targeting,
            equip: &mut equip,
        };
        assert_eq!(
            dispatcher.on_interact(&registry, &mut effects, &mut prompt),
            Ok(KEY)
        );
        assert_eq!(effects.performed, vec![KEY]);
        assert_eq!(prompt.take(), vec![PromptCall::Hide]);
        assert!(dispatcher.targeting.current_target().is_none());
        assert!(state.is_targeting_active());
    }

    #[test]
    fn inert_target_is_not_interacted_with() {
        let mut state = AvatarState::default();
        let mut targeting = TargetingController::default();
        let mut equip = EquipController::default();
        let mut scheduler = RepeatingScheduler::default();
        let mut prompt = RecordingPrompt::default();
        let mut effects = RecordingEffects::default();
        let registry = registry();

        targeting
            .start_targeting(Some(&mut state), &mut scheduler)
            .unwrap();
        targeting.probe_tick(
            &state,
            forward_pose(),
            None,
            &hit(STATUE),
            &registry,
            &mut prompt,
        );
        prompt.take();

        let mut dispatcher = InteractionDispatcher {
            state: Some(&mut state),
            targeting: &mut targeting,
            equip: &mut equip,
        };
        assert_eq!(
            dispatcher.on_interact(&registry, &mut effects, &mut prompt),
            Err(InteractionError::NotInteractable { object: STATUE })
        );
        assert!(effects.performed.is_empty());
        assert!(prompt.calls.is_empty());
        assert!(dispatcher.targeting.current_target().is_some());
    }

    #[test]
    fn interact_with_vanished_target_hides_prompt() {
        let mut state = AvatarState::default();
        let mut targeting = TargetingController::default();
        let mut equip = EquipController::default();
        let mut scheduler = RepeatingScheduler::default();
        let mut prompt = RecordingPrompt::default();
        let mut effects = RecordingEffects::default();

        targeting
            .start_targeting(Some(&mut state), &mut scheduler)
            .unwrap();
        targeting.probe_tick(&state, forward_pose(), None, &hit(KEY), &registry(), &mut prompt);
        prompt.take();

        // The key left the world between the last tick and the interact.
        let emptied = directory(&[(STATUE, "Statue", TargetCapability::Inert)]);
        let mut dispatcher = InteractionDispatcher {
            state: Some(&mut state),
            targeting: &mut targeting,
            equip: &mut equip,
        };
        assert_eq!(
            dispatcher.on_interact(&emptied, &mut effects, &mut prompt),
            Err(InteractionError::TargetVanished { object: KEY })
        );
        assert!(effects.performed.is_empty());
        assert_eq!(prompt.take(), vec![PromptCall::Hide]);
        assert!(dispatcher.targeting.current_target().is_none());
        assert!(state.is_targeting_active());
    }

    #[test]
    fn unequip_routes_to_equip_controller() {
        let mut state = AvatarState::default();
        let mut targeting = TargetingController::default();
        let mut equip = EquipController::default();
        let mut presence = RecordingPresence::default();

        equip.equip(Some(&mut state), KEY, &mut presence).unwrap();

        let mut dispatcher = InteractionDispatcher {
            state: Some(&mut state),
            targeting: &mut targeting,
            equip: &mut equip,
        };
        assert_eq!(dispatcher.on_unequip(&mut presence), Ok(KEY));
        assert_eq!(
            dispatcher.on_unequip(&mut presence),
            Err(InteractionError::NothingEquipped)
        );
        assert!(!state.is_equipped());
    }
}
