//! Systems binding the avatar controllers to the ECS world.
use bevy::{
    ecs::message::{MessageReader, MessageWriter},
    prelude::*,
};

use crate::{
    core::{plugin::SimulationClock, scheduler::RepeatingScheduler},
    world::{
        components::{
            Equippable, Held, InteractionEffect, ObjectIdGenerator, ProbeCategory, ProbeCollider,
            Targetable, WorldObject,
        },
        probe::ColliderSnapshot,
    },
};

use super::{
    adapters::{CommandItemPresence, ItemLookup, MessageEffects, MessagePrompt},
    components::{Avatar, AvatarEye, AvatarMotor, AvatarRig, MotionAccumulator},
    config::InteractionSettings,
    dispatcher::InteractionDispatcher,
    equip::EquipController,
    errors::InteractionError,
    events::{AvatarAction, AvatarInputEvent, DespawnAvatar, InteractionRequested, PromptEvent},
    state::AvatarState,
    targeting::{PromptSink, TargetDescriptor, TargetDirectory, TargetingController, ViewPose},
};

const AVATAR_START: Vec3 = Vec3::new(0.0, 0.9, 6.0);
const AVATAR_HALF_EXTENTS: Vec3 = Vec3::new(0.35, 0.9, 0.35);

fn target_directory(targets: &Query<(&WorldObject, &Targetable), Without<Held>>) -> TargetDirectory {
    targets
        .iter()
        .map(|(object, targetable)| {
            (
                object.id,
                TargetDescriptor {
                    name: object.display_name.clone(),
                    capability: targetable.capability,
                },
            )
        })
        .collect()
}

fn item_lookup(items: &Query<(Entity, &WorldObject, &GlobalTransform), With<Equippable>>) -> ItemLookup {
    items
        .iter()
        .map(|(entity, object, global)| (object.id, entity, *global))
        .collect()
}

/// Spawns the local avatar with its eye camera and equip slot.
pub fn spawn_avatar(
    mut commands: Commands,
    settings: Res<InteractionSettings>,
    mut ids: ResMut<ObjectIdGenerator>,
    mut inputs: MessageWriter<AvatarInputEvent>,
) {
    let id = ids.next_id();
    let avatar = commands
        .spawn((
            Avatar,
            Name::new("Avatar"),
            WorldObject::new(id, "Avatar"),
            settings.initial_state.clone(),
            TargetingController::new(settings.probe),
            EquipController::default(),
            MotionAccumulator::default(),
            AvatarMotor::new(settings.move_speed, settings.look_sensitivity),
            ProbeCollider::new(AVATAR_HALF_EXTENTS, ProbeCategory::Pawn),
            Transform::from_translation(AVATAR_START),
            Visibility::default(),
        ))
        .id();

    let eye = commands
        .spawn((
            AvatarEye,
            Camera3d::default(),
            Transform::from_xyz(0.0, settings.eye_height, 0.0),
            Visibility::default(),
            ChildOf(avatar),
        ))
        .id();

    let slot_anchor = commands
        .spawn((
            Name::new("Equip Slot"),
            Transform::from_translation(settings.slot_offset),
            Visibility::default(),
            ChildOf(eye),
        ))
        .id();

    commands.entity(avatar).insert(AvatarRig { eye, slot_anchor });
    info!("Spawned avatar {} at {:?}", id, AVATAR_START);

    if settings.auto_start_targeting {
        inputs.write(AvatarInputEvent {
            avatar,
            action: AvatarAction::StartTargeting,
        });
    }
}

/// Routes decoded input through each avatar's [`InteractionDispatcher`].
#[allow(clippy::type_complexity, clippy::too_many_arguments)]
pub fn dispatch_avatar_input(
    mut commands: Commands,
    mut inputs: MessageReader<AvatarInputEvent>,
    mut avatars: Query<(
        Option<&mut AvatarState>,
        &mut TargetingController,
        &mut EquipController,
        &mut MotionAccumulator,
        &AvatarRig,
    )>,
    targets: Query<(&WorldObject, &Targetable), Without<Held>>,
    items: Query<(Entity, &WorldObject, &GlobalTransform), With<Equippable>>,
    mut scheduler: ResMut<RepeatingScheduler>,
    mut prompts: MessageWriter<PromptEvent>,
    mut interactions: MessageWriter<InteractionRequested>,
) {
    for event in inputs.read() {
        let Ok((state, targeting, equip, motion, rig)) = avatars.get_mut(event.avatar) else {
            warn!("Input for {:?} ignored: not an avatar", event.avatar);
            continue;
        };
        let mut dispatcher = InteractionDispatcher {
            state: state.map(Mut::into_inner),
            targeting: targeting.into_inner(),
            equip: equip.into_inner(),
        };

        match event.action {
            AvatarAction::Move(axes) => {
                if !dispatcher.on_move(axes, motion.into_inner()) {
                    debug!("Move ignored for {:?}", event.avatar);
                }
            }
            AvatarAction::Look(axes) => {
                if !dispatcher.on_look(axes, motion.into_inner()) {
                    debug!("Look ignored for {:?}", event.avatar);
                }
            }
            AvatarAction::StartTargeting => match dispatcher.on_start_targeting(&mut scheduler) {
                Ok(true) => info!(
                    "Targeting started for {:?} ({} probe tasks live)",
                    event.avatar,
                    scheduler.len()
                ),
                Ok(false) => {}
                Err(err) => warn!("Targeting not started for {:?}: {}", event.avatar, err),
            },
            AvatarAction::StopTargeting => {
                let mut prompt = MessagePrompt::new(event.avatar, &mut prompts);
                match dispatcher.on_stop_targeting(&mut scheduler, &mut prompt) {
                    Ok(true) => info!("Targeting stopped for {:?}", event.avatar),
                    Ok(false) => {}
                    Err(err) => warn!("Targeting not stopped for {:?}: {}", event.avatar, err),
                }
            }
            AvatarAction::Interact => {
                let directory = target_directory(&targets);
                let mut prompt = MessagePrompt::new(event.avatar, &mut prompts);
                let mut effects = MessageEffects::new(event.avatar, &mut interactions);
                match dispatcher.on_interact(&directory, &mut effects, &mut prompt) {
                    Ok(object) => info!("{:?} interacted with {}", event.avatar, object),
                    Err(err) if err.is_missing_target() => {
                        error!("Interact from {:?} ignored: {}", event.avatar, err)
                    }
                    Err(err) => warn!("Interact from {:?} ignored: {}", event.avatar, err),
                }
            }
            AvatarAction::Drop => {
                let lookup = item_lookup(&items);
                let mut presence = CommandItemPresence::new(&mut commands, &lookup, rig.slot_anchor);
                match dispatcher.on_unequip(&mut presence) {
                    Ok(object) => info!("{:?} dropped {}", event.avatar, object),
                    Err(InteractionError::NothingEquipped) => {
                        debug!("{:?} has nothing to drop", event.avatar)
                    }
                    Err(err) => warn!("Drop from {:?} ignored: {}", event.avatar, err),
                }
            }
        }
    }
}

/// Carries out whatever effect the interacted object declares.
pub fn resolve_interaction_effects(
    mut commands: Commands,
    mut requests: MessageReader<InteractionRequested>,
    objects: Query<(&WorldObject, &InteractionEffect)>,
    items: Query<(Entity, &WorldObject, &GlobalTransform), With<Equippable>>,
    mut avatars: Query<(Option<&mut AvatarState>, &mut EquipController, &AvatarRig)>,
) {
    for request in requests.read() {
        let Some((object, effect)) = objects.iter().find(|(object, _)| object.id == request.object)
        else {
            warn!(
                "{}",
                InteractionError::UnknownObject {
                    object: request.object
                }
            );
            continue;
        };

        match effect {
            InteractionEffect::Inspect { note } => {
                info!("{}: {}", object.display_name, note);
            }
            InteractionEffect::PickUp => {
                let lookup = item_lookup(&items);
                if !lookup.contains(request.object) {
                    warn!(
                        "{}",
                        InteractionError::NotEquippable {
                            object: request.object
                        }
                    );
                    continue;
                }
                let Ok((state, mut equip, rig)) = avatars.get_mut(request.avatar) else {
                    warn!("Pick-up for {:?} ignored: not an avatar", request.avatar);
                    continue;
                };

                let mut presence = CommandItemPresence::new(&mut commands, &lookup, rig.slot_anchor);
                match equip.equip(state.map(Mut::into_inner), request.object, &mut presence) {
                    Ok(change) => match change.released {
                        Some(released) => info!(
                            "{:?} equipped {} ({}), dropping {}",
                            request.avatar, object.display_name, change.equipped, released
                        ),
                        None => info!(
                            "{:?} equipped {} ({})",
                            request.avatar, object.display_name, change.equipped
                        ),
                    },
                    Err(err) => warn!("Pick-up of {} failed: {}", object.display_name, err),
                }
            }
        }
    }
}

/// Runs the probe for every avatar whose task came due this frame, in scheduling order.
#[allow(clippy::type_complexity)]
pub fn run_probe_ticks(
    scheduler: Res<RepeatingScheduler>,
    mut avatars: Query<(
        Entity,
        &AvatarState,
        &mut TargetingController,
        &AvatarRig,
        Option<&WorldObject>,
    )>,
    eyes: Query<&GlobalTransform, With<AvatarEye>>,
    colliders: Query<(&WorldObject, &GlobalTransform, &ProbeCollider), Without<Held>>,
    targets: Query<(&WorldObject, &Targetable), Without<Held>>,
    mut prompts: MessageWriter<PromptEvent>,
) {
    if scheduler.due().is_empty() {
        return;
    }

    let mut due: Vec<_> = avatars
        .iter_mut()
        .filter(|(_, _, targeting, _, _)| targeting.is_probe_due(&scheduler))
        .collect();
    if due.is_empty() {
        return;
    }
    due.sort_by_key(|(_, _, targeting, _, _)| targeting.probe_task());

    let snapshot: ColliderSnapshot = colliders
        .iter()
        .map(|(object, global, collider)| (object.id, global.translation(), *collider))
        .collect();
    let directory = target_directory(&targets);

    for (avatar, state, mut targeting, rig, identity) in due {
        let Ok(eye) = eyes.get(rig.eye) else {
            warn!("Avatar {:?} lost its eye; probe skipped", avatar);
            continue;
        };
        let mut prompt = MessagePrompt::new(avatar, &mut prompts);
        targeting.probe_tick(
            state,
            ViewPose::from_global(eye),
            identity.map(|object| object.id),
            &snapshot,
            &directory,
            &mut prompt,
        );
    }
}

/// Applies the frame's accumulated movement and look to the avatar and its eye.
pub fn apply_avatar_motion(
    clock: Res<SimulationClock>,
    mut avatars: Query<(
        &mut MotionAccumulator,
        &mut AvatarMotor,
        &mut Transform,
        &AvatarRig,
    )>,
    mut eyes: Query<&mut Transform, (With<AvatarEye>, Without<AvatarMotor>)>,
) {
    let dt = clock.last_scaled_delta().as_secs_f32();

    for (mut motion, mut motor, mut transform, rig) in avatars.iter_mut() {
        let frame = motion.take();

        if frame.yaw != 0.0 || frame.pitch != 0.0 {
            motor.apply_look(frame.yaw, frame.pitch);
            transform.rotation = motor.body_rotation();
            if let Ok(mut eye) = eyes.get_mut(rig.eye) {
                eye.rotation = motor.eye_rotation();
            }
        }

        if frame.forward != 0.0 || frame.right != 0.0 {
            let forward = transform.forward().as_vec3();
            let right = transform.right().as_vec3();
            let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
            let right = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();
            transform.translation +=
                (forward * frame.forward + right * frame.right) * motor.move_speed * dt;
        }
    }
}

/// Drops the held item and cancels the probe before the avatar goes away.
pub fn despawn_avatars(
    mut commands: Commands,
    mut requests: MessageReader<DespawnAvatar>,
    mut avatars: Query<(
        Option<&mut AvatarState>,
        &mut TargetingController,
        &mut EquipController,
        &AvatarRig,
    )>,
    items: Query<(Entity, &WorldObject, &GlobalTransform), With<Equippable>>,
    mut scheduler: ResMut<RepeatingScheduler>,
    mut prompts: MessageWriter<PromptEvent>,
) {
    for request in requests.read() {
        let Ok((state, mut targeting, mut equip, rig)) = avatars.get_mut(request.avatar) else {
            continue;
        };

        if equip.held().is_some() {
            if state.is_none() {
                warn!(
                    "Avatar {:?} has no state; releasing its held item anyway",
                    request.avatar
                );
            }
            let lookup = item_lookup(&items);
            let mut presence = CommandItemPresence::new(&mut commands, &lookup, rig.slot_anchor);
            if let Some(item) = equip.release_held(state.map(Mut::into_inner), &mut presence) {
                info!("{:?} dropped {} on despawn", request.avatar, item);
            }
        }

        targeting.cancel_probe(&mut scheduler);
        MessagePrompt::new(request.avatar, &mut prompts).hide_prompt();
        commands.entity(request.avatar).despawn();
        info!("Despawned avatar {:?}", request.avatar);
    }
}

/// Green when the last probe hit something, red otherwise.
#[cfg(feature = "probe_debug")]
pub fn draw_probe_traces(mut gizmos: Gizmos, avatars: Query<&TargetingController>) {
    for targeting in avatars.iter() {
        let Some(trace) = targeting.last_trace() else {
            continue;
        };
        let color = if trace.hit {
            Color::srgb(0.0, 1.0, 0.0)
        } else {
            Color::srgb(1.0, 0.0, 0.0)
        };
        gizmos.line(trace.start, trace.end, color);
    }
}
