//! Scene setup: ground, light and the props the avatar can look at.
use bevy::{math::primitives::Plane3d, prelude::*};

use crate::world::components::{
    Equippable, InteractionEffect, ObjectIdGenerator, ProbeCategory, ProbeCollider,
    Targetable, WorldObject,
};

const GROUND_SCALE: f32 = 100.0;

/// How a prop reacts to the avatar.
enum PropKind {
    /// Picked up into the equip slot.
    Item,
    /// Interactable; logs a note.
    Sign(&'static str),
    /// Targetable but nothing happens on interact.
    Inert,
    /// Blocks probes without being a target.
    Blocker,
}

struct PropSpec {
    name: &'static str,
    position: Vec3,
    half_extents: Vec3,
    color: Color,
    kind: PropKind,
}

fn props() -> [PropSpec; 5] {
    [
        PropSpec {
            name: "Key",
            position: Vec3::new(0.0, 1.4, 2.0),
            half_extents: Vec3::new(0.15, 0.05, 0.08),
            color: Color::srgb_u8(212, 175, 55),
            kind: PropKind::Item,
        },
        PropSpec {
            name: "Lantern",
            position: Vec3::new(1.5, 1.4, 2.0),
            half_extents: Vec3::new(0.15, 0.25, 0.15),
            color: Color::srgb_u8(230, 120, 40),
            kind: PropKind::Item,
        },
        PropSpec {
            name: "Notice Board",
            position: Vec3::new(-2.0, 1.5, 0.0),
            half_extents: Vec3::new(0.8, 0.6, 0.05),
            color: Color::srgb_u8(120, 85, 50),
            kind: PropKind::Sign("Market closes at dusk."),
        },
        PropSpec {
            name: "Statue",
            position: Vec3::new(3.0, 1.0, -1.0),
            half_extents: Vec3::new(0.4, 1.0, 0.4),
            color: Color::srgb_u8(160, 160, 170),
            kind: PropKind::Inert,
        },
        PropSpec {
            name: "Crate",
            position: Vec3::new(0.0, 0.5, -2.0),
            half_extents: Vec3::splat(0.5),
            color: Color::srgb_u8(150, 110, 60),
            kind: PropKind::Blocker,
        },
    ]
}

/// Spawns the initial scene: ground plane, light, and interactable props.
pub fn spawn_world_environment(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut ids: ResMut<ObjectIdGenerator>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Plane3d::default()))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(90, 140, 90),
            perceptual_roughness: 0.9,
            metallic: 0.0,
            ..default()
        })),
        Transform::from_scale(Vec3::splat(GROUND_SCALE)),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 20_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(16.0, 32.0, 16.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    for prop in props() {
        let id = ids.next_id();
        let mut entity = commands.spawn((
            Name::new(prop.name),
            WorldObject::new(id, prop.name),
            Mesh3d(meshes.add(Cuboid::from_size(prop.half_extents * 2.0))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: prop.color,
                perceptual_roughness: 0.7,
                ..default()
            })),
            Transform::from_translation(prop.position),
            ProbeCollider::new(prop.half_extents, ProbeCategory::WorldDynamic),
        ));

        match prop.kind {
            PropKind::Item => {
                entity.insert((Targetable::interactable(), InteractionEffect::PickUp, Equippable));
            }
            PropKind::Sign(note) => {
                entity.insert((
                    Targetable::interactable(),
                    InteractionEffect::Inspect {
                        note: note.to_string(),
                    },
                ));
            }
            PropKind::Inert => {
                entity.insert(Targetable::inert());
            }
            PropKind::Blocker => {}
        }

        debug!("Spawned {} as {}", prop.name, id);
    }
}
