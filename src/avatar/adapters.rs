//! ECS implementations of the controller collaborators.
use std::collections::HashMap;

use bevy::{ecs::message::MessageWriter, prelude::*};

use crate::world::components::{Held, ObjectId};

use super::{
    dispatcher::InteractionEffects,
    equip::ItemPresence,
    events::{InteractionRequested, PromptEvent},
    targeting::PromptSink,
};

/// Turns prompt calls into [`PromptEvent`] messages tagged with the avatar.
pub struct MessagePrompt<'a, 'w> {
    avatar: Entity,
    writer: &'a mut MessageWriter<'w, PromptEvent>,
}

impl<'a, 'w> MessagePrompt<'a, 'w> {
    pub fn new(avatar: Entity, writer: &'a mut MessageWriter<'w, PromptEvent>) -> Self {
        Self { avatar, writer }
    }
}

impl PromptSink for MessagePrompt<'_, '_> {
    fn show_prompt(&mut self, name: &str, interactable: bool) {
        self.writer.write(PromptEvent::Show {
            avatar: self.avatar,
            name: name.to_string(),
            interactable,
        });
    }

    fn hide_prompt(&mut self) {
        self.writer.write(PromptEvent::Hide {
            avatar: self.avatar,
        });
    }
}

/// Forwards interactions to the effect systems as [`InteractionRequested`] messages.
pub struct MessageEffects<'a, 'w> {
    avatar: Entity,
    writer: &'a mut MessageWriter<'w, InteractionRequested>,
}

impl<'a, 'w> MessageEffects<'a, 'w> {
    pub fn new(avatar: Entity, writer: &'a mut MessageWriter<'w, InteractionRequested>) -> Self {
        Self { avatar, writer }
    }
}

impl InteractionEffects for MessageEffects<'_, '_> {
    fn perform_interaction(&mut self, object: ObjectId) {
        self.writer.write(InteractionRequested {
            avatar: self.avatar,
            object,
        });
    }
}

/// Equippable entities by object id, with their world transform at the start of the frame.
#[derive(Debug, Default)]
pub struct ItemLookup {
    entries: HashMap<ObjectId, (Entity, GlobalTransform)>,
}

impl ItemLookup {
    pub fn contains(&self, object: ObjectId) -> bool {
        self.entries.contains_key(&object)
    }

    fn get(&self, object: ObjectId) -> Option<(Entity, GlobalTransform)> {
        self.entries.get(&object).copied()
    }
}

impl FromIterator<(ObjectId, Entity, GlobalTransform)> for ItemLookup {
    fn from_iter<T: IntoIterator<Item = (ObjectId, Entity, GlobalTransform)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(object, entity, global)| (object, (entity, global)))
                .collect(),
        }
    }
}

/// Applies item presence changes through deferred commands.
pub struct CommandItemPresence<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    items: &'a ItemLookup,
    slot_anchor: Entity,
}

impl<'a, 'w, 's> CommandItemPresence<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>, items: &'a ItemLookup, slot_anchor: Entity) -> Self {
        Self {
            commands,
            items,
            slot_anchor,
        }
    }

    fn entity(&self, item: ObjectId) -> Option<(Entity, GlobalTransform)> {
        let found = self.items.get(item);
        if found.is_none() {
            warn!("Item {} has no entity; presence change skipped", item);
        }
        found
    }
}

impl ItemPresence for CommandItemPresence<'_, '_, '_> {
    fn disable_world_presence(&mut self, item: ObjectId) {
        if let Some((entity, _)) = self.entity(item) {
            self.commands.entity(entity).insert(Held);
        }
    }

    fn enable_world_presence(&mut self, item: ObjectId) {
        if let Some((entity, _)) = self.entity(item) {
            self.commands.entity(entity).remove::<Held>();
        }
    }

    fn attach(&mut self, item: ObjectId) {
        if let Some((entity, global)) = self.entity(item) {
            let scale = global.compute_transform().scale;
            self.commands
                .entity(entity)
                .insert((ChildOf(self.slot_anchor), Transform::from_scale(scale)));
        }
    }

    fn detach(&mut self, item: ObjectId) {
        if let Some((entity, global)) = self.entity(item) {
            self.commands
                .entity(entity)
                .remove::<ChildOf>()
                .insert(global.compute_transform());
        }
    }
}
