// src/ui/prompt/systems.rs
//
// Systems for spawning the prompt HUD and applying prompt messages to it.

use bevy::{ecs::message::MessageReader, prelude::*};

use crate::avatar::events::PromptEvent;

use super::components::{InteractionPrompt, PromptLabel, PromptSettings};

const BACKGROUND_COLOR: Color = Color::srgba(0.1, 0.1, 0.1, 0.8);
const BORDER_COLOR: Color = Color::srgb(0.3, 0.3, 0.3);
const INTERACT_COLOR: Color = Color::WHITE;
const INERT_COLOR: Color = Color::srgb(0.65, 0.65, 0.65);

/// Label for a target: interactable targets carry the key hint.
pub fn prompt_text(name: &str, interactable: bool) -> String {
    if interactable {
        format!("[E] {}", name)
    } else {
        name.to_string()
    }
}

/// Spawns the (hidden) prompt centred near the bottom of the screen.
pub fn spawn_prompt_hud(mut commands: Commands, settings: Res<PromptSettings>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(settings.bottom_offset),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                display: Display::None,
                ..default()
            },
            InteractionPrompt::default(),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        padding: UiRect::axes(
                            Val::Px(settings.padding * 1.5),
                            Val::Px(settings.padding),
                        ),
                        border: UiRect::all(Val::Px(settings.border_width)),
                        ..default()
                    },
                    BackgroundColor(BACKGROUND_COLOR),
                    BorderColor::from(BORDER_COLOR),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        Text::new(""),
                        TextFont {
                            font_size: settings.font_size,
                            ..default()
                        },
                        TextColor(INTERACT_COLOR),
                        PromptLabel,
                    ));
                });
        });
}

/// Shows or hides the prompt. A hide only applies to the avatar that owns the prompt.
pub fn apply_prompt_events(
    mut events: MessageReader<PromptEvent>,
    mut prompts: Query<(&mut InteractionPrompt, &mut Node)>,
    mut labels: Query<(&mut Text, &mut TextColor), With<PromptLabel>>,
) {
    for event in events.read() {
        match event {
            PromptEvent::Show {
                avatar,
                name,
                interactable,
            } => {
                for (mut prompt, mut node) in prompts.iter_mut() {
                    prompt.owner = Some(*avatar);
                    node.display = Display::Flex;
                }
                for (mut text, mut color) in labels.iter_mut() {
                    text.0 = prompt_text(name, *interactable);
                    color.0 = if *interactable {
                        INTERACT_COLOR
                    } else {
                        INERT_COLOR
                    };
                }
            }
            PromptEvent::Hide { avatar } => {
                for (mut prompt, mut node) in prompts.iter_mut() {
                    if prompt.owner == Some(*avatar) {
                        prompt.owner = None;
                        node.display = Display::None;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::MessageWriter;

    #[derive(Resource, Default)]
    struct Pending(Vec<PromptEvent>);

    fn feed(mut pending: ResMut<Pending>, mut writer: MessageWriter<PromptEvent>) {
        for event in pending.0.drain(..) {
            writer.write(event);
        }
    }

    fn hud_app() -> App {
        let mut app = App::new();
        app.init_resource::<PromptSettings>()
            .init_resource::<Pending>()
            .add_message::<PromptEvent>()
            .add_systems(Startup, spawn_prompt_hud)
            .add_systems(Update, (feed, apply_prompt_events).chain());
        app
    }

    fn send(app: &mut App, event: PromptEvent) {
        app.world_mut().resource_mut::<Pending>().0.push(event);
        app.update();
    }

    fn displayed(app: &mut App) -> (Display, String) {
        let mut prompts = app.world_mut().query::<(&InteractionPrompt, &Node)>();
        let mut labels = app
            .world_mut()
            .query_filtered::<&Text, With<PromptLabel>>();
        let world = app.world();
        let display = prompts
            .single(world)
            .map(|(_, node)| node.display)
            .expect("one prompt");
        let text = labels
            .single(world)
            .map(|text| text.0.clone())
            .expect("one label");
        (display, text)
    }

    #[test]
    fn prompt_text_marks_interactable_targets() {
        assert_eq!(prompt_text("Key", true), "[E] Key");
        assert_eq!(prompt_text("Statue", false), "Statue");
    }

    #[test]
    fn show_and_hide_toggle_display() {
        let mut app = hud_app();
        app.update();
        let avatar = app.world_mut().spawn_empty().id();
        let other = app.world_mut().spawn_empty().id();
        assert_eq!(displayed(&mut app).0, Display::None);

        send(
            &mut app,
            PromptEvent::Show {
                avatar,
                name: "Key".to_string(),
                interactable: true,
            },
        );
        assert_eq!(displayed(&mut app), (Display::Flex, "[E] Key".to_string()));

        // Another avatar's hide leaves the prompt up.
        send(&mut app, PromptEvent::Hide { avatar: other });
        assert_eq!(displayed(&mut app).0, Display::Flex);

        send(&mut app, PromptEvent::Hide { avatar });
        assert_eq!(displayed(&mut app).0, Display::None);
    }
}
