use std::{fs, path::Path, time::Duration};

use bevy::prelude::*;
use serde::Deserialize;

use crate::world::components::ProbeCategory;

use super::{state::AvatarState, targeting::ProbeSettings};

const CONFIG_PATH: &str = "config/interaction.toml";
const DEFAULT_PROBE_INTERVAL_SECS: f32 = 0.1;
const MIN_PROBE_INTERVAL_SECS: f32 = 0.01;
const MAX_PROBE_INTERVAL_SECS: f32 = 60.0;
const DEFAULT_PROBE_DISTANCE: f32 = 150.0;
const MIN_PROBE_DISTANCE: f32 = 0.1;
const MAX_PROBE_DISTANCE: f32 = 10_000.0;
const DEFAULT_MOVE_SPEED: f32 = 5.0;
const MAX_MOVE_SPEED: f32 = 100.0;
const DEFAULT_LOOK_SENSITIVITY: f32 = 0.003;
const MAX_LOOK_SENSITIVITY: f32 = 1.0;
const DEFAULT_EYE_HEIGHT: f32 = 0.6;
const MAX_EYE_HEIGHT: f32 = 10.0;
const DEFAULT_SLOT_OFFSET: [f32; 3] = [0.35, -0.25, -0.6];
const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;
const MAX_TIME_SCALE: f32 = 100.0;

#[derive(Debug, Clone, Deserialize, Default)]
struct RawInteractionConfig {
    #[serde(default)]
    probe: RawProbe,
    #[serde(default)]
    targeting: RawTargeting,
    #[serde(default)]
    avatar: RawAvatar,
    #[serde(default)]
    equip: RawEquip,
    #[serde(default)]
    simulation: RawSimulation,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawProbe {
    interval_seconds: f32,
    max_distance: f32,
    category: ProbeCategory,
}

impl Default for RawProbe {
    fn default() -> Self {
        Self {
            interval_seconds: DEFAULT_PROBE_INTERVAL_SECS,
            max_distance: DEFAULT_PROBE_DISTANCE,
            category: ProbeCategory::WorldDynamic,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawTargeting {
    auto_start: bool,
}

impl Default for RawTargeting {
    fn default() -> Self {
        Self { auto_start: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawAvatar {
    move_speed: f32,
    look_sensitivity: f32,
    eye_height: f32,
    can_move: bool,
    can_look: bool,
    can_target: bool,
}

impl Default for RawAvatar {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            look_sensitivity: DEFAULT_LOOK_SENSITIVITY,
            eye_height: DEFAULT_EYE_HEIGHT,
            can_move: true,
            can_look: true,
            can_target: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawEquip {
    slot_offset: [f32; 3],
}

impl Default for RawEquip {
    fn default() -> Self {
        Self {
            slot_offset: DEFAULT_SLOT_OFFSET,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSimulation {
    time_scale: f32,
}

impl Default for RawSimulation {
    fn default() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE,
        }
    }
}

/// Clamps finite values into `[min, max]`. TOML accepts `inf` and `nan`; those fall back.
fn finite_in_range(key: &str, value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        warn!(
            "{} in {} is not a finite number ({}). Using {}.",
            key, CONFIG_PATH, value, fallback
        );
        fallback
    }
}

/// Runtime configuration derived from `config/interaction.toml`.
#[derive(Resource, Debug, Clone)]
pub struct InteractionSettings {
    pub probe: ProbeSettings,
    pub auto_start_targeting: bool,
    pub move_speed: f32,
    pub look_sensitivity: f32,
    pub eye_height: f32,
    pub slot_offset: Vec3,
    pub initial_state: AvatarState,
    pub time_scale: f32,
}

impl InteractionSettings {
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_PATH);
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<RawInteractionConfig>(&raw) {
                Ok(parsed) => parsed.into(),
                Err(err) => {
                    warn!(
                        "Failed to parse {} ({}). Falling back to defaults.",
                        CONFIG_PATH, err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                warn!(
                    "Failed to read {} ({}). Falling back to defaults.",
                    CONFIG_PATH, err
                );
                Self::default()
            }
        }
    }
}

impl Default for InteractionSettings {
    fn default() -> Self {
        RawInteractionConfig::default().into()
    }
}

impl From<RawInteractionConfig> for InteractionSettings {
    fn from(value: RawInteractionConfig) -> Self {
        let interval_seconds = finite_in_range(
            "probe.interval_seconds",
            value.probe.interval_seconds,
            MIN_PROBE_INTERVAL_SECS,
            MAX_PROBE_INTERVAL_SECS,
            DEFAULT_PROBE_INTERVAL_SECS,
        );
        let probe = ProbeSettings {
            interval: Duration::from_secs_f32(interval_seconds),
            max_distance: finite_in_range(
                "probe.max_distance",
                value.probe.max_distance,
                MIN_PROBE_DISTANCE,
                MAX_PROBE_DISTANCE,
                DEFAULT_PROBE_DISTANCE,
            ),
            category: value.probe.category,
        };

        let avatar = value.avatar;
        let offset = Vec3::from_array(value.equip.slot_offset);
        let slot_offset = if offset.is_finite() {
            offset
        } else {
            warn!(
                "equip.slot_offset in {} is not finite ({:?}). Using the default.",
                CONFIG_PATH, offset
            );
            Vec3::from_array(DEFAULT_SLOT_OFFSET)
        };

        Self {
            probe,
            auto_start_targeting: value.targeting.auto_start,
            move_speed: finite_in_range(
                "avatar.move_speed",
                avatar.move_speed,
                0.0,
                MAX_MOVE_SPEED,
                DEFAULT_MOVE_SPEED,
            ),
            look_sensitivity: finite_in_range(
                "avatar.look_sensitivity",
                avatar.look_sensitivity,
                0.0,
                MAX_LOOK_SENSITIVITY,
                DEFAULT_LOOK_SENSITIVITY,
            ),
            eye_height: finite_in_range(
                "avatar.eye_height",
                avatar.eye_height,
                -MAX_EYE_HEIGHT,
                MAX_EYE_HEIGHT,
                DEFAULT_EYE_HEIGHT,
            ),
            slot_offset,
            initial_state: AvatarState::new(avatar.can_move, avatar.can_look, avatar.can_target),
            time_scale: finite_in_range(
                "simulation.time_scale",
                value.simulation.time_scale,
                MIN_TIME_SCALE,
                MAX_TIME_SCALE,
                DEFAULT_TIME_SCALE,
            ),
        }
    }
}
