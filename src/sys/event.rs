//! Raw host notifications and their one-time translation into reactor
//! events.
//!
//! Numeric script, varbit and interface ids are only interpreted here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::actor::reactor::{ConfigChange, Event};
use crate::common::config::{ConfigKey, PLUGIN_CONFIG_GROUP};
use crate::sys::client::GameState;

/// A host notification exactly as delivered, before interpretation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawEvent {
    PluginStarted,
    PluginStopped,
    GameStateChanged(GameState),
    ScriptPostFired { script_id: u32 },
    VarbitChanged { varbit_id: u32, value: i32 },
    ConfigChanged {
        group: String,
        key: String,
        /// New value in the host's string form, when the host provides it.
        #[serde(default)]
        value: Option<String>,
    },
    WidgetLoaded { group_id: u16 },
    WidgetClosed { group_id: u16, unload: bool },
    /// Server tick (~600ms).
    GameTick,
    /// Client frame, before widgets are drawn.
    BeforeRender,
    /// Client scheduler tick; runs deferred tasks.
    ClientTick,
}

/// Host scripts whose completion the engine reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    /// Interface bounding boxes recalculated (bank, settings panel, ...).
    InterfaceBoundsRecalculated,
    StatsGuideOpened,
    WindowResized,
    /// Right-aligned minimap orbs repositioned.
    RightOrbsRepositioned,
    /// Inventory background sprite reset to the layout default.
    InventoryBackgroundReset,
    LayoutModeChanged,
    ChatboxToggled,
    /// Minigame overlay layout (party orbs and similar).
    MinigameOverlay,
}

impl Script {
    pub fn from_id(script_id: u32) -> Option<Self> {
        Some(match script_id {
            909 => Self::InterfaceBoundsRecalculated,
            654 => Self::StatsGuideOpened,
            904 => Self::WindowResized,
            1699 | 3305 => Self::RightOrbsRepositioned,
            902 => Self::InventoryBackgroundReset,
            901 => Self::LayoutModeChanged,
            175 | 178 | 299 | 677 => Self::ChatboxToggled,
            4731 => Self::MinigameOverlay,
            _ => return None,
        })
    }
}

/// Interfaces drawn over a background that has to be re-fitted around them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchedInterface {
    FairyRing,
    CanoeSelect,
    CanoeDestination,
    BoatTravel,
}

impl WatchedInterface {
    pub fn from_group(group_id: u16) -> Option<Self> {
        Some(match group_id {
            398 => Self::FairyRing,
            416 => Self::CanoeSelect,
            647 => Self::CanoeDestination,
            224 => Self::BoatTravel,
            _ => return None,
        })
    }

    /// Whether the background is re-fitted on the first frame after the
    /// interface mounts. Boat travel is only re-fitted on chat toggles.
    pub fn refits_on_mount(self) -> bool { !matches!(self, Self::BoatTravel) }
}

const CUTSCENE_VARBIT: u32 = 542;
const TRANSPARENT_CHATBOX_VARBIT: u32 = 4608;

const APPEARANCE_GROUPS: [&str; 2] = ["interfaceStyles", "resourcepacks"];

/// Maps a raw notification to the reactor's vocabulary. Notifications the
/// engine does not care about map to `None`.
pub fn translate(raw: RawEvent) -> Option<Event> {
    let event = match raw {
        RawEvent::PluginStarted => Event::PluginStarted,
        RawEvent::PluginStopped => Event::PluginStopped,
        RawEvent::GameStateChanged(state) => Event::GameStateChanged(state),
        RawEvent::ScriptPostFired { script_id } => Event::Script(Script::from_id(script_id)?),
        RawEvent::VarbitChanged { varbit_id, value } => match varbit_id {
            CUTSCENE_VARBIT => Event::CutsceneChanged(value == 1),
            TRANSPARENT_CHATBOX_VARBIT => match value {
                0 => Event::TransparentChatboxChanged(false),
                1 => Event::TransparentChatboxChanged(true),
                _ => return None,
            },
            _ => return None,
        },
        RawEvent::ConfigChanged { group, key, value } => {
            Event::ConfigChanged(config_change(&group, &key, value)?)
        }
        RawEvent::WidgetLoaded { group_id } => Event::InterfaceMounted {
            interface: WatchedInterface::from_group(group_id)?,
            mounted: true,
        },
        RawEvent::WidgetClosed { group_id, unload } => {
            if !unload {
                return None;
            }
            Event::InterfaceMounted {
                interface: WatchedInterface::from_group(group_id)?,
                mounted: false,
            }
        }
        RawEvent::GameTick => Event::GameTick,
        RawEvent::BeforeRender => Event::BeforeRender,
        RawEvent::ClientTick => Event::ClientTick,
    };
    Some(event)
}

fn config_change(group: &str, key: &str, value: Option<String>) -> Option<ConfigChange> {
    if group == PLUGIN_CONFIG_GROUP {
        return Some(match ConfigKey::from_str(key) {
            Ok(key) => ConfigChange::Setting(key, value),
            // Colors and other overlay-only keys.
            Err(_) => ConfigChange::Appearance,
        });
    }
    if APPEARANCE_GROUPS.contains(&group) || (group == "runelite" && key == "interfacestylesplugin") {
        return Some(ConfigChange::Appearance);
    }
    trace!(group, key, "ignoring config change");
    None
}
