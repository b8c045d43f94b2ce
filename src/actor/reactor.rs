//! The Reactor drives the layout engine from host events.
//!
//! It owns the layout state machine and a small queue of deferred tasks that
//! the host's scheduler ticks re-run. Every host call is made from inside
//! `handle_event`, so the session is only ever touched by one handler at a
//! time.

mod events;
mod replay;

#[cfg(test)]
mod testing;

use std::mem;

pub use replay::{Record, replay};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::actor;
use crate::common::collections::VecDeque;
use crate::common::config::{Config, ConfigKey};
use crate::layout_engine::resize::{self, ResizeCommit};
use crate::layout_engine::{ChatContext, LayoutEngine, detect};
use crate::model::session::LayoutMode;
use crate::sys::client::{Client, Dimension, GameState};
use crate::sys::event::{RawEvent, Script, WatchedInterface, translate};
use events::config::ConfigEventHandler;
use events::interface::InterfaceEventHandler;
use events::lifecycle::LifecycleEventHandler;
use events::script::ScriptEventHandler;
use events::tick::TickEventHandler;

pub type Sender = actor::Sender<RawEvent>;
pub type Receiver = actor::Receiver<RawEvent>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    PluginStarted,
    PluginStopped,
    GameStateChanged(GameState),
    Script(Script),
    /// A cutscene started (`true`) or ended.
    CutsceneChanged(bool),
    TransparentChatboxChanged(bool),
    ConfigChanged(ConfigChange),
    InterfaceMounted {
        interface: WatchedInterface,
        mounted: bool,
    },
    GameTick,
    BeforeRender,
    ClientTick,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigChange {
    /// One of the plugin's own settings, with the host's new value if sent.
    Setting(#[serde(with = "config_key")] ConfigKey, Option<String>),
    /// Anything that changes how the interface is drawn: the plugin's
    /// colors, interface styles, resource packs.
    Appearance,
}

mod config_key {
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer};

    use crate::common::config::ConfigKey;

    pub fn serialize<S: Serializer>(key: &ConfigKey, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(key.as_ref())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<ConfigKey, D::Error> {
        let name = String::deserialize(d)?;
        ConfigKey::from_str(&name).map_err(serde::de::Error::custom)
    }
}

/// Where the override session stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutState {
    /// Pristine; nothing asserted.
    #[default]
    Idle,
    /// Waiting for the host to present a layout the engine can classify.
    Initializing,
    /// Overrides applied.
    Active,
    Resetting,
}

impl LayoutState {
    /// Initializing or active: a settings change has to be re-applied.
    pub fn is_underway(self) -> bool { matches!(self, Self::Initializing | Self::Active) }
}

/// Work deferred to a later host tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Task {
    /// Re-run on every client tick until the layout can be classified.
    InitializeWhenReady,
    /// Second half of a window size write: the exact size, one game tick
    /// after the nudge.
    ResizeExact(Dimension),
    /// Re-fit the wide chatbox once the host has settled a cutscene change.
    RefreshChatbox,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TaskTiming {
    ClientTick,
    GameTick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TaskStatus {
    Done,
    Pending,
}

impl Task {
    fn timing(self) -> TaskTiming {
        match self {
            Task::ResizeExact(_) => TaskTiming::GameTick,
            Task::InitializeWhenReady | Task::RefreshChatbox => TaskTiming::ClientTick,
        }
    }
}

/// One-shot fixups queued for the next rendered frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct FrameFixups {
    stats_guide: bool,
    widget_background: bool,
}

/// Host flags that are only observable through change notifications.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct HostFlags {
    cutscene: bool,
    transparent_chatbox: bool,
    /// An interface with a re-fitted background is mounted.
    background_interface: bool,
}

pub struct Reactor<C: Client> {
    client: C,
    config: Config,
    layout_engine: LayoutEngine,
    state: LayoutState,
    tasks: VecDeque<Task>,
    frame_fixups: FrameFixups,
    flags: HostFlags,
    record: Record,
}

impl<C: Client> Reactor<C> {
    pub fn new(client: C, config: Config, record: Record) -> Self {
        Reactor {
            client,
            config,
            layout_engine: LayoutEngine::new(),
            state: LayoutState::Idle,
            tasks: VecDeque::new(),
            frame_fixups: FrameFixups::default(),
            flags: HostFlags::default(),
            record,
        }
    }

    pub fn client(&self) -> &C { &self.client }

    pub fn client_mut(&mut self) -> &mut C { &mut self.client }

    pub fn config(&self) -> &Config { &self.config }

    pub fn layout_engine(&self) -> &LayoutEngine { &self.layout_engine }

    pub fn state(&self) -> LayoutState { self.state }

    pub fn pending_tasks(&self) -> impl Iterator<Item = &Task> { self.tasks.iter() }

    pub fn into_client(self) -> C { self.client }

    pub async fn run(mut self, mut events: Receiver) -> Self {
        while let Some((span, raw)) = events.recv().await {
            let _guard = span.enter();
            self.handle_raw(raw);
        }
        self
    }

    /// Records a host notification and handles it if the engine cares.
    pub fn handle_raw(&mut self, raw: RawEvent) {
        self.record.on_event(&raw);
        match translate(raw) {
            Some(event) => self.handle_event(event),
            None => trace!("ignoring host event"),
        }
    }

    fn log_event(&self, event: &Event) {
        match event {
            Event::GameTick | Event::BeforeRender | Event::ClientTick => trace!(?event, "Event"),
            _ => debug!(?event, "Event"),
        }
    }

    #[instrument(name = "reactor::handle_event", skip(self), fields(state = ?self.state))]
    pub fn handle_event(&mut self, event: Event) {
        self.log_event(&event);
        match event {
            Event::PluginStarted => LifecycleEventHandler::handle_plugin_started(self),
            Event::PluginStopped => LifecycleEventHandler::handle_plugin_stopped(self),
            Event::GameStateChanged(state) => {
                LifecycleEventHandler::handle_game_state_changed(self, state)
            }
            Event::Script(script) => ScriptEventHandler::handle_script(self, script),
            Event::CutsceneChanged(active) => {
                InterfaceEventHandler::handle_cutscene_changed(self, active)
            }
            Event::TransparentChatboxChanged(transparent) => {
                InterfaceEventHandler::handle_transparent_chatbox_changed(self, transparent)
            }
            Event::ConfigChanged(change) => ConfigEventHandler::handle_config_changed(self, change),
            Event::InterfaceMounted { interface, mounted } => {
                InterfaceEventHandler::handle_interface_mounted(self, interface, mounted)
            }
            Event::GameTick => TickEventHandler::handle_game_tick(self),
            Event::BeforeRender => TickEventHandler::handle_before_render(self),
            Event::ClientTick => TickEventHandler::handle_client_tick(self),
        }
    }

    fn is_active(&self) -> bool { self.state == LayoutState::Active }

    fn chat_context(&self) -> ChatContext {
        let settings = &self.config.settings;
        ChatContext {
            wide: settings.wide_chatbox,
            centering: settings.chatbox_viewport_centering,
            center_buttons: settings.center_chatbox_buttons,
            cutscene: self.flags.cutscene,
            transparent: self.flags.transparent_chatbox,
        }
    }

    fn queue_task(&mut self, task: Task) {
        if self.tasks.contains(&task) {
            trace!(?task, "task already queued");
            return;
        }
        self.tasks.push_back(task);
    }

    /// Starts waiting for a classifiable layout. An active session has to be
    /// reset first.
    fn queue_initialization(&mut self) {
        if self.is_active() {
            debug!("already active; not re-initializing");
            return;
        }
        self.state = LayoutState::Initializing;
        self.queue_task(Task::InitializeWhenReady);
    }

    /// Applies every override for the fixed-layout look.
    fn initialize(&mut self) {
        debug!("initializing");
        self.state = LayoutState::Active;
        let chat = self.chat_context();

        self.layout_engine.resize_render_viewport(&mut self.client);
        self.layout_engine.chatbox_changed(&mut self.client, chat);
        self.resize_by_aspect_ratio();

        self.client.set_overlay_enabled(true);
        self.layout_engine.fix_interface_dimensions(&mut self.client, chat);
        self.layout_engine.reposition_minimap(&mut self.client, self.config.settings.orbs_position);
        self.layout_engine.create_frame_sprites(&mut self.client);
        self.layout_engine.widen_chat(&mut self.client, chat);
        self.layout_engine.setup_wide_chatbox(&mut self.client, chat);
    }

    /// Undoes the session. Safe on a pristine session.
    fn reset(&mut self) {
        self.state = LayoutState::Resetting;
        if self.layout_engine.reset(&mut self.client) {
            debug!("session reset");
        }
        self.frame_fixups = FrameFixups::default();
        self.state = LayoutState::Idle;
    }

    fn resize_by_aspect_ratio(&mut self) {
        match resize::resize_by_aspect_ratio(&mut self.client, &self.config.settings) {
            Some(ResizeCommit::FollowUp(size)) => self.queue_task(Task::ResizeExact(size)),
            Some(ResizeCommit::Done) | None => {}
        }
    }

    fn refresh_chatbox(&mut self) {
        let chat = self.chat_context();
        self.layout_engine.chatbox_changed(&mut self.client, chat);
        self.layout_engine.widen_chat(&mut self.client, chat);
    }

    fn run_tasks(&mut self, timing: TaskTiming) {
        let queued = mem::take(&mut self.tasks);
        for task in queued {
            if task.timing() != timing {
                self.tasks.push_back(task);
                continue;
            }
            if self.run_task(task) == TaskStatus::Pending {
                self.queue_task(task);
            }
        }
    }

    fn run_task(&mut self, task: Task) -> TaskStatus {
        match task {
            Task::InitializeWhenReady => self.try_initialize(),
            Task::ResizeExact(size) => {
                resize::finish_game_size(&mut self.client, size);
                TaskStatus::Done
            }
            Task::RefreshChatbox => {
                if self.is_active() {
                    self.refresh_chatbox();
                }
                TaskStatus::Done
            }
        }
    }

    fn try_initialize(&mut self) -> TaskStatus {
        if self.state != LayoutState::Initializing {
            debug!(state = ?self.state, "initialization cancelled");
            return TaskStatus::Done;
        }
        match detect(&self.client) {
            LayoutMode::Undetermined => TaskStatus::Pending,
            LayoutMode::ClassicResizable => {
                self.initialize();
                TaskStatus::Done
            }
            mode @ (LayoutMode::Fixed | LayoutMode::ModernResizable) => {
                debug!(%mode, "layout is not classic resizable; staying idle");
                self.state = LayoutState::Idle;
                TaskStatus::Done
            }
        }
    }
}
