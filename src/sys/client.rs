//! The capabilities the engine needs from the host application.
//!
//! The host owns every widget. The engine only ever holds [`WidgetId`]s and
//! re-resolves them on each call, so any lookup may come back empty.

use serde::{Deserialize, Serialize};

use crate::model::widget::{WidgetAttr, WidgetId, WidgetInfo, WidgetKind};

/// Host login state, as far as the engine cares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    LoginScreen,
    Loading,
    LoggedIn,
    Hopping,
    ConnectionLost,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    pub width: i32,
    pub height: i32,
}

impl Dimension {
    pub const fn new(width: i32, height: i32) -> Self { Self { width, height } }
}

/// Element accessor: lookup, attribute writes, structural edits and
/// re-layout of host widgets.
///
/// Must only be called from the host's designated thread.
pub trait WidgetAccess {
    fn widget(&self, id: WidgetId) -> Option<WidgetInfo>;

    /// Writes one attribute. Returns `false` if the widget does not exist.
    fn set(&mut self, id: WidgetId, attr: WidgetAttr) -> bool;

    /// Creates a dynamic child under `parent`, or `None` if the parent does
    /// not exist.
    fn create_child(&mut self, parent: WidgetId, kind: WidgetKind) -> Option<WidgetId>;

    fn delete_all_children(&mut self, parent: WidgetId);

    /// Removes one dynamic child. `false` if it is gone or not dynamic.
    fn remove_child(&mut self, child: WidgetId) -> bool;

    fn static_children(&self, id: WidgetId) -> Vec<WidgetId>;

    fn nested_children(&self, id: WidgetId) -> Vec<WidgetId>;

    fn dynamic_children(&self, id: WidgetId) -> Vec<WidgetId>;

    fn revalidate(&mut self, id: WidgetId);

    /// Revalidates the widget and its scrollable children.
    fn revalidate_scroll(&mut self, id: WidgetId);

    fn set_all(&mut self, id: WidgetId, attrs: &[WidgetAttr]) -> bool {
        attrs.iter().all(|attr| self.set(id, *attr))
    }

    fn parent(&self, id: WidgetId) -> Option<WidgetId> { self.widget(id)?.parent }
}

/// Everything else the engine reads from, or does to, the host.
pub trait Client: WidgetAccess {
    fn game_state(&self) -> GameState;

    fn canvas_width(&self) -> i32;

    /// Size of the stretched game canvas in screen pixels.
    fn stretched_dimensions(&self) -> Dimension;

    /// The host's persisted window size setting.
    fn game_size(&self) -> Option<Dimension>;

    /// Writes the window size setting. The host ignores a write of the value
    /// it already holds.
    fn set_game_size(&mut self, size: Dimension);

    /// Registers or removes the static border overlay.
    fn set_overlay_enabled(&mut self, enabled: bool);

    /// Installs the chatbox edge/middle sprite overrides used by the wide
    /// chatbox background children.
    fn install_chatbox_sprites(&mut self);

    /// Drops sprite overrides and flushes the widget sprite cache.
    fn restore_sprites(&mut self);
}
