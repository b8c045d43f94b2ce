use serde::{Deserialize, Serialize};
use strum::Display;

use crate::model::snapshot::SnapshotStore;
use crate::model::widget::WidgetId;

/// The host's mutually exclusive top-level interface arrangements.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LayoutMode {
    /// Not logged in, or the interface has not been built yet.
    #[default]
    Undetermined,
    Fixed,
    ClassicResizable,
    ModernResizable,
}

/// Override bookkeeping for the span between the first applied transform and
/// the next full reset.
///
/// A non-empty snapshot store or any created children imply `modified`.
#[derive(Default, Debug, Serialize, Deserialize)]
pub struct LayoutSession {
    modified: bool,
    pub snapshots: SnapshotStore,
    /// Parents that received engine-created children. Reset deletes all of
    /// their dynamic children.
    created_under: Vec<WidgetId>,
    /// Children created under parents that also hold host children. Reset
    /// removes them one by one.
    created: Vec<WidgetId>,
}

impl LayoutSession {
    pub fn new() -> Self { Self::default() }

    pub fn is_modified(&self) -> bool { self.modified }

    pub fn mark_modified(&mut self) { self.modified = true; }

    pub fn note_created_under(&mut self, parent: WidgetId) {
        self.modified = true;
        if !self.created_under.contains(&parent) {
            self.created_under.push(parent);
        }
    }

    pub fn created_under(&self) -> &[WidgetId] { &self.created_under }

    pub fn note_created(&mut self, child: WidgetId) {
        self.modified = true;
        self.created.push(child);
    }

    pub fn created(&self) -> &[WidgetId] { &self.created }

    /// Returns the session to pristine.
    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.created_under.clear();
        self.created.clear();
        self.modified = false;
    }
}
