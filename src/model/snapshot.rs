use serde::{Deserialize, Serialize};

use crate::common::collections::BTreeMap;
use crate::model::widget::{PositionMode, SizeMode, WidgetAttr, WidgetId, WidgetInfo};

/// When a snapshot is written back during a reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreOrder {
    #[default]
    Normal,
    /// Restored and revalidated only after every `Normal` snapshot, because
    /// the host lays these out relative to parents that must settle first.
    Late,
}

/// Pre-mutation state of one widget, captured on its first override in a
/// session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSnapshot {
    pub sprite_id: i32,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub x_mode: PositionMode,
    pub y_mode: PositionMode,
    pub width_mode: SizeMode,
    pub height_mode: SizeMode,
    pub hidden: bool,
    pub self_hidden: bool,
    pub order: RestoreOrder,
}

impl WidgetSnapshot {
    pub fn capture(info: &WidgetInfo, order: RestoreOrder) -> Self {
        Self {
            sprite_id: info.sprite_id,
            x: info.x,
            y: info.y,
            width: info.width,
            height: info.height,
            x_mode: info.x_mode,
            y_mode: info.y_mode,
            width_mode: info.width_mode,
            height_mode: info.height_mode,
            hidden: info.hidden,
            self_hidden: info.self_hidden,
            order,
        }
    }

    /// The writes that put a widget back into this state.
    ///
    /// Visibility is restored from the widget's own flag; the effective
    /// `hidden` value also reflects ancestors, which are restored on their
    /// own.
    pub fn restore_attrs(&self) -> [WidgetAttr; 10] {
        [
            WidgetAttr::SpriteId(self.sprite_id),
            WidgetAttr::X(self.x),
            WidgetAttr::Y(self.y),
            WidgetAttr::Width(self.width),
            WidgetAttr::Height(self.height),
            WidgetAttr::XMode(self.x_mode),
            WidgetAttr::YMode(self.y_mode),
            WidgetAttr::WidthMode(self.width_mode),
            WidgetAttr::HeightMode(self.height_mode),
            WidgetAttr::Hidden(self.self_hidden),
        ]
    }

    pub fn is_late(&self) -> bool { self.order == RestoreOrder::Late }
}

/// Snapshots for the current session, keyed by widget.
///
/// Capture-once: the first capture for an id wins until [`clear`] is called.
/// Ordered by id so restoration is deterministic.
///
/// [`clear`]: SnapshotStore::clear
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotStore {
    entries: BTreeMap<WidgetId, WidgetSnapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self { Self::default() }

    /// Records `info` unless the widget was already captured. Returns whether
    /// a new entry was created.
    pub fn capture(&mut self, info: &WidgetInfo, order: RestoreOrder) -> bool {
        if self.entries.contains_key(&info.id) {
            return false;
        }
        self.entries.insert(info.id, WidgetSnapshot::capture(info, order));
        true
    }

    pub fn get(&self, id: WidgetId) -> Option<&WidgetSnapshot> { self.entries.get(&id) }

    pub fn contains(&self, id: WidgetId) -> bool { self.entries.contains_key(&id) }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Snapshots in the given restore phase.
    pub fn phase(&self, order: RestoreOrder) -> impl Iterator<Item = (WidgetId, &WidgetSnapshot)> {
        self.entries.iter().filter(move |(_, s)| s.order == order).map(|(id, s)| (*id, s))
    }

    pub fn clear(&mut self) { self.entries.clear(); }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::model::widget::WidgetKind;

    fn info(id: WidgetId, x: i32) -> WidgetInfo {
        WidgetInfo {
            id,
            parent: None,
            kind: WidgetKind::Graphic,
            sprite_id: 897,
            x,
            y: 4,
            width: 190,
            height: 261,
            x_mode: PositionMode::AbsoluteEnd,
            y_mode: PositionMode::AbsoluteStart,
            width_mode: SizeMode::Absolute,
            height_mode: SizeMode::Minus,
            hidden: false,
            self_hidden: false,
            relative_x: x,
            relative_y: 4,
            resolved_width: 190,
            resolved_height: 261,
        }
    }

    #[test]
    fn first_capture_wins() {
        let id = WidgetId::new(161, 38);
        let mut store = SnapshotStore::new();
        assert!(store.capture(&info(id, 10), RestoreOrder::Normal));
        assert!(!store.capture(&info(id, 99), RestoreOrder::Late));

        assert_eq!(store.len(), 1);
        let snapshot = store.get(id).unwrap();
        assert_eq!(snapshot.x, 10);
        assert_eq!(snapshot.order, RestoreOrder::Normal);
    }

    #[test]
    fn phases_partition_entries() {
        let mut store = SnapshotStore::new();
        store.capture(&info(WidgetId::new(161, 1), 0), RestoreOrder::Late);
        store.capture(&info(WidgetId::new(161, 2), 0), RestoreOrder::Normal);
        store.capture(&info(WidgetId::new(161, 3), 0), RestoreOrder::Late);

        let normal: Vec<_> = store.phase(RestoreOrder::Normal).map(|(id, _)| id).collect();
        let late: Vec<_> = store.phase(RestoreOrder::Late).map(|(id, _)| id).collect();
        assert_eq!(normal, vec![WidgetId::new(161, 2)]);
        assert_eq!(late, vec![WidgetId::new(161, 1), WidgetId::new(161, 3)]);
    }

    #[test]
    fn clear_allows_fresh_capture() {
        let id = WidgetId::new(161, 38);
        let mut store = SnapshotStore::new();
        store.capture(&info(id, 10), RestoreOrder::Normal);
        store.clear();
        assert!(store.is_empty());
        assert!(store.capture(&info(id, 42), RestoreOrder::Normal));
        assert_eq!(store.get(id).map(|s| s.x), Some(42));
    }
}
