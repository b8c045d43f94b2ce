use tracing::{debug, trace};

use super::ids;
use super::LayoutEngine;
use crate::model::snapshot::RestoreOrder;
use crate::model::widget::{PositionMode, WidgetAttr, WidgetId};
use crate::sys::client::{Client, WidgetAccess};

impl LayoutEngine {
    /// Undoes every override of the session and returns it to pristine.
    ///
    /// Created children go first, then the viewport, then snapshots in two
    /// phases: all `Normal` entries are written and revalidated before any
    /// `Late` entry is touched. A pristine session is left alone. Returns
    /// whether anything was restored.
    pub fn reset<C: Client>(&mut self, client: &mut C) -> bool {
        if !self.session.is_modified() {
            trace!("session pristine; nothing to reset");
            return false;
        }

        for parent in self.session.created_under() {
            client.delete_all_children(*parent);
        }
        for child in self.session.created() {
            client.remove_child(*child);
        }
        client.set_overlay_enabled(false);
        revert_render_viewport(client);

        let normal = self.restore_phase(client, RestoreOrder::Normal);
        let late = self.restore_phase(client, RestoreOrder::Late);
        debug!(normal, late, "restored widget snapshots");

        self.session.clear();
        client.restore_sprites();
        true
    }

    /// Writes back one phase, then revalidates it as a batch. Widgets the
    /// host has since unmounted are skipped.
    fn restore_phase<C: WidgetAccess>(&self, client: &mut C, order: RestoreOrder) -> usize {
        let restored: Vec<WidgetId> = self
            .session
            .snapshots
            .phase(order)
            .filter(|(id, snapshot)| client.set_all(*id, &snapshot.restore_attrs()))
            .map(|(id, _)| id)
            .collect();
        for id in &restored {
            client.revalidate_scroll(*id);
        }
        restored.len()
    }
}

/// Returns the viewport to the classic layout's full-canvas fill.
fn revert_render_viewport<C: WidgetAccess>(client: &mut C) {
    let reverted = client.set_all(ids::RENDER_VIEWPORT, &[
        WidgetAttr::Width(0),
        WidgetAttr::Height(0),
        WidgetAttr::YMode(PositionMode::AbsoluteCenter),
    ]);
    if reverted {
        client.revalidate_scroll(ids::RENDER_VIEWPORT);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::common::config::OrbsPosition;
    use crate::layout_engine::chatbox::ChatContext;
    use crate::layout_engine::transform::TransformSpec;
    use crate::sys::memory::{HostOp, MemoryClient};

    fn initialize(engine: &mut LayoutEngine, client: &mut MemoryClient) {
        engine.resize_render_viewport(client);
        engine.fix_interface_dimensions(client, ChatContext::default());
        engine.reposition_minimap(client, OrbsPosition::FixedMode);
        engine.create_frame_sprites(client);
    }

    #[test]
    fn pristine_reset_is_a_no_op() {
        let mut client = MemoryClient::classic_resizable();
        client.take_journal();
        let mut engine = LayoutEngine::new();
        assert!(!engine.reset(&mut client));
        assert!(client.take_journal().is_empty());
    }

    #[test]
    fn reset_restores_every_captured_attribute() {
        let mut client = MemoryClient::classic_resizable();
        let before = client.dump();
        let mut engine = LayoutEngine::new();
        initialize(&mut engine, &mut client);
        assert_ne!(client.dump(), before);

        assert!(engine.reset(&mut client));
        assert_eq!(client.dump(), before);
        assert!(engine.session().snapshots.is_empty());
        assert!(!engine.is_modified());
        assert!(!client.overlay_enabled);
    }

    #[test]
    fn run_orb_returns_to_its_pre_session_position() {
        let mut client = MemoryClient::classic_resizable();
        let original = client.widget(ids::RUN_ORB).unwrap();
        let mut engine = LayoutEngine::new();
        engine.reposition_minimap(&mut client, OrbsPosition::MoreClearance);
        assert_eq!(client.widget(ids::RUN_ORB).map(|w| (w.x, w.y)), Some((2, 97)));

        engine.reset(&mut client);
        let restored = client.widget(ids::RUN_ORB).unwrap();
        assert_eq!((restored.x, restored.y), (original.x, original.y));
    }

    #[test]
    fn created_children_are_deleted_before_any_restore() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        initialize(&mut engine, &mut client);
        client.take_journal();

        engine.reset(&mut client);
        let journal = client.take_journal();
        let last_delete = journal
            .iter()
            .rposition(|op| matches!(op, HostOp::DeleteChildren(_)))
            .unwrap();
        let first_restore = journal
            .iter()
            .position(|op| matches!(op, HostOp::Set(id, _) if *id != ids::RENDER_VIEWPORT))
            .unwrap();
        assert!(last_delete < first_restore);
        assert!(client.dynamic_children(ids::MINIMAP_SPRITE_CONTAINER).is_empty());
        assert!(client.dynamic_children(ids::INVENTORY_PARENT).is_empty());
    }

    #[test]
    fn late_entries_revalidate_after_all_normal_entries() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        initialize(&mut engine, &mut client);
        let late: Vec<WidgetId> =
            engine.session().snapshots.phase(RestoreOrder::Late).map(|(id, _)| id).collect();
        let normal: Vec<WidgetId> =
            engine.session().snapshots.phase(RestoreOrder::Normal).map(|(id, _)| id).collect();
        assert!(!late.is_empty());
        client.take_journal();

        engine.reset(&mut client);
        let journal = client.take_journal();
        let position = |wanted: &[WidgetId], last: bool| {
            let matches = |op: &HostOp| matches!(op, HostOp::RevalidateScroll(id) if wanted.contains(id));
            if last {
                journal.iter().rposition(matches)
            } else {
                journal.iter().position(matches)
            }
        };
        let last_normal = position(&normal, true).unwrap();
        let first_late = position(&late, false).unwrap();
        assert!(last_normal < first_late);
        let first_late_write = journal
            .iter()
            .position(|op| matches!(op, HostOp::Set(id, _) if late.contains(id)))
            .unwrap();
        assert!(last_normal < first_late_write);
    }

    #[test]
    fn next_session_captures_fresh_values() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        let spec = TransformSpec::new(ids::RUN_ORB).at(10, 97);
        engine.apply(&mut client, &spec);
        engine.reset(&mut client);

        client.set(ids::RUN_ORB, WidgetAttr::X(7));
        engine.apply(&mut client, &spec);
        assert_eq!(engine.snapshot(ids::RUN_ORB).map(|s| s.x), Some(7));
    }

    #[test]
    fn unmounted_widgets_are_skipped_on_restore() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        engine.reposition_minimap(&mut client, OrbsPosition::FixedMode);
        client.remove(ids::RUN_ORB);

        assert!(engine.reset(&mut client));
        assert!(engine.session().snapshots.is_empty());
    }
}
