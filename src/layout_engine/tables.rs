//! The fixed-layout override tables and the passes that apply them.

use tracing::debug;

use super::ids::{self, sprite};
use super::transform::{Guard, Ownership, Revalidate, SpriteSpec, TransformSpec};
use super::LayoutEngine;
use crate::common::config::OrbsPosition;
use crate::model::widget::{PositionMode, SizeMode, WidgetAttr, WidgetId};
use crate::sys::client::WidgetAccess;

use PositionMode::{AbsoluteCenter, AbsoluteEnd, AbsoluteStart};

/// Minimap frame, mask and orb holder, sized to the fixed layout's side
/// panel.
pub const MINIMAP_FRAME: [TransformSpec; 4] = [
    TransformSpec::new(ids::MINIMAP).size(249, 207).late(),
    TransformSpec::new(ids::MINIMAP_MASK_SPRITE).hidden(true).revalidate(Revalidate::None),
    TransformSpec::new(ids::MINIMAP_CONTAINER)
        .size(249, 197)
        .size_modes(SizeMode::Absolute, SizeMode::Absolute),
    TransformSpec::new(ids::MINIMAP_ORB_HOLDER).size(249, 197),
];

const fn minimap_piece(child: u16, x: i32, y: i32) -> TransformSpec {
    TransformSpec::new(WidgetId::new(ids::CLASSIC_RESIZABLE_GROUP, child))
        .x_mode(AbsoluteStart)
        .at(x, y)
        .when(Guard::XModeIs(AbsoluteEnd))
        .late()
}

/// Right-anchored minimap pieces re-anchored to the left edge. Only touched
/// while still right-anchored, so a second pass leaves them alone.
pub const MINIMAP_PIECES: [TransformSpec; 8] = [
    minimap_piece(23, 44, 5),
    minimap_piece(24, 44, 45),
    minimap_piece(25, 44, 101),
    minimap_piece(26, 44, 126),
    minimap_piece(27, 44, 141),
    minimap_piece(28, 44, 156),
    minimap_piece(ids::MINIMAP_DRAW_AREA.child(), 50, 9),
    minimap_piece(ids::MINIMAP_MASK_SPRITE.child(), 44, 1),
];

pub const ORBS_FIXED_MODE: [TransformSpec; 2] = [
    TransformSpec::new(ids::RUN_ORB).at(10, 97),
    TransformSpec::new(ids::SPEC_ORB).at(32, 122),
];

pub const ORBS_MORE_CLEARANCE: [TransformSpec; 2] = [
    TransformSpec::new(ids::RUN_ORB).at(2, 97),
    TransformSpec::new(ids::SPEC_ORB).at(23, 124),
];

/// Left-column orbs and the compass, identical under both presets.
pub const MINIMAP_ORBS: [TransformSpec; 5] = [
    TransformSpec::new(ids::XP_ORB).at(0, 11),
    TransformSpec::new(ids::HEALTH_ORB).at(0, 31),
    TransformSpec::new(ids::PRAYER_ORB).at(0, 65),
    TransformSpec::new(ids::COMPASS_CLICKBOX).at(26, 1),
    TransformSpec::new(ids::COMPASS).at(28, 3),
];

/// Right-aligned orbs the host repositions on its own. Each guard matches
/// the host's classic-layout default so a re-assertion only fires after the
/// host has undone it.
pub const RIGHT_ORBS: [TransformSpec; 4] = [
    TransformSpec::new(ids::WORLD_MAP_ORB).at(23, 109).when(Guard::XEquals(0)),
    TransformSpec::new(ids::WIKI_BANNER).at(21, 129).when(Guard::XEquals(0)),
    TransformSpec::new(ids::STORE_ORB)
        .at(13, 77)
        .size(34, 34)
        .modes(AbsoluteEnd, AbsoluteStart)
        .size_modes(SizeMode::Absolute, SizeMode::Absolute)
        .when(Guard::XEquals(85)),
    TransformSpec::new(ids::ACTIVITY_ADVISER_ORB)
        .at(13, 44)
        .size(34, 34)
        .modes(AbsoluteEnd, AbsoluteStart)
        .size_modes(SizeMode::Absolute, SizeMode::Absolute)
        .when(Guard::XEquals(55)),
];

/// Inventory panel bounds and sprites. Runs before the decorative sprites
/// are added so they land in the resized parent.
pub const INVENTORY_BOUNDS: [TransformSpec; 9] = [
    TransformSpec::new(ids::INVENTORY_PARENT).size(249, 336).late().revalidate(Revalidate::Plain),
    TransformSpec::new(ids::INVENTORY_BACKGROUND)
        .at(28, 37)
        .size(190, 261)
        .sprite(sprite::INVENTORY_BACKGROUND_FIXED)
        .revalidate(Revalidate::Plain),
    TransformSpec::new(ids::INVENTORY_LEFT_COLUMN).hidden(true).revalidate(Revalidate::Plain),
    TransformSpec::new(ids::INVENTORY_RIGHT_COLUMN).hidden(true).revalidate(Revalidate::Plain),
    TransformSpec::new(ids::INVENTORY_BOTTOM_BAR)
        .size(246, 37)
        .sprite(sprite::INVENTORY_BOTTOM_BAR_FIXED)
        .revalidate(Revalidate::Plain),
    TransformSpec::new(ids::INVENTORY_BOTTOM_TABS).x(2).late().revalidate(Revalidate::Plain),
    TransformSpec::new(ids::INVENTORY_TOP_BAR)
        .y(298)
        .size(249, 38)
        .sprite(sprite::INVENTORY_TOP_BAR_FIXED)
        .revalidate(Revalidate::Plain),
    TransformSpec::new(ids::INVENTORY_TOP_TABS).x(2).late().revalidate(Revalidate::Plain),
    TransformSpec::new(ids::VIEWPORT_INTERFACE_CONTAINER).x(28).revalidate(Revalidate::Plain),
];

const fn minimap_sprite(sprite_id: i32, x: i32, y: i32, w: i32, h: i32) -> SpriteSpec {
    SpriteSpec::new(ids::MINIMAP_SPRITE_CONTAINER, sprite_id).bounds(x, y, w, h)
}

const fn inventory_sprite(sprite_id: i32, x: i32, y: i32, w: i32, h: i32) -> SpriteSpec {
    SpriteSpec::new(ids::INVENTORY_PARENT, sprite_id).bounds(x, y, w, h)
}

/// Fixed-layout frame pieces with no classic-layout counterpart.
pub const MINIMAP_SPRITES: [SpriteSpec; 6] = [
    minimap_sprite(sprite::MINIMAP_CENTER, 29, 4, 172, 156),
    minimap_sprite(sprite::MINIMAP_BOTTOM, 0, 160, 249, 8).modes(AbsoluteCenter, AbsoluteStart),
    minimap_sprite(sprite::MINIMAP_LEFT, 0, 4, 29, 156),
    minimap_sprite(sprite::MINIMAP_RIGHT, 0, 4, 48, 156).modes(AbsoluteEnd, AbsoluteStart),
    minimap_sprite(sprite::MINIMAP_TOP_BAR_RIGHT, 48, 0, 717, 4).modes(AbsoluteEnd, AbsoluteStart),
    minimap_sprite(sprite::MINIMAP_TOP_BAR_LEFT, 0, 0, 48, 4).modes(AbsoluteEnd, AbsoluteStart),
];

pub const INVENTORY_SPRITES: [SpriteSpec; 4] = [
    inventory_sprite(sprite::INVENTORY_RIGHT_COLUMN, 0, 37, 28, 261).modes(AbsoluteEnd, AbsoluteEnd),
    inventory_sprite(sprite::INVENTORY_LEFT_COLUMN_TOP, 0, 38, 31, 133),
    inventory_sprite(sprite::INVENTORY_LEFT_COLUMN_BOTTOM, 3, 171, 28, 128),
    inventory_sprite(sprite::INVENTORY_LEFT_COLUMN_TOP, 0, 0, 3, 170).modes(AbsoluteStart, AbsoluteEnd),
];

impl LayoutEngine {
    /// Regroups the minimap, its orbs and the compass into the fixed layout
    /// arrangement. Skipped entirely until all four frame widgets exist.
    pub fn reposition_minimap<C: WidgetAccess>(&mut self, client: &mut C, orbs: OrbsPosition) {
        let frame_mounted = MINIMAP_FRAME.iter().all(|spec| client.widget(spec.target).is_some());
        if !frame_mounted {
            debug!("minimap frame not mounted; skipping regroup");
            return;
        }

        self.apply_all(client, &MINIMAP_FRAME);
        self.apply_all(client, &MINIMAP_PIECES);
        match orbs {
            OrbsPosition::FixedMode => self.apply_all(client, &ORBS_FIXED_MODE),
            OrbsPosition::MoreClearance => self.apply_all(client, &ORBS_MORE_CLEARANCE),
        }
        self.apply_all(client, &MINIMAP_ORBS);
        self.fix_right_orbs(client);
        client.revalidate_scroll(ids::MINIMAP);
    }

    /// Re-asserts the right-aligned orb positions the host keeps resetting.
    pub fn fix_right_orbs<C: WidgetAccess>(&mut self, client: &mut C) {
        self.apply_all(client, &RIGHT_ORBS);
    }

    /// Resizes the inventory panel and adds the fixed-layout frame sprites
    /// around it and the minimap. All-or-nothing on the two parents.
    pub fn create_frame_sprites<C: WidgetAccess>(&mut self, client: &mut C) {
        let draw_area_parent = client.parent(ids::MINIMAP_DRAW_AREA);
        if draw_area_parent.is_none() || client.widget(ids::INVENTORY_PARENT).is_none() {
            debug!("minimap or inventory parent not mounted; skipping frame sprites");
            return;
        }

        self.apply_all(client, &INVENTORY_BOUNDS);
        for spec in MINIMAP_SPRITES.iter().chain(INVENTORY_SPRITES.iter()) {
            self.create_sprite(client, spec, Ownership::Session);
        }
    }

    /// Shrinks the 3D viewport by the side panel width so nothing renders
    /// beneath the panel. The viewport is not snapshotted; reset reverts it
    /// explicitly.
    pub fn resize_render_viewport<C: WidgetAccess>(&mut self, client: &mut C) -> bool {
        if client.widget(ids::RENDER_VIEWPORT).is_none() {
            return false;
        }
        self.session.mark_modified();
        client.set(ids::RENDER_VIEWPORT, WidgetAttr::Width(ids::SIDE_PANEL_WIDTH));
        client.revalidate_scroll(ids::RENDER_VIEWPORT);
        true
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::model::snapshot::RestoreOrder;
    use crate::sys::memory::MemoryClient;

    #[test]
    fn fixed_mode_preset_places_run_orb() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        engine.reposition_minimap(&mut client, OrbsPosition::FixedMode);
        let run = client.widget(ids::RUN_ORB).unwrap();
        assert_eq!((run.x, run.y), (10, 97));
        let spec = client.widget(ids::SPEC_ORB).unwrap();
        assert_eq!((spec.x, spec.y), (32, 122));
    }

    #[test]
    fn more_clearance_preset_places_run_orb() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        engine.reposition_minimap(&mut client, OrbsPosition::MoreClearance);
        let run = client.widget(ids::RUN_ORB).unwrap();
        assert_eq!((run.x, run.y), (2, 97));
        let spec = client.widget(ids::SPEC_ORB).unwrap();
        assert_eq!((spec.x, spec.y), (23, 124));
    }

    #[test]
    fn minimap_pieces_are_reanchored_once() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        let piece = WidgetId::new(ids::CLASSIC_RESIZABLE_GROUP, 25);

        engine.reposition_minimap(&mut client, OrbsPosition::FixedMode);
        let info = client.widget(piece).unwrap();
        assert_eq!(info.x_mode, AbsoluteStart);
        assert_eq!((info.x, info.y), (44, 101));
        assert_eq!(engine.snapshot(piece).map(|s| s.order), Some(RestoreOrder::Late));
        assert_eq!(engine.snapshot(piece).map(|s| s.x_mode), Some(AbsoluteEnd));

        let snapshots = engine.session().snapshots.len();
        engine.reposition_minimap(&mut client, OrbsPosition::FixedMode);
        assert_eq!(engine.session().snapshots.len(), snapshots);
    }

    #[test]
    fn mask_sprite_keeps_its_normal_restore_order() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        engine.reposition_minimap(&mut client, OrbsPosition::FixedMode);
        let mask = engine.snapshot(ids::MINIMAP_MASK_SPRITE).unwrap();
        assert_eq!(mask.order, RestoreOrder::Normal);
        assert!(client.widget(ids::MINIMAP_MASK_SPRITE).unwrap().self_hidden);
    }

    #[test]
    fn right_orbs_respect_their_guards() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        client.set(ids::STORE_ORB, WidgetAttr::X(40));

        engine.fix_right_orbs(&mut client);
        assert_eq!(client.widget(ids::STORE_ORB).unwrap().x, 40);
        assert!(engine.snapshot(ids::STORE_ORB).is_none());
        let activity = client.widget(ids::ACTIVITY_ADVISER_ORB).unwrap();
        assert_eq!((activity.x, activity.y, activity.width), (13, 44, 34));
    }

    #[test]
    fn frame_sprites_resize_inventory_first() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        engine.create_frame_sprites(&mut client);

        let background = client.widget(ids::INVENTORY_BACKGROUND).unwrap();
        assert_eq!(background.sprite_id, sprite::INVENTORY_BACKGROUND_FIXED);
        assert!(client.widget(ids::INVENTORY_LEFT_COLUMN).unwrap().self_hidden);
        assert_eq!(client.dynamic_children(ids::MINIMAP_SPRITE_CONTAINER).len(), 6);
        assert_eq!(client.dynamic_children(ids::INVENTORY_PARENT).len(), 4);
        assert_eq!(
            engine.session().created_under(),
            &[ids::MINIMAP_SPRITE_CONTAINER, ids::INVENTORY_PARENT]
        );
    }

    #[test]
    fn frame_sprites_need_both_parents() {
        let mut client = MemoryClient::classic_resizable();
        client.remove(ids::INVENTORY_PARENT);
        let mut engine = LayoutEngine::new();
        engine.create_frame_sprites(&mut client);
        assert!(client.dynamic_children(ids::MINIMAP_SPRITE_CONTAINER).is_empty());
        assert!(!engine.is_modified());
    }
}
