//! Re-assertions for overrides the host undoes on its own. Each one checks
//! that the host's default is back before writing.

use tracing::debug;

use super::ids::{self, sprite};
use super::tables::MINIMAP_SPRITES;
use super::transform::{Applied, Guard, Ownership, Revalidate, TransformSpec};
use super::LayoutEngine;
use crate::model::widget::WidgetAttr;
use crate::sys::client::WidgetAccess;

/// Fixed-layout inventory background, only while the host's resizable
/// default is showing.
pub const INVENTORY_BACKGROUND_SPRITE: TransformSpec = TransformSpec::new(ids::INVENTORY_BACKGROUND)
    .sprite(sprite::INVENTORY_BACKGROUND_FIXED)
    .when(Guard::SpriteIs(sprite::INVENTORY_BACKGROUND_RESIZABLE))
    .revalidate(Revalidate::None);

impl LayoutEngine {
    pub fn fix_inventory_background<C: WidgetAccess>(&mut self, client: &mut C) -> bool {
        self.apply(client, &INVENTORY_BACKGROUND_SPRITE) == Applied::Written
    }

    /// Recreates the minimap frame sprites if the host wiped their container
    /// during a rebuild. Leftovers of a partial wipe are cleared first; the
    /// inventory sprites are left as they are.
    pub fn check_minimap_sprites<C: WidgetAccess>(&mut self, client: &mut C) {
        if client.widget(ids::MINIMAP_SPRITE_CONTAINER).is_none() {
            return;
        }
        let present = client.dynamic_children(ids::MINIMAP_SPRITE_CONTAINER).len();
        if present < MINIMAP_SPRITES.len() {
            debug!(present, "minimap frame sprites missing; recreating");
            client.delete_all_children(ids::MINIMAP_SPRITE_CONTAINER);
            for spec in &MINIMAP_SPRITES {
                self.create_sprite(client, spec, Ownership::Session);
            }
        }
    }

    /// The host hides the inventory during cutscenes and does not bring it
    /// back under the fixed-layout arrangement.
    pub fn unhide_inventory<C: WidgetAccess>(&mut self, client: &mut C) {
        if client.widget(ids::INVENTORY_PARENT).is_some_and(|inv| inv.hidden) {
            client.set(ids::INVENTORY_PARENT, WidgetAttr::Hidden(false));
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::sys::memory::MemoryClient;

    #[test]
    fn background_is_swapped_only_from_the_host_default() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();

        for _ in 0..3 {
            client.set(ids::INVENTORY_BACKGROUND, WidgetAttr::SpriteId(sprite::INVENTORY_BACKGROUND_RESIZABLE));
            assert!(engine.fix_inventory_background(&mut client));
            assert_eq!(
                client.widget(ids::INVENTORY_BACKGROUND).unwrap().sprite_id,
                sprite::INVENTORY_BACKGROUND_FIXED
            );
        }

        client.set(ids::INVENTORY_BACKGROUND, WidgetAttr::SpriteId(4242));
        assert!(!engine.fix_inventory_background(&mut client));
        assert_eq!(client.widget(ids::INVENTORY_BACKGROUND).unwrap().sprite_id, 4242);
    }

    #[test]
    fn wiped_minimap_sprites_are_recreated() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        engine.create_frame_sprites(&mut client);
        engine.check_minimap_sprites(&mut client);
        assert_eq!(client.dynamic_children(ids::MINIMAP_SPRITE_CONTAINER).len(), 6);

        client.delete_all_children(ids::MINIMAP_SPRITE_CONTAINER);
        engine.check_minimap_sprites(&mut client);
        assert_eq!(client.dynamic_children(ids::MINIMAP_SPRITE_CONTAINER).len(), 6);
    }

    #[test]
    fn minimap_recreation_leaves_inventory_sprites_alone() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        engine.create_frame_sprites(&mut client);
        let inventory = client.dynamic_children(ids::INVENTORY_PARENT);
        assert_eq!(inventory.len(), 4);

        client.delete_all_children(ids::MINIMAP_SPRITE_CONTAINER);
        engine.check_minimap_sprites(&mut client);
        assert_eq!(client.dynamic_children(ids::INVENTORY_PARENT), inventory);

        let leftover = client.dynamic_children(ids::MINIMAP_SPRITE_CONTAINER)[0];
        client.remove(leftover);
        engine.check_minimap_sprites(&mut client);
        assert_eq!(client.dynamic_children(ids::MINIMAP_SPRITE_CONTAINER).len(), 6);
        assert_eq!(client.dynamic_children(ids::INVENTORY_PARENT), inventory);
    }

    #[test]
    fn hidden_inventory_is_shown() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        client.set(ids::INVENTORY_PARENT, WidgetAttr::Hidden(true));
        engine.unhide_inventory(&mut client);
        assert!(!client.widget(ids::INVENTORY_PARENT).unwrap().hidden);
    }
}
