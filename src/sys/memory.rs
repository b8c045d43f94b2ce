//! An in-memory host: a widget tree with the host's geometry rules and a
//! journal of every call made against it.
//!
//! Used by the tests and by the replay binary.

use serde::{Deserialize, Serialize};

use crate::common::collections::BTreeMap;
use crate::layout_engine::ids;
use crate::model::session::LayoutMode;
use crate::model::widget::{PositionMode, SizeMode, WidgetAttr, WidgetId, WidgetInfo, WidgetKind};
use crate::sys::client::{Client, Dimension, GameState, WidgetAccess};

/// Created children are addressed in a group of their own.
const DYNAMIC_GROUP: u16 = u16::MAX;
/// Proportional values are in 1/16384ths.
const PROPORTIONAL_SHIFT: u32 = 14;

/// One call made against the host, in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostOp {
    Set(WidgetId, WidgetAttr),
    Create { parent: WidgetId, child: WidgetId },
    DeleteChildren(WidgetId),
    RemoveChild(WidgetId),
    Revalidate(WidgetId),
    RevalidateScroll(WidgetId),
    SetGameSize(Dimension),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Link {
    Root,
    Static,
    Nested,
    Dynamic,
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<WidgetId>,
    link: Link,
    kind: WidgetKind,
    sprite_id: i32,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    x_mode: PositionMode,
    y_mode: PositionMode,
    width_mode: SizeMode,
    height_mode: SizeMode,
    self_hidden: bool,
    no_click_through: bool,
    sprite_tiling: bool,
}

impl Node {
    fn new(kind: WidgetKind) -> Self {
        Self {
            parent: None,
            link: Link::Root,
            kind,
            sprite_id: -1,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            x_mode: PositionMode::AbsoluteStart,
            y_mode: PositionMode::AbsoluteStart,
            width_mode: SizeMode::Absolute,
            height_mode: SizeMode::Absolute,
            self_hidden: false,
            no_click_through: false,
            sprite_tiling: false,
        }
    }

    fn apply(&mut self, attr: WidgetAttr) {
        match attr {
            WidgetAttr::SpriteId(v) => self.sprite_id = v,
            WidgetAttr::X(v) => self.x = v,
            WidgetAttr::Y(v) => self.y = v,
            WidgetAttr::Width(v) => self.width = v,
            WidgetAttr::Height(v) => self.height = v,
            WidgetAttr::XMode(v) => self.x_mode = v,
            WidgetAttr::YMode(v) => self.y_mode = v,
            WidgetAttr::WidthMode(v) => self.width_mode = v,
            WidgetAttr::HeightMode(v) => self.height_mode = v,
            WidgetAttr::Hidden(v) => self.self_hidden = v,
            WidgetAttr::NoClickThrough(v) => self.no_click_through = v,
            WidgetAttr::SpriteTiling(v) => self.sprite_tiling = v,
        }
    }
}

#[derive(Clone, Copy)]
struct Resolved {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    hidden: bool,
}

fn resolve_size(value: i32, mode: SizeMode, extent: i32) -> i32 {
    match mode {
        SizeMode::Absolute => value,
        SizeMode::Minus => extent - value,
        SizeMode::Proportional => (extent * value) >> PROPORTIONAL_SHIFT,
    }
}

fn resolve_position(value: i32, mode: PositionMode, extent: i32, size: i32) -> i32 {
    let proportional = (extent * value) >> PROPORTIONAL_SHIFT;
    match mode {
        PositionMode::AbsoluteStart => value,
        PositionMode::AbsoluteCenter => (extent - size) / 2 + value,
        PositionMode::AbsoluteEnd => extent - size - value,
        PositionMode::ProportionalStart => proportional,
        PositionMode::ProportionalCenter => (extent - size) / 2 + proportional,
        PositionMode::ProportionalEnd => extent - size - proportional,
    }
}

pub struct MemoryClient {
    nodes: BTreeMap<WidgetId, Node>,
    next_dynamic: u16,
    journal: Vec<HostOp>,
    pub game_state: GameState,
    pub canvas: Dimension,
    pub stretched: Dimension,
    pub game_size: Option<Dimension>,
    /// Every window size write, in order.
    pub game_size_writes: Vec<Dimension>,
    pub overlay_enabled: bool,
    pub chatbox_sprites_installed: bool,
}

/// Sets up a widget inserted with [`MemoryClient::insert`].
pub struct NodeBuilder<'a> {
    node: &'a mut Node,
}

impl NodeBuilder<'_> {
    pub fn parent(self, parent: WidgetId) -> Self {
        self.node.parent = Some(parent);
        self.node.link = Link::Static;
        self
    }

    /// Mounts the widget as an interface nested under `parent`.
    pub fn nested_under(self, parent: WidgetId) -> Self {
        self.node.parent = Some(parent);
        self.node.link = Link::Nested;
        self
    }

    pub fn at(self, x: i32, y: i32) -> Self {
        self.node.x = x;
        self.node.y = y;
        self
    }

    pub fn size(self, width: i32, height: i32) -> Self {
        self.node.width = width;
        self.node.height = height;
        self
    }

    pub fn modes(self, x_mode: PositionMode, y_mode: PositionMode) -> Self {
        self.node.x_mode = x_mode;
        self.node.y_mode = y_mode;
        self
    }

    pub fn size_modes(self, width_mode: SizeMode, height_mode: SizeMode) -> Self {
        self.node.width_mode = width_mode;
        self.node.height_mode = height_mode;
        self
    }

    /// Fills the parent: zero offsets in "minus" mode.
    pub fn fill(self) -> Self { self.size(0, 0).size_modes(SizeMode::Minus, SizeMode::Minus) }

    pub fn sprite(self, sprite_id: i32) -> Self {
        self.node.sprite_id = sprite_id;
        self
    }

    pub fn hidden(self, hidden: bool) -> Self {
        self.node.self_hidden = hidden;
        self
    }
}

impl MemoryClient {
    /// An empty, logged-in host with the given canvas.
    pub fn new(canvas: Dimension) -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_dynamic: 0,
            journal: Vec::new(),
            game_state: GameState::LoggedIn,
            canvas,
            stretched: canvas,
            game_size: None,
            game_size_writes: Vec::new(),
            overlay_enabled: false,
            chatbox_sprites_installed: false,
        }
    }

    pub fn insert(&mut self, id: WidgetId, kind: WidgetKind) -> NodeBuilder<'_> {
        let node = self
            .nodes
            .entry(id)
            .and_modify(|node| *node = Node::new(kind))
            .or_insert_with(|| Node::new(kind));
        NodeBuilder { node }
    }

    /// Unmounts a widget along with everything below it.
    pub fn remove(&mut self, id: WidgetId) {
        for child in self.children(id, None) {
            self.remove(child);
        }
        self.nodes.remove(&id);
    }

    /// Makes exactly one layout root visible, or none for `Undetermined`.
    pub fn set_layout(&mut self, mode: LayoutMode) {
        let roots = [
            (ids::CLASSIC_RESIZABLE_ROOT, LayoutMode::ClassicResizable),
            (ids::MODERN_RESIZABLE_ROOT, LayoutMode::ModernResizable),
            (ids::FIXED_ROOT, LayoutMode::Fixed),
        ];
        for (root, root_mode) in roots {
            if let Some(node) = self.nodes.get_mut(&root) {
                node.self_hidden = root_mode != mode;
            }
        }
    }

    pub fn take_journal(&mut self) -> Vec<HostOp> { std::mem::take(&mut self.journal) }

    /// Every mounted widget, ordered by id.
    pub fn dump(&self) -> Vec<WidgetInfo> {
        self.nodes.keys().filter_map(|id| self.widget(*id)).collect()
    }

    fn children(&self, parent: WidgetId, link: Option<Link>) -> Vec<WidgetId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.parent == Some(parent) && link.is_none_or(|l| node.link == l))
            .map(|(id, _)| *id)
            .collect()
    }

    fn resolve(&self, id: WidgetId) -> Option<Resolved> {
        let node = self.nodes.get(&id)?;
        let (extent_w, extent_h, parent_hidden) = match node.parent.and_then(|p| self.resolve(p)) {
            Some(parent) => (parent.width, parent.height, parent.hidden),
            None => (self.canvas.width, self.canvas.height, false),
        };
        let width = resolve_size(node.width, node.width_mode, extent_w);
        let height = resolve_size(node.height, node.height_mode, extent_h);
        Some(Resolved {
            x: resolve_position(node.x, node.x_mode, extent_w, width),
            y: resolve_position(node.y, node.y_mode, extent_h, height),
            width,
            height,
            hidden: parent_hidden || node.self_hidden,
        })
    }

    /// The classic resizable layout as the host builds it at login, on a
    /// 1280x720 canvas. Only the widgets the engine touches are present.
    pub fn classic_resizable() -> Self {
        use PositionMode::{AbsoluteCenter as Center, AbsoluteEnd as End, AbsoluteStart as Start};
        use WidgetKind::{Graphic, Layer};

        let mut client = Self::new(Dimension::new(1280, 720));
        client.game_size = Some(Dimension::new(1280, 720));
        let classic = |child| WidgetId::new(ids::CLASSIC_RESIZABLE_GROUP, child);
        let chat = |child| WidgetId::new(ids::CHATBOX_GROUP, child);

        client.insert(ids::CLASSIC_RESIZABLE_ROOT, Layer).fill();
        client.insert(ids::MODERN_RESIZABLE_ROOT, Layer).fill().hidden(true);
        client.insert(ids::FIXED_ROOT, Layer).size(765, 503).hidden(true);

        let root = ids::CANVAS;
        client.insert(ids::FULL_CANVAS_LAYER, Layer).parent(root).fill();
        client.insert(ids::RENDER_VIEWPORT, Layer).parent(root).fill().modes(Start, Center);
        client.insert(ids::CLICK_WINDOW, Layer).parent(root).fill().modes(Center, Center);

        // Sub-interfaces mount into the old-school box.
        let interface_layer = classic(94);
        client.insert(interface_layer, Layer).parent(root).size(1280, 720).modes(Center, Center);
        client.insert(ids::OLD_SCHOOL_BOX, Layer).parent(interface_layer).fill();
        client.insert(ids::WIDGET_BACKGROUND, Layer).parent(ids::OLD_SCHOOL_BOX).fill();
        client
            .insert(ids::INTERFACE_CONTAINER, Layer)
            .parent(ids::OLD_SCHOOL_BOX)
            .size(512, 334)
            .modes(Center, Center);
        for _ in 0..4 {
            client.create_child(ids::WIDGET_BACKGROUND, Graphic);
        }

        client.insert(ids::MINIMAP, Layer).parent(root).size(208, 198).modes(End, Start);
        client.insert(ids::MINIMAP_SPRITE_CONTAINER, Layer).parent(ids::MINIMAP).fill();
        for (child, x, y) in [(23, 4, 4), (24, 4, 44), (25, 4, 100), (26, 4, 125), (27, 4, 140), (28, 4, 155)] {
            client.insert(classic(child), Graphic).parent(ids::MINIMAP).at(x, y).size(4, 40).modes(End, Start);
        }
        client
            .insert(ids::MINIMAP_DRAW_AREA, Layer)
            .parent(ids::MINIMAP_SPRITE_CONTAINER)
            .at(10, 8)
            .size(154, 155)
            .modes(End, Start);
        client
            .insert(ids::MINIMAP_MASK_SPRITE, Graphic)
            .parent(ids::MINIMAP)
            .at(4, 0)
            .size(172, 156)
            .modes(End, Start);
        client.insert(ids::COMPASS, Graphic).parent(ids::MINIMAP).at(34, 6).size(36, 36);
        client.insert(ids::COMPASS_CLICKBOX, Layer).parent(ids::MINIMAP).at(32, 4).size(40, 40);
        client.insert(ids::MINIMAP_ORB_HOLDER, Layer).parent(ids::MINIMAP).fill();
        client.insert(ids::MINIMAP_CONTAINER, Layer).nested_under(ids::MINIMAP_ORB_HOLDER).fill();
        let orbs = [
            (ids::XP_ORB, 0, 22, Start),
            (ids::HEALTH_ORB, 0, 37, Start),
            (ids::PRAYER_ORB, 0, 71, Start),
            (ids::RUN_ORB, 10, 103, Start),
            (ids::SPEC_ORB, 32, 128, Start),
            (ids::STORE_ORB, 85, 6, Start),
            (ids::ACTIVITY_ADVISER_ORB, 55, 6, Start),
            (ids::WORLD_MAP_ORB, 0, 115, End),
            (ids::WIKI_BANNER, 0, 135, End),
        ];
        for (orb, x, y, x_mode) in orbs {
            client
                .insert(orb, Layer)
                .parent(ids::MINIMAP_CONTAINER)
                .at(x, y)
                .size(57, 34)
                .modes(x_mode, Start);
        }

        client.insert(ids::INVENTORY_PARENT, Layer).parent(root).size(204, 275).modes(End, End);
        let inventory = [
            (ids::INVENTORY_BACKGROUND, 0, 37, 190, 261, ids::sprite::INVENTORY_BACKGROUND_RESIZABLE),
            (ids::INVENTORY_LEFT_COLUMN, 0, 37, 7, 261, 1173),
            (ids::INVENTORY_RIGHT_COLUMN, 197, 37, 7, 261, 1174),
            (ids::INVENTORY_BOTTOM_BAR, 0, 238, 204, 37, 1175),
            (ids::INVENTORY_BOTTOM_TABS, 0, 238, 204, 37, -1),
            (ids::INVENTORY_TOP_BAR, 0, 0, 204, 37, 1176),
            (ids::INVENTORY_TOP_TABS, 0, 0, 204, 37, -1),
            (ids::VIEWPORT_INTERFACE_CONTAINER, 7, 37, 190, 261, -1),
        ];
        for (id, x, y, width, height, sprite_id) in inventory {
            client
                .insert(id, Graphic)
                .parent(ids::INVENTORY_PARENT)
                .at(x, y)
                .size(width, height)
                .sprite(sprite_id);
        }

        client.insert(ids::CHATBOX_PARENT, Layer).parent(root).size(519, 165).modes(Start, End);
        let chat_root = chat(0);
        client.insert(chat_root, Layer).nested_under(ids::CHATBOX_PARENT).fill();
        client.insert(ids::CHATBOX_FRAME, Layer).parent(chat_root).size(519, 142);
        client.insert(ids::CHATBOX_TRANSPARENT_BACKGROUND, Layer).parent(chat_root).fill();
        client.create_child(ids::CHATBOX_TRANSPARENT_BACKGROUND, Graphic);
        client
            .insert(ids::CHATBOX_BUTTONS, Layer)
            .parent(chat_root)
            .size(519, 23)
            .modes(Start, End);
        client.insert(chat(2), Layer).parent(ids::CHATBOX_BUTTONS).size(519, 23);
        client.insert(chat(3), Graphic).parent(chat(2)).size(519, 23).sprite(1018);
        let buttons = [(chat(4), 5), (chat(8), 62), (chat(12), 119), (ids::CHATBOX_REPORT_BUTTON, 417)];
        for (button, x) in buttons {
            let width = if button == ids::CHATBOX_REPORT_BUTTON { 79 } else { 56 };
            client.insert(button, Layer).parent(ids::CHATBOX_BUTTONS).at(x, 0).size(width, 22);
            let sprite = WidgetId::new(ids::CHATBOX_GROUP, button.child() + 1);
            client.insert(sprite, Graphic).parent(button).size(width, 22).sprite(1022);
        }
        client
            .insert(ids::REPORT_ABUSE_BACKDROP, Graphic)
            .nested_under(ids::CHATBOX_PARENT)
            .fill()
            .sprite(1017);

        client.journal.clear();
        client
    }
}

impl WidgetAccess for MemoryClient {
    fn widget(&self, id: WidgetId) -> Option<WidgetInfo> {
        let node = self.nodes.get(&id)?;
        let resolved = self.resolve(id)?;
        Some(WidgetInfo {
            id,
            parent: node.parent,
            kind: node.kind,
            sprite_id: node.sprite_id,
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
            x_mode: node.x_mode,
            y_mode: node.y_mode,
            width_mode: node.width_mode,
            height_mode: node.height_mode,
            hidden: resolved.hidden,
            self_hidden: node.self_hidden,
            relative_x: resolved.x,
            relative_y: resolved.y,
            resolved_width: resolved.width,
            resolved_height: resolved.height,
        })
    }

    fn set(&mut self, id: WidgetId, attr: WidgetAttr) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        node.apply(attr);
        self.journal.push(HostOp::Set(id, attr));
        true
    }

    fn create_child(&mut self, parent: WidgetId, kind: WidgetKind) -> Option<WidgetId> {
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        // Ids wrap; live children keep theirs.
        let child = (0..=u16::MAX)
            .map(|step| WidgetId::new(DYNAMIC_GROUP, self.next_dynamic.wrapping_add(step)))
            .find(|id| !self.nodes.contains_key(id))?;
        self.next_dynamic = child.child().wrapping_add(1);
        let mut node = Node::new(kind);
        node.parent = Some(parent);
        node.link = Link::Dynamic;
        self.nodes.insert(child, node);
        self.journal.push(HostOp::Create { parent, child });
        Some(child)
    }

    fn delete_all_children(&mut self, parent: WidgetId) {
        for child in self.children(parent, Some(Link::Dynamic)) {
            self.remove(child);
        }
        self.journal.push(HostOp::DeleteChildren(parent));
    }

    fn remove_child(&mut self, child: WidgetId) -> bool {
        if self.nodes.get(&child).is_none_or(|node| node.link != Link::Dynamic) {
            return false;
        }
        self.remove(child);
        self.journal.push(HostOp::RemoveChild(child));
        true
    }

    fn static_children(&self, id: WidgetId) -> Vec<WidgetId> { self.children(id, Some(Link::Static)) }

    fn nested_children(&self, id: WidgetId) -> Vec<WidgetId> { self.children(id, Some(Link::Nested)) }

    fn dynamic_children(&self, id: WidgetId) -> Vec<WidgetId> { self.children(id, Some(Link::Dynamic)) }

    fn revalidate(&mut self, id: WidgetId) { self.journal.push(HostOp::Revalidate(id)); }

    fn revalidate_scroll(&mut self, id: WidgetId) { self.journal.push(HostOp::RevalidateScroll(id)); }
}

impl Client for MemoryClient {
    fn game_state(&self) -> GameState { self.game_state }

    fn canvas_width(&self) -> i32 { self.canvas.width }

    fn stretched_dimensions(&self) -> Dimension { self.stretched }

    fn game_size(&self) -> Option<Dimension> { self.game_size }

    fn set_game_size(&mut self, size: Dimension) {
        self.game_size = Some(size);
        self.game_size_writes.push(size);
        self.journal.push(HostOp::SetGameSize(size));
    }

    fn set_overlay_enabled(&mut self, enabled: bool) { self.overlay_enabled = enabled; }

    fn install_chatbox_sprites(&mut self) { self.chatbox_sprites_installed = true; }

    fn restore_sprites(&mut self) { self.chatbox_sprites_installed = false; }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;

    #[test]
    fn geometry_follows_position_and_size_modes() {
        let mut client = MemoryClient::new(Dimension::new(1000, 600));
        let parent = WidgetId::new(1, 0);
        let child = WidgetId::new(1, 1);
        client.insert(parent, WidgetKind::Layer).fill();
        client
            .insert(child, WidgetKind::Graphic)
            .parent(parent)
            .at(10, 20)
            .size(100, 50)
            .modes(PositionMode::AbsoluteEnd, PositionMode::AbsoluteCenter);

        let info = client.widget(child).unwrap();
        assert_eq!((info.relative_x, info.relative_y), (890, 295));

        client.set(child, WidgetAttr::WidthMode(SizeMode::Minus));
        assert_eq!(client.widget(child).unwrap().resolved_width, 900);
        client.set(child, WidgetAttr::WidthMode(SizeMode::Proportional));
        client.set(child, WidgetAttr::Width(8192));
        assert_eq!(client.widget(child).unwrap().resolved_width, 500);
    }

    #[test]
    fn hidden_is_inherited() {
        let mut client = MemoryClient::classic_resizable();
        client.set(ids::MINIMAP, WidgetAttr::Hidden(true));
        let orb = client.widget(ids::RUN_ORB).unwrap();
        assert!(orb.hidden);
        assert!(!orb.self_hidden);
    }

    #[test]
    fn wrapped_dynamic_ids_skip_live_children() {
        let mut client = MemoryClient::classic_resizable();
        let backgrounds = client.dynamic_children(ids::WIDGET_BACKGROUND);
        client.next_dynamic = u16::MAX;

        let last = client.create_child(ids::INVENTORY_PARENT, WidgetKind::Graphic).unwrap();
        let wrapped = client.create_child(ids::INVENTORY_PARENT, WidgetKind::Graphic).unwrap();
        assert_eq!(last.child(), u16::MAX);
        assert_eq!(wrapped.child(), 5);
        assert_eq!(client.dynamic_children(ids::WIDGET_BACKGROUND), backgrounds);
        assert_eq!(client.dynamic_children(ids::INVENTORY_PARENT), vec![wrapped, last]);
    }

    #[test]
    fn children_are_split_by_link() {
        let mut client = MemoryClient::classic_resizable();
        assert_eq!(client.nested_children(ids::MINIMAP_ORB_HOLDER), vec![ids::MINIMAP_CONTAINER]);
        assert!(client.static_children(ids::MINIMAP_ORB_HOLDER).is_empty());

        let created = client.create_child(ids::INVENTORY_PARENT, WidgetKind::Graphic).unwrap();
        assert_eq!(client.dynamic_children(ids::INVENTORY_PARENT), vec![created]);
        client.delete_all_children(ids::INVENTORY_PARENT);
        assert!(client.widget(created).is_none());
        assert!(client.widget(ids::INVENTORY_BACKGROUND).is_some());
    }

    #[test]
    fn writes_to_unmounted_widgets_are_refused() {
        let mut client = MemoryClient::classic_resizable();
        assert!(!client.set(ids::STATS_GUIDE, WidgetAttr::X(1)));
        assert!(client.take_journal().is_empty());
        assert_eq!(client.create_child(ids::STATS_GUIDE, WidgetKind::Graphic), None);
    }

    #[test]
    fn fixture_starts_in_classic_layout() {
        let client = MemoryClient::classic_resizable();
        assert_eq!(client.canvas_width(), 1280);
        assert_eq!(client.static_children(ids::CHATBOX_BUTTONS).len(), 4);
        assert_eq!(client.dynamic_children(ids::WIDGET_BACKGROUND).len(), 4);
        assert_eq!(client.dynamic_children(ids::CHATBOX_TRANSPARENT_BACKGROUND).len(), 1);
    }
}
