//! Host widget addresses and sprite ids.
//!
//! These are specific to the host's interface data and move between host
//! revisions; nothing outside this module hard-codes one.

use crate::model::widget::WidgetId;

pub const CLASSIC_RESIZABLE_GROUP: u16 = 161;
pub const MODERN_RESIZABLE_GROUP: u16 = 164;
pub const FIXED_GROUP: u16 = 548;
pub const MINIMAP_GROUP: u16 = 160;
pub const CHATBOX_GROUP: u16 = 162;

const fn classic(child: u16) -> WidgetId { WidgetId::new(CLASSIC_RESIZABLE_GROUP, child) }

const fn minimap(child: u16) -> WidgetId { WidgetId::new(MINIMAP_GROUP, child) }

/// Root widgets whose visibility identifies the active layout.
pub const CLASSIC_RESIZABLE_ROOT: WidgetId = classic(0);
pub const MODERN_RESIZABLE_ROOT: WidgetId = WidgetId::new(MODERN_RESIZABLE_GROUP, 0);
pub const FIXED_ROOT: WidgetId = WidgetId::new(FIXED_GROUP, 0);

/// Full-canvas layer of the classic layout; its width is the canvas width.
pub const CANVAS: WidgetId = CLASSIC_RESIZABLE_ROOT;
pub const WIDGET_BACKGROUND: WidgetId = classic(14);
pub const INTERFACE_CONTAINER: WidgetId = classic(16);
pub const MINIMAP_SPRITE_CONTAINER: WidgetId = classic(22);
pub const COMPASS: WidgetId = classic(29);
pub const MINIMAP_DRAW_AREA: WidgetId = classic(30);
pub const COMPASS_CLICKBOX: WidgetId = classic(31);
pub const MINIMAP_MASK_SPRITE: WidgetId = classic(32);
pub const MINIMAP_ORB_HOLDER: WidgetId = classic(33);
pub const FULL_CANVAS_LAYER: WidgetId = classic(34);
pub const INVENTORY_BACKGROUND: WidgetId = classic(38);
pub const INVENTORY_LEFT_COLUMN: WidgetId = classic(39);
pub const INVENTORY_RIGHT_COLUMN: WidgetId = classic(40);
pub const INVENTORY_BOTTOM_BAR: WidgetId = classic(41);
pub const INVENTORY_BOTTOM_TABS: WidgetId = classic(42);
pub const INVENTORY_TOP_BAR: WidgetId = classic(57);
pub const INVENTORY_TOP_TABS: WidgetId = classic(58);
pub const RENDER_VIEWPORT: WidgetId = classic(91);
pub const CLICK_WINDOW: WidgetId = classic(92);
pub const OLD_SCHOOL_BOX: WidgetId = classic(93);
pub const MINIMAP: WidgetId = classic(95);
pub const CHATBOX_PARENT: WidgetId = classic(96);
pub const INVENTORY_PARENT: WidgetId = classic(97);
pub const VIEWPORT_INTERFACE_CONTAINER: WidgetId = classic(98);

pub const MINIMAP_CONTAINER: WidgetId = minimap(0);
pub const XP_ORB: WidgetId = minimap(6);
pub const HEALTH_ORB: WidgetId = minimap(7);
pub const PRAYER_ORB: WidgetId = minimap(18);
pub const RUN_ORB: WidgetId = minimap(27);
pub const SPEC_ORB: WidgetId = minimap(35);
pub const STORE_ORB: WidgetId = minimap(42);
pub const ACTIVITY_ADVISER_ORB: WidgetId = minimap(47);
pub const WORLD_MAP_ORB: WidgetId = minimap(48);
pub const WIKI_BANNER: WidgetId = minimap(49);

pub const CHATBOX_FRAME: WidgetId = WidgetId::new(CHATBOX_GROUP, 34);
pub const CHATBOX_BUTTONS: WidgetId = WidgetId::new(CHATBOX_GROUP, 1);
pub const CHATBOX_REPORT_BUTTON: WidgetId = WidgetId::new(CHATBOX_GROUP, 31);
pub const CHATBOX_TRANSPARENT_BACKGROUND: WidgetId = WidgetId::new(CHATBOX_GROUP, 37);
pub const DIALOG_OPTIONS: WidgetId = WidgetId::new(219, 1);
pub const REPORT_ABUSE_BACKDROP: WidgetId = WidgetId::new(875, 1);
pub const SKILLING_DIALOG_BACKDROP: WidgetId = WidgetId::new(270, 1);
pub const STATS_GUIDE: WidgetId = WidgetId::new(214, 1);

/// Sprites the fixed layout uses where the classic one differs.
pub mod sprite {
    pub const INVENTORY_BACKGROUND_RESIZABLE: i32 = 897;
    pub const INVENTORY_BACKGROUND_FIXED: i32 = 1031;
    pub const INVENTORY_BOTTOM_BAR_FIXED: i32 = 1032;
    pub const INVENTORY_TOP_BAR_FIXED: i32 = 1036;
    pub const INVENTORY_LEFT_COLUMN_TOP: i32 = 1033;
    pub const INVENTORY_LEFT_COLUMN_BOTTOM: i32 = 1034;
    pub const INVENTORY_RIGHT_COLUMN: i32 = 1035;
    pub const MINIMAP_CENTER: i32 = 1182;
    pub const MINIMAP_BOTTOM: i32 = 1611;
    pub const MINIMAP_LEFT: i32 = 1037;
    pub const MINIMAP_RIGHT: i32 = 1038;
    pub const MINIMAP_TOP_BAR_RIGHT: i32 = 1039;
    pub const MINIMAP_TOP_BAR_LEFT: i32 = 1441;
    /// Override slots the host fills with cut-up chatbox artwork.
    pub const CHATBOX_FULL: i32 = -8001;
    pub const CHATBOX_LEFT: i32 = -8002;
    pub const CHATBOX_RIGHT: i32 = -8003;
}

/// Width of the fixed layout's side panel (minimap and inventory column).
pub const SIDE_PANEL_WIDTH: i32 = 249;
pub const FIXED_GAME_WIDTH: i32 = 765;
pub const FIXED_GAME_HEIGHT: i32 = 503;
pub const MAX_GAME_WIDTH: i32 = 7680;
pub const MAX_GAME_HEIGHT: i32 = 2160;
/// Width the host designs the chatbox and its buttons for.
pub const DEFAULT_CHAT_WIDTH: i32 = 519;
pub const CHATBOX_HEIGHT: i32 = 165;
/// Height of the chat button strip left visible when chat is closed.
pub const CHAT_BUTTONS_HEIGHT: i32 = 23;
