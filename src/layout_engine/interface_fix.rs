//! Re-stretching of game sub-interfaces (bank, shops, settings, minigame
//! overlays) that the host sizes for the fixed layout's viewport.
//!
//! The host gives no type information for these children. Stale ones are
//! recognised by their stored size alone: a "fill minus offset" mode with an
//! offset in a narrow band around the fixed side panel (width) or chat
//! panel (height). A child legitimately sized in that band is misread as
//! stale; there is no host signal to tell the two apart.

use std::ops::RangeInclusive;

use tracing::trace;

use super::chatbox::{is_chatbox_open, ChatContext};
use super::error::FixupError;
use super::ids;
use super::LayoutEngine;
use crate::model::snapshot::RestoreOrder;
use crate::model::widget::{PositionMode, SizeMode, WidgetAttr, WidgetId, WidgetInfo};
use crate::sys::client::WidgetAccess;

const STALE_WIDTHS: RangeInclusive<i32> = 248..=254;
const STALE_HEIGHTS: RangeInclusive<i32> = 164..=172;
const WALK_DEPTH: usize = 4;
/// Stored width the host leaves on the old-school box in the fixed layout.
const OLD_SCHOOL_BOX_FIXED_WIDTH: i32 = 250;

pub fn looks_stale_fixed_width(width: i32, mode: SizeMode) -> bool {
    mode == SizeMode::Minus && STALE_WIDTHS.contains(&width)
}

pub fn looks_stale_fixed_height(height: i32, mode: SizeMode) -> bool {
    mode == SizeMode::Minus && STALE_HEIGHTS.contains(&height)
}

/// Clears stale widths (and, when asked, heights) below `parent`, static
/// children first, then nested ones.
fn clear_stale_children<C: WidgetAccess>(
    client: &mut C,
    parent: WidgetId,
    clear_heights: bool,
    depth: usize,
) {
    if depth >= WALK_DEPTH {
        return;
    }
    for child in client.static_children(parent) {
        clear_stale(client, child, clear_heights);
        client.revalidate_scroll(child);
        clear_stale_children(client, child, clear_heights, depth + 1);
    }
    for child in client.nested_children(parent) {
        clear_stale(client, child, clear_heights);
        clear_stale_children(client, child, clear_heights, depth + 1);
    }
}

fn clear_stale<C: WidgetAccess>(client: &mut C, id: WidgetId, clear_heights: bool) {
    let Some(info) = client.widget(id) else {
        return;
    };
    if looks_stale_fixed_width(info.width, info.width_mode) {
        trace!(widget = %id, width = info.width, "clearing stale width");
        client.set(id, WidgetAttr::Width(0));
    }
    if clear_heights && looks_stale_fixed_height(info.height, info.height_mode) {
        trace!(widget = %id, height = info.height, "clearing stale height");
        client.set(id, WidgetAttr::Height(0));
    }
}

fn require<C: WidgetAccess>(client: &C, id: WidgetId) -> Result<WidgetInfo, FixupError> {
    client.widget(id).ok_or(FixupError::WidgetMissing(id))
}

/// Re-fits the four background strips drawn around an interface such as
/// the fairy ring so they frame it inside the shrunken viewport.
pub fn fix_widget_background<C: WidgetAccess>(
    client: &mut C,
    chat: ChatContext,
) -> Result<(), FixupError> {
    require(client, ids::WIDGET_BACKGROUND)?;
    let interface = require(client, ids::INTERFACE_CONTAINER)?;
    let viewport = require(client, ids::RENDER_VIEWPORT)?;
    let osb = require(client, ids::OLD_SCHOOL_BOX)?;

    let strips = client.dynamic_children(ids::WIDGET_BACKGROUND);
    let &[top, bottom, left, right] = strips.as_slice() else {
        return Err(FixupError::UnexpectedChildCount {
            parent: ids::WIDGET_BACKGROUND,
            expected: 4,
            found: strips.len(),
        });
    };

    let top_height = interface.relative_y;
    let left_width = interface.relative_x;
    let right_width = osb.resolved_width - interface.resolved_width - left_width;
    client.set(left, WidgetAttr::Width(left_width));
    client.set(right, WidgetAttr::Width(right_width));

    let bottom_height = if chat.wide {
        let osb_parent_height = osb
            .parent
            .and_then(|parent| client.widget(parent))
            .map_or(0, |parent| parent.resolved_height);
        if is_chatbox_open(client, chat.cutscene) {
            client.set(bottom, WidgetAttr::Y(osb_parent_height - osb.resolved_height));
            osb.resolved_height - interface.resolved_height - top_height
        } else {
            client.set(bottom, WidgetAttr::Y(ids::CHAT_BUTTONS_HEIGHT));
            osb_parent_height - interface.resolved_height - top_height - ids::CHAT_BUTTONS_HEIGHT
        }
    } else {
        viewport.resolved_height - top_height - interface.resolved_height
    };

    client.set(top, WidgetAttr::Height(top_height));
    client.set(bottom, WidgetAttr::Height(bottom_height));
    client.set(left, WidgetAttr::Y(top_height));
    client.set(right, WidgetAttr::Y(top_height));
    client.revalidate_scroll(ids::WIDGET_BACKGROUND);
    Ok(())
}

/// Re-centers the skill guide the host opens left-aligned.
pub fn fix_stats_guide<C: WidgetAccess>(client: &mut C) -> bool {
    if !client.set(ids::STATS_GUIDE, WidgetAttr::XMode(PositionMode::AbsoluteCenter)) {
        return false;
    }
    client.revalidate_scroll(ids::STATS_GUIDE);
    true
}

impl LayoutEngine {
    /// Stretches the in-game click window over the shrunken viewport and
    /// clears stale sizes in the overlays mounted under it.
    pub fn fix_ingame_overlay_widgets<C: WidgetAccess>(&mut self, client: &mut C, chat: ChatContext) {
        let Some(viewport) = client.widget(ids::RENDER_VIEWPORT) else {
            return;
        };
        if self.capture(client, ids::CLICK_WINDOW, RestoreOrder::Normal).is_none() {
            return;
        }
        client.set_all(ids::CLICK_WINDOW, &[
            WidgetAttr::XMode(PositionMode::AbsoluteStart),
            WidgetAttr::YMode(PositionMode::AbsoluteStart),
            WidgetAttr::Width(viewport.resolved_width),
            WidgetAttr::Height(viewport.resolved_height),
        ]);
        client.revalidate_scroll(ids::CLICK_WINDOW);

        let clear_heights = chat.wide && chat.centering && is_chatbox_open(client, chat.cutscene);
        clear_stale_children(client, ids::CLICK_WINDOW, clear_heights, 0);
    }

    /// Resets interface bounding boxes after the host recalculates them:
    /// the old-school box and its parent are re-anchored to the viewport.
    pub fn fix_interface_dimensions<C: WidgetAccess>(&mut self, client: &mut C, chat: ChatContext) {
        self.fix_ingame_overlay_widgets(client, chat);

        let Some(viewport) = client.widget(ids::RENDER_VIEWPORT) else {
            return;
        };
        let Some(osb) = self.capture(client, ids::OLD_SCHOOL_BOX, RestoreOrder::Normal) else {
            return;
        };
        let Some(parent) = osb.parent.and_then(|id| self.capture(client, id, RestoreOrder::Normal))
        else {
            return;
        };

        if parent.x_mode == PositionMode::AbsoluteCenter || parent.y_mode == PositionMode::AbsoluteCenter {
            client.set_all(parent.id, &[
                WidgetAttr::XMode(PositionMode::AbsoluteStart),
                WidgetAttr::YMode(PositionMode::AbsoluteStart),
                WidgetAttr::Width(viewport.resolved_width),
            ]);
            client.revalidate_scroll(parent.id);
        }

        if !chat.wide {
            if parent.height != viewport.resolved_height {
                client.set(parent.id, WidgetAttr::Height(viewport.resolved_height));
                client.revalidate_scroll(parent.id);
            }
        } else {
            let (parent_height, osb_height) =
                if is_chatbox_open(client, chat.cutscene) && chat.centers_viewport() {
                    (viewport.resolved_height, 0)
                } else {
                    (viewport.resolved_height + chat.viewport_offset(), ids::CHATBOX_HEIGHT)
                };
            client.set(parent.id, WidgetAttr::Height(parent_height));
            client.revalidate_scroll(parent.id);
            client.set(osb.id, WidgetAttr::Height(osb_height));
            client.revalidate_scroll(osb.id);
        }

        if osb.width == OLD_SCHOOL_BOX_FIXED_WIDTH {
            client.set(osb.id, WidgetAttr::Width(0));
            client.revalidate_scroll(osb.id);
        }
        for child in client.static_children(osb.id) {
            client.revalidate_scroll(child);
        }
    }
}
