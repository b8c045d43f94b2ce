//! Wide chatbox: a chat panel stretched across the full width left of the
//! side panel, with the viewport shortened to sit above it.

use tracing::{debug, trace};

use super::ids::{self, sprite};
use super::transform::{Ownership, Revalidate, SpriteSpec, TransformSpec};
use super::LayoutEngine;
use crate::model::snapshot::RestoreOrder;
use crate::model::widget::{PositionMode, SizeMode, WidgetAttr};
use crate::sys::client::{Client, WidgetAccess};

/// Chat-related settings and host flags, read fresh for every pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChatContext {
    pub wide: bool,
    pub centering: bool,
    pub center_buttons: bool,
    pub cutscene: bool,
    pub transparent: bool,
}

impl ChatContext {
    /// Height kept below the viewport when chat is closed or not centered.
    pub fn viewport_offset(self) -> i32 {
        if self.transparent { 0 } else { ids::CHAT_BUTTONS_HEIGHT }
    }

    pub fn centers_viewport(self) -> bool { self.centering && !self.transparent }
}

/// Whether the chat panel is expanded. During cutscenes the frame stays
/// visible while chat is collapsed; the background's children tell them
/// apart.
pub fn is_chatbox_open<C: WidgetAccess + ?Sized>(client: &C, cutscene: bool) -> bool {
    let Some(frame) = client.widget(ids::CHATBOX_FRAME) else {
        return false;
    };
    if cutscene {
        return !frame.hidden
            && !client.dynamic_children(ids::CHATBOX_TRANSPARENT_BACKGROUND).is_empty();
    }
    !frame.hidden
}

/// Width of the stretched middle chat background for a canvas width.
pub fn middle_background_width(canvas_width: i32) -> i32 {
    let chat_width = f64::from(canvas_width - ids::SIDE_PANEL_WIDTH);
    (579.0 / 519.0 * chat_width - 60.0).ceil() as i32
}

impl LayoutEngine {
    /// Re-fits the viewport height and the chat background after chat opens,
    /// closes or the window is resized.
    pub fn chatbox_changed<C: Client>(&mut self, client: &mut C, chat: ChatContext) {
        if !chat.wide {
            return;
        }
        let (Some(_), Some(_), Some(chat_parent)) = (
            client.widget(ids::RENDER_VIEWPORT),
            client.widget(ids::CHATBOX_FRAME),
            client.widget(ids::CHATBOX_PARENT),
        ) else {
            trace!("chat widgets not mounted");
            return;
        };

        let base = if is_chatbox_open(client, chat.cutscene) && chat.centering {
            ids::CHATBOX_HEIGHT
        } else {
            chat.viewport_offset()
        };
        self.session.mark_modified();
        client.set_all(ids::RENDER_VIEWPORT, &[
            WidgetAttr::Height(base + chat_parent.y),
            WidgetAttr::YMode(PositionMode::AbsoluteStart),
        ]);
        client.revalidate_scroll(ids::RENDER_VIEWPORT);

        match client.dynamic_children(ids::CHATBOX_TRANSPARENT_BACKGROUND).as_slice() {
            [_] => self.setup_wide_chatbox(client, chat),
            [_, middle, _, _] => {
                client.set(*middle, WidgetAttr::Width(middle_background_width(client.canvas_width())));
            }
            _ => {}
        }

        self.fix_interface_dimensions(client, chat);
    }

    /// Stretches the chat panel to the canvas width minus the side panel and
    /// hides dialogue backdrops drawn for the default width.
    pub fn widen_chat<C: Client>(&mut self, client: &mut C, chat: ChatContext) {
        if !chat.wide {
            return;
        }
        let Some(canvas) = client.widget(ids::CANVAS) else {
            return;
        };
        let width = canvas.resolved_width - ids::SIDE_PANEL_WIDTH;

        self.apply_all(client, &[
            TransformSpec::new(ids::CHATBOX_PARENT)
                .width(width)
                .x(0)
                .x_mode(PositionMode::AbsoluteStart),
            TransformSpec::new(ids::CHATBOX_FRAME).width(width),
            TransformSpec::new(ids::DIALOG_OPTIONS)
                .x(0)
                .x_mode(PositionMode::AbsoluteCenter)
                .revalidate(Revalidate::ParentScroll),
            TransformSpec::new(ids::REPORT_ABUSE_BACKDROP).hidden(true).revalidate(Revalidate::None),
            TransformSpec::new(ids::SKILLING_DIALOG_BACKDROP)
                .hidden(true)
                .revalidate(Revalidate::None),
        ]);
        self.position_chatbox_buttons(client, chat);
    }

    /// Centers the chat buttons in the wider panel, or stretches them
    /// proportionally. Offsets are computed from the captured originals so
    /// repeated passes do not drift.
    pub fn position_chatbox_buttons<C: WidgetAccess>(&mut self, client: &mut C, chat: ChatContext) {
        let Some(buttons) = self.capture(client, ids::CHATBOX_BUTTONS, RestoreOrder::Normal) else {
            return;
        };
        client.set_all(ids::CHATBOX_BUTTONS, &[
            WidgetAttr::Width(0),
            WidgetAttr::WidthMode(SizeMode::Minus),
        ]);
        client.revalidate_scroll(ids::CHATBOX_BUTTONS);

        // Buttons vanish during some cutscenes and break the chat render.
        let chat_parent_at_top = client.widget(ids::CHATBOX_PARENT).is_some_and(|p| p.y == 0);
        if chat.cutscene && buttons.self_hidden && chat_parent_at_top {
            client.set(ids::CHATBOX_BUTTONS, WidgetAttr::Hidden(false));
        }

        let chat_width = client.widget(ids::CHATBOX_BUTTONS).map_or(0, |b| b.resolved_width);
        let report_mounted = client.widget(ids::CHATBOX_REPORT_BUTTON).is_some();

        for (index, button) in client.static_children(ids::CHATBOX_BUTTONS).into_iter().enumerate() {
            // The first child holds the strip behind the buttons.
            if index == 0 {
                if let Some(&strip) = client.static_children(button).first() {
                    self.capture(client, strip, RestoreOrder::Normal);
                    client.set_all(strip, &[WidgetAttr::Width(0), WidgetAttr::WidthMode(SizeMode::Minus)]);
                    client.revalidate(strip);
                }
                continue;
            }

            self.capture(client, button, RestoreOrder::Normal);
            let Some(original) = self.snapshot(button).copied() else {
                continue;
            };
            let (x, width) = if chat.center_buttons {
                ((chat_width - ids::DEFAULT_CHAT_WIDTH) / 2 + original.x, original.width)
            } else {
                (
                    chat_width * original.x / ids::DEFAULT_CHAT_WIDTH,
                    chat_width * original.width / ids::DEFAULT_CHAT_WIDTH,
                )
            };
            client.set_all(button, &[WidgetAttr::X(x), WidgetAttr::Width(width)]);

            if report_mounted && button != ids::CHATBOX_REPORT_BUTTON {
                if let Some(&sprite) = client.static_children(button).first() {
                    self.capture(client, sprite, RestoreOrder::Normal);
                    client.set(sprite, WidgetAttr::Width(width));
                }
            }
            client.revalidate_scroll(button);
        }
    }

    /// Installs the cut-up chat artwork and adds the three background pieces
    /// (middle, left edge, right edge) behind the widened chat.
    pub fn setup_wide_chatbox<C: Client>(&mut self, client: &mut C, chat: ChatContext) {
        if !chat.wide {
            return;
        }
        client.install_chatbox_sprites();
        self.create_chatbox_sprites(client);
    }

    fn create_chatbox_sprites<C: Client>(&mut self, client: &mut C) {
        let (Some(canvas), Some(frame), Some(_)) = (
            client.widget(ids::CANVAS),
            client.widget(ids::CHATBOX_FRAME),
            client.widget(ids::CHATBOX_BUTTONS),
        ) else {
            return;
        };
        if client.widget(ids::CHATBOX_TRANSPARENT_BACKGROUND).is_none() {
            return;
        }
        let existing = client.dynamic_children(ids::CHATBOX_TRANSPARENT_BACKGROUND).len();
        if frame.hidden || existing != 1 {
            debug!(existing, "chat background not in its default state; skipping");
            return;
        }

        let parent = ids::CHATBOX_TRANSPARENT_BACKGROUND;
        let middle = middle_background_width(canvas.resolved_width);
        let pieces = [
            SpriteSpec::new(parent, sprite::CHATBOX_FULL)
                .bounds(0, 0, middle, 0)
                .modes(PositionMode::AbsoluteCenter, PositionMode::AbsoluteStart),
            SpriteSpec::new(parent, sprite::CHATBOX_LEFT).bounds(0, 0, 30, 0),
            SpriteSpec::new(parent, sprite::CHATBOX_RIGHT)
                .bounds(0, 0, 30, 0)
                .modes(PositionMode::AbsoluteEnd, PositionMode::AbsoluteStart),
        ];
        for piece in pieces {
            let piece = piece.size_modes(SizeMode::Absolute, SizeMode::Minus);
            self.create_sprite(client, &piece, Ownership::Shared);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::sys::memory::MemoryClient;

    fn wide() -> ChatContext {
        ChatContext {
            wide: true,
            centering: true,
            center_buttons: true,
            ..Default::default()
        }
    }

    #[test]
    fn middle_width_matches_the_host_artwork_ratio() {
        assert_eq!(middle_background_width(1249), 1056);
        assert_eq!(middle_background_width(765), 516);
    }

    #[test]
    fn viewport_offset_tracks_transparency() {
        assert_eq!(wide().viewport_offset(), 23);
        let transparent = ChatContext { transparent: true, ..wide() };
        assert_eq!(transparent.viewport_offset(), 0);
        assert!(!transparent.centers_viewport());
    }

    #[test]
    fn chat_open_depends_on_frame_visibility() {
        let mut client = MemoryClient::classic_resizable();
        assert!(is_chatbox_open(&client, false));
        client.set(ids::CHATBOX_FRAME, WidgetAttr::Hidden(true));
        assert!(!is_chatbox_open(&client, false));
    }

    #[test]
    fn cutscene_chat_needs_background_children() {
        let mut client = MemoryClient::classic_resizable();
        client.delete_all_children(ids::CHATBOX_TRANSPARENT_BACKGROUND);
        assert!(is_chatbox_open(&client, false));
        assert!(!is_chatbox_open(&client, true));
    }

    #[test]
    fn widening_is_a_no_op_without_the_setting() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        engine.widen_chat(&mut client, ChatContext::default());
        assert!(!engine.is_modified());
    }

    #[test]
    fn widening_stretches_the_chat_panel() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        engine.widen_chat(&mut client, wide());

        let width = client.canvas_width() - ids::SIDE_PANEL_WIDTH;
        assert_eq!(client.widget(ids::CHATBOX_PARENT).unwrap().width, width);
        assert_eq!(client.widget(ids::CHATBOX_FRAME).unwrap().width, width);
        assert!(client.widget(ids::REPORT_ABUSE_BACKDROP).unwrap().self_hidden);
    }

    #[test]
    fn centered_buttons_keep_their_width() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        let buttons = client.static_children(ids::CHATBOX_BUTTONS);
        let first_button = buttons[1];
        let before = client.widget(first_button).unwrap();

        engine.widen_chat(&mut client, wide());
        let chat_width = client.widget(ids::CHATBOX_BUTTONS).unwrap().resolved_width;
        let after = client.widget(first_button).unwrap();
        assert_eq!(after.width, before.width);
        assert_eq!(after.x, (chat_width - ids::DEFAULT_CHAT_WIDTH) / 2 + before.x);

        // A second pass starts from the captured original, not the moved value.
        engine.position_chatbox_buttons(&mut client, wide());
        assert_eq!(client.widget(first_button).unwrap().x, after.x);
    }

    #[test]
    fn stretched_buttons_scale_with_the_panel() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        let first_button = client.static_children(ids::CHATBOX_BUTTONS)[1];
        let before = client.widget(first_button).unwrap();

        engine.widen_chat(&mut client, ChatContext { center_buttons: false, ..wide() });
        let chat_width = client.widget(ids::CHATBOX_BUTTONS).unwrap().resolved_width;
        let after = client.widget(first_button).unwrap();
        assert_eq!(after.width, chat_width * before.width / ids::DEFAULT_CHAT_WIDTH);
    }

    #[test]
    fn chat_background_pieces_are_added_once() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        engine.setup_wide_chatbox(&mut client, wide());
        engine.setup_wide_chatbox(&mut client, wide());

        let pieces = client.dynamic_children(ids::CHATBOX_TRANSPARENT_BACKGROUND);
        assert_eq!(pieces.len(), 4);
        let middle = client.widget(pieces[1]).unwrap();
        assert_eq!(middle.sprite_id, sprite::CHATBOX_FULL);
        assert_eq!(middle.height_mode, SizeMode::Minus);
        assert!(client.chatbox_sprites_installed);
        assert!(engine.session().created_under().is_empty());
        assert_eq!(engine.session().created(), &pieces[1..]);

        engine.reset(&mut client);
        assert_eq!(client.dynamic_children(ids::CHATBOX_TRANSPARENT_BACKGROUND), vec![pieces[0]]);
    }

    #[test]
    fn open_chat_with_centering_reserves_the_full_chat_height() {
        let mut client = MemoryClient::classic_resizable();
        let mut engine = LayoutEngine::new();
        let chat_y = client.widget(ids::CHATBOX_PARENT).unwrap().y;
        engine.chatbox_changed(&mut client, wide());

        let viewport = client.widget(ids::RENDER_VIEWPORT).unwrap();
        assert_eq!(viewport.height, ids::CHATBOX_HEIGHT + chat_y);
        assert_eq!(viewport.y_mode, PositionMode::AbsoluteStart);

        client.set(ids::CHATBOX_FRAME, WidgetAttr::Hidden(true));
        engine.chatbox_changed(&mut client, wide());
        assert_eq!(
            client.widget(ids::RENDER_VIEWPORT).unwrap().height,
            ids::CHAT_BUTTONS_HEIGHT + chat_y
        );
    }
}
