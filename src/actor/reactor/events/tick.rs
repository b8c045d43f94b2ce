use tracing::warn;

use crate::actor::reactor::{Reactor, TaskTiming};
use crate::layout_engine::interface_fix;
use crate::sys::client::Client;

pub struct TickEventHandler;

impl TickEventHandler {
    pub fn handle_game_tick<C: Client>(reactor: &mut Reactor<C>) {
        reactor.run_tasks(TaskTiming::GameTick);
    }

    pub fn handle_client_tick<C: Client>(reactor: &mut Reactor<C>) {
        reactor.run_tasks(TaskTiming::ClientTick);
    }

    /// Frame-level fixups. These run before the frame is drawn so the host's
    /// own layout pass never shows for a frame.
    pub fn handle_before_render<C: Client>(reactor: &mut Reactor<C>) {
        if !reactor.is_active() {
            return;
        }
        let chat = reactor.chat_context();
        reactor.layout_engine.fix_ingame_overlay_widgets(&mut reactor.client, chat);

        let fixups = std::mem::take(&mut reactor.frame_fixups);
        if fixups.stats_guide {
            interface_fix::fix_stats_guide(&mut reactor.client);
        }
        if fixups.widget_background {
            if let Err(err) = interface_fix::fix_widget_background(&mut reactor.client, chat) {
                warn!(%err, "could not re-fit interface background");
            }
        }
    }
}
