use tracing::debug;

use crate::actor::reactor::{Reactor, Task};
use crate::sys::client::Client;
use crate::sys::event::WatchedInterface;

pub struct InterfaceEventHandler;

impl InterfaceEventHandler {
    pub fn handle_cutscene_changed<C: Client>(reactor: &mut Reactor<C>, active: bool) {
        reactor.flags.cutscene = active;
        reactor.queue_task(Task::RefreshChatbox);
    }

    pub fn handle_transparent_chatbox_changed<C: Client>(reactor: &mut Reactor<C>, transparent: bool) {
        reactor.flags.transparent_chatbox = transparent;
        if transparent && reactor.config.settings.chatbox_viewport_centering {
            debug!("transparent chatbox; turning off viewport centering");
            reactor.config.settings.chatbox_viewport_centering = false;
        }
        reactor.queue_task(Task::RefreshChatbox);
    }

    pub fn handle_interface_mounted<C: Client>(
        reactor: &mut Reactor<C>,
        interface: WatchedInterface,
        mounted: bool,
    ) {
        reactor.flags.background_interface = mounted;
        if mounted && interface.refits_on_mount() {
            reactor.frame_fixups.widget_background = true;
        }
    }
}
