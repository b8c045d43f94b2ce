use tracing::{debug, warn};

use crate::actor::reactor::{LayoutState, Reactor};
use crate::layout_engine::interface_fix;
use crate::sys::client::Client;
use crate::sys::event::Script;

pub struct ScriptEventHandler;

impl ScriptEventHandler {
    pub fn handle_script<C: Client>(reactor: &mut Reactor<C>, script: Script) {
        if script == Script::LayoutModeChanged {
            Self::handle_layout_mode_changed(reactor);
            return;
        }
        if !reactor.is_active() {
            return;
        }

        let chat = reactor.chat_context();
        let engine = &mut reactor.layout_engine;
        let client = &mut reactor.client;
        match script {
            Script::InterfaceBoundsRecalculated => engine.fix_interface_dimensions(client, chat),
            Script::StatsGuideOpened => reactor.frame_fixups.stats_guide = true,
            Script::WindowResized => {
                engine.chatbox_changed(client, chat);
                engine.widen_chat(client, chat);
            }
            Script::RightOrbsRepositioned => {
                engine.fix_right_orbs(client);
                engine.fix_interface_dimensions(client, chat);
                engine.reposition_minimap(client, reactor.config.settings.orbs_position);
            }
            Script::InventoryBackgroundReset => {
                engine.check_minimap_sprites(client);
                engine.fix_inventory_background(client);
                if chat.cutscene {
                    engine.unhide_inventory(client);
                }
            }
            Script::ChatboxToggled => {
                engine.chatbox_changed(client, chat);
                engine.widen_chat(client, chat);
                if chat.wide && reactor.flags.background_interface {
                    if let Err(err) = interface_fix::fix_widget_background(client, chat) {
                        warn!(%err, "could not re-fit interface background");
                    }
                }
            }
            Script::MinigameOverlay => engine.fix_ingame_overlay_widgets(client, chat),
            Script::LayoutModeChanged => {}
        }
    }

    /// The player picked another layout in the host's settings. Whatever is
    /// applied belongs to the old layout's widgets.
    fn handle_layout_mode_changed<C: Client>(reactor: &mut Reactor<C>) {
        if reactor.state == LayoutState::Active || reactor.layout_engine.is_modified() {
            debug!("layout mode changed; resetting");
            reactor.reset();
        }
        reactor.queue_initialization();
    }
}
