use tracing::{debug, info};

use crate::actor::reactor::{LayoutState, Reactor};
use crate::sys::client::{Client, GameState};

pub struct LifecycleEventHandler;

impl LifecycleEventHandler {
    pub fn handle_plugin_started<C: Client>(reactor: &mut Reactor<C>) {
        info!("plugin started");
        if reactor.client.game_state() == GameState::LoggedIn {
            reactor.queue_initialization();
        }
    }

    pub fn handle_plugin_stopped<C: Client>(reactor: &mut Reactor<C>) {
        info!("plugin stopped");
        reactor.tasks.clear();
        reactor.reset();
    }

    pub fn handle_game_state_changed<C: Client>(reactor: &mut Reactor<C>, state: GameState) {
        match state {
            GameState::LoggedIn => {
                if reactor.state == LayoutState::Idle {
                    reactor.queue_initialization();
                } else {
                    debug!(state = ?reactor.state, "logged in with a session underway");
                }
            }
            GameState::LoginScreen | GameState::Hopping | GameState::ConnectionLost => {
                reactor.reset();
            }
            GameState::Loading => {}
        }
    }
}
