use tracing::{debug, warn};

use crate::actor::reactor::{ConfigChange, Reactor};
use crate::common::config::ConfigKey;
use crate::sys::client::Client;

pub struct ConfigEventHandler;

impl ConfigEventHandler {
    pub fn handle_config_changed<C: Client>(reactor: &mut Reactor<C>, change: ConfigChange) {
        if let ConfigChange::Setting(key, Some(value)) = &change {
            if let Err(err) = reactor.config.settings.apply_host_value(*key, value) {
                warn!(%err, "ignoring setting value");
            }
        }

        let settings = &mut reactor.config.settings;
        match change {
            ConfigChange::Setting(ConfigKey::AspectRatioResize, _) if settings.aspect_ratio_resize => {
                reactor.resize_by_aspect_ratio();
                return;
            }
            ConfigChange::Setting(ConfigKey::ChatboxViewportCentering, _)
                if reactor.flags.transparent_chatbox =>
            {
                debug!("centering is unavailable with a transparent chatbox");
                settings.chatbox_viewport_centering = false;
                return;
            }
            ConfigChange::Setting(..) | ConfigChange::Appearance => {}
        }

        if reactor.state.is_underway() {
            reactor.reset();
            reactor.queue_initialization();
        }
    }
}
