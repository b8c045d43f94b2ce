use super::{Event, Reactor, Record};
use crate::common::config::Config;
use crate::sys::memory::MemoryClient;

/// A reactor over a freshly logged-in classic resizable host.
pub fn reactor(config: Config) -> Reactor<MemoryClient> {
    Reactor::new(MemoryClient::classic_resizable(), config, Record::noop())
}

/// Like [`reactor`], with every override already applied.
pub fn active_reactor(config: Config) -> Reactor<MemoryClient> {
    let mut reactor = reactor(config);
    reactor.handle_event(Event::PluginStarted);
    reactor.handle_event(Event::ClientTick);
    reactor.client_mut().take_journal();
    reactor
}

pub fn wide_config() -> Config {
    let mut config = Config::default();
    config.settings.wide_chatbox = true;
    config
}
