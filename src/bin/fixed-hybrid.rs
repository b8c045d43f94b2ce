use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use fixed_hybrid::actor::{self, reactor};
use fixed_hybrid::actor::reactor::Reactor;
use fixed_hybrid::common::config::{Config, config_file};
use fixed_hybrid::common::log;
use fixed_hybrid::model::session::LayoutMode;
use fixed_hybrid::sys::event::RawEvent;
use fixed_hybrid::sys::memory::MemoryClient;
use serde_json::json;
use tracing::{error, info};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum HostLayout {
    Fixed,
    Classic,
    Modern,
}

impl From<HostLayout> for LayoutMode {
    fn from(layout: HostLayout) -> Self {
        match layout {
            HostLayout::Fixed => LayoutMode::Fixed,
            HostLayout::Classic => LayoutMode::ClassicResizable,
            HostLayout::Modern => LayoutMode::ModernResizable,
        }
    }
}

/// Replays recorded host events against an in-memory classic resizable
/// host and prints the resulting widget tree as JSON.
#[derive(Parser)]
struct Cli {
    /// JSON-lines recording of host events. Without one, the plugin is
    /// started and given a single client tick.
    events: Option<PathBuf>,

    /// Settings file. Defaults to fixed-hybrid.toml in the user config
    /// directory, falling back to built-in defaults if that does not exist.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Check the settings file and exit.
    #[arg(long)]
    validate: bool,

    /// Record the events fed to the reactor to the specified file path.
    /// Overwrites the file if it exists.
    #[arg(long)]
    record: Option<PathBuf>,

    /// Layout the in-memory host starts in.
    #[arg(long, value_enum, default_value_t = HostLayout::Classic)]
    layout: HostLayout,

    /// Include every host call made, in order.
    #[arg(long)]
    journal: bool,
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::read(&path),
        None if config_file().exists() => Config::read(&config_file()),
        None => Ok(Config::default()),
    }
}

fn main() {
    let opt: Cli = Parser::parse();
    log::init_logging();

    if let Err(err) = run(opt) {
        error!("{err:#}");
        process::exit(1);
    }
}

fn run(opt: Cli) -> anyhow::Result<()> {
    let mut config = load_config(opt.config)?;

    let issues = config.validate();
    if opt.validate {
        for issue in &issues {
            println!("{issue}");
        }
        if !issues.is_empty() {
            process::exit(2);
        }
        return Ok(());
    }
    if !issues.is_empty() {
        let fixes = config.auto_fix_values();
        info!(fixes, "replaced invalid settings with defaults");
    }

    let events = match &opt.events {
        Some(path) => reactor::replay(path)?,
        None => vec![RawEvent::PluginStarted, RawEvent::ClientTick],
    };

    let mut client = MemoryClient::classic_resizable();
    client.set_layout(opt.layout.into());
    let record = reactor::Record::new(opt.record.as_deref())?;
    let reactor = Reactor::new(client, config, record);

    let (events_tx, events_rx) = actor::channel();
    for event in events {
        events_tx.send(event);
    }
    drop(events_tx);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("starting runtime")?;
    let mut reactor = runtime.block_on(reactor.run(events_rx));

    let journal = if opt.journal {
        Some(reactor.client_mut().take_journal())
    } else {
        None
    };
    let report = json!({
        "state": reactor.state(),
        "modified": reactor.layout_engine().is_modified(),
        "widgets": reactor.client().dump(),
        "journal": journal,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
