//! Recording of host notifications as JSON lines, and playback of a
//! recording into a fresh reactor.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use tracing::warn;

use crate::sys::event::RawEvent;

pub struct Record {
    file: Option<BufWriter<File>>,
}

impl Record {
    pub fn new(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => Some(BufWriter::new(
                File::create(path).with_context(|| format!("creating {}", path.display()))?,
            )),
            None => None,
        };
        Ok(Self { file })
    }

    /// A record that writes nothing.
    pub fn noop() -> Self { Self { file: None } }

    pub fn on_event(&mut self, event: &RawEvent) {
        let Some(file) = &mut self.file else {
            return;
        };
        if let Err(err) = write_line(file, event) {
            warn!(%err, "failed to record event; recording stopped");
            self.file = None;
        }
    }
}

fn write_line(file: &mut BufWriter<File>, event: &RawEvent) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *file, event)?;
    writeln!(file)?;
    file.flush()?;
    Ok(())
}

/// Reads a recording made by [`Record`]. Blank lines are skipped.
pub fn replay(path: &Path) -> anyhow::Result<Vec<RawEvent>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut events = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed event", path.display(), index + 1))?;
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_log::test;

    use super::*;
    use crate::sys::client::GameState;

    #[test]
    fn recorded_events_replay_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let events = vec![
            RawEvent::GameStateChanged(GameState::LoggedIn),
            RawEvent::PluginStarted,
            RawEvent::ClientTick,
            RawEvent::ScriptPostFired { script_id: 902 },
        ];

        let mut record = Record::new(Some(&path)).unwrap();
        for event in &events {
            record.on_event(event);
        }
        drop(record);

        assert_eq!(replay(&path).unwrap(), events);
    }

    #[test]
    fn malformed_lines_name_their_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jsonl");
        std::fs::write(&path, "\"plugin_started\"\n\n{\"nope\":1}\n").unwrap();

        let err = replay(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.jsonl:3"));
    }

    #[test]
    fn noop_record_writes_nothing() {
        let mut record = Record::noop();
        record.on_event(&RawEvent::GameTick);
        assert!(record.file.is_none());
    }
}
