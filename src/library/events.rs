// Library event payloads and sinks
// Everything the presentation side learns about the library arrives here.

use serde::{Deserialize, Serialize};

use crate::handles::HandleUrl;

pub const LIBRARY_EVENT: &str = "library-event";

/// One row of the published movie list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub id: String,
    pub name: String,
    pub cover_handle: Option<HandleUrl>,
}

/// A movie being viewed. The holder must end it exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackSession {
    pub id: String,
    pub name: String,
    pub movie_handle: HandleUrl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LibraryEvent {
    EntriesLoaded { entries: Vec<ListEntry> },
    EntryAdded { entry: ListEntry },
    EntryUpdated { entry: ListEntry },
    PlaybackStarted { session: PlaybackSession },
    PlaybackEnded { id: String },
}

pub trait EventSink {
    fn emit(&self, event: &LibraryEvent);
}

impl<F> EventSink for F
where
    F: Fn(&LibraryEvent),
{
    fn emit(&self, event: &LibraryEvent) {
        self(event)
    }
}

/// Drops every event. Used when nobody is listening (e.g. CLI context).
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: &LibraryEvent) {}
}

/// Writes each event as a JSON line to the log at debug level.
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &LibraryEvent) {
        match serde_json::to_string(event) {
            Ok(json) => log::debug!("{}: {}", LIBRARY_EVENT, json),
            Err(e) => log::warn!("Failed to serialize {}: {}", LIBRARY_EVENT, e),
        }
    }
}
