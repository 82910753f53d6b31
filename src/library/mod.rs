// Movie library manager
//
// Sole caller of the movie store. Turns stored payloads into live handles,
// keeps at most one live cover handle per movie, and publishes the list and
// the current playback session through an event sink.

pub mod events;
pub mod naming;
pub mod pagination;


use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::schema::{MovieSummary, NewMovie};
use crate::error::{LibraryError, Result};
use crate::handles::{HandleKind, HandleRegistry, HandleUrl};
use crate::store::MovieStore;

pub use events::{EventSink, LibraryEvent, ListEntry, LogSink, NoopSink, PlaybackSession};
pub use naming::display_name_from_hint;

/// Correlates a pending cover pick with the movie that asked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverRequest {
    target_id: String,
}

impl CoverRequest {
    pub fn target_id(&self) -> &str {
        &self.target_id
    }
}

pub struct MovieLibrary<S: MovieStore> {
    store: S,
    handles: HandleRegistry,
    cover_handles: HashMap<String, HandleUrl>,
    entries: Vec<ListEntry>,
    now_playing: Option<PlaybackSession>,
    sink: Box<dyn EventSink>,
    initialized: bool,
    torn_down: bool,
}

impl<S: MovieStore> MovieLibrary<S> {
    pub fn new(store: S) -> Self {
        Self::with_sink(store, Box::new(NoopSink))
    }

    pub fn with_sink(store: S, sink: Box<dyn EventSink>) -> Self {
        Self {
            store,
            handles: HandleRegistry::new(),
            cover_handles: HashMap::new(),
            entries: Vec::new(),
            now_playing: None,
            sink,
            initialized: false,
            torn_down: false,
        }
    }

    /// Load every record and materialize one handle per stored cover.
    /// Runs once; later calls are no-ops.
    pub fn initialize(&mut self) -> Result<()> {
        if self.torn_down {
            return Err(LibraryError::InvalidInput("library has been torn down".to_string()));
        }
        if self.initialized {
            log::debug!("Library already initialized, skipping reload");
            return Ok(());
        }

        let movies = self.store.list_all()?;

        let mut entries = Vec::with_capacity(movies.len());
        for movie in movies {
            let cover_handle = movie.cover_blob.map(|cover| {
                let url = self.handles.create(HandleKind::Cover, cover);
                self.cover_handles.insert(movie.id.clone(), url.clone());
                url
            });
            entries.push(ListEntry {
                id: movie.id,
                name: movie.name,
                cover_handle,
            });
        }

        log::info!(
            "Loaded {} movies ({} with covers)",
            entries.len(),
            self.cover_handles.len()
        );

        self.entries = entries;
        self.initialized = true;
        self.sink.emit(&LibraryEvent::EntriesLoaded { entries: self.entries.clone() });
        Ok(())
    }

    /// Store a newly imported movie and start playing it straight from the
    /// in-memory payload.
    pub fn add_movie(&mut self, name_hint: &str, movie_binary: Vec<u8>) -> Result<PlaybackSession> {
        self.ensure_ready()?;

        let movie = NewMovie {
            id: Uuid::new_v4().to_string(),
            name: display_name_from_hint(name_hint),
            movie_blob: movie_binary,
            cover_blob: None,
        };
        self.store.create(&movie)?;
        log::info!("Added movie '{}' as {}", movie.name, movie.id);

        let entry = ListEntry {
            id: movie.id.clone(),
            name: movie.name.clone(),
            cover_handle: None,
        };
        self.entries.push(entry.clone());
        self.sink.emit(&LibraryEvent::EntryAdded { entry });

        Ok(self.start_session(movie.id, movie.name, movie.movie_blob.into()))
    }

    /// Fetch the movie payload and open a session on a fresh handle.
    /// A missing payload yields `NotFound` and creates nothing.
    pub fn request_playback(&mut self, id: &str) -> Result<PlaybackSession> {
        self.ensure_ready()?;

        let movie_binary = self.store.get_movie_binary(id)?;
        let name = match self.entry(id) {
            Some(entry) => entry.name.clone(),
            None => self.store.get_summary(id)?.name,
        };

        Ok(self.start_session(id.to_string(), name, movie_binary.into()))
    }

    /// Release the session's movie handle. Safe to call more than once;
    /// returns whether this call did the release.
    pub fn end_playback_session(&mut self, session: &PlaybackSession) -> bool {
        let revoked = self.handles.revoke(&session.movie_handle);

        let is_published = self.now_playing
            .as_ref()
            .is_some_and(|s| s.movie_handle == session.movie_handle);
        if is_published {
            self.now_playing = None;
            self.sink.emit(&LibraryEvent::PlaybackEnded { id: session.id.clone() });
        }

        if revoked {
            log::debug!("Ended playback of {}", session.id);
        }
        revoked
    }

    /// Persist a new cover, then swap the published handle for one backed
    /// by it. On failure the old handle and entry stay as they were.
    pub fn request_cover_update(&mut self, id: &str, cover_binary: Vec<u8>) -> Result<ListEntry> {
        self.ensure_ready()?;

        self.store.set_cover_binary(id, &cover_binary)?;

        // A record written by another process has no entry yet
        let (index, appended) = match self.entries.iter().position(|e| e.id == id) {
            Some(index) => (index, false),
            None => {
                let summary = self.store.get_summary(id)?;
                self.entries.push(ListEntry {
                    id: summary.id,
                    name: summary.name,
                    cover_handle: None,
                });
                (self.entries.len() - 1, true)
            }
        };

        let payload: Arc<[u8]> = cover_binary.into();
        let new_url = self.handles.create(HandleKind::Cover, payload);
        let previous = self.cover_handles.insert(id.to_string(), new_url.clone());
        self.entries[index].cover_handle = Some(new_url);

        // Only unpublished handles are revoked
        if let Some(old_url) = previous {
            self.handles.revoke(&old_url);
        }

        let entry = self.entries[index].clone();
        log::info!("Updated cover for '{}'", entry.name);
        if appended {
            self.sink.emit(&LibraryEvent::EntryAdded { entry: entry.clone() });
        } else {
            self.sink.emit(&LibraryEvent::EntryUpdated { entry: entry.clone() });
        }
        Ok(entry)
    }

    /// Start a cover pick for `id`. The returned token travels with the
    /// file selection and is handed back to `complete_cover_selection`.
    pub fn begin_cover_selection(&self, id: &str) -> Result<CoverRequest> {
        self.ensure_ready()?;
        if self.entry(id).is_none() {
            return Err(LibraryError::NotFound(format!("movie {}", id)));
        }
        Ok(CoverRequest { target_id: id.to_string() })
    }

    pub fn complete_cover_selection(&mut self, request: CoverRequest, cover_binary: Vec<u8>) -> Result<ListEntry> {
        self.request_cover_update(&request.target_id, cover_binary)
    }

    /// Revoke every handle this library issued. Returns how many were live.
    pub fn teardown(&mut self) -> usize {
        if self.torn_down {
            return 0;
        }

        let mut released = 0;
        for (_, url) in self.cover_handles.drain() {
            if self.handles.revoke(&url) {
                released += 1;
            }
        }

        if let Some(session) = self.now_playing.take() {
            log::warn!("Tearing down while '{}' is still playing", session.name);
            if self.handles.revoke(&session.movie_handle) {
                released += 1;
            }
            self.sink.emit(&LibraryEvent::PlaybackEnded { id: session.id });
        }

        let stray = self.handles.revoke_all();
        if stray > 0 {
            log::warn!("Revoked {} handles that were never released", stray);
        }

        for entry in &mut self.entries {
            entry.cover_handle = None;
        }
        self.torn_down = true;

        log::info!("Library torn down, {} handles released", released + stray);
        released + stray
    }

    /// Run `work` against the library and tear it down afterwards, whether
    /// `work` succeeded or not.
    pub fn run_then_teardown<T, E>(
        mut self,
        work: impl FnOnce(&mut Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E> {
        let result = work(&mut self);
        self.teardown();
        result
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn entry(&self, id: &str) -> Option<&ListEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn playback_session(&self) -> Option<&PlaybackSession> {
        self.now_playing.as_ref()
    }

    /// Stored details for one movie (size, added time, cover payload).
    pub fn details(&self, id: &str) -> Result<MovieSummary> {
        self.ensure_ready()?;
        self.store.get_summary(id)
    }

    /// Resolve a handle issued by this library to its payload.
    pub fn resolve(&self, url: &HandleUrl) -> Option<Arc<[u8]>> {
        self.handles.resolve(url)
    }

    #[cfg(test)]
    pub fn is_live(&self, url: &HandleUrl) -> bool {
        self.handles.is_live(url)
    }

    #[cfg(test)]
    pub fn live_cover_handles(&self) -> usize {
        self.handles.live_count_of(HandleKind::Cover)
    }

    #[cfg(test)]
    pub fn live_movie_handles(&self) -> usize {
        self.handles.live_count_of(HandleKind::Movie)
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.torn_down {
            return Err(LibraryError::InvalidInput("library has been torn down".to_string()));
        }
        if !self.initialized {
            return Err(LibraryError::InvalidInput("library has not been initialized".to_string()));
        }
        Ok(())
    }

    fn start_session(&mut self, id: String, name: String, payload: Arc<[u8]>) -> PlaybackSession {
        // The viewer is a single overlay; a displaced session is released here
        if let Some(previous) = self.now_playing.take() {
            log::warn!("Replacing active playback of '{}'", previous.name);
            self.handles.revoke(&previous.movie_handle);
            self.sink.emit(&LibraryEvent::PlaybackEnded { id: previous.id });
        }

        let movie_handle = self.handles.create(HandleKind::Movie, payload);
        let session = PlaybackSession { id, name, movie_handle };
        self.now_playing = Some(session.clone());
        self.sink.emit(&LibraryEvent::PlaybackStarted { session: session.clone() });
        session
    }
}

impl<S: MovieStore> Drop for MovieLibrary<S> {
    fn drop(&mut self) {
        let live = self.handles.live_count();
        if live > 0 {
            log::warn!("Library dropped with {} live handles, revoking", live);
            self.handles.revoke_all();
        }
    }
}
