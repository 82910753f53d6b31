// Movie blob store
// Durable keyed storage for movie records and their large payloads.

use std::path::Path;
use rusqlite::{Connection, TransactionBehavior};

use crate::db::{self, schema};
use crate::db::schema::{MovieSummary, NewMovie};
use crate::error::{LibraryError, Result};

/// Storage operations the library manager depends on.
///
/// Every failure is returned to the caller; implementations never retry.
pub trait MovieStore {
    /// Persist a new record. Fails with `DuplicateKey` if the id exists.
    fn create(&self, movie: &NewMovie) -> Result<()>;

    /// All records in insertion order, without the movie payload.
    fn list_all(&self) -> Result<Vec<MovieSummary>>;

    /// The movie payload for `id`, or `NotFound`.
    fn get_movie_binary(&self, id: &str) -> Result<Vec<u8>>;

    /// Replace the cover payload for `id`, or `NotFound`.
    fn set_cover_binary(&self, id: &str, cover: &[u8]) -> Result<()>;

    fn get_summary(&self, id: &str) -> Result<MovieSummary>;
}

/// SQLite-backed store. One connection, opened once at startup and handed
/// to whoever needs it.
pub struct SqliteMovieStore {
    conn: Connection,
}

impl SqliteMovieStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = db::open_db(db_path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self { conn })
    }
}

impl MovieStore for SqliteMovieStore {
    fn create(&self, movie: &NewMovie) -> Result<()> {
        schema::insert_movie(&self.conn, movie)?;
        log::debug!("Stored movie {} ({} bytes)", movie.id, movie.movie_blob.len());
        Ok(())
    }

    fn list_all(&self) -> Result<Vec<MovieSummary>> {
        schema::list_movies(&self.conn)
    }

    fn get_movie_binary(&self, id: &str) -> Result<Vec<u8>> {
        schema::get_movie_blob(&self.conn, id)?
            .ok_or_else(|| LibraryError::NotFound(format!("movie {}", id)))
    }

    fn set_cover_binary(&self, id: &str, cover: &[u8]) -> Result<()> {
        // Immediate transaction: the write lock is taken up front, readers
        // keep seeing the previous cover until commit.
        let tx = rusqlite::Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        if !schema::update_movie_cover(&tx, id, cover)? {
            tx.rollback()?;
            return Err(LibraryError::NotFound(format!("movie {}", id)));
        }
        tx.commit()?;
        log::debug!("Replaced cover for movie {} ({} bytes)", id, cover.len());
        Ok(())
    }

    fn get_summary(&self, id: &str) -> Result<MovieSummary> {
        schema::get_movie_summary(&self.conn, id)?
            .ok_or_else(|| LibraryError::NotFound(format!("movie {}", id)))
    }
}
